//! Outbound hop plumbing: a bounded-deadline HTTP client per peer.

use std::future::Future;
use std::time::Duration;

use serde::de::DeserializeOwned;
use serde::Serialize;

use domainguard_core::error::{DomainGuardError, Result};

/// Run `fut` under `deadline`; expiry is a downstream failure.
pub async fn with_deadline<T, F>(deadline: Duration, what: &str, fut: F) -> Result<T>
where
    F: Future<Output = Result<T>>,
{
    match tokio::time::timeout(deadline, fut).await {
        Ok(out) => out,
        Err(_) => Err(DomainGuardError::Downstream(format!(
            "{what} timed out after {}ms",
            deadline.as_millis()
        ))),
    }
}

/// HTTP client bound to one peer base URL.
#[derive(Debug, Clone)]
pub struct PeerClient {
    name: &'static str,
    base: String,
    http: reqwest::Client,
}

impl PeerClient {
    pub fn new(name: &'static str, base_url: &str, deadline: Duration) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(deadline)
            .no_proxy()
            .build()
            .map_err(|e| DomainGuardError::Internal(format!("{name} client build failed: {e}")))?;
        Ok(Self {
            name,
            base: base_url.trim_end_matches('/').to_string(),
            http,
        })
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base, path)
    }

    /// POST a JSON body. Transport failures (including client-side timeout)
    /// become `Downstream`; status handling is left to the caller.
    pub async fn post_json<B: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<reqwest::Response> {
        self.http
            .post(self.url(path))
            .json(body)
            .send()
            .await
            .map_err(|e| self.unreachable(e))
    }

    pub fn unreachable(&self, e: reqwest::Error) -> DomainGuardError {
        DomainGuardError::Downstream(format!("{} unreachable: {e}", self.name))
    }

    pub fn bad_status(&self, status: reqwest::StatusCode) -> DomainGuardError {
        DomainGuardError::Downstream(format!("{} returned status {status}", self.name))
    }

    /// Require 2xx and decode a JSON body.
    pub async fn expect_json<T: DeserializeOwned>(&self, resp: reqwest::Response) -> Result<T> {
        let status = resp.status();
        if !status.is_success() {
            return Err(self.bad_status(status));
        }
        resp.json::<T>()
            .await
            .map_err(|e| {
                DomainGuardError::Downstream(format!("{} sent malformed body: {e}", self.name))
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn deadline_expiry_is_downstream() {
        let slow = async {
            tokio::time::sleep(Duration::from_millis(200)).await;
            Ok::<_, DomainGuardError>(())
        };
        let err = with_deadline(Duration::from_millis(10), "slow hop", slow).await.unwrap_err();
        assert!(err.is_downstream());
    }

    #[test]
    fn base_url_trailing_slash_is_trimmed() {
        let p = PeerClient::new("policy", "http://127.0.0.1:50052/", Duration::from_secs(1))
            .unwrap();
        assert_eq!(p.url("/v1/check"), "http://127.0.0.1:50052/v1/check");
    }
}

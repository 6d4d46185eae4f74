use axum::http::{header::AUTHORIZATION, HeaderMap};

use domainguard_core::error::{DomainGuardError, Result};

const BEARER_PREFIX: &str = "Bearer ";

/// Extract the token from `Authorization: Bearer <token>`.
/// Absent, non-ASCII, wrongly prefixed, or empty values are all `Unauthorized`.
pub fn bearer_token(headers: &HeaderMap) -> Result<&str> {
    headers
        .get(AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix(BEARER_PREFIX))
        .filter(|t| !t.is_empty())
        .ok_or_else(|| {
            DomainGuardError::Unauthorized("missing or invalid Authorization header".into())
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    fn with_auth(v: &'static str) -> HeaderMap {
        let mut h = HeaderMap::new();
        h.insert(AUTHORIZATION, HeaderValue::from_static(v));
        h
    }

    #[test]
    fn extracts_token() {
        assert_eq!(bearer_token(&with_auth("Bearer abc.def.ghi")).ok(), Some("abc.def.ghi"));
    }

    #[test]
    fn rejects_missing_and_malformed() {
        assert!(bearer_token(&HeaderMap::new()).is_err());
        assert!(bearer_token(&with_auth("Bearer ")).is_err());
        assert!(bearer_token(&with_auth("Basic dXNlcjpwYXNz")).is_err());
        assert!(bearer_token(&with_auth("bearer abc")).is_err());
    }
}

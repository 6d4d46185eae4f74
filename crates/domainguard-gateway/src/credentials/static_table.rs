use async_trait::async_trait;
use subtle::{Choice, ConstantTimeEq};

use domainguard_core::error::Result;
use domainguard_core::protocol::token::LoginRequest;

use super::CredentialVerifier;
use crate::config::StaticUser;

/// Fixed user table from config.
///
/// Every entry and every field is compared in constant time, so timing does
/// not reveal which field (or which user) failed to match.
pub struct StaticCredentialVerifier {
    users: Vec<StaticUser>,
}

impl StaticCredentialVerifier {
    pub fn new(users: Vec<StaticUser>) -> Self {
        Self { users }
    }

    fn matches(&self, creds: &LoginRequest) -> bool {
        let mut any = Choice::from(0u8);
        for u in &self.users {
            let user = u.username.as_bytes().ct_eq(creds.username.as_bytes());
            let pass = u.password.as_bytes().ct_eq(creds.password.as_bytes());
            let mfa = u.mfa.as_bytes().ct_eq(creds.mfa.as_bytes());
            any |= user & pass & mfa;
        }
        bool::from(any)
    }
}

#[async_trait]
impl CredentialVerifier for StaticCredentialVerifier {
    async fn verify(&self, creds: &LoginRequest) -> Result<bool> {
        Ok(self.matches(creds))
    }
}

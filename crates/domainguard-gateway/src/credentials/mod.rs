//! `CredentialVerifier` capability.
//!
//! The login pipeline treats verification as an opaque predicate over
//! `(username, password, mfa)`. A mismatch is `Ok(false)`; `Err` is reserved
//! for a verifier that could not answer.

pub mod identity_provider;
pub mod static_table;

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;

use domainguard_core::error::Result;
use domainguard_core::protocol::token::LoginRequest;

use crate::config::CredentialsSection;

pub use identity_provider::IdentityProviderVerifier;
pub use static_table::StaticCredentialVerifier;

#[async_trait]
pub trait CredentialVerifier: Send + Sync {
    async fn verify(&self, creds: &LoginRequest) -> Result<bool>;
}

pub fn from_config(
    cfg: &CredentialsSection,
    deadline: Duration,
) -> Result<Arc<dyn CredentialVerifier>> {
    match cfg {
        CredentialsSection::Static { users } => {
            Ok(Arc::new(StaticCredentialVerifier::new(users.clone())))
        }
        CredentialsSection::IdentityProvider { url } => {
            Ok(Arc::new(IdentityProviderVerifier::new(url, deadline)?))
        }
    }
}

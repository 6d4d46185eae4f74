//! domainguard core: the inter-domain policy model and its decision engine,
//! the well-known domains and hops, hop payloads, and the error taxonomy.
//!
//! Nothing here touches a socket or a runtime, so the engine answers the same
//! way whether it is embedded in a role or served by the Policy Service.
//!
//! `unwrap`, `expect` and `panic!` are lint-denied; every failure is a
//! `DomainGuardError`.

#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]

pub mod domain;
pub mod error;
pub mod policy;
pub mod protocol;

pub use error::{DomainGuardError, Result};
pub use policy::{AuthorizationDecision, Hop, PolicyEngine};

//! Policy layer (data model + engine).
//!
//! The engine answers "may domain S perform action A against domain T?" and
//! nothing else. It holds no mutable state and is safe for any number of
//! concurrent readers.

pub mod engine;
pub mod model;

pub use engine::{AuthorizationDecision, Hop, PolicyEngine};
pub use model::{DomainPolicy, Interaction, Policy};

//! domainguard gateway library entry.
//!
//! This crate wires configuration, the rate limiter, the policy gate, the
//! credential and Reference Monitor capabilities, and the four HTTP roles
//! (Auth Gateway, Token Enforcer, Policy Service, Reference Monitor) into
//! servable routers. It is consumed by the binary (`main.rs`) and by
//! integration tests.

pub mod app_state;
pub mod config;
pub mod credentials;
pub mod obs;
pub mod ops;
pub mod policy;
pub mod refmon;
pub mod router;
pub mod server;
pub mod services;
pub mod transport;

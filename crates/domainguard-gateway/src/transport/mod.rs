//! Transport layer (HTTP).
//!
//! Request-edge helpers shared by every role: client identity derivation,
//! bearer extraction, error-to-response mapping, and the peer client used for
//! outbound hops.

pub mod bearer;
pub mod client_ip;
pub mod http;
pub mod peer;

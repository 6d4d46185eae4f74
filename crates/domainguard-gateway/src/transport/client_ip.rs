//! Client identity derivation (rate-limit key + audit field).
//!
//! Order: first `X-Forwarded-For` entry, then `X-Real-IP`, then the transport
//! peer address.

use std::net::SocketAddr;

use axum::http::HeaderMap;

pub const FORWARDED_FOR: &str = "x-forwarded-for";
pub const REAL_IP: &str = "x-real-ip";

/// Used when neither headers nor connect info are available.
pub const UNKNOWN_CLIENT: &str = "unknown";

pub fn client_identity(headers: &HeaderMap, peer: Option<SocketAddr>) -> String {
    if let Some(first) = header_str(headers, FORWARDED_FOR)
        .and_then(|v| v.split(',').next())
        .map(str::trim)
        .filter(|s| !s.is_empty())
    {
        return first.to_string();
    }

    if let Some(real) = header_str(headers, REAL_IP)
        .map(str::trim)
        .filter(|s| !s.is_empty())
    {
        return real.to_string();
    }

    peer.map(|p| p.ip().to_string())
        .unwrap_or_else(|| UNKNOWN_CLIENT.to_string())
}

fn header_str<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers.get(name).and_then(|v| v.to_str().ok())
}

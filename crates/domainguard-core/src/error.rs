//! Shared error type across domainguard crates.

use thiserror::Error;

/// Client-facing error codes (stable API).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClientCode {
    /// Malformed body or missing fields.
    BadRequest,
    /// Credential or MFA mismatch.
    AuthFailed,
    /// Missing or malformed bearer credentials.
    Unauthorized,
    /// Authorization check returned `allowed=false`.
    PolicyDenied,
    /// Per-client throttle tripped.
    RateLimited,
    /// HTTP method not accepted by the endpoint.
    MethodNotAllowed,
    /// Peer unreachable, timed out, or answered with a non-success status.
    DownstreamUnavailable,
    /// Configuration or policy file rejected at load time.
    InvalidConfig,
    /// Unsupported config version.
    UnsupportedVersion,
    /// Internal server error.
    Internal,
}

impl ClientCode {
    /// String representation used in logs and metrics labels.
    pub fn as_str(self) -> &'static str {
        match self {
            ClientCode::BadRequest => "BAD_REQUEST",
            ClientCode::AuthFailed => "AUTH_FAILED",
            ClientCode::Unauthorized => "UNAUTHORIZED",
            ClientCode::PolicyDenied => "POLICY_DENIED",
            ClientCode::RateLimited => "RATE_LIMITED",
            ClientCode::MethodNotAllowed => "METHOD_NOT_ALLOWED",
            ClientCode::DownstreamUnavailable => "DOWNSTREAM_UNAVAILABLE",
            ClientCode::InvalidConfig => "INVALID_CONFIG",
            ClientCode::UnsupportedVersion => "UNSUPPORTED_VERSION",
            ClientCode::Internal => "INTERNAL",
        }
    }
}

/// Shared result type.
pub type Result<T> = std::result::Result<T, DomainGuardError>;

/// Unified error type used by core and gateway.
#[derive(Debug, Error)]
pub enum DomainGuardError {
    #[error("bad request: {0}")]
    BadRequest(String),
    #[error("invalid credentials or MFA")]
    AuthFailed,
    #[error("unauthorized: {0}")]
    Unauthorized(String),
    #[error("policy violation: {0}")]
    PolicyDenied(String),
    #[error("rate limit exceeded")]
    RateLimited,
    #[error("method not allowed")]
    MethodNotAllowed,
    #[error("downstream unavailable: {0}")]
    Downstream(String),
    #[error("invalid config: {0}")]
    InvalidConfig(String),
    #[error("unsupported config version")]
    UnsupportedVersion,
    #[error("internal: {0}")]
    Internal(String),
}

impl DomainGuardError {
    /// Map internal error to a stable client-facing code.
    pub fn client_code(&self) -> ClientCode {
        match self {
            DomainGuardError::BadRequest(_) => ClientCode::BadRequest,
            DomainGuardError::AuthFailed => ClientCode::AuthFailed,
            DomainGuardError::Unauthorized(_) => ClientCode::Unauthorized,
            DomainGuardError::PolicyDenied(_) => ClientCode::PolicyDenied,
            DomainGuardError::RateLimited => ClientCode::RateLimited,
            DomainGuardError::MethodNotAllowed => ClientCode::MethodNotAllowed,
            DomainGuardError::Downstream(_) => ClientCode::DownstreamUnavailable,
            DomainGuardError::InvalidConfig(_) => ClientCode::InvalidConfig,
            DomainGuardError::UnsupportedVersion => ClientCode::UnsupportedVersion,
            DomainGuardError::Internal(_) => ClientCode::Internal,
        }
    }

    /// Whether the failure belongs to a peer hop rather than the caller.
    pub fn is_downstream(&self) -> bool {
        matches!(self, DomainGuardError::Downstream(_))
    }
}

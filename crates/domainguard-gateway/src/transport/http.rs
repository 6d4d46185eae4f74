//! Error-to-response mapping for every HTTP role.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};

use domainguard_core::error::{ClientCode, DomainGuardError};

/// HTTP status for each client-facing code.
pub fn status_for(code: ClientCode) -> StatusCode {
    match code {
        ClientCode::BadRequest => StatusCode::BAD_REQUEST,
        ClientCode::AuthFailed | ClientCode::Unauthorized => StatusCode::UNAUTHORIZED,
        ClientCode::PolicyDenied => StatusCode::FORBIDDEN,
        ClientCode::RateLimited => StatusCode::TOO_MANY_REQUESTS,
        ClientCode::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
        ClientCode::DownstreamUnavailable
        | ClientCode::InvalidConfig
        | ClientCode::UnsupportedVersion
        | ClientCode::Internal => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

/// Axum adapter around `DomainGuardError`.
#[derive(Debug)]
pub struct ApiError(pub DomainGuardError);

impl From<DomainGuardError> for ApiError {
    fn from(e: DomainGuardError) -> Self {
        Self(e)
    }
}

impl ApiError {
    /// Caller-visible text. Peer and internal details stay in the logs.
    fn public_message(&self) -> String {
        match &self.0 {
            DomainGuardError::BadRequest(msg) => msg.clone(),
            DomainGuardError::AuthFailed => "Invalid credentials or MFA".into(),
            DomainGuardError::Unauthorized(msg) => msg.clone(),
            DomainGuardError::PolicyDenied(reason) => format!("Policy violation: {reason}"),
            DomainGuardError::RateLimited => "Rate limit exceeded".into(),
            DomainGuardError::MethodNotAllowed => "Method not allowed".into(),
            DomainGuardError::Downstream(_) => "Downstream service unavailable".into(),
            DomainGuardError::InvalidConfig(_)
            | DomainGuardError::UnsupportedVersion
            | DomainGuardError::Internal(_) => "Internal server error".into(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = status_for(self.0.client_code());
        (status, self.public_message()).into_response()
    }
}

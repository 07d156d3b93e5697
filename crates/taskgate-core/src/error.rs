//! Shared error type across taskgate crates.
//!
//! The policy engine itself never returns these: a denial is a `false`
//! verdict, not an error. They exist for the boundaries around it
//! (tag parsing, config, identity, storage, HTTP).

use thiserror::Error;

/// Client-facing error codes (stable API).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClientCode {
    /// Invalid input / malformed request.
    BadRequest,
    /// No subject could be resolved.
    AuthFailed,
    /// Denied by policy.
    NotAllowed,
    /// Target resource does not exist.
    NotFound,
    /// Target changed between the policy check and the write.
    Conflict,
    /// Unsupported config version.
    UnsupportedVersion,
    /// Internal server error.
    Internal,
}

impl ClientCode {
    /// String representation used in JSON responses.
    pub fn as_str(self) -> &'static str {
        match self {
            ClientCode::BadRequest => "BAD_REQUEST",
            ClientCode::AuthFailed => "AUTH_FAILED",
            ClientCode::NotAllowed => "NOT_ALLOWED",
            ClientCode::NotFound => "NOT_FOUND",
            ClientCode::Conflict => "CONFLICT",
            ClientCode::UnsupportedVersion => "UNSUPPORTED_VERSION",
            ClientCode::Internal => "INTERNAL",
        }
    }
}

/// Shared result type.
pub type Result<T> = std::result::Result<T, TaskGateError>;

/// Unified error type used by core and gateway.
#[derive(Debug, Error)]
pub enum TaskGateError {
    #[error("bad request: {0}")]
    BadRequest(String),
    #[error("unauthenticated")]
    Unauthenticated,
    #[error("not allowed: {0}")]
    NotAllowed(String),
    #[error("not found: {0}")]
    NotFound(String),
    #[error("conflict: {0}")]
    Conflict(String),
    #[error("unknown {kind} tag: {tag}")]
    UnknownTag { kind: &'static str, tag: String },
    #[error("unsupported config version")]
    UnsupportedVersion,
    #[error("internal: {0}")]
    Internal(String),
}

impl TaskGateError {
    /// Map internal error to a stable client-facing code.
    pub fn client_code(&self) -> ClientCode {
        match self {
            TaskGateError::BadRequest(_) | TaskGateError::UnknownTag { .. } => {
                ClientCode::BadRequest
            }
            TaskGateError::Unauthenticated => ClientCode::AuthFailed,
            TaskGateError::NotAllowed(_) => ClientCode::NotAllowed,
            TaskGateError::NotFound(_) => ClientCode::NotFound,
            TaskGateError::Conflict(_) => ClientCode::Conflict,
            TaskGateError::UnsupportedVersion => ClientCode::UnsupportedVersion,
            TaskGateError::Internal(_) => ClientCode::Internal,
        }
    }
}

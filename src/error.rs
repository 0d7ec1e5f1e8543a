//! Request error taxonomy
//!
//! Every handler failure is one of these kinds; the router maps the kind to an
//! HTTP status and a `{"detail": ...}` body.

use hyper::StatusCode;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ServiceError {
    /// Bad operation name, division by zero
    #[error("{0}")]
    InvalidInput(String),

    /// Traversal token, missing path, path outside the configured root
    #[error("{0}")]
    Forbidden(String),

    /// Request body or parameters do not match the expected schema
    #[error("{0}")]
    Unprocessable(String),

    #[error("Request body too large (max: {limit} bytes)")]
    PayloadTooLarge { limit: u64 },

    /// Environment failures: unreadable file, unavailable working directory
    #[error("{0}")]
    Internal(String),
}

impl ServiceError {
    pub const fn status(&self) -> StatusCode {
        match self {
            Self::InvalidInput(_) => StatusCode::BAD_REQUEST,
            Self::Forbidden(_) => StatusCode::FORBIDDEN,
            Self::Unprocessable(_) => StatusCode::UNPROCESSABLE_ENTITY,
            Self::PayloadTooLarge { .. } => StatusCode::PAYLOAD_TOO_LARGE,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<std::io::Error> for ServiceError {
    fn from(err: std::io::Error) -> Self {
        Self::Internal(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, ServiceError>;

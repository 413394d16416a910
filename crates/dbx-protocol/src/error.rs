//! Error payloads returned by the jobs API.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Error codes carried in API error bodies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    /// A request field failed validation.
    InvalidParameterValue,
    /// The request body could not be parsed.
    MalformedRequest,
    /// The referenced run or job does not exist.
    ResourceDoesNotExist,
    /// The operation is not valid in the resource's current state.
    InvalidState,
    /// The caller may not perform the operation.
    PermissionDenied,
    /// Missing or invalid credentials.
    Unauthenticated,
    /// Too many requests; retry later.
    RequestLimitExceeded,
    /// The service is temporarily unavailable; retry later.
    TemporarilyUnavailable,
    /// Unexpected server-side failure.
    InternalError,
    /// Any code this client does not know about.
    #[serde(other)]
    Unknown,
}

impl ErrorCode {
    /// Codes that describe a condition expected to clear on retry.
    pub fn is_transient(&self) -> bool {
        matches!(
            self,
            Self::RequestLimitExceeded | Self::TemporarilyUnavailable | Self::InternalError
        )
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidParameterValue => write!(f, "INVALID_PARAMETER_VALUE"),
            Self::MalformedRequest => write!(f, "MALFORMED_REQUEST"),
            Self::ResourceDoesNotExist => write!(f, "RESOURCE_DOES_NOT_EXIST"),
            Self::InvalidState => write!(f, "INVALID_STATE"),
            Self::PermissionDenied => write!(f, "PERMISSION_DENIED"),
            Self::Unauthenticated => write!(f, "UNAUTHENTICATED"),
            Self::RequestLimitExceeded => write!(f, "REQUEST_LIMIT_EXCEEDED"),
            Self::TemporarilyUnavailable => write!(f, "TEMPORARILY_UNAVAILABLE"),
            Self::InternalError => write!(f, "INTERNAL_ERROR"),
            Self::Unknown => write!(f, "UNKNOWN"),
        }
    }
}

/// API error body.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiError {
    /// Error code from the registry.
    pub error_code: ErrorCode,
    /// Human-readable, single-line error message.
    #[serde(default)]
    pub message: String,
}

impl ApiError {
    pub fn new(error_code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            error_code,
            message: message.into(),
        }
    }

    /// Create an INVALID_PARAMETER_VALUE error.
    pub fn invalid_parameter_value(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::InvalidParameterValue, message)
    }

    /// Create a MALFORMED_REQUEST error.
    pub fn malformed_request(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::MalformedRequest, message)
    }

    /// Create a RESOURCE_DOES_NOT_EXIST error for a run.
    pub fn run_not_found(run_id: &str) -> Self {
        Self::new(
            ErrorCode::ResourceDoesNotExist,
            format!("Run {} does not exist.", run_id),
        )
    }

    /// Create a TEMPORARILY_UNAVAILABLE error.
    pub fn temporarily_unavailable() -> Self {
        Self::new(
            ErrorCode::TemporarilyUnavailable,
            "The service is temporarily unavailable",
        )
    }

    /// Create a REQUEST_LIMIT_EXCEEDED error.
    pub fn request_limit_exceeded() -> Self {
        Self::new(ErrorCode::RequestLimitExceeded, "Too many requests")
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.error_code, self.message)
    }
}

impl std::error::Error for ApiError {}

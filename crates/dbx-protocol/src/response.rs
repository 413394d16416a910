//! API response types.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::error::ApiError;

/// HTTP status and JSON body of a completed call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiResponse {
    pub status: u16,
    #[serde(default)]
    pub body: serde_json::Value,
}

/// A successful response whose body does not have the expected shape.
#[derive(Debug, thiserror::Error)]
#[error("unexpected response body: {0}")]
pub struct ResponseError(#[from] serde_json::Error);

impl ApiResponse {
    /// Create a 200 response.
    pub fn ok(body: serde_json::Value) -> Self {
        Self { status: 200, body }
    }

    /// Create an error response with an API error body.
    pub fn error(status: u16, error: &ApiError) -> Self {
        Self {
            status,
            body: serde_json::to_value(error).unwrap_or_default(),
        }
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    pub fn is_server_error(&self) -> bool {
        self.status >= 500
    }

    pub fn is_rate_limited(&self) -> bool {
        self.status == 429
    }

    /// The API error body, if the response carries one.
    pub fn api_error(&self) -> Option<ApiError> {
        serde_json::from_value(self.body.clone()).ok()
    }

    /// Deserialize the body of a successful response.
    pub fn parse<T: DeserializeOwned>(&self) -> Result<T, ResponseError> {
        Ok(serde_json::from_value(self.body.clone())?)
    }
}

//! Failure Injection for the Mock Jobs Service
//!
//! Supports configurable failure injection for testing error paths.

use std::collections::HashMap;

use dbx_protocol::{ApiError, Endpoint};

/// Failure configuration for an endpoint
#[derive(Debug, Clone)]
pub struct FailureConfig {
    /// HTTP status to answer with
    pub status: u16,
    /// Error body to answer with
    pub error: ApiError,
    /// Fail at the transport level instead of answering
    pub drop_connection: bool,
    /// Number of times to fail before succeeding (None = always fail)
    pub fail_count: Option<u32>,
}

impl FailureConfig {
    /// Answer with an error status and body
    pub fn error(status: u16, error: ApiError) -> Self {
        Self {
            status,
            error,
            drop_connection: false,
            fail_count: None,
        }
    }

    /// HTTP 503 TEMPORARILY_UNAVAILABLE
    pub fn unavailable() -> Self {
        Self::error(503, ApiError::temporarily_unavailable())
    }

    /// HTTP 429 REQUEST_LIMIT_EXCEEDED
    pub fn rate_limited() -> Self {
        Self::error(429, ApiError::request_limit_exceeded())
    }

    /// Drop the connection before any response
    pub fn connection_reset() -> Self {
        Self {
            drop_connection: true,
            ..Self::unavailable()
        }
    }

    /// Set the number of times to fail before succeeding
    pub fn with_fail_count(mut self, count: u32) -> Self {
        self.fail_count = Some(count);
        self
    }
}

/// Failure injector for the mock service
#[derive(Debug, Default)]
pub struct FailureInjector {
    configs: HashMap<Endpoint, FailureConfig>,
    /// Call counts per endpoint (for fail_count tracking)
    call_counts: HashMap<Endpoint, u32>,
}

impl FailureInjector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inject a failure for an endpoint, resetting its call count
    pub fn inject(&mut self, endpoint: Endpoint, config: FailureConfig) {
        self.configs.insert(endpoint, config);
        self.call_counts.insert(endpoint, 0);
    }

    pub fn clear(&mut self) {
        self.configs.clear();
        self.call_counts.clear();
    }

    pub fn clear_endpoint(&mut self, endpoint: Endpoint) {
        self.configs.remove(&endpoint);
        self.call_counts.remove(&endpoint);
    }

    /// The failure to apply to this call, if any
    pub fn check(&mut self, endpoint: Endpoint) -> Option<FailureConfig> {
        let config = self.configs.get(&endpoint)?;
        let count = self.call_counts.entry(endpoint).or_insert(0);
        *count += 1;

        match config.fail_count {
            Some(limit) if *count > limit => None,
            _ => Some(config.clone()),
        }
    }
}

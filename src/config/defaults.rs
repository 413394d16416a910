//! Built-in client defaults (layer 1)

use serde::{Deserialize, Serialize};

/// Built-in default configuration values
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BuiltinDefaults {
    /// Seconds between status polls (default: 30)
    pub polling_period_seconds: f64,

    /// Total attempts per API call (default: 3)
    pub retry_limit: i64,

    /// Seconds between attempts (default: 1.0)
    pub retry_delay_seconds: f64,

    /// HTTP request timeout in seconds (default: 60)
    pub request_timeout_seconds: f64,
}

impl Default for BuiltinDefaults {
    fn default() -> Self {
        Self {
            polling_period_seconds: 30.0,
            retry_limit: 3,
            retry_delay_seconds: 1.0,
            request_timeout_seconds: 60.0,
        }
    }
}

impl BuiltinDefaults {
    /// Convert to JSON Value for merging
    pub fn to_value(&self) -> serde_json::Value {
        serde_json::json!({
            "polling_period_seconds": self.polling_period_seconds,
            "retry_limit": self.retry_limit,
            "retry_delay_seconds": self.retry_delay_seconds,
            "request_timeout_seconds": self.request_timeout_seconds,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let defaults = BuiltinDefaults::default();
        assert_eq!(defaults.polling_period_seconds, 30.0);
        assert_eq!(defaults.retry_limit, 3);
        assert_eq!(defaults.retry_delay_seconds, 1.0);
    }

    #[test]
    fn test_to_value_has_no_connection() {
        let value = BuiltinDefaults::default().to_value();
        assert_eq!(value["retry_limit"], 3);
        assert!(value.get("connection").is_none());
    }
}

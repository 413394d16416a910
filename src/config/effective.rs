//! Effective client configuration
//!
//! Resolved from, in increasing precedence: built-in defaults, a TOML file,
//! the environment, and CLI flags.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fs;
use std::path::Path;
use std::time::Duration;

use super::connection::Connection;
use super::defaults::BuiltinDefaults;
use super::merge::merge_layers;
use crate::host::RetryPolicy;

/// Environment variable holding the workspace host.
pub const HOST_ENV: &str = "DATABRICKS_HOST";

/// Environment variable holding a personal access token.
pub const TOKEN_ENV: &str = "DATABRICKS_TOKEN";

/// Origin of a configuration layer
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ConfigOrigin {
    Builtin,
    File,
    Env,
    Cli,
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error reading {path}: {message}")]
    Io { path: String, message: String },

    #[error("Parse error in {path}: {message}")]
    Parse { path: String, message: String },

    #[error("Invalid {key}: {reason}")]
    Invalid { key: String, reason: String },

    #[error("Connection error: {0}")]
    Connection(String),
}

impl ConfigError {
    pub(crate) fn invalid(key: &str, reason: impl Into<String>) -> Self {
        ConfigError::Invalid {
            key: key.to_string(),
            reason: reason.into(),
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawConfig {
    #[serde(default)]
    connection: Option<Value>,
    polling_period_seconds: f64,
    retry_limit: i64,
    retry_delay_seconds: f64,
    request_timeout_seconds: f64,
}

/// Resolved configuration for a client session.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Absent until some layer supplies a host.
    pub connection: Option<Connection>,
    pub poll_interval: Duration,
    pub retry: RetryPolicy,
    pub request_timeout: Duration,
    /// Layers that contributed, in precedence order.
    pub sources: Vec<ConfigOrigin>,
}

impl ClientConfig {
    /// Resolve using the process environment.
    pub fn load(file: Option<&Path>, cli_overrides: Option<Value>) -> Result<Self, ConfigError> {
        let env = env_layer(|key| std::env::var(key).ok());
        Self::build(file, env, cli_overrides)
    }

    /// Resolve from explicit layers.
    pub fn build(
        file: Option<&Path>,
        env: Value,
        cli_overrides: Option<Value>,
    ) -> Result<Self, ConfigError> {
        let mut layers = vec![BuiltinDefaults::default().to_value()];
        let mut sources = vec![ConfigOrigin::Builtin];

        if let Some(path) = file {
            layers.push(load_toml_file(path)?);
            sources.push(ConfigOrigin::File);
        }

        if env.as_object().is_some_and(|m| !m.is_empty()) {
            layers.push(env);
            sources.push(ConfigOrigin::Env);
        }

        if let Some(cli) = cli_overrides {
            layers.push(cli);
            sources.push(ConfigOrigin::Cli);
        }

        let mut config = Self::from_value(merge_layers(layers))?;
        config.sources = sources;
        Ok(config)
    }

    /// Validate an already-merged configuration object.
    pub fn from_value(merged: Value) -> Result<Self, ConfigError> {
        let raw: RawConfig = serde_json::from_value(merged)
            .map_err(|e| ConfigError::invalid("configuration", e.to_string()))?;

        let connection = match raw.connection {
            None | Some(Value::Null) => None,
            Some(secret) => Some(Connection::from_secret(&secret)?),
        };

        let retry_limit = u32::try_from(raw.retry_limit)
            .map_err(|_| ConfigError::invalid("retry_limit", "must be greater than or equal to 1"))?;

        Ok(Self {
            connection,
            poll_interval: seconds("polling_period_seconds", raw.polling_period_seconds)?,
            retry: RetryPolicy::new(
                retry_limit,
                seconds("retry_delay_seconds", raw.retry_delay_seconds)?,
            )?,
            request_timeout: seconds("request_timeout_seconds", raw.request_timeout_seconds)?,
            sources: Vec::new(),
        })
    }

    /// The connection, or an error naming how to supply one.
    pub fn require_connection(&self) -> Result<&Connection, ConfigError> {
        self.connection.as_ref().ok_or_else(|| {
            ConfigError::Connection(format!(
                "no workspace configured; set {} and {} or add a [connection] table",
                HOST_ENV, TOKEN_ENV
            ))
        })
    }
}

/// Build the environment layer from a variable lookup.
pub fn env_layer<F>(lookup: F) -> Value
where
    F: Fn(&str) -> Option<String>,
{
    let mut connection = Map::new();
    for (var, key) in [(HOST_ENV, "host"), (TOKEN_ENV, "token")] {
        if let Some(value) = lookup(var).filter(|v| !v.is_empty()) {
            connection.insert(key.to_string(), Value::String(value));
        }
    }
    if connection.is_empty() {
        Value::Object(Map::new())
    } else {
        serde_json::json!({ "connection": connection })
    }
}

fn seconds(key: &str, value: f64) -> Result<Duration, ConfigError> {
    if !value.is_finite() || value < 0.0 {
        return Err(ConfigError::invalid(key, "must be a non-negative number of seconds"));
    }
    Duration::try_from_secs_f64(value)
        .map_err(|_| ConfigError::invalid(key, "is too large to represent as a duration"))
}

fn load_toml_file(path: &Path) -> Result<Value, ConfigError> {
    let display = path.display().to_string();
    let contents = fs::read_to_string(path).map_err(|e| ConfigError::Io {
        path: display.clone(),
        message: e.to_string(),
    })?;
    let table: toml::Value = toml::from_str(&contents).map_err(|e| ConfigError::Parse {
        path: display.clone(),
        message: e.to_string(),
    })?;
    serde_json::to_value(table).map_err(|e| ConfigError::Parse {
        path: display,
        message: e.to_string(),
    })
}

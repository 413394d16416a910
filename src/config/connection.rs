//! Workspace connection details.

use std::fmt;

use serde_json::Value;

use super::effective::ConfigError;

/// How requests authenticate.
#[derive(Clone, PartialEq, Eq)]
pub enum Credentials {
    /// Personal access token, sent as a bearer token.
    Token(String),
    /// HTTP basic auth.
    Basic { login: String, password: String },
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Credentials::Token(_) => f.write_str("Token([REDACTED])"),
            Credentials::Basic { login, .. } => f
                .debug_struct("Basic")
                .field("login", login)
                .field("password", &"[REDACTED]")
                .finish(),
        }
    }
}

/// Host and credentials of a workspace.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Connection {
    host: String,
    credentials: Credentials,
}

impl Connection {
    pub fn new(host: &str, credentials: Credentials) -> Result<Self, ConfigError> {
        let host = normalize_host(host);
        if host.is_empty() {
            return Err(ConfigError::Connection("a host is required".to_string()));
        }
        Ok(Self { host, credentials })
    }

    /// Build from a credential mapping: `{"host", "token"}` or
    /// `{"host", "login", "password"}`. A token wins when both are present.
    pub fn from_secret(secret: &Value) -> Result<Self, ConfigError> {
        let map = secret.as_object().ok_or_else(|| {
            ConfigError::Connection("connection details must be a mapping".to_string())
        })?;
        let field = |key: &str| {
            map.get(key)
                .and_then(Value::as_str)
                .filter(|s| !s.is_empty())
                .map(str::to_string)
        };

        let host = field("host")
            .ok_or_else(|| ConfigError::Connection("a host is required".to_string()))?;
        let credentials = match (field("token"), field("login"), field("password")) {
            (Some(token), _, _) => Credentials::Token(token),
            (None, Some(login), Some(password)) => Credentials::Basic { login, password },
            _ => {
                return Err(ConfigError::Connection(
                    "either a token or a login and password are required".to_string(),
                ))
            }
        };
        Self::new(&host, credentials)
    }

    /// Bare host name, without scheme or path.
    pub fn host(&self) -> &str {
        &self.host
    }

    pub fn credentials(&self) -> &Credentials {
        &self.credentials
    }

    pub fn base_url(&self) -> String {
        format!("https://{}", self.host)
    }
}

/// Strip scheme, path and surrounding whitespace from a host.
pub fn normalize_host(host: &str) -> String {
    let trimmed = host.trim();
    let without_scheme = trimmed
        .strip_prefix("https://")
        .or_else(|| trimmed.strip_prefix("http://"))
        .unwrap_or(trimmed);
    without_scheme
        .split('/')
        .next()
        .unwrap_or_default()
        .to_string()
}

//! Client configuration
//!
//! Layers, in increasing precedence:
//! 1. Built-in defaults
//! 2. TOML config file
//! 3. Environment (`DATABRICKS_HOST`, `DATABRICKS_TOKEN`)
//! 4. CLI flags

mod connection;
mod defaults;
mod effective;
mod merge;

pub use connection::{normalize_host, Connection, Credentials};
pub use defaults::BuiltinDefaults;
pub use effective::{env_layer, ClientConfig, ConfigError, ConfigOrigin, HOST_ENV, TOKEN_ENV};
pub use merge::{deep_merge, merge_layers};

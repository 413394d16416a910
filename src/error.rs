//! Error taxonomy for submission and monitoring.
//!
//! Every failure a caller can see is one of [`JobError`]'s variants; the CLI
//! maps them onto process exit codes through [`FailureKind`].

use dbx_protocol::{Endpoint, ErrorCode, RunId, RunState};
use dbx_schema::{CoerceError, DecodeError};

use crate::config::ConfigError;

/// Errors surfaced by the jobs client.
#[derive(Debug, thiserror::Error)]
pub enum JobError {
    /// A payload leaf could not be coerced to its wire form.
    #[error("Invalid payload: {0}")]
    InputShape(#[from] CoerceError),

    /// A loose configuration value matched none of its schema's shapes.
    #[error("Schema mismatch: {0}")]
    SchemaMismatch(#[from] DecodeError),

    /// Missing connection info, empty task list and similar caller mistakes.
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Retries were exhausted against a transient backend failure.
    #[error("{endpoint} failed after {attempts} attempt(s): {last_error}")]
    TransientBackend {
        endpoint: Endpoint,
        attempts: u32,
        last_error: String,
    },

    /// The service refused the request outright.
    #[error("{endpoint} rejected with HTTP {status}: {message}")]
    ApiRejected {
        endpoint: Endpoint,
        status: u16,
        error_code: Option<ErrorCode>,
        message: String,
    },

    /// The remote run reached a terminal state other than success.
    #[error("{job_name} failed with terminal state: {state}")]
    RemoteJobFailed {
        job_name: String,
        run_id: RunId,
        state: RunState,
    },

    /// The service answered with something this client cannot interpret.
    #[error("Protocol error: {0}")]
    Protocol(String),

    /// Monitoring stopped because cancellation was requested.
    #[error("Monitoring of run {run_id} was cancelled")]
    Cancelled { run_id: RunId },

    /// Cancellation arrived while a call was waiting to be retried.
    #[error("{endpoint} was cancelled after {attempts} attempt(s)")]
    RetryCancelled { endpoint: Endpoint, attempts: u32 },
}

/// Failure kind for exit code mapping
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    /// Payload or schema problems (exit code 10)
    Input = 10,
    /// Caller configuration problems (exit code 11)
    Configuration = 11,
    /// Backend unreachable or unintelligible (exit code 20)
    Backend = 20,
    /// Request rejected by the service (exit code 30)
    Rejected = 30,
    /// Remote run finished unsuccessfully (exit code 40)
    RemoteJob = 40,
    /// Interrupted while monitoring (exit code 80)
    Cancelled = 80,
}

impl JobError {
    /// Map error to failure kind for exit code
    pub fn failure_kind(&self) -> FailureKind {
        match self {
            JobError::InputShape(_) | JobError::SchemaMismatch(_) => FailureKind::Input,
            JobError::Configuration(_) => FailureKind::Configuration,
            JobError::TransientBackend { .. } | JobError::Protocol(_) => FailureKind::Backend,
            JobError::ApiRejected { .. } => FailureKind::Rejected,
            JobError::RemoteJobFailed { .. } => FailureKind::RemoteJob,
            JobError::Cancelled { .. } | JobError::RetryCancelled { .. } => FailureKind::Cancelled,
        }
    }

    /// Get exit code for this error
    pub fn exit_code(&self) -> i32 {
        self.failure_kind() as i32
    }

    pub(crate) fn configuration(message: impl Into<String>) -> Self {
        JobError::Configuration(message.into())
    }
}

impl From<ConfigError> for JobError {
    fn from(err: ConfigError) -> Self {
        JobError::Configuration(err.to_string())
    }
}

/// Result type for client operations
pub type JobResult<T> = Result<T, JobError>;

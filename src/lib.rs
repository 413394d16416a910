//! dbx-jobs - submit and monitor remote jobs
//!
//! This crate submits runs to a Databricks-style jobs API, follows them to a
//! terminal state, and decodes loosely-typed job configuration into typed
//! models through [`dbx_schema`].

pub mod cancel;
pub mod config;
pub mod error;
pub mod host;
pub mod mock;
pub mod models;
pub mod monitor;
pub mod payload;
pub mod tasks;

pub use cancel::{install_interrupt_handler, CancelToken, WaitOutcome};
pub use config::{ClientConfig, ConfigError, Connection, Credentials};
pub use error::{FailureKind, JobError, JobResult};
pub use host::{HttpTransport, JobsClient, MockTransport, RetryPolicy, Transport, TransportError};
pub use mock::{FailureConfig, MockJobsService};
pub use monitor::{LifecycleMonitor, RunObservation, RunOutcome, RunStatusSource};
pub use tasks::{InvocationContext, RunNow, SubmitMultitaskRun, SubmitRun, DEFAULT_RUN_NAME};

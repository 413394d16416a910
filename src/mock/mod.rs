//! Mock Jobs Service
//!
//! In-process stand-in for the remote jobs API, used through
//! [`MockTransport`](crate::host::MockTransport) by unit and integration tests.
//!
//! # Endpoints
//!
//! - `runs/submit` (single and multi-task): create a run; multi-task
//!   submissions are deduplicated by idempotency token
//! - `run-now`: create a run of an existing job
//! - `runs/get`: report state, advancing one scripted step per query
//!
//! Submission bodies whose leaves are not strings or null are rejected, so
//! tests also check that payloads were coerced before they were sent.

mod failure;
mod service;
mod state;

pub use failure::{FailureConfig, FailureInjector};
pub use service::{MockJobsService, MOCK_HOST};
pub use state::{default_progression, MockRun, MockState, FIRST_RUN_ID};

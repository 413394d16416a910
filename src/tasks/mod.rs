//! Submission tasks
//!
//! Each task builds a payload from a raw mapping plus named overrides,
//! coerces it for the wire, submits it, and monitors the run until it
//! reaches a terminal state:
//! - [`SubmitRun`]: one-time single-task run
//! - [`RunNow`]: trigger an existing job
//! - [`SubmitMultitaskRun`]: one-time run of several dependent tasks

mod multitask;
mod run_now;
mod submit_run;

pub use multitask::SubmitMultitaskRun;
pub use run_now::RunNow;
pub use submit_run::SubmitRun;

use std::collections::BTreeMap;

use dbx_protocol::RunId;
use dbx_schema::{Value, WireTree};
use tracing::info;
use uuid::Uuid;

use crate::error::{JobError, JobResult};
use crate::host::JobsClient;
use crate::monitor::LifecycleMonitor;

/// Run name used when neither the payload nor the caller names the run.
pub const DEFAULT_RUN_NAME: &str = "Run Submitted by Prefect";

/// Identity of the invocation driving a submission.
///
/// `invocation_id` stays the same across retries of one logical invocation,
/// which is what makes it usable as an idempotency token.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InvocationContext {
    pub invocation_id: Option<String>,
    pub flow_run_name: Option<String>,
}

impl InvocationContext {
    /// Fresh context with a random invocation id.
    pub fn generate() -> Self {
        Self {
            invocation_id: Some(Uuid::new_v4().to_string()),
            flow_run_name: None,
        }
    }

    pub fn with_invocation_id(mut self, id: impl Into<String>) -> Self {
        self.invocation_id = Some(id.into());
        self
    }

    pub fn with_flow_run_name(mut self, name: impl Into<String>) -> Self {
        self.flow_run_name = Some(name.into());
        self
    }
}

/// Submit `payload` and follow the run to completion.
pub(crate) fn execute<F>(
    client: &JobsClient,
    monitor: &LifecycleMonitor,
    job_name: &str,
    payload: &WireTree,
    submit: F,
) -> JobResult<RunId>
where
    F: FnOnce(&JobsClient, &WireTree) -> JobResult<RunId>,
{
    let run_id = submit(client, payload)?;
    info!(job = job_name, %run_id, "Run submitted with run_id: {}", run_id);
    let run_page_url = client.get_run_page_url(&run_id);
    info!("Run submitted with config : {}", payload.to_json());
    info!("View run status, Spark UI, and logs at {}", run_page_url);

    let outcome = monitor.watch(client, job_name, &run_id)?;
    info!("View run status, Spark UI, and logs at {}", outcome.run_page_url);
    Ok(outcome.run_id)
}

/// Top-level mapping of a raw payload; an absent payload is empty.
pub(crate) fn raw_mapping(raw: Option<&Value>) -> JobResult<BTreeMap<String, Value>> {
    match raw {
        None | Some(Value::Null) => Ok(BTreeMap::new()),
        Some(Value::Mapping(map)) => Ok(map.clone()),
        Some(other) => Err(JobError::configuration(format!(
            "payload must be a mapping, found {}",
            other.kind()
        ))),
    }
}

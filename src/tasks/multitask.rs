//! One-time multi-task run.

use dbx_protocol::RunId;
use dbx_schema::{coerce_json, decode_into, Value, WireTree};

use super::{execute, InvocationContext, DEFAULT_RUN_NAME};
use crate::error::{JobError, JobResult};
use crate::host::JobsClient;
use crate::models::{AccessControlRequest, JobTaskSettings, MultitaskSubmission};
use crate::monitor::LifecycleMonitor;

/// Submit several dependent tasks as one run.
#[derive(Debug, Clone)]
pub struct SubmitMultitaskRun {
    pub name: String,
    pub tasks: Vec<JobTaskSettings>,
    pub run_name: Option<String>,
    pub timeout_seconds: Option<i64>,
    /// Defaults to the invocation id, so retries of one invocation
    /// never create a second remote run.
    pub idempotency_token: Option<String>,
    pub access_control_list: Option<Vec<AccessControlRequest>>,
}

impl Default for SubmitMultitaskRun {
    fn default() -> Self {
        Self {
            name: "SubmitMultitaskRun".to_string(),
            tasks: Vec::new(),
            run_name: None,
            timeout_seconds: None,
            idempotency_token: None,
            access_control_list: None,
        }
    }
}

impl SubmitMultitaskRun {
    pub fn new(tasks: Vec<JobTaskSettings>) -> Self {
        Self {
            tasks,
            ..Default::default()
        }
    }

    /// Build from a loose submission body, decoding `tasks` and
    /// `access_control_list` into their typed models.
    pub fn from_value(value: &Value) -> JobResult<Self> {
        let submission: MultitaskSubmission = decode_into(value)?;
        Ok(Self {
            tasks: submission.tasks,
            run_name: submission.run_name,
            timeout_seconds: submission.timeout_seconds,
            idempotency_token: submission.idempotency_token,
            access_control_list: submission.access_control_list,
            ..Default::default()
        })
    }

    /// Resolve defaults against `ctx` and build the typed body.
    pub fn submission(&self, ctx: &InvocationContext) -> JobResult<MultitaskSubmission> {
        if self.tasks.is_empty() {
            return Err(JobError::configuration(
                "Please supply at least one Databricks task to be run.",
            ));
        }

        let idempotency_token = self
            .idempotency_token
            .clone()
            .or_else(|| ctx.invocation_id.clone())
            .ok_or_else(|| {
                JobError::configuration(
                    "an idempotency token is required when the invocation has no id",
                )
            })?;

        let run_name = self.run_name.clone().unwrap_or_else(|| match &ctx.flow_run_name {
            Some(flow_run_name) => format!("Job run created by Prefect flow run {}", flow_run_name),
            None => DEFAULT_RUN_NAME.to_string(),
        });

        Ok(MultitaskSubmission {
            tasks: self.tasks.clone(),
            run_name: Some(run_name),
            timeout_seconds: self.timeout_seconds,
            idempotency_token: Some(idempotency_token),
            access_control_list: Some(self.access_control_list.clone().unwrap_or_default()),
        })
    }

    /// Coerced request body.
    pub fn payload(&self, ctx: &InvocationContext) -> JobResult<WireTree> {
        let submission = self.submission(ctx)?;
        let body = serde_json::to_value(&submission)
            .map_err(|e| JobError::Protocol(format!("cannot serialize submission: {}", e)))?;
        Ok(coerce_json(&body))
    }

    /// Submit and monitor to completion.
    pub fn run(
        &self,
        client: &JobsClient,
        monitor: &LifecycleMonitor,
        ctx: &InvocationContext,
    ) -> JobResult<RunId> {
        let payload = self.payload(ctx)?;
        execute(client, monitor, &self.name, &payload, JobsClient::submit_multitask_run)
    }
}

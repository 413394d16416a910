//! One-time single-task run.

use dbx_protocol::RunId;
use dbx_schema::{coerce_root, Value, WireTree};

use super::{execute, raw_mapping, DEFAULT_RUN_NAME};
use crate::error::JobResult;
use crate::host::JobsClient;
use crate::monitor::LifecycleMonitor;

/// Submit a run described by a raw payload plus named overrides.
///
/// A named override replaces the payload's key of the same name wholesale.
#[derive(Debug, Clone)]
pub struct SubmitRun {
    /// Used in log lines and failure messages.
    pub name: String,
    pub json: Option<Value>,
    pub spark_jar_task: Option<Value>,
    pub notebook_task: Option<Value>,
    pub new_cluster: Option<Value>,
    pub existing_cluster_id: Option<String>,
    pub libraries: Option<Value>,
    pub run_name: Option<String>,
    pub timeout_seconds: Option<i64>,
}

impl Default for SubmitRun {
    fn default() -> Self {
        Self {
            name: "SubmitRun".to_string(),
            json: None,
            spark_jar_task: None,
            notebook_task: None,
            new_cluster: None,
            existing_cluster_id: None,
            libraries: None,
            run_name: None,
            timeout_seconds: None,
        }
    }
}

impl SubmitRun {
    pub fn new(json: Value) -> Self {
        Self {
            json: Some(json),
            ..Default::default()
        }
    }

    /// Merged and coerced request body.
    pub fn payload(&self) -> JobResult<WireTree> {
        let mut body = raw_mapping(self.json.as_ref())?;

        let overrides = [
            ("spark_jar_task", self.spark_jar_task.clone()),
            ("notebook_task", self.notebook_task.clone()),
            ("new_cluster", self.new_cluster.clone()),
            ("existing_cluster_id", self.existing_cluster_id.clone().map(Value::from)),
            ("libraries", self.libraries.clone()),
            ("run_name", self.run_name.clone().map(Value::from)),
            ("timeout_seconds", self.timeout_seconds.map(Value::from)),
        ];
        for (key, value) in overrides {
            if let Some(value) = value {
                body.insert(key.to_string(), value);
            }
        }
        body.entry("run_name".to_string())
            .or_insert_with(|| Value::from(DEFAULT_RUN_NAME));

        Ok(coerce_root(&Value::Mapping(body))?)
    }

    /// Submit and monitor to completion.
    pub fn run(&self, client: &JobsClient, monitor: &LifecycleMonitor) -> JobResult<RunId> {
        let payload = self.payload()?;
        execute(client, monitor, &self.name, &payload, JobsClient::submit_run)
    }
}

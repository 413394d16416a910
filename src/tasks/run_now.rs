//! Trigger an existing job.

use std::collections::BTreeMap;

use dbx_protocol::RunId;
use dbx_schema::{coerce_root, Value, WireTree};

use super::{execute, raw_mapping};
use crate::error::{JobError, JobResult};
use crate::host::JobsClient;
use crate::monitor::LifecycleMonitor;

/// Run an existing job now.
///
/// Named overrides replace payload keys wholesale, except `notebook_params`,
/// which merges into the payload's mapping key by key.
#[derive(Debug, Clone)]
pub struct RunNow {
    pub name: String,
    pub json: Option<Value>,
    pub job_id: Option<i64>,
    pub notebook_params: Option<BTreeMap<String, Value>>,
    pub python_params: Option<Vec<String>>,
    pub spark_submit_params: Option<Vec<String>>,
    pub jar_params: Option<Vec<String>>,
}

impl Default for RunNow {
    fn default() -> Self {
        Self {
            name: "RunNow".to_string(),
            json: None,
            job_id: None,
            notebook_params: None,
            python_params: None,
            spark_submit_params: None,
            jar_params: None,
        }
    }
}

impl RunNow {
    pub fn new(job_id: i64) -> Self {
        Self {
            job_id: Some(job_id),
            ..Default::default()
        }
    }

    /// Merged and coerced request body.
    pub fn payload(&self) -> JobResult<WireTree> {
        let mut body = raw_mapping(self.json.as_ref())?;

        if let Some(job_id) = self.job_id {
            body.insert("job_id".to_string(), Value::from(job_id));
        }
        if body.get("job_id").map_or(true, Value::is_null) {
            return Err(JobError::configuration("run-now requires a job_id"));
        }

        if let Some(params) = &self.notebook_params {
            let mut merged = match body.remove("notebook_params") {
                None | Some(Value::Null) => BTreeMap::new(),
                Some(Value::Mapping(existing)) => existing,
                Some(other) => {
                    return Err(JobError::configuration(format!(
                        "notebook_params must be a mapping, found {}",
                        other.kind()
                    )))
                }
            };
            merged.extend(params.iter().map(|(k, v)| (k.clone(), v.clone())));
            body.insert("notebook_params".to_string(), Value::Mapping(merged));
        }

        let lists = [
            ("python_params", &self.python_params),
            ("spark_submit_params", &self.spark_submit_params),
            ("jar_params", &self.jar_params),
        ];
        for (key, params) in lists {
            if let Some(params) = params {
                let items = params.iter().map(|p| Value::from(p.as_str())).collect();
                body.insert(key.to_string(), Value::Sequence(items));
            }
        }

        Ok(coerce_root(&Value::Mapping(body))?)
    }

    /// Trigger and monitor to completion.
    pub fn run(&self, client: &JobsClient, monitor: &LifecycleMonitor) -> JobResult<RunId> {
        let payload = self.payload()?;
        execute(client, monitor, &self.name, &payload, JobsClient::run_now)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_notebook_params_merge_per_key() {
        let task = RunNow {
            json: Some(Value::from(json!({"notebook_params": {"a": "1", "b": "old"}}))),
            notebook_params: Some(BTreeMap::from([
                ("b".to_string(), Value::from("2")),
                ("c".to_string(), Value::from(3_i64)),
            ])),
            ..RunNow::new(42)
        };
        let payload = task.payload().unwrap().to_json();
        assert_eq!(payload["notebook_params"], json!({"a": "1", "b": "2", "c": "3"}));
        assert_eq!(payload["job_id"], json!("42"));
    }

    #[test]
    fn test_other_params_replace() {
        let task = RunNow {
            json: Some(Value::from(json!({"job_id": 7, "jar_params": ["x", "y"]}))),
            jar_params: Some(vec!["z".to_string()]),
            ..Default::default()
        };
        let payload = task.payload().unwrap().to_json();
        assert_eq!(payload["jar_params"], json!(["z"]));
        assert_eq!(payload["job_id"], json!("7"));
    }

    #[test]
    fn test_job_id_required() {
        let err = RunNow::default().payload().unwrap_err();
        assert!(matches!(err, JobError::Configuration(_)));
    }

    #[test]
    fn test_notebook_params_must_be_mapping() {
        let task = RunNow {
            json: Some(Value::from(json!({"notebook_params": ["a"]}))),
            notebook_params: Some(BTreeMap::new()),
            ..RunNow::new(1)
        };
        assert!(matches!(task.payload().unwrap_err(), JobError::Configuration(_)));
    }
}

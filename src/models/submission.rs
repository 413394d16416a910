//! Body of a multi-task run submission.

use dbx_schema::{Describe, Schema};
use serde::{Deserialize, Serialize};

use super::access::AccessControlRequest;
use super::task::JobTaskSettings;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MultitaskSubmission {
    pub tasks: Vec<JobTaskSettings>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub run_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timeout_seconds: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub idempotency_token: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub access_control_list: Option<Vec<AccessControlRequest>>,
}

impl Describe for MultitaskSubmission {
    fn schema() -> Schema {
        Schema::record("MultitaskSubmission")
            .required("tasks", Vec::<JobTaskSettings>::schema())
            .optional("run_name", Schema::string())
            .optional("timeout_seconds", Schema::integer())
            .optional("idempotency_token", Schema::string())
            .optional("access_control_list", Vec::<AccessControlRequest>::schema())
            .build()
    }
}

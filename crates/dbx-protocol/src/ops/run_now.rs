//! Run-now types.

use serde::{Deserialize, Serialize};

use super::RunId;

/// Response of `run-now`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunNowResponse {
    /// The globally unique id of the newly triggered run.
    pub run_id: RunId,
    /// Sequence number of this run among all runs of the job.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub number_in_job: Option<i64>,
}

//! Run submission types.
//!
//! Both single-task and multi-task submissions answer with the new run's id.

use serde::{Deserialize, Serialize};

use super::RunId;

/// Response of `runs/submit`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubmitRunResponse {
    /// The canonical identifier of the newly submitted run.
    pub run_id: RunId,
}

//! Run status types.
//!
//! Query run state and the human-viewable run page.

use serde::{Deserialize, Serialize};

use super::RunId;
use crate::state::RunState;

/// Response of `runs/get`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GetRunResponse {
    pub run_id: RunId,
    /// Job the run belongs to, for run-now runs.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub job_id: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub run_name: Option<String>,
    /// Current state of the run.
    pub state: RunState,
    /// URL of the run's detail page.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub run_page_url: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::RunLifeCycleState;
    use serde_json::json;

    #[test]
    fn test_parse_get_run() {
        let response: GetRunResponse = serde_json::from_value(json!({
            "run_id": 42,
            "run_name": "nightly",
            "state": {"life_cycle_state": "PENDING", "state_message": "Waiting for cluster"},
            "run_page_url": "https://example.cloud/#job/runs/42"
        }))
        .unwrap();
        assert_eq!(response.run_id.as_str(), "42");
        assert_eq!(response.state.life_cycle_state, RunLifeCycleState::Pending);
        assert!(response.job_id.is_none());
    }
}

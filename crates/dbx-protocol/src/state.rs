//! Run state model
//!
//! Life-cycle states: QUEUED/PENDING → RUNNING → TERMINATING → TERMINATED,
//! with SKIPPED and INTERNAL_ERROR as the other terminal exits. A terminal
//! run is successful only when its result state is SUCCESS.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Check if a state is terminal (no further transitions possible)
pub trait TerminalState {
    fn is_terminal(&self) -> bool;
}

/// Remote life-cycle state of a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RunLifeCycleState {
    /// Waiting in the service's run queue.
    Queued,
    /// Resources are being acquired.
    Pending,
    /// Actively executing.
    Running,
    /// Finished executing, cleaning up.
    Terminating,
    /// Finished; see the result state.
    Terminated,
    /// Not run (e.g. a previous run of the job was still active).
    Skipped,
    /// Failed inside the service itself.
    InternalError,
    /// Blocked on an upstream dependency.
    Blocked,
    /// Waiting before an automatic retry.
    WaitingForRetry,
}

impl TerminalState for RunLifeCycleState {
    fn is_terminal(&self) -> bool {
        matches!(
            self,
            Self::Terminated | Self::Skipped | Self::InternalError
        )
    }
}

impl fmt::Display for RunLifeCycleState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Queued => "QUEUED",
            Self::Pending => "PENDING",
            Self::Running => "RUNNING",
            Self::Terminating => "TERMINATING",
            Self::Terminated => "TERMINATED",
            Self::Skipped => "SKIPPED",
            Self::InternalError => "INTERNAL_ERROR",
            Self::Blocked => "BLOCKED",
            Self::WaitingForRetry => "WAITING_FOR_RETRY",
        };
        f.write_str(name)
    }
}

/// Outcome of a terminated run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RunResultState {
    Success,
    Failed,
    Timedout,
    Canceled,
    SuccessWithFailures,
    Excluded,
    MaximumConcurrentRunsReached,
    UpstreamFailed,
    UpstreamCanceled,
}

impl fmt::Display for RunResultState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Success => "SUCCESS",
            Self::Failed => "FAILED",
            Self::Timedout => "TIMEDOUT",
            Self::Canceled => "CANCELED",
            Self::SuccessWithFailures => "SUCCESS_WITH_FAILURES",
            Self::Excluded => "EXCLUDED",
            Self::MaximumConcurrentRunsReached => "MAXIMUM_CONCURRENT_RUNS_REACHED",
            Self::UpstreamFailed => "UPSTREAM_FAILED",
            Self::UpstreamCanceled => "UPSTREAM_CANCELED",
        };
        f.write_str(name)
    }
}

/// State of a run as reported by the service. Observed, never mutated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunState {
    pub life_cycle_state: RunLifeCycleState,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub result_state: Option<RunResultState>,
    #[serde(default)]
    pub state_message: String,
}

impl RunState {
    pub fn new(life_cycle_state: RunLifeCycleState) -> Self {
        Self {
            life_cycle_state,
            result_state: None,
            state_message: String::new(),
        }
    }

    /// A terminated run with the given result.
    pub fn terminated(result_state: RunResultState) -> Self {
        Self {
            life_cycle_state: RunLifeCycleState::Terminated,
            result_state: Some(result_state),
            state_message: String::new(),
        }
    }

    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.state_message = message.into();
        self
    }

    /// Terminal and finished with SUCCESS.
    pub fn is_successful(&self) -> bool {
        self.is_terminal() && self.result_state == Some(RunResultState::Success)
    }
}

impl TerminalState for RunState {
    fn is_terminal(&self) -> bool {
        self.life_cycle_state.is_terminal()
    }
}

impl fmt::Display for RunState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.life_cycle_state)?;
        if let Some(result) = self.result_state {
            write!(f, "/{}", result)?;
        }
        if !self.state_message.is_empty() {
            write!(f, ": {}", self.state_message)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_terminal_classification() {
        assert!(!RunState::new(RunLifeCycleState::Pending).is_terminal());
        assert!(!RunState::new(RunLifeCycleState::Terminating).is_terminal());
        assert!(RunState::new(RunLifeCycleState::Skipped).is_terminal());
        assert!(RunState::new(RunLifeCycleState::InternalError).is_terminal());

        assert!(RunState::terminated(RunResultState::Success).is_successful());
        assert!(!RunState::terminated(RunResultState::Failed).is_successful());
        assert!(!RunState::new(RunLifeCycleState::Skipped).is_successful());
    }

    #[test]
    fn test_deserialize_service_state() {
        let state: RunState = serde_json::from_value(json!({
            "life_cycle_state": "TERMINATED",
            "result_state": "FAILED",
            "state_message": "Notebook raised an exception"
        }))
        .unwrap();
        assert!(state.is_terminal());
        assert!(!state.is_successful());
        assert_eq!(state.to_string(), "TERMINATED/FAILED: Notebook raised an exception");
    }

    #[test]
    fn test_running_without_result() {
        let state: RunState = serde_json::from_value(json!({"life_cycle_state": "RUNNING"})).unwrap();
        assert_eq!(state.result_state, None);
        assert_eq!(state.to_string(), "RUNNING");
    }
}

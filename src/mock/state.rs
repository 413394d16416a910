//! Mock Service State Management
//!
//! Runs created by submissions, their scripted state progressions, and the
//! request log.

use std::collections::{BTreeMap, HashMap, VecDeque};

use chrono::{DateTime, Utc};
use dbx_protocol::{ApiRequest, Endpoint, RunId, RunLifeCycleState, RunResultState, RunState};

/// First run id handed out by a fresh service.
pub const FIRST_RUN_ID: i64 = 1001;

/// A run in the mock service
#[derive(Debug, Clone)]
pub struct MockRun {
    pub run_id: RunId,
    /// Endpoint that created the run
    pub endpoint: Endpoint,
    pub run_name: Option<String>,
    pub job_id: Option<i64>,
    /// Submitted request body
    pub payload: serde_json::Value,
    /// Current state
    pub state: RunState,
    /// States still to come, one per status query
    pub pending: VecDeque<RunState>,
    /// State history for debugging
    pub state_history: Vec<(RunState, DateTime<Utc>)>,
    pub status_queries: u32,
    pub submitted_at: DateTime<Utc>,
}

impl MockRun {
    /// Create a run that starts in the first state of `progression`
    /// (PENDING if it is empty).
    pub fn new(
        run_id: RunId,
        endpoint: Endpoint,
        payload: serde_json::Value,
        progression: Vec<RunState>,
    ) -> Self {
        let now = Utc::now();
        let mut pending: VecDeque<RunState> = progression.into();
        let state = pending
            .pop_front()
            .unwrap_or_else(|| RunState::new(RunLifeCycleState::Pending));
        let run_name = payload
            .get("run_name")
            .and_then(|v| v.as_str())
            .map(str::to_string);
        let job_id = payload
            .get("job_id")
            .and_then(|v| v.as_str())
            .and_then(|s| s.parse().ok());

        Self {
            run_id,
            endpoint,
            run_name,
            job_id,
            payload,
            state: state.clone(),
            pending,
            state_history: vec![(state, now)],
            status_queries: 0,
            submitted_at: now,
        }
    }

    /// Answer a status query. The first query sees the initial state; each
    /// later query advances one step, stopping at the last scripted state.
    pub fn observe(&mut self) -> RunState {
        if self.status_queries > 0 {
            if let Some(next) = self.pending.pop_front() {
                self.transition(next);
            }
        }
        self.status_queries += 1;
        self.state.clone()
    }

    fn transition(&mut self, state: RunState) {
        self.state = state.clone();
        self.state_history.push((state, Utc::now()));
    }
}

/// Progression used when a run has no scripted one.
pub fn default_progression() -> Vec<RunState> {
    vec![
        RunState::new(RunLifeCycleState::Pending),
        RunState::new(RunLifeCycleState::Running),
        RunState::terminated(RunResultState::Success),
    ]
}

/// Mutable state of the mock service
#[derive(Debug)]
pub struct MockState {
    pub runs: BTreeMap<RunId, MockRun>,
    pub next_run_id: i64,
    /// Idempotency token -> run it created
    pub idempotency_tokens: HashMap<String, RunId>,
    /// Every request received, in order
    pub requests: Vec<ApiRequest>,
    pub default_progression: Vec<RunState>,
    /// Progressions for upcoming runs, consumed one per created run
    pub scripted: VecDeque<Vec<RunState>>,
}

impl Default for MockState {
    fn default() -> Self {
        Self::new()
    }
}

impl MockState {
    pub fn new() -> Self {
        Self {
            runs: BTreeMap::new(),
            next_run_id: FIRST_RUN_ID,
            idempotency_tokens: HashMap::new(),
            requests: Vec::new(),
            default_progression: default_progression(),
            scripted: VecDeque::new(),
        }
    }

    /// Create a run from a submission body
    pub fn create_run(&mut self, endpoint: Endpoint, payload: serde_json::Value) -> RunId {
        let run_id = RunId::from(self.next_run_id);
        self.next_run_id += 1;

        let progression = self
            .scripted
            .pop_front()
            .unwrap_or_else(|| self.default_progression.clone());
        let run = MockRun::new(run_id.clone(), endpoint, payload, progression);
        self.runs.insert(run_id.clone(), run);
        run_id
    }

    /// Number of runs created for a job
    pub fn runs_of_job(&self, job_id: i64) -> usize {
        self.runs
            .values()
            .filter(|r| r.job_id == Some(job_id))
            .count()
    }
}

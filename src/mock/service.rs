//! Mock Jobs Service Implementation
//!
//! Answers the four jobs endpoints from in-memory state, the way the remote
//! service would, so the client can be exercised without a network.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use dbx_protocol::{
    ApiError, ApiRequest, ApiResponse, Endpoint, ErrorCode, GetRunResponse, RunId, RunState,
};
use dbx_schema::WireTree;
use serde_json::json;

use super::failure::{FailureConfig, FailureInjector};
use super::state::{MockRun, MockState};
use crate::host::TransportError;

/// Host the mock service reports in run page URLs.
pub const MOCK_HOST: &str = "mock.cloud.databricks.com";

/// Configurable in-process jobs service for testing
///
/// Clones share state, so a test can keep a handle after giving one to a
/// transport.
#[derive(Clone)]
pub struct MockJobsService {
    state: Arc<Mutex<MockState>>,
    failures: Arc<Mutex<FailureInjector>>,
}

impl Default for MockJobsService {
    fn default() -> Self {
        Self::new()
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

impl MockJobsService {
    pub fn new() -> Self {
        Self {
            state: Arc::new(Mutex::new(MockState::new())),
            failures: Arc::new(Mutex::new(FailureInjector::new())),
        }
    }

    // === Public API for test configuration ===

    /// Progression for runs without a scripted one
    pub fn set_default_progression(&self, states: Vec<RunState>) {
        lock(&self.state).default_progression = states;
    }

    /// Script the states the next created run walks through, one per status query
    pub fn script_next_run(&self, states: Vec<RunState>) {
        lock(&self.state).scripted.push_back(states);
    }

    pub fn inject_failure(&self, endpoint: Endpoint, config: FailureConfig) {
        lock(&self.failures).inject(endpoint, config);
    }

    pub fn clear_failures(&self) {
        lock(&self.failures).clear();
    }

    // === Inspection ===

    /// Every request received, in order
    pub fn requests(&self) -> Vec<ApiRequest> {
        lock(&self.state).requests.clone()
    }

    /// Number of requests received for an endpoint, failed ones included
    pub fn request_count(&self, endpoint: Endpoint) -> usize {
        lock(&self.state)
            .requests
            .iter()
            .filter(|r| r.endpoint == endpoint)
            .count()
    }

    /// Body of the most recent request to an endpoint
    pub fn last_body(&self, endpoint: Endpoint) -> Option<serde_json::Value> {
        lock(&self.state)
            .requests
            .iter()
            .rev()
            .find(|r| r.endpoint == endpoint)
            .and_then(|r| r.body.clone())
    }

    pub fn run(&self, run_id: &RunId) -> Option<MockRun> {
        lock(&self.state).runs.get(run_id).cloned()
    }

    pub fn run_count(&self) -> usize {
        lock(&self.state).runs.len()
    }

    // === Request handling ===

    /// Handle a request as the remote service would
    pub fn handle_request(&self, request: &ApiRequest) -> Result<ApiResponse, TransportError> {
        lock(&self.state).requests.push(request.clone());

        let failure = lock(&self.failures).check(request.endpoint);
        if let Some(failure) = failure {
            if failure.drop_connection {
                return Err(TransportError::ConnectionFailed(
                    "connection reset by peer".to_string(),
                ));
            }
            return Ok(ApiResponse::error(failure.status, &failure.error));
        }

        Ok(match request.endpoint {
            Endpoint::GetRun => self.handle_get_run(request),
            endpoint => self.handle_submission(endpoint, request.body.as_ref()),
        })
    }

    fn handle_submission(&self, endpoint: Endpoint, body: Option<&serde_json::Value>) -> ApiResponse {
        let Some(body) = body.filter(|b| b.is_object()) else {
            return bad_request(ApiError::malformed_request(
                "Request body must be a JSON object",
            ));
        };
        if serde_json::from_value::<WireTree>(body.clone()).is_err() {
            return bad_request(ApiError::invalid_parameter_value(
                "Request body leaves must be strings or null",
            ));
        }

        match endpoint {
            Endpoint::RunNow if body.get("job_id").map_or(true, |v| v.is_null()) => {
                return bad_request(ApiError::invalid_parameter_value(
                    "Missing required field: job_id",
                ));
            }
            Endpoint::SubmitMultitaskRun
                if body
                    .get("tasks")
                    .and_then(|t| t.as_array())
                    .map_or(true, |t| t.is_empty()) =>
            {
                return bad_request(ApiError::invalid_parameter_value(
                    "Missing required field: tasks",
                ));
            }
            _ => {}
        }

        let mut state = lock(&self.state);

        let token = body
            .get("idempotency_token")
            .and_then(|t| t.as_str())
            .map(str::to_string);
        if let Some(existing) = token.as_ref().and_then(|t| state.idempotency_tokens.get(t)) {
            return ApiResponse::ok(json!({ "run_id": existing }));
        }

        let run_id = state.create_run(endpoint, body.clone());
        if let Some(token) = token {
            state.idempotency_tokens.insert(token, run_id.clone());
        }

        match endpoint {
            Endpoint::RunNow => {
                let number_in_job = state
                    .runs
                    .get(&run_id)
                    .and_then(|r| r.job_id)
                    .map(|job_id| state.runs_of_job(job_id));
                ApiResponse::ok(json!({ "run_id": run_id, "number_in_job": number_in_job }))
            }
            _ => ApiResponse::ok(json!({ "run_id": run_id })),
        }
    }

    fn handle_get_run(&self, request: &ApiRequest) -> ApiResponse {
        let Some(run_id) = request.query_param("run_id").map(RunId::new) else {
            return bad_request(ApiError::invalid_parameter_value(
                "Missing required field: run_id",
            ));
        };

        let mut state = lock(&self.state);
        let Some(run) = state.runs.get_mut(&run_id) else {
            return bad_request(ApiError::run_not_found(run_id.as_str()));
        };

        let response = GetRunResponse {
            run_id: run.run_id.clone(),
            job_id: run.job_id,
            run_name: run.run_name.clone(),
            state: run.observe(),
            run_page_url: Some(format!("https://{}/#job/runs/{}", MOCK_HOST, run.run_id)),
        };
        match serde_json::to_value(&response) {
            Ok(body) => ApiResponse::ok(body),
            Err(e) => ApiResponse::error(500, &ApiError::new(ErrorCode::InternalError, e.to_string())),
        }
    }
}

fn bad_request(error: ApiError) -> ApiResponse {
    ApiResponse::error(400, &error)
}

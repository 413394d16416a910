//! Jobs API Client
//!
//! Submits runs, reads run state, and applies the retry policy: transient
//! failures (transport errors, HTTP 5xx and 429, transient API error codes)
//! are retried with a fixed delay; any other rejection is returned at once.

use std::sync::Arc;
use std::time::Duration;

use dbx_protocol::{
    ApiRequest, ApiResponse, Endpoint, GetRunResponse, RunId, RunNowResponse, RunState,
    SubmitRunResponse,
};
use dbx_schema::WireTree;
use serde::de::DeserializeOwned;
use tracing::{debug, warn};

use super::transport::{HttpTransport, Transport};
use crate::cancel::{CancelToken, WaitOutcome};
use crate::config::{normalize_host, ClientConfig, ConfigError, Connection};
use crate::error::{JobError, JobResult};

/// How many times to attempt an API call, and how long to wait in between.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RetryPolicy {
    max_attempts: u32,
    delay: Duration,
}

impl RetryPolicy {
    pub const DEFAULT_MAX_ATTEMPTS: u32 = 3;
    pub const DEFAULT_DELAY: Duration = Duration::from_secs(1);

    /// `max_attempts` counts every attempt, including the first.
    pub fn new(max_attempts: u32, delay: Duration) -> Result<Self, ConfigError> {
        if max_attempts < 1 {
            return Err(ConfigError::invalid(
                "retry_limit",
                "must be greater than or equal to 1",
            ));
        }
        Ok(Self {
            max_attempts,
            delay,
        })
    }

    pub fn max_attempts(&self) -> u32 {
        self.max_attempts
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: Self::DEFAULT_MAX_ATTEMPTS,
            delay: Self::DEFAULT_DELAY,
        }
    }
}

/// Client for the jobs API
pub struct JobsClient {
    transport: Arc<dyn Transport>,
    host: String,
    policy: RetryPolicy,
    cancel: CancelToken,
}

impl JobsClient {
    /// Connect over HTTPS.
    pub fn connect(connection: &Connection, policy: RetryPolicy, timeout: Duration) -> JobResult<Self> {
        let transport = HttpTransport::new(connection, timeout)
            .map_err(|e| JobError::configuration(format!("cannot build HTTP client: {}", e)))?;
        Ok(Self::with_transport(Arc::new(transport), connection.host(), policy))
    }

    /// Connect using a resolved configuration.
    pub fn from_config(config: &ClientConfig) -> JobResult<Self> {
        let connection = config.require_connection()?;
        Self::connect(connection, config.retry, config.request_timeout)
    }

    /// Create a client over any transport
    pub fn with_transport(transport: Arc<dyn Transport>, host: &str, policy: RetryPolicy) -> Self {
        Self {
            transport,
            host: normalize_host(host),
            policy,
            cancel: CancelToken::new(),
        }
    }

    /// Abandon retry back-offs once `cancel` fires.
    pub fn with_cancel_token(mut self, cancel: CancelToken) -> Self {
        self.cancel = cancel;
        self
    }

    pub fn host(&self) -> &str {
        &self.host
    }

    pub fn policy(&self) -> &RetryPolicy {
        &self.policy
    }

    /// One-time single-task run.
    pub fn submit_run(&self, payload: &WireTree) -> JobResult<RunId> {
        let response: SubmitRunResponse = self.submit(Endpoint::SubmitRun, payload)?;
        Ok(response.run_id)
    }

    /// Trigger an existing job.
    pub fn run_now(&self, payload: &WireTree) -> JobResult<RunId> {
        let response: RunNowResponse = self.submit(Endpoint::RunNow, payload)?;
        Ok(response.run_id)
    }

    /// One-time multi-task run.
    pub fn submit_multitask_run(&self, payload: &WireTree) -> JobResult<RunId> {
        let response: SubmitRunResponse = self.submit(Endpoint::SubmitMultitaskRun, payload)?;
        Ok(response.run_id)
    }

    /// Full run metadata.
    pub fn get_run(&self, run_id: &RunId) -> JobResult<GetRunResponse> {
        let request = ApiRequest::new(Endpoint::GetRun).with_query("run_id", run_id.as_str());
        let response = self.call(&request)?;
        parse(Endpoint::GetRun, &response)
    }

    /// Current state of a run.
    pub fn get_run_state(&self, run_id: &RunId) -> JobResult<RunState> {
        Ok(self.get_run(run_id)?.state)
    }

    /// Human-facing link to the run. No I/O.
    pub fn get_run_page_url(&self, run_id: &RunId) -> String {
        format!("https://{}/#job/runs/{}", self.host, run_id)
    }

    fn submit<T: DeserializeOwned>(&self, endpoint: Endpoint, payload: &WireTree) -> JobResult<T> {
        if !matches!(payload, WireTree::Mapping(_)) {
            return Err(JobError::configuration(format!(
                "{} expects a mapping payload",
                endpoint
            )));
        }
        let request = ApiRequest::new(endpoint).with_body(payload.to_json());
        let response = self.call(&request)?;
        parse(endpoint, &response)
    }

    /// Execute with retries.
    fn call(&self, request: &ApiRequest) -> JobResult<ApiResponse> {
        let endpoint = request.endpoint;
        let max_attempts = self.policy.max_attempts;
        let mut attempt = 0;

        loop {
            attempt += 1;
            debug!(%endpoint, attempt, "Calling jobs API");

            let failure = match self.transport.execute(request) {
                Ok(response) if response.is_success() => return Ok(response),
                Ok(response) if is_transient(&response) => describe_failure(&response),
                Ok(response) => return Err(rejection(endpoint, &response)),
                Err(e) => e.to_string(),
            };

            if attempt >= max_attempts {
                return Err(JobError::TransientBackend {
                    endpoint,
                    attempts: attempt,
                    last_error: failure,
                });
            }

            warn!(
                %endpoint,
                attempt,
                max_attempts,
                error = %failure,
                "Attempt failed, retrying in {:?}",
                self.policy.delay
            );
            if self.cancel.wait(self.policy.delay) == WaitOutcome::Cancelled {
                return Err(JobError::RetryCancelled {
                    endpoint,
                    attempts: attempt,
                });
            }
        }
    }
}

fn is_transient(response: &ApiResponse) -> bool {
    response.is_server_error()
        || response.is_rate_limited()
        || response
            .api_error()
            .is_some_and(|e| e.error_code.is_transient())
}

fn describe_failure(response: &ApiResponse) -> String {
    match response.api_error() {
        Some(error) => format!("HTTP {}: {}", response.status, error),
        None => format!("HTTP {}", response.status),
    }
}

fn rejection(endpoint: Endpoint, response: &ApiResponse) -> JobError {
    let api_error = response.api_error();
    let message = match &api_error {
        Some(error) => error.message.clone(),
        None => response.body.to_string(),
    };
    JobError::ApiRejected {
        endpoint,
        status: response.status,
        error_code: api_error.map(|e| e.error_code),
        message,
    }
}

fn parse<T: DeserializeOwned>(endpoint: Endpoint, response: &ApiResponse) -> JobResult<T> {
    response
        .parse()
        .map_err(|e| JobError::Protocol(format!("{}: {}", endpoint, e)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::MockTransport;
    use crate::mock::FailureConfig;
    use dbx_protocol::{ApiError, RunLifeCycleState};
    use dbx_schema::coerce_json;
    use serde_json::json;

    fn create_client(transport: MockTransport, attempts: u32) -> JobsClient {
        let policy = RetryPolicy::new(attempts, Duration::ZERO).unwrap();
        JobsClient::with_transport(Arc::new(transport), "https://dbc-42.cloud.databricks.com/", policy)
    }

    #[test]
    fn test_retry_policy_validation() {
        assert!(RetryPolicy::new(0, Duration::ZERO).is_err());
        let policy = RetryPolicy::new(1, Duration::from_millis(5)).unwrap();
        assert_eq!(policy.max_attempts(), 1);
        assert_eq!(RetryPolicy::default().max_attempts(), 3);
    }

    #[test]
    fn test_run_page_url() {
        let client = create_client(MockTransport::new(), 1);
        assert_eq!(
            client.get_run_page_url(&RunId::from(455644833)),
            "https://dbc-42.cloud.databricks.com/#job/runs/455644833"
        );
    }

    #[test]
    fn test_submit_run_and_get_state() {
        let transport = MockTransport::new();
        let client = create_client(transport.clone(), 3);

        let payload = coerce_json(&json!({"run_name": "nightly", "existing_cluster_id": "c-1"}));
        let run_id = client.submit_run(&payload).unwrap();

        let state = client.get_run_state(&run_id).unwrap();
        assert_eq!(state.life_cycle_state, RunLifeCycleState::Pending);
        assert_eq!(transport.service().request_count(Endpoint::GetRun), 1);
    }

    #[test]
    fn test_transient_failure_then_success() {
        let transport = MockTransport::new();
        transport.service().inject_failure(
            Endpoint::SubmitRun,
            FailureConfig::unavailable().with_fail_count(2),
        );
        let client = create_client(transport.clone(), 3);

        let payload = coerce_json(&json!({"run_name": "x"}));
        assert!(client.submit_run(&payload).is_ok());
        assert_eq!(transport.service().request_count(Endpoint::SubmitRun), 3);
    }

    #[test]
    fn test_rejection_is_not_retried() {
        let transport = MockTransport::new();
        transport.service().inject_failure(
            Endpoint::RunNow,
            FailureConfig::error(400, ApiError::invalid_parameter_value("Job 42 does not exist.")),
        );
        let client = create_client(transport.clone(), 5);

        let err = client.run_now(&coerce_json(&json!({"job_id": "42"}))).unwrap_err();
        assert!(matches!(err, JobError::ApiRejected { status: 400, .. }));
        assert_eq!(transport.service().request_count(Endpoint::RunNow), 1);
    }

    #[test]
    fn test_non_mapping_payload_rejected_locally() {
        let transport = MockTransport::new();
        let client = create_client(transport.clone(), 3);
        let err = client.submit_run(&WireTree::from("oops")).unwrap_err();
        assert!(matches!(err, JobError::Configuration(_)));
        assert_eq!(transport.service().request_count(Endpoint::SubmitRun), 0);
    }

    #[test]
    fn test_cancel_cuts_retry_delay() {
        let transport = MockTransport::new();
        transport
            .service()
            .inject_failure(Endpoint::GetRun, FailureConfig::unavailable());
        let policy = RetryPolicy::new(5, Duration::from_secs(3600)).unwrap();
        let cancel = CancelToken::new();
        let client = JobsClient::with_transport(Arc::new(transport.clone()), "h", policy)
            .with_cancel_token(cancel.clone());
        cancel.cancel();

        let err = client.get_run(&RunId::from(1)).unwrap_err();
        assert!(matches!(err, JobError::RetryCancelled { attempts: 1, .. }));
        assert_eq!(err.exit_code(), 80);
        assert_eq!(transport.service().request_count(Endpoint::GetRun), 1);
    }

    #[test]
    fn test_unknown_run_is_rejected() {
        let client = create_client(MockTransport::new(), 3);
        let err = client.get_run(&RunId::from(999)).unwrap_err();
        assert!(matches!(err, JobError::ApiRejected { status: 400, .. }));
    }
}

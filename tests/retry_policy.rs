//! Retry Policy Tests
//!
//! Transient failures are retried up to the configured attempt count;
//! semantic rejections fail on the first answer.

mod fixtures;

use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use dbx_jobs::mock::MOCK_HOST;
use dbx_jobs::{
    CancelToken, FailureConfig, JobError, JobsClient, MockJobsService, MockTransport, RetryPolicy,
};
use dbx_protocol::{ApiError, Endpoint, ErrorCode, RunId};
use dbx_schema::coerce_json;
use fixtures::{fast_policy, instant_monitor, mock_client};
use serde_json::json;

fn body() -> dbx_schema::WireTree {
    coerce_json(&json!({"run_name": "retry", "existing_cluster_id": "c"}))
}

// =============================================================================
// Test 1: Transient failures
// =============================================================================

#[test]
fn test_always_unavailable_exhausts_attempts() {
    let (client, service) = mock_client(fast_policy(4));
    service.inject_failure(Endpoint::SubmitRun, FailureConfig::unavailable());

    let err = client.submit_run(&body()).unwrap_err();

    assert_eq!(service.request_count(Endpoint::SubmitRun), 4);
    match err {
        JobError::TransientBackend { endpoint, attempts, .. } => {
            assert_eq!(endpoint, Endpoint::SubmitRun);
            assert_eq!(attempts, 4);
        }
        other => panic!("unexpected error: {other}"),
    }
    assert_eq!(service.run_count(), 0);
}

#[test]
fn test_single_attempt_policy_never_retries() {
    let (client, service) = mock_client(fast_policy(1));
    service.inject_failure(Endpoint::SubmitRun, FailureConfig::connection_reset());

    let err = client.submit_run(&body()).unwrap_err();

    assert!(matches!(err, JobError::TransientBackend { attempts: 1, .. }));
    assert_eq!(service.request_count(Endpoint::SubmitRun), 1);
}

#[test]
fn test_recovers_within_budget() {
    let (client, service) = mock_client(fast_policy(3));
    service.inject_failure(
        Endpoint::SubmitRun,
        FailureConfig::connection_reset().with_fail_count(2),
    );

    let run_id = client.submit_run(&body()).unwrap();

    assert_eq!(run_id, RunId::from(1001));
    assert_eq!(service.request_count(Endpoint::SubmitRun), 3);
}

#[test]
fn test_rate_limit_is_transient() {
    let (client, service) = mock_client(fast_policy(2));
    service.inject_failure(Endpoint::RunNow, FailureConfig::rate_limited().with_fail_count(1));

    client
        .run_now(&coerce_json(&json!({"job_id": 5})))
        .unwrap();
    assert_eq!(service.request_count(Endpoint::RunNow), 2);
}

#[test]
fn test_transient_error_code_with_client_status_is_retried() {
    let (client, service) = mock_client(fast_policy(2));
    service.inject_failure(
        Endpoint::SubmitRun,
        FailureConfig::error(400, ApiError::temporarily_unavailable()).with_fail_count(1),
    );

    client.submit_run(&body()).unwrap();
    assert_eq!(service.request_count(Endpoint::SubmitRun), 2);
}

#[test]
fn test_status_queries_share_the_policy() {
    let (client, service) = mock_client(fast_policy(3));
    let run_id = client.submit_run(&body()).unwrap();
    service.inject_failure(Endpoint::GetRun, FailureConfig::unavailable().with_fail_count(2));

    let outcome = instant_monitor().watch(&client, "retry", &run_id).unwrap();

    assert_eq!(outcome.run_id, run_id);
    // two failed attempts, then PENDING, RUNNING, SUCCESS
    assert_eq!(service.request_count(Endpoint::GetRun), 5);
}

#[test]
fn test_interrupt_during_backoff_stops_retrying() {
    let service = MockJobsService::new();
    service.inject_failure(Endpoint::SubmitRun, FailureConfig::unavailable());
    let cancel = CancelToken::new();
    let client = JobsClient::with_transport(
        Arc::new(MockTransport::with_service(service.clone())),
        MOCK_HOST,
        RetryPolicy::new(10, Duration::from_secs(3600)).unwrap(),
    )
    .with_cancel_token(cancel.clone());

    let canceller = thread::spawn(move || {
        thread::sleep(Duration::from_millis(50));
        cancel.cancel();
    });
    let start = Instant::now();
    let err = client.submit_run(&body()).unwrap_err();
    canceller.join().unwrap();

    assert!(start.elapsed() < Duration::from_secs(60));
    match err {
        JobError::RetryCancelled { endpoint, attempts } => {
            assert_eq!(endpoint, Endpoint::SubmitRun);
            assert_eq!(attempts, 1);
        }
        other => panic!("unexpected error: {other}"),
    }
    assert_eq!(service.request_count(Endpoint::SubmitRun), 1);
}

// =============================================================================
// Test 2: Semantic rejections
// =============================================================================

#[test]
fn test_malformed_request_fails_immediately() {
    let (client, service) = mock_client(fast_policy(5));
    service.inject_failure(
        Endpoint::SubmitMultitaskRun,
        FailureConfig::error(400, ApiError::malformed_request("bad tasks")),
    );

    let err = client
        .submit_multitask_run(&coerce_json(&json!({"tasks": [{"task_key": "a"}]})))
        .unwrap_err();

    assert_eq!(service.request_count(Endpoint::SubmitMultitaskRun), 1);
    match err {
        JobError::ApiRejected { status, error_code, message, .. } => {
            assert_eq!(status, 400);
            assert_eq!(error_code, Some(ErrorCode::MalformedRequest));
            assert_eq!(message, "bad tasks");
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn test_task_body_is_coerced_before_sending() {
    let (client, service) = mock_client(fast_policy(3));
    let run_now = dbx_jobs::RunNow::new(1);

    run_now.run(&client, &instant_monitor()).unwrap();
    assert_eq!(
        service.last_body(Endpoint::RunNow).unwrap()["job_id"],
        json!("1")
    );
}

#[test]
fn test_non_mapping_payload_never_sent() {
    let (client, service) = mock_client(fast_policy(3));

    let err = client.submit_run(&coerce_json(&json!(["a"]))).unwrap_err();

    assert!(matches!(err, JobError::Configuration(_)));
    assert!(service.requests().is_empty());
}

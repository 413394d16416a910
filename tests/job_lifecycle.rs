//! Job Lifecycle Tests
//!
//! Submission through monitoring against the mock jobs service: scripted
//! state progressions, terminal classification, and cancellation.

mod fixtures;

use std::thread;
use std::time::Duration;

use dbx_jobs::{
    InvocationContext, JobError, LifecycleMonitor, RunNow, SubmitMultitaskRun, SubmitRun,
};
use dbx_protocol::{Endpoint, RunId, RunLifeCycleState, RunResultState, RunState};
use dbx_schema::Value;
use fixtures::{fast_policy, instant_monitor, mock_client, multitask_payload};
use serde_json::json;

fn pending() -> RunState {
    RunState::new(RunLifeCycleState::Pending)
}

fn running() -> RunState {
    RunState::new(RunLifeCycleState::Running)
}

// =============================================================================
// Test 1: Happy path
// =============================================================================

#[test]
fn test_submit_run_polls_to_success() {
    let (client, service) = mock_client(fast_policy(3));
    let task = SubmitRun::new(Value::from(json!({
        "existing_cluster_id": "1201-my-cluster",
        "notebook_task": {"notebook_path": "/Users/me/etl"}
    })));

    let run_id = task.run(&client, &instant_monitor()).unwrap();

    assert_eq!(run_id, RunId::from(1001));
    assert_eq!(service.request_count(Endpoint::SubmitRun), 1);
    // PENDING, RUNNING, TERMINATED/SUCCESS
    assert_eq!(service.request_count(Endpoint::GetRun), 3);
    let run = service.run(&run_id).unwrap();
    assert_eq!(run.run_name.as_deref(), Some("Run Submitted by Prefect"));
    assert!(run.state.is_successful());
}

#[test]
fn test_run_now_targets_job() {
    let (client, service) = mock_client(fast_policy(3));
    let task = RunNow {
        notebook_params: Some([("name".to_string(), Value::from("john doe"))].into()),
        ..RunNow::new(42)
    };

    let run_id = task.run(&client, &instant_monitor()).unwrap();

    let run = service.run(&run_id).unwrap();
    assert_eq!(run.job_id, Some(42));
    assert_eq!(
        service.last_body(Endpoint::RunNow).unwrap()["notebook_params"],
        json!({"name": "john doe"})
    );
}

#[test]
fn test_multitask_run_from_loose_payload() {
    let (client, service) = mock_client(fast_policy(3));
    let task = SubmitMultitaskRun::from_value(&Value::from(multitask_payload())).unwrap();

    let run_id = task
        .run(&client, &instant_monitor(), &InvocationContext::generate())
        .unwrap();

    assert_eq!(service.run_count(), 1);
    let body = service.last_body(Endpoint::SubmitMultitaskRun).unwrap();
    assert_eq!(body["idempotency_token"], "8f018174-4792-40d5-bcbc-3e6a527352c8");
    assert_eq!(body["tasks"][2]["new_cluster"]["spark_conf"]["spark.speculation"], "true");
    assert_eq!(body["tasks"][2]["new_cluster"]["autoscale"]["max_workers"], "16");
    assert_eq!(service.run(&run_id).unwrap().run_name.as_deref(), Some("A multitask job run"));
}

// =============================================================================
// Test 2: Terminal failures
// =============================================================================

#[test]
fn test_failed_run_reports_job_name_and_state() {
    let (client, service) = mock_client(fast_policy(3));
    service.script_next_run(vec![
        pending(),
        RunState::terminated(RunResultState::Failed).with_message("Task Match failed"),
    ]);
    let task = SubmitRun {
        name: "nightly-etl".to_string(),
        ..SubmitRun::new(Value::from(json!({"existing_cluster_id": "c"})))
    };

    let err = task.run(&client, &instant_monitor()).unwrap_err();

    assert_eq!(service.request_count(Endpoint::GetRun), 2);
    assert_eq!(
        err.to_string(),
        "nightly-etl failed with terminal state: TERMINATED/FAILED: Task Match failed"
    );
    assert_eq!(err.exit_code(), 40);
}

#[test]
fn test_skipped_run_is_failure() {
    let (client, service) = mock_client(fast_policy(3));
    service.script_next_run(vec![RunState::new(RunLifeCycleState::Skipped)]);

    let err = RunNow::new(1).run(&client, &instant_monitor()).unwrap_err();
    match err {
        JobError::RemoteJobFailed { state, .. } => {
            assert_eq!(state.life_cycle_state, RunLifeCycleState::Skipped);
        }
        other => panic!("unexpected error: {other}"),
    }
    assert_eq!(service.request_count(Endpoint::GetRun), 1);
}

#[test]
fn test_terminal_failure_is_not_resubmitted() {
    let (client, service) = mock_client(fast_policy(5));
    service.script_next_run(vec![RunState::terminated(RunResultState::Timedout)]);

    let _ = SubmitRun::new(Value::from(json!({"existing_cluster_id": "c"})))
        .run(&client, &instant_monitor())
        .unwrap_err();

    assert_eq!(service.request_count(Endpoint::SubmitRun), 1);
    assert_eq!(service.run_count(), 1);
}

// =============================================================================
// Test 3: Input errors never reach the service
// =============================================================================

#[test]
fn test_zero_tasks_makes_no_call() {
    let (client, service) = mock_client(fast_policy(3));

    let err = SubmitMultitaskRun::default()
        .run(&client, &instant_monitor(), &InvocationContext::generate())
        .unwrap_err();

    assert!(matches!(err, JobError::Configuration(_)));
    assert!(service.requests().is_empty());
}

#[test]
fn test_run_now_without_job_id_makes_no_call() {
    let (client, service) = mock_client(fast_policy(3));

    let err = RunNow::default().run(&client, &instant_monitor()).unwrap_err();

    assert_eq!(err.exit_code(), 11);
    assert!(service.requests().is_empty());
}

// =============================================================================
// Test 4: Idempotency
// =============================================================================

#[test]
fn test_same_invocation_submits_one_run() {
    let (client, service) = mock_client(fast_policy(3));
    let mut payload = multitask_payload();
    payload
        .as_object_mut()
        .unwrap()
        .remove("idempotency_token");
    let task = SubmitMultitaskRun::from_value(&Value::from(payload)).unwrap();
    let ctx = InvocationContext::default().with_invocation_id("flow-run-7");

    let first = task.run(&client, &instant_monitor(), &ctx).unwrap();
    let second = task.run(&client, &instant_monitor(), &ctx).unwrap();

    assert_eq!(first, second);
    assert_eq!(service.request_count(Endpoint::SubmitMultitaskRun), 2);
    assert_eq!(service.run_count(), 1);
    assert_eq!(
        service.last_body(Endpoint::SubmitMultitaskRun).unwrap()["idempotency_token"],
        "flow-run-7"
    );
}

// =============================================================================
// Test 5: Cancellation
// =============================================================================

#[test]
fn test_cancel_interrupts_poll_wait() {
    let (client, service) = mock_client(fast_policy(3));
    service.set_default_progression(vec![pending(), running()]);
    let monitor = LifecycleMonitor::new(Duration::from_secs(3600));
    let token = monitor.cancel_token().clone();

    let canceller = thread::spawn(move || {
        thread::sleep(Duration::from_millis(50));
        token.cancel();
    });

    let err = SubmitRun::new(Value::from(json!({"existing_cluster_id": "c"})))
        .run(&client, &monitor)
        .unwrap_err();
    canceller.join().unwrap();

    assert!(matches!(err, JobError::Cancelled { .. }));
    assert_eq!(err.exit_code(), 80);
    assert_eq!(service.request_count(Endpoint::GetRun), 1);
}

#[test]
fn test_status_query_of_unknown_run_is_rejected() {
    let (client, _service) = mock_client(fast_policy(3));

    let err = client.get_run_state(&RunId::from(999)).unwrap_err();
    match err {
        JobError::ApiRejected { status, .. } => assert_eq!(status, 400),
        other => panic!("unexpected error: {other}"),
    }
}

//! Submission Merge Tests
//!
//! Raw payloads and named overrides, as seen by the service.

mod fixtures;

use std::collections::BTreeMap;

use dbx_jobs::{RunNow, SubmitRun, DEFAULT_RUN_NAME};
use dbx_protocol::Endpoint;
use dbx_schema::Value;
use fixtures::{fast_policy, instant_monitor, mock_client};
use serde_json::json;

#[test]
fn test_override_wins_on_collision() {
    let (client, service) = mock_client(fast_policy(3));
    let task = SubmitRun {
        run_name: Some("r2".to_string()),
        ..SubmitRun::new(Value::from(json!({"run_name": "r1", "existing_cluster_id": "c"})))
    };

    let run_id = task.run(&client, &instant_monitor()).unwrap();

    assert_eq!(service.run(&run_id).unwrap().run_name.as_deref(), Some("r2"));
}

#[test]
fn test_default_run_name_applied_once() {
    let (client, service) = mock_client(fast_policy(3));

    SubmitRun::new(Value::from(json!({"existing_cluster_id": "c"})))
        .run(&client, &instant_monitor())
        .unwrap();

    assert_eq!(
        service.last_body(Endpoint::SubmitRun).unwrap(),
        json!({"existing_cluster_id": "c", "run_name": DEFAULT_RUN_NAME})
    );
}

#[test]
fn test_new_cluster_override_replaces_whole_cluster() {
    let (client, service) = mock_client(fast_policy(3));
    let task = SubmitRun {
        new_cluster: Some(Value::from(json!({"spark_version": "13.3.x-scala2.12", "num_workers": 2}))),
        ..SubmitRun::new(Value::from(json!({
            "new_cluster": {"spark_version": "7.3.x-scala2.12", "node_type_id": "i3.xlarge"},
            "spark_jar_task": {"main_class_name": "com.example.Main"}
        })))
    };

    task.run(&client, &instant_monitor()).unwrap();

    assert_eq!(
        service.last_body(Endpoint::SubmitRun).unwrap()["new_cluster"],
        json!({"spark_version": "13.3.x-scala2.12", "num_workers": "2"})
    );
}

#[test]
fn test_notebook_params_merge_key_level() {
    let (client, service) = mock_client(fast_policy(3));
    let task = RunNow {
        json: Some(Value::from(json!({"job_id": 12, "notebook_params": {"a": "1"}}))),
        notebook_params: Some(BTreeMap::from([("b".to_string(), Value::from("2"))])),
        ..Default::default()
    };

    task.run(&client, &instant_monitor()).unwrap();

    assert_eq!(
        service.last_body(Endpoint::RunNow).unwrap()["notebook_params"],
        json!({"a": "1", "b": "2"})
    );
}

#[test]
fn test_python_params_replace_wholesale() {
    let (client, service) = mock_client(fast_policy(3));
    let task = RunNow {
        json: Some(Value::from(json!({"job_id": 12, "python_params": ["--a", "--b"]}))),
        python_params: Some(vec!["--c".to_string()]),
        ..Default::default()
    };

    task.run(&client, &instant_monitor()).unwrap();

    assert_eq!(
        service.last_body(Endpoint::RunNow).unwrap()["python_params"],
        json!(["--c"])
    );
}

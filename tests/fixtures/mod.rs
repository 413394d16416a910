//! Shared fixtures for integration tests
//!
//! - Clients wired to an in-process mock service
//! - Retry policies and monitors that never sleep
//! - The multi-task submission used across decode and lifecycle tests

#![allow(dead_code)]

use std::sync::Arc;
use std::time::Duration;

use dbx_jobs::mock::MOCK_HOST;
use dbx_jobs::{JobsClient, LifecycleMonitor, MockJobsService, MockTransport, RetryPolicy};
use serde_json::json;

/// Retry policy with `attempts` total attempts and no delay.
pub fn fast_policy(attempts: u32) -> RetryPolicy {
    RetryPolicy::new(attempts, Duration::ZERO).unwrap()
}

/// Client over a fresh mock service; the service handle stays usable for
/// scripting and inspection.
pub fn mock_client(policy: RetryPolicy) -> (JobsClient, MockJobsService) {
    let service = MockJobsService::new();
    let transport = MockTransport::with_service(service.clone());
    let client = JobsClient::with_transport(Arc::new(transport), MOCK_HOST, policy);
    (client, service)
}

/// Monitor that polls back to back.
pub fn instant_monitor() -> LifecycleMonitor {
    LifecycleMonitor::new(Duration::ZERO)
}

/// Three dependent tasks with a user grant.
pub fn multitask_payload() -> serde_json::Value {
    json!({
        "tasks": [
            {
                "task_key": "Sessionize",
                "description": "Extracts session data from events",
                "depends_on": [],
                "existing_cluster_id": "0923-164208-meows279",
                "spark_jar_task": {
                    "main_class_name": "com.databricks.Sessionize",
                    "parameters": ["--data", "dbfs:/path/to/data.json"]
                },
                "libraries": [{"jar": "dbfs:/mnt/databricks/Sessionize.jar"}],
                "timeout_seconds": 86400
            },
            {
                "task_key": "Orders_Ingest",
                "description": "Ingests order data",
                "depends_on": [],
                "existing_cluster_id": "0923-164208-meows279",
                "spark_jar_task": {
                    "main_class_name": "com.databricks.OrdersIngest",
                    "parameters": ["--data", "dbfs:/path/to/order-data.json"]
                },
                "libraries": [{"jar": "dbfs:/mnt/databricks/OrderIngest.jar"}],
                "timeout_seconds": 86400
            },
            {
                "task_key": "Match",
                "description": "Matches orders with user sessions",
                "depends_on": [
                    {"task_key": "Orders_Ingest"},
                    {"task_key": "Sessionize"}
                ],
                "new_cluster": {
                    "spark_version": "7.3.x-scala2.12",
                    "node_type_id": "i3.xlarge",
                    "spark_conf": {"spark.speculation": true},
                    "aws_attributes": {"availability": "SPOT", "zone_id": "us-west-2a"},
                    "autoscale": {"min_workers": 2, "max_workers": 16}
                },
                "notebook_task": {
                    "notebook_path": "/Users/user.name@databricks.com/Match",
                    "base_parameters": {"name": "John Doe", "age": "35"}
                },
                "timeout_seconds": 86400
            }
        ],
        "run_name": "A multitask job run",
        "timeout_seconds": 86400,
        "idempotency_token": "8f018174-4792-40d5-bcbc-3e6a527352c8",
        "access_control_list": [
            {"user_name": "jsmith@example.com", "permission_level": "CAN_MANAGE"}
        ]
    })
}

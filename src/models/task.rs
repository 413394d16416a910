//! Task settings of a multi-task run.

use std::collections::BTreeMap;

use dbx_schema::{Describe, Schema};
use serde::{Deserialize, Serialize};

use super::cluster::NewCluster;
use super::library::Library;

/// Another task this one waits for.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskDependency {
    pub task_key: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub outcome: Option<String>,
}

impl TaskDependency {
    pub fn new(task_key: impl Into<String>) -> Self {
        Self {
            task_key: task_key.into(),
            outcome: None,
        }
    }
}

impl Describe for TaskDependency {
    fn schema() -> Schema {
        Schema::record("TaskDependency")
            .required("task_key", Schema::string())
            .optional("outcome", Schema::string())
            .build()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotebookTask {
    pub notebook_path: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub base_parameters: Option<BTreeMap<String, String>>,
}

impl Describe for NotebookTask {
    fn schema() -> Schema {
        Schema::record("NotebookTask")
            .required("notebook_path", Schema::string())
            .optional("base_parameters", Schema::map_of(Schema::string()))
            .build()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SparkJarTask {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub main_class_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parameters: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub jar_uri: Option<String>,
}

impl Describe for SparkJarTask {
    fn schema() -> Schema {
        Schema::record("SparkJarTask")
            .optional("main_class_name", Schema::string())
            .optional("parameters", Vec::<String>::schema())
            .optional("jar_uri", Schema::string())
            .build()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SparkPythonTask {
    pub python_file: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parameters: Option<Vec<String>>,
}

impl Describe for SparkPythonTask {
    fn schema() -> Schema {
        Schema::record("SparkPythonTask")
            .required("python_file", Schema::string())
            .optional("parameters", Vec::<String>::schema())
            .build()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SparkSubmitTask {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parameters: Option<Vec<String>>,
}

impl Describe for SparkSubmitTask {
    fn schema() -> Schema {
        Schema::record("SparkSubmitTask")
            .optional("parameters", Vec::<String>::schema())
            .build()
    }
}

/// Runs a Delta Live Tables pipeline.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PipelineTask {
    pub pipeline_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub full_refresh: Option<bool>,
}

impl Describe for PipelineTask {
    fn schema() -> Schema {
        Schema::record("PipelineTask")
            .required("pipeline_id", Schema::string())
            .optional("full_refresh", Schema::boolean())
            .build()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PythonWheelTask {
    pub package_name: String,
    pub entry_point: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parameters: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub named_parameters: Option<BTreeMap<String, String>>,
}

impl Describe for PythonWheelTask {
    fn schema() -> Schema {
        Schema::record("PythonWheelTask")
            .required("package_name", Schema::string())
            .required("entry_point", Schema::string())
            .optional("parameters", Vec::<String>::schema())
            .optional("named_parameters", Schema::map_of(Schema::string()))
            .build()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct JobEmailNotifications {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub on_start: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub on_success: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub on_failure: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub no_alert_for_skipped_runs: Option<bool>,
}

impl Describe for JobEmailNotifications {
    fn schema() -> Schema {
        Schema::record("JobEmailNotifications")
            .optional("on_start", Vec::<String>::schema())
            .optional("on_success", Vec::<String>::schema())
            .optional("on_failure", Vec::<String>::schema())
            .optional("no_alert_for_skipped_runs", Schema::boolean())
            .build()
    }
}

/// One task of a multi-task run. Exactly one of the `*_task` fields is
/// expected to be set; the service enforces that, not this type.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct JobTaskSettings {
    pub task_key: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub depends_on: Option<Vec<TaskDependency>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub existing_cluster_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub new_cluster: Option<NewCluster>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notebook_task: Option<NotebookTask>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub spark_jar_task: Option<SparkJarTask>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub spark_python_task: Option<SparkPythonTask>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub spark_submit_task: Option<SparkSubmitTask>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pipeline_task: Option<PipelineTask>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub python_wheel_task: Option<PythonWheelTask>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub libraries: Option<Vec<Library>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email_notifications: Option<JobEmailNotifications>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timeout_seconds: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_retries: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_retry_interval_millis: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub retry_on_timeout: Option<bool>,
}

impl JobTaskSettings {
    pub fn new(task_key: impl Into<String>) -> Self {
        Self {
            task_key: task_key.into(),
            ..Default::default()
        }
    }
}

impl Describe for JobTaskSettings {
    fn schema() -> Schema {
        Schema::record("JobTaskSettings")
            .required("task_key", Schema::string())
            .optional("description", Schema::string())
            .optional("depends_on", Vec::<TaskDependency>::schema())
            .optional("existing_cluster_id", Schema::string())
            .optional("new_cluster", NewCluster::schema())
            .optional("notebook_task", NotebookTask::schema())
            .optional("spark_jar_task", SparkJarTask::schema())
            .optional("spark_python_task", SparkPythonTask::schema())
            .optional("spark_submit_task", SparkSubmitTask::schema())
            .optional("pipeline_task", PipelineTask::schema())
            .optional("python_wheel_task", PythonWheelTask::schema())
            .optional("libraries", Vec::<Library>::schema())
            .optional("email_notifications", JobEmailNotifications::schema())
            .optional("timeout_seconds", Schema::integer())
            .optional("max_retries", Schema::integer())
            .optional("min_retry_interval_millis", Schema::integer())
            .optional("retry_on_timeout", Schema::boolean())
            .build()
    }
}

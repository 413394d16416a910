//! Typed models of the multi-task submission surface
//!
//! Every model publishes its shape through [`Describe`](dbx_schema::Describe)
//! so loose input can be decoded into it with [`dbx_schema::decode_into`].

mod access;
mod cluster;
mod library;
mod submission;
mod task;

pub use access::{
    AccessControlRequest, AccessControlRequestForGroup, AccessControlRequestForUser,
    PermissionLevel,
};
pub use cluster::{AutoScale, AwsAttributes, AwsAvailability, NewCluster};
pub use library::{Library, MavenLibrary, PythonPyPiLibrary, RCranLibrary};
pub use submission::MultitaskSubmission;
pub use task::{
    JobEmailNotifications, JobTaskSettings, NotebookTask, PipelineTask, PythonWheelTask,
    SparkJarTask, SparkPythonTask, SparkSubmitTask, TaskDependency,
};

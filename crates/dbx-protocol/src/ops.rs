//! Endpoint-specific types.

pub mod run_now;
pub mod status;
pub mod submit;

pub use run_now::RunNowResponse;
pub use status::GetRunResponse;
pub use submit::SubmitRunResponse;

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

use crate::request::Method;

/// The endpoints this client calls.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Endpoint {
    /// One-time single-task run.
    SubmitRun,
    /// Trigger an existing job.
    RunNow,
    /// One-time multi-task run.
    SubmitMultitaskRun,
    /// Run metadata and state.
    GetRun,
}

impl Endpoint {
    pub const ALL: [Endpoint; 4] = [
        Endpoint::SubmitRun,
        Endpoint::RunNow,
        Endpoint::SubmitMultitaskRun,
        Endpoint::GetRun,
    ];

    pub fn method(&self) -> Method {
        match self {
            Endpoint::GetRun => Method::Get,
            _ => Method::Post,
        }
    }

    /// Path relative to the workspace base URL.
    pub fn path(&self) -> &'static str {
        match self {
            Endpoint::SubmitRun => names::SUBMIT_RUN,
            Endpoint::RunNow => names::RUN_NOW,
            Endpoint::SubmitMultitaskRun => names::SUBMIT_MULTITASK_RUN,
            Endpoint::GetRun => names::GET_RUN,
        }
    }

    /// Whether the endpoint creates a run.
    pub fn is_submission(&self) -> bool {
        !matches!(self, Endpoint::GetRun)
    }
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.method().as_str(), self.path())
    }
}

/// Endpoint paths.
pub mod names {
    pub const SUBMIT_RUN: &str = "api/2.0/jobs/runs/submit";
    pub const RUN_NOW: &str = "api/2.1/jobs/run-now";
    pub const SUBMIT_MULTITASK_RUN: &str = "api/2.1/jobs/runs/submit";
    pub const GET_RUN: &str = "api/2.0/jobs/runs/get";
}

/// Opaque run identifier returned by submission.
///
/// The service hands out integers; the client treats them as strings.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RunId(String);

impl RunId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RunId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<i64> for RunId {
    fn from(id: i64) -> Self {
        Self(id.to_string())
    }
}

impl Serialize for RunId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self.0.parse::<i64>() {
            Ok(n) => serializer.serialize_i64(n),
            Err(_) => serializer.serialize_str(&self.0),
        }
    }
}

impl<'de> Deserialize<'de> for RunId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Number(i64),
            Text(String),
        }

        Ok(match Raw::deserialize(deserializer)? {
            Raw::Number(n) => RunId::from(n),
            Raw::Text(s) => RunId(s),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_endpoint_routes() {
        assert_eq!(Endpoint::SubmitRun.to_string(), "POST api/2.0/jobs/runs/submit");
        assert_eq!(Endpoint::GetRun.method(), Method::Get);
        assert!(!Endpoint::GetRun.is_submission());
        assert_ne!(Endpoint::SubmitRun.path(), Endpoint::SubmitMultitaskRun.path());
    }

    #[test]
    fn test_run_id_accepts_numbers_and_strings() {
        let from_number: RunId = serde_json::from_value(json!(455644833)).unwrap();
        let from_text: RunId = serde_json::from_value(json!("455644833")).unwrap();
        assert_eq!(from_number, from_text);
        assert_eq!(serde_json::to_value(&from_number).unwrap(), json!(455644833));
        assert_eq!(serde_json::to_value(RunId::new("run-a")).unwrap(), json!("run-a"));
    }
}

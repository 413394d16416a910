//! Jobs API Protocol Types
//!
//! Defines the request/response envelopes, endpoints and run-state model
//! for the remote jobs service.

pub mod error;
pub mod ops;
pub mod request;
pub mod response;
pub mod state;

pub use error::{ApiError, ErrorCode};
pub use ops::{Endpoint, GetRunResponse, RunId, RunNowResponse, SubmitRunResponse};
pub use request::{ApiRequest, Method};
pub use response::{ApiResponse, ResponseError};
pub use state::{RunLifeCycleState, RunResultState, RunState, TerminalState};

/// User agent sent with every request.
pub const USER_AGENT: &str = concat!("dbx-jobs/", env!("CARGO_PKG_VERSION"));

//! Transport Layer for the Jobs Client
//!
//! Abstracts the HTTP connection for testability. Provides:
//! - Transport trait: interface for a single API call
//! - MockTransport: in-process mock jobs service for tests
//! - HttpTransport: real HTTPS connection for production

use std::time::Duration;

use dbx_protocol::{ApiRequest, ApiResponse, Method, USER_AGENT};
use tracing::debug;

use crate::config::{Connection, Credentials};
use crate::mock::MockJobsService;

/// Transport trait for API calls
pub trait Transport: Send + Sync {
    /// Execute a request and return the response, whatever its status
    fn execute(&self, request: &ApiRequest) -> Result<ApiResponse, TransportError>;
}

/// Transport errors. All of them are treated as transient by the client.
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    #[error("Connection timeout")]
    ConnectionTimeout,

    #[error("HTTP error: {0}")]
    Http(String),
}

impl From<reqwest::Error> for TransportError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            TransportError::ConnectionTimeout
        } else if err.is_connect() {
            TransportError::ConnectionFailed(err.to_string())
        } else {
            TransportError::Http(err.to_string())
        }
    }
}

/// Mock transport for testing - connects directly to MockJobsService in-process
#[derive(Clone, Default)]
pub struct MockTransport {
    service: MockJobsService,
}

impl MockTransport {
    /// Create a new mock transport with a fresh mock service
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a mock transport over a pre-configured service
    pub fn with_service(service: MockJobsService) -> Self {
        Self { service }
    }

    /// Get the underlying mock service for test configuration
    pub fn service(&self) -> &MockJobsService {
        &self.service
    }
}

impl Transport for MockTransport {
    fn execute(&self, request: &ApiRequest) -> Result<ApiResponse, TransportError> {
        self.service.handle_request(request)
    }
}

/// HTTPS transport for production use
///
/// Sends each request to `https://<host>/<endpoint path>`, authenticating with
/// the connection's credentials.
pub struct HttpTransport {
    base_url: String,
    credentials: Credentials,
    client: reqwest::blocking::Client,
}

impl HttpTransport {
    pub fn new(connection: &Connection, timeout: Duration) -> Result<Self, TransportError> {
        let client = reqwest::blocking::Client::builder()
            .timeout(timeout)
            .user_agent(USER_AGENT)
            .build()?;
        Ok(Self {
            base_url: connection.base_url(),
            credentials: connection.credentials().clone(),
            client,
        })
    }

    fn url(&self, request: &ApiRequest) -> String {
        format!("{}/{}", self.base_url, request.path())
    }
}

impl Transport for HttpTransport {
    fn execute(&self, request: &ApiRequest) -> Result<ApiResponse, TransportError> {
        let url = self.url(request);
        debug!(method = request.method().as_str(), %url, "Sending request");

        let builder = match request.method() {
            Method::Get => self.client.get(&url).query(&request.query),
            Method::Post => {
                let body = request
                    .body
                    .clone()
                    .unwrap_or_else(|| serde_json::Value::Object(Default::default()));
                self.client.post(&url).json(&body)
            }
        };
        let builder = match &self.credentials {
            Credentials::Token(token) => builder.bearer_auth(token),
            Credentials::Basic { login, password } => builder.basic_auth(login, Some(password)),
        };

        let response = builder.send()?;
        let status = response.status().as_u16();
        let text = response.text()?;
        debug!(status, bytes = text.len(), "Received response");

        // Gateways in front of the API answer some failures with plain text.
        let body = if text.trim().is_empty() {
            serde_json::Value::Null
        } else {
            serde_json::from_str(&text).unwrap_or(serde_json::Value::String(text))
        };
        Ok(ApiResponse { status, body })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dbx_protocol::{Endpoint, RunId};
    use serde_json::json;

    #[test]
    fn test_mock_transport_submit_then_get() {
        let transport = MockTransport::new();

        let submit = ApiRequest::new(Endpoint::SubmitRun).with_body(json!({
            "run_name": "nightly",
            "existing_cluster_id": "0923-164208-meows279"
        }));
        let response = transport.execute(&submit).unwrap();
        assert!(response.is_success());
        let run_id: RunId = serde_json::from_value(response.body["run_id"].clone()).unwrap();

        let get = ApiRequest::new(Endpoint::GetRun).with_query("run_id", run_id.as_str());
        let response = transport.execute(&get).unwrap();
        assert!(response.is_success());
        assert!(response.body["state"]["life_cycle_state"].is_string());
    }

    #[test]
    fn test_mock_transport_shares_service() {
        let transport = MockTransport::new();
        let handle = transport.service().clone();
        transport
            .execute(&ApiRequest::new(Endpoint::RunNow).with_body(json!({"job_id": "42"})))
            .unwrap();
        assert_eq!(handle.request_count(Endpoint::RunNow), 1);
    }

    #[test]
    fn test_http_transport_url() {
        let connection = Connection::new(
            "https://dbc-42.cloud.databricks.com/",
            Credentials::Token("t".to_string()),
        )
        .unwrap();
        let transport = HttpTransport::new(&connection, Duration::from_secs(5)).unwrap();
        let request = ApiRequest::new(Endpoint::GetRun).with_query("run_id", "7");
        assert_eq!(
            transport.url(&request),
            "https://dbc-42.cloud.databricks.com/api/2.0/jobs/runs/get"
        );
    }
}

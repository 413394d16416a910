//! Host-Side Components
//!
//! The client that talks to the jobs API, and the transports it runs over.

pub mod client;
pub mod transport;

pub use client::{JobsClient, RetryPolicy};
pub use transport::{HttpTransport, MockTransport, Transport, TransportError};

//! Scripted transport for testing.
//!
//! Responses are queued up front and handed out in order; every request is
//! recorded so tests can assert on call counts, paths and payloads.
//!
//! # Feature Flag
//!
//! This module is only available when the `test-utils` feature is enabled:
//!
//! ```toml
//! [dev-dependencies]
//! vlmrun-client = { version = "...", features = ["test-utils"] }
//! ```
//!
//! # Example
//!
//! ```rust,ignore
//! use vlmrun_client::{MockTransport, VlmClient, VlmConfig, VlmCredentials};
//!
//! let mock = MockTransport::new();
//! mock.push_json(200, serde_json::json!({"id": "f-1", "filename": "a.pdf"}));
//!
//! let client = VlmClient::with_transport(
//!     mock.clone(),
//!     VlmConfig::default(),
//!     VlmCredentials::new("test-key"),
//! );
//! ```

use std::collections::VecDeque;
use std::sync::{Arc, Mutex, PoisonError};

use bytes::Bytes;
use serde_json::Value;

use super::{HttpRequest, HttpResponse, HttpTransport, TransportError};

#[derive(Debug)]
enum Scripted {
    Response(HttpResponse),
    Failure(String),
}

#[derive(Debug, Default)]
struct MockState {
    queue: VecDeque<Scripted>,
    requests: Vec<HttpRequest>,
}

/// Mock [`HttpTransport`] replaying queued responses.
///
/// Cloning shares the queue and the request log. Running out of scripted
/// responses yields a transport failure.
#[derive(Debug, Clone, Default)]
pub struct MockTransport {
    state: Arc<Mutex<MockState>>,
}

impl MockTransport {
    /// Creates an empty mock transport.
    pub fn new() -> Self {
        Self::default()
    }

    fn with_state<T>(&self, f: impl FnOnce(&mut MockState) -> T) -> T {
        let mut state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
        f(&mut state)
    }

    /// Queues a JSON response.
    pub fn push_json(&self, status: u16, body: Value) -> &Self {
        let body = Bytes::from(body.to_string());
        self.push_body(status, body)
    }

    /// Queues a response with a raw body.
    pub fn push_body(&self, status: u16, body: impl Into<Bytes>) -> &Self {
        let response = HttpResponse::new(status, body);
        self.with_state(|s| s.queue.push_back(Scripted::Response(response)));
        self
    }

    /// Queues a failure that prevents any response from being received.
    pub fn push_failure(&self, message: impl Into<String>) -> &Self {
        let message = message.into();
        self.with_state(|s| s.queue.push_back(Scripted::Failure(message)));
        self
    }

    /// Returns a copy of every request sent so far.
    pub fn requests(&self) -> Vec<HttpRequest> {
        self.with_state(|s| s.requests.clone())
    }

    /// Returns the number of requests sent so far.
    pub fn request_count(&self) -> usize {
        self.with_state(|s| s.requests.len())
    }

    /// Returns the requests whose URL path ends with `suffix`.
    pub fn requests_to(&self, suffix: &str) -> Vec<HttpRequest> {
        self.with_state(|s| {
            s.requests
                .iter()
                .filter(|r| r.url.path().ends_with(suffix))
                .cloned()
                .collect()
        })
    }

    /// Returns the number of responses still queued.
    pub fn remaining(&self) -> usize {
        self.with_state(|s| s.queue.len())
    }
}

#[async_trait::async_trait]
impl HttpTransport for MockTransport {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, TransportError> {
        let next = self.with_state(|s| {
            s.requests.push(request);
            s.queue.pop_front()
        });

        match next {
            Some(Scripted::Response(response)) => Ok(response),
            Some(Scripted::Failure(message)) => Err(TransportError::new(message)),
            None => Err(TransportError::new("No scripted response left")),
        }
    }
}

#[cfg(test)]
mod tests {
    use url::Url;

    use super::*;
    use crate::transport::Method;

    fn get(path: &str) -> HttpRequest {
        let url = Url::parse("https://api.vlm.run/v1/")
            .unwrap()
            .join(path)
            .unwrap();
        HttpRequest::new(Method::GET, url)
    }

    #[tokio::test]
    async fn test_replays_in_order_and_records() {
        let mock = MockTransport::new();
        mock.push_json(200, serde_json::json!({"n": 1}))
            .push_failure("connection reset");

        let first = mock.send(get("files")).await.unwrap();
        assert_eq!(first.status, 200);

        let second = mock.send(get("response/r-1")).await.unwrap_err();
        assert_eq!(second.to_string(), "connection reset");

        assert_eq!(mock.request_count(), 2);
        assert_eq!(mock.requests_to("/files").len(), 1);
        assert_eq!(mock.remaining(), 0);
    }

    #[tokio::test]
    async fn test_empty_queue_fails() {
        let mock = MockTransport::new();
        assert!(mock.send(get("health")).await.is_err());
    }
}

//! HTTP transport abstraction.
//!
//! A transport performs exactly one HTTP exchange and hands back the status
//! code and raw body. Status interpretation, `detail` extraction and error
//! prefixing live in [`VlmClient`](crate::VlmClient), so every transport
//! behaves identically from the client's point of view.

mod reqwest;

#[cfg(any(test, feature = "test-utils"))]
mod mock;

use bytes::Bytes;
pub use ::reqwest::Method;
use serde_json::Value;
use url::Url;

#[cfg(any(test, feature = "test-utils"))]
#[cfg_attr(docsrs, doc(cfg(feature = "test-utils")))]
pub use self::mock::MockTransport;
pub use self::reqwest::ReqwestTransport;
use crate::error::BoxedError;

/// A single outgoing HTTP request.
#[derive(Debug, Clone)]
pub struct HttpRequest {
    /// HTTP method.
    pub method: Method,
    /// Fully resolved URL including query string.
    pub url: Url,
    /// Header list in insertion order.
    pub headers: Vec<(String, String)>,
    /// Request body.
    pub body: RequestBody,
}

impl HttpRequest {
    /// Creates a request with no headers and an empty body.
    pub fn new(method: Method, url: Url) -> Self {
        Self {
            method,
            url,
            headers: Vec::new(),
            body: RequestBody::Empty,
        }
    }

    /// Sets a header, replacing any existing value with the same name.
    ///
    /// Header names are compared case-insensitively.
    pub fn set_header(&mut self, name: impl Into<String>, value: impl Into<String>) {
        let name = name.into();
        self.headers.retain(|(n, _)| !n.eq_ignore_ascii_case(&name));
        self.headers.push((name, value.into()));
    }

    /// Builder-style variant of [`set_header`](Self::set_header).
    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.set_header(name, value);
        self
    }

    /// Sets the request body.
    pub fn with_body(mut self, body: RequestBody) -> Self {
        self.body = body;
        self
    }

    /// Returns the value of the first header matching `name`.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(n, _)| n.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    /// Returns the JSON body, if any.
    pub fn json_body(&self) -> Option<&Value> {
        match &self.body {
            RequestBody::Json(value) => Some(value),
            _ => None,
        }
    }

    /// Returns the multipart parts, if any.
    pub fn form_parts(&self) -> Option<&[FormPart]> {
        match &self.body {
            RequestBody::Multipart(parts) => Some(parts),
            _ => None,
        }
    }
}

/// Body of an [`HttpRequest`].
#[derive(Debug, Clone, Default)]
pub enum RequestBody {
    /// No body.
    #[default]
    Empty,
    /// JSON document.
    Json(Value),
    /// `multipart/form-data` parts.
    Multipart(Vec<FormPart>),
}

/// One part of a multipart body.
#[derive(Debug, Clone)]
pub enum FormPart {
    /// Plain text field.
    Text { name: String, value: String },
    /// File field.
    File {
        name: String,
        data: Bytes,
        file_name: String,
        mime_type: Option<String>,
    },
}

impl FormPart {
    /// Returns the field name of this part.
    pub fn name(&self) -> &str {
        match self {
            FormPart::Text { name, .. } | FormPart::File { name, .. } => name,
        }
    }
}

/// Raw response of a single exchange.
#[derive(Debug, Clone)]
pub struct HttpResponse {
    /// HTTP status code.
    pub status: u16,
    /// Raw body bytes.
    pub body: Bytes,
}

impl HttpResponse {
    /// Creates a new response.
    pub fn new(status: u16, body: impl Into<Bytes>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    /// Returns true for 2xx status codes.
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Failure to complete an exchange at all.
#[derive(Debug, thiserror::Error)]
#[error("{message}")]
pub struct TransportError {
    message: String,
    #[source]
    source: Option<BoxedError>,
}

impl TransportError {
    /// Creates a transport error with a message only.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            source: None,
        }
    }

    /// Attaches the underlying cause.
    pub fn with_source(mut self, source: impl Into<BoxedError>) -> Self {
        self.source = Some(source.into());
        self
    }
}

/// Performs HTTP exchanges on behalf of [`VlmClient`](crate::VlmClient).
#[async_trait::async_trait]
pub trait HttpTransport: Send + Sync {
    /// Sends the request and returns the raw response.
    ///
    /// Non-2xx responses are returned as `Ok`; only failures that prevent a
    /// response from being received are errors.
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, TransportError>;
}

//! Default transport backed by `reqwest`.

use std::time::Instant;

use reqwest::Client;
use reqwest::multipart::{Form, Part};

use super::{FormPart, HttpRequest, HttpResponse, HttpTransport, RequestBody, TransportError};
use crate::TRACING_TARGET_TRANSPORT;
use crate::client::VlmConfig;
use crate::error::{Error, Result};

impl From<reqwest::Error> for TransportError {
    fn from(err: reqwest::Error) -> Self {
        let message = if err.is_timeout() {
            "Request timed out".to_string()
        } else if err.is_connect() {
            format!("Connection failed: {err}")
        } else {
            err.to_string()
        };

        TransportError::new(message).with_source(err)
    }
}

/// [`HttpTransport`] implementation using a pooled `reqwest` client.
///
/// Performs no retries. Request and connect timeouts come from
/// [`VlmConfig`].
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    http: Client,
}

impl ReqwestTransport {
    /// Builds the underlying HTTP client from the given configuration.
    pub fn new(config: &VlmConfig) -> Result<Self> {
        let http = Client::builder()
            .timeout(config.timeout)
            .connect_timeout(config.connect_timeout)
            .user_agent(&config.user_agent)
            .build()
            .map_err(|e| Error::transport("Failed to create HTTP client", e))?;

        Ok(Self { http })
    }

    /// Wraps an existing `reqwest` client.
    pub fn from_client(http: Client) -> Self {
        Self { http }
    }

    fn multipart(parts: Vec<FormPart>) -> Result<Form, TransportError> {
        let mut form = Form::new();
        for part in parts {
            form = match part {
                FormPart::Text { name, value } => form.text(name, value),
                FormPart::File {
                    name,
                    data,
                    file_name,
                    mime_type,
                } => {
                    let mut file = Part::bytes(data.to_vec()).file_name(file_name);
                    if let Some(mime) = mime_type {
                        file = file.mime_str(&mime)?;
                    }
                    form.part(name, file)
                }
            };
        }
        Ok(form)
    }
}

#[async_trait::async_trait]
impl HttpTransport for ReqwestTransport {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, TransportError> {
        let started_at = Instant::now();
        let HttpRequest {
            method,
            url,
            headers,
            body,
        } = request;

        tracing::debug!(
            target: TRACING_TARGET_TRANSPORT,
            method = %method,
            url = %url,
            "Sending request"
        );

        let mut builder = self.http.request(method.clone(), url.clone());
        for (name, value) in headers {
            builder = builder.header(name, value);
        }

        builder = match body {
            RequestBody::Empty => builder,
            RequestBody::Json(value) => builder.json(&value),
            RequestBody::Multipart(parts) => builder.multipart(Self::multipart(parts)?),
        };

        let response = builder.send().await.inspect_err(|err| {
            tracing::warn!(
                target: TRACING_TARGET_TRANSPORT,
                method = %method,
                url = %url,
                error = %err,
                elapsed_ms = started_at.elapsed().as_millis(),
                "Request failed"
            );
        })?;

        let status = response.status().as_u16();
        let body = response.bytes().await?;

        tracing::debug!(
            target: TRACING_TARGET_TRANSPORT,
            method = %method,
            url = %url,
            status,
            body_len = body.len(),
            elapsed_ms = started_at.elapsed().as_millis(),
            "Received response"
        );

        Ok(HttpResponse { status, body })
    }
}

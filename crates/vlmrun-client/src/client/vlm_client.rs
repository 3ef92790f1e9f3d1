//! Core client
//!
//! Request construction, error classification and JSON decoding shared by
//! every API operation.

use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde_json::Value;
use url::Url;

use super::{VlmConfig, VlmCredentials};
use crate::TRACING_TARGET_CLIENT;
use crate::error::{Error, Result};
use crate::transport::{HttpRequest, HttpResponse, HttpTransport, Method, ReqwestTransport};

/// Inner client that holds the transport, configuration and credentials.
struct VlmClientInner {
    transport: Arc<dyn HttpTransport>,
    config: VlmConfig,
    credentials: VlmCredentials,
}

impl std::fmt::Debug for VlmClientInner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("VlmClientInner")
            .field("config", &self.config)
            .field("credentials", &self.credentials)
            .finish_non_exhaustive()
    }
}

/// Client for the VLM Run API.
///
/// Cheap to clone; clones share the transport and configuration.
///
/// # Examples
///
/// ```rust,ignore
/// use vlmrun_client::{FilePrediction, VlmClient, VlmConfig, VlmCredentials};
/// use vlmrun_client::types::{Domain, UploadFile};
///
/// let client = VlmClient::new(VlmConfig::default(), VlmCredentials::from_env()?)?;
/// let file = UploadFile::new(std::fs::read("resume.pdf")?, "resume.pdf");
/// let prediction = client
///     .upload_and_predict(&file, &FilePrediction::document("vlm-1", Some(Domain::DocumentResume)))
///     .await?;
/// ```
#[derive(Clone, Debug)]
pub struct VlmClient {
    inner: Arc<VlmClientInner>,
}

impl VlmClient {
    /// Creates a client using the default `reqwest` transport.
    ///
    /// # Errors
    ///
    /// Returns a validation error for empty keys or malformed base URLs, and
    /// a transport error if the HTTP client cannot be created.
    pub fn new(config: VlmConfig, credentials: VlmCredentials) -> Result<Self> {
        tracing::debug!(
            target: TRACING_TARGET_CLIENT,
            base_url = %credentials.base_url(),
            timeout_ms = config.timeout.as_millis(),
            "Creating VLM Run client"
        );

        credentials.validate()?;
        let transport = ReqwestTransport::new(&config)?;
        Ok(Self::with_transport(transport, config, credentials))
    }

    /// Creates a client on top of an arbitrary transport.
    pub fn with_transport(
        transport: impl HttpTransport + 'static,
        config: VlmConfig,
        credentials: VlmCredentials,
    ) -> Self {
        let inner = VlmClientInner {
            transport: Arc::new(transport),
            config,
            credentials,
        };

        Self {
            inner: Arc::new(inner),
        }
    }

    /// Gets the client configuration.
    pub fn config(&self) -> &VlmConfig {
        &self.inner.config
    }

    /// Gets the client credentials.
    pub fn credentials(&self) -> &VlmCredentials {
        &self.inner.credentials
    }

    /// Joins `path` onto the base URL.
    pub(crate) fn endpoint(&self, path: &str) -> Result<Url> {
        let raw = format!(
            "{}/{}",
            self.inner.credentials.base_url(),
            path.trim_start_matches('/')
        );
        Url::parse(&raw).map_err(|e| Error::validation(format!("Invalid URL '{raw}': {e}")))
    }

    /// Creates an authenticated request.
    pub(crate) fn request(&self, method: Method, url: Url) -> HttpRequest {
        HttpRequest::new(method, url)
            .with_header("Accept", "application/json")
            .with_header("Authorization", self.inner.credentials.authorization())
    }

    /// Sends a request and classifies non-2xx responses.
    ///
    /// `context` prefixes transport failures, e.g. `Failed to upload file`.
    pub(crate) async fn execute(&self, request: HttpRequest, context: &str) -> Result<HttpResponse> {
        let method = request.method.clone();
        let path = request.url.path().to_owned();

        let response = self
            .inner
            .transport
            .send(request)
            .await
            .map_err(|e| Error::transport(context, e))?;

        if response.is_success() {
            return Ok(response);
        }

        let error = classify_error(context, &response);
        tracing::warn!(
            target: TRACING_TARGET_CLIENT,
            method = %method,
            path = %path,
            status = response.status,
            category = error.category(),
            error = %error,
            "API request failed"
        );

        Err(error)
    }

    /// Sends a request and decodes the JSON response body.
    pub(crate) async fn execute_json<T: DeserializeOwned>(
        &self,
        request: HttpRequest,
        context: &str,
    ) -> Result<T> {
        let response = self.execute(request, context).await?;
        serde_json::from_slice(&response.body).map_err(|e| Error::transport(context, e))
    }

    /// Checks that the API answers `GET /health` with a 2xx status.
    pub async fn health_check(&self) -> Result<()> {
        let url = self.endpoint("health")?;
        let request = self.request(Method::GET, url);
        self.execute(request, "Health check failed").await?;

        tracing::debug!(target: TRACING_TARGET_CLIENT, "Health check passed");
        Ok(())
    }
}

/// Maps a non-2xx response onto [`Error::Api`] or [`Error::Transport`].
fn classify_error(context: &str, response: &HttpResponse) -> Error {
    let detail = serde_json::from_slice::<Value>(&response.body)
        .ok()
        .and_then(|mut body| body.get_mut("detail").map(Value::take));

    match detail {
        Some(Value::String(detail)) => Error::api(response.status, detail),
        Some(Value::Null) | None => Error::http_status(context, response.status),
        Some(detail) => Error::api(response.status, detail.to_string()),
    }
}

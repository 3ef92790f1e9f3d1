//! Prompt-based generation.
//!
//! Unlike the file-based endpoints these calls return the raw JSON answer
//! without a prediction id, so nothing is polled.

use serde::Serialize;
use serde_json::Value;

use super::VlmClient;
use crate::TRACING_TARGET_CLIENT;
use crate::error::{Error, Result};
use crate::transport::{Method, RequestBody};
use crate::types::{DocumentPromptRequest, ImagePromptRequest};

const PROMPT_CONTEXT: &str = "HTTP request failed";

impl VlmClient {
    async fn submit_prompt<T: Serialize>(&self, path: &str, payload: &T) -> Result<Value> {
        let body =
            serde_json::to_value(payload).map_err(|e| Error::transport(PROMPT_CONTEXT, e))?;
        let url = self.endpoint(path)?;
        let request = self
            .request(Method::POST, url)
            .with_body(RequestBody::Json(body));

        self.execute_json(request, PROMPT_CONTEXT).await
    }

    /// Generates text from a prompt via `POST /document/generate`.
    ///
    /// # Errors
    ///
    /// Fails with a transport error if the answer carries no `text`.
    pub async fn generate_text(&self, request: &DocumentPromptRequest) -> Result<Value> {
        let value = self.submit_prompt("document/generate", request).await?;

        let has_text = match value.get("text") {
            Some(Value::String(text)) => !text.is_empty(),
            Some(other) => !other.is_null(),
            None => false,
        };
        if !has_text {
            return Err(Error::invalid_response("Missing text content"));
        }

        tracing::debug!(
            target: TRACING_TARGET_CLIENT,
            max_tokens = request.max_tokens,
            "Text generated"
        );

        Ok(value)
    }

    /// Generates images from a prompt via `POST /image/generate`.
    ///
    /// # Errors
    ///
    /// Fails with a transport error if `images` is missing or empty.
    pub async fn generate_images(&self, request: &ImagePromptRequest) -> Result<Value> {
        let value = self.submit_prompt("image/generate", request).await?;

        let count = value
            .get("images")
            .and_then(Value::as_array)
            .map_or(0, Vec::len);
        if count == 0 {
            return Err(Error::invalid_response("No images were generated"));
        }

        tracing::debug!(target: TRACING_TARGET_CLIENT, count, "Images generated");

        Ok(value)
    }
}

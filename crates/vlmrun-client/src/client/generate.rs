//! Prediction endpoints.

use serde::Serialize;

use super::VlmClient;
use crate::TRACING_TARGET_CLIENT;
use crate::error::{Error, Result};
use crate::transport::{Method, RequestBody};
use crate::types::{
    AudioRequest, DocumentEmbeddingRequest, DocumentRequest, ImageRequest, PredictionResponse,
    WebpageRequest,
};

impl VlmClient {
    async fn submit<T: Serialize>(
        &self,
        path: &str,
        payload: &T,
        context: &str,
    ) -> Result<PredictionResponse> {
        let body = serde_json::to_value(payload).map_err(|e| Error::transport(context, e))?;
        let url = self.endpoint(path)?;
        let request = self
            .request(Method::POST, url)
            .with_body(RequestBody::Json(body));

        let prediction: PredictionResponse = self.execute_json(request, context).await?;

        tracing::debug!(
            target: TRACING_TARGET_CLIENT,
            path,
            response_id = %prediction.id,
            status = %prediction.status,
            "Prediction submitted"
        );

        Ok(prediction)
    }

    /// Submits an uploaded document to `POST /document/generate`.
    pub async fn generate_document(&self, request: &DocumentRequest) -> Result<PredictionResponse> {
        self.submit("document/generate", request, "Failed to generate document")
            .await
    }

    /// Submits an uploaded audio file to `POST /audio/generate`.
    pub async fn generate_audio(&self, request: &AudioRequest) -> Result<PredictionResponse> {
        self.submit("audio/generate", request, "Failed to generate audio")
            .await
    }

    /// Submits an inline image to `POST /image/generate`.
    pub async fn generate_image(&self, request: &ImageRequest) -> Result<PredictionResponse> {
        self.submit("image/generate", request, "Failed to generate image")
            .await
    }

    /// Submits a URL to `POST /web/generate`.
    pub async fn generate_webpage(&self, request: &WebpageRequest) -> Result<PredictionResponse> {
        self.submit("web/generate", request, "Failed to generate webpage")
            .await
    }

    /// Requests embeddings of an uploaded document.
    pub async fn document_embedding(
        &self,
        request: &DocumentEmbeddingRequest,
    ) -> Result<PredictionResponse> {
        self.submit(
            "experimental/document/embeddings",
            request,
            "Failed to generate document embedding",
        )
        .await
    }

    /// Requests embeddings of an inline image.
    pub async fn image_embedding(&self, request: &ImageRequest) -> Result<PredictionResponse> {
        self.submit(
            "experimental/image/embeddings",
            request,
            "Failed to generate image embedding",
        )
        .await
    }

    /// Fetches the current state of a prediction via `GET /response/{id}`.
    pub async fn get_response(&self, response_id: &str) -> Result<PredictionResponse> {
        let mut url = self.endpoint("response")?;
        url.path_segments_mut()
            .map_err(|_| Error::validation("Base URL cannot carry a path"))?
            .push(response_id);

        let request = self.request(Method::GET, url);
        self.execute_json(request, "Failed to get document response")
            .await
    }
}

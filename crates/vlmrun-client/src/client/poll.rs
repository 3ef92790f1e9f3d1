//! Upload-submit-poll sequence.

use super::VlmClient;
use crate::error::{Error, Result};
use crate::types::{
    AudioRequest, DocumentEmbeddingRequest, DocumentRequest, Domain, PredictionResponse,
    UploadFile,
};
use crate::{TRACING_TARGET_CLIENT, TRACING_TARGET_POLL};

/// File-based prediction submitted after an upload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FilePrediction {
    /// `POST /document/generate`.
    Document {
        model: String,
        domain: Option<Domain>,
    },
    /// `POST /audio/generate`.
    Audio {
        model: String,
        domain: Option<Domain>,
    },
    /// `POST /experimental/document/embeddings`.
    DocumentEmbedding { model: String },
}

impl FilePrediction {
    /// Document generation with an optional domain.
    pub fn document(model: impl Into<String>, domain: Option<Domain>) -> Self {
        Self::Document {
            model: model.into(),
            domain,
        }
    }

    /// Audio generation with an optional domain.
    pub fn audio(model: impl Into<String>, domain: Option<Domain>) -> Self {
        Self::Audio {
            model: model.into(),
            domain,
        }
    }

    /// Document embeddings.
    pub fn document_embedding(model: impl Into<String>) -> Self {
        Self::DocumentEmbedding {
            model: model.into(),
        }
    }
}

impl VlmClient {
    /// Polls `GET /response/{id}` until the prediction completes.
    ///
    /// Performs at most `max_attempts` checks with a fixed sleep between
    /// them and no sleep after the last one.
    ///
    /// # Errors
    ///
    /// [`Error::Timeout`] once the ceiling is reached, [`Error::JobFailed`]
    /// on a `failed` status when the policy treats it as terminal, or the
    /// error of any status check.
    pub async fn wait_for_completion(&self, response_id: &str) -> Result<PredictionResponse> {
        let policy = self.config().poll;

        for attempt in 1..=policy.max_attempts {
            let prediction = self.get_response(response_id).await?;

            tracing::debug!(
                target: TRACING_TARGET_POLL,
                response_id,
                attempt,
                status = %prediction.status,
                "Checked prediction status"
            );

            if prediction.is_completed() {
                return Ok(prediction);
            }

            if prediction.status.is_failed() {
                if policy.failed_is_terminal {
                    return Err(Error::job_failed(response_id));
                }
                tracing::warn!(
                    target: TRACING_TARGET_POLL,
                    response_id,
                    attempt,
                    "Prediction reported failed, polling continues"
                );
            }

            if attempt < policy.max_attempts {
                tokio::time::sleep(policy.interval).await;
            }
        }

        tracing::warn!(
            target: TRACING_TARGET_POLL,
            response_id,
            attempts = policy.max_attempts,
            "Response processing timed out"
        );

        Err(Error::timeout(response_id, policy.max_attempts))
    }

    /// Returns `initial` if already completed, otherwise polls for it.
    pub async fn resolve(&self, initial: PredictionResponse) -> Result<PredictionResponse> {
        if initial.is_completed() {
            return Ok(initial);
        }

        if initial.status.is_failed() && self.config().poll.failed_is_terminal {
            return Err(Error::job_failed(initial.id));
        }

        self.wait_for_completion(&initial.id).await
    }

    /// Uploads `file`, submits `prediction` against it and waits for the
    /// result.
    pub async fn upload_and_predict(
        &self,
        file: &UploadFile,
        prediction: &FilePrediction,
    ) -> Result<PredictionResponse> {
        let uploaded = self.upload_file(file).await?;

        let initial = match prediction {
            FilePrediction::Document { model, domain } => {
                let request = DocumentRequest::new(&uploaded.id, model, *domain);
                self.generate_document(&request).await?
            }
            FilePrediction::Audio { model, domain } => {
                let request = AudioRequest::new(&uploaded.id, model, *domain);
                self.generate_audio(&request).await?
            }
            FilePrediction::DocumentEmbedding { model } => {
                let request = DocumentEmbeddingRequest::new(&uploaded.id, model);
                self.document_embedding(&request).await?
            }
        };

        tracing::debug!(
            target: TRACING_TARGET_CLIENT,
            file_id = %uploaded.id,
            response_id = %initial.id,
            "Waiting for prediction"
        );

        self.resolve(initial).await
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use bytes::Bytes;
    use serde_json::json;

    use super::*;
    use crate::error::ErrorKind;
    use crate::transport::MockTransport;
    use crate::{PollPolicy, VlmConfig, VlmCredentials};

    fn client_with(mock: &MockTransport, poll: PollPolicy) -> VlmClient {
        let config = VlmConfig::builder().with_poll(poll).build().unwrap();
        VlmClient::with_transport(mock.clone(), config, VlmCredentials::new("k"))
    }

    fn client(mock: &MockTransport) -> VlmClient {
        client_with(mock, PollPolicy::default())
    }

    fn file() -> UploadFile {
        UploadFile::new(Bytes::from_static(b"%PDF-1.7"), "doc.pdf")
    }

    fn push_upload(mock: &MockTransport) {
        mock.push_json(200, json!({"id": "f-1", "filename": "doc.pdf"}));
    }

    fn pending(id: &str) -> serde_json::Value {
        json!({"id": id, "status": "pending"})
    }

    #[tokio::test(start_paused = true)]
    async fn test_immediate_completion_skips_polling() {
        let mock = MockTransport::new();
        push_upload(&mock);
        mock.push_json(200, json!({"id": "r-1", "status": "completed", "response": {"ok": true}}));

        let prediction = client(&mock)
            .upload_and_predict(&file(), &FilePrediction::document("vlm-1", None))
            .await
            .unwrap();

        assert_eq!(prediction.response, Some(json!({"ok": true})));
        assert!(mock.requests_to("/response/r-1").is_empty());
        assert_eq!(mock.request_count(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_nth_poll_completes() {
        let mock = MockTransport::new();
        push_upload(&mock);
        mock.push_json(200, pending("r-1"));
        mock.push_json(200, pending("r-1"));
        mock.push_json(200, json!({"id": "r-1", "status": "running"}));
        mock.push_json(200, json!({"id": "r-1", "status": "completed", "response": {"n": 3}}));

        let started = tokio::time::Instant::now();
        let prediction = client(&mock)
            .upload_and_predict(&file(), &FilePrediction::document("vlm-1", None))
            .await
            .unwrap();

        assert_eq!(prediction.response, Some(json!({"n": 3})));
        assert_eq!(mock.requests_to("/response/r-1").len(), 3);
        assert_eq!(started.elapsed(), Duration::from_millis(8000));
    }

    #[tokio::test(start_paused = true)]
    async fn test_times_out_after_ceiling() {
        let mock = MockTransport::new();
        push_upload(&mock);
        mock.push_json(200, pending("r-1"));
        for _ in 0..30 {
            mock.push_json(200, pending("r-1"));
        }

        let started = tokio::time::Instant::now();
        let err = client(&mock)
            .upload_and_predict(&file(), &FilePrediction::document("vlm-1", None))
            .await
            .unwrap_err();

        assert_eq!(err.kind(), ErrorKind::Timeout);
        assert_eq!(mock.requests_to("/response/r-1").len(), 30);
        assert_eq!(started.elapsed(), Duration::from_millis(4000 * 29));
    }

    #[tokio::test(start_paused = true)]
    async fn test_upload_failure_stops_sequence() {
        let mock = MockTransport::new();
        mock.push_failure("connection reset by peer");

        let err = client(&mock)
            .upload_and_predict(&file(), &FilePrediction::document("vlm-1", None))
            .await
            .unwrap_err();

        assert_eq!(err.kind(), ErrorKind::Transport);
        assert_eq!(
            err.to_string(),
            "Failed to upload file: connection reset by peer"
        );
        assert_eq!(mock.request_count(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_failed_keeps_polling_by_default() {
        let mock = MockTransport::new();
        push_upload(&mock);
        mock.push_json(200, pending("r-1"));
        mock.push_json(200, json!({"id": "r-1", "status": "failed"}));
        mock.push_json(200, json!({"id": "r-1", "status": "completed"}));

        let prediction = client(&mock)
            .upload_and_predict(&file(), &FilePrediction::audio("vlm-1", None))
            .await
            .unwrap();

        assert!(prediction.is_completed());
        assert_eq!(mock.requests_to("/audio/generate").len(), 1);
        assert_eq!(mock.requests_to("/response/r-1").len(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_failed_is_terminal() {
        let mock = MockTransport::new();
        push_upload(&mock);
        mock.push_json(200, pending("r-1"));
        mock.push_json(200, json!({"id": "r-1", "status": "failed"}));
        mock.push_json(200, json!({"id": "r-1", "status": "completed"}));

        let policy = PollPolicy::default().with_failed_is_terminal(true);
        let err = client_with(&mock, policy)
            .upload_and_predict(&file(), &FilePrediction::document_embedding("vlm-1"))
            .await
            .unwrap_err();

        assert_eq!(err.kind(), ErrorKind::JobFailed);
        assert_eq!(mock.requests_to("/response/r-1").len(), 1);
        assert_eq!(mock.remaining(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_poll_error_propagates() {
        let mock = MockTransport::new();
        mock.push_json(404, json!({"detail": "Response not found"}));

        let err = client(&mock).wait_for_completion("r-404").await.unwrap_err();
        assert_eq!(err.to_string(), "Response not found");
    }
}

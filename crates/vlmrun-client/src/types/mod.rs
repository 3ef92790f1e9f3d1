//! Wire types for the VLM Run API.

mod domain;
mod request;
mod response;

pub use domain::Domain;
pub use request::{
    AudioRequest, DEFAULT_IMAGE_COUNT, DEFAULT_IMAGE_SIZE, DEFAULT_MAX_TOKENS, DEFAULT_MODEL,
    DEFAULT_TEMPERATURE, DocumentEmbeddingRequest, DocumentPromptRequest, DocumentRequest,
    ImagePromptRequest, ImageRequest, UploadFile, WebMode, WebpageRequest, data_url,
};
pub use response::{FileResponse, JobStatus, PredictionResponse};

//! Request payloads sent to the API.

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use bytes::Bytes;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString, IntoStaticStr};

use super::Domain;

/// Default model identifier.
pub const DEFAULT_MODEL: &str = "vlm-1";

/// File-based generation request for `/document/generate`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocumentRequest {
    pub file_id: String,
    pub model: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub domain: Option<Domain>,
    #[serde(default)]
    pub batch: bool,
}

impl DocumentRequest {
    /// Creates a non-batch request.
    pub fn new(file_id: impl Into<String>, model: impl Into<String>, domain: Option<Domain>) -> Self {
        Self {
            file_id: file_id.into(),
            model: model.into(),
            domain,
            batch: false,
        }
    }
}

/// `/audio/generate` shares the document request shape.
pub type AudioRequest = DocumentRequest;

/// Request for `/experimental/document/embeddings`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocumentEmbeddingRequest {
    pub file_id: String,
    pub model: String,
    #[serde(default)]
    pub batch: bool,
}

impl DocumentEmbeddingRequest {
    /// Creates a non-batch request.
    pub fn new(file_id: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            file_id: file_id.into(),
            model: model.into(),
            batch: false,
        }
    }
}

/// Inline image request for `/image/generate` and
/// `/experimental/image/embeddings`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImageRequest {
    /// `data:<mime>;base64,<payload>` URL.
    pub image: String,
    pub model: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub domain: Option<Domain>,
}

impl ImageRequest {
    /// Encodes raw image bytes as a data URL.
    pub fn from_bytes(
        data: &[u8],
        mime_type: &str,
        model: impl Into<String>,
        domain: Option<Domain>,
    ) -> Self {
        Self {
            image: data_url(data, mime_type),
            model: model.into(),
            domain,
        }
    }
}

/// Default token budget of prompt-based document generation.
pub const DEFAULT_MAX_TOKENS: u32 = 1000;

/// Default sampling temperature of prompt-based document generation.
pub const DEFAULT_TEMPERATURE: f64 = 0.7;

/// Default number of prompt-generated images.
pub const DEFAULT_IMAGE_COUNT: u32 = 1;

/// Default width and height of prompt-generated images, in pixels.
pub const DEFAULT_IMAGE_SIZE: u32 = 512;

/// Prompt-based request for `/document/generate`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocumentPromptRequest {
    pub prompt: String,
    pub max_tokens: u32,
    pub temperature: f64,
}

impl DocumentPromptRequest {
    pub fn new(prompt: impl Into<String>) -> Self {
        Self {
            prompt: prompt.into(),
            max_tokens: DEFAULT_MAX_TOKENS,
            temperature: DEFAULT_TEMPERATURE,
        }
    }

    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = max_tokens;
        self
    }

    pub fn with_temperature(mut self, temperature: f64) -> Self {
        self.temperature = temperature;
        self
    }
}

/// Prompt-based request for `/image/generate`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImagePromptRequest {
    pub prompt: String,
    pub num_images: u32,
    pub width: u32,
    pub height: u32,
}

impl ImagePromptRequest {
    pub fn new(prompt: impl Into<String>) -> Self {
        Self {
            prompt: prompt.into(),
            num_images: DEFAULT_IMAGE_COUNT,
            width: DEFAULT_IMAGE_SIZE,
            height: DEFAULT_IMAGE_SIZE,
        }
    }

    pub fn with_num_images(mut self, num_images: u32) -> Self {
        self.num_images = num_images;
        self
    }

    pub fn with_size(mut self, width: u32, height: u32) -> Self {
        self.width = width;
        self.height = height;
        self
    }
}

/// Builds a `data:` URL from raw bytes.
pub fn data_url(data: &[u8], mime_type: &str) -> String {
    format!("data:{mime_type};base64,{}", STANDARD.encode(data))
}

/// Processing mode of webpage agents.
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    IntoStaticStr
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum WebMode {
    Fast,
    #[default]
    Accurate,
}

/// Request for `/web/generate`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WebpageRequest {
    pub url: String,
    pub model: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub domain: Option<Domain>,
    #[serde(default)]
    pub mode: WebMode,
}

/// A binary payload destined for `/files`.
#[derive(Debug, Clone, PartialEq)]
pub struct UploadFile {
    pub data: Bytes,
    pub file_name: String,
    pub mime_type: Option<String>,
}

impl UploadFile {
    /// Creates an upload without a MIME type.
    pub fn new(data: impl Into<Bytes>, file_name: impl Into<String>) -> Self {
        Self {
            data: data.into(),
            file_name: file_name.into(),
            mime_type: None,
        }
    }

    /// Sets the MIME type.
    pub fn with_mime_type(mut self, mime_type: impl Into<String>) -> Self {
        self.mime_type = Some(mime_type.into());
        self
    }
}

//! Host items flowing through a node.

use std::collections::HashMap;

use bytes::Bytes;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use vlmrun_client::types::UploadFile;

use crate::error::{Error, Result};

/// Binary property read when none is configured.
pub const DEFAULT_BINARY_PROPERTY: &str = "data";

/// MIME type assumed when an attachment carries none.
pub const DEFAULT_MIME_TYPE: &str = "application/octet-stream";

/// A named binary attachment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BinaryData {
    pub data: Bytes,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mime_type: Option<String>,
}

impl BinaryData {
    pub fn new(data: impl Into<Bytes>) -> Self {
        Self {
            data: data.into(),
            file_name: None,
            mime_type: None,
        }
    }

    pub fn with_file_name(mut self, file_name: impl Into<String>) -> Self {
        self.file_name = Some(file_name.into());
        self
    }

    pub fn with_mime_type(mut self, mime_type: impl Into<String>) -> Self {
        self.mime_type = Some(mime_type.into());
        self
    }

    /// Returns the MIME type or `application/octet-stream`.
    pub fn mime_type_or_default(&self) -> &str {
        self.mime_type.as_deref().unwrap_or(DEFAULT_MIME_TYPE)
    }

    /// Converts the attachment into an upload, naming it `file` if unnamed.
    pub fn to_upload(&self) -> UploadFile {
        UploadFile {
            data: self.data.clone(),
            file_name: self.file_name.clone().unwrap_or_else(|| "file".to_owned()),
            mime_type: self.mime_type.clone(),
        }
    }
}

/// One unit of work: a JSON object plus optional binary attachments.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Item {
    pub json: Value,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub binary: Option<HashMap<String, BinaryData>>,
}

impl Item {
    /// Creates an item without attachments.
    pub fn new(json: Value) -> Self {
        Self { json, binary: None }
    }

    /// Creates an item with an empty JSON object.
    pub fn empty() -> Self {
        Self::new(Value::Object(Map::new()))
    }

    /// Adds a binary attachment under `property`.
    pub fn with_binary(mut self, property: impl Into<String>, data: BinaryData) -> Self {
        self.binary
            .get_or_insert_with(HashMap::new)
            .insert(property.into(), data);
        self
    }

    /// Looks up the attachment stored under `property`.
    pub fn binary(&self, property: &str) -> Result<&BinaryData> {
        let binary = self
            .binary
            .as_ref()
            .ok_or_else(|| Error::MissingBinary("No binary data exists on item!".to_owned()))?;

        binary.get(property).ok_or_else(|| {
            Error::MissingBinary(format!(
                "No binary data property \"{property}\" exists on item!"
            ))
        })
    }

    /// Creates the output item emitted for a failure under continue-on-fail.
    pub fn error(message: impl Into<String>) -> Self {
        Self::new(serde_json::json!({ "error": message.into() }))
    }
}

//! Input files to node items.

use std::path::Path;

use anyhow::Context;
use serde_json::json;
use vlmrun_client::KeyValue;
use vlmrun_nodes::{BinaryData, DEFAULT_MIME_TYPE, Item};

/// Reads each file into an item with its content under `property`.
///
/// Without files a single empty item is returned so operations that need
/// no binary input still run once.
pub async fn load_items<P: AsRef<Path>>(paths: &[P], property: &str) -> anyhow::Result<Vec<Item>> {
    if paths.is_empty() {
        return Ok(vec![Item::empty()]);
    }

    let mut items = Vec::with_capacity(paths.len());
    for path in paths {
        let path = path.as_ref();
        let data = tokio::fs::read(path)
            .await
            .with_context(|| format!("failed to read {}", path.display()))?;

        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "file".to_owned());
        let mime_type = mime_type(path);

        let binary = BinaryData::new(data)
            .with_file_name(file_name.as_str())
            .with_mime_type(mime_type);
        let item = Item::new(json!({ "fileName": file_name, "mimeType": mime_type }))
            .with_binary(property, binary);
        items.push(item);
    }

    Ok(items)
}

/// Determines the MIME type from the file extension.
pub fn mime_type(path: &Path) -> &'static str {
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_lowercase)
        .unwrap_or_default();

    match extension.as_str() {
        "pdf" => "application/pdf",
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "tiff" | "tif" => "image/tiff",
        "bmp" => "image/bmp",
        "gif" => "image/gif",
        "webp" => "image/webp",
        "mp3" => "audio/mpeg",
        "wav" => "audio/wav",
        "m4a" => "audio/mp4",
        "flac" => "audio/flac",
        "ogg" => "audio/ogg",
        "mp4" => "video/mp4",
        "pptx" => "application/vnd.openxmlformats-officedocument.presentationml.presentation",
        "docx" => "application/vnd.openxmlformats-officedocument.wordprocessingml.document",
        "json" => "application/json",
        "txt" => "text/plain",
        _ => DEFAULT_MIME_TYPE,
    }
}

/// Parses a `KEY=VALUE` argument.
pub fn parse_key_value(raw: &str) -> Result<KeyValue, String> {
    let (key, value) = raw
        .split_once('=')
        .ok_or_else(|| format!("expected KEY=VALUE, got '{raw}'"))?;

    let key = key.trim();
    if key.is_empty() {
        return Err(format!("empty key in '{raw}'"));
    }

    Ok(KeyValue::new(key, value))
}

//! File upload and listing.

use super::VlmClient;
use crate::TRACING_TARGET_CLIENT;
use crate::error::Result;
use crate::transport::{FormPart, Method, RequestBody};
use crate::types::{FileResponse, UploadFile};

/// Default page size of [`VlmClient::list_files`].
pub const DEFAULT_FILE_LIMIT: u32 = 10;

impl VlmClient {
    /// Uploads a file via `POST /files` as multipart field `file`.
    pub async fn upload_file(&self, file: &UploadFile) -> Result<FileResponse> {
        tracing::debug!(
            target: TRACING_TARGET_CLIENT,
            file_name = %file.file_name,
            size = file.data.len(),
            "Uploading file"
        );

        let part = FormPart::File {
            name: "file".to_owned(),
            data: file.data.clone(),
            file_name: file.file_name.clone(),
            mime_type: file.mime_type.clone(),
        };

        let url = self.endpoint("files")?;
        let request = self
            .request(Method::POST, url)
            .with_body(RequestBody::Multipart(vec![part]));

        let uploaded: FileResponse = self
            .execute_json(request, "Failed to upload file")
            .await?;

        tracing::info!(
            target: TRACING_TARGET_CLIENT,
            file_id = %uploaded.id,
            bytes = uploaded.bytes(),
            "File uploaded"
        );

        Ok(uploaded)
    }

    /// Lists uploaded files via `GET /files?skip=..&limit=..`.
    pub async fn list_files(&self, skip: u32, limit: u32) -> Result<Vec<FileResponse>> {
        let mut url = self.endpoint("files")?;
        url.query_pairs_mut()
            .append_pair("skip", &skip.to_string())
            .append_pair("limit", &limit.to_string());

        let request = self.request(Method::GET, url);
        let files: Vec<FileResponse> = self
            .execute_json(request, "Failed to fetch files")
            .await?;

        tracing::debug!(
            target: TRACING_TARGET_CLIENT,
            skip,
            limit,
            count = files.len(),
            "Listed files"
        );

        Ok(files)
    }
}

//! Node executor.

use serde_json::{Value, json};
use vlmrun_client::types::{ImageRequest, WebpageRequest};
use vlmrun_client::{FilePrediction, PassthroughBody, PassthroughRequest, VlmClient};

use crate::TRACING_TARGET;
use crate::error::{Error, Result};
use crate::item::Item;
use crate::parameters::{
    EmbeddingRequest, FileRequest, HttpBodyTemplate, HttpRequestTemplate, NodeParameters,
    NodeRequest,
};

/// Per-run execution options.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ExecuteOptions {
    /// Emit `{"error": ...}` for failing items instead of aborting the run.
    pub continue_on_fail: bool,
}

impl ExecuteOptions {
    pub fn with_continue_on_fail(mut self, continue_on_fail: bool) -> Self {
        self.continue_on_fail = continue_on_fail;
        self
    }
}

/// A configured VLM Run node.
///
/// Processes items strictly in order and emits exactly one output item per
/// input item.
#[derive(Debug, Clone)]
pub struct VlmRunNode {
    client: VlmClient,
    request: NodeRequest,
}

impl VlmRunNode {
    /// Creates a node from an already validated request.
    pub fn new(client: VlmClient, request: NodeRequest) -> Self {
        Self { client, request }
    }

    /// Validates raw host parameters and creates a node.
    pub fn from_parameters(client: VlmClient, parameters: NodeParameters) -> Result<Self> {
        let request = NodeRequest::try_from(parameters)?;
        Ok(Self::new(client, request))
    }

    /// Gets the configured request.
    pub fn request(&self) -> &NodeRequest {
        &self.request
    }

    /// Runs the configured operation over every item.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Item`] for the first failing item unless
    /// `continue_on_fail` is set.
    pub async fn execute(&self, items: &[Item], options: ExecuteOptions) -> Result<Vec<Item>> {
        let operation = self.request.operation();
        tracing::debug!(
            target: TRACING_TARGET,
            operation = %operation,
            items = items.len(),
            continue_on_fail = options.continue_on_fail,
            "Executing node"
        );

        let mut outputs = Vec::with_capacity(items.len());
        for (index, item) in items.iter().enumerate() {
            match self.execute_item(item).await {
                Ok(json) => outputs.push(Item::new(json)),
                Err(error) if options.continue_on_fail => {
                    tracing::warn!(
                        target: TRACING_TARGET,
                        operation = %operation,
                        index,
                        error = %error,
                        "Item failed, continuing"
                    );
                    outputs.push(Item::error(error.item_message()));
                }
                Err(error) => {
                    tracing::error!(
                        target: TRACING_TARGET,
                        operation = %operation,
                        index,
                        error = %error,
                        "Item failed"
                    );
                    return Err(Error::item(index, error));
                }
            }
        }

        tracing::info!(
            target: TRACING_TARGET,
            operation = %operation,
            items = outputs.len(),
            "Node executed"
        );

        Ok(outputs)
    }

    async fn execute_item(&self, item: &Item) -> Result<Value> {
        let client = &self.client;

        let value = match &self.request {
            NodeRequest::Document {
                operation,
                model,
                binary_property,
            } => {
                let file = item.binary(binary_property)?.to_upload();
                let prediction = FilePrediction::document(model, operation.domain());
                client
                    .upload_and_predict(&file, &prediction)
                    .await?
                    .into_value()?
            }
            NodeRequest::Audio {
                operation,
                model,
                binary_property,
            } => {
                let file = item.binary(binary_property)?.to_upload();
                let prediction = FilePrediction::audio(model, operation.domain());
                client
                    .upload_and_predict(&file, &prediction)
                    .await?
                    .into_value()?
            }
            NodeRequest::Image {
                operation,
                model,
                binary_property,
            } => {
                let binary = item.binary(binary_property)?;
                let request = ImageRequest::from_bytes(
                    &binary.data,
                    binary.mime_type_or_default(),
                    model,
                    operation.domain(),
                );
                client.generate_image(&request).await?.into_value()?
            }
            NodeRequest::Agent {
                operation,
                model,
                url,
                mode,
            } => {
                let request = WebpageRequest {
                    url: url.clone(),
                    model: model.clone(),
                    domain: operation.domain(),
                    mode: *mode,
                };
                client.generate_webpage(&request).await?.into_value()?
            }
            NodeRequest::File(FileRequest::List { skip, limit }) => {
                let files = serde_json::to_value(client.list_files(*skip, *limit).await?)?;
                json!({ "files": files })
            }
            NodeRequest::File(FileRequest::Upload { binary_property }) => {
                let file = item.binary(binary_property)?.to_upload();
                let uploaded = client.upload_file(&file).await?;
                serde_json::to_value(uploaded)?
            }
            NodeRequest::Experimental(EmbeddingRequest::Document {
                model,
                binary_property,
            }) => {
                let file = item.binary(binary_property)?.to_upload();
                let prediction = FilePrediction::document_embedding(model);
                client
                    .upload_and_predict(&file, &prediction)
                    .await?
                    .into_value()?
            }
            NodeRequest::Experimental(EmbeddingRequest::Image {
                model,
                binary_property,
            }) => {
                let binary = item.binary(binary_property)?;
                let request = ImageRequest::from_bytes(
                    &binary.data,
                    binary.mime_type_or_default(),
                    model,
                    None,
                );
                client.image_embedding(&request).await?.into_value()?
            }
            NodeRequest::Http(template) => {
                let request = passthrough_request(template, item)?;
                client.passthrough(request).await?
            }
            NodeRequest::DocumentGeneration(request) => client.generate_text(request).await?,
            NodeRequest::ImageGeneration(request) => client.generate_images(request).await?,
        };

        Ok(value)
    }
}

/// Resolves an HTTP template against one item.
fn passthrough_request(template: &HttpRequestTemplate, item: &Item) -> Result<PassthroughRequest> {
    let body = match &template.body {
        None => None,
        Some(HttpBodyTemplate::Json(fields)) => Some(PassthroughBody::Json(fields.clone())),
        Some(HttpBodyTemplate::Form {
            fields,
            binary_property,
        }) => Some(PassthroughBody::Form {
            fields: fields.clone(),
            file: Some(item.binary(binary_property)?.to_upload()),
        }),
    };

    Ok(PassthroughRequest {
        method: template.method,
        path: template.path.clone(),
        headers: template.headers.clone(),
        query: template.query.clone(),
        body,
    })
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use serde_json::json;
    use vlmrun_client::transport::FormPart;
    use vlmrun_client::{MockTransport, PollPolicy, VlmConfig, VlmCredentials};

    use super::*;
    use crate::item::BinaryData;
    use crate::operation::Operation;

    fn node(mock: &MockTransport, parameters: serde_json::Value) -> VlmRunNode {
        let config = VlmConfig::builder()
            .with_poll(PollPolicy::default().with_interval(Duration::from_millis(10)))
            .build()
            .unwrap();
        let client = VlmClient::with_transport(mock.clone(), config, VlmCredentials::new("k"));
        let parameters: NodeParameters = serde_json::from_value(parameters).unwrap();
        VlmRunNode::from_parameters(client, parameters).unwrap()
    }

    fn pdf_item(name: &str) -> Item {
        Item::empty().with_binary(
            "data",
            BinaryData::new(&b"%PDF-1.7"[..])
                .with_file_name(name)
                .with_mime_type("application/pdf"),
        )
    }

    #[tokio::test(start_paused = true)]
    async fn test_resume_parser_end_to_end() {
        let mock = MockTransport::new();
        mock.push_json(200, json!({"id": "f-1", "filename": "cv.pdf"}));
        mock.push_json(200, json!({"id": "r-1", "status": "pending"}));
        mock.push_json(
            200,
            json!({"id": "r-1", "status": "completed", "response": {"name": "Ada"}}),
        );

        let node = node(&mock, json!({"resource": "documentAi", "operation": "resumeParser"}));
        let outputs = node
            .execute(&[pdf_item("cv.pdf")], ExecuteOptions::default())
            .await
            .unwrap();

        assert_eq!(outputs.len(), 1);
        assert_eq!(outputs[0].json["status"], json!("completed"));
        assert_eq!(outputs[0].json["response"], json!({"name": "Ada"}));

        assert_eq!(mock.requests_to("/files").len(), 1);
        let generate = mock.requests_to("/document/generate");
        assert_eq!(generate.len(), 1);
        assert_eq!(
            generate[0].json_body().unwrap()["domain"],
            json!("document.resume")
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_continue_on_fail() {
        let mock = MockTransport::new();
        mock.push_json(200, json!({"id": "f-1"}));
        mock.push_json(200, json!({"id": "f-3"}));

        let node = node(&mock, json!({"resource": "file", "operation": "fileUpload"}));
        let items = [pdf_item("a.pdf"), Item::empty(), pdf_item("c.pdf")];
        let outputs = node
            .execute(&items, ExecuteOptions::default().with_continue_on_fail(true))
            .await
            .unwrap();

        assert_eq!(outputs.len(), 3);
        assert_eq!(outputs[0].json["id"], json!("f-1"));
        assert_eq!(
            outputs[1].json,
            json!({"error": "No binary data exists on item!"})
        );
        assert_eq!(outputs[2].json["id"], json!("f-3"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_continue_on_fail_with_api_error() {
        let mock = MockTransport::new();
        mock.push_json(200, json!({"id": "f-1"}));
        mock.push_json(422, json!({"detail": "File is too large"}));
        mock.push_json(200, json!({"id": "f-3"}));

        let node = node(&mock, json!({"resource": "file", "operation": "fileUpload"}));
        let items = [pdf_item("a.pdf"), pdf_item("b.pdf"), pdf_item("c.pdf")];
        let outputs = node
            .execute(&items, ExecuteOptions::default().with_continue_on_fail(true))
            .await
            .unwrap();

        assert_eq!(
            outputs.iter().map(|o| o.json.clone()).collect::<Vec<_>>(),
            vec![
                json!({"id": "f-1"}),
                json!({"error": "File is too large"}),
                json!({"id": "f-3"}),
            ]
        );
        assert_eq!(mock.request_count(), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn test_failure_aborts_without_continue_on_fail() {
        let mock = MockTransport::new();
        mock.push_json(400, json!({"detail": "Unsupported file type"}));

        let node = node(&mock, json!({"resource": "file", "operation": "fileUpload"}));
        let items = [pdf_item("a.pdf"), pdf_item("b.pdf")];
        let err = node.execute(&items, ExecuteOptions::default()).await.unwrap_err();

        assert!(matches!(err, Error::Item { index: 0, .. }));
        assert_eq!(err.item_message(), "Unsupported file type");
        assert_eq!(mock.request_count(), 1);
    }

    #[tokio::test]
    async fn test_image_captioning_uses_configured_property() {
        let mock = MockTransport::new();
        mock.push_json(200, json!({"id": "r-1", "status": "completed"}));

        let node = node(
            &mock,
            json!({"resource": "imageAi", "operation": "imageCaptioning", "file": "photo"}),
        );
        let item = Item::empty().with_binary(
            "photo",
            BinaryData::new(&b"abc"[..]).with_mime_type("image/jpeg"),
        );
        node.execute(&[item], ExecuteOptions::default()).await.unwrap();

        let sent = mock.requests_to("/image/generate");
        let body = sent[0].json_body().unwrap();
        assert_eq!(body["image"], json!("data:image/jpeg;base64,YWJj"));
        assert_eq!(body["domain"], json!("document.generative"));
        assert!(mock.requests_to("/response/r-1").is_empty());
    }

    #[tokio::test]
    async fn test_file_list_output_shape() {
        let mock = MockTransport::new();
        mock.push_json(200, json!([{"id": "f-1", "filename": "a.pdf"}]));

        let node = node(&mock, json!({"resource": "file", "operation": "fileList", "limit": 5}));
        let outputs = node
            .execute(&[Item::empty()], ExecuteOptions::default())
            .await
            .unwrap();

        assert_eq!(outputs[0].json["files"][0]["id"], json!("f-1"));
        assert_eq!(mock.requests()[0].url.query(), Some("skip=0&limit=5"));
    }

    #[tokio::test]
    async fn test_agent_request() {
        let mock = MockTransport::new();
        mock.push_json(200, json!({"id": "r-1", "status": "completed"}));

        let node = node(
            &mock,
            json!({"resource": "agentAi", "operation": "githubAgent", "url": "https://github.com/octocat"}),
        );
        assert_eq!(node.request().operation(), Operation::GithubAgent);
        node.execute(&[Item::empty()], ExecuteOptions::default())
            .await
            .unwrap();

        let body = mock.requests_to("/web/generate")[0].json_body().unwrap().clone();
        assert_eq!(
            body,
            json!({
                "url": "https://github.com/octocat",
                "model": "vlm-1",
                "domain": "web.github-developer-stats",
                "mode": "accurate"
            })
        );
    }

    #[tokio::test]
    async fn test_http_form_attaches_item_binary() {
        let mock = MockTransport::new();
        mock.push_json(200, json!({"id": "f-9"}));

        let node = node(
            &mock,
            json!({
                "resource": "http",
                "operation": "POST",
                "path": "/files",
                "isBodyRequired": true,
                "typeofData": "formData",
                "formBody": {"form": [{"key": "purpose", "value": "assistants"}]}
            }),
        );
        let item = Item::empty().with_binary(
            "file",
            BinaryData::new(&b"%PDF"[..]).with_file_name("x.pdf"),
        );
        let outputs = node.execute(&[item], ExecuteOptions::default()).await.unwrap();
        assert_eq!(outputs[0].json, json!({"id": "f-9"}));

        let parts = mock.requests()[0].form_parts().unwrap().to_vec();
        assert!(matches!(&parts[0], FormPart::File { file_name, .. } if file_name == "x.pdf"));
    }

    #[tokio::test]
    async fn test_image_generation_from_prompt() {
        let mock = MockTransport::new();
        mock.push_json(200, json!({"images": ["base64_encoded_image"]}));

        let node = node(
            &mock,
            json!({
                "resource": "generation",
                "operation": "imageGeneration",
                "prompt": "test prompt"
            }),
        );
        let outputs = node
            .execute(&[Item::empty()], ExecuteOptions::default())
            .await
            .unwrap();

        assert_eq!(outputs, vec![Item::new(json!({"images": ["base64_encoded_image"]}))]);
        let sent = mock.requests_to("/image/generate");
        assert_eq!(
            sent[0].json_body().unwrap(),
            &json!({"prompt": "test prompt", "num_images": 1, "width": 512, "height": 512})
        );
    }

    #[tokio::test]
    async fn test_image_generation_bad_request_aborts() {
        let mock = MockTransport::new();
        mock.push_json(400, json!({"detail": "Bad Request"}));

        let node = node(
            &mock,
            json!({"resource": "generation", "operation": "imageGeneration", "prompt": "p"}),
        );
        let err = node
            .execute(&[Item::empty()], ExecuteOptions::default())
            .await
            .unwrap_err();

        assert!(matches!(err, Error::Item { index: 0, .. }));
        assert_eq!(err.item_message(), "Bad Request");
        assert_eq!(mock.request_count(), 1);
    }

    #[tokio::test]
    async fn test_document_generation_continue_on_fail() {
        let mock = MockTransport::new();
        mock.push_failure("API Error");
        mock.push_json(200, json!({"summary": "no text"}));
        mock.push_json(200, json!({"text": "Generated document content"}));

        let node = node(
            &mock,
            json!({
                "resource": "generation",
                "operation": "documentGeneration",
                "prompt": "test prompt",
                "maxTokens": 1000,
                "temperature": 0.7
            }),
        );
        let items = [Item::empty(), Item::empty(), Item::empty()];
        let outputs = node
            .execute(&items, ExecuteOptions::default().with_continue_on_fail(true))
            .await
            .unwrap();

        assert_eq!(
            outputs[0].json,
            json!({"error": "HTTP request failed: API Error"})
        );
        assert_eq!(
            outputs[1].json,
            json!({"error": "Invalid API response: Missing text content"})
        );
        assert_eq!(outputs[2].json, json!({"text": "Generated document content"}));
        assert_eq!(mock.requests_to("/document/generate").len(), 3);
    }
}

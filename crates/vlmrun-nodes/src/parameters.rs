//! Node parameters.
//!
//! [`NodeParameters`] mirrors the flat, host-shaped parameter object. It is
//! converted once into a [`NodeRequest`], a resource-tagged union carrying
//! only the fields its resource uses, so invalid combinations are rejected
//! before any item is processed.

use serde::{Deserialize, Serialize};
use vlmrun_client::types::{
    DEFAULT_IMAGE_COUNT, DEFAULT_IMAGE_SIZE, DEFAULT_MAX_TOKENS, DEFAULT_MODEL, DEFAULT_TEMPERATURE,
    DocumentPromptRequest, ImagePromptRequest, WebMode,
};
use vlmrun_client::{DEFAULT_FILE_LIMIT, KeyValue, PassthroughMethod};

use crate::error::{Error, Result};
use crate::item::DEFAULT_BINARY_PROPERTY;
use crate::operation::{Operation, Resource};

/// Binary property carrying the form file of HTTP requests.
pub const DEFAULT_FORM_BINARY_PROPERTY: &str = "file";

/// A host "fixed collection" of key/value entries.
///
/// Accepts the host shapes `{"header": [...]}`, `{"param": [...]}`,
/// `{"json": [...]}` and `{"form": [...]}`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyValueCollection {
    #[serde(
        default,
        alias = "header",
        alias = "param",
        alias = "json",
        alias = "form"
    )]
    pub values: Option<Vec<KeyValue>>,
}

impl KeyValueCollection {
    pub fn new(values: Vec<KeyValue>) -> Self {
        Self {
            values: Some(values),
        }
    }

    fn into_values(self) -> Vec<KeyValue> {
        self.values.unwrap_or_default()
    }
}

/// Encoding of an HTTP request body.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum BodyKind {
    #[default]
    #[serde(rename = "jsonData")]
    Json,
    #[serde(rename = "formData")]
    Form,
}

/// Raw node parameters as supplied by the host.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct NodeParameters {
    pub resource: Resource,
    pub operation: Option<Operation>,
    pub model: Option<String>,
    /// Binary property name.
    pub file: Option<String>,
    pub url: Option<String>,
    pub mode: Option<WebMode>,
    pub skip: Option<u32>,
    pub limit: Option<u32>,
    /// HTTP path appended to the base URL. Falls back to `url`.
    pub path: Option<String>,
    pub is_header_required: bool,
    pub headers: KeyValueCollection,
    pub is_query_param_required: bool,
    pub params: KeyValueCollection,
    pub is_body_required: bool,
    pub typeof_data: BodyKind,
    pub json_body: KeyValueCollection,
    pub form_body: KeyValueCollection,
    /// Prompt of the generation operations.
    pub prompt: Option<String>,
    pub max_tokens: Option<u32>,
    pub temperature: Option<f64>,
    pub num_images: Option<u32>,
    pub width: Option<u32>,
    pub height: Option<u32>,
}

impl NodeParameters {
    /// Creates parameters for `operation` with its resource filled in.
    pub fn for_operation(operation: Operation) -> Self {
        Self {
            resource: operation.resource(),
            operation: Some(operation),
            ..Self::default()
        }
    }

    fn model(&self) -> String {
        self.model
            .clone()
            .filter(|m| !m.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_MODEL.to_owned())
    }

    fn prompt(&self) -> Result<String> {
        self.prompt
            .as_deref()
            .map(str::trim)
            .filter(|p| !p.is_empty())
            .map(str::to_owned)
            .ok_or_else(|| Error::invalid_parameters("Prompt is required"))
    }

    fn binary_property(&self, default: &str) -> String {
        self.file
            .clone()
            .filter(|f| !f.trim().is_empty())
            .unwrap_or_else(|| default.to_owned())
    }
}

/// `file` resource operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FileRequest {
    List { skip: u32, limit: u32 },
    Upload { binary_property: String },
}

/// `experimental` resource operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EmbeddingRequest {
    Document {
        model: String,
        binary_property: String,
    },
    Image {
        model: String,
        binary_property: String,
    },
}

/// Body of an HTTP passthrough template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HttpBodyTemplate {
    Json(Vec<KeyValue>),
    Form {
        fields: Vec<KeyValue>,
        binary_property: String,
    },
}

/// Passthrough call resolved per item.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpRequestTemplate {
    pub method: PassthroughMethod,
    pub path: String,
    pub headers: Option<Vec<KeyValue>>,
    pub query: Option<Vec<KeyValue>>,
    pub body: Option<HttpBodyTemplate>,
}

/// Validated, resource-tagged node configuration.
#[derive(Debug, Clone, PartialEq)]
pub enum NodeRequest {
    Document {
        operation: Operation,
        model: String,
        binary_property: String,
    },
    Audio {
        operation: Operation,
        model: String,
        binary_property: String,
    },
    Image {
        operation: Operation,
        model: String,
        binary_property: String,
    },
    Agent {
        operation: Operation,
        model: String,
        url: String,
        mode: WebMode,
    },
    File(FileRequest),
    Experimental(EmbeddingRequest),
    Http(HttpRequestTemplate),
    DocumentGeneration(DocumentPromptRequest),
    ImageGeneration(ImagePromptRequest),
}

impl NodeRequest {
    /// Returns the configured operation.
    pub fn operation(&self) -> Operation {
        match self {
            NodeRequest::Document { operation, .. }
            | NodeRequest::Audio { operation, .. }
            | NodeRequest::Image { operation, .. }
            | NodeRequest::Agent { operation, .. } => *operation,
            NodeRequest::File(FileRequest::List { .. }) => Operation::FileList,
            NodeRequest::File(FileRequest::Upload { .. }) => Operation::FileUpload,
            NodeRequest::Experimental(EmbeddingRequest::Document { .. }) => {
                Operation::DocumentEmbedding
            }
            NodeRequest::Experimental(EmbeddingRequest::Image { .. }) => Operation::ImageEmbedding,
            NodeRequest::Http(template) => match template.method {
                PassthroughMethod::Get => Operation::Get,
                PassthroughMethod::Post => Operation::Post,
            },
            NodeRequest::DocumentGeneration(_) => Operation::DocumentGeneration,
            NodeRequest::ImageGeneration(_) => Operation::ImageGeneration,
        }
    }
}

impl TryFrom<NodeParameters> for NodeRequest {
    type Error = Error;

    fn try_from(params: NodeParameters) -> Result<Self> {
        let resource = params.resource;
        let operation = params
            .operation
            .unwrap_or_else(|| resource.default_operation());

        if operation.resource() != resource {
            return Err(Error::invalid_parameters(format!(
                "Operation '{operation}' is not available for resource '{resource}'"
            )));
        }

        let request = match resource {
            Resource::DocumentAi => NodeRequest::Document {
                operation,
                model: params.model(),
                binary_property: params.binary_property(DEFAULT_BINARY_PROPERTY),
            },
            Resource::AudioAi => NodeRequest::Audio {
                operation,
                model: params.model(),
                binary_property: params.binary_property(DEFAULT_BINARY_PROPERTY),
            },
            Resource::ImageAi => NodeRequest::Image {
                operation,
                model: params.model(),
                binary_property: params.binary_property(DEFAULT_BINARY_PROPERTY),
            },
            Resource::AgentAi => {
                let url = params
                    .url
                    .as_deref()
                    .map(str::trim)
                    .filter(|u| !u.is_empty())
                    .ok_or_else(|| Error::invalid_parameters("URL is required"))?
                    .to_owned();

                NodeRequest::Agent {
                    operation,
                    model: params.model(),
                    url,
                    mode: params.mode.unwrap_or_default(),
                }
            }
            Resource::File => match operation {
                Operation::FileUpload => NodeRequest::File(FileRequest::Upload {
                    binary_property: params.binary_property(DEFAULT_BINARY_PROPERTY),
                }),
                _ => NodeRequest::File(FileRequest::List {
                    skip: params.skip.unwrap_or(0),
                    limit: params.limit.unwrap_or(DEFAULT_FILE_LIMIT),
                }),
            },
            Resource::Experimental => {
                let model = params.model();
                let binary_property = params.binary_property(DEFAULT_BINARY_PROPERTY);
                match operation {
                    Operation::ImageEmbedding => NodeRequest::Experimental(EmbeddingRequest::Image {
                        model,
                        binary_property,
                    }),
                    _ => NodeRequest::Experimental(EmbeddingRequest::Document {
                        model,
                        binary_property,
                    }),
                }
            }
            Resource::Http => NodeRequest::Http(http_template(operation, params)),
            Resource::Generation => match operation {
                Operation::ImageGeneration => NodeRequest::ImageGeneration(
                    ImagePromptRequest::new(params.prompt()?)
                        .with_num_images(params.num_images.unwrap_or(DEFAULT_IMAGE_COUNT))
                        .with_size(
                            params.width.unwrap_or(DEFAULT_IMAGE_SIZE),
                            params.height.unwrap_or(DEFAULT_IMAGE_SIZE),
                        ),
                ),
                _ => NodeRequest::DocumentGeneration(
                    DocumentPromptRequest::new(params.prompt()?)
                        .with_max_tokens(params.max_tokens.unwrap_or(DEFAULT_MAX_TOKENS))
                        .with_temperature(params.temperature.unwrap_or(DEFAULT_TEMPERATURE)),
                ),
            },
        };

        Ok(request)
    }
}

fn http_template(operation: Operation, params: NodeParameters) -> HttpRequestTemplate {
    let method = match operation {
        Operation::Post => PassthroughMethod::Post,
        _ => PassthroughMethod::Get,
    };

    let binary_property = params.binary_property(DEFAULT_FORM_BINARY_PROPERTY);
    let path = params.path.or(params.url).unwrap_or_default();

    let headers = params
        .is_header_required
        .then(|| params.headers.into_values());
    let query = params
        .is_query_param_required
        .then(|| params.params.into_values());

    let body = (method == PassthroughMethod::Post && params.is_body_required).then(|| {
        match params.typeof_data {
            BodyKind::Json => HttpBodyTemplate::Json(params.json_body.into_values()),
            BodyKind::Form => HttpBodyTemplate::Form {
                fields: params.form_body.into_values(),
                binary_property,
            },
        }
    });

    HttpRequestTemplate {
        method,
        path,
        headers,
        query,
        body,
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn parse(value: serde_json::Value) -> Result<NodeRequest> {
        let params: NodeParameters = serde_json::from_value(value).unwrap();
        NodeRequest::try_from(params)
    }

    #[test]
    fn test_document_defaults() {
        let request = parse(json!({"resource": "documentAi", "operation": "invoiceParser"})).unwrap();
        assert_eq!(
            request,
            NodeRequest::Document {
                operation: Operation::InvoiceParser,
                model: "vlm-1".into(),
                binary_property: "data".into(),
            }
        );
    }

    #[test]
    fn test_operation_must_match_resource() {
        let err = parse(json!({"resource": "imageAi", "operation": "resumeParser"})).unwrap_err();
        assert!(err.is_validation());
        assert_eq!(
            err.to_string(),
            "Operation 'resumeParser' is not available for resource 'imageAi'"
        );
    }

    #[test]
    fn test_agent_requires_url() {
        let err = parse(json!({"resource": "agentAi", "operation": "githubAgent"})).unwrap_err();
        assert_eq!(err.to_string(), "URL is required");

        let request = parse(json!({
            "resource": "agentAi",
            "operation": "marketResearchAgent",
            "url": "https://example.com",
            "mode": "fast"
        }))
        .unwrap();
        assert!(matches!(
            request,
            NodeRequest::Agent { mode: WebMode::Fast, .. }
        ));
    }

    #[test]
    fn test_generation_defaults_and_overrides() {
        let request = parse(json!({
            "resource": "generation",
            "operation": "imageGeneration",
            "prompt": "A beautiful sunset over the ocean",
            "width": 1024
        }))
        .unwrap();
        assert_eq!(
            request,
            NodeRequest::ImageGeneration(ImagePromptRequest {
                prompt: "A beautiful sunset over the ocean".into(),
                num_images: 1,
                width: 1024,
                height: 512,
            })
        );

        let request = parse(json!({
            "resource": "generation",
            "prompt": "Write a short story",
            "maxTokens": 200
        }))
        .unwrap();
        assert_eq!(request.operation(), Operation::DocumentGeneration);
        let NodeRequest::DocumentGeneration(document) = request else {
            panic!("expected document generation");
        };
        assert_eq!(document.max_tokens, 200);
        assert_eq!(document.temperature, 0.7);
    }

    #[test]
    fn test_generation_requires_prompt() {
        let err = parse(json!({"resource": "generation", "operation": "documentGeneration", "prompt": "  "}))
            .unwrap_err();
        assert!(matches!(err, Error::InvalidParameters(_)));
        assert_eq!(err.to_string(), "Prompt is required");
    }

    #[test]
    fn test_file_list_pagination_defaults() {
        let request = parse(json!({"resource": "file", "operation": "fileList"})).unwrap();
        assert_eq!(
            request,
            NodeRequest::File(FileRequest::List { skip: 0, limit: 10 })
        );
    }

    #[test]
    fn test_http_template_from_host_shape() {
        let request = parse(json!({
            "resource": "http",
            "operation": "POST",
            "url": "/document/generate",
            "isHeaderRequired": true,
            "headers": {"header": [{"key": "X-Trace", "value": "1"}]},
            "isBodyRequired": true,
            "typeofData": "formData",
            "formBody": {"form": [{"key": "purpose", "value": "assistants"}]}
        }))
        .unwrap();

        let NodeRequest::Http(template) = request else {
            panic!("expected http request");
        };
        assert_eq!(template.method, PassthroughMethod::Post);
        assert_eq!(template.path, "/document/generate");
        assert_eq!(template.headers.unwrap().len(), 1);
        assert!(template.query.is_none());
        assert_eq!(
            template.body,
            Some(HttpBodyTemplate::Form {
                fields: vec![KeyValue::new("purpose", "assistants")],
                binary_property: "file".into(),
            })
        );
    }

    #[test]
    fn test_http_enabled_collection_without_entries() {
        let request = parse(json!({
            "resource": "http",
            "operation": "GET",
            "path": "/files",
            "isQueryParamRequired": true
        }))
        .unwrap();

        assert_eq!(request.operation(), Operation::Get);
        let NodeRequest::Http(template) = request else {
            panic!("expected http request");
        };
        assert_eq!(template.query, Some(vec![]));
    }
}

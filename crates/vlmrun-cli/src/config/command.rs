//! Subcommands and their translation into node parameters.

use std::path::PathBuf;

use anyhow::Context;
use clap::{Args, Subcommand};
use vlmrun_client::types::{
    DEFAULT_IMAGE_COUNT, DEFAULT_IMAGE_SIZE, DEFAULT_MAX_TOKENS, DEFAULT_MODEL, DEFAULT_TEMPERATURE,
    WebMode,
};
use vlmrun_client::{DEFAULT_FILE_LIMIT, KeyValue};
use vlmrun_nodes::{
    BodyKind, DEFAULT_BINARY_PROPERTY, DEFAULT_FORM_BINARY_PROPERTY, KeyValueCollection,
    NodeParameters, Operation, Resource,
};

use crate::input::parse_key_value;

/// Model and input files shared by file-based subcommands.
#[derive(Debug, Clone, Args)]
pub struct FileArgs {
    /// Model identifier
    #[arg(long, default_value = DEFAULT_MODEL)]
    pub model: String,

    /// Input files, one item per file
    #[arg(required = true)]
    pub files: Vec<PathBuf>,
}

/// `files` subcommands.
#[derive(Debug, Clone, Subcommand)]
pub enum FilesCommand {
    /// List uploaded files
    List {
        #[arg(long, default_value = "0")]
        skip: u32,
        #[arg(long, default_value_t = DEFAULT_FILE_LIMIT)]
        limit: u32,
    },
    /// Upload files
    Upload {
        #[arg(required = true)]
        files: Vec<PathBuf>,
    },
}

/// `generate` subcommands.
#[derive(Debug, Clone, Subcommand)]
pub enum GenerateCommand {
    /// Generate text from a prompt
    Document {
        /// Prompt to generate from
        prompt: String,
        /// Maximum number of tokens to generate
        #[arg(long, default_value_t = DEFAULT_MAX_TOKENS)]
        max_tokens: u32,
        /// Sampling temperature
        #[arg(long, default_value_t = DEFAULT_TEMPERATURE)]
        temperature: f64,
    },
    /// Generate images from a prompt
    Image {
        /// Prompt to generate from
        prompt: String,
        /// Number of images
        #[arg(long, default_value_t = DEFAULT_IMAGE_COUNT)]
        num_images: u32,
        #[arg(long, default_value_t = DEFAULT_IMAGE_SIZE)]
        width: u32,
        #[arg(long, default_value_t = DEFAULT_IMAGE_SIZE)]
        height: u32,
    },
}

/// Available subcommands.
#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// Parse documents (resumeParser, invoiceParser, presentationParser, formFilling)
    Document {
        #[arg(long, short, default_value = "resumeParser")]
        operation: Operation,
        #[command(flatten)]
        input: FileArgs,
    },
    /// Transcribe audio files
    Audio {
        #[command(flatten)]
        input: FileArgs,
    },
    /// Caption or catalogue images (imageCaptioning, imageCataloging)
    Image {
        #[arg(long, short, default_value = "imageCaptioning")]
        operation: Operation,
        #[command(flatten)]
        input: FileArgs,
    },
    /// Run a webpage agent (githubAgent, linkedinAgent, marketResearchAgent)
    Agent {
        #[arg(long, short, default_value = "githubAgent")]
        operation: Operation,
        /// Page to analyse
        url: String,
        /// Model identifier
        #[arg(long, default_value = DEFAULT_MODEL)]
        model: String,
        /// Processing mode (fast, accurate)
        #[arg(long, default_value = "accurate")]
        mode: WebMode,
    },
    /// Upload or list files
    Files {
        #[command(subcommand)]
        command: FilesCommand,
    },
    /// Generate embeddings (documentEmbedding, imageEmbedding)
    Embedding {
        #[arg(long, short, default_value = "documentEmbedding")]
        operation: Operation,
        #[command(flatten)]
        input: FileArgs,
    },
    /// Generate text or images from a prompt
    Generate {
        #[command(subcommand)]
        command: GenerateCommand,
    },
    /// Send an authenticated request to any API path
    Http {
        /// HTTP method (GET, POST)
        #[arg(value_parser = ["GET", "POST", "get", "post"])]
        method: String,
        /// Path appended to the base URL, e.g. /files
        path: String,
        /// Header as KEY=VALUE
        #[arg(long = "header", value_parser = parse_key_value)]
        headers: Vec<KeyValue>,
        /// Query parameter as KEY=VALUE
        #[arg(long = "query", value_parser = parse_key_value)]
        query: Vec<KeyValue>,
        /// JSON body field as KEY=VALUE; values that parse as JSON are embedded
        #[arg(long = "json", value_parser = parse_key_value, conflicts_with = "form")]
        json: Vec<KeyValue>,
        /// Multipart text field as KEY=VALUE
        #[arg(long = "form", value_parser = parse_key_value, requires = "file")]
        form: Vec<KeyValue>,
        /// File sent as multipart part `file`
        #[arg(long)]
        file: Option<PathBuf>,
    },
    /// Run a node from a JSON parameter file
    Run {
        /// JSON file with host-shaped node parameters
        #[arg(long)]
        params: PathBuf,
        /// Binary property input files are stored under
        #[arg(long, default_value = DEFAULT_BINARY_PROPERTY)]
        binary_property: String,
        /// Input files, one item per file
        files: Vec<PathBuf>,
    },
    /// Check that the API is reachable
    Health,
}

/// Node parameters plus the files that become input items.
#[derive(Debug, Clone)]
pub struct Invocation {
    pub parameters: NodeParameters,
    pub inputs: Vec<PathBuf>,
    pub binary_property: String,
}

impl Invocation {
    fn new(parameters: NodeParameters) -> Self {
        Self {
            parameters,
            inputs: Vec::new(),
            binary_property: DEFAULT_BINARY_PROPERTY.to_owned(),
        }
    }

    fn with_inputs(mut self, inputs: Vec<PathBuf>) -> Self {
        self.inputs = inputs;
        self
    }
}

fn file_operation(resource: Resource, operation: Operation, input: FileArgs) -> Invocation {
    let parameters = NodeParameters {
        resource,
        operation: Some(operation),
        model: Some(input.model),
        ..NodeParameters::default()
    };
    Invocation::new(parameters).with_inputs(input.files)
}

impl Command {
    /// Translates the subcommand into node parameters.
    ///
    /// Returns `None` for subcommands that do not run a node.
    pub async fn into_invocation(self) -> anyhow::Result<Option<Invocation>> {
        let invocation = match self {
            Command::Health => return Ok(None),
            Command::Document { operation, input } => {
                file_operation(Resource::DocumentAi, operation, input)
            }
            Command::Image { operation, input } => {
                file_operation(Resource::ImageAi, operation, input)
            }
            Command::Embedding { operation, input } => {
                file_operation(Resource::Experimental, operation, input)
            }
            Command::Audio { input } => {
                file_operation(Resource::AudioAi, Operation::AudioTranscription, input)
            }
            Command::Agent {
                operation,
                url,
                model,
                mode,
            } => Invocation::new(NodeParameters {
                resource: Resource::AgentAi,
                operation: Some(operation),
                url: Some(url),
                model: Some(model),
                mode: Some(mode),
                ..NodeParameters::default()
            }),
            Command::Files {
                command: FilesCommand::List { skip, limit },
            } => Invocation::new(NodeParameters {
                skip: Some(skip),
                limit: Some(limit),
                ..NodeParameters::for_operation(Operation::FileList)
            }),
            Command::Files {
                command: FilesCommand::Upload { files },
            } => Invocation::new(NodeParameters::for_operation(Operation::FileUpload))
                .with_inputs(files),
            Command::Generate {
                command:
                    GenerateCommand::Document {
                        prompt,
                        max_tokens,
                        temperature,
                    },
            } => Invocation::new(NodeParameters {
                prompt: Some(prompt),
                max_tokens: Some(max_tokens),
                temperature: Some(temperature),
                ..NodeParameters::for_operation(Operation::DocumentGeneration)
            }),
            Command::Generate {
                command:
                    GenerateCommand::Image {
                        prompt,
                        num_images,
                        width,
                        height,
                    },
            } => Invocation::new(NodeParameters {
                prompt: Some(prompt),
                num_images: Some(num_images),
                width: Some(width),
                height: Some(height),
                ..NodeParameters::for_operation(Operation::ImageGeneration)
            }),
            Command::Http {
                method,
                path,
                headers,
                query,
                json,
                form,
                file,
            } => http_invocation(&method, path, headers, query, json, form, file),
            Command::Run {
                params,
                binary_property,
                files,
            } => {
                let raw = tokio::fs::read(&params)
                    .await
                    .with_context(|| format!("failed to read {}", params.display()))?;
                let parameters: NodeParameters = serde_json::from_slice(&raw)
                    .with_context(|| format!("invalid node parameters in {}", params.display()))?;
                Invocation {
                    parameters,
                    inputs: files,
                    binary_property,
                }
            }
        };

        Ok(Some(invocation))
    }
}

fn http_invocation(
    method: &str,
    path: String,
    headers: Vec<KeyValue>,
    query: Vec<KeyValue>,
    json: Vec<KeyValue>,
    form: Vec<KeyValue>,
    file: Option<PathBuf>,
) -> Invocation {
    let operation = if method.eq_ignore_ascii_case("POST") {
        Operation::Post
    } else {
        Operation::Get
    };

    let is_form = file.is_some();
    let parameters = NodeParameters {
        path: Some(path),
        is_header_required: !headers.is_empty(),
        headers: KeyValueCollection::new(headers),
        is_query_param_required: !query.is_empty(),
        params: KeyValueCollection::new(query),
        is_body_required: is_form || !json.is_empty(),
        typeof_data: if is_form { BodyKind::Form } else { BodyKind::Json },
        json_body: KeyValueCollection::new(json),
        form_body: KeyValueCollection::new(form),
        ..NodeParameters::for_operation(operation)
    };

    Invocation {
        parameters,
        inputs: file.into_iter().collect(),
        binary_property: DEFAULT_FORM_BINARY_PROPERTY.to_owned(),
    }
}

#[cfg(test)]
mod tests {
    use vlmrun_nodes::NodeRequest;

    use super::*;

    #[tokio::test]
    async fn test_document_invocation() {
        let command = Command::Document {
            operation: Operation::InvoiceParser,
            input: FileArgs {
                model: "vlm-1".into(),
                files: vec!["invoice.pdf".into()],
            },
        };

        let invocation = command.into_invocation().await.unwrap().unwrap();
        assert_eq!(invocation.parameters.resource, Resource::DocumentAi);
        assert_eq!(invocation.inputs, vec![PathBuf::from("invoice.pdf")]);
        assert_eq!(invocation.binary_property, "data");
    }

    #[tokio::test]
    async fn test_subcommand_keeps_its_resource() {
        let command = Command::Document {
            operation: Operation::FileList,
            input: FileArgs {
                model: "vlm-1".into(),
                files: vec!["a.pdf".into()],
            },
        };

        let invocation = command.into_invocation().await.unwrap().unwrap();
        assert_eq!(invocation.parameters.resource, Resource::DocumentAi);

        let err = NodeRequest::try_from(invocation.parameters).unwrap_err();
        assert!(matches!(err, vlmrun_nodes::Error::InvalidParameters(_)));
        assert_eq!(
            err.to_string(),
            "Operation 'fileList' is not available for resource 'documentAi'"
        );
    }

    #[tokio::test]
    async fn test_subcommands_reject_foreign_operations() {
        let input = FileArgs {
            model: "vlm-1".into(),
            files: vec!["x.png".into()],
        };
        let commands = [
            Command::Image {
                operation: Operation::ResumeParser,
                input: input.clone(),
            },
            Command::Embedding {
                operation: Operation::Get,
                input,
            },
            Command::Agent {
                operation: Operation::ImageCaptioning,
                url: "https://example.com".into(),
                model: "vlm-1".into(),
                mode: WebMode::Fast,
            },
        ];

        for command in commands {
            let invocation = command.into_invocation().await.unwrap().unwrap();
            assert!(NodeRequest::try_from(invocation.parameters).is_err());
        }
    }

    #[tokio::test]
    async fn test_generate_image_invocation() {
        let command = Command::Generate {
            command: GenerateCommand::Image {
                prompt: "A beautiful sunset over the ocean".into(),
                num_images: 2,
                width: 512,
                height: 512,
            },
        };

        let invocation = command.into_invocation().await.unwrap().unwrap();
        assert!(invocation.inputs.is_empty());

        let request = NodeRequest::try_from(invocation.parameters).unwrap();
        let NodeRequest::ImageGeneration(image) = request else {
            panic!("expected image generation");
        };
        assert_eq!(image.num_images, 2);
    }

    #[tokio::test]
    async fn test_http_form_invocation() {
        let command = Command::Http {
            method: "post".into(),
            path: "/files".into(),
            headers: vec![],
            query: vec![],
            json: vec![],
            form: vec![KeyValue::new("purpose", "assistants")],
            file: Some("a.pdf".into()),
        };

        let invocation = command.into_invocation().await.unwrap().unwrap();
        assert_eq!(invocation.binary_property, "file");

        let request = NodeRequest::try_from(invocation.parameters).unwrap();
        let NodeRequest::Http(template) = request else {
            panic!("expected http request");
        };
        assert!(template.headers.is_none());
        assert!(template.body.is_some());
    }

    #[tokio::test]
    async fn test_run_reads_parameter_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("params.json");
        std::fs::write(
            &path,
            r#"{"resource": "agentAi", "operation": "marketResearchAgent", "url": "https://example.com"}"#,
        )
        .unwrap();

        let command = Command::Run {
            params: path,
            binary_property: "data".into(),
            files: vec![],
        };
        let invocation = command.into_invocation().await.unwrap().unwrap();
        assert_eq!(
            invocation.parameters.operation,
            Some(Operation::MarketResearchAgent)
        );
    }

    #[tokio::test]
    async fn test_health_has_no_invocation() {
        assert!(Command::Health.into_invocation().await.unwrap().is_none());
    }
}

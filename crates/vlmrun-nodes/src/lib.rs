#![forbid(unsafe_code)]
#![cfg_attr(docsrs, feature(doc_cfg))]
#![doc = include_str!("../README.md")]

/// Tracing target for node execution.
pub const TRACING_TARGET: &str = "vlmrun_nodes::node";

mod error;
mod item;
mod node;
mod operation;
mod parameters;
#[doc(hidden)]
pub mod prelude;

pub use crate::error::{Error, Result};
pub use crate::item::{BinaryData, DEFAULT_BINARY_PROPERTY, DEFAULT_MIME_TYPE, Item};
pub use crate::node::{ExecuteOptions, VlmRunNode};
pub use crate::operation::{Operation, Resource};
pub use crate::parameters::{
    BodyKind, DEFAULT_FORM_BINARY_PROPERTY, EmbeddingRequest, FileRequest, HttpBodyTemplate,
    HttpRequestTemplate, KeyValueCollection, NodeParameters, NodeRequest,
};

#![forbid(unsafe_code)]
#![cfg_attr(docsrs, feature(doc_cfg))]
#![doc = include_str!("../README.md")]

/// Tracing target for client construction and API calls.
pub const TRACING_TARGET_CLIENT: &str = "vlmrun_client::client";

/// Tracing target for the prediction poll loop.
pub const TRACING_TARGET_POLL: &str = "vlmrun_client::poll";

/// Tracing target for raw HTTP exchanges.
pub const TRACING_TARGET_TRANSPORT: &str = "vlmrun_client::transport";

mod client;
mod error;
#[doc(hidden)]
pub mod prelude;
pub mod transport;
pub mod types;

pub use crate::client::{
    API_KEY_ENV, BASE_URL_ENV, DEFAULT_BASE_URL, DEFAULT_CONNECT_TIMEOUT, DEFAULT_FILE_LIMIT,
    DEFAULT_POLL_ATTEMPTS, DEFAULT_POLL_INTERVAL, DEFAULT_TIMEOUT, FilePrediction, KeyValue,
    PassthroughBody, PassthroughMethod, PassthroughRequest, PollPolicy, VlmClient, VlmConfig,
    VlmConfigBuilder, VlmCredentials,
};
pub use crate::error::{BoxedError, Error, ErrorKind, Result};
#[cfg(any(test, feature = "test-utils"))]
#[cfg_attr(docsrs, doc(cfg(feature = "test-utils")))]
pub use crate::transport::MockTransport;
pub use crate::transport::{HttpTransport, ReqwestTransport};

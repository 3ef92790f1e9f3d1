//! Prelude module for vlmrun-client.
//!
//! Re-exports the types needed to build a client and run predictions.

pub use crate::client::{
    FilePrediction, PassthroughMethod, PassthroughRequest, PollPolicy, VlmClient, VlmConfig,
    VlmCredentials,
};
pub use crate::error::{Error, ErrorKind, Result};
pub use crate::transport::HttpTransport;
pub use crate::types::{Domain, JobStatus, PredictionResponse, UploadFile};

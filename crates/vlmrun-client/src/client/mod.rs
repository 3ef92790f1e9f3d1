//! VLM Run client and its operations.

mod credentials;
mod files;
mod generate;
mod passthrough;
mod poll;
mod prompt;
mod vlm_client;
mod vlm_config;

pub use credentials::{API_KEY_ENV, BASE_URL_ENV, DEFAULT_BASE_URL, VlmCredentials};
pub use files::DEFAULT_FILE_LIMIT;
pub use passthrough::{KeyValue, PassthroughBody, PassthroughMethod, PassthroughRequest};
pub use poll::FilePrediction;
pub use vlm_client::VlmClient;
pub use vlm_config::{
    DEFAULT_CONNECT_TIMEOUT, DEFAULT_POLL_ATTEMPTS, DEFAULT_POLL_INTERVAL, DEFAULT_TIMEOUT,
    PollPolicy, VlmConfig, VlmConfigBuilder,
};

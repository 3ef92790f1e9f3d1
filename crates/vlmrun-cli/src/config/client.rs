//! HTTP client and poll loop configuration.

use std::time::Duration;

use clap::Args;
use vlmrun_client::{PollPolicy, VlmConfig};

/// Transport timeouts and poll policy.
#[derive(Debug, Clone, Args)]
pub struct ClientConfig {
    /// HTTP request timeout in seconds
    #[arg(long = "timeout-secs", env = "VLMRUN_TIMEOUT_SECS", default_value = "60")]
    pub timeout_secs: u64,

    /// HTTP connect timeout in seconds
    #[arg(
        long = "connect-timeout-secs",
        env = "VLMRUN_CONNECT_TIMEOUT_SECS",
        default_value = "10"
    )]
    pub connect_timeout_secs: u64,

    /// Delay between two prediction status checks in milliseconds
    #[arg(
        long = "poll-interval-ms",
        env = "VLMRUN_POLL_INTERVAL_MS",
        default_value = "4000"
    )]
    pub poll_interval_ms: u64,

    /// Maximum number of prediction status checks
    #[arg(
        long = "poll-max-attempts",
        env = "VLMRUN_POLL_MAX_ATTEMPTS",
        default_value = "30"
    )]
    pub poll_max_attempts: u32,

    /// Stop polling as soon as a prediction reports `failed`
    #[arg(long = "fail-on-failed-status", env = "VLMRUN_FAIL_ON_FAILED_STATUS")]
    pub fail_on_failed_status: bool,
}

impl ClientConfig {
    /// Returns the configured poll policy.
    pub fn poll_policy(&self) -> PollPolicy {
        PollPolicy::default()
            .with_interval(Duration::from_millis(self.poll_interval_ms))
            .with_max_attempts(self.poll_max_attempts)
            .with_failed_is_terminal(self.fail_on_failed_status)
    }

    /// Builds and validates the client configuration.
    pub fn to_vlm_config(&self) -> vlmrun_client::Result<VlmConfig> {
        VlmConfig::builder()
            .with_timeout(Duration::from_secs(self.timeout_secs))
            .with_connect_timeout(Duration::from_secs(self.connect_timeout_secs))
            .with_poll(self.poll_policy())
            .build()
    }
}

//! Client configuration
//!
//! This module provides the client configuration, its builder and the poll
//! policy applied to asynchronous predictions.

use std::time::Duration;

use derive_builder::Builder;

use crate::error::Error;

/// Default request timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(60);

/// Default connect timeout.
pub const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

/// Default delay between two status checks.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(4000);

/// Default number of status checks before giving up.
pub const DEFAULT_POLL_ATTEMPTS: u32 = 30;

/// How the client waits for a prediction to complete.
///
/// The loop sleeps a fixed `interval` between checks with no backoff and no
/// jitter, and gives up after `max_attempts` checks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollPolicy {
    /// Delay between two status checks.
    pub interval: Duration,
    /// Maximum number of status checks.
    pub max_attempts: u32,
    /// End the loop with an error on the first `failed` status.
    ///
    /// When unset, `failed` is treated like any other non-completed status.
    pub failed_is_terminal: bool,
}

impl Default for PollPolicy {
    fn default() -> Self {
        Self {
            interval: DEFAULT_POLL_INTERVAL,
            max_attempts: DEFAULT_POLL_ATTEMPTS,
            failed_is_terminal: false,
        }
    }
}

impl PollPolicy {
    /// Sets the delay between two status checks.
    pub fn with_interval(mut self, interval: Duration) -> Self {
        self.interval = interval;
        self
    }

    /// Sets the maximum number of status checks.
    pub fn with_max_attempts(mut self, max_attempts: u32) -> Self {
        self.max_attempts = max_attempts;
        self
    }

    /// Sets whether a `failed` status ends the loop.
    pub fn with_failed_is_terminal(mut self, failed_is_terminal: bool) -> Self {
        self.failed_is_terminal = failed_is_terminal;
        self
    }

    /// Upper bound of the time spent sleeping in one poll loop.
    pub fn max_wait(&self) -> Duration {
        self.interval * self.max_attempts.saturating_sub(1)
    }
}

/// Configuration for the VLM Run client
///
/// Transport timeouts and the poll policy. Credentials are kept separately
/// in [`VlmCredentials`](crate::VlmCredentials).
#[derive(Debug, Clone, Builder)]
#[builder(
    name = "VlmConfigBuilder",
    pattern = "owned",
    setter(into, strip_option, prefix = "with"),
    build_fn(validate = "Self::validate_config", error = "Error")
)]
pub struct VlmConfig {
    /// Request timeout duration
    #[builder(default = "DEFAULT_TIMEOUT")]
    pub timeout: Duration,
    /// Connection timeout duration
    #[builder(default = "DEFAULT_CONNECT_TIMEOUT")]
    pub connect_timeout: Duration,
    /// User agent string for requests
    #[builder(default = "VlmConfig::default_user_agent()")]
    pub user_agent: String,
    /// Poll policy for asynchronous predictions
    #[builder(default)]
    pub poll: PollPolicy,
}

impl Default for VlmConfig {
    fn default() -> Self {
        Self {
            timeout: DEFAULT_TIMEOUT,
            connect_timeout: DEFAULT_CONNECT_TIMEOUT,
            user_agent: Self::default_user_agent(),
            poll: PollPolicy::default(),
        }
    }
}

impl VlmConfig {
    /// Create a new configuration builder
    pub fn builder() -> VlmConfigBuilder {
        VlmConfigBuilder::default()
    }

    fn default_user_agent() -> String {
        format!("vlmrun-client/{}", env!("CARGO_PKG_VERSION"))
    }
}

impl VlmConfigBuilder {
    fn validate_config(&self) -> Result<(), String> {
        if self.timeout.is_some_and(|t| t.is_zero()) {
            return Err("Timeout must be greater than 0".to_string());
        }

        if self.connect_timeout.is_some_and(|t| t.is_zero()) {
            return Err("Connect timeout must be greater than 0".to_string());
        }

        if let Some(poll) = &self.poll {
            if poll.max_attempts == 0 {
                return Err("Poll attempts must be greater than 0".to_string());
            }
            if poll.interval.is_zero() {
                return Err("Poll interval must be greater than 0".to_string());
            }
        }

        Ok(())
    }
}

impl From<derive_builder::UninitializedFieldError> for Error {
    fn from(err: derive_builder::UninitializedFieldError) -> Self {
        Error::validation(err.to_string())
    }
}

impl From<String> for Error {
    fn from(message: String) -> Self {
        Error::validation(message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = VlmConfig::default();

        assert_eq!(config.timeout, Duration::from_secs(60));
        assert_eq!(config.connect_timeout, Duration::from_secs(10));
        assert!(config.user_agent.starts_with("vlmrun-client/"));
        assert_eq!(config.poll.interval, Duration::from_millis(4000));
        assert_eq!(config.poll.max_attempts, 30);
        assert!(!config.poll.failed_is_terminal);
    }

    #[test]
    fn test_config_builder() {
        let config = VlmConfig::builder()
            .with_timeout(Duration::from_secs(120))
            .with_poll(PollPolicy::default().with_max_attempts(5))
            .build()
            .expect("Valid config");

        assert_eq!(config.timeout, Duration::from_secs(120));
        assert_eq!(config.connect_timeout, Duration::from_secs(10));
        assert_eq!(config.poll.max_attempts, 5);
    }

    #[test]
    fn test_validation_zero_timeout() {
        let result = VlmConfig::builder()
            .with_timeout(Duration::from_secs(0))
            .build();

        assert!(result.unwrap_err().is_validation());
    }

    #[test]
    fn test_validation_zero_poll_attempts() {
        let result = VlmConfig::builder()
            .with_poll(PollPolicy::default().with_max_attempts(0))
            .build();

        assert!(result.is_err());
    }

    #[test]
    fn test_max_wait_excludes_trailing_sleep() {
        let policy = PollPolicy::default();
        assert_eq!(policy.max_wait(), Duration::from_millis(4000 * 29));
    }
}

//! API credentials.

#[cfg(feature = "config")]
use clap::Args;
use url::Url;

use crate::error::{Error, Result};

/// Default API base URL.
pub const DEFAULT_BASE_URL: &str = "https://api.vlm.run/v1";

/// Environment variable holding the API key.
pub const API_KEY_ENV: &str = "VLMRUN_API_KEY";

/// Environment variable overriding the API base URL.
pub const BASE_URL_ENV: &str = "VLMRUN_API_BASE_URL";

/// API key and base URL used for every request.
///
/// The key is sent as `Authorization: Bearer <key>` and never appears in
/// `Debug` output or logs.
#[derive(Clone)]
#[cfg_attr(feature = "config", derive(Args))]
pub struct VlmCredentials {
    /// VLM Run API key
    #[cfg_attr(
        feature = "config",
        arg(long = "api-key", env = "VLMRUN_API_KEY", hide_env_values = true)
    )]
    pub api_key: String,

    /// VLM Run API base URL
    #[cfg_attr(
        feature = "config",
        arg(
            long = "api-base-url",
            env = "VLMRUN_API_BASE_URL",
            default_value = DEFAULT_BASE_URL
        )
    )]
    pub base_url: String,
}

impl std::fmt::Debug for VlmCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("VlmCredentials")
            .field("api_key", &"[REDACTED]")
            .field("base_url", &self.base_url)
            .finish()
    }
}

impl VlmCredentials {
    /// Creates credentials using the default base URL.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: DEFAULT_BASE_URL.to_owned(),
        }
    }

    /// Overrides the base URL.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Reads credentials from `VLMRUN_API_KEY` and `VLMRUN_API_BASE_URL`.
    pub fn from_env() -> Result<Self> {
        let api_key = std::env::var(API_KEY_ENV)
            .map_err(|_| Error::validation(format!("{API_KEY_ENV} is not set")))?;

        let credentials = match std::env::var(BASE_URL_ENV) {
            Ok(base_url) if !base_url.trim().is_empty() => {
                Self::new(api_key).with_base_url(base_url)
            }
            _ => Self::new(api_key),
        };

        credentials.validate()?;
        Ok(credentials)
    }

    /// Returns the base URL without trailing slashes.
    pub fn base_url(&self) -> &str {
        self.base_url.trim().trim_end_matches('/')
    }

    /// Checks that the key is present and the base URL is absolute.
    pub fn validate(&self) -> Result<()> {
        if self.api_key.trim().is_empty() {
            return Err(Error::validation("API key must not be empty"));
        }

        let base_url = self.base_url();
        Url::parse(base_url)
            .map_err(|e| Error::validation(format!("Invalid base URL '{base_url}': {e}")))?;

        Ok(())
    }

    pub(crate) fn authorization(&self) -> String {
        format!("Bearer {}", self.api_key)
    }
}

//! CLI configuration management.
//!
//! ```text
//! Cli
//! ├── credentials: VlmCredentials  # API key, base URL
//! ├── client: ClientConfig         # Timeouts, poll policy
//! └── command: Command             # Operation to run
//! ```
//!
//! Every option can also be supplied through its environment variable.
//!
//! ```bash
//! vlmrun --api-key sk-... document --operation invoiceParser invoice.pdf
//! VLMRUN_API_KEY=sk-... vlmrun files list --limit 20
//! ```

mod client;
mod command;

use anyhow::Context;
use clap::Parser;
pub use client::ClientConfig;
pub use command::{Command, Invocation};
use vlmrun_client::{VlmClient, VlmCredentials};

use crate::{TRACING_TARGET_CONFIG, TRACING_TARGET_STARTUP};

/// Complete CLI configuration.
#[derive(Debug, Clone, Parser)]
#[command(name = "vlmrun")]
#[command(about = "Run VLM Run document, image, audio and web operations")]
#[command(version)]
pub struct Cli {
    /// API credentials.
    #[clap(flatten)]
    pub credentials: VlmCredentials,

    /// HTTP client and poll loop settings.
    #[clap(flatten)]
    pub client: ClientConfig,

    /// Emit `{"error": ...}` for failing items instead of aborting
    #[arg(long, global = true, env = "VLMRUN_CONTINUE_ON_FAIL")]
    pub continue_on_fail: bool,

    /// Pretty-print the JSON output
    #[arg(long, global = true)]
    pub pretty: bool,

    #[command(subcommand)]
    pub command: Command,
}

impl Cli {
    /// Loads environment variables from .env file (if enabled) and parses CLI arguments.
    pub fn init() -> Self {
        Self::load_dotenv();
        Self::parse()
    }

    #[cfg(feature = "dotenv")]
    fn load_dotenv() {
        if let Err(err) = dotenvy::dotenv()
            && !err.not_found()
        {
            eprintln!("Warning: failed to load .env file: {err}");
        }
    }

    #[cfg(not(feature = "dotenv"))]
    fn load_dotenv() {}

    /// Builds the API client.
    pub fn create_client(&self) -> anyhow::Result<VlmClient> {
        let config = self
            .client
            .to_vlm_config()
            .context("invalid client configuration")?;

        VlmClient::new(config, self.credentials.clone()).context("failed to create client")
    }

    /// Logs configuration at debug level (no sensitive information).
    pub fn log(&self) {
        tracing::debug!(
            target: TRACING_TARGET_CONFIG,
            base_url = %self.credentials.base_url(),
            timeout_secs = self.client.timeout_secs,
            connect_timeout_secs = self.client.connect_timeout_secs,
            poll_interval_ms = self.client.poll_interval_ms,
            poll_max_attempts = self.client.poll_max_attempts,
            fail_on_failed_status = self.client.fail_on_failed_status,
            continue_on_fail = self.continue_on_fail,
            "Client configuration"
        );
    }

    /// Logs build information at debug level.
    pub fn log_build_info() {
        tracing::debug!(
            target: TRACING_TARGET_STARTUP,
            version = env!("CARGO_PKG_VERSION"),
            pid = std::process::id(),
            arch = std::env::consts::ARCH,
            os = std::env::consts::OS,
            features = ?Self::enabled_features(),
            "Build information"
        );
    }

    /// Returns a list of enabled compile-time features.
    fn enabled_features() -> Vec<&'static str> {
        [cfg!(feature = "dotenv").then_some("dotenv")]
            .into_iter()
            .flatten()
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_document_command() {
        let cli = Cli::try_parse_from([
            "vlmrun",
            "--api-key",
            "sk-test",
            "document",
            "--operation",
            "invoiceParser",
            "invoice.pdf",
        ])
        .unwrap();

        assert_eq!(cli.credentials.api_key, "sk-test");
        assert_eq!(cli.credentials.base_url(), "https://api.vlm.run/v1");
        assert_eq!(cli.client.poll_max_attempts, 30);
        assert!(matches!(cli.command, Command::Document { .. }));
    }

    #[test]
    fn test_parse_http_command() {
        let cli = Cli::try_parse_from([
            "vlmrun",
            "--api-key",
            "sk-test",
            "http",
            "GET",
            "/files",
            "--query",
            "limit=5",
            "--continue-on-fail",
        ])
        .unwrap();

        assert!(cli.continue_on_fail);
        let Command::Http { query, .. } = cli.command else {
            panic!("expected http command");
        };
        assert_eq!(query.len(), 1);
    }

    #[test]
    fn test_parse_generate_command() {
        let cli = Cli::try_parse_from([
            "vlmrun",
            "--api-key",
            "sk-test",
            "generate",
            "document",
            "Write a short story",
            "--max-tokens",
            "200",
        ])
        .unwrap();

        let Command::Generate {
            command: command::GenerateCommand::Document {
                max_tokens,
                temperature,
                ..
            },
        } = cli.command
        else {
            panic!("expected generate document command");
        };
        assert_eq!(max_tokens, 200);
        assert_eq!(temperature, 0.7);
    }

    #[test]
    fn test_unknown_operation_rejected() {
        let result = Cli::try_parse_from([
            "vlmrun",
            "--api-key",
            "sk-test",
            "document",
            "--operation",
            "summarize",
            "a.pdf",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn test_create_client() {
        let cli = Cli::try_parse_from(["vlmrun", "--api-key", "sk-test", "health"]).unwrap();
        assert!(cli.create_client().is_ok());
    }
}

//! Telemetry and tracing configuration.

use anyhow::Context;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, fmt};

/// Initializes the tracing subscriber for structured logging.
///
/// Logs go to stderr so stdout carries only the JSON output. The level is
/// read from `RUST_LOG` and defaults to `info`.
///
/// ```bash
/// RUST_LOG=vlmrun_client=debug vlmrun document cv.pdf
/// ```
pub(crate) fn init_tracing() -> anyhow::Result<()> {
    let fmt_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_level(true)
        .with_ansi(true);

    tracing_subscriber::registry()
        .with(fmt_layer)
        .with(create_env_filter()?)
        .try_init()
        .context("Failed to initialize tracing")?;

    Ok(())
}

/// Creates an environment filter for tracing.
fn create_env_filter() -> anyhow::Result<EnvFilter> {
    EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new("info"))
        .context("Failed to create env filter")
}

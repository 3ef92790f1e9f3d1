#![forbid(unsafe_code)]
#![cfg_attr(docsrs, feature(doc_cfg))]
#![doc = include_str!("../README.md")]

mod config;
mod input;
mod telemetry;

use std::io::Write;
use std::process;

use anyhow::Context;
use serde_json::Value;
use vlmrun_nodes::{ExecuteOptions, VlmRunNode};

use crate::config::Cli;

// Tracing target constants
pub const TRACING_TARGET_STARTUP: &str = "vlmrun_cli::startup";
pub const TRACING_TARGET_CONFIG: &str = "vlmrun_cli::config";
pub const TRACING_TARGET_RUN: &str = "vlmrun_cli::run";

#[tokio::main]
async fn main() {
    let Err(error) = run().await else {
        process::exit(0);
    };

    if tracing::enabled!(tracing::Level::ERROR) {
        tracing::error!(
            target: TRACING_TARGET_RUN,
            error = %format!("{error:#}"),
            "vlmrun terminated with error"
        );
    } else {
        eprintln!("Error: {error:#}");
    }

    process::exit(1);
}

/// Main application entry point.
async fn run() -> anyhow::Result<()> {
    let cli = Cli::init();

    telemetry::init_tracing()?;
    Cli::log_build_info();
    cli.log();

    let client = cli.create_client()?;
    let options = ExecuteOptions::default().with_continue_on_fail(cli.continue_on_fail);

    let Some(invocation) = cli.command.into_invocation().await? else {
        client.health_check().await.context("health check failed")?;
        tracing::info!(target: TRACING_TARGET_RUN, "API is healthy");
        return print_json(&serde_json::json!({ "status": "ok" }), cli.pretty);
    };

    let node = VlmRunNode::from_parameters(client, invocation.parameters)
        .context("invalid node parameters")?;
    let items = input::load_items(&invocation.inputs, &invocation.binary_property).await?;

    tracing::info!(
        target: TRACING_TARGET_RUN,
        operation = %node.request().operation(),
        items = items.len(),
        "Running node"
    );

    let outputs = node.execute(&items, options).await?;
    let output = Value::Array(outputs.into_iter().map(|item| item.json).collect());
    print_json(&output, cli.pretty)
}

/// Writes `value` to stdout.
fn print_json(value: &Value, pretty: bool) -> anyhow::Result<()> {
    let rendered = if pretty {
        serde_json::to_string_pretty(value)?
    } else {
        serde_json::to_string(value)?
    };

    let mut stdout = std::io::stdout().lock();
    writeln!(stdout, "{rendered}").context("failed to write output")?;
    Ok(())
}

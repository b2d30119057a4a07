use std::{path::PathBuf, sync::Arc, time::Duration};

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use client_core::{
    load_settings, render_result, ClientSettings, HttpAnalysisTransport, UploadController,
    VideoFile, WorkflowState,
};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(
    name = "run-analyzer",
    version,
    about = "Upload a running video and report its step count and forward-lean angle"
)]
struct Args {
    /// Base URL of the analysis API; wins over analyzer.toml and the environment.
    #[arg(long, global = true)]
    api_url: Option<String>,
    /// Upper bound for one analysis request, in milliseconds.
    #[arg(long, global = true)]
    timeout_ms: Option<u64>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Upload a video and print the analysis result.
    Analyze {
        path: PathBuf,
        /// Print the raw result as JSON instead of the formatted report.
        #[arg(long)]
        json: bool,
    },
    /// Check that the analysis API is up.
    Health,
}

fn apply_overrides(mut settings: ClientSettings, args: &Args) -> ClientSettings {
    if let Some(api_url) = &args.api_url {
        settings.api_base_url = api_url.clone();
    }
    if let Some(timeout_ms) = args.timeout_ms {
        settings.request_timeout_ms = timeout_ms;
    }
    settings
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();
    let args = Args::parse();

    let settings = apply_overrides(load_settings(), &args);
    let transport = HttpAnalysisTransport::from_settings(&settings)?;

    match args.command {
        Command::Analyze { path, json } => {
            analyze(transport, settings.request_timeout(), path, json).await
        }
        Command::Health => health(transport).await,
    }
}

async fn analyze(
    transport: HttpAnalysisTransport,
    timeout: Duration,
    path: PathBuf,
    json: bool,
) -> Result<()> {
    let file = VideoFile::from_path(&path)
        .await
        .with_context(|| format!("failed to read video file '{}'", path.display()))?;
    if !file.is_video() {
        warn!(
            file = file.name(),
            content_type = file.content_type(),
            "selected file does not look like a video; uploading anyway"
        );
    }
    info!(api = transport.api_base_url(), "uploading {}", file.name());

    let mut controller = UploadController::new(Arc::new(transport), timeout);
    controller.select_file(file)?;

    match controller.analyze().await {
        WorkflowState::Succeeded { result, .. } => {
            if json {
                println!("{}", serde_json::to_string_pretty(result)?);
            } else {
                print!("{}", render_result(Some(result)));
            }
            Ok(())
        }
        WorkflowState::Failed { error, .. } => Err(error.clone()).context("analysis failed"),
        other => bail!("analysis stopped in unexpected state '{}'", other.label()),
    }
}

async fn health(transport: HttpAnalysisTransport) -> Result<()> {
    let health = transport
        .health()
        .await
        .with_context(|| format!("health check against {} failed", transport.health_url()))?;

    println!("status: {}", health.status);
    if let Some(message) = &health.message {
        println!("message: {message}");
    }
    if !health.is_ok() {
        bail!("analysis API reported status '{}'", health.status);
    }
    Ok(())
}

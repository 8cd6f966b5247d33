//! Byepass CLI
//!
//! One-shot captures and the HTTP serving mode.

use anyhow::Context;
use byepass::capture::{perform_capture, CaptureKind, CaptureRequest};
use byepass::session::SessionConfig;
use clap::{Parser, Subcommand};
use std::net::SocketAddr;
use std::path::PathBuf;

/// Single-page web archiver
#[derive(Parser, Debug)]
#[command(name = "byepass")]
#[command(version)]
#[command(about = "Capture a web page as a sanitized HTML snapshot, screenshot, or PDF")]
struct Args {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Path to a Chromium executable
    #[arg(long, global = true)]
    chrome_path: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Capture one URL and write the artifact to disk
    Capture {
        /// Page address; a missing scheme defaults to https
        url: String,

        /// Artifact kind: html, screenshot, or pdf
        #[arg(short, long, default_value = "html")]
        kind: String,

        /// Output path (defaults to the artifact's file name)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Run the HTTP capture server
    Serve {
        /// Host to bind to
        #[arg(short = 'H', long, default_value = "127.0.0.1")]
        host: String,

        /// Port to listen on
        #[arg(short, long, default_value = "3001")]
        port: u16,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let filter = if args.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let mut config = SessionConfig::default();
    config.chrome_path = args.chrome_path;

    match args.command {
        Command::Capture { url, kind, output } => {
            let kind: CaptureKind = kind.parse().map_err(anyhow::Error::msg)?;
            let request = CaptureRequest::from_user_input(&url, kind);

            let artifact = perform_capture(&request, &config)
                .await
                .context("capture failed")?;

            let path = output.unwrap_or_else(|| PathBuf::from(artifact.file_name));
            std::fs::write(&path, &artifact.payload)
                .with_context(|| format!("failed to write {}", path.display()))?;

            println!(
                "{} ({}, {} bytes)",
                path.display(),
                artifact.media_type,
                artifact.payload.len()
            );
        }
        Command::Serve { host, port } => {
            let addr: SocketAddr = format!("{}:{}", host, port)
                .parse()
                .with_context(|| format!("invalid address {}:{}", host, port))?;
            byepass::server::serve(addr, config)
                .await
                .context("server error")?;
        }
    }

    Ok(())
}

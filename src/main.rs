// Copyright 2024 Kore Ledger
// SPDX-License-Identifier: AGPL-3.0-or-later

use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::EnvFilter;
use youtube_digest::{config::build_settings, DigestError, DigestNode};

/// YouTube to JSON API: subtitles of a YouTube video turned into a structured digest.
#[derive(Parser, Debug)]
#[command(version, about)]
struct Args {
    /// Configuration file (dotenv, json, yaml or toml). Defaults to `.env` when present.
    #[arg(short, long, default_value = "")]
    config: String,

    /// Listen port. Overrides `PORT`.
    #[arg(short, long)]
    port: Option<u16>,
}

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();
    match run(args).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => {
            log::error!("{}", error);
            ExitCode::FAILURE
        }
    }
}

async fn run(args: Args) -> Result<(), DigestError> {
    let settings = build_settings(&args.config, args.port)?;

    let node = DigestNode::build(settings)?;
    node.bind_with_shutdown(shutdown_signal());
    node.run().await
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(error) = tokio::signal::ctrl_c().await {
            log::error!("Failed to listen for Ctrl-C: {}", error);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(error) => {
                log::error!("Failed to listen for SIGTERM: {}", error);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}

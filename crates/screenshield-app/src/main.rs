// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Screen Shield — headless driver.
//
// Entry point. Initialises logging, loads the bridge config, attaches a host
// to the chosen surface, and runs the requested methods through a client.

mod cli;
mod session;

use std::process::ExitCode;

use clap::Parser;
use screenshield_bridge::{MemorySurface, SecureDisplaySurface, platform_surface};
use screenshield_core::BridgeConfig;
use screenshield_core::error::Result;

use cli::{Cli, SurfaceKind};

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    tracing::info!("Screen Shield starting");

    match run(Cli::parse()).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!(error = %e, "screen shield session failed");
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<()> {
    let mut config = match &cli.config {
        Some(path) => BridgeConfig::load(path)?,
        None => BridgeConfig::default(),
    };
    if let Some(ms) = cli.timeout_ms {
        config.request_timeout_ms = ms;
    }

    let surface: Box<dyn SecureDisplaySurface> = match cli.surface {
        SurfaceKind::Platform => platform_surface(),
        SurfaceKind::Memory => Box::new(MemorySurface::new()),
    };

    let report = session::run_session(surface, config, &cli.methods, cli.recreate).await?;
    for outcome in &report.outcomes {
        println!("{}", serde_json::to_string(outcome)?);
    }
    tracing::info!(
        channel = %report.channel,
        platform = %report.platform,
        final_state = ?report.final_state,
        "done"
    );
    Ok(())
}

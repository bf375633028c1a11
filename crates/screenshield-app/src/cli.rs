// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Command-line arguments.

use std::path::PathBuf;

use clap::{Parser, ValueEnum};

/// Which secure-display surface the host drives.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum SurfaceKind {
    /// The native surface for this OS (stub on desktop).
    Platform,
    /// An in-process flag, for dry runs.
    Memory,
}

#[derive(Debug, Parser)]
#[command(name = "screenshield", version, about = "Drive the screen shield bridge")]
pub struct Cli {
    /// Bridge configuration file (JSON). Missing file means defaults.
    #[arg(long, short = 'c')]
    pub config: Option<PathBuf>,

    /// Override the client request timeout in milliseconds.
    #[arg(long)]
    pub timeout_ms: Option<u64>,

    /// Surface implementation to attach to.
    #[arg(long, value_enum, default_value_t = SurfaceKind::Platform)]
    pub surface: SurfaceKind,

    /// Simulate a window recreation after the listed methods ran.
    #[arg(long)]
    pub recreate: bool,

    /// Method names to invoke, in order.
    #[arg(default_values_t = [String::from("enableScreenShield")])]
    pub methods: Vec<String>,
}

// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Screen Shield — Core types and error definitions shared across all crates.

pub mod config;
pub mod error;
pub mod types;
pub mod wire;

pub use config::BridgeConfig;
pub use error::ShieldError;
pub use types::*;
pub use wire::{MethodCall, MethodResponse};

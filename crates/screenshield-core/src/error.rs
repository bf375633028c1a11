// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Unified error types for Screen Shield.

use thiserror::Error;

/// Top-level error type for all Screen Shield operations.
///
/// Only [`ShieldError::BridgeUnavailable`] ever reaches a bridge client as an
/// `Err`. Platform failures are caught at the host and travel back inside a
/// [`CommandResult`](crate::CommandResult).
#[derive(Debug, Error)]
pub enum ShieldError {
    // -- Transport --
    #[error("bridge unavailable: {0}")]
    BridgeUnavailable(String),

    // -- Platform surface --
    #[error("platform error: {0}")]
    Platform(String),

    #[error("secure display not available on this platform")]
    PlatformUnavailable,

    // -- Configuration / persistence --
    #[error("invalid configuration: {0}")]
    Config(String),

    #[error("file I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl ShieldError {
    /// Whether this error means the transport to the host is gone.
    pub fn is_bridge_unavailable(&self) -> bool {
        matches!(self, ShieldError::BridgeUnavailable(_))
    }
}

/// Alias used throughout the codebase.
pub type Result<T> = std::result::Result<T, ShieldError>;

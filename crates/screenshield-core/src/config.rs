// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Bridge configuration.

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{Result, ShieldError};

/// Default method channel name.
pub const DEFAULT_CHANNEL: &str = "app/screen_shield";

/// Settings shared by the host runtime and its clients.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BridgeConfig {
    /// Name of the method channel the host listens on.
    pub channel_name: String,
    /// How long a client waits for the host before giving up (milliseconds).
    pub request_timeout_ms: u64,
    /// Maximum number of commands queued at the host.
    pub queue_capacity: usize,
    /// Apply the shield as soon as the host attaches to a window.
    pub shield_on_attach: bool,
    /// Number of transitions kept in the host's diagnostic history.
    pub history_limit: usize,
}

impl Default for BridgeConfig {
    fn default() -> Self {
        Self {
            channel_name: DEFAULT_CHANNEL.to_string(),
            request_timeout_ms: 3_000,
            queue_capacity: 32,
            shield_on_attach: false,
            history_limit: 64,
        }
    }
}

impl BridgeConfig {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout_ms)
    }

    /// Reject values the runtime cannot work with.
    pub fn validate(&self) -> Result<()> {
        if self.channel_name.trim().is_empty() {
            return Err(ShieldError::Config("channel_name must not be empty".into()));
        }
        if self.request_timeout_ms == 0 {
            return Err(ShieldError::Config(
                "request_timeout_ms must be greater than zero".into(),
            ));
        }
        if self.queue_capacity == 0 {
            return Err(ShieldError::Config(
                "queue_capacity must be greater than zero".into(),
            ));
        }
        Ok(())
    }

    /// Load from a JSON file. A missing file yields the defaults.
    pub fn load(path: &Path) -> Result<Self> {
        let config = match std::fs::read_to_string(path) {
            Ok(data) => serde_json::from_str::<Self>(&data)?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Self::default(),
            Err(e) => return Err(e.into()),
        };
        config.validate()?;
        Ok(config)
    }

    /// Persist as pretty-printed JSON.
    pub fn save(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)?;
        Ok(())
    }
}

// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Core domain types for the Screen Shield bridge.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Method name that turns the shield on.
pub const METHOD_ENABLE: &str = "enableScreenShield";

/// Method name that turns the shield off.
pub const METHOD_DISABLE: &str = "disableScreenShield";

/// A command the host understands. The set is closed: anything else is
/// answered with [`CommandResult::NotImplemented`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Command {
    #[serde(rename = "enableScreenShield")]
    EnableScreenShield,
    #[serde(rename = "disableScreenShield")]
    DisableScreenShield,
}

impl Command {
    /// Exact, case-sensitive lookup of a method name.
    pub fn from_method(method: &str) -> Option<Self> {
        match method {
            METHOD_ENABLE => Some(Command::EnableScreenShield),
            METHOD_DISABLE => Some(Command::DisableScreenShield),
            _ => None,
        }
    }

    /// Wire name of this command.
    pub fn method_name(self) -> &'static str {
        match self {
            Command::EnableScreenShield => METHOD_ENABLE,
            Command::DisableScreenShield => METHOD_DISABLE,
        }
    }

    /// The state the host ends up in after processing this command.
    pub fn target_state(self) -> SecureDisplayState {
        match self {
            Command::EnableScreenShield => SecureDisplayState::Shielded,
            Command::DisableScreenShield => SecureDisplayState::Unshielded,
        }
    }
}

impl std::fmt::Display for Command {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.method_name())
    }
}

/// Outcome the host reports for a single method call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum CommandResult {
    /// The toggle was applied. Always carries `true`.
    Success(bool),
    /// Method name outside the supported set. Not an error.
    NotImplemented,
    /// The native secure-display call failed; the state was left untouched.
    PlatformError { message: String },
}

impl CommandResult {
    /// The acknowledgement both supported methods return.
    pub fn success() -> Self {
        CommandResult::Success(true)
    }

    /// True only for `Success(true)`.
    pub fn is_success(&self) -> bool {
        matches!(self, CommandResult::Success(true))
    }

    /// True when the host did not recognise the method.
    pub fn is_not_implemented(&self) -> bool {
        matches!(self, CommandResult::NotImplemented)
    }
}

/// Whether the hosting window is currently protected from capture.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SecureDisplayState {
    /// Initial state; also the state after a window is recreated.
    #[default]
    Unshielded,
    Shielded,
}

impl SecureDisplayState {
    pub fn is_shielded(self) -> bool {
        self == SecureDisplayState::Shielded
    }

    pub fn from_shielded(shielded: bool) -> Self {
        if shielded {
            SecureDisplayState::Shielded
        } else {
            SecureDisplayState::Unshielded
        }
    }
}

/// One processed command, kept for diagnostics.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transition {
    pub command: Command,
    pub from: SecureDisplayState,
    pub to: SecureDisplayState,
    pub at: DateTime<Utc>,
}

impl Transition {
    pub fn new(command: Command, from: SecureDisplayState) -> Self {
        Self {
            command,
            from,
            to: command.target_state(),
            at: Utc::now(),
        }
    }

    /// True when the command re-applied the state it was already in.
    pub fn is_redundant(&self) -> bool {
        self.from == self.to
    }
}

// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// JSON envelopes for method calls crossing the channel.
//
// A call names a method and may carry arguments; the host ignores arguments
// for every method it supports. Responses echo the call id so a transport
// can match replies to in-flight requests.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::Result;
use crate::types::{Command, CommandResult};

/// A single request on the method channel.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MethodCall {
    pub id: Uuid,
    pub method: String,
    #[serde(default)]
    pub arguments: serde_json::Value,
}

impl MethodCall {
    pub fn new(method: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            method: method.into(),
            arguments: serde_json::Value::Null,
        }
    }

    pub fn for_command(command: Command) -> Self {
        Self::new(command.method_name())
    }

    pub fn with_arguments(mut self, arguments: serde_json::Value) -> Self {
        self.arguments = arguments;
        self
    }

    /// The recognised command, if any.
    pub fn command(&self) -> Option<Command> {
        Command::from_method(&self.method)
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }
}

/// The host's reply to a [`MethodCall`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MethodResponse {
    pub id: Uuid,
    pub result: CommandResult,
}

impl MethodResponse {
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }
}

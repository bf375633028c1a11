// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Client side of the bridge.
//
// `BridgeClient` is what the UI layer holds: cheap to clone, `Send + Sync`,
// and every call is an async request/response with a bounded wait. Any
// transport problem (queue closed, reply dropped, timeout) becomes
// `ShieldError::BridgeUnavailable`; the host's own answer is always
// `Ok(CommandResult)`.

use std::sync::Arc;
use std::time::Duration;

use screenshield_core::error::{Result, ShieldError};
use screenshield_core::{BridgeConfig, Command, CommandResult, MethodCall};
use tokio::sync::{mpsc, oneshot};
use tracing::debug;

use crate::runtime::{HostMessage, WindowEvent};

/// Handle the UI layer uses to toggle the screen shield.
#[derive(Clone)]
pub struct BridgeClient {
    tx: mpsc::Sender<HostMessage>,
    timeout: Duration,
    channel_name: Arc<str>,
}

impl BridgeClient {
    pub(crate) fn new(tx: mpsc::Sender<HostMessage>, config: &BridgeConfig) -> Self {
        Self {
            tx,
            timeout: config.request_timeout(),
            channel_name: Arc::from(config.channel_name.as_str()),
        }
    }

    /// Ask the host to protect the window from capture.
    pub async fn enable_screen_shield(&self) -> Result<CommandResult> {
        self.invoke(Command::EnableScreenShield).await
    }

    /// Ask the host to lift capture protection.
    pub async fn disable_screen_shield(&self) -> Result<CommandResult> {
        self.invoke(Command::DisableScreenShield).await
    }

    pub async fn invoke(&self, command: Command) -> Result<CommandResult> {
        self.call(MethodCall::for_command(command)).await
    }

    /// Send an arbitrary method name. Unknown names come back as
    /// `Ok(CommandResult::NotImplemented)`.
    pub async fn invoke_method(
        &self,
        method: &str,
        arguments: serde_json::Value,
    ) -> Result<CommandResult> {
        self.call(MethodCall::new(method).with_arguments(arguments))
            .await
    }

    /// Send a prepared call envelope and wait for the host's reply.
    pub async fn call(&self, call: MethodCall) -> Result<CommandResult> {
        let id = call.id;
        let (respond_to, reply) = oneshot::channel();
        debug!(channel = %self.channel_name, %id, method = %call.method, "sending method call");

        let exchange = async {
            self.tx
                .send(HostMessage::Call { call, respond_to })
                .await
                .map_err(|_| ShieldError::BridgeUnavailable("host channel closed".into()))?;
            reply.await.map_err(|_| {
                ShieldError::BridgeUnavailable("host dropped the request".into())
            })
        };

        let response = tokio::time::timeout(self.timeout, exchange)
            .await
            .map_err(|_| {
                ShieldError::BridgeUnavailable(format!(
                    "no reply within {} ms",
                    self.timeout.as_millis()
                ))
            })??;

        if response.id != id {
            return Err(ShieldError::BridgeUnavailable(format!(
                "reply id {} does not match call {id}",
                response.id
            )));
        }
        Ok(response.result)
    }

    pub fn channel_name(&self) -> &str {
        &self.channel_name
    }

    /// False once the host has shut down.
    pub fn is_connected(&self) -> bool {
        !self.tx.is_closed()
    }
}

/// Handle the platform adapter uses to report window lifecycle events.
#[derive(Clone)]
pub struct WindowHandle {
    tx: mpsc::Sender<HostMessage>,
}

impl WindowHandle {
    pub(crate) fn new(tx: mpsc::Sender<HostMessage>) -> Self {
        Self { tx }
    }

    /// The OS rebuilt the window; the host resets to unshielded.
    pub async fn recreated(&self) -> Result<()> {
        self.send(WindowEvent::Recreated).await
    }

    /// The window is gone; the host stops serving.
    pub async fn destroyed(&self) -> Result<()> {
        self.send(WindowEvent::Destroyed).await
    }

    async fn send(&self, event: WindowEvent) -> Result<()> {
        self.tx
            .send(HostMessage::Window(event))
            .await
            .map_err(|_| ShieldError::BridgeUnavailable("host channel closed".into()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::runtime::HostRuntime;
    use screenshield_bridge::MemorySurface;

    fn short_timeout() -> BridgeConfig {
        BridgeConfig {
            request_timeout_ms: 50,
            ..BridgeConfig::default()
        }
    }

    #[tokio::test]
    async fn unreachable_host_is_bridge_unavailable() {
        let surface = MemorySurface::new();
        let (runtime, client, _window) =
            HostRuntime::attach(Box::new(surface.clone()), BridgeConfig::default()).unwrap();
        drop(runtime);

        let err = client.enable_screen_shield().await.unwrap_err();
        assert!(err.is_bridge_unavailable());
        assert!(!surface.is_secure());
        assert_eq!(surface.apply_count(), 0);
    }

    #[tokio::test]
    async fn silent_host_times_out() {
        let surface = MemorySurface::new();
        let (mut runtime, client, _window) =
            HostRuntime::attach(Box::new(surface.clone()), short_timeout()).unwrap();

        // Runtime is alive but not pumped until the client gave up.
        let err = client.enable_screen_shield().await.unwrap_err();
        match err {
            ShieldError::BridgeUnavailable(msg) => assert!(msg.contains("50 ms")),
            other => panic!("unexpected error: {other}"),
        }

        runtime.pump();
        assert!(!runtime.state().is_shielded());
        assert_eq!(surface.apply_count(), 0);
    }

    #[tokio::test]
    async fn unknown_method_is_not_an_error() {
        let surface = MemorySurface::new();
        let (runtime, client, window) =
            HostRuntime::attach(Box::new(surface.clone()), BridgeConfig::default()).unwrap();
        let task = tokio::spawn(runtime.run());

        let result = client
            .invoke_method("captureScreen", serde_json::Value::Null)
            .await
            .unwrap();
        assert_eq!(result, CommandResult::NotImplemented);

        let result = client
            .invoke_method("enableScreenShield", serde_json::json!([1, 2, 3]))
            .await
            .unwrap();
        assert!(result.is_success());

        window.destroyed().await.unwrap();
        let host = task.await.unwrap();
        assert!(host.is_shielded());
        assert_eq!(surface.apply_count(), 1);
    }

    #[tokio::test]
    async fn platform_error_is_delivered_as_result() {
        let surface = MemorySurface::new();
        surface.set_failing(true);
        let (runtime, client, _window) =
            HostRuntime::attach(Box::new(surface.clone()), BridgeConfig::default()).unwrap();
        tokio::spawn(runtime.run());

        let result = client.enable_screen_shield().await.unwrap();
        assert!(matches!(result, CommandResult::PlatformError { .. }));
        assert!(client.is_connected());
    }

    #[tokio::test]
    async fn channel_name_comes_from_config() {
        let config = BridgeConfig {
            channel_name: "al_muhandis/screen_shield".into(),
            ..BridgeConfig::default()
        };
        let (_runtime, client, _window) =
            HostRuntime::attach(Box::new(MemorySurface::new()), config).unwrap();
        assert_eq!(client.channel_name(), "al_muhandis/screen_shield");
    }
}

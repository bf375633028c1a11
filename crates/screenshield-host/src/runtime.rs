// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Host runtime — single owner of the screen shield state machine.
//
// Clients and window lifecycle events share one bounded queue, so commands
// are processed one at a time in arrival order. The runtime can be driven
// as an async task (`run`) or pumped synchronously from the window's UI
// thread (`pump`), which is what Android needs.

use screenshield_bridge::SecureDisplaySurface;
use screenshield_core::error::Result;
use screenshield_core::{BridgeConfig, Command, MethodCall, MethodResponse, SecureDisplayState};
use tokio::sync::{mpsc, oneshot, watch};
use tracing::{debug, info, warn};

use crate::client::{BridgeClient, WindowHandle};
use crate::host::ScreenShieldHost;

/// Window lifecycle notifications from the platform adapter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WindowEvent {
    /// The OS rebuilt the window (rotation, process restore, ...).
    Recreated,
    /// The window is gone; the bridge shuts down.
    Destroyed,
}

/// Messages accepted by the runtime queue.
#[derive(Debug)]
pub enum HostMessage {
    Call {
        call: MethodCall,
        respond_to: oneshot::Sender<MethodResponse>,
    },
    Window(WindowEvent),
}

/// Whether the runtime should keep serving after a message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Flow {
    Continue,
    Shutdown,
}

/// Binds a [`ScreenShieldHost`] to its command queue and window lifecycle.
pub struct HostRuntime {
    host: ScreenShieldHost,
    rx: mpsc::Receiver<HostMessage>,
    config: BridgeConfig,
    closed: bool,
}

impl HostRuntime {
    /// Attach a host to a window surface and hand back the client side.
    ///
    /// The returned [`WindowHandle`] is for the platform adapter; the
    /// [`BridgeClient`] is for the UI layer and may be cloned freely.
    pub fn attach(
        surface: Box<dyn SecureDisplaySurface>,
        config: BridgeConfig,
    ) -> Result<(Self, BridgeClient, WindowHandle)> {
        config.validate()?;

        let (tx, rx) = mpsc::channel(config.queue_capacity);
        let host = ScreenShieldHost::new(surface, &config);

        let client = BridgeClient::new(tx.clone(), &config);
        let window = WindowHandle::new(tx);

        let mut runtime = Self {
            host,
            rx,
            config,
            closed: false,
        };
        info!(channel = %runtime.config.channel_name, "screen shield bridge attached");
        runtime.apply_attach_policy();

        Ok((runtime, client, window))
    }

    pub fn state(&self) -> SecureDisplayState {
        self.host.state()
    }

    pub fn subscribe(&self) -> watch::Receiver<SecureDisplayState> {
        self.host.subscribe()
    }

    pub fn host(&self) -> &ScreenShieldHost {
        &self.host
    }

    pub fn channel_name(&self) -> &str {
        &self.config.channel_name
    }

    /// Process every message already queued, without waiting.
    ///
    /// Returns the number of messages handled. Call from the thread that
    /// owns the window.
    pub fn pump(&mut self) -> usize {
        let mut handled = 0;
        while !self.closed {
            match self.rx.try_recv() {
                Ok(msg) => {
                    handled += 1;
                    if self.handle(msg) == Flow::Shutdown {
                        self.shutdown();
                    }
                }
                Err(_) => break,
            }
        }
        handled
    }

    /// Serve the queue until the window is destroyed or every sender is
    /// dropped. Returns the host so its final state can be inspected.
    pub async fn run(mut self) -> ScreenShieldHost {
        while !self.closed {
            match self.rx.recv().await {
                Some(msg) => {
                    if self.handle(msg) == Flow::Shutdown {
                        self.shutdown();
                    }
                }
                None => {
                    debug!("all bridge senders dropped");
                    self.closed = true;
                }
            }
        }
        info!("screen shield runtime stopped");
        self.host
    }

    /// Reset after the OS rebuilt the window. Same effect as a queued
    /// [`WindowEvent::Recreated`], for adapters that already run on the UI
    /// thread.
    pub fn on_window_recreated(&mut self) {
        self.host.reset_for_new_window();
        self.apply_attach_policy();
    }

    /// Tear the bridge down. In-flight and future client calls resolve with
    /// `BridgeUnavailable`.
    pub fn on_window_destroyed(mut self) -> ScreenShieldHost {
        self.shutdown();
        self.host
    }

    fn handle(&mut self, msg: HostMessage) -> Flow {
        match msg {
            HostMessage::Call { call, respond_to } => {
                // Abandoned calls never reach the surface: the caller already
                // resolved with `BridgeUnavailable`.
                if respond_to.is_closed() {
                    debug!(id = %call.id, method = %call.method, "skipping call abandoned by its client");
                    return Flow::Continue;
                }
                let response = self.host.handle_call(&call);
                if respond_to.send(response).is_err() {
                    debug!(id = %call.id, "bridge client went away before reply");
                }
                Flow::Continue
            }
            HostMessage::Window(WindowEvent::Recreated) => {
                self.on_window_recreated();
                Flow::Continue
            }
            HostMessage::Window(WindowEvent::Destroyed) => Flow::Shutdown,
        }
    }

    /// Close the queue and drop anything still waiting in it, which drops
    /// the pending reply senders.
    fn shutdown(&mut self) {
        if self.closed {
            return;
        }
        self.rx.close();
        let mut dropped = 0usize;
        while let Ok(msg) = self.rx.try_recv() {
            if let HostMessage::Call { call, .. } = msg {
                debug!(id = %call.id, method = %call.method, "dropping call on destroyed window");
                dropped += 1;
            }
        }
        self.closed = true;
        info!(dropped, "window destroyed — screen shield bridge closed");
    }

    fn apply_attach_policy(&mut self) {
        if !self.config.shield_on_attach {
            return;
        }
        let result = self.host.apply(Command::EnableScreenShield);
        if !result.is_success() {
            warn!(?result, "shield_on_attach could not protect the window");
        }
    }
}

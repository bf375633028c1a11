// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Secure-display state machine.
//
// Two states, Unshielded (initial) and Shielded. Each command re-applies the
// platform action even when the state would not change, and the state only
// moves after the platform call succeeded. No UI framework types appear
// here; the runtime module binds this to a window's lifecycle.

use std::collections::VecDeque;

use screenshield_bridge::SecureDisplaySurface;
use screenshield_core::{
    BridgeConfig, Command, CommandResult, MethodCall, MethodResponse, SecureDisplayState,
    ShieldError, Transition,
};
use tokio::sync::watch;
use tracing::{debug, info, warn};

/// Owner of the secure-display state for one hosting window.
pub struct ScreenShieldHost {
    surface: Box<dyn SecureDisplaySurface>,
    state: SecureDisplayState,
    history: VecDeque<Transition>,
    history_limit: usize,
    state_tx: watch::Sender<SecureDisplayState>,
}

impl ScreenShieldHost {
    pub fn new(surface: Box<dyn SecureDisplaySurface>, config: &BridgeConfig) -> Self {
        let (state_tx, _) = watch::channel(SecureDisplayState::Unshielded);
        info!(platform = surface.platform_name(), "screen shield host created");
        Self {
            surface,
            state: SecureDisplayState::Unshielded,
            history: VecDeque::with_capacity(config.history_limit.min(256)),
            history_limit: config.history_limit,
            state_tx,
        }
    }

    pub fn state(&self) -> SecureDisplayState {
        self.state
    }

    pub fn is_shielded(&self) -> bool {
        self.state.is_shielded()
    }

    /// Name of the underlying platform surface.
    pub fn platform_name(&self) -> &str {
        self.surface.platform_name()
    }

    /// Watch channel publishing the state after every change.
    pub fn subscribe(&self) -> watch::Receiver<SecureDisplayState> {
        self.state_tx.subscribe()
    }

    /// Processed commands, oldest first.
    pub fn history(&self) -> impl Iterator<Item = &Transition> {
        self.history.iter()
    }

    /// Most recently processed command.
    pub fn last_transition(&self) -> Option<&Transition> {
        self.history.back()
    }

    /// Dispatch a raw method name. Unknown names leave the state untouched.
    pub fn dispatch(&mut self, method: &str) -> CommandResult {
        match Command::from_method(method) {
            Some(command) => self.apply(command),
            None => {
                warn!(method, "method not implemented");
                CommandResult::NotImplemented
            }
        }
    }

    /// Handle a full method-call envelope. Arguments are ignored.
    pub fn handle_call(&mut self, call: &MethodCall) -> MethodResponse {
        let _span = tracing::debug_span!("method_call", id = %call.id, method = %call.method)
            .entered();
        if !call.arguments.is_null() {
            debug!("ignoring method arguments");
        }
        MethodResponse {
            id: call.id,
            result: self.dispatch(&call.method),
        }
    }

    /// Run one command through the platform surface and the state machine.
    pub fn apply(&mut self, command: Command) -> CommandResult {
        let target = command.target_state();

        if let Err(e) = self.surface.set_secure_display(target.is_shielded()) {
            warn!(%command, error = %e, "secure display toggle failed");
            return CommandResult::PlatformError {
                message: platform_message(&e),
            };
        }

        let transition = Transition::new(command, self.state);
        if transition.is_redundant() {
            debug!(%command, state = ?target, "re-applied current state");
        } else {
            info!(%command, from = ?transition.from, to = ?transition.to, "screen shield toggled");
        }

        self.state = target;
        self.record(transition);
        self.state_tx.send_replace(target);
        CommandResult::success()
    }

    /// Forget the state after the OS rebuilt the window. The fresh window
    /// carries no secure flag, so the surface is not called.
    pub fn reset_for_new_window(&mut self) {
        if self.state.is_shielded() {
            info!("window recreated — shield state reset");
        }
        self.state = SecureDisplayState::Unshielded;
        self.state_tx.send_replace(SecureDisplayState::Unshielded);
    }

    fn record(&mut self, transition: Transition) {
        if self.history_limit == 0 {
            return;
        }
        while self.history.len() >= self.history_limit {
            self.history.pop_front();
        }
        self.history.push_back(transition);
    }
}

fn platform_message(err: &ShieldError) -> String {
    match err {
        ShieldError::Platform(detail) => detail.clone(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use screenshield_bridge::MemorySurface;

    fn make_host() -> (ScreenShieldHost, MemorySurface) {
        let surface = MemorySurface::new();
        let host = ScreenShieldHost::new(Box::new(surface.clone()), &BridgeConfig::default());
        (host, surface)
    }

    #[test]
    fn starts_unshielded() {
        let (host, surface) = make_host();
        assert_eq!(host.state(), SecureDisplayState::Unshielded);
        assert!(!surface.is_secure());
        assert_eq!(surface.apply_count(), 0);
    }

    #[test]
    fn enable_then_disable() {
        let (mut host, surface) = make_host();

        assert_eq!(host.dispatch("enableScreenShield"), CommandResult::success());
        assert!(host.is_shielded());
        assert!(surface.is_secure());

        assert_eq!(host.dispatch("disableScreenShield"), CommandResult::success());
        assert!(!host.is_shielded());
        assert!(!surface.is_secure());
    }

    #[test]
    fn enable_twice_is_idempotent() {
        let (mut host, surface) = make_host();

        assert!(host.dispatch("enableScreenShield").is_success());
        assert!(host.dispatch("enableScreenShield").is_success());
        assert!(host.is_shielded());
        // Platform action re-applied on the redundant call.
        assert_eq!(surface.apply_count(), 2);
        assert!(host.last_transition().unwrap().is_redundant());
    }

    #[test]
    fn disable_while_unshielded_succeeds() {
        let (mut host, surface) = make_host();

        assert!(host.dispatch("disableScreenShield").is_success());
        assert!(!host.is_shielded());
        assert_eq!(surface.apply_count(), 1);
    }

    #[test]
    fn unknown_method_not_implemented_and_state_kept() {
        let (mut host, surface) = make_host();
        host.dispatch("enableScreenShield");

        for method in ["toggleScreenShield", "ENABLESCREENSHIELD", ""] {
            assert_eq!(host.dispatch(method), CommandResult::NotImplemented);
        }
        assert!(host.is_shielded());
        assert_eq!(surface.apply_count(), 1);
        assert_eq!(host.history().count(), 1);
    }

    #[test]
    fn final_state_follows_last_command() {
        let (mut host, _surface) = make_host();
        let sequences: &[&[&str]] = &[
            &["enableScreenShield"],
            &["enableScreenShield", "disableScreenShield"],
            &["disableScreenShield", "enableScreenShield", "enableScreenShield"],
            &["enableScreenShield", "bogus", "disableScreenShield", "bogus"],
        ];

        for seq in sequences {
            for method in *seq {
                host.dispatch(method);
            }
            let last = seq
                .iter()
                .rev()
                .find_map(|m| Command::from_method(m))
                .unwrap();
            assert_eq!(
                host.is_shielded(),
                last == Command::EnableScreenShield,
                "sequence {seq:?}"
            );
        }
    }

    #[test]
    fn platform_failure_reported_and_state_unchanged() {
        let (mut host, surface) = make_host();
        host.dispatch("enableScreenShield");
        surface.set_failing(true);

        let result = host.dispatch("disableScreenShield");
        assert_eq!(
            result,
            CommandResult::PlatformError {
                message: "simulated secure-display failure".into()
            }
        );
        assert!(host.is_shielded());
        assert!(surface.is_secure());
    }

    #[cfg(not(target_os = "android"))]
    #[test]
    fn stub_surface_is_not_a_silent_noop() {
        let mut host = ScreenShieldHost::new(
            Box::new(screenshield_bridge::stub::StubSurface),
            &BridgeConfig::default(),
        );
        let result = host.dispatch("enableScreenShield");
        assert!(matches!(result, CommandResult::PlatformError { .. }));
        assert!(!host.is_shielded());
    }

    #[test]
    fn handle_call_echoes_id_and_ignores_arguments() {
        let (mut host, _surface) = make_host();
        let call = MethodCall::new("enableScreenShield")
            .with_arguments(serde_json::json!({ "reason": "pin entry" }));

        let resp = host.handle_call(&call);
        assert_eq!(resp.id, call.id);
        assert!(resp.result.is_success());
    }

    #[test]
    fn watchers_see_changes() {
        let (mut host, _surface) = make_host();
        let rx = host.subscribe();

        host.dispatch("enableScreenShield");
        assert_eq!(*rx.borrow(), SecureDisplayState::Shielded);

        host.reset_for_new_window();
        assert_eq!(*rx.borrow(), SecureDisplayState::Unshielded);
    }

    #[test]
    fn history_is_bounded() {
        let surface = MemorySurface::new();
        let config = BridgeConfig {
            history_limit: 3,
            ..BridgeConfig::default()
        };
        let mut host = ScreenShieldHost::new(Box::new(surface), &config);

        for _ in 0..5 {
            host.dispatch("enableScreenShield");
            host.dispatch("disableScreenShield");
        }
        assert_eq!(host.history().count(), 3);
        assert_eq!(
            host.last_transition().unwrap().command,
            Command::DisableScreenShield
        );
    }
}

// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// One bridge session: attach a host, run the requested methods through a
// client, report each outcome, then tear the window down.

use serde::Serialize;

use screenshield_bridge::SecureDisplaySurface;
use screenshield_core::error::Result;
use screenshield_core::{BridgeConfig, CommandResult, SecureDisplayState};
use screenshield_host::HostRuntime;
use tracing::{info, warn};

/// Outcome of a single method call, printed as one JSON line.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Outcome {
    pub method: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<CommandResult>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    pub shielded: bool,
}

/// Final report of a session.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Report {
    pub channel: String,
    pub platform: String,
    pub outcomes: Vec<Outcome>,
    pub final_state: SecureDisplayState,
}

pub async fn run_session(
    surface: Box<dyn SecureDisplaySurface>,
    config: BridgeConfig,
    methods: &[String],
    recreate: bool,
) -> Result<Report> {
    let channel = config.channel_name.clone();
    let (runtime, client, window) = HostRuntime::attach(surface, config)?;
    let platform = runtime.host().platform_name().to_string();
    let state = runtime.subscribe();
    let task = tokio::spawn(runtime.run());

    let mut outcomes = Vec::with_capacity(methods.len());
    for method in methods {
        let outcome = match client
            .invoke_method(method, serde_json::Value::Null)
            .await
        {
            Ok(result) => Outcome {
                method: method.clone(),
                result: Some(result),
                error: None,
                shielded: state.borrow().is_shielded(),
            },
            Err(e) => {
                warn!(method = %method, error = %e, "bridge call failed");
                Outcome {
                    method: method.clone(),
                    result: None,
                    error: Some(e.to_string()),
                    shielded: state.borrow().is_shielded(),
                }
            }
        };
        outcomes.push(outcome);
    }

    if recreate {
        window.recreated().await?;
    }
    window.destroyed().await?;

    let final_state = match task.await {
        Ok(host) => host.state(),
        Err(e) => {
            warn!(error = %e, "host task ended abnormally");
            *state.borrow()
        }
    };
    info!(?final_state, calls = outcomes.len(), "session finished");

    Ok(Report {
        channel,
        platform,
        outcomes,
        final_state,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use screenshield_bridge::MemorySurface;

    fn methods(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    #[tokio::test]
    async fn session_reports_every_call() {
        let surface = MemorySurface::new();
        let report = run_session(
            Box::new(surface.clone()),
            BridgeConfig::default(),
            &methods(&["enableScreenShield", "bogus", "disableScreenShield"]),
            false,
        )
        .await
        .expect("session");

        assert_eq!(report.platform, "Memory");
        assert_eq!(report.outcomes.len(), 3);
        assert_eq!(report.outcomes[0].result, Some(CommandResult::success()));
        assert!(report.outcomes[0].shielded);
        assert_eq!(report.outcomes[1].result, Some(CommandResult::NotImplemented));
        assert!(report.outcomes[1].shielded);
        assert!(!report.outcomes[2].shielded);
        assert_eq!(report.final_state, SecureDisplayState::Unshielded);
        assert!(!surface.is_secure());
    }

    #[tokio::test]
    async fn recreate_resets_final_state() {
        let report = run_session(
            Box::new(MemorySurface::new()),
            BridgeConfig::default(),
            &methods(&["enableScreenShield"]),
            true,
        )
        .await
        .expect("session");

        assert!(report.outcomes[0].shielded);
        assert_eq!(report.final_state, SecureDisplayState::Unshielded);
    }

    #[tokio::test]
    async fn failing_surface_reports_platform_error() {
        let surface = MemorySurface::new();
        surface.set_failing(true);
        let report = run_session(
            Box::new(surface),
            BridgeConfig::default(),
            &methods(&["enableScreenShield"]),
            false,
        )
        .await
        .expect("session");

        assert!(matches!(
            report.outcomes[0].result,
            Some(CommandResult::PlatformError { .. })
        ));
        assert!(!report.outcomes[0].shielded);
    }

    #[test]
    fn outcome_json_omits_empty_fields() {
        let outcome = Outcome {
            method: "enableScreenShield".into(),
            result: Some(CommandResult::success()),
            error: None,
            shielded: true,
        };
        let json = serde_json::to_value(&outcome).unwrap();
        assert!(json.get("error").is_none());
        assert_eq!(json["result"]["success"], true);
    }
}

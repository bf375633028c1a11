// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Screen Shield Host — the secure-display state machine, the runtime that
// serializes commands onto a single owner, and the async client the UI layer
// calls through.

pub mod client;
pub mod host;
pub mod runtime;

pub use client::{BridgeClient, WindowHandle};
pub use host::ScreenShieldHost;
pub use runtime::HostRuntime;

// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Platform-agnostic capability for marking a display surface as secure.

use screenshield_core::error::Result;

/// A window (or equivalent) whose contents can be excluded from screenshots
/// and screen recordings.
///
/// Implementations must be idempotent: setting the flag to the value it
/// already has is a normal call that re-applies the platform action.
pub trait SecureDisplaySurface: Send {
    /// Human-readable platform name (e.g. "Android", "Desktop (stub)").
    fn platform_name(&self) -> &str;

    /// Apply (`true`) or remove (`false`) capture protection.
    ///
    /// Failures are returned as `ShieldError::Platform` or
    /// `ShieldError::PlatformUnavailable`; implementations must not panic.
    fn set_secure_display(&self, secure: bool) -> Result<()>;
}

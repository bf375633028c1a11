// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Stub surface for desktop/CI builds where no native capture protection exists.
//
// It refuses rather than pretending: the host turns the refusal into a
// `PlatformError` result so callers never believe the screen is protected.

use screenshield_core::error::{Result, ShieldError};

use crate::traits::SecureDisplaySurface;

/// Surface returned on platforms without a native implementation.
pub struct StubSurface;

impl SecureDisplaySurface for StubSurface {
    fn platform_name(&self) -> &str {
        "Desktop (stub)"
    }

    fn set_secure_display(&self, secure: bool) -> Result<()> {
        tracing::warn!(secure, "SecureDisplaySurface::set_secure_display called on stub surface");
        Err(ShieldError::PlatformUnavailable)
    }
}

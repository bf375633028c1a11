// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// In-memory surface for headless runs and tests.
//
// Records the flag and every platform call. Clones share the same state, so
// a test can hand one clone to the host and inspect the other.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use screenshield_core::error::{Result, ShieldError};

use crate::traits::SecureDisplaySurface;

#[derive(Debug, Default)]
struct Inner {
    secure: AtomicBool,
    applied: AtomicUsize,
    failing: AtomicBool,
}

/// A surface backed by an in-process flag.
#[derive(Debug, Clone, Default)]
pub struct MemorySurface {
    inner: Arc<Inner>,
}

impl MemorySurface {
    /// Create an unsecured surface with no recorded calls.
    pub fn new() -> Self {
        Self::default()
    }

    /// Current value of the simulated secure flag.
    pub fn is_secure(&self) -> bool {
        self.inner.secure.load(Ordering::SeqCst)
    }

    /// Number of successful platform calls so far.
    pub fn apply_count(&self) -> usize {
        self.inner.applied.load(Ordering::SeqCst)
    }

    /// Make every following call fail with `ShieldError::Platform`.
    pub fn set_failing(&self, failing: bool) {
        self.inner.failing.store(failing, Ordering::SeqCst);
    }

    /// Simulate the OS dropping the flag, e.g. when the window is rebuilt.
    pub fn reset(&self) {
        self.inner.secure.store(false, Ordering::SeqCst);
    }
}

impl SecureDisplaySurface for MemorySurface {
    fn platform_name(&self) -> &str {
        "Memory"
    }

    fn set_secure_display(&self, secure: bool) -> Result<()> {
        if self.inner.failing.load(Ordering::SeqCst) {
            return Err(ShieldError::Platform(
                "simulated secure-display failure".into(),
            ));
        }
        self.inner.secure.store(secure, Ordering::SeqCst);
        self.inner.applied.fetch_add(1, Ordering::SeqCst);
        tracing::debug!(secure, "memory surface updated");
        Ok(())
    }
}

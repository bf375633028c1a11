// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>

//! Screen Shield — native secure-display surfaces.
//!
//! The host never talks to a window directly. It holds a
//! [`traits::SecureDisplaySurface`] and asks it to turn capture protection
//! on or off; this crate supplies the per-platform implementations.

pub mod memory;
pub mod traits;

#[cfg(target_os = "android")]
pub mod android;

#[cfg(not(target_os = "android"))]
pub mod stub;

pub use memory::MemorySurface;
pub use traits::SecureDisplaySurface;

/// Returns the surface implementation for the target operating system.
pub fn platform_surface() -> Box<dyn traits::SecureDisplaySurface> {
    #[cfg(target_os = "android")]
    {
        // Android: toggles FLAG_SECURE on the hosting Activity's window via JNI.
        Box::new(android::AndroidSurface::new())
    }
    #[cfg(not(target_os = "android"))]
    {
        // DESKTOP/CI: no native capture protection; every call reports
        // PlatformUnavailable.
        Box::new(stub::StubSurface)
    }
}

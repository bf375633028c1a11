// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Android secure-display surface via JNI.
//
// Requires the Android NDK and targets `aarch64-linux-android` or
// `armv7-linux-androideabi`. The surface sets or clears
// `WindowManager.LayoutParams.FLAG_SECURE` on the hosting Activity's window.
//
// ## Threading
//
// Android only allows window attribute changes from the thread that created
// the view hierarchy. Drive the host with `HostRuntime::pump` from the
// Activity's main looper (or post to it) rather than from a worker thread;
// a wrong-thread call surfaces as a `Platform` error, not a crash.

#![cfg(target_os = "android")]

use jni::JNIEnv;
use jni::objects::{JObject, JValue};

use screenshield_core::error::{Result, ShieldError};

use crate::traits::SecureDisplaySurface;

/// `WindowManager.LayoutParams.FLAG_SECURE`.
pub const FLAG_SECURE: i32 = 0x0000_2000;

// ---------------------------------------------------------------------------
// JNI helpers
// ---------------------------------------------------------------------------

/// Map a JNI failure into `ShieldError::Platform`, clearing any pending Java
/// exception so the next JNI call on this thread is not poisoned.
fn jni_err(env: &mut JNIEnv<'_>, context: &str, e: jni::errors::Error) -> ShieldError {
    if env.exception_check().unwrap_or(false) {
        let _ = env.exception_describe();
        let _ = env.exception_clear();
    }
    ShieldError::Platform(format!("{context}: {e}"))
}

/// Attach to the JVM, resolve the hosting Activity's `Window`, and run `f`
/// against it.
///
/// The `JavaVM*` and Activity `jobject` come from `ndk_context`, which is
/// populated by `android_main` / `ANativeActivity_onCreate` or by the host
/// application's JNI_OnLoad glue.
fn with_window<F>(f: F) -> Result<()>
where
    F: FnOnce(&mut JNIEnv<'_>, &JObject<'_>) -> Result<()>,
{
    let ctx = ndk_context::android_context();
    if ctx.context().is_null() {
        return Err(ShieldError::Platform(
            "Android context is null — hosting activity not initialised".into(),
        ));
    }

    // SAFETY: `ctx.vm()` returns the `JavaVM*` set by the NDK glue code and
    // stays valid for the lifetime of the process.
    let vm = unsafe { jni::JavaVM::from_raw(ctx.vm().cast()) }
        .map_err(|e| ShieldError::Platform(format!("failed to obtain JavaVM: {e}")))?;
    let mut env = vm
        .attach_current_thread()
        .map_err(|e| ShieldError::Platform(format!("failed to attach JNI thread: {e}")))?;

    // SAFETY: the context pointer is a global reference to the hosting
    // Activity, checked non-null above.
    let activity = unsafe { JObject::from_raw(ctx.context().cast()) };

    let window = match env
        .call_method(&activity, "getWindow", "()Landroid/view/Window;", &[])
        .and_then(|v| v.l())
    {
        Ok(window) => window,
        Err(e) => return Err(jni_err(&mut *env, "Activity.getWindow", e)),
    };
    if window.is_null() {
        return Err(ShieldError::Platform(
            "Activity has no window attached".into(),
        ));
    }
    // The UI thread is already attached, so no frame is popped on return;
    // release the local ref ourselves.
    let window = env.auto_local(window);

    f(&mut *env, &window)
}

// ---------------------------------------------------------------------------
// Surface
// ---------------------------------------------------------------------------

/// Android implementation of [`SecureDisplaySurface`].
///
/// Zero-sized; the flag itself lives on the Java `Window`.
pub struct AndroidSurface;

impl AndroidSurface {
    /// Create a new Android surface.
    ///
    /// Does not touch JNI; the first call happens on the first toggle.
    pub fn new() -> Self {
        Self
    }
}

impl Default for AndroidSurface {
    fn default() -> Self {
        Self::new()
    }
}

impl SecureDisplaySurface for AndroidSurface {
    fn platform_name(&self) -> &str {
        "Android"
    }

    fn set_secure_display(&self, secure: bool) -> Result<()> {
        with_window(|env, window| {
            let call = if secure {
                // window.setFlags(FLAG_SECURE, FLAG_SECURE)
                env.call_method(
                    window,
                    "setFlags",
                    "(II)V",
                    &[JValue::Int(FLAG_SECURE), JValue::Int(FLAG_SECURE)],
                )
            } else {
                // window.clearFlags(FLAG_SECURE)
                env.call_method(window, "clearFlags", "(I)V", &[JValue::Int(FLAG_SECURE)])
            };

            match call {
                Ok(_) => {
                    tracing::info!(secure, "Android: FLAG_SECURE updated");
                    Ok(())
                }
                Err(e) => {
                    let method = if secure { "Window.setFlags" } else { "Window.clearFlags" };
                    Err(jni_err(env, method, e))
                }
            }
        })
    }
}

//! C ABI exports — the public surface loaded by the Flutter host.
//!
//! All functions are `extern "C"` and `#[unsafe(no_mangle)]`. The host calls
//! `murmur_dart_init_api` once with the posting primitive it resolved from
//! the runtime's dynamic-linking API, then hands the listener table from
//! `murmur_dart_get_listener` to the native SDK.

use std::ffi::{c_char, CStr};

use crate::bridge::port::{self, DartPort, DartPostFn};
use crate::dispatch;
use crate::error::FfiResult;

/// Helper: read a C string pointer into a Rust String, returning None on null or invalid UTF-8.
unsafe fn read_c_str(ptr: *const c_char) -> Option<String> {
    if ptr.is_null() {
        return None;
    }
    unsafe { CStr::from_ptr(ptr) }.to_str().ok().map(String::from)
}

// ─── Initialization ──────────────────────────────────────────────────

/// Register the host's posting primitive.
///
/// Must be called before any notification is forwarded; calling again
/// replaces the previous primitive.
///
/// # Safety
///
/// `post_fn` must be a function pointer resolved from the host runtime's
/// dynamic-linking API, valid for the lifetime of the process and safe to
/// invoke from any thread, or null.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn murmur_dart_init_api(post_fn: Option<DartPostFn>) -> i32 {
    let Some(post_fn) = post_fn else {
        tracing::error!("murmur_dart_init_api: null posting primitive");
        return FfiResult::InvalidArgument as i32;
    };
    port::set_post_fn(post_fn);
    tracing::debug!("murmur_dart_init_api: posting primitive registered");
    FfiResult::Ok as i32
}

/// Unregister the posting primitive.
///
/// Notifications forwarded afterwards are logged and dropped.
/// Safe to call multiple times — second call is a no-op.
#[unsafe(no_mangle)]
pub extern "C" fn murmur_dart_deinit_api() {
    port::clear_post_fn();
    tracing::debug!("murmur_dart_deinit_api: posting primitive cleared");
}

/// Install a `tracing` subscriber reading the `RUST_LOG` environment filter.
///
/// Idempotent: if a subscriber is already installed (by an earlier call or by
/// the embedding process), the call is a no-op.
#[unsafe(no_mangle)]
pub extern "C" fn murmur_dart_init_logging() -> i32 {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .try_init();
    FfiResult::Ok as i32
}

// ─── Method-channel entry ────────────────────────────────────────────

/// Forward a method-channel notification to a Dart isolate port.
///
/// Duplicates `message` before returning, so the caller may reclaim its
/// buffer immediately. Delivery is asynchronous and fire-and-forget:
/// failures are logged, never reported back.
///
/// # Safety
///
/// `message` must be a valid, NUL-terminated UTF-8 C string, or null.
/// `port` must be a port handle previously obtained from the host runtime.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn murmur_dart_on_method_channel(port: DartPort, message: *const c_char) {
    let Some(msg) = (unsafe { read_c_str(message) }) else {
        tracing::error!("murmur_dart_on_method_channel: null or non-UTF-8 message for port {port}");
        return;
    };
    dispatch::dispatch(port, msg);
}

// ─── Listener table ──────────────────────────────────────────────────

/// Method-channel callback signature handed to the native SDK.
pub type MethodChannelFn = unsafe extern "C" fn(port: DartPort, message: *const c_char);

/// Table of listener entry points consumed by the embedding host.
#[repr(C)]
pub struct MurmurListener {
    /// Invoked by the SDK for every method-channel notification.
    pub on_method_channel: Option<MethodChannelFn>,
}

/// Build the listener table wired to this bridge.
#[unsafe(no_mangle)]
pub extern "C" fn murmur_dart_get_listener() -> MurmurListener {
    MurmurListener {
        on_method_channel: Some(murmur_dart_on_method_channel),
    }
}

// ─── Tests ───────────────────────────────────────────────────────────

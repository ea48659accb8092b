//! FFI bridge forwarding native method-channel notifications into Dart isolates.
//!
//! Exposes a C ABI (`extern "C"`) surface that a Flutter host loads as a
//! dynamic library. The host registers the Dart posting primitive once at
//! startup; every notification is then duplicated into an owned buffer and
//! delivered to its destination isolate port from a background task.

pub mod bridge;
pub mod dispatch;
pub mod error;

use once_cell::sync::Lazy;

/// Shared tokio runtime for all post deliveries.
/// Two worker threads — enough to drain one-shot posts without over-subscribing the system.
pub(crate) static RUNTIME: Lazy<tokio::runtime::Runtime> = Lazy::new(|| {
    tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .worker_threads(2)
        .build()
        .expect("Failed to create tokio runtime")
});

//! One-shot delivery scheduling.
//!
//! Each notification becomes a [`PendingPost`] moved onto the shared runtime;
//! the notifying thread never waits on the post itself.

use crate::bridge::port::{self, DartPort};
use crate::error::DispatchError;
use crate::RUNTIME;

/// A payload on its way to an isolate port.
///
/// Owns the duplicated message exclusively from creation until the post
/// attempt completes, then is dropped, success or failure.
#[derive(Debug)]
pub struct PendingPost {
    port: DartPort,
    payload: String,
}

impl PendingPost {
    /// Package a destination port with an owned payload.
    pub fn new(port: DartPort, payload: String) -> Self {
        Self { port, payload }
    }

    /// Attempt delivery through the currently registered primitive.
    fn deliver(self) -> Result<(), DispatchError> {
        let sink = port::current_sink(self.port).ok_or(DispatchError::NoPostFn)?;
        sink.post_string(self.payload)
    }
}

/// Schedule `message` for asynchronous delivery to `port`.
///
/// Returns as soon as the task is queued; the post itself runs on a runtime
/// worker, strictly after this call. Failures are logged, never reported
/// back — the contract is fire-and-forget. Relative ordering across
/// concurrent calls is unspecified.
pub fn dispatch(port: DartPort, message: String) {
    if !port::has_post_fn() {
        tracing::warn!("no posting primitive registered, dropping message for port {port}");
        return;
    }
    let pending = PendingPost::new(port, message);
    RUNTIME.spawn(async move {
        if let Err(e) = pending.deliver() {
            tracing::warn!("method-channel delivery failed: {e}");
        }
    });
}

//! Registration of the host's posting primitive and the safe posting wrapper.

use once_cell::sync::Lazy;
use parking_lot::RwLock;

use crate::bridge::cobject::DartCObject;
use crate::error::DispatchError;

/// Opaque handle identifying a Dart isolate's inbound message queue.
pub type DartPort = i64;

/// C signature of the host's asynchronous post primitive.
///
/// Returns true when the value was enqueued on the destination isolate's
/// port. The host resolves this function through its dynamic-linking API and
/// hands it to the bridge once at startup.
pub type DartPostFn = unsafe extern "C" fn(port: DartPort, value: *mut DartCObject) -> bool;

/// Process-wide slot holding the registered posting primitive.
static POST_FN: Lazy<RwLock<Option<DartPostFn>>> = Lazy::new(|| RwLock::new(None));

/// Register the posting primitive, replacing any previous registration.
pub fn set_post_fn(post_fn: DartPostFn) {
    *POST_FN.write() = Some(post_fn);
}

/// Clear the registered primitive. Posts scheduled afterwards are dropped.
pub fn clear_post_fn() {
    *POST_FN.write() = None;
}

/// Whether a posting primitive is currently registered.
pub fn has_post_fn() -> bool {
    POST_FN.read().is_some()
}

/// Snapshot the registered primitive paired with a destination port.
pub fn current_sink(port: DartPort) -> Option<IsolateSink> {
    (*POST_FN.read()).map(|post_fn| IsolateSink { port, post_fn })
}

/// Pairs a destination port with the posting primitive.
///
/// The embedding host guarantees the primitive stays valid for the lifetime
/// of the process and is safe to invoke from any thread; the sink may
/// therefore be moved freely onto runtime workers.
#[derive(Clone, Copy)]
pub struct IsolateSink {
    port: DartPort,
    post_fn: DartPostFn,
}

impl IsolateSink {
    /// Create a sink from a destination port and a posting primitive.
    pub fn new(port: DartPort, post_fn: DartPostFn) -> Self {
        Self { port, post_fn }
    }

    /// Destination port of this sink.
    pub fn port(&self) -> DartPort {
        self.port
    }

    /// Deliver an owned string payload to the destination isolate.
    ///
    /// Consumes the payload either way; the host copies the bytes into the
    /// isolate's heap before the posting primitive returns.
    pub fn post_string(&self, payload: String) -> Result<(), DispatchError> {
        let mut value = DartCObject::string(payload)?;
        let posted = unsafe { (self.post_fn)(self.port, value.as_mut_ptr()) };
        if posted {
            Ok(())
        } else {
            Err(DispatchError::PostRejected(self.port))
        }
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    //! Mock posting primitives shared by the unit tests.
    //!
    //! The registered primitive is process-wide state, so tests that touch it
    //! serialize on [`lock_post_fn`], which also starts them from a clean slate.

    use std::ffi::CStr;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::{Duration, Instant};

    use once_cell::sync::Lazy;
    use parking_lot::{Mutex, MutexGuard};

    use super::DartPort;
    use crate::bridge::cobject::{DartCObject, DartCObjectType};

    static POST_FN_LOCK: Mutex<()> = Mutex::new(());

    /// Every (port, payload) pair observed by [`recording_post`].
    pub(crate) static POSTED: Lazy<Mutex<Vec<(DartPort, String)>>> =
        Lazy::new(|| Mutex::new(Vec::new()));

    /// Number of posts refused by [`rejecting_post`].
    pub(crate) static REJECTED: AtomicUsize = AtomicUsize::new(0);

    /// Serialize a test against the process-wide primitive slot and reset all
    /// recording state.
    pub(crate) fn lock_post_fn() -> MutexGuard<'static, ()> {
        let guard = POST_FN_LOCK.lock();
        super::clear_post_fn();
        POSTED.lock().clear();
        REJECTED.store(0, Ordering::SeqCst);
        guard
    }

    /// Records the port and payload of every post, then reports success.
    pub(crate) unsafe extern "C" fn recording_post(
        port: DartPort,
        value: *mut DartCObject,
    ) -> bool {
        let obj = unsafe { &*value };
        assert_eq!(obj.ty, DartCObjectType::String);
        let text = unsafe { CStr::from_ptr(obj.value.as_string) }
            .to_str()
            .expect("posted payload was not UTF-8")
            .to_string();
        POSTED.lock().push((port, text));
        true
    }

    /// Refuses every post, counting the attempts.
    pub(crate) unsafe extern "C" fn rejecting_post(
        _port: DartPort,
        _value: *mut DartCObject,
    ) -> bool {
        REJECTED.fetch_add(1, Ordering::SeqCst);
        false
    }

    /// Wait until `n` posts have been recorded, panicking after 5 seconds.
    pub(crate) fn wait_for_posts(n: usize) -> Vec<(DartPort, String)> {
        let deadline = Instant::now() + Duration::from_secs(5);
        loop {
            {
                let posted = POSTED.lock();
                if posted.len() >= n {
                    return posted.clone();
                }
            }
            assert!(Instant::now() < deadline, "timed out waiting for {n} posts");
            std::thread::sleep(Duration::from_millis(10));
        }
    }

    /// Wait until `n` posts have been refused, panicking after 5 seconds.
    pub(crate) fn wait_for_rejections(n: usize) {
        let deadline = Instant::now() + Duration::from_secs(5);
        while REJECTED.load(Ordering::SeqCst) < n {
            assert!(
                Instant::now() < deadline,
                "timed out waiting for {n} rejections"
            );
            std::thread::sleep(Duration::from_millis(10));
        }
    }
}

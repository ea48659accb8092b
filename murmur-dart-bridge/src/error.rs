//! FFI status codes and internal delivery errors.

use crate::bridge::port::DartPort;

/// Status codes for the C ABI surface.
///
/// Every `murmur_dart_*` function that returns `i32` uses these values.
#[repr(i32)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FfiResult {
    /// Success.
    Ok = 0,
    /// A required argument was null or not valid UTF-8.
    InvalidArgument = 1,
}

/// Why a scheduled post never reached the destination isolate.
///
/// Absorbed where it occurs: logged, never returned across the ABI — the
/// dispatch contract is fire-and-forget.
#[derive(Debug, thiserror::Error)]
pub enum DispatchError {
    /// No posting primitive has been registered yet.
    #[error("no posting primitive registered")]
    NoPostFn,
    /// The payload contains an interior NUL byte and cannot cross the C boundary.
    #[error("payload cannot cross the C boundary: {0}")]
    InvalidPayload(#[from] std::ffi::NulError),
    /// The host's posting primitive reported failure.
    #[error("isolate port {0} rejected the post")]
    PostRejected(DartPort),
}

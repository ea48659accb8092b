//! Mirror of the host runtime's tagged boundary value.
//!
//! The posting primitive takes a discriminated union; this bridge only ever
//! constructs the string variant, but the discriminants and layout must match
//! the host ABI exactly so the struct can be handed over as-is.

use std::ffi::{c_char, CString, NulError};

/// Discriminant values of the host's tagged union.
///
/// Only `String` is constructed by this crate; the preceding variants are
/// listed so the discriminant values line up with the host ABI.
#[repr(i32)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DartCObjectType {
    Null = 0,
    Bool = 1,
    Int32 = 2,
    Int64 = 3,
    Double = 4,
    String = 5,
}

/// Payload union of a [`DartCObject`].
#[repr(C)]
pub union DartCObjectValue {
    pub as_bool: bool,
    pub as_int32: i32,
    pub as_int64: i64,
    pub as_double: f64,
    pub as_string: *mut c_char,
}

/// A tagged value on its way into a Dart isolate.
///
/// The string variant owns its buffer: it is allocated from the payload on
/// construction and reclaimed on drop. The host copies the bytes into the
/// isolate's heap before the posting primitive returns, so dropping right
/// after the post is safe.
#[repr(C)]
pub struct DartCObject {
    pub ty: DartCObjectType,
    pub value: DartCObjectValue,
}

impl DartCObject {
    /// Wrap an owned string payload.
    ///
    /// Fails if the payload contains an interior NUL byte, which cannot be
    /// represented as a NUL-terminated C string.
    pub fn string(payload: String) -> Result<Self, NulError> {
        let cstr = CString::new(payload)?;
        Ok(Self {
            ty: DartCObjectType::String,
            value: DartCObjectValue {
                as_string: cstr.into_raw(),
            },
        })
    }

    /// Raw pointer for handing the value to the posting primitive.
    pub fn as_mut_ptr(&mut self) -> *mut DartCObject {
        self as *mut DartCObject
    }
}

impl Drop for DartCObject {
    fn drop(&mut self) {
        if self.ty == DartCObjectType::String {
            let ptr = unsafe { self.value.as_string };
            if !ptr.is_null() {
                drop(unsafe { CString::from_raw(ptr) });
            }
        }
    }
}

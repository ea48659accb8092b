//! The C ABI boundary: exported symbols, the tagged boundary value, and the
//! posting-primitive plumbing.

pub mod abi;
pub mod cobject;
pub mod port;

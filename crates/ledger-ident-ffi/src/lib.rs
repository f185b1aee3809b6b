//! # Ledger Ident FFI
//!
//! C ABI over [`ledger_ident_core`]. Every operation follows one calling
//! convention:
//!
//! 1. Inputs arrive as `(pointer, length)` byte ranges or NUL-terminated
//!    strings, read-only for the duration of the call.
//! 2. Each variable-length output is a caller-owned `(buffer, capacity)` pair
//!    plus an `actual_length` out-parameter.
//! 3. The return value is a status code from [`StateCode`]. On
//!    [`StateCode::InternalErr`] a NUL-terminated ASCII diagnostic is written
//!    to the caller's error buffer.
//!
//! Nothing is allocated on behalf of the host except identity key material,
//! which lives behind an [`IdentityHandle`] until `identity_free`.
//!
//! ## Status Codes
//!
//! | Code | Meaning |
//! |---|---|
//! | `0` | success, outputs valid up to their actual lengths |
//! | `-1` | an output would exceed its capacity; nothing committed |
//! | `-2` | backend failure; diagnostic written |
//! | `-3` | backend failure; diagnostic did not fit and was omitted |

pub mod error;
pub mod identity;
pub mod principal;
pub mod status;

pub use error::FfiError;
pub use identity::{live_handles, IdentityHandle};
pub use status::StateCode;

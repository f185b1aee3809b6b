//! Error types for FFI operations.

use ledger_ident_core::{IdentityError, PrincipalError};
use thiserror::Error;

use crate::status::StateCode;

#[derive(Debug, Error)]
pub enum FfiError {
    #[error("output buffer too small")]
    DataOverflow,

    #[error("{0}")]
    Principal(#[from] PrincipalError),

    #[error("{0}")]
    Identity(#[from] IdentityError),

    #[error("null pointer: {0}")]
    NullPointer(&'static str),

    #[error("invalid UTF-8 in {0}")]
    InvalidUtf8(&'static str),

    #[error("invalid identity handle")]
    InvalidHandle,

    #[error("identity handle already holds key material")]
    HandleInUse,

    #[error("panic at boundary: {0}")]
    Panic(String),
}

impl FfiError {
    /// Status reported for this error, before diagnostic capacity is known.
    pub fn status_code(&self) -> StateCode {
        match self {
            Self::DataOverflow => StateCode::DataOverflow,
            _ => StateCode::InternalErr,
        }
    }
}

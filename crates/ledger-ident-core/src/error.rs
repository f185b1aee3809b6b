//! Error types for the core primitives.

use thiserror::Error;

use crate::principal::MAX_LENGTH_IN_BYTES;

/// Errors raised while constructing or parsing a principal.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PrincipalError {
    #[error("principal is {0} bytes long, the maximum is {MAX_LENGTH_IN_BYTES}")]
    BytesTooLong(usize),

    #[error("text is too short to carry a checksum")]
    TextTooShort,

    #[error("invalid base32 character {0:?}")]
    InvalidBase32(char),

    #[error("checksum mismatch: expected {expected:08x}, found {found:08x}")]
    ChecksumMismatch { expected: u32, found: u32 },

    #[error("text is not in canonical grouping, expected {0}")]
    AbnormalGrouping(String),
}

/// Errors raised by key material: import, encoding, signing.
#[derive(Debug, Error)]
pub enum IdentityError {
    #[error("invalid PEM: {0}")]
    Pem(String),

    #[error("cannot read PEM file: {0}")]
    Io(#[from] std::io::Error),

    #[error("public key encoding failed: {0}")]
    PublicKeyEncoding(String),

    #[error("signing failed: {0}")]
    Signing(String),

    #[error("anonymous identity cannot sign")]
    AnonymousSign,
}

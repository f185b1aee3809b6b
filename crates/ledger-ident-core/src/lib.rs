//! # Ledger Ident Core
//!
//! Pure primitives for ledger identities: principals, their textual encoding,
//! and the key material that signs on behalf of a principal.
//!
//! This crate contains no FFI and no global state. It is pure computation
//! over identifiers and keys; the boundary crates build on it.
//!
//! ## Key Types
//!
//! - [`Principal`] - Content-addressed ledger identifier (0 to 29 bytes)
//! - [`KeyMaterial`] - Anonymous, Ed25519 or secp256k1 signing key
//! - [`IdentityType`] - Discriminator for the key material variant
//! - [`Signature`] - Public key plus signature produced by [`KeyMaterial::sign`]
//!
//! ## Textual Form
//!
//! Principals render as lowercase base32 of `crc32(bytes) || bytes`, split
//! into groups of five characters. See the [`text`] module.

pub mod error;
pub mod identity;
pub mod principal;
pub mod text;

pub use error::{IdentityError, PrincipalError};
pub use identity::{IdentityType, KeyMaterial, Signature};
pub use principal::{Principal, ANONYMOUS_TAG, MAX_LENGTH_IN_BYTES, SELF_AUTHENTICATING_TAG};

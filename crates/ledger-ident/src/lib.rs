//! # Ledger Ident
//!
//! Safe caller over the identity boundary exported by [`ledger_ident_ffi`].
//!
//! ## Overview
//!
//! - [`Boundary`]: the calling context. Carries the [`Capacities`] every
//!   call sizes its output buffers with, and exposes every principal
//!   derivation and identity constructor.
//! - [`Identity`]: owned signing capability, one of anonymous, Ed25519 or
//!   secp256k1. Dropping it releases the callee-side key material.
//! - [`Error`]: the status taxonomy. Only [`Error::DataOverflow`] is
//!   recoverable; unknown status codes panic.
//!
//! ## Example
//!
//! ```rust
//! use ledger_ident::{Boundary, Capacities, Error};
//!
//! let boundary = Boundary::default();
//! let anonymous = boundary.principal_from_text("2vxsx-fae").unwrap();
//! assert_eq!(anonymous.as_slice(), &[0x04]);
//!
//! let identity = boundary.basic_random().unwrap();
//! let signature = identity.sign(b"hello").unwrap();
//! assert_eq!(
//!     identity.sender().unwrap(),
//!     boundary.self_authenticating(&signature.public_key).unwrap()
//! );
//!
//! let tight = Boundary::new(Capacities::default().with_identifier(0));
//! assert!(matches!(tight.anonymous(), Err(Error::DataOverflow { .. })));
//! ```

pub mod boundary;
pub mod config;
pub mod error;
pub mod identity;
mod protocol;

pub use boundary::Boundary;
pub use config::Capacities;
pub use error::{Error, Result};
pub use identity::{Identity, NativeIdentity};

pub use ledger_ident_core::{IdentityType, Principal, PrincipalError, Signature};
pub use ledger_ident_ffi::StateCode;

//! Identities owned across the boundary.
//!
//! Key material lives on the callee side. An [`Identity`] owns exactly one
//! handle to it and releases that handle when dropped; it cannot be cloned.

use std::fmt;
use std::path::Path;

use ledger_ident_core::{IdentityType, Principal, Signature};
use ledger_ident_ffi::IdentityHandle;
use parking_lot::Mutex;

use crate::boundary::Boundary;
use crate::error::{Error, Result};
use crate::protocol::protocol_violation;

/// An owned handle to callee-side key material.
///
/// Calls through one handle are serialized by its lock.
pub struct NativeIdentity {
    handle: Mutex<IdentityHandle>,
    boundary: Boundary,
}

// SAFETY: the handle points at key material only ever touched through the
// callee, and every access goes through the mutex. The handle is freed once,
// in `Drop`, when no other reference can exist.
unsafe impl Send for NativeIdentity {}
unsafe impl Sync for NativeIdentity {}

impl NativeIdentity {
    fn new(handle: IdentityHandle, boundary: Boundary) -> Self {
        Self {
            handle: Mutex::new(handle),
            boundary,
        }
    }

    /// The boundary this identity makes its calls with.
    pub fn boundary(&self) -> &Boundary {
        &self.boundary
    }

    fn sender(&self) -> Result<Principal> {
        let handle = self.handle.lock();
        self.boundary.sender(&handle)
    }

    fn sign(&self, message: &[u8]) -> Result<Signature> {
        let handle = self.handle.lock();
        self.boundary.sign(&handle, message)
    }
}

impl Drop for NativeIdentity {
    fn drop(&mut self) {
        let handle = self.handle.get_mut();
        if handle.is_null() {
            return;
        }
        let identity_type = handle.identity_type();
        match self.boundary.free(handle) {
            Ok(()) => tracing::debug!(?identity_type, "identity released"),
            Err(err) => release_failed(err),
        }
    }
}

/// A failed release is a protocol violation, except while the thread is
/// already unwinding: panicking again there would abort the process.
fn release_failed(err: Error) {
    if std::thread::panicking() {
        tracing::error!(error = %err, "identity release failed during unwind");
    } else {
        protocol_violation("identity_free", err);
    }
}

impl fmt::Debug for NativeIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let handle = self.handle.lock();
        write!(f, "NativeIdentity({:p})", handle.key)
    }
}

/// A signing capability, fixed to one variant at construction.
#[derive(Debug)]
pub enum Identity {
    Anonymous(NativeIdentity),
    Basic(NativeIdentity),
    Secp256k1(NativeIdentity),
}

impl Identity {
    /// Wrap a handle the callee just filled.
    pub(crate) fn from_handle(
        operation: &'static str,
        handle: IdentityHandle,
        boundary: Boundary,
    ) -> Self {
        let Some(identity_type) = handle.identity_type() else {
            protocol_violation(operation, "callee returned an empty or untyped handle");
        };
        tracing::debug!(%identity_type, operation, "identity acquired");
        let native = NativeIdentity::new(handle, boundary);
        match identity_type {
            IdentityType::Anonymous => Self::Anonymous(native),
            IdentityType::Basic => Self::Basic(native),
            IdentityType::Secp256k1 => Self::Secp256k1(native),
        }
    }

    /// An anonymous identity, using the process-wide capacities.
    pub fn anonymous() -> Result<Self> {
        Boundary::global().anonymous_identity()
    }

    /// A fresh Ed25519 identity, using the process-wide capacities.
    pub fn basic_random() -> Result<Self> {
        Boundary::global().basic_random()
    }

    pub fn basic_from_pem(pem: &str) -> Result<Self> {
        Boundary::global().basic_from_pem(pem)
    }

    pub fn basic_from_pem_file(path: impl AsRef<Path>) -> Result<Self> {
        Boundary::global().basic_from_pem_file(path)
    }

    /// A fresh secp256k1 identity, using the process-wide capacities.
    pub fn secp256k1_random() -> Result<Self> {
        Boundary::global().secp256k1_random()
    }

    pub fn secp256k1_from_pem(pem: &str) -> Result<Self> {
        Boundary::global().secp256k1_from_pem(pem)
    }

    pub fn secp256k1_from_pem_file(path: impl AsRef<Path>) -> Result<Self> {
        Boundary::global().secp256k1_from_pem_file(path)
    }

    pub fn identity_type(&self) -> IdentityType {
        match self {
            Self::Anonymous(_) => IdentityType::Anonymous,
            Self::Basic(_) => IdentityType::Basic,
            Self::Secp256k1(_) => IdentityType::Secp256k1,
        }
    }

    fn native(&self) -> &NativeIdentity {
        match self {
            Self::Anonymous(native) | Self::Basic(native) | Self::Secp256k1(native) => native,
        }
    }

    /// The principal this identity sends as.
    pub fn sender(&self) -> Result<Principal> {
        self.native().sender()
    }

    /// Sign `message`, returning the DER public key with the signature.
    ///
    /// Anonymous identities fail with [`Error::AnonymousSign`] without
    /// calling the callee.
    pub fn sign(&self, message: &[u8]) -> Result<Signature> {
        match self {
            Self::Anonymous(_) => Err(Error::AnonymousSign),
            Self::Basic(native) | Self::Secp256k1(native) => native.sign(message),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Capacities;

    fn assert_send_sync<T: Send + Sync>() {}

    struct FailsOnRelease;

    impl Drop for FailsOnRelease {
        fn drop(&mut self) {
            release_failed(Error::ErrInfoOverflow {
                operation: "identity_free",
            });
        }
    }

    #[test]
    fn test_failed_release_during_unwind_is_logged() {
        let result = std::thread::spawn(|| {
            let _guard = FailsOnRelease;
            panic!("caller failure");
        })
        .join();
        let payload = result.unwrap_err();
        assert_eq!(payload.downcast_ref::<&str>(), Some(&"caller failure"));
    }

    #[test]
    #[should_panic(expected = "boundary protocol violation in identity_free")]
    fn test_failed_release_outside_unwind_panics() {
        drop(FailsOnRelease);
    }

    #[test]
    fn test_identity_is_send_sync() {
        assert_send_sync::<Identity>();
    }

    #[test]
    fn test_variant_matches_handle() {
        let boundary = Boundary::default();
        assert_eq!(
            boundary.anonymous_identity().unwrap().identity_type(),
            IdentityType::Anonymous
        );
        assert_eq!(
            boundary.basic_random().unwrap().identity_type(),
            IdentityType::Basic
        );
        assert_eq!(
            boundary.secp256k1_random().unwrap().identity_type(),
            IdentityType::Secp256k1
        );
    }

    #[test]
    fn test_anonymous_sign_stays_on_caller_side() {
        let identity = Boundary::default().anonymous_identity().unwrap();
        assert!(matches!(identity.sign(b"msg"), Err(Error::AnonymousSign)));
    }

    #[test]
    fn test_sender_uses_identity_boundary() {
        let boundary = Boundary::default();
        let identity = boundary.basic_random().unwrap();

        assert_eq!(identity.native().boundary(), &boundary);
        assert!(identity.sender().is_ok());

        let shrunk = Boundary::new(Capacities::default().with_identifier(28));
        assert!(matches!(
            shrunk.basic_random().unwrap().sender(),
            Err(Error::DataOverflow { .. })
        ));
    }
}

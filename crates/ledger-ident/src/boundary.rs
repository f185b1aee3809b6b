//! Typed calls across the identity boundary.

use std::ffi::CString;
use std::path::Path;

use ledger_ident_core::{Principal, Signature};
use ledger_ident_ffi::{identity as abi_identity, principal as abi_principal, IdentityHandle};

use crate::config::Capacities;
use crate::error::{Error, Result};
use crate::identity::Identity;
use crate::protocol::{translate, Diagnostic, Output};

/// Calling context for the boundary: the capacities every call allocates
/// its outputs with.
///
/// `Boundary` is `Copy`; a test that shrinks a capacity builds its own
/// instead of touching process-wide state.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Boundary {
    capacities: Capacities,
}

impl Boundary {
    pub const fn new(capacities: Capacities) -> Self {
        Self { capacities }
    }

    /// A boundary using the process-wide capacities.
    pub fn global() -> Self {
        Self::new(*Capacities::global())
    }

    pub fn capacities(&self) -> &Capacities {
        &self.capacities
    }

    fn identifier(&self) -> Output {
        Output::new("identifier", self.capacities.identifier)
    }

    fn diagnostic(&self) -> Diagnostic {
        Diagnostic::new(self.capacities.diagnostic)
    }

    fn principal(&self, operation: &'static str, out: Output) -> Result<Principal> {
        Ok(Principal::try_from_slice(&out.into_bytes(operation))?)
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Principals
    // ─────────────────────────────────────────────────────────────────────────

    /// The management canister principal, empty bytes.
    pub fn management_canister(&self) -> Result<Principal> {
        const OP: &str = "principal_management_canister";
        let mut out = self.identifier();
        let raw = unsafe {
            abi_principal::principal_management_canister(out.ptr(), out.len_ptr(), out.capacity())
        };
        translate(OP, out.name(), raw, None)?;
        self.principal(OP, out)
    }

    /// `SHA-224(public_key) || 0x02`.
    pub fn self_authenticating(&self, public_key: &[u8]) -> Result<Principal> {
        const OP: &str = "principal_self_authenticating";
        let key_len = input_len(OP, public_key.len())?;
        let mut out = self.identifier();
        let raw = unsafe {
            abi_principal::principal_self_authenticating(
                out.ptr(),
                out.len_ptr(),
                out.capacity(),
                public_key.as_ptr(),
                key_len,
            )
        };
        translate(OP, out.name(), raw, None)?;
        self.principal(OP, out)
    }

    /// The anonymous principal, `0x04`.
    pub fn anonymous(&self) -> Result<Principal> {
        const OP: &str = "principal_anonymous";
        let mut out = self.identifier();
        let raw =
            unsafe { abi_principal::principal_anonymous(out.ptr(), out.len_ptr(), out.capacity()) };
        translate(OP, out.name(), raw, None)?;
        self.principal(OP, out)
    }

    /// Validate raw bytes as a principal.
    pub fn principal_from_bytes(&self, bytes: &[u8]) -> Result<Principal> {
        const OP: &str = "principal_from_bytes";
        let bytes_len = input_len(OP, bytes.len())?;
        let mut out = self.identifier();
        let mut diagnostic = self.diagnostic();
        let raw = unsafe {
            abi_principal::principal_from_bytes(
                bytes.as_ptr(),
                bytes_len,
                out.ptr(),
                out.len_ptr(),
                out.capacity(),
                diagnostic.ptr(),
                diagnostic.capacity(),
            )
        };
        translate(OP, out.name(), raw, Some(&diagnostic))?;
        self.principal(OP, out)
    }

    /// Parse the textual form, e.g. `"2vxsx-fae"`.
    pub fn principal_from_text(&self, text: &str) -> Result<Principal> {
        const OP: &str = "principal_from_text";
        let text = c_string(OP, text)?;
        let mut out = self.identifier();
        let mut diagnostic = self.diagnostic();
        let raw = unsafe {
            abi_principal::principal_from_text(
                text.as_ptr(),
                out.ptr(),
                out.len_ptr(),
                out.capacity(),
                diagnostic.ptr(),
                diagnostic.capacity(),
            )
        };
        translate(OP, out.name(), raw, Some(&diagnostic))?;
        self.principal(OP, out)
    }

    /// Render the textual form. The text capacity must also hold the NUL
    /// terminator.
    pub fn principal_to_text(&self, principal: &Principal) -> Result<String> {
        const OP: &str = "principal_to_text";
        let bytes = principal.as_slice();
        let mut out = Output::new("text", self.capacities.text);
        let mut diagnostic = self.diagnostic();
        let raw = unsafe {
            abi_principal::principal_to_text(
                bytes.as_ptr(),
                bytes.len() as u32,
                out.ptr(),
                out.len_ptr(),
                out.capacity(),
                diagnostic.ptr(),
                diagnostic.capacity(),
            )
        };
        translate(OP, out.name(), raw, Some(&diagnostic))?;
        Ok(out.into_text(OP))
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Identities
    // ─────────────────────────────────────────────────────────────────────────

    /// An identity with no key material.
    pub fn anonymous_identity(&self) -> Result<Identity> {
        const OP: &str = "identity_anonymous";
        let mut handle = IdentityHandle::null();
        let raw = unsafe { abi_identity::identity_anonymous(&mut handle) };
        translate(OP, "handle", raw, None)?;
        Ok(Identity::from_handle(OP, handle, *self))
    }

    /// A fresh Ed25519 identity.
    pub fn basic_random(&self) -> Result<Identity> {
        self.create("identity_basic_random", |handle, diagnostic| unsafe {
            abi_identity::identity_basic_random(handle, diagnostic.ptr(), diagnostic.capacity())
        })
    }

    /// An Ed25519 identity from a PKCS#8 PEM.
    pub fn basic_from_pem(&self, pem: &str) -> Result<Identity> {
        const OP: &str = "identity_basic_from_pem";
        let pem = c_string(OP, pem)?;
        self.create(OP, |handle, diagnostic| unsafe {
            abi_identity::identity_basic_from_pem(
                pem.as_ptr(),
                handle,
                diagnostic.ptr(),
                diagnostic.capacity(),
            )
        })
    }

    /// An Ed25519 identity from a PKCS#8 PEM file.
    pub fn basic_from_pem_file(&self, path: impl AsRef<Path>) -> Result<Identity> {
        const OP: &str = "identity_basic_from_pem_file";
        let path = c_path(OP, path.as_ref())?;
        self.create(OP, |handle, diagnostic| unsafe {
            abi_identity::identity_basic_from_pem_file(
                path.as_ptr(),
                handle,
                diagnostic.ptr(),
                diagnostic.capacity(),
            )
        })
    }

    /// A fresh secp256k1 identity.
    pub fn secp256k1_random(&self) -> Result<Identity> {
        self.create("identity_secp256k1_random", |handle, diagnostic| unsafe {
            abi_identity::identity_secp256k1_random(handle, diagnostic.ptr(), diagnostic.capacity())
        })
    }

    /// A secp256k1 identity from a SEC1 or PKCS#8 PEM.
    pub fn secp256k1_from_pem(&self, pem: &str) -> Result<Identity> {
        const OP: &str = "identity_secp256k1_from_pem";
        let pem = c_string(OP, pem)?;
        self.create(OP, |handle, diagnostic| unsafe {
            abi_identity::identity_secp256k1_from_pem(
                pem.as_ptr(),
                handle,
                diagnostic.ptr(),
                diagnostic.capacity(),
            )
        })
    }

    /// A secp256k1 identity from a SEC1 or PKCS#8 PEM file.
    pub fn secp256k1_from_pem_file(&self, path: impl AsRef<Path>) -> Result<Identity> {
        const OP: &str = "identity_secp256k1_from_pem_file";
        let path = c_path(OP, path.as_ref())?;
        self.create(OP, |handle, diagnostic| unsafe {
            abi_identity::identity_secp256k1_from_pem_file(
                path.as_ptr(),
                handle,
                diagnostic.ptr(),
                diagnostic.capacity(),
            )
        })
    }

    fn create<F>(&self, operation: &'static str, call: F) -> Result<Identity>
    where
        F: FnOnce(*mut IdentityHandle, &mut Diagnostic) -> i32,
    {
        let mut handle = IdentityHandle::null();
        let mut diagnostic = self.diagnostic();
        let raw = call(&mut handle, &mut diagnostic);
        translate(operation, "handle", raw, Some(&diagnostic))?;
        Ok(Identity::from_handle(operation, handle, *self))
    }

    pub(crate) fn sender(&self, handle: &IdentityHandle) -> Result<Principal> {
        const OP: &str = "identity_sender";
        let mut out = self.identifier();
        let mut diagnostic = self.diagnostic();
        let raw = unsafe {
            abi_identity::identity_sender(
                handle,
                out.ptr(),
                out.len_ptr(),
                out.capacity(),
                diagnostic.ptr(),
                diagnostic.capacity(),
            )
        };
        translate(OP, out.name(), raw, Some(&diagnostic))?;
        self.principal(OP, out)
    }

    pub(crate) fn sign(&self, handle: &IdentityHandle, message: &[u8]) -> Result<Signature> {
        const OP: &str = "identity_sign";
        let message_len = input_len(OP, message.len())?;
        let mut public_key = Output::new("public key", self.capacities.public_key);
        let mut signature = Output::new("signature", self.capacities.signature);
        let mut diagnostic = self.diagnostic();
        let raw = unsafe {
            abi_identity::identity_sign(
                handle,
                message.as_ptr(),
                message_len,
                public_key.ptr(),
                public_key.len_ptr(),
                public_key.capacity(),
                signature.ptr(),
                signature.len_ptr(),
                signature.capacity(),
                diagnostic.ptr(),
                diagnostic.capacity(),
            )
        };
        translate(OP, "public key or signature", raw, Some(&diagnostic))?;
        Ok(Signature {
            public_key: public_key.into_bytes(OP),
            signature: signature.into_bytes(OP),
        })
    }

    pub(crate) fn free(&self, handle: &mut IdentityHandle) -> Result<()> {
        let raw = unsafe { abi_identity::identity_free(handle) };
        translate("identity_free", "handle", raw, None)
    }
}

fn input_len(operation: &'static str, len: usize) -> Result<u32> {
    u32::try_from(len).map_err(|_| Error::InvalidInput {
        operation,
        reason: format!("{len} bytes exceed the boundary's u32 length"),
    })
}

fn c_string(operation: &'static str, text: &str) -> Result<CString> {
    CString::new(text).map_err(|e| Error::InvalidInput {
        operation,
        reason: e.to_string(),
    })
}

fn c_path(operation: &'static str, path: &Path) -> Result<CString> {
    let text = path.to_str().ok_or_else(|| Error::InvalidInput {
        operation,
        reason: format!("path {} is not UTF-8", path.display()),
    })?;
    c_string(operation, text)
}

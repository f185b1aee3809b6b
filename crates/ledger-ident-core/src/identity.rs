//! Key material that signs on behalf of a principal.
//!
//! Three variants, fixed at construction:
//!
//! - **Anonymous**: no key; sends as the anonymous principal and cannot sign.
//! - **Basic**: Ed25519, imported from PKCS#8 PEM.
//! - **Secp256k1**: ECDSA over secp256k1 with SHA-256, imported from SEC1 PEM
//!   (PKCS#8 accepted too).
//!
//! Public keys are exported as DER SubjectPublicKeyInfo; the sender principal
//! is the self-authenticating derivation over that encoding.

use std::fmt;
use std::path::Path;

use ed25519_dalek::SigningKey as Ed25519SigningKey;
use k256::ecdsa::SigningKey as Secp256k1SigningKey;
use serde::{Deserialize, Serialize};

use crate::error::IdentityError;
use crate::principal::Principal;

/// Discriminator for [`KeyMaterial`].
///
/// The numeric values cross the FFI boundary in the second word of an
/// identity handle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum IdentityType {
    Anonymous = 0,
    Basic = 1,
    Secp256k1 = 2,
}

impl IdentityType {
    pub const fn as_raw(self) -> usize {
        self as usize
    }

    pub const fn from_raw(raw: usize) -> Option<Self> {
        match raw {
            0 => Some(Self::Anonymous),
            1 => Some(Self::Basic),
            2 => Some(Self::Secp256k1),
            _ => None,
        }
    }
}

impl fmt::Display for IdentityType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Anonymous => "anonymous",
            Self::Basic => "basic",
            Self::Secp256k1 => "secp256k1",
        };
        f.write_str(name)
    }
}

/// A signature together with the key that verifies it.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Signature {
    /// DER-encoded SubjectPublicKeyInfo.
    pub public_key: Vec<u8>,
    /// Ed25519: 64 bytes. Secp256k1: 64 bytes `r || s`.
    pub signature: Vec<u8>,
}

impl fmt::Debug for Signature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sig = hex::encode(&self.signature);
        write!(f, "Signature({}...)", &sig[..sig.len().min(16)])
    }
}

/// Signing key of an identity.
pub enum KeyMaterial {
    Anonymous,
    Basic(Ed25519SigningKey),
    Secp256k1(Secp256k1SigningKey),
}

impl KeyMaterial {
    pub fn anonymous() -> Self {
        Self::Anonymous
    }

    /// Generate a new random Ed25519 key.
    pub fn basic_random() -> Self {
        let mut rng = rand::thread_rng();
        Self::Basic(Ed25519SigningKey::generate(&mut rng))
    }

    /// Import an Ed25519 key from a PKCS#8 `PRIVATE KEY` PEM.
    pub fn basic_from_pem(pem: &str) -> Result<Self, IdentityError> {
        use ed25519_dalek::pkcs8::DecodePrivateKey;

        let key = Ed25519SigningKey::from_pkcs8_pem(pem)
            .map_err(|e| IdentityError::Pem(e.to_string()))?;
        Ok(Self::Basic(key))
    }

    pub fn basic_from_pem_file(path: impl AsRef<Path>) -> Result<Self, IdentityError> {
        let pem = std::fs::read_to_string(path)?;
        Self::basic_from_pem(&pem)
    }

    /// Generate a new random secp256k1 key.
    pub fn secp256k1_random() -> Self {
        let mut rng = rand::thread_rng();
        Self::Secp256k1(Secp256k1SigningKey::random(&mut rng))
    }

    /// Import a secp256k1 key from an `EC PRIVATE KEY` (SEC1) or
    /// `PRIVATE KEY` (PKCS#8) PEM.
    ///
    /// Other blocks in the text, such as the `EC PARAMETERS` block OpenSSL
    /// writes ahead of the key, are skipped.
    pub fn secp256k1_from_pem(pem: &str) -> Result<Self, IdentityError> {
        use k256::pkcs8::DecodePrivateKey;

        let secret = if let Some(block) = pem_block(pem, SEC1_LABEL) {
            k256::SecretKey::from_sec1_pem(&block)
                .map_err(|e| IdentityError::Pem(format!("invalid SEC1 key: {e}")))?
        } else {
            let block = pem_block(pem, PKCS8_LABEL).ok_or_else(|| {
                IdentityError::Pem(format!("no {SEC1_LABEL} or {PKCS8_LABEL} block"))
            })?;
            k256::SecretKey::from_pkcs8_pem(&block)
                .map_err(|e| IdentityError::Pem(format!("invalid PKCS#8 key: {e}")))?
        };
        Ok(Self::Secp256k1(Secp256k1SigningKey::from(secret)))
    }

    pub fn secp256k1_from_pem_file(path: impl AsRef<Path>) -> Result<Self, IdentityError> {
        let pem = std::fs::read_to_string(path)?;
        Self::secp256k1_from_pem(&pem)
    }

    pub fn identity_type(&self) -> IdentityType {
        match self {
            Self::Anonymous => IdentityType::Anonymous,
            Self::Basic(_) => IdentityType::Basic,
            Self::Secp256k1(_) => IdentityType::Secp256k1,
        }
    }

    /// DER SubjectPublicKeyInfo of the key, `None` for anonymous.
    pub fn public_key_der(&self) -> Result<Option<Vec<u8>>, IdentityError> {
        let der = match self {
            Self::Anonymous => return Ok(None),
            Self::Basic(key) => {
                ed25519_dalek::pkcs8::EncodePublicKey::to_public_key_der(&key.verifying_key())
                    .map_err(|e| IdentityError::PublicKeyEncoding(e.to_string()))?
                    .as_bytes()
                    .to_vec()
            }
            Self::Secp256k1(key) => {
                let public = k256::PublicKey::from(key.verifying_key());
                k256::pkcs8::EncodePublicKey::to_public_key_der(&public)
                    .map_err(|e| IdentityError::PublicKeyEncoding(e.to_string()))?
                    .as_bytes()
                    .to_vec()
            }
        };
        Ok(Some(der))
    }

    /// The principal this key sends as.
    pub fn sender(&self) -> Result<Principal, IdentityError> {
        match self.public_key_der()? {
            None => Ok(Principal::anonymous()),
            Some(der) => Ok(Principal::self_authenticating(der)),
        }
    }

    /// Sign `message`.
    ///
    /// Ed25519 signs the message itself; secp256k1 signs its SHA-256 digest.
    pub fn sign(&self, message: &[u8]) -> Result<Signature, IdentityError> {
        let signature = match self {
            Self::Anonymous => return Err(IdentityError::AnonymousSign),
            Self::Basic(key) => {
                let sig: ed25519_dalek::Signature =
                    ed25519_dalek::Signer::try_sign(key, message)
                        .map_err(|e| IdentityError::Signing(e.to_string()))?;
                sig.to_bytes().to_vec()
            }
            Self::Secp256k1(key) => {
                let sig: k256::ecdsa::Signature =
                    k256::ecdsa::signature::Signer::try_sign(key, message)
                        .map_err(|e| IdentityError::Signing(e.to_string()))?;
                sig.to_bytes().to_vec()
            }
        };

        let public_key = self.public_key_der()?.ok_or(IdentityError::AnonymousSign)?;
        Ok(Signature {
            public_key,
            signature,
        })
    }
}

const SEC1_LABEL: &str = "EC PRIVATE KEY";
const PKCS8_LABEL: &str = "PRIVATE KEY";

/// Cut the first `label` block out of a PEM text that may hold several.
fn pem_block(pem: &str, label: &str) -> Option<String> {
    let begin = format!("-----BEGIN {label}-----");
    let end = format!("-----END {label}-----");
    let start = pem.find(&begin)?;
    let stop = start + pem[start..].find(&end)? + end.len();
    Some(format!("{}\n", &pem[start..stop]))
}

impl fmt::Debug for KeyMaterial {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.sender() {
            Ok(sender) => write!(f, "KeyMaterial({}, {})", self.identity_type(), sender),
            Err(_) => write!(f, "KeyMaterial({})", self.identity_type()),
        }
    }
}

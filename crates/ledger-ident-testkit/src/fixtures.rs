//! Key fixtures and helpers.
//!
//! Deterministic PEM keys for import tests, and signature checks against the
//! DER public keys identities return.

use std::io::Write;

use ed25519_dalek::pkcs8::EncodePrivateKey;
use k256::pkcs8::LineEnding;
use ledger_ident_core::{IdentityType, KeyMaterial, Principal};
use tempfile::NamedTempFile;

/// The curve OID 1.3.132.0.10 as OpenSSL writes it ahead of a secp256k1 key.
pub const SECP256K1_EC_PARAMETERS: &str =
    "-----BEGIN EC PARAMETERS-----\nBgUrgQQACg==\n-----END EC PARAMETERS-----\n";

/// A private key derived from a fixed seed, exported as PEM.
#[derive(Clone)]
pub struct KeyFixture {
    identity_type: IdentityType,
    pem: String,
}

impl KeyFixture {
    /// Ed25519 key, PKCS#8 `PRIVATE KEY` PEM.
    pub fn basic(seed: [u8; 32]) -> Self {
        let key = ed25519_dalek::SigningKey::from_bytes(&seed);
        let pem = key
            .to_pkcs8_pem(LineEnding::LF)
            .expect("ed25519 key encodes")
            .to_string();
        Self {
            identity_type: IdentityType::Basic,
            pem,
        }
    }

    /// secp256k1 key, SEC1 `EC PRIVATE KEY` PEM.
    ///
    /// Panics if `seed` is not a valid scalar; see
    /// [`crate::generators::secp256k1_seed`].
    pub fn secp256k1(seed: [u8; 32]) -> Self {
        let secret = k256::SecretKey::from_slice(&seed).expect("seed is a valid scalar");
        let pem = secret
            .to_sec1_pem(LineEnding::LF)
            .expect("secp256k1 key encodes")
            .to_string();
        Self {
            identity_type: IdentityType::Secp256k1,
            pem,
        }
    }

    /// secp256k1 key, PKCS#8 `PRIVATE KEY` PEM.
    pub fn secp256k1_pkcs8(seed: [u8; 32]) -> Self {
        let secret = k256::SecretKey::from_slice(&seed).expect("seed is a valid scalar");
        let pem = secret
            .to_pkcs8_pem(LineEnding::LF)
            .expect("secp256k1 key encodes")
            .to_string();
        Self {
            identity_type: IdentityType::Secp256k1,
            pem,
        }
    }

    /// secp256k1 key as `openssl ecparam -name secp256k1 -genkey` writes it:
    /// an `EC PARAMETERS` block naming the curve, then the SEC1 key.
    pub fn secp256k1_openssl(seed: [u8; 32]) -> Self {
        let key = Self::secp256k1(seed);
        Self {
            identity_type: IdentityType::Secp256k1,
            pem: format!("{SECP256K1_EC_PARAMETERS}{}", key.pem),
        }
    }

    pub fn identity_type(&self) -> IdentityType {
        self.identity_type
    }

    pub fn pem(&self) -> &str {
        &self.pem
    }

    /// Write the PEM to a temporary file, removed when the handle drops.
    pub fn pem_file(&self) -> NamedTempFile {
        let mut file = NamedTempFile::new().expect("create temp file");
        file.write_all(self.pem.as_bytes()).expect("write PEM");
        file.flush().expect("flush PEM");
        file
    }

    /// The sender principal the key must produce, computed without the
    /// boundary.
    pub fn expected_sender(&self) -> Principal {
        let key = match self.identity_type {
            IdentityType::Basic => KeyMaterial::basic_from_pem(&self.pem),
            _ => KeyMaterial::secp256k1_from_pem(&self.pem),
        }
        .expect("fixture PEM imports");
        key.sender().expect("fixture key encodes")
    }
}

impl std::fmt::Debug for KeyFixture {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "KeyFixture({})", self.identity_type)
    }
}

/// Verify `signature` over `message` with a DER SubjectPublicKeyInfo key.
///
/// Ed25519 keys verify the raw message; secp256k1 keys verify ECDSA over its
/// SHA-256 digest. Returns `false` for unparseable keys or signatures.
pub fn verify_signature(public_key_der: &[u8], message: &[u8], signature: &[u8]) -> bool {
    use k256::pkcs8::DecodePublicKey as _;

    if let Ok(key) = ed25519_dalek::VerifyingKey::from_public_key_der(public_key_der) {
        return ed25519_dalek::Signature::from_slice(signature)
            .map(|sig| ed25519_dalek::Verifier::verify(&key, message, &sig).is_ok())
            .unwrap_or(false);
    }

    if let Ok(key) = k256::ecdsa::VerifyingKey::from_public_key_der(public_key_der) {
        return k256::ecdsa::Signature::from_slice(signature)
            .map(|sig| k256::ecdsa::signature::Verifier::verify(&key, message, &sig).is_ok())
            .unwrap_or(false);
    }

    false
}

/// Fixtures for each supported key type, one per seed.
pub fn fixtures_for_seed(seed: [u8; 32]) -> Vec<KeyFixture> {
    let mut secp_seed = seed;
    secp_seed[0] = 0;
    secp_seed[31] |= 1;
    vec![
        KeyFixture::basic(seed),
        KeyFixture::secp256k1(secp_seed),
        KeyFixture::secp256k1_pkcs8(secp_seed),
        KeyFixture::secp256k1_openssl(secp_seed),
    ]
}

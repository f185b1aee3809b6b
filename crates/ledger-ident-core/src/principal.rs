//! Principals: content-addressed ledger identifiers.
//!
//! A principal is an opaque byte string of at most [`MAX_LENGTH_IN_BYTES`]
//! bytes. The last byte of derived principals is a type tag:
//!
//! | Derivation | Bytes |
//! |---|---|
//! | management canister | empty |
//! | self-authenticating | `SHA-224(public_key_der) \|\| 0x02` |
//! | anonymous | `0x04` |
//!
//! Equality, ordering and hashing are defined over the byte string alone.

use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::str::FromStr;

use serde::de::{self, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use sha2::{Digest, Sha224};

use crate::error::PrincipalError;
use crate::text;

/// Upper bound on the length of a principal.
pub const MAX_LENGTH_IN_BYTES: usize = 29;

/// Type tag of a principal derived from a public key.
pub const SELF_AUTHENTICATING_TAG: u8 = 0x02;

/// The single byte of the anonymous principal.
pub const ANONYMOUS_TAG: u8 = 0x04;

const HASH_LEN_IN_BYTES: usize = 28;

/// A ledger identifier.
///
/// Fixed-size storage keeps principals `Copy`; bytes past `len` are always
/// zero but never observed.
#[derive(Clone, Copy)]
pub struct Principal {
    len: u8,
    bytes: [u8; MAX_LENGTH_IN_BYTES],
}

impl Principal {
    /// The management canister: the empty principal.
    pub const fn management_canister() -> Self {
        Self {
            len: 0,
            bytes: [0; MAX_LENGTH_IN_BYTES],
        }
    }

    /// The principal of unauthenticated callers.
    pub const fn anonymous() -> Self {
        let mut bytes = [0; MAX_LENGTH_IN_BYTES];
        bytes[0] = ANONYMOUS_TAG;
        Self { len: 1, bytes }
    }

    /// Derive the principal controlled by a public key.
    ///
    /// Deterministic in `public_key`; the key is usually DER-encoded
    /// SubjectPublicKeyInfo.
    pub fn self_authenticating(public_key: impl AsRef<[u8]>) -> Self {
        let hash = Sha224::digest(public_key.as_ref());
        let mut bytes = [0; MAX_LENGTH_IN_BYTES];
        bytes[..HASH_LEN_IN_BYTES].copy_from_slice(&hash);
        bytes[HASH_LEN_IN_BYTES] = SELF_AUTHENTICATING_TAG;
        Self {
            len: MAX_LENGTH_IN_BYTES as u8,
            bytes,
        }
    }

    /// Wrap an explicit byte string.
    pub fn try_from_slice(slice: &[u8]) -> Result<Self, PrincipalError> {
        if slice.len() > MAX_LENGTH_IN_BYTES {
            return Err(PrincipalError::BytesTooLong(slice.len()));
        }
        let mut bytes = [0; MAX_LENGTH_IN_BYTES];
        bytes[..slice.len()].copy_from_slice(slice);
        Ok(Self {
            len: slice.len() as u8,
            bytes,
        })
    }

    /// Parse the textual form (`2vxsx-fae`).
    pub fn from_text(text: impl AsRef<str>) -> Result<Self, PrincipalError> {
        let bytes = text::decode(text.as_ref())?;
        Self::try_from_slice(&bytes)
    }

    /// Render the textual form.
    pub fn to_text(&self) -> String {
        text::encode(self.as_slice())
    }

    /// The raw bytes.
    pub fn as_slice(&self) -> &[u8] {
        &self.bytes[..self.len as usize]
    }

    /// Copy the raw bytes out.
    pub fn to_vec(&self) -> Vec<u8> {
        self.as_slice().to_vec()
    }

    /// Number of bytes.
    pub fn len(&self) -> usize {
        self.len as usize
    }

    /// True only for the management canister.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn is_anonymous(&self) -> bool {
        self.as_slice() == [ANONYMOUS_TAG]
    }

    pub fn is_self_authenticating(&self) -> bool {
        self.len() == MAX_LENGTH_IN_BYTES && self.as_slice().last() == Some(&SELF_AUTHENTICATING_TAG)
    }

    /// Convert to hex string.
    pub fn to_hex(&self) -> String {
        hex::encode(self.as_slice())
    }
}

impl PartialEq for Principal {
    fn eq(&self, other: &Self) -> bool {
        self.as_slice() == other.as_slice()
    }
}

impl Eq for Principal {}

impl Hash for Principal {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.as_slice().hash(state);
    }
}

impl PartialOrd for Principal {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Principal {
    fn cmp(&self, other: &Self) -> Ordering {
        self.as_slice().cmp(other.as_slice())
    }
}

impl fmt::Debug for Principal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Principal({})", self.to_text())
    }
}

impl fmt::Display for Principal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_text())
    }
}

impl FromStr for Principal {
    type Err = PrincipalError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_text(s)
    }
}

impl AsRef<[u8]> for Principal {
    fn as_ref(&self) -> &[u8] {
        self.as_slice()
    }
}

impl TryFrom<&[u8]> for Principal {
    type Error = PrincipalError;

    fn try_from(slice: &[u8]) -> Result<Self, Self::Error> {
        Self::try_from_slice(slice)
    }
}

// Text for human-readable formats, raw bytes otherwise.
impl Serialize for Principal {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        if serializer.is_human_readable() {
            serializer.serialize_str(&self.to_text())
        } else {
            serializer.serialize_bytes(self.as_slice())
        }
    }
}

impl<'de> Deserialize<'de> for Principal {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct PrincipalVisitor;

        impl<'de> Visitor<'de> for PrincipalVisitor {
            type Value = Principal;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a principal as text or bytes")
            }

            fn visit_str<E: de::Error>(self, v: &str) -> Result<Principal, E> {
                Principal::from_text(v).map_err(E::custom)
            }

            fn visit_bytes<E: de::Error>(self, v: &[u8]) -> Result<Principal, E> {
                Principal::try_from_slice(v).map_err(E::custom)
            }
        }

        if deserializer.is_human_readable() {
            deserializer.deserialize_str(PrincipalVisitor)
        } else {
            deserializer.deserialize_bytes(PrincipalVisitor)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use std::collections::hash_map::DefaultHasher;

    const PUBLIC_KEY: [u8; 32] = [
        0xff, 0xee, 0xdd, 0xcc, 0xbb, 0xaa, 0x99, 0x88, 0x77, 0x66, 0x55, 0x44, 0x33, 0x22, 0x11,
        0x00, 0xff, 0xee, 0xdd, 0xcc, 0xbb, 0xaa, 0x99, 0x88, 0x77, 0x66, 0x55, 0x44, 0x33, 0x22,
        0x11, 0x00,
    ];

    fn hash_of(p: &Principal) -> u64 {
        let mut hasher = DefaultHasher::new();
        p.hash(&mut hasher);
        hasher.finish()
    }

    #[test]
    fn test_management_canister_is_empty() {
        let p = Principal::management_canister();
        assert!(p.is_empty());
        assert_eq!(p.as_slice(), &[] as &[u8]);
        assert_eq!(p.to_text(), "aaaaa-aa");
    }

    #[test]
    fn test_anonymous() {
        let p = Principal::anonymous();
        assert_eq!(p.as_slice(), &[0x04]);
        assert!(p.is_anonymous());
        assert_eq!(p.to_text(), "2vxsx-fae");
        assert_eq!(Principal::from_text("2vxsx-fae").unwrap(), p);
    }

    #[test]
    fn test_self_authenticating_vector() {
        let p = Principal::self_authenticating(PUBLIC_KEY);
        assert_eq!(
            p.to_hex(),
            "2f8e4738f9d76816829985415267863807d37d206ad90fea72bf9dcf02"
        );
        assert!(p.is_self_authenticating());
    }

    #[test]
    fn test_try_from_slice_rejects_long_input() {
        let err = Principal::try_from_slice(&[0u8; 30]).unwrap_err();
        assert_eq!(err, PrincipalError::BytesTooLong(30));
    }

    #[test]
    fn test_to_vec_copies_only_live_bytes() {
        let p = Principal::try_from_slice(&[1, 2, 3]).unwrap();
        assert_eq!(p.to_vec(), vec![1, 2, 3]);
        assert!(Principal::management_canister().to_vec().is_empty());
    }

    #[test]
    fn test_equality_ignores_derivation_path() {
        let derived = Principal::anonymous();
        let explicit = Principal::try_from_slice(&[0x04]).unwrap();
        assert_eq!(derived, explicit);
        assert_eq!(hash_of(&derived), hash_of(&explicit));
        assert_ne!(derived, Principal::management_canister());
    }

    #[test]
    fn test_display_debug() {
        let p = Principal::anonymous();
        assert_eq!(format!("{}", p), "2vxsx-fae");
        assert_eq!(format!("{:?}", p), "Principal(2vxsx-fae)");
    }

    #[test]
    fn test_serde_json_uses_text() {
        let p = Principal::anonymous();
        let json = serde_json::to_string(&p).unwrap();
        assert_eq!(json, "\"2vxsx-fae\"");
        let back: Principal = serde_json::from_str(&json).unwrap();
        assert_eq!(back, p);
    }

    proptest! {
        #[test]
        fn test_text_roundtrip(bytes in prop::collection::vec(any::<u8>(), 0..=MAX_LENGTH_IN_BYTES)) {
            let p = Principal::try_from_slice(&bytes).unwrap();
            prop_assert_eq!(p.as_slice(), bytes.as_slice());
            let parsed = Principal::from_text(p.to_text()).unwrap();
            prop_assert_eq!(parsed, p);
        }

        #[test]
        fn test_self_authenticating_distinguishes_keys(
            k1 in prop::collection::vec(any::<u8>(), 1..64),
            k2 in prop::collection::vec(any::<u8>(), 1..64),
        ) {
            prop_assume!(k1 != k2);
            prop_assert_eq!(Principal::self_authenticating(&k1), Principal::self_authenticating(&k1));
            prop_assert_ne!(Principal::self_authenticating(&k1), Principal::self_authenticating(&k2));
        }
    }
}

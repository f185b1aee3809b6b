//! Proptest generators for property-based testing.

use proptest::prelude::*;

use ledger_ident_core::{Principal, MAX_LENGTH_IN_BYTES};

/// Generate byte strings short enough to be a principal.
pub fn principal_bytes() -> impl Strategy<Value = Vec<u8>> {
    prop::collection::vec(any::<u8>(), 0..=MAX_LENGTH_IN_BYTES)
}

/// Generate byte strings too long to be a principal.
pub fn oversized_bytes() -> impl Strategy<Value = Vec<u8>> {
    prop::collection::vec(any::<u8>(), MAX_LENGTH_IN_BYTES + 1..=64)
}

/// Generate a principal.
pub fn principal() -> impl Strategy<Value = Principal> {
    principal_bytes().prop_map(|bytes| {
        Principal::try_from_slice(&bytes).expect("length is within bounds")
    })
}

/// Generate opaque public key bytes.
pub fn public_key() -> impl Strategy<Value = Vec<u8>> {
    prop::collection::vec(any::<u8>(), 1..=128)
}

/// Generate a 32-byte key seed.
///
/// Every seed is a valid Ed25519 secret. For secp256k1 use
/// [`secp256k1_seed`], which avoids zero and values past the group order.
pub fn seed() -> impl Strategy<Value = [u8; 32]> {
    any::<[u8; 32]>()
}

/// Generate a seed that is a valid secp256k1 scalar.
pub fn secp256k1_seed() -> impl Strategy<Value = [u8; 32]> {
    any::<[u8; 32]>().prop_map(|mut seed| {
        // Clearing the top byte keeps the scalar below the group order.
        seed[0] = 0;
        seed[31] |= 1;
        seed
    })
}

/// Generate messages to sign.
pub fn message(max_len: usize) -> impl Strategy<Value = Vec<u8>> {
    prop::collection::vec(any::<u8>(), 0..=max_len)
}

//! Golden test vectors for principal encoding.
//!
//! Every implementation must agree on these bytes and texts.

use ledger_ident_core::Principal;

/// A principal with its known byte and text forms.
#[derive(Debug, Clone)]
pub struct GoldenVector {
    /// Human-readable name for the vector.
    pub name: &'static str,
    /// Principal bytes (hex).
    pub bytes_hex: &'static str,
    /// Canonical text form.
    pub text: &'static str,
}

/// A self-authenticating derivation with its known result.
#[derive(Debug, Clone)]
pub struct SelfAuthenticatingVector {
    pub name: &'static str,
    /// Public key bytes (hex), hashed as given.
    pub public_key_hex: &'static str,
    /// Expected principal bytes (hex).
    pub principal_hex: &'static str,
    pub text: &'static str,
}

/// Get all golden principal vectors.
pub fn all_vectors() -> Vec<GoldenVector> {
    vec![
        GoldenVector {
            name: "management canister",
            bytes_hex: "",
            text: "aaaaa-aa",
        },
        GoldenVector {
            name: "anonymous",
            bytes_hex: "04",
            text: "2vxsx-fae",
        },
        GoldenVector {
            name: "single byte",
            bytes_hex: "ef",
            text: "4k3ra-zhp",
        },
        GoldenVector {
            name: "ten-byte canister id",
            bytes_hex: "00000000000000010101",
            text: "rrkah-fqaaa-aaaaa-aaaaq-cai",
        },
        GoldenVector {
            name: "twelve bytes, trailing short group",
            bytes_hex: "000000000000000000010101",
            text: "cqf23-dyaaa-aaaaa-aaaaa-aaiba-e",
        },
        GoldenVector {
            name: "maximum length",
            bytes_hex: "ffffffffffffffffffffffffffffffffffffffffffffffffffffffffff",
            text: "tsdi7-6x777-77777-77777-77777-77777-77777-77777-77777-77777-776",
        },
        GoldenVector {
            name: "self-authenticating",
            bytes_hex: "2f8e4738f9d76816829985415267863807d37d206ad90fea72bf9dcf02",
            text: "bngem-gzprz-dtr6o-xnali-fgmfi-fjgpb-rya7j-x2idk-3eh6u-4v7tx-hqe",
        },
    ]
}

/// Get the self-authenticating derivation vectors.
pub fn self_authenticating_vectors() -> Vec<SelfAuthenticatingVector> {
    vec![SelfAuthenticatingVector {
        name: "32-byte descending key",
        public_key_hex: "ffeeddccbbaa99887766554433221100ffeeddccbbaa99887766554433221100",
        principal_hex: "2f8e4738f9d76816829985415267863807d37d206ad90fea72bf9dcf02",
        text: "bngem-gzprz-dtr6o-xnali-fgmfi-fjgpb-rya7j-x2idk-3eh6u-4v7tx-hqe",
    }]
}

/// Decode a vector's bytes.
pub fn vector_bytes(vector: &GoldenVector) -> Vec<u8> {
    hex::decode(vector.bytes_hex).expect("golden vector hex is valid")
}

/// Check every vector against the core implementation.
///
/// Returns `(name, matches, rendered text)` per vector.
pub fn verify_all_vectors() -> Vec<(String, bool, String)> {
    all_vectors()
        .iter()
        .map(|v| {
            let rendered = Principal::try_from_slice(&vector_bytes(v))
                .map(|p| p.to_text())
                .unwrap_or_default();
            let parsed = Principal::from_text(v.text).map(|p| p.to_hex());
            let matches = rendered == v.text && parsed.as_deref() == Ok(v.bytes_hex);
            (v.name.to_string(), matches, rendered)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_all_vectors_match() {
        for (name, matches, rendered) in verify_all_vectors() {
            assert!(matches, "{name}: rendered {rendered}");
        }
    }

    #[test]
    fn test_self_authenticating_vectors() {
        for v in self_authenticating_vectors() {
            let key = hex::decode(v.public_key_hex).unwrap();
            let principal = Principal::self_authenticating(&key);
            assert_eq!(principal.to_hex(), v.principal_hex, "{}", v.name);
            assert_eq!(principal.to_text(), v.text, "{}", v.name);
        }
    }
}

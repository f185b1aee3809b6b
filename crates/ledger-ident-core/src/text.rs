//! Textual encoding of principals.
//!
//! Format: `base32lower(crc32_be(bytes) || bytes)` without padding, split
//! into groups of [`GROUP_LEN`] characters joined by `-`.
//!
//! The checksum makes typos detectable; the grouping makes the text readable.
//! Parsing is strict: the input must be exactly the canonical rendering of
//! the bytes it decodes to.

use crate::error::PrincipalError;

/// Characters per group.
pub const GROUP_LEN: usize = 5;

/// Group separator.
pub const SEPARATOR: char = '-';

const CHECKSUM_LEN: usize = 4;

const ALPHABET: &[u8; 32] = b"abcdefghijklmnopqrstuvwxyz234567";

/// Render bytes in the grouped, checksummed textual form.
pub fn encode(bytes: &[u8]) -> String {
    let mut framed = Vec::with_capacity(CHECKSUM_LEN + bytes.len());
    framed.extend_from_slice(&crc32fast::hash(bytes).to_be_bytes());
    framed.extend_from_slice(bytes);

    let flat = base32_encode(&framed);
    let mut grouped = String::with_capacity(flat.len() + flat.len() / GROUP_LEN);
    for (i, c) in flat.chars().enumerate() {
        if i > 0 && i % GROUP_LEN == 0 {
            grouped.push(SEPARATOR);
        }
        grouped.push(c);
    }
    grouped
}

/// Parse the textual form back into bytes.
///
/// Fails on characters outside the base32 alphabet, on text too short to
/// hold a checksum, on a checksum mismatch, and on any rendering that is not
/// canonical (wrong grouping, uppercase, trailing bits).
pub fn decode(text: &str) -> Result<Vec<u8>, PrincipalError> {
    let flat: String = text
        .chars()
        .filter(|&c| c != SEPARATOR)
        .map(|c| c.to_ascii_lowercase())
        .collect();

    let framed = base32_decode(&flat)?;
    if framed.len() < CHECKSUM_LEN {
        return Err(PrincipalError::TextTooShort);
    }

    let (checksum, bytes) = framed.split_at(CHECKSUM_LEN);
    let mut found = [0u8; CHECKSUM_LEN];
    found.copy_from_slice(checksum);
    let found = u32::from_be_bytes(found);
    let expected = crc32fast::hash(bytes);
    if found != expected {
        return Err(PrincipalError::ChecksumMismatch { expected, found });
    }

    let canonical = encode(bytes);
    if canonical != text {
        return Err(PrincipalError::AbnormalGrouping(canonical));
    }

    Ok(bytes.to_vec())
}

// RFC 4648 Base32 encoding (lowercase, no padding)
fn base32_encode(data: &[u8]) -> String {
    let mut result = String::with_capacity((data.len() * 8 + 4) / 5);
    let mut buffer: u64 = 0;
    let mut bits_in_buffer = 0;

    for &byte in data {
        buffer = (buffer << 8) | (byte as u64);
        bits_in_buffer += 8;

        while bits_in_buffer >= 5 {
            bits_in_buffer -= 5;
            let index = ((buffer >> bits_in_buffer) & 0x1f) as usize;
            result.push(ALPHABET[index] as char);
        }
    }

    if bits_in_buffer > 0 {
        let index = ((buffer << (5 - bits_in_buffer)) & 0x1f) as usize;
        result.push(ALPHABET[index] as char);
    }

    result
}

// Trailing bits that do not fill a byte are dropped; `decode` rejects them
// through the canonical re-rendering check.
fn base32_decode(data: &str) -> Result<Vec<u8>, PrincipalError> {
    let mut result = Vec::with_capacity(data.len() * 5 / 8);
    let mut buffer: u64 = 0;
    let mut bits_in_buffer = 0;

    for c in data.chars() {
        let index = ALPHABET
            .iter()
            .position(|&x| x as char == c)
            .ok_or(PrincipalError::InvalidBase32(c))?;
        buffer = (buffer << 5) | (index as u64);
        bits_in_buffer += 5;

        if bits_in_buffer >= 8 {
            bits_in_buffer -= 8;
            result.push(((buffer >> bits_in_buffer) & 0xff) as u8);
        }
    }

    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base32_encode() {
        // Test vector from RFC 4648
        assert_eq!(base32_encode(b""), "");
        assert_eq!(base32_encode(b"f"), "my");
        assert_eq!(base32_encode(b"fo"), "mzxq");
        assert_eq!(base32_encode(b"foo"), "mzxw6");
        assert_eq!(base32_encode(b"foob"), "mzxw6yq");
        assert_eq!(base32_encode(b"fooba"), "mzxw6ytb");
        assert_eq!(base32_encode(b"foobar"), "mzxw6ytboi");
    }

    #[test]
    fn test_base32_decode() {
        assert_eq!(base32_decode("").unwrap(), b"");
        assert_eq!(base32_decode("my").unwrap(), b"f");
        assert_eq!(base32_decode("mzxw6ytboi").unwrap(), b"foobar");
    }

    #[test]
    fn test_encode_known_principals() {
        assert_eq!(encode(&[]), "aaaaa-aa");
        assert_eq!(encode(&[0x04]), "2vxsx-fae");
    }

    #[test]
    fn test_decode_known_principals() {
        assert_eq!(decode("aaaaa-aa").unwrap(), Vec::<u8>::new());
        assert_eq!(decode("2vxsx-fae").unwrap(), vec![0x04]);
    }

    #[test]
    fn test_decode_rejects_bad_checksum() {
        // "aaaaa-aa" with the checksum nibbles flipped
        let err = decode("baaaa-aa").unwrap_err();
        assert!(matches!(err, PrincipalError::ChecksumMismatch { .. }));
    }

    #[test]
    fn test_decode_rejects_regrouping() {
        let err = decode("2vxsxfae").unwrap_err();
        assert_eq!(err, PrincipalError::AbnormalGrouping("2vxsx-fae".into()));

        let err = decode("2vx-sx-fae").unwrap_err();
        assert!(matches!(err, PrincipalError::AbnormalGrouping(_)));
    }

    #[test]
    fn test_decode_rejects_uppercase() {
        let err = decode("2VXSX-FAE").unwrap_err();
        assert!(matches!(err, PrincipalError::AbnormalGrouping(_)));
    }

    #[test]
    fn test_decode_rejects_foreign_characters() {
        assert_eq!(
            decode("2vxsx-fa1").unwrap_err(),
            PrincipalError::InvalidBase32('1')
        );
    }

    #[test]
    fn test_decode_rejects_short_text() {
        assert_eq!(decode("aaaaa").unwrap_err(), PrincipalError::TextTooShort);
        assert_eq!(decode("").unwrap_err(), PrincipalError::TextTooShort);
    }
}

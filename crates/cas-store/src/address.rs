//! Content address: a 20-byte SHA-1 value with textual form, parsing, and
//! a process-stable hash independent of `std::hash::Hash`'s randomized state.

use std::fmt;
use std::str::FromStr;

/// Number of raw bytes in an [`Address`].
pub const ADDRESS_LEN: usize = 20;

/// A fixed 20-byte SHA-1 digest identifying stored content.
///
/// Every `Address` held in memory is well-formed (length-checked at
/// construction); callers never need to re-validate it.
#[derive(Clone, Copy, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct Address([u8; ADDRESS_LEN]);

/// Failure modes for parsing textual or raw-byte addresses.
#[derive(thiserror::Error, Debug, Clone, Eq, PartialEq)]
pub enum ParseError {
    /// Text was not exactly 40 characters, or bytes were not exactly 20.
    #[error("address has wrong length: expected {expected}, got {actual}")]
    BadLength {
        /// Expected length (40 for text, 20 for bytes).
        expected: usize,
        /// Observed length.
        actual: usize,
    },
    /// Text contained a non-hexadecimal character.
    #[error("address contains non-hex character {found:?} at index {index}")]
    BadChar {
        /// Byte index of the offending character within the text.
        index: usize,
        /// The offending character.
        found: char,
    },
}

impl Address {
    /// The all-zero sentinel address, textually `"0000...0"` (40 zeros).
    ///
    /// Kept only for parity with stores that historically used a
    /// default-constructed zero value to mean "absent"; new code should
    /// prefer `Option<Address>` at API boundaries instead of comparing
    /// against this constant.
    pub const ZERO: Address = Address([0u8; ADDRESS_LEN]);

    /// Parse a 40-character hex string (either case) into an `Address`.
    pub fn parse(text: &str) -> Result<Address, ParseError> {
        let bytes = text.as_bytes();
        if bytes.len() != ADDRESS_LEN * 2 {
            return Err(ParseError::BadLength { expected: ADDRESS_LEN * 2, actual: bytes.len() });
        }
        let mut out = [0u8; ADDRESS_LEN];
        for (i, chunk) in bytes.chunks_exact(2).enumerate() {
            let hi = hex_val(chunk[0]).ok_or_else(|| ParseError::BadChar {
                index: i * 2,
                found: chunk[0] as char,
            })?;
            let lo = hex_val(chunk[1]).ok_or_else(|| ParseError::BadChar {
                index: i * 2 + 1,
                found: chunk[1] as char,
            })?;
            out[i] = (hi << 4) | lo;
        }
        Ok(Address(out))
    }

    /// Non-throwing variant of [`Address::parse`].
    pub fn try_parse(text: &str) -> Option<Address> {
        Address::parse(text).ok()
    }

    /// Construct from exactly 20 raw bytes.
    pub fn from_bytes(b: &[u8]) -> Result<Address, ParseError> {
        if b.len() != ADDRESS_LEN {
            return Err(ParseError::BadLength { expected: ADDRESS_LEN, actual: b.len() });
        }
        let mut out = [0u8; ADDRESS_LEN];
        out.copy_from_slice(b);
        Ok(Address(out))
    }

    /// Shape check: exactly 40 hex characters, no whitespace tolerance.
    pub fn is_valid_text(text: &str) -> bool {
        text.len() == ADDRESS_LEN * 2 && text.bytes().all(|b| hex_val(b).is_some())
    }

    /// Shape check: exactly 20 bytes.
    pub fn is_valid_bytes(b: &[u8]) -> bool {
        b.len() == ADDRESS_LEN
    }

    /// The raw 20 bytes.
    pub fn as_bytes(&self) -> &[u8; ADDRESS_LEN] {
        &self.0
    }

    /// Upper-case 40-character hex form.
    pub fn to_text(&self) -> String {
        hex::encode_upper(self.0)
    }

    /// Explicit process/host-stable hash (FNV-1a over the raw bytes), for
    /// callers that persist or share a hash value across processes where
    /// `std::hash::Hash`'s randomized default `HashMap` state would not do.
    pub fn fnv1a64(&self) -> u64 {
        const OFFSET_BASIS: u64 = 0xcbf2_9ce4_8422_2325;
        const PRIME: u64 = 0x0000_0100_0000_01b3;
        let mut hash = OFFSET_BASIS;
        for &byte in &self.0 {
            hash ^= u64::from(byte);
            hash = hash.wrapping_mul(PRIME);
        }
        hash
    }
}

fn hex_val(b: u8) -> Option<u8> {
    match b {
        b'0'..=b'9' => Some(b - b'0'),
        b'a'..=b'f' => Some(b - b'a' + 10),
        b'A'..=b'F' => Some(b - b'A' + 10),
        _ => None,
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_text())
    }
}

impl fmt::Debug for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Address({})", self.to_text())
    }
}

impl FromStr for Address {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Address::parse(s)
    }
}

impl Default for Address {
    fn default() -> Self {
        Address::ZERO
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trip_hex() {
        let a = Address::parse("40613A45BC715AE4A34895CBDD6122E982FE3DF5").unwrap();
        assert_eq!(a.to_text(), "40613A45BC715AE4A34895CBDD6122E982FE3DF5");
    }

    #[test]
    fn round_trip_lowercase_upper_emit() {
        let a = Address::parse("40613a45bc715ae4a34895cbdd6122e982fe3df5").unwrap();
        assert_eq!(a.to_text(), "40613A45BC715AE4A34895CBDD6122E982FE3DF5");
    }

    #[test]
    fn zero_sentinel_prints_as_forty_zeros() {
        assert_eq!(Address::ZERO.to_text(), "0".repeat(40));
        assert_eq!(Address::default().to_text(), "0".repeat(40));
    }

    #[test]
    fn validation_accepts_known_good_forms() {
        assert!(Address::is_valid_text(&"A".repeat(40)));
        assert!(Address::is_valid_text(&"a".repeat(40)));
        assert!(Address::is_valid_text(&"0".repeat(40)));
    }

    #[test]
    fn validation_rejects_bad_forms() {
        assert!(!Address::is_valid_text(&"A".repeat(41)));
        assert!(!Address::is_valid_text(&"A".repeat(39)));
        assert!(!Address::is_valid_text(&format!("{}x", "A".repeat(39))));
        assert!(!Address::is_valid_text(&format!(" {}", "A".repeat(39))));
        assert!(!Address::is_valid_text(&format!("{} ", "A".repeat(39))));
    }

    #[test]
    fn is_valid_bytes_requires_length_twenty() {
        assert!(Address::is_valid_bytes(&[0u8; 20]));
        assert!(!Address::is_valid_bytes(&[0u8; 19]));
        assert!(!Address::is_valid_bytes(&[0u8; 21]));
    }

    #[test]
    fn parse_reports_bad_length() {
        let err = Address::parse("abc").unwrap_err();
        assert!(matches!(err, ParseError::BadLength { expected: 40, actual: 3 }));
    }

    #[test]
    fn parse_reports_bad_char() {
        let text = format!("{}x{}", "A".repeat(10), "A".repeat(29));
        let err = Address::parse(&text).unwrap_err();
        assert!(matches!(err, ParseError::BadChar { index: 10, found: 'x' }));
    }

    #[test]
    fn try_parse_is_non_throwing() {
        assert!(Address::try_parse("not-hex").is_none());
        assert!(Address::try_parse(&"F".repeat(40)).is_some());
    }

    #[test]
    fn fnv1a_is_deterministic_across_instances() {
        let a = Address::parse(&"AB".repeat(20)).unwrap();
        let b = Address::parse(&"AB".repeat(20)).unwrap();
        assert_eq!(a.fnv1a64(), b.fnv1a64());
    }
}

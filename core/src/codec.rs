//! Strict conversion between 32-byte fields and their hex wire form.
//!
//! Exactly one textual form is accepted for every 32-byte field: 64 lowercase hexadecimal
//! characters, without a `0x` prefix. Anything else is malformed, so two distinct strings
//! can never decode to the same bytes.

use alloc::string::String;
use core::fmt;

/// The number of characters in the hex form of a 32-byte field.
pub const HEX32_LEN: usize = 64;

/// A field was not 64 lowercase hex characters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MalformedHex;

impl fmt::Display for MalformedHex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "expected {} lowercase hex characters", HEX32_LEN)
    }
}

#[cfg(feature = "std")]
impl std::error::Error for MalformedHex {}

/// Parse the canonical hex form of a 32-byte field.
pub fn parse_hex32(s: &str) -> Result<[u8; 32], MalformedHex> {
    if !is_canonical_hex32(s) {
        return Err(MalformedHex);
    }

    let mut out = [0u8; 32];
    hex::decode_to_slice(s, &mut out).map_err(|_| MalformedHex)?;
    Ok(out)
}

/// Encode a 32-byte field in its canonical hex form.
pub fn encode_hex32(bytes: &[u8; 32]) -> String {
    hex::encode(bytes)
}

/// Whether the string is exactly 64 lowercase hex characters.
pub fn is_canonical_hex32(s: &str) -> bool {
    s.len() == HEX32_LEN && s.bytes().all(|b| matches!(b, b'0'..=b'9' | b'a'..=b'f'))
}

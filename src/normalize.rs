//! Canonicalization of the mixed numeric/hex representations that JSON-RPC
//! nodes return.
//!
//! Everything bound for the RLP encoder goes through here first: header
//! fields become raw bytes, quantities become minimal big-endian bytes with
//! no leading zero (the integer zero is the empty string), and addresses
//! become exactly 20 bytes regardless of input case.

use std::str::FromStr;

use num_bigint::BigUint;

use crate::error::{ProofGenError, Result};

/// Decode a hex string (with or without `0x` prefix) into raw bytes.
///
/// Byte fields keep their width: leading zeros are preserved. Odd-length or
/// non-hex input is a format error, never silently padded.
pub fn normalize_bytes(s: &str) -> Result<Vec<u8>> {
    let stripped = strip_hex_prefix(s);
    if stripped.len() % 2 == 1 {
        return Err(ProofGenError::format("hex string (odd length)", s));
    }
    hex::decode(stripped).map_err(|_| ProofGenError::format("hex string", s))
}

/// Canonicalize an address to exactly 20 bytes, case-insensitive on input.
pub fn normalize_address(s: &str) -> Result<[u8; 20]> {
    let bytes =
        hex::decode(strip_hex_prefix(s)).map_err(|_| ProofGenError::format("address", s))?;
    if bytes.len() != 20 {
        return Err(ProofGenError::format("address (not 20 bytes)", s));
    }
    let mut out = [0u8; 20];
    out.copy_from_slice(&bytes);
    Ok(out)
}

/// Parse a decimal or `0x`-hex numeric string into its minimal big-endian
/// byte representation: no leading zero byte, and zero is the empty string.
///
/// Block difficulty and similar quantities can exceed 64 bits, so this goes
/// through an unbounded integer rather than a machine word.
pub fn normalize_int(s: &str) -> Result<Vec<u8>> {
    let value = parse_uint(s)?;
    let bytes = value.to_bytes_be();
    // BigUint renders zero as a single 0x00 byte
    if bytes == [0] {
        Ok(Vec::new())
    } else {
        Ok(bytes)
    }
}

/// Render a decimal or hex numeric string as a canonical `0x`-prefixed
/// lowercase hex quantity with no leading zero digit (`"0x0"` for zero).
///
/// Used only for outbound request parameters, never for the binary blobs.
pub fn to_hex_string(s: &str) -> Result<String> {
    let value = parse_uint(s)?;
    Ok(format!("0x{:x}", value))
}

/// Parse a `0x`-prefixed hex quantity into a u64.
pub fn parse_hex_u64(s: &str) -> Result<u64> {
    u64::from_str_radix(strip_hex_prefix(s), 16)
        .map_err(|_| ProofGenError::format("hex quantity", s))
}

fn parse_uint(s: &str) -> Result<BigUint> {
    if s.starts_with('-') {
        return Err(ProofGenError::format("unsigned integer (negative)", s));
    }
    let parsed = if let Some(stripped) = s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")) {
        BigUint::parse_bytes(stripped.as_bytes(), 16)
    } else {
        BigUint::parse_bytes(s.as_bytes(), 10)
    };
    parsed.ok_or_else(|| ProofGenError::format("unsigned integer", s))
}

fn strip_hex_prefix(s: &str) -> &str {
    s.strip_prefix("0x")
        .or_else(|| s.strip_prefix("0X"))
        .unwrap_or(s)
}

/// A block reference for `eth_getBlockByNumber` and `eth_getProof` params.
///
/// The keywords bypass numeric normalization entirely and are passed through
/// verbatim; concrete numbers are rendered as minimal hex quantities.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlockSelector {
    Latest,
    Earliest,
    Number(u64),
}

impl BlockSelector {
    /// The JSON-RPC parameter form of this selector.
    pub fn as_param(&self) -> String {
        match self {
            Self::Latest => "latest".to_string(),
            Self::Earliest => "earliest".to_string(),
            Self::Number(n) => format!("0x{:x}", n),
        }
    }
}

impl FromStr for BlockSelector {
    type Err = ProofGenError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "latest" => Ok(Self::Latest),
            "earliest" => Ok(Self::Earliest),
            _ => {
                let n = if let Some(stripped) = s.strip_prefix("0x") {
                    u64::from_str_radix(stripped, 16)
                } else {
                    s.parse()
                }
                .map_err(|_| ProofGenError::format("block selector", s))?;
                Ok(Self::Number(n))
            }
        }
    }
}

//! Recursive length prefix (RLP) codec.
//!
//! The value universe is byte strings and ordered lists of values, nothing
//! else. The codec never interprets payloads: addresses, hashes, and trie
//! nodes are all opaque byte strings here. Decoding is strict: any encoding
//! that is not the unique minimal form is rejected, so decode(encode(x)) == x
//! and encode(decode(b)) == b both hold.

use crate::error::{ProofGenError, Result};

/// An RLP value: a byte string or a list of RLP values.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Item {
    Bytes(Vec<u8>),
    List(Vec<Item>),
}

impl Item {
    pub fn bytes(data: impl Into<Vec<u8>>) -> Self {
        Self::Bytes(data.into())
    }

    /// The payload if this item is a byte string.
    pub fn as_bytes(&self) -> Option<&[u8]> {
        match self {
            Self::Bytes(b) => Some(b),
            Self::List(_) => None,
        }
    }

    /// The elements if this item is a list.
    pub fn as_list(&self) -> Option<&[Item]> {
        match self {
            Self::Bytes(_) => None,
            Self::List(items) => Some(items),
        }
    }
}

/// Encode an item into its canonical RLP byte form.
pub fn encode(item: &Item) -> Vec<u8> {
    match item {
        Item::Bytes(data) => encode_bytes(data),
        Item::List(items) => {
            let mut payload = Vec::new();
            for item in items {
                payload.extend_from_slice(&encode(item));
            }
            let mut out = length_prefix(payload.len(), 0xc0);
            out.extend_from_slice(&payload);
            out
        }
    }
}

fn encode_bytes(data: &[u8]) -> Vec<u8> {
    if data.len() == 1 && data[0] <= 0x7f {
        return vec![data[0]];
    }
    let mut out = length_prefix(data.len(), 0x80);
    out.extend_from_slice(data);
    out
}

/// Short form `offset + len` for payloads up to 55 bytes, otherwise
/// `offset + 55 + len_of_len` followed by the big-endian length.
fn length_prefix(len: usize, offset: u8) -> Vec<u8> {
    if len <= 55 {
        vec![offset + len as u8]
    } else {
        let len_bytes = min_be_bytes(len);
        let mut out = Vec::with_capacity(1 + len_bytes.len());
        out.push(offset + 55 + len_bytes.len() as u8);
        out.extend_from_slice(&len_bytes);
        out
    }
}

fn min_be_bytes(value: usize) -> Vec<u8> {
    let bytes = value.to_be_bytes();
    let first = bytes.iter().position(|b| *b != 0).unwrap_or(bytes.len() - 1);
    bytes[first..].to_vec()
}

/// Decode exactly one item; trailing bytes are an error.
pub fn decode(data: &[u8]) -> Result<Item> {
    let (item, consumed) = decode_at(data)?;
    if consumed != data.len() {
        return Err(ProofGenError::Decode(format!(
            "{} trailing bytes after a complete value",
            data.len() - consumed
        )));
    }
    Ok(item)
}

/// Decode one item from the front of `data`, returning it and the number of
/// bytes consumed.
fn decode_at(data: &[u8]) -> Result<(Item, usize)> {
    let first = *data
        .first()
        .ok_or_else(|| ProofGenError::Decode("empty input".to_string()))?;

    match first {
        0x00..=0x7f => Ok((Item::Bytes(vec![first]), 1)),
        0x80..=0xb7 => {
            let len = (first - 0x80) as usize;
            let payload = take(data, 1, len)?;
            if len == 1 && payload[0] <= 0x7f {
                return Err(ProofGenError::Decode(format!(
                    "single byte 0x{:02x} must encode as itself",
                    payload[0]
                )));
            }
            Ok((Item::Bytes(payload.to_vec()), 1 + len))
        }
        0xb8..=0xbf => {
            let (len, header) = read_long_length(data, first - 0xb7)?;
            let payload = take(data, header, len)?;
            Ok((Item::Bytes(payload.to_vec()), header + len))
        }
        0xc0..=0xf7 => {
            let len = (first - 0xc0) as usize;
            let payload = take(data, 1, len)?;
            Ok((Item::List(decode_list_payload(payload)?), 1 + len))
        }
        0xf8..=0xff => {
            let (len, header) = read_long_length(data, first - 0xf7)?;
            let payload = take(data, header, len)?;
            Ok((Item::List(decode_list_payload(payload)?), header + len))
        }
    }
}

/// Read a long-form big-endian length of `len_len` bytes starting at offset 1.
/// Returns the payload length and total header size. Rejects non-canonical
/// encodings: leading zero length bytes and lengths that fit the short form.
fn read_long_length(data: &[u8], len_len: u8) -> Result<(usize, usize)> {
    let len_len = len_len as usize;
    let len_bytes = take(data, 1, len_len)?;
    if len_bytes[0] == 0 {
        return Err(ProofGenError::Decode(
            "length has leading zero byte".to_string(),
        ));
    }
    if len_len > std::mem::size_of::<usize>() {
        return Err(ProofGenError::Decode("length overflows usize".to_string()));
    }
    let mut len = 0usize;
    for b in len_bytes {
        len = (len << 8) | *b as usize;
    }
    if len <= 55 {
        return Err(ProofGenError::Decode(format!(
            "length {} should use the short form",
            len
        )));
    }
    Ok((len, 1 + len_len))
}

fn decode_list_payload(payload: &[u8]) -> Result<Vec<Item>> {
    let mut items = Vec::new();
    let mut pos = 0;
    while pos < payload.len() {
        let (item, consumed) = decode_at(&payload[pos..])?;
        items.push(item);
        pos += consumed;
    }
    Ok(items)
}

fn take(data: &[u8], start: usize, len: usize) -> Result<&[u8]> {
    let end = start
        .checked_add(len)
        .ok_or_else(|| ProofGenError::Decode("length overflows usize".to_string()))?;
    data.get(start..end)
        .ok_or_else(|| format_truncated(data.len(), end))
}

fn format_truncated(have: usize, want: usize) -> ProofGenError {
    ProofGenError::Decode(format!("truncated input: have {} bytes, need {}", have, want))
}

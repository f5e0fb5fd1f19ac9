//! Octet-string, bit-string and restricted-character-set string
//! codecs, plus the OER general length-of-length rule.

use crate::acn::{decode_length, encode_length};
use crate::bitstream::BitStream;
use crate::error::{CodecError, CodecResult};

// ---- octet strings ----

/// Writes exactly `size` bytes, zero-padding `bytes` if it is shorter.
pub fn encode_octets_fix_size(bs: &mut BitStream, bytes: &[u8], size: usize) -> CodecResult<()> {
    for i in 0..size {
        bs.append_byte0(bytes.get(i).copied().unwrap_or(0))?;
    }
    Ok(())
}

pub fn decode_octets_fix_size(bs: &mut BitStream, size: usize) -> CodecResult<Vec<u8>> {
    let mut out = vec![0u8; size];
    for slot in out.iter_mut() {
        *slot = bs.read_byte()?;
    }
    Ok(out)
}

/// Writes `bytes` followed by a single `0x00` terminator. `bytes`
/// must not itself contain a zero byte.
pub fn encode_octets_null_terminated(bs: &mut BitStream, bytes: &[u8]) -> CodecResult<()> {
    for &b in bytes {
        bs.append_byte0(b)?;
    }
    bs.append_byte0(0)
}

pub fn decode_octets_null_terminated(bs: &mut BitStream) -> CodecResult<Vec<u8>> {
    let mut out = Vec::new();
    loop {
        let b = bs.read_byte()?;
        if b == 0 {
            return Ok(out);
        }
        out.push(b);
    }
}

/// No length prefix at all: the caller already knows `len` from an
/// external source (a sibling field, a protocol constant).
pub fn encode_octets_external_determinant(bs: &mut BitStream, bytes: &[u8]) -> CodecResult<()> {
    for &b in bytes {
        bs.append_byte0(b)?;
    }
    Ok(())
}

pub fn decode_octets_external_determinant(bs: &mut BitStream, len: usize) -> CodecResult<Vec<u8>> {
    decode_octets_fix_size(bs, len)
}

/// A length determinant (bounded by `max`) followed by that many bytes.
pub fn encode_octets_internal_determinant(bs: &mut BitStream, bytes: &[u8], max: u64) -> CodecResult<()> {
    encode_length(bs, bytes.len() as u64, max)?;
    encode_octets_external_determinant(bs, bytes)
}

pub fn decode_octets_internal_determinant(bs: &mut BitStream, max: u64) -> CodecResult<Vec<u8>> {
    let len = decode_length(bs, max)? as usize;
    decode_octets_external_determinant(bs, len)
}

// ---- bit strings ----

pub fn encode_bits_fix_size(bs: &mut BitStream, src: &[u8], nbits: usize) -> CodecResult<()> {
    bs.append_bits(src, nbits)
}

pub fn decode_bits_fix_size(bs: &mut BitStream, nbits: usize) -> CodecResult<Vec<u8>> {
    let mut out = vec![0u8; (nbits + 7) / 8];
    bs.read_bits(&mut out, nbits)?;
    Ok(out)
}

pub fn encode_bits_internal_determinant(bs: &mut BitStream, src: &[u8], nbits: usize, max_bits: u64) -> CodecResult<()> {
    encode_length(bs, nbits as u64, max_bits)?;
    encode_bits_fix_size(bs, src, nbits)
}

pub fn decode_bits_internal_determinant(bs: &mut BitStream, max_bits: u64) -> CodecResult<(Vec<u8>, usize)> {
    let nbits = decode_length(bs, max_bits)? as usize;
    Ok((decode_bits_fix_size(bs, nbits)?, nbits))
}

// ---- restricted character-set strings ----

/// Encodes each character of `text` as its index in `charset`, each
/// index written as a constrained whole number over
/// `[0, charset.len() - 1]`. Shorter-than-`size` input is padded with
/// index 0.
pub fn encode_char_index_fix_size(
    bs: &mut BitStream,
    text: &[u8],
    charset: &[u8],
    size: usize,
) -> CodecResult<()> {
    use crate::integer::encode_constrained_pos_whole;
    let max = (charset.len() - 1) as u64;
    for i in 0..size {
        let c = text.get(i).copied().unwrap_or(charset[0]);
        let idx = charset
            .iter()
            .position(|&x| x == c)
            .ok_or_else(|| CodecError::IncorrectStream {
                bit_offset: bs.bit_length(),
                message: format!("character {c:#04x} is outside the declared charset"),
            })? as u64;
        encode_constrained_pos_whole(bs, idx, max)?;
    }
    Ok(())
}

pub fn decode_char_index_fix_size(
    bs: &mut BitStream,
    charset: &[u8],
    size: usize,
) -> CodecResult<Vec<u8>> {
    use crate::integer::decode_constrained_pos_whole;
    let max = (charset.len() - 1) as u64;
    let mut out = Vec::with_capacity(size);
    for _ in 0..size {
        let bit_offset = bs.bit_length();
        let idx = decode_constrained_pos_whole(bs, max)? as usize;
        let c = charset.get(idx).copied().ok_or_else(|| CodecError::IncorrectStream {
            bit_offset,
            message: format!("char index {idx} outside charset of size {}", charset.len()),
        })?;
        out.push(c);
    }
    Ok(out)
}

// ---- OER general length-of-length rule ----

/// Short form (`0..=127`) for one byte, long form (`0x80 | k` plus `k`
/// big-endian bytes) otherwise.
pub fn encode_oer_length(bs: &mut BitStream, len: u64) -> CodecResult<()> {
    if len < 128 {
        return bs.append_byte0(len as u8);
    }
    let nbytes = ((64 - len.leading_zeros()) as usize + 7) / 8;
    bs.append_byte0(0x80 | nbytes as u8)?;
    for i in (0..nbytes).rev() {
        bs.append_byte0((len >> (i * 8)) as u8)?;
    }
    Ok(())
}

pub fn decode_oer_length(bs: &mut BitStream) -> CodecResult<u64> {
    let first = bs.read_byte()?;
    if first & 0x80 == 0 {
        return Ok(first as u64);
    }
    let nbytes = (first & 0x7F) as usize;
    let bit_offset = bs.bit_length();
    if nbytes == 0 || nbytes > 8 {
        return Err(CodecError::BadLength {
            bit_offset,
            length: nbytes as u64,
            reason: "OER length-of-length out of range".into(),
        });
    }
    let mut v: u64 = 0;
    for _ in 0..nbytes {
        v = (v << 8) | bs.read_byte()? as u64;
    }
    if nbytes != minimal_length_of_length_bytes(v) {
        return Err(CodecError::BadLength {
            bit_offset,
            length: v,
            reason: format!(
                "OER length-of-length prefix of {nbytes} byte(s) is not minimal for value {v}"
            ),
        });
    }
    Ok(v)
}

/// The number of bytes a minimal long-form length-of-length prefix
/// must use for `v`. Values under 128 belong in the short form, so no
/// long-form byte count is minimal for them.
fn minimal_length_of_length_bytes(v: u64) -> usize {
    if v < 128 {
        0
    } else {
        ((64 - v.leading_zeros()) as usize + 7) / 8
    }
}

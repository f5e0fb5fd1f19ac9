//! Sequence, sequence-of, choice and enumerated framing shared by the
//! uPER/OER/ACN front ends, plus the `Codec` trait that stands in for
//! the per-type `T_encode`/`T_decode` ABI convention.

use crate::bitstream::BitStream;
use crate::error::{CodecError, CodecResult};
use crate::integer::{
    decode_constrained_pos_whole, decode_constrained_whole, decode_unconstrained_whole,
    encode_constrained_pos_whole, encode_constrained_whole, encode_unconstrained_whole,
};
use crate::strings::{decode_octets_internal_determinant, encode_octets_internal_determinant};

/// The per-type encode/decode contract: one implementation per
/// generated composite, standing in for the `T_encode`/`T_decode`
/// symbol pair of the ABI this crate generalizes.
pub trait Codec: Sized {
    fn encode(&self, buf: &mut [u8]) -> CodecResult<usize>;
    fn decode(buf: &[u8]) -> CodecResult<(Self, usize)>;
}

/// Appends one presence bit per optional/default field, in
/// declaration order.
pub fn encode_presence_bitmap(bs: &mut BitStream, present: &[bool]) -> CodecResult<()> {
    for &p in present {
        bs.append_bit(p)?;
    }
    Ok(())
}

pub fn decode_presence_bitmap(bs: &mut BitStream, nfields: usize) -> CodecResult<Vec<bool>> {
    let span = tracing::trace_span!("sequence_presence_bitmap", nfields);
    let _enter = span.enter();
    let result: CodecResult<Vec<bool>> = (0..nfields).map(|_| bs.read_bit()).collect();
    match &result {
        Ok(bits) => tracing::trace!(present = ?bits, "decoded presence bitmap"),
        Err(err) => tracing::warn!(%err, "failed decoding presence bitmap"),
    }
    result
}

/// OER pads the presence preamble out to a whole byte.
pub fn encode_presence_bitmap_byte_aligned(bs: &mut BitStream, present: &[bool]) -> CodecResult<()> {
    encode_presence_bitmap(bs, present)?;
    crate::acn::align_to_next_byte(bs)
}

pub fn decode_presence_bitmap_byte_aligned(bs: &mut BitStream, nfields: usize) -> CodecResult<Vec<bool>> {
    let v = decode_presence_bitmap(bs, nfields)?;
    crate::acn::align_to_next_byte(bs)?;
    Ok(v)
}

/// The extension-present bit preceding a sequence's extension
/// additions.
pub fn encode_extension_bit(bs: &mut BitStream, present: bool) -> CodecResult<()> {
    bs.append_bit(present)
}

pub fn decode_extension_bit(bs: &mut BitStream) -> CodecResult<bool> {
    bs.read_bit()
}

/// The normally-small-length-prefixed bitmap naming which extension
/// additions follow, one presence bit per addition in declaration
/// order. Written only when `encode_extension_bit` reported `true`.
pub fn encode_extension_addition_bitmap(bs: &mut BitStream, present: &[bool]) -> CodecResult<()> {
    crate::per::encode_normally_small_length(bs, present.len() as u64)?;
    encode_presence_bitmap(bs, present)
}

pub fn decode_extension_addition_bitmap(bs: &mut BitStream) -> CodecResult<Vec<bool>> {
    let n = crate::per::decode_normally_small_length(bs)? as usize;
    decode_presence_bitmap(bs, n)
}

/// Skips an unknown extension addition: it is framed by its own OER
/// length prefix so a decoder that does not recognize it can discard
/// the bytes without interpreting them.
pub fn skip_unknown_addition(bs: &mut BitStream) -> CodecResult<()> {
    let len = crate::strings::decode_oer_length(bs)? as usize;
    for _ in 0..len {
        bs.read_byte()?;
    }
    Ok(())
}

pub fn encode_unknown_addition(bs: &mut BitStream, bytes: &[u8]) -> CodecResult<()> {
    crate::strings::encode_oer_length(bs, bytes.len() as u64)?;
    for &b in bytes {
        bs.append_byte0(b)?;
    }
    Ok(())
}

/// A known extension addition: the same length-prefix framing as an
/// unknown one, but the caller can decode its payload. `decode_value`
/// reading past the declared length fails the usual underflow way if
/// the buffer itself runs out; reading past it while bytes from a
/// sibling field remain is caught explicitly below and reported as bad
/// length (the addition was shorter on the wire than its own prefix
/// claimed). Bytes the declared length included but `decode_value`
/// did not consume are skipped, the forward-compatibility case where a
/// newer encoder added trailing sub-fields this decoder does not know.
pub fn encode_known_addition(
    bs: &mut BitStream,
    len: usize,
    encode_value: impl FnOnce(&mut BitStream) -> CodecResult<()>,
) -> CodecResult<()> {
    let bit_offset = bs.bit_length();
    crate::strings::encode_oer_length(bs, len as u64)?;
    let before = bs.bit_length();
    encode_value(bs)?;
    let declared_bits = len as u64 * 8;
    let written_bits = bs.bit_length() - before;
    if written_bits > declared_bits {
        return Err(CodecError::BadLength {
            bit_offset,
            length: len as u64,
            reason: "known extension addition wrote more than its declared length".into(),
        });
    }
    for _ in written_bits..declared_bits {
        bs.append_bit(false)?;
    }
    Ok(())
}

pub fn decode_known_addition<T>(
    bs: &mut BitStream,
    decode_value: impl FnOnce(&mut BitStream) -> CodecResult<T>,
) -> CodecResult<T> {
    let len = crate::strings::decode_oer_length(bs)? as usize;
    let end_bit = bs.bit_length() + len as u64 * 8;
    let value = decode_value(bs)?;
    if bs.bit_length() > end_bit {
        return Err(CodecError::InsufficientData {
            bit_offset: end_bit,
            needed: bs.bit_length() - end_bit,
        });
    }
    while bs.bit_length() < end_bit {
        bs.read_bit()?;
    }
    Ok(value)
}

/// A sequence-of's length, as a constrained integer bounded by the
/// compile-time maximum. Rejects lengths exceeding `max`.
pub fn encode_sequence_of_length(bs: &mut BitStream, len: usize, max: usize) -> CodecResult<()> {
    encode_constrained_pos_whole(bs, len as u64, max as u64)
}

pub fn decode_sequence_of_length(bs: &mut BitStream, max: usize) -> CodecResult<usize> {
    let bit_offset = bs.bit_length();
    let len = decode_constrained_pos_whole(bs, max as u64)? as usize;
    if len > max {
        let err = CodecError::BadLength {
            bit_offset,
            length: len as u64,
            reason: format!("sequence-of length exceeds declared maximum {max}"),
        };
        tracing::warn!(%err, "sequence-of length rejected");
        return Err(err);
    }
    tracing::trace!(len, max, "decoded sequence-of length");
    Ok(len)
}

/// The choice discriminant: a constrained integer over
/// `0..=num_alternatives - 1` for PER, or a tag byte for OER.
pub fn encode_choice_discriminant_per(bs: &mut BitStream, tag: u64, num_alternatives: u64) -> CodecResult<()> {
    encode_constrained_pos_whole(bs, tag, num_alternatives - 1)
}

pub fn decode_choice_discriminant_per(bs: &mut BitStream, num_alternatives: u64) -> CodecResult<u64> {
    let bit_offset = bs.bit_length();
    let tag = decode_constrained_pos_whole(bs, num_alternatives - 1)?;
    if tag >= num_alternatives {
        let err = CodecError::BadChoice { bit_offset, tag };
        tracing::warn!(%err, "choice discriminant out of range");
        return Err(err);
    }
    tracing::trace!(tag, "decoded choice discriminant");
    Ok(tag)
}

/// OER tag bytes: `0x80 | idx` for `idx < 0x7F`, with a high-bit
/// continuation for larger alternative counts than any schema in
/// this crate declares (the convention is still honored so a future
/// schema with >127 alternatives works unmodified).
pub fn encode_choice_tag_oer(bs: &mut BitStream, tag: u64) -> CodecResult<()> {
    if tag < 0x7F {
        return bs.append_byte0(0x80 | tag as u8);
    }
    bs.append_byte0(0x80 | 0x7F)?;
    encode_constrained_pos_whole(bs, tag, u64::MAX)
}

pub fn decode_choice_tag_oer(bs: &mut BitStream, known_tags: &[u64]) -> CodecResult<u64> {
    let bit_offset = bs.bit_length();
    let byte = bs.read_byte()?;
    if byte & 0x80 == 0 {
        let err = CodecError::BadChoice {
            bit_offset,
            tag: byte as u64,
        };
        tracing::warn!(%err, "OER choice tag byte missing high bit");
        return Err(err);
    }
    let low = (byte & 0x7F) as u64;
    let tag = if low < 0x7F {
        low
    } else {
        decode_constrained_pos_whole(bs, u64::MAX)?
    };
    if !known_tags.contains(&tag) {
        let err = CodecError::BadChoice { bit_offset, tag };
        tracing::warn!(%err, "OER choice tag not among known alternatives");
        return Err(err);
    }
    tracing::trace!(tag, "decoded OER choice tag");
    Ok(tag)
}

/// An enumerated value: the constrained integer over the declared
/// tag set. Unlike a choice tag, the permitted values need not be
/// contiguous, so the caller supplies the concrete set.
pub fn encode_enumerated(bs: &mut BitStream, tag: i64, tags: &[i64]) -> CodecResult<()> {
    let idx = tags
        .iter()
        .position(|&t| t == tag)
        .expect("enumerated value must be one of the declared tags") as u64;
    encode_constrained_pos_whole(bs, idx, (tags.len() - 1) as u64)
}

pub fn decode_enumerated(bs: &mut BitStream, tags: &[i64]) -> CodecResult<i64> {
    let bit_offset = bs.bit_length();
    let idx = decode_constrained_pos_whole(bs, (tags.len() - 1) as u64)? as usize;
    match tags.get(idx).copied() {
        Some(tag) => {
            tracing::trace!(tag, "decoded enumerated value");
            Ok(tag)
        }
        None => {
            let err = CodecError::BadEnum {
                bit_offset,
                value: idx as i64,
            };
            tracing::warn!(%err, "enumerated index outside declared tag set");
            Err(err)
        }
    }
}

/// The choice alternative of `DemoRecord::selector`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DemoChoice {
    Number(i64),
    Text(Vec<u8>),
}

/// A representative composite wiring every primitive family in this
/// crate together the way a generated per-schema encoder/decoder pair
/// would: a constrained integer, a presence-bitmap-guarded optional
/// field, a sequence-of, and a two-alternative choice, all bit-packed
/// per the uPER front end.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DemoRecord {
    pub id: i64,
    pub label: Option<Vec<u8>>,
    pub items: Vec<u8>,
    pub selector: DemoChoice,
}

const DEMO_ITEMS_MAX: usize = 8;
const DEMO_LABEL_MAX_BYTES: u64 = 32;
const DEMO_TEXT_MAX_BYTES: u64 = 64;

impl Codec for DemoRecord {
    fn encode(&self, buf: &mut [u8]) -> CodecResult<usize> {
        let mut bs = BitStream::init(buf);
        encode_constrained_whole(&mut bs, self.id, -1000, 1000)?;
        encode_presence_bitmap(&mut bs, &[self.label.is_some()])?;
        if let Some(label) = &self.label {
            encode_octets_internal_determinant(&mut bs, label, DEMO_LABEL_MAX_BYTES)?;
        }
        encode_sequence_of_length(&mut bs, self.items.len(), DEMO_ITEMS_MAX)?;
        for &item in &self.items {
            bs.append_byte0(item)?;
        }
        match &self.selector {
            DemoChoice::Number(n) => {
                encode_choice_discriminant_per(&mut bs, 0, 2)?;
                encode_unconstrained_whole(&mut bs, *n)?;
            }
            DemoChoice::Text(text) => {
                encode_choice_discriminant_per(&mut bs, 1, 2)?;
                encode_octets_internal_determinant(&mut bs, text, DEMO_TEXT_MAX_BYTES)?;
            }
        }
        Ok(bs.length())
    }

    fn decode(buf: &[u8]) -> CodecResult<(Self, usize)> {
        let mut bs = BitStream::attach(buf);
        let id = decode_constrained_whole(&mut bs, -1000, 1000)?;
        let present = decode_presence_bitmap(&mut bs, 1)?;
        let label = if present[0] {
            Some(decode_octets_internal_determinant(&mut bs, DEMO_LABEL_MAX_BYTES)?)
        } else {
            None
        };
        let len = decode_sequence_of_length(&mut bs, DEMO_ITEMS_MAX)?;
        let mut items = Vec::with_capacity(len);
        for _ in 0..len {
            items.push(bs.read_byte()?);
        }
        let tag = decode_choice_discriminant_per(&mut bs, 2)?;
        let selector = match tag {
            0 => DemoChoice::Number(decode_unconstrained_whole(&mut bs)?),
            _ => DemoChoice::Text(decode_octets_internal_determinant(&mut bs, DEMO_TEXT_MAX_BYTES)?),
        };
        Ok((
            DemoRecord {
                id,
                label,
                items,
                selector,
            },
            bs.length(),
        ))
    }
}

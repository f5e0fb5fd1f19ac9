//! OER front end: byte-aligned throughout, integers in fixed byte
//! widths chosen by the schema's declared range, and lengths framed
//! by the general length-of-length rule.

use crate::acn::{align_to_next_byte, ByteOrder};
use crate::bitstream::BitStream;
use crate::error::{CodecError, CodecResult};
use crate::strings::{decode_oer_length, encode_oer_length};

/// Picks the smallest OER byte width (1, 2, 4 or 8) that can hold an
/// unsigned value up to `max`.
pub fn byte_width_for_range(max: u64) -> usize {
    if max <= 0xFF {
        1
    } else if max <= 0xFFFF {
        2
    } else if max <= 0xFFFF_FFFF {
        4
    } else {
        8
    }
}

pub fn encode_unsigned(bs: &mut BitStream, v: u64, max: u64) -> CodecResult<()> {
    crate::acn::encode_pos_int_fixed_width(bs, v, byte_width_for_range(max), ByteOrder::Big)
}

pub fn decode_unsigned(bs: &mut BitStream, max: u64) -> CodecResult<u64> {
    crate::acn::decode_pos_int_fixed_width(bs, byte_width_for_range(max), ByteOrder::Big)
}

/// OER's byte-aligned sequence-of: a length determinant followed by
/// the elements, with an alignment boundary before and after.
pub fn encode_sequence_of_header(bs: &mut BitStream, len: usize) -> CodecResult<()> {
    align_to_next_byte(bs)?;
    encode_oer_length(bs, len as u64)
}

pub fn decode_sequence_of_header(bs: &mut BitStream, max: usize) -> CodecResult<usize> {
    align_to_next_byte(bs)?;
    let bit_offset = bs.bit_length();
    let len = decode_oer_length(bs)? as usize;
    if len > max {
        return Err(CodecError::BadLength {
            bit_offset,
            length: len as u64,
            reason: format!("OER sequence-of length exceeds declared maximum {max}"),
        });
    }
    Ok(len)
}

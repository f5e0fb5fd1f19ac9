//! Unaligned PER front end: everything is bit-packed, there is no
//! implicit alignment, and length determinants use PER's
//! "normally small length" rule rather than OER's length-of-length.

use crate::bitstream::BitStream;
use crate::error::CodecResult;
use crate::integer::{
    decode_constrained_pos_whole, decode_constrained_whole, decode_semi_constrained_pos_whole,
    decode_unconstrained_whole, encode_constrained_pos_whole, encode_constrained_whole,
    encode_semi_constrained_pos_whole, encode_unconstrained_whole,
};

pub use crate::integer::{decode_semi_constrained_whole, encode_semi_constrained_whole};

/// PER's "normally small length" rule: lengths `0..=63` are a single
/// 7-bit field with a leading `0` bit; anything larger falls back to
/// a semi-constrained whole number with a leading `1` bit.
pub fn encode_normally_small_length(bs: &mut BitStream, len: u64) -> CodecResult<()> {
    if len < 64 {
        bs.append_bit(false)?;
        encode_constrained_pos_whole(bs, len, 63)
    } else {
        bs.append_bit(true)?;
        encode_semi_constrained_pos_whole(bs, len)
    }
}

pub fn decode_normally_small_length(bs: &mut BitStream) -> CodecResult<u64> {
    if bs.read_bit()? {
        decode_semi_constrained_pos_whole(bs)
    } else {
        decode_constrained_pos_whole(bs, 63)
    }
}

/// Re-exported so callers that only need the uPER front end do not
/// have to reach into `integer` directly for the whole-number family.
pub fn encode_whole_number(bs: &mut BitStream, v: i64, min: i64, max: Option<i64>) -> CodecResult<()> {
    match max {
        Some(max) => encode_constrained_whole(bs, v, min, max),
        None => encode_unconstrained_whole(bs, v),
    }
}

pub fn decode_whole_number(bs: &mut BitStream, min: i64, max: Option<i64>) -> CodecResult<i64> {
    match max {
        Some(max) => decode_constrained_whole(bs, min, max),
        None => decode_unconstrained_whole(bs),
    }
}

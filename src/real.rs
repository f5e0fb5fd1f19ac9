//! Floating-point codecs: direct IEEE-754 framing for ACN, and the
//! self-describing ASN.1 binary REAL format for PER/OER.

use crate::acn::ByteOrder;
use crate::bitstream::BitStream;
use crate::error::{CodecError, CodecResult};

pub fn encode_ieee754_32(bs: &mut BitStream, v: f32, order: ByteOrder) -> CodecResult<()> {
    let bytes = v.to_bits().to_be_bytes();
    write_bytes(bs, &bytes, order)
}

pub fn decode_ieee754_32(bs: &mut BitStream, order: ByteOrder) -> CodecResult<f32> {
    let mut bytes = [0u8; 4];
    read_bytes(bs, &mut bytes, order)?;
    Ok(f32::from_bits(u32::from_be_bytes(bytes)))
}

pub fn encode_ieee754_64(bs: &mut BitStream, v: f64, order: ByteOrder) -> CodecResult<()> {
    let bytes = v.to_bits().to_be_bytes();
    write_bytes(bs, &bytes, order)
}

pub fn decode_ieee754_64(bs: &mut BitStream, order: ByteOrder) -> CodecResult<f64> {
    let mut bytes = [0u8; 8];
    read_bytes(bs, &mut bytes, order)?;
    Ok(f64::from_bits(u64::from_be_bytes(bytes)))
}

fn write_bytes(bs: &mut BitStream, be_bytes: &[u8], order: ByteOrder) -> CodecResult<()> {
    match order {
        ByteOrder::Big => {
            for &b in be_bytes {
                bs.append_byte0(b)?;
            }
        }
        ByteOrder::Little => {
            for &b in be_bytes.iter().rev() {
                bs.append_byte0(b)?;
            }
        }
    }
    Ok(())
}

fn read_bytes(bs: &mut BitStream, dst: &mut [u8], order: ByteOrder) -> CodecResult<()> {
    match order {
        ByteOrder::Big => {
            for slot in dst.iter_mut() {
                *slot = bs.read_byte()?;
            }
        }
        ByteOrder::Little => {
            for i in (0..dst.len()).rev() {
                dst[i] = bs.read_byte()?;
            }
        }
    }
    Ok(())
}

/// Header byte layout for the binary REAL format: bit 8 marks binary
/// (vs. decimal) encoding, bit 7 is the sign, bits 6-5 the base, bits
/// 4-3 the scale factor, bits 2-1 the exponent length minus one. This
/// crate only produces base-2, scale-0 encodings; a base-8/16 or
/// nonzero-scale value is outside what it can interpret, so the
/// decoder rejects one rather than silently misreading the mantissa.
const REAL_HEADER_BINARY: u8 = 0x80;
const REAL_HEADER_NEGATIVE: u8 = 0x40;
const REAL_HEADER_BASE_MASK: u8 = 0x30;
const REAL_HEADER_SCALE_MASK: u8 = 0x0C;

pub fn encode_binary_real(bs: &mut BitStream, v: f64) -> CodecResult<()> {
    if v == 0.0 {
        bs.append_byte0(0)?;
        return Ok(());
    }
    if v.is_infinite() {
        bs.append_byte0(1)?;
        bs.append_byte0(if v > 0.0 { 0x40 } else { 0x41 })?;
        return Ok(());
    }
    if v.is_nan() {
        bs.append_byte0(1)?;
        bs.append_byte0(0x42)?;
        return Ok(());
    }

    let sign = v < 0.0;
    let mag = v.abs();
    let (mantissa, exponent) = normalize_mantissa_exponent(mag);

    let exp_bytes = minimal_signed_bytes(exponent);
    let mantissa_bytes = minimal_unsigned_bytes(mantissa);
    let length = 1 + exp_bytes.len() as u64 + mantissa_bytes.len() as u64;

    // length-of-length + length, matching OER's general length rule
    // for values that do not fit the short form.
    if length < 128 {
        bs.append_byte0(length as u8)?;
    } else {
        return Err(CodecError::BadLength {
            bit_offset: bs.bit_length(),
            length,
            reason: "binary REAL payload exceeds short-form length".into(),
        });
    }

    let mut header = REAL_HEADER_BINARY;
    if sign {
        header |= REAL_HEADER_NEGATIVE;
    }
    header |= (exp_bytes.len() as u8 - 1) & 0x03;
    bs.append_byte0(header)?;
    for b in &exp_bytes {
        bs.append_byte0(*b)?;
    }
    for b in &mantissa_bytes {
        bs.append_byte0(*b)?;
    }
    Ok(())
}

pub fn decode_binary_real(bs: &mut BitStream) -> CodecResult<f64> {
    let bit_offset = bs.bit_length();
    let length = bs.read_byte()? as usize;
    if length == 0 {
        return Ok(0.0);
    }
    if length == 1 {
        let header = bs.read_byte()?;
        return match header {
            0x40 => Ok(f64::INFINITY),
            0x41 => Ok(f64::NEG_INFINITY),
            0x42 => Ok(f64::NAN),
            _ => Err(CodecError::IncorrectStream {
                bit_offset,
                message: format!("unrecognized 1-byte REAL header {header:#04x}"),
            }),
        };
    }

    let header = bs.read_byte()?;
    if header & REAL_HEADER_BINARY == 0 {
        return Err(CodecError::IncorrectStream {
            bit_offset,
            message: "only the binary REAL encoding form is supported".into(),
        });
    }
    if header & REAL_HEADER_BASE_MASK != 0 || header & REAL_HEADER_SCALE_MASK != 0 {
        return Err(CodecError::IncorrectStream {
            bit_offset,
            message: format!(
                "unsupported REAL base/scale bits in header {header:#04x}; only base-2, scale-0 is supported"
            ),
        });
    }
    let sign = header & REAL_HEADER_NEGATIVE != 0;
    let exp_len = (header & 0x03) as usize + 1;
    if exp_len + 1 > length {
        return Err(CodecError::BadLength {
            bit_offset,
            length: length as u64,
            reason: "REAL exponent length exceeds declared payload".into(),
        });
    }

    let mut exp_bytes = vec![0u8; exp_len];
    for b in exp_bytes.iter_mut() {
        *b = bs.read_byte()?;
    }
    let exponent = sign_extend_bytes(&exp_bytes);

    let mantissa_len = length - 1 - exp_len;
    let mut mantissa: u64 = 0;
    for _ in 0..mantissa_len {
        mantissa = (mantissa << 8) | bs.read_byte()? as u64;
    }

    let mut mag = mantissa as f64 * 2f64.powi(exponent as i32);
    if sign {
        mag = -mag;
    }
    Ok(mag)
}

fn normalize_mantissa_exponent(mut mag: f64) -> (u64, i64) {
    let mut exponent: i64 = 0;
    // Scale the fractional value up into an integer mantissa by
    // shifting the binary point, mirroring `CalculateMantissaAndExponent`.
    while mag.fract() != 0.0 && mantissa_fits(mag) {
        mag *= 2.0;
        exponent -= 1;
    }
    while mag >= (1u64 << 53) as f64 {
        mag /= 2.0;
        exponent += 1;
    }
    (mag as u64, exponent)
}

fn mantissa_fits(mag: f64) -> bool {
    mag < (1u64 << 52) as f64
}

fn minimal_signed_bytes(v: i64) -> Vec<u8> {
    let bits = if v >= 0 {
        if v == 0 {
            0
        } else {
            64 - (v as u64).leading_zeros()
        }
    } else {
        let mag = (-(v + 1)) as u64;
        if mag == 0 {
            0
        } else {
            64 - mag.leading_zeros()
        }
    };
    let nbytes = (bits as usize / 8) + 1;
    (0..nbytes).rev().map(|i| (v >> (i * 8)) as u8).collect()
}

fn minimal_unsigned_bytes(v: u64) -> Vec<u8> {
    if v == 0 {
        return vec![0];
    }
    let nbytes = ((64 - v.leading_zeros()) as usize + 7) / 8;
    (0..nbytes).rev().map(|i| (v >> (i * 8)) as u8).collect()
}

fn sign_extend_bytes(bytes: &[u8]) -> i64 {
    let mut v: i64 = if bytes[0] & 0x80 != 0 { -1 } else { 0 };
    for &b in bytes {
        v = (v << 8) | b as i64;
    }
    v
}

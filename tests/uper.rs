use asn1_codec_rt::bitstream::BitStream;
use asn1_codec_rt::composite::{
    decode_choice_discriminant_per, decode_enumerated, decode_sequence_of_length,
    encode_choice_discriminant_per, encode_enumerated, encode_sequence_of_length,
};
use asn1_codec_rt::integer::{
    decode_constrained_whole, decode_semi_constrained_whole, decode_unconstrained_whole,
    encode_constrained_whole, encode_semi_constrained_whole, encode_unconstrained_whole,
};
use asn1_codec_rt::per::{decode_normally_small_length, encode_normally_small_length};

/// A small record of mixed uPER fields: two constrained integers, a
/// semi-constrained one, an unconstrained one, a choice discriminant
/// and an enumerated value, all bit-packed with no byte alignment
/// between them.
#[test]
fn uper_mixed_record_round_trips_bit_packed() {
    let mut buf = [0u8; 16];
    {
        let mut bs = BitStream::init(&mut buf);
        encode_constrained_whole(&mut bs, -1, -4, 3).unwrap();
        encode_constrained_whole(&mut bs, -2, -4, 3).unwrap();
        encode_semi_constrained_whole(&mut bs, 70_000, 0).unwrap();
        encode_unconstrained_whole(&mut bs, -123_456).unwrap();
        encode_choice_discriminant_per(&mut bs, 1, 3).unwrap();
        encode_enumerated(&mut bs, 20, &[10, 20, 30]).unwrap();
    }

    let mut bs = BitStream::attach(&buf);
    assert_eq!(decode_constrained_whole(&mut bs, -4, 3).unwrap(), -1);
    assert_eq!(decode_constrained_whole(&mut bs, -4, 3).unwrap(), -2);
    assert_eq!(decode_semi_constrained_whole(&mut bs, 0).unwrap(), 70_000);
    assert_eq!(decode_unconstrained_whole(&mut bs).unwrap(), -123_456);
    assert_eq!(decode_choice_discriminant_per(&mut bs, 3).unwrap(), 1);
    assert_eq!(decode_enumerated(&mut bs, &[10, 20, 30]).unwrap(), 20);
}

#[test]
fn uper_sequence_of_length_round_trips() {
    let mut buf = [0u8; 1];
    {
        let mut bs = BitStream::init(&mut buf);
        encode_sequence_of_length(&mut bs, 11, 11).unwrap();
    }
    let mut bs = BitStream::attach(&buf);
    assert_eq!(decode_sequence_of_length(&mut bs, 11).unwrap(), 11);
}

#[test]
fn uper_normally_small_length_switches_encoding_at_64() {
    let mut small = [0u8; 1];
    {
        let mut bs = BitStream::init(&mut small);
        encode_normally_small_length(&mut bs, 11).unwrap();
    }
    let mut bs = BitStream::attach(&small);
    assert_eq!(decode_normally_small_length(&mut bs).unwrap(), 11);

    let mut large = [0u8; 9];
    {
        let mut bs = BitStream::init(&mut large);
        encode_normally_small_length(&mut bs, 200).unwrap();
    }
    let mut bs = BitStream::attach(&large);
    assert_eq!(decode_normally_small_length(&mut bs).unwrap(), 200);
}

/// Truncating the buffer by one byte must deterministically fail
/// rather than silently decode a short value.
#[test]
fn uper_truncated_buffer_fails_deterministically() {
    let mut buf = [0u8; 9];
    let written = {
        let mut bs = BitStream::init(&mut buf);
        encode_unconstrained_whole(&mut bs, 70_000).unwrap();
        bs.length()
    };
    let truncated = &buf[..written - 1];
    let mut bs = BitStream::attach(truncated);
    assert!(decode_unconstrained_whole(&mut bs).is_err());
}

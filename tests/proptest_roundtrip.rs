use asn1_codec_rt::acn::{
    decode_bcd_var_size, decode_pos_int_fixed_width, decode_twos_complement_var_size,
    encode_bcd_var_size, encode_pos_int_fixed_width, encode_twos_complement_var_size, ByteOrder,
};
use asn1_codec_rt::bitstream::BitStream;
use asn1_codec_rt::integer::{
    decode_constrained_whole, decode_semi_constrained_whole, decode_unconstrained_whole,
    encode_constrained_whole, encode_semi_constrained_whole, encode_unconstrained_whole,
};
use asn1_codec_rt::real::{decode_binary_real, encode_binary_real};
use proptest::prelude::*;

proptest! {
    #[test]
    fn constrained_whole_round_trips(v in -1000i64..=1000, min in -2000i64..=0, span in 0u32..20) {
        let max = min + span as i64 * 100;
        prop_assume!(v >= min && v <= max);
        let mut buf = [0u8; 8];
        {
            let mut bs = BitStream::init(&mut buf);
            encode_constrained_whole(&mut bs, v, min, max).unwrap();
        }
        let mut bs = BitStream::attach(&buf);
        prop_assert_eq!(decode_constrained_whole(&mut bs, min, max).unwrap(), v);
    }

    #[test]
    fn semi_constrained_whole_round_trips(offset in 0u64..10_000_000, min in -1000i64..1000) {
        let v = min + offset as i64;
        let mut buf = [0u8; 16];
        {
            let mut bs = BitStream::init(&mut buf);
            encode_semi_constrained_whole(&mut bs, v, min).unwrap();
        }
        let mut bs = BitStream::attach(&buf);
        prop_assert_eq!(decode_semi_constrained_whole(&mut bs, min).unwrap(), v);
    }

    #[test]
    fn unconstrained_whole_round_trips(v in any::<i64>()) {
        let mut buf = [0u8; 16];
        {
            let mut bs = BitStream::init(&mut buf);
            encode_unconstrained_whole(&mut bs, v).unwrap();
        }
        let mut bs = BitStream::attach(&buf);
        prop_assert_eq!(decode_unconstrained_whole(&mut bs).unwrap(), v);
    }

    #[test]
    fn acn_fixed_width_round_trips(v in any::<u32>(), big_endian in any::<bool>()) {
        let order = if big_endian { ByteOrder::Big } else { ByteOrder::Little };
        let mut buf = [0u8; 4];
        {
            let mut bs = BitStream::init(&mut buf);
            encode_pos_int_fixed_width(&mut bs, v as u64, 4, order).unwrap();
        }
        let mut bs = BitStream::attach(&buf);
        prop_assert_eq!(decode_pos_int_fixed_width(&mut bs, 4, order).unwrap(), v as u64);
    }

    #[test]
    fn acn_twos_complement_var_size_round_trips(v in any::<i64>()) {
        let mut buf = [0u8; 16];
        {
            let mut bs = BitStream::init(&mut buf);
            encode_twos_complement_var_size(&mut bs, v).unwrap();
        }
        let mut bs = BitStream::attach(&buf);
        prop_assert_eq!(decode_twos_complement_var_size(&mut bs).unwrap(), v);
    }

    #[test]
    fn acn_bcd_round_trips(v in 0u64..1_000_000_000) {
        let mut buf = [0u8; 16];
        {
            let mut bs = BitStream::init(&mut buf);
            encode_bcd_var_size(&mut bs, v).unwrap();
        }
        let mut bs = BitStream::attach(&buf);
        prop_assert_eq!(decode_bcd_var_size(&mut bs).unwrap(), v);
    }

    #[test]
    fn binary_real_round_trips_finite_values(v in -1.0e6f64..1.0e6, exp in -10i32..10) {
        let scaled = v * 2f64.powi(exp);
        prop_assume!(scaled.is_finite());
        let mut buf = [0u8; 32];
        {
            let mut bs = BitStream::init(&mut buf);
            encode_binary_real(&mut bs, scaled).unwrap();
        }
        let mut bs = BitStream::attach(&buf);
        let back = decode_binary_real(&mut bs).unwrap();
        // The mantissa/exponent normalization only guarantees an exact
        // round trip for values whose fractional part terminates within
        // 53 bits of scaling, so compare with a relative tolerance.
        if scaled == 0.0 {
            prop_assert_eq!(back, 0.0);
        } else {
            let rel_err = ((back - scaled) / scaled).abs();
            prop_assert!(rel_err < 1e-9, "scaled={scaled} back={back}");
        }
    }
}

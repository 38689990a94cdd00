use numstrconv::{float_to_string, format_f16, format_f64, format_u32};
use numstrconv::{format_u64, parse_f16, parse_f64, parse_float_bits};
use numstrconv::{parse_float_signed, parse_u32, parse_u64, parse_u8};
use numstrconv::{u64_to_string, ConvError, Cursor, Parsed};
use numstrconv::{FP16, FP32, FP64};

#[test]
fn test_radix_coverage() {
    let mut buf = [0u8; 16];
    let len = format_u64(255, &mut buf, 16, 0, true).unwrap();
    assert_eq!(&buf[..len + 1], b"0xff\0");
    assert_eq!(parse_u64(b"0xff"), Ok(Parsed { value: 255, end: 4 }));

    assert_eq!(u64_to_string(8, 8, 0, true).unwrap(), "010");
    assert_eq!(u64_to_string(0, 8, 0, true).unwrap(), "0");
    assert_eq!(parse_u64(b"010").unwrap().value, 8);
    assert_eq!(u64_to_string(5, 2, 0, true).unwrap(), "0b101");
    assert_eq!(parse_u64(b"0b101").unwrap().value, 5);
}

#[test]
fn test_overflow_detection() {
    assert_eq!(parse_u8(b"256"), Err(ConvError::OutOfRange));
    assert_eq!(parse_u8(b"255"), Ok(Parsed { value: 255, end: 3 }));
    assert_eq!(parse_u8(b"0x100"), Err(ConvError::OutOfRange));
    assert_eq!(parse_u32(b"4294967296"), Err(ConvError::OutOfRange));
    assert_eq!(
        parse_u64(b"18446744073709551615").unwrap().value,
        u64::MAX
    );
    assert_eq!(parse_u64(b"18446744073709551616"), Err(ConvError::OutOfRange));
}

#[test]
fn test_width_padding() {
    let mut buf = [0u8; 8];
    assert_eq!(format_u32(5, &mut buf, 10, 4, false), Ok(4));
    assert_eq!(&buf[..5], b"0005\0");
}

#[test]
fn test_buffer_boundary() {
    let mut buf = [0u8; 16];
    assert_eq!(
        format_u32(4294967295, &mut buf[..10], 10, 0, false),
        Err(ConvError::BufferTooSmall {
            required: 11,
            available: 10
        })
    );
    assert_eq!(format_u32(4294967295, &mut buf[..11], 10, 0, false), Ok(10));
    assert_eq!(&buf[..11], b"4294967295\0");
    assert_eq!(
        format_u32(1, &mut buf, 7, 0, false),
        Err(ConvError::InvalidRadix(7))
    );
}

#[test]
fn test_cursor_stops() {
    let input = b"123abc";
    assert_eq!(parse_u32(&input[..6]), Ok(Parsed { value: 123, end: 3 }));
    assert_eq!(parse_u32(&input[3..]), Err(ConvError::NoNumber));
    assert_eq!(parse_u32(&input[6..]), Err(ConvError::InvalidBounds));

    let mut cur = Cursor::new(b"1;2.5;0x10");
    assert_eq!(cur.next_u8(), Ok(1));
    cur.expect_byte(b';').unwrap();
    assert_eq!(cur.next_f64(), Ok(2.5));
    cur.expect_byte(b';').unwrap();
    assert_eq!(cur.next_u64(), Ok(16));
    assert!(cur.is_empty());
}

#[test]
fn test_special_floats() {
    let inf = parse_float_bits(b"0x1p1024", FP64).unwrap();
    assert_eq!(inf.value, f64::INFINITY.to_bits());
    assert_eq!(inf.end, 8);

    let mut buf = [0u8; 32];
    let len = format_f64(f64::INFINITY, &mut buf, false).unwrap();
    assert_eq!(&buf[..len], b"inf");
    let len = format_f64(-0.0, &mut buf, false).unwrap();
    assert_eq!(&buf[..len], b"-0");
    let len = format_f64(f64::NAN, &mut buf, true).unwrap();
    assert_eq!(&buf[..len], b"nan");

    assert_eq!(parse_f16(b"1e10").unwrap().value, 0x7c00);
    assert_eq!(parse_f64(b"1e-400").unwrap().value, 0.0);
}

#[test]
fn test_ties_to_even() {
    // Halfway between 2^53 and 2^53 + 2.
    let val = parse_f64(b"9007199254740993").unwrap().value;
    assert_eq!(val, 9007199254740992.0);
    // Halfway between 1 and 1 + 2^-23.
    let bits = parse_float_bits(b"1.00000005960464477539062500", FP32);
    assert_eq!(bits.unwrap().value, 1f32.to_bits() as u64);
    // Halfway between 1 and 1 + 2^-10.
    assert_eq!(parse_f16(b"1.00048828125").unwrap().value, 0x3c00);
    assert_eq!(parse_f16(b"1.00146484375").unwrap().value, 0x3c02);
}

#[test]
fn test_round_trip_all_widths() {
    let mut buf = [0u8; 32];
    for i in 0..2000u64 {
        // Scatter the encodings over the whole 64-bit range.
        let bits = i.wrapping_mul(0x9e37_79b9_7f4a_7c15);
        for (sem, bits) in [
            (FP16, bits & 0xffff),
            (FP32, bits & 0xffff_ffff),
            (FP64, bits),
        ] {
            for scientific in [false, true] {
                let text = float_to_string(bits, sem, scientific).unwrap();
                let parsed = parse_float_signed(text.as_bytes(), sem).unwrap();
                let is_nan = text == "nan";
                assert!(is_nan || parsed.value == bits, "{}", text);
                assert_eq!(parsed.end, text.len());
            }
        }
        let half = (bits & 0xffff) as u16;
        let len = format_f16(half, &mut buf, true).unwrap();
        assert_eq!(buf[len], 0);
    }
}

#[test]
fn test_shortest_digits() {
    // No shorter string identifies the value.
    for (val, text) in [
        (0.1, "0.1"),
        (1.0 / 3.0, "0.3333333333333333"),
        (2.0 / 3.0, "0.6666666666666666"),
        (100.0, "100"),
        (1e21, "1e+21"),
        (1.5e-7, "1.5e-07"),
        (123456.789, "123456.789"),
    ] {
        let bits = f64::to_bits(val);
        assert_eq!(float_to_string(bits, FP64, false).unwrap(), text);
    }
}

//! This module contains the parsing and formatting of unsigned integers.
//!
//! Parsers accept C-style literals: a `0x`/`0X` prefix selects hexadecimal,
//! `0b`/`0B` selects binary, a leading `0` followed by more digits selects
//! octal, and anything else is decimal. They never consult the locale.

extern crate alloc;

use alloc::string::String;
use alloc::vec::Vec;

use super::error::{ConvError, ConvResult};
use super::utils::checked_mul_add;

/// A parsed value and the offset one past the last consumed byte.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Parsed<T> {
    pub value: T,
    pub end: usize,
}

impl<T> Parsed<T> {
    /// Convert the value, keeping the stop offset.
    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Parsed<U> {
        Parsed {
            value: f(self.value),
            end: self.end,
        }
    }
}

/// Returns the value of the digit `c` in base `radix`, if it is one.
fn digit_value(c: u8, radix: u64) -> Option<u64> {
    let d = u64::from(match c {
        b'0'..=b'9' => c - b'0',
        b'a'..=b'f' => c - b'a' + 10,
        b'A'..=b'F' => c - b'A' + 10,
        _ => return None,
    });
    if d < radix {
        Some(d)
    } else {
        None
    }
}

/// Figure out the radix of the literal, and where its digits start.
fn detect_radix(input: &[u8]) -> (u64, usize) {
    if input[0] != b'0' {
        return (10, 0);
    }
    match input.get(1).copied() {
        Some(b'x' | b'X') => (16, 2),
        Some(b'b' | b'B') => (2, 2),
        // The leading zero is itself an octal digit.
        Some(c) if c.is_ascii_digit() => (8, 0),
        _ => (10, 0),
    }
}

/// Accumulate the digits of `input` starting at `start`, and fail if the
/// value does not fit in `bits` bits.
fn accumulate(
    input: &[u8],
    start: usize,
    radix: u64,
    bits: u32,
) -> ConvResult<Parsed<u64>> {
    let mut value: u64 = 0;
    let mut pos = start;
    while let Some(d) = input.get(pos).and_then(|c| digit_value(*c, radix)) {
        value = checked_mul_add(value, radix, d, bits)
            .ok_or(ConvError::OutOfRange)?;
        pos += 1;
    }
    if pos == start {
        return Err(ConvError::NoNumber);
    }
    Ok(Parsed { value, end: pos })
}

/// Parse a C-style unsigned integer that must fit in `bits` bits (8, 16, 32
/// or 64). The length of `input` is the parsing bound; a NUL byte also ends
/// the literal.
pub fn parse_int_bits(input: &[u8], bits: u32) -> ConvResult<Parsed<u64>> {
    if input.is_empty() {
        return Err(ConvError::InvalidBounds);
    }
    let (radix, start) = detect_radix(input);
    accumulate(input, start, radix, bits)
}

/// Parse an 8-bit unsigned integer in C-style notation.
pub fn parse_u8(input: &[u8]) -> ConvResult<Parsed<u8>> {
    Ok(parse_int_bits(input, u8::BITS)?.map(|v| v as u8))
}

/// Parse a 16-bit unsigned integer in C-style notation.
pub fn parse_u16(input: &[u8]) -> ConvResult<Parsed<u16>> {
    Ok(parse_int_bits(input, u16::BITS)?.map(|v| v as u16))
}

/// Parse a 32-bit unsigned integer in C-style notation.
pub fn parse_u32(input: &[u8]) -> ConvResult<Parsed<u32>> {
    Ok(parse_int_bits(input, u32::BITS)?.map(|v| v as u32))
}

/// Parse a 64-bit unsigned integer in C-style notation.
pub fn parse_u64(input: &[u8]) -> ConvResult<Parsed<u64>> {
    parse_int_bits(input, u64::BITS)
}

/// Parse a 32-bit unsigned integer written in plain decimal. Prefixes are
/// not recognized: "0x10" parses as 0 and stops at the 'x'.
pub fn parse_decimal_u32(input: &[u8]) -> ConvResult<Parsed<u32>> {
    if input.is_empty() {
        return Err(ConvError::InvalidBounds);
    }
    Ok(accumulate(input, 0, 10, u32::BITS)?.map(|v| v as u32))
}

/// Returns the prefix that marks numbers of the base `radix`.
fn radix_prefix(radix: u32) -> &'static [u8] {
    match radix {
        2 => b"0b",
        8 => b"0",
        16 => b"0x",
        _ => b"",
    }
}

/// Format `value` in base `radix` (2, 8, 10 or 16) into `buf`, followed by a
/// NUL terminator. The digits are padded with zeros to at least `width`
/// digits, and `prefix` adds the C-style radix marker. Like C's `%#o`, the
/// octal marker is left out when the digits already start with a zero, so
/// zero prints as `0`. The length of `buf`
/// is the capacity, terminator included. Returns the number of bytes written
/// before the terminator. Nothing is written when the call fails.
pub fn format_u64(
    value: u64,
    buf: &mut [u8],
    radix: u32,
    width: usize,
    prefix: bool,
) -> ConvResult<usize> {
    if !matches!(radix, 2 | 8 | 10 | 16) {
        return Err(ConvError::InvalidRadix(radix));
    }
    const DIGITS: &[u8] = b"0123456789abcdef";

    // Extract the digits: Div-Mod-Div-Mod ... (least significant first).
    let mut digits = [0u8; u64::BITS as usize];
    let mut count = 0;
    let mut val = value;
    loop {
        digits[count] = DIGITS[(val % radix as u64) as usize];
        count += 1;
        val /= radix as u64;
        if val == 0 {
            break;
        }
    }

    let leading_zero = value == 0 || width > count;
    let prefix: &[u8] = match prefix {
        true if radix == 8 && leading_zero => b"",
        true => radix_prefix(radix),
        false => b"",
    };
    let padded = count.max(width);
    let required = prefix
        .len()
        .checked_add(padded)
        .and_then(|n| n.checked_add(1))
        .ok_or(ConvError::BufferTooSmall {
            required: usize::MAX,
            available: buf.len(),
        })?;
    if required > buf.len() {
        return Err(ConvError::BufferTooSmall {
            required,
            available: buf.len(),
        });
    }

    let (head, rest) = buf.split_at_mut(prefix.len());
    head.copy_from_slice(prefix);
    let (zeros, rest) = rest.split_at_mut(padded - count);
    zeros.fill(b'0');
    for (dst, src) in rest.iter_mut().zip(digits[..count].iter().rev()) {
        *dst = *src;
    }
    rest[count] = 0;
    Ok(required - 1)
}

/// Format a 32-bit unsigned integer. See [`format_u64`].
pub fn format_u32(
    value: u32,
    buf: &mut [u8],
    radix: u32,
    width: usize,
    prefix: bool,
) -> ConvResult<usize> {
    format_u64(value as u64, buf, radix, width, prefix)
}

/// Format `value` into a new string. See [`format_u64`].
pub fn u64_to_string(
    value: u64,
    radix: u32,
    width: usize,
    prefix: bool,
) -> ConvResult<String> {
    // Binary digits of u64::MAX, a two byte prefix and the terminator.
    let cap = width.max(u64::BITS as usize).checked_add(3).ok_or(
        ConvError::BufferTooSmall {
            required: usize::MAX,
            available: 0,
        },
    )?;
    let mut buf = Vec::new();
    buf.try_reserve_exact(cap)
        .map_err(|_| ConvError::BufferTooSmall {
            required: cap,
            available: 0,
        })?;
    buf.resize(cap, 0u8);
    let len = format_u64(value, &mut buf, radix, width, prefix)?;
    Ok(buf[..len].iter().map(|c| *c as char).collect())
}

#[cfg(test)]
fn format_to_string(
    value: u64,
    cap: usize,
    radix: u32,
    width: usize,
    prefix: bool,
) -> String {
    let mut buf = [0xffu8; 80];
    let len = format_u64(value, &mut buf[..cap], radix, width, prefix).unwrap();
    assert_eq!(buf[len], 0, "missing terminator");
    buf[..len].iter().map(|c| *c as char).collect()
}

#[test]
fn test_detect_radix() {
    assert_eq!(parse_u32(b"0x1F").unwrap(), Parsed { value: 31, end: 4 });
    assert_eq!(parse_u32(b"0XfF").unwrap(), Parsed { value: 255, end: 4 });
    assert_eq!(parse_u32(b"0b1011").unwrap(), Parsed { value: 11, end: 6 });
    assert_eq!(parse_u32(b"017").unwrap(), Parsed { value: 15, end: 3 });
    assert_eq!(parse_u32(b"0").unwrap(), Parsed { value: 0, end: 1 });
    assert_eq!(parse_u32(b"0,").unwrap(), Parsed { value: 0, end: 1 });
    assert_eq!(parse_u32(b"1234").unwrap(), Parsed { value: 1234, end: 4 });
    // '9' is not an octal digit.
    assert_eq!(parse_u32(b"09").unwrap(), Parsed { value: 0, end: 1 });
    assert_eq!(parse_u32(b"0b102").unwrap(), Parsed { value: 2, end: 4 });
}

#[test]
fn test_parse_stops() {
    assert_eq!(parse_u32(b"123abc").unwrap(), Parsed { value: 123, end: 3 });
    assert_eq!(parse_u32(b"0xffg").unwrap(), Parsed { value: 255, end: 4 });
    assert_eq!(parse_u32(b"42\0 17").unwrap(), Parsed { value: 42, end: 2 });
    // The slice length is the bound.
    assert_eq!(parse_u32(&b"123456"[..2]).unwrap(), Parsed { value: 12, end: 2 });
}

#[test]
fn test_parse_errors() {
    assert_eq!(parse_u32(b""), Err(ConvError::InvalidBounds));
    assert_eq!(parse_u32(b"abc"), Err(ConvError::NoNumber));
    assert_eq!(parse_u32(b"-1"), Err(ConvError::NoNumber));
    assert_eq!(parse_u32(b"0x"), Err(ConvError::NoNumber));
    assert_eq!(parse_u32(b"0xg"), Err(ConvError::NoNumber));
    assert_eq!(parse_u32(b"0b"), Err(ConvError::NoNumber));
    assert_eq!(parse_u32(b"0b2"), Err(ConvError::NoNumber));
    assert_eq!(parse_decimal_u32(b""), Err(ConvError::InvalidBounds));
}

#[test]
fn test_parse_ranges() {
    assert_eq!(parse_u8(b"255").unwrap().value, 255);
    assert_eq!(parse_u8(b"256"), Err(ConvError::OutOfRange));
    assert_eq!(parse_u8(b"0xff").unwrap().value, 255);
    assert_eq!(parse_u8(b"0x100"), Err(ConvError::OutOfRange));
    assert_eq!(parse_u8(b"0377").unwrap().value, 255);
    assert_eq!(parse_u8(b"0400"), Err(ConvError::OutOfRange));
    assert_eq!(parse_u16(b"65535").unwrap().value, 65535);
    assert_eq!(parse_u16(b"65536"), Err(ConvError::OutOfRange));
    assert_eq!(parse_u32(b"4294967295").unwrap().value, u32::MAX);
    assert_eq!(parse_u32(b"4294967296"), Err(ConvError::OutOfRange));
    assert_eq!(
        parse_u64(b"18446744073709551615").unwrap().value,
        u64::MAX
    );
    assert_eq!(parse_u64(b"18446744073709551616"), Err(ConvError::OutOfRange));
    assert_eq!(
        parse_u64(b"0xffffffffffffffff").unwrap().value,
        u64::MAX
    );
    assert_eq!(parse_u64(b"0x10000000000000000"), Err(ConvError::OutOfRange));
    // Leading zeros don't count towards the range.
    assert_eq!(parse_u8(b"0x00000ff").unwrap().value, 255);
}

#[test]
fn test_parse_decimal_only() {
    assert_eq!(
        parse_decimal_u32(b"0x10").unwrap(),
        Parsed { value: 0, end: 1 }
    );
    assert_eq!(
        parse_decimal_u32(b"0755").unwrap(),
        Parsed { value: 755, end: 4 }
    );
    assert_eq!(parse_decimal_u32(b"4294967296"), Err(ConvError::OutOfRange));
}

#[test]
fn test_format_radix() {
    assert_eq!(format_to_string(255, 32, 16, 0, true), "0xff");
    assert_eq!(format_to_string(255, 32, 16, 0, false), "ff");
    assert_eq!(format_to_string(255, 32, 8, 0, true), "0377");
    assert_eq!(format_to_string(8, 32, 8, 0, true), "010");
    assert_eq!(format_to_string(5, 32, 2, 0, true), "0b101");
    assert_eq!(format_to_string(0, 32, 10, 0, true), "0");
    assert_eq!(format_to_string(0, 32, 16, 0, true), "0x0");
    assert_eq!(
        format_to_string(u64::MAX, 80, 2, 0, false).len(),
        64
    );
    assert_eq!(
        format_to_string(u64::MAX, 32, 10, 0, false),
        "18446744073709551615"
    );
    assert_eq!(
        format_to_string(0xdeadbeef, 32, 16, 0, true),
        "0xdeadbeef"
    );
}

#[test]
fn test_format_width() {
    assert_eq!(format_to_string(5, 32, 10, 4, false), "0005");
    assert_eq!(format_to_string(5, 32, 16, 4, true), "0x0005");
    assert_eq!(format_to_string(12345, 32, 10, 3, false), "12345");
    assert_eq!(format_to_string(12345, 32, 10, 5, false), "12345");
}

#[test]
fn test_format_octal_zero() {
    // One leading zero marks an octal literal.
    assert_eq!(format_to_string(0, 32, 8, 0, true), "0");
    assert_eq!(format_to_string(0, 32, 8, 0, false), "0");
    assert_eq!(format_to_string(0, 32, 8, 3, true), "000");
    assert_eq!(format_to_string(5, 32, 8, 4, true), "0005");
    assert_eq!(format_to_string(5, 32, 8, 1, true), "05");
    assert_eq!(parse_u64(b"0005").unwrap(), Parsed { value: 5, end: 4 });
    let mut buf = [0u8; 1];
    assert_eq!(
        format_u64(0, &mut buf, 8, 0, true),
        Err(ConvError::BufferTooSmall {
            required: 2,
            available: 1
        })
    );
}

#[test]
fn test_format_huge_width() {
    let mut buf = [0xaau8; 16];
    assert_eq!(
        format_u64(5, &mut buf, 16, usize::MAX, true),
        Err(ConvError::BufferTooSmall {
            required: usize::MAX,
            available: 16
        })
    );
    assert_eq!(
        format_u32(5, &mut buf, 10, usize::MAX, false),
        Err(ConvError::BufferTooSmall {
            required: usize::MAX,
            available: 16
        })
    );
    assert!(buf.iter().all(|c| *c == 0xaa));

    assert!(matches!(
        u64_to_string(5, 10, usize::MAX, false),
        Err(ConvError::BufferTooSmall { .. })
    ));
    assert!(matches!(
        u64_to_string(5, 10, usize::MAX - 1, false),
        Err(ConvError::BufferTooSmall { .. })
    ));
    // Too large to allocate.
    assert!(matches!(
        u64_to_string(5, 10, usize::MAX / 2, false),
        Err(ConvError::BufferTooSmall { .. })
    ));
}

#[test]
fn test_format_errors() {
    let mut buf = [0xaau8; 16];
    assert_eq!(
        format_u32(1, &mut buf, 3, 0, false),
        Err(ConvError::InvalidRadix(3))
    );
    assert_eq!(
        format_u32(u32::MAX, &mut buf[..10], 10, 0, true),
        Err(ConvError::BufferTooSmall {
            required: 11,
            available: 10
        })
    );
    // Nothing was written.
    assert!(buf.iter().all(|c| *c == 0xaa));
    assert_eq!(format_u32(u32::MAX, &mut buf[..11], 10, 0, true), Ok(10));
    assert_eq!(&buf[..11], b"4294967295\0");
    assert_eq!(
        format_u32(0xff, &mut buf[..4], 16, 0, true),
        Err(ConvError::BufferTooSmall {
            required: 5,
            available: 4
        })
    );
    assert_eq!(
        format_u32(0, &mut [], 10, 0, false),
        Err(ConvError::BufferTooSmall {
            required: 2,
            available: 0
        })
    );
}

#[test]
fn test_format_parse_round_trip() {
    use super::utils::Lfsr;

    let mut lfsr = Lfsr::new();
    let mut buf = [0u8; 80];
    for _ in 0..1000 {
        let v = lfsr.get64() >> (lfsr.get() % 64);
        for radix in [2, 8, 10, 16] {
            let len = format_u64(v, &mut buf, radix, 0, true).unwrap();
            assert_eq!(parse_u64(&buf[..len]).unwrap(), Parsed { value: v, end: len });
        }
    }
}

#[test]
fn test_u64_to_string() {
    assert_eq!(u64_to_string(255, 16, 0, true).unwrap(), "0xff");
    assert_eq!(u64_to_string(7, 10, 3, false).unwrap(), "007");
    let wide = u64_to_string(7, 2, 70, true).unwrap();
    assert_eq!(wide.len(), 72);
    assert!(wide.starts_with("0b000"));
    assert!(wide.ends_with("111"));
    assert_eq!(u64_to_string(7, 7, 0, true), Err(ConvError::InvalidRadix(7)));
}

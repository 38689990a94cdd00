//! This module contains the conversion of IEEE-754 encodings into decimal
//! strings. The digits are the shortest ones that parse back to the same
//! encoding, computed exactly with big integers.

extern crate alloc;

use super::bigint::{BigInt, LossFraction};
use super::error::{ConvError, ConvResult};
use super::float::{Category, FloatBits, Semantics};
use super::float::{FP16, FP32, FP64};
use super::integer::format_u64;
use super::utils::clz64;
use alloc::string::String;
use core::fmt::Display;

/// Room for the longest text we produce: a double in scientific form needs
/// a sign, 17 digits, a point and a five character exponent.
const MAX_TEXT: usize = 32;

/// A double never needs more than 17 significant digits.
const MAX_DIGITS: usize = 20;

/// Positional notation is used for decimal exponents in this range.
const MIN_POSITIONAL_EXP: i64 = -4;
const MAX_POSITIONAL_EXP: i64 = 16;

/// A small stack buffer that holds the text before it is copied out.
struct TextBuffer {
    bytes: [u8; MAX_TEXT],
    len: usize,
}

impl TextBuffer {
    fn new() -> Self {
        TextBuffer {
            bytes: [0; MAX_TEXT],
            len: 0,
        }
    }

    fn push(&mut self, c: u8) {
        debug_assert!(self.len < MAX_TEXT);
        self.bytes[self.len] = c;
        self.len += 1;
    }

    fn extend(&mut self, text: &[u8]) {
        for c in text {
            self.push(*c);
        }
    }

    fn as_bytes(&self) -> &[u8] {
        &self.bytes[..self.len]
    }
}

/// The shortest decimal digits of a finite non-zero value, which equals
/// `0.d1d2...dn * 10^exp`. The digits are stored as ASCII characters.
struct ShortestDigits {
    digits: [u8; MAX_DIGITS],
    len: usize,
    exp: i64,
}

impl ShortestDigits {
    fn push(&mut self, d: u8) {
        debug_assert!(d < 10 && self.len < MAX_DIGITS);
        self.digits[self.len] = b'0' + d;
        self.len += 1;
    }

    fn as_bytes(&self) -> &[u8] {
        &self.digits[..self.len]
    }

    /// Returns the exponent of the first digit in scientific notation.
    fn sci_exp(&self) -> i64 {
        self.exp - 1
    }
}

/// Returns true if `r + mp` reaches the upper end `s` of the rounding
/// interval. The end belongs to the interval when the significand is even.
fn reaches_high(r: &BigInt, mp: &BigInt, s: &BigInt, even: bool) -> bool {
    let mut sum = *r;
    sum.inplace_add(mp);
    if even {
        sum >= *s
    } else {
        sum > *s
    }
}

/// Compute the shortest digits that identify the finite non-zero value
/// `val`. See "Printing Floating-Point Numbers Quickly and Accurately" by
/// Burger and Dybvig, and "How to Print Floating-Point Numbers Accurately"
/// by Steele and White.
fn shortest_digits(val: &FloatBits) -> ShortestDigits {
    let sem = val.get_semantics();
    let (f, e) = val.get_significand();
    debug_assert!(f != 0);
    let even = f & 1 == 0;

    // The value is r/s. The rounding interval is (r - mm, r + mp) / s. At a
    // power of two the gap to the number below is half the gap above.
    let power_of_two = f == 1 << (sem.get_precision() - 1);
    let asym = (power_of_two && val.get_biased_exp() > 1) as usize;
    let e_pos = e.max(0) as usize;
    let e_neg = (-e).max(0) as usize;

    let mut r = BigInt::from_u64(f);
    r.shift_left(e_pos + 1 + asym);
    let mut s = BigInt::from_u64(1);
    s.shift_left(e_neg + 1 + asym);
    let mut mp = BigInt::from_u64(1);
    mp.shift_left(e_pos + asym);
    let mut mm = BigInt::from_u64(1);
    mm.shift_left(e_pos);

    // Estimate k = ceil(log10(value)) from the binary exponent of the msb.
    // 78913 / 2^18 is slightly below log10(2).
    let msb_exp = e + (u64::BITS - clz64(f)) as i64 - 1;
    let mut k = ((msb_exp * 78913) >> 18) + 1;
    if k >= 0 {
        s.mul_pow10(k as u32);
    } else {
        let scale = (-k) as u32;
        r.mul_pow10(scale);
        mp.mul_pow10(scale);
        mm.mul_pow10(scale);
    }

    // Fix the estimate so that the upper end of the interval is in
    // [10^(k-1), 10^k).
    while reaches_high(&r, &mp, &s, even) {
        s.mul_small(10);
        k += 1;
    }
    loop {
        let mut r10 = r;
        r10.mul_small(10);
        let mut mp10 = mp;
        mp10.mul_small(10);
        if reaches_high(&r10, &mp10, &s, even) {
            break;
        }
        r = r10;
        mp = mp10;
        mm.mul_small(10);
        k -= 1;
    }

    let mut out = ShortestDigits {
        digits: [0; MAX_DIGITS],
        len: 0,
        exp: k,
    };

    // Generate digits until the prefix identifies the value.
    loop {
        r.mul_small(10);
        mp.mul_small(10);
        mm.mul_small(10);
        let d = r.inplace_div_bounded(&s, 4) as u8;
        let low = if even { r <= mm } else { r < mm };
        let high = reaches_high(&r, &mp, &s, even);
        let last = match (low, high) {
            (false, false) => {
                out.push(d);
                continue;
            }
            (true, false) => d,
            (false, true) => d + 1,
            // Both candidates identify the value. Pick the closer one.
            (true, true) => match r.loss_against(&s) {
                LossFraction::ExactlyZero | LossFraction::LessThanHalf => d,
                LossFraction::MoreThanHalf => d + 1,
                LossFraction::ExactlyHalf => d + (d & 1),
            },
        };
        out.push(last);
        return out;
    }
}

/// Append `e`, the sign and at least two digits of the exponent `exp`.
fn write_exponent(text: &mut TextBuffer, exp: i64) -> ConvResult<()> {
    text.push(b'e');
    text.push(if exp < 0 { b'-' } else { b'+' });
    let mut digits = [0u8; 8];
    let len = format_u64(exp.unsigned_abs(), &mut digits, 10, 2, false)?;
    text.extend(&digits[..len]);
    Ok(())
}

fn write_scientific(
    text: &mut TextBuffer,
    val: &ShortestDigits,
) -> ConvResult<()> {
    let digits = val.as_bytes();
    text.push(digits[0]);
    if digits.len() > 1 {
        text.push(b'.');
        text.extend(&digits[1..]);
    }
    write_exponent(text, val.sci_exp())
}

fn write_positional(text: &mut TextBuffer, val: &ShortestDigits) {
    let digits = val.as_bytes();
    let x = val.sci_exp();
    if x < 0 {
        text.extend(b"0.");
        for _ in 0..(-x - 1) {
            text.push(b'0');
        }
        text.extend(digits);
        return;
    }

    // Pad the integral part with zeros when the digits run out.
    let int_len = x as usize + 1;
    for i in 0..int_len {
        text.push(digits.get(i).copied().unwrap_or(b'0'));
    }
    if digits.len() > int_len {
        text.push(b'.');
        text.extend(&digits[int_len..]);
    }
}

/// Render the encoding `bits` into a stack buffer.
fn render(
    bits: u64,
    sem: Semantics,
    scientific: bool,
) -> ConvResult<TextBuffer> {
    let val = FloatBits::decode(bits, sem);
    let category = val.get_category();
    let mut text = TextBuffer::new();

    if val.get_sign() && category != Category::NaN {
        text.push(b'-');
    }

    match category {
        Category::NaN => text.extend(b"nan"),
        Category::Infinity => text.extend(b"inf"),
        Category::Zero => {
            text.push(b'0');
            if scientific {
                write_exponent(&mut text, 0)?;
            }
        }
        Category::Normal => {
            let digits = shortest_digits(&val);
            let x = digits.sci_exp();
            let positional = (MIN_POSITIONAL_EXP..MAX_POSITIONAL_EXP).contains(&x);
            if scientific || !positional {
                write_scientific(&mut text, &digits)?;
            } else {
                write_positional(&mut text, &digits);
            }
        }
    }
    Ok(text)
}

/// Format the encoding `bits` of a float with semantics `sem` into `buf`,
/// followed by a NUL terminator. Returns the length of the text, without
/// the terminator. The digits are the shortest ones that parse back to
/// `bits`. The scientific style prints `d.ddde+XX`; the human style prints
/// positional notation (`0.001`, `256`, `1.5`) for values from 1e-4 up to
/// 1e16 and falls back to the scientific style outside of that range.
/// Infinities print as `inf` and `-inf`, and every NaN prints as `nan`.
/// If the text does not fit then nothing is written.
pub fn format_float_bits(
    bits: u64,
    sem: Semantics,
    buf: &mut [u8],
    scientific: bool,
) -> ConvResult<usize> {
    let text = render(bits, sem, scientific)?;
    let required = text.len + 1;
    if required > buf.len() {
        return Err(ConvError::BufferTooSmall {
            required,
            available: buf.len(),
        });
    }
    buf[..text.len].copy_from_slice(text.as_bytes());
    buf[text.len] = 0;
    Ok(text.len)
}

/// Format a half-precision float given by its encoding.
pub fn format_f16(
    bits: u16,
    buf: &mut [u8],
    scientific: bool,
) -> ConvResult<usize> {
    format_float_bits(bits as u64, FP16, buf, scientific)
}

/// Format a single-precision float.
pub fn format_f32(
    val: f32,
    buf: &mut [u8],
    scientific: bool,
) -> ConvResult<usize> {
    format_float_bits(val.to_bits() as u64, FP32, buf, scientific)
}

/// Format a double-precision float.
pub fn format_f64(
    val: f64,
    buf: &mut [u8],
    scientific: bool,
) -> ConvResult<usize> {
    format_float_bits(val.to_bits(), FP64, buf, scientific)
}

/// Format the encoding `bits` into a new string.
pub fn float_to_string(
    bits: u64,
    sem: Semantics,
    scientific: bool,
) -> ConvResult<String> {
    let text = render(bits, sem, scientific)?;
    Ok(text.as_bytes().iter().map(|c| *c as char).collect())
}

impl Display for FloatBits {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let text = render(self.encode(), self.get_semantics(), false)
            .map_err(|_| core::fmt::Error)?;
        let text = core::str::from_utf8(text.as_bytes())
            .map_err(|_| core::fmt::Error)?;
        f.write_str(text)
    }
}

#[cfg(test)]
fn f64_str(val: f64, scientific: bool) -> String {
    float_to_string(val.to_bits(), FP64, scientific).unwrap()
}

#[cfg(test)]
fn f16_str(bits: u16, scientific: bool) -> String {
    float_to_string(bits as u64, FP16, scientific).unwrap()
}

#[test]
fn test_format_specials() {
    assert_eq!(f64_str(f64::INFINITY, false), "inf");
    assert_eq!(f64_str(f64::NEG_INFINITY, true), "-inf");
    assert_eq!(f64_str(f64::NAN, false), "nan");
    assert_eq!(f64_str(-f64::NAN, true), "nan");
    assert_eq!(f64_str(0.0, false), "0");
    assert_eq!(f64_str(-0.0, false), "-0");
    assert_eq!(f64_str(0.0, true), "0e+00");
    assert_eq!(f64_str(-0.0, true), "-0e+00");
    assert_eq!(f16_str(0x7c00, false), "inf");
    assert_eq!(f16_str(0xfc00, false), "-inf");
    assert_eq!(f16_str(0x7e01, false), "nan");
}

#[test]
fn test_format_human() {
    assert_eq!(f64_str(1.0, false), "1");
    assert_eq!(f64_str(-1.0, false), "-1");
    assert_eq!(f64_str(256.0, false), "256");
    assert_eq!(f64_str(0.5, false), "0.5");
    assert_eq!(f64_str(0.1, false), "0.1");
    assert_eq!(f64_str(0.3, false), "0.3");
    assert_eq!(f64_str(123.456, false), "123.456");
    assert_eq!(f64_str(-2.5, false), "-2.5");
    assert_eq!(f64_str(0.0001, false), "0.0001");
    assert_eq!(f64_str(0.00012, false), "0.00012");
    assert_eq!(f64_str(0.00001, false), "1e-05");
    assert_eq!(f64_str(1e15, false), "1000000000000000");
    assert_eq!(f64_str(1234567890123456.0, false), "1234567890123456");
    assert_eq!(f64_str(1e16, false), "1e+16");
    assert_eq!(f64_str(f64::MAX, false), "1.7976931348623157e+308");
    assert_eq!(f64_str(5e-324, false), "5e-324");
    assert_eq!(f16_str(0x3c00, false), "1");
    assert_eq!(f16_str(0x3800, false), "0.5");
    assert_eq!(f16_str(0x7bff, false), "65500");
    assert_eq!(f16_str(0x0001, false), "6e-08");
    let s = float_to_string(0.1f32.to_bits() as u64, FP32, false).unwrap();
    assert_eq!(s, "0.1");
    let s = float_to_string(16777216f32.to_bits() as u64, FP32, false);
    assert_eq!(s.unwrap(), "16777216");
}

#[test]
fn test_format_scientific() {
    assert_eq!(f64_str(1.0, true), "1e+00");
    assert_eq!(f64_str(1234.5, true), "1.2345e+03");
    assert_eq!(f64_str(0.001, true), "1e-03");
    assert_eq!(f64_str(-0.25, true), "-2.5e-01");
    assert_eq!(f64_str(1e100, true), "1e+100");
    assert_eq!(f64_str(f64::MIN_POSITIVE, true), "2.2250738585072014e-308");
    assert_eq!(f64_str(5e-324, true), "5e-324");
    assert_eq!(f16_str(0x3c00, true), "1e+00");
    assert_eq!(f16_str(0x7bff, true), "6.55e+04");
}

#[test]
fn test_format_display() {
    let val = FloatBits::decode(0.75f64.to_bits(), FP64);
    assert_eq!(format!("{}", val), "0.75");
    let val = FloatBits::decode(0xc000, FP16);
    assert_eq!(format!("{}", val), "-2");
    let val = FloatBits::decode(0xfc00, FP16);
    assert_eq!(format!("{}", val), "-inf");
    let val = FloatBits::decode(f32::NAN.to_bits() as u64, FP32);
    assert_eq!(format!("[{}]", val), "[nan]");
    let val = FloatBits::decode(1e300f64.to_bits(), FP64);
    assert_eq!(val.to_string(), "1e+300");
}

#[test]
fn test_format_buffer() {
    let mut buf = [0xaau8; 8];
    let res = format_f64(f64::NEG_INFINITY, &mut buf[..4], false);
    assert_eq!(
        res,
        Err(ConvError::BufferTooSmall {
            required: 5,
            available: 4
        })
    );
    assert_eq!(buf, [0xaa; 8]);
    assert_eq!(format_f64(f64::NEG_INFINITY, &mut buf[..5], false), Ok(4));
    assert_eq!(&buf[..5], b"-inf\0");
    assert_eq!(buf[5], 0xaa);

    let mut buf = [0u8; 32];
    assert_eq!(format_f32(1.5, &mut buf, true), Ok(7));
    assert_eq!(&buf[..8], b"1.5e+00\0");
    assert_eq!(format_f16(0x3e00, &mut buf, false), Ok(3));
    assert_eq!(&buf[..4], b"1.5\0");
    let res = format_f64(0.1, &mut [], true);
    assert_eq!(
        res,
        Err(ConvError::BufferTooSmall {
            required: 6,
            available: 0
        })
    );
}

#[test]
fn test_half_round_trip() {
    use super::parse::parse_float_signed;

    // Every half encoding survives printing and parsing in both styles.
    for bits in 0..=u16::MAX {
        let category = FloatBits::decode(bits as u64, FP16).get_category();
        if category == Category::NaN {
            continue;
        }
        for scientific in [false, true] {
            let s = f16_str(bits, scientific);
            let parsed = parse_float_signed(s.as_bytes(), FP16).unwrap();
            assert_eq!(parsed.value, bits as u64, "{}", s);
            assert_eq!(parsed.end, s.len());
        }
    }
}

/// Returns the number of significant digits in a scientific string.
#[cfg(test)]
fn count_digits(s: &str) -> usize {
    let mantissa = s.split('e').next().unwrap_or("");
    mantissa.bytes().filter(|c| c.is_ascii_digit()).count()
}

#[test]
fn test_random_round_trip() {
    use super::parse::parse_float_signed;
    use super::utils::Lfsr;

    let mut lfsr = Lfsr::new();
    for _ in 0..3000 {
        let val = f64::from_bits(lfsr.get64());
        if val.is_nan() {
            continue;
        }
        for scientific in [false, true] {
            let s = f64_str(val, scientific);
            let parsed = parse_float_signed(s.as_bytes(), FP64).unwrap();
            assert_eq!(parsed.value, val.to_bits(), "{}", s);
        }
        // The standard library also prints the shortest digits.
        let sci = f64_str(val, true);
        assert_eq!(count_digits(&sci), count_digits(&format!("{:e}", val)));
    }

    for _ in 0..3000 {
        let val = f32::from_bits(lfsr.get());
        if val.is_nan() {
            continue;
        }
        for scientific in [false, true] {
            let bits = val.to_bits() as u64;
            let s = float_to_string(bits, FP32, scientific).unwrap();
            let parsed = parse_float_signed(s.as_bytes(), FP32).unwrap();
            assert_eq!(parsed.value, bits, "{}", s);
        }
        let sci = float_to_string(val.to_bits() as u64, FP32, true).unwrap();
        assert_eq!(count_digits(&sci), count_digits(&format!("{:e}", val)));
    }
}

#[test]
fn test_powers_of_two_boundaries() {
    // At a power of two the interval below is narrower than the one above.
    for exp in -1074i64..1024 {
        let bits = if exp < -1022 {
            1u64 << (exp + 1074)
        } else {
            ((exp + 1023) as u64) << 52
        };
        let val = f64::from_bits(bits);
        let s = f64_str(val, true);
        assert_eq!(s.parse::<f64>().unwrap(), val, "{}", s);
        assert_eq!(count_digits(&s), count_digits(&format!("{:e}", val)));
    }
}

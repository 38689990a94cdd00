//! This module contains the conversion of decimal and hexadecimal float
//! literals into correctly rounded IEEE-754 encodings.
//!
//! Decimal literals are converted exactly: the digits and the decimal
//! exponent describe a rational number `num / den`, which is divided with
//! big integers to find the significand and the rounding fraction. No host
//! floating-point arithmetic is involved.

use super::bigint::BigInt;
use super::error::{ConvError, ConvResult};
use super::float::{round_significand, round_to_bits, Semantics};
use super::float::{FP16, FP32, FP64};
use super::integer::Parsed;

/// The number of significant decimal digits that we keep. A halfway point
/// between two doubles has at most 767 significant digits, so keeping more
/// than that, plus a sticky bit for the rest, decides every tie exactly.
const MAX_DIGITS: usize = 800;

/// Explicit exponents are clamped to this magnitude. Anything this large
/// overflows or underflows every supported format.
const MAX_EXPONENT: i64 = 1 << 20;

/// Numbers with a decimal exponent above this overflow every format.
const MAX_DECIMAL_EXP: i64 = 310;

/// Numbers with a decimal exponent below this underflow every format.
const MIN_DECIMAL_EXP: i64 = -330;

/// The significant digits of a decimal literal. The value is
/// `0.d1d2d3... * 10^(num_digits + exp10)`, or equivalently the integer made
/// of the digits times `10^exp10`.
struct DecimalDigits {
    digits: [u8; MAX_DIGITS],
    num_digits: usize,
    exp10: i64,
    // Some non-zero digits were dropped.
    sticky: bool,
}

impl DecimalDigits {
    fn new() -> Self {
        DecimalDigits {
            digits: [0; MAX_DIGITS],
            num_digits: 0,
            exp10: 0,
            sticky: false,
        }
    }

    /// Append a digit of the integral part.
    fn push_integral(&mut self, d: u8) {
        if self.num_digits == 0 && d == 0 {
            return;
        }
        if self.num_digits < MAX_DIGITS {
            self.digits[self.num_digits] = d;
            self.num_digits += 1;
        } else {
            self.exp10 += 1;
            self.sticky |= d != 0;
        }
    }

    /// Append a digit of the fractional part.
    fn push_fraction(&mut self, d: u8) {
        if self.num_digits == 0 && d == 0 {
            self.exp10 -= 1;
            return;
        }
        if self.num_digits < MAX_DIGITS {
            self.digits[self.num_digits] = d;
            self.num_digits += 1;
            self.exp10 -= 1;
        } else {
            self.sticky |= d != 0;
        }
    }

    /// Convert the digits into a big integer, 19 digits at a time.
    fn to_bigint(&self) -> BigInt {
        let mut num = BigInt::zero();
        for chunk in self.digits[..self.num_digits].chunks(19) {
            let mut word: u64 = 0;
            for d in chunk {
                word = word * 10 + *d as u64;
            }
            num.mul_pow10(chunk.len() as u32);
            num.add_small(word);
        }
        num
    }

    /// Round the exact value of the digits to the semantics `sem`.
    fn to_bits(&self, sem: Semantics) -> u64 {
        if self.num_digits == 0 {
            return 0;
        }
        // The value is in [10^(magnitude - 1), 10^magnitude).
        let magnitude = self.exp10 + self.num_digits as i64;
        if magnitude - 1 > MAX_DECIMAL_EXP {
            return sem.inf_bits();
        }
        if magnitude < MIN_DECIMAL_EXP {
            return 0;
        }

        let mut num = self.to_bigint();
        let den = if self.exp10 >= 0 {
            num.mul_pow10(self.exp10 as u32);
            BigInt::from_u64(1)
        } else {
            BigInt::pow10((-self.exp10) as u32)
        };
        round_ratio(sem, num, den, self.sticky)
    }
}

/// Round the positive rational `num / den` to the semantics `sem` using
/// round-to-nearest, ties-to-even.
fn round_ratio(sem: Semantics, num: BigInt, den: BigInt, sticky: bool) -> u64 {
    let p = sem.get_precision() as i64;
    let (emin, emax) = sem.get_exp_bounds();
    let mut num = num;
    let mut den = den;

    // Find e = floor(log2(num / den)). The bit lengths get us within one.
    let k = num.msb_index() as i64 - den.msb_index() as i64;
    let at_least_k = if k >= 0 {
        let mut scaled = den;
        scaled.shift_left(k as usize);
        num >= scaled
    } else {
        let mut scaled = num;
        scaled.shift_left((-k) as usize);
        scaled >= den
    };
    let e = if at_least_k { k } else { k - 1 };

    if e > emax {
        return sem.inf_bits();
    }
    // Below half of the smallest denormal.
    if e < emin - p {
        return 0;
    }

    // Compute q = floor(num / (den * 2^lsb)), which has at most p bits.
    let lsb = (e - (p - 1)).max(emin - (p - 1));
    if lsb >= 0 {
        den.shift_left(lsb as usize);
    } else {
        num.shift_left((-lsb) as usize);
    }
    let q = num.inplace_div_bounded(&den, p as usize);
    let loss = num.loss_against(&den).with_sticky(sticky);
    round_to_bits(sem, q, lsb, loss)
}

/// Parse an optionally signed decimal exponent starting at `start`. Returns
/// the exponent and the offset past its last digit, or None if there are no
/// digits.
fn parse_exponent(input: &[u8], start: usize) -> Option<(i64, usize)> {
    let mut pos = start;
    let negative = match input.get(pos) {
        Some(b'-') => {
            pos += 1;
            true
        }
        Some(b'+') => {
            pos += 1;
            false
        }
        _ => false,
    };
    let digits_start = pos;
    let mut value: i64 = 0;
    while let Some(c) = input.get(pos).filter(|c| c.is_ascii_digit()) {
        value = (value * 10 + (c - b'0') as i64).min(MAX_EXPONENT);
        pos += 1;
    }
    if pos == digits_start {
        return None;
    }
    Some((if negative { -value } else { value }, pos))
}

/// Match the special tokens "infinity", "inf" and "nan" (in any case).
fn parse_special(input: &[u8], sem: Semantics) -> Option<Parsed<u64>> {
    let starts_with = |token: &[u8]| {
        input.len() >= token.len()
            && input[..token.len()].eq_ignore_ascii_case(token)
    };
    if starts_with(b"infinity") {
        return Some(Parsed {
            value: sem.inf_bits(),
            end: 8,
        });
    }
    if starts_with(b"inf") {
        return Some(Parsed {
            value: sem.inf_bits(),
            end: 3,
        });
    }
    if starts_with(b"nan") {
        return Some(Parsed {
            value: sem.nan_bits(),
            end: 3,
        });
    }
    None
}

/// Parse the decimal form: digits, an optional fraction and an optional
/// `e`/`E` exponent. An exponent marker without digits is not consumed.
fn parse_decimal(input: &[u8], sem: Semantics) -> ConvResult<Parsed<u64>> {
    let mut lit = DecimalDigits::new();
    let mut pos = 0;
    let mut has_digits = false;

    while let Some(c) = input.get(pos).filter(|c| c.is_ascii_digit()) {
        lit.push_integral(c - b'0');
        has_digits = true;
        pos += 1;
    }
    if input.get(pos) == Some(&b'.') {
        pos += 1;
        while let Some(c) = input.get(pos).filter(|c| c.is_ascii_digit()) {
            lit.push_fraction(c - b'0');
            has_digits = true;
            pos += 1;
        }
    }
    if !has_digits {
        return Err(ConvError::NoNumber);
    }

    if matches!(input.get(pos), Some(b'e' | b'E')) {
        if let Some((exp, end)) = parse_exponent(input, pos + 1) {
            lit.exp10 += exp;
            pos = end;
        }
    }

    Ok(Parsed {
        value: lit.to_bits(sem),
        end: pos,
    })
}

/// Parse the binary form `0x<hex digits>[.<hex digits>]p<exponent>`. The
/// exponent is mandatory and counts powers of two.
fn parse_hex(input: &[u8], sem: Semantics) -> ConvResult<Parsed<u64>> {
    let mut sig: u64 = 0;
    let mut exp: i64 = 0;
    let mut sticky = false;
    let mut has_digits = false;
    let mut pos = 2;

    // Keep the first 60 significant bits; the rest only matter as a sticky
    // bit.
    let mut push = |d: u64, fraction: bool| {
        if sig >> 56 == 0 {
            sig = (sig << 4) | d;
            if fraction {
                exp -= 4;
            }
        } else {
            sticky |= d != 0;
            if !fraction {
                exp += 4;
            }
        }
    };

    let hex_digit = |c: &u8| (*c as char).to_digit(16).map(|d| d as u64);
    while let Some(d) = input.get(pos).and_then(hex_digit) {
        push(d, false);
        has_digits = true;
        pos += 1;
    }
    if input.get(pos) == Some(&b'.') {
        pos += 1;
        while let Some(d) = input.get(pos).and_then(hex_digit) {
            push(d, true);
            has_digits = true;
            pos += 1;
        }
    }
    if !has_digits || !matches!(input.get(pos), Some(b'p' | b'P')) {
        return Err(ConvError::NoNumber);
    }
    let (bin_exp, end) =
        parse_exponent(input, pos + 1).ok_or(ConvError::NoNumber)?;

    Ok(Parsed {
        value: round_significand(sem, sig, exp + bin_exp, sticky),
        end,
    })
}

/// Parse a float literal and return the encoding of the nearest value in
/// the semantics `sem` (ties to even). Accepts the decimal form (`12.5e-3`,
/// `.5`, `5.`), the binary form (`0x1.8p3`), and the tokens `inf`,
/// `infinity` and `nan`. A sign is not part of the literal; see
/// [`parse_float_signed`]. Values beyond the finite range parse as
/// infinity and values below half of the smallest denormal parse as zero.
pub fn parse_float_bits(
    input: &[u8],
    sem: Semantics,
) -> ConvResult<Parsed<u64>> {
    if input.is_empty() {
        return Err(ConvError::InvalidBounds);
    }
    if let Some(special) = parse_special(input, sem) {
        return Ok(special);
    }
    if input[0] == b'0' && matches!(input.get(1), Some(b'x' | b'X')) {
        return parse_hex(input, sem);
    }
    parse_decimal(input, sem)
}

/// Parse a float literal with an optional leading `+` or `-`.
pub fn parse_float_signed(
    input: &[u8],
    sem: Semantics,
) -> ConvResult<Parsed<u64>> {
    let (negative, skip) = match input.first() {
        None => return Err(ConvError::InvalidBounds),
        Some(b'-') => (true, 1),
        Some(b'+') => (false, 1),
        Some(_) => (false, 0),
    };
    if input.len() == skip {
        return Err(ConvError::NoNumber);
    }
    let parsed = parse_float_bits(&input[skip..], sem)?;
    let sign = if negative { sem.sign_bit() } else { 0 };
    Ok(Parsed {
        value: parsed.value | sign,
        end: parsed.end + skip,
    })
}

/// Parse a half-precision float and return its encoding.
pub fn parse_f16(input: &[u8]) -> ConvResult<Parsed<u16>> {
    Ok(parse_float_bits(input, FP16)?.map(|v| v as u16))
}

/// Parse a single-precision float.
pub fn parse_f32(input: &[u8]) -> ConvResult<Parsed<f32>> {
    Ok(parse_float_bits(input, FP32)?.map(|v| f32::from_bits(v as u32)))
}

/// Parse a double-precision float.
pub fn parse_f64(input: &[u8]) -> ConvResult<Parsed<f64>> {
    Ok(parse_float_bits(input, FP64)?.map(f64::from_bits))
}

#[cfg(test)]
fn f64_bits(s: &str) -> u64 {
    parse_float_bits(s.as_bytes(), FP64).unwrap().value
}

#[cfg(test)]
fn f32_bits(s: &str) -> u64 {
    parse_float_bits(s.as_bytes(), FP32).unwrap().value
}

#[cfg(test)]
fn f16_bits(s: &str) -> u64 {
    parse_float_bits(s.as_bytes(), FP16).unwrap().value
}

#[test]
fn test_parse_simple() {
    assert_eq!(f64_bits("1"), 1f64.to_bits());
    assert_eq!(f64_bits("0.5"), 0.5f64.to_bits());
    assert_eq!(f64_bits(".5"), 0.5f64.to_bits());
    assert_eq!(f64_bits("5."), 5f64.to_bits());
    assert_eq!(f64_bits("430.56"), 430.56f64.to_bits());
    assert_eq!(f64_bits("3.2e1"), 32f64.to_bits());
    assert_eq!(f64_bits("44.e-1"), 4.4f64.to_bits());
    assert_eq!(f64_bits("54E-1"), 5.4f64.to_bits());
    assert_eq!(f64_bits("0.1"), 0.1f64.to_bits());
    assert_eq!(f64_bits("0.3"), 0.3f64.to_bits());
    assert_eq!(f64_bits("000123.4500"), 123.45f64.to_bits());
    assert_eq!(f64_bits("1.7976931348623157e308"), f64::MAX.to_bits());
    assert_eq!(f64_bits("2.2250738585072014e-308"), f64::MIN_POSITIVE.to_bits());
    assert_eq!(f64_bits("4.9406564584124654e-324"), 1);
    assert_eq!(f64_bits("0"), 0);
    assert_eq!(f64_bits("0.000e5"), 0);
    assert_eq!(f32_bits("0.1"), 0.1f32.to_bits() as u64);
    assert_eq!(f32_bits("3.4028235e38"), f32::MAX.to_bits() as u64);
    assert_eq!(f32_bits("1e-45"), 1);
    assert_eq!(f16_bits("1"), 0x3c00);
    assert_eq!(f16_bits("65504"), 0x7bff);
    assert_eq!(f16_bits("0.1"), 0x2e66);
    assert_eq!(f16_bits("5.9604645e-8"), 0x0001);
}

#[test]
fn test_parse_overflow_underflow() {
    assert_eq!(f64_bits("1e309"), FP64.inf_bits());
    assert_eq!(f64_bits("1.8e308"), FP64.inf_bits());
    assert_eq!(f64_bits("1e99999999999999999999"), FP64.inf_bits());
    assert_eq!(f64_bits("1e-400"), 0);
    assert_eq!(f64_bits("1e-99999999999999999999"), 0);
    // Half of the smallest denormal ties to zero, anything above rounds up.
    assert_eq!(f64_bits("2.4703282292062327e-324"), 0);
    assert_eq!(f64_bits("2.4703282292062328e-324"), 1);
    assert_eq!(f16_bits("65520"), 0x7c00);
    assert_eq!(f16_bits("65519.99"), 0x7bff);
    assert_eq!(f16_bits("1e-8"), 0);
    assert_eq!(f32_bits("3.5e38"), FP32.inf_bits());
}

#[test]
fn test_parse_ties_to_even() {
    // 2^53 + 1 is halfway between 2^53 and 2^53 + 2.
    assert_eq!(f64_bits("9007199254740993"), 9007199254740992f64.to_bits());
    // 2^53 + 3 is halfway between 2^53 + 2 and 2^53 + 4.
    assert_eq!(f64_bits("9007199254740995"), 9007199254740996f64.to_bits());
    // Just above the halfway point.
    assert_eq!(
        f64_bits("9007199254740993.0000000000000000000000000001"),
        9007199254740994f64.to_bits()
    );
    // 1 + 2^-53 is halfway between 1 and the next double.
    assert_eq!(
        f64_bits("1.00000000000000011102230246251565404236316680908203125"),
        1f64.to_bits()
    );
    assert_eq!(
        f64_bits("1.00000000000000011102230246251565404236316680908203126"),
        1f64.to_bits() + 1
    );
    // 2049 is halfway between 2048 and 2050 in half precision.
    assert_eq!(f16_bits("2049"), 0x6800);
    assert_eq!(f16_bits("2051"), 0x6802);
}

#[test]
fn test_parse_long_inputs() {
    // A thousand zeros after the point do not change the value.
    let s = format!("0.{}1e1001", "0".repeat(1000));
    assert_eq!(f64_bits(&s), 1f64.to_bits());

    // Digits beyond the kept ones only matter as a sticky bit.
    let s = format!("9007199254740993{}1e-1001", "0".repeat(1000));
    assert_eq!(f64_bits(&s), 9007199254740994f64.to_bits());

    let s = format!("1{}", "0".repeat(400));
    assert_eq!(f64_bits(&s), FP64.inf_bits());
}

#[test]
fn test_parse_hex() {
    assert_eq!(f64_bits("0x1p0"), 1f64.to_bits());
    assert_eq!(f64_bits("0x1.8p1"), 3f64.to_bits());
    assert_eq!(f64_bits("0X1.8P+1"), 3f64.to_bits());
    assert_eq!(f64_bits("0xa.0p-2"), 2.5f64.to_bits());
    assert_eq!(f64_bits("0x.8p0"), 0.5f64.to_bits());
    assert_eq!(f64_bits("0x1.fffffffffffffp1023"), f64::MAX.to_bits());
    assert_eq!(f64_bits("0x1p1024"), FP64.inf_bits());
    assert_eq!(f64_bits("0x1p-1074"), 1);
    assert_eq!(f64_bits("0x1p-1075"), 0);
    assert_eq!(f64_bits("0x1.8p-1075"), 1);
    // 2^53 + 1 written in hex, rounded to even.
    assert_eq!(f64_bits("0x20000000000001p0"), 9007199254740992f64.to_bits());
    // More digits than the significand holds.
    assert_eq!(
        f64_bits("0x1.00000000000008000000000001p0"),
        1f64.to_bits() + 1
    );
    assert_eq!(f16_bits("0x1.ffcp15"), 0x7bff);
    assert_eq!(f16_bits("0x1p-24"), 0x0001);
    assert_eq!(f32_bits("0x1.fffffep127"), f32::MAX.to_bits() as u64);
}

#[test]
fn test_parse_end_offsets() {
    let p = parse_f64(b"1.5e3xyz").unwrap();
    assert_eq!((p.value, p.end), (1500.0, 5));
    // The exponent marker is not consumed when no digits follow.
    let p = parse_f64(b"2.5e").unwrap();
    assert_eq!((p.value, p.end), (2.5, 3));
    let p = parse_f64(b"2.5e+x").unwrap();
    assert_eq!((p.value, p.end), (2.5, 3));
    let p = parse_f64(b"7.f").unwrap();
    assert_eq!((p.value, p.end), (7.0, 2));
    let p = parse_f64(b"0x1p4f").unwrap();
    assert_eq!((p.value, p.end), (16.0, 5));
    let p = parse_f64(b"12,13").unwrap();
    assert_eq!((p.value, p.end), (12.0, 2));
    let p = parse_f64(&b"1234"[..2]).unwrap();
    assert_eq!((p.value, p.end), (12.0, 2));
}

#[test]
fn test_parse_special() {
    assert_eq!(f64_bits("inf"), FP64.inf_bits());
    assert_eq!(f64_bits("INF"), FP64.inf_bits());
    assert_eq!(parse_f64(b"Infinity").unwrap().end, 8);
    assert_eq!(parse_f64(b"infinit").unwrap().end, 3);
    assert!(parse_f64(b"nan").unwrap().value.is_nan());
    assert_eq!(f16_bits("NaN"), 0x7e00);
}

#[test]
fn test_parse_errors() {
    assert_eq!(parse_f64(b""), Err(ConvError::InvalidBounds));
    assert_eq!(parse_f64(b"."), Err(ConvError::NoNumber));
    assert_eq!(parse_f64(b"e5"), Err(ConvError::NoNumber));
    assert_eq!(parse_f64(b"-1"), Err(ConvError::NoNumber));
    assert_eq!(parse_f64(b"abc"), Err(ConvError::NoNumber));
    assert_eq!(parse_f64(b"0x"), Err(ConvError::NoNumber));
    assert_eq!(parse_f64(b"0x1"), Err(ConvError::NoNumber));
    assert_eq!(parse_f64(b"0x1.8"), Err(ConvError::NoNumber));
    assert_eq!(parse_f64(b"0x.p1"), Err(ConvError::NoNumber));
    assert_eq!(parse_f64(b"0x1p"), Err(ConvError::NoNumber));
    assert_eq!(parse_float_signed(b"", FP64), Err(ConvError::InvalidBounds));
    assert_eq!(parse_float_signed(b"-", FP64), Err(ConvError::NoNumber));
    assert_eq!(parse_float_signed(b"--1", FP64), Err(ConvError::NoNumber));
}

#[test]
fn test_parse_signed() {
    let p = parse_float_signed(b"-1.5", FP64).unwrap();
    assert_eq!((p.value, p.end), ((-1.5f64).to_bits(), 4));
    let p = parse_float_signed(b"+0x1p1", FP32).unwrap();
    assert_eq!((p.value, p.end), (2f32.to_bits() as u64, 6));
    let p = parse_float_signed(b"-0", FP16).unwrap();
    assert_eq!(p.value, 0x8000);
    let p = parse_float_signed(b"-inf", FP16).unwrap();
    assert_eq!(p.value, 0xfc00);
}

#[test]
fn test_parse_against_std() {
    use super::utils::Lfsr;

    // Build random literals and compare with the standard library, which
    // also rounds correctly.
    let mut lfsr = Lfsr::new_with_seed(11);
    for _ in 0..3000 {
        let digits = 1 + lfsr.get() % 25;
        let mut s = String::new();
        for i in 0..digits {
            if i == digits / 2 && lfsr.get() % 2 == 0 {
                s.push('.');
            }
            s.push((b'0' + (lfsr.get() % 10) as u8) as char);
        }
        let exp = (lfsr.get() % 700) as i64 - 350;
        let s = format!("{}e{}", s, exp);
        let expected: f64 = s.parse().unwrap();
        assert_eq!(f64_bits(&s), expected.to_bits(), "{}", s);
        let expected: f32 = s.parse().unwrap();
        assert_eq!(f32_bits(&s), expected.to_bits() as u64, "{}", s);
    }

    // Every double printed with 17 digits parses back exactly.
    for _ in 0..2000 {
        let v = f64::from_bits(lfsr.get64());
        if !v.is_finite() {
            continue;
        }
        let s = format!("{:.16e}", v.abs());
        assert_eq!(f64_bits(&s), v.abs().to_bits(), "{}", s);
    }
}

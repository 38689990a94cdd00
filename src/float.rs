//! This module describes the IEEE-754 binary interchange formats and
//! implements the bit-level operations on their encodings: field
//! extraction, packing, and rounding an exact significand to the nearest
//! representable value.

use core::fmt::Display;

use super::bigint::LossFraction;
use super::utils::{clz64, mask};

/// One of the binary interchange formats [`FP16`], [`FP32`] or [`FP64`].
/// The rounding and formatting code keeps significands in a `u64`, so
/// other layouts cannot be built outside this crate:
///
/// ```compile_fail
/// let quad = numstrconv::Semantics::new(15, 113);
/// ```
///
/// ```compile_fail
/// let sem = numstrconv::Semantics { exponent: 8, precision: 60 };
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Semantics {
    /// The number of bits that define the range of the exponent.
    exponent: usize,
    /// The number of bits in the significand (mantissa + 1).
    precision: usize,
}

impl Semantics {
    pub(crate) const fn new(exponent: usize, precision: usize) -> Self {
        // The whole encoding, sign included, must fit in a u64.
        assert!(exponent >= 2 && precision >= 2);
        assert!(exponent + precision <= 64);
        Semantics {
            exponent,
            precision,
        }
    }
    /// Returns the precision in bits.
    pub fn get_precision(&self) -> usize {
        self.precision
    }
    /// Returns the length of the mantissa in bits (precision - 1).
    pub fn get_mantissa_len(&self) -> usize {
        self.precision - 1
    }
    /// Returns the length of the exponent in bits, which defines the valid
    /// range.
    pub fn get_exponent_len(&self) -> usize {
        self.exponent
    }
    /// Returns the width of the whole encoding (sign, exponent, mantissa).
    pub fn get_bits(&self) -> usize {
        1 + self.exponent + self.get_mantissa_len()
    }

    /// Returns the exponent bias for the number, as a positive number.
    /// https://en.wikipedia.org/wiki/IEEE_754#Basic_and_interchange_formats
    pub fn get_bias(&self) -> i64 {
        let e = self.get_exponent_len();
        ((1u64 << (e - 1)) - 1) as i64
    }

    /// Returns the lowest and highest exponents of normal numbers.
    pub fn get_exp_bounds(&self) -> (i64, i64) {
        (1 - self.get_bias(), self.get_bias())
    }

    /// Returns the mask of the sign bit.
    pub fn sign_bit(&self) -> u64 {
        1 << (self.get_bits() - 1)
    }

    /// Returns the encoding of positive infinity.
    pub fn inf_bits(&self) -> u64 {
        mask(self.exponent as u32) << self.get_mantissa_len()
    }

    /// Returns the encoding of the canonical (positive, quiet) NaN.
    pub fn nan_bits(&self) -> u64 {
        self.inf_bits() | (1 << (self.get_mantissa_len() - 1))
    }
}

impl Display for Semantics {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(
            f,
            "(exponent:{} precision:{})",
            self.get_exponent_len(),
            self.get_precision(),
        )
    }
}

// IEEE 754-2019
// Table 3.5 — Binary interchange format parameters.

/// Predefined FP16 float with 5 exponent bits, and 10 mantissa bits.
pub const FP16: Semantics = Semantics::new(5, 11);
/// Predefined FP32 float with 8 exponent bits, and 23 mantissa bits.
pub const FP32: Semantics = Semantics::new(8, 24);
/// Predefined FP64 float with 11 exponent bits, and 52 mantissa bits.
pub const FP64: Semantics = Semantics::new(11, 53);

/// Declare the different categories of the floating point number.
/// Denormals are counted as normal numbers: they only differ by the missing
/// implicit bit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Category {
    Infinity,
    NaN,
    Normal,
    Zero,
}

/// The fields of an encoded IEEE-754 value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FloatBits {
    sem: Semantics,
    sign: bool,
    biased_exp: u64,
    mantissa: u64,
}

impl FloatBits {
    /// Split the encoding `bits` of a number with semantics `sem` into its
    /// fields. Bits above the encoding width are ignored.
    pub fn decode(bits: u64, sem: Semantics) -> Self {
        let m = sem.get_mantissa_len() as u32;
        let e = sem.get_exponent_len() as u32;
        FloatBits {
            sem,
            sign: (bits >> (m + e)) & 1 == 1,
            biased_exp: (bits >> m) & mask(e),
            mantissa: bits & mask(m),
        }
    }

    /// Pack the fields back into an encoding.
    pub fn encode(&self) -> u64 {
        let m = self.sem.get_mantissa_len();
        let sign = if self.sign { self.sem.sign_bit() } else { 0 };
        sign | (self.biased_exp << m) | self.mantissa
    }

    /// Returns the sign of the float. True means negative.
    pub fn get_sign(&self) -> bool {
        self.sign
    }

    /// Returns the biased exponent field.
    pub fn get_biased_exp(&self) -> u64 {
        self.biased_exp
    }

    /// Returns the stored mantissa field (without the implicit bit).
    pub fn get_mantissa(&self) -> u64 {
        self.mantissa
    }

    pub fn get_semantics(&self) -> Semantics {
        self.sem
    }

    pub fn get_category(&self) -> Category {
        let max_exp = mask(self.sem.get_exponent_len() as u32);
        if self.biased_exp == max_exp {
            if self.mantissa == 0 {
                return Category::Infinity;
            }
            return Category::NaN;
        }
        if self.biased_exp == 0 && self.mantissa == 0 {
            return Category::Zero;
        }
        Category::Normal
    }

    /// Returns the significand (with the implicit bit for normal numbers)
    /// and the exponent of its least significant bit, such that the
    /// magnitude is `significand * 2^exp`.
    pub fn get_significand(&self) -> (u64, i64) {
        let m = self.sem.get_mantissa_len();
        let (emin, _) = self.sem.get_exp_bounds();
        if self.biased_exp == 0 {
            return (self.mantissa, emin - m as i64);
        }
        let exp = self.biased_exp as i64 - self.sem.get_bias() - m as i64;
        (self.mantissa | (1 << m), exp)
    }
}

/// Returns true if we need to round away from zero (increment the
/// significand `q`) under round-to-nearest, ties-to-even.
fn need_round_away_from_zero(q: u64, loss: LossFraction) -> bool {
    if loss.is_mt_half() {
        return true;
    }
    loss.is_exactly_half() && q & 1 == 1
}

/// Round the positive number `q * 2^lsb` (plus the fraction of an ulp
/// described by `loss`) to the semantics `sem` and return its encoding.
/// The caller picks `lsb` so that `q` has at most `precision` bits, and
/// `lsb` equals the denormal exponent whenever `q` has fewer.
pub(crate) fn round_to_bits(
    sem: Semantics,
    q: u64,
    lsb: i64,
    loss: LossFraction,
) -> u64 {
    let p = sem.get_precision() as u32;
    let m = sem.get_mantissa_len();
    let (_, emax) = sem.get_exp_bounds();
    let mut q = q;
    let mut lsb = lsb;
    debug_assert!(q >> p == 0);

    if need_round_away_from_zero(q, loss) {
        q += 1;
        // Did the significand overflow?
        if q >> p != 0 {
            q >>= 1;
            lsb += 1;
        }
    }

    if q >> m == 0 {
        // Zero or denormal.
        return q;
    }

    let exp = lsb + m as i64;
    if exp > emax {
        return sem.inf_bits();
    }
    let biased = (exp + sem.get_bias()) as u64;
    (biased << m) | (q & mask(m as u32))
}

/// Round the positive number `sig * 2^exp` to the semantics `sem` and
/// return its encoding. `sticky` reports non-zero bits that were already
/// dropped below `sig`.
pub(crate) fn round_significand(
    sem: Semantics,
    sig: u64,
    exp: i64,
    sticky: bool,
) -> u64 {
    if sig == 0 {
        return 0;
    }
    let p = sem.get_precision() as i64;
    let (emin, _) = sem.get_exp_bounds();
    let msb_exp = exp + (u64::BITS - clz64(sig)) as i64 - 1;
    let lsb = (msb_exp - (p - 1)).max(emin - (p - 1));
    let shift = lsb - exp;

    let (q, loss) = if shift <= 0 {
        (sig << (-shift), LossFraction::ExactlyZero)
    } else if shift > 64 {
        (0, LossFraction::LessThanHalf)
    } else {
        let q = if shift == 64 { 0 } else { sig >> shift };
        let rem = sig & mask(shift as u32);
        let half = 1u64 << (shift - 1);
        let loss = if rem == 0 {
            LossFraction::ExactlyZero
        } else if rem < half {
            LossFraction::LessThanHalf
        } else if rem == half {
            LossFraction::ExactlyHalf
        } else {
            LossFraction::MoreThanHalf
        };
        (q, loss)
    };
    round_to_bits(sem, q, lsb, loss.with_sticky(sticky))
}

/// Convert the encoding `bits` from semantics `from` to semantics `to`,
/// rounding to nearest-even when `to` is narrower. The high bits of a NaN
/// payload are kept, and the result is always a quiet NaN.
pub fn cast_bits(bits: u64, from: Semantics, to: Semantics) -> u64 {
    let val = FloatBits::decode(bits, from);
    let sign = if val.get_sign() { to.sign_bit() } else { 0 };
    let from_m = from.get_mantissa_len();
    let to_m = to.get_mantissa_len();

    let body = match val.get_category() {
        Category::Zero => 0,
        Category::Infinity => to.inf_bits(),
        Category::NaN => {
            let payload = if to_m >= from_m {
                val.get_mantissa() << (to_m - from_m)
            } else {
                val.get_mantissa() >> (from_m - to_m)
            };
            to.nan_bits() | payload
        }
        Category::Normal => {
            let (sig, exp) = val.get_significand();
            round_significand(to, sig, exp, false)
        }
    };
    sign | body
}

/// Widen a half-precision encoding to a single-precision float. The
/// conversion is exact for every input, including denormals.
pub fn half_to_f32(half: u16) -> f32 {
    f32::from_bits(cast_bits(half as u64, FP16, FP32) as u32)
}

/// Narrow a single-precision float to a half-precision encoding, rounding to
/// the nearest value (ties to even).
pub fn f32_to_half(val: f32) -> u16 {
    cast_bits(val.to_bits() as u64, FP32, FP16) as u16
}

#[test]
fn test_semantics_constants() {
    assert_eq!(FP16.get_bits(), 16);
    assert_eq!(FP32.get_bits(), 32);
    assert_eq!(FP64.get_bits(), 64);
    assert_eq!(FP16.get_bias(), 15);
    assert_eq!(FP64.get_exp_bounds(), (-1022, 1023));
    assert_eq!(FP16.inf_bits(), 0x7c00);
    assert_eq!(FP16.nan_bits(), 0x7e00);
    assert_eq!(FP32.inf_bits(), f32::INFINITY.to_bits() as u64);
    assert_eq!(FP64.inf_bits(), f64::INFINITY.to_bits());
    assert_eq!(FP32.sign_bit(), 0x8000_0000);

    // Significands and whole encodings must fit in a u64.
    for sem in [FP16, FP32, FP64] {
        assert!(sem.get_precision() <= 64);
        assert!(sem.get_bits() <= 64);
        assert!(sem.get_exponent_len() >= 2);
    }
}

#[test]
#[should_panic]
fn test_semantics_too_wide() {
    let quad = Semantics::new(15, 113);
    let _ = quad.get_bits();
}

#[test]
fn test_decode_fields() {
    let x = FloatBits::decode((-1.5f64).to_bits(), FP64);
    assert!(x.get_sign());
    assert_eq!(x.get_biased_exp(), 1023);
    assert_eq!(x.get_mantissa(), 1 << 51);
    assert_eq!(x.get_category(), Category::Normal);
    assert_eq!(x.get_significand(), (3 << 51, -52));
    assert_eq!(x.encode(), (-1.5f64).to_bits());

    // Smallest half denormal: 2^-24.
    let d = FloatBits::decode(0x0001, FP16);
    assert_eq!(d.get_significand(), (1, -24));
    assert_eq!(FloatBits::decode(0x8000, FP16).get_category(), Category::Zero);
    assert_eq!(
        FloatBits::decode(0xfc00, FP16).get_category(),
        Category::Infinity
    );
    assert_eq!(FloatBits::decode(0x7c01, FP16).get_category(), Category::NaN);
}

#[test]
fn test_round_significand() {
    // Exact values.
    assert_eq!(round_significand(FP64, 3, -1, false), 1.5f64.to_bits());
    assert_eq!(round_significand(FP32, 1, 0, false), 1f32.to_bits() as u64);

    // 2^53 + 1 is a tie between 2^53 and 2^53 + 2; the even one wins.
    let v = (1u64 << 53) + 1;
    assert_eq!(
        round_significand(FP64, v, 0, false),
        9007199254740992f64.to_bits()
    );
    // The same tie with dropped bits below rounds up.
    assert_eq!(
        round_significand(FP64, v, 0, true),
        9007199254740994f64.to_bits()
    );
    // 2^53 + 3 ties to 2^53 + 4.
    let v = (1u64 << 53) + 3;
    assert_eq!(
        round_significand(FP64, v, 0, false),
        9007199254740996f64.to_bits()
    );

    // Overflow and underflow.
    assert_eq!(round_significand(FP16, 1, 16, false), 0x7c00);
    assert_eq!(round_significand(FP16, 0xfff, 4, false), 0x7c00);
    assert_eq!(round_significand(FP16, 0xffe, 4, false), 0x7bff);
    assert_eq!(round_significand(FP16, 0xffd, 4, false), 0x7bfe);
    assert_eq!(round_significand(FP16, 1, -25, false), 0);
    assert_eq!(round_significand(FP16, 3, -26, false), 0x0001);
    assert_eq!(round_significand(FP16, 1, -200, false), 0);
}

#[test]
fn test_half_conversions() {
    assert_eq!(half_to_f32(0x3c00), 1.0);
    assert_eq!(half_to_f32(0xc000), -2.0);
    assert_eq!(half_to_f32(0x7bff), 65504.0);
    assert_eq!(half_to_f32(0x0001), 2f32.powi(-24));
    assert_eq!(half_to_f32(0x03ff), 1023.0 * 2f32.powi(-24));
    assert_eq!(half_to_f32(0x7c00), f32::INFINITY);
    assert_eq!(half_to_f32(0xfc00), f32::NEG_INFINITY);
    assert_eq!(half_to_f32(0x8000).to_bits(), 0x8000_0000);
    assert!(half_to_f32(0x7e00).is_nan());
    assert_eq!(half_to_f32(0x7e01).to_bits(), 0x7fc0_2000);

    assert_eq!(f32_to_half(1.0), 0x3c00);
    assert_eq!(f32_to_half(65504.0), 0x7bff);
    assert_eq!(f32_to_half(65520.0), 0x7c00);
    assert_eq!(f32_to_half(2f32.powi(-25)), 0);
    assert_eq!(f32_to_half(f32::NAN) & 0x7e00, 0x7e00);

    // Narrowing a signaling NaN gives a quiet one.
    assert_eq!(cast_bits(0x7fa0_0000, FP32, FP16), 0x7f00);
    assert_eq!(f32_to_half(f32::from_bits(0x7f80_0001)), 0x7e00);
    assert_eq!(f32_to_half(f32::from_bits(0xff80_0001)), 0xfe00);
    assert_eq!(half_to_f32(0x7d00).to_bits(), 0x7fe0_0000);

    // Every finite half survives the widen/narrow round-trip.
    for h in 0..=u16::MAX {
        if h & 0x7c00 == 0x7c00 && h & 0x3ff != 0 {
            continue;
        }
        assert_eq!(f32_to_half(half_to_f32(h)), h);
    }
}

//! This module contains the implementation of the fixed-capacity big-int
//! that we use for exact decimal/binary scaling during conversion.

use core::cmp::Ordering;

use super::utils::mul_part;

/// Reports the kind of values that are lost when we truncate a quotient. In
/// some context this used as the two guard bits.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum LossFraction {
    ExactlyZero,  //0000000
    LessThanHalf, //0xxxxxx
    ExactlyHalf,  //1000000
    MoreThanHalf, //1xxxxxx
}

impl LossFraction {
    pub fn is_exactly_half(&self) -> bool {
        matches!(self, Self::ExactlyHalf)
    }
    pub fn is_mt_half(&self) -> bool {
        matches!(self, Self::MoreThanHalf)
    }

    /// Fold in the knowledge that some non-zero digits below the ones we
    /// looked at were dropped.
    pub fn with_sticky(self, sticky: bool) -> LossFraction {
        if !sticky {
            return self;
        }
        match self {
            LossFraction::ExactlyZero => LossFraction::LessThanHalf,
            LossFraction::ExactlyHalf => LossFraction::MoreThanHalf,
            _ => self,
        }
    }
}

/// Number of 64-bit words in a `BigInt`. This bounds the magnitude of the
/// numbers that the conversion code can scale, and callers clamp their
/// exponents so that intermediate values stay well below it.
pub(crate) const WORDS: usize = 80;

/// This is a fixed-size unsigned big number implementation. The words are
/// stored inline (least significant first), so a conversion never touches
/// the heap. BigInt implements the handful of operations that exact
/// decimal-binary conversion needs: small multiplications, shifts,
/// comparison, subtraction and a bounded long division.
#[derive(Clone, Copy)]
pub struct BigInt {
    parts: [u64; WORDS],
    // Number of significant words. Words at and above `len` are zero.
    len: usize,
}

impl BigInt {
    /// Create a new zero big int number.
    pub fn zero() -> Self {
        BigInt {
            parts: [0; WORDS],
            len: 0,
        }
    }

    /// Create a number and set the lowest 64 bits to `val`.
    pub fn from_u64(val: u64) -> Self {
        let mut x = Self::zero();
        x.parts[0] = val;
        x.len = (val != 0) as usize;
        x
    }

    /// Create a number with the value `10^exp`.
    pub fn pow10(exp: u32) -> Self {
        let mut x = Self::from_u64(1);
        x.mul_pow10(exp);
        x
    }

    /// Return true if the number is equal to zero.
    pub fn is_zero(&self) -> bool {
        self.len == 0
    }

    /// Returns the lowest 64 bits.
    #[cfg(test)]
    pub fn as_u64(&self) -> u64 {
        self.parts[0]
    }

    /// Returns the word at idx `idx`.
    #[cfg(test)]
    pub fn get_part(&self, idx: usize) -> u64 {
        self.parts[idx]
    }

    /// Returns the index of the most significant bit (the highest '1'),
    /// using 1-based counting (the first bit is 1, and zero means no bits are
    /// set).
    pub fn msb_index(&self) -> usize {
        if self.len == 0 {
            return 0;
        }
        let top = self.parts[self.len - 1];
        (self.len - 1) * 64 + (64 - top.leading_zeros() as usize)
    }

    /// Remove the leading zero words from the bigint.
    fn shrink(&mut self) {
        while self.len > 0 && self.parts[self.len - 1] == 0 {
            self.len -= 1;
        }
    }

    /// Add `rhs` to this number.
    pub fn inplace_add(&mut self, rhs: &Self) {
        let size = self.len.max(rhs.len);
        let mut carry = false;
        for i in 0..size {
            let first = self.parts[i].overflowing_add(rhs.parts[i]);
            let second = first.0.overflowing_add(carry as u64);
            carry = first.1 || second.1;
            self.parts[i] = second.0;
        }
        self.len = size;
        if carry {
            debug_assert!(size < WORDS, "BigInt capacity exceeded");
            self.parts[size] = 1;
            self.len += 1;
        }
    }

    /// Add the small number `val` to this number.
    pub fn add_small(&mut self, val: u64) {
        self.inplace_add(&Self::from_u64(val));
    }

    /// Subtract `rhs` from self, and return true if the operation overflowed
    /// (borrow).
    #[must_use]
    pub fn inplace_sub(&mut self, rhs: &Self) -> bool {
        let size = self.len.max(rhs.len);
        let mut borrow = false;
        for i in 0..size {
            let first = self.parts[i].overflowing_sub(rhs.parts[i]);
            let second = first.0.overflowing_sub(borrow as u64);
            borrow = first.1 || second.1;
            self.parts[i] = second.0;
        }
        self.len = size;
        self.shrink();
        borrow
    }

    /// Multiply self by the word `rhs`.
    pub fn mul_small(&mut self, rhs: u64) {
        let mut carry: u64 = 0;
        for i in 0..self.len {
            let (low, high) = mul_part(self.parts[i], rhs);
            let (low, overflow) = low.overflowing_add(carry);
            self.parts[i] = low;
            carry = high + overflow as u64;
        }
        if carry != 0 {
            debug_assert!(self.len < WORDS, "BigInt capacity exceeded");
            self.parts[self.len] = carry;
            self.len += 1;
        }
        self.shrink();
    }

    /// Multiply self by `10^exp`.
    pub fn mul_pow10(&mut self, mut exp: u32) {
        // 10^19 is the largest power of ten that fits in a word.
        const TEN19: u64 = 10_000_000_000_000_000_000;
        while exp >= 19 {
            self.mul_small(TEN19);
            exp -= 19;
        }
        self.mul_small(10u64.pow(exp));
    }

    /// Shift the bits in the numbers `bits` to the left.
    pub fn shift_left(&mut self, bits: usize) {
        if self.is_zero() || bits == 0 {
            return;
        }
        let words_to_shift = bits / u64::BITS as usize;
        let bits_in_word = bits % u64::BITS as usize;
        let new_len = self.len + words_to_shift + 1;
        debug_assert!(new_len <= WORDS, "BigInt capacity exceeded");
        let new_len = new_len.min(WORDS);

        for i in (0..new_len).rev() {
            let left_val = if i >= words_to_shift {
                self.parts[i - words_to_shift]
            } else {
                0
            };
            if bits_in_word == 0 {
                self.parts[i] = left_val;
                continue;
            }
            let right_val = if i > words_to_shift {
                self.parts[i - words_to_shift - 1]
            } else {
                0
            };
            let right = right_val >> (u64::BITS as usize - bits_in_word);
            let left = left_val << bits_in_word;
            self.parts[i] = left | right;
        }
        self.len = new_len;
        self.shrink();
    }

    /// Shift the bits in the numbers `bits` to the right.
    pub fn shift_right(&mut self, bits: usize) {
        let words_to_shift = bits / u64::BITS as usize;
        let bits_in_word = bits % u64::BITS as usize;
        if words_to_shift >= self.len {
            *self = Self::zero();
            return;
        }

        for i in 0..self.len {
            let left_val = if i + words_to_shift < self.len {
                self.parts[i + words_to_shift]
            } else {
                0
            };
            if bits_in_word == 0 {
                self.parts[i] = left_val;
                continue;
            }
            let right_val = if i + 1 + words_to_shift < self.len {
                self.parts[i + 1 + words_to_shift]
            } else {
                0
            };
            let right = right_val << (u64::BITS as usize - bits_in_word);
            let left = left_val >> bits_in_word;
            self.parts[i] = left | right;
        }
        self.shrink();
    }

    /// Divide self by `divisor` when the quotient is known to be smaller than
    /// `2^bits` (bits <= 64). Self is replaced by the remainder and the
    /// quotient is returned.
    pub fn inplace_div_bounded(&mut self, divisor: &Self, bits: usize) -> u64 {
        debug_assert!(!divisor.is_zero(), "division by zero");
        debug_assert!(bits > 0 && bits <= 64);
        let mut quotient: u64 = 0;
        let mut shifted = *divisor;
        shifted.shift_left(bits - 1);

        // Restoring long division, one quotient bit at a time.
        for i in (0..bits).rev() {
            if *self >= shifted {
                let borrow = self.inplace_sub(&shifted);
                debug_assert!(!borrow);
                quotient |= 1 << i;
            }
            shifted.shift_right(1);
        }
        debug_assert!(*self < *divisor, "quotient does not fit");
        quotient
    }

    /// Classify the remainder `self` of a division by `divisor`, relative to
    /// half of the divisor.
    pub(crate) fn loss_against(&self, divisor: &Self) -> LossFraction {
        if self.is_zero() {
            return LossFraction::ExactlyZero;
        }
        let mut twice = *self;
        twice.shift_left(1);
        match twice.cmp(divisor) {
            Ordering::Less => LossFraction::LessThanHalf,
            Ordering::Equal => LossFraction::ExactlyHalf,
            Ordering::Greater => LossFraction::MoreThanHalf,
        }
    }
}

impl core::fmt::Debug for BigInt {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_list().entries(self.parts[..self.len].iter()).finish()
    }
}

impl PartialEq for BigInt {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for BigInt {}

impl PartialOrd for BigInt {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for BigInt {
    fn cmp(&self, other: &Self) -> Ordering {
        if self.len != other.len {
            return self.len.cmp(&other.len);
        }
        for i in (0..self.len).rev() {
            match self.parts[i].cmp(&other.parts[i]) {
                Ordering::Equal => continue,
                ord => return ord,
            }
        }
        Ordering::Equal
    }
}

#[test]
fn test_pow10() {
    assert_eq!(BigInt::pow10(0).as_u64(), 1);
    assert_eq!(BigInt::pow10(19).as_u64(), 10_000_000_000_000_000_000);

    // 10^20 = 5 * 2^64 + 7766279631452241920
    let x = BigInt::pow10(20);
    assert_eq!(x.get_part(0), 7766279631452241920);
    assert_eq!(x.get_part(1), 5);
    assert_eq!(x.msb_index(), 67);
}

#[test]
fn test_shl() {
    let mut x = BigInt::from_u64(0xff00ff);
    assert_eq!(x.get_part(0), 0xff00ff);
    x.shift_left(17);
    assert_eq!(x.get_part(0), 0x1fe01fe0000);
    x.shift_left(17);
    assert_eq!(x.get_part(0), 0x3fc03fc00000000);
    x.shift_left(64);
    assert_eq!(x.get_part(1), 0x3fc03fc00000000);
    assert_eq!(x.get_part(0), 0);
}

#[test]
fn test_shr() {
    let mut x = BigInt::from_u64(0xff00ff);
    x.shift_left(128);
    assert_eq!(x.get_part(2), 0xff00ff);
    x.shift_right(17);
    assert_eq!(x.get_part(1), 0x807f800000000000);
    x.shift_right(17);
    assert_eq!(x.get_part(1), 0x03fc03fc0000000);
    x.shift_right(64);
    assert_eq!(x.get_part(0), 0x03fc03fc0000000);
    x.shift_right(640);
    assert!(x.is_zero());
}

#[test]
fn test_mul_basic() {
    let mut x = BigInt::from_u64(0xffff_ffff_ffff_ffff);
    x.mul_small(0xffff_ffff_ffff_ffff);
    x.mul_small(25);
    assert_eq!(x.get_part(0), 0x19);
    assert_eq!(x.get_part(1), 0xffff_ffff_ffff_ffce);
    assert_eq!(x.get_part(2), 0x18);
}

#[test]
fn test_add_sub_basic() {
    let mut x = BigInt::from_u64(0xffffffff00000000);
    x.add_small(0xffffffff);
    assert_eq!(x.get_part(0), 0xffffffffffffffff);
    x.add_small(0xf);
    assert_eq!(x.get_part(0), 0xe);
    assert_eq!(x.get_part(1), 0x1);

    let borrow = x.inplace_sub(&BigInt::from_u64(0xf));
    assert!(!borrow);
    assert_eq!(x.get_part(0), 0xffffffffffffffff);
    assert_eq!(x.get_part(1), 0);
    assert_eq!(x.msb_index(), 64);
}

#[test]
fn test_div_bounded() {
    let mut x = BigInt::from_u64(703);
    let q = x.inplace_div_bounded(&BigInt::from_u64(7), 8);
    assert_eq!(q, 100);
    assert_eq!(x.as_u64(), 3);

    // (10^40 + 12345) / 10^30 = 10^10, remainder 12345.
    let mut x = BigInt::pow10(40);
    x.add_small(12345);
    let q = x.inplace_div_bounded(&BigInt::pow10(30), 34);
    assert_eq!(q, 10_000_000_000);
    assert_eq!(x, BigInt::from_u64(12345));
}

#[test]
fn test_loss_against() {
    let ten = BigInt::from_u64(10);
    assert_eq!(
        BigInt::zero().loss_against(&ten),
        LossFraction::ExactlyZero
    );
    assert_eq!(
        BigInt::from_u64(4).loss_against(&ten),
        LossFraction::LessThanHalf
    );
    assert!(BigInt::from_u64(5).loss_against(&ten).is_exactly_half());
    assert!(BigInt::from_u64(6).loss_against(&ten).is_mt_half());
    assert!(LossFraction::ExactlyHalf.with_sticky(true).is_mt_half());
    assert_eq!(
        LossFraction::ExactlyZero.with_sticky(true),
        LossFraction::LessThanHalf
    );
}

#[test]
fn test_compare() {
    let mut a = BigInt::pow10(25);
    let b = BigInt::pow10(25);
    assert_eq!(a, b);
    a.add_small(1);
    assert!(a > b);
    assert!(BigInt::from_u64(3) < BigInt::pow10(20));
}

//! This file contains the bit-level primitives that the converters share,
//! and a small random number generator used by tests and benchmarks.

/// Returns a mask full of 1s, of `b` bits.
pub fn mask(b: u32) -> u64 {
    if b >= u64::BITS {
        return u64::MAX;
    }
    (1 << b) - 1
}

/// Counts the leading zeros of a 32-bit word. Zero has 32 leading zeros.
pub fn clz32(v: u32) -> u32 {
    v.leading_zeros()
}

/// Counts the leading zeros of a 64-bit word. Zero has 64 leading zeros.
pub fn clz64(v: u64) -> u32 {
    v.leading_zeros()
}

/// Multiply a and b, and return the (low, high) parts.
/// The product is assembled from the 32-bit halves of the operands, so the
/// result does not depend on a native 128-bit multiplier.
pub fn mul_part(a: u64, b: u64) -> (u64, u64) {
    let half_bits = u64::BITS / 2;
    let half_mask = (1 << half_bits) - 1;

    let a_lo = a & half_mask;
    let a_hi = a >> half_bits;
    let b_lo = b & half_mask;
    let b_hi = b >> half_bits;

    let ab_hi = a_hi * b_hi;
    let ab_mid = a_hi * b_lo;
    let ba_mid = b_hi * a_lo;
    let ab_low = a_lo * b_lo;

    let carry =
        ((ab_mid & half_mask) + (ba_mid & half_mask) + (ab_low >> half_bits))
            >> half_bits;
    let low = (ab_mid << half_bits)
        .wrapping_add(ba_mid << half_bits)
        .wrapping_add(ab_low);

    let high = (ab_hi + (ab_mid >> half_bits) + (ba_mid >> half_bits)) + carry;
    (low, high)
}

/// Computes `value * mul + add` and returns None if the result does not fit
/// in an unsigned integer of `bits` bits.
pub fn checked_mul_add(value: u64, mul: u64, add: u64, bits: u32) -> Option<u64> {
    let (low, high) = mul_part(value, mul);
    if high != 0 {
        return None;
    }
    let (sum, overflow) = low.overflowing_add(add);
    if overflow || sum > mask(bits) {
        return None;
    }
    Some(sum)
}

#[test]
fn test_masking() {
    assert_eq!(mask(0), 0x0);
    assert_eq!(mask(1), 0x1);
    assert_eq!(mask(8), 255);
    assert_eq!(mask(64), u64::MAX);
}

#[test]
fn test_clz() {
    assert_eq!(clz32(1), 31);
    assert_eq!(clz32(0x8000_0000), 0);
    assert_eq!(clz32(0), 32);
    assert_eq!(clz64(1), 63);
    assert_eq!(clz64(0x0000_0100_0000_0000), 23);
    assert_eq!(clz64(0), 64);
}

/// Linear-feedback shift register. We use this as a deterministic random
/// number generator for tests.
#[cfg(test)]
pub struct Lfsr {
    state: u32,
}

#[cfg(test)]
impl Default for Lfsr {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
impl Lfsr {
    /// Generate a new LFSR number generator.
    pub fn new() -> Lfsr {
        Lfsr { state: 0x13371337 }
    }

    /// Generate a new LFSR number generator that starts with a specific state.
    pub fn new_with_seed(seed: u32) -> Lfsr {
        Lfsr {
            state: 0x13371337 ^ seed,
        }
    }

    fn step(&mut self) {
        let a = (self.state >> 24) & 1;
        let b = (self.state >> 23) & 1;
        let c = (self.state >> 22) & 1;
        let d = (self.state >> 17) & 1;
        let n = a ^ b ^ c ^ d ^ 1;
        self.state <<= 1;
        self.state |= n;
    }

    /// Returns the next 32 random bits.
    pub fn get(&mut self) -> u32 {
        let mut res: u32 = 0;
        for _ in 0..32 {
            self.step();
            res <<= 1;
            res ^= self.state & 0x1;
        }
        res
    }

    /// Returns the next 64 random bits.
    pub fn get64(&mut self) -> u64 {
        ((self.get() as u64) << 32) | self.get() as u64
    }
}

#[cfg(test)]
impl Iterator for Lfsr {
    type Item = u64;
    fn next(&mut self) -> Option<Self::Item> {
        Some(self.get64())
    }
}

#[test]
fn test_lfsr_balance() {
    let mut lfsr = Lfsr::new();

    // Count the number of items, and the number of 1s.
    let mut items = 0;
    let mut ones = 0;

    for _ in 0..10000 {
        let mut u = lfsr.get();
        for _ in 0..32 {
            items += 1;
            ones += u & 1;
            u >>= 1;
        }
    }
    // Make sure that we have around 50% 1s and 50% zeros.
    assert!((ones as f64) < (0.55 * items as f64));
    assert!((ones as f64) > (0.45 * items as f64));
}

#[test]
fn test_mul_parts() {
    let mut lfsr = Lfsr::new();

    for _ in 0..500 {
        let v0 = lfsr.get64();
        let v1 = lfsr.get64();
        let res = mul_part(v0, v1);
        let full = v0 as u128 * v1 as u128;
        assert_eq!(full as u64, res.0);
        assert_eq!((full >> 64) as u64, res.1);
    }
    assert_eq!(mul_part(u64::MAX, u64::MAX), (1, u64::MAX - 1));
}

#[test]
fn test_checked_mul_add_matches_wide() {
    let mut lfsr = Lfsr::new_with_seed(7);

    for bits in [8, 16, 32, 64] {
        for _ in 0..500 {
            let value = lfsr.get64() >> (lfsr.get() % 64);
            let mul = [2, 8, 10, 16][(lfsr.get() % 4) as usize];
            let add = (lfsr.get() % 16) as u64;
            let wide = value as u128 * mul as u128 + add as u128;
            let expected = if wide <= mask(bits) as u128 {
                Some(wide as u64)
            } else {
                None
            };
            assert_eq!(checked_mul_add(value, mul, add, bits), expected);
        }
    }
    assert_eq!(checked_mul_add(25, 10, 5, 8), Some(255));
    assert_eq!(checked_mul_add(25, 10, 6, 8), None);
    assert_eq!(checked_mul_add(u64::MAX / 10, 10, 5, 64), Some(u64::MAX));
    assert_eq!(checked_mul_add(u64::MAX / 10, 10, 6, 64), None);
}

//! Chained parsing of several literals from one buffer. The cursor only
//! remembers an offset into the borrowed input, so nothing is copied.

use super::error::{ConvError, ConvResult};
use super::float::Semantics;
use super::integer::{parse_decimal_u32, parse_u16, parse_u32, parse_u64};
use super::integer::{parse_u8, Parsed};
use super::parse::{parse_f16, parse_f32, parse_f64, parse_float_signed};

/// A position in a borrowed buffer. Every `next_*` method parses one
/// literal at the current position and moves past it. When parsing fails
/// the position does not move.
#[derive(Debug, Clone, Copy)]
pub struct Cursor<'a> {
    input: &'a [u8],
    pos: usize,
}

impl<'a> Cursor<'a> {
    pub fn new(input: &'a [u8]) -> Self {
        Cursor { input, pos: 0 }
    }

    /// Returns the offset of the next unconsumed byte.
    pub fn position(&self) -> usize {
        self.pos
    }

    /// Returns the unconsumed part of the buffer.
    pub fn remaining(&self) -> &'a [u8] {
        &self.input[self.pos..]
    }

    /// Returns true if the whole buffer was consumed.
    pub fn is_empty(&self) -> bool {
        self.pos == self.input.len()
    }

    fn advance<T>(
        &mut self,
        parse: impl FnOnce(&'a [u8]) -> ConvResult<Parsed<T>>,
    ) -> ConvResult<T> {
        let parsed = parse(self.remaining())?;
        self.pos += parsed.end;
        Ok(parsed.value)
    }

    pub fn next_u8(&mut self) -> ConvResult<u8> {
        self.advance(parse_u8)
    }

    pub fn next_u16(&mut self) -> ConvResult<u16> {
        self.advance(parse_u16)
    }

    pub fn next_u32(&mut self) -> ConvResult<u32> {
        self.advance(parse_u32)
    }

    pub fn next_u64(&mut self) -> ConvResult<u64> {
        self.advance(parse_u64)
    }

    /// Parse a decimal integer, without radix prefixes.
    pub fn next_decimal_u32(&mut self) -> ConvResult<u32> {
        self.advance(parse_decimal_u32)
    }

    /// Parse a half-precision float and return its encoding.
    pub fn next_f16(&mut self) -> ConvResult<u16> {
        self.advance(parse_f16)
    }

    pub fn next_f32(&mut self) -> ConvResult<f32> {
        self.advance(parse_f32)
    }

    pub fn next_f64(&mut self) -> ConvResult<f64> {
        self.advance(parse_f64)
    }

    /// Parse an optionally signed float with the semantics `sem` and return
    /// its encoding.
    pub fn next_float_signed(&mut self, sem: Semantics) -> ConvResult<u64> {
        self.advance(|input| parse_float_signed(input, sem))
    }

    /// Skip the bytes that match `pred`. Returns the number of bytes skipped.
    pub fn skip_while(&mut self, pred: impl Fn(u8) -> bool) -> usize {
        let skipped = self
            .remaining()
            .iter()
            .take_while(|c| pred(**c))
            .count();
        self.pos += skipped;
        skipped
    }

    /// Consume the byte `expected`. Fails with `InvalidBounds` at the end of
    /// the buffer and with `NoNumber` if a different byte is found.
    pub fn expect_byte(&mut self, expected: u8) -> ConvResult<()> {
        match self.remaining().first() {
            None => Err(ConvError::InvalidBounds),
            Some(c) if *c == expected => {
                self.pos += 1;
                Ok(())
            }
            Some(_) => Err(ConvError::NoNumber),
        }
    }
}

#[test]
fn test_cursor_chain() {
    let mut cur = Cursor::new(b"12,0x1f,3.5");
    assert_eq!(cur.next_u32(), Ok(12));
    assert_eq!(cur.position(), 2);
    assert_eq!(cur.expect_byte(b','), Ok(()));
    assert_eq!(cur.next_u8(), Ok(31));
    assert_eq!(cur.expect_byte(b','), Ok(()));
    assert_eq!(cur.next_f64(), Ok(3.5));
    assert!(cur.is_empty());
    assert_eq!(cur.next_u32(), Err(ConvError::InvalidBounds));
    assert_eq!(cur.expect_byte(b','), Err(ConvError::InvalidBounds));
}

#[test]
fn test_cursor_errors_keep_position() {
    let mut cur = Cursor::new(b"300 abc");
    assert_eq!(cur.next_u8(), Err(ConvError::OutOfRange));
    assert_eq!(cur.position(), 0);
    assert_eq!(cur.next_u16(), Ok(300));
    assert_eq!(cur.expect_byte(b','), Err(ConvError::NoNumber));
    assert_eq!(cur.position(), 3);
    assert_eq!(cur.skip_while(|c| c == b' '), 1);
    assert_eq!(cur.next_f32(), Err(ConvError::NoNumber));
    assert_eq!(cur.remaining(), b"abc");
}

#[test]
fn test_cursor_mixed() {
    use super::float::{FP16, FP32};

    let mut cur = Cursor::new(b"  -1.5e1 0x3C 1.0 7\0junk");
    let is_space = |c: u8| c == b' ';
    cur.skip_while(is_space);
    let val = cur.next_float_signed(FP32).unwrap();
    assert_eq!(f32::from_bits(val as u32), -15.0);
    cur.skip_while(is_space);
    assert_eq!(cur.next_u64(), Ok(0x3c));
    cur.skip_while(is_space);
    assert_eq!(cur.next_f16(), Ok(0x3c00));
    cur.skip_while(is_space);
    assert_eq!(cur.next_decimal_u32(), Ok(7));
    // The terminator ends the literal like any other non-digit.
    assert_eq!(cur.remaining(), b"\0junk");
    assert_eq!(cur.next_float_signed(FP16), Err(ConvError::NoNumber));
}

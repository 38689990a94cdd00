//! Locale-independent conversion between strings and numbers.
//!
//! The parsers read unsigned integers in C-style radix notation and IEEE-754
//! half, single and double precision floats, rounding exactly to the nearest
//! value. The formatters write integers in radix 2, 8, 10 or 16 and floats as
//! the shortest decimal strings that parse back to the same value. All of the
//! conversions work on fixed-size stack storage and report failures as
//! [`ConvError`] values.
//!
//! ```
//! use numstrconv::{format_f64, parse_f64, parse_u32};
//!
//! let num = parse_u32(b"0x1f,").unwrap();
//! assert_eq!((num.value, num.end), (31, 4));
//!
//! let val = parse_f64(b"0.1").unwrap().value;
//! let mut buf = [0u8; 32];
//! let len = format_f64(val, &mut buf, true).unwrap();
//! assert_eq!(&buf[..len], b"1e-01");
//! ```

mod bigint;
mod cursor;
mod error;
mod float;
mod integer;
mod parse;
mod string;
mod utils;

#[cfg(feature = "python")]
mod py;

pub use self::cursor::Cursor;
pub use self::error::{ConvError, ConvResult};
pub use self::float::{cast_bits, f32_to_half, half_to_f32};
pub use self::float::{Category, FloatBits, Semantics, FP16, FP32, FP64};
pub use self::integer::{format_u32, format_u64, u64_to_string, Parsed};
pub use self::integer::{parse_decimal_u32, parse_int_bits};
pub use self::integer::{parse_u16, parse_u32, parse_u64, parse_u8};
pub use self::parse::{parse_f16, parse_f32, parse_f64};
pub use self::parse::{parse_float_bits, parse_float_signed};
pub use self::string::{float_to_string, format_float_bits};
pub use self::string::{format_f16, format_f32, format_f64};
pub use self::utils::{checked_mul_add, clz32, clz64, mul_part};

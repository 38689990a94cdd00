use crate::{float_to_string, parse_float_signed, parse_int_bits};
use crate::{f32_to_half, half_to_f32, u64_to_string};
use crate::{ConvError, Semantics, FP16, FP32, FP64};
use pyo3::exceptions::PyValueError;
use pyo3::prelude::*;

impl From<ConvError> for PyErr {
    fn from(err: ConvError) -> PyErr {
        PyValueError::new_err(err.to_string())
    }
}

/// Returns the semantics for the float width name.
fn semantics_from_name(name: &str) -> PyResult<Semantics> {
    match name {
        "h" | "half" => Ok(FP16),
        "f" | "single" => Ok(FP32),
        "d" | "double" => Ok(FP64),
        _ => Err(PyValueError::new_err(format!(
            "unknown float width '{}': expected half, single or double",
            name
        ))),
    }
}

/// Parse an unsigned integer in C-style notation (0x, 0b, leading 0 for
/// octal).
///
/// Args:
///     text: The string to parse
///     bits: The width of the result: 8, 16, 32 or 64
///
/// Returns a tuple of the value and the offset where parsing stopped.
#[pyfunction]
#[pyo3(signature = (text, bits = 64))]
fn parse_uint(text: &str, bits: u32) -> PyResult<(u64, usize)> {
    if !matches!(bits, 8 | 16 | 32 | 64) {
        return Err(PyValueError::new_err(format!(
            "invalid width {}: expected 8, 16, 32 or 64",
            bits
        )));
    }
    let parsed = parse_int_bits(text.as_bytes(), bits)?;
    Ok((parsed.value, parsed.end))
}

/// Parse a float, with an optional sign, into the encoding of the nearest
/// value.
///
/// Args:
///     text: The string to parse
///     width: "half", "single" or "double"
///
/// Returns a tuple of the encoding and the offset where parsing stopped.
#[pyfunction]
#[pyo3(signature = (text, width = "double"))]
fn parse_float(text: &str, width: &str) -> PyResult<(u64, usize)> {
    let sem = semantics_from_name(width)?;
    let parsed = parse_float_signed(text.as_bytes(), sem)?;
    Ok((parsed.value, parsed.end))
}

/// Format an unsigned integer.
///
/// Args:
///     value: The integer to format
///     radix: 2, 8, 10 or 16
///     width: The minimum number of digits
///     prefix: Add the C-style radix marker
#[pyfunction]
#[pyo3(signature = (value, radix = 10, width = 0, prefix = false))]
fn format_uint(
    value: u64,
    radix: u32,
    width: usize,
    prefix: bool,
) -> PyResult<String> {
    Ok(u64_to_string(value, radix, width, prefix)?)
}

/// Format a float encoding as the shortest string that parses back to it.
///
/// Args:
///     bits: The encoding of the float
///     width: "half", "single" or "double"
///     scientific: Use the d.ddde+XX style
#[pyfunction]
#[pyo3(signature = (bits, width = "double", scientific = false))]
fn format_float(bits: u64, width: &str, scientific: bool) -> PyResult<String> {
    let sem = semantics_from_name(width)?;
    Ok(float_to_string(bits, sem, scientific)?)
}

/// Widen a half-precision encoding to a Python float.
#[pyfunction]
fn half_to_float(bits: u16) -> f64 {
    half_to_f32(bits) as f64
}

/// Returns the half-precision encoding nearest to 'val'.
#[pyfunction]
fn float_to_half(val: f32) -> u16 {
    f32_to_half(val)
}

#[pymodule]
fn _numstrconv(_py: Python, m: &Bound<'_, PyModule>) -> PyResult<()> {
    m.add_function(wrap_pyfunction!(parse_uint, m)?)?;
    m.add_function(wrap_pyfunction!(parse_float, m)?)?;
    m.add_function(wrap_pyfunction!(format_uint, m)?)?;
    m.add_function(wrap_pyfunction!(format_float, m)?)?;
    m.add_function(wrap_pyfunction!(half_to_float, m)?)?;
    m.add_function(wrap_pyfunction!(float_to_half, m)?)?;
    Ok(())
}

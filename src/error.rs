use thiserror::Error;

/// Errors reported by the parsers and formatters.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConvError {
    /// The input does not start with a literal of the requested kind.
    #[error("no number found")]
    NoNumber,

    /// An integer literal does not fit in the requested width.
    #[error("number out of range")]
    OutOfRange,

    #[error("invalid radix {0}: expected 2, 8, 10 or 16")]
    InvalidRadix(u32),

    /// The output, including the terminating NUL, needs `required` bytes.
    #[error("buffer too small: need {required} bytes, have {available}")]
    BufferTooSmall { required: usize, available: usize },

    /// There is no input left between the start position and the bound.
    #[error("invalid bounds: nothing to parse")]
    InvalidBounds,
}

/// Result type for the conversion operations.
pub type ConvResult<T> = Result<T, ConvError>;

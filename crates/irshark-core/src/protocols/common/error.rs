use thiserror::Error;

/// Errors raised while decoding a single field.
///
/// A `DecodeError` never escapes a frame: the layer that owns the field turns
/// it into a malformed item and keeps everything decoded so far.
///
/// # Examples
/// ```
/// use irshark_core::DecodeError;
///
/// let err = DecodeError::BufferUnderrun { offset: 4, needed: 2, remaining: 1 };
/// assert!(err.to_string().contains("buffer underrun"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DecodeError {
    #[error("buffer underrun at offset {offset}: need {needed} bytes, {remaining} remaining")]
    BufferUnderrun {
        offset: usize,
        needed: usize,
        remaining: usize,
    },
    #[error(
        "malformed {field} length at offset {offset}: declared {declared} bytes, {available} available"
    )]
    MalformedLength {
        field: &'static str,
        offset: usize,
        declared: usize,
        available: usize,
    },
}

impl DecodeError {
    /// Offset of the first byte that could not be decoded.
    pub fn offset(&self) -> usize {
        match self {
            DecodeError::BufferUnderrun { offset, .. } => *offset,
            DecodeError::MalformedLength { offset, .. } => *offset,
        }
    }
}

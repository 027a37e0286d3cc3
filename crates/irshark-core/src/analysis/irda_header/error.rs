use thiserror::Error;

/// Errors returned while stripping the Linux IrDA pseudo-header.
///
/// Note: this error type lives in an internal module; the example is
/// illustrative and not compiled as a public doctest.
///
/// # Examples
/// ```text
/// use irshark_core::analysis::irda_header::error::IrdaHeaderError;
///
/// let err = IrdaHeaderError::TooShort { needed: 16, actual: 3 };
/// assert!(err.to_string().contains("too short"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum IrdaHeaderError {
    #[error("pseudo-header too short: need {needed} bytes, got {actual}")]
    TooShort { needed: usize, actual: usize },
    #[error("unexpected protocol 0x{0:04x} in pseudo-header")]
    UnexpectedProtocol(u16),
}

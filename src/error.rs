//! Error taxonomy for request validation and synthesis.
//!
//! Every variant describes bad input. None of them is retryable, and all are
//! raised before any sample is generated.

use thiserror::Error;

/// Why a bitstream was rejected
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BitstreamError {
    #[error("bitstream is empty")]
    Empty,

    #[error("invalid character {ch:?} at position {position}, expected '0' or '1'")]
    InvalidChar { ch: char, position: usize },

    #[error("bitstream has {len} bits, limit is {max}")]
    TooLong { len: usize, max: usize },
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum SynthError {
    #[error("invalid bitstream: {0}")]
    InvalidBitstream(#[from] BitstreamError),

    #[error("invalid parameter '{name}': {reason}")]
    InvalidParameter { name: &'static str, reason: String },

    #[error("unsupported modulation scheme '{0}', expected one of ASK, FSK, PSK, PAM, PWM, PPM")]
    UnsupportedScheme(String),
}

impl SynthError {
    pub fn invalid_parameter(name: &'static str, reason: impl Into<String>) -> Self {
        Self::InvalidParameter {
            name,
            reason: reason.into(),
        }
    }

    /// Stable code surfaced to clients
    pub fn kind(&self) -> &'static str {
        match self {
            Self::InvalidBitstream(_) => "invalid_bitstream",
            Self::InvalidParameter { .. } => "invalid_parameter",
            Self::UnsupportedScheme(_) => "unsupported_scheme",
        }
    }
}

pub type Result<T> = std::result::Result<T, SynthError>;

/// Reject zero, negative, NaN and infinite values.
pub fn ensure_positive(name: &'static str, value: f64) -> Result<f64> {
    if !value.is_finite() {
        return Err(SynthError::invalid_parameter(
            name,
            format!("must be a finite number, got {value}"),
        ));
    }
    if value <= 0.0 {
        return Err(SynthError::invalid_parameter(
            name,
            format!("must be greater than 0, got {value}"),
        ));
    }
    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_codes() {
        let err = SynthError::from(BitstreamError::Empty);
        assert_eq!(err.kind(), "invalid_bitstream");
        assert_eq!(
            SynthError::invalid_parameter("frequency", "zero").kind(),
            "invalid_parameter"
        );
        assert_eq!(
            SynthError::UnsupportedScheme("XYZ".into()).kind(),
            "unsupported_scheme"
        );
    }

    #[test]
    fn test_ensure_positive() {
        assert_eq!(ensure_positive("amplitude", 2.5), Ok(2.5));
        assert!(ensure_positive("amplitude", 0.0).is_err());
        assert!(ensure_positive("amplitude", -1.0).is_err());
        assert!(ensure_positive("amplitude", f64::NAN).is_err());
        assert!(ensure_positive("amplitude", f64::INFINITY).is_err());
    }

    #[test]
    fn test_messages_name_the_problem() {
        let err = SynthError::from(BitstreamError::InvalidChar {
            ch: '2',
            position: 2,
        });
        assert_eq!(
            err.to_string(),
            "invalid bitstream: invalid character '2' at position 2, expected '0' or '1'"
        );
    }
}

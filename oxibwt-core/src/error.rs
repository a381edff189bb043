//! Error types for OxiBwt operations.
//!
//! Every error is terminal for the block being processed: stages validate
//! their own header before doing any work and abort on the first violation.

use thiserror::Error;

/// The main error type for OxiBwt operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum OxiBwtError {
    /// Block length exceeds the configured maximum.
    #[error("Input too large: {len} bytes exceeds maximum of {max}")]
    InputTooLarge {
        /// Length of the offending input (or declared length).
        len: usize,
        /// Configured maximum.
        max: usize,
    },

    /// BWT primary index outside `[0, n)`.
    #[error("Primary index {index} out of range for block of {len} bytes")]
    IndexOutOfRange {
        /// The decoded primary index.
        index: usize,
        /// Length of the transformed block.
        len: usize,
    },

    /// A stage header is structurally malformed.
    #[error("Invalid header: {message}")]
    InvalidHeader {
        /// Description of the header error.
        message: String,
    },

    /// The stream ends mid-pair or mid-header.
    #[error("Truncated input: need {needed} bytes, have {available}")]
    Truncated {
        /// Number of bytes needed to complete the current item.
        needed: usize,
        /// Number of bytes available.
        available: usize,
    },

    /// Rejected codec configuration.
    #[error("Invalid configuration: {message}")]
    InvalidConfig {
        /// Description of the configuration error.
        message: String,
    },
}

/// Coarse classification of an [`OxiBwtError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// See [`OxiBwtError::InputTooLarge`].
    InputTooLarge,
    /// See [`OxiBwtError::IndexOutOfRange`].
    IndexOutOfRange,
    /// See [`OxiBwtError::InvalidHeader`].
    InvalidHeader,
    /// See [`OxiBwtError::Truncated`].
    Truncated,
    /// See [`OxiBwtError::InvalidConfig`].
    InvalidConfig,
}

/// Result type alias for OxiBwt operations.
pub type Result<T> = std::result::Result<T, OxiBwtError>;

impl OxiBwtError {
    /// Create an input too large error.
    pub fn input_too_large(len: usize, max: usize) -> Self {
        Self::InputTooLarge { len, max }
    }

    /// Create an index out of range error.
    pub fn index_out_of_range(index: usize, len: usize) -> Self {
        Self::IndexOutOfRange { index, len }
    }

    /// Create an invalid header error.
    pub fn invalid_header(message: impl Into<String>) -> Self {
        Self::InvalidHeader {
            message: message.into(),
        }
    }

    /// Create a truncated input error.
    pub fn truncated(needed: usize, available: usize) -> Self {
        Self::Truncated { needed, available }
    }

    /// Create an invalid configuration error.
    pub fn invalid_config(message: impl Into<String>) -> Self {
        Self::InvalidConfig {
            message: message.into(),
        }
    }

    /// The coarse kind of this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::InputTooLarge { .. } => ErrorKind::InputTooLarge,
            Self::IndexOutOfRange { .. } => ErrorKind::IndexOutOfRange,
            Self::InvalidHeader { .. } => ErrorKind::InvalidHeader,
            Self::Truncated { .. } => ErrorKind::Truncated,
            Self::InvalidConfig { .. } => ErrorKind::InvalidConfig,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = OxiBwtError::input_too_large(300_000, 262_144);
        assert!(err.to_string().contains("300000"));

        let err = OxiBwtError::index_out_of_range(7, 3);
        assert!(err.to_string().contains("Primary index 7"));

        let err = OxiBwtError::invalid_header("bad length");
        assert!(err.to_string().contains("bad length"));

        let err = OxiBwtError::truncated(2, 1);
        assert!(err.to_string().contains("need 2 bytes"));
    }

    #[test]
    fn test_error_kind() {
        assert_eq!(
            OxiBwtError::input_too_large(1, 0).kind(),
            ErrorKind::InputTooLarge
        );
        assert_eq!(
            OxiBwtError::index_out_of_range(0, 0).kind(),
            ErrorKind::IndexOutOfRange
        );
        assert_eq!(
            OxiBwtError::invalid_header("x").kind(),
            ErrorKind::InvalidHeader
        );
        assert_eq!(OxiBwtError::truncated(1, 0).kind(), ErrorKind::Truncated);
        assert_eq!(
            OxiBwtError::invalid_config("x").kind(),
            ErrorKind::InvalidConfig
        );
    }
}

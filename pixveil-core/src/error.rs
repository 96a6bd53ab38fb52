use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StegoError {
    #[error("Message too large for this image: needs {needed_bits} bits, {available_bits} available")]
    CapacityExceeded {
        needed_bits: usize,
        available_bits: usize,
    },

    #[error("No hidden message found")]
    NotFound,

    #[error("Decryption failed: {0}")]
    CryptoFailure(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Pixel data mismatch: expected {expected} values for the given dimensions, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },
}

impl StegoError {
    /// True for failures a caller should present as "no hidden message found
    /// or wrong password" rather than as a usage error.
    pub fn is_recoverable(&self) -> bool {
        matches!(self, Self::NotFound | Self::CryptoFailure(_))
    }
}

pub type Result<T> = std::result::Result<T, StegoError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recoverable_errors() {
        assert!(StegoError::NotFound.is_recoverable());
        assert!(StegoError::CryptoFailure("bad padding".into()).is_recoverable());
        assert!(!StegoError::InvalidInput("empty message".into()).is_recoverable());
        assert!(!StegoError::CapacityExceeded {
            needed_bits: 16,
            available_bits: 8
        }
        .is_recoverable());
    }

    #[test]
    fn test_capacity_message_names_both_sizes() {
        let err = StegoError::CapacityExceeded {
            needed_bits: 120,
            available_bits: 96,
        };
        let text = err.to_string();
        assert!(text.contains("120") && text.contains("96"));
    }
}

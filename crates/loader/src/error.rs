//! Load-time error type.

use pm0_common::{DecodeError, MAX_CODE_LENGTH};
use thiserror::Error;

/// Errors surfaced while decoding a textual instruction stream.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LoadError {
    /// A complete field group failed instruction decoding.
    #[error("instruction {index}: {source}")]
    Decode {
        /// Zero-based index of the offending instruction.
        index: usize,
        /// The underlying decode failure.
        source: DecodeError,
    },

    /// The stream holds more instructions than code memory can address.
    #[error("program has {count} instructions, the maximum is {}", MAX_CODE_LENGTH)]
    TooManyInstructions {
        /// Number of complete instructions found in the stream.
        count: usize,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_includes_instruction_index() {
        let err = LoadError::Decode {
            index: 7,
            source: DecodeError::RegisterOutOfRange(16),
        };
        let text = err.to_string();
        assert!(text.contains("instruction 7"), "{text}");
        assert!(text.contains("16"), "{text}");
    }

    #[test]
    fn display_includes_capacity() {
        let err = LoadError::TooManyInstructions { count: 501 };
        let text = err.to_string();
        assert!(text.contains("501"), "{text}");
        assert!(text.contains("500"), "{text}");
    }
}

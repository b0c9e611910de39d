//! Error types for the disassembler

use thiserror::Error;

/// Fatal decode errors. Every run stops at the first one; whatever was
/// already written to the listing stays there.
#[derive(Debug, Error)]
pub enum DecodeError {
    #[error("Unknown instruction '{token}' at {position}")]
    UnknownInstruction { token: String, position: usize },

    #[error("Unknown operand '{token}' at position {position}")]
    UnknownOperand { token: String, position: usize },

    #[error("Malformed immediate: unexpected '{token}' at position {position}")]
    MalformedImmediate { token: String, position: usize },

    #[error("Incorrect symbol '{token}' at position {position}: expected a jump target")]
    InvalidJumpTarget { token: String, position: usize },

    #[error("Label '{label}' not found (jump at position {position})")]
    LabelNotFound { label: String, position: usize },

    /// `position` is signed so that computed returns to negative targets
    /// can be reported as-is.
    #[error("Cursor {position} out of bounds (program length {length})")]
    OutOfBounds { position: i64, length: usize },

    #[error("Computed return at position {position} popped an unknown target")]
    UnresolvedReturn { position: usize },

    #[error("Value {value} is not a printable character (position {position})")]
    InvalidCodePoint { value: i64, position: usize },

    #[error("Step limit of {limit} exceeded at position {position}")]
    StepLimitExceeded { limit: usize, position: usize },

    #[error("Listing I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("File not found: {0}")]
    FileNotFound(String),
}

impl DecodeError {
    pub(crate) fn out_of_bounds(position: usize, length: usize) -> Self {
        Self::OutOfBounds {
            position: i64::try_from(position).unwrap_or(i64::MAX),
            length,
        }
    }

    /// Cursor position the error refers to, when it has one.
    pub fn position(&self) -> Option<i64> {
        let position = match self {
            Self::UnknownInstruction { position, .. }
            | Self::UnknownOperand { position, .. }
            | Self::MalformedImmediate { position, .. }
            | Self::InvalidJumpTarget { position, .. }
            | Self::LabelNotFound { position, .. }
            | Self::UnresolvedReturn { position }
            | Self::InvalidCodePoint { position, .. }
            | Self::StepLimitExceeded { position, .. } => *position,
            Self::OutOfBounds { position, .. } => return Some(*position),
            Self::Io(_) | Self::FileNotFound(_) => return None,
        };
        i64::try_from(position).ok()
    }
}

pub type DecodeResult<T> = Result<T, DecodeError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = DecodeError::UnknownInstruction {
            token: "🦄".to_string(),
            position: 3,
        };
        assert_eq!(err.to_string(), "Unknown instruction '🦄' at 3");

        let err = DecodeError::LabelNotFound {
            label: "loop".to_string(),
            position: 7,
        };
        assert!(err.to_string().contains("'loop'"));
    }

    #[test]
    fn test_error_position() {
        let err = DecodeError::out_of_bounds(12, 10);
        assert_eq!(err.position(), Some(12));

        let err = DecodeError::FileNotFound("missing.emo".to_string());
        assert_eq!(err.position(), None);
    }
}

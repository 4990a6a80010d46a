//! Error types for tokenization

use crate::logging::{codes, Code};
use crate::utils::Position;
use thiserror::Error;

/// Result type for tokenizer operations
pub type LexResult<T> = Result<T, LexerError>;

/// Failures raised while tokenizing a stream
#[derive(Debug, Error)]
pub enum LexerError {
    /// Input matched the fallback error group
    #[error("Invalid token '{text}' at {position}")]
    InvalidToken { text: String, position: Position },

    #[error("Failed to read input: {0}")]
    Io(#[from] std::io::Error),

    #[error("Input is not valid UTF-8 at {position} (byte offset {offset})")]
    InvalidUtf8 { position: Position, offset: usize },

    #[error("Token starting at {position} is longer than {limit} bytes ({length} buffered)")]
    TokenTooLong {
        length: usize,
        limit: usize,
        position: Position,
    },

    #[error("Token producer panicked: {message}")]
    ProducerPanicked { message: String },
}

impl LexerError {
    pub fn invalid_utf8(position: Position) -> Self {
        Self::InvalidUtf8 {
            position,
            offset: position.offset,
        }
    }

    /// Position in the input the error refers to, when known
    pub fn position(&self) -> Option<Position> {
        match self {
            Self::InvalidToken { position, .. }
            | Self::InvalidUtf8 { position, .. }
            | Self::TokenTooLong { position, .. } => Some(*position),
            Self::Io(_) | Self::ProducerPanicked { .. } => None,
        }
    }

    /// Get error code for logging integration
    pub fn error_code(&self) -> Code {
        match self {
            Self::InvalidToken { .. } => codes::lexical::INVALID_TOKEN,
            Self::Io(_) => codes::stream::IO_FAILURE,
            Self::InvalidUtf8 { .. } => codes::lexical::INVALID_UTF8,
            Self::TokenTooLong { .. } => codes::lexical::TOKEN_TOO_LONG,
            Self::ProducerPanicked { .. } => codes::stream::PRODUCER_PANICKED,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_token_display() {
        let err = LexerError::InvalidToken {
            text: "#".to_string(),
            position: Position::new(2, 1, 3),
        };
        assert_eq!(err.to_string(), "Invalid token '#' at 1:3");
        assert_eq!(err.position().map(|p| p.offset), Some(2));
        assert_eq!(err.error_code(), codes::lexical::INVALID_TOKEN);
    }

    #[test]
    fn test_io_conversion() {
        let io = std::io::Error::new(std::io::ErrorKind::BrokenPipe, "gone");
        let err: LexerError = io.into();
        assert_eq!(err.error_code(), codes::stream::IO_FAILURE);
        assert!(err.position().is_none());
    }
}

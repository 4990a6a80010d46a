//! Options accepted by the stream tokenizer

use crate::config::compile_time::buffering::{DEFAULT_CHUNK_SIZE, MAX_TOKEN_LENGTH, MIN_CHUNK_SIZE};
use crate::config::LexerPreferences;
use crate::logging::{self, LoggingService};
use std::sync::Arc;

#[derive(Debug, Clone)]
pub struct TokenizerOptions {
    /// Nominal buffer size; never below `MIN_CHUNK_SIZE`
    pub chunk_size: usize,

    /// Produce tokens on a background thread
    pub multithreaded: bool,

    /// Longest token the buffer may grow to hold
    pub max_token_length: usize,

    pub logger: Arc<LoggingService>,
}

impl TokenizerOptions {
    pub fn new() -> Self {
        Self {
            chunk_size: DEFAULT_CHUNK_SIZE,
            multithreaded: false,
            max_token_length: MAX_TOKEN_LENGTH,
            logger: logging::disabled(),
        }
    }

    /// Options taken from runtime preferences
    pub fn from_preferences(preferences: &LexerPreferences) -> Self {
        Self {
            multithreaded: preferences.multithreaded,
            max_token_length: preferences.max_token_length,
            ..Self::new()
        }
        .with_chunk_size(preferences.chunk_size)
    }

    pub fn with_chunk_size(mut self, chunk_size: usize) -> Self {
        self.chunk_size = chunk_size.max(MIN_CHUNK_SIZE);
        self
    }

    pub fn with_multithreaded(mut self, multithreaded: bool) -> Self {
        self.multithreaded = multithreaded;
        self
    }

    pub fn with_max_token_length(mut self, max_token_length: usize) -> Self {
        self.max_token_length = max_token_length;
        self
    }

    pub fn with_logger(mut self, logger: Arc<LoggingService>) -> Self {
        self.logger = logger;
        self
    }
}

impl Default for TokenizerOptions {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_chunk_size_is_clamped() {
        let options = TokenizerOptions::new().with_chunk_size(0);
        assert_eq!(options.chunk_size, MIN_CHUNK_SIZE);
    }

    #[test]
    fn test_from_preferences() {
        let preferences = LexerPreferences {
            chunk_size: 16,
            use_fallback_error: true,
            multithreaded: true,
            custom_whitespace: None,
            require_whitespace_rule: false,
            max_token_length: 128,
        };
        let options = TokenizerOptions::from_preferences(&preferences);
        assert_eq!(options.chunk_size, 16);
        assert!(options.multithreaded);
        assert_eq!(options.max_token_length, 128);
    }
}

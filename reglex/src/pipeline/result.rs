use crate::logging::{codes, LoggingService};
use crate::tokens::{Token, INVALID_TOKEN};
use std::time::Duration;

/// Tokens of a whole input together with processing figures
#[derive(Debug, Clone)]
pub struct TokenizationResult {
    pub tokens: Vec<Token>,
    pub input_bytes: usize,
    pub processing_duration: Duration,
}

impl TokenizationResult {
    pub fn new(tokens: Vec<Token>, input_bytes: usize, processing_duration: Duration) -> Self {
        Self {
            tokens,
            input_bytes,
            processing_duration,
        }
    }

    pub fn token_count(&self) -> usize {
        self.tokens.len()
    }

    pub fn invalid_count(&self) -> usize {
        self.tokens.iter().filter(|t| t.id == INVALID_TOKEN).count()
    }

    pub fn log_success(&self, logger: &LoggingService, source: &str) {
        crate::log_success!(logger,
            codes::success::TOKENIZATION_COMPLETE,
            "Input tokenized",
            "source" => source,
            "tokens" => self.token_count(),
            "invalid" => self.invalid_count(),
            "duration_ms" => format!("{:.2}", self.processing_duration.as_secs_f64() * 1000.0)
        );
    }
}

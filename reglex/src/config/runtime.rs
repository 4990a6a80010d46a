// RUNTIME PREFERENCES (User Experience)

use super::compile_time::buffering::{DEFAULT_CHUNK_SIZE, MAX_TOKEN_LENGTH};
use crate::logging::LogLevel;
use serde::{Deserialize, Serialize};
use std::env;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LexerPreferences {
    /// Nominal read size of the streaming buffer
    pub chunk_size: usize,

    /// Whether unmatched input raises an error through the fallback group
    pub use_fallback_error: bool,

    /// Whether tokens are produced on a background thread
    pub multithreaded: bool,

    /// Whitespace pattern overriding both `\s+` and the grammar's whitespace rule
    pub custom_whitespace: Option<String>,

    /// Whether the grammar must declare its own whitespace rule
    pub require_whitespace_rule: bool,

    /// Longest token the tokenizer will buffer before giving up
    pub max_token_length: usize,
}

impl Default for LexerPreferences {
    fn default() -> Self {
        Self {
            chunk_size: env::var("REGLEX_CHUNK_SIZE")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(DEFAULT_CHUNK_SIZE),
            use_fallback_error: env::var("REGLEX_USE_FALLBACK_ERROR")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(false),
            multithreaded: env::var("REGLEX_MULTITHREADED")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(false),
            custom_whitespace: env::var("REGLEX_CUSTOM_WHITESPACE")
                .ok()
                .filter(|v| !v.is_empty()),
            require_whitespace_rule: env::var("REGLEX_REQUIRE_WHITESPACE_RULE")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(false),
            max_token_length: env::var("REGLEX_MAX_TOKEN_LENGTH")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(MAX_TOKEN_LENGTH),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoggingPreferences {
    /// Whether to emit JSON lines instead of plain text
    pub use_structured_logging: bool,

    /// Whether to log to the console at all
    pub enable_console_logging: bool,

    /// Minimum level that reaches the logger
    pub min_log_level: LogLevel,
}

impl Default for LoggingPreferences {
    fn default() -> Self {
        Self {
            use_structured_logging: env::var("REGLEX_LOGGING_USE_STRUCTURED")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(false),
            enable_console_logging: env::var("REGLEX_LOGGING_ENABLE_CONSOLE")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(false),
            min_log_level: env::var("REGLEX_LOGGING_MIN_LEVEL")
                .ok()
                .and_then(|v| parse_log_level(&v))
                .unwrap_or(LogLevel::Info),
        }
    }
}

/// Parse log level from string (used for environment variables)
pub fn parse_log_level(level: &str) -> Option<LogLevel> {
    match level.to_lowercase().as_str() {
        "error" | "0" => Some(LogLevel::Error),
        "warning" | "warn" | "1" => Some(LogLevel::Warning),
        "info" | "2" => Some(LogLevel::Info),
        "debug" | "3" => Some(LogLevel::Debug),
        _ => None,
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RuntimeConfig {
    pub lexer: LexerPreferences,
    pub logging: LoggingPreferences,
}

/// Environment variable names for configuration
pub mod env_vars {
    // Lexer
    pub const CHUNK_SIZE: &str = "REGLEX_CHUNK_SIZE";
    pub const USE_FALLBACK_ERROR: &str = "REGLEX_USE_FALLBACK_ERROR";
    pub const MULTITHREADED: &str = "REGLEX_MULTITHREADED";
    pub const CUSTOM_WHITESPACE: &str = "REGLEX_CUSTOM_WHITESPACE";
    pub const REQUIRE_WHITESPACE_RULE: &str = "REGLEX_REQUIRE_WHITESPACE_RULE";
    pub const MAX_TOKEN_LENGTH: &str = "REGLEX_MAX_TOKEN_LENGTH";

    // Logging
    pub const LOGGING_USE_STRUCTURED: &str = "REGLEX_LOGGING_USE_STRUCTURED";
    pub const LOGGING_ENABLE_CONSOLE: &str = "REGLEX_LOGGING_ENABLE_CONSOLE";
    pub const LOGGING_MIN_LEVEL: &str = "REGLEX_LOGGING_MIN_LEVEL";
}

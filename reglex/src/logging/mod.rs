//! Logging for the reglex compiler and tokenizer
//!
//! There is no process-wide logger: each `RegexCompiler` and
//! `StreamTokenizer` receives an `Arc<LoggingService>` through its options
//! and the `log_*!` macros take that service as their first argument.

pub mod codes;
pub mod events;
pub mod macros;
pub mod service;

use std::sync::Arc;

// Re-export main types
pub use codes::Code;
pub use events::{LogEvent, LogLevel};
#[cfg(feature = "logging")]
pub use service::LogCrateLogger;
pub use service::{
    ConsoleLogger, Logger, LoggingService, MemoryLogger, NullLogger, StructuredLogger,
};

/// Shared handle to a service that drops every event
pub fn disabled() -> Arc<LoggingService> {
    Arc::new(LoggingService::disabled())
}

/// Service configured from `REGLEX_LOGGING_*` environment variables
pub fn from_env() -> Arc<LoggingService> {
    let preferences = crate::config::LoggingPreferences::default();
    Arc::new(LoggingService::from_preferences(&preferences))
}

/// Service routed into the `log` facade
#[cfg(feature = "logging")]
pub fn log_facade(min_level: LogLevel) -> Arc<LoggingService> {
    Arc::new(LoggingService::new(Arc::new(LogCrateLogger), min_level))
}

/// Memory-backed service for tests and diagnostics
pub fn memory(min_level: LogLevel) -> (Arc<LoggingService>, Arc<MemoryLogger>) {
    let logger = Arc::new(MemoryLogger::new());
    let service = Arc::new(LoggingService::new(logger.clone(), min_level));
    (service, logger)
}

/// Shorten token text before it is placed in a log context
pub fn preview(text: &str) -> String {
    let limit = crate::config::compile_time::logging::MAX_LOGGED_TOKEN_PREVIEW;
    match text.char_indices().nth(limit) {
        Some((cut, _)) => format!("{}...", &text[..cut]),
        None => text.to_string(),
    }
}

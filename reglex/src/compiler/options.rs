//! Options accepted by the regex compiler

use crate::config::compile_time::compiler::{MAX_PATTERN_LENGTH, MAX_RULES, MAX_RULE_DEPTH};
use crate::config::LexerPreferences;
use crate::logging::{self, LoggingService};
use std::sync::Arc;

/// Pattern used between tokens when the grammar supplies none
pub const DEFAULT_WHITESPACE: &str = r"\s+";

#[derive(Debug, Clone)]
pub struct CompilerOptions {
    /// Append a single-character error group after the whitespace group
    pub use_fallback_error: bool,

    /// Whitespace pattern overriding `\s+` and the grammar's whitespace rule
    pub custom_whitespace: Option<String>,

    /// Fail when the grammar has no whitespace rule and no custom whitespace
    pub require_whitespace_rule: bool,

    pub max_rule_depth: usize,
    pub max_pattern_length: usize,
    pub max_rules: usize,

    pub logger: Arc<LoggingService>,
}

impl CompilerOptions {
    pub fn new() -> Self {
        Self {
            use_fallback_error: false,
            custom_whitespace: None,
            require_whitespace_rule: false,
            max_rule_depth: MAX_RULE_DEPTH,
            max_pattern_length: MAX_PATTERN_LENGTH,
            max_rules: MAX_RULES,
            logger: logging::disabled(),
        }
    }

    /// Options taken from runtime preferences
    pub fn from_preferences(preferences: &LexerPreferences) -> Self {
        Self {
            use_fallback_error: preferences.use_fallback_error,
            custom_whitespace: preferences.custom_whitespace.clone(),
            require_whitespace_rule: preferences.require_whitespace_rule,
            ..Self::new()
        }
    }

    pub fn with_fallback_error(mut self, enabled: bool) -> Self {
        self.use_fallback_error = enabled;
        self
    }

    pub fn with_custom_whitespace(mut self, pattern: impl Into<String>) -> Self {
        self.custom_whitespace = Some(pattern.into());
        self
    }

    pub fn with_required_whitespace_rule(mut self, required: bool) -> Self {
        self.require_whitespace_rule = required;
        self
    }

    pub fn with_logger(mut self, logger: Arc<LoggingService>) -> Self {
        self.logger = logger;
        self
    }
}

impl Default for CompilerOptions {
    fn default() -> Self {
        Self::new()
    }
}

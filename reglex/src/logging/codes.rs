//! Consolidated error codes and classification system
//!
//! Single source of truth for all codes emitted by the compiler and the
//! tokenizer, together with their behavioral metadata.

use std::collections::HashMap;
use std::sync::OnceLock;

// ============================================================================
// CODE WRAPPER TYPE
// ============================================================================

/// Universal code wrapper for both error and success codes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Code(&'static str);

impl Code {
    pub const fn new(code: &'static str) -> Self {
        Self(code)
    }

    pub fn as_str(&self) -> &'static str {
        self.0
    }
}

impl std::fmt::Display for Code {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

// ============================================================================
// ERROR CLASSIFICATION TYPES
// ============================================================================

/// Error severity levels
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Severity {
    Critical = 0,
    High = 1,
    Medium = 2,
    Low = 3,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Critical => "Critical",
            Severity::High => "High",
            Severity::Medium => "Medium",
            Severity::Low => "Low",
        }
    }
}

/// Complete metadata for an error code
#[derive(Debug, Clone)]
pub struct ErrorMetadata {
    pub code: &'static str,
    pub category: &'static str,
    pub severity: Severity,
    pub recoverable: bool,
    pub description: &'static str,
    pub recommended_action: &'static str,
}

impl ErrorMetadata {
    pub fn new(
        code: &'static str,
        category: &'static str,
        severity: Severity,
        recoverable: bool,
        description: &'static str,
        recommended_action: &'static str,
    ) -> Self {
        Self {
            code,
            category,
            severity,
            recoverable,
            description,
            recommended_action,
        }
    }
}

// ============================================================================
// ERROR CODE CONSTANTS
// ============================================================================

/// System error codes
pub mod system {
    use super::Code;

    pub const INTERNAL_ERROR: Code = Code::new("ERR001");
}

/// Grammar compilation error codes
pub mod grammar {
    use super::Code;

    pub const MISSING_WHITESPACE_RULE: Code = Code::new("E100");
    pub const CONFLICTING_DELIMITERS: Code = Code::new("E101");
    pub const UNDEFINED_RULE: Code = Code::new("E102");
    pub const RECURSIVE_RULE: Code = Code::new("E103");
    pub const INVALID_PATTERN: Code = Code::new("E104");
    pub const CAPTURING_GROUP: Code = Code::new("E105");
    pub const EMPTY_MATCH: Code = Code::new("E106");
    pub const DUPLICATE_RULE: Code = Code::new("E107");
    pub const RESERVED_TAG_ID: Code = Code::new("E108");
    pub const UNKNOWN_TAG: Code = Code::new("E109");
    pub const EMPTY_RULE: Code = Code::new("E110");
    pub const RULE_TOO_DEEP: Code = Code::new("E111");
    pub const PATTERN_TOO_LARGE: Code = Code::new("E112");
    pub const INVALID_DELIMITER_RULE: Code = Code::new("E113");
    pub const TOO_MANY_RULES: Code = Code::new("E114");
    pub const GRAMMAR_LOAD_FAILED: Code = Code::new("E115");
}

/// Tokenization error codes
pub mod lexical {
    use super::Code;

    pub const INVALID_TOKEN: Code = Code::new("E200");
    pub const TOKEN_TOO_LONG: Code = Code::new("E201");
    pub const INVALID_UTF8: Code = Code::new("E202");
}

/// Input stream and producer error codes
pub mod stream {
    use super::Code;

    pub const IO_FAILURE: Code = Code::new("E300");
    pub const PRODUCER_PANICKED: Code = Code::new("E301");
}

/// Success codes
pub mod success {
    use super::Code;

    pub const LEXICON_COMPILED: Code = Code::new("I001");
    pub const TOKENIZATION_COMPLETE: Code = Code::new("I002");
    pub const PRODUCER_STARTED: Code = Code::new("I003");
    pub const GRAMMAR_LOADED: Code = Code::new("I004");
}

// ============================================================================
// ERROR METADATA REGISTRY
// ============================================================================

/// Error metadata registry using OnceLock for thread safety
static ERROR_REGISTRY: OnceLock<HashMap<&'static str, ErrorMetadata>> = OnceLock::new();

fn get_error_registry() -> &'static HashMap<&'static str, ErrorMetadata> {
    ERROR_REGISTRY.get_or_init(|| {
        let entries = [
            ErrorMetadata::new(
                "ERR001",
                "System",
                Severity::Critical,
                false,
                "Critical internal error",
                "File a bug report with the grammar and input that triggered it",
            ),
            // Grammar
            ErrorMetadata::new(
                "E100",
                "Grammar",
                Severity::High,
                false,
                "Grammar declares no whitespace rule",
                "Add a <regex_delim> rule or disable require_whitespace_rule",
            ),
            ErrorMetadata::new(
                "E101",
                "Grammar",
                Severity::High,
                false,
                "Grammar declares both character and regex delimiters",
                "Keep either <delim>/<ignore> or <regex_delim>/<regex_ignore>",
            ),
            ErrorMetadata::new(
                "E102",
                "Grammar",
                Severity::High,
                false,
                "Nonterminal reference has no defining rule",
                "Define a rule for the referenced tag",
            ),
            ErrorMetadata::new(
                "E103",
                "Grammar",
                Severity::High,
                false,
                "Rule references itself through a cycle",
                "Replace the recursion with a repetition group",
            ),
            ErrorMetadata::new(
                "E104",
                "Grammar",
                Severity::High,
                false,
                "Rule pattern is not a valid regular expression",
                "Fix the literal pattern syntax",
            ),
            ErrorMetadata::new(
                "E105",
                "Grammar",
                Severity::High,
                false,
                "Rule pattern contains a capturing group",
                "Use non-capturing groups (?:...) inside literal patterns",
            ),
            ErrorMetadata::new(
                "E106",
                "Grammar",
                Severity::High,
                false,
                "Rule pattern matches the empty string",
                "Require at least one character in every token rule",
            ),
            ErrorMetadata::new(
                "E107",
                "Grammar",
                Severity::High,
                false,
                "Tag has more than one rule",
                "Merge the rules into one rule with several options",
            ),
            ErrorMetadata::new(
                "E108",
                "Grammar",
                Severity::High,
                false,
                "Tag id is reserved for sentinel tokens",
                "Use positive tag ids",
            ),
            ErrorMetadata::new(
                "E109",
                "Grammar",
                Severity::High,
                false,
                "Rule defines a tag missing from the tag table",
                "Declare the tag before defining its rule",
            ),
            ErrorMetadata::new(
                "E110",
                "Grammar",
                Severity::High,
                false,
                "Rule has no options or an empty option",
                "Give every option at least one token",
            ),
            ErrorMetadata::new(
                "E111",
                "Grammar",
                Severity::High,
                false,
                "Rule nesting exceeds the configured depth",
                "Flatten the grammar or raise max_rule_depth",
            ),
            ErrorMetadata::new(
                "E112",
                "Grammar",
                Severity::High,
                false,
                "Master pattern exceeds the configured size",
                "Simplify the grammar or raise max_pattern_length",
            ),
            ErrorMetadata::new(
                "E113",
                "Grammar",
                Severity::High,
                false,
                "Delimiter rule is not a single literal",
                "Define <delim> as one literal listing the delimiter characters",
            ),
            ErrorMetadata::new(
                "E114",
                "Grammar",
                Severity::High,
                false,
                "Grammar defines too many rules",
                "Split the grammar or raise max_rules",
            ),
            ErrorMetadata::new(
                "E115",
                "Grammar",
                Severity::High,
                false,
                "Grammar file could not be read or parsed",
                "Check the grammar file path and TOML syntax",
            ),
            // Lexical
            ErrorMetadata::new(
                "E200",
                "Lexical",
                Severity::Medium,
                true,
                "Input matches no token rule",
                "Fix the input or extend the grammar",
            ),
            ErrorMetadata::new(
                "E201",
                "Lexical",
                Severity::High,
                false,
                "Token exceeds the maximum buffered length",
                "Raise max_token_length or check for a runaway rule",
            ),
            ErrorMetadata::new(
                "E202",
                "Lexical",
                Severity::High,
                false,
                "Input is not valid UTF-8",
                "Convert the input to UTF-8",
            ),
            // Stream
            ErrorMetadata::new(
                "E300",
                "Stream",
                Severity::Critical,
                false,
                "Reading the input stream failed",
                "Check the input source",
            ),
            ErrorMetadata::new(
                "E301",
                "Stream",
                Severity::Critical,
                false,
                "Token producer thread panicked",
                "File a bug report with the grammar and input that triggered it",
            ),
        ];

        entries
            .into_iter()
            .map(|metadata| (metadata.code, metadata))
            .collect()
    })
}

// ============================================================================
// CLASSIFICATION FUNCTIONS
// ============================================================================

/// Get error metadata for a specific error code
pub fn get_error_metadata(code: &str) -> Option<&'static ErrorMetadata> {
    get_error_registry().get(code)
}

/// Get error severity from error code
pub fn get_severity(code: &str) -> Severity {
    get_error_registry()
        .get(code)
        .map(|metadata| metadata.severity)
        .unwrap_or(Severity::Low)
}

/// Check if error is recoverable
pub fn is_recoverable(code: &str) -> bool {
    get_error_registry()
        .get(code)
        .map(|metadata| metadata.recoverable)
        .unwrap_or(true)
}

/// Get human-readable description for error code
pub fn get_description(code: &str) -> &'static str {
    get_error_registry()
        .get(code)
        .map(|metadata| metadata.description)
        .unwrap_or("Unknown error")
}

/// Get recommended action for error code
pub fn get_action(code: &str) -> &'static str {
    get_error_registry()
        .get(code)
        .map(|metadata| metadata.recommended_action)
        .unwrap_or("No specific action available")
}

/// Get error category from error code
pub fn get_category(code: &str) -> &'static str {
    get_error_registry()
        .get(code)
        .map(|metadata| metadata.category)
        .unwrap_or("Unknown")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_error_code_has_metadata() {
        let codes = [
            system::INTERNAL_ERROR,
            grammar::MISSING_WHITESPACE_RULE,
            grammar::CONFLICTING_DELIMITERS,
            grammar::UNDEFINED_RULE,
            grammar::RECURSIVE_RULE,
            grammar::INVALID_PATTERN,
            grammar::CAPTURING_GROUP,
            grammar::EMPTY_MATCH,
            grammar::DUPLICATE_RULE,
            grammar::RESERVED_TAG_ID,
            grammar::UNKNOWN_TAG,
            grammar::EMPTY_RULE,
            grammar::RULE_TOO_DEEP,
            grammar::PATTERN_TOO_LARGE,
            grammar::INVALID_DELIMITER_RULE,
            grammar::TOO_MANY_RULES,
            grammar::GRAMMAR_LOAD_FAILED,
            lexical::INVALID_TOKEN,
            lexical::TOKEN_TOO_LONG,
            lexical::INVALID_UTF8,
            stream::IO_FAILURE,
            stream::PRODUCER_PANICKED,
        ];

        for code in codes {
            let metadata = get_error_metadata(code.as_str());
            assert!(metadata.is_some(), "missing metadata for {}", code);
            assert_eq!(metadata.unwrap().code, code.as_str());
        }
    }

    #[test]
    fn test_unknown_code_defaults() {
        assert_eq!(get_description("X999"), "Unknown error");
        assert_eq!(get_category("X999"), "Unknown");
        assert!(is_recoverable("X999"));
    }

    #[test]
    fn test_classification() {
        assert_eq!(get_category("E103"), "Grammar");
        assert_eq!(get_severity("ERR001"), Severity::Critical);
        assert!(is_recoverable(lexical::INVALID_TOKEN.as_str()));
        assert!(!is_recoverable(stream::IO_FAILURE.as_str()));
    }
}

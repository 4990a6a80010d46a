//! Error types for grammar compilation

use crate::grammar::TagId;
use crate::logging::{codes, Code};
use thiserror::Error;

/// Result type for grammar compilation
pub type CompileResult<T> = Result<T, GrammarError>;

/// Reasons a grammar model cannot be turned into a lexicon
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GrammarError {
    #[error("Grammar has no whitespace rule (add a <regex_delim> rule)")]
    MissingWhitespaceRule,

    #[error("Grammar declares both a character delimiter '{char_delimiter}' and a whitespace rule '{whitespace_rule}'")]
    ConflictingDelimiters {
        char_delimiter: String,
        whitespace_rule: String,
    },

    #[error("Rule '{rule}' references tag {reference}, which has no rule")]
    UndefinedRule { rule: String, reference: TagId },

    #[error("Rule '{rule}' is recursive: {cycle_description}")]
    RecursiveRule {
        rule: String,
        cycle: Vec<String>,
        cycle_description: String,
    },

    #[error("Rule '{rule}' has an invalid pattern '{pattern}': {message}")]
    InvalidPattern {
        rule: String,
        pattern: String,
        message: String,
    },

    #[error("Rule '{rule}' pattern '{pattern}' contains a capturing group")]
    CapturingGroup { rule: String, pattern: String },

    #[error("Rule '{rule}' pattern '{pattern}' matches the empty string")]
    EmptyMatch { rule: String, pattern: String },

    #[error("Tag {id} has more than one rule")]
    DuplicateRule { id: TagId },

    #[error("Tag '{name}' uses reserved id {id} (tag ids must be positive)")]
    ReservedTagId { id: TagId, name: String },

    #[error("Rule defines tag {id}, which is not declared")]
    UnknownTag { id: TagId },

    #[error("Rule '{rule}' has no options or an empty option")]
    EmptyRule { rule: String },

    #[error("Rule '{rule}' nests deeper than {max_depth} levels")]
    TooDeep { rule: String, max_depth: usize },

    #[error("Master pattern is {length} bytes, limit is {limit}")]
    PatternTooLarge { length: usize, limit: usize },

    #[error("Delimiter rule '{rule}' must be a single literal listing the delimiter characters")]
    InvalidDelimiterRule { rule: String },

    #[error("Grammar defines {count} rules, limit is {limit}")]
    TooManyRules { count: usize, limit: usize },
}

impl GrammarError {
    /// Build a recursion error from the rule path that closed the cycle
    pub fn recursive_rule(cycle: Vec<String>) -> Self {
        let rule = cycle.first().cloned().unwrap_or_default();
        let cycle_description = cycle.join(" -> ");
        Self::RecursiveRule {
            rule,
            cycle,
            cycle_description,
        }
    }

    pub fn invalid_pattern(rule: &str, pattern: &str, error: &regex::Error) -> Self {
        Self::InvalidPattern {
            rule: rule.to_string(),
            pattern: pattern.to_string(),
            message: error.to_string(),
        }
    }

    /// Get error code for logging integration
    pub fn error_code(&self) -> Code {
        match self {
            Self::MissingWhitespaceRule => codes::grammar::MISSING_WHITESPACE_RULE,
            Self::ConflictingDelimiters { .. } => codes::grammar::CONFLICTING_DELIMITERS,
            Self::UndefinedRule { .. } => codes::grammar::UNDEFINED_RULE,
            Self::RecursiveRule { .. } => codes::grammar::RECURSIVE_RULE,
            Self::InvalidPattern { .. } => codes::grammar::INVALID_PATTERN,
            Self::CapturingGroup { .. } => codes::grammar::CAPTURING_GROUP,
            Self::EmptyMatch { .. } => codes::grammar::EMPTY_MATCH,
            Self::DuplicateRule { .. } => codes::grammar::DUPLICATE_RULE,
            Self::ReservedTagId { .. } => codes::grammar::RESERVED_TAG_ID,
            Self::UnknownTag { .. } => codes::grammar::UNKNOWN_TAG,
            Self::EmptyRule { .. } => codes::grammar::EMPTY_RULE,
            Self::TooDeep { .. } => codes::grammar::RULE_TOO_DEEP,
            Self::PatternTooLarge { .. } => codes::grammar::PATTERN_TOO_LARGE,
            Self::InvalidDelimiterRule { .. } => codes::grammar::INVALID_DELIMITER_RULE,
            Self::TooManyRules { .. } => codes::grammar::TOO_MANY_RULES,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recursive_rule_description() {
        let err = GrammarError::recursive_rule(vec![
            "expr".to_string(),
            "term".to_string(),
            "expr".to_string(),
        ]);
        assert_eq!(
            err.to_string(),
            "Rule 'expr' is recursive: expr -> term -> expr"
        );
        assert_eq!(err.error_code(), codes::grammar::RECURSIVE_RULE);
    }

    #[test]
    fn test_codes_are_grammar_category() {
        let errors = [
            GrammarError::MissingWhitespaceRule,
            GrammarError::DuplicateRule { id: 1 },
            GrammarError::TooManyRules { count: 5, limit: 4 },
        ];
        for err in errors {
            assert_eq!(codes::get_category(err.error_code().as_str()), "Grammar");
        }
    }
}

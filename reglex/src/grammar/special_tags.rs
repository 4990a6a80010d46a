//! Tag names with a fixed meaning to the compiler
//!
//! Names are compared with `-` and `_` treated as the same character, so
//! `regex-delim` and `regex_delim` select the same behavior.

use serde::{Deserialize, Serialize};

/// Special tags recognized by name
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SpecialTag {
    /// Character-set delimiter: the rule lists the characters separating tokens
    Delim,
    /// Synonym of `Delim`
    Ignore,
    /// Whitespace rule: its pattern is skipped between tokens
    RegexDelim,
    /// Synonym of `RegexDelim`
    RegexIgnore,
}

impl SpecialTag {
    pub const ALL: [SpecialTag; 4] = [
        Self::Delim,
        Self::Ignore,
        Self::RegexDelim,
        Self::RegexIgnore,
    ];

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Delim => "delim",
            Self::Ignore => "ignore",
            Self::RegexDelim => "regex_delim",
            Self::RegexIgnore => "regex_ignore",
        }
    }

    /// Look up a tag name, treating `-` as `_`
    pub fn from_name(name: &str) -> Option<Self> {
        let normalized = name.trim().replace('-', "_");
        match normalized.as_str() {
            "delim" => Some(Self::Delim),
            "ignore" => Some(Self::Ignore),
            "regex_delim" => Some(Self::RegexDelim),
            "regex_ignore" => Some(Self::RegexIgnore),
            _ => None,
        }
    }

    /// Rule splits input on a character set
    pub const fn is_char_delimiter(self) -> bool {
        matches!(self, Self::Delim | Self::Ignore)
    }

    /// Rule supplies the whitespace pattern of the master regex
    pub const fn is_whitespace_rule(self) -> bool {
        matches!(self, Self::RegexDelim | Self::RegexIgnore)
    }
}

impl std::fmt::Display for SpecialTag {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Check if a tag name carries compiler meaning
pub fn is_special_tag(name: &str) -> bool {
    SpecialTag::from_name(name).is_some()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dash_and_underscore_are_equivalent() {
        assert_eq!(SpecialTag::from_name("regex-delim"), Some(SpecialTag::RegexDelim));
        assert_eq!(SpecialTag::from_name("regex_delim"), Some(SpecialTag::RegexDelim));
        assert_eq!(SpecialTag::from_name("regex-ignore"), Some(SpecialTag::RegexIgnore));
        assert_eq!(SpecialTag::from_name("delim"), Some(SpecialTag::Delim));
    }

    #[test]
    fn test_ordinary_names_are_not_special() {
        assert!(!is_special_tag("ident"));
        assert!(!is_special_tag("delimiter"));
        assert!(!is_special_tag("DELIM"));
    }

    #[test]
    fn test_classification() {
        for tag in SpecialTag::ALL {
            assert_ne!(tag.is_char_delimiter(), tag.is_whitespace_rule());
            assert_eq!(SpecialTag::from_name(tag.as_str()), Some(tag));
        }
    }
}

//! Grammar model consumed by the regex compiler
//!
//! A model is an ordered tag table plus an ordered rule table. Declaration
//! order matters: the compiler assembles token alternatives in rule order,
//! and the first alternative that matches wins.

use super::error::GrammarParseError;
use serde::{Deserialize, Serialize};

/// Tag identifier; doubles as the token id of the tag's rule
pub type TagId = i32;

/// Named grammar symbol
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Tag {
    pub id: TagId,
    pub name: String,
}

impl Tag {
    pub fn new(id: TagId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
        }
    }
}

/// Repetition applied to a group of tokens
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GroupKind {
    /// Exactly once
    #[default]
    One,
    /// Zero or one time
    Optional,
    /// Any number of times
    ZeroOrMore,
    /// At least once
    OneOrMore,
}

impl GroupKind {
    /// Regex quantifier appended to the group
    pub const fn quantifier(self) -> &'static str {
        match self {
            Self::One => "",
            Self::Optional => "?",
            Self::ZeroOrMore => "*",
            Self::OneOrMore => "+",
        }
    }
}

/// One element of a rule option
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GrammarToken {
    /// Terminal: regex pattern text inserted verbatim
    Literal(String),
    /// Nonterminal: the fragment of the referenced tag's rule
    Reference(TagId),
    /// Sequence of tokens under a repetition
    Group {
        #[serde(default)]
        kind: GroupKind,
        tokens: Vec<GrammarToken>,
    },
}

impl GrammarToken {
    pub fn literal(pattern: impl Into<String>) -> Self {
        Self::Literal(pattern.into())
    }

    pub fn reference(id: TagId) -> Self {
        Self::Reference(id)
    }

    pub fn group(kind: GroupKind, tokens: Vec<GrammarToken>) -> Self {
        Self::Group { kind, tokens }
    }

    pub fn as_literal(&self) -> Option<&str> {
        match self {
            Self::Literal(pattern) => Some(pattern),
            _ => None,
        }
    }
}

/// Definition of one tag: a list of alternative token sequences
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Rule {
    pub id: TagId,
    pub options: Vec<Vec<GrammarToken>>,
}

impl Rule {
    pub fn new(id: TagId, options: Vec<Vec<GrammarToken>>) -> Self {
        Self { id, options }
    }

    /// Rule with a single option holding a single literal
    pub fn literal(id: TagId, pattern: impl Into<String>) -> Self {
        Self::new(id, vec![vec![GrammarToken::literal(pattern)]])
    }

    /// The literal pattern when the rule is one option with one literal
    pub fn single_literal(&self) -> Option<&str> {
        match self.options.as_slice() {
            [option] => match option.as_slice() {
                [token] => token.as_literal(),
                _ => None,
            },
            _ => None,
        }
    }
}

/// Ordered tag and rule tables
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GrammarModel {
    #[serde(default)]
    pub tags: Vec<Tag>,
    #[serde(default)]
    pub rules: Vec<Rule>,
}

impl GrammarModel {
    pub fn new() -> Self {
        Self::default()
    }

    /// Declare a tag
    pub fn tag(mut self, id: TagId, name: impl Into<String>) -> Self {
        self.tags.push(Tag::new(id, name));
        self
    }

    /// Define a rule for an already declared tag
    pub fn rule(mut self, id: TagId, options: Vec<Vec<GrammarToken>>) -> Self {
        self.rules.push(Rule::new(id, options));
        self
    }

    /// Declare a tag together with a single-literal rule
    pub fn literal_rule(self, id: TagId, name: impl Into<String>, pattern: impl Into<String>) -> Self {
        self.tag(id, name)
            .rule(id, vec![vec![GrammarToken::literal(pattern)]])
    }

    pub fn tag_by_id(&self, id: TagId) -> Option<&Tag> {
        self.tags.iter().find(|tag| tag.id == id)
    }

    pub fn tag_by_name(&self, name: &str) -> Option<&Tag> {
        self.tags.iter().find(|tag| tag.name == name)
    }

    pub fn rule_by_id(&self, id: TagId) -> Option<&Rule> {
        self.rules.iter().find(|rule| rule.id == id)
    }

    /// Tag name for diagnostics, falling back to the numeric id
    pub fn display_name(&self, id: TagId) -> String {
        self.tag_by_id(id)
            .map(|tag| tag.name.clone())
            .unwrap_or_else(|| format!("#{}", id))
    }

    /// Parse a model from a TOML document
    pub fn from_toml_str(text: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(text)
    }

    /// Parse a model from a JSON document
    pub fn from_json_str(text: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(text)
    }

    /// Parse a JSON document when `text` starts with `{`, TOML otherwise
    pub fn parse(text: &str) -> Result<Self, GrammarParseError> {
        if text.trim_start().starts_with('{') {
            Ok(Self::from_json_str(text)?)
        } else {
            Ok(Self::from_toml_str(text)?)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> GrammarModel {
        GrammarModel::new()
            .literal_rule(1, "ident", r"\w+")
            .literal_rule(2, "operator", "[;+]")
    }

    #[test]
    fn test_lookups() {
        let grammar = sample();
        assert_eq!(grammar.tag_by_name("operator").map(|t| t.id), Some(2));
        assert_eq!(grammar.rule_by_id(1).and_then(Rule::single_literal), Some(r"\w+"));
        assert!(grammar.rule_by_id(3).is_none());
        assert_eq!(grammar.display_name(2), "operator");
        assert_eq!(grammar.display_name(9), "#9");
    }

    #[test]
    fn test_single_literal_requires_one_option_one_token() {
        let two_options = Rule::new(
            1,
            vec![
                vec![GrammarToken::literal("a")],
                vec![GrammarToken::literal("b")],
            ],
        );
        let two_tokens = Rule::new(
            1,
            vec![vec![GrammarToken::literal("a"), GrammarToken::reference(2)]],
        );
        assert!(two_options.single_literal().is_none());
        assert!(two_tokens.single_literal().is_none());
    }

    #[test]
    fn test_toml_grammar() {
        let text = r#"
            [[tags]]
            id = 1
            name = "word"

            [[tags]]
            id = 2
            name = "words"

            [[rules]]
            id = 1
            options = [[{ literal = "[a-z]+" }]]

            [[rules]]
            id = 2
            options = [[
                { reference = 1 },
                { group = { kind = "zero_or_more", tokens = [{ literal = "," }, { reference = 1 }] } },
            ]]
        "#;

        let grammar = GrammarModel::from_toml_str(text).unwrap();
        assert_eq!(grammar.tags.len(), 2);
        assert_eq!(
            grammar.rules[1].options[0][1],
            GrammarToken::group(
                GroupKind::ZeroOrMore,
                vec![GrammarToken::literal(","), GrammarToken::reference(1)]
            )
        );
    }

    #[test]
    fn test_json_grammar_defaults_group_kind() {
        let text = r#"{
            "tags": [{ "id": 1, "name": "pair" }],
            "rules": [{ "id": 1, "options": [[{ "group": { "tokens": [{ "literal": "ab" }] } }]] }]
        }"#;

        let grammar = GrammarModel::from_json_str(text).unwrap();
        assert_eq!(
            grammar.rules[0].options[0][0],
            GrammarToken::group(GroupKind::One, vec![GrammarToken::literal("ab")])
        );
    }
}

//! Tokenization strategies
//!
//! A strategy looks at the current window and decides what the tokenizer
//! does next. It never touches the buffer itself, so both strategies share
//! the tokenizer's refill and position bookkeeping.

use super::buffer::Window;
use crate::compiler::{CompiledLexicon, GroupRole, LexiconMode, Lookahead};
use crate::tokens::TokenId;
use regex_automata::hybrid::dfa::Cache;

/// Decision for the bytes at the cursor. Lengths are in bytes and always
/// fall on a character boundary of the window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    /// Emit a token of `len` bytes
    Emit { id: TokenId, len: usize },
    /// Discard `len` bytes of whitespace or delimiters
    Skip { len: usize },
    /// The answer depends on bytes not read yet
    NeedMore,
    /// Fatal: `len` bytes matched the error group
    Reject { len: usize },
    /// `len` bytes match nothing; emitted as an invalid token
    Invalid { len: usize },
}

pub trait TokenizeStrategy: Send {
    fn name(&self) -> &'static str;

    fn step(&mut self, lexicon: &CompiledLexicon, window: &Window<'_>) -> Step;
}

/// Pick the strategy matching how the lexicon was compiled
pub fn strategy_for(lexicon: &CompiledLexicon) -> Box<dyn TokenizeStrategy> {
    match &lexicon.mode {
        LexiconMode::Regex => Box::new(RegexStrategy::new()),
        LexiconMode::Delimiter { delimiters } => Box::new(DelimiterStrategy::new(delimiters)),
    }
}

fn first_char_len(text: &str) -> usize {
    text.chars().next().map(char::len_utf8).unwrap_or(0)
}

/// Anchored matching of the master regex at the cursor
///
/// A match is accepted only once the lexicon's prefix automaton shows that no
/// further input can change it. When the automaton is unavailable, a match
/// touching the end of the window, or a window matching nothing, waits for
/// more input instead.
#[derive(Debug, Default)]
pub struct RegexStrategy {
    cache: Option<Cache>,
}

impl RegexStrategy {
    pub fn new() -> Self {
        Self::default()
    }

    fn lookahead(&mut self, lexicon: &CompiledLexicon, window: &Window<'_>) -> Lookahead {
        if window.complete {
            return Lookahead::Settled;
        }
        if self.cache.is_none() {
            self.cache = lexicon.lookahead_cache();
        }
        match self.cache.as_mut() {
            Some(cache) => lexicon.lookahead(cache, window.text),
            None => Lookahead::Unknown,
        }
    }
}

impl TokenizeStrategy for RegexStrategy {
    fn name(&self) -> &'static str {
        "regex"
    }

    fn step(&mut self, lexicon: &CompiledLexicon, window: &Window<'_>) -> Step {
        let lookahead = self.lookahead(lexicon, window);
        if lookahead == Lookahead::Open {
            return Step::NeedMore;
        }

        let text = window.text;
        let captures = lexicon.master.captures(text);
        let len = captures
            .as_ref()
            .and_then(|captures| captures.get(0))
            .map(|m| m.end())
            .unwrap_or(0);

        let role = captures.as_ref().filter(|_| len > 0).and_then(|captures| {
            (1..=lexicon.group_count())
                .find(|group| captures.get(*group).is_some())
                .and_then(|group| lexicon.group_role(group))
        });

        if lookahead == Lookahead::Unknown {
            // The match may continue past what has been read so far
            if role.is_some() && len == text.len() {
                return Step::NeedMore;
            }
            let undecided = matches!(role, None | Some(GroupRole::Error));
            if undecided && !window.saturated {
                return Step::NeedMore;
            }
        }

        match role {
            Some(GroupRole::Token(id)) => Step::Emit { id, len },
            Some(GroupRole::Whitespace) => Step::Skip { len },
            Some(GroupRole::Error) => Step::Reject { len },
            None => Step::Invalid {
                len: first_char_len(text),
            },
        }
    }
}

/// Split on delimiter characters, then classify each run as a whole
#[derive(Debug, Clone)]
pub struct DelimiterStrategy {
    delimiters: String,
}

impl DelimiterStrategy {
    pub fn new(delimiters: &str) -> Self {
        Self {
            delimiters: delimiters.to_string(),
        }
    }

    fn is_delimiter(&self, ch: char) -> bool {
        self.delimiters.contains(ch)
    }

    fn classify(&self, lexicon: &CompiledLexicon, run: &str) -> Step {
        let len = run.len();
        match lexicon.rules.iter().find(|rule| rule.matches_whole(run)) {
            Some(rule) => Step::Emit { id: rule.id, len },
            None if lexicon.uses_fallback_error => Step::Reject { len },
            None => Step::Invalid { len },
        }
    }
}

impl TokenizeStrategy for DelimiterStrategy {
    fn name(&self) -> &'static str {
        "delimiter"
    }

    fn step(&mut self, lexicon: &CompiledLexicon, window: &Window<'_>) -> Step {
        let text = window.text;

        let leading = text
            .find(|ch| !self.is_delimiter(ch))
            .unwrap_or(text.len());
        if leading > 0 {
            return Step::Skip { len: leading };
        }

        match text.find(|ch| self.is_delimiter(ch)) {
            Some(end) => self.classify(lexicon, &text[..end]),
            None if !window.complete => Step::NeedMore,
            None => self.classify(lexicon, text),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compiler::{CompilerOptions, RegexCompiler};
    use crate::grammar::GrammarModel;

    fn lexicon(fallback: bool) -> CompiledLexicon {
        let grammar = GrammarModel::new()
            .literal_rule(1, "ident", r"\w+")
            .literal_rule(2, "operator", "[;+]");
        RegexCompiler::new(CompilerOptions::new().with_fallback_error(fallback))
            .compile(&grammar)
            .unwrap()
    }

    fn window(text: &str, complete: bool, saturated: bool) -> Window<'_> {
        Window {
            text,
            complete,
            saturated,
        }
    }

    #[test]
    fn test_regex_emits_and_skips() {
        let lexicon = lexicon(false);
        let mut strategy = RegexStrategy::new();

        assert_eq!(
            strategy.step(&lexicon, &window("ab;cd", true, true)),
            Step::Emit { id: 1, len: 2 }
        );
        assert_eq!(
            strategy.step(&lexicon, &window(";cd", true, true)),
            Step::Emit { id: 2, len: 1 }
        );
        assert_eq!(
            strategy.step(&lexicon, &window("  x", true, true)),
            Step::Skip { len: 2 }
        );
    }

    #[test]
    fn test_regex_waits_for_more_input() {
        let lexicon = lexicon(false);
        let mut strategy = RegexStrategy::new();

        assert_eq!(
            strategy.step(&lexicon, &window("abc", false, false)),
            Step::NeedMore
        );
        assert_eq!(
            strategy.step(&lexicon, &window("abc", true, true)),
            Step::Emit { id: 1, len: 3 }
        );
    }

    #[test]
    fn test_regex_unmatched_input() {
        let lexicon = lexicon(false);
        let mut strategy = RegexStrategy::new();

        // No rule can start with '#', so the answer is known without more input
        assert_eq!(
            strategy.step(&lexicon, &window("#x", false, false)),
            Step::Invalid { len: 1 }
        );
        assert_eq!(
            strategy.step(&lexicon, &window("€x", false, true)),
            Step::Invalid { len: 3 }
        );
    }

    #[test]
    fn test_regex_error_group() {
        let lexicon = lexicon(true);
        let mut strategy = RegexStrategy::new();

        assert_eq!(
            strategy.step(&lexicon, &window("#cd", true, true)),
            Step::Reject { len: 1 }
        );
        assert_eq!(
            strategy.step(&lexicon, &window("#cd", false, false)),
            Step::Reject { len: 1 }
        );
        assert_eq!(
            strategy.step(&lexicon, &window("#", false, false)),
            Step::NeedMore
        );
    }

    #[test]
    fn test_regex_waits_for_optional_suffix() {
        let grammar = GrammarModel::new()
            .literal_rule(1, "number", r"[0-9]+(?:\.[0-9]+)?")
            .literal_rule(2, "dot", r"\.");
        let lexicon = RegexCompiler::default().compile(&grammar).unwrap();
        let mut strategy = RegexStrategy::new();

        assert_eq!(
            strategy.step(&lexicon, &window("1234.", false, false)),
            Step::NeedMore
        );
        assert_eq!(
            strategy.step(&lexicon, &window("1234.5 ", false, false)),
            Step::Emit { id: 1, len: 6 }
        );
        assert_eq!(
            strategy.step(&lexicon, &window("1234.x", false, false)),
            Step::Emit { id: 1, len: 4 }
        );
    }

    #[test]
    fn test_regex_without_prefix_automaton_waits_for_full_window() {
        let mut lexicon = lexicon(false);
        lexicon.prefix_dfa = None;
        let mut strategy = RegexStrategy::new();

        assert_eq!(
            strategy.step(&lexicon, &window("ab;", false, false)),
            Step::Emit { id: 1, len: 2 }
        );
        assert_eq!(
            strategy.step(&lexicon, &window("ab", false, false)),
            Step::NeedMore
        );
        assert_eq!(
            strategy.step(&lexicon, &window("#x", false, false)),
            Step::NeedMore
        );
        assert_eq!(
            strategy.step(&lexicon, &window("#x", false, true)),
            Step::Invalid { len: 1 }
        );
    }

    #[test]
    fn test_delimiter_runs() {
        let lexicon = lexicon(false);
        let mut strategy = DelimiterStrategy::new(" ,");

        assert_eq!(
            strategy.step(&lexicon, &window(" ,ab", true, true)),
            Step::Skip { len: 2 }
        );
        assert_eq!(
            strategy.step(&lexicon, &window("ab,cd", true, true)),
            Step::Emit { id: 1, len: 2 }
        );
        assert_eq!(
            strategy.step(&lexicon, &window("a;b c", true, true)),
            Step::Invalid { len: 3 }
        );
        assert_eq!(
            strategy.step(&lexicon, &window("abc", false, false)),
            Step::NeedMore
        );
    }

    #[test]
    fn test_delimiter_fallback_rejects() {
        let lexicon = lexicon(true);
        let mut strategy = DelimiterStrategy::new(" ");

        assert_eq!(
            strategy.step(&lexicon, &window("a;b c", true, true)),
            Step::Reject { len: 3 }
        );
    }

    #[test]
    fn test_strategy_selection() {
        let grammar = GrammarModel::new()
            .literal_rule(1, "word", "[a-z]+")
            .literal_rule(2, "delim", " ");
        let delimited = RegexCompiler::default().compile(&grammar).unwrap();

        assert_eq!(strategy_for(&delimited).name(), "delimiter");
        assert_eq!(strategy_for(&lexicon(false)).name(), "regex");
    }
}

//! Compiled form of a grammar

use crate::grammar::TagId;
use regex::Regex;
use regex_automata::hybrid::dfa::{Cache, DFA};
use regex_automata::{Anchored, Input};

/// How the tokenizer splits input
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LexiconMode {
    /// Anchored matches of the master regex at the cursor
    Regex,
    /// Runs between delimiter characters, classified rule by rule
    Delimiter { delimiters: String },
}

/// One token rule after expansion
#[derive(Debug, Clone)]
pub struct CompiledRule {
    pub id: TagId,
    pub name: String,
    /// Fragment as inserted into the master pattern
    pub fragment: String,
    /// Fragment anchored at both ends, for whole-run classification
    pub compiled: Option<Regex>,
}

impl CompiledRule {
    /// Check whether `text` is exactly one token of this rule
    pub fn matches_whole(&self, text: &str) -> bool {
        self.compiled
            .as_ref()
            .map(|regex| regex.is_match(text))
            .unwrap_or(false)
    }
}

/// Whether input after a window can still change the match at its start
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Lookahead {
    /// No continuation changes the match, or the lack of one
    Settled,
    /// Some continuation could still match differently
    Open,
    /// The prefix automaton gave up on this window
    Unknown,
}

/// Master regex plus the capture group layout needed to classify matches
///
/// Capture group `i + 1` belongs to `token_type_ids[i]`. The whitespace
/// group follows the token groups, and the error group, when present, is
/// the last group.
#[derive(Debug, Clone)]
pub struct CompiledLexicon {
    pub master_pattern: String,
    pub master: Regex,
    /// Anchored lazy DFA over `master_pattern`, used to decide whether a
    /// match that stops inside the window is final
    pub prefix_dfa: Option<DFA>,
    pub token_type_ids: Vec<TagId>,
    pub space_group_index: usize,
    pub error_group_index: Option<usize>,
    pub uses_custom_whitespace: bool,
    pub uses_fallback_error: bool,
    pub whitespace_pattern: String,
    pub mode: LexiconMode,
    pub rules: Vec<CompiledRule>,
}

/// What a capture group stands for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GroupRole {
    Token(TagId),
    Whitespace,
    Error,
}

impl CompiledLexicon {
    /// Classify a 1-based capture group index
    pub fn group_role(&self, group: usize) -> Option<GroupRole> {
        if group == self.space_group_index {
            return Some(GroupRole::Whitespace);
        }
        if Some(group) == self.error_group_index {
            return Some(GroupRole::Error);
        }
        group
            .checked_sub(1)
            .and_then(|index| self.token_type_ids.get(index))
            .map(|id| GroupRole::Token(*id))
    }

    /// Number of capture groups, excluding the implicit whole-match group
    pub fn group_count(&self) -> usize {
        self.error_group_index.unwrap_or(self.space_group_index)
    }

    pub fn token_rule_count(&self) -> usize {
        self.token_type_ids.len()
    }

    pub fn rule(&self, id: TagId) -> Option<&CompiledRule> {
        self.rules.iter().find(|rule| rule.id == id)
    }

    pub fn is_delimiter_mode(&self) -> bool {
        matches!(self.mode, LexiconMode::Delimiter { .. })
    }

    /// Fresh cache for `lookahead`; one per tokenizer
    pub fn lookahead_cache(&self) -> Option<Cache> {
        self.prefix_dfa.as_ref().map(DFA::create_cache)
    }

    /// Run the prefix automaton over `text` from the cursor. Once the
    /// automaton is dead, the leftmost-first match within `text` can no
    /// longer change.
    pub fn lookahead(&self, cache: &mut Cache, text: &str) -> Lookahead {
        let Some(dfa) = &self.prefix_dfa else {
            return Lookahead::Unknown;
        };

        let input = Input::new(text).anchored(Anchored::Yes);
        let Ok(mut state) = dfa.start_state_forward(cache, &input) else {
            return Lookahead::Unknown;
        };

        for &byte in text.as_bytes() {
            if state.is_dead() {
                return Lookahead::Settled;
            }
            if state.is_quit() {
                return Lookahead::Unknown;
            }
            state = match dfa.next_state(cache, state, byte) {
                Ok(next) => next,
                Err(_) => return Lookahead::Unknown,
            };
        }

        if state.is_dead() {
            Lookahead::Settled
        } else if state.is_quit() {
            Lookahead::Unknown
        } else {
            Lookahead::Open
        }
    }
}

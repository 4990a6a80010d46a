//! Grammar model to master regex compilation

use super::error::{CompileResult, GrammarError};
use super::fragment::FragmentBuilder;
use super::lexicon::{CompiledLexicon, CompiledRule, LexiconMode};
use super::options::{CompilerOptions, DEFAULT_WHITESPACE};
use crate::grammar::{GrammarModel, Rule, SpecialTag, TagId};
use crate::logging::{codes, preview};
use crate::{log_debug, log_error, log_info, log_success, log_warning};
use regex::Regex;
use regex_automata::hybrid::{dfa::DFA, BuildError};
use std::collections::HashSet;

/// Single character, newline included
const ERROR_GROUP: &str = "((?s:.))";

/// Rules of a grammar sorted by the role they play in the lexicon
struct ClassifiedRules<'g> {
    tokens: Vec<(&'g Rule, &'g str)>,
    char_delimiters: Vec<(&'g Rule, &'g str)>,
    whitespace: Vec<(&'g Rule, &'g str)>,
}

pub struct RegexCompiler {
    options: CompilerOptions,
}

impl RegexCompiler {
    pub fn new(options: CompilerOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &CompilerOptions {
        &self.options
    }

    /// Compile a grammar into its master regex and group layout
    pub fn compile(&self, grammar: &GrammarModel) -> CompileResult<CompiledLexicon> {
        let logger = &self.options.logger;
        log_info!(logger, "Compiling grammar",
            "tags" => grammar.tags.len(),
            "rules" => grammar.rules.len(),
            "fallback_error" => self.options.use_fallback_error
        );

        match self.compile_grammar(grammar) {
            Ok(lexicon) => {
                log_success!(logger, codes::success::LEXICON_COMPILED, "Lexicon compiled",
                    "token_rules" => lexicon.token_rule_count(),
                    "pattern_length" => lexicon.master_pattern.len(),
                    "delimiter_mode" => lexicon.is_delimiter_mode()
                );
                Ok(lexicon)
            }
            Err(err) => {
                log_error!(logger, err.error_code(), &err.to_string());
                Err(err)
            }
        }
    }

    fn compile_grammar(&self, grammar: &GrammarModel) -> CompileResult<CompiledLexicon> {
        self.validate_tables(grammar)?;
        let classified = self.classify_rules(grammar)?;
        let builder = FragmentBuilder::new(grammar, self.options.max_rule_depth);

        let mode = self.lexicon_mode(&classified)?;
        let (whitespace_pattern, uses_custom_whitespace) =
            self.whitespace_pattern(&builder, &classified, &mode)?;

        let rules = classified
            .tokens
            .iter()
            .map(|(rule, name)| self.compile_rule(&builder, rule, name))
            .collect::<CompileResult<Vec<_>>>()?;

        self.assemble(rules, whitespace_pattern, uses_custom_whitespace, mode)
    }

    fn validate_tables(&self, grammar: &GrammarModel) -> CompileResult<()> {
        if grammar.rules.len() > self.options.max_rules {
            return Err(GrammarError::TooManyRules {
                count: grammar.rules.len(),
                limit: self.options.max_rules,
            });
        }

        if let Some(tag) = grammar.tags.iter().find(|tag| tag.id <= 0) {
            return Err(GrammarError::ReservedTagId {
                id: tag.id,
                name: tag.name.clone(),
            });
        }

        let mut seen: HashSet<TagId> = HashSet::new();
        for rule in &grammar.rules {
            if grammar.tag_by_id(rule.id).is_none() {
                return Err(GrammarError::UnknownTag { id: rule.id });
            }
            if !seen.insert(rule.id) {
                return Err(GrammarError::DuplicateRule { id: rule.id });
            }
        }

        Ok(())
    }

    fn classify_rules<'g>(&self, grammar: &'g GrammarModel) -> CompileResult<ClassifiedRules<'g>> {
        let mut classified = ClassifiedRules {
            tokens: Vec::new(),
            char_delimiters: Vec::new(),
            whitespace: Vec::new(),
        };

        for rule in &grammar.rules {
            let name = grammar
                .tag_by_id(rule.id)
                .map(|tag| tag.name.as_str())
                .ok_or(GrammarError::UnknownTag { id: rule.id })?;

            match SpecialTag::from_name(name) {
                Some(special) if special.is_char_delimiter() => {
                    classified.char_delimiters.push((rule, name))
                }
                Some(_) => classified.whitespace.push((rule, name)),
                None => classified.tokens.push((rule, name)),
            }
        }

        if let (Some((_, delimiter)), Some((_, whitespace))) = (
            classified.char_delimiters.first(),
            classified.whitespace.first(),
        ) {
            return Err(GrammarError::ConflictingDelimiters {
                char_delimiter: delimiter.to_string(),
                whitespace_rule: whitespace.to_string(),
            });
        }

        if self.options.require_whitespace_rule
            && self.options.custom_whitespace.is_none()
            && classified.char_delimiters.is_empty()
            && classified.whitespace.is_empty()
        {
            return Err(GrammarError::MissingWhitespaceRule);
        }

        Ok(classified)
    }

    fn lexicon_mode(&self, classified: &ClassifiedRules<'_>) -> CompileResult<LexiconMode> {
        if classified.char_delimiters.is_empty() {
            return Ok(LexiconMode::Regex);
        }

        let mut delimiters = String::new();
        for (rule, name) in &classified.char_delimiters {
            let literal = rule
                .single_literal()
                .ok_or_else(|| GrammarError::InvalidDelimiterRule {
                    rule: name.to_string(),
                })?;
            for ch in unescape_delimiters(literal).chars() {
                if !delimiters.contains(ch) {
                    delimiters.push(ch);
                }
            }
        }

        if delimiters.is_empty() {
            return Err(GrammarError::InvalidDelimiterRule {
                rule: classified.char_delimiters[0].1.to_string(),
            });
        }

        Ok(LexiconMode::Delimiter { delimiters })
    }

    fn whitespace_pattern(
        &self,
        builder: &FragmentBuilder<'_>,
        classified: &ClassifiedRules<'_>,
        mode: &LexiconMode,
    ) -> CompileResult<(String, bool)> {
        if let Some(custom) = &self.options.custom_whitespace {
            check_fragment("custom whitespace", custom)?;
            return Ok((custom.clone(), true));
        }

        if let LexiconMode::Delimiter { delimiters } = mode {
            let class: String = delimiters
                .chars()
                .map(|ch| regex::escape(ch.encode_utf8(&mut [0; 4])))
                .collect();
            return Ok((format!("[{}]+", class), false));
        }

        if classified.whitespace.is_empty() {
            return Ok((DEFAULT_WHITESPACE.to_string(), false));
        }

        let mut alternatives = Vec::with_capacity(classified.whitespace.len());
        for (rule, name) in &classified.whitespace {
            let fragment = builder.top_level(rule)?;
            check_fragment(name, &fragment)?;
            alternatives.push(fragment);
        }

        let pattern = if alternatives.len() == 1 {
            alternatives.remove(0)
        } else {
            alternatives
                .iter()
                .map(|fragment| format!("(?:{})", fragment))
                .collect::<Vec<_>>()
                .join("|")
        };
        Ok((pattern, false))
    }

    fn compile_rule(
        &self,
        builder: &FragmentBuilder<'_>,
        rule: &Rule,
        name: &str,
    ) -> CompileResult<CompiledRule> {
        let fragment = builder.top_level(rule)?;
        let compiled = check_fragment(name, &fragment)?;

        log_debug!(self.options.logger, "Compiled rule",
            "rule" => name,
            "id" => rule.id,
            "fragment" => preview(&fragment)
        );

        Ok(CompiledRule {
            id: rule.id,
            name: name.to_string(),
            fragment,
            compiled: Some(compiled),
        })
    }

    fn assemble(
        &self,
        rules: Vec<CompiledRule>,
        whitespace_pattern: String,
        uses_custom_whitespace: bool,
        mode: LexiconMode,
    ) -> CompileResult<CompiledLexicon> {
        let mut groups: Vec<String> = rules
            .iter()
            .map(|rule| format!("({})", rule.fragment))
            .collect();
        groups.push(format!("({})", whitespace_pattern));

        let space_group_index = rules.len() + 1;
        let error_group_index = if self.options.use_fallback_error {
            groups.push(ERROR_GROUP.to_string());
            Some(space_group_index + 1)
        } else {
            None
        };

        // Anchored: matches are always attempted at the cursor
        let master_pattern = format!(r"\A(?:{})", groups.join("|"));
        if master_pattern.len() > self.options.max_pattern_length {
            return Err(GrammarError::PatternTooLarge {
                length: master_pattern.len(),
                limit: self.options.max_pattern_length,
            });
        }

        let master = Regex::new(&master_pattern).map_err(|err| match err {
            regex::Error::CompiledTooBig(limit) => GrammarError::PatternTooLarge {
                length: master_pattern.len(),
                limit,
            },
            other => GrammarError::invalid_pattern("master", &master_pattern, &other),
        })?;

        let prefix_dfa = match build_prefix_dfa(&master_pattern) {
            Ok(dfa) => Some(dfa),
            Err(err) => {
                log_warning!(self.options.logger, "Prefix automaton unavailable, partial matches wait for a full window",
                    "error" => err
                );
                None
            }
        };

        Ok(CompiledLexicon {
            master_pattern,
            master,
            prefix_dfa,
            token_type_ids: rules.iter().map(|rule| rule.id).collect(),
            space_group_index,
            error_group_index,
            uses_custom_whitespace,
            uses_fallback_error: self.options.use_fallback_error,
            whitespace_pattern,
            mode,
            rules,
        })
    }
}

impl Default for RegexCompiler {
    fn default() -> Self {
        Self::new(CompilerOptions::default())
    }
}

/// Lazy DFA with the master's leftmost-first semantics. Unicode word
/// boundaries are accepted and make the automaton quit on non-ASCII input.
fn build_prefix_dfa(master_pattern: &str) -> Result<DFA, BuildError> {
    DFA::builder()
        .configure(DFA::config().unicode_word_boundary(true))
        .build(master_pattern)
}

/// Validate a fragment and return its fully anchored form
fn check_fragment(name: &str, fragment: &str) -> CompileResult<Regex> {
    let regex =
        Regex::new(fragment).map_err(|err| GrammarError::invalid_pattern(name, fragment, &err))?;

    if regex.captures_len() != 1 {
        return Err(GrammarError::CapturingGroup {
            rule: name.to_string(),
            pattern: fragment.to_string(),
        });
    }

    let anchored = Regex::new(&format!(r"\A(?:{})\z", fragment))
        .map_err(|err| GrammarError::invalid_pattern(name, fragment, &err))?;

    if anchored.is_match("") {
        return Err(GrammarError::EmptyMatch {
            rule: name.to_string(),
            pattern: fragment.to_string(),
        });
    }

    Ok(anchored)
}

/// Expand the escapes a delimiter literal may use to name its characters
fn unescape_delimiters(literal: &str) -> String {
    let mut out = String::new();
    let mut chars = literal.chars();
    while let Some(ch) = chars.next() {
        if ch != '\\' {
            out.push(ch);
            continue;
        }
        match chars.next() {
            Some('t') => out.push('\t'),
            Some('n') => out.push('\n'),
            Some('r') => out.push('\r'),
            Some('s') => out.push_str(" \t\n\r\x0b\x0c"),
            Some(other) => out.push(other),
            None => out.push('\\'),
        }
    }
    out
}

//! Rule to regex fragment expansion
//!
//! References are expanded inline, so the fragment of a rule is a regex over
//! terminals only. The path of rule ids leading to the current frame is
//! carried by value: each frame extends its own copy, which keeps sibling
//! references to the same rule legal while still catching cycles.

use super::error::{CompileResult, GrammarError};
use crate::grammar::{GrammarModel, GrammarToken, Rule, TagId};

pub(crate) struct FragmentBuilder<'g> {
    grammar: &'g GrammarModel,
    max_depth: usize,
}

impl<'g> FragmentBuilder<'g> {
    pub(crate) fn new(grammar: &'g GrammarModel, max_depth: usize) -> Self {
        Self { grammar, max_depth }
    }

    /// Fragment for a rule that the caller wraps in its own capture group
    pub(crate) fn top_level(&self, rule: &Rule) -> CompileResult<String> {
        self.rule_fragment(rule, &[], true)
    }

    fn rule_fragment(&self, rule: &Rule, path: &[TagId], top_level: bool) -> CompileResult<String> {
        if let Some(start) = path.iter().position(|id| *id == rule.id) {
            let cycle = path[start..]
                .iter()
                .chain(std::iter::once(&rule.id))
                .map(|id| self.grammar.display_name(*id))
                .collect();
            return Err(GrammarError::recursive_rule(cycle));
        }

        if path.len() >= self.max_depth {
            return Err(GrammarError::TooDeep {
                rule: self.grammar.display_name(rule.id),
                max_depth: self.max_depth,
            });
        }

        if rule.options.is_empty() {
            return Err(self.empty_rule(rule.id));
        }

        // Leaf rule
        if let Some(pattern) = rule.single_literal() {
            return Ok(if top_level {
                pattern.to_string()
            } else {
                format!("(?:{})", pattern)
            });
        }

        let mut frame = path.to_vec();
        frame.push(rule.id);

        let alternatives = rule
            .options
            .iter()
            .map(|option| {
                if option.is_empty() {
                    return Err(self.empty_rule(rule.id));
                }
                self.sequence(rule.id, option, &frame)
            })
            .collect::<CompileResult<Vec<_>>>()?;

        Ok(format!("(?:{})", alternatives.join("|")))
    }

    fn sequence(&self, owner: TagId, tokens: &[GrammarToken], frame: &[TagId]) -> CompileResult<String> {
        // A lone literal may contain top-level alternation; it is safe
        // verbatim only when nothing is concatenated next to it
        let lone = tokens.len() == 1;
        let mut out = String::new();
        for token in tokens {
            out.push_str(&self.token_fragment(owner, token, frame, lone)?);
        }
        Ok(out)
    }

    fn token_fragment(
        &self,
        owner: TagId,
        token: &GrammarToken,
        frame: &[TagId],
        lone: bool,
    ) -> CompileResult<String> {
        match token {
            GrammarToken::Literal(pattern) if lone => Ok(pattern.clone()),
            GrammarToken::Literal(pattern) => Ok(format!("(?:{})", pattern)),
            GrammarToken::Reference(id) => {
                let rule = self.grammar.rule_by_id(*id).ok_or_else(|| {
                    GrammarError::UndefinedRule {
                        rule: self.grammar.display_name(owner),
                        reference: *id,
                    }
                })?;
                self.rule_fragment(rule, frame, false)
            }
            GrammarToken::Group { kind, tokens } => {
                if tokens.is_empty() {
                    return Err(self.empty_rule(owner));
                }
                let inner = self.sequence(owner, tokens, frame)?;
                Ok(format!("(?:{}){}", inner, kind.quantifier()))
            }
        }
    }

    fn empty_rule(&self, id: TagId) -> GrammarError {
        GrammarError::EmptyRule {
            rule: self.grammar.display_name(id),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grammar::GroupKind;
    use assert_matches::assert_matches;

    fn build(grammar: &GrammarModel, id: TagId) -> CompileResult<String> {
        let rule = grammar.rule_by_id(id).unwrap();
        FragmentBuilder::new(grammar, 16).top_level(rule)
    }

    #[test]
    fn test_leaf_is_unwrapped_only_at_top_level() {
        let grammar = GrammarModel::new()
            .literal_rule(1, "digit", "[0-9]")
            .tag(2, "number")
            .rule(2, vec![vec![GrammarToken::reference(1), GrammarToken::reference(1)]]);

        assert_eq!(build(&grammar, 1).unwrap(), "[0-9]");
        assert_eq!(build(&grammar, 2).unwrap(), "(?:(?:[0-9])(?:[0-9]))");
    }

    #[test]
    fn test_options_and_groups() {
        let grammar = GrammarModel::new()
            .literal_rule(1, "word", "[a-z]+")
            .tag(2, "list")
            .rule(
                2,
                vec![
                    vec![
                        GrammarToken::reference(1),
                        GrammarToken::group(
                            GroupKind::ZeroOrMore,
                            vec![GrammarToken::literal(","), GrammarToken::reference(1)],
                        ),
                    ],
                    vec![GrammarToken::literal("nil|none")],
                ],
            );

        assert_eq!(
            build(&grammar, 2).unwrap(),
            "(?:(?:[a-z]+)(?:(?:,)(?:[a-z]+))*|nil|none)"
        );
    }

    #[test]
    fn test_group_quantifiers() {
        for (kind, expected) in [
            (GroupKind::One, "(?:(?:ab))"),
            (GroupKind::Optional, "(?:(?:ab)?)"),
            (GroupKind::ZeroOrMore, "(?:(?:ab)*)"),
            (GroupKind::OneOrMore, "(?:(?:ab)+)"),
        ] {
            let grammar = GrammarModel::new()
                .tag(1, "g")
                .rule(1, vec![vec![GrammarToken::group(kind, vec![GrammarToken::literal("ab")])]]);
            assert_eq!(build(&grammar, 1).unwrap(), expected);
        }
    }

    #[test]
    fn test_sibling_references_are_not_cycles() {
        let grammar = GrammarModel::new()
            .literal_rule(1, "a", "a")
            .tag(2, "b")
            .rule(2, vec![vec![GrammarToken::reference(1)], vec![GrammarToken::reference(1)]]);

        assert!(build(&grammar, 2).is_ok());
    }

    #[test]
    fn test_cycle_is_reported_with_path() {
        let grammar = GrammarModel::new()
            .tag(1, "expr")
            .tag(2, "term")
            .rule(1, vec![vec![GrammarToken::reference(2)]])
            .rule(2, vec![vec![GrammarToken::literal("x"), GrammarToken::reference(1)]]);

        assert_matches!(
            build(&grammar, 1),
            Err(GrammarError::RecursiveRule { cycle, .. }) if cycle == ["expr", "term", "expr"]
        );
    }

    #[test]
    fn test_direct_self_reference() {
        let grammar = GrammarModel::new()
            .tag(1, "loop")
            .rule(1, vec![vec![GrammarToken::literal("a"), GrammarToken::reference(1)]]);

        assert_matches!(build(&grammar, 1), Err(GrammarError::RecursiveRule { .. }));
    }

    #[test]
    fn test_undefined_reference() {
        let grammar = GrammarModel::new()
            .tag(1, "x")
            .rule(1, vec![vec![GrammarToken::reference(7)]]);

        assert_matches!(
            build(&grammar, 1),
            Err(GrammarError::UndefinedRule { reference: 7, .. })
        );
    }

    #[test]
    fn test_depth_limit() {
        let mut grammar = GrammarModel::new().literal_rule(1, "r1", "a");
        for id in 2..=6 {
            grammar = grammar
                .tag(id, format!("r{}", id))
                .rule(id, vec![vec![GrammarToken::reference(id - 1), GrammarToken::literal("b")]]);
        }

        let rule = grammar.rule_by_id(6).unwrap();
        assert!(FragmentBuilder::new(&grammar, 8).top_level(rule).is_ok());
        assert_matches!(
            FragmentBuilder::new(&grammar, 3).top_level(rule),
            Err(GrammarError::TooDeep { max_depth: 3, .. })
        );
    }

    #[test]
    fn test_empty_option_and_group() {
        let grammar = GrammarModel::new()
            .tag(1, "empty_option")
            .rule(1, vec![vec![GrammarToken::literal("a")], vec![]])
            .tag(2, "empty_group")
            .rule(2, vec![vec![GrammarToken::group(GroupKind::One, vec![])]])
            .tag(3, "no_options")
            .rule(3, vec![]);

        assert_matches!(build(&grammar, 1), Err(GrammarError::EmptyRule { .. }));
        assert_matches!(build(&grammar, 2), Err(GrammarError::EmptyRule { .. }));
        assert_matches!(build(&grammar, 3), Err(GrammarError::EmptyRule { .. }));
    }
}

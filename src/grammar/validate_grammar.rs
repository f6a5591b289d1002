use std::collections::BTreeSet;

use anyhow::anyhow;
use beau_collector::BeauCollector;

use super::{Grammar, Symbol};

type ValidateResult = Result<(), anyhow::Error>;

pub fn validate_grammar(g: &Grammar, start_symbol: &str) -> ValidateResult {
    let checks: [fn(&Grammar, &str) -> ValidateResult; 2] = [has_rules, starts_with_root];

    let _ = checks
        .into_iter()
        .map(|check| check(g, start_symbol))
        .bcollect::<Vec<_>>()?;

    Ok(())
}

fn has_rules(g: &Grammar, _start_symbol: &str) -> ValidateResult {
    if g.rules.is_empty() {
        Err(anyhow!("grammar and lexicon contain no rules"))
    } else {
        Ok(())
    }
}

fn starts_with_root(g: &Grammar, start_symbol: &str) -> ValidateResult {
    if !g.rules.is_empty() && g.start != start_symbol {
        Err(anyhow!(
            "Your first rule in the grammar file should begin with \"{start_symbol} ->\""
        ))
    } else {
        Ok(())
    }
}

/// Nonterminals used on some right-hand side but never defined, sorted.
pub fn undefined_nonterminals(g: &Grammar) -> Vec<String> {
    let mut missing = BTreeSet::new();

    for rule in &g.rules {
        for symbol in &rule.rhs {
            let Symbol::NonTerminal(name) = symbol else {
                continue;
            };

            if !g.is_defined(name) {
                missing.insert(name.clone());
            }
        }
    }

    missing.into_iter().collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grammar::build_grammar;

    #[test]
    fn first_rule_must_be_start() {
        let grammar = build_grammar("NP -> N\nS -> NP", "N -> 'cats'").unwrap();
        let error = validate_grammar(&grammar, "S").unwrap_err();
        assert!(format!("{error:#}").contains("should begin with \"S ->\""));

        assert!(validate_grammar(&grammar, "NP").is_ok());
    }

    #[test]
    fn empty_grammar_is_rejected() {
        assert!(validate_grammar(&Grammar::empty(), "S").is_err());
    }

    #[test]
    fn undefined_names_are_listed() {
        let grammar = build_grammar("S -> NP VP | NP Adv", "NP -> 'cats'").unwrap();
        assert_eq!(undefined_nonterminals(&grammar), vec!["Adv", "VP"]);
    }
}

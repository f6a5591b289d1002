pub mod chart;
mod parse;
mod validate_grammar;

use parse::grammar_parser::production;
pub use parse::{Grammar, Production, ProductionRhs, Rule, Symbol};

pub use chart::ChartParser;
pub use validate_grammar::{undefined_nonterminals, validate_grammar};

#[derive(thiserror::Error, Debug)]
pub enum GrammarError {
    #[error("failed to read {source_name} rule \"{rule}\": {reason}")]
    Syntax {
        source_name: &'static str,
        rule: String,
        reason: String,
    },
}

fn parse_productions(
    text: &str,
    source_name: &'static str,
) -> Result<Vec<Production>, GrammarError> {
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(|line| {
            production(line).map_err(|e| GrammarError::Syntax {
                source_name,
                rule: line.to_string(),
                reason: e.to_string(),
            })
        })
        .collect()
}

/// Builds a grammar from sanitized grammar and lexicon text. Phrase rules
/// come first, so the start symbol is the left-hand side of the first
/// grammar rule.
pub fn build_grammar(grammar_text: &str, lexicon_text: &str) -> Result<Grammar, GrammarError> {
    let mut productions = parse_productions(grammar_text, "grammar")?;
    productions.extend(parse_productions(lexicon_text, "lexicon")?);

    Ok(Grammar::new(productions))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn grammar_rules_precede_lexicon() {
        let grammar = build_grammar("S -> NP VP\n\nVP -> V", "NP -> 'cats'\nV -> 'sleep'").unwrap();
        assert_eq!(grammar.start, "S");
        assert_eq!(
            grammar.rules.iter().map(|r| r.lhs.as_str()).collect::<Vec<_>>(),
            vec!["S", "VP", "NP", "V"]
        );
    }

    #[test]
    fn syntax_error_names_the_rule() {
        match build_grammar("S -> NP", "N 'cat'") {
            Err(GrammarError::Syntax {
                source_name, rule, ..
            }) => {
                assert_eq!(source_name, "lexicon");
                assert_eq!(rule, "N 'cat'");
            }
            other => panic!("expected syntax error, got {other:?}"),
        }
    }
}

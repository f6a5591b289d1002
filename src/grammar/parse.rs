use std::collections::HashMap;

#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Symbol {
    NonTerminal(String),
    Terminal(String),
}

pub type ProductionRhs = Vec<Symbol>;

/// One source line: a left-hand side with its `|`-separated alternatives.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Production {
    pub lhs: String,
    pub rhs: Vec<ProductionRhs>,
}

/// A single alternative of a production.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Rule {
    pub lhs: String,
    pub rhs: ProductionRhs,
}

#[derive(Clone, Debug)]
pub struct Grammar {
    /// left-hand side of the first rule
    pub start: String,

    pub rules: Vec<Rule>,

    lookup: HashMap<String, Vec<usize>>,
}

peg::parser! {

    pub grammar grammar_parser() for str {

        rule name() -> String =
            s:$([c if !c.is_whitespace() && c != '\'' && c != '"' && c != '|']+) {?
                if s == "->" {
                    Err("nonterminal name")
                } else {
                    Ok(s.to_string())
                }
            }

        rule terminal() -> String =
            "'" s:$([^'\'']*) "'" { s.to_string() }
            /
            "\"" s:$([^'"']*) "\"" { s.to_string() }

        rule symbol() -> Symbol =
            t:terminal() {
                Symbol::Terminal(t)
            }/
            n:name() {
                Symbol::NonTerminal(n)
            }

        rule rhs() -> ProductionRhs =
            symbol() ** __

        rule more_rhs() -> ProductionRhs =
            _ "|" _ r:rhs() {r}

        pub rule production() -> Production =
            _ name:name() _ "->" _ first:rhs() rest:more_rhs()* _ {
                let mut rest = rest;
                rest.insert(0, first);
                Production { lhs: name, rhs: rest }
            }

        rule __() = quiet!{[' ' | '\t']+}

        rule _() = quiet!{[' ' | '\t']*}
    }
}

impl Grammar {
    pub fn new(productions: Vec<Production>) -> Self {
        let rules: Vec<Rule> = productions
            .into_iter()
            .flat_map(|production| {
                let lhs = production.lhs;
                production.rhs.into_iter().map(move |rhs| Rule {
                    lhs: lhs.clone(),
                    rhs,
                })
            })
            .collect();

        let mut lookup: HashMap<String, Vec<usize>> = HashMap::new();
        for (index, rule) in rules.iter().enumerate() {
            lookup.entry(rule.lhs.clone()).or_default().push(index);
        }

        let start = rules
            .first()
            .map(|rule| rule.lhs.clone())
            .unwrap_or_default();

        Grammar {
            start,
            rules,
            lookup,
        }
    }

    pub fn empty() -> Self {
        Self::new(vec![])
    }

    pub fn rules_for<'a>(&'a self, lhs: &str) -> impl Iterator<Item = &'a Rule> + 'a {
        self.lookup
            .get(lhs)
            .into_iter()
            .flatten()
            .map(move |&index| &self.rules[index])
    }

    pub fn is_defined(&self, name: &str) -> bool {
        self.lookup.contains_key(name)
    }

    pub fn has_terminal(&self, word: &str) -> bool {
        self.rules.iter().any(|rule| {
            rule.rhs
                .iter()
                .any(|symbol| matches!(symbol, Symbol::Terminal(w) if w == word))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::grammar_parser::production;
    use super::*;

    fn nt(name: &str) -> Symbol {
        Symbol::NonTerminal(name.to_string())
    }

    fn t(word: &str) -> Symbol {
        Symbol::Terminal(word.to_string())
    }

    #[test]
    fn phrase_rule_with_alternatives() {
        assert_eq!(
            production("NP -> Det N | N").unwrap(),
            Production {
                lhs: "NP".to_string(),
                rhs: vec![vec![nt("Det"), nt("N")], vec![nt("N")]],
            }
        );
    }

    #[test]
    fn lexical_rule_with_both_quotes() {
        assert_eq!(
            production("N -> 'cat'|\"dog\"").unwrap().rhs,
            vec![vec![t("cat")], vec![t("dog")]]
        );
    }

    #[test]
    fn trailing_bar_adds_empty_alternative() {
        assert_eq!(
            production("Adj -> 'big' |").unwrap().rhs,
            vec![vec![t("big")], vec![]]
        );
    }

    #[test]
    fn missing_arrow_is_an_error() {
        assert!(production("S NP VP").is_err());
        assert!(production("S -> -> VP").is_err());
    }

    #[test]
    fn rules_are_flattened_in_order() {
        let grammar = Grammar::new(vec![
            production("S -> NP VP").unwrap(),
            production("NP -> 'cats' | 'dogs'").unwrap(),
        ]);
        assert_eq!(grammar.start, "S");
        assert_eq!(grammar.rules.len(), 3);
        assert_eq!(grammar.rules_for("NP").count(), 2);
        assert_eq!(grammar.rules_for("VP").count(), 0);
        assert!(grammar.has_terminal("dogs"));
        assert!(!grammar.has_terminal("NP"));
    }
}

//! Bottom-up chart parser producing every parse of a sentence.
//!
//! Recognition fills a chart of `(nonterminal, start, end)` spans until no
//! rule adds anything new, which handles unit and empty rules. Trees are then
//! read off the chart. A derivation that needs a span while that same span is
//! still being expanded is cut, so cyclic grammars yield a finite set.

use std::collections::{BTreeSet, HashSet};

use itertools::Itertools;

use super::{Grammar, Symbol};
use crate::tree::ParseTree;

type Edge<'g> = (&'g str, usize, usize);

pub struct ChartParser<'g> {
    grammar: &'g Grammar,
}

struct Chart<'g, 't> {
    grammar: &'g Grammar,
    tokens: &'t [&'t str],
    edges: HashSet<Edge<'g>>,
}

impl<'g> ChartParser<'g> {
    pub fn new(grammar: &'g Grammar) -> Self {
        ChartParser { grammar }
    }

    /// All distinct parse trees covering `tokens`, rooted at the start symbol.
    pub fn parse(&self, tokens: &[&str]) -> Vec<ParseTree> {
        let mut chart = Chart::new(self.grammar, tokens);
        chart.recognize();

        let mut active = vec![];
        chart
            .trees(self.grammar.start.as_str(), 0, tokens.len(), &mut active)
            .into_iter()
            .unique_by(ParseTree::to_flat_string)
            .collect()
    }
}

impl<'g, 't> Chart<'g, 't> {
    fn new(grammar: &'g Grammar, tokens: &'t [&'t str]) -> Self {
        Chart {
            grammar,
            tokens,
            edges: HashSet::new(),
        }
    }

    fn recognize(&mut self) {
        let grammar = self.grammar;
        let mut changed = true;

        while changed {
            changed = false;
            for rule in &grammar.rules {
                for start in 0..=self.tokens.len() {
                    for end in self.match_sequence(&rule.rhs, start) {
                        if self.edges.insert((rule.lhs.as_str(), start, end)) {
                            changed = true;
                        }
                    }
                }
            }
        }
    }

    /// End positions reachable by matching `rhs` from `start` against the
    /// spans recognised so far.
    fn match_sequence(&self, rhs: &[Symbol], start: usize) -> BTreeSet<usize> {
        let mut positions = BTreeSet::from([start]);

        for symbol in rhs {
            let mut next = BTreeSet::new();
            for &pos in &positions {
                match symbol {
                    Symbol::Terminal(word) => {
                        if self.tokens.get(pos) == Some(&word.as_str()) {
                            next.insert(pos + 1);
                        }
                    }
                    Symbol::NonTerminal(name) => {
                        for end in pos..=self.tokens.len() {
                            if self.edges.contains(&(name.as_str(), pos, end)) {
                                next.insert(end);
                            }
                        }
                    }
                }
            }

            positions = next;
            if positions.is_empty() {
                break;
            }
        }

        positions
    }

    fn trees(
        &self,
        name: &'g str,
        start: usize,
        end: usize,
        active: &mut Vec<Edge<'g>>,
    ) -> Vec<ParseTree> {
        let edge = (name, start, end);
        if !self.edges.contains(&edge) || active.contains(&edge) {
            return vec![];
        }

        let grammar = self.grammar;
        active.push(edge);
        let mut trees = vec![];
        for rule in grammar.rules_for(name) {
            for children in self.sequences(&rule.rhs, start, end, active) {
                trees.push(ParseTree::node(name, children));
            }
        }
        active.pop();

        trees
    }

    /// Every way to derive `tokens[start..end]` from the symbol sequence.
    fn sequences(
        &self,
        rhs: &'g [Symbol],
        start: usize,
        end: usize,
        active: &mut Vec<Edge<'g>>,
    ) -> Vec<Vec<ParseTree>> {
        let Some((first, rest)) = rhs.split_first() else {
            return if start == end { vec![vec![]] } else { vec![] };
        };

        let mut out = vec![];
        match first {
            Symbol::Terminal(word) => {
                if start < end && self.tokens[start] == word.as_str() {
                    for tail in self.sequences(rest, start + 1, end, active) {
                        let mut children = vec![ParseTree::leaf(word)];
                        children.extend(tail);
                        out.push(children);
                    }
                }
            }
            Symbol::NonTerminal(name) => {
                for mid in start..=end {
                    if !self.edges.contains(&(name.as_str(), start, mid)) {
                        continue;
                    }

                    let tails = self.sequences(rest, mid, end, active);
                    if tails.is_empty() {
                        continue;
                    }

                    for head in self.trees(name.as_str(), start, mid, active) {
                        for tail in &tails {
                            let mut children = vec![head.clone()];
                            children.extend(tail.iter().cloned());
                            out.push(children);
                        }
                    }
                }
            }
        }

        out
    }
}

/// Splits a sentence into the tokens the parser matches against terminals.
pub fn tokenize(sentence: &str) -> Vec<&str> {
    sentence.split_whitespace().collect()
}

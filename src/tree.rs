use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseSymbol {
    NonTerminal(String),
    Terminal(String),
}

impl fmt::Display for ParseSymbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParseSymbol::NonTerminal(s) => write!(f, "{}", s),
            ParseSymbol::Terminal(s) => write!(f, "{}", s),
        }
    }
}

/// A parse tree node. Leaves are terminal nodes without children.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseTree {
    pub name: ParseSymbol,
    pub children: Vec<ParseTree>,
}

impl ParseTree {
    pub fn node(name: &str, children: Vec<ParseTree>) -> Self {
        ParseTree {
            name: ParseSymbol::NonTerminal(name.to_string()),
            children,
        }
    }

    pub fn leaf(word: &str) -> Self {
        ParseTree {
            name: ParseSymbol::Terminal(word.to_string()),
            children: Vec::new(),
        }
    }

    pub fn is_leaf(&self) -> bool {
        matches!(self.name, ParseSymbol::Terminal(_))
    }

    /// Canonical one-line form, e.g. `(S (NP the cat) (VP sat))`.
    ///
    /// This is the string trees are compared by. A nonterminal without
    /// children prints as `(A )`.
    pub fn to_flat_string(&self) -> String {
        let mut out = String::new();
        self.write_flat(&mut out);
        out
    }

    fn write_flat(&self, out: &mut String) {
        if self.is_leaf() {
            out.push_str(&self.name.to_string());
            return;
        }

        out.push('(');
        out.push_str(&self.name.to_string());
        out.push(' ');
        for (i, child) in self.children.iter().enumerate() {
            if i > 0 {
                out.push(' ');
            }
            child.write_flat(out);
        }
        out.push(')');
    }

    /// Multi-line form used when writing parse tree files.
    ///
    /// A subtree stays on one line while it fits within `margin`; otherwise
    /// its children go on separate lines, indented two spaces deeper than
    /// the parent.
    pub fn pretty(&self, margin: usize) -> String {
        self.pretty_indent(margin, 0)
    }

    fn pretty_indent(&self, margin: usize, indent: usize) -> String {
        let flat = self.to_flat_string();
        if self.children.is_empty() || flat.len() + indent < margin {
            return flat;
        }

        let child_prefix = " ".repeat(indent + 2);
        let mut out = format!("({}", self.name);
        for child in &self.children {
            out.push('\n');
            out.push_str(&child_prefix);
            out.push_str(&child.pretty_indent(margin, indent + 2));
        }
        out.push(')');
        out
    }
}

impl fmt::Display for ParseTree {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_flat_string())
    }
}

//! Reader for parse tree files.
//!
//! A parse tree file lists sentences, each followed by either the literal
//! `No parses` or one or more bracketed trees. Trees may span several lines;
//! every continuation line must be indented by at least the number of
//! brackets still open. Trees are stored in their canonical one-line form so
//! that a file can be compared against freshly generated parses.
//!
//! ```text
//! % Jane Doe, janedoe, 1234567
//!
//! the cat sat
//! (S (NP the cat) (VP sat))
//! mice run
//! No parses
//! ```

use std::collections::BTreeSet;
use std::fmt;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};

use itertools::Itertools;
use vector_map::VecMap;

use crate::sanitize::strip_comment;

pub const NO_PARSES: &str = "No parses";

pub type TreeSet = BTreeSet<String>;

#[derive(thiserror::Error, Debug)]
pub enum TreeFileError {
    #[error("\"{}\" is not a file", .path.display())]
    NotFound { path: PathBuf },

    #[error("failed to read \"{}\": {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("{}:{line}: {reason}", .path.display())]
    Format {
        path: PathBuf,
        line: usize,
        reason: String,
    },
}

/// Sentences mapped to the set of trees recorded for them. An empty set
/// means the file said `No parses`. Iteration follows file order.
pub struct ParseForest {
    entries: VecMap<String, TreeSet>,
}

impl ParseForest {
    pub fn new() -> Self {
        Self {
            entries: VecMap::new(),
        }
    }

    pub fn get(&self, sentence: &str) -> Option<&TreeSet> {
        self.entries.get(sentence)
    }

    pub fn contains(&self, sentence: &str) -> bool {
        self.entries.contains_key(sentence)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &TreeSet)> {
        self.entries.iter()
    }

    pub fn sentences(&self) -> impl Iterator<Item = &String> {
        self.entries.keys()
    }

    fn commit(&mut self, sentence: String, trees: TreeSet) {
        self.entries.insert(sentence, trees);
    }
}

impl Default for ParseForest {
    fn default() -> Self {
        Self::new()
    }
}

impl PartialEq for ParseForest {
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len()
            && self
                .iter()
                .all(|(sentence, trees)| other.get(sentence) == Some(trees))
    }
}

impl Eq for ParseForest {}

impl fmt::Debug for ParseForest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}

/// Line-by-line state of a parse tree file read.
pub struct TreeFileReader {
    path: PathBuf,
    line: usize,

    /// brackets opened but not yet closed in `pending_tree`
    depth: usize,
    pending_tree: String,
    current_sentence: Option<String>,
    current_trees: TreeSet,
    result: ParseForest,
}

impl TreeFileReader {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        TreeFileReader {
            path: path.as_ref().to_path_buf(),
            line: 0,
            depth: 0,
            pending_tree: String::new(),
            current_sentence: None,
            current_trees: TreeSet::new(),
            result: ParseForest::new(),
        }
    }

    fn format_error(&self, reason: String) -> TreeFileError {
        TreeFileError::Format {
            path: self.path.clone(),
            line: self.line.max(1),
            reason,
        }
    }

    /// Feeds the next physical line (without its line terminator).
    pub fn feed_line(&mut self, raw: &str) -> Result<(), TreeFileError> {
        self.line += 1;

        let line = strip_comment(raw);
        let trimmed = line.trim();
        if trimmed.is_empty() {
            return Ok(());
        }

        let indent = line.chars().take_while(|c| c.is_whitespace()).count();
        if indent < self.depth {
            return Err(self.format_error(format!(
                "line does not start with expected indent ({})",
                self.depth
            )));
        }

        if trimmed.starts_with('(') || self.depth > 0 {
            self.push_tree_fragment(trimmed)
        } else {
            self.push_sentence_line(trimmed)
        }
    }

    fn push_tree_fragment(&mut self, fragment: &str) -> Result<(), TreeFileError> {
        if self.current_sentence.is_none() {
            return Err(self.format_error("no sentence associated with tree".to_string()));
        }

        let opened = fragment.matches('(').count() as i64;
        let closed = fragment.matches(')').count() as i64;
        let depth = self.depth as i64 + opened - closed;
        if depth < 0 {
            return Err(self.format_error(format!("too many right brackets ({})", -depth)));
        }

        if !self.pending_tree.is_empty() {
            self.pending_tree.push(' ');
        }
        self.pending_tree
            .push_str(&fragment.split_whitespace().join(" "));

        self.depth = depth as usize;
        if self.depth == 0 {
            self.current_trees
                .insert(std::mem::take(&mut self.pending_tree));
        }
        Ok(())
    }

    fn push_sentence_line(&mut self, line: &str) -> Result<(), TreeFileError> {
        match self.current_sentence.take() {
            None => self.start_sentence(line),
            Some(sentence) if !self.current_trees.is_empty() => {
                let trees = std::mem::take(&mut self.current_trees);
                self.result.commit(sentence, trees);
                self.start_sentence(line)
            }
            Some(sentence) if line == NO_PARSES => {
                self.result.commit(sentence, TreeSet::new());
                Ok(())
            }
            Some(_) => Err(self.format_error(
                "expected parse tree or \"No parses\". Got sentence".to_string(),
            )),
        }
    }

    fn start_sentence(&mut self, line: &str) -> Result<(), TreeFileError> {
        if self.result.contains(line) {
            return Err(self.format_error(format!("second occurrence of sentence (\"{line}\")")));
        }
        self.current_sentence = Some(line.to_string());
        Ok(())
    }

    /// Closes the last sentence block and returns the collected forest.
    pub fn finish(mut self) -> Result<ParseForest, TreeFileError> {
        let Some(sentence) = self.current_sentence.take() else {
            return Ok(self.result);
        };

        if !self.pending_tree.is_empty() {
            return Err(self.format_error("incomplete tree by end of file".to_string()));
        }
        if self.current_trees.is_empty() {
            return Err(self.format_error(format!(
                "no results for sentence \"{sentence}\" by end of file"
            )));
        }

        let trees = std::mem::take(&mut self.current_trees);
        self.result.commit(sentence, trees);
        Ok(self.result)
    }
}

/// Reads a parse tree file into a [`ParseForest`].
pub fn read<P: AsRef<Path>>(path: P) -> Result<ParseForest, TreeFileError> {
    let path = path.as_ref();
    if !path.is_file() {
        return Err(TreeFileError::NotFound {
            path: path.to_path_buf(),
        });
    }

    let file = File::open(path).map_err(|source| TreeFileError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    let mut reader = TreeFileReader::new(path);
    for line in BufReader::new(file).lines() {
        let line = line.map_err(|source| TreeFileError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        reader.feed_line(&line)?;
    }

    let forest = reader.finish()?;
    crate::log::log!(
        "read {} sentences from {}",
        forest.len(),
        path.display()
    );
    Ok(forest)
}

/// Parses parse tree file content held in memory. `path` only labels errors.
pub fn parse_str<P: AsRef<Path>>(path: P, text: &str) -> Result<ParseForest, TreeFileError> {
    let mut reader = TreeFileReader::new(path);
    for line in text.lines() {
        reader.feed_line(line)?;
    }
    reader.finish()
}

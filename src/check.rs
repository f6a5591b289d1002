//! The self-check run over a full submission.
//!
//! Validates the lexicon, grammar and sentence files, parses every sentence
//! and compares the results with an optional parse tree file and an optional
//! predictions file. The generated parse tree file is only written once every
//! check has passed.

use std::fmt::Display;
use std::path::{Path, PathBuf};

use itertools::Itertools;

use crate::configuration::CheckConfig;
use crate::grammar::{
    build_grammar, chart::tokenize, undefined_nonterminals, validate_grammar, ChartParser,
    GrammarError,
};
use crate::info::{info, InfoError, InfoTuple};
use crate::log::{log, warning};
use crate::sanitize::{
    sanitize_grammar, sanitize_lexicon, sanitize_predictions, sanitize_sentences, SanitizeError,
};
use crate::tree::ParseTree;
use crate::tree_file::{self, ParseForest, TreeFileError, TreeSet, NO_PARSES};

pub const PARSES: &str = "Parses";

#[derive(thiserror::Error, Debug)]
pub enum CheckError {
    #[error(transparent)]
    Sanitize(#[from] SanitizeError),

    #[error(transparent)]
    Info(#[from] InfoError),

    #[error(transparent)]
    TreeFile(#[from] TreeFileError),

    #[error(transparent)]
    Grammar(#[from] GrammarError),

    #[error("{0:#}")]
    InvalidGrammar(anyhow::Error),

    #[error("Number of sentences ({sentences}) does not match the number of predictions ({predictions})")]
    PredictionCount { sentences: usize, predictions: usize },

    #[error("\"{}\" trees for sentence \"{sentence}\" do not match output", .path.display())]
    Mismatch { path: PathBuf, sentence: String },

    #[error("\"{}\" has no entry for sentence \"{sentence}\"", .path.display())]
    MissingExpected { path: PathBuf, sentence: String },

    #[error("failed to write \"{}\": {source}", .path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Whether a sentence has at least one parse.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Outcome {
    Parses,
    NoParses,
}

impl Outcome {
    fn from_prediction(line: &str) -> Self {
        if line == NO_PARSES {
            Outcome::NoParses
        } else {
            Outcome::Parses
        }
    }
}

impl Display for Outcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Outcome::Parses => write!(f, "{PARSES}"),
            Outcome::NoParses => write!(f, "{NO_PARSES}"),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CheckRow {
    pub sentence: String,
    pub actual: Outcome,
    /// `None` when no predictions file was given
    pub expected: Option<Outcome>,
}

impl CheckRow {
    pub fn matches_prediction(&self) -> bool {
        self.expected.map_or(true, |expected| expected == self.actual)
    }
}

#[derive(Clone, Debug)]
pub struct CheckReport {
    pub info: InfoTuple,
    pub rows: Vec<CheckRow>,
    /// generated parse tree file content
    pub output: String,
}

/// Paths of the files making up one submission.
#[derive(Clone, Debug, Default)]
pub struct SelfCheck {
    pub lexicon: PathBuf,
    pub grammar: PathBuf,
    pub sentences: PathBuf,
    pub parse_trees: Option<PathBuf>,
    pub predictions: Option<PathBuf>,
    pub output: Option<PathBuf>,
}

struct Inputs {
    info: InfoTuple,
    lexicon_text: String,
    grammar_text: String,
    sentences: Vec<String>,
    expected: Option<ParseForest>,
    predictions: Option<Vec<Outcome>>,
}

impl SelfCheck {
    pub fn run(&self, config: &CheckConfig) -> Result<CheckReport, CheckError> {
        let inputs = self.load_inputs()?;

        let grammar = build_grammar(&inputs.grammar_text, &inputs.lexicon_text)?;
        validate_grammar(&grammar, &config.grammar.start_symbol)
            .map_err(CheckError::InvalidGrammar)?;
        log!("built grammar with {} rules", grammar.rules.len());

        for name in undefined_nonterminals(&grammar) {
            warning!("nonterminal \"{}\" is used but never defined", name);
        }
        self.warn_about_names(config);

        let parser = ChartParser::new(&grammar);
        let mut output = format!("% {}\n\n", inputs.info);
        let mut rows = vec![];

        for (index, sentence) in inputs.sentences.iter().enumerate() {
            let tokens = tokenize(sentence);
            let uncovered = tokens
                .iter()
                .filter(|word| !grammar.has_terminal(word))
                .unique()
                .join(", ");
            if !uncovered.is_empty() {
                warning!(
                    "grammar does not cover some of the words in \"{}\": {}",
                    sentence,
                    uncovered
                );
            }

            let trees = parser.parse(&tokens);
            let tree_strings: TreeSet = trees.iter().map(ParseTree::to_flat_string).collect();
            log!("\"{}\": {} parses", sentence, tree_strings.len());

            if let (Some(expected), Some(path)) = (&inputs.expected, &self.parse_trees) {
                compare_with_expected(expected, path, sentence, &tree_strings)?;
            }

            append_sentence_block(&mut output, sentence, &trees, config.output.margin);

            let actual = if trees.is_empty() {
                Outcome::NoParses
            } else {
                Outcome::Parses
            };
            rows.push(CheckRow {
                sentence: sentence.clone(),
                actual,
                expected: inputs
                    .predictions
                    .as_ref()
                    .and_then(|predictions| predictions.get(index).copied()),
            });
        }

        if let Some(path) = &self.output {
            std::fs::write(path, &output).map_err(|source| CheckError::Write {
                path: path.clone(),
                source,
            })?;
            log!("wrote parse trees to {}", path.display());
        }

        Ok(CheckReport {
            info: inputs.info,
            rows,
            output,
        })
    }

    fn load_inputs(&self) -> Result<Inputs, CheckError> {
        let info_tuple = info(&self.lexicon, None)?;
        let lexicon_text = sanitize_lexicon(&self.lexicon)?;

        info(&self.grammar, Some(&info_tuple))?;
        let grammar_text = sanitize_grammar(&self.grammar)?;

        info(&self.sentences, Some(&info_tuple))?;
        let sentences = sanitize_sentences(&self.sentences)?
            .lines()
            .map(str::to_string)
            .collect_vec();

        let expected = match &self.parse_trees {
            Some(path) => {
                info(path, Some(&info_tuple))?;
                Some(tree_file::read(path)?)
            }
            None => None,
        };

        let predictions = match &self.predictions {
            Some(path) => {
                let predictions = sanitize_predictions(path)?
                    .lines()
                    .map(Outcome::from_prediction)
                    .collect_vec();
                if predictions.len() != sentences.len() {
                    return Err(CheckError::PredictionCount {
                        sentences: sentences.len(),
                        predictions: predictions.len(),
                    });
                }
                Some(predictions)
            }
            None => None,
        };

        Ok(Inputs {
            info: info_tuple,
            lexicon_text,
            grammar_text,
            sentences,
            expected,
            predictions,
        })
    }

    fn warn_about_names(&self, config: &CheckConfig) {
        if let (Some(check), Some(output)) = (&self.parse_trees, &self.output) {
            if same_file(check, output) {
                warning!(
                    "You've pointed the output and check parse tree options to the same file path. \
                     I'm going to check before I output"
                );
            }
        }

        let names = &config.files;
        let mut expected = vec![
            (&self.lexicon, "lexicon", &names.lexicon),
            (&self.grammar, "grammar", &names.grammar),
            (&self.sentences, "sentences", &names.sentences),
        ];
        if let Some(path) = &self.parse_trees {
            expected.push((path, "parse trees", &names.parse_trees));
        }

        for (path, kind, name) in expected {
            if path.file_name().map_or(true, |file_name| file_name != name.as_str()) {
                warning!(
                    "Your {} file is not named \"{}\". Change this before submission",
                    kind,
                    name
                );
            }
        }
    }
}

fn same_file(first: &Path, second: &Path) -> bool {
    match (first.canonicalize(), second.canonicalize()) {
        (Ok(a), Ok(b)) => a == b,
        _ => first == second,
    }
}

fn compare_with_expected(
    expected: &ParseForest,
    path: &Path,
    sentence: &str,
    tree_strings: &TreeSet,
) -> Result<(), CheckError> {
    match expected.get(sentence) {
        None => Err(CheckError::MissingExpected {
            path: path.to_path_buf(),
            sentence: sentence.to_string(),
        }),
        Some(trees) if trees != tree_strings => Err(CheckError::Mismatch {
            path: path.to_path_buf(),
            sentence: sentence.to_string(),
        }),
        Some(_) => Ok(()),
    }
}

fn append_sentence_block(output: &mut String, sentence: &str, trees: &[ParseTree], margin: usize) {
    output.push_str(sentence);
    output.push('\n');
    for tree in trees {
        output.push_str(&tree.pretty(margin));
        output.push('\n');
    }
    if trees.is_empty() {
        output.push_str(NO_PARSES);
        output.push('\n');
    }
    output.push('\n');
}

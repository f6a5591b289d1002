use std::path::PathBuf;
use std::process;

use clap::Parser;

use treecheck::check::{CheckError, CheckReport, SelfCheck};
use treecheck::configuration::{load_config, CheckConfig, ConfigReadError};
use treecheck::info::InfoError;
use treecheck::sanitize::SanitizeError;
use treecheck::tree_file::TreeFileError;

/// Test that your submission files work as intended.
///
/// Validates the lexicon, grammar and sentences files, parses every sentence
/// and optionally checks the result against a parse trees file and a
/// predictions file.
#[derive(Parser, Debug)]
#[command(name = "treecheck", version)]
struct Cli {
    /// Path to Lexicon file
    lexicon_path: PathBuf,

    /// Path to Grammar file
    grammar_path: PathBuf,

    /// Path to Sentences file
    sentences_path: PathBuf,

    /// Path to ParseTrees file. Provide this argument to check that output
    /// aligns with current Grammar, Lexicon, and Sentences files.
    parse_trees_path: Option<PathBuf>,

    /// Path to "predictions" file: one "Parses" or "No parses" line per
    /// sentence.
    #[arg(short = 'p', long, value_name = "PATH")]
    predictions_path: Option<PathBuf>,

    /// Path to output ParseTrees file. Puts the result of parsing Sentences
    /// into the file.
    #[arg(short = 'o', long, value_name = "PATH")]
    output_parse_trees_path: Option<PathBuf>,

    /// TOML file overriding expected file names, start symbol and output width
    #[arg(short = 'c', long, value_name = "PATH")]
    config: Option<PathBuf>,
}

fn exit_code(error: &CheckError) -> i32 {
    match error {
        CheckError::Sanitize(SanitizeError::NotFound { .. } | SanitizeError::Io { .. })
        | CheckError::Info(InfoError::NotFound { .. } | InfoError::Io { .. })
        | CheckError::TreeFile(TreeFileError::NotFound { .. } | TreeFileError::Io { .. })
        | CheckError::Write { .. } => exitcode::IOERR,

        _ => exitcode::DATAERR,
    }
}

fn print_report(report: &CheckReport) {
    let width = report
        .rows
        .iter()
        .map(|row| row.sentence.len() + 1)
        .max()
        .unwrap_or(0)
        .max(10);

    println!();
    println!("{:<width$}| {:10}| Expected", "Sentences", "Actual");
    println!("{}", "-".repeat(width + 24));
    for row in &report.rows {
        let expected = match row.expected {
            Some(outcome) => outcome.to_string(),
            None => "N/A".to_string(),
        };
        let marker = if row.matches_prediction() { "" } else { "  <-" };
        println!(
            "{:<width$}| {:10}| {}{}",
            row.sentence,
            row.actual.to_string(),
            expected,
            marker
        );
    }
    println!();
}

fn main() {
    let cli = Cli::parse();

    let config = match &cli.config {
        None => CheckConfig::default(),
        Some(path) => match load_config(path) {
            Ok(config) => config,
            Err(e @ ConfigReadError::ReadError(_)) => {
                eprintln!("ERROR: {e}");
                process::exit(exitcode::IOERR)
            }
            Err(e @ ConfigReadError::ParseError(_)) => {
                eprintln!("ERROR: {e}");
                process::exit(exitcode::CONFIG)
            }
        },
    };

    let check = SelfCheck {
        lexicon: cli.lexicon_path,
        grammar: cli.grammar_path,
        sentences: cli.sentences_path,
        parse_trees: cli.parse_trees_path,
        predictions: cli.predictions_path,
        output: cli.output_parse_trees_path,
    };

    match check.run(&config) {
        Ok(report) => print_report(&report),
        Err(e) => {
            eprintln!("ERROR: {e}");
            process::exit(exit_code(&e))
        }
    }
}

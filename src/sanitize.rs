//! Comment stripping and the line grammars of the submission files.
//!
//! Every submission file uses `%` as a comment marker. After comments and
//! surrounding whitespace are removed, each remaining line has to match the
//! grammar of its file kind.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};

pub const COMMENT_MARKER: char = '%';

#[derive(thiserror::Error, Debug)]
pub enum SanitizeError {
    #[error("\"{}\" is not a file", .path.display())]
    NotFound { path: PathBuf },

    #[error("failed to read \"{}\": {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse line {line} in \"{}\"", .path.display())]
    Format { path: PathBuf, line: usize },
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum LinePattern {
    /// `N -> 'word' | "word"`
    Lexicon,
    /// `S -> NP VP | VP`
    Grammar,
    /// words without punctuation
    Sentence,
    /// `Parses` or `No parses`
    Prediction,
}

impl LinePattern {
    pub fn matches(&self, line: &str) -> bool {
        match self {
            LinePattern::Lexicon => line_grammar::lexicon_line(line).is_ok(),
            LinePattern::Grammar => line_grammar::grammar_line(line).is_ok(),
            LinePattern::Sentence => line_grammar::sentence_line(line).is_ok(),
            LinePattern::Prediction => line_grammar::prediction_line(line).is_ok(),
        }
    }
}

/// Drops everything from the comment marker to the end of the line.
pub fn strip_comment(line: &str) -> &str {
    match line.find(COMMENT_MARKER) {
        Some(pos) => &line[..pos],
        None => line,
    }
}

peg::parser! {

    grammar line_grammar() for str {

        rule ws() = quiet!{[c if c.is_whitespace()]+}

        rule _() = quiet!{[c if c.is_whitespace()]*}

        rule unquoted() = [c if c != '\'' && c != '"']

        rule arrow() = ws() "->" ws()

        rule lhs() = (!arrow() unquoted())+

        rule sq_word() = "'" unquoted()+ "'"

        rule dq_word() = "\"" unquoted()+ "\""

        // every word reuses the quote of the first one
        pub rule lexicon_line() =
            lhs() arrow()
            (sq_word() (_ "|" _ sq_word())* / dq_word() (_ "|" _ dq_word())*)
            _ "|"?

        pub rule grammar_line() =
            lhs() arrow() unquoted()+

        pub rule sentence_line() =
            [c if !c.is_ascii_punctuation()]+

        pub rule prediction_line() -> bool =
            "Parses" { true }
            /
            "No parses" { false }
    }
}

/// Reads `path`, drops comments and blank lines, and checks every remaining
/// line against `pattern`. Returns the kept lines joined by newlines.
pub fn sanitize<P: AsRef<Path>>(path: P, pattern: LinePattern) -> Result<String, SanitizeError> {
    let path = path.as_ref();
    if !path.is_file() {
        return Err(SanitizeError::NotFound {
            path: path.to_path_buf(),
        });
    }

    let file = File::open(path).map_err(|source| SanitizeError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    let mut sanitized = vec![];
    for (index, line) in BufReader::new(file).lines().enumerate() {
        let line = line.map_err(|source| SanitizeError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        let commentless = strip_comment(&line).trim();
        if commentless.is_empty() {
            continue;
        }

        if !pattern.matches(commentless) {
            return Err(SanitizeError::Format {
                path: path.to_path_buf(),
                line: index + 1,
            });
        }
        sanitized.push(commentless.to_string());
    }

    Ok(sanitized.join("\n"))
}

pub fn sanitize_lexicon<P: AsRef<Path>>(path: P) -> Result<String, SanitizeError> {
    sanitize(path, LinePattern::Lexicon)
}

pub fn sanitize_grammar<P: AsRef<Path>>(path: P) -> Result<String, SanitizeError> {
    sanitize(path, LinePattern::Grammar)
}

pub fn sanitize_sentences<P: AsRef<Path>>(path: P) -> Result<String, SanitizeError> {
    sanitize(path, LinePattern::Sentence)
}

pub fn sanitize_predictions<P: AsRef<Path>>(path: P) -> Result<String, SanitizeError> {
    sanitize(path, LinePattern::Prediction)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use std::io::Write;

    #[rstest]
    #[case("N -> 'cat'")]
    #[case("N -> 'cat' | 'dog'")]
    #[case("N -> \"cat\"|\"dog\" |")]
    #[case("Det Word -> 'the'")]
    fn lexicon_accepts(#[case] line: &str) {
        assert!(LinePattern::Lexicon.matches(line));
    }

    #[rstest]
    #[case("N->'cat'")]
    #[case("N -> cat")]
    #[case("N -> 'cat\"")]
    #[case("N -> ''")]
    #[case("N -> 'cat' 'dog'")]
    #[case("'N' -> 'cat'")]
    #[case("N -> \"cat\" | 'dog'")]
    #[case("N -> 'cat' | \"dog\" |")]
    fn lexicon_rejects(#[case] line: &str) {
        assert!(!LinePattern::Lexicon.matches(line));
    }

    #[rstest]
    #[case("S -> NP VP")]
    #[case("NP -> Det N | N |")]
    #[case("VP -> V")]
    fn grammar_accepts(#[case] line: &str) {
        assert!(LinePattern::Grammar.matches(line));
    }

    #[rstest]
    #[case("S -> 'x'")]
    #[case("S ->")]
    #[case("S NP VP")]
    fn grammar_rejects(#[case] line: &str) {
        assert!(!LinePattern::Grammar.matches(line));
    }

    #[test]
    fn sentences_have_no_punctuation() {
        assert!(LinePattern::Sentence.matches("the cat sat on the mat"));
        assert!(!LinePattern::Sentence.matches("the cat's mat"));
        assert!(!LinePattern::Sentence.matches("hello, world"));
    }

    #[test]
    fn predictions_are_exact() {
        assert!(LinePattern::Prediction.matches("Parses"));
        assert!(LinePattern::Prediction.matches("No parses"));
        assert!(!LinePattern::Prediction.matches("no parses"));
        assert!(!LinePattern::Prediction.matches("Parses!"));
    }

    #[test]
    fn comments_are_stripped() {
        assert_eq!(strip_comment("S -> NP VP % top rule"), "S -> NP VP ");
        assert_eq!(strip_comment("% only a comment"), "");
        assert_eq!(strip_comment("plain"), "plain");
    }

    #[test]
    fn sanitize_skips_comments_and_reports_line() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "% Jane Doe, janedoe, 1234567").unwrap();
        writeln!(file).unwrap();
        writeln!(file, "N -> 'cat' % a noun").unwrap();
        writeln!(file, "V -> 'sat'").unwrap();
        assert_eq!(
            sanitize_lexicon(file.path()).unwrap(),
            "N -> 'cat'\nV -> 'sat'"
        );

        writeln!(file, "V -> sat").unwrap();
        match sanitize_lexicon(file.path()) {
            Err(SanitizeError::Format { line, .. }) => assert_eq!(line, 5),
            other => panic!("expected format error, got {other:?}"),
        }
    }

    #[test]
    fn missing_file_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        assert!(matches!(
            sanitize_sentences(dir.path().join("Sentences")),
            Err(SanitizeError::NotFound { .. })
        ));
    }
}

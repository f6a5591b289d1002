use std::fmt::Display;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};

/// `(name, login, student number)` from the `% name, login, number` header
/// every submission file starts with.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct InfoTuple {
    pub name: String,
    pub login: String,
    pub number: u64,
}

impl Display for InfoTuple {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}, {}, {}", self.name, self.login, self.number)
    }
}

#[derive(thiserror::Error, Debug)]
pub enum InfoError {
    #[error("\"{}\" is not a file", .path.display())]
    NotFound { path: PathBuf },

    #[error("failed to read \"{}\": {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error(
        "\"{}\" does not begin with info line! (e.g. \"% My Name, myloginid, student_number\")",
        .path.display()
    )]
    MissingHeader { path: PathBuf },

    #[error("File \"{}\" has an info line ({found}) which does not match ({expected})", .path.display())]
    Mismatch {
        path: PathBuf,
        found: InfoTuple,
        expected: InfoTuple,
    },
}

peg::parser! {

    grammar header_parser() for str {

        rule _() = quiet!{[c if c.is_whitespace()]*}

        rule field() -> String =
            s:$([c if c != ','  && c != '\n']+) {?
                let s = s.trim();
                if s.is_empty() {
                    Err("non-empty field")
                } else {
                    Ok(s.to_string())
                }
            }

        rule number() -> u64 =
            s:$(['0'..='9']+) {?
                s.parse().or(Err("student number"))
            }

        pub rule header() -> InfoTuple =
            _ "%" _ name:field() "," login:field() "," _ number:number() _ {
                InfoTuple { name, login, number }
            }
    }
}

pub fn parse_header(line: &str) -> Option<InfoTuple> {
    header_parser::header(line).ok()
}

/// Reads the info header of `path`. When `should_equal` is given the header
/// must match it exactly.
pub fn info<P: AsRef<Path>>(
    path: P,
    should_equal: Option<&InfoTuple>,
) -> Result<InfoTuple, InfoError> {
    let path = path.as_ref();
    if !path.is_file() {
        return Err(InfoError::NotFound {
            path: path.to_path_buf(),
        });
    }

    let file = File::open(path).map_err(|source| InfoError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    let mut first_line = String::new();
    BufReader::new(file)
        .read_line(&mut first_line)
        .map_err(|source| InfoError::Io {
            path: path.to_path_buf(),
            source,
        })?;

    let found = parse_header(&first_line).ok_or_else(|| InfoError::MissingHeader {
        path: path.to_path_buf(),
    })?;

    match should_equal {
        Some(expected) if *expected != found => Err(InfoError::Mismatch {
            path: path.to_path_buf(),
            found,
            expected: expected.clone(),
        }),
        _ => Ok(found),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn jane() -> InfoTuple {
        InfoTuple {
            name: "Jane Doe".to_string(),
            login: "janedoe".to_string(),
            number: 1234567,
        }
    }

    #[test]
    fn header_fields_are_trimmed() {
        assert_eq!(parse_header("%  Jane Doe ,janedoe,  1234567  \n"), Some(jane()));
        assert_eq!(parse_header("% Jane Doe, janedoe, 1234567"), Some(jane()));
    }

    #[test]
    fn malformed_headers() {
        assert_eq!(parse_header("Jane Doe, janedoe, 1234567"), None);
        assert_eq!(parse_header("% Jane Doe, janedoe"), None);
        assert_eq!(parse_header("% Jane Doe, , 1234567"), None);
        assert_eq!(parse_header("% Jane Doe, janedoe, 12a4"), None);
    }

    #[test]
    fn display_matches_header_layout() {
        assert_eq!(jane().to_string(), "Jane Doe, janedoe, 1234567");
    }

    #[test]
    fn info_checks_expected_tuple() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "% Jane Doe, janedoe, 1234567").unwrap();
        writeln!(file, "S -> NP VP").unwrap();

        assert_eq!(info(file.path(), None).unwrap(), jane());
        assert_eq!(info(file.path(), Some(&jane())).unwrap(), jane());

        let other = InfoTuple {
            number: 7654321,
            ..jane()
        };
        assert!(matches!(
            info(file.path(), Some(&other)),
            Err(InfoError::Mismatch { .. })
        ));
    }

    #[test]
    fn header_must_be_first_line() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file).unwrap();
        writeln!(file, "% Jane Doe, janedoe, 1234567").unwrap();
        assert!(matches!(
            info(file.path(), None),
            Err(InfoError::MissingHeader { .. })
        ));
    }
}

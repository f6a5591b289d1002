use std::collections::BTreeSet;
use std::fs;

use treecheck::tree_file::{self, TreeFileError};

fn write(dir: &tempfile::TempDir, name: &str, content: &str) -> std::path::PathBuf {
    let path = dir.path().join(name);
    fs::write(&path, content).unwrap();
    path
}

#[test]
fn reads_example_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = write(
        &dir,
        "ParseTrees",
        "% Jane Doe, janedoe, 1234567\n\nthe cat sat\n(S (NP the cat) (VP sat))\nmice run\nNo parses\n",
    );

    let forest = tree_file::read(&path).unwrap();
    assert_eq!(forest.len(), 2);
    assert_eq!(
        forest.get("the cat sat"),
        Some(&BTreeSet::from(["(S (NP the cat) (VP sat))".to_string()]))
    );
    assert_eq!(forest.get("mice run"), Some(&BTreeSet::new()));
}

#[test]
fn rereading_is_deterministic() {
    let dir = tempfile::tempdir().unwrap();
    let path = write(
        &dir,
        "ParseTrees",
        "a b\n(S\n  (A a)\n  (B b))\n(S (A a) (B b))\n(S (X a b))\nc\nNo parses\n",
    );

    assert_eq!(tree_file::read(&path).unwrap(), tree_file::read(&path).unwrap());
}

#[test]
fn format_error_carries_path_and_line() {
    let dir = tempfile::tempdir().unwrap();
    let path = write(&dir, "ParseTrees", "a b\n(S a b)\na b\n(S a b)\n");

    match tree_file::read(&path) {
        Err(TreeFileError::Format {
            path: error_path,
            line,
            ..
        }) => {
            assert_eq!(error_path, path);
            assert_eq!(line, 3);
        }
        other => panic!("expected format error, got {other:?}"),
    }
}

#[test]
fn error_message_reports_end_of_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = write(&dir, "ParseTrees", "a b\n(S a b)\nlonely sentence\n");

    let message = tree_file::read(&path).unwrap_err().to_string();
    assert!(message.contains("no results for sentence \"lonely sentence\" by end of file"));
    assert!(message.contains(":3:"), "{message}");
}

#[test]
fn missing_file_is_not_found() {
    let dir = tempfile::tempdir().unwrap();
    assert!(matches!(
        tree_file::read(dir.path().join("ParseTrees")),
        Err(TreeFileError::NotFound { .. })
    ));
    assert!(matches!(
        tree_file::read(dir.path()),
        Err(TreeFileError::NotFound { .. })
    ));
}

//! Self-check for CFG parsing assignment submissions.
//!
//! A submission is a lexicon, a grammar and a list of test sentences, plus
//! optionally the parse trees expected for each sentence and a prediction of
//! which sentences parse. See [`check::SelfCheck`] for the full run and
//! [`tree_file::read`] for the parse tree file format.

pub mod log;

pub mod check;
pub mod configuration;
pub mod grammar;
pub mod info;
pub mod sanitize;
pub mod tree;
pub mod tree_file;

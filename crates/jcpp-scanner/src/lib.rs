//! Lexical layer of the jcpp translator.
//!
//! This crate provides:
//! - `OpKind` / `OPERATORS` - the priority-ordered operator table
//! - `Ledger` / `Tag` - the per-character resolution ledger
//! - `scan` - the position scanner that fills a ledger from statement text
//! - `Keyword` - statement keywords and label recognition
//! - quote- and bracket-aware text helpers used to cut statements

pub mod operators;
pub use operators::{OPERATORS, OpKind, OperandPolicy, OperatorInfo, TieBreak};

pub mod ledger;
pub use ledger::{Ledger, Tag};

pub mod scanner;
pub use scanner::scan;

pub mod keywords;
pub use keywords::{Keyword, leading_keyword, leading_label, starts_with_word};

pub mod text;
pub use text::{QuoteState, StatementCut, TerminatorSearch, find_terminator, matching_close};

#[cfg(test)]
#[path = "tests/text_tests.rs"]
mod text_tests;

#[cfg(test)]
#[path = "tests/keywords_tests.rs"]
mod keywords_tests;

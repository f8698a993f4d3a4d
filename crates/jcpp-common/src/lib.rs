//! Common types and utilities for the jcpp translator.
//!
//! This crate provides foundational types used across all jcpp crates:
//! - Source spans over statement text (`Span`)
//! - Translator limits and retry budgets
//! - The fatal error taxonomy (`TranslateError`)
//! - Translation options loaded from JSON (`TranslateOptions`)
//! - Type-name classification into value categories (`ValueCategory`)

// Span - character ranges inside one statement buffer
pub mod span;
pub use span::Span;

// Centralized limits and thresholds
pub mod limits;

// Error taxonomy shared by parser and emitter
pub mod error;
pub use error::{TranslateError, TranslateResult};

// Options - user tunable output conventions
pub mod options;
pub use options::TranslateOptions;

// Type names and value categories
pub mod types;
pub use types::ValueCategory;

#[cfg(test)]
#[path = "tests/types_tests.rs"]
mod types_tests;

#[cfg(test)]
#[path = "tests/options_tests.rs"]
mod options_tests;

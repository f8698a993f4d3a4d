//! Emitter for the jcpp translator.
//!
//! This crate provides:
//! - `LoweringPass` / `TransformContext` - per-node rewrite directives
//! - `TypeCollector` / `UnseenTypeSet` - referenced-type reporting
//! - `Printer` / `SourceWriter` - C++ text rendering
//! - `TranslationUnit` - the `translate` then `render` entry point

pub mod collector;
pub use collector::{TypeCollector, UnseenTypeSet};

pub mod transform_context;
pub use transform_context::{MemberAccess, TransformContext, TransformDirective};

pub mod type_spelling;
pub use type_spelling::{spell_plain, spell_type};

pub mod source_writer;
pub use source_writer::SourceWriter;

pub mod lowering_pass;
pub use lowering_pass::LoweringPass;

pub mod printer;
pub use printer::Printer;

pub mod translation;
pub use translation::TranslationUnit;

#[cfg(test)]
#[path = "tests/type_spelling_tests.rs"]
mod type_spelling_tests;

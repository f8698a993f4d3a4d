//! jcpp: translates method bodies of a garbage-collected, class-based
//! language into C++.
//!
//! The work is split across the workspace crates:
//! - `jcpp_scanner` tags operators and literals in statement text
//! - `jcpp_parser` resolves statements into nodes, tracks scopes and drives
//!   the line-oriented control-flow state machine
//! - `jcpp_emitter` lowers the finished body and renders C++ text
//!
//! `translate_method_body` runs the whole pipeline for one body.

pub use jcpp_common as common;
pub use jcpp_emitter as emitter;
pub use jcpp_parser as parser;
pub use jcpp_scanner as scanner;

pub use jcpp_common::{TranslateError, TranslateOptions, ValueCategory};
pub use jcpp_emitter::{TranslationUnit, TypeCollector, UnseenTypeSet};
pub use jcpp_parser::{ClassSignature, CodeBody, CodeReader, MethodContext, parse_body};

pub mod tracing_config;

use anyhow::Context as _;
use jcpp_parser::LiftedId;
use serde::Serialize;
use tracing::debug;

/// Everything the backend needs from one translated body.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MethodTranslation {
    pub code: String,
    /// Referenced user types, in first-use order.
    pub unseen_types: Vec<String>,
    /// Class definitions synthesized from anonymous class bodies.
    pub lifted_types: Vec<String>,
    pub returns_smart_handle: bool,
    /// Parameters and locals with their resolved categories.
    pub categories: Vec<(String, ValueCategory)>,
}

impl MethodTranslation {
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

/// Parse, lower and render one method body.
pub fn translate_method_body<I, S>(
    context: MethodContext,
    lines: I,
    options: TranslateOptions,
) -> anyhow::Result<MethodTranslation>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let method = context.name.clone();
    let _span = tracing::debug_span!("translate_method", %method).entered();
    let body = parse_body(context, options, lines)
        .with_context(|| format!("failed to translate method `{method}`"))?;

    let mut unit = TranslationUnit::new(&body);
    let mut unseen = UnseenTypeSet::new();
    unit.translate(&mut unseen);

    let lifted_types = (0..body.lifted_types().len())
        .map(|i| unit.render_lifted(LiftedId(i as u32), 0))
        .collect();
    let translation = MethodTranslation {
        code: unit.render(0),
        unseen_types: unseen.into_vec(),
        lifted_types,
        returns_smart_handle: unit.returns_smart_handle(),
        categories: unit
            .declaration_categories()
            .map(|(name, category)| (name.to_string(), category))
            .collect(),
    };
    debug!(
        lines = translation.code.lines().count(),
        unseen = translation.unseen_types.len(),
        "method translated"
    );
    Ok(translation)
}

/// Like `translate_method_body`, with the method context and options given
/// as JSON documents.
pub fn translate_from_json(
    context_json: &str,
    source: &str,
    options_json: Option<&str>,
) -> anyhow::Result<MethodTranslation> {
    let context = MethodContext::from_json_str(context_json).context("invalid method context")?;
    let options = match options_json {
        Some(json) => TranslateOptions::from_json_str(json).context("invalid translate options")?,
        None => TranslateOptions::default(),
    };
    translate_method_body(context, source.lines(), options)
}

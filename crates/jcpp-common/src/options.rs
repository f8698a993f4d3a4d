//! Output conventions for the generated C++.
//!
//! Options are read from a JSON document whose keys are camelCase. Every key
//! is optional and falls back to the conventions of the support library the
//! generated code links against.

use serde::{Deserialize, Deserializer};
use std::path::Path;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum OptionsError {
    #[error("failed to read options file {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid options JSON: {0}")]
    Json(#[from] serde_json::Error),
}

/// Accept both `true` and `"true"` for switches, matching hand-edited configs.
fn deserialize_bool_or_string<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    use serde::de::Error;

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum BoolOrString {
        Bool(bool),
        String(String),
    }

    match BoolOrString::deserialize(deserializer)? {
        BoolOrString::Bool(b) => Ok(b),
        BoolOrString::String(s) => match s.trim().to_lowercase().as_str() {
            "true" | "1" | "yes" | "on" => Ok(true),
            "false" | "0" | "no" | "off" => Ok(false),
            _ => Err(Error::custom(format!(
                "invalid boolean value: '{s}'. Expected true, false, 'true', or 'false'"
            ))),
        },
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TranslateOptions {
    /// Spaces per indentation level.
    pub indent_width: usize,
    /// Spelling of the null literal in output.
    pub null_literal: String,
    /// Helper wrapping a primitive that is concatenated with text.
    pub to_text_helper: String,
    /// Type-test helper for pointer-like operands.
    pub pointer_type_test: String,
    /// Type-test helper for value/object operands.
    pub object_type_test: String,
    /// Keyword of the scope-exit construct used for `finally`.
    pub defer_keyword: String,
    /// Prefix fields of enclosing classes with a marker comment.
    #[serde(deserialize_with = "deserialize_bool_or_string")]
    pub mark_outer_fields: bool,
    /// Append `.get()` to smart-handle arguments of non-container calls.
    #[serde(deserialize_with = "deserialize_bool_or_string")]
    pub smart_handle_get: bool,
    /// Additional generic type names treated as containers.
    pub extra_container_types: Vec<String>,
}

impl Default for TranslateOptions {
    fn default() -> Self {
        TranslateOptions {
            indent_width: 4,
            null_literal: "nullptr".to_string(),
            to_text_helper: "String::valueOf".to_string(),
            pointer_type_test: "ptrIsType".to_string(),
            object_type_test: "objIsType".to_string(),
            defer_keyword: "defer".to_string(),
            mark_outer_fields: true,
            smart_handle_get: true,
            extra_container_types: Vec::new(),
        }
    }
}

impl TranslateOptions {
    pub fn from_json_str(json: &str) -> Result<Self, OptionsError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn from_path(path: &Path) -> Result<Self, OptionsError> {
        let text = std::fs::read_to_string(path).map_err(|source| OptionsError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_json_str(&text)
    }

    /// One level of indentation as spaces.
    pub fn indent_unit(&self) -> String {
        " ".repeat(self.indent_width)
    }
}

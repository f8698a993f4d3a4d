//! Source type names and the value categories they map to.
//!
//! Classification is purely textual: a declared type string is reduced to
//! its generic base and array dimensions, then looked up in the primitive
//! and container tables.

use once_cell::sync::Lazy;
use rustc_hash::FxHashSet;
use serde::Serialize;

/// Semantic classification of an expression result.
///
/// Drives the choice of target idiom: pointer access, value access, container
/// API mapping, text conversion.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
pub enum ValueCategory {
    /// `this` / `super`.
    ThisReference,
    /// A freshly constructed object (`new T(...)`).
    RawPointer,
    /// A variable or field holding an object through a smart handle.
    OwnedValue,
    /// Anything whose category could not be narrowed.
    CommonExpression,
    Array,
    Primitive,
    Container,
    Text,
    /// A name that resolves to nothing: a type or a static scope.
    None,
}

impl ValueCategory {
    /// Accessed through `->` in the target language.
    pub const fn is_pointer_like(self) -> bool {
        matches!(
            self,
            ValueCategory::ThisReference | ValueCategory::RawPointer | ValueCategory::OwnedValue
        )
    }

    /// Raw object pointers: `this` and fresh constructions.
    pub const fn is_raw_pointer(self) -> bool {
        matches!(self, ValueCategory::ThisReference | ValueCategory::RawPointer)
    }

    /// Value types that own their storage and support clear/init-empty.
    pub const fn is_value_collection(self) -> bool {
        matches!(
            self,
            ValueCategory::Container | ValueCategory::Array | ValueCategory::Text
        )
    }
}

pub const PRIMITIVE_TYPES: &[&str] = &[
    "byte", "char", "double", "float", "int", "short", "long", "boolean",
];

pub const CONTAINER_TYPES: &[&str] = &[
    "ArrayList",
    "LinkedList",
    "List",
    "HashMap",
    "ArrayMap",
    "HashTable",
    "Hashtable",
    "Map",
    "HashSet",
    "Set",
    "Collection",
    "SparseArray",
    "Parcel",
    "StringBuffer",
    "StringBuilder",
];

pub const TEXT_TYPE: &str = "String";

/// Names never reported as unseen types.
pub const IGNORED_TYPE_NAMES: &[&str] = &["this", "super", "null", "void", "Void"];

static PRIMITIVES: Lazy<FxHashSet<&'static str>> =
    Lazy::new(|| PRIMITIVE_TYPES.iter().copied().collect());

static CONTAINERS: Lazy<FxHashSet<&'static str>> =
    Lazy::new(|| CONTAINER_TYPES.iter().copied().collect());

pub fn is_primitive(name: &str) -> bool {
    PRIMITIVES.contains(name.trim())
}

/// `List<Foo>` -> `List`.
pub fn generic_base(name: &str) -> &str {
    let name = name.trim();
    match name.find('<') {
        Some(idx) => name[..idx].trim_end(),
        None => name,
    }
}

/// Generic arguments at depth one: `Map<K, List<V>>` -> `["K", "List<V>"]`.
pub fn generic_arguments(name: &str) -> Vec<&str> {
    let name = name.trim();
    let (Some(open), Some(close)) = (name.find('<'), name.rfind('>')) else {
        return Vec::new();
    };
    if close <= open {
        return Vec::new();
    }
    let inner = &name[open + 1..close];
    let mut args = Vec::new();
    let mut depth = 0usize;
    let mut from = 0usize;
    for (idx, ch) in inner.char_indices() {
        match ch {
            '<' => depth += 1,
            '>' => depth = depth.saturating_sub(1),
            ',' if depth == 0 => {
                args.push(inner[from..idx].trim());
                from = idx + 1;
            }
            _ => {}
        }
    }
    let last = inner[from..].trim();
    if !last.is_empty() {
        args.push(last);
    }
    args
}

/// Strips trailing `[]` pairs (and a varargs `...`), returning the element
/// type and the number of dimensions.
pub fn strip_array(name: &str) -> (&str, usize) {
    let mut rest = name.trim();
    let mut dims = 0;
    if let Some(stripped) = rest.strip_suffix("...") {
        rest = stripped.trim_end();
        dims += 1;
    }
    loop {
        let Some(stripped) = rest.strip_suffix(']') else {
            break;
        };
        let stripped = stripped.trim_end();
        let Some(stripped) = stripped.strip_suffix('[') else {
            break;
        };
        rest = stripped.trim_end();
        dims += 1;
    }
    (rest, dims)
}

pub fn is_container(name: &str, extra: &[String]) -> bool {
    let base = generic_base(name);
    CONTAINERS.contains(base) || extra.iter().any(|e| e == base)
}

/// Classify a declared type string.
pub fn classify_type(name: &str, extra_containers: &[String]) -> ValueCategory {
    let (element, dims) = strip_array(name);
    if dims > 0 {
        return ValueCategory::Array;
    }
    if is_primitive(element) {
        ValueCategory::Primitive
    } else if generic_base(element) == TEXT_TYPE {
        ValueCategory::Text
    } else if is_container(element, extra_containers) {
        ValueCategory::Container
    } else {
        ValueCategory::OwnedValue
    }
}

/// Target spelling of a primitive, `None` for non-primitives.
pub fn target_primitive(name: &str) -> Option<&'static str> {
    Some(match name.trim() {
        "byte" => "char",
        "short" => "short",
        "char" => "char",
        "double" => "double",
        "float" => "float",
        "int" => "int",
        "long" => "int64_t",
        "boolean" => "bool",
        _ => return None,
    })
}

/// Literal tokens that classify without a scope lookup.
pub fn literal_category(token: &str) -> Option<ValueCategory> {
    let token = token.trim();
    let first = token.chars().next()?;
    if first == '"' {
        return Some(ValueCategory::Text);
    }
    if first == '\'' {
        return Some(ValueCategory::Primitive);
    }
    if first.is_ascii_digit() || ((first == '-' || first == '+' || first == '.') && token.len() > 1) {
        let rest = token.trim_start_matches(['-', '+']);
        if rest.starts_with(|c: char| c.is_ascii_digit() || c == '.') {
            return Some(ValueCategory::Primitive);
        }
    }
    match token {
        "true" | "false" => Some(ValueCategory::Primitive),
        "this" | "super" => Some(ValueCategory::ThisReference),
        _ => None,
    }
}

/// Ignored names, primitives and text never need an include.
pub fn is_reportable_type(name: &str) -> bool {
    let base = generic_base(strip_array(name).0);
    !base.is_empty()
        && !IGNORED_TYPE_NAMES.contains(&base)
        && !is_primitive(base)
        && base != TEXT_TYPE
        && base.starts_with(|c: char| c.is_ascii_alphabetic() || c == '_')
}

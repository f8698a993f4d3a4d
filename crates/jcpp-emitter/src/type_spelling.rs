//! Target spelling of source type names.

use jcpp_common::types::{TEXT_TYPE, generic_base, is_container, strip_array, target_primitive};

/// Spell a declared source type in target syntax.
///
/// Primitives map to their target names, text stays `String`, each array
/// dimension wraps in `Array<..>`, containers keep their source spelling and
/// every other object type becomes a smart handle `sp<..>`.
pub fn spell_type(name: &str, extra_containers: &[String]) -> String {
    let (element, dims) = strip_array(name);
    let mut spelled = spell_element(element, extra_containers);
    for _ in 0..dims {
        spelled = format!("Array<{spelled}>");
    }
    spelled
}

fn spell_element(element: &str, extra_containers: &[String]) -> String {
    if let Some(primitive) = target_primitive(element) {
        return primitive.to_string();
    }
    if generic_base(element) == TEXT_TYPE || is_container(element, extra_containers) {
        return qualified(element);
    }
    format!("sp<{}>", qualified(element))
}

/// Element type of a cast or construction, without the smart handle.
pub fn spell_plain(name: &str) -> String {
    match target_primitive(name) {
        Some(primitive) => primitive.to_string(),
        None => qualified(name.trim()),
    }
}

/// `java.util.Map.Entry` -> `java::util::Map::Entry`, leaving generic
/// arguments alone.
fn qualified(name: &str) -> String {
    let name = name.trim();
    let split = name.find('<').unwrap_or(name.len());
    let (path, args) = name.split_at(split);
    format!("{}{args}", path.replace('.', "::"))
}

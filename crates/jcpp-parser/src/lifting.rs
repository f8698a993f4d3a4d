//! Anonymous-class lifting.
//!
//! Each class body detached from a `new T(...) { ... }` construction becomes
//! a named type. The final locals it reads are captured as constructor
//! arguments, outermost scope first.

use crate::arena::{Capture, LiftedType};
use crate::body::CodeBody;
use crate::node::{LiftedId, NodeKind, ParagraphId};
use jcpp_common::limits::LIFTED_TYPE_PREFIX;
use jcpp_scanner::QuoteState;
use jcpp_scanner::keywords::is_identifier_char;
use rustc_hash::{FxHashMap, FxHashSet};
use tracing::debug;

pub(crate) fn lift_anonymous_types(body: &mut CodeBody) {
    let sites = body.arena.anonymous_sites.clone();
    let mut seen: FxHashMap<String, usize> = FxHashMap::default();
    for site in sites {
        let stem = format!("{LIFTED_TYPE_PREFIX}{}", site.base_type.replace('.', "_"));
        let count = seen.entry(stem.clone()).or_insert(0);
        *count += 1;
        let name = if *count == 1 {
            stem
        } else {
            format!("{stem}_{count}")
        };
        let visible = body.arena.get(site.call).map_or(u32::MAX, |node| node.visible_variables);
        let captures = captures(body, site.scope, visible, &site.body);
        debug!(%name, captures = captures.len(), "lifted anonymous class");
        let id = LiftedId(body.arena.lifted.len() as u32);
        body.arena.lifted.push(LiftedType {
            name,
            base_type: site.base_type.clone(),
            body: site.body.clone(),
            captures,
            site: site.call,
        });
        if let Some(node) = body.arena.get_mut(site.call) {
            if let NodeKind::MethodCall(data) = &mut node.kind {
                data.lifted = Some(id);
            }
        }
    }
}

/// Final variables visible from `scope` that `text` refers to by name.
/// Only the first `visible` declarations exist at the construction site.
fn captures(body: &CodeBody, scope: ParagraphId, visible: u32, text: &str) -> Vec<Capture> {
    let referenced = referenced_names(text);
    let mut shadowed: FxHashSet<&str> = FxHashSet::default();
    let mut layers: Vec<Vec<Capture>> = Vec::new();
    let mut current = scope.is_some().then_some(scope);
    while let Some(id) = current {
        let paragraph = body.arena.paragraph(id);
        let mut layer = Vec::new();
        for &variable in paragraph.variables.iter().rev() {
            if variable.0 >= visible {
                continue;
            }
            let variable = body.arena.variable(variable);
            if !shadowed.insert(variable.name.as_str()) {
                continue;
            }
            if variable.is_final() && referenced.contains(variable.name.as_str()) {
                layer.push(Capture {
                    name: variable.name.clone(),
                    type_name: variable.type_name.clone(),
                    category: variable.category,
                });
            }
        }
        layer.reverse();
        layers.push(layer);
        current = paragraph.parent;
    }
    layers.into_iter().rev().flatten().collect()
}

/// Identifier tokens outside literals, member names after `.` excluded.
fn referenced_names(text: &str) -> FxHashSet<&str> {
    let mut names = FxHashSet::default();
    let mut quote = QuoteState::default();
    let mut start: Option<usize> = None;
    let mut after_dot = false;
    for (offset, ch) in text.char_indices() {
        let quoted = quote.feed(ch);
        if !quoted && is_identifier_char(ch) {
            start.get_or_insert(offset);
            continue;
        }
        if let Some(s) = start.take() {
            if !after_dot {
                names.insert(&text[s..offset]);
            }
        }
        if !quoted && !ch.is_whitespace() {
            after_dot = ch == '.';
        }
    }
    if let Some(s) = start {
        if !after_dot {
            names.insert(&text[s..]);
        }
    }
    names
}

#[cfg(test)]
pub(crate) fn referenced_names_for_test(text: &str) -> Vec<String> {
    let mut names: Vec<String> = referenced_names(text).into_iter().map(str::to_string).collect();
    names.sort();
    names
}

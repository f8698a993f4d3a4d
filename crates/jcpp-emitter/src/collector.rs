//! Unseen-type collection.
//!
//! The lowering pass reports every user type it meets that the generated
//! code will need a declaration for. The backend decides what to do with
//! them (includes, forward declarations).

use indexmap::IndexSet;

/// Receiver of referenced type names. Implementations must tolerate the
/// same name being reported many times.
pub trait TypeCollector {
    fn report_type(&mut self, name: &str);
}

/// Insertion-ordered, deduplicating collector.
#[derive(Debug, Default, Clone)]
pub struct UnseenTypeSet {
    names: IndexSet<String>,
}

impl UnseenTypeSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.names.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.names.contains(name)
    }

    pub fn into_vec(self) -> Vec<String> {
        self.names.into_iter().collect()
    }
}

impl TypeCollector for UnseenTypeSet {
    fn report_type(&mut self, name: &str) {
        if !self.names.contains(name) {
            self.names.insert(name.to_string());
        }
    }
}

/// Collector that drops everything; used when rendering without an
/// explicit `translate` call.
#[derive(Debug, Default)]
pub(crate) struct DiscardTypes;

impl TypeCollector for DiscardTypes {
    fn report_type(&mut self, _name: &str) {}
}

//! Path to text-range table for one text snapshot.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::node::{Node, Span};

/// Range and value of one addressable component.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MappingEntry {
    pub range: Span,
    pub property_value: Option<String>,
}

/// Map from path to the range that path occupies in one specific text.
///
/// A mapping is only valid for the text it was built against. Any change to
/// that text means building a new mapping, never patching this one.
/// Entries keep pre-order, and the mapping serializes as a JSON object keyed
/// by path.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ComponentMapping {
    entries: IndexMap<String, MappingEntry>,
}

impl ComponentMapping {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mapping for the text `tree` was parsed from.
    ///
    /// A degenerate root has nothing addressable and yields an empty mapping.
    pub fn from_tree(tree: &Node) -> Self {
        let mut mapping = Self::new();
        if tree.is_degenerate() {
            return mapping;
        }
        for node in tree.walk() {
            mapping.insert(node.path.clone(), node.span, node.value.clone());
        }
        mapping
    }

    pub(crate) fn insert(&mut self, path: String, range: Span, property_value: Option<String>) {
        self.entries.insert(path, MappingEntry { range, property_value });
    }

    pub(crate) fn set_range(&mut self, path: &str, range: Span) {
        if let Some(entry) = self.entries.get_mut(path) {
            entry.range = range;
        }
    }

    pub fn get(&self, path: &str) -> Option<&MappingEntry> {
        self.entries.get(path)
    }

    pub fn range_of(&self, path: &str) -> Option<Span> {
        self.entries.get(path).map(|e| e.range)
    }

    pub fn contains(&self, path: &str) -> bool {
        self.entries.contains_key(path)
    }

    pub fn paths(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &MappingEntry)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Path of the narrowest range containing `offset`.
    ///
    /// Among equal ranges the entry that comes first in pre-order wins, so a
    /// multi-valued property is preferred over its items.
    pub fn path_at(&self, offset: usize) -> Option<&str> {
        let mut best: Option<(&str, usize)> = None;
        for (path, entry) in &self.entries {
            if !entry.range.contains(offset) {
                continue;
            }
            let len = entry.range.len();
            if best.map_or(true, |(_, best_len)| len < best_len) {
                best = Some((path.as_str(), len));
            }
        }
        best.map(|(path, _)| path)
    }

    /// JSON object keyed by path, for handing to the rendering layer.
    pub fn to_json(&self) -> Result<serde_json::Value, serde_json::Error> {
        serde_json::to_value(self)
    }
}

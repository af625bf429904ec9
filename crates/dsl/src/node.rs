//! Tree node types produced by the parser.

use serde::{Deserialize, Serialize};

/// Half-open byte range `[start, end)` into the text a node was parsed from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Span {
    pub start: usize,
    pub end: usize,
}

impl Span {
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    pub fn len(&self) -> usize {
        self.end.saturating_sub(self.start)
    }

    pub fn is_empty(&self) -> bool {
        self.end <= self.start
    }

    pub fn contains(&self, offset: usize) -> bool {
        self.start <= offset && offset < self.end
    }

    /// True when `other` lies entirely within `self`.
    pub fn contains_span(&self, other: &Span) -> bool {
        self.start <= other.start && other.end <= self.end
    }

    pub fn overlaps(&self, other: &Span) -> bool {
        self.start < other.end && other.start < self.end
    }

    /// Restrict `self` to the bounds of `outer`.
    pub fn clamp_to(&self, outer: &Span) -> Span {
        Span {
            start: self.start.max(outer.start),
            end: self.end.min(outer.end),
        }
    }
}

/// Node variant tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NodeKind {
    /// `name(...)`: the root, or an operation nested in an entity slot.
    Operation,
    /// `type[...]`.
    Entity,
    /// `result_container[...]`: an entity that holds a grouping/result.
    Container,
    /// `key: value`, or one item of a multi-valued property.
    Property,
}

/// Entity type literal that is tagged [`NodeKind::Container`].
pub const RESULT_CONTAINER: &str = "result_container";

impl NodeKind {
    /// Kind for an entity with the given type literal.
    pub fn for_entity_type(type_name: &str) -> Self {
        if type_name == RESULT_CONTAINER {
            NodeKind::Container
        } else {
            NodeKind::Entity
        }
    }

    /// Entities and containers both hold properties.
    pub fn is_entity_like(self) -> bool {
        matches!(self, NodeKind::Entity | NodeKind::Container)
    }
}

/// One node of a parsed DSL tree.
///
/// `value` holds the operation name, the entity type literal, or the
/// property value. Property values are canonical: whitespace runs are
/// collapsed and multi-valued lists are joined with `", "`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Node {
    pub kind: NodeKind,
    pub path: String,
    pub span: Span,
    pub value: Option<String>,
    pub children: Vec<Node>,
}

impl Node {
    pub fn new(kind: NodeKind, path: String, span: Span, value: Option<String>) -> Self {
        Self { kind, path, span, value, children: Vec::new() }
    }

    /// Root node for text without a recognizable operation: spans the whole
    /// text and has nothing addressable below it.
    pub fn degenerate(text_len: usize) -> Self {
        Self::new(
            NodeKind::Operation,
            mwp_dsl_path::OPERATION.to_string(),
            Span::new(0, text_len),
            None,
        )
    }

    /// True for the placeholder root produced from unparseable text.
    pub fn is_degenerate(&self) -> bool {
        self.kind == NodeKind::Operation && self.value.is_none() && self.children.is_empty()
    }

    pub fn value(&self) -> Option<&str> {
        self.value.as_deref()
    }

    /// Property key, read off the last path step. `None` for other kinds.
    pub fn key(&self) -> Option<&str> {
        if self.kind != NodeKind::Property {
            return None;
        }
        let last = self.path.rsplit('/').next()?;
        Some(last.split('[').next().unwrap_or(last))
    }

    /// The direct property child named `key`.
    pub fn property(&self, key: &str) -> Option<&Node> {
        self.children
            .iter()
            .find(|c| c.kind == NodeKind::Property && c.key() == Some(key))
    }

    /// Value of the direct property child named `key`.
    pub fn property_value(&self, key: &str) -> Option<&str> {
        self.property(key).and_then(|p| p.value())
    }

    /// Pre-order traversal, `self` first.
    pub fn walk(&self) -> Walk<'_> {
        Walk { stack: vec![self] }
    }

    /// All paths in pre-order.
    pub fn paths(&self) -> Vec<&str> {
        self.walk().map(|n| n.path.as_str()).collect()
    }

    /// `(path, kind, value)` for every node in pre-order; offsets excluded.
    ///
    /// Two trees parsed from different renderings of the same DSL compare
    /// equal here even though their spans differ.
    pub fn structure(&self) -> Vec<(String, NodeKind, Option<String>)> {
        self.walk()
            .map(|n| (n.path.clone(), n.kind, n.value.clone()))
            .collect()
    }
}

impl Default for Node {
    /// The degenerate root of empty text.
    fn default() -> Self {
        Node::degenerate(0)
    }
}

/// Pre-order iterator over a tree.
pub struct Walk<'a> {
    stack: Vec<&'a Node>,
}

impl<'a> Iterator for Walk<'a> {
    type Item = &'a Node;

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.stack.pop()?;
        self.stack.extend(node.children.iter().rev());
        Some(node)
    }
}

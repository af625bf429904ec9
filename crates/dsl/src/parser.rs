//! Recursive-descent builder for the operation tree.

use mwp_dsl_path::{entity_path, nested_operation_path, OPERATION};
use tracing::{debug, trace};

use crate::entity::{identifier_len, parse_entity};
use crate::node::{Node, NodeKind, Span};
use crate::split::split_top_level_spans;

/// DSL tree builder.
///
/// Every span is absolute against the one text buffer handed to
/// [`DslParser::parse`], never relative to a substring.
pub struct DslParser<'a> {
    text: &'a str,
}

impl<'a> DslParser<'a> {
    /// Parse DSL text into a single-rooted tree.
    ///
    /// Never fails: text without an `Identifier(` at the start of some line
    /// yields a degenerate root spanning the whole text, and segments that
    /// are neither entities nor operation calls are skipped.
    pub fn parse(text: &'a str) -> Node {
        let parser = Self { text };
        match parser.find_root() {
            Some((name_start, name_end, open)) => {
                let name = &text[name_start..name_end];
                parser.parse_operation(name_start, name, open, text.len(), OPERATION.to_string())
            }
            None => {
                debug!(len = text.len(), "No root operation found");
                Node::degenerate(text.len())
            }
        }
    }

    /// First line whose leading identifier is followed by `(`.
    ///
    /// Returns the identifier's start and end and the paren's offset.
    fn find_root(&self) -> Option<(usize, usize, usize)> {
        let mut line_start = 0;
        for line in self.text.split('\n') {
            let rest = line.trim_start_matches([' ', '\t']);
            let name_start = line_start + (line.len() - rest.len());
            let name_len = identifier_len(rest);
            if name_len > 0 {
                let after = rest[name_len..].trim_start_matches([' ', '\t']);
                if after.starts_with('(') {
                    let open = line_start + (line.len() - after.len());
                    return Some((name_start, name_start + name_len, open));
                }
            }
            line_start += line.len() + 1;
        }
        None
    }

    /// Parse `name(...)` whose paren sits at `open`, scanning no further than `limit`.
    fn parse_operation(&self, start: usize, name: &str, open: usize, limit: usize, path: String) -> Node {
        let close = self.matching_close(open, limit);
        let end = close.map_or(limit, |c| c + 1);
        let inner_start = open + 1;
        let inner = &self.text[inner_start..close.unwrap_or(limit)];
        trace!(path = %path, name, start, end, "Parsing operation");

        let mut node = Node::new(NodeKind::Operation, path, Span::new(start, end), Some(name.to_string()));
        for (offset, segment) in split_top_level_spans(inner) {
            let abs = inner_start + offset;
            let index = node.children.len();
            if let Some(paren) = operation_call(segment) {
                let slot = entity_path(&node.path, index);
                let child = self.parse_operation(
                    abs,
                    &segment[..identifier_len(segment)],
                    abs + paren,
                    abs + segment.len(),
                    nested_operation_path(&slot),
                );
                node.children.push(child);
            } else if let Some(entity) = parse_entity(segment, index, abs, &node.path, self.text) {
                node.children.push(entity);
            } else {
                debug!(segment, parent = %node.path, "Skipping opaque segment");
            }
        }
        node
    }

    /// Offset of the bracket closing the one at `open`, if it closes before `limit`.
    fn matching_close(&self, open: usize, limit: usize) -> Option<usize> {
        let mut depth = 0usize;
        for (i, b) in self.text.as_bytes()[open..limit].iter().enumerate() {
            match b {
                b'[' | b'(' => depth += 1,
                b']' | b')' => {
                    depth = depth.saturating_sub(1);
                    if depth == 0 {
                        return Some(open + i);
                    }
                }
                _ => {}
            }
        }
        None
    }
}

/// If `segment` is a whole `Identifier(...)` call, the offset of its `(`.
fn operation_call(segment: &str) -> Option<usize> {
    let name_len = identifier_len(segment);
    if name_len == 0 || !segment.ends_with(')') {
        return None;
    }
    let after = segment[name_len..].trim_start();
    after
        .starts_with('(')
        .then(|| segment.len() - after.len())
}

/// Parse DSL text into a tree. See [`DslParser::parse`].
///
/// # Example
///
/// ```
/// use mwp_dsl::{parse_dsl, NodeKind};
///
/// let tree = parse_dsl("add(entity[entity_quantity: 3], entity[entity_quantity: 2])");
/// assert_eq!(tree.path, "operation");
/// assert_eq!(tree.value(), Some("add"));
/// assert_eq!(tree.children[1].property_value("entity_quantity"), Some("2"));
/// assert_eq!(tree.children[1].kind, NodeKind::Entity);
/// ```
pub fn parse_dsl(text: &str) -> Node {
    DslParser::parse(text)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SIMPLE: &str =
        "add(entity[entity_type: apple, entity_quantity: 3], entity[entity_type: apple, entity_quantity: 2])";

    #[test]
    fn test_simple_addition() {
        let tree = parse_dsl(SIMPLE);
        assert_eq!(tree.kind, NodeKind::Operation);
        assert_eq!(tree.span, Span::new(0, SIMPLE.len()));
        assert_eq!(tree.children.len(), 2);
        assert_eq!(tree.children[0].path, "operation/entities[0]");
        assert_eq!(tree.children[1].path, "operation/entities[1]");
        let q0 = tree.children[0].property("entity_quantity").unwrap();
        assert_eq!(q0.path, "operation/entities[0]/entity_quantity");
        assert_eq!(q0.value(), Some("3"));
        assert_eq!(tree.children[1].property_value("entity_quantity"), Some("2"));
    }

    #[test]
    fn test_entity_offsets_are_absolute() {
        let tree = parse_dsl(SIMPLE);
        for child in &tree.children {
            let text = &SIMPLE[child.span.start..child.span.end];
            assert!(text.starts_with("entity["));
            assert!(text.ends_with(']'));
        }
    }

    #[test]
    fn test_nested_operation() {
        let text = "add(entity[entity_quantity: 1], subtract(entity[entity_quantity: 5], entity[entity_quantity: 2]))";
        let tree = parse_dsl(text);
        let nested = &tree.children[1];
        assert_eq!(nested.kind, NodeKind::Operation);
        assert_eq!(nested.path, "operation/entities[1]/operation");
        assert_eq!(nested.value(), Some("subtract"));
        assert_eq!(&text[nested.span.start..nested.span.end], "subtract(entity[entity_quantity: 5], entity[entity_quantity: 2])");
        assert_eq!(nested.children[0].path, "operation/entities[1]/operation/entities[0]");
        assert_eq!(nested.children[1].path, "operation/entities[1]/operation/entities[1]");
        assert_eq!(nested.children[0].property_value("entity_quantity"), Some("5"));
    }

    #[test]
    fn test_root_after_preamble() {
        let text = "Visual language:\n  addition(container1[entity_quantity: 2])\n";
        let tree = parse_dsl(text);
        assert_eq!(tree.value(), Some("addition"));
        assert_eq!(&text[tree.span.start..tree.span.end], "addition(container1[entity_quantity: 2])");
    }

    #[test]
    fn test_missing_root_is_degenerate() {
        let text = "there is no operation here";
        let tree = parse_dsl(text);
        assert!(tree.is_degenerate());
        assert_eq!(tree.span, Span::new(0, text.len()));
        assert!(parse_dsl("").is_degenerate());
    }

    #[test]
    fn test_unclosed_root_extends_to_end() {
        let text = "add(entity[entity_quantity: 3], entity[entity_quantity: 2]";
        let tree = parse_dsl(text);
        assert_eq!(tree.span.end, text.len());
        assert_eq!(tree.children.len(), 2);
    }

    #[test]
    fn test_opaque_segments_do_not_consume_indices() {
        let text = "add(7, entity[entity_quantity: 3], oops[, result_container[container_name: Total])";
        let tree = parse_dsl(text);
        assert_eq!(tree.children[0].path, "operation/entities[0]");
        assert_eq!(tree.children[0].property_value("entity_quantity"), Some("3"));
    }

    #[test]
    fn test_result_container_is_container() {
        let tree = parse_dsl("addition(container1[entity_quantity: 2], result_container[entity_quantity: 5])");
        assert_eq!(tree.children[0].kind, NodeKind::Entity);
        assert_eq!(tree.children[1].kind, NodeKind::Container);
    }
}

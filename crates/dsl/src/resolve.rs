//! Cursor offset to path resolution.

use crate::node::{Node, NodeKind};

/// The innermost node whose span contains `offset`.
///
/// Returns `None` when the root does not contain `offset`, which includes a
/// caret sitting at or past the end of the text. Property nodes are leaves
/// here: their list items share the property's line span, so the cursor
/// resolves to the property itself rather than to its first item.
pub fn resolve_node(tree: &Node, offset: usize) -> Option<&Node> {
    if !tree.span.contains(offset) {
        return None;
    }
    let mut node = tree;
    while node.kind != NodeKind::Property {
        match node.children.iter().find(|c| c.span.contains(offset)) {
            Some(child) => node = child,
            None => break,
        }
    }
    Some(node)
}

/// Path of the innermost node containing `offset`. See [`resolve_node`].
///
/// # Example
///
/// ```
/// use mwp_dsl::{parse_dsl, resolve_path};
///
/// let text = "add(\n  entity[\n    entity_quantity: 3\n  ]\n)";
/// let tree = parse_dsl(text);
/// let caret = text.find("quantity").unwrap();
/// assert_eq!(resolve_path(&tree, caret), Some("operation/entities[0]/entity_quantity"));
/// assert_eq!(resolve_path(&tree, 0), Some("operation"));
/// assert_eq!(resolve_path(&tree, text.len()), None);
/// ```
pub fn resolve_path(tree: &Node, offset: usize) -> Option<&str> {
    resolve_node(tree, offset).map(|n| n.path.as_str())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parse_dsl;

    const PRETTY: &str = "add(\n  entity[\n    entity_type: apple,\n    entity_quantity: 3\n  ],\n  entity[\n    entity_type: apple,\n    entity_quantity: 2\n  ]\n)";

    #[test]
    fn test_whole_line_resolves_to_property() {
        let tree = parse_dsl(PRETTY);
        let line_start = PRETTY.find("    entity_quantity: 3").unwrap();
        let line_end = line_start + "    entity_quantity: 3".len();
        for offset in line_start..line_end {
            assert_eq!(
                resolve_path(&tree, offset),
                Some("operation/entities[0]/entity_quantity"),
                "offset {offset}"
            );
        }
    }

    #[test]
    fn test_entity_header_resolves_to_entity() {
        let tree = parse_dsl(PRETTY);
        let second = PRETTY.rfind("entity[").unwrap();
        assert_eq!(resolve_path(&tree, second), Some("operation/entities[1]"));
    }

    #[test]
    fn test_between_entities_resolves_to_operation() {
        let tree = parse_dsl(PRETTY);
        let comma = PRETTY.find("],").unwrap() + 1;
        assert_eq!(resolve_path(&tree, comma), Some("operation"));
    }

    #[test]
    fn test_end_of_text_is_unaddressable() {
        let tree = parse_dsl(PRETTY);
        assert_eq!(resolve_path(&tree, PRETTY.len()), None);
        assert_eq!(resolve_path(&tree, PRETTY.len() + 10), None);
        assert_eq!(resolve_path(&tree, PRETTY.len() - 1), Some("operation"));
    }

    #[test]
    fn test_multi_valued_line_resolves_to_property() {
        let text = "add(\n  entity[\n    entity_type: apple, banana\n  ]\n)";
        let tree = parse_dsl(text);
        let offset = text.find("banana").unwrap();
        assert_eq!(resolve_path(&tree, offset), Some("operation/entities[0]/entity_type"));
    }

    #[test]
    fn test_degenerate_root() {
        let tree = parse_dsl("hello");
        assert_eq!(resolve_path(&tree, 2), Some("operation"));
        assert_eq!(resolve_path(&tree, 5), None);
        assert_eq!(resolve_path(&parse_dsl(""), 0), None);
    }
}

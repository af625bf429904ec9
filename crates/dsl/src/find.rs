//! Path to node lookup.

use mwp_dsl_path::{DslPath, Step};

use crate::node::{Node, NodeKind};

/// Child indices leading from the root to the node `path` names.
///
/// Nodes are located by position, not by comparing their stored `path`
/// strings, so lookup follows the tree's actual shape.
fn locate(tree: &Node, path: &DslPath) -> Option<Vec<usize>> {
    let steps = path.steps();
    if steps.first() != Some(&Step::Operation) || tree.kind != NodeKind::Operation {
        return None;
    }

    let mut indices = Vec::new();
    let mut node = tree;
    let mut i = 1;
    while i < steps.len() {
        match &steps[i] {
            Step::Entity(slot) => {
                let child = node.children.get(*slot)?;
                let nested = steps.get(i + 1) == Some(&Step::Operation);
                match (child.kind, nested) {
                    (NodeKind::Operation, true) => i += 1,
                    (NodeKind::Entity | NodeKind::Container, false) => {}
                    _ => return None,
                }
                indices.push(*slot);
                node = child;
            }
            Step::Property { key, index } => {
                if !node.kind.is_entity_like() {
                    return None;
                }
                let at = node
                    .children
                    .iter()
                    .position(|c| c.kind == NodeKind::Property && c.key() == Some(key.as_str()))?;
                indices.push(at);
                node = &node.children[at];
                if let Some(j) = index {
                    node = node.children.get(*j)?;
                    indices.push(*j);
                }
            }
            Step::Operation => return None,
        }
        i += 1;
    }
    Some(indices)
}

/// The node `path` names in `tree`.
///
/// # Example
///
/// ```
/// use mwp_dsl::{find_node, parse_dsl};
/// use mwp_dsl_path::DslPath;
///
/// let tree = parse_dsl("add(entity[entity_quantity: 3], sub(entity[entity_type: a, b]))");
/// let path = DslPath::parse("operation/entities[1]/operation/entities[0]/entity_type[1]").unwrap();
/// assert_eq!(find_node(&tree, &path).unwrap().value(), Some("b"));
/// ```
pub fn find_node<'a>(tree: &'a Node, path: &DslPath) -> Option<&'a Node> {
    let indices = locate(tree, path)?;
    let mut node = tree;
    for i in indices {
        node = &node.children[i];
    }
    Some(node)
}

/// Mutable variant of [`find_node`].
pub fn find_node_mut<'a>(tree: &'a mut Node, path: &DslPath) -> Option<&'a mut Node> {
    let indices = locate(tree, path)?;
    let mut node = tree;
    for i in indices {
        node = &mut node.children[i];
    }
    Some(node)
}

/// Parse `path` and look it up; `None` for unparseable or missing paths.
pub fn find_by_path<'a>(tree: &'a Node, path: &str) -> Option<&'a Node> {
    let path = DslPath::parse(path).ok()?;
    find_node(tree, &path)
}

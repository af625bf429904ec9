//! Clone-then-edit operations on a tree.

use mwp_dsl_path::{property_item_path, DslPath, PathError, Step};
use thiserror::Error;
use tracing::debug;

use crate::entity::{canonical_value, identifier_len, split_key};
use crate::find::find_node_mut;
use crate::format::{format_with, FormatOptions, Formatted};
use crate::node::{Node, NodeKind};
use crate::parser::parse_dsl;
use crate::split::is_balanced;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum EditError {
    #[error("Invalid path: {0}")]
    InvalidPath(#[from] PathError),
    #[error("No node at path: {0}")]
    NotFound(String),
    #[error("Node at path cannot be edited: {0}")]
    NotEditable(String),
    #[error("Invalid value for {path}: {value}")]
    InvalidValue { path: String, value: String },
}

/// Return a copy of `tree` with the value at `path` replaced.
///
/// `tree` itself is never touched. For operations and entities the value is
/// the name or type literal and must be an identifier; an entity renamed to
/// `result_container` becomes a container and back. Setting a property
/// re-splits its list items; setting one item rejoins the property's value.
///
/// # Errors
///
/// `NotFound` when `path` does not name a node of `tree`, typically a path
/// held across a reformat. The caller should fetch a fresh mapping rather
/// than retry.
///
/// # Example
///
/// ```
/// use mwp_dsl::{parse_dsl, set_value};
///
/// let tree = parse_dsl("add(entity[entity_quantity: 3])");
/// let edited = set_value(&tree, "operation/entities[0]/entity_quantity", "4").unwrap();
/// assert_eq!(edited.children[0].property_value("entity_quantity"), Some("4"));
/// assert_eq!(tree.children[0].property_value("entity_quantity"), Some("3"));
/// ```
pub fn set_value(tree: &Node, path: &str, value: &str) -> Result<Node, EditError> {
    let parsed = DslPath::parse(path)?;
    let mut edited = tree.clone();
    let invalid = || EditError::InvalidValue { path: path.to_string(), value: value.to_string() };

    match parsed.last() {
        Step::Property { index: Some(j), .. } => {
            let (canonical, items) = canonical_value(value);
            if items.len() != 1 || !is_plain_item(&canonical) {
                return Err(invalid());
            }
            let prop_path = parsed.parent().ok_or_else(|| not_found(path))?;
            let prop = find_node_mut(&mut edited, &prop_path).ok_or_else(|| not_found(path))?;
            let item = prop.children.get_mut(*j).ok_or_else(|| not_found(path))?;
            item.value = Some(canonical);
            let joined = prop
                .children
                .iter()
                .map(|c| c.value().unwrap_or_default())
                .collect::<Vec<_>>()
                .join(", ");
            prop.value = Some(joined);
        }
        Step::Property { index: None, .. } => {
            let (canonical, items) = canonical_value(value);
            if !items.iter().all(|i| is_plain_item(i)) {
                return Err(invalid());
            }
            let prop = find_node_mut(&mut edited, &parsed).ok_or_else(|| not_found(path))?;
            let children: Vec<Node> = if items.len() > 1 {
                items
                    .into_iter()
                    .enumerate()
                    .map(|(j, item)| {
                        Node::new(NodeKind::Property, property_item_path(&prop.path, j), prop.span, Some(item))
                    })
                    .collect()
            } else {
                Vec::new()
            };
            prop.children = children;
            prop.value = Some(canonical);
        }
        Step::Entity(_) | Step::Operation => {
            let name = value.trim();
            if name.is_empty() || identifier_len(name) != name.len() {
                return Err(invalid());
            }
            let node = find_node_mut(&mut edited, &parsed).ok_or_else(|| not_found(path))?;
            if node.is_degenerate() {
                return Err(EditError::NotEditable(path.to_string()));
            }
            if node.kind.is_entity_like() {
                node.kind = NodeKind::for_entity_type(name);
            }
            node.value = Some(name.to_string());
        }
    }
    Ok(edited)
}

/// Parse `text`, set `path` to `value`, and format the result.
///
/// The returned text and mapping replace the old ones wholesale; paths and
/// offsets from before the edit must be re-resolved against the new text.
pub fn update_dsl(text: &str, path: &str, value: &str, options: &FormatOptions) -> Result<Formatted, EditError> {
    let tree = parse_dsl(text);
    let edited = set_value(&tree, path, value)?;
    Ok(format_with(&edited, options))
}

fn not_found(path: &str) -> EditError {
    debug!(path, "Edit target not found");
    EditError::NotFound(path.to_string())
}

/// A list item must survive a format/parse cycle unchanged: balanced, and
/// not mistakable for a `key:` of its own. Empty items are dropped by
/// [`canonical_value`] before they get here.
fn is_plain_item(item: &str) -> bool {
    is_balanced(item) && split_key(item).is_none()
}

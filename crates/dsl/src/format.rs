//! Canonical serialization of a tree with a freshly computed mapping.
//!
//! Pretty form puts every operation and entity on its own opening and
//! closing lines and one property per line:
//!
//! ```text
//! add(
//!   entity[
//!     entity_type: apple,
//!     entity_quantity: 3
//!   ],
//!   subtract(
//!     entity[
//!       entity_quantity: 5
//!     ]
//!   )
//! )
//! ```
//!
//! Minified form is the same tree on one line with a single space after each
//! colon and comma. Paths in the output mapping are recomputed from position,
//! not copied from the input nodes.

use mwp_dsl_path::{entity_path, nested_operation_path, property_item_path, property_path, OPERATION};
use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use crate::entity::property_span;
use crate::mapping::ComponentMapping;
use crate::node::{Node, NodeKind, Span, RESULT_CONTAINER};

/// Layout of the emitted text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FormatStyle {
    /// Multi-line, one property per line.
    #[default]
    Pretty,
    /// Single line, used when sending DSL to the generation service.
    Minified,
}

/// Formatter settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FormatOptions {
    /// Spaces per nesting level in pretty output. Default is 2.
    pub indent_width: usize,
    pub style: FormatStyle,
}

impl Default for FormatOptions {
    fn default() -> Self {
        Self { indent_width: 2, style: FormatStyle::Pretty }
    }
}

impl FormatOptions {
    pub fn minified() -> Self {
        Self { style: FormatStyle::Minified, ..Self::default() }
    }
}

/// Emitted text and the mapping built against it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Formatted {
    pub text: String,
    pub mapping: ComponentMapping,
}

/// Pretty-print `tree` with default options.
///
/// # Example
///
/// ```
/// use mwp_dsl::{format, parse_dsl};
///
/// let out = format(&parse_dsl("add(entity[entity_quantity: 3])"));
/// assert_eq!(out.text, "add(\n  entity[\n    entity_quantity: 3\n  ]\n)");
/// let range = out.mapping.range_of("operation/entities[0]/entity_quantity").unwrap();
/// assert_eq!(&out.text[range.start..range.end], "    entity_quantity: 3");
/// ```
pub fn format(tree: &Node) -> Formatted {
    format_with(tree, &FormatOptions::default())
}

/// Single-line form of `tree`.
///
/// # Example
///
/// ```
/// use mwp_dsl::{minify, parse_dsl};
///
/// let text = "add(\n  entity[\n    entity_type: apple,\n    entity_quantity: 3\n  ]\n)";
/// assert_eq!(minify(&parse_dsl(text)), "add(entity[entity_type: apple, entity_quantity: 3])");
/// ```
pub fn minify(tree: &Node) -> String {
    format_with(tree, &FormatOptions::minified()).text
}

/// Serialize `tree` and build the mapping for the produced text.
///
/// A degenerate root has no canonical form and produces empty text.
pub fn format_with(tree: &Node, options: &FormatOptions) -> Formatted {
    let mut formatter = Formatter {
        out: String::new(),
        options,
        mapping: ComponentMapping::new(),
    };
    if tree.is_degenerate() || tree.kind != NodeKind::Operation {
        debug!(kind = ?tree.kind, "Nothing to format");
    } else {
        formatter.operation(tree, OPERATION.to_string(), 0);
    }
    trace!(len = formatter.out.len(), entries = formatter.mapping.len(), "Formatted tree");
    Formatted { text: formatter.out, mapping: formatter.mapping }
}

struct Formatter<'o> {
    out: String,
    options: &'o FormatOptions,
    mapping: ComponentMapping,
}

/// A property whose line span is known only once its entity is closed.
struct PendingProperty {
    path: String,
    key_start: usize,
    items: usize,
}

impl Formatter<'_> {
    fn pretty(&self) -> bool {
        self.options.style == FormatStyle::Pretty
    }

    fn separator(&mut self, first: bool) {
        if !first {
            self.out.push(',');
            if !self.pretty() {
                self.out.push(' ');
            }
        }
    }

    fn line(&mut self, depth: usize) {
        if self.pretty() {
            self.out.push('\n');
            for _ in 0..depth * self.options.indent_width {
                self.out.push(' ');
            }
        }
    }

    fn operation(&mut self, node: &Node, path: String, depth: usize) {
        let start = self.out.len();
        // Inserted now, ranged later, so the mapping stays in pre-order.
        self.mapping.insert(path.clone(), Span::new(start, start), node.value.clone());
        self.out.push_str(node.value().unwrap_or_default());
        self.out.push('(');

        let slots = node.children.iter().filter(|c| c.kind != NodeKind::Property);
        let mut count = 0;
        for child in slots {
            self.separator(count == 0);
            self.line(depth + 1);
            let slot = entity_path(&path, count);
            match child.kind {
                NodeKind::Operation => self.operation(child, nested_operation_path(&slot), depth + 1),
                _ => self.entity(child, slot, depth + 1),
            }
            count += 1;
        }
        if count > 0 {
            self.line(depth);
        }
        self.out.push(')');
        self.mapping.set_range(&path, Span::new(start, self.out.len()));
    }

    fn entity(&mut self, node: &Node, path: String, depth: usize) {
        let start = self.out.len();
        let type_name = match (node.value(), node.kind) {
            (Some(v), _) => v,
            (None, NodeKind::Container) => RESULT_CONTAINER,
            (None, _) => "entity",
        };
        self.mapping.insert(path.clone(), Span::new(start, start), Some(type_name.to_string()));
        self.out.push_str(type_name);
        self.out.push('[');

        let mut pending = Vec::new();
        for prop in node.children.iter().filter(|c| c.kind == NodeKind::Property) {
            let Some(key) = prop.key() else {
                debug!(path = %prop.path, "Skipping property without a key");
                continue;
            };
            self.separator(pending.is_empty());
            self.line(depth + 1);

            let key_start = self.out.len();
            let prop_path = property_path(&path, key);
            let value = rendered_value(prop);
            self.out.push_str(key);
            self.out.push(':');
            if !value.is_empty() {
                self.out.push(' ');
                self.out.push_str(&value);
            }

            self.mapping.insert(prop_path.clone(), Span::new(key_start, key_start), Some(value));
            for (j, item) in prop.children.iter().enumerate() {
                self.mapping
                    .insert(property_item_path(&prop_path, j), Span::new(key_start, key_start), item.value.clone());
            }
            pending.push(PendingProperty { path: prop_path, key_start, items: prop.children.len() });
        }
        if !pending.is_empty() {
            self.line(depth);
        }
        self.out.push(']');

        let span = Span::new(start, self.out.len());
        self.mapping.set_range(&path, span);
        for prop in pending {
            let range = property_span(&self.out, prop.key_start, &span);
            self.mapping.set_range(&prop.path, range);
            for j in 0..prop.items {
                self.mapping.set_range(&property_item_path(&prop.path, j), range);
            }
        }
    }
}

/// Items win over the stored value so that an edited item is emitted.
fn rendered_value(prop: &Node) -> String {
    if prop.children.is_empty() {
        return prop.value().unwrap_or_default().to_string();
    }
    prop.children
        .iter()
        .map(|item| item.value().unwrap_or_default())
        .collect::<Vec<_>>()
        .join(", ")
}

//! Parser, cursor resolver, and canonical formatter for the math-word-problem
//! visual language.
//!
//! The DSL describes a problem as operations over entities:
//!
//! ```text
//! addition(
//!   container1[
//!     entity_name: apple,
//!     entity_type: apple,
//!     entity_quantity: 3,
//!     container_name: Jane
//!   ],
//!   result_container[
//!     entity_quantity: 5
//!   ]
//! )
//! ```
//!
//! Parsing records the byte span of every node in the source text, and
//! every node gets a path (see [`mwp_dsl_path`]). Formatting emits canonical
//! text together with a [`ComponentMapping`] from path to span in that new
//! text. Text editors, the prose view, and the rendered diagram all meet on
//! those paths.
//!
//! # Example
//!
//! ```
//! use mwp_dsl::{format, minify, parse_dsl, resolve_path, set_value};
//!
//! let tree = parse_dsl("add(entity[entity_type: apple, entity_quantity: 3], entity[entity_type: apple, entity_quantity: 2])");
//! let pretty = format(&tree);
//!
//! // Cursor anywhere on a property line resolves to that property.
//! let reparsed = parse_dsl(&pretty.text);
//! let caret = pretty.text.find("quantity: 2").unwrap();
//! assert_eq!(resolve_path(&reparsed, caret), Some("operation/entities[1]/entity_quantity"));
//!
//! // Edits clone, then reformat; the old mapping is discarded.
//! let edited = set_value(&tree, "operation/entities[1]/entity_quantity", "4").unwrap();
//! assert_eq!(
//!     minify(&edited),
//!     "add(entity[entity_type: apple, entity_quantity: 3], entity[entity_type: apple, entity_quantity: 4])"
//! );
//! ```

mod node;
pub use node::{Node, NodeKind, Span, Walk, RESULT_CONTAINER};

mod split;
pub use split::{split_top_level_entities, split_top_level_spans};

mod entity;
pub use entity::{canonical_value, parse_entity, property_span};

mod parser;
pub use parser::{parse_dsl, DslParser};

mod resolve;
pub use resolve::{resolve_node, resolve_path};

mod mapping;
pub use mapping::{ComponentMapping, MappingEntry};

mod format;
pub use format::{format, format_with, minify, FormatOptions, FormatStyle, Formatted};

mod find;
pub use find::{find_by_path, find_node, find_node_mut};

mod edit;
pub use edit::{set_value, update_dsl, EditError};

/// Minified form of arbitrary DSL text, for sending to the generation service.
///
/// Text without a root operation minifies to an empty string.
pub fn minify_dsl(text: &str) -> String {
    minify(&parse_dsl(text))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_minify_dsl() {
        let text = "addition(\n  container1[\n    entity_quantity: 3\n  ]\n)\n";
        assert_eq!(minify_dsl(text), "addition(container1[entity_quantity: 3])");
        assert_eq!(minify_dsl("hello"), "");
    }

    #[test]
    fn test_pretty_minified_same_structure() {
        let text = "add(entity[entity_type: apple, banana, entity_quantity: 3], subtract(entity[entity_quantity: 5], entity[entity_quantity: 2]))";
        let tree = parse_dsl(text);
        let pretty = parse_dsl(&format(&tree).text);
        let minified = parse_dsl(&minify(&tree));
        assert_eq!(pretty.structure(), tree.structure());
        assert_eq!(minified.structure(), tree.structure());
    }
}

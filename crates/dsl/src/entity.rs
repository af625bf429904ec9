//! Parsing of a single `Type[key: value, ...]` entity.

use mwp_dsl_path::{entity_path, property_item_path, property_path, ENTITIES, OPERATION};
use tracing::{debug, trace};

use crate::node::{Node, NodeKind, Span};
use crate::split::{split_top_level_entities, split_top_level_spans};

/// Parse one entity segment.
///
/// `raw` is the trimmed segment text and `absolute_start` its offset in
/// `full_text`. Returns `None` when `raw` is not shaped like
/// `Identifier[...]`; the caller treats such a segment as opaque.
///
/// Property spans are widened to the full source line holding the property,
/// clamped to the entity's own span. Multi-valued properties get one child
/// per item at `key[j]`, each sharing the property's span.
pub fn parse_entity(
    raw: &str,
    index: usize,
    absolute_start: usize,
    parent_path: &str,
    full_text: &str,
) -> Option<Node> {
    let type_len = identifier_len(raw);
    if type_len == 0 {
        return None;
    }
    let type_name = &raw[..type_len];
    let after_type = raw[type_len..].trim_start();
    let open = raw.len() - after_type.len();
    if !after_type.starts_with('[') || !raw.ends_with(']') {
        return None;
    }

    let path = entity_path(parent_path, index);
    let span = Span::new(absolute_start, absolute_start + raw.len());
    let mut entity = Node::new(
        NodeKind::for_entity_type(type_name),
        path,
        span,
        Some(type_name.to_string()),
    );

    let inner_start = open + 1;
    let inner = &raw[inner_start..raw.len() - 1];
    for prop in group_properties(inner, &entity.path) {
        let key_start = absolute_start + inner_start + prop.key_offset;
        let prop_span = property_span(full_text, key_start, &span);
        let prop_path = property_path(&entity.path, prop.key);
        let (canonical, items) = canonical_value(&inner[prop.value_start..prop.value_end]);
        trace!(path = %prop_path, start = prop_span.start, end = prop_span.end, "Parsed property");

        let mut node = Node::new(NodeKind::Property, prop_path, prop_span, Some(canonical));
        if items.len() > 1 {
            let children: Vec<Node> = items
                .into_iter()
                .enumerate()
                .map(|(j, item)| {
                    Node::new(
                        NodeKind::Property,
                        property_item_path(&node.path, j),
                        prop_span,
                        Some(item),
                    )
                })
                .collect();
            node.children = children;
        }
        entity.children.push(node);
    }

    Some(entity)
}

/// A `key: value` pair located inside an entity body.
///
/// Offsets are relative to the body. The value runs from after the colon to
/// the end of the last segment belonging to this property.
struct RawProperty<'a> {
    key: &'a str,
    key_offset: usize,
    value_start: usize,
    value_end: usize,
}

/// Group top-level segments of an entity body into properties.
///
/// A segment without its own `key:` continues the value of the property
/// before it; that is how multi-valued properties such as
/// `entity_type: apple, banana` are written. A key repeated within one
/// entity is skipped along with its continuation segments, so every
/// property path stays unique.
fn group_properties<'a>(inner: &'a str, owner: &str) -> Vec<RawProperty<'a>> {
    let mut props: Vec<RawProperty<'a>> = Vec::new();
    let mut open = false;
    for (offset, segment) in split_top_level_spans(inner) {
        match split_key(segment) {
            Some((key, _)) if props.iter().any(|p| p.key == key) => {
                debug!(key, entity = owner, "Skipping repeated property key");
                open = false;
            }
            Some((key, colon)) if is_property_key(key) => {
                props.push(RawProperty {
                    key,
                    key_offset: offset,
                    value_start: offset + colon + 1,
                    value_end: offset + segment.len(),
                });
                open = true;
            }
            Some((key, _)) => {
                debug!(key, entity = owner, "Skipping property with unusable key");
                open = false;
            }
            None => match props.last_mut() {
                Some(prop) if open => prop.value_end = offset + segment.len(),
                _ => debug!(segment, entity = owner, "Skipping segment without a key"),
            },
        }
    }
    props
}

/// `key` and colon offset when `segment` starts with `key:`.
///
/// A colon behind an opening bracket belongs to a nested value, not a key.
pub(crate) fn split_key(segment: &str) -> Option<(&str, usize)> {
    let colon = segment.find(':')?;
    let head = &segment[..colon];
    if head.contains(['[', '(']) {
        return None;
    }
    Some((head.trim(), colon))
}

/// Canonical form of a raw property value plus its list items.
///
/// Whitespace runs collapse to one space; the non-empty top-level items are
/// rejoined with `", "`, so stray commas disappear. `items` holds more than
/// one entry only for multi-valued properties.
pub fn canonical_value(raw: &str) -> (String, Vec<String>) {
    let items: Vec<String> = split_top_level_entities(raw)
        .into_iter()
        .map(collapse_whitespace)
        .collect();
    (items.join(", "), items)
}

fn collapse_whitespace(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// The line containing `pos`, without its line terminator, clamped to `bounds`.
///
/// The parser and the formatter both use this, so a formatted mapping and a
/// fresh parse of the same text agree on property spans.
pub fn property_span(text: &str, pos: usize, bounds: &Span) -> Span {
    let start = text[..pos].rfind('\n').map_or(0, |i| i + 1);
    let mut end = text[pos..].find('\n').map_or(text.len(), |i| pos + i);
    if end > start && text.as_bytes()[end - 1] == b'\r' {
        end -= 1;
    }
    Span::new(start, end).clamp_to(bounds)
}

/// Length in bytes of the identifier at the start of `s`, 0 if none.
pub(crate) fn identifier_len(s: &str) -> usize {
    let bytes = s.as_bytes();
    match bytes.first() {
        Some(b) if b.is_ascii_alphabetic() || *b == b'_' => {}
        _ => return 0,
    }
    bytes
        .iter()
        .take_while(|b| b.is_ascii_alphanumeric() || **b == b'_')
        .count()
}

/// Keys that would collide with path hops are not addressable.
fn is_property_key(key: &str) -> bool {
    identifier_len(key) == key.len() && key != OPERATION && key != ENTITIES
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_entity_basic() {
        let text = "entity[entity_type: apple, entity_quantity: 3]";
        let node = parse_entity(text, 0, 0, "operation", text).unwrap();
        assert_eq!(node.kind, NodeKind::Entity);
        assert_eq!(node.path, "operation/entities[0]");
        assert_eq!(node.value(), Some("entity"));
        assert_eq!(node.span, Span::new(0, text.len()));
        assert_eq!(node.children.len(), 2);
        assert_eq!(node.property_value("entity_quantity"), Some("3"));
        // Single-line source: property lines are clamped to the entity.
        assert_eq!(node.children[0].span, node.span);
    }

    #[test]
    fn test_parse_entity_rejects_non_entity() {
        assert!(parse_entity("add(a[x: 1])", 0, 0, "operation", "add(a[x: 1])").is_none());
        assert!(parse_entity("[x: 1]", 0, 0, "operation", "[x: 1]").is_none());
        assert!(parse_entity("a[x: 1] tail", 0, 0, "operation", "a[x: 1] tail").is_none());
        assert!(parse_entity("3", 0, 0, "operation", "3").is_none());
    }

    #[test]
    fn test_result_container_kind() {
        let text = "result_container[container_name: Total]";
        let node = parse_entity(text, 2, 0, "operation", text).unwrap();
        assert_eq!(node.kind, NodeKind::Container);
        assert_eq!(node.path, "operation/entities[2]");
    }

    #[test]
    fn test_multi_valued_property() {
        let text = "entity[entity_type: apple,  banana]";
        let node = parse_entity(text, 0, 0, "operation", text).unwrap();
        let prop = node.property("entity_type").unwrap();
        assert_eq!(prop.value(), Some("apple, banana"));
        assert_eq!(prop.children.len(), 2);
        assert_eq!(prop.children[0].path, "operation/entities[0]/entity_type[0]");
        assert_eq!(prop.children[1].path, "operation/entities[0]/entity_type[1]");
        assert_eq!(prop.children[0].value(), Some("apple"));
        assert_eq!(prop.children[1].value(), Some("banana"));
        assert_eq!(prop.children[0].span, prop.span);
        assert_eq!(prop.children[1].span, prop.span);
    }

    #[test]
    fn test_line_based_property_span() {
        let text = "add(\n  entity[\n    entity_type: apple,\n    entity_quantity: 3\n  ]\n)";
        let start = text.find("entity[").unwrap();
        let end = text.find("  ]").unwrap() + 3;
        let raw = &text[start..end];
        let node = parse_entity(raw, 0, start, "operation", text).unwrap();

        let qty = node.property("entity_quantity").unwrap();
        let line_start = text.find("    entity_quantity").unwrap();
        let line_end = line_start + "    entity_quantity: 3".len();
        assert_eq!(qty.span, Span::new(line_start, line_end));

        let ty = node.property("entity_type").unwrap();
        assert_eq!(&text[ty.span.start..ty.span.end], "    entity_type: apple,");
    }

    #[test]
    fn test_skips_malformed_properties() {
        let text = "entity[junk, entity_type: apple, operation: x, more, 9x: 1]";
        let node = parse_entity(text, 0, 0, "operation", text).unwrap();
        assert_eq!(node.children.len(), 1);
        assert_eq!(node.children[0].key(), Some("entity_type"));
        assert_eq!(node.children[0].value(), Some("apple"));
    }

    #[test]
    fn test_multi_valued_then_next_property() {
        let text = "entity[entity_type: apple, banana, entity_quantity: 3]";
        let node = parse_entity(text, 0, 0, "operation", text).unwrap();
        assert_eq!(node.children.len(), 2);
        assert_eq!(node.property_value("entity_type"), Some("apple, banana"));
        assert_eq!(node.property("entity_type").unwrap().children.len(), 2);
        assert_eq!(node.property_value("entity_quantity"), Some("3"));
        assert!(node.property("entity_quantity").unwrap().children.is_empty());
    }

    #[test]
    fn test_split_key() {
        assert_eq!(split_key("entity_type: apple"), Some(("entity_type", 11)));
        assert_eq!(split_key("banana"), None);
        assert_eq!(split_key("f(a: 1)"), None);
    }

    #[test]
    fn test_empty_value() {
        let text = "container1[attr_name: , attr_type:]";
        let node = parse_entity(text, 0, 0, "operation", text).unwrap();
        assert_eq!(node.property_value("attr_name"), Some(""));
        assert_eq!(node.property_value("attr_type"), Some(""));
        assert!(node.children[0].children.is_empty());
    }

    #[test]
    fn test_canonical_value() {
        assert_eq!(canonical_value("  3 "), ("3".to_string(), vec!["3".to_string()]));
        assert_eq!(
            canonical_value("big\n   red"),
            ("big red".to_string(), vec!["big red".to_string()])
        );
        assert_eq!(canonical_value("").0, "");
        let (v, items) = canonical_value("apple,banana");
        assert_eq!(v, "apple, banana");
        assert_eq!(items, vec!["apple", "banana"]);
        assert_eq!(canonical_value("Total,").0, "Total");
        assert_eq!(canonical_value(", apple,, banana ,").0, "apple, banana");
    }

    #[test]
    fn test_repeated_key_keeps_first() {
        let text = "add(\n  e[\n    a: 1,\n    a: 2, 3,\n    b: 4\n  ]\n)";
        let start = text.find("e[").unwrap();
        let end = text.rfind(']').unwrap() + 1;
        let node = parse_entity(&text[start..end], 0, start, "operation", text).unwrap();
        let paths: Vec<&str> = node.children.iter().map(|c| c.path.as_str()).collect();
        assert_eq!(paths, vec!["operation/entities[0]/a", "operation/entities[0]/b"]);
        let a = node.property("a").unwrap();
        assert_eq!(a.value(), Some("1"));
        assert!(a.children.is_empty());
        assert_eq!(&text[a.span.start..a.span.end], "    a: 1,");
    }
}

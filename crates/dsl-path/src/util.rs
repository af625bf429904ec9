//! String-level path helpers.
//!
//! The parser builds paths while it walks source text, so it works on plain
//! strings instead of round-tripping through [`DslPath`](crate::DslPath).

use crate::types::{ENTITIES, OPERATION};

/// `parent/entities[index]`.
pub fn entity_path(parent: &str, index: usize) -> String {
    format!("{parent}/{ENTITIES}[{index}]")
}

/// `slot/operation`, the path of a nested operation held by an entity slot.
pub fn nested_operation_path(slot: &str) -> String {
    format!("{slot}/{OPERATION}")
}

/// `entity/key`.
pub fn property_path(entity: &str, key: &str) -> String {
    format!("{entity}/{key}")
}

/// `property[index]`, one item of a multi-valued property.
pub fn property_item_path(property: &str, index: usize) -> String {
    format!("{property}[{index}]")
}

/// Check if `path` is a strict descendant of `ancestor`.
///
/// Descent is either a further `/step` or a `[j]` item suffix on the same
/// property.
///
/// # Example
///
/// ```
/// use mwp_dsl_path::is_descendant;
///
/// assert!(is_descendant("operation", "operation/entities[0]"));
/// assert!(is_descendant("operation/entities[0]/entity_type", "operation/entities[0]/entity_type[1]"));
/// assert!(!is_descendant("operation/entities[1]", "operation/entities[10]"));
/// assert!(!is_descendant("operation", "operation"));
/// ```
pub fn is_descendant(ancestor: &str, path: &str) -> bool {
    match path.strip_prefix(ancestor) {
        Some(rest) => rest.starts_with('/') || (rest.starts_with('[') && !ancestor.ends_with(']')),
        None => false,
    }
}

/// Check if a string is a valid non-negative index without leading zeros.
pub fn is_valid_index(index: &str) -> bool {
    if index.is_empty() {
        return false;
    }
    let bytes = index.as_bytes();
    if bytes.len() > 1 && bytes[0] == b'0' {
        return false;
    }
    bytes.iter().all(|&b| b.is_ascii_digit())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builders() {
        let e = entity_path("operation", 2);
        assert_eq!(e, "operation/entities[2]");
        let op = nested_operation_path(&e);
        assert_eq!(op, "operation/entities[2]/operation");
        let p = property_path(&entity_path(&op, 0), "entity_type");
        assert_eq!(p, "operation/entities[2]/operation/entities[0]/entity_type");
        assert_eq!(
            property_item_path(&p, 1),
            "operation/entities[2]/operation/entities[0]/entity_type[1]"
        );
    }

    #[test]
    fn test_is_descendant_prefix_is_not_enough() {
        assert!(!is_descendant("operation/entities[0]/entity", "operation/entities[0]/entity_type"));
        assert!(!is_descendant("operation/entities[0]/entity_type[1]", "operation/entities[0]/entity_type[1][0]"));
    }

    #[test]
    fn test_is_valid_index() {
        assert!(is_valid_index("0"));
        assert!(is_valid_index("12"));
        assert!(!is_valid_index(""));
        assert!(!is_valid_index("01"));
        assert!(!is_valid_index("-1"));
    }
}

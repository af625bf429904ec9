//! Path addressing for math-word-problem DSL trees.
//!
//! Every node of a parsed DSL tree is named by a `/`-delimited path string:
//!
//! - `operation` for the root operation,
//! - `/entities[i]` for the i-th entity (or nested operation slot) of an operation,
//! - `/operation` when an entity slot holds a nested operation call,
//! - `/key` for a property, and `/key[j]` for the j-th item of a multi-valued property.
//!
//! # Example
//!
//! ```
//! use mwp_dsl_path::{DslPath, Step};
//!
//! let path = DslPath::parse("operation/entities[1]/operation/entities[0]/entity_type[1]").unwrap();
//! assert_eq!(path.len(), 5);
//! assert_eq!(path.last(), &Step::property_item("entity_type", 1));
//! assert_eq!(path.parent().unwrap().to_string(), "operation/entities[1]/operation/entities[0]/entity_type");
//! ```

use thiserror::Error;

pub mod types;
pub use types::{DslPath, Step, ENTITIES, OPERATION};

pub mod util;
pub use util::{entity_path, is_descendant, is_valid_index, nested_operation_path, property_item_path, property_path};

pub mod validate;
pub use validate::{validate_path, ValidationError};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum PathError {
    #[error("Empty path")]
    EmptyPath,
    #[error("Path must start with 'operation'")]
    ExpectedRoot,
    #[error("Invalid path step: {0}")]
    InvalidStep(String),
    #[error("Invalid index in path step: {0}")]
    InvalidIndex(String),
    #[error("Unexpected path step: {0}")]
    UnexpectedStep(String),
}

/// Parse a path string into its steps.
///
/// The grammar is `operation(/entities[i](/operation)?)*(/key([j])?)?`: an
/// operation may only be followed by an entity hop, an entity hop by a nested
/// `operation` or a property, and a property ends the path.
///
/// # Example
///
/// ```
/// use mwp_dsl_path::{parse_steps, Step};
///
/// assert_eq!(parse_steps("operation").unwrap(), vec![Step::Operation]);
/// assert_eq!(
///     parse_steps("operation/entities[0]/entity_quantity").unwrap(),
///     vec![Step::Operation, Step::Entity(0), Step::property("entity_quantity")]
/// );
/// assert!(parse_steps("entities[0]").is_err());
/// assert!(parse_steps("operation/entity_quantity").is_err());
/// ```
pub fn parse_steps(input: &str) -> Result<Vec<Step>, PathError> {
    if input.is_empty() {
        return Err(PathError::EmptyPath);
    }
    let mut parts = input.split('/');
    if parts.next() != Some(OPERATION) {
        return Err(PathError::ExpectedRoot);
    }

    let mut steps = vec![Step::Operation];
    for part in parts {
        let (name, index) = split_index(part)?;
        let step = match steps.last() {
            Some(Step::Operation) => match (name, index) {
                (ENTITIES, Some(i)) => Step::Entity(i),
                _ => return Err(PathError::UnexpectedStep(part.to_string())),
            },
            Some(Step::Entity(_)) => match (name, index) {
                (OPERATION, None) => Step::Operation,
                (OPERATION, Some(_)) | (ENTITIES, _) => {
                    return Err(PathError::UnexpectedStep(part.to_string()))
                }
                (key, index) => Step::Property { key: key.to_string(), index },
            },
            _ => return Err(PathError::UnexpectedStep(part.to_string())),
        };
        steps.push(step);
    }
    Ok(steps)
}

/// Splits `name[idx]` into its name and parsed index.
fn split_index(part: &str) -> Result<(&str, Option<usize>), PathError> {
    let (name, index) = match part.find('[') {
        Some(open) => {
            let Some(inner) = part[open + 1..].strip_suffix(']') else {
                return Err(PathError::InvalidStep(part.to_string()));
            };
            if !is_valid_index(inner) {
                return Err(PathError::InvalidIndex(part.to_string()));
            }
            let idx = inner
                .parse()
                .map_err(|_| PathError::InvalidIndex(part.to_string()))?;
            (&part[..open], Some(idx))
        }
        None => (part, None),
    };
    if !is_key(name) {
        return Err(PathError::InvalidStep(part.to_string()));
    }
    Ok((name, index))
}

/// Property keys and step names are word characters only.
pub(crate) fn is_key(name: &str) -> bool {
    !name.is_empty() && name.bytes().all(|b| b.is_ascii_alphanumeric() || b == b'_')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_root() {
        assert_eq!(parse_steps("operation").unwrap(), vec![Step::Operation]);
    }

    #[test]
    fn test_parse_empty() {
        assert_eq!(parse_steps(""), Err(PathError::EmptyPath));
    }

    #[test]
    fn test_parse_missing_root() {
        assert_eq!(parse_steps("entities[0]"), Err(PathError::ExpectedRoot));
        assert_eq!(parse_steps("/operation"), Err(PathError::ExpectedRoot));
    }

    #[test]
    fn test_parse_nested() {
        let steps = parse_steps("operation/entities[1]/operation/entities[0]").unwrap();
        assert_eq!(
            steps,
            vec![Step::Operation, Step::Entity(1), Step::Operation, Step::Entity(0)]
        );
    }

    #[test]
    fn test_parse_property_item() {
        let steps = parse_steps("operation/entities[0]/entity_type[1]").unwrap();
        assert_eq!(steps[2], Step::property_item("entity_type", 1));
    }

    #[test]
    fn test_parse_rejects_bad_index() {
        assert!(matches!(
            parse_steps("operation/entities[x]"),
            Err(PathError::InvalidIndex(_))
        ));
        assert!(matches!(
            parse_steps("operation/entities[01]"),
            Err(PathError::InvalidIndex(_))
        ));
        assert!(matches!(
            parse_steps("operation/entities[0"),
            Err(PathError::InvalidStep(_))
        ));
    }

    #[test]
    fn test_parse_rejects_misplaced_steps() {
        assert!(matches!(
            parse_steps("operation/entity_type"),
            Err(PathError::UnexpectedStep(_))
        ));
        assert!(matches!(
            parse_steps("operation/entities[0]/entities[1]"),
            Err(PathError::UnexpectedStep(_))
        ));
        assert!(matches!(
            parse_steps("operation/entities[0]/entity_type/more"),
            Err(PathError::UnexpectedStep(_))
        ));
        assert!(matches!(
            parse_steps("operation/entities[0]/"),
            Err(PathError::InvalidStep(_))
        ));
    }
}

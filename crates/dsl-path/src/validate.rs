//! Validation of path strings received from outside the tree, e.g. a
//! `data-path` attribute read back from a rendered diagram.

use thiserror::Error;

use crate::{parse_steps, PathError, Step};

/// Maximum allowed path string length.
const MAX_PATH_LENGTH: usize = 1024;

/// Maximum number of `operation` steps, i.e. operation nesting depth.
const MAX_OPERATION_DEPTH: usize = 32;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Path too long")]
    PathTooLong,
    #[error("Path too deep")]
    PathTooDeep,
    #[error(transparent)]
    Invalid(#[from] PathError),
}

/// Validate a path string.
///
/// # Errors
///
/// Returns an error if:
/// - The path exceeds the maximum length (1024 bytes)
/// - The path does not follow the path grammar
/// - The path nests more than 32 operations
///
/// # Example
///
/// ```
/// use mwp_dsl_path::validate_path;
///
/// validate_path("operation/entities[0]/entity_quantity").unwrap();
/// validate_path("operation/entities[0]/operation/entities[1]").unwrap();
/// validate_path("entities[0]").unwrap_err();
/// ```
pub fn validate_path(path: &str) -> Result<(), ValidationError> {
    if path.len() > MAX_PATH_LENGTH {
        return Err(ValidationError::PathTooLong);
    }
    let steps = parse_steps(path)?;
    let depth = steps.iter().filter(|s| matches!(s, Step::Operation)).count();
    if depth > MAX_OPERATION_DEPTH {
        return Err(ValidationError::PathTooDeep);
    }
    Ok(())
}

//! Structured form of a DSL node path.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::{parse_steps, PathError};

/// Literal used for the root step and for nested operation hops.
pub const OPERATION: &str = "operation";

/// Literal used for entity hops: `entities[i]`.
pub const ENTITIES: &str = "entities";

/// A single hop in a [`DslPath`].
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Step {
    /// `operation`: the root, or a nested operation under an entity slot.
    Operation,
    /// `entities[i]`: the i-th entity slot of an operation.
    Entity(usize),
    /// `key` or `key[j]`: a property, optionally one item of a multi-valued list.
    Property { key: String, index: Option<usize> },
}

impl Step {
    pub fn property(key: impl Into<String>) -> Self {
        Step::Property { key: key.into(), index: None }
    }

    pub fn property_item(key: impl Into<String>, index: usize) -> Self {
        Step::Property { key: key.into(), index: Some(index) }
    }

    pub fn is_property(&self) -> bool {
        matches!(self, Step::Property { .. })
    }
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Step::Operation => f.write_str(OPERATION),
            Step::Entity(i) => write!(f, "{ENTITIES}[{i}]"),
            Step::Property { key, index: None } => f.write_str(key),
            Step::Property { key, index: Some(j) } => write!(f, "{key}[{j}]"),
        }
    }
}

/// A parsed node path such as `operation/entities[1]/operation/entities[0]/entity_type[1]`.
///
/// Paths are plain values: they hold no reference into any tree, and are
/// only meaningful against the tree snapshot they were produced from.
/// They serialize as their string form.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct DslPath {
    steps: Vec<Step>,
}

impl DslPath {
    /// The root operation path, `operation`.
    pub fn root() -> Self {
        Self { steps: vec![Step::Operation] }
    }

    /// Parse a path string.
    pub fn parse(input: &str) -> Result<Self, PathError> {
        Ok(Self { steps: parse_steps(input)? })
    }

    pub fn steps(&self) -> &[Step] {
        &self.steps
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    /// A path always holds at least the root step.
    pub fn is_empty(&self) -> bool {
        false
    }

    pub fn is_root(&self) -> bool {
        self.steps.len() == 1
    }

    pub fn last(&self) -> &Step {
        // Constructors never produce an empty step list.
        &self.steps[self.steps.len() - 1]
    }

    /// The enclosing path, or `None` for the root.
    ///
    /// A property item's parent is the property itself, a nested operation's
    /// parent is its entity slot.
    pub fn parent(&self) -> Option<DslPath> {
        if self.is_root() {
            return None;
        }
        let mut steps = self.steps.clone();
        match steps.last_mut() {
            Some(Step::Property { index: index @ Some(_), .. }) => {
                *index = None;
            }
            _ => {
                steps.pop();
            }
        }
        Some(DslPath { steps })
    }

    /// Iterate over all strict ancestors, nearest first.
    pub fn ancestors(&self) -> impl Iterator<Item = DslPath> {
        std::iter::successors(self.parent(), |p| p.parent())
    }

    /// `self/entities[index]`. Only meaningful when `self` names an operation.
    pub fn entity(&self, index: usize) -> DslPath {
        self.with(Step::Entity(index))
    }

    /// `self/operation`. Only meaningful when `self` names an entity slot.
    pub fn operation(&self) -> DslPath {
        self.with(Step::Operation)
    }

    /// `self/key`.
    pub fn property(&self, key: &str) -> DslPath {
        self.with(Step::property(key))
    }

    /// `self/key[index]`.
    pub fn property_item(&self, key: &str, index: usize) -> DslPath {
        self.with(Step::property_item(key, index))
    }

    /// True when `self` is a strict ancestor of `other`.
    pub fn is_ancestor_of(&self, other: &DslPath) -> bool {
        other.ancestors().any(|a| &a == self)
    }

    fn with(&self, step: Step) -> DslPath {
        let mut steps = Vec::with_capacity(self.steps.len() + 1);
        steps.extend_from_slice(&self.steps);
        steps.push(step);
        DslPath { steps }
    }
}

impl Default for DslPath {
    fn default() -> Self {
        Self::root()
    }
}

impl fmt::Display for DslPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, step) in self.steps.iter().enumerate() {
            if i > 0 {
                f.write_str("/")?;
            }
            write!(f, "{step}")?;
        }
        Ok(())
    }
}

impl FromStr for DslPath {
    type Err = PathError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        DslPath::parse(s)
    }
}

impl TryFrom<String> for DslPath {
    type Error = PathError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        DslPath::parse(&value)
    }
}

impl From<DslPath> for String {
    fn from(path: DslPath) -> Self {
        path.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_root_display() {
        assert_eq!(DslPath::root().to_string(), "operation");
        assert!(DslPath::root().is_root());
        assert_eq!(DslPath::root().parent(), None);
    }

    #[test]
    fn test_builders_display() {
        let p = DslPath::root().entity(1).operation().entity(0).property_item("entity_type", 1);
        assert_eq!(
            p.to_string(),
            "operation/entities[1]/operation/entities[0]/entity_type[1]"
        );
    }

    #[test]
    fn test_parent_of_item_is_property() {
        let p = DslPath::root().entity(0).property_item("entity_type", 2);
        assert_eq!(p.parent().unwrap().to_string(), "operation/entities[0]/entity_type");
        assert_eq!(
            p.parent().unwrap().parent().unwrap().to_string(),
            "operation/entities[0]"
        );
    }

    #[test]
    fn test_ancestors_nearest_first() {
        let p = DslPath::root().entity(1).operation().entity(0);
        let names: Vec<String> = p.ancestors().map(|a| a.to_string()).collect();
        assert_eq!(
            names,
            vec![
                "operation/entities[1]/operation",
                "operation/entities[1]",
                "operation",
            ]
        );
    }

    #[test]
    fn test_is_ancestor_of() {
        let q = DslPath::root().entity(1);
        let p = q.operation().entity(0).property("entity_quantity");
        assert!(q.is_ancestor_of(&p));
        assert!(!p.is_ancestor_of(&q));
        assert!(!q.is_ancestor_of(&q));
        assert!(!DslPath::root().entity(0).is_ancestor_of(&p));
    }

    #[test]
    fn test_serde_as_string() {
        let p = DslPath::root().entity(0).property("container_name");
        let json = serde_json::to_string(&p).unwrap();
        assert_eq!(json, "\"operation/entities[0]/container_name\"");
        let back: DslPath = serde_json::from_str(&json).unwrap();
        assert_eq!(back, p);
        assert!(serde_json::from_str::<DslPath>("\"entities[0]\"").is_err());
    }
}

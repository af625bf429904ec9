//! Selected path and the highlight ranges it implies in each view.

use mwp_dsl::{find_by_path, Node, NodeKind, Span};
use mwp_dsl_path::DslPath;
use serde::Serialize;
use tracing::trace;

use crate::diagram::DiagramComponent;
use crate::session::EditorSession;
use crate::word_problem::WordProblemMatcher;

/// Entity properties whose values are looked up in the prose when a whole
/// entity is selected.
const ENTITY_PROSE_KEYS: [&str; 3] = ["entity_quantity", "entity_name", "container_name"];

/// What is highlighted in each of the three views.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Highlights {
    /// Ranges in the DSL editor text.
    pub dsl: Vec<Span>,
    /// Ranges in the word-problem text.
    pub word_problem: Vec<Span>,
    /// Diagram elements to emphasize.
    pub diagram: Vec<DiagramComponent>,
}

impl Highlights {
    pub fn is_empty(&self) -> bool {
        self.dsl.is_empty() && self.word_problem.is_empty() && self.diagram.is_empty()
    }
}

/// Tracks the selected path and derives highlights from a session.
///
/// Either something is selected, or nothing is and all highlight sets are
/// empty.
#[derive(Debug, Clone, Default)]
pub struct HighlightCoordinator {
    selected: Option<String>,
    highlights: Highlights,
    matcher: WordProblemMatcher,
}

impl HighlightCoordinator {
    pub fn new(matcher: WordProblemMatcher) -> Self {
        Self { matcher, ..Self::default() }
    }

    /// Select `path` in `session`. Returns false, and clears, when the
    /// session's tree has no node at `path`.
    pub fn select(&mut self, path: &str, session: &EditorSession) -> bool {
        let Some(node) = find_by_path(session.tree(), path) else {
            self.clear();
            return false;
        };

        let dsl: Vec<Span> = session.mapping().range_of(path).into_iter().collect();
        let word_problem = self.matcher.find_all(session.word_problem(), prose_values(node));
        let diagram = diagram_components(path, session);
        trace!(path, dsl = ?dsl, prose = word_problem.len(), diagram = diagram.len(), "Selected");

        self.selected = Some(path.to_string());
        self.highlights = Highlights { dsl, word_problem, diagram };
        true
    }

    /// Select whatever is under the text cursor at `offset`.
    pub fn select_at(&mut self, offset: usize, session: &EditorSession) -> bool {
        match session.resolve(offset).map(str::to_string) {
            Some(path) => self.select(&path, session),
            None => {
                self.clear();
                false
            }
        }
    }

    /// Recompute highlights after `session` changed. A selection whose path
    /// no longer exists is dropped.
    pub fn refresh(&mut self, session: &EditorSession) {
        if let Some(path) = self.selected.take() {
            self.select(&path, session);
        }
    }

    pub fn clear(&mut self) {
        self.selected = None;
        self.highlights = Highlights::default();
    }

    pub fn selected(&self) -> Option<&str> {
        self.selected.as_deref()
    }

    pub fn highlights(&self) -> &Highlights {
        &self.highlights
    }
}

/// Literal values of `node` worth finding in the prose.
fn prose_values(node: &Node) -> Vec<&str> {
    match node.kind {
        NodeKind::Property if node.children.is_empty() => node.value().into_iter().collect(),
        NodeKind::Property => node.children.iter().filter_map(|c| c.value()).collect(),
        NodeKind::Entity | NodeKind::Container => ENTITY_PROSE_KEYS
            .iter()
            .filter_map(|key| node.property(key))
            .flat_map(prose_values)
            .collect(),
        NodeKind::Operation => Vec::new(),
    }
}

/// Elements tagged with `path`, or else with its nearest tagged ancestor.
fn diagram_components(path: &str, session: &EditorSession) -> Vec<DiagramComponent> {
    let diagram = session.diagram();
    let exact = diagram.components_for(path);
    if !exact.is_empty() {
        return exact.into_iter().cloned().collect();
    }
    let Ok(parsed) = DslPath::parse(path) else {
        return Vec::new();
    };
    parsed
        .ancestors()
        .map(|a| diagram.components_for(&a.to_string()))
        .find(|found| !found.is_empty())
        .map(|found| found.into_iter().cloned().collect())
        .unwrap_or_default()
}

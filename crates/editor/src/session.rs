//! One editor's DSL text, tree, and mapping, replaced wholesale on every change.

use mwp_dsl::{
    format_with, minify, parse_dsl, resolve_path, set_value, ComponentMapping, EditError, FormatOptions, Node,
};
use thiserror::Error;
use tracing::{debug, warn};

use crate::diagram::{DiagramIndex, DiagramKind};
use crate::generation::{GenerationRequest, GenerationResponse, GenerationService};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SessionError {
    #[error(transparent)]
    Edit(#[from] EditError),
    #[error("Generation failed: {0}")]
    Generation(String),
}

/// The state behind one editor instance.
///
/// Text, tree, and mapping always describe the same snapshot: every
/// operation that changes the text rebuilds all three. Nothing hands out
/// mutable access to the tree.
#[derive(Debug, Clone, Default)]
pub struct EditorSession {
    text: String,
    tree: Node,
    mapping: ComponentMapping,
    word_problem: String,
    diagram: DiagramIndex,
    server_errors: Vec<String>,
    missing_entities: Vec<String>,
    format_options: FormatOptions,
}

impl EditorSession {
    pub fn new(format_options: FormatOptions) -> Self {
        Self { format_options, ..Self::default() }
    }

    /// Session over `text` as typed, with default formatting options.
    pub fn from_dsl(text: impl Into<String>) -> Self {
        let mut session = Self::default();
        session.replace_dsl(text);
        session
    }

    /// Replace the DSL text and rebuild tree and mapping from it.
    pub fn replace_dsl(&mut self, text: impl Into<String>) {
        self.text = text.into();
        self.tree = parse_dsl(&self.text);
        self.mapping = ComponentMapping::from_tree(&self.tree);
        debug!(len = self.text.len(), entries = self.mapping.len(), "Replaced DSL snapshot");
    }

    /// Set the value at `path`, reformat, and adopt the new text.
    ///
    /// On error nothing changes. On success every previously held path and
    /// offset must be re-resolved against [`text`](Self::text).
    pub fn apply_edit(&mut self, path: &str, value: &str) -> Result<(), SessionError> {
        let edited = set_value(&self.tree, path, value)?;
        let formatted = format_with(&edited, &self.format_options);
        self.text = formatted.text;
        self.tree = parse_dsl(&self.text);
        self.mapping = formatted.mapping;
        debug!(path, len = self.text.len(), "Applied edit");
        Ok(())
    }

    /// Reformat the current tree into canonical text.
    pub fn reformat(&mut self) {
        if self.tree.is_degenerate() {
            return;
        }
        let formatted = format_with(&self.tree, &self.format_options);
        self.text = formatted.text;
        self.tree = parse_dsl(&self.text);
        self.mapping = formatted.mapping;
    }

    /// Path under the text cursor at `offset`, if any.
    pub fn resolve(&self, offset: usize) -> Option<&str> {
        resolve_path(&self.tree, offset)
    }

    pub fn set_word_problem(&mut self, text: impl Into<String>) {
        self.word_problem = text.into();
    }

    /// Request for regenerating diagrams from the current DSL.
    ///
    /// The DSL goes out minified. Text with no recognizable operation is sent
    /// as typed so the service can report what is wrong with it.
    pub fn generation_request(&self) -> GenerationRequest {
        let dsl = if self.tree.is_degenerate() {
            self.text.trim().to_string()
        } else {
            minify(&self.tree)
        };
        GenerationRequest {
            mwp: non_empty(&self.word_problem),
            dsl: non_empty(&dsl),
            ..Default::default()
        }
    }

    /// Adopt a service response: new DSL, new diagrams, server errors verbatim.
    pub fn apply_generation_response(&mut self, response: GenerationResponse) {
        self.server_errors = response.errors();
        for err in &self.server_errors {
            warn!(error = %err, "Generation service reported an error");
        }
        self.missing_entities = response.missing_svg_entities.clone().unwrap_or_default();

        let mut diagram = DiagramIndex::new();
        if let Some(svg) = &response.svg_formal {
            diagram.add_svg(DiagramKind::Formal, svg);
        }
        if let Some(svg) = &response.svg_intuitive {
            diagram.add_svg(DiagramKind::Intuitive, svg);
        }
        self.diagram = diagram;
        self.replace_dsl(response.visual_language);
    }

    /// Round-trip the current DSL through `service`.
    pub fn regenerate<S: GenerationService>(&mut self, service: &S) -> Result<(), SessionError> {
        let request = self.generation_request();
        let response = service
            .generate(&request)
            .map_err(|e| SessionError::Generation(e.to_string()))?;
        self.apply_generation_response(response);
        Ok(())
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn tree(&self) -> &Node {
        &self.tree
    }

    pub fn mapping(&self) -> &ComponentMapping {
        &self.mapping
    }

    pub fn word_problem(&self) -> &str {
        &self.word_problem
    }

    pub fn diagram(&self) -> &DiagramIndex {
        &self.diagram
    }

    pub fn server_errors(&self) -> &[String] {
        &self.server_errors
    }

    pub fn missing_entities(&self) -> &[String] {
        &self.missing_entities
    }

    pub fn format_options(&self) -> &FormatOptions {
        &self.format_options
    }
}

fn non_empty(s: &str) -> Option<String> {
    let s = s.trim();
    (!s.is_empty()).then(|| s.to_string())
}

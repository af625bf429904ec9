//! Keeps the DSL editor, the word-problem prose, and the rendered diagrams
//! pointing at the same thing.
//!
//! An [`EditorSession`] owns one DSL snapshot (text, tree, mapping) and
//! replaces it wholesale whenever the text changes, whether by typing, by a
//! structured edit, or by a response from the generation service. A
//! [`HighlightCoordinator`] turns a selected path into ranges in each view.
//!
//! # Example
//!
//! ```
//! use mwp_editor::{EditorSession, HighlightCoordinator};
//!
//! let mut session = EditorSession::from_dsl(
//!     "addition(\n  container1[\n    entity_quantity: 3,\n    container_name: Jane\n  ]\n)",
//! );
//! session.set_word_problem("Jane has 3 apples.");
//!
//! let mut highlights = HighlightCoordinator::default();
//! let caret = session.text().find("quantity").unwrap();
//! assert!(highlights.select_at(caret, &session));
//! assert_eq!(highlights.selected(), Some("operation/entities[0]/entity_quantity"));
//! assert_eq!(highlights.highlights().word_problem.len(), 1);
//!
//! session.apply_edit("operation/entities[0]/container_name", "Total").unwrap();
//! highlights.refresh(&session);
//! assert_eq!(highlights.selected(), Some("operation/entities[0]/entity_quantity"));
//! ```

mod generation;
pub use generation::{GenerationRequest, GenerationResponse, GenerationService};

mod diagram;
pub use diagram::{DiagramComponent, DiagramIndex, DiagramKind};

mod word_problem;
pub use word_problem::{MatchOptions, WordProblemMatcher};

mod session;
pub use session::{EditorSession, SessionError};

mod highlight;
pub use highlight::{HighlightCoordinator, Highlights};

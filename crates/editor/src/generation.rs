//! Boundary types for the external DSL/SVG generation service.

use serde::{Deserialize, Serialize};

/// Request body for the generation service.
///
/// `dsl` is always minified when a session builds the request.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenerationRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mwp: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub formula: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hint: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dsl: Option<String>,
}

/// Response body from the generation service.
///
/// `visual_language` becomes the new source of truth and is re-parsed in
/// full; nothing from the previous tree survives the round-trip.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenerationResponse {
    pub visual_language: String,
    #[serde(default)]
    pub svg_formal: Option<String>,
    #[serde(default)]
    pub svg_intuitive: Option<String>,
    #[serde(default)]
    pub formal_error: Option<String>,
    #[serde(default)]
    pub intuitive_error: Option<String>,
    #[serde(default)]
    pub missing_svg_entities: Option<Vec<String>>,
}

impl GenerationResponse {
    /// Server-reported errors, verbatim, formal first.
    pub fn errors(&self) -> Vec<String> {
        [&self.formal_error, &self.intuitive_error]
            .into_iter()
            .flatten()
            .filter(|e| !e.trim().is_empty())
            .cloned()
            .collect()
    }
}

/// The service that turns a word problem or DSL into diagrams.
///
/// Implemented outside this crate (HTTP client, test double, ...). Cancelling
/// an in-flight request is the implementor's concern.
pub trait GenerationService {
    type Error: std::error::Error;

    fn generate(&self, request: &GenerationRequest) -> Result<GenerationResponse, Self::Error>;
}

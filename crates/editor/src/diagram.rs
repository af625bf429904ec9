//! Index of rendered diagram elements by their `data-path` attribute.

use std::sync::OnceLock;

use mwp_dsl_path::validate_path;
use regex::Regex;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Which of the two rendered diagrams an element belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DiagramKind {
    Formal,
    Intuitive,
}

/// One SVG element tagged with a DSL path.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiagramComponent {
    pub kind: DiagramKind,
    pub data_path: String,
    pub element_id: Option<String>,
    pub tag: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DiagramIndex {
    components: Vec<DiagramComponent>,
}

fn tag_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"<([A-Za-z][\w:.-]*)((?:\s[^>]*)?)/?>").unwrap())
}

fn data_path_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r#"(?:^|\s)data-path\s*=\s*(?:"([^"]*)"|'([^']*)')"#).unwrap())
}

fn id_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r#"(?:^|\s)id\s*=\s*(?:"([^"]*)"|'([^']*)')"#).unwrap())
}

fn attribute(re: &Regex, attrs: &str) -> Option<String> {
    let caps = re.captures(attrs)?;
    caps.get(1).or_else(|| caps.get(2)).map(|m| m.as_str().to_string())
}

impl DiagramIndex {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_svg(kind: DiagramKind, svg: &str) -> Self {
        let mut index = Self::new();
        index.add_svg(kind, svg);
        index
    }

    /// Collect every element of `svg` carrying a valid `data-path`.
    pub fn add_svg(&mut self, kind: DiagramKind, svg: &str) {
        for caps in tag_regex().captures_iter(svg) {
            let attrs = caps.get(2).map_or("", |m| m.as_str());
            let Some(data_path) = attribute(data_path_regex(), attrs) else {
                continue;
            };
            if let Err(err) = validate_path(&data_path) {
                debug!(data_path = %data_path, %err, "Ignoring diagram element with invalid data-path");
                continue;
            }
            self.components.push(DiagramComponent {
                kind,
                data_path,
                element_id: attribute(id_regex(), attrs),
                tag: caps[1].to_string(),
            });
        }
    }

    /// Elements whose `data-path` equals `path`, in document order.
    pub fn components_for(&self, path: &str) -> Vec<&DiagramComponent> {
        self.components.iter().filter(|c| c.data_path == path).collect()
    }

    pub fn contains(&self, path: &str) -> bool {
        self.components.iter().any(|c| c.data_path == path)
    }

    pub fn components(&self) -> &[DiagramComponent] {
        &self.components
    }

    pub fn len(&self) -> usize {
        self.components.len()
    }

    pub fn is_empty(&self) -> bool {
        self.components.is_empty()
    }
}

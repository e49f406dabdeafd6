//! Serialized rule file layout, shared by the TOML and JSON loaders.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RuleFile {
    #[serde(default)]
    pub thresholds: Thresholds,
    /// Category name to pattern list; names are validated when compiling.
    pub categories: BTreeMap<String, CategorySpec>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CategorySpec {
    #[serde(default = "default_case_insensitive")]
    pub case_insensitive: bool,
    pub patterns: Vec<String>,
}

fn default_case_insensitive() -> bool {
    true
}

/// Tunable heuristic constants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Thresholds {
    /// Match count at which a verdict becomes high confidence.
    pub high_confidence_matches: usize,
    /// Maximum evidence snippets attached to a verdict.
    pub evidence_limit: usize,
    /// Characters of context captured on each side of a match.
    pub snippet_radius: usize,
    /// Maximum sentences kept per innovation category.
    pub sentence_limit: usize,
}

impl Default for Thresholds {
    fn default() -> Self {
        Self {
            high_confidence_matches: 3,
            evidence_limit: 3,
            snippet_radius: 50,
            sentence_limit: 3,
        }
    }
}

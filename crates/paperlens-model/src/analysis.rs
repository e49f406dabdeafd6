//! Per-document analysis results.

use std::fmt;
use std::path::PathBuf;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Bibliographic metadata recovered from the leading paragraphs of a paper.
///
/// Every field may be empty: absence is the normal outcome for documents
/// whose layout the heuristics do not recognise.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaperInfo {
    pub title: Option<String>,
    pub authors: Vec<String>,
    pub institutions: Vec<String>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ImplementationKind {
    Official,
    Unofficial,
    #[default]
    Unknown,
}

impl ImplementationKind {
    pub const ALL: [ImplementationKind; 3] = [Self::Official, Self::Unofficial, Self::Unknown];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Official => "official",
            Self::Unofficial => "unofficial",
            Self::Unknown => "unknown",
        }
    }
}

impl fmt::Display for ImplementationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Confidence {
    #[default]
    Low,
    Medium,
    High,
}

impl Confidence {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::High => "high",
            Self::Medium => "medium",
            Self::Low => "low",
        }
    }
}

impl fmt::Display for Confidence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Implementation-type classification of a paper.
///
/// `Default` is the unknown/low verdict with no evidence.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImplementationVerdict {
    pub kind: ImplementationKind,
    pub confidence: Confidence,
    /// Supporting snippets, at most the configured evidence limit.
    pub evidence: Vec<String>,
    pub code_url: Option<String>,
}

/// Sentences claiming novel methods or improvements.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InnovationFindings {
    pub novel_methods: Vec<String>,
    pub improvements: Vec<String>,
}

impl InnovationFindings {
    pub fn is_empty(&self) -> bool {
        self.novel_methods.is_empty() && self.improvements.is_empty()
    }
}

/// Combined analysis record for one document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaperAnalysis {
    /// Document label, usually the file stem.
    pub document: String,
    pub source: PathBuf,
    pub analyzed_at: DateTime<Utc>,
    pub paper_info: PaperInfo,
    pub implementation: ImplementationVerdict,
    pub innovation: InnovationFindings,
}

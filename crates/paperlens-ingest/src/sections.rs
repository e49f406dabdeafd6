//! Heuristic decomposition of extracted text into named sections.

use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

/// Named sections of a paper. Sections that were not found are empty.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaperSections {
    #[serde(rename = "abstract")]
    pub abstract_text: String,
    pub introduction: String,
    pub implementation: String,
    pub experiments: String,
    pub code_samples: String,
    /// Implementation and experiments joined under their headings.
    pub key_sections: String,
}

impl PaperSections {
    /// `(name, content)` pairs in a stable order.
    pub fn entries(&self) -> [(&'static str, &str); 6] {
        [
            ("abstract", &self.abstract_text),
            ("introduction", &self.introduction),
            ("implementation", &self.implementation),
            ("experiments", &self.experiments),
            ("code_samples", &self.code_samples),
            ("key_sections", &self.key_sections),
        ]
    }
}

struct SectionRule {
    heading: Regex,
    terminator: Regex,
}

impl SectionRule {
    fn new(heading: &str, terminator: &str) -> Self {
        Self {
            heading: Regex::new(heading).expect("Invalid section heading regex"),
            terminator: Regex::new(terminator).expect("Invalid section terminator regex"),
        }
    }

    /// Text between the first heading and the nearest terminator after it.
    /// Later headings need no search: their bodies are suffixes of the first.
    fn capture(&self, text: &str) -> String {
        let Some(heading) = self.heading.find(text) else {
            return String::new();
        };
        let body = &text[heading.end()..];
        match self.terminator.find(body) {
            Some(end) => body[..end.start()].trim().to_string(),
            None => String::new(),
        }
    }
}

static ABSTRACT: LazyLock<SectionRule> =
    LazyLock::new(|| SectionRule::new(r"(?i)Abstract\s*", r"(?i)\n\s*1[\s.]|Introduction"));

static INTRODUCTION: LazyLock<SectionRule> = LazyLock::new(|| {
    SectionRule::new(
        r"(?i)Introduction\s*",
        r"(?i)\n\s*[0-9]+[\s.]|Related\s+Work|Background",
    )
});

static IMPLEMENTATION: LazyLock<SectionRule> = LazyLock::new(|| {
    SectionRule::new(
        r"(?i)Implementation\s*",
        r"(?i)\n\s*[0-9]+[\s.]|Experiments?|Results?|Conclusion",
    )
});

static EXPERIMENTS: LazyLock<SectionRule> = LazyLock::new(|| {
    SectionRule::new(
        r"(?i)Experiments?\s*",
        r"(?i)\n\s*[0-9]+[\s.]|Conclusion|References?",
    )
});

static FENCED_CODE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)```.*?```").expect("Invalid fenced code regex"));

static LISTING_HEADING: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?:Algorithm|Listing)\s+\d+[:\s]").expect("Invalid listing heading regex")
});

/// Splits text into abstract, introduction, implementation, experiments,
/// and code samples using heading and next-heading patterns.
pub fn parse_sections(text: &str) -> PaperSections {
    let implementation = IMPLEMENTATION.capture(text);
    let experiments = EXPERIMENTS.capture(text);

    let mut key_sections = Vec::new();
    if !implementation.is_empty() {
        key_sections.push(format!("Implementation:\n{implementation}"));
    }
    if !experiments.is_empty() {
        key_sections.push(format!("Experiments:\n{experiments}"));
    }

    PaperSections {
        abstract_text: ABSTRACT.capture(text),
        introduction: INTRODUCTION.capture(text),
        code_samples: code_samples(text).join("\n\n"),
        key_sections: key_sections.join("\n\n"),
        implementation,
        experiments,
    }
}

/// Fenced blocks and numbered algorithm or listing blocks, in document order.
fn code_samples(text: &str) -> Vec<&str> {
    let mut blocks: Vec<(usize, &str)> = FENCED_CODE
        .find_iter(text)
        .map(|found| (found.start(), found.as_str()))
        .collect();
    for heading in LISTING_HEADING.find_iter(text) {
        if let Some(end) = text[heading.start()..].find("\n\n") {
            let block = &text[heading.start()..heading.start() + end];
            blocks.push((heading.start(), block));
        }
    }
    blocks.sort_by_key(|(start, _)| *start);
    blocks.into_iter().map(|(_, block)| block).collect()
}

//! Title, author, and institution heuristics.
//!
//! Each extractor looks at a fixed window of leading paragraphs, scores
//! candidates with ordered regex patterns, and filters them through
//! blacklists. Nothing here fails: a document the heuristics do not
//! recognise simply yields empty fields.

use std::sync::LazyLock;

use regex::Regex;
use tracing::debug;

use paperlens_model::PaperInfo;

use crate::text::{collapse_whitespace, paragraphs};

const TITLE_WINDOW: usize = 5;
const AUTHOR_SKIP: usize = 1;
const AUTHOR_WINDOW: usize = 5;
const INSTITUTION_WINDOW: usize = 10;

pub const MAX_AUTHORS: usize = 10;
pub const MAX_INSTITUTIONS: usize = 5;

const TITLE_BLACKLIST: &[&str] = &[
    "abstract",
    "introduction",
    "keywords",
    "arxiv",
    "copyright",
    "http",
    "www",
    "submitted",
    "received",
    "accepted",
    "published",
    "ieee",
    "acm",
    "proceedings",
    "conference",
    "journal",
    "fig",
    "table",
    "figure",
    "algorithm",
    "appendix",
    "supplementary",
    "references",
    "acknowledgments",
    "conclusion",
    "discussion",
    "email",
    "address",
    "tel",
    "fax",
    "corresponding",
];

const AUTHOR_BLACKLIST: &[&str] = &[
    "abstract",
    "introduction",
    "university",
    "department",
    "institute",
    "keywords",
    "corresponding",
    "author",
    "email",
    "address",
    "tel",
    "fax",
    "http",
    "www",
    "fig",
    "figure",
    "table",
    "algorithm",
    "appendix",
    "supplementary",
    "et al",
    "ieee",
    "copyright",
    "related",
    "work",
    "proposed",
    "method",
    "results",
    "discussion",
    "conclusion",
    "references",
    "acknowledgments",
    "background",
    "materials",
    "methods",
    "experimental",
    "setup",
    "implementation",
];

const AUTHOR_STOPWORDS: &[&str] = &["the", "and", "or", "in", "on", "at", "to", "for", "of", "with"];

static TRAILING_DIGITS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\d+$").expect("Invalid trailing digits regex"));

static PARENTHETICAL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s*\([^)]*\)").expect("Invalid parenthetical regex"));

static BRACKETED: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s*\[[^\]]*\]").expect("Invalid bracketed regex"));

static NON_TEXTUAL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[\d\W_]+$").expect("Invalid non-textual regex"));

static AUTHOR_PATTERNS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    [
        // Capitalized word sequence
        r"([A-Z][a-zA-Z]+(?:\s+[A-Z][a-zA-Z]+)+)",
        // Middle initial
        r"([A-Z][a-zA-Z]+\s+[A-Z]\.?\s+[A-Z][a-zA-Z]+)",
        // Hyphenated
        r"([A-Z][a-zA-Z]+(?:-[A-Z][a-zA-Z]+)+)",
        // Footnote markers
        r"([A-Z][a-zA-Z]+(?:\s+[A-Z][a-zA-Z]+)*)\s*[\d,\*†‡§]+",
        // Affiliation in parentheses
        r"([A-Z][a-zA-Z]+(?:\s+[A-Z][a-zA-Z]+)*)\s*\([^)]+\)",
        // Comma-separated list
        r"([A-Z][a-zA-Z]+(?:\s+[A-Z][a-zA-Z]+)*),\s*(?:and\s+)?[A-Z]",
    ]
    .into_iter()
    .map(|pattern| Regex::new(pattern).expect("Invalid author regex"))
    .collect()
});

static AUTHOR_NOISE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[\d,\*†‡§\(\)\[\]]+").expect("Invalid author noise regex"));

static INSTITUTION_PATTERNS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    [
        r"(?:Department|School|Faculty|College|Division)\s+of\s+[^,\n]+(?:,\s*[^,\n]+(?:University|Institute)[^,\n]*)?",
        r"(?:Institute|Laboratory|Center|Centre)\s+(?:of|for)\s+[^,\n]+(?:,\s*[^,\n]+(?:University|Institute)[^,\n]*)?",
        r"[^,\n]+\s+Hospital[^,\n]*(?:,\s*[^,\n]+(?:University|Medical|Center)[^,\n]*)?",
        r"[^,\n]+\s+(?:Corporation|Corp\.|Inc\.|Ltd\.|LLC)[^,\n]*",
        r"[A-Z][a-zA-Z\s]+University[^,\n]*",
        r"[A-Z][a-zA-Z\s]+(?:Research|Medical)\s+Center[^,\n]*",
    ]
    .into_iter()
    .map(|pattern| Regex::new(pattern).expect("Invalid institution regex"))
    .collect()
});

static TRAILING_PUNCTUATION: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[,;\.]$").expect("Invalid trailing punctuation regex"));

static CITATION: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\[\d+\]").expect("Invalid citation regex"));

static EMAIL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\S+@\S+").expect("Invalid email regex"));

/// Extracts title, authors, and institutions from normalized text.
pub fn extract_paper_info(text: &str) -> PaperInfo {
    let paragraphs = paragraphs(text);
    let info = PaperInfo {
        title: extract_title(&paragraphs),
        authors: extract_authors(&paragraphs),
        institutions: extract_institutions(&paragraphs),
    };
    debug!(
        has_title = info.title.is_some(),
        authors = info.authors.len(),
        institutions = info.institutions.len(),
        "extracted paper info"
    );
    info
}

/// First leading paragraph that looks like a title after cleanup.
pub fn extract_title(paragraphs: &[&str]) -> Option<String> {
    paragraphs
        .iter()
        .take(TITLE_WINDOW)
        .map(|paragraph| clean_title(paragraph))
        .find(|candidate| is_title_like(candidate))
}

fn clean_title(paragraph: &str) -> String {
    let collapsed = collapse_whitespace(paragraph);
    let without_page = TRAILING_DIGITS.replace(&collapsed, "");
    let without_parens = PARENTHETICAL.replace_all(&without_page, "");
    let without_brackets = BRACKETED.replace_all(&without_parens, "");
    without_brackets.trim().to_string()
}

fn is_title_like(candidate: &str) -> bool {
    let words = candidate.split_whitespace().count();
    let chars = candidate.chars().count();
    let lower = candidate.to_lowercase();
    (3..=40).contains(&words)
        && (10..=500).contains(&chars)
        && !contains_any(&lower, TITLE_BLACKLIST)
        && !lower.starts_with("http")
        && !NON_TEXTUAL.is_match(candidate)
}

/// Name-shaped candidates from the paragraphs following the title.
///
/// Shorter candidates sort first since long matches tend to swallow
/// neighbouring words.
pub fn extract_authors(paragraphs: &[&str]) -> Vec<String> {
    let mut authors: Vec<String> = Vec::new();
    for paragraph in paragraphs.iter().skip(AUTHOR_SKIP).take(AUTHOR_WINDOW) {
        if contains_any(&paragraph.to_lowercase(), AUTHOR_BLACKLIST) {
            continue;
        }
        for pattern in AUTHOR_PATTERNS.iter() {
            for captures in pattern.captures_iter(paragraph) {
                let Some(name) = captures.get(1) else {
                    continue;
                };
                let cleaned = clean_author(name.as_str());
                if is_valid_author(&cleaned) && !authors.contains(&cleaned) {
                    authors.push(cleaned);
                }
            }
        }
    }
    authors.sort_by_key(|name| name.chars().count());
    authors.truncate(MAX_AUTHORS);
    authors
}

fn clean_author(raw: &str) -> String {
    collapse_whitespace(&AUTHOR_NOISE.replace_all(raw, ""))
}

fn is_valid_author(name: &str) -> bool {
    if name.chars().count() < 4 || contains_any(&name.to_lowercase(), AUTHOR_BLACKLIST) {
        return false;
    }
    let words: Vec<&str> = name.split_whitespace().collect();
    (2..=5).contains(&words.len())
        && words.iter().all(|word| {
            word.chars().next().is_some_and(char::is_uppercase)
                && !AUTHOR_STOPWORDS.contains(&word.to_lowercase().as_str())
        })
}

/// Affiliation phrases from the leading paragraphs, longest first.
pub fn extract_institutions(paragraphs: &[&str]) -> Vec<String> {
    let mut institutions: Vec<String> = Vec::new();
    for paragraph in paragraphs.iter().take(INSTITUTION_WINDOW) {
        for pattern in INSTITUTION_PATTERNS.iter() {
            for found in pattern.find_iter(paragraph) {
                let cleaned = clean_institution(found.as_str());
                if cleaned.chars().count() > 10 && !institutions.contains(&cleaned) {
                    institutions.push(cleaned);
                }
            }
        }
    }
    institutions.sort_by_key(|name| std::cmp::Reverse(name.chars().count()));
    institutions.truncate(MAX_INSTITUTIONS);
    institutions
}

fn clean_institution(raw: &str) -> String {
    let collapsed = collapse_whitespace(raw);
    let trimmed = TRAILING_PUNCTUATION.replace(&collapsed, "");
    let without_citations = CITATION.replace_all(&trimmed, "");
    let without_emails = EMAIL.replace_all(&without_citations, "");
    let without_parens = PARENTHETICAL.replace_all(&without_emails, "");
    without_parens.trim().to_string()
}

fn contains_any(haystack: &str, needles: &[&str]) -> bool {
    needles.iter().any(|needle| haystack.contains(needle))
}

//! Text normalization and segmentation helpers.

use std::sync::LazyLock;

use regex::Regex;

static HORIZONTAL_WHITESPACE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"[ \t\x0C\x0B\u{A0}]+").expect("Invalid horizontal whitespace regex")
});

static BLANK_LINE_RUN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\n{3,}").expect("Invalid blank line regex"));

static PARAGRAPH_BREAK: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\n[ \t]*\n").expect("Invalid paragraph break regex"));

static SENTENCE_BREAK: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[.!?]").expect("Invalid sentence break regex"));

static WHITESPACE_RUN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s+").expect("Invalid whitespace regex"));

/// Cleans raw extracted text before analysis.
///
/// Line endings become `\n`, runs of horizontal whitespace (including page
/// breaks and non-breaking spaces) become one space, and three or more
/// consecutive newlines collapse to a single blank line.
pub fn normalize(raw: &str) -> String {
    let unified = raw.replace("\r\n", "\n").replace('\r', "\n");
    let spaced = HORIZONTAL_WHITESPACE.replace_all(&unified, " ");
    BLANK_LINE_RUN.replace_all(&spaced, "\n\n").into_owned()
}

/// Splits text on blank lines, returning trimmed non-empty paragraphs.
pub fn paragraphs(text: &str) -> Vec<&str> {
    PARAGRAPH_BREAK
        .split(text)
        .map(str::trim)
        .filter(|paragraph| !paragraph.is_empty())
        .collect()
}

/// Splits a paragraph on `.`, `!` and `?`. Pieces are untrimmed.
pub fn sentences(paragraph: &str) -> Vec<&str> {
    SENTENCE_BREAK.split(paragraph).collect()
}

/// Collapses every whitespace run to a single space and trims.
pub fn collapse_whitespace(text: &str) -> String {
    WHITESPACE_RUN.replace_all(text, " ").trim().to_string()
}

/// Returns the match at byte range `start..end` widened by `radius`
/// characters on each side, clamped to the text bounds.
pub fn snippet(text: &str, start: usize, end: usize, radius: usize) -> &str {
    let lo = text[..start]
        .char_indices()
        .rev()
        .take(radius)
        .last()
        .map_or(start, |(index, _)| index);
    let hi = text[end..]
        .char_indices()
        .nth(radius)
        .map_or(text.len(), |(index, _)| end + index);
    &text[lo..hi]
}

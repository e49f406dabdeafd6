//! Official vs. unofficial implementation classification.

use tracing::debug;

use paperlens_model::{Confidence, ImplementationKind, ImplementationVerdict};
use paperlens_rules::{PatternRule, RuleCategory, RuleSet};

use crate::text::{collapse_whitespace, paragraphs, snippet};

/// Characters stripped from the end of a captured URL.
const URL_TRAILING: &[char] = &['.', ',', ';', ':', '\'', '"'];

#[derive(Debug, Default)]
struct SignalTally {
    count: usize,
    evidence: Vec<String>,
}

impl SignalTally {
    fn scan(&mut self, paragraph: &str, rules: &[PatternRule], radius: usize) {
        for rule in rules {
            for found in rule.find_iter(paragraph) {
                self.count += 1;
                let context =
                    collapse_whitespace(snippet(paragraph, found.start(), found.end(), radius));
                if !self.evidence.contains(&context) {
                    self.evidence.push(context);
                }
            }
        }
    }
}

/// Classifies the paper's accompanying code as official or unofficial.
///
/// Every pattern of a category is tried against every paragraph and the
/// counts accumulate. The first code-hosting URL in document order is kept.
pub fn classify(text: &str, rules: &RuleSet) -> ImplementationVerdict {
    let thresholds = rules.thresholds();
    let mut official = SignalTally::default();
    let mut unofficial = SignalTally::default();
    let mut code_url: Option<String> = None;

    for paragraph in paragraphs(text) {
        official.scan(
            paragraph,
            rules.rules(RuleCategory::Official),
            thresholds.snippet_radius,
        );
        unofficial.scan(
            paragraph,
            rules.rules(RuleCategory::Unofficial),
            thresholds.snippet_radius,
        );
        if code_url.is_none() {
            code_url = first_code_url(paragraph, rules.rules(RuleCategory::CodeHost));
        }
    }

    debug!(
        official = official.count,
        unofficial = unofficial.count,
        code_url = code_url.as_deref().unwrap_or("-"),
        "implementation signals"
    );

    let confidence_for = |count: usize| {
        if count >= thresholds.high_confidence_matches {
            Confidence::High
        } else {
            Confidence::Medium
        }
    };

    let (kind, confidence, mut evidence) = if official.count == 0 && unofficial.count == 0 {
        match &code_url {
            Some(url) => (
                ImplementationKind::Unofficial,
                Confidence::Medium,
                vec![format!("Found code repository: {url}")],
            ),
            None => (ImplementationKind::Unknown, Confidence::Low, Vec::new()),
        }
    } else if official.count > unofficial.count {
        (
            ImplementationKind::Official,
            confidence_for(official.count),
            official.evidence,
        )
    } else {
        (
            ImplementationKind::Unofficial,
            confidence_for(unofficial.count),
            unofficial.evidence,
        )
    };
    evidence.truncate(thresholds.evidence_limit);

    ImplementationVerdict {
        kind,
        confidence,
        evidence,
        code_url,
    }
}

/// Earliest code-host URL in the paragraph across all host patterns.
fn first_code_url(paragraph: &str, hosts: &[PatternRule]) -> Option<String> {
    hosts
        .iter()
        .filter_map(|rule| rule.regex().find(paragraph))
        .min_by_key(|found| found.start())
        .map(|found| found.as_str().trim_end_matches(URL_TRAILING).to_string())
        .filter(|url| !url.is_empty())
}

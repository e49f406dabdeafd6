//! Novelty and improvement claims.

use tracing::debug;

use paperlens_model::InnovationFindings;
use paperlens_rules::{PatternRule, RuleCategory, RuleSet};

use crate::text::{paragraphs, sentences};

/// Collects whole sentences around novelty and improvement phrases.
///
/// Sentences are kept in discovery order, deduplicated, and capped per
/// category.
pub fn extract_innovation(text: &str, rules: &RuleSet) -> InnovationFindings {
    let limit = rules.thresholds().sentence_limit;
    let mut findings = InnovationFindings::default();
    for paragraph in paragraphs(text) {
        let pieces = sentences(paragraph);
        collect_sentences(
            paragraph,
            &pieces,
            rules.rules(RuleCategory::Novel),
            limit,
            &mut findings.novel_methods,
        );
        collect_sentences(
            paragraph,
            &pieces,
            rules.rules(RuleCategory::Improvement),
            limit,
            &mut findings.improvements,
        );
    }
    debug!(
        novel_methods = findings.novel_methods.len(),
        improvements = findings.improvements.len(),
        "extracted innovation claims"
    );
    findings
}

fn collect_sentences(
    paragraph: &str,
    pieces: &[&str],
    rules: &[PatternRule],
    limit: usize,
    out: &mut Vec<String>,
) {
    for rule in rules {
        for found in rule.find_iter(paragraph) {
            if out.len() >= limit {
                out.truncate(limit);
                return;
            }
            let needle = found.as_str();
            for piece in pieces.iter().filter(|piece| piece.contains(needle)) {
                let sentence = piece.trim();
                if !sentence.is_empty() && !out.iter().any(|known| known == sentence) {
                    out.push(sentence.to_string());
                }
            }
        }
    }
    out.truncate(limit);
}

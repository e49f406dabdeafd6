//! Integration tests for implementation classification.

use paperlens_analyze::{classify, normalize};
use paperlens_model::{Confidence, ImplementationKind};
use paperlens_rules::RuleSet;
use proptest::prelude::*;

fn rules() -> RuleSet {
    RuleSet::builtin().expect("built-in rules")
}

#[test]
fn repeated_official_statement_is_high_confidence() {
    let paragraph = "The official implementation available at https://github.com/x/y";
    let text = [paragraph, paragraph, paragraph].join("\n\n");

    let verdict = classify(&text, &rules());

    assert_eq!(verdict.kind, ImplementationKind::Official);
    assert_eq!(verdict.confidence, Confidence::High);
    assert_eq!(verdict.code_url.as_deref(), Some("https://github.com/x/y"));
    assert!(!verdict.evidence.is_empty());
}

#[test]
fn single_reimplementation_mention_is_unofficial_medium() {
    let verdict = classify("A reimplementation based on their method.", &rules());
    assert_eq!(verdict.kind, ImplementationKind::Unofficial);
    assert_eq!(verdict.confidence, Confidence::Medium);
}

#[test]
fn no_signals_is_unknown_low() {
    let verdict = classify("We study the thermal behaviour of glaciers.", &rules());
    assert_eq!(verdict.kind, ImplementationKind::Unknown);
    assert_eq!(verdict.confidence, Confidence::Low);
    assert!(verdict.evidence.is_empty());
    assert!(verdict.code_url.is_none());
}

#[test]
fn classification_is_deterministic() {
    let text = normalize(
        "Code released at https://gitlab.com/lab/tool.\n\n\n\nAdapted from prior work.",
    );
    let rules = rules();
    assert_eq!(classify(&text, &rules), classify(&text, &rules));
}

#[test]
fn confidence_rises_from_two_to_three_matches() {
    let rules = rules();
    let statement = "Code released and open source.";
    let two = classify(statement, &rules);
    let three = classify(&format!("{statement}\n\nThe code released."), &rules);
    assert_eq!(two.kind, ImplementationKind::Official);
    assert_eq!(two.confidence, Confidence::Medium);
    assert_eq!(three.kind, ImplementationKind::Official);
    assert_eq!(three.confidence, Confidence::High);
}

fn signal_phrase() -> impl Strategy<Value = &'static str> {
    prop::sample::select(vec![
        "official code",
        "open source",
        "code released",
        "adapted from",
        "inspired by",
        "reimplementation",
        "https://github.com/a/b",
        "plain words",
    ])
}

proptest! {
    #[test]
    fn evidence_never_exceeds_limit(phrases in prop::collection::vec(signal_phrase(), 0..40)) {
        let text = phrases.join("\n\n");
        let verdict = classify(&text, &rules());
        prop_assert!(verdict.evidence.len() <= 3);
        if verdict.kind == ImplementationKind::Unknown {
            prop_assert_eq!(verdict.confidence, Confidence::Low);
        }
    }
}

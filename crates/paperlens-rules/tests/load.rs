//! Integration tests for loading rule files from disk.

use std::fs;

use paperlens_rules::{ConfigError, RuleCategory, RuleSet};

const JSON_RULES: &str = r#"{
  "thresholds": { "high_confidence_matches": 2 },
  "categories": {
    "official": { "patterns": ["official.*?code", "code.*?released"] },
    "unofficial": { "patterns": ["reimplementation"] },
    "code_host": { "case_insensitive": false, "patterns": ["https?://gitlab\\.com/[^\\s\\)]+"] },
    "novel": { "patterns": ["novel"] },
    "improvement": { "patterns": ["outperform"] }
  }
}"#;

#[test]
fn loads_json_rules_by_extension() {
    let dir = tempfile::tempdir().expect("temp dir");
    let path = dir.path().join("rules.json");
    fs::write(&path, JSON_RULES).expect("write rules");

    let rules = RuleSet::load(&path).expect("load json rules");
    assert_eq!(rules.rules(RuleCategory::Official).len(), 2);
    assert_eq!(rules.thresholds().high_confidence_matches, 2);
    assert_eq!(rules.thresholds().evidence_limit, 3);
}

#[test]
fn dumped_builtin_rules_load_back_as_toml() {
    let builtin = RuleSet::builtin().expect("built-in rules");
    let dumped = toml::to_string(&builtin.to_rule_file()).expect("serialize rules");

    let dir = tempfile::tempdir().expect("temp dir");
    let path = dir.path().join("rules.TOML");
    fs::write(&path, dumped).expect("write rules");

    let reloaded = RuleSet::load(&path).expect("reload rules");
    for category in RuleCategory::ALL {
        assert_eq!(
            reloaded.rules(category).len(),
            builtin.rules(category).len(),
            "{category}"
        );
    }
    assert!(!reloaded.rules(RuleCategory::CodeHost)[0].case_insensitive);
}

#[test]
fn absent_file_is_a_config_error() {
    let dir = tempfile::tempdir().expect("temp dir");
    let error = RuleSet::load(&dir.path().join("nope.toml")).expect_err("missing file");
    assert!(matches!(error, ConfigError::Io { .. }));
}

#[test]
fn unknown_extension_is_rejected_before_reading() {
    let error = RuleSet::load(std::path::Path::new("rules.yaml")).expect_err("yaml");
    assert!(matches!(error, ConfigError::UnsupportedFormat { .. }));
}

#[test]
fn malformed_file_reports_origin() {
    let dir = tempfile::tempdir().expect("temp dir");
    let path = dir.path().join("broken.toml");
    fs::write(&path, "[categories.official\npatterns = 3").expect("write rules");

    let error = RuleSet::load(&path).expect_err("malformed");
    assert!(matches!(error, ConfigError::Toml { .. }));
    assert!(error.to_string().contains("broken.toml"));
}

#[test]
fn builtin_category_sizes() {
    let rules = RuleSet::builtin().expect("built-in rules");
    let listing = RuleCategory::ALL
        .iter()
        .map(|category| format!("{category}: {}", rules.rules(*category).len()))
        .collect::<Vec<_>>()
        .join("\n");
    insta::assert_snapshot!(listing, @r"
    official: 13
    unofficial: 10
    code_host: 40
    novel: 10
    improvement: 14
    ");
}

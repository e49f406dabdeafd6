//! Compiled rule set shared read-only by every worker.

use std::collections::BTreeMap;
use std::fmt;
use std::path::Path;
use std::str::FromStr;

use regex::{Matches, Regex, RegexBuilder};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{ConfigError, Result};
use crate::schema::{CategorySpec, RuleFile, Thresholds};

const DEFAULT_RULES: &str = include_str!("../rules/default.toml");

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RuleCategory {
    /// Phrases indicating the authors' own released code.
    Official,
    /// Phrases indicating a derived or third-party implementation.
    Unofficial,
    /// URL patterns for code hosting and notebook platforms.
    CodeHost,
    Novel,
    Improvement,
}

impl RuleCategory {
    pub const ALL: [RuleCategory; 5] = [
        Self::Official,
        Self::Unofficial,
        Self::CodeHost,
        Self::Novel,
        Self::Improvement,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Official => "official",
            Self::Unofficial => "unofficial",
            Self::CodeHost => "code_host",
            Self::Novel => "novel",
            Self::Improvement => "improvement",
        }
    }
}

impl fmt::Display for RuleCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RuleCategory {
    type Err = ConfigError;

    fn from_str(value: &str) -> Result<Self> {
        let normalized = value.trim().to_ascii_lowercase().replace('-', "_");
        Self::ALL
            .into_iter()
            .find(|category| category.as_str() == normalized)
            .ok_or_else(|| ConfigError::UnknownCategory {
                name: value.to_string(),
            })
    }
}

/// A labeled, compiled pattern.
#[derive(Debug, Clone)]
pub struct PatternRule {
    pub category: RuleCategory,
    pub pattern: String,
    pub case_insensitive: bool,
    regex: Regex,
}

impl PatternRule {
    pub fn new(
        category: RuleCategory,
        pattern: impl Into<String>,
        case_insensitive: bool,
    ) -> Result<Self> {
        let pattern = pattern.into();
        let regex = RegexBuilder::new(&pattern)
            .case_insensitive(case_insensitive)
            .build()
            .map_err(|source| ConfigError::InvalidPattern {
                category,
                pattern: pattern.clone(),
                source,
            })?;
        Ok(Self {
            category,
            pattern,
            case_insensitive,
            regex,
        })
    }

    pub fn regex(&self) -> &Regex {
        &self.regex
    }

    pub fn find_iter<'r, 'h>(&'r self, haystack: &'h str) -> Matches<'r, 'h> {
        self.regex.find_iter(haystack)
    }
}

/// Immutable collection of pattern rules grouped by category.
#[derive(Debug, Clone)]
pub struct RuleSet {
    categories: BTreeMap<RuleCategory, Vec<PatternRule>>,
    thresholds: Thresholds,
}

impl RuleSet {
    /// The rule set compiled from the embedded default rule file.
    pub fn builtin() -> Result<Self> {
        Self::from_toml_str(DEFAULT_RULES, "built-in rules")
    }

    /// Loads a rule file, choosing the parser from the file extension.
    pub fn load(path: &Path) -> Result<Self> {
        let extension = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(str::to_ascii_lowercase);
        let parse: fn(&str, &str) -> Result<Self> = match extension.as_deref() {
            Some("toml") => Self::from_toml_str,
            Some("json") => Self::from_json_str,
            _ => {
                return Err(ConfigError::UnsupportedFormat {
                    path: path.to_path_buf(),
                });
            }
        };
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::io(path, e))?;
        parse(&content, &path.display().to_string())
    }

    pub fn from_toml_str(content: &str, origin: &str) -> Result<Self> {
        let file: RuleFile = toml::from_str(content).map_err(|source| ConfigError::Toml {
            origin: origin.to_string(),
            source,
        })?;
        Self::from_rule_file(file)
    }

    pub fn from_json_str(content: &str, origin: &str) -> Result<Self> {
        let file: RuleFile =
            serde_json::from_str(content).map_err(|source| ConfigError::Json {
                origin: origin.to_string(),
                source,
            })?;
        Self::from_rule_file(file)
    }

    /// Compiles a parsed rule file, rejecting unknown or missing categories.
    pub fn from_rule_file(file: RuleFile) -> Result<Self> {
        validate_thresholds(&file.thresholds)?;
        let mut categories = BTreeMap::new();
        for (name, spec) in file.categories {
            let category: RuleCategory = name.parse()?;
            let rules = spec
                .patterns
                .iter()
                .map(|pattern| PatternRule::new(category, pattern.as_str(), spec.case_insensitive))
                .collect::<Result<Vec<_>>>()?;
            categories.insert(category, rules);
        }
        if let Some(category) = RuleCategory::ALL
            .into_iter()
            .find(|category| !categories.contains_key(category))
        {
            return Err(ConfigError::MissingCategory { category });
        }
        let rule_set = Self {
            categories,
            thresholds: file.thresholds,
        };
        debug!(
            patterns = rule_set.pattern_count(),
            high_confidence_matches = rule_set.thresholds.high_confidence_matches,
            "compiled rule set"
        );
        Ok(rule_set)
    }

    /// Rules of one category in file order.
    pub fn rules(&self, category: RuleCategory) -> &[PatternRule] {
        self.categories
            .get(&category)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub fn thresholds(&self) -> &Thresholds {
        &self.thresholds
    }

    pub fn pattern_count(&self) -> usize {
        self.categories.values().map(Vec::len).sum()
    }

    /// Serializable form, suitable for dumping the active rules.
    pub fn to_rule_file(&self) -> RuleFile {
        let categories = self
            .categories
            .iter()
            .map(|(category, rules)| {
                let case_insensitive = rules.first().is_none_or(|rule| rule.case_insensitive);
                let spec = CategorySpec {
                    case_insensitive,
                    patterns: rules.iter().map(|rule| rule.pattern.clone()).collect(),
                };
                (category.as_str().to_string(), spec)
            })
            .collect();
        RuleFile {
            thresholds: self.thresholds,
            categories,
        }
    }
}

fn validate_thresholds(thresholds: &Thresholds) -> Result<()> {
    let checks = [
        ("high_confidence_matches", thresholds.high_confidence_matches),
        ("evidence_limit", thresholds.evidence_limit),
        ("sentence_limit", thresholds.sentence_limit),
    ];
    match checks.into_iter().find(|(_, value)| *value == 0) {
        Some((name, _)) => Err(ConfigError::InvalidThreshold { name }),
        None => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MINIMAL: &str = r#"
[categories.official]
patterns = ["official.*?code"]

[categories.unofficial]
patterns = ["reimplementation"]

[categories.code_host]
case_insensitive = false
patterns = ['https?://github\.com/[^\s\)]+']

[categories.novel]
patterns = ["novel"]

[categories.improvement]
patterns = ["improve"]
"#;

    #[test]
    fn builtin_rules_compile() {
        let rules = RuleSet::builtin().expect("built-in rules");
        assert_eq!(rules.rules(RuleCategory::Official).len(), 13);
        assert_eq!(rules.rules(RuleCategory::Unofficial).len(), 10);
        assert_eq!(rules.rules(RuleCategory::CodeHost).len(), 40);
        assert_eq!(rules.rules(RuleCategory::Novel).len(), 10);
        assert_eq!(rules.rules(RuleCategory::Improvement).len(), 14);
        assert_eq!(rules.thresholds(), &Thresholds::default());
    }

    #[test]
    fn thresholds_default_when_absent() {
        let rules = RuleSet::from_toml_str(MINIMAL, "test").expect("minimal rules");
        assert_eq!(rules.thresholds().high_confidence_matches, 3);
        assert_eq!(rules.pattern_count(), 5);
    }

    #[test]
    fn case_flag_is_honoured() {
        let rules = RuleSet::from_toml_str(MINIMAL, "test").expect("minimal rules");
        let official = &rules.rules(RuleCategory::Official)[0];
        assert!(official.regex().is_match("OFFICIAL source CODE"));
        let host = &rules.rules(RuleCategory::CodeHost)[0];
        assert!(!host.regex().is_match("HTTPS://GITHUB.COM/x/y"));
    }

    #[test]
    fn missing_category_is_rejected() {
        let content = MINIMAL.replace("[categories.novel]\npatterns = [\"novel\"]\n", "");
        let error = RuleSet::from_toml_str(&content, "test").expect_err("novel missing");
        assert!(matches!(
            error,
            ConfigError::MissingCategory {
                category: RuleCategory::Novel
            }
        ));
    }

    #[test]
    fn unknown_category_is_rejected() {
        let content = format!("{MINIMAL}\n[categories.sarcasm]\npatterns = [\"sure\"]\n");
        let error = RuleSet::from_toml_str(&content, "test").expect_err("unknown category");
        assert!(matches!(error, ConfigError::UnknownCategory { name } if name == "sarcasm"));
    }

    #[test]
    fn invalid_pattern_names_category_and_pattern() {
        let content = MINIMAL.replace("\"reimplementation\"", "\"(unclosed\"");
        let error = RuleSet::from_toml_str(&content, "test").expect_err("bad regex");
        let message = error.to_string();
        assert!(message.contains("unofficial"));
        assert!(message.contains("(unclosed"));
    }

    #[test]
    fn zero_threshold_is_rejected() {
        let content = format!("[thresholds]\nevidence_limit = 0\n{MINIMAL}");
        let error = RuleSet::from_toml_str(&content, "test").expect_err("zero threshold");
        assert!(matches!(
            error,
            ConfigError::InvalidThreshold {
                name: "evidence_limit"
            }
        ));
    }

    #[test]
    fn category_names_parse_leniently() {
        assert_eq!("code-host".parse::<RuleCategory>().ok(), Some(RuleCategory::CodeHost));
        assert_eq!(" Novel ".parse::<RuleCategory>().ok(), Some(RuleCategory::Novel));
    }
}

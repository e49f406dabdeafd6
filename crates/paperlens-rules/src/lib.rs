//! Pattern rule sets driving every heuristic extractor.
//!
//! Rules are declared per category in a TOML or JSON file, compiled once at
//! startup, and shared read-only afterwards. A copy of the default rules is
//! embedded in the binary so the pipeline runs without any rule file.

pub mod error;
pub mod ruleset;
pub mod schema;

pub use error::{ConfigError, Result};
pub use ruleset::{PatternRule, RuleCategory, RuleSet};
pub use schema::{CategorySpec, RuleFile, Thresholds};

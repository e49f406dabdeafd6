use std::path::PathBuf;

use crate::RuleCategory;

/// Errors raised while loading a rule set. All of them are fatal at startup.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read rule file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse TOML rules from {origin}: {source}")]
    Toml {
        origin: String,
        #[source]
        source: toml::de::Error,
    },

    #[error("failed to parse JSON rules from {origin}: {source}")]
    Json {
        origin: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("unsupported rule file format {path} (expected .toml or .json)")]
    UnsupportedFormat { path: PathBuf },

    #[error("missing required rule category: {category}")]
    MissingCategory { category: RuleCategory },

    #[error("unknown rule category: {name}")]
    UnknownCategory { name: String },

    #[error("invalid pattern in {category} rules '{pattern}': {source}")]
    InvalidPattern {
        category: RuleCategory,
        pattern: String,
        #[source]
        source: regex::Error,
    },

    #[error("threshold {name} must be greater than zero")]
    InvalidThreshold { name: &'static str },
}

impl ConfigError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

pub type Result<T> = std::result::Result<T, ConfigError>;

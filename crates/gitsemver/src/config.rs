//! Configuration for git-semver.
//!
//! Loads settings from `.git-semver.toml` in the repository root and from
//! `GIT_SEMVER_*` environment variables.
//! Uses figment for layered configuration with provenance tracking.

use figment::{
    providers::{Env, Format as _, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::format::Format;
use crate::git::{DescribeOptions, DEFAULT_MATCH};
use crate::separated::SeparatedList;

/// Name of the per-repository config file.
pub const CONFIG_FILE: &str = ".git-semver.toml";

/// Prefix for environment overrides (`GIT_SEMVER_FORMAT=cmake`).
pub const ENV_PREFIX: &str = "GIT_SEMVER_";

/// git-semver configuration.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct Config {
    /// Output format (default: semver).
    #[serde(default)]
    pub format: Format,

    /// Tag patterns to consider (default: ["v*"]).
    #[serde(rename = "match", default = "default_match")]
    pub match_patterns: Vec<String>,

    /// Tag patterns to ignore.
    #[serde(default)]
    pub exclude: Vec<String>,

    /// Consider lightweight tags too (default: false).
    #[serde(default)]
    pub tags: bool,

    /// Only follow first parents (default: false).
    #[serde(default)]
    pub first_parent: bool,

    /// Abbreviated commit id length (default: git's own).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub abbrev: Option<u32>,

    /// Extra build identifiers, either "a.b" or ["a", "b"].
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub build: Option<toml::Value>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            format: Format::default(),
            match_patterns: default_match(),
            exclude: Vec::new(),
            tags: false,
            first_parent: false,
            abbrev: None,
            build: None,
        }
    }
}

fn default_match() -> Vec<String> {
    vec![DEFAULT_MATCH.to_string()]
}

impl Config {
    /// Load configuration from `.git-semver.toml` in the given root directory.
    ///
    /// Returns default config if the file doesn't exist.
    /// Reports parse errors with file, line, and key information, then falls
    /// back to the defaults.
    pub fn load(root: &Path) -> Self {
        let config_path = root.join(CONFIG_FILE);

        // Build layered config: defaults <- toml file <- environment
        let figment = Figment::from(Serialized::defaults(Config::default()));

        let figment = if config_path.exists() {
            figment.merge(Toml::file(&config_path))
        } else {
            figment
        };

        let figment = figment.merge(Env::prefixed(ENV_PREFIX));

        match figment.extract() {
            Ok(config) => {
                if config_path.exists() {
                    tracing::info!("Loaded config from {:?}", config_path);
                }
                config
            }
            Err(e) => {
                tracing::warn!("Config error: {}", e);
                Self::default()
            }
        }
    }

    /// Describe options seeded from this configuration.
    pub fn describe_options(&self) -> DescribeOptions {
        DescribeOptions {
            tags: self.tags,
            first_parent: self.first_parent,
            abbrev: self.abbrev,
            matches: self.match_patterns.clone(),
            excludes: self.exclude.clone(),
            ..Default::default()
        }
    }

    /// Configured extra build identifiers, normalized.
    pub fn build_metadata(&self) -> crate::Result<SeparatedList> {
        match &self.build {
            Some(value) => SeparatedList::try_from(value),
            None => Ok(SeparatedList::default()),
        }
    }
}

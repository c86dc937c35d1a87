//! Runtime configuration: defaults, an optional JSON file, then environment
//! overrides.

use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::Path;
use tracing::warn;

use crate::random::{RandomSource, source_from_seed};
use crate::spintax::ExpanderConfig;
use crate::utils::Result;

pub const ENV_SEED: &str = "OUTREACH_GEN_SEED";
pub const ENV_COUNT: &str = "OUTREACH_GEN_COUNT";
pub const ENV_LOG: &str = "OUTREACH_GEN_LOG";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Variants/items generated when a command gets no explicit count
    pub default_count: usize,
    /// Fixed RNG seed; `None` uses the thread RNG
    pub seed: Option<u64>,
    /// Sampling budget multiplier for large spintax spaces
    pub attempt_factor: usize,
    /// Spintax spaces up to this size are enumerated
    pub exhaustive_limit: u64,
    /// `tracing` filter used when `RUST_LOG` is not set
    pub log_filter: String,
}

impl Default for Config {
    fn default() -> Self {
        let expander = ExpanderConfig::default();
        Config {
            default_count: 5,
            seed: None,
            attempt_factor: expander.attempt_factor,
            exhaustive_limit: expander.exhaustive_limit,
            log_filter: "warn".to_string(),
        }
    }
}

impl Config {
    pub fn from_json_str(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        Self::from_json_str(&content)
    }

    /// Load from `path` when given, else defaults; then apply the environment
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut config = match path {
            Some(path) => Config::from_file(path)?,
            None => Config::default(),
        };
        config.apply_env(|key| env::var(key).ok());
        Ok(config)
    }

    /// Apply overrides from `lookup` (normally the process environment).
    /// Unparseable values are ignored with a warning.
    pub fn apply_env<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(raw) = lookup(ENV_SEED) {
            match raw.trim().parse() {
                Ok(seed) => self.seed = Some(seed),
                Err(_) => warn!(key = ENV_SEED, value = %raw, "ignoring unparseable override"),
            }
        }
        if let Some(raw) = lookup(ENV_COUNT) {
            match raw.trim().parse() {
                Ok(count) => self.default_count = count,
                Err(_) => warn!(key = ENV_COUNT, value = %raw, "ignoring unparseable override"),
            }
        }
        if let Some(filter) = lookup(ENV_LOG).filter(|f| !f.trim().is_empty()) {
            self.log_filter = filter;
        }
    }

    pub fn expander_config(&self) -> ExpanderConfig {
        ExpanderConfig {
            attempt_factor: self.attempt_factor.max(1),
            exhaustive_limit: self.exhaustive_limit,
        }
    }

    /// RNG for this run; `seed_override` wins over the configured seed
    pub fn random_source(&self, seed_override: Option<u64>) -> Box<dyn RandomSource> {
        source_from_seed(seed_override.or(self.seed))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::collections::HashMap;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_partial_json_uses_defaults() {
        let config = Config::from_json_str(r#"{"default_count": 12}"#).unwrap();
        assert_eq!(config.default_count, 12);
        assert_eq!(config.attempt_factor, 2);
        assert_eq!(config.log_filter, "warn");
    }

    #[test]
    fn test_from_file() {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(br#"{"seed": 99, "exhaustive_limit": 10}"#).unwrap();
        let config = Config::load(Some(file.path())).unwrap();
        assert_eq!(config.expander_config().exhaustive_limit, 10);
    }

    #[test]
    fn test_env_overrides() {
        let env: HashMap<&str, &str> = [(ENV_SEED, "7"), (ENV_COUNT, "nope"), (ENV_LOG, "debug")]
            .into_iter()
            .collect();
        let mut config = Config::default();
        config.apply_env(|key| env.get(key).map(|v| v.to_string()));
        assert_eq!(config.seed, Some(7));
        assert_eq!(config.default_count, 5);
        assert_eq!(config.log_filter, "debug");
    }

    #[test]
    fn test_seed_override_is_reproducible() {
        let config = Config::default();
        let mut a = config.random_source(Some(3));
        let mut b = config.random_source(Some(3));
        assert_eq!(a.next_index(1000), b.next_index(1000));
    }

    #[test]
    fn test_bad_json() {
        assert!(Config::from_json_str("{not json").is_err());
    }
}

//! Demo configuration.

use anyhow::{Context, Result};
use std::collections::BTreeMap;
use verlist_core::Policy;

/// One generation: the full set of entries that should exist after it.
pub type Generation = BTreeMap<String, i64>;

/// Demo configuration.
#[derive(Debug, Clone)]
pub struct DemoConfig {
    /// Policy used by `replay`
    pub policy: Policy,

    /// Key used by the single-entry demos
    pub key: String,

    /// Payload of the first entry
    pub initial_value: i64,

    /// Payload of the colliding entry added during the update
    pub update_value: i64,

    /// Generations applied in order by `replay`
    pub generations: Vec<Generation>,
}

impl Default for DemoConfig {
    fn default() -> Self {
        Self {
            policy: Policy::Replace,
            key: "123".to_string(),
            initial_value: 123,
            update_value: 456,
            generations: vec![
                Generation::from([("123".to_string(), 1), ("456".to_string(), 2)]),
                Generation::from([("123".to_string(), 10), ("789".to_string(), 3)]),
            ],
        }
    }
}

impl DemoConfig {
    /// Load configuration from environment variables.
    ///
    /// # Environment Variables
    ///
    /// - `VERLIST_POLICY`: "replace", "keep-old" or "no-delete"
    /// - `VERLIST_KEY`: key used by the single-entry demos
    /// - `VERLIST_INITIAL_VALUE`: payload of the first entry
    /// - `VERLIST_UPDATE_VALUE`: payload of the colliding entry
    /// - `VERLIST_GENERATIONS`: JSON array of `{key: value}` objects
    ///
    /// # Errors
    ///
    /// Returns error if a variable is set but cannot be parsed.
    pub fn from_env() -> Result<Self> {
        let mut config = Self::default();

        if let Ok(policy) = std::env::var("VERLIST_POLICY") {
            config.policy = policy.parse().context("Invalid VERLIST_POLICY")?;
        }

        if let Ok(key) = std::env::var("VERLIST_KEY") {
            config.key = key;
        }

        if let Ok(value) = std::env::var("VERLIST_INITIAL_VALUE") {
            config.initial_value = value
                .parse()
                .context("Invalid VERLIST_INITIAL_VALUE")?;
        }

        if let Ok(value) = std::env::var("VERLIST_UPDATE_VALUE") {
            config.update_value = value.parse().context("Invalid VERLIST_UPDATE_VALUE")?;
        }

        if let Ok(json) = std::env::var("VERLIST_GENERATIONS") {
            config.generations = parse_generations(&json)?;
        }

        Ok(config)
    }
}

/// Parse a JSON array of generations.
///
/// # Errors
///
/// Returns error if the JSON is malformed or values are not integers.
pub fn parse_generations(json: &str) -> Result<Vec<Generation>> {
    serde_json::from_str(json).context("Invalid VERLIST_GENERATIONS JSON")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_has_two_generations() {
        let config = DemoConfig::default();
        assert_eq!(config.policy, Policy::Replace);
        assert_eq!(config.generations.len(), 2);
        assert_eq!(config.generations[1].get("789"), Some(&3));
    }

    #[test]
    fn generations_parse_from_json() {
        let generations = parse_generations(r#"[{"a": 1, "b": 2}, {}, {"b": -3}]"#).unwrap();
        assert_eq!(generations.len(), 3);
        assert!(generations[1].is_empty());
        assert_eq!(generations[2].get("b"), Some(&-3));
    }

    #[test]
    fn malformed_generations_are_rejected() {
        assert!(parse_generations(r#"[{"a": "one"}]"#).is_err());
        assert!(parse_generations("{").is_err());
    }
}

//! Retention policies.
//!
//! A policy is fixed when the registry is built and decides what happens on
//! a key collision and whether the registry itself ever removes entries.
//!
//! # Policy Table
//!
//! | Policy | On collision | Sweep / delete |
//! |--------|--------------|----------------|
//! | Replace | new entry takes the slot, old handed to the callback | removes, callback frees |
//! | KeepOld | existing entry kept and refreshed, new returned to caller | removes, callback frees |
//! | NoDelete | existing entry kept and refreshed, callback copies fields | suppressed |

use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// How a registry reconciles collisions and removals.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum Policy {
    /// The newest entry replaces the indexed one
    #[default]
    Replace,
    /// The first entry wins; removals are automatic
    KeepOld,
    /// The first entry wins; removals are left to the caller
    NoDelete,
}

impl Policy {
    /// All policies, in declaration order.
    pub const ALL: [Policy; 3] = [Policy::Replace, Policy::KeepOld, Policy::NoDelete];

    /// Whether a colliding `add` keeps the already indexed entry.
    #[must_use]
    pub fn keeps_existing(self) -> bool {
        match self {
            Policy::Replace => false,
            Policy::KeepOld | Policy::NoDelete => true,
        }
    }

    /// Whether sweeps and `delete` remove entries from the index.
    #[must_use]
    pub fn removes(self) -> bool {
        match self {
            Policy::Replace | Policy::KeepOld => true,
            Policy::NoDelete => false,
        }
    }

    /// The canonical name, as accepted by [`FromStr`].
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Policy::Replace => "replace",
            Policy::KeepOld => "keep-old",
            Policy::NoDelete => "no-delete",
        }
    }
}

impl std::fmt::Display for Policy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Policy {
    type Err = ParsePolicyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().replace('_', "-").as_str() {
            "replace" | "plain" => Ok(Policy::Replace),
            "keep-old" => Ok(Policy::KeepOld),
            "no-delete" => Ok(Policy::NoDelete),
            _ => Err(ParsePolicyError::Unknown(s.to_string())),
        }
    }
}

/// Errors that can occur when parsing a policy name.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParsePolicyError {
    /// The name matches no policy
    #[error("unknown policy {0:?}, expected one of: replace, keep-old, no-delete")]
    Unknown(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn policy_behaviors() {
        assert!(!Policy::Replace.keeps_existing());
        assert!(Policy::KeepOld.keeps_existing());
        assert!(Policy::NoDelete.keeps_existing());

        assert!(Policy::Replace.removes());
        assert!(Policy::KeepOld.removes());
        assert!(!Policy::NoDelete.removes());
    }

    #[test]
    fn policy_names_parse_back() {
        for policy in Policy::ALL {
            assert_eq!(policy.to_string().parse::<Policy>(), Ok(policy));
        }
        assert_eq!("KEEP_OLD".parse::<Policy>(), Ok(Policy::KeepOld));
        assert_eq!("plain".parse::<Policy>(), Ok(Policy::Replace));
    }

    #[test]
    fn unknown_policy_is_rejected() {
        let err = "newest".parse::<Policy>().unwrap_err();
        assert_eq!(err, ParsePolicyError::Unknown("newest".to_string()));
        assert!(err.to_string().contains("keep-old"));
    }

    #[test]
    fn policy_serde_uses_kebab_case() {
        let json = serde_json::to_string(&Policy::NoDelete).unwrap();
        assert_eq!(json, "\"no-delete\"");

        let parsed: Policy = serde_json::from_str("\"keep-old\"").unwrap();
        assert_eq!(parsed, Policy::KeepOld);
    }
}

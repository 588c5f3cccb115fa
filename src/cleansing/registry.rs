//! In-memory registry of cleansing rule versions.

use std::collections::HashMap;
use std::path::Path;

use tracing::debug;

use super::loader;
use super::rule::CleansingRule;
use crate::error::RuleResult;

/// Cleansing rules keyed by `(rule_id, version)`.
///
/// The registry is a plain value: it is not synchronized. Callers that share one across
/// threads wrap it themselves (e.g. `Mutex<RuleRegistry>`).
#[derive(Debug, Clone, Default)]
pub struct RuleRegistry {
    rules: HashMap<(String, String), CleansingRule>,
}

impl RuleRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace the entry for `(rule.rule_id, rule.version)`.
    pub fn upsert(&mut self, rule: CleansingRule) {
        debug!(rule_id = %rule.rule_id, version = %rule.version, "upserting cleansing rule");
        self.rules
            .insert((rule.rule_id.clone(), rule.version.clone()), rule);
    }

    /// Fetch a rule by id and optional version.
    ///
    /// Without a version, the version string that sorts greatest **lexicographically** wins.
    /// This is not semver-aware: `"2"` beats `"10"`. Use zero-padded or date-like versions
    /// (`2024.07.01`) when "latest" resolution matters.
    pub fn get(&self, rule_id: &str, version: Option<&str>) -> Option<&CleansingRule> {
        match version.filter(|v| !v.is_empty()) {
            Some(version) => self.rules.get(&(rule_id.to_string(), version.to_string())),
            None => self
                .rules
                .iter()
                .filter(|((id, _), _)| id == rule_id)
                .max_by(|((_, a), _), ((_, b), _)| a.cmp(b))
                .map(|(_, rule)| rule),
        }
    }

    /// All rules, optionally restricted to one dataset type. Order is unspecified.
    pub fn list<'a>(&'a self, dataset_type: Option<&'a str>) -> impl Iterator<Item = &'a CleansingRule> + 'a {
        self.rules
            .values()
            .filter(move |rule| dataset_type.is_none_or(|dt| rule.dataset_type == dt))
    }

    /// Remove every rule.
    pub fn clear(&mut self) {
        self.rules.clear();
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Load every rule file under `dir` (see [`loader::load_rules_from_dir`]) and upsert it.
    ///
    /// Returns the number of rules loaded.
    pub fn load_from_dir(&mut self, dir: impl AsRef<Path>) -> RuleResult<usize> {
        let rules = loader::load_rules_from_dir(dir)?;
        let count = rules.len();
        for rule in rules {
            self.upsert(rule);
        }
        Ok(count)
    }
}

impl Extend<CleansingRule> for RuleRegistry {
    fn extend<T: IntoIterator<Item = CleansingRule>>(&mut self, iter: T) {
        for rule in iter {
            self.upsert(rule);
        }
    }
}

impl FromIterator<CleansingRule> for RuleRegistry {
    fn from_iter<T: IntoIterator<Item = CleansingRule>>(iter: T) -> Self {
        let mut registry = Self::new();
        registry.extend(iter);
        registry
    }
}

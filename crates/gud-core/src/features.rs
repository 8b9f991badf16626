//! Feature flags gating optional parameter groups.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

/// Largest number of distinct flags a description table may mention.
///
/// Validation checks every subset of the flags.
pub const MAX_FEATURE_FLAGS: usize = 16;

/// A named compile-time switch, e.g. `GUD_ALLOW_CARBON`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FeatureFlag(String);

impl FeatureFlag {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn name(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for FeatureFlag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for FeatureFlag {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

/// The set of feature flags enabled for one build or run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FeatureSet {
    enabled: BTreeSet<FeatureFlag>,
}

impl FeatureSet {
    /// Create an empty feature set (every optional group disabled)
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a flag and return self for method chaining.
    pub fn with(mut self, flag: impl Into<FeatureFlag>) -> Self {
        self.enable(flag);
        self
    }

    pub fn enable(&mut self, flag: impl Into<FeatureFlag>) {
        self.enabled.insert(flag.into());
    }

    pub fn disable(&mut self, flag: &FeatureFlag) {
        self.enabled.remove(flag);
    }

    pub fn is_enabled(&self, flag: &FeatureFlag) -> bool {
        self.enabled.contains(flag)
    }

    /// Check whether something gated by `condition` is present.
    ///
    /// Unconditional items (`None`) are always present.
    pub fn allows(&self, condition: Option<&FeatureFlag>) -> bool {
        condition.map_or(true, |flag| self.is_enabled(flag))
    }

    pub fn iter(&self) -> impl Iterator<Item = &FeatureFlag> {
        self.enabled.iter()
    }

    pub fn len(&self) -> usize {
        self.enabled.len()
    }

    pub fn is_empty(&self) -> bool {
        self.enabled.is_empty()
    }

    /// Every subset of `flags`, starting with the empty set.
    ///
    /// The result has `2^n` entries; callers keep `n` within [`MAX_FEATURE_FLAGS`].
    pub fn combinations<'a>(flags: impl IntoIterator<Item = &'a FeatureFlag>) -> Vec<FeatureSet> {
        let flags: Vec<&FeatureFlag> = flags.into_iter().collect();
        (0..1usize << flags.len())
            .map(|mask| {
                flags
                    .iter()
                    .enumerate()
                    .filter(|&(i, _)| mask & (1usize << i) != 0)
                    .map(|(_, flag)| (*flag).clone())
                    .collect()
            })
            .collect()
    }
}

impl FromIterator<FeatureFlag> for FeatureSet {
    fn from_iter<T: IntoIterator<Item = FeatureFlag>>(iter: T) -> Self {
        Self {
            enabled: iter.into_iter().collect(),
        }
    }
}

impl fmt::Display for FeatureSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let names: Vec<&str> = self.enabled.iter().map(FeatureFlag::name).collect();
        write!(f, "[{}]", names.join(", "))
    }
}

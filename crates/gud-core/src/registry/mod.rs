//! The parameter registry.
//!
//! Parameters go through two phases:
//!
//! 1. **Load** ([`RegistryBuilder`]): parameters are declared from a description
//!    table, assigned at most once from values files, and dependent parameters
//!    are derived from the primary values.
//! 2. **Read** ([`ParameterRegistry`]): produced by [`RegistryBuilder::finish`],
//!    which checks every parameter holds a value. The sealed registry is
//!    immutable and can be shared between workers behind an `Arc` without
//!    locking.
//!
//! Disabled groups and parameters never enter the registry, so reading one is
//! a [`GudError::NotFound`] error.

mod builder;
mod load;

#[cfg(test)]
mod tests;

pub use builder::RegistryBuilder;

use crate::errors::{GudError, GudResult};
use crate::features::FeatureSet;
use crate::sizes::SizeConstants;
use crate::table::ParameterDefinition;
use crate::value::ParameterValue;
use crate::FloatValue;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Where a parameter's value came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ValueSource {
    /// The default from the description table
    Default,
    /// Assigned during the load phase
    Loaded,
    /// Computed from other parameters after the primary load
    Derived,
}

#[derive(Debug, Clone)]
struct RegistryGroup {
    name: String,
    derived: bool,
    members: Vec<usize>,
}

#[derive(Debug, Clone)]
struct Entry {
    group: usize,
    definition: ParameterDefinition,
    value: ParameterValue,
    source: ValueSource,
}

/// Read-only table of all parameters of one simulation run.
#[derive(Debug, Clone)]
pub struct ParameterRegistry {
    features: FeatureSet,
    sizes: SizeConstants,
    groups: Vec<RegistryGroup>,
    entries: Vec<Entry>,
    index: HashMap<String, usize>,
}

impl ParameterRegistry {
    fn entry(&self, name: &str) -> GudResult<&Entry> {
        self.index
            .get(name)
            .map(|&i| &self.entries[i])
            .ok_or_else(|| GudError::NotFound(name.to_string()))
    }

    /// Get the value of a parameter
    pub fn get(&self, name: &str) -> GudResult<&ParameterValue> {
        self.entry(name).map(|e| &e.value)
    }

    pub fn get_logical(&self, name: &str) -> GudResult<bool> {
        let value = self.get(name)?;
        value
            .as_logical()
            .ok_or_else(|| type_mismatch(name, "logical", value))
    }

    pub fn get_integer(&self, name: &str) -> GudResult<i64> {
        let value = self.get(name)?;
        value
            .as_integer()
            .ok_or_else(|| type_mismatch(name, "integer", value))
    }

    pub fn get_real(&self, name: &str) -> GudResult<FloatValue> {
        let value = self.get(name)?;
        value
            .as_real()
            .ok_or_else(|| type_mismatch(name, "real", value))
    }

    pub fn get_real_array(&self, name: &str) -> GudResult<&[FloatValue]> {
        let value = self.get(name)?;
        value
            .as_real_array()
            .ok_or_else(|| type_mismatch(name, "real array", value))
    }

    pub fn get_text(&self, name: &str) -> GudResult<&str> {
        let value = self.get(name)?;
        value
            .as_text()
            .ok_or_else(|| type_mismatch(name, "text", value))
    }

    /// Check if a parameter is present
    pub fn contains(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    /// Get the declaration of a parameter
    pub fn definition(&self, name: &str) -> GudResult<&ParameterDefinition> {
        self.entry(name).map(|e| &e.definition)
    }

    /// Get where the value of a parameter came from
    pub fn source(&self, name: &str) -> GudResult<ValueSource> {
        self.entry(name).map(|e| e.source)
    }

    /// Get the name of the group a parameter belongs to
    pub fn group_of(&self, name: &str) -> GudResult<&str> {
        self.entry(name).map(|e| self.groups[e.group].name.as_str())
    }

    /// Check if a group is present (declared and enabled)
    pub fn has_group(&self, group: &str) -> bool {
        self.groups.iter().any(|g| g.name == group)
    }

    /// Names of the groups present, in declaration order
    pub fn groups(&self) -> impl Iterator<Item = &str> {
        self.groups.iter().map(|g| g.name.as_str())
    }

    /// Names of the parameters of a group, in declaration order
    pub fn group_parameters(&self, group: &str) -> GudResult<Vec<&str>> {
        let group = self
            .groups
            .iter()
            .find(|g| g.name == group)
            .ok_or_else(|| GudError::UnknownGroup(group.to_string()))?;
        Ok(group
            .members
            .iter()
            .map(|&i| self.entries[i].definition.name.as_str())
            .collect())
    }

    /// Names of all parameters, in declaration order
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|e| e.definition.name.as_str())
    }

    /// All `(name, value)` pairs, in declaration order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &ParameterValue)> {
        self.entries
            .iter()
            .map(|e| (e.definition.name.as_str(), &e.value))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// The feature flags the registry was loaded with
    pub fn features(&self) -> &FeatureSet {
        &self.features
    }

    /// The sizing constants array extents were resolved against
    pub fn sizes(&self) -> &SizeConstants {
        &self.sizes
    }

    /// Write every loadable value as a values file.
    ///
    /// Derived groups are left out since they are recomputed on every load.
    /// The output can be fed back to [`RegistryBuilder::load_str`].
    pub fn to_values_toml(&self) -> GudResult<String> {
        let mut file = toml::Table::new();
        for group in self.groups.iter().filter(|g| !g.derived) {
            let values: toml::Table = group
                .members
                .iter()
                .map(|&i| {
                    let entry = &self.entries[i];
                    (entry.definition.name.clone(), entry.value.to_toml())
                })
                .collect();
            if !values.is_empty() {
                file.insert(group.name.clone(), toml::Value::Table(values));
            }
        }
        Ok(toml::to_string(&file)?)
    }
}

fn type_mismatch(name: &str, expected: &str, found: &ParameterValue) -> GudError {
    GudError::TypeMismatch {
        name: name.to_string(),
        expected: expected.to_string(),
        found: found.type_name().to_string(),
    }
}

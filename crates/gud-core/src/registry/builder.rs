//! Load-phase registry builder.

use log::{debug, info};
use std::collections::HashMap;

use super::{Entry, ParameterRegistry, RegistryGroup, ValueSource};
use crate::errors::{GudError, GudResult};
use crate::features::{FeatureFlag, FeatureSet};
use crate::sizes::SizeConstants;
use crate::table::{DescriptionTable, ParameterDefinition};
use crate::value::ParameterValue;

#[derive(Debug, Clone)]
pub(super) struct GroupState {
    pub(super) name: String,
    pub(super) derived: bool,
    /// Disabled groups are remembered so values files naming them can be rejected
    pub(super) enabled: bool,
    pub(super) members: Vec<usize>,
}

#[derive(Debug, Clone)]
pub(super) struct Slot {
    pub(super) group: usize,
    pub(super) definition: ParameterDefinition,
    /// Resolved length for arrays
    pub(super) shape: Option<usize>,
    pub(super) value: Option<ParameterValue>,
    pub(super) source: ValueSource,
}

/// Collects parameter declarations and values during the load phase.
///
/// The builder has a single owner, so assignments need no synchronisation.
/// [`finish`](Self::finish) consumes it: nothing can be written once the
/// registry has been handed to readers.
#[derive(Debug, Clone)]
pub struct RegistryBuilder {
    pub(super) features: FeatureSet,
    pub(super) sizes: SizeConstants,
    pub(super) groups: Vec<GroupState>,
    pub(super) slots: Vec<Slot>,
    pub(super) index: HashMap<String, usize>,
}

impl RegistryBuilder {
    /// Create an empty builder.
    ///
    /// The sizing constants must be complete at this point since array
    /// extents are resolved as parameters are declared.
    pub fn new(features: FeatureSet, sizes: SizeConstants) -> Self {
        Self {
            features,
            sizes,
            groups: vec![],
            slots: vec![],
            index: HashMap::new(),
        }
    }

    /// Declare every group and parameter of a description table.
    pub fn from_table(
        table: &DescriptionTable,
        features: FeatureSet,
        sizes: SizeConstants,
    ) -> GudResult<Self> {
        table.validate()?;

        let mut builder = Self::new(features, sizes);
        for group in &table.groups {
            builder.declare_group(&group.name, group.enabled_if.clone(), group.derived)?;
            for parameter in &group.parameters {
                builder.declare(&group.name, parameter.clone())?;
            }
        }
        debug!(
            "Declared {} of {} parameters from the {} table",
            builder.slots.len(),
            table.iter().count(),
            table.package
        );
        Ok(builder)
    }

    /// Declare a group.
    ///
    /// Returns whether the group is enabled under the builder's features.
    pub fn declare_group(
        &mut self,
        name: impl Into<String>,
        enabled_if: Option<FeatureFlag>,
        derived: bool,
    ) -> GudResult<bool> {
        let name = name.into();
        if self.groups.iter().any(|g| g.name == name) {
            return Err(GudError::DuplicateGroup(name));
        }

        let enabled = self.features.allows(enabled_if.as_ref());
        if !enabled {
            debug!("Group {name} is disabled (requires {enabled_if:?})");
        }
        self.groups.push(GroupState {
            name,
            derived,
            enabled,
            members: vec![],
        });
        Ok(enabled)
    }

    /// Declare a parameter in a previously declared group.
    ///
    /// Returns `false` without declaring anything if the group or the
    /// parameter's own condition is disabled. Defaults are converted and
    /// checked here, so a bad table fails before any values are read.
    pub fn declare(&mut self, group: &str, definition: ParameterDefinition) -> GudResult<bool> {
        let group_idx = self.group_index(group)?;
        if !self.groups[group_idx].enabled || !self.features.allows(definition.enabled_if.as_ref())
        {
            debug!("Skipping disabled parameter {}", definition.name);
            return Ok(false);
        }

        if self.index.contains_key(&definition.name) {
            return Err(GudError::DuplicateName {
                name: definition.name,
                group: group.to_string(),
            });
        }

        let shape = match &definition.dims {
            Some(extent) => Some(extent.resolve(&self.sizes).ok_or_else(|| {
                GudError::UnresolvedDimension {
                    name: definition.name.clone(),
                    extent: extent.to_string(),
                }
            })?),
            None => None,
        };

        let value = match &definition.default {
            Some(default) => {
                let value =
                    ParameterValue::from_toml(&definition.name, definition.kind, shape, default)?;
                check_value(&definition, shape, &value)?;
                Some(value)
            }
            None => None,
        };

        let idx = self.slots.len();
        self.index.insert(definition.name.clone(), idx);
        self.groups[group_idx].members.push(idx);
        self.slots.push(Slot {
            group: group_idx,
            definition,
            shape,
            value,
            source: ValueSource::Default,
        });
        Ok(true)
    }

    /// Assign a primary parameter.
    ///
    /// Each parameter can be assigned once; a second assignment is an error
    /// even with the same value.
    pub fn set(&mut self, name: &str, value: ParameterValue) -> GudResult<()> {
        let idx = self.slot_index(name)?;
        if self.groups[self.slots[idx].group].derived {
            return Err(GudError::DerivedParameter(name.to_string()));
        }
        self.assign(idx, value, ValueSource::Loaded)
    }

    /// Assign a dependent parameter computed from the primary values.
    pub fn derive(&mut self, name: &str, value: ParameterValue) -> GudResult<()> {
        let idx = self.slot_index(name)?;
        if !self.groups[self.slots[idx].group].derived {
            return Err(GudError::NotDerived(name.to_string()));
        }
        self.assign(idx, value, ValueSource::Derived)
    }

    /// Read a value during the load phase.
    pub fn get(&self, name: &str) -> GudResult<&ParameterValue> {
        let idx = self.slot_index(name)?;
        self.slots[idx]
            .value
            .as_ref()
            .ok_or_else(|| GudError::Unassigned(name.to_string()))
    }

    /// Check if a parameter is declared and enabled
    pub fn contains(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    pub fn features(&self) -> &FeatureSet {
        &self.features
    }

    pub fn sizes(&self) -> &SizeConstants {
        &self.sizes
    }

    /// Seal the registry.
    ///
    /// Fails with [`GudError::Unassigned`] for the first parameter (in
    /// declaration order) that has neither a loaded, derived nor default value.
    pub fn finish(self) -> GudResult<ParameterRegistry> {
        let mut group_map = HashMap::new();
        let mut groups = vec![];
        for (i, group) in self.groups.into_iter().enumerate() {
            if group.enabled {
                group_map.insert(i, groups.len());
                groups.push(RegistryGroup {
                    name: group.name,
                    derived: group.derived,
                    members: group.members,
                });
            }
        }

        let mut entries = Vec::with_capacity(self.slots.len());
        for slot in self.slots {
            let value = slot
                .value
                .ok_or_else(|| GudError::Unassigned(slot.definition.name.clone()))?;
            entries.push(Entry {
                group: group_map[&slot.group],
                definition: slot.definition,
                value,
                source: slot.source,
            });
        }

        info!(
            "Parameter registry sealed: {} parameters in {} groups, features {}",
            entries.len(),
            groups.len(),
            self.features
        );

        Ok(ParameterRegistry {
            features: self.features,
            sizes: self.sizes,
            groups,
            entries,
            index: self.index,
        })
    }

    pub(super) fn group_index(&self, group: &str) -> GudResult<usize> {
        self.groups
            .iter()
            .position(|g| g.name == group)
            .ok_or_else(|| GudError::UnknownGroup(group.to_string()))
    }

    pub(super) fn slot_index(&self, name: &str) -> GudResult<usize> {
        self.index
            .get(name)
            .copied()
            .ok_or_else(|| GudError::NotFound(name.to_string()))
    }

    fn assign(&mut self, idx: usize, value: ParameterValue, source: ValueSource) -> GudResult<()> {
        let slot = &mut self.slots[idx];
        if slot.source != ValueSource::Default {
            return Err(GudError::AlreadyAssigned(slot.definition.name.clone()));
        }
        check_value(&slot.definition, slot.shape, &value)?;
        slot.value = Some(value);
        slot.source = source;
        Ok(())
    }
}

/// Check a value against its declaration.
fn check_value(
    definition: &ParameterDefinition,
    shape: Option<usize>,
    value: &ParameterValue,
) -> GudResult<()> {
    let name = &definition.name;
    let mismatch = || GudError::TypeMismatch {
        name: name.clone(),
        expected: match shape {
            Some(_) => "real array".to_string(),
            None => definition.kind.name().to_string(),
        },
        found: value.type_name().to_string(),
    };

    if value.kind() != definition.kind {
        return Err(mismatch());
    }

    match (shape, value) {
        (Some(expected), ParameterValue::RealArray(values)) => {
            if values.len() != expected {
                return Err(GudError::DimensionMismatch {
                    name: name.clone(),
                    expected,
                    found: values.len(),
                });
            }
        }
        (Some(_), _) | (None, ParameterValue::RealArray(_)) => return Err(mismatch()),
        (None, ParameterValue::Text(text)) => {
            let limit = definition.length.unwrap_or(usize::MAX);
            let found = text.len();
            if found > limit {
                return Err(GudError::TextTooLong {
                    name: name.clone(),
                    limit,
                    found,
                });
            }
        }
        (None, _) => {}
    }
    Ok(())
}

//! Parameter description tables.
//!
//! A description table is the single source from which both the registry and
//! the declaration header are produced. It lists groups in order, and for each
//! group its parameters in order, together with their kind, array extent and
//! enable condition.
//!
//! # Example
//!
//! ```
//! use gud_core::table::{DescriptionTable, ParameterDefinition};
//! use gud_core::sizes::Extent;
//!
//! let table = DescriptionTable::new("gud")
//!     .group("GUD_CONSTANTS")
//!         .parameter(ParameterDefinition::real("rad2deg").with_default(57.29577951308232))
//!         .build()
//!     .group("CARBON_CONSTANTS")
//!         .enabled_if("GUD_ALLOW_CARBON")
//!         .parameter(ParameterDefinition::real("Pa2Atm").with_default(1.01325e5))
//!         .build()
//!     .group("GUD_RADTRANS_PARAMS")
//!         .enabled_if("GUD_ALLOW_RADTRANS")
//!         .parameter(ParameterDefinition::real_array(
//!             "gud_waveband_edges",
//!             Extent::named_with_offset("nlam", 1),
//!         ))
//!         .build();
//!
//! assert!(table.validate().is_ok());
//! ```
//!
//! The same table written as TOML:
//!
//! ```toml
//! package = "gud"
//!
//! [[group]]
//! name = "CARBON_CONSTANTS"
//! enabled_if = "GUD_ALLOW_CARBON"
//!
//! [[group.parameter]]
//! name = "Pa2Atm"
//! kind = "real"
//! default = 1.01325e5
//! ```

use crate::errors::{GudError, GudResult};
use crate::features::{FeatureFlag, FeatureSet, MAX_FEATURE_FLAGS};
use crate::sizes::Extent;
use crate::value::ParameterKind;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashSet};
use std::path::Path;

/// Declaration of a single parameter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParameterDefinition {
    /// Parameter name, unique across the whole table
    pub name: String,

    pub kind: ParameterKind,

    /// Array extent; `None` for scalars
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dims: Option<Extent>,

    /// Maximum length of text parameters
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub length: Option<usize>,

    /// Feature flag the parameter depends on, in addition to its group's
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub enabled_if: Option<FeatureFlag>,

    /// Value used when the values file does not assign one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default: Option<toml::Value>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unit: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl ParameterDefinition {
    fn new(name: impl Into<String>, kind: ParameterKind) -> Self {
        Self {
            name: name.into(),
            kind,
            dims: None,
            length: None,
            enabled_if: None,
            default: None,
            unit: None,
            description: None,
        }
    }

    pub fn logical(name: impl Into<String>) -> Self {
        Self::new(name, ParameterKind::Logical)
    }

    pub fn integer(name: impl Into<String>) -> Self {
        Self::new(name, ParameterKind::Integer)
    }

    pub fn real(name: impl Into<String>) -> Self {
        Self::new(name, ParameterKind::Real)
    }

    pub fn real_array(name: impl Into<String>, dims: Extent) -> Self {
        Self {
            dims: Some(dims),
            ..Self::new(name, ParameterKind::Real)
        }
    }

    pub fn text(name: impl Into<String>, length: usize) -> Self {
        Self {
            length: Some(length),
            ..Self::new(name, ParameterKind::Text)
        }
    }

    pub fn enabled_if(mut self, flag: impl Into<FeatureFlag>) -> Self {
        self.enabled_if = Some(flag.into());
        self
    }

    pub fn with_default(mut self, value: impl Into<toml::Value>) -> Self {
        self.default = Some(value.into());
        self
    }

    pub fn with_unit(mut self, unit: impl Into<String>) -> Self {
        self.unit = Some(unit.into());
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}

/// A named collection of parameters sharing an enable condition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GroupDefinition {
    pub name: String,

    /// Feature flag the whole group depends on
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub enabled_if: Option<FeatureFlag>,

    /// Derived groups are computed after the primary load instead of being read
    /// from a values file.
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub derived: bool,

    #[serde(default, rename = "parameter")]
    pub parameters: Vec<ParameterDefinition>,
}

impl GroupDefinition {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            enabled_if: None,
            derived: false,
            parameters: Vec::new(),
        }
    }

    /// Whether `parameter` of this group is present under `features`
    pub fn allows(&self, parameter: &ParameterDefinition, features: &FeatureSet) -> bool {
        features.allows(self.enabled_if.as_ref()) && features.allows(parameter.enabled_if.as_ref())
    }
}

/// Complete parameter description for a package.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DescriptionTable {
    /// Package name, used in generated documentation
    pub package: String,

    /// File name of the generated header
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub header: Option<String>,

    /// Flag wrapping the whole generated header
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub guard: Option<FeatureFlag>,

    /// Headers that must be included before the generated one
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub requires: Vec<String>,

    #[serde(default, rename = "group")]
    pub groups: Vec<GroupDefinition>,
}

impl DescriptionTable {
    pub fn new(package: impl Into<String>) -> Self {
        Self {
            package: package.into(),
            ..Self::default()
        }
    }

    pub fn with_header(mut self, header: impl Into<String>) -> Self {
        self.header = Some(header.into());
        self
    }

    pub fn with_guard(mut self, guard: impl Into<FeatureFlag>) -> Self {
        self.guard = Some(guard.into());
        self
    }

    pub fn requires(mut self, header: impl Into<String>) -> Self {
        self.requires.push(header.into());
        self
    }

    /// Begin defining a group
    ///
    /// Returns a [`GroupBuilder`] for adding parameters.
    pub fn group(self, name: impl Into<String>) -> GroupBuilder {
        GroupBuilder {
            table: self,
            group: GroupDefinition::new(name),
        }
    }

    pub fn from_toml_str(text: &str) -> GudResult<Self> {
        Ok(toml::from_str(text)?)
    }

    pub fn from_file(path: impl AsRef<Path>) -> GudResult<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_toml_str(&text)
    }

    pub fn to_toml_string(&self) -> GudResult<String> {
        Ok(toml::to_string(self)?)
    }

    /// Get a group by name
    pub fn get_group(&self, name: &str) -> Option<&GroupDefinition> {
        self.groups.iter().find(|g| g.name == name)
    }

    /// Find a parameter and the group that declares it
    pub fn find(&self, name: &str) -> Option<(&GroupDefinition, &ParameterDefinition)> {
        self.iter().find(|(_, p)| p.name == name)
    }

    /// All `(group, parameter)` pairs in declaration order
    pub fn iter(&self) -> impl Iterator<Item = (&GroupDefinition, &ParameterDefinition)> {
        self.groups
            .iter()
            .flat_map(|g| g.parameters.iter().map(move |p| (g, p)))
    }

    /// The `(group, parameter)` pairs present under `features`, in declaration order
    pub fn enabled<'a, 'f>(
        &'a self,
        features: &'f FeatureSet,
    ) -> impl Iterator<Item = (&'a GroupDefinition, &'a ParameterDefinition)> + 'f
    where
        'a: 'f,
    {
        self.iter().filter(move |(g, p)| g.allows(p, features))
    }

    /// Every feature flag mentioned by a group or parameter
    pub fn feature_flags(&self) -> BTreeSet<FeatureFlag> {
        self.groups
            .iter()
            .filter_map(|g| g.enabled_if.clone())
            .chain(self.iter().filter_map(|(_, p)| p.enabled_if.clone()))
            .collect()
    }

    /// Check the table is self-consistent.
    ///
    /// Parameter names must be unique under every combination of the feature
    /// flags the table mentions; conditions never mask a duplicate.
    pub fn validate(&self) -> GudResult<()> {
        let mut group_names = HashSet::new();
        for group in &self.groups {
            if !group_names.insert(group.name.as_str()) {
                return Err(GudError::DuplicateGroup(group.name.clone()));
            }
        }

        for (_, parameter) in self.iter() {
            validate_definition(parameter)?;
        }

        let flags = self.feature_flags();
        if flags.len() > MAX_FEATURE_FLAGS {
            return Err(GudError::TooManyFeatureFlags {
                found: flags.len(),
                limit: MAX_FEATURE_FLAGS,
            });
        }
        for features in FeatureSet::combinations(&flags) {
            let mut seen = HashSet::new();
            for (group, parameter) in self.enabled(&features) {
                if !seen.insert(parameter.name.as_str()) {
                    return Err(GudError::DuplicateName {
                        name: parameter.name.clone(),
                        group: group.name.clone(),
                    });
                }
            }
        }
        Ok(())
    }
}

fn validate_definition(parameter: &ParameterDefinition) -> GudResult<()> {
    if parameter.name.is_empty() {
        return Err(GudError::Error("Parameter names cannot be empty".to_string()));
    }
    if parameter.dims.is_some() && parameter.kind != ParameterKind::Real {
        return Err(GudError::Error(format!(
            "Only real parameters can be arrays, '{}' is {}",
            parameter.name, parameter.kind
        )));
    }
    match (parameter.kind, parameter.length) {
        (ParameterKind::Text, Some(0)) | (ParameterKind::Text, None) => {
            Err(GudError::Error(format!(
                "Text parameter '{}' needs a positive length",
                parameter.name
            )))
        }
        (ParameterKind::Text, Some(_)) | (_, None) => Ok(()),
        (kind, Some(_)) => Err(GudError::Error(format!(
            "Only text parameters have a length, '{}' is {}",
            parameter.name, kind
        ))),
    }
}

/// Builder for group definitions.
///
/// Created by [`DescriptionTable::group`], this builder allows adding
/// parameters before finalising the group.
pub struct GroupBuilder {
    table: DescriptionTable,
    group: GroupDefinition,
}

impl GroupBuilder {
    /// Gate the whole group behind a feature flag
    pub fn enabled_if(mut self, flag: impl Into<FeatureFlag>) -> Self {
        self.group.enabled_if = Some(flag.into());
        self
    }

    /// Mark the group as derived after loading
    pub fn derived(mut self) -> Self {
        self.group.derived = true;
        self
    }

    pub fn parameter(mut self, parameter: ParameterDefinition) -> Self {
        self.group.parameters.push(parameter);
        self
    }

    /// Finalise the group and return the updated table
    pub fn build(mut self) -> DescriptionTable {
        self.table.groups.push(self.group);
        self.table
    }
}

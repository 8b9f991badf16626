//! Parameters derived after the primary load (`GUD_DEPENDENT_PARAMS`).

use super::FromRegistry;
use gud_core::errors::{GudError, GudResult};
use gud_core::registry::{ParameterRegistry, RegistryBuilder};
use gud_core::value::ParameterValue;
use gud_core::FloatValue;
use serde::{Deserialize, Serialize};
use std::ops::Range;

/// Vertical layout of the model levels.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VerticalGrid {
    /// Depth of each level interface (m, positive down), from the surface.
    /// Level `k` lies between `interfaces[k]` and `interfaces[k + 1]`.
    interfaces: Vec<FloatValue>,
}

impl VerticalGrid {
    /// Build a grid from interface depths.
    ///
    /// The depths must be finite, start at the surface and increase with each level.
    pub fn new(interfaces: Vec<FloatValue>) -> GudResult<Self> {
        if interfaces.first() != Some(&0.0) {
            return Err(GudError::Error(
                "Level interfaces must start at the surface".to_string(),
            ));
        }
        if interfaces.iter().any(|depth| !depth.is_finite()) {
            return Err(GudError::Error(
                "Level interfaces must be finite".to_string(),
            ));
        }
        if interfaces.windows(2).any(|pair| pair[1] <= pair[0]) {
            return Err(GudError::Error(
                "Level interfaces must increase with depth".to_string(),
            ));
        }
        Ok(Self { interfaces })
    }

    /// Build a grid from the thickness of each level
    pub fn from_thicknesses(thicknesses: &[FloatValue]) -> GudResult<Self> {
        let mut interfaces = Vec::with_capacity(thicknesses.len() + 1);
        let mut depth = 0.0;
        interfaces.push(depth);
        for thickness in thicknesses {
            depth += thickness;
            interfaces.push(depth);
        }
        Self::new(interfaces)
    }

    /// Number of levels
    pub fn levels(&self) -> usize {
        self.interfaces.len().saturating_sub(1)
    }

    /// Depth of the top of level `k`
    pub fn top(&self, k: usize) -> Option<FloatValue> {
        if k < self.levels() {
            self.interfaces.get(k).copied()
        } else {
            None
        }
    }
}

/// Levels receiving the sediment iron flux.
///
/// Levels are 0-based and the range is half-open: the flux applies to
/// `k_min_fe_sed..k_max_fe_sed`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DependentParams {
    pub k_min_fe_sed: usize,
    pub k_max_fe_sed: usize,
}

impl DependentParams {
    /// Compute the sediment iron range for a grid.
    ///
    /// Every level whose top interface lies shallower than `depthfesed`
    /// receives iron from the sediment below it.
    pub fn compute(depthfesed: FloatValue, grid: &VerticalGrid) -> Self {
        let k_max_fe_sed = (0..grid.levels())
            .take_while(|&k| grid.top(k).is_some_and(|top| top < depthfesed))
            .count();
        Self {
            k_min_fe_sed: 0,
            k_max_fe_sed,
        }
    }

    pub fn fe_sed_levels(&self) -> Range<usize> {
        self.k_min_fe_sed..self.k_max_fe_sed
    }

    /// Store the derived values during the load phase.
    pub fn derive_into(&self, builder: &mut RegistryBuilder) -> GudResult<()> {
        builder.derive("kMinFeSed", ParameterValue::Integer(self.k_min_fe_sed as i64))?;
        builder.derive("kMaxFeSed", ParameterValue::Integer(self.k_max_fe_sed as i64))
    }
}

fn get_level(registry: &ParameterRegistry, name: &str) -> GudResult<usize> {
    let value = registry.get_integer(name)?;
    usize::try_from(value)
        .map_err(|_| GudError::Error(format!("{name} must not be negative, got {value}")))
}

impl FromRegistry for DependentParams {
    fn from_registry(registry: &ParameterRegistry) -> GudResult<Self> {
        Ok(Self {
            k_min_fe_sed: get_level(registry, "kMinFeSed")?,
            k_max_fe_sed: get_level(registry, "kMaxFeSed")?,
        })
    }
}

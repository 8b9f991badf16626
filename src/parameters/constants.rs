//! Constants shared by every configuration (`GUD_CONSTANTS`).

use super::FromRegistry;
use gud_core::errors::GudResult;
use gud_core::registry::ParameterRegistry;
use gud_core::FloatValue;
use serde::{Deserialize, Serialize};

/// Mathematical constants (`GUD_CONSTANTS`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GudConstants {
    /// Degrees per radian.
    /// default: 57.29577951308232
    pub rad2deg: FloatValue,
}

impl FromRegistry for GudConstants {
    fn from_registry(registry: &ParameterRegistry) -> GudResult<Self> {
        Ok(Self {
            rad2deg: registry.get_real("rad2deg")?,
        })
    }
}

impl GudConstants {
    pub fn to_degrees(&self, radians: FloatValue) -> FloatValue {
        radians * self.rad2deg
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parameters::tests::test_registry;
    use approx::assert_relative_eq;

    #[test]
    fn test_to_degrees() {
        let constants = GudConstants::from_registry(&test_registry()).unwrap();
        let pi = std::f64::consts::PI as FloatValue;
        assert_relative_eq!(constants.to_degrees(pi), 180.0, max_relative = 1e-12);
    }
}

//! Coloured dissolved organic matter parameters.
//!
//! Only compiled with the `cdom` feature.

use super::FromRegistry;
use gud_core::errors::GudResult;
use gud_core::registry::ParameterRegistry;
use gud_core::FloatValue;
use serde::{Deserialize, Serialize};

/// CDOM parameters (`GUD_CDOM_PARAMS`).
///
/// CDOM is produced as a fraction of remineralised organic matter and is lost
/// by a background degradation plus photobleaching that saturates above
/// `par_cdom`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CdomParams {
    /// Fraction of remineralised DOM that becomes CDOM.
    /// default: 0.02
    pub frac_cdom: FloatValue,

    /// Background degradation rate (1/s).
    /// default: 1/200 days
    pub cdom_degrd: FloatValue,

    /// Maximum photobleaching rate (1/s).
    /// default: 1/15 days
    pub cdom_bleach: FloatValue,

    /// Light at which bleaching saturates (uEin/m^2/s).
    /// default: 20
    pub par_cdom: FloatValue,

    pub r_np_cdom: FloatValue,
    pub r_fep_cdom: FloatValue,
    pub r_cp_cdom: FloatValue,
    pub cdom_coeff: FloatValue,
}

impl FromRegistry for CdomParams {
    fn from_registry(registry: &ParameterRegistry) -> GudResult<Self> {
        Ok(Self {
            frac_cdom: registry.get_real("fracCDOM")?,
            cdom_degrd: registry.get_real("CDOMdegrd")?,
            cdom_bleach: registry.get_real("CDOMbleach")?,
            par_cdom: registry.get_real("PARCDOM")?,
            r_np_cdom: registry.get_real("R_NP_CDOM")?,
            r_fep_cdom: registry.get_real("R_FeP_CDOM")?,
            r_cp_cdom: registry.get_real("R_CP_CDOM")?,
            cdom_coeff: registry.get_real("CDOMcoeff")?,
        })
    }
}

impl CdomParams {
    /// Total CDOM loss rate (1/s) under the given light (uEin/m^2/s)
    pub fn degradation_rate(&self, par: FloatValue) -> FloatValue {
        let light = (par / self.par_cdom).clamp(0.0, 1.0);
        self.cdom_degrd + self.cdom_bleach * light
    }

    /// Nitrogen and iron carried by CDOM with the given phosphorus content
    pub fn stoichiometry(&self, phosphorus: FloatValue) -> (FloatValue, FloatValue) {
        (phosphorus * self.r_np_cdom, phosphorus * self.r_fep_cdom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parameters::tests::test_registry;
    use approx::assert_relative_eq;

    #[test]
    fn test_degradation_rate() {
        let cdom = CdomParams::from_registry(&test_registry()).unwrap();

        assert_eq!(cdom.degradation_rate(0.0), cdom.cdom_degrd);
        assert_relative_eq!(
            cdom.degradation_rate(10.0),
            cdom.cdom_degrd + 0.5 * cdom.cdom_bleach
        );
        // Saturates above PARCDOM
        assert_eq!(cdom.degradation_rate(100.0), cdom.degradation_rate(20.0));
    }

    #[test]
    fn test_stoichiometry() {
        let cdom = CdomParams::from_registry(&test_registry()).unwrap();
        let (nitrogen, iron) = cdom.stoichiometry(2.0);

        assert_eq!(nitrogen, 32.0);
        assert_relative_eq!(iron, 2.0e-3);
    }
}

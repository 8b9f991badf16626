//! Carbonate chemistry and gas exchange constants.
//!
//! Only compiled with the `carbon` feature.

use super::FromRegistry;
use gud_core::errors::GudResult;
use gud_core::registry::ParameterRegistry;
use gud_core::FloatValue;
use serde::{Deserialize, Serialize};

/// Molar volume of oxygen at STP (ml/mol).
const O2_MOLAR_VOLUME: FloatValue = 22391.6;

/// Physical constants of the carbon cycle (`CARBON_CONSTANTS`).
///
/// # Schmidt numbers
///
/// The Schmidt numbers of CO2 (Wanninkhof 1992) and O2 (Keeling et al. 1998)
/// are third-order polynomials in temperature:
/// $$Sc(T) = a_1 - a_2 T + a_3 T^2 - a_4 T^3$$
///
/// # Oxygen saturation
///
/// Garcia and Gordon (1992), with the scaled temperature
/// $T_s = \ln\frac{298.15 - T}{273.15 + T}$:
/// $$\ln C = \sum_{i=0}^{5} A_i T_s^i + S \sum_{i=0}^{3} B_i T_s^i + C_0 S^2$$
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CarbonConstants {
    /// Pascal per atmosphere.
    /// default: 1.01325e5
    pub pa2atm: FloatValue,

    /// Tracer units to mol.
    /// default: 1e-3
    pub ptr2mol: FloatValue,

    /// CO2 Schmidt number coefficients `sca1` to `sca4`
    pub sca: [FloatValue; 4],

    /// O2 Schmidt number coefficients `sox1` to `sox4`
    pub sox: [FloatValue; 4],

    /// `oA0` to `oA5`
    pub o_a: [FloatValue; 6],

    /// `oB0` to `oB3`
    pub o_b: [FloatValue; 4],

    pub o_c0: FloatValue,
}

impl FromRegistry for CarbonConstants {
    fn from_registry(registry: &ParameterRegistry) -> GudResult<Self> {
        Ok(Self {
            pa2atm: registry.get_real("Pa2Atm")?,
            ptr2mol: registry.get_real("ptr2mol")?,
            sca: coefficients(registry, "sca", 1)?,
            sox: coefficients(registry, "sox", 1)?,
            o_a: coefficients(registry, "oA", 0)?,
            o_b: coefficients(registry, "oB", 0)?,
            o_c0: registry.get_real("oC0")?,
        })
    }
}

/// Read the numbered series `{prefix}{first}`, `{prefix}{first + 1}`, ...
fn coefficients<const N: usize>(
    registry: &ParameterRegistry,
    prefix: &str,
    first: usize,
) -> GudResult<[FloatValue; N]> {
    let mut values = [0.0; N];
    for (i, value) in values.iter_mut().enumerate() {
        *value = registry.get_real(&format!("{prefix}{}", first + i))?;
    }
    Ok(values)
}

fn schmidt(coefficients: &[FloatValue; 4], temperature: FloatValue) -> FloatValue {
    let t = temperature;
    coefficients[0] - coefficients[1] * t + coefficients[2] * t * t
        - coefficients[3] * t * t * t
}

impl CarbonConstants {
    /// Schmidt number of CO2 at `temperature` (Celsius)
    pub fn schmidt_co2(&self, temperature: FloatValue) -> FloatValue {
        schmidt(&self.sca, temperature)
    }

    /// Schmidt number of O2 at `temperature` (Celsius)
    pub fn schmidt_o2(&self, temperature: FloatValue) -> FloatValue {
        schmidt(&self.sox, temperature)
    }

    /// Oxygen saturation concentration (mol/m^3).
    ///
    /// # Arguments
    ///
    /// * `temperature` - Potential temperature (Celsius)
    /// * `salinity` - Salinity (psu)
    pub fn o2_saturation(&self, temperature: FloatValue, salinity: FloatValue) -> FloatValue {
        let ts = ((298.15 - temperature) / (273.15 + temperature)).ln();

        let a = self
            .o_a
            .iter()
            .rev()
            .fold(0.0, |acc, coefficient| acc * ts + coefficient);
        let b = self
            .o_b
            .iter()
            .rev()
            .fold(0.0, |acc, coefficient| acc * ts + coefficient);
        let ln_c = a + salinity * b + self.o_c0 * salinity * salinity;

        // ml/l to mol/m^3
        ln_c.exp() / O2_MOLAR_VOLUME * 1.0e3
    }

    /// Convert a partial pressure from Pa to atm
    pub fn pa_to_atm(&self, pressure: FloatValue) -> FloatValue {
        pressure / self.pa2atm
    }
}

/// An inclusive range a surface field is clamped to.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bounds {
    pub min: FloatValue,
    pub max: FloatValue,
}

impl Bounds {
    fn read(registry: &ParameterRegistry, field: &str, suffix: &str) -> GudResult<Self> {
        Ok(Self {
            min: registry.get_real(&format!("surf{field}Min{suffix}"))?,
            max: registry.get_real(&format!("surf{field}Max{suffix}"))?,
        })
    }

    pub fn contains(&self, value: FloatValue) -> bool {
        value >= self.min && value <= self.max
    }

    /// Clamp `value` into the range
    pub fn clamp(&self, value: FloatValue) -> FloatValue {
        value.max(self.min).min(self.max)
    }
}

/// Ranges of the surface fields seen by the carbonate solver.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SurfaceBounds {
    pub salt: Bounds,
    pub temp: Bounds,
    pub dic: Bounds,
    pub alk: Bounds,
    pub po4: Bounds,
    pub si: Bounds,
}

impl SurfaceBounds {
    fn read(registry: &ParameterRegistry, suffix: &str) -> GudResult<Self> {
        Ok(Self {
            salt: Bounds::read(registry, "Salt", suffix)?,
            temp: Bounds::read(registry, "Temp", suffix)?,
            dic: Bounds::read(registry, "DIC", suffix)?,
            alk: Bounds::read(registry, "ALK", suffix)?,
            po4: Bounds::read(registry, "PO4", suffix)?,
            si: Bounds::read(registry, "Si", suffix)?,
        })
    }
}

/// Carbon-only members of `GUD_PARAMS`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CarbonParams {
    /// Atmospheric pCO2 (atm).
    /// default: 278e-6
    pub atmos_pco2: FloatValue,

    /// Oxygen to phosphorus ratio of remineralisation.
    /// default: 170
    pub r_op: FloatValue,

    /// Oxygen to carbon ratio of remineralisation.
    /// default: 170/120
    pub r_oc: FloatValue,

    /// Specific volume of sea water (m^3/kg).
    /// default: 1/1024.5
    pub m3perkg: FloatValue,

    /// Bounds used while the carbonate system is initialised
    pub surface_init: SurfaceBounds,

    /// Bounds used during the run
    pub surface: SurfaceBounds,
}

impl FromRegistry for CarbonParams {
    fn from_registry(registry: &ParameterRegistry) -> GudResult<Self> {
        Ok(Self {
            atmos_pco2: registry.get_real("gud_atmos_pCO2")?,
            r_op: registry.get_real("R_OP")?,
            r_oc: registry.get_real("R_OC")?,
            m3perkg: registry.get_real("m3perkg")?,
            surface_init: SurfaceBounds::read(registry, "Init")?,
            surface: SurfaceBounds::read(registry, "")?,
        })
    }
}

impl CarbonParams {
    /// Convert a concentration per kg of sea water to per m^3
    pub fn per_kg_to_per_m3(&self, value: FloatValue) -> FloatValue {
        value / self.m3perkg
    }
}

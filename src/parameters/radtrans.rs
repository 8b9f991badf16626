//! Spectral radiative transfer parameters.
//!
//! Only compiled with the `radtrans` feature. The per-waveband arrays are
//! sized by the `nlam` sizing constant when the registry is loaded.

use super::FromRegistry;
use gud_core::errors::GudResult;
use gud_core::registry::ParameterRegistry;
use gud_core::FloatValue;
use serde::{Deserialize, Serialize};

/// Radiative transfer parameters (`GUD_RADTRANS_PARAMS`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RadtransParams {
    /// Scale absorption and scattering spectra with cell size.
    /// default: false
    pub allom_spectra: bool,

    pub water_absorb_file: String,
    pub phyto_absorb_file: String,
    pub particle_absorb_file: String,

    /// Solar zenith angle scheme.
    /// default: 0
    pub select_solz: i64,

    /// Number of levels handled by the light model
    pub kmax: i64,

    /// default: 1.341
    pub refract_water: FloatValue,
    pub rmud_max: FloatValue,
    pub part_size_p: FloatValue,

    /// Waveband boundaries (nm), `nlam + 1` values
    pub waveband_edges: Vec<FloatValue>,

    /// Waveband centres (nm), `nlam` values
    pub waveband_centers: Vec<FloatValue>,

    pub radmod_thresh: FloatValue,
    pub rmus: FloatValue,
    pub rmuu: FloatValue,
    pub bbmin: FloatValue,
    pub bbw: FloatValue,

    /// Reference wavelength of the CDOM absorption spectrum (nm).
    /// default: 450
    pub lambda_acdom: FloatValue,

    /// Spectral slope of CDOM absorption (1/nm).
    /// default: 0.014
    pub sdom: FloatValue,

    pub acdom_fac: FloatValue,

    /// Carbon per cell as a power law of cell volume:
    /// $C = a V^b$ (mg C/cell).
    pub acar_cell: FloatValue,
    pub bcar_cell: FloatValue,

    pub absorp_slope: FloatValue,
    pub bbb_slope: FloatValue,
    pub scat_switch_size_log: Vec<FloatValue>,
    pub scat_slope_small: Vec<FloatValue>,
    pub scat_slope_large: Vec<FloatValue>,
}

impl FromRegistry for RadtransParams {
    fn from_registry(registry: &ParameterRegistry) -> GudResult<Self> {
        Ok(Self {
            allom_spectra: registry.get_logical("gud_allomSpectra")?,
            water_absorb_file: registry.get_text("gud_waterAbsorbFile")?.to_string(),
            phyto_absorb_file: registry.get_text("gud_phytoAbsorbFile")?.to_string(),
            particle_absorb_file: registry.get_text("gud_particleAbsorbFile")?.to_string(),
            select_solz: registry.get_integer("gud_selectSolz")?,
            kmax: registry.get_integer("gud_radtrans_kmax")?,
            refract_water: registry.get_real("gud_refract_water")?,
            rmud_max: registry.get_real("gud_rmud_max")?,
            part_size_p: registry.get_real("gud_part_size_P")?,
            waveband_edges: registry.get_real_array("gud_waveband_edges")?.to_vec(),
            waveband_centers: registry.get_real_array("gud_waveband_centers")?.to_vec(),
            radmod_thresh: registry.get_real("gud_radmodThresh")?,
            rmus: registry.get_real("gud_rmus")?,
            rmuu: registry.get_real("gud_rmuu")?,
            bbmin: registry.get_real("gud_bbmin")?,
            bbw: registry.get_real("gud_bbw")?,
            lambda_acdom: registry.get_real("gud_lambda_aCDOM")?,
            sdom: registry.get_real("gud_Sdom")?,
            acdom_fac: registry.get_real("gud_aCDOM_fac")?,
            acar_cell: registry.get_real("gud_aCarCell")?,
            bcar_cell: registry.get_real("gud_bCarCell")?,
            absorp_slope: registry.get_real("gud_absorpSlope")?,
            bbb_slope: registry.get_real("gud_bbbSlope")?,
            scat_switch_size_log: registry.get_real_array("gud_scatSwitchSizeLog")?.to_vec(),
            scat_slope_small: registry.get_real_array("gud_scatSlopeSmall")?.to_vec(),
            scat_slope_large: registry.get_real_array("gud_scatSlopeLarge")?.to_vec(),
        })
    }
}

impl RadtransParams {
    /// Number of wavebands
    pub fn nlam(&self) -> usize {
        self.waveband_centers.len()
    }

    /// Width of each waveband (nm)
    pub fn waveband_widths(&self) -> Vec<FloatValue> {
        self.waveband_edges
            .windows(2)
            .map(|edges| edges[1] - edges[0])
            .collect()
    }

    /// CDOM absorption at each band centre, given its value at the reference
    /// wavelength.
    ///
    /// $$a(\lambda) = a_{ref} \, e^{-S (\lambda - \lambda_{ref})}$$
    pub fn cdom_absorption(&self, reference: FloatValue) -> Vec<FloatValue> {
        self.waveband_centers
            .iter()
            .map(|lambda| reference * (-self.sdom * (lambda - self.lambda_acdom)).exp())
            .collect()
    }

    /// Carbon content of a cell of the given volume (um^3)
    pub fn carbon_per_cell(&self, volume: FloatValue) -> FloatValue {
        self.acar_cell * volume.powf(self.bcar_cell)
    }
}

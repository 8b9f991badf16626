//! Core ecosystem parameters (`GUD_PARAMS`) and the rates computed from them.

use super::FromRegistry;
use gud_core::errors::GudResult;
use gud_core::registry::ParameterRegistry;
use gud_core::FloatValue;
use serde::{Deserialize, Serialize};

/// Kelvin at 0 Celsius
const T_KELVIN: FloatValue = 273.15;

/// Ecosystem parameters always present in `GUD_PARAMS`.
///
/// The carbon-only members of the group are in
/// [`CarbonParams`](super::CarbonParams) when the `carbon` feature is on.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GudParams {
    /// Correct surface fluxes for linear free-surface volume changes.
    /// default: false
    pub lin_fs_conserve: bool,

    /// Initial conditions are given in phosphorus units.
    /// default: false
    pub read_phos: bool,

    /// Seed of the random trait generator.
    /// default: 56
    pub gud_seed: i64,

    /// Grid point written to the debug log
    pub idebug: i64,
    pub jdebug: i64,
    pub kdebug: i64,

    /// Biomass below which plankton are considered extinct (mmol C/m^3).
    /// default: 1e-20
    pub phymin: FloatValue,

    /// Light attenuation by water (1/m).
    /// default: 0.04
    pub katten_w: FloatValue,

    /// Light attenuation by chlorophyll (m^2/mg Chl).
    /// default: 0.04
    pub katten_chl: FloatValue,

    /// Photosynthetically active fraction of shortwave radiation.
    /// default: 0.4
    pub parfrac: FloatValue,

    /// Conversion from W/m^2 to uEin/m^2/s.
    /// default: 1/0.2174
    pub parconv: FloatValue,

    pub tempnorm: FloatValue,

    /// Arrhenius activation temperature (K).
    /// default: -4000
    pub temp_ae_arr: FloatValue,

    /// Arrhenius reference temperature (K).
    /// default: 293.15
    pub tempref_arr: FloatValue,

    /// Arrhenius normalisation.
    /// default: 0.5882
    pub temp_coeff_arr: FloatValue,

    pub alpfe: FloatValue,
    pub scav: FloatValue,
    pub ligand_tot: FloatValue,
    pub ligand_stab: FloatValue,
    pub freefemax: FloatValue,
    pub scav_rat: FloatValue,
    pub scav_inter: FloatValue,
    pub scav_exp: FloatValue,
    pub scav_r_poppoc: FloatValue,

    /// Depth above which sediments release iron (m).
    /// default: 1000
    pub depthfesed: FloatValue,

    pub fesedflux: FloatValue,
    pub fesedflux_pcm: FloatValue,
    pub r_cp_fesed: FloatValue,
    pub knita: FloatValue,
    pub knitb: FloatValue,
    pub par_oxi: FloatValue,

    /// Remineralisation rates of dissolved organic matter (1/s)
    pub kdoc: FloatValue,
    pub kdop: FloatValue,
    pub kdon: FloatValue,
    pub kdofe: FloatValue,

    /// Remineralisation rates of particulate organic matter (1/s)
    pub kpoc: FloatValue,
    pub kpop: FloatValue,
    pub kpon: FloatValue,
    pub kpofe: FloatValue,
    pub kposi: FloatValue,

    /// Sinking speeds of particulate matter (m/s)
    pub wc_sink: FloatValue,
    pub wp_sink: FloatValue,
    pub wn_sink: FloatValue,
    pub wfe_sink: FloatValue,
    pub wsi_sink: FloatValue,
    pub wpic_sink: FloatValue,
    pub kdissc: FloatValue,
    pub diaz_ini_fac: FloatValue,

    /// Oxygen below which denitrification starts (mmol O2/m^3).
    /// default: 6
    pub o2crit: FloatValue,

    pub denit_np: FloatValue,
    pub denit_no3: FloatValue,
    pub no3crit: FloatValue,
    pub parmin: FloatValue,
    pub chl2nmax: FloatValue,
    pub synthcost: FloatValue,
    pub exp_pref: FloatValue,
    pub exp_palat: FloatValue,
    pub palat_min: FloatValue,
    pub inhib_graz: FloatValue,
    pub inhib_graz_exp: FloatValue,
    pub hillnum: FloatValue,
    pub hollexp: FloatValue,
    pub phygrazmin: FloatValue,
    pub pmax_pon: FloatValue,
    pub pmax_don: FloatValue,
    pub pcoef_o2: FloatValue,
    pub pmax_din: FloatValue,
    pub ksat_pom: FloatValue,
    pub ksat_dom: FloatValue,
    pub ksat_din: FloatValue,
    pub alpha_hydrol: FloatValue,
    pub yod: FloatValue,
    pub yoe: FloatValue,
    pub ynd: FloatValue,
    pub yne: FloatValue,
    pub fnh4: FloatValue,
    pub ynh4: FloatValue,
    pub yonh4: FloatValue,
    pub fno2: FloatValue,
    pub yno2: FloatValue,
    pub yono2: FloatValue,
    pub depthdenit: FloatValue,
}

impl FromRegistry for GudParams {
    fn from_registry(registry: &ParameterRegistry) -> GudResult<Self> {
        Ok(Self {
            lin_fs_conserve: registry.get_logical("gud_linFSConserve")?,
            read_phos: registry.get_logical("gud_read_phos")?,
            gud_seed: registry.get_integer("gud_seed")?,
            idebug: registry.get_integer("iDEBUG")?,
            jdebug: registry.get_integer("jDEBUG")?,
            kdebug: registry.get_integer("kDEBUG")?,
            phymin: registry.get_real("phymin")?,
            katten_w: registry.get_real("katten_w")?,
            katten_chl: registry.get_real("katten_chl")?,
            parfrac: registry.get_real("parfrac")?,
            parconv: registry.get_real("parconv")?,
            tempnorm: registry.get_real("tempnorm")?,
            temp_ae_arr: registry.get_real("TempAeArr")?,
            tempref_arr: registry.get_real("TemprefArr")?,
            temp_coeff_arr: registry.get_real("TempCoeffArr")?,
            alpfe: registry.get_real("alpfe")?,
            scav: registry.get_real("scav")?,
            ligand_tot: registry.get_real("ligand_tot")?,
            ligand_stab: registry.get_real("ligand_stab")?,
            freefemax: registry.get_real("freefemax")?,
            scav_rat: registry.get_real("scav_rat")?,
            scav_inter: registry.get_real("scav_inter")?,
            scav_exp: registry.get_real("scav_exp")?,
            scav_r_poppoc: registry.get_real("scav_R_POPPOC")?,
            depthfesed: registry.get_real("depthfesed")?,
            fesedflux: registry.get_real("fesedflux")?,
            fesedflux_pcm: registry.get_real("fesedflux_pcm")?,
            r_cp_fesed: registry.get_real("R_CP_fesed")?,
            knita: registry.get_real("Knita")?,
            knitb: registry.get_real("Knitb")?,
            par_oxi: registry.get_real("PAR_oxi")?,
            kdoc: registry.get_real("Kdoc")?,
            kdop: registry.get_real("Kdop")?,
            kdon: registry.get_real("Kdon")?,
            kdofe: registry.get_real("KdoFe")?,
            kpoc: registry.get_real("KPOC")?,
            kpop: registry.get_real("KPOP")?,
            kpon: registry.get_real("KPON")?,
            kpofe: registry.get_real("KPOFe")?,
            kposi: registry.get_real("KPOSi")?,
            wc_sink: registry.get_real("wC_sink")?,
            wp_sink: registry.get_real("wP_sink")?,
            wn_sink: registry.get_real("wN_sink")?,
            wfe_sink: registry.get_real("wFe_sink")?,
            wsi_sink: registry.get_real("wSi_sink")?,
            wpic_sink: registry.get_real("wPIC_sink")?,
            kdissc: registry.get_real("Kdissc")?,
            diaz_ini_fac: registry.get_real("diaz_ini_fac")?,
            o2crit: registry.get_real("O2crit")?,
            denit_np: registry.get_real("denit_NP")?,
            denit_no3: registry.get_real("denit_NO3")?,
            no3crit: registry.get_real("NO3crit")?,
            parmin: registry.get_real("PARmin")?,
            chl2nmax: registry.get_real("chl2nmax")?,
            synthcost: registry.get_real("synthcost")?,
            exp_pref: registry.get_real("expPref")?,
            exp_palat: registry.get_real("expPalat")?,
            palat_min: registry.get_real("palat_min")?,
            inhib_graz: registry.get_real("inhib_graz")?,
            inhib_graz_exp: registry.get_real("inhib_graz_exp")?,
            hillnum: registry.get_real("hillnum")?,
            hollexp: registry.get_real("hollexp")?,
            phygrazmin: registry.get_real("phygrazmin")?,
            pmax_pon: registry.get_real("pmaxPON")?,
            pmax_don: registry.get_real("pmaxDON")?,
            pcoef_o2: registry.get_real("pcoefO2")?,
            pmax_din: registry.get_real("pmaxDIN")?,
            ksat_pom: registry.get_real("ksatPOM")?,
            ksat_dom: registry.get_real("ksatDOM")?,
            ksat_din: registry.get_real("ksatDIN")?,
            alpha_hydrol: registry.get_real("alpha_hydrol")?,
            yod: registry.get_real("yod")?,
            yoe: registry.get_real("yoe")?,
            ynd: registry.get_real("ynd")?,
            yne: registry.get_real("yne")?,
            fnh4: registry.get_real("fnh4")?,
            ynh4: registry.get_real("ynh4")?,
            yonh4: registry.get_real("yonh4")?,
            fno2: registry.get_real("fno2")?,
            yno2: registry.get_real("yno2")?,
            yono2: registry.get_real("yono2")?,
            depthdenit: registry.get_real("depthdenit")?,
        })
    }
}

impl GudParams {
    /// Arrhenius temperature function.
    ///
    /// $$f(T) = c \, e^{A (1/T_K - 1/T_{ref})}$$
    ///
    /// # Arguments
    ///
    /// * `temperature` - Temperature (Celsius)
    pub fn arrhenius(&self, temperature: FloatValue) -> FloatValue {
        let inverse = 1.0 / (temperature + T_KELVIN) - 1.0 / self.tempref_arr;
        self.temp_coeff_arr * (self.temp_ae_arr * inverse).exp()
    }

    /// Photosynthetically active radiation (uEin/m^2/s) from shortwave (W/m^2)
    pub fn par_from_shortwave(&self, shortwave: FloatValue) -> FloatValue {
        shortwave * self.parfrac * self.parconv
    }

    /// Light attenuation coefficient (1/m) for a chlorophyll concentration
    pub fn attenuation(&self, chlorophyll: FloatValue) -> FloatValue {
        self.katten_w + self.katten_chl * chlorophyll
    }

    pub fn is_extinct(&self, biomass: FloatValue) -> bool {
        biomass < self.phymin
    }

    pub fn denitrifying(&self, oxygen: FloatValue) -> bool {
        oxygen < self.o2crit
    }
}

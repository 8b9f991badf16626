//! Tests for the registry lifecycle.
//!
//! These exercise declaration, loading, derivation and sealing against a small
//! table shaped like a real package: an always-on group, feature-gated groups,
//! a conditional run inside an always-on group, per-waveband arrays and a
//! derived group.


use crate::features::FeatureSet;
use crate::sizes::{Extent, SizeConstants};
use crate::table::{DescriptionTable, ParameterDefinition};

pub(super) const CARBON: &str = "GUD_ALLOW_CARBON";
pub(super) const RADTRANS: &str = "GUD_ALLOW_RADTRANS";

pub(super) fn test_table() -> DescriptionTable {
    DescriptionTable::new("gud")
        .group("GUD_CONSTANTS")
        .parameter(ParameterDefinition::real("rad2deg").with_default(57.29577951308232))
        .build()
        .group("CARBON_CONSTANTS")
        .enabled_if(CARBON)
        .parameter(ParameterDefinition::real("Pa2Atm").with_default(1.01325e5))
        .parameter(ParameterDefinition::real("ptr2mol").with_default(1.0e-3))
        .build()
        .group("GUD_PARAMS")
        .parameter(ParameterDefinition::logical("gud_read_phos").with_default(false))
        .parameter(ParameterDefinition::integer("gud_seed").with_default(56))
        .parameter(ParameterDefinition::real("phymin").with_default(1e-20))
        .parameter(ParameterDefinition::real("depthfesed").with_default(1000.0))
        .parameter(
            ParameterDefinition::real("gud_atmos_pCO2")
                .enabled_if(CARBON)
                .with_default(278e-6),
        )
        .build()
        .group("GUD_RADTRANS_PARAMS")
        .enabled_if(RADTRANS)
        .parameter(ParameterDefinition::text("gud_waterAbsorbFile", 12).with_default(""))
        .parameter(ParameterDefinition::real_array(
            "gud_waveband_edges",
            Extent::named_with_offset("nlam", 1),
        ))
        .parameter(
            ParameterDefinition::real_array("gud_scatSlopeSmall", Extent::named("nlam"))
                .with_default(0.0),
        )
        .build()
        .group("GUD_DEPENDENT_PARAMS")
        .derived()
        .parameter(ParameterDefinition::integer("kMinFeSed"))
        .parameter(ParameterDefinition::integer("kMaxFeSed"))
        .build()
}

pub(super) fn sizes() -> SizeConstants {
    SizeConstants::new().with("nlam", 3)
}

pub(super) fn all_features() -> FeatureSet {
    FeatureSet::new().with(CARBON).with(RADTRANS)
}

use gud::features::{compiled_features, GUD_ALLOW_CARBON, GUD_ALLOW_CDOM, GUD_ALLOW_RADTRANS};
use gud::table::{gud_table, GudSize};
use gud::GudError;
use gud_core::features::{FeatureFlag, FeatureSet};
use gud_core::registry::{ParameterRegistry, RegistryBuilder};
use std::collections::HashSet;

const CARBON_CONSTANTS: [&str; 21] = [
    "Pa2Atm", "ptr2mol", "sca1", "sca2", "sca3", "sca4", "sox1", "sox2", "sox3", "sox4", "oA0",
    "oA1", "oA2", "oA3", "oA4", "oA5", "oB0", "oB1", "oB2", "oB3", "oC0",
];

/// Declare the embedded table with defaults only, without sealing it
fn declare(features: FeatureSet) -> RegistryBuilder {
    let sizes = GudSize { nlam: 4 }.into();
    RegistryBuilder::from_table(&gud_table().unwrap(), features, sizes).unwrap()
}

fn seal(mut builder: RegistryBuilder) -> ParameterRegistry {
    if builder.contains("gud_radtrans_kmax") {
        builder
            .load_str(
                "[GUD_RADTRANS_PARAMS]
gud_radtrans_kmax = 15
gud_waveband_edges = [400.0, 450.0, 500.0, 550.0, 600.0]
gud_waveband_centers = [425.0, 475.0, 525.0, 575.0]
",
            )
            .unwrap();
    }
    builder
        .derive("kMinFeSed", gud_core::value::ParameterValue::Integer(0))
        .unwrap();
    builder
        .derive("kMaxFeSed", gud_core::value::ParameterValue::Integer(0))
        .unwrap();
    builder.finish().unwrap()
}

#[test]
fn carbon_constants_follow_the_flag() {
    let off = seal(declare(FeatureSet::new()));
    let carbon_names: Vec<&str> = off
        .names()
        .filter(|name| CARBON_CONSTANTS.contains(name))
        .collect();
    assert!(carbon_names.is_empty());
    assert!(!off.has_group("CARBON_CONSTANTS"));
    for name in CARBON_CONSTANTS {
        assert!(matches!(off.get(name), Err(GudError::NotFound(_))));
    }

    let on = seal(declare(FeatureSet::new().with(GUD_ALLOW_CARBON)));
    assert_eq!(
        on.group_parameters("CARBON_CONSTANTS").unwrap(),
        CARBON_CONSTANTS.to_vec()
    );
    for name in CARBON_CONSTANTS {
        assert!(on.get_real(name).is_ok(), "{name} is not resolvable");
    }
}

#[test]
fn names_are_unique_for_every_feature_combination() {
    let flags: Vec<FeatureFlag> = [GUD_ALLOW_CARBON, GUD_ALLOW_RADTRANS, GUD_ALLOW_CDOM]
        .into_iter()
        .map(FeatureFlag::from)
        .collect();

    let combinations = FeatureSet::combinations(&flags);
    assert_eq!(combinations.len(), 8);
    for features in combinations {
        let registry = seal(declare(features.clone()));
        let names: HashSet<&str> = registry.names().collect();
        assert_eq!(names.len(), registry.len(), "duplicates under {features}");
    }
}

#[test]
fn disabled_groups_leave_no_references() {
    let registry = seal(declare(FeatureSet::new().with(GUD_ALLOW_CARBON)));

    assert!(!registry.has_group("GUD_RADTRANS_PARAMS"));
    assert!(!registry.has_group("GUD_CDOM_PARAMS"));
    assert!(matches!(
        registry.group_parameters("GUD_CDOM_PARAMS"),
        Err(GudError::UnknownGroup(_))
    ));
    for name in ["gud_waveband_edges", "gud_allomSpectra", "fracCDOM", "CDOMcoeff"] {
        assert!(matches!(registry.get(name), Err(GudError::NotFound(_))));
    }

    // The carbon run inside GUD_PARAMS follows its own flag
    assert!(registry.get_real("gud_atmos_pCO2").is_ok());
    let without = seal(declare(FeatureSet::new()));
    assert!(without.has_group("GUD_PARAMS"));
    assert!(matches!(without.get("surfDICMax"), Err(GudError::NotFound(_))));
}

#[test]
fn waveband_arrays_match_nlam() {
    let registry = seal(declare(FeatureSet::new().with(GUD_ALLOW_RADTRANS)));

    assert_eq!(registry.get_real_array("gud_waveband_edges").unwrap().len(), 5);
    assert_eq!(registry.get_real_array("gud_waveband_centers").unwrap().len(), 4);
    for name in ["gud_scatSwitchSizeLog", "gud_scatSlopeSmall", "gud_scatSlopeLarge"] {
        assert_eq!(registry.get_real_array(name).unwrap(), &[0.0; 4]);
    }

    // Arrays sized for another band count are rejected
    let mut builder = declare(FeatureSet::new().with(GUD_ALLOW_RADTRANS));
    let result = builder.load_str("[GUD_RADTRANS_PARAMS]\ngud_waveband_centers = [400.0, 500.0]\n");
    assert!(matches!(
        result,
        Err(GudError::DimensionMismatch { expected: 4, found: 2, .. })
    ));
}

#[test]
fn compiled_features_build_typed_parameters() {
    let registry = seal(declare(compiled_features()));
    let parameters = gud::GudParameters::from_registry(&registry).unwrap();

    assert_eq!(parameters.params.gud_seed, 56);
    #[cfg(feature = "carbon")]
    assert_eq!(parameters.carbon.sca[0], 2073.1);
    #[cfg(feature = "radtrans")]
    assert_eq!(parameters.radtrans.kmax, 15);
}

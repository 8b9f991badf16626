#![cfg(all(feature = "carbon", feature = "radtrans", feature = "cdom"))]

use approx::assert_relative_eq;
use gud::parameters::VerticalGrid;
use gud::ParameterLoader;
use gud_core::registry::ValueSource;
use std::path::PathBuf;

fn sample_file() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("data/data_gud.toml")
}

#[test]
fn sample_values_load() {
    let parameters = ParameterLoader::new()
        .with_values_file(sample_file())
        .with_grid(VerticalGrid::from_thicknesses(&[50.0; 40]).unwrap())
        .build_parameters()
        .unwrap();

    assert!(parameters.params.read_phos);
    assert_eq!(parameters.radtrans.nlam(), 13);
    assert_eq!(parameters.radtrans.waveband_edges.len(), 14);
    assert_eq!(parameters.radtrans.waveband_widths(), vec![25.0; 13]);
    assert_eq!(parameters.radtrans.kmax, 20);
    assert_eq!(
        parameters.radtrans.water_absorb_file,
        "input/gud_water_abs.dat"
    );
    assert_eq!(parameters.dependent.fe_sed_levels(), 0..20);
    assert_relative_eq!(parameters.carbon_params.atmos_pco2, 278e-6);
}

#[test]
fn dump_reloads_to_the_same_values() {
    let registry = ParameterLoader::new()
        .with_values_file(sample_file())
        .build()
        .unwrap();
    assert_eq!(
        registry.source("gud_waveband_centers").unwrap(),
        ValueSource::Loaded
    );

    let dump = registry.to_values_toml().unwrap();
    let reloaded = ParameterLoader::new().with_values_str(&dump).build().unwrap();

    for (name, value) in registry.iter() {
        assert_eq!(reloaded.get(name).unwrap(), value, "{name} changed");
    }
}

#[test]
fn sample_values_need_thirteen_bands() {
    let result = ParameterLoader::new()
        .with_sizes(gud::table::GudSize { nlam: 12 })
        .with_values_file(sample_file())
        .build();

    assert!(matches!(
        result,
        Err(gud::GudError::DimensionMismatch { name, .. }) if name.starts_with("gud_waveband_")
    ));
}

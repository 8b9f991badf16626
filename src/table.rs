//! The gud parameter description table and sizing constants.

use gud_core::errors::GudResult;
use gud_core::sizes::SizeConstants;
use gud_core::table::DescriptionTable;
use serde::{Deserialize, Serialize};

/// Source of the embedded description table
pub const GUD_TABLE_TOML: &str = include_str!("../data/gud_params.toml");

/// Parse the embedded description table.
pub fn gud_table() -> GudResult<DescriptionTable> {
    DescriptionTable::from_toml_str(GUD_TABLE_TOML)
}

/// Sizing constants of the package, normally set in `GUD_SIZE.h`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GudSize {
    /// Number of wavebands of the light model.
    /// default: 13
    pub nlam: usize,
}

impl Default for GudSize {
    fn default() -> Self {
        Self { nlam: 13 }
    }
}

impl From<GudSize> for SizeConstants {
    fn from(value: GudSize) -> Self {
        SizeConstants::new().with("nlam", value.nlam)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::{GUD_ALLOW_CARBON, GUD_ALLOW_CDOM, GUD_ALLOW_RADTRANS};
    use gud_core::features::{FeatureFlag, FeatureSet};
    use gud_core::value::ParameterKind;

    #[test]
    fn test_embedded_table_is_valid() {
        let table = gud_table().unwrap();
        table.validate().unwrap();

        assert_eq!(table.package, "gud");
        assert_eq!(table.header.as_deref(), Some("GUD_GENPARAMS.h"));
        assert_eq!(table.requires, vec!["GUD_SIZE.h".to_string()]);
    }

    #[test]
    fn test_group_order() {
        let table = gud_table().unwrap();
        let names: Vec<&str> = table.groups.iter().map(|g| g.name.as_str()).collect();
        assert_eq!(
            names,
            vec![
                "GUD_CONSTANTS",
                "CARBON_CONSTANTS",
                "GUD_PARAMS",
                "GUD_RADTRANS_PARAMS",
                "GUD_CDOM_PARAMS",
                "GUD_DEPENDENT_PARAMS",
            ]
        );
        assert!(table.get_group("GUD_DEPENDENT_PARAMS").unwrap().derived);
    }

    #[test]
    fn test_feature_flags() {
        let flags = gud_table().unwrap().feature_flags();
        let expected: std::collections::BTreeSet<FeatureFlag> =
            [GUD_ALLOW_CARBON, GUD_ALLOW_CDOM, GUD_ALLOW_RADTRANS]
                .into_iter()
                .map(FeatureFlag::from)
                .collect();
        assert_eq!(flags, expected);
    }

    #[test]
    fn test_carbon_constants() {
        let table = gud_table().unwrap();
        let group = table.get_group("CARBON_CONSTANTS").unwrap();
        assert_eq!(group.parameters.len(), 21);
        assert!(group
            .parameters
            .iter()
            .all(|p| p.kind == ParameterKind::Real && p.default.is_some()));

        // The carbon-gated run inside GUD_PARAMS
        let params = table.get_group("GUD_PARAMS").unwrap();
        let gated = params
            .parameters
            .iter()
            .filter(|p| p.enabled_if == Some(GUD_ALLOW_CARBON.into()))
            .count();
        assert_eq!(gated, 28);
    }

    #[test]
    fn test_enabled_without_optional_features() {
        let table = gud_table().unwrap();
        let names: Vec<&str> = table
            .enabled(&FeatureSet::new())
            .map(|(_, p)| p.name.as_str())
            .collect();

        assert!(names.contains(&"rad2deg"));
        assert!(names.contains(&"kMaxFeSed"));
        assert!(!names.contains(&"Pa2Atm"));
        assert!(!names.contains(&"gud_atmos_pCO2"));
        assert!(!names.contains(&"gud_waveband_edges"));
        assert!(!names.contains(&"fracCDOM"));
    }

    #[test]
    fn test_size_constants() {
        let sizes: SizeConstants = GudSize::default().into();
        assert_eq!(sizes.get("nlam"), Some(13));

        let sizes: SizeConstants = GudSize { nlam: 5 }.into();
        assert_eq!(sizes.get("nlam"), Some(5));
    }
}

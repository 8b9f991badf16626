//! Feature flags of the gud package.
//!
//! The flag names are the preprocessor switches used by the host model. The
//! Cargo features of this crate decide which of them are compiled in.

use gud_core::features::FeatureSet;

/// Enables the package as a whole; guards the generated header
pub const ALLOW_GUD: &str = "ALLOW_GUD";
/// Carbonate chemistry and air-sea gas exchange
pub const GUD_ALLOW_CARBON: &str = "GUD_ALLOW_CARBON";
/// Spectral radiative transfer
pub const GUD_ALLOW_RADTRANS: &str = "GUD_ALLOW_RADTRANS";
/// Coloured dissolved organic matter
pub const GUD_ALLOW_CDOM: &str = "GUD_ALLOW_CDOM";

/// The flags enabled by the Cargo features of this build.
pub fn compiled_features() -> FeatureSet {
    let mut features = FeatureSet::new().with(ALLOW_GUD);
    if cfg!(feature = "carbon") {
        features.enable(GUD_ALLOW_CARBON);
    }
    if cfg!(feature = "radtrans") {
        features.enable(GUD_ALLOW_RADTRANS);
    }
    if cfg!(feature = "cdom") {
        features.enable(GUD_ALLOW_CDOM);
    }
    features
}

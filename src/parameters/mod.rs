//! Typed gud parameters.
//!
//! [`GudParameters`] is the configuration handed to every computation unit of
//! the package. It is read once from a sealed
//! [`ParameterRegistry`](gud_core::registry::ParameterRegistry) and is plain
//! data afterwards; share it by reference or behind an `Arc`.
//!
//! Groups tied to an optional feature are fields only when the matching
//! Cargo feature is on, so code using them without the feature does not
//! compile.

#[cfg(feature = "carbon")]
mod carbon;
#[cfg(feature = "cdom")]
mod cdom;
mod constants;
mod dependent;
mod ecosystem;
#[cfg(feature = "radtrans")]
mod radtrans;

#[cfg(feature = "carbon")]
pub use carbon::{Bounds, CarbonConstants, CarbonParams, SurfaceBounds};
#[cfg(feature = "cdom")]
pub use cdom::CdomParams;
pub use constants::GudConstants;
pub use dependent::{DependentParams, VerticalGrid};
pub use ecosystem::GudParams;
#[cfg(feature = "radtrans")]
pub use radtrans::RadtransParams;

use gud_core::errors::GudResult;
use gud_core::registry::ParameterRegistry;
use serde::{Deserialize, Serialize};

/// Read a typed parameter group out of a registry.
pub trait FromRegistry: Sized {
    /// Fails with `NotFound` if the registry was loaded without the group.
    fn from_registry(registry: &ParameterRegistry) -> GudResult<Self>;
}

/// All run-time parameters of the package.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GudParameters {
    pub constants: GudConstants,
    #[cfg(feature = "carbon")]
    pub carbon: CarbonConstants,
    pub params: GudParams,
    /// Members of `GUD_PARAMS` that only exist with carbon chemistry
    #[cfg(feature = "carbon")]
    pub carbon_params: CarbonParams,
    #[cfg(feature = "radtrans")]
    pub radtrans: RadtransParams,
    #[cfg(feature = "cdom")]
    pub cdom: CdomParams,
    pub dependent: DependentParams,
}

impl FromRegistry for GudParameters {
    fn from_registry(registry: &ParameterRegistry) -> GudResult<Self> {
        Ok(Self {
            constants: GudConstants::from_registry(registry)?,
            #[cfg(feature = "carbon")]
            carbon: CarbonConstants::from_registry(registry)?,
            params: GudParams::from_registry(registry)?,
            #[cfg(feature = "carbon")]
            carbon_params: CarbonParams::from_registry(registry)?,
            #[cfg(feature = "radtrans")]
            radtrans: RadtransParams::from_registry(registry)?,
            #[cfg(feature = "cdom")]
            cdom: CdomParams::from_registry(registry)?,
            dependent: DependentParams::from_registry(registry)?,
        })
    }
}

impl GudParameters {
    /// Read every group compiled into this build.
    pub fn from_registry(registry: &ParameterRegistry) -> GudResult<Self> {
        <Self as FromRegistry>::from_registry(registry)
    }
}

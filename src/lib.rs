//! Run-time parameters of the gud marine ecosystem package.
//!
//! The parameters are described once, in the embedded table
//! (`data/gud_params.toml`). From it this crate
//!
//! - loads a [`ParameterRegistry`](gud_core::registry::ParameterRegistry) for
//!   the feature flags compiled into this build, applying a values file and
//!   deriving the dependent parameters ([`ParameterLoader`]),
//! - converts the registry into [`GudParameters`], a plain configuration
//!   struct handed by reference to every computation unit.
//!
//! The optional parameter groups follow the Cargo features `carbon`,
//! `radtrans` and `cdom`. With a feature off, its group is missing from both
//! the registry and the [`GudParameters`] type.
//!
//! ```
//! # #[cfg(all(feature = "carbon", feature = "radtrans", feature = "cdom"))]
//! # {
//! use gud::ParameterLoader;
//!
//! let parameters = ParameterLoader::new()
//!     .with_values_str(include_str!("../data/data_gud.toml"))
//!     .build_parameters()
//!     .unwrap();
//! assert_eq!(parameters.params.gud_seed, 56);
//! # }
//! ```

pub mod features;
pub mod loader;
pub mod parameters;
pub mod table;

pub use gud_core::errors::{GudError, GudResult};
pub use gud_core::FloatValue;
pub use loader::ParameterLoader;
pub use parameters::GudParameters;

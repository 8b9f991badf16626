//! Core types for declaring, loading and generating model run-time parameters.
//!
//! A package describes its parameters once, in a [`DescriptionTable`](table::DescriptionTable).
//! From that table this crate can
//!
//! - build a [`RegistryBuilder`](registry::RegistryBuilder) for the load phase, where
//!   values are assigned exactly once and dependent parameters are derived,
//! - seal it into a read-only [`ParameterRegistry`](registry::ParameterRegistry)
//!   that computation units share by reference,
//! - render the matching declaration header with an embedded checksum
//!   (see [`codegen`]).
//!
//! Groups and parameters can be tied to a [`FeatureFlag`](features::FeatureFlag).
//! When the flag is off they are absent from the registry, not zero-valued,
//! so reading them is an error rather than a silent default.

pub mod codegen;
pub mod errors;
pub mod features;
pub mod registry;
pub mod sizes;
pub mod table;
pub mod value;

pub use sizes::FloatValue;

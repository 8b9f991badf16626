//! Loading the gud parameters for one run.
//!
//! [`ParameterLoader`] drives the whole load phase:
//!
//! 1. declare every group and parameter of the description table enabled by
//!    the selected feature flags,
//! 2. apply the values files in the order they were added,
//! 3. derive the dependent parameters from the loaded values and the
//!    vertical grid,
//! 4. seal the result into a read-only registry.

use crate::features::compiled_features;
use crate::parameters::{DependentParams, GudParameters, VerticalGrid};
use crate::table::{gud_table, GudSize};
use gud_core::errors::{GudError, GudResult};
use gud_core::features::FeatureSet;
use gud_core::registry::{ParameterRegistry, RegistryBuilder};
use gud_core::table::DescriptionTable;
use log::warn;
use std::path::PathBuf;

#[derive(Debug, Clone)]
enum ValuesSource {
    Text(String),
    File(PathBuf),
}

/// Build the parameter registry of a run.
///
/// # Examples
///
/// ```
/// use gud::parameters::VerticalGrid;
/// use gud::table::GudSize;
/// use gud::ParameterLoader;
/// use gud_core::features::FeatureSet;
///
/// let registry = ParameterLoader::new()
///     .with_features(FeatureSet::new())
///     .with_sizes(GudSize { nlam: 3 })
///     .with_values_str("[GUD_PARAMS]\ndepthfesed = 500.0\n")
///     .with_grid(VerticalGrid::from_thicknesses(&[100.0; 10]).unwrap())
///     .build()
///     .unwrap();
///
/// assert_eq!(registry.get_real("depthfesed").unwrap(), 500.0);
/// assert_eq!(registry.get_integer("kMaxFeSed").unwrap(), 5);
/// assert!(!registry.contains("Pa2Atm"));
/// ```
#[derive(Debug, Clone)]
pub struct ParameterLoader {
    table: Option<DescriptionTable>,
    features: FeatureSet,
    sizes: GudSize,
    values: Vec<ValuesSource>,
    grid: Option<VerticalGrid>,
}

impl Default for ParameterLoader {
    fn default() -> Self {
        Self::new()
    }
}

impl ParameterLoader {
    /// Loader for the embedded table with the features compiled into this build
    pub fn new() -> Self {
        Self {
            table: None,
            features: compiled_features(),
            sizes: GudSize::default(),
            values: vec![],
            grid: None,
        }
    }

    /// Use a description table other than the embedded one
    pub fn with_table(&mut self, table: DescriptionTable) -> &mut Self {
        self.table = Some(table);
        self
    }

    /// Select the enabled feature flags
    ///
    /// [`build_parameters`](Self::build_parameters) needs at least the
    /// flags compiled into this build.
    pub fn with_features(&mut self, features: FeatureSet) -> &mut Self {
        self.features = features;
        self
    }

    pub fn with_sizes(&mut self, sizes: GudSize) -> &mut Self {
        self.sizes = sizes;
        self
    }

    /// Add values in the values file format
    pub fn with_values_str(&mut self, text: &str) -> &mut Self {
        self.values.push(ValuesSource::Text(text.to_string()));
        self
    }

    /// Add a values file, read when the registry is built
    pub fn with_values_file(&mut self, path: impl Into<PathBuf>) -> &mut Self {
        self.values.push(ValuesSource::File(path.into()));
        self
    }

    /// Set the vertical grid used to derive the dependent parameters
    pub fn with_grid(&mut self, grid: VerticalGrid) -> &mut Self {
        self.grid = Some(grid);
        self
    }

    /// Run the load phase and seal the registry.
    pub fn build(&self) -> GudResult<ParameterRegistry> {
        let table = match &self.table {
            Some(table) => table.clone(),
            None => gud_table()?,
        };
        let mut builder =
            RegistryBuilder::from_table(&table, self.features.clone(), self.sizes.into())?;

        for source in &self.values {
            match source {
                ValuesSource::Text(text) => builder.load_str(text)?,
                ValuesSource::File(path) => builder.load_file(path)?,
            }
        }

        if builder.contains("kMinFeSed") {
            self.derive(&mut builder)?;
        }
        builder.finish()
    }

    fn derive(&self, builder: &mut RegistryBuilder) -> GudResult<()> {
        let value = builder.get("depthfesed")?;
        let depthfesed = value.as_real().ok_or_else(|| GudError::TypeMismatch {
            name: "depthfesed".to_string(),
            expected: "real".to_string(),
            found: value.type_name().to_string(),
        })?;

        let dependent = match &self.grid {
            Some(grid) => DependentParams::compute(depthfesed, grid),
            None => {
                warn!("No vertical grid given, sediment iron flux is applied to no level");
                DependentParams::default()
            }
        };
        dependent.derive_into(builder)
    }

    /// Run the load phase and read the typed parameters.
    pub fn build_parameters(&self) -> GudResult<GudParameters> {
        GudParameters::from_registry(&self.build()?)
    }
}

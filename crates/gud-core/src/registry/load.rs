//! Values files.
//!
//! A values file assigns parameters group by group, one TOML table per group:
//!
//! ```toml
//! [GUD_PARAMS]
//! phymin = 1e-20
//! gud_read_phos = true
//!
//! [GUD_RADTRANS_PARAMS]
//! gud_waveband_centers = [400.0, 425.0, 450.0]
//! ```

use log::debug;
use std::path::Path;

use super::RegistryBuilder;
use crate::errors::{GudError, GudResult};
use crate::value::ParameterValue;

impl RegistryBuilder {
    /// Assign parameters from the text of a values file.
    ///
    /// Every table must name a declared group and every key a parameter of
    /// that group which is enabled under the builder's features.
    pub fn load_str(&mut self, text: &str) -> GudResult<()> {
        let file: toml::Table = toml::from_str(text)?;

        let mut count = 0;
        for (group_name, values) in &file {
            let group_idx = self.group_index(group_name)?;
            let values = values.as_table().ok_or_else(|| {
                GudError::Error(format!(
                    "Expected a table of values for group '{group_name}', got {}",
                    values.type_str()
                ))
            })?;

            for (name, raw) in values {
                let idx = self.slot_index(name)?;
                let slot = &self.slots[idx];
                if slot.group != group_idx {
                    return Err(GudError::WrongGroup {
                        name: name.clone(),
                        group: group_name.clone(),
                        actual: self.groups[slot.group].name.clone(),
                    });
                }
                let value = ParameterValue::from_toml(name, slot.definition.kind, slot.shape, raw)?;
                self.set(name, value)?;
                count += 1;
            }
        }

        debug!("Loaded {count} parameter values");
        Ok(())
    }

    /// Assign parameters from a values file on disk.
    pub fn load_file(&mut self, path: impl AsRef<Path>) -> GudResult<()> {
        let path = path.as_ref();
        debug!("Reading parameter values from {}", path.display());
        let text = std::fs::read_to_string(path)?;
        self.load_str(&text)
    }
}

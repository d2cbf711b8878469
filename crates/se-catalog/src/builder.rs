//! Validating catalog builder.

use se_core::{ModelKey, SubStageKey};

use crate::catalog::Catalog;
use crate::error::CatalogResult;
use crate::schema::{CatalogDef, SubStageDef};
use crate::substage::{SubStage, SubStageModel};
use crate::validate;

/// Builder for constructing a catalog.
///
/// Add substage definitions in display order, then call `build()` to
/// validate and freeze them into an immutable `Catalog`.
#[derive(Debug, Default)]
pub struct CatalogBuilder {
    defs: Vec<SubStageDef>,
}

impl CatalogBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_def(def: CatalogDef) -> Self {
        Self {
            defs: def.substages,
        }
    }

    /// Append a substage and return the key it will have in the catalog.
    pub fn add_substage(&mut self, def: SubStageDef) -> SubStageKey {
        let key = SubStageKey::from_index(self.defs.len() as u32);
        self.defs.push(def);
        key
    }

    /// Validate and freeze.
    ///
    /// Assigns substage and model keys and builds the model -> owner table.
    pub fn build(self) -> CatalogResult<Catalog> {
        validate::validate_defs(&self.defs)?;

        let mut substages = Vec::with_capacity(self.defs.len());
        let mut model_owners = Vec::new();

        for (i, def) in self.defs.into_iter().enumerate() {
            let key = SubStageKey::from_index(i as u32);
            let models = def
                .models
                .into_iter()
                .map(|m| {
                    let model_key = ModelKey::from_index(model_owners.len() as u32);
                    model_owners.push(key);
                    SubStageModel {
                        key: model_key,
                        mass: m.mass,
                        model_example: m.model_example,
                        is_default: m.is_default,
                        model_start: m.model_start,
                        model_end: m.model_end,
                    }
                })
                .collect();

            substages.push(SubStage {
                key,
                id: def.id,
                parent_stage: def.parent_stage,
                mass_min: def.mass_min,
                mass_max: def.mass_max,
                models,
                text: def.text,
                history_plot_label: def.history_plot_label,
                history_plot_color: def.history_plot_color,
            });
        }

        Ok(Catalog::from_parts(substages, model_owners))
    }
}

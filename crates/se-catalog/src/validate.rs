//! Catalog validation logic.

use std::collections::HashSet;

use crate::error::{CatalogError, CatalogResult};
use crate::schema::{SubStageDef, SubStageModelDef};

/// Validate every substage definition; the first violation wins.
pub(crate) fn validate_defs(defs: &[SubStageDef]) -> CatalogResult<()> {
    let mut ids = HashSet::new();
    for def in defs {
        if !ids.insert(def.id.as_str()) {
            return Err(CatalogError::DuplicateId { id: def.id.clone() });
        }
        validate_substage(def)?;
    }
    Ok(())
}

fn validate_substage(def: &SubStageDef) -> CatalogResult<()> {
    if !def.mass_min.is_finite() {
        return Err(CatalogError::NonFinite {
            id: def.id.clone(),
            what: "mass_min",
        });
    }
    if !def.mass_max.is_finite() {
        return Err(CatalogError::NonFinite {
            id: def.id.clone(),
            what: "mass_max",
        });
    }
    if def.mass_min >= def.mass_max {
        return Err(CatalogError::InvalidMassInterval {
            id: def.id.clone(),
            mass_min: def.mass_min,
            mass_max: def.mass_max,
        });
    }

    for model in &def.models {
        validate_model(def, model)?;
    }

    let defaults = def.models.iter().filter(|m| m.is_default).count();
    if defaults > 1 {
        return Err(CatalogError::MultipleDefaults {
            id: def.id.clone(),
            count: defaults,
        });
    }

    Ok(())
}

fn validate_model(def: &SubStageDef, model: &SubStageModelDef) -> CatalogResult<()> {
    if !model.mass.is_finite() {
        return Err(CatalogError::NonFinite {
            id: def.id.clone(),
            what: "model mass",
        });
    }
    if model.mass < def.mass_min || model.mass > def.mass_max {
        return Err(CatalogError::ModelOutsideInterval {
            id: def.id.clone(),
            mass: model.mass,
            mass_min: def.mass_min,
            mass_max: def.mass_max,
        });
    }

    let bounds_error = |reason| CatalogError::ModelStepBounds {
        id: def.id.clone(),
        mass: model.mass,
        reason,
    };
    if let (Some(start), Some(end)) = (model.model_start, model.model_end)
        && start > end
    {
        return Err(bounds_error("start after end"));
    }
    if let Some(start) = model.model_start
        && model.model_example < start
    {
        return Err(bounds_error("example before start"));
    }
    if let Some(end) = model.model_end
        && model.model_example > end
    {
        return Err(bounds_error("example after end"));
    }

    Ok(())
}

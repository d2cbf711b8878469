//! The immutable substage catalog and its read API.

use se_core::{ModelKey, Real, SubStageKey};
use std::path::Path;

use crate::builder::CatalogBuilder;
use crate::error::CatalogResult;
use crate::mass_range::MassRange;
use crate::schema::{CatalogDef, SubStageDef, SubStageModelDef};
use crate::stage::ParentStage;
use crate::substage::{SubStage, SubStageModel};

const REFERENCE_CATALOG_YAML: &str = include_str!("../data/reference_catalog.yaml");

/// Ordered, validated set of substages.
///
/// Constructed once through `CatalogBuilder`; there are no mutation
/// operations afterwards.
#[derive(Debug, Clone)]
pub struct Catalog {
    substages: Vec<SubStage>,
    /// Owning substage for each model, indexed by `ModelKey`.
    model_owners: Vec<SubStageKey>,
}

impl Catalog {
    pub(crate) fn from_parts(substages: Vec<SubStage>, model_owners: Vec<SubStageKey>) -> Self {
        Self {
            substages,
            model_owners,
        }
    }

    /// The reference catalog shipped with the crate.
    pub fn builtin() -> CatalogResult<Self> {
        Self::from_yaml_str(REFERENCE_CATALOG_YAML)
    }

    pub fn from_def(def: CatalogDef) -> CatalogResult<Self> {
        CatalogBuilder::from_def(def).build()
    }

    pub fn from_yaml_str(yaml: &str) -> CatalogResult<Self> {
        let def: CatalogDef = serde_yaml::from_str(yaml)?;
        Self::from_def(def)
    }

    pub fn load_yaml(path: &Path) -> CatalogResult<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml_str(&content)
    }

    /// Serializable form, e.g. for writing a catalog file.
    pub fn to_def(&self) -> CatalogDef {
        CatalogDef {
            substages: self
                .substages
                .iter()
                .map(|s| SubStageDef {
                    id: s.id.clone(),
                    parent_stage: s.parent_stage,
                    mass_min: s.mass_min,
                    mass_max: s.mass_max,
                    models: s
                        .models
                        .iter()
                        .map(|m| SubStageModelDef {
                            mass: m.mass,
                            model_example: m.model_example,
                            is_default: m.is_default,
                            model_start: m.model_start,
                            model_end: m.model_end,
                        })
                        .collect(),
                    text: s.text.clone(),
                    history_plot_label: s.history_plot_label.clone(),
                    history_plot_color: s.history_plot_color.clone(),
                })
                .collect(),
        }
    }

    pub fn substages(&self) -> &[SubStage] {
        &self.substages
    }

    pub fn len(&self) -> usize {
        self.substages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.substages.is_empty()
    }

    pub fn substage(&self, key: SubStageKey) -> Option<&SubStage> {
        self.substages.get(key.slot())
    }

    /// Look up a substage by its string id.
    pub fn get(&self, id: &str) -> Option<&SubStage> {
        self.substages.iter().find(|s| s.id == id)
    }

    /// All example models, in catalog order.
    pub fn models(&self) -> impl Iterator<Item = &SubStageModel> {
        self.substages.iter().flat_map(|s| s.models.iter())
    }

    pub fn model(&self, key: ModelKey) -> Option<&SubStageModel> {
        let owner = self.substage(*self.model_owners.get(key.slot())?)?;
        owner.models.iter().find(|m| m.key == key)
    }

    /// Recover the substage a bare model belongs to (colour, labels, ...).
    ///
    /// Returns `None` for a model that did not come from this catalog.
    pub fn owner_of(&self, model: &SubStageModel) -> Option<&SubStage> {
        let owner = self.substage(*self.model_owners.get(model.key.slot())?)?;
        owner.models.iter().any(|m| m == model).then_some(owner)
    }

    pub fn filter<P>(&self, predicate: P) -> Vec<&SubStage>
    where
        P: Fn(&SubStage) -> bool,
    {
        self.substages.iter().filter(|s| predicate(s)).collect()
    }

    /// Substages whose mass interval intersects `range` (half-open test).
    pub fn filter_by_mass_range(&self, range: &MassRange) -> Vec<&SubStage> {
        self.filter(|s| s.overlaps(range))
    }

    /// Substages owned by `stage`.
    pub fn filter_by_stage(&self, stage: ParentStage) -> Vec<&SubStage> {
        self.filter(|s| s.parent_stage == stage)
    }

    /// Sorted, de-duplicated substage interval bounds.
    pub fn boundary_masses(&self) -> Vec<Real> {
        let mut masses: Vec<Real> = self
            .substages
            .iter()
            .flat_map(|s| [s.mass_min, s.mass_max])
            .collect();
        masses.sort_by(|a, b| a.total_cmp(b));
        masses.dedup();
        masses
    }

    /// Consecutive boundary pairs; the mass ranges a user can pick from.
    pub fn mass_range_options(&self) -> Vec<MassRange> {
        self.boundary_masses()
            .windows(2)
            .filter_map(|pair| MassRange::new(pair[0], pair[1]).ok())
            .collect()
    }

    /// Unique example masses in order of first appearance.
    pub fn model_masses(&self) -> Vec<Real> {
        let mut masses: Vec<Real> = Vec::new();
        for model in self.models() {
            if !masses.contains(&model.mass) {
                masses.push(model.mass);
            }
        }
        masses
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn builtin() -> Catalog {
        Catalog::builtin().expect("reference catalog is valid")
    }

    #[test]
    fn builtin_has_reference_substages() {
        let catalog = builtin();
        let ids: Vec<&str> = catalog.substages().iter().map(|s| s.id.as_str()).collect();
        assert_eq!(
            ids,
            [
                "hayashi",
                "henyey",
                "low_ms",
                "med_ms",
                "hi_ms",
                "subgiant",
                "hertzsprung_gap",
                "red_giant",
                "he_flash",
                "he_stable",
                "he_ms",
                "agb",
                "he_wd",
                "co_wd",
            ]
        );
    }

    #[test]
    fn builtin_defaults() {
        let catalog = builtin();
        let med_ms = catalog.get("med_ms").unwrap();
        let default: Vec<_> = med_ms.models.iter().filter(|m| m.is_default).collect();
        assert_eq!(default.len(), 1);
        assert_eq!(default[0].mass, 1.0);
        assert_eq!(default[0].model_example.get(), 296);
        assert_eq!(default[0].model_start.map(|s| s.get()), Some(1));
        assert_eq!(default[0].model_end.map(|s| s.get()), Some(300));
    }

    #[test]
    fn extent_needs_both_bounds() {
        let catalog = builtin();
        let with_extent: Vec<_> = catalog
            .models()
            .filter_map(|m| m.extent().map(|(start, end)| (m.mass, start.get(), end.get())))
            .collect();
        assert_eq!(with_extent, [(1.0, 1, 300)]);

        let mut model = catalog.get("med_ms").unwrap().models[1].clone();
        model.model_end = None;
        assert_eq!(model.extent(), None);
    }

    #[test]
    fn owner_of_recovers_substage() {
        let catalog = builtin();
        for substage in catalog.substages() {
            for model in &substage.models {
                let owner = catalog.owner_of(model).unwrap();
                assert_eq!(owner.id, substage.id);
                assert_eq!(catalog.model(model.key()), Some(model));
            }
        }
    }

    #[test]
    fn owner_of_rejects_foreign_model() {
        let catalog = builtin();
        let mut foreign = catalog.get("red_giant").unwrap().models[0].clone();
        foreign.mass = 42.0;
        assert!(catalog.owner_of(&foreign).is_none());
    }

    #[test]
    fn stage_filter_uses_identity() {
        let catalog = builtin();
        let ids: Vec<&str> = catalog
            .filter_by_stage(ParentStage::HeliumIgnition)
            .iter()
            .map(|s| s.id.as_str())
            .collect();
        assert_eq!(ids, ["he_flash", "he_stable"]);
        assert!(catalog.filter_by_stage(ParentStage::Henyey).len() == 1);
    }

    #[test]
    fn mass_filter_excludes_touching_substages() {
        let catalog = builtin();
        let range = MassRange::new(1.5, 2.0).unwrap();
        let ids: Vec<&str> = catalog
            .filter_by_mass_range(&range)
            .iter()
            .map(|s| s.id.as_str())
            .collect();
        assert!(!ids.contains(&"med_ms"));
        assert!(ids.contains(&"hi_ms"));
        assert!(ids.contains(&"he_stable"));
        assert!(!ids.contains(&"he_flash"));
    }

    #[test]
    fn mass_range_options_follow_boundaries() {
        let catalog = builtin();
        assert_eq!(catalog.boundary_masses(), [0.1, 0.3, 0.8, 1.5, 2.0, 6.0]);
        let labels: Vec<String> = catalog
            .mass_range_options()
            .iter()
            .map(|r| r.to_string())
            .collect();
        assert_eq!(labels, ["0.1-0.3", "0.3-0.8", "0.8-1.5", "1.5-2.0", "2.0-6.0"]);
    }

    #[test]
    fn model_masses_are_unique() {
        let catalog = builtin();
        assert_eq!(catalog.model_masses(), [0.2, 0.5, 1.0, 3.0]);
    }

    proptest! {
        #[test]
        fn mass_filter_matches_definition(lo in 0.0_f64..7.0, width in 0.01_f64..7.0) {
            let catalog = builtin();
            let range = MassRange::new(lo, lo + width).unwrap();
            let hits = catalog.filter_by_mass_range(&range);
            for s in catalog.substages() {
                let expected = s.mass_max > lo && s.mass_min < lo + width;
                let found = hits.iter().any(|h| h.id == s.id);
                prop_assert_eq!(found, expected, "substage {}", s.id);
            }
        }
    }
}

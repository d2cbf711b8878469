//! Mode-dependent selection of a substage and its example model.
//!
//! A selection starts from a query (nothing, a mass range or a parent
//! stage), narrows the catalog to candidate substages, settles on one of
//! them and then picks the example model to display. The model is picked
//! differently per mode:
//!
//! - mass-first: the first model whose mass lies inside the queried range
//! - stage-first: the model flagged as default, else the first one

use se_catalog::{Catalog, MassRange, ParentStage, SubStage, SubStageModel};
use tracing::{debug, warn};

/// What the user has asked for.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SelectionQuery {
    /// No comparison mode chosen yet.
    NoSelection,
    /// Mode 1: pick a mass range, then a substage in it.
    MassFirst(MassRange),
    /// Mode 2: pick a parent stage, then one of its substages.
    StageFirst(ParentStage),
}

impl SelectionQuery {
    /// Numeric comparison mode as shown to users (0, 1 or 2).
    pub fn mode(&self) -> u8 {
        match self {
            SelectionQuery::NoSelection => 0,
            SelectionQuery::MassFirst(_) => 1,
            SelectionQuery::StageFirst(_) => 2,
        }
    }
}

/// Outcome of a selection.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Selection<'c> {
    /// Nothing to show: no mode, no candidates, or an unknown substage.
    NoSelection,
    /// A substage was chosen but has no model matching the query.
    NoModelAvailable { substage: &'c SubStage },
    Resolved {
        substage: &'c SubStage,
        model: &'c SubStageModel,
    },
}

impl<'c> Selection<'c> {
    pub fn substage(&self) -> Option<&'c SubStage> {
        match *self {
            Selection::NoSelection => None,
            Selection::NoModelAvailable { substage } | Selection::Resolved { substage, .. } => {
                Some(substage)
            }
        }
    }

    pub fn model(&self) -> Option<&'c SubStageModel> {
        match *self {
            Selection::Resolved { model, .. } => Some(model),
            _ => None,
        }
    }

    pub fn is_resolved(&self) -> bool {
        matches!(self, Selection::Resolved { .. })
    }
}

/// One entry in the list of candidate substages.
#[derive(Debug, Clone, PartialEq)]
pub struct SubStageTab<'c> {
    pub substage: &'c SubStage,
    pub label: String,
    pub description: String,
    pub color: Option<&'c str>,
}

/// Candidate substages for a query, in catalog order.
pub fn available_substages<'c>(catalog: &'c Catalog, query: &SelectionQuery) -> Vec<&'c SubStage> {
    match query {
        SelectionQuery::NoSelection => Vec::new(),
        SelectionQuery::MassFirst(range) => catalog.filter_by_mass_range(range),
        SelectionQuery::StageFirst(stage) => catalog.filter_by_stage(*stage),
    }
}

/// Candidate substages with the labels appropriate for the mode.
///
/// Stage-first labels carry the substage's mass range, since several
/// substages of one stage differ only in mass.
pub fn tabs<'c>(catalog: &'c Catalog, query: &SelectionQuery) -> Vec<SubStageTab<'c>> {
    available_substages(catalog, query)
        .into_iter()
        .map(|substage| {
            let (label, description) = match query {
                SelectionQuery::StageFirst(_) => (
                    substage.mode2_abbrev_with_massrange(),
                    substage.mode2_desc_with_massrange(),
                ),
                _ => (
                    substage.text.mode1_abbrev.clone(),
                    substage.text.mode1_desc.clone(),
                ),
            };
            SubStageTab {
                substage,
                label,
                description,
                color: substage.history_plot_color.as_deref(),
            }
        })
        .collect()
}

/// Settle on one candidate substage.
///
/// With no explicit choice the first candidate is used. An id that is not
/// among the candidates yields `None`.
pub fn choose_substage<'c>(
    catalog: &'c Catalog,
    query: &SelectionQuery,
    chosen: Option<&str>,
) -> Option<&'c SubStage> {
    let candidates = available_substages(catalog, query);
    match chosen {
        None => candidates.first().copied(),
        Some(id) => {
            let found = candidates.into_iter().find(|s| s.id == id);
            if found.is_none() {
                warn!(
                    substage = id,
                    mode = query.mode(),
                    "substage is not a candidate for this query"
                );
            }
            found
        }
    }
}

/// Mass-first model choice: first model, in catalog order, whose mass lies
/// in `range` (inclusive).
pub fn select_model_mass_first<'c>(
    substage: &'c SubStage,
    range: &MassRange,
) -> Option<&'c SubStageModel> {
    substage.models.iter().find(|m| range.contains(m.mass))
}

/// Stage-first model choice: the default model, else the first model.
pub fn select_model_stage_first(substage: &SubStage) -> Option<&SubStageModel> {
    substage
        .models
        .iter()
        .find(|m| m.is_default)
        .or_else(|| substage.models.first())
}

/// Pick the example model of a chosen substage.
pub fn resolve_model<'c>(query: &SelectionQuery, substage: &'c SubStage) -> Selection<'c> {
    let model = match query {
        SelectionQuery::NoSelection => return Selection::NoSelection,
        SelectionQuery::MassFirst(range) => select_model_mass_first(substage, range),
        SelectionQuery::StageFirst(_) => select_model_stage_first(substage),
    };
    match model {
        Some(model) => {
            debug!(
                substage = %substage.id,
                mass = model.mass,
                step = %model.model_example,
                "resolved example model"
            );
            Selection::Resolved { substage, model }
        }
        None => Selection::NoModelAvailable { substage },
    }
}

/// Full selection: narrow, choose a substage, pick its model.
pub fn select<'c>(
    catalog: &'c Catalog,
    query: &SelectionQuery,
    chosen: Option<&str>,
) -> Selection<'c> {
    match choose_substage(catalog, query, chosen) {
        Some(substage) => resolve_model(query, substage),
        None => Selection::NoSelection,
    }
}

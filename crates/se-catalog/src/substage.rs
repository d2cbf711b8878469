//! Runtime substage and example-model types.

use se_core::{ModelKey, Real, StepNumber, SubStageKey};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::mass_range::MassRange;
use crate::stage::ParentStage;

/// Display text for the two browsing orders.
///
/// Mode 1 is "pick a mass, compare phases"; mode 2 is "pick a phase,
/// compare masses".
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubStageText {
    /// Flowchart box text.
    pub plot_text: String,
    pub mode1_abbrev: String,
    pub mode1_desc: String,
    pub mode2_abbrev: String,
    pub mode2_desc: String,
}

/// One concrete example point for a substage.
///
/// The owning substage is not stored here; `Catalog::owner_of` resolves it
/// through the model's key.
#[derive(Debug, Clone, PartialEq)]
pub struct SubStageModel {
    pub(crate) key: ModelKey,
    pub mass: Real,
    pub model_example: StepNumber,
    pub is_default: bool,
    pub model_start: Option<StepNumber>,
    pub model_end: Option<StepNumber>,
}

impl SubStageModel {
    pub fn key(&self) -> ModelKey {
        self.key
    }

    /// First and last step of the example's extent in time, when both are
    /// known.
    pub fn extent(&self) -> Option<(StepNumber, StepNumber)> {
        self.model_start.zip(self.model_end)
    }
}

/// A mass-bounded refinement of one parent stage.
#[derive(Debug, Clone, PartialEq)]
pub struct SubStage {
    pub(crate) key: SubStageKey,
    pub id: String,
    pub parent_stage: ParentStage,
    pub mass_min: Real,
    pub mass_max: Real,
    pub models: Vec<SubStageModel>,
    pub text: SubStageText,
    pub history_plot_label: Option<String>,
    pub history_plot_color: Option<String>,
}

impl SubStage {
    pub fn key(&self) -> SubStageKey {
        self.key
    }

    pub fn overlaps(&self, range: &MassRange) -> bool {
        range.overlaps(self.mass_min, self.mass_max)
    }

    pub fn mode2_abbrev_with_massrange(&self) -> String {
        format!(
            "{:.1}-{:.1}: {}",
            self.mass_min, self.mass_max, self.text.mode2_abbrev
        )
    }

    pub fn mode2_desc_with_massrange(&self) -> String {
        format!(
            "{:.1}-{:.1}: {}",
            self.mass_min, self.mass_max, self.text.mode2_desc
        )
    }
}

impl fmt::Display for SubStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SubStage: {}", self.id)
    }
}

//! Catalog file format.
//!
//! These are the serialized definitions; `CatalogBuilder` validates them and
//! freezes them into a `Catalog`.

use se_core::{Real, StepNumber};
use serde::{Deserialize, Serialize};

use crate::stage::ParentStage;
use crate::substage::SubStageText;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogDef {
    #[serde(default)]
    pub substages: Vec<SubStageDef>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubStageDef {
    pub id: String,
    pub parent_stage: ParentStage,
    pub mass_min: Real,
    pub mass_max: Real,
    #[serde(default)]
    pub models: Vec<SubStageModelDef>,
    #[serde(flatten)]
    pub text: SubStageText,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub history_plot_label: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub history_plot_color: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubStageModelDef {
    pub mass: Real,
    pub model_example: StepNumber,
    #[serde(default)]
    pub is_default: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model_start: Option<StepNumber>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model_end: Option<StepNumber>,
}

//! Top-level evolutionary stages.
//!
//! `ParentStage` is a plain identity value; everything displayed about a
//! stage lives in the `PARENT_STAGES` table.

use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ParentStage {
    Hayashi,
    Henyey,
    MainSequence,
    PostMainSequence,
    RedGiantBranch,
    HeliumIgnition,
    HeliumMainSequence,
    AsymptoticGiantBranch,
    WhiteDwarf,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParentStageInfo {
    pub stage: ParentStage,
    /// Identifier used in catalog files and on the command line.
    pub key: &'static str,
    pub short_name: &'static str,
    pub full_name: &'static str,
    /// Column position in the stage flowchart. Layout only, not physics.
    pub ordinal: u8,
}

const PARENT_STAGES: [ParentStageInfo; 9] = [
    ParentStageInfo {
        stage: ParentStage::Hayashi,
        key: "hayashi",
        short_name: "Hayashi",
        full_name: "Hayashi track",
        ordinal: 0,
    },
    ParentStageInfo {
        stage: ParentStage::Henyey,
        key: "henyey",
        short_name: "Henyey",
        full_name: "Henyey track",
        ordinal: 1,
    },
    ParentStageInfo {
        stage: ParentStage::MainSequence,
        key: "main_sequence",
        short_name: "MS",
        full_name: "Main Sequence",
        ordinal: 2,
    },
    ParentStageInfo {
        stage: ParentStage::PostMainSequence,
        key: "post_main_sequence",
        short_name: "Post-MS",
        full_name: "Post-Main Sequence",
        ordinal: 3,
    },
    ParentStageInfo {
        stage: ParentStage::RedGiantBranch,
        key: "red_giant_branch",
        short_name: "RG",
        full_name: "Red Giant",
        ordinal: 4,
    },
    ParentStageInfo {
        stage: ParentStage::HeliumIgnition,
        key: "helium_ignition",
        short_name: "He ign.",
        full_name: "Helium ignition",
        ordinal: 5,
    },
    ParentStageInfo {
        stage: ParentStage::HeliumMainSequence,
        key: "helium_main_sequence",
        short_name: "He MS",
        full_name: "Helium Main Sequence",
        ordinal: 6,
    },
    ParentStageInfo {
        stage: ParentStage::AsymptoticGiantBranch,
        key: "asymptotic_giant_branch",
        short_name: "AGB",
        full_name: "Asymptotic Giant Branch",
        ordinal: 7,
    },
    ParentStageInfo {
        stage: ParentStage::WhiteDwarf,
        key: "white_dwarf",
        short_name: "WD",
        full_name: "White Dwarf",
        ordinal: 8,
    },
];

/// The full stage table in flowchart order.
pub fn parent_stages() -> &'static [ParentStageInfo] {
    &PARENT_STAGES
}

impl ParentStage {
    pub fn info(self) -> &'static ParentStageInfo {
        let slot = match self {
            ParentStage::Hayashi => 0,
            ParentStage::Henyey => 1,
            ParentStage::MainSequence => 2,
            ParentStage::PostMainSequence => 3,
            ParentStage::RedGiantBranch => 4,
            ParentStage::HeliumIgnition => 5,
            ParentStage::HeliumMainSequence => 6,
            ParentStage::AsymptoticGiantBranch => 7,
            ParentStage::WhiteDwarf => 8,
        };
        &PARENT_STAGES[slot]
    }

    pub fn key(self) -> &'static str {
        self.info().key
    }

    pub fn short_name(self) -> &'static str {
        self.info().short_name
    }

    pub fn full_name(self) -> &'static str {
        self.info().full_name
    }

    pub fn ordinal(self) -> u8 {
        self.info().ordinal
    }

    /// Look a stage up by key, short name or full name (case-insensitive).
    pub fn from_name(name: &str) -> Option<Self> {
        let name = name.trim();
        parent_stages()
            .iter()
            .find(|info| {
                info.key.eq_ignore_ascii_case(name)
                    || info.short_name.eq_ignore_ascii_case(name)
                    || info.full_name.eq_ignore_ascii_case(name)
            })
            .map(|info| info.stage)
    }
}

impl fmt::Display for ParentStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.full_name())
    }
}

//! Raw records delivered by an `EvolutionSource`.

use se_core::{Real, StepNumber};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// One evolution series for a fixed mass, indexed by `step - 1`.
///
/// Columns the milestone detector needs are named fields; anything else a
/// backend provides goes into `columns`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SeriesRecord {
    /// Years.
    #[serde(with = "nullable")]
    pub star_age: Vec<Real>,
    /// log10 of total luminosity (solar units).
    #[serde(with = "nullable")]
    pub log_l: Vec<Real>,
    /// log10 of hydrogen-burning luminosity.
    #[serde(with = "nullable")]
    pub log_lh: Vec<Real>,
    #[serde(default, with = "nullable")]
    pub log_lhe: Vec<Real>,
    #[serde(default, with = "nullable")]
    pub log_teff: Vec<Real>,
    #[serde(with = "nullable")]
    pub he_core_mass: Vec<Real>,
    #[serde(default, with = "nullable")]
    pub center_h1: Vec<Real>,
    #[serde(with = "nullable")]
    pub center_he4: Vec<Real>,
    #[serde(default, with = "nullable::columns")]
    pub columns: BTreeMap<String, Vec<Real>>,
    /// Steps with a stored snapshot.
    #[serde(default)]
    pub available_steps: Vec<StepNumber>,
}

impl SeriesRecord {
    /// Number of steps, taken from the age column.
    pub fn len(&self) -> usize {
        self.star_age.len()
    }

    pub fn is_empty(&self) -> bool {
        self.star_age.is_empty()
    }

    /// Named lookup over both the fixed fields and `columns`.
    pub fn column(&self, name: &str) -> Option<&[Real]> {
        let fixed = match name {
            "star_age" => &self.star_age,
            "log_L" | "log_l" => &self.log_l,
            "log_LH" | "log_lh" => &self.log_lh,
            "log_LHe" | "log_lhe" => &self.log_lhe,
            "log_Teff" | "log_teff" => &self.log_teff,
            "he_core_mass" => &self.he_core_mass,
            "center_h1" => &self.center_h1,
            "center_he4" => &self.center_he4,
            other => return self.columns.get(other).map(Vec::as_slice),
        };
        Some(fixed.as_slice())
    }
}

/// One structural snapshot, arrays indexed by shell.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SnapshotRecord {
    #[serde(default, with = "nullable::columns")]
    pub columns: BTreeMap<String, Vec<Real>>,
    /// Solar masses; when absent the star's initial mass is used.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_mass: Option<Real>,
}

/// Missing values (NaN) travel as `null`, since JSON has no NaN literal.
mod nullable {
    use se_core::Real;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(values: &[Real], serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_seq(values.iter().map(|v| (!v.is_nan()).then_some(*v)))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<Real>, D::Error> {
        let raw = Vec::<Option<Real>>::deserialize(deserializer)?;
        Ok(raw.into_iter().map(|v| v.unwrap_or(Real::NAN)).collect())
    }

    pub mod columns {
        use se_core::Real;
        use serde::ser::SerializeMap;
        use serde::{Deserialize, Deserializer, Serialize, Serializer};
        use std::collections::BTreeMap;

        struct Column<'a>(&'a [Real]);

        impl Serialize for Column<'_> {
            fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
                super::serialize(self.0, serializer)
            }
        }

        pub fn serialize<S: Serializer>(
            columns: &BTreeMap<String, Vec<Real>>,
            serializer: S,
        ) -> Result<S::Ok, S::Error> {
            let mut map = serializer.serialize_map(Some(columns.len()))?;
            for (name, values) in columns {
                map.serialize_entry(name, &Column(values))?;
            }
            map.end()
        }

        pub fn deserialize<'de, D: Deserializer<'de>>(
            deserializer: D,
        ) -> Result<BTreeMap<String, Vec<Real>>, D::Error> {
            let raw = BTreeMap::<String, Vec<Option<Real>>>::deserialize(deserializer)?;
            Ok(raw
                .into_iter()
                .map(|(name, values)| {
                    let values = values.into_iter().map(|v| v.unwrap_or(Real::NAN)).collect();
                    (name, values)
                })
                .collect())
        }
    }
}

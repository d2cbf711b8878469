//! Per-mass history and per-(mass, step) profile.

use se_core::{Real, StepNumber, ensure_finite};
use std::collections::BTreeMap;
use tracing::debug;

use crate::error::{HistoryError, HistoryResult};
use crate::milestones::{MilestoneConfig, Milestones, detect_milestones};
use crate::resolve::{ProfileQuery, ProfileSelector, resolve_available_step};
use crate::series::{SeriesRecord, SnapshotRecord};

/// One evolution series with its milestones.
///
/// Built once per mass; never mutated afterwards.
#[derive(Debug, Clone, PartialEq)]
pub struct History {
    mass: Real,
    series: SeriesRecord,
    milestones: Milestones,
    /// Sorted, de-duplicated steps that have a snapshot.
    available_steps: Vec<StepNumber>,
}

impl History {
    /// Take ownership of a raw series and run milestone detection on it.
    pub fn new(mass: Real, mut series: SeriesRecord, config: &MilestoneConfig) -> Self {
        let mut available_steps = std::mem::take(&mut series.available_steps);
        available_steps.sort_unstable();
        available_steps.dedup();

        let milestones = detect_milestones(&series, config);
        Self {
            mass,
            series,
            milestones,
            available_steps,
        }
    }

    pub fn mass(&self) -> Real {
        self.mass
    }

    pub fn series(&self) -> &SeriesRecord {
        &self.series
    }

    pub fn milestones(&self) -> &Milestones {
        &self.milestones
    }

    pub fn available_steps(&self) -> &[StepNumber] {
        &self.available_steps
    }

    pub fn len(&self) -> usize {
        self.series.len()
    }

    pub fn is_empty(&self) -> bool {
        self.series.is_empty()
    }

    pub fn age_at(&self, step: StepNumber) -> Option<Real> {
        self.series.star_age.get(step.index()).copied()
    }

    /// First step whose age is at least `age`.
    pub fn step_at_age(&self, age: Real) -> Option<StepNumber> {
        let index = self.series.star_age.iter().position(|&a| a >= age)?;
        StepNumber::from_index(index).ok()
    }

    /// The stored step a profile query lands on.
    pub fn resolve_step(&self, query: &ProfileQuery) -> HistoryResult<StepNumber> {
        let target = match query.selector()? {
            ProfileSelector::Index(index) => StepNumber::from_index(index)?,
            ProfileSelector::Step(step) => step,
            ProfileSelector::Age(age) => {
                let age = ensure_finite(age, "profile age")?;
                self.step_at_age(age)
                    .ok_or(HistoryError::AgeOutOfRange { age })?
            }
        };

        let resolved =
            resolve_available_step(&self.available_steps, target, query.skip, self.mass)?;
        if resolved != target {
            debug!(
                mass = self.mass,
                requested = target.get(),
                resolved = resolved.get(),
                skip = query.skip,
                "snapshot request moved to a stored step"
            );
        }
        Ok(resolved)
    }
}

/// One structural snapshot with its place in time.
#[derive(Debug, Clone, PartialEq)]
pub struct Profile {
    pub mass: Real,
    pub step: StepNumber,
    /// Years, taken from the owning history.
    pub age: Real,
    /// Solar masses.
    pub total_mass: Real,
    pub columns: BTreeMap<String, Vec<Real>>,
}

impl Profile {
    /// Attach age and total mass from `history` to a raw snapshot.
    pub fn from_snapshot(
        history: &History,
        step: StepNumber,
        snapshot: SnapshotRecord,
    ) -> HistoryResult<Self> {
        let age = history.age_at(step).ok_or(HistoryError::StepOutOfRange {
            step: step.get(),
            len: history.len(),
        })?;
        Ok(Self {
            mass: history.mass(),
            step,
            age,
            total_mass: snapshot.total_mass.unwrap_or(history.mass()),
            columns: snapshot.columns,
        })
    }

    pub fn index(&self) -> usize {
        self.step.index()
    }

    pub fn column(&self, name: &str) -> Option<&[Real]> {
        self.columns.get(name).map(Vec::as_slice)
    }

    /// Number of shells, from the longest column.
    pub fn shell_count(&self) -> usize {
        self.columns.values().map(Vec::len).max().unwrap_or(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn history(n: usize, available: &[u32]) -> History {
        let series = SeriesRecord {
            star_age: (0..n).map(|i| i as Real * 10.0).collect(),
            log_l: vec![0.0; n],
            log_lh: vec![0.0; n],
            he_core_mass: vec![0.0; n],
            center_he4: vec![0.28; n],
            available_steps: available
                .iter()
                .rev()
                .map(|&s| StepNumber::new(s).unwrap())
                .collect(),
            ..Default::default()
        };
        History::new(1.0, series, &MilestoneConfig::default())
    }

    fn step(n: u32) -> StepNumber {
        StepNumber::new(n).unwrap()
    }

    #[test]
    fn available_steps_are_sorted() {
        let h = history(10, &[5, 1, 5, 3]);
        let got: Vec<u32> = h.available_steps().iter().map(|s| s.get()).collect();
        assert_eq!(got, [1, 3, 5]);
    }

    #[test]
    fn resolves_by_index_step_and_age() {
        let h = history(200, &[1, 50, 103, 150]);
        assert_eq!(h.resolve_step(&ProfileQuery::by_index(49)), Ok(step(50)));
        assert_eq!(h.resolve_step(&ProfileQuery::by_step(step(100))), Ok(step(103)));
        // age 995 -> first age >= 995 is index 100 (age 1000) -> step 101 -> 103
        assert_eq!(h.resolve_step(&ProfileQuery::by_age(995.0)), Ok(step(103)));
    }

    #[test]
    fn forward_scan_example() {
        // requested 100, stored {98, 103}: always the later one
        let h = history(200, &[98, 103]);
        assert_eq!(h.resolve_step(&ProfileQuery::by_step(step(100))), Ok(step(103)));
    }

    #[test]
    fn age_beyond_series_is_error() {
        let h = history(10, &[1, 5]);
        assert_eq!(
            h.resolve_step(&ProfileQuery::by_age(1.0e9)),
            Err(HistoryError::AgeOutOfRange { age: 1.0e9 })
        );
        assert!(h.resolve_step(&ProfileQuery::by_age(Real::NAN)).is_err());
    }

    #[test]
    fn profile_takes_age_and_mass_from_history() {
        let h = history(10, &[4]);
        let mut snapshot = SnapshotRecord::default();
        snapshot.columns.insert("logT".into(), vec![7.0, 6.5, 4.0]);

        let p = Profile::from_snapshot(&h, step(4), snapshot).unwrap();
        assert_eq!(p.age, 30.0);
        assert_eq!(p.total_mass, 1.0);
        assert_eq!(p.index(), 3);
        assert_eq!(p.shell_count(), 3);
    }

    #[test]
    fn profile_beyond_series_is_error() {
        let h = history(10, &[20]);
        let err = Profile::from_snapshot(&h, step(20), SnapshotRecord::default()).unwrap_err();
        assert_eq!(err, HistoryError::StepOutOfRange { step: 20, len: 10 });
    }

    proptest! {
        #[test]
        fn index_and_step_resolve_identically(
            mut raw in prop::collection::vec(1_u32..300, 1..30),
            index in 0_usize..300,
            skip in -2_i64..3,
        ) {
            raw.sort_unstable();
            let h = history(300, &raw);
            let by_index = h.resolve_step(&ProfileQuery::by_index(index).with_skip(skip));
            let by_step = h.resolve_step(
                &ProfileQuery::by_step(StepNumber::from_index(index).unwrap()).with_skip(skip),
            );
            prop_assert_eq!(by_index, by_step);
        }
    }
}

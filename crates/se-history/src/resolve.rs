//! Mapping a requested step onto a step that actually has a snapshot.
//!
//! Snapshots are not stored for every step. A request is resolved by
//! scanning forward to the next stored step (never backward), then moving
//! `skip` positions along the sorted list of stored steps.

use se_core::{Real, StepNumber};

use crate::error::{HistoryError, HistoryResult};

/// Exactly one way of addressing a snapshot.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ProfileSelector {
    /// 0-based series index; converted with `step = index + 1`.
    Index(usize),
    Step(StepNumber),
    /// Years; resolves to the first step whose age is at least this.
    Age(Real),
}

/// A profile request as callers build it.
///
/// Setting zero or several of `index`, `step` and `age` is rejected by
/// `selector()` rather than defaulted.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ProfileQuery {
    pub index: Option<usize>,
    pub step: Option<StepNumber>,
    pub age: Option<Real>,
    /// Positions to move along the stored steps after resolving; negative
    /// moves backward.
    pub skip: i64,
}

impl ProfileQuery {
    pub fn by_index(index: usize) -> Self {
        Self {
            index: Some(index),
            ..Self::default()
        }
    }

    pub fn by_step(step: StepNumber) -> Self {
        Self {
            step: Some(step),
            ..Self::default()
        }
    }

    pub fn by_age(age: Real) -> Self {
        Self {
            age: Some(age),
            ..Self::default()
        }
    }

    pub fn with_skip(mut self, skip: i64) -> Self {
        self.skip = skip;
        self
    }

    pub fn selector(&self) -> HistoryResult<ProfileSelector> {
        match (self.index, self.step, self.age) {
            (Some(index), None, None) => Ok(ProfileSelector::Index(index)),
            (None, Some(step), None) => Ok(ProfileSelector::Step(step)),
            (None, None, Some(age)) => Ok(ProfileSelector::Age(age)),
            _ => {
                let given = [
                    self.index.is_some(),
                    self.step.is_some(),
                    self.age.is_some(),
                ]
                .into_iter()
                .filter(|&g| g)
                .count();
                Err(HistoryError::AmbiguousSelector { given })
            }
        }
    }
}

/// Position in `available` (sorted ascending) of the first step `>= target`.
pub fn forward_scan(available: &[StepNumber], target: StepNumber) -> Option<usize> {
    let pos = available.partition_point(|&s| s < target);
    (pos < available.len()).then_some(pos)
}

/// Forward scan to a stored step, then apply `skip`.
pub fn resolve_available_step(
    available: &[StepNumber],
    target: StepNumber,
    skip: i64,
    mass: Real,
) -> HistoryResult<StepNumber> {
    let pos = forward_scan(available, target).ok_or(HistoryError::NoSnapshotAvailable {
        mass,
        requested: target.get(),
    })?;
    let skipped = i64::try_from(pos)
        .ok()
        .and_then(|p| p.checked_add(skip))
        .and_then(|p| usize::try_from(p).ok())
        .and_then(|p| available.get(p).copied());
    skipped.ok_or(HistoryError::SkipOutOfRange {
        step: available[pos].get(),
        skip,
    })
}

//! Backend seam for raw series and snapshots.

use se_core::{MassKey, Real, StepNumber};
use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use crate::error::{HistoryError, HistoryResult};
use crate::series::{SeriesRecord, SnapshotRecord};

/// Where series and snapshots come from.
///
/// Implementations may block on slow I/O. Callers cache the results, so a
/// source is not expected to cache anything itself.
pub trait EvolutionSource {
    /// The full series for `mass`, including the steps that have snapshots.
    fn load_series(&self, mass: Real) -> HistoryResult<SeriesRecord>;

    fn load_snapshot(&self, mass: Real, step: StepNumber) -> HistoryResult<SnapshotRecord>;
}

impl<S: EvolutionSource + ?Sized> EvolutionSource for &S {
    fn load_series(&self, mass: Real) -> HistoryResult<SeriesRecord> {
        (**self).load_series(mass)
    }

    fn load_snapshot(&self, mass: Real, step: StepNumber) -> HistoryResult<SnapshotRecord> {
        (**self).load_snapshot(mass, step)
    }
}

impl<S: EvolutionSource + ?Sized> EvolutionSource for Arc<S> {
    fn load_series(&self, mass: Real) -> HistoryResult<SeriesRecord> {
        (**self).load_series(mass)
    }

    fn load_snapshot(&self, mass: Real, step: StepNumber) -> HistoryResult<SnapshotRecord> {
        (**self).load_snapshot(mass, step)
    }
}

/// Source backed by in-process maps; counts every load.
///
/// Snapshot steps inserted for a mass are merged into that mass's
/// `available_steps` when the series is loaded.
#[derive(Debug, Default)]
pub struct InMemorySource {
    series: HashMap<MassKey, SeriesRecord>,
    snapshots: HashMap<(MassKey, StepNumber), SnapshotRecord>,
    series_loads: AtomicUsize,
    snapshot_loads: AtomicUsize,
}

impl InMemorySource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert_series(&mut self, mass: Real, series: SeriesRecord) -> HistoryResult<()> {
        self.series.insert(MassKey::new(mass)?, series);
        Ok(())
    }

    pub fn insert_snapshot(
        &mut self,
        mass: Real,
        step: StepNumber,
        snapshot: SnapshotRecord,
    ) -> HistoryResult<()> {
        self.snapshots.insert((MassKey::new(mass)?, step), snapshot);
        Ok(())
    }

    pub fn series_load_count(&self) -> usize {
        self.series_loads.load(Ordering::Relaxed)
    }

    pub fn snapshot_load_count(&self) -> usize {
        self.snapshot_loads.load(Ordering::Relaxed)
    }
}

impl EvolutionSource for InMemorySource {
    fn load_series(&self, mass: Real) -> HistoryResult<SeriesRecord> {
        self.series_loads.fetch_add(1, Ordering::Relaxed);
        let key = MassKey::new(mass)?;
        let mut series = self
            .series
            .get(&key)
            .cloned()
            .ok_or(HistoryError::SeriesNotFound { mass })?;

        series.available_steps.extend(
            self.snapshots
                .keys()
                .filter(|(m, _)| *m == key)
                .map(|&(_, step)| step),
        );
        series.available_steps.sort_unstable();
        series.available_steps.dedup();
        Ok(series)
    }

    fn load_snapshot(&self, mass: Real, step: StepNumber) -> HistoryResult<SnapshotRecord> {
        self.snapshot_loads.fetch_add(1, Ordering::Relaxed);
        self.snapshots
            .get(&(MassKey::new(mass)?, step))
            .cloned()
            .ok_or(HistoryError::SnapshotNotFound {
                mass,
                step: step.get(),
            })
    }
}

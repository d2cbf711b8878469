//! A synthetic track loaded through `InMemorySource`: milestones and
//! snapshot resolution working together.

use se_core::StepNumber;
use se_history::{
    EvolutionSource, History, HistoryError, InMemorySource, MilestoneConfig, MilestoneKind,
    Profile, ProfileQuery, SeriesRecord, SnapshotRecord,
};
use std::collections::BTreeMap;

const LEN: usize = 60;

fn step(n: u32) -> StepNumber {
    StepNumber::new(n).unwrap()
}

/// Pre-main-sequence until index 10, core hydrogen exhausted at index 30,
/// central helium starts to burn at index 45.
fn track() -> SeriesRecord {
    SeriesRecord {
        star_age: (0..LEN).map(|i| i as f64 * 1.0e7).collect(),
        log_l: vec![0.0; LEN],
        log_lh: (0..LEN).map(|i| if i < 10 { -1.0 } else { 0.0 }).collect(),
        he_core_mass: (0..LEN).map(|i| if i < 30 { 0.0 } else { 0.2 }).collect(),
        center_he4: (0..LEN).map(|i| if i < 45 { 0.98 } else { 0.9 }).collect(),
        ..Default::default()
    }
}

fn source() -> InMemorySource {
    let mut source = InMemorySource::new();
    source.insert_series(1.0, track()).unwrap();
    for n in (5..=LEN as u32).step_by(5) {
        let snapshot = SnapshotRecord {
            columns: BTreeMap::from([("mass".to_string(), vec![0.0, 0.5, 1.0])]),
            total_mass: Some(0.99),
        };
        source.insert_snapshot(1.0, step(n), snapshot).unwrap();
    }
    source
}

fn history(source: &InMemorySource) -> History {
    let series = source.load_series(1.0).unwrap();
    History::new(1.0, series, &MilestoneConfig::default())
}

#[test]
fn milestones_on_synthetic_track() {
    let history = history(&source());
    let milestones = history.milestones();
    assert_eq!(milestones.zams.index(), Some(10));
    assert_eq!(milestones.tams.step(), Some(step(31)));
    assert_eq!(milestones.he_ignition.index(), Some(45));
    assert_eq!(
        milestones.get(MilestoneKind::HeliumIgnition).age(),
        Some(45.0e7)
    );
}

#[test]
fn age_query_scans_forward_and_skips() {
    let history = history(&source());
    assert_eq!(history.available_steps().len(), 12);

    let by_age = ProfileQuery::by_age(3.1e8);
    assert_eq!(history.resolve_step(&by_age), Ok(step(35)));
    assert_eq!(history.resolve_step(&by_age.with_skip(-1)), Ok(step(30)));
    assert_eq!(history.resolve_step(&by_age.with_skip(2)), Ok(step(45)));
}

#[test]
fn resolution_failures_are_reported() {
    let history = history(&source());
    assert!(matches!(
        history.resolve_step(&ProfileQuery::by_step(step(61))),
        Err(HistoryError::NoSnapshotAvailable { requested: 61, .. })
    ));
    assert!(matches!(
        history.resolve_step(&ProfileQuery::by_step(step(55)).with_skip(5)),
        Err(HistoryError::SkipOutOfRange { step: 55, skip: 5 })
    ));
    assert!(matches!(
        history.resolve_step(&ProfileQuery::by_age(1.0e12)),
        Err(HistoryError::AgeOutOfRange { .. })
    ));
    assert!(matches!(
        history.resolve_step(&ProfileQuery::default()),
        Err(HistoryError::AmbiguousSelector { given: 0 })
    ));
}

#[test]
fn profile_takes_age_from_history_and_mass_from_snapshot() {
    let source = source();
    let history = history(&source);
    let resolved = history.resolve_step(&ProfileQuery::by_index(46)).unwrap();
    let snapshot = source.load_snapshot(1.0, resolved).unwrap();
    let profile = Profile::from_snapshot(&history, resolved, snapshot).unwrap();

    assert_eq!(profile.step, step(50));
    assert_eq!(profile.index(), 49);
    assert_eq!(profile.age, 49.0e7);
    assert_eq!(profile.total_mass, 0.99);
    assert_eq!(profile.shell_count(), 3);
}

//! Milestone detection over one evolution series.
//!
//! Three markers are detected, in order:
//! 1. hydrogen ignition (ZAMS): hydrogen burning supplies the total luminosity
//! 2. hydrogen exhaustion (TAMS): a helium core first appears
//! 3. helium ignition: central helium starts to deplete after TAMS
//!
//! Detection never fails. A marker that cannot be found is
//! `Milestone::Undetected`, and helium ignition is undetected whenever
//! hydrogen exhaustion is.

use se_core::{Real, StepNumber, min_index};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use tracing::debug;

use crate::series::SeriesRecord;

/// Detection thresholds.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MilestoneConfig {
    /// Hydrogen ignition once `L_H / L > fraction`.
    pub zams_luminosity_fraction: Real,
    /// Helium ignition once central He-4 has dropped by more than this
    /// fraction of its value at hydrogen exhaustion.
    pub he_depletion_fraction: Real,
}

impl Default for MilestoneConfig {
    fn default() -> Self {
        Self {
            zams_luminosity_fraction: 0.999,
            he_depletion_fraction: 1e-4,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MilestoneKind {
    HydrogenIgnition,
    HydrogenExhaustion,
    HeliumIgnition,
}

impl MilestoneKind {
    pub const ALL: [MilestoneKind; 3] = [
        MilestoneKind::HydrogenIgnition,
        MilestoneKind::HydrogenExhaustion,
        MilestoneKind::HeliumIgnition,
    ];

    pub fn label(self) -> &'static str {
        match self {
            MilestoneKind::HydrogenIgnition => "ZAMS",
            MilestoneKind::HydrogenExhaustion => "TAMS",
            MilestoneKind::HeliumIgnition => "He ignition",
        }
    }
}

impl fmt::Display for MilestoneKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A detected transition point, or the explicit "does not apply" state.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Milestone {
    Detected {
        /// 0-based array position.
        index: usize,
        step: StepNumber,
        age: Real,
    },
    Undetected,
}

impl Milestone {
    /// Milestone at `index`, with its age looked up from `star_age`.
    fn at(index: usize, star_age: &[Real]) -> Self {
        match (star_age.get(index), StepNumber::from_index(index)) {
            (Some(&age), Ok(step)) => Milestone::Detected { index, step, age },
            _ => Milestone::Undetected,
        }
    }

    pub fn is_detected(&self) -> bool {
        matches!(self, Milestone::Detected { .. })
    }

    pub fn index(&self) -> Option<usize> {
        match self {
            Milestone::Detected { index, .. } => Some(*index),
            Milestone::Undetected => None,
        }
    }

    pub fn step(&self) -> Option<StepNumber> {
        match self {
            Milestone::Detected { step, .. } => Some(*step),
            Milestone::Undetected => None,
        }
    }

    pub fn age(&self) -> Option<Real> {
        match self {
            Milestone::Detected { age, .. } => Some(*age),
            Milestone::Undetected => None,
        }
    }

    /// Age for plotting, NaN when undetected.
    pub fn age_or_nan(&self) -> Real {
        self.age().unwrap_or(Real::NAN)
    }
}

impl fmt::Display for Milestone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Milestone::Detected { index, step, age } => {
                write!(f, "step {step} (index {index}, age {age:.6e} yr)")
            }
            Milestone::Undetected => f.write_str("not detected"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Milestones {
    pub zams: Milestone,
    pub tams: Milestone,
    pub he_ignition: Milestone,
}

impl Milestones {
    pub fn undetected() -> Self {
        Self {
            zams: Milestone::Undetected,
            tams: Milestone::Undetected,
            he_ignition: Milestone::Undetected,
        }
    }

    pub fn get(&self, kind: MilestoneKind) -> &Milestone {
        match kind {
            MilestoneKind::HydrogenIgnition => &self.zams,
            MilestoneKind::HydrogenExhaustion => &self.tams,
            MilestoneKind::HeliumIgnition => &self.he_ignition,
        }
    }
}

/// Run all three detectors over `series`.
pub fn detect_milestones(series: &SeriesRecord, config: &MilestoneConfig) -> Milestones {
    let zams = detect_hydrogen_ignition(series, config);
    let tams = detect_hydrogen_exhaustion(series);
    let he_ignition = detect_helium_ignition(series, &tams, config);

    debug!(%zams, %tams, %he_ignition, "milestones detected");

    Milestones {
        zams,
        tams,
        he_ignition,
    }
}

/// First step where `log L_H - log L > log10(fraction)`.
fn detect_hydrogen_ignition(series: &SeriesRecord, config: &MilestoneConfig) -> Milestone {
    let threshold = config.zams_luminosity_fraction.log10();
    series
        .log_lh
        .iter()
        .zip(&series.log_l)
        .position(|(lh, l)| lh - l > threshold)
        .map_or(Milestone::Undetected, |i| Milestone::at(i, &series.star_age))
}

/// First step with a strictly positive helium core mass.
fn detect_hydrogen_exhaustion(series: &SeriesRecord) -> Milestone {
    series
        .he_core_mass
        .iter()
        .position(|&m| m > 0.0)
        .map_or(Milestone::Undetected, |i| Milestone::at(i, &series.star_age))
}

/// First post-TAMS step where central He-4 has measurably dropped.
///
/// Candidates are the depletion set intersected with the set of steps
/// strictly after the TAMS age; the minimum of an empty intersection is
/// "undetected".
fn detect_helium_ignition(
    series: &SeriesRecord,
    tams: &Milestone,
    config: &MilestoneConfig,
) -> Milestone {
    let Milestone::Detected {
        index: tams_index,
        age: tams_age,
        ..
    } = *tams
    else {
        return Milestone::Undetected;
    };
    let Some(&he4_at_tams) = series.center_he4.get(tams_index) else {
        return Milestone::Undetected;
    };

    let depleted: BTreeSet<usize> = series
        .center_he4
        .iter()
        .enumerate()
        .filter(|&(_, &x)| (he4_at_tams - x) / he4_at_tams > config.he_depletion_fraction)
        .map(|(i, _)| i)
        .collect();
    let after_tams: BTreeSet<usize> = series
        .star_age
        .iter()
        .enumerate()
        .filter(|&(_, &age)| age > tams_age)
        .map(|(i, _)| i)
        .collect();

    min_index(depleted.intersection(&after_tams).copied())
        .map_or(Milestone::Undetected, |i| Milestone::at(i, &series.star_age))
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    /// ZAMS at `zams`, TAMS at `tams`, helium depletion from `he` (if any).
    ///
    /// Central He-4 rises during the main sequence, so pre-TAMS steps also
    /// sit below the TAMS value.
    fn series(n: usize, zams: usize, tams: usize, he: Option<usize>) -> SeriesRecord {
        let star_age = (0..n).map(|i| (i as Real) * 1.0e6 + (i * i) as Real).collect();
        let log_l = vec![0.0; n];
        let log_lh = (0..n).map(|i| if i >= zams { 0.0 } else { -2.0 }).collect();
        let he_core_mass = (0..n).map(|i| if i >= tams { 0.1 } else { 0.0 }).collect();
        let center_he4 = (0..n)
            .map(|i| {
                if i < tams {
                    0.28 + 0.7 * (i as Real) / (tams as Real)
                } else {
                    match he {
                        Some(h) if i >= h => 0.98 - 0.01 * ((i - h + 1) as Real),
                        _ => 0.98,
                    }
                }
            })
            .collect();
        SeriesRecord {
            star_age,
            log_l,
            log_lh,
            he_core_mass,
            center_he4,
            ..Default::default()
        }
    }

    #[test]
    fn detects_all_three() {
        let s = series(100, 10, 40, Some(60));
        let m = detect_milestones(&s, &MilestoneConfig::default());

        assert_eq!(m.zams.index(), Some(10));
        assert_eq!(m.zams.step().map(|s| s.get()), Some(11));
        assert_eq!(m.zams.age(), Some(s.star_age[10]));
        assert_eq!(m.tams.index(), Some(40));
        assert_eq!(m.he_ignition.index(), Some(60));
    }

    #[test]
    fn pre_tams_depletion_is_ignored() {
        // Before TAMS He-4 is lower than at TAMS; only the post-TAMS
        // window may produce helium ignition.
        let s = series(100, 10, 40, None);
        let m = detect_milestones(&s, &MilestoneConfig::default());
        assert!(m.tams.is_detected());
        assert_eq!(m.he_ignition, Milestone::Undetected);
    }

    #[test]
    fn no_helium_core_means_no_helium_ignition() {
        let mut s = series(50, 5, 40, Some(45));
        s.he_core_mass = vec![0.0; 50];
        let m = detect_milestones(&s, &MilestoneConfig::default());
        assert!(m.zams.is_detected());
        assert_eq!(m.tams, Milestone::Undetected);
        assert_eq!(m.he_ignition, Milestone::Undetected);
    }

    #[test]
    fn hydrogen_never_dominates() {
        let mut s = series(50, 5, 40, None);
        s.log_lh = vec![-0.01; 50];
        let m = detect_milestones(&s, &MilestoneConfig::default());
        assert_eq!(m.zams, Milestone::Undetected);
    }

    #[test]
    fn zams_threshold_is_strict_fraction() {
        // L_H = 0.9995 L passes, L_H = 0.998 L does not.
        let mut s = series(3, 0, 2, None);
        s.log_lh = vec![0.998_f64.log10(), 0.9995_f64.log10(), 0.0];
        let m = detect_milestones(&s, &MilestoneConfig::default());
        assert_eq!(m.zams.index(), Some(1));
    }

    #[test]
    fn empty_series_detects_nothing() {
        let m = detect_milestones(&SeriesRecord::default(), &MilestoneConfig::default());
        assert_eq!(m, Milestones::undetected());
        assert!(m.zams.age_or_nan().is_nan());
    }

    #[test]
    fn zero_helium_at_tams_is_undetected() {
        let mut s = series(50, 5, 20, Some(30));
        s.center_he4 = vec![0.0; 50];
        let m = detect_milestones(&s, &MilestoneConfig::default());
        assert!(m.tams.is_detected());
        assert_eq!(m.he_ignition, Milestone::Undetected);
    }

    #[test]
    fn nan_values_never_trigger() {
        let mut s = series(20, 5, 10, Some(15));
        s.log_lh = vec![Real::NAN; 20];
        s.he_core_mass = vec![Real::NAN; 20];
        let m = detect_milestones(&s, &MilestoneConfig::default());
        assert_eq!(m, Milestones::undetected());
    }

    proptest! {
        #[test]
        fn milestone_ages_are_ordered(
            zams in 0_usize..30,
            gap in 1_usize..30,
            he_gap in 1_usize..30,
        ) {
            let tams = zams + gap;
            let he = tams + he_gap;
            let s = series(he + 10, zams, tams, Some(he));
            let m = detect_milestones(&s, &MilestoneConfig::default());

            let (a1, a2, a3) = (m.zams.age(), m.tams.age(), m.he_ignition.age());
            prop_assert!(a1.is_some() && a2.is_some() && a3.is_some());
            prop_assert!(a1 <= a2 && a2 <= a3);
        }

        #[test]
        fn helium_ignition_requires_tams(n in 5_usize..60, he in 0_usize..60) {
            let mut s = series(n, 0, n - 1, Some(he.min(n - 1)));
            s.he_core_mass = vec![0.0; n];
            let m = detect_milestones(&s, &MilestoneConfig::default());
            prop_assert_eq!(m.he_ignition, Milestone::Undetected);
        }
    }
}

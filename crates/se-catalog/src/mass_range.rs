//! Mass intervals used by mass-first queries.

use se_core::Real;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::{CatalogError, CatalogResult};

/// A queried stellar mass interval in solar masses, `low < high`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MassRange {
    low: Real,
    high: Real,
}

impl MassRange {
    pub fn new(low: Real, high: Real) -> CatalogResult<Self> {
        if !low.is_finite() || !high.is_finite() {
            return Err(CatalogError::InvalidMassRange {
                input: format!("{low}-{high}"),
                reason: "bounds must be finite",
            });
        }
        if low >= high {
            return Err(CatalogError::InvalidMassRange {
                input: format!("{low}-{high}"),
                reason: "lower bound must be below upper bound",
            });
        }
        Ok(Self { low, high })
    }

    pub fn low(&self) -> Real {
        self.low
    }

    pub fn high(&self) -> Real {
        self.high
    }

    /// Half-open intersection test against a substage interval.
    ///
    /// Touching intervals do not overlap: `[0.3, 1.5]` does not match a
    /// query of `[1.5, 2.0)`.
    pub fn overlaps(&self, mass_min: Real, mass_max: Real) -> bool {
        !(mass_max <= self.low || mass_min >= self.high)
    }

    /// Inclusive on both ends; used to pick an example model.
    pub fn contains(&self, mass: Real) -> bool {
        self.low <= mass && mass <= self.high
    }
}

impl fmt::Display for MassRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.1}-{:.1}", self.low, self.high)
    }
}

impl FromStr for MassRange {
    type Err = CatalogError;

    /// Parses labels like `"0.8-1.5"`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = |reason| CatalogError::InvalidMassRange {
            input: s.to_string(),
            reason,
        };
        let (low, high) = s.trim().split_once('-').ok_or(invalid("expected LOW-HIGH"))?;
        let low: Real = low.trim().parse().map_err(|_| invalid("lower bound is not a number"))?;
        let high: Real = high
            .trim()
            .parse()
            .map_err(|_| invalid("upper bound is not a number"))?;
        Self::new(low, high).map_err(|err| match err {
            CatalogError::InvalidMassRange { reason, .. } => invalid(reason),
            other => other,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn parse_label() {
        let range: MassRange = "0.8-1.5".parse().unwrap();
        assert_eq!(range.low(), 0.8);
        assert_eq!(range.high(), 1.5);
        assert_eq!(range.to_string(), "0.8-1.5");
    }

    #[test]
    fn parse_rejects_garbage() {
        assert!("1.5".parse::<MassRange>().is_err());
        assert!("a-b".parse::<MassRange>().is_err());
        assert!("2.0-1.0".parse::<MassRange>().is_err());
        assert!("1.0-1.0".parse::<MassRange>().is_err());
    }

    #[test]
    fn parse_reports_the_actual_problem() {
        let reason = |input: &str| match input.parse::<MassRange>() {
            Err(CatalogError::InvalidMassRange { input: got, reason }) => {
                assert_eq!(got, input);
                reason
            }
            other => panic!("unexpected result for {input}: {other:?}"),
        };
        assert_eq!(reason("inf-5"), "bounds must be finite");
        assert_eq!(reason("nan-1"), "bounds must be finite");
        assert_eq!(reason("2.0-1.0"), "lower bound must be below upper bound");
    }

    #[test]
    fn touching_intervals_do_not_overlap() {
        let range = MassRange::new(1.5, 2.0).unwrap();
        assert!(!range.overlaps(0.3, 1.5));
        assert!(!range.overlaps(2.0, 6.0));
        assert!(range.overlaps(1.5, 6.0));
        assert!(range.overlaps(0.1, 6.0));
    }

    #[test]
    fn contains_is_inclusive() {
        let range = MassRange::new(0.8, 3.5).unwrap();
        assert!(range.contains(0.8));
        assert!(range.contains(3.5));
        assert!(!range.contains(0.5));
    }

    proptest! {
        #[test]
        fn overlap_matches_interval_definition(
            lo in 0.0_f64..10.0,
            width in 0.01_f64..10.0,
            min in 0.0_f64..10.0,
            span in 0.01_f64..10.0,
        ) {
            let range = MassRange::new(lo, lo + width).unwrap();
            let max = min + span;
            let expected = max > lo && min < lo + width;
            prop_assert_eq!(range.overlaps(min, max), expected);
        }
    }
}

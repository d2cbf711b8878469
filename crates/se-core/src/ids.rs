use core::fmt;
use core::num::NonZeroU32;

use crate::{Real, SeError, ensure_positive};

/// Compact, stable identifier used for catalog entries.
///
/// - `u32` keeps memory small
/// - `NonZero` enables `Option<Id>` to be pointer-optimized
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Id(NonZeroU32);

impl Id {
    /// Create an Id from a 0-based index by storing index+1.
    pub fn from_index(index: u32) -> Self {
        Self(NonZeroU32::MIN.saturating_add(index))
    }

    /// Recover the 0-based index.
    pub fn index(self) -> u32 {
        self.0.get() - 1
    }

    /// The 0-based index as a slice position.
    pub fn slot(self) -> usize {
        self.index() as usize
    }
}

impl fmt::Debug for Id {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Id({})", self.index())
    }
}

impl fmt::Display for Id {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.index())
    }
}

/// Domain-specific ID aliases for clarity (no runtime cost).
pub type SubStageKey = Id;
pub type ModelKey = Id;

/// 1-based simulation step number ("model number").
///
/// Series arrays are 0-based, so `index = step - 1`.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(try_from = "u32", into = "u32")
)]
pub struct StepNumber(NonZeroU32);

impl StepNumber {
    pub fn new(step: u32) -> Option<Self> {
        NonZeroU32::new(step).map(Self)
    }

    /// Step number for a 0-based array index.
    pub fn from_index(index: usize) -> Result<Self, SeError> {
        u32::try_from(index)
            .ok()
            .and_then(|i| i.checked_add(1))
            .and_then(Self::new)
            .ok_or(SeError::IndexOob {
                what: "step index",
                index,
                len: u32::MAX as usize,
            })
    }

    pub fn get(self) -> u32 {
        self.0.get()
    }

    /// 0-based array index.
    pub fn index(self) -> usize {
        (self.0.get() - 1) as usize
    }
}

impl TryFrom<u32> for StepNumber {
    type Error = SeError;

    fn try_from(step: u32) -> Result<Self, Self::Error> {
        Self::new(step).ok_or(SeError::InvalidArg {
            what: "step numbers start at 1",
        })
    }
}

impl From<StepNumber> for u32 {
    fn from(step: StepNumber) -> Self {
        step.get()
    }
}

impl fmt::Debug for StepNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Step({})", self.get())
    }
}

impl fmt::Display for StepNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.get())
    }
}

/// Hashable key for a stellar mass (solar masses).
///
/// Only finite, positive masses are representable, so ordering the raw
/// bits agrees with numeric ordering.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MassKey(u64);

impl MassKey {
    pub fn new(mass: Real) -> Result<Self, SeError> {
        let mass = ensure_positive(mass, "stellar mass")?;
        Ok(Self(mass.to_bits()))
    }

    pub fn mass(self) -> Real {
        Real::from_bits(self.0)
    }
}

impl fmt::Debug for MassKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "MassKey({:?})", self.mass())
    }
}

/// Shortest round-trip rendering that keeps a decimal point (`1.0`, `0.2`).
impl fmt::Display for MassKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self.mass())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn id_round_trip_index() {
        for i in [0_u32, 1, 2, 42, 10_000] {
            let id = Id::from_index(i);
            assert_eq!(id.index(), i);
        }
    }

    #[test]
    fn option_id_is_small() {
        assert_eq!(
            core::mem::size_of::<Id>(),
            core::mem::size_of::<Option<Id>>()
        );
    }

    #[test]
    fn step_zero_is_rejected() {
        assert!(StepNumber::new(0).is_none());
        assert!(StepNumber::try_from(0).is_err());
    }

    #[test]
    fn mass_key_display_keeps_decimal_point() {
        assert_eq!(MassKey::new(1.0).unwrap().to_string(), "1.0");
        assert_eq!(MassKey::new(0.2).unwrap().to_string(), "0.2");
        assert_eq!(MassKey::new(3.0).unwrap().to_string(), "3.0");
    }

    #[test]
    fn mass_key_rejects_non_physical() {
        assert!(MassKey::new(0.0).is_err());
        assert!(MassKey::new(-1.0).is_err());
        assert!(MassKey::new(Real::NAN).is_err());
    }

    proptest! {
        #[test]
        fn step_index_round_trip(index in 0_usize..10_000_000) {
            let step = StepNumber::from_index(index).unwrap();
            prop_assert_eq!(step.get() as usize, index + 1);
            prop_assert_eq!(step.index(), index);
        }

        #[test]
        fn mass_key_order_matches_numeric(a in 0.01_f64..100.0, b in 0.01_f64..100.0) {
            let ka = MassKey::new(a).unwrap();
            let kb = MassKey::new(b).unwrap();
            prop_assert_eq!(ka.cmp(&kb), a.total_cmp(&b));
        }
    }
}

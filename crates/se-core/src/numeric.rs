use crate::SeError;

/// Floating point type used throughout system
pub type Real = f64;

pub fn ensure_finite(v: Real, what: &'static str) -> Result<Real, SeError> {
    if v.is_finite() {
        Ok(v)
    } else {
        Err(SeError::NonFinite { what, value: v })
    }
}

/// Finite and strictly positive (masses, ages used as keys).
pub fn ensure_positive(v: Real, what: &'static str) -> Result<Real, SeError> {
    let v = ensure_finite(v, what)?;
    if v > 0.0 {
        Ok(v)
    } else {
        Err(SeError::NonPositive { what, value: v })
    }
}

/// Smallest element of an index set, `None` when the set is empty.
///
/// Milestone windows are built by intersecting index sets; an empty
/// intersection means "not detected", never an error.
pub fn min_index<I>(indices: I) -> Option<usize>
where
    I: IntoIterator<Item = usize>,
{
    indices.into_iter().min()
}

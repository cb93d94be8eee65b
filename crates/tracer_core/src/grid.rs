//! Grid axis index lookups.
//!
//! Both lookups return the lower bracketing index for interpolation, i.e.
//! an index `i` such that the query value lies in the interval spanned by
//! `axis[i]` and `axis[i + 1]`. Queries at or outside the axis bounds are
//! clamped to the nearest valid interval, so the returned index is always
//! in `0..=axis.len() - 2`.

/// Locates the lower bracketing index on a regular (evenly spaced) axis.
///
/// # Panics
///
/// Panics in debug builds if the axis has fewer than two points.
#[inline]
pub fn locate_reg(axis: &[f64], x: f64) -> usize {
    debug_assert!(axis.len() >= 2);
    let step = (axis[axis.len() - 1] - axis[0]) / (axis.len() - 1) as f64;
    let i = ((x - axis[0]) / step).floor();
    (i.max(0.0) as usize).min(axis.len() - 2)
}

/// Locates the lower bracketing index on an irregular axis by bisection.
///
/// Handles both ascending axes (e.g. time series) and descending axes
/// (e.g. pressure levels ordered surface to model top).
///
/// # Panics
///
/// Panics in debug builds if the axis has fewer than two points.
pub fn locate_irr(axis: &[f64], x: f64) -> usize {
    debug_assert!(axis.len() >= 2);
    let ascending = axis[0] < axis[axis.len() - 1];

    let mut lo = 0;
    let mut hi = axis.len() - 1;
    while hi > lo + 1 {
        let mid = (lo + hi) / 2;
        let take_upper = if ascending {
            x >= axis[mid]
        } else {
            x <= axis[mid]
        };
        if take_upper {
            lo = mid;
        } else {
            hi = mid;
        }
    }
    lo
}

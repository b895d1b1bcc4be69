//! Small numeric helpers shared by the analysers.

/// Statistical median of `values`.
///
/// Even-length inputs yield the mean of the two middle values; an empty
/// input yields `0.0`.
///
/// # Examples
///
/// ```
/// use repowatch::analysis::median;
///
/// assert_eq!(median(&[7, 1, 5, 3]), 4.0);
/// assert_eq!(median(&[]), 0.0);
/// ```
#[must_use]
pub fn median(values: &[u64]) -> f64 {
    median_of(values.iter().copied().map(as_f64).collect())
}

#[expect(
    clippy::float_arithmetic,
    reason = "averaging the two middle values of an even-length sample"
)]
pub(crate) fn median_of(mut values: Vec<f64>) -> f64 {
    values.sort_by(f64::total_cmp);
    #[expect(clippy::integer_division, reason = "index of the upper middle element")]
    let middle = values.len() / 2;

    let upper = values.get(middle).copied();
    if values.len().is_multiple_of(2) {
        let lower = middle.checked_sub(1).and_then(|index| values.get(index)).copied();
        match (lower, upper) {
            (Some(low), Some(high)) => (low + high) / 2.0,
            _ => 0.0,
        }
    } else {
        upper.unwrap_or(0.0)
    }
}

/// Arithmetic mean of `total` over `count` items, `0.0` when there are none.
#[expect(clippy::float_arithmetic, reason = "ratio of two counts")]
pub(crate) fn mean(total: u64, count: u64) -> f64 {
    if count == 0 {
        0.0
    } else {
        as_f64(total) / as_f64(count)
    }
}

#[expect(
    clippy::cast_precision_loss,
    reason = "counts and durations stay far below 2^52"
)]
pub(crate) const fn as_f64(value: u64) -> f64 {
    value as f64
}

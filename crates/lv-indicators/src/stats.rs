//! Reporting statistics over optional values.
//!
//! Non-finite inputs are treated like nulls: dropped before computing.
//! Neither function ever returns NaN; an empty input yields `None`.

/// Arithmetic mean of the finite values.
pub fn mean<I: IntoIterator<Item = f64>>(values: I) -> Option<f64> {
    let (sum, n) = values
        .into_iter()
        .filter(|v| v.is_finite())
        .fold((0.0, 0usize), |(s, n), v| (s + v, n + 1));
    (n > 0).then(|| sum / n as f64)
}

/// Median of the finite values; the mean of the two middle elements for an
/// even count.
pub fn median<I: IntoIterator<Item = f64>>(values: I) -> Option<f64> {
    let mut v: Vec<f64> = values.into_iter().filter(|v| v.is_finite()).collect();
    if v.is_empty() {
        return None;
    }
    v.sort_by(f64::total_cmp);
    let mid = v.len() / 2;
    if v.len() % 2 == 0 {
        Some((v[mid - 1] + v[mid]) / 2.0)
    } else {
        Some(v[mid])
    }
}

//! NaN-aware statistics.
//!
//! Reference datasets may contain missing observations encoded as NaN;
//! mean metrics skip them rather than poisoning the aggregate.

/// Mean of the non-NaN values.
///
/// Returns NaN when the iterator yields no finite value, mirroring the
/// behaviour of NaN-skipping means in numerical libraries.
///
/// # Example
///
/// ```
/// use calib_core::math::nanmean;
///
/// let mean = nanmean([1.0, f64::NAN, 3.0].into_iter());
/// assert!((mean - 2.0).abs() < 1e-12);
/// ```
pub fn nanmean(values: impl Iterator<Item = f64>) -> f64 {
    let mut sum = 0.0;
    let mut count = 0usize;
    for value in values {
        if !value.is_nan() {
            sum += value;
            count += 1;
        }
    }
    if count == 0 {
        f64::NAN
    } else {
        sum / count as f64
    }
}

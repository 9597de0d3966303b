//! Small statistics helpers
//!
//! Every helper returns `NaN` for an empty population rather than panicking.
//! Downstream code treats a non-finite value as a degenerate input.

/// Ratio of two cell counts as a float
///
/// ```rust
/// # use grainkit_utils::ratio;
/// assert_eq!(ratio(1, 4), 0.25);
/// assert!(ratio(0, 0).is_nan());
/// ```
pub fn ratio(numerator: usize, denominator: usize) -> f64 {
    numerator as f64 / denominator as f64
}

/// Arithmetic mean of a slice of values
///
/// ```rust
/// # use grainkit_utils::mean;
/// assert_eq!(mean(&[1.0, 2.0, 3.0]), 2.0);
/// assert!(mean(&[]).is_nan());
/// ```
pub fn mean(values: &[f64]) -> f64 {
    values.iter().sum::<f64>() / values.len() as f64
}

/// Mean of `values` weighted by integer `weights`
///
/// Normalised by the sum of the weights, not the number of values.
///
/// ```rust
/// # use grainkit_utils::weighted_mean;
/// assert_eq!(weighted_mean(&[1.0, 4.0], &[3, 1]), 1.75);
/// ```
pub fn weighted_mean(values: &[f64], weights: &[usize]) -> f64 {
    let total: usize = weights.iter().sum();
    let sum: f64 = values
        .iter()
        .zip(weights)
        .map(|(v, w)| v * *w as f64)
        .sum();
    sum / total as f64
}

//! Statistical helpers computed application-side. SQLite has no STDDEV or
//! PERCENTILE aggregate, so z-scores and spread metrics for the analyst
//! views are derived here from plain count queries.

/// Arithmetic mean. Returns 0.0 for an empty slice.
pub fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

/// Population standard deviation. Returns 0.0 for an empty slice.
pub fn std_dev(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    let m = mean(values);
    let variance = values.iter().map(|v| (v - m).powi(2)).sum::<f64>() / values.len() as f64;
    variance.sqrt()
}

/// Median via [`percentile`] at p50.
pub fn median(values: &[f64]) -> f64 {
    percentile(values, 50.0)
}

/// Percentile with linear interpolation, `p` in [0, 100].
/// Returns 0.0 for an empty slice.
pub fn percentile(values: &[f64], p: f64) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
    let n = sorted.len();
    if n == 1 {
        return sorted[0];
    }
    let rank = p / 100.0 * (n - 1) as f64;
    let lower = rank.floor() as usize;
    let upper = rank.ceil() as usize;
    if lower == upper {
        sorted[lower]
    } else {
        let frac = rank - lower as f64;
        sorted[lower] * (1.0 - frac) + sorted[upper] * frac
    }
}

/// Z-score of each value against the slice's own mean and population
/// standard deviation. A zero spread yields all-zero scores rather than
/// NaN (uniform series have no outliers by definition).
pub fn z_scores(values: &[f64]) -> Vec<f64> {
    let m = mean(values);
    let sd = std_dev(values);
    values
        .iter()
        .map(|v| if sd == 0.0 { 0.0 } else { (v - m) / sd })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mean_empty() {
        assert_eq!(mean(&[]), 0.0);
    }

    #[test]
    fn test_mean_known() {
        assert!((mean(&[3.0, 5.0, 10.0]) - 6.0).abs() < 1e-10);
    }

    #[test]
    fn test_std_dev_empty_and_uniform() {
        assert_eq!(std_dev(&[]), 0.0);
        assert_eq!(std_dev(&[4.0, 4.0, 4.0]), 0.0);
    }

    #[test]
    fn test_std_dev_known() {
        // [2, 4, 4, 4, 5, 5, 7, 9]: mean 5, population std dev 2
        let vals = [2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0];
        assert!((std_dev(&vals) - 2.0).abs() < 1e-10);
    }

    #[test]
    fn test_median_odd_even() {
        assert!((median(&[9.0, 1.0, 5.0]) - 5.0).abs() < 1e-10);
        // Sorted [1, 3, 5, 9]: p50 interpolates to 4.0
        assert!((median(&[9.0, 1.0, 5.0, 3.0]) - 4.0).abs() < 1e-10);
    }

    #[test]
    fn test_percentile_p90() {
        let vals: Vec<f64> = (1..=10).map(|x| x as f64).collect();
        // rank 0.9 * 9 = 8.1, lerp(9, 10, 0.1) = 9.1
        assert!((percentile(&vals, 90.0) - 9.1).abs() < 1e-10);
    }

    #[test]
    fn test_z_scores_flags_outlier() {
        let scores = z_scores(&[10.0, 10.0, 10.0, 10.0, 30.0]);
        assert!(scores[4] > 1.9, "spike should score high, got {}", scores[4]);
        assert!(scores[0] < 0.0);
    }

    #[test]
    fn test_z_scores_uniform_is_zero() {
        assert!(z_scores(&[5.0, 5.0]).iter().all(|z| *z == 0.0));
    }
}

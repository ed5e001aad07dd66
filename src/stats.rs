//! Aggregation primitives for benchmark series
//!
//! Rates and per-operation costs are summarized with the harmonic mean,
//! following Smith (1988), so that the aggregate corresponds to running every
//! benchmark for the same amount of work. Speedup ratios use the geometric
//! mean (Fleming & Wallace 1986).
//!
//! ## Citations
//!
//! - Smith, J. E. (1988). "Characterizing Computer Performance with a Single
//!   Number." *Communications of the ACM*, 31(10), 1202-1206.
//! - Fleming, P. J., & Wallace, J. J. (1986). "How Not to Lie with
//!   Statistics." *Communications of the ACM*, 29(3), 218-221.

#![allow(clippy::cast_precision_loss)] // usize -> f64 sample counts

use crate::error::{NpbError, Result};

fn ensure_non_empty(metric: &str, values: &[f64]) -> Result<()> {
    if values.is_empty() {
        return Err(NpbError::EmptySample {
            metric: metric.to_string(),
        });
    }
    Ok(())
}

fn ensure_finite(metric: &str, values: &[f64]) -> Result<()> {
    match values.iter().find(|v| !v.is_finite()) {
        Some(&value) => Err(NpbError::InvalidValue {
            metric: metric.to_string(),
            value,
        }),
        None => Ok(()),
    }
}

/// Harmonic mean `n / Σ(1/x)`
///
/// Values must be non-negative. A zero anywhere in the series makes the
/// harmonic mean zero.
pub fn harmonic_mean(metric: &str, values: &[f64]) -> Result<f64> {
    ensure_non_empty(metric, values)?;
    ensure_finite(metric, values)?;

    if let Some(&value) = values.iter().find(|v| **v < 0.0) {
        return Err(NpbError::InvalidValue {
            metric: metric.to_string(),
            value,
        });
    }
    if values.iter().any(|v| *v == 0.0) {
        return Ok(0.0);
    }

    let reciprocal_sum: f64 = values.iter().map(|v| 1.0 / v).sum();
    Ok(values.len() as f64 / reciprocal_sum)
}

/// Arithmetic mean
pub fn arithmetic_mean(metric: &str, values: &[f64]) -> Result<f64> {
    ensure_non_empty(metric, values)?;
    ensure_finite(metric, values)?;
    Ok(values.iter().sum::<f64>() / values.len() as f64)
}

/// Geometric mean, computed in log space
///
/// Values must be strictly positive.
pub fn geometric_mean(metric: &str, values: &[f64]) -> Result<f64> {
    ensure_non_empty(metric, values)?;
    ensure_finite(metric, values)?;

    if let Some(&value) = values.iter().find(|v| **v <= 0.0) {
        return Err(NpbError::InvalidValue {
            metric: metric.to_string(),
            value,
        });
    }

    let log_mean = values.iter().map(|v| v.ln()).sum::<f64>() / values.len() as f64;
    Ok(log_mean.exp())
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f64 = 1e-9;

    #[test]
    fn test_harmonic_mean_known_values() {
        // 3 / (1 + 1/2 + 1/4) = 12/7
        let m = harmonic_mean("x", &[1.0, 2.0, 4.0]).unwrap();
        assert!((m - 12.0 / 7.0).abs() < EPS);
    }

    #[test]
    fn test_harmonic_mean_single_value() {
        assert!((harmonic_mean("x", &[42.5]).unwrap() - 42.5).abs() < EPS);
    }

    #[test]
    fn test_harmonic_mean_zero_collapses() {
        assert_eq!(harmonic_mean("x", &[3.0, 0.0, 5.0]).unwrap(), 0.0);
    }

    #[test]
    fn test_harmonic_mean_rejects_negative() {
        let err = harmonic_mean("cmp_power_w", &[3.0, -1.0]).unwrap_err();
        match err {
            NpbError::InvalidValue { metric, value } => {
                assert_eq!(metric, "cmp_power_w");
                assert_eq!(value, -1.0);
            },
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_harmonic_mean_rejects_nan() {
        assert!(harmonic_mean("x", &[1.0, f64::NAN]).is_err());
    }

    #[test]
    fn test_empty_series_errors() {
        assert!(matches!(
            harmonic_mean("x", &[]),
            Err(NpbError::EmptySample { .. })
        ));
        assert!(matches!(
            arithmetic_mean("x", &[]),
            Err(NpbError::EmptySample { .. })
        ));
        assert!(matches!(
            geometric_mean("x", &[]),
            Err(NpbError::EmptySample { .. })
        ));
    }

    #[test]
    fn test_arithmetic_mean_allows_negative() {
        let m = arithmetic_mean("cmp_power_w", &[-10.0, 30.0]).unwrap();
        assert!((m - 10.0).abs() < EPS);
    }

    #[test]
    fn test_geometric_mean_known_values() {
        let m = geometric_mean("speedup", &[2.0, 8.0]).unwrap();
        assert!((m - 4.0).abs() < EPS);
    }

    #[test]
    fn test_geometric_mean_rejects_zero() {
        assert!(geometric_mean("speedup", &[2.0, 0.0]).is_err());
    }

    #[test]
    fn test_mean_ordering() {
        let values = [1.5, 3.0, 7.25, 10.0];
        let h = harmonic_mean("x", &values).unwrap();
        let g = geometric_mean("x", &values).unwrap();
        let a = arithmetic_mean("x", &values).unwrap();
        assert!(h <= g && g <= a);
    }
}

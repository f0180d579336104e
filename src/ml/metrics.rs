// file: src/ml/metrics.rs
// description: regression evaluation metrics
// reference: internal evaluation rules

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RegressionMetrics {
    pub rmse: f64,
    pub mae: f64,
    pub r2: f64,
}

impl RegressionMetrics {
    pub fn evaluate(y_pred: &[f64], y_true: &[f64]) -> Self {
        Self {
            rmse: rmse(y_pred, y_true),
            mae: mae(y_pred, y_true),
            r2: r_squared(y_pred, y_true),
        }
    }
}

pub fn mse(y_pred: &[f64], y_true: &[f64]) -> f64 {
    if y_true.is_empty() {
        return 0.0;
    }
    y_true
        .iter()
        .zip(y_pred)
        .map(|(t, p)| (t - p).powi(2))
        .sum::<f64>()
        / y_true.len() as f64
}

pub fn rmse(y_pred: &[f64], y_true: &[f64]) -> f64 {
    mse(y_pred, y_true).sqrt()
}

pub fn mae(y_pred: &[f64], y_true: &[f64]) -> f64 {
    if y_true.is_empty() {
        return 0.0;
    }
    y_true
        .iter()
        .zip(y_pred)
        .map(|(t, p)| (t - p).abs())
        .sum::<f64>()
        / y_true.len() as f64
}

/// 0.0 when the target is constant.
pub fn r_squared(y_pred: &[f64], y_true: &[f64]) -> f64 {
    if y_true.is_empty() {
        return 0.0;
    }
    let mean = y_true.iter().sum::<f64>() / y_true.len() as f64;
    let ss_res: f64 = y_true.iter().zip(y_pred).map(|(t, p)| (t - p).powi(2)).sum();
    let ss_tot: f64 = y_true.iter().map(|t| (t - mean).powi(2)).sum();

    if ss_tot == 0.0 {
        return 0.0;
    }
    1.0 - ss_res / ss_tot
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_perfect_prediction() {
        let y = [1.0, 2.0, 3.0];
        let metrics = RegressionMetrics::evaluate(&y, &y);
        assert_eq!(metrics.rmse, 0.0);
        assert_eq!(metrics.mae, 0.0);
        assert_eq!(metrics.r2, 1.0);
    }

    #[test]
    fn test_known_errors() {
        let y_true = [3.0, -0.5, 2.0, 7.0];
        let y_pred = [2.5, 0.0, 2.0, 8.0];

        assert!((mse(&y_pred, &y_true) - 0.375).abs() < 1e-12);
        assert!((mae(&y_pred, &y_true) - 0.5).abs() < 1e-12);
        assert!((r_squared(&y_pred, &y_true) - 0.948_608_137).abs() < 1e-6);
    }

    #[test]
    fn test_constant_target() {
        assert_eq!(r_squared(&[1.0, 2.0], &[5.0, 5.0]), 0.0);
    }
}

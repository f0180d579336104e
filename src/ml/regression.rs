// file: src/ml/regression.rs
// description: ridge-penalized least squares via normal equations and Cholesky
// reference: https://docs.rs/ndarray

use crate::error::{AdvisorError, Result};
use ndarray::{Array1, Array2, Axis};
use serde::{Deserialize, Serialize};

/// Keeps the unpenalized system solvable when indicator columns are
/// collinear (every locality belongs to exactly one city).
pub const MIN_PENALTY: f64 = 1e-8;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LinearFit {
    pub coefficients: Vec<f64>,
    pub intercept: f64,
}

impl LinearFit {
    pub fn predict_row(&self, features: &[f64]) -> f64 {
        self.intercept
            + self
                .coefficients
                .iter()
                .zip(features)
                .map(|(c, x)| c * x)
                .sum::<f64>()
    }

    pub fn predict(&self, x: &Array2<f64>) -> Vec<f64> {
        x.rows()
            .into_iter()
            .map(|row| {
                self.intercept
                    + self
                        .coefficients
                        .iter()
                        .zip(row.iter())
                        .map(|(c, x)| c * x)
                        .sum::<f64>()
            })
            .collect()
    }
}

/// Solves `(Zᵀ Z + alpha I) w = Zᵀ (y - ȳ)` on standardized columns `Z`,
/// then maps `w` back to the original feature scale.
pub fn fit_ridge(x: &Array2<f64>, y: &Array1<f64>, alpha: f64) -> Result<LinearFit> {
    let (n, p) = x.dim();
    if n == 0 || n != y.len() {
        return Err(AdvisorError::Model(format!(
            "Cannot fit {} rows against {} targets",
            n,
            y.len()
        )));
    }

    let means = x
        .mean_axis(Axis(0))
        .ok_or_else(|| AdvisorError::Model("Empty feature matrix".to_string()))?;
    let scales = x
        .std_axis(Axis(0), 0.0)
        .mapv(|s| if s > 0.0 { s } else { 1.0 });
    let y_mean = y.mean().unwrap_or(0.0);

    let z = (x - &means) / &scales;
    let y_centered = y - y_mean;

    let mut gram = z.t().dot(&z);
    let penalty = alpha.max(MIN_PENALTY);
    for i in 0..p {
        gram[[i, i]] += penalty;
    }
    let rhs = z.t().dot(&y_centered);

    let weights = cholesky_solve(&gram, &rhs)?;
    let coefficients: Vec<f64> = weights
        .iter()
        .zip(scales.iter())
        .map(|(w, s)| w / s)
        .collect();
    let intercept = y_mean
        - coefficients
            .iter()
            .zip(means.iter())
            .map(|(c, m)| c * m)
            .sum::<f64>();

    Ok(LinearFit {
        coefficients,
        intercept,
    })
}

/// `A = L Lᵀ`, then forward and backward substitution.
pub fn cholesky_solve(a: &Array2<f64>, b: &Array1<f64>) -> Result<Array1<f64>> {
    let n = a.nrows();
    if a.ncols() != n || b.len() != n {
        return Err(AdvisorError::Model(
            "Cholesky solve needs a square matrix matching the right-hand side".to_string(),
        ));
    }

    let mut l = Array2::<f64>::zeros((n, n));
    for i in 0..n {
        for j in 0..=i {
            let sum: f64 = (0..j).map(|k| l[[i, k]] * l[[j, k]]).sum();
            if i == j {
                let diag = a[[i, i]] - sum;
                if diag <= 0.0 {
                    return Err(AdvisorError::Model(
                        "Matrix is not positive definite".to_string(),
                    ));
                }
                l[[i, i]] = diag.sqrt();
            } else {
                l[[i, j]] = (a[[i, j]] - sum) / l[[j, j]];
            }
        }
    }

    let mut y = Array1::<f64>::zeros(n);
    for i in 0..n {
        let sum: f64 = (0..i).map(|j| l[[i, j]] * y[j]).sum();
        y[i] = (b[i] - sum) / l[[i, i]];
    }

    let mut x = Array1::<f64>::zeros(n);
    for i in (0..n).rev() {
        let sum: f64 = (i + 1..n).map(|j| l[[j, i]] * x[j]).sum();
        x[i] = (y[i] - sum) / l[[i, i]];
    }

    Ok(x)
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn test_cholesky_solve() {
        let a = array![[4.0, 2.0], [2.0, 3.0]];
        let b = array![2.0, 1.0];
        let x = cholesky_solve(&a, &b).unwrap();

        assert!((x[0] - 0.5).abs() < 1e-12);
        assert!(x[1].abs() < 1e-12);
    }

    #[test]
    fn test_cholesky_rejects_indefinite() {
        let a = array![[1.0, 2.0], [2.0, 1.0]];
        assert!(cholesky_solve(&a, &array![1.0, 1.0]).is_err());
    }

    #[test]
    fn test_unpenalized_fit_recovers_exact_line() {
        let x = array![[1.0, 0.0], [2.0, 1.0], [3.0, 0.0], [4.0, 1.0], [5.0, 0.0]];
        let y: Array1<f64> = x.rows().into_iter().map(|r| 3.0 * r[0] - 2.0 * r[1] + 10.0).collect();

        let fit = fit_ridge(&x, &y, 0.0).unwrap();
        assert!((fit.coefficients[0] - 3.0).abs() < 1e-5);
        assert!((fit.coefficients[1] + 2.0).abs() < 1e-5);
        assert!((fit.intercept - 10.0).abs() < 1e-4);
        assert!((fit.predict_row(&[6.0, 1.0]) - 26.0).abs() < 1e-4);
    }

    #[test]
    fn test_penalty_shrinks_coefficients() {
        let x = array![[1.0], [2.0], [3.0], [4.0]];
        let y = array![2.0, 4.0, 6.0, 8.0];

        let plain = fit_ridge(&x, &y, 0.0).unwrap();
        let ridge = fit_ridge(&x, &y, 10.0).unwrap();
        assert!(ridge.coefficients[0].abs() < plain.coefficients[0].abs());
    }

    #[test]
    fn test_collinear_columns_still_solve() {
        // third column is the sum of the first two
        let x = array![
            [1.0, 0.0, 1.0],
            [0.0, 1.0, 1.0],
            [1.0, 0.0, 1.0],
            [0.0, 0.0, 0.0]
        ];
        let y = array![5.0, 3.0, 5.0, 1.0];

        let fit = fit_ridge(&x, &y, 0.0).unwrap();
        let predictions = fit.predict(&x);
        assert!((predictions[0] - 5.0).abs() < 1e-3);
        assert!((predictions[3] - 1.0).abs() < 1e-3);
    }
}

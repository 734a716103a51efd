// 📈 Ordinary least-squares linear regression
// Fit with an intercept on centered data; rank-deficient inputs get the
// minimum-norm solution through the SVD pseudo-inverse

use crate::error::{Error, Result};
use crate::metrics::{self, RegressionMetrics};
use nalgebra::{DMatrix, DVector};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LinearRegression {
    pub intercept: f64,
    pub coefficients: Vec<f64>,
}

impl LinearRegression {
    /// Fit `y ≈ intercept + X·coefficients` by least squares.
    pub fn fit(x: &[Vec<f64>], y: &[f64]) -> Result<Self> {
        let n = x.len();
        if n == 0 {
            return Err(Error::Fit("no training rows".to_string()));
        }
        if y.len() != n {
            return Err(Error::Fit(format!("{} rows but {} targets", n, y.len())));
        }

        let p = x[0].len();
        if let Some((i, row)) = x.iter().enumerate().find(|(_, row)| row.len() != p) {
            return Err(Error::Fit(format!(
                "row {} has {} features, expected {}",
                i,
                row.len(),
                p
            )));
        }
        if x.iter().flatten().chain(y).any(|v| !v.is_finite()) {
            return Err(Error::Fit("training data contains non-finite values".to_string()));
        }

        let y_mean = y.iter().sum::<f64>() / n as f64;
        if p == 0 {
            return Ok(LinearRegression {
                intercept: y_mean,
                coefficients: Vec::new(),
            });
        }

        let x_mean: Vec<f64> = (0..p)
            .map(|j| x.iter().map(|row| row[j]).sum::<f64>() / n as f64)
            .collect();

        let xc = DMatrix::from_fn(n, p, |i, j| x[i][j] - x_mean[j]);
        let yc = DVector::from_iterator(n, y.iter().map(|v| v - y_mean));

        let svd = xc.svd(true, true);
        let max_sv = svd.singular_values.iter().cloned().fold(0.0, f64::max);
        let eps = f64::EPSILON * n.max(p) as f64 * max_sv;

        let beta = svd.solve(&yc, eps).map_err(|e| Error::Fit(e.to_string()))?;
        let coefficients: Vec<f64> = beta.iter().cloned().collect();

        let intercept = y_mean
            - coefficients
                .iter()
                .zip(&x_mean)
                .map(|(b, m)| b * m)
                .sum::<f64>();

        log::debug!("fitted OLS on {} rows x {} features", n, p);

        Ok(LinearRegression {
            intercept,
            coefficients,
        })
    }

    pub fn n_features(&self) -> usize {
        self.coefficients.len()
    }

    /// Point estimate for one encoded row.
    pub fn predict(&self, features: &[f64]) -> Result<f64> {
        if features.len() != self.coefficients.len() {
            return Err(Error::Prediction(format!(
                "expected {} features, got {}",
                self.coefficients.len(),
                features.len()
            )));
        }

        let value = self.intercept
            + self
                .coefficients
                .iter()
                .zip(features)
                .map(|(b, x)| b * x)
                .sum::<f64>();

        if !value.is_finite() {
            return Err(Error::Prediction(format!(
                "non-finite estimate ({}), check input magnitudes",
                value
            )));
        }

        Ok(value)
    }

    pub fn predict_batch(&self, rows: &[Vec<f64>]) -> Result<Vec<f64>> {
        rows.iter().map(|row| self.predict(row)).collect()
    }

    /// R² and RMSE on held-out rows.
    pub fn evaluate(&self, x: &[Vec<f64>], y: &[f64]) -> Result<RegressionMetrics> {
        let predictions = self.predict_batch(x)?;
        Ok(metrics::evaluate(&predictions, y))
    }
}

// 📊 Regression metrics for the offline training report

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RegressionMetrics {
    pub r2: f64,
    pub rmse: f64,
}

/// Root mean squared error: sqrt(mean((pred - label)²))
///
/// Returns 0.0 for empty input.
pub fn rmse(predictions: &[f64], labels: &[f64]) -> f64 {
    if predictions.is_empty() {
        return 0.0;
    }

    let mse = predictions
        .iter()
        .zip(labels)
        .map(|(p, l)| {
            let diff = p - l;
            diff * diff
        })
        .sum::<f64>()
        / predictions.len() as f64;

    mse.sqrt()
}

/// Coefficient of determination: 1 - SS_res / SS_tot
///
/// When the labels are constant SS_tot is zero; a perfect fit then scores
/// 1.0 and anything else 0.0.
pub fn r2_score(predictions: &[f64], labels: &[f64]) -> f64 {
    if labels.is_empty() {
        return 0.0;
    }

    let mean = labels.iter().sum::<f64>() / labels.len() as f64;
    let ss_tot: f64 = labels.iter().map(|l| (l - mean) * (l - mean)).sum();
    let ss_res: f64 = predictions
        .iter()
        .zip(labels)
        .map(|(p, l)| (l - p) * (l - p))
        .sum();

    if ss_tot == 0.0 {
        return if ss_res == 0.0 { 1.0 } else { 0.0 };
    }

    1.0 - ss_res / ss_tot
}

pub fn evaluate(predictions: &[f64], labels: &[f64]) -> RegressionMetrics {
    RegressionMetrics {
        r2: r2_score(predictions, labels),
        rmse: rmse(predictions, labels),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rmse_known_values() {
        let preds = [1.0, 2.0, 3.0];
        let labels = [1.0, 2.0, 5.0];
        // sqrt(4 / 3)
        assert!((rmse(&preds, &labels) - (4.0f64 / 3.0).sqrt()).abs() < 1e-12);
        assert_eq!(rmse(&[], &[]), 0.0);
    }

    #[test]
    fn test_r2_perfect_and_mean_predictor() {
        let labels = [1.0, 2.0, 3.0, 4.0];
        assert!((r2_score(&labels, &labels) - 1.0).abs() < 1e-12);

        let mean_preds = [2.5; 4];
        assert!(r2_score(&mean_preds, &labels).abs() < 1e-12, "Mean predictor scores zero");
    }

    #[test]
    fn test_r2_constant_labels() {
        assert_eq!(r2_score(&[3.0, 3.0], &[3.0, 3.0]), 1.0);
        assert_eq!(r2_score(&[2.0, 4.0], &[3.0, 3.0]), 0.0);
    }
}

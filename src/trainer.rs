// 🏋️ Trainer
// CSV -> one-hot encoding -> train/test split -> OLS -> metrics -> artifact + report

use crate::artifact::{self, ModelArtifact};
use crate::config::Config;
use crate::encoder::fit_encoding;
use crate::error::{Error, Result};
use crate::metrics::RegressionMetrics;
use crate::model::LinearRegression;
use crate::record::{load_csv, Dataset, DatasetSchema};
use chrono::{DateTime, Utc};
use rand::seq::SliceRandom;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use uuid::Uuid;

// ============================================================================
// TRAINING REPORT
// ============================================================================

/// Summary of one training run, written next to the artifact.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrainingReport {
    pub run_id: Uuid,
    pub trained_at: DateTime<Utc>,
    pub rows_used: usize,
    pub rows_dropped: usize,
    pub rows_train: usize,
    pub rows_test: usize,
    pub metrics: RegressionMetrics,
    pub feature_names: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub artifact_path: Option<PathBuf>,
}

pub struct TrainingOutcome {
    pub artifact: ModelArtifact,
    pub report: TrainingReport,
}

// ============================================================================
// SPLIT
// ============================================================================

/// Shuffle `0..n` with `seed` and hold out `ceil(n * test_size)` indices.
/// At least one row always stays in the training half.
pub fn train_test_split(n: usize, test_size: f64, seed: u64) -> (Vec<usize>, Vec<usize>) {
    let mut indices: Vec<usize> = (0..n).collect();
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    indices.shuffle(&mut rng);

    let n_test = ((n as f64 * test_size).ceil() as usize).min(n.saturating_sub(1));
    let train = indices.split_off(n_test);

    (train, indices)
}

// ============================================================================
// TRAINING RUN
// ============================================================================

/// Encode, split, fit and evaluate an in-memory dataset. No I/O.
pub fn fit_dataset(
    dataset: &Dataset,
    schema: &DatasetSchema,
    test_size: f64,
    seed: u64,
) -> Result<TrainingOutcome> {
    if dataset.len() < 2 {
        return Err(Error::Dataset(format!(
            "need at least 2 complete rows to train, got {}",
            dataset.len()
        )));
    }

    let (table, feature_names) =
        fit_encoding(&dataset.columns, &dataset.records, &schema.categorical)?;

    let (train_idx, test_idx) = train_test_split(table.n_rows(), test_size, seed);
    let pick = |indices: &[usize]| -> Vec<f64> {
        indices.iter().map(|&i| dataset.targets[i]).collect()
    };

    let x_train = table.select(&train_idx);
    let y_train = pick(&train_idx);
    let x_test = table.select(&test_idx);
    let y_test = pick(&test_idx);

    log::info!(
        "training on {} rows, evaluating on {} rows, {} features",
        x_train.len(),
        x_test.len(),
        table.n_features()
    );

    let model = LinearRegression::fit(&x_train, &y_train)?;
    let metrics = model.evaluate(&x_test, &y_test)?;

    let report = TrainingReport {
        run_id: Uuid::new_v4(),
        trained_at: Utc::now(),
        rows_used: dataset.len(),
        rows_dropped: dataset.dropped_rows,
        rows_train: x_train.len(),
        rows_test: x_test.len(),
        metrics,
        feature_names: feature_names.clone(),
        artifact_path: None,
    };

    Ok(TrainingOutcome {
        artifact: ModelArtifact::new(model, feature_names)?,
        report,
    })
}

/// Full offline run: read `config.data_path`, train, persist the artifact
/// and the report.
pub fn train(config: &Config) -> Result<TrainingOutcome> {
    config.validate()?;

    let schema = DatasetSchema::default();
    let dataset = load_csv(&config.data_path, &schema)?;

    let mut outcome = fit_dataset(&dataset, &schema, config.test_size, config.seed)?;

    artifact::save(&outcome.artifact, &config.artifact_path)?;
    outcome.report.artifact_path = Some(config.artifact_path.clone());
    write_report(&outcome.report, &config.report_path())?;

    log::info!(
        "run {} finished: r2={:.4} rmse={:.2}",
        outcome.report.run_id,
        outcome.report.metrics.r2,
        outcome.report.metrics.rmse
    );

    Ok(outcome)
}

pub fn write_report(report: &TrainingReport, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, serde_json::to_vec_pretty(report)?)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::form::{FurnishingStatus, HouseInput, YesNo};
    use crate::predictor::Predictor;
    use crate::record::read_csv;
    use std::collections::HashSet;

    /// Synthetic housing file with a known linear price rule
    fn housing_csv(rows: usize) -> String {
        let mut csv = String::from(
            "price,area,bedrooms,bathrooms,stories,mainroad,guestroom,basement,\
hotwaterheating,airconditioning,parking,prefarea,furnishingstatus\n",
        );
        let furnishing = ["furnished", "semi-furnished", "unfurnished"];

        // Fixed LCG: reproducible rows, full-rank design matrix
        let mut state: u64 = 0x2545_F491_4F6C_DD1D;
        let mut next = |m: u64| {
            state = state
                .wrapping_mul(6364136223846793005)
                .wrapping_add(1442695040888963407);
            (state >> 33) % m
        };

        for _ in 0..rows {
            let area = 2000 + next(60) * 100;
            let bedrooms = 1 + next(5);
            let bathrooms = 1 + next(4);
            let stories = 1 + next(4);
            let parking = next(4);
            let flags: Vec<&str> = (0..6)
                .map(|_| if next(2) == 0 { "yes" } else { "no" })
                .collect();
            let f = furnishing[next(3) as usize];

            let mut price = 500_000.0
                + 300.0 * area as f64
                + 150_000.0 * bedrooms as f64
                + 400_000.0 * bathrooms as f64
                + 200_000.0 * stories as f64
                + 100_000.0 * parking as f64;
            if flags[0] == "yes" {
                price += 250_000.0;
            }
            if flags[4] == "yes" {
                price += 600_000.0;
            }
            if f == "unfurnished" {
                price -= 350_000.0;
            }

            csv.push_str(&format!(
                "{},{},{},{},{},{},{},{},{},{},{},{},{}\n",
                price,
                area,
                bedrooms,
                bathrooms,
                stories,
                flags[0],
                flags[1],
                flags[2],
                flags[3],
                flags[4],
                parking,
                flags[5],
                f
            ));
        }
        csv
    }

    #[test]
    fn test_split_sizes_and_disjoint() {
        let (train, test) = train_test_split(10, 0.2, 42);
        assert_eq!(test.len(), 2);
        assert_eq!(train.len(), 8);

        let all: HashSet<usize> = train.iter().chain(&test).cloned().collect();
        assert_eq!(all.len(), 10, "Every row lands in exactly one half");
    }

    #[test]
    fn test_split_deterministic_for_seed() {
        assert_eq!(train_test_split(50, 0.2, 42), train_test_split(50, 0.2, 42));
        assert_ne!(train_test_split(50, 0.2, 42), train_test_split(50, 0.2, 7));
    }

    #[test]
    fn test_split_keeps_a_training_row() {
        let (train, test) = train_test_split(2, 0.9, 1);
        assert_eq!(train.len(), 1);
        assert_eq!(test.len(), 1);
    }

    #[test]
    fn test_fit_dataset_recovers_linear_rule() {
        let schema = DatasetSchema::default();
        let dataset = read_csv(housing_csv(120).as_bytes(), &schema).unwrap();

        let outcome = fit_dataset(&dataset, &schema, 0.2, 42).unwrap();

        // 5 numeric + 6 binary + (3 - 1)
        assert_eq!(outcome.artifact.feature_names().len(), 13);
        assert_eq!(outcome.report.rows_test, 24);
        assert_eq!(outcome.report.rows_train, 96);
        assert!(outcome.report.metrics.r2 > 0.999, "r2 = {}", outcome.report.metrics.r2);
    }

    #[test]
    fn test_fit_dataset_needs_rows() {
        let schema = DatasetSchema::default();
        let dataset = read_csv(housing_csv(1).as_bytes(), &schema).unwrap();
        assert!(matches!(fit_dataset(&dataset, &schema, 0.2, 42), Err(Error::Dataset(_))));
    }

    #[test]
    fn test_train_save_load_predict_end_to_end() {
        let dir = std::env::temp_dir().join(format!("house-price-train-{}", Uuid::new_v4()));
        fs::create_dir_all(&dir).unwrap();
        let data_path = dir.join("Housing.csv");
        fs::write(&data_path, housing_csv(120)).unwrap();

        let config = Config {
            data_path,
            artifact_path: dir.join("models").join("house_price_model.json"),
            ..Config::default()
        };

        let outcome = train(&config).unwrap();
        assert!(config.artifact_path.exists());
        assert!(config.report_path().exists());

        let predictor = Predictor::load(&config.artifact_path).unwrap();
        assert_eq!(predictor.feature_names(), outcome.artifact.feature_names());

        let input = HouseInput {
            area: 3000.0,
            bedrooms: 3,
            bathrooms: 2,
            stories: 2,
            parking: 1,
            mainroad: YesNo::Yes,
            guestroom: YesNo::No,
            basement: YesNo::No,
            hotwaterheating: YesNo::No,
            airconditioning: YesNo::Yes,
            prefarea: YesNo::No,
            furnishingstatus: FurnishingStatus::Unfurnished,
        };
        let expected = 500_000.0
            + 300.0 * 3000.0
            + 150_000.0 * 3.0
            + 400_000.0 * 2.0
            + 200_000.0 * 2.0
            + 100_000.0
            + 250_000.0
            + 600_000.0
            - 350_000.0;

        let estimate = predictor.estimate(&input).unwrap();
        assert!(
            (estimate.price - expected).abs() < 1.0,
            "Expected {}, got {}",
            expected,
            estimate.price
        );

        let in_memory = outcome
            .artifact
            .model()
            .predict(&crate::encoder::encode_for_inference(
                &input.to_record(),
                outcome.artifact.feature_names(),
            )
            .unwrap())
            .unwrap();
        assert_eq!(estimate.price, in_memory, "Reloaded artifact predicts identically");

        fs::remove_dir_all(&dir).ok();
    }
}

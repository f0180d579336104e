// file: src/ml/trainer.rs
// description: seeded train/test split, candidate fitting, ranking and artifact output
// reference: https://docs.rs/ndarray

use crate::error::{AdvisorError, Result};
use crate::ml::features::{FeatureInput, FeatureSpec};
use crate::ml::metrics::RegressionMetrics;
use crate::ml::model::{ModelKind, PriceModel};
use crate::ml::regression::fit_ridge;
use crate::models::PropertyRecord;
use crate::utils::OperationTimer;
use chrono::Utc;
use ndarray::Array1;
use rand::SeedableRng;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

pub struct Trainer {
    test_fraction: f64,
    seed: u64,
}

/// Candidates ranked by test R², best first.
#[derive(Debug, Clone)]
pub struct TrainingOutcome {
    pub models: Vec<PriceModel>,
}

#[derive(Debug, Serialize)]
struct ComparisonRow<'a> {
    #[serde(rename = "Model")]
    model: &'a str,
    #[serde(rename = "RMSE")]
    rmse: f64,
    #[serde(rename = "MAE")]
    mae: f64,
    #[serde(rename = "R2")]
    r2: f64,
}

impl TrainingOutcome {
    pub fn best(&self) -> Option<&PriceModel> {
        self.models.first()
    }

    /// Writes `<Name>.json` per candidate, the best model under `best_path`
    /// and the comparison table as csv.
    pub fn save(
        &self,
        model_dir: &Path,
        best_path: &Path,
        comparison_path: &Path,
    ) -> Result<Vec<PathBuf>> {
        let best = self
            .best()
            .ok_or_else(|| AdvisorError::Model("No trained models to save".to_string()))?;

        let mut written = Vec::new();
        for model in &self.models {
            let path = model_dir.join(format!("{}.json", model.name()));
            model.save(&path)?;
            written.push(path);
        }

        best.save(best_path)?;
        written.push(best_path.to_path_buf());

        if let Some(parent) = comparison_path.parent() {
            fs::create_dir_all(parent).map_err(|e| AdvisorError::file(parent, e))?;
        }
        let mut writer = csv::Writer::from_path(comparison_path)?;
        for model in &self.models {
            writer.serialize(ComparisonRow {
                model: model.name(),
                rmse: model.metrics.rmse,
                mae: model.metrics.mae,
                r2: model.metrics.r2,
            })?;
        }
        writer
            .flush()
            .map_err(|e| AdvisorError::file(comparison_path, e))?;
        written.push(comparison_path.to_path_buf());

        info!(
            "Saved {} models; best is {} (R2 {:.4})",
            self.models.len(),
            best.name(),
            best.metrics.r2
        );
        Ok(written)
    }
}

impl Trainer {
    pub fn new(test_fraction: f64, seed: u64) -> Self {
        Self {
            test_fraction,
            seed,
        }
    }

    pub fn train(&self, records: &[PropertyRecord]) -> Result<TrainingOutcome> {
        let timer = OperationTimer::new("train price models");
        let (train, test) = self.split(records)?;

        let train_inputs: Vec<FeatureInput> =
            train.iter().map(|r| FeatureInput::from_record(r)).collect();
        let test_inputs: Vec<FeatureInput> =
            test.iter().map(|r| FeatureInput::from_record(r)).collect();
        let train_prices: Vec<f64> = train.iter().map(|r| r.price_per_sqft).collect();
        let test_prices: Vec<f64> = test.iter().map(|r| r.price_per_sqft).collect();

        let features = FeatureSpec::fit(&train_inputs);
        let x_train = features.encode_matrix(&train_inputs);

        let mut models = Vec::with_capacity(ModelKind::ALL.len());
        for kind in ModelKind::ALL {
            let target = kind.target();
            if train_prices.iter().any(|&p| !target.forward(p).is_finite()) {
                return Err(AdvisorError::Model(format!(
                    "{} needs strictly positive prices",
                    kind.name()
                )));
            }

            let y_train: Array1<f64> = train_prices.iter().map(|&p| target.forward(p)).collect();
            let fit = fit_ridge(&x_train, &y_train, kind.alpha())?;

            let mut model = PriceModel {
                kind,
                features: features.clone(),
                fit,
                target,
                metrics: RegressionMetrics {
                    rmse: 0.0,
                    mae: 0.0,
                    r2: 0.0,
                },
                train_rows: train.len(),
                test_rows: test.len(),
                trained_at: Utc::now(),
            };

            let predictions: Vec<f64> = test_inputs.iter().map(|i| model.predict(i)).collect();
            model.metrics = RegressionMetrics::evaluate(&predictions, &test_prices);

            info!(
                "{}: RMSE {:.2}, MAE {:.2}, R2 {:.4}",
                kind.name(),
                model.metrics.rmse,
                model.metrics.mae,
                model.metrics.r2
            );
            models.push(model);
        }

        models.sort_by(|a, b| b.metrics.r2.total_cmp(&a.metrics.r2));
        timer.finish_with_count(records.len(), "rows");

        Ok(TrainingOutcome { models })
    }

    fn split<'a>(
        &self,
        records: &'a [PropertyRecord],
    ) -> Result<(Vec<&'a PropertyRecord>, Vec<&'a PropertyRecord>)> {
        if !(self.test_fraction > 0.0 && self.test_fraction < 1.0) {
            return Err(AdvisorError::Validation(format!(
                "test fraction must be in (0, 1), got {}",
                self.test_fraction
            )));
        }

        let n = records.len();
        let n_test = ((n as f64) * self.test_fraction).round() as usize;
        if n_test == 0 || n_test >= n {
            return Err(AdvisorError::Validation(format!(
                "{} rows are too few for a {:.0}% test split",
                n,
                self.test_fraction * 100.0
            )));
        }

        let mut indices: Vec<usize> = (0..n).collect();
        indices.shuffle(&mut StdRng::seed_from_u64(self.seed));

        let test = indices[..n_test].iter().map(|&i| &records[i]).collect();
        let train = indices[n_test..].iter().map(|&i| &records[i]).collect();
        Ok((train, test))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::DatasetGenerator;
    use tempfile::TempDir;

    #[test]
    fn test_candidates_ranked_by_r2() {
        let records = DatasetGenerator::new(12, 42).generate();
        let outcome = Trainer::new(0.2, 42).train(&records).unwrap();

        assert_eq!(outcome.models.len(), 3);
        for pair in outcome.models.windows(2) {
            assert!(pair[0].metrics.r2 >= pair[1].metrics.r2);
        }
        assert!(outcome.best().unwrap().metrics.r2 > 0.5);
    }

    #[test]
    fn test_split_sizes() {
        let records = DatasetGenerator::new(2, 1).generate();
        let (train, test) = Trainer::new(0.2, 42).split(&records).unwrap();

        assert_eq!(train.len() + test.len(), records.len());
        assert_eq!(test.len(), ((records.len() as f64) * 0.2).round() as usize);
    }

    #[test]
    fn test_too_few_rows() {
        let records = DatasetGenerator::new(1, 1).generate();
        assert!(Trainer::new(0.2, 42).train(&records[..2]).is_err());
        assert!(Trainer::new(0.0, 42).train(&records).is_err());
    }

    #[test]
    fn test_save_writes_models_and_comparison() {
        let temp = TempDir::new().unwrap();
        let records = DatasetGenerator::new(6, 3).generate();
        let outcome = Trainer::new(0.2, 42).train(&records).unwrap();

        let best_path = temp.path().join("models/best_price_model.json");
        let comparison = temp.path().join("reports/model_comparison.csv");
        let written = outcome
            .save(&temp.path().join("models"), &best_path, &comparison)
            .unwrap();

        assert_eq!(written.len(), 5);
        assert!(temp.path().join("models/Ridge_Regression.json").exists());

        let best = PriceModel::load(&best_path).unwrap();
        assert_eq!(best.kind, outcome.best().unwrap().kind);

        let csv = fs::read_to_string(comparison).unwrap();
        assert!(csv.starts_with("Model,RMSE,MAE,R2\n"));
        assert_eq!(csv.lines().count(), 4);
    }
}

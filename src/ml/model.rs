// file: src/ml/model.rs
// description: serialized price-per-sqft model with its feature layout and test metrics
// reference: https://docs.rs/serde_json

use crate::error::Result;
use crate::exporter::JsonExporter;
use crate::ml::features::{FeatureInput, FeatureSpec};
use crate::ml::metrics::RegressionMetrics;
use crate::ml::regression::LinearFit;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ModelKind {
    #[serde(rename = "Linear_Regression")]
    Linear,
    #[serde(rename = "Ridge_Regression")]
    Ridge,
    #[serde(rename = "Log_Ridge_Regression")]
    LogRidge,
}

impl ModelKind {
    pub const ALL: [ModelKind; 3] = [ModelKind::Linear, ModelKind::Ridge, ModelKind::LogRidge];

    pub fn name(self) -> &'static str {
        match self {
            ModelKind::Linear => "Linear_Regression",
            ModelKind::Ridge => "Ridge_Regression",
            ModelKind::LogRidge => "Log_Ridge_Regression",
        }
    }

    pub fn alpha(self) -> f64 {
        match self {
            ModelKind::Linear => 0.0,
            ModelKind::Ridge | ModelKind::LogRidge => 1.0,
        }
    }

    pub fn target(self) -> TargetTransform {
        match self {
            ModelKind::LogRidge => TargetTransform::Log,
            _ => TargetTransform::Identity,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TargetTransform {
    Identity,
    /// fitted on ln(price per sqft)
    Log,
}

impl TargetTransform {
    pub fn forward(self, value: f64) -> f64 {
        match self {
            TargetTransform::Identity => value,
            TargetTransform::Log => value.ln(),
        }
    }

    pub fn inverse(self, value: f64) -> f64 {
        match self {
            TargetTransform::Identity => value,
            TargetTransform::Log => value.exp(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceModel {
    pub kind: ModelKind,
    pub features: FeatureSpec,
    pub fit: LinearFit,
    pub target: TargetTransform,
    /// Test split, in price-per-sqft units
    pub metrics: RegressionMetrics,
    pub train_rows: usize,
    pub test_rows: usize,
    pub trained_at: DateTime<Utc>,
}

impl PriceModel {
    pub fn name(&self) -> &'static str {
        self.kind.name()
    }

    pub fn predict(&self, input: &FeatureInput) -> f64 {
        let raw = self.fit.predict_row(&self.features.encode(input));
        self.target.inverse(raw)
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        JsonExporter::write(path, self, true)
    }

    pub fn load(path: &Path) -> Result<Self> {
        JsonExporter::read(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_names_serialize_as_model_names() {
        for kind in ModelKind::ALL {
            let json = serde_json::to_string(&kind).unwrap();
            assert_eq!(json, format!("\"{}\"", kind.name()));
        }
    }

    #[test]
    fn test_log_transform_round_trip() {
        let value = 8500.0;
        let back = TargetTransform::Log.inverse(TargetTransform::Log.forward(value));
        assert!((back - value).abs() < 1e-9);
        assert_eq!(ModelKind::LogRidge.target(), TargetTransform::Log);
        assert_eq!(ModelKind::Linear.alpha(), 0.0);
    }
}

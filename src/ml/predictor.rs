// file: src/ml/predictor.rs
// description: loads the best saved model and predicts price per sqft
// reference: internal module structure

use crate::error::{AdvisorError, Result};
use crate::ml::features::FeatureInput;
use crate::ml::model::PriceModel;
use std::path::Path;
use tracing::info;

#[derive(Debug, Clone)]
pub struct PricePredictor {
    model: PriceModel,
}

impl PricePredictor {
    pub fn new(model: PriceModel) -> Self {
        Self { model }
    }

    pub fn load(path: &Path) -> Result<Self> {
        if !path.is_file() {
            return Err(AdvisorError::NotFound(format!(
                "Price model not found at {}; run `golden_mile train` first",
                path.display()
            )));
        }

        let model = PriceModel::load(path)?;
        info!(
            "Loaded price model {} (test R2 {:.4})",
            model.name(),
            model.metrics.r2
        );
        Ok(Self { model })
    }

    pub fn model(&self) -> &PriceModel {
        &self.model
    }

    pub fn predict_price_per_sqft(&self, input: &FeatureInput) -> f64 {
        self.model.predict(input)
    }
}

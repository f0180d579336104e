// file: src/ml/mod.rs
// description: price-per-sqft regression: features, solver, metrics, training and prediction
// reference: internal module structure

pub mod features;
pub mod metrics;
pub mod model;
pub mod predictor;
pub mod regression;
pub mod trainer;

pub use features::{FeatureInput, FeatureSpec};
pub use metrics::RegressionMetrics;
pub use model::{ModelKind, PriceModel, TargetTransform};
pub use predictor::PricePredictor;
pub use trainer::{Trainer, TrainingOutcome};

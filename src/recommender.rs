// file: src/recommender.rs
// description: budget-constrained property recommendations over the dataset
// reference: exhaustive scan with threshold filters

use crate::catalog::CRORE;
use crate::dataset::generator::round_to;
use crate::ml::{FeatureInput, PricePredictor};
use crate::models::{AdvisoryInputs, PropertyRecord, Recommendation};
use std::cmp::Ordering;
use std::sync::Arc;
use tracing::debug;

/// Guardrail the command-line flow applies against unrealistically low predictions.
pub const MIN_REALISTIC_PRICE_PER_SQFT: f64 = 5000.0;
pub const CLI_RESULT_LIMIT: usize = 5;

#[derive(Debug, Clone, PartialEq)]
pub struct RecommendationQuery {
    pub budget_cr: f64,
    pub size_sqft: f64,
    pub city: Option<String>,
    pub near_metro: bool,
    /// Multiplier on the budget; 1.25 lets totals run 25% over.
    pub tolerance: f64,
    pub min_price_per_sqft: Option<f64>,
    pub limit: Option<usize>,
}

impl RecommendationQuery {
    pub fn for_advisory(inputs: &AdvisoryInputs, tolerance: f64) -> Self {
        Self {
            budget_cr: inputs.budget_cr,
            size_sqft: inputs.size_sqft,
            city: Some(inputs.city.clone()),
            near_metro: inputs.metro,
            tolerance,
            min_price_per_sqft: None,
            limit: None,
        }
    }

    pub fn strict(budget_cr: f64, size_sqft: f64, city: Option<String>, near_metro: bool) -> Self {
        Self {
            budget_cr,
            size_sqft,
            city,
            near_metro,
            tolerance: 1.0,
            min_price_per_sqft: Some(MIN_REALISTIC_PRICE_PER_SQFT),
            limit: Some(CLI_RESULT_LIMIT),
        }
    }
}

pub struct Recommender {
    predictor: Arc<PricePredictor>,
    records: Arc<Vec<PropertyRecord>>,
    metro_max_km: f64,
}

impl Recommender {
    pub fn new(
        predictor: Arc<PricePredictor>,
        records: Arc<Vec<PropertyRecord>>,
        metro_max_km: f64,
    ) -> Self {
        Self {
            predictor,
            records,
            metro_max_km,
        }
    }

    pub fn predictor(&self) -> &PricePredictor {
        &self.predictor
    }

    pub fn records(&self) -> &[PropertyRecord] {
        &self.records
    }

    /// Ascending by predicted total price.
    pub fn recommend(&self, query: &RecommendationQuery) -> Vec<Recommendation> {
        let max_total = query.budget_cr * query.tolerance;

        let mut scored: Vec<(f64, f64, &PropertyRecord)> = self
            .records
            .iter()
            .filter(|r| query.city.as_deref().is_none_or(|city| r.matches_city(city)))
            .filter(|r| !query.near_metro || r.distance_to_metro_km <= self.metro_max_km)
            .filter_map(|record| {
                let input = FeatureInput::from_record(record).with_size(query.size_sqft);
                let ppsf = self.predictor.predict_price_per_sqft(&input);

                if query.min_price_per_sqft.is_some_and(|min| ppsf < min) {
                    return None;
                }

                // Extrapolation can drive the model below zero.
                let total_cr = ppsf * query.size_sqft / CRORE;
                (total_cr > 0.0 && total_cr <= max_total).then_some((total_cr, ppsf, record))
            })
            .collect();

        scored.sort_by(|a, b| a.0.partial_cmp(&b.0).unwrap_or(Ordering::Equal));
        if let Some(limit) = query.limit {
            scored.truncate(limit);
        }

        debug!(
            "{} of {} properties fit a budget of {:.2} Cr (x{:.2})",
            scored.len(),
            self.records.len(),
            query.budget_cr,
            query.tolerance
        );

        scored
            .into_iter()
            .map(|(total_cr, ppsf, record)| Recommendation {
                city: record.city.clone(),
                locality: record.locality.clone(),
                property_type: record.property_type.clone(),
                size_sqft: query.size_sqft,
                distance_to_metro_km: record.distance_to_metro_km,
                predicted_price_per_sqft: round_to(ppsf, 2),
                predicted_total_cr: round_to(total_cr, 2),
            })
            .collect()
    }
}

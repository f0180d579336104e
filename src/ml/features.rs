// file: src/ml/features.rs
// description: numeric and one-hot feature encoding for the price model
// reference: https://docs.rs/ndarray

use crate::models::PropertyRecord;
use ndarray::Array2;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

pub const NUMERIC_FEATURES: [&str; 4] = [
    "Size_sqft",
    "Age_years",
    "Distance_to_metro_km",
    "Amenities_score",
];

pub const CATEGORICAL_FEATURES: [&str; 3] = ["City", "Locality", "Property_Type"];

/// Attributes the model sees for one property.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureInput {
    pub city: String,
    pub locality: String,
    pub property_type: String,
    pub size_sqft: f64,
    pub age_years: f64,
    pub distance_to_metro_km: f64,
    pub amenities_score: f64,
}

impl FeatureInput {
    pub fn from_record(record: &PropertyRecord) -> Self {
        Self {
            city: record.city.clone(),
            locality: record.locality.clone(),
            property_type: record.property_type.clone(),
            size_sqft: record.size_sqft,
            age_years: record.age_years as f64,
            distance_to_metro_km: record.distance_to_metro_km,
            amenities_score: record.amenities_score as f64,
        }
    }

    pub fn with_size(mut self, size_sqft: f64) -> Self {
        self.size_sqft = size_sqft;
        self
    }

    fn numeric(&self, name: &str) -> f64 {
        match name {
            "Size_sqft" => self.size_sqft,
            "Age_years" => self.age_years,
            "Distance_to_metro_km" => self.distance_to_metro_km,
            "Amenities_score" => self.amenities_score,
            _ => 0.0,
        }
    }

    fn category(&self, column: &str) -> &str {
        match column {
            "City" => &self.city,
            "Locality" => &self.locality,
            "Property_Type" => &self.property_type,
            _ => "",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum FeatureColumn {
    Numeric { name: String },
    OneHot { column: String, level: String },
}

impl FeatureColumn {
    pub fn name(&self) -> String {
        match self {
            FeatureColumn::Numeric { name } => name.clone(),
            FeatureColumn::OneHot { column, level } => format!("{}_{}", column, level),
        }
    }
}

/// Column layout fitted on training data. The first (sorted) level of each
/// categorical column is the baseline and gets no indicator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureSpec {
    pub columns: Vec<FeatureColumn>,
}

impl FeatureSpec {
    pub fn fit(inputs: &[FeatureInput]) -> Self {
        let mut columns: Vec<FeatureColumn> = NUMERIC_FEATURES
            .iter()
            .map(|name| FeatureColumn::Numeric {
                name: name.to_string(),
            })
            .collect();

        for column in CATEGORICAL_FEATURES {
            let levels: BTreeSet<&str> = inputs.iter().map(|i| i.category(column)).collect();
            columns.extend(levels.into_iter().skip(1).map(|level| FeatureColumn::OneHot {
                column: column.to_string(),
                level: level.to_string(),
            }));
        }

        Self { columns }
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    pub fn names(&self) -> Vec<String> {
        self.columns.iter().map(FeatureColumn::name).collect()
    }

    /// Unseen categories encode as all zeros, same as the baseline level.
    pub fn encode(&self, input: &FeatureInput) -> Vec<f64> {
        self.columns
            .iter()
            .map(|column| match column {
                FeatureColumn::Numeric { name } => input.numeric(name),
                FeatureColumn::OneHot { column, level } => {
                    if input.category(column) == level {
                        1.0
                    } else {
                        0.0
                    }
                }
            })
            .collect()
    }

    pub fn encode_matrix(&self, inputs: &[FeatureInput]) -> Array2<f64> {
        let mut matrix = Array2::zeros((inputs.len(), self.len()));
        for (mut row, input) in matrix.rows_mut().into_iter().zip(inputs) {
            for (cell, value) in row.iter_mut().zip(self.encode(input)) {
                *cell = value;
            }
        }
        matrix
    }
}

// file: src/models/advisory.rs
// description: client inputs for an advisory run and the properties recommended for it
// reference: internal data structures

use crate::error::Result;
use crate::utils::Validator;
use serde::{Deserialize, Serialize};

pub const DEFAULT_SIZE_SQFT: f64 = 1000.0;
pub const DEFAULT_INTENT: &str = "Investment";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AdvisoryInputs {
    pub city: String,
    /// Budget in crore rupees
    pub budget_cr: f64,
    pub size_sqft: f64,
    /// Metro connectivity required
    pub metro: bool,
    pub intent: String,
}

impl AdvisoryInputs {
    pub fn new(city: impl Into<String>, budget_cr: f64) -> Self {
        Self {
            city: city.into(),
            budget_cr,
            size_sqft: DEFAULT_SIZE_SQFT,
            metro: true,
            intent: DEFAULT_INTENT.to_string(),
        }
    }

    pub fn validate(&self) -> Result<()> {
        Validator::validate_content_not_empty("city", &self.city)?;
        Validator::validate_positive("budget", self.budget_cr)?;
        Validator::validate_positive("size", self.size_sqft)?;
        Ok(())
    }

    pub fn metro_label(&self) -> &'static str {
        if self.metro { "Yes" } else { "No" }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recommendation {
    pub city: String,
    pub locality: String,
    pub property_type: String,
    pub size_sqft: f64,
    pub distance_to_metro_km: f64,
    pub predicted_price_per_sqft: f64,
    /// Rounded to two decimals
    pub predicted_total_cr: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let inputs = AdvisoryInputs::new("Pune", 1.5);
        assert_eq!(inputs.size_sqft, 1000.0);
        assert_eq!(inputs.intent, "Investment");
        assert_eq!(inputs.metro_label(), "Yes");
        assert!(inputs.validate().is_ok());
    }

    #[test]
    fn test_validation_rejects_bad_inputs() {
        assert!(AdvisoryInputs::new(" ", 1.5).validate().is_err());
        assert!(AdvisoryInputs::new("Pune", 0.0).validate().is_err());

        let mut inputs = AdvisoryInputs::new("Pune", 1.0);
        inputs.size_sqft = -10.0;
        assert!(inputs.validate().is_err());
    }
}

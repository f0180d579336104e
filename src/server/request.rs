// file: src/server/request.rs
// description: lenient /generate request body
// reference: https://docs.rs/serde

use crate::error::{AdvisorError, Result};
use crate::models::AdvisoryInputs;
use crate::models::advisory::{DEFAULT_INTENT, DEFAULT_SIZE_SQFT};
use serde::Deserialize;

/// Form fields arrive as numbers or as numeric strings.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum Numeric {
    Number(f64),
    Text(String),
}

impl Numeric {
    fn parse(&self, field: &str) -> Result<f64> {
        match self {
            Numeric::Number(value) => Ok(*value),
            Numeric::Text(text) => text.trim().parse::<f64>().map_err(|_| {
                AdvisorError::Validation(format!("{} must be a number, got '{}'", field, text))
            }),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum Flag {
    Bool(bool),
    Text(String),
}

impl Flag {
    fn parse(&self) -> bool {
        match self {
            Flag::Bool(value) => *value,
            Flag::Text(text) => matches!(
                text.trim().to_ascii_lowercase().as_str(),
                "true" | "yes" | "y" | "1" | "on"
            ),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct GenerateRequest {
    pub city: String,
    pub budget: Numeric,
    #[serde(default)]
    pub size: Option<Numeric>,
    #[serde(default)]
    pub metro: Option<Flag>,
    #[serde(default)]
    pub intent: Option<String>,
}

impl GenerateRequest {
    pub fn into_inputs(self) -> Result<AdvisoryInputs> {
        let inputs = AdvisoryInputs {
            city: self.city.trim().to_string(),
            budget_cr: self.budget.parse("budget")?,
            size_sqft: match &self.size {
                Some(size) => size.parse("size")?,
                None => DEFAULT_SIZE_SQFT,
            },
            metro: self.metro.as_ref().is_none_or(Flag::parse),
            intent: self
                .intent
                .map(|i| i.trim().to_string())
                .filter(|i| !i.is_empty())
                .unwrap_or_else(|| DEFAULT_INTENT.to_string()),
        };

        inputs.validate()?;
        Ok(inputs)
    }
}

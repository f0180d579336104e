// file: src/models/property.rs
// description: synthetic property record as stored in the structured dataset
// reference: https://docs.rs/csv

use serde::{Deserialize, Serialize};

fn default_age() -> u32 {
    5
}

fn default_amenities() -> u32 {
    5
}

/// One CSV row. Column names follow the dataset header verbatim.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PropertyRecord {
    #[serde(rename = "City")]
    pub city: String,
    #[serde(rename = "Locality")]
    pub locality: String,
    #[serde(rename = "Size_sqft")]
    pub size_sqft: f64,
    #[serde(rename = "Property_Type")]
    pub property_type: String,
    #[serde(rename = "Age_years", default = "default_age")]
    pub age_years: u32,
    #[serde(rename = "Distance_to_metro_km")]
    pub distance_to_metro_km: f64,
    #[serde(rename = "Amenities_score", default = "default_amenities")]
    pub amenities_score: u32,
    #[serde(rename = "Price_per_sqft")]
    pub price_per_sqft: f64,
    #[serde(rename = "Total_Price_Cr")]
    pub total_price_cr: f64,
    #[serde(rename = "Estimated_Monthly_Rent")]
    pub estimated_monthly_rent: u64,
}

impl PropertyRecord {
    pub fn matches_city(&self, city: &str) -> bool {
        self.city.eq_ignore_ascii_case(city.trim())
    }
}

// file: src/dataset/loader.rs
// description: csv reading and writing for the property dataset
// reference: https://docs.rs/csv

use crate::error::{AdvisorError, Result};
use crate::models::PropertyRecord;
use crate::utils::Validator;
use std::fs;
use std::path::Path;
use tracing::{debug, info};

pub fn load_dataset(path: &Path) -> Result<Vec<PropertyRecord>> {
    Validator::validate_file_exists(path)?;

    let mut reader = csv::Reader::from_path(path)?;
    let records = reader
        .deserialize()
        .collect::<std::result::Result<Vec<PropertyRecord>, csv::Error>>()?;

    if records.is_empty() {
        return Err(AdvisorError::Validation(format!(
            "Dataset {} has no rows",
            path.display()
        )));
    }

    info!("Loaded {} property records from {}", records.len(), path.display());
    Ok(records)
}

pub fn write_dataset(path: &Path, records: &[PropertyRecord]) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|e| AdvisorError::file(parent, e))?;
    }

    let mut writer = csv::Writer::from_path(path)?;
    for record in records {
        writer.serialize(record)?;
    }
    writer.flush().map_err(|e| AdvisorError::file(path, e))?;

    debug!("Wrote {} rows to {}", records.len(), path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn record(city: &str, locality: &str) -> PropertyRecord {
        PropertyRecord {
            city: city.to_string(),
            locality: locality.to_string(),
            size_sqft: 1200.0,
            property_type: "Apartment".to_string(),
            age_years: 3,
            distance_to_metro_km: 1.25,
            amenities_score: 8,
            price_per_sqft: 9000.0,
            total_price_cr: 1.08,
            estimated_monthly_rent: 27000,
        }
    }

    #[test]
    fn test_write_then_load_preserves_header_and_rows() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("structured/real_estate_data.csv");
        let records = vec![record("Pune", "Baner"), record("Hyderabad", "Uppal")];

        write_dataset(&path, &records).unwrap();

        let content = fs::read_to_string(&path).unwrap();
        assert!(content.starts_with(
            "City,Locality,Size_sqft,Property_Type,Age_years,Distance_to_metro_km,Amenities_score,Price_per_sqft,Total_Price_Cr,Estimated_Monthly_Rent"
        ));
        assert_eq!(load_dataset(&path).unwrap(), records);
    }

    #[test]
    fn test_missing_optional_columns_use_defaults() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("data.csv");
        fs::write(
            &path,
            "City,Locality,Size_sqft,Property_Type,Distance_to_metro_km,Price_per_sqft,Total_Price_Cr,Estimated_Monthly_Rent\n\
             Pune,Wakad,1000,Villa,3.5,8000,0.8,20000\n",
        )
        .unwrap();

        let records = load_dataset(&path).unwrap();
        assert_eq!(records[0].age_years, 5);
        assert_eq!(records[0].amenities_score, 5);
    }

    #[test]
    fn test_missing_file_is_not_found() {
        let dir = tempdir().unwrap();
        let result = load_dataset(&dir.path().join("absent.csv"));
        assert!(matches!(result, Err(AdvisorError::NotFound(_))));
    }
}

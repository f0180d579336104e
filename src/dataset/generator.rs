// file: src/dataset/generator.rs
// description: seeded synthetic property dataset following the catalog price assumptions
// reference: https://docs.rs/rand

use crate::catalog::{self, CITIES, CRORE, PROPERTY_TYPES};
use crate::models::PropertyRecord;
use rand::rngs::StdRng;
use rand::seq::IndexedRandom;
use rand::{Rng, SeedableRng};
use std::f64::consts::PI;
use tracing::info;

const NOISE_STD_DEV: f64 = 0.08;
const PRICE_ROUNDING: f64 = 500.0;

pub struct DatasetGenerator {
    rows_per_locality: usize,
    rng: StdRng,
}

impl DatasetGenerator {
    pub fn new(rows_per_locality: usize, seed: u64) -> Self {
        Self {
            rows_per_locality,
            rng: StdRng::seed_from_u64(seed),
        }
    }

    pub fn generate(mut self) -> Vec<PropertyRecord> {
        let mut records = Vec::new();

        for city in CITIES {
            for &(locality, locality_factor) in city.localities {
                for _ in 0..self.rows_per_locality {
                    let record = self.generate_record(
                        city.name,
                        city.base_price_per_sqft,
                        city.rental_yield,
                        locality,
                        locality_factor,
                    );
                    records.push(record);
                }
            }
        }

        info!("Generated {} synthetic property records", records.len());
        records
    }

    fn generate_record(
        &mut self,
        city: &str,
        base_price: f64,
        rental_yield: f64,
        locality: &str,
        locality_factor: f64,
    ) -> PropertyRecord {
        let size_sqft = catalog::snap_size(self.rng.random_range(700..=3600)) as f64;
        let age_years: u32 = self.rng.random_range(0..=25);
        let &(property_type, type_factor) = PROPERTY_TYPES
            .choose(&mut self.rng)
            .unwrap_or(&PROPERTY_TYPES[0]);
        let distance_to_metro_km = round_to(self.rng.random_range(0.3..10.0), 2);
        let amenities_score: u32 = self.rng.random_range(5..=10);

        let size_factor = (size_sqft / 1000.0).powf(0.85);
        let age_factor = (1.0 - 0.015 * age_years as f64).max(0.6);
        let base_psf = base_price * locality_factor * type_factor * size_factor * age_factor;

        let noise = self.sample_normal(1.0, NOISE_STD_DEV);
        let price_per_sqft = (base_psf * noise / PRICE_ROUNDING).round() * PRICE_ROUNDING;

        let total_price = price_per_sqft * size_sqft;
        let estimated_monthly_rent = (total_price * rental_yield / 12.0).max(0.0) as u64;

        PropertyRecord {
            city: city.to_string(),
            locality: locality.to_string(),
            size_sqft,
            property_type: property_type.to_string(),
            age_years,
            distance_to_metro_km,
            amenities_score,
            price_per_sqft,
            total_price_cr: round_to(total_price / CRORE, 2),
            estimated_monthly_rent,
        }
    }

    /// Box-Muller transform.
    fn sample_normal(&mut self, mean: f64, std_dev: f64) -> f64 {
        let u1: f64 = self.rng.random::<f64>().max(f64::MIN_POSITIVE);
        let u2: f64 = self.rng.random();
        mean + std_dev * (-2.0 * u1.ln()).sqrt() * (2.0 * PI * u2).cos()
    }
}

pub fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round() / factor
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_row_count_covers_every_locality() {
        let records = DatasetGenerator::new(4, 42).generate();
        let localities: usize = CITIES.iter().map(|c| c.localities.len()).sum();
        assert_eq!(records.len(), localities * 4);
    }

    #[test]
    fn test_generation_is_deterministic_per_seed() {
        let first = DatasetGenerator::new(3, 7).generate();
        let second = DatasetGenerator::new(3, 7).generate();
        let other = DatasetGenerator::new(3, 8).generate();

        assert_eq!(first, second);
        assert_ne!(first, other);
    }

    #[test]
    fn test_records_respect_generation_ranges() {
        for record in DatasetGenerator::new(20, 42).generate() {
            assert!(catalog::SIZE_BUCKETS.contains(&(record.size_sqft as u32)));
            assert!(record.age_years <= 25);
            assert!((0.3..=10.0).contains(&record.distance_to_metro_km));
            assert!((5..=10).contains(&record.amenities_score));
            assert_eq!(record.price_per_sqft % 500.0, 0.0);
            assert!(record.price_per_sqft > 0.0);

            let expected_total = round_to(record.price_per_sqft * record.size_sqft / CRORE, 2);
            assert_eq!(record.total_price_cr, expected_total);
        }
    }

    #[test]
    fn test_round_to() {
        assert_eq!(round_to(1.23456, 2), 1.23);
        assert_eq!(round_to(0.305, 1), 0.3);
    }
}

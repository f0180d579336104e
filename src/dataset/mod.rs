// file: src/dataset/mod.rs
// description: structured property dataset generation and csv io
// reference: internal module structure

pub mod generator;
pub mod loader;

pub use generator::DatasetGenerator;
pub use loader::{load_dataset, write_dataset};

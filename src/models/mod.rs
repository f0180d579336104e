// file: src/models/mod.rs
// description: data models module exports
// reference: internal module structure

pub mod advisory;
pub mod chunk;
pub mod property;
pub mod search_result;

pub use advisory::{AdvisoryInputs, Recommendation};
pub use chunk::{DocumentChunk, IndexManifest, SourceDocument};
pub use property::PropertyRecord;
pub use search_result::RetrievedDocument;

// file: src/pipeline/mod.rs
// description: index build and advisory pipelines
// reference: pipeline orchestration

mod advisor;
mod indexer;
mod progress;

pub use advisor::{
    Advisor, AdvisoryOutcome, MAX_LISTED_RECOMMENDATIONS, health_without_advisor,
};
pub use indexer::IndexBuilder;
pub use progress::{IndexStats, ProgressTracker};

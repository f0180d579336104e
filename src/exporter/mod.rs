// file: src/exporter/mod.rs
// description: report and artifact export module exports
// reference: internal module structure

pub mod json;
pub mod report;

pub use json::JsonExporter;
pub use report::{AdvisoryReport, ReportWriter};

// file: src/exporter/report.rs
// description: timestamped advisory report artifacts
// reference: https://docs.rs/serde_json

use crate::error::Result;
use crate::exporter::json::JsonExporter;
use crate::models::{AdvisoryInputs, Recommendation, RetrievedDocument};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use uuid::Uuid;

pub const REPORT_PREFIX: &str = "Golden_Mile_Report";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdvisoryReport {
    pub request_id: Uuid,
    pub generated_at: DateTime<Utc>,
    pub inputs: AdvisoryInputs,
    pub price_model: String,
    pub recommendations: Vec<Recommendation>,
    pub documents: Vec<RetrievedDocument>,
    pub analysis: String,
    pub pdf_path: PathBuf,
}

#[derive(Debug, Clone)]
pub struct ReportWriter {
    output_dir: PathBuf,
}

impl ReportWriter {
    pub fn new(output_dir: impl Into<PathBuf>) -> Self {
        Self {
            output_dir: output_dir.into(),
        }
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    /// `<dir>/Golden_Mile_Report_<unix_ts>.<extension>`
    pub fn path_for(&self, generated_at: DateTime<Utc>, extension: &str) -> PathBuf {
        self.output_dir.join(format!(
            "{}_{}.{}",
            REPORT_PREFIX,
            generated_at.timestamp(),
            extension
        ))
    }

    pub fn write(&self, report: &AdvisoryReport) -> Result<PathBuf> {
        let path = self.path_for(report.generated_at, "json");
        JsonExporter::write(&path, report, true)?;
        Ok(path)
    }
}

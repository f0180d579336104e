// file: src/pipeline/advisor.rs
// description: end-to-end advisory run: recommend, retrieve, prompt, llm, pdf and json
// reference: sequential advisory flow shared by the cli and the web server

use crate::advisory::{LlmClient, PdfRenderer, build_llm_prompt};
use crate::config::Config;
use crate::database::{EmbeddingClient, Retriever};
use crate::dataset::load_dataset;
use crate::error::{AdvisorError, Result};
use crate::exporter::{AdvisoryReport, ReportWriter};
use crate::ml::PricePredictor;
use crate::models::{AdvisoryInputs, Recommendation, RetrievedDocument};
use crate::recommender::{RecommendationQuery, Recommender};
use crate::utils::{HealthCheck, HealthReport, OperationTimer};
use chrono::Utc;
use serde::Serialize;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{info, warn};
use uuid::Uuid;

/// Recommendations listed in responses and report files; the prompt sees all.
pub const MAX_LISTED_RECOMMENDATIONS: usize = 10;

const PDF_TITLE: &str = "Golden Mile Advisory Report";

#[derive(Debug, Clone, Serialize)]
pub struct AdvisoryOutcome {
    pub request_id: Uuid,
    pub analysis: String,
    pub pdf_path: PathBuf,
    pub report_path: PathBuf,
    pub recommendation_count: usize,
    pub recommendations: Vec<Recommendation>,
    pub documents: Vec<RetrievedDocument>,
}

pub struct Advisor {
    recommender: Recommender,
    retriever: Retriever,
    llm: LlmClient,
    pdf: PdfRenderer,
    reports: ReportWriter,
    budget_tolerance: f64,
    top_k: usize,
}

impl Advisor {
    /// Loads the dataset and the best price model once.
    pub fn from_config(config: &Config) -> Result<Self> {
        let predictor = Arc::new(PricePredictor::load(&config.best_model_path())?);
        let records = Arc::new(load_dataset(&config.data.dataset_path)?);

        let recommender = Recommender::new(predictor, records, config.model.metro_max_km);
        let retriever = Retriever::new(
            config.retrieval.clone(),
            EmbeddingClient::new(config.embeddings.clone()),
        );

        Ok(Self {
            recommender,
            retriever,
            llm: LlmClient::new(config.llm.clone())?,
            pdf: PdfRenderer::new(PDF_TITLE),
            reports: ReportWriter::new(&config.report.output_dir),
            budget_tolerance: config.model.budget_tolerance,
            top_k: config.retrieval.top_k,
        })
    }

    pub fn recommender(&self) -> &Recommender {
        &self.recommender
    }

    pub fn retriever(&self) -> &Retriever {
        &self.retriever
    }

    pub async fn generate(&self, inputs: AdvisoryInputs) -> Result<AdvisoryOutcome> {
        inputs.validate()?;
        let timer = OperationTimer::new("generate advisory report");
        let request_id = Uuid::new_v4();

        let query = RecommendationQuery::for_advisory(&inputs, self.budget_tolerance);
        let recommendations = self.recommender.recommend(&query);
        timer.checkpoint(&format!("{} recommendations", recommendations.len()));

        let documents = match self.retriever.retrieve_for_city(&inputs.city, self.top_k).await {
            Ok(documents) => documents,
            Err(e) => {
                warn!("Retrieval failed, continuing without documents: {}", e);
                Vec::new()
            }
        };

        let prompt = build_llm_prompt(&recommendations, &documents, &inputs);
        let analysis = self.llm.generate_report(&prompt).await?;
        timer.checkpoint("llm report received");

        let generated_at = Utc::now();
        let pdf_path = self.reports.path_for(generated_at, "pdf");
        self.pdf.render_to_file(&analysis, &pdf_path)?;

        let recommendation_count = recommendations.len();
        let listed: Vec<Recommendation> = recommendations
            .into_iter()
            .take(MAX_LISTED_RECOMMENDATIONS)
            .collect();

        let report = AdvisoryReport {
            request_id,
            generated_at,
            inputs,
            price_model: self
                .recommender
                .predictor()
                .model()
                .name()
                .to_string(),
            recommendations: listed.clone(),
            documents: documents.clone(),
            analysis: analysis.clone(),
            pdf_path: pdf_path.clone(),
        };
        let report_path = self.reports.write(&report)?;

        info!(
            "Advisory {} ready: {} ({} recommendations, {} documents)",
            request_id,
            pdf_path.display(),
            recommendation_count,
            documents.len()
        );
        timer.finish();

        Ok(AdvisoryOutcome {
            request_id,
            analysis,
            pdf_path,
            report_path,
            recommendation_count,
            recommendations: listed,
            documents,
        })
    }

    pub async fn health(&self) -> HealthReport {
        let model = self.recommender.predictor().model();
        let mut checks = vec![
            HealthCheck::healthy_with(
                "price_model",
                format!("{} (test R2 {:.4})", model.name(), model.metrics.r2),
            ),
            HealthCheck::healthy_with(
                "dataset",
                format!("{} properties", self.recommender.records().len()),
            ),
        ];

        checks.push(match self.retriever.check().await {
            Ok(report) => report.to_health_check(),
            Err(e) => HealthCheck::unhealthy("similarity_index", e.to_string()),
        });

        checks.push(if self.llm.has_api_key() {
            HealthCheck::healthy_with("llm", self.llm.model().to_string())
        } else {
            HealthCheck::unhealthy("llm", "no API key configured".to_string())
        });

        HealthReport::new(checks)
    }
}

/// Health of the parts that load without the advisor: the model slot reports
/// why the advisor failed to load, while the dataset, index and LLM key are
/// checked on their own.
pub async fn health_without_advisor(config: &Config, load_error: &AdvisorError) -> HealthReport {
    let mut checks = vec![HealthCheck::unhealthy("price_model", load_error.to_string())];

    checks.push(match load_dataset(&config.data.dataset_path) {
        Ok(records) => HealthCheck::healthy_with("dataset", format!("{} properties", records.len())),
        Err(e) => HealthCheck::unhealthy("dataset", e.to_string()),
    });

    let retriever = Retriever::new(
        config.retrieval.clone(),
        EmbeddingClient::new(config.embeddings.clone()),
    );
    checks.push(match retriever.check().await {
        Ok(report) => report.to_health_check(),
        Err(e) => HealthCheck::unhealthy("similarity_index", e.to_string()),
    });

    let has_key = config
        .llm
        .api_key
        .as_deref()
        .is_some_and(|key| !key.trim().is_empty());
    checks.push(if has_key {
        HealthCheck::healthy_with("llm", config.llm.model.clone())
    } else {
        HealthCheck::unhealthy("llm", "no API key configured".to_string())
    });

    HealthReport::new(checks)
}

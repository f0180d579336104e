// file: src/server/routes.rs
// description: axum router: form page, advisory generation and pdf download
// reference: https://docs.rs/axum

use super::error::ApiError;
use super::request::GenerateRequest;
use super::state::AppState;
use crate::config::Config;
use crate::error::{AdvisorError, Result};
use crate::pipeline::{Advisor, AdvisoryOutcome};
use crate::utils::HealthReport;
use axum::extract::State;
use axum::extract::rejection::JsonRejection;
use axum::http::{HeaderValue, StatusCode, header};
use axum::response::{Html, IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use std::net::SocketAddr;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::info;

const INDEX_HTML: &str = include_str!("../../static/index.html");
const APP_JS: &str = include_str!("../../static/app.js");

pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(index))
        .route("/static/app.js", get(app_js))
        .route("/health", get(health))
        .route("/generate", post(generate))
        .route("/download", get(download))
        .with_state(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
}

pub async fn start_server(config: &Config) -> Result<()> {
    let advisor = Advisor::from_config(config)?;
    let state = AppState::new(advisor, config.report.download_name.clone());
    let app = create_router(state);

    let addr: SocketAddr = format!("{}:{}", config.server.host, config.server.port)
        .parse()
        .map_err(|e| AdvisorError::Config(format!("Invalid server address: {}", e)))?;

    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!("Golden Mile advisor listening on http://{}", addr);

    axum::serve(listener, app).await?;
    Ok(())
}

async fn index() -> Html<&'static str> {
    Html(INDEX_HTML)
}

async fn app_js() -> impl IntoResponse {
    (
        [(header::CONTENT_TYPE, "application/javascript; charset=utf-8")],
        APP_JS,
    )
}

async fn health(State(state): State<AppState>) -> Json<HealthReport> {
    Json(state.advisor.health().await)
}

async fn generate(
    State(state): State<AppState>,
    payload: std::result::Result<Json<GenerateRequest>, JsonRejection>,
) -> std::result::Result<Json<AdvisoryOutcome>, ApiError> {
    let Json(request) = payload.map_err(|e| ApiError::bad_request(e.body_text()))?;
    let inputs = request.into_inputs()?;

    info!(
        "Advisory request: city={}, budget={} Cr, size={} sqft",
        inputs.city, inputs.budget_cr, inputs.size_sqft
    );

    let outcome = state.advisor.generate(inputs).await?;
    state.set_last_pdf(outcome.pdf_path.clone()).await;

    Ok(Json(outcome))
}

async fn download(State(state): State<AppState>) -> std::result::Result<Response, ApiError> {
    let Some(path) = state.last_pdf().await else {
        return Err(ApiError::bad_request(
            "No report has been generated yet. Submit the form first.",
        ));
    };

    if !path.is_file() {
        return Err(ApiError(AdvisorError::NotFound(format!(
            "Report file is no longer available: {}",
            path.display()
        ))));
    }

    let bytes = tokio::fs::read(&path)
        .await
        .map_err(|e| AdvisorError::file(&path, e))?;

    let disposition = HeaderValue::from_str(&format!(
        "attachment; filename=\"{}\"",
        state.download_name
    ))
    .unwrap_or_else(|_| HeaderValue::from_static("attachment"));

    Ok((
        StatusCode::OK,
        [
            (header::CONTENT_TYPE, HeaderValue::from_static("application/pdf")),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        bytes,
    )
        .into_response())
}

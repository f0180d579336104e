// file: src/server/error.rs
// description: maps advisor errors onto http responses
// reference: https://docs.rs/axum

use crate::error::AdvisorError;
use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;
use tracing::{error, warn};

#[derive(Debug)]
pub struct ApiError(pub AdvisorError);

impl ApiError {
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self(AdvisorError::Validation(message.into()))
    }

    pub fn status(&self) -> StatusCode {
        match &self.0 {
            AdvisorError::Validation(_) => StatusCode::BAD_REQUEST,
            AdvisorError::NotFound(_) => StatusCode::NOT_FOUND,
            AdvisorError::Llm(_) => StatusCode::BAD_GATEWAY,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<AdvisorError> for ApiError {
    fn from(err: AdvisorError) -> Self {
        Self(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            error!("Request failed ({}): {}", status, self.0);
        } else {
            warn!("Request rejected ({}): {}", status, self.0);
        }

        (status, Json(json!({ "error": self.0.to_string() }))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        assert_eq!(
            ApiError::bad_request("budget").status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ApiError(AdvisorError::NotFound("pdf".into())).status(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            ApiError(AdvisorError::Llm("timeout".into())).status(),
            StatusCode::BAD_GATEWAY
        );
        assert_eq!(
            ApiError(AdvisorError::Pdf("font".into())).status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }
}

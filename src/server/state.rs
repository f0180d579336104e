// file: src/server/state.rs
// description: shared state handed to every request handler
// reference: https://docs.rs/axum

use crate::pipeline::Advisor;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::RwLock;

#[derive(Clone)]
pub struct AppState {
    pub advisor: Arc<Advisor>,
    /// Most recent PDF written by `/generate`; served by `/download`.
    pub last_pdf: Arc<RwLock<Option<PathBuf>>>,
    pub download_name: String,
}

impl AppState {
    pub fn new(advisor: Advisor, download_name: impl Into<String>) -> Self {
        Self {
            advisor: Arc::new(advisor),
            last_pdf: Arc::new(RwLock::new(None)),
            download_name: download_name.into(),
        }
    }

    pub async fn set_last_pdf(&self, path: PathBuf) {
        *self.last_pdf.write().await = Some(path);
    }

    pub async fn last_pdf(&self) -> Option<PathBuf> {
        self.last_pdf.read().await.clone()
    }
}

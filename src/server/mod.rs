// file: src/server/mod.rs
// description: web front end for the advisor
// reference: internal module structure

pub mod error;
pub mod request;
pub mod routes;
pub mod state;

pub use error::ApiError;
pub use request::GenerateRequest;
pub use routes::{create_router, start_server};
pub use state::AppState;

// file: src/database/mod.rs
// description: similarity index storage, embeddings and retrieval
// reference: internal module structure

pub mod client;
pub mod embeddings;
pub mod insert;
pub mod retriever;
pub mod schema;

pub use client::{IndexHit, LanceDbClient};
pub use embeddings::EmbeddingClient;
pub use insert::{ChunkInserter, InsertStats};
pub use retriever::{IndexReport, Retriever};
pub use schema::ChunkSchema;

// src/lib.rs
// Public library surface for the binary and integration tests.

pub mod api;
pub mod config;
pub mod errors;
pub mod export;
pub mod ingest;
pub mod metrics;
pub mod normalize;
pub mod recency;
pub mod relevance;
pub mod types;

// ---- Re-exports for stable public API ----
pub use crate::api::router;
pub use crate::config::ScoutConfig;
pub use crate::errors::RunError;
pub use crate::ingest::{Pipeline, SearchRequest};
pub use crate::types::{JobRecord, SourceId};

// src/ingest/fallback.rs
use anyhow::Result;
use async_trait::async_trait;
use metrics::counter;

use crate::ingest::types::{RawEntry, SourceAdapter};

/// Tries `primary`; when it fails or comes back empty, asks `secondary` once.
pub struct FallbackAdapter {
    primary: Box<dyn SourceAdapter>,
    secondary: Box<dyn SourceAdapter>,
}

impl FallbackAdapter {
    pub fn new(primary: Box<dyn SourceAdapter>, secondary: Box<dyn SourceAdapter>) -> Self {
        Self { primary, secondary }
    }
}

#[async_trait]
impl SourceAdapter for FallbackAdapter {
    async fn fetch(&self, search_term: &str, max_results: usize) -> Result<Vec<RawEntry>> {
        match self.primary.fetch(search_term, max_results).await {
            Ok(v) if !v.is_empty() => return Ok(v),
            Ok(_) => tracing::info!(
                target: "ingest",
                primary = self.primary.name(),
                secondary = self.secondary.name(),
                term = search_term,
                "primary strategy empty, falling back"
            ),
            Err(e) => tracing::warn!(
                target: "ingest",
                error = ?e,
                primary = self.primary.name(),
                secondary = self.secondary.name(),
                term = search_term,
                "primary strategy failed, falling back"
            ),
        }
        counter!("scout_fallback_total", "adapter" => self.secondary.name()).increment(1);
        self.secondary.fetch(search_term, max_results).await
    }

    fn name(&self) -> &'static str {
        self.primary.name()
    }
}

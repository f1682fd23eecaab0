// src/ingest/types.rs
use anyhow::Result;
use serde::Deserialize;

use crate::types::SourceId;

/// One posting as a source returned it, before normalization.
#[derive(Debug, Clone, PartialEq)]
pub enum RawEntry {
    /// Item from the ReliefWeb jobs API (`data[]`).
    ReliefWebApi(ReliefWebItem),
    /// Posting mined from a search-results page (or canned demo data).
    Markup(ScrapedEntry),
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct ReliefWebItem {
    /// Numeric in practice, but the API has served it as a string too.
    #[serde(default)]
    pub id: Option<serde_json::Value>,
    #[serde(default)]
    pub fields: ReliefWebFields,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct ReliefWebFields {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub source: Option<Vec<NamedRef>>,
    #[serde(default)]
    pub country: Option<Vec<NamedRef>>,
    #[serde(default)]
    pub date: Option<ReliefWebDate>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct NamedRef {
    #[serde(default)]
    pub name: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct ReliefWebDate {
    #[serde(default)]
    pub created: Option<String>,
}

/// Fields pulled out of listing markup. Every field is optional; the
/// normalizer decides on fallbacks.
#[derive(Debug, Clone, PartialEq)]
pub struct ScrapedEntry {
    pub source: SourceId,
    pub title: Option<String>,
    /// Absolute link to the posting.
    pub url: Option<String>,
    pub organization: Option<String>,
    pub location: Option<String>,
    pub date_posted: Option<String>,
    /// Source treats every listing as fresh regardless of its date text.
    pub pinned_recent: bool,
}

impl ScrapedEntry {
    pub fn new(source: SourceId) -> Self {
        Self {
            source,
            title: None,
            url: None,
            organization: None,
            location: None,
            date_posted: None,
            pinned_recent: false,
        }
    }
}

/// A fetch strategy for one listing source.
///
/// Implementations return at most `max_results` entries. Errors are reported
/// to the caller as `Err`; the pipeline absorbs them and treats the pair as
/// empty, and [`crate::ingest::fallback::FallbackAdapter`] uses them to decide
/// whether to try its secondary strategy.
#[async_trait::async_trait]
pub trait SourceAdapter: Send + Sync {
    async fn fetch(&self, search_term: &str, max_results: usize) -> Result<Vec<RawEntry>>;
    fn name(&self) -> &'static str;
}

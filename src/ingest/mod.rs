// src/ingest/mod.rs
pub mod fallback;
pub mod http;
pub mod pacing;
pub mod providers;
pub mod types;

use std::collections::HashSet;
use std::time::Duration;

use metrics::{counter, describe_counter, describe_histogram};
use once_cell::sync::OnceCell;
use serde::Deserialize;

use crate::config::ScoutConfig;
use crate::errors::RunError;
use crate::ingest::fallback::FallbackAdapter;
use crate::ingest::http::HttpClient;
use crate::ingest::pacing::Pacer;
use crate::ingest::providers::{
    demo::DemoProvider, devex::DevexProvider, reliefweb_api::ReliefWebApiProvider,
    reliefweb_html::ReliefWebHtmlProvider,
};
use crate::ingest::types::SourceAdapter;
use crate::normalize::Normalizer;
use crate::recency::RecencyClassifier;
use crate::relevance::RelevanceScorer;
use crate::types::{JobRecord, SourceId};

/// One-time metrics registration (so series show up on /metrics).
fn ensure_metrics_described() {
    static ONCE: OnceCell<()> = OnceCell::new();
    ONCE.get_or_init(|| {
        describe_counter!(
            "scout_raw_entries_total",
            "Raw entries returned by source adapters."
        );
        describe_counter!(
            "scout_records_kept_total",
            "Records returned after deduplication."
        );
        describe_counter!(
            "scout_dedup_dropped_total",
            "Records dropped because their URL was already seen."
        );
        describe_counter!(
            "scout_source_errors_total",
            "Adapter failures absorbed by the pipeline."
        );
        describe_counter!(
            "scout_fallback_total",
            "Times a secondary fetch strategy was used."
        );
        describe_histogram!("scout_fetch_ms", "Adapter fetch time in milliseconds.");
    });
}

/// What the caller wants searched.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SearchRequest {
    pub search_terms: Vec<String>,
    pub sources: Vec<SourceId>,
    /// Per-query cap; the configured default when absent, clamped to the
    /// configured ceiling.
    #[serde(default)]
    pub max_results: Option<usize>,
}

/// Reported after each search term completes.
#[derive(Debug, Clone, PartialEq)]
pub struct Progress<'a> {
    pub term_index: usize,
    pub total_terms: usize,
    pub search_term: &'a str,
    /// Records gathered for this term, before deduplication.
    pub found: usize,
}

/// Trim terms, drop blanks and repeats, keep first-seen order.
pub fn prepare_terms(terms: &[String]) -> Vec<String> {
    let mut seen = HashSet::new();
    terms
        .iter()
        .map(|t| t.trim())
        .filter(|t| !t.is_empty() && seen.insert(t.to_string()))
        .map(str::to_string)
        .collect()
}

/// Keep the first record per URL in accumulation order.
/// Returns (kept, dropped_count).
pub fn dedup_by_url(records: Vec<JobRecord>) -> (Vec<JobRecord>, usize) {
    let mut seen: HashSet<String> = HashSet::with_capacity(records.len());
    let mut kept = Vec::with_capacity(records.len());
    let mut dropped = 0usize;
    for rec in records {
        if seen.insert(rec.url.clone()) {
            kept.push(rec);
        } else {
            dropped += 1;
        }
    }
    (kept, dropped)
}

/// Sequential fetch → normalize → classify → score → dedup over
/// every (search term, source) pair.
pub struct Pipeline {
    adapters: Vec<(SourceId, Box<dyn SourceAdapter>)>,
    normalizer: Normalizer,
    recency: RecencyClassifier,
    scorer: RelevanceScorer,
    pacing: Duration,
    default_max_results: usize,
    max_results_ceiling: usize,
}

impl Pipeline {
    /// Build with explicit adapters; vocabularies, pacing and caps come from `cfg`.
    pub fn new(cfg: &ScoutConfig, adapters: Vec<(SourceId, Box<dyn SourceAdapter>)>) -> Self {
        Self {
            adapters,
            normalizer: Normalizer::new(&cfg.endpoints.reliefweb_site),
            recency: RecencyClassifier::from_config(&cfg.recency),
            scorer: RelevanceScorer::from_config(&cfg.relevance),
            pacing: cfg.pacing_interval(),
            default_max_results: cfg.max_results.max(1),
            max_results_ceiling: cfg.max_results_ceiling.max(1),
        }
    }

    /// Build with the production adapters for ReliefWeb and Devex.
    pub fn from_config(cfg: &ScoutConfig) -> anyhow::Result<Self> {
        let client = HttpClient::new(&cfg.user_agent, cfg.request_timeout())?;
        let ep = &cfg.endpoints;

        let mut reliefweb: Box<dyn SourceAdapter> = Box::new(FallbackAdapter::new(
            Box::new(ReliefWebApiProvider::new(
                client.clone(),
                &ep.reliefweb_api,
                &ep.reliefweb_appname,
            )),
            Box::new(ReliefWebHtmlProvider::new(client.clone(), &ep.reliefweb_site)),
        ));
        if cfg.demo_fallback {
            reliefweb = Box::new(FallbackAdapter::new(
                reliefweb,
                Box::new(DemoProvider::new(&ep.reliefweb_site)),
            ));
        }

        let adapters: Vec<(SourceId, Box<dyn SourceAdapter>)> = vec![
            (SourceId::ReliefWeb, reliefweb),
            (
                SourceId::Devex,
                Box::new(DevexProvider::new(client, &ep.devex_site)),
            ),
        ];
        Ok(Self::new(cfg, adapters))
    }

    pub fn scorer(&self) -> &RelevanceScorer {
        &self.scorer
    }

    /// Per-query cap for a request: the configured default when absent,
    /// always within `1..=max_results_ceiling`.
    pub fn effective_cap(&self, requested: Option<usize>) -> usize {
        requested
            .unwrap_or(self.default_max_results)
            .clamp(1, self.max_results_ceiling)
    }

    pub fn available_sources(&self) -> Vec<SourceId> {
        self.adapters.iter().map(|(id, _)| *id).collect()
    }

    fn adapter(&self, id: SourceId) -> Option<&dyn SourceAdapter> {
        self.adapters
            .iter()
            .find(|(sid, _)| *sid == id)
            .map(|(_, a)| a.as_ref())
    }

    pub async fn run(&self, req: &SearchRequest) -> Result<Vec<JobRecord>, RunError> {
        self.run_with_progress(req, |_| {}).await
    }

    /// Run every (term, source) pair in caller order, then deduplicate.
    ///
    /// Fails only when no term or no source is selected. Source failures are
    /// logged and yield nothing for that pair. The result is not filtered by
    /// relevance.
    pub async fn run_with_progress<F>(
        &self,
        req: &SearchRequest,
        mut on_progress: F,
    ) -> Result<Vec<JobRecord>, RunError>
    where
        F: FnMut(&Progress<'_>) + Send,
    {
        ensure_metrics_described();

        let terms = prepare_terms(&req.search_terms);
        if terms.is_empty() {
            return Err(RunError::NoSearchTerms);
        }
        let mut sources: Vec<SourceId> = Vec::with_capacity(req.sources.len());
        for s in &req.sources {
            if !sources.contains(s) {
                sources.push(*s);
            }
        }
        if sources.is_empty() {
            return Err(RunError::NoSources);
        }
        let max_results = self.effective_cap(req.max_results);

        let mut pacer = Pacer::new(self.pacing);
        let mut all = Vec::new();

        for (i, term) in terms.iter().enumerate() {
            let before = all.len();
            for source in &sources {
                let Some(adapter) = self.adapter(*source) else {
                    tracing::warn!(target: "ingest", %source, "no adapter registered, skipping");
                    continue;
                };
                pacer.ready().await;
                let records = self.collect_pair(adapter, term, max_results).await;
                tracing::info!(
                    target: "ingest",
                    %source,
                    term = term.as_str(),
                    records = records.len(),
                    "pair done"
                );
                all.extend(records);
            }
            on_progress(&Progress {
                term_index: i,
                total_terms: terms.len(),
                search_term: term,
                found: all.len() - before,
            });
        }

        let (kept, dropped) = dedup_by_url(all);
        counter!("scout_records_kept_total").increment(kept.len() as u64);
        counter!("scout_dedup_dropped_total").increment(dropped as u64);
        tracing::info!(target: "ingest", kept = kept.len(), dropped, "run complete");

        Ok(kept)
    }

    /// One adapter call, fully absorbed: errors become an empty result.
    async fn collect_pair(
        &self,
        adapter: &dyn SourceAdapter,
        term: &str,
        max_results: usize,
    ) -> Vec<JobRecord> {
        let raw = match adapter.fetch(term, max_results).await {
            Ok(v) => v,
            Err(e) => {
                tracing::warn!(target: "ingest", error = ?e, adapter = adapter.name(), term, "source failed");
                counter!("scout_source_errors_total", "adapter" => adapter.name()).increment(1);
                return Vec::new();
            }
        };

        raw.into_iter()
            .take(max_results)
            .filter_map(|entry| self.normalizer.normalize(entry, term))
            .map(|rec| self.enrich(rec))
            .collect()
    }

    /// Recency (source pin OR phrase match), then relevance.
    fn enrich(&self, mut rec: JobRecord) -> JobRecord {
        rec.is_recent = rec.is_recent || self.recency.classify(Some(&rec.date_posted));
        self.scorer.apply(rec)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn rec(url: &str, term: &str) -> JobRecord {
        JobRecord {
            title: "t".into(),
            organization: "o".into(),
            location: "l".into(),
            url: url.into(),
            date_posted: "d".into(),
            source: SourceId::ReliefWeb,
            scraped_at: Utc::now(),
            search_term: term.into(),
            is_recent: false,
            relevance_score: 0.0,
            is_public_health: false,
        }
    }

    #[test]
    fn dedup_keeps_first_occurrence() {
        let (kept, dropped) = dedup_by_url(vec![
            rec("https://a/1", "first"),
            rec("https://a/2", "first"),
            rec("https://a/1", "second"),
        ]);
        assert_eq!(kept.len(), 2);
        assert_eq!(dropped, 1);
        assert_eq!(kept[0].search_term, "first");
        assert_eq!(kept[1].url, "https://a/2");
    }

    #[test]
    fn prepare_terms_trims_and_dedups() {
        let terms = vec![
            " public health ".to_string(),
            "".to_string(),
            "M&E officer".to_string(),
            "public health".to_string(),
        ];
        assert_eq!(prepare_terms(&terms), vec!["public health", "M&E officer"]);
    }
}

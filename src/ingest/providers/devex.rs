// src/ingest/providers/devex.rs
use anyhow::{Context, Result};
use async_trait::async_trait;
use metrics::{counter, histogram};
use once_cell::sync::Lazy;
use percent_encoding::{utf8_percent_encode, NON_ALPHANUMERIC};
use regex::Regex;
use scraper::{ElementRef, Html, Selector};

use super::{absolutize, element_text, selector};
use crate::ingest::http::HttpClient;
use crate::ingest::types::{RawEntry, ScrapedEntry, SourceAdapter};
use crate::types::{SourceId, GLOBAL_LOCATION};

pub const DEVEX_ORGANIZATION: &str = "Development Organization";
pub const DEVEX_DATE: &str = "Recent";
const MIN_TITLE_CHARS: usize = 5;

static CANDIDATE_CLASS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"job|listing|card").expect("devex class regex"));
static DIV: Lazy<Selector> = Lazy::new(|| selector("div"));
static H3: Lazy<Selector> = Lazy::new(|| selector("h3"));
static H2: Lazy<Selector> = Lazy::new(|| selector("h2"));
static LINK: Lazy<Selector> = Lazy::new(|| selector("a"));

/// Devex job search. No API; markup only, and every hit is treated as recent.
pub struct DevexProvider {
    client: HttpClient,
    site: String,
}

impl DevexProvider {
    pub fn new(client: HttpClient, site: &str) -> Self {
        Self {
            client,
            site: site.trim_end_matches('/').to_string(),
        }
    }

    pub fn search_url(site: &str, search_term: &str) -> String {
        format!(
            "{}/jobs/search?filter[keywords]={}",
            site.trim_end_matches('/'),
            utf8_percent_encode(search_term, NON_ALPHANUMERIC)
        )
    }

    fn is_candidate(el: &ElementRef<'_>) -> bool {
        el.value().classes().any(|c| CANDIDATE_CLASS.is_match(c))
    }

    /// Mine up to `max_results` candidate blocks from a search page.
    ///
    /// Candidates are `div`s with a class containing `job`, `listing` or
    /// `card`. Blocks without a heading/link or with a title under five
    /// characters are skipped.
    pub fn parse_listing(html: &str, site: &str, max_results: usize) -> Vec<RawEntry> {
        let doc = Html::parse_document(html);
        let mut out = Vec::new();

        for block in doc
            .select(&DIV)
            .filter(Self::is_candidate)
            .take(max_results)
        {
            let heading = block
                .select(&H3)
                .next()
                .or_else(|| block.select(&H2).next())
                .or_else(|| block.select(&LINK).next());
            let Some(heading) = heading else {
                continue;
            };

            let title = element_text(&heading);
            if title.chars().count() < MIN_TITLE_CHARS {
                tracing::debug!(target: "ingest", %title, "devex title too short");
                continue;
            }

            let mut entry = ScrapedEntry::new(SourceId::Devex);
            entry.title = Some(title);
            entry.url = block
                .select(&LINK)
                .next()
                .and_then(|a| a.value().attr("href"))
                .and_then(|h| absolutize(site, h));
            entry.organization = Some(DEVEX_ORGANIZATION.to_string());
            entry.location = Some(GLOBAL_LOCATION.to_string());
            entry.date_posted = Some(DEVEX_DATE.to_string());
            entry.pinned_recent = true;
            out.push(RawEntry::Markup(entry));
        }
        out
    }
}

#[async_trait]
impl SourceAdapter for DevexProvider {
    async fn fetch(&self, search_term: &str, max_results: usize) -> Result<Vec<RawEntry>> {
        tracing::info!(target: "ingest", term = search_term, "scraping devex");
        let t0 = std::time::Instant::now();

        let url = Self::search_url(&self.site, search_term);
        let body = self
            .client
            .get_text(&url, &[])
            .await
            .context("devex get()")?;
        let out = Self::parse_listing(&body, &self.site, max_results);

        histogram!("scout_fetch_ms", "adapter" => self.name())
            .record(t0.elapsed().as_secs_f64() * 1_000.0);
        counter!("scout_raw_entries_total", "adapter" => self.name()).increment(out.len() as u64);
        Ok(out)
    }

    fn name(&self) -> &'static str {
        "devex"
    }
}

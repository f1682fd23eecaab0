// src/ingest/providers/reliefweb_html.rs
use anyhow::{Context, Result};
use async_trait::async_trait;
use metrics::{counter, histogram};
use once_cell::sync::Lazy;
use scraper::{Html, Selector};

use super::{absolutize, first_text, selector};
use crate::ingest::http::HttpClient;
use crate::ingest::types::{RawEntry, ScrapedEntry, SourceAdapter};
use crate::types::SourceId;

static ARTICLE: Lazy<Selector> = Lazy::new(|| selector("article.rw-river-article--job"));
static TITLE: Lazy<Selector> = Lazy::new(|| selector("h3"));
static TITLE_LINK: Lazy<Selector> = Lazy::new(|| selector("a"));
static ORGANIZATION: Lazy<Selector> = Lazy::new(|| selector("dd"));
static COUNTRY: Lazy<Selector> = Lazy::new(|| selector("span.rw-river-article__country"));
static POSTED: Lazy<Selector> = Lazy::new(|| selector("time"));

/// Scrapes the reliefweb.int jobs search page. Fallback for the API.
pub struct ReliefWebHtmlProvider {
    client: HttpClient,
    site: String,
}

impl ReliefWebHtmlProvider {
    pub fn new(client: HttpClient, site: &str) -> Self {
        Self {
            client,
            site: site.trim_end_matches('/').to_string(),
        }
    }

    /// Mine up to `max_results` job articles from a search page.
    ///
    /// An article without a title link is skipped; other missing parts are
    /// left empty for the normalizer to fill.
    pub fn parse_listing(html: &str, site: &str, max_results: usize) -> Vec<RawEntry> {
        let doc = Html::parse_document(html);
        let mut out = Vec::new();

        for article in doc.select(&ARTICLE).take(max_results) {
            let Some(link) = article
                .select(&TITLE)
                .next()
                .and_then(|h3| h3.select(&TITLE_LINK).next())
            else {
                tracing::debug!(target: "ingest", "reliefweb article without title link");
                continue;
            };

            let mut entry = ScrapedEntry::new(SourceId::ReliefWeb);
            entry.title = Some(super::element_text(&link));
            entry.url = link.value().attr("href").and_then(|h| absolutize(site, h));
            entry.organization = first_text(&article, &ORGANIZATION);
            entry.location = first_text(&article, &COUNTRY);
            entry.date_posted = first_text(&article, &POSTED);
            out.push(RawEntry::Markup(entry));
        }
        out
    }
}

#[async_trait]
impl SourceAdapter for ReliefWebHtmlProvider {
    async fn fetch(&self, search_term: &str, max_results: usize) -> Result<Vec<RawEntry>> {
        tracing::info!(target: "ingest", term = search_term, "scraping reliefweb search page");
        let t0 = std::time::Instant::now();

        let url = format!("{}/jobs", self.site);
        let body = self
            .client
            .get_text(&url, &[("search", search_term.to_string())])
            .await
            .context("reliefweb html get()")?;
        let out = Self::parse_listing(&body, &self.site, max_results);

        histogram!("scout_fetch_ms", "adapter" => self.name())
            .record(t0.elapsed().as_secs_f64() * 1_000.0);
        counter!("scout_raw_entries_total", "adapter" => self.name()).increment(out.len() as u64);
        Ok(out)
    }

    fn name(&self) -> &'static str {
        "reliefweb_html"
    }
}

// src/normalize.rs
//! Raw source entries → canonical [`JobRecord`].
//!
//! Extraction never fails on a missing field; it substitutes the documented
//! fallback instead. Only an entry without a usable link (or, for markup, a
//! title) is dropped, because it cannot be identified or deduplicated.

use chrono::{DateTime, Utc};
use once_cell::sync::OnceCell;
use regex::Regex;

use crate::ingest::types::{RawEntry, ReliefWebItem, ScrapedEntry};
use crate::types::{
    JobRecord, SourceId, FALLBACK_DATE, FALLBACK_LOCATION, FALLBACK_ORGANIZATION, FALLBACK_TITLE,
};

/// Decode entities, strip tags, collapse whitespace. For API strings, which
/// may carry escaped markup.
pub fn clean_text(s: &str) -> String {
    let decoded = html_escape::decode_html_entities(s).to_string();

    static RE_TAGS: OnceCell<Regex> = OnceCell::new();
    let re_tags = RE_TAGS.get_or_init(|| Regex::new(r"(?is)</?[^>]+>").expect("tag regex"));
    let stripped = re_tags.replace_all(&decoded, " ");

    tidy_text(&stripped)
}

/// Collapse whitespace only. Markup text is already decoded by the HTML
/// parser, so anything that looks like a tag or entity here is literal.
pub fn tidy_text(s: &str) -> String {
    static RE_WS: OnceCell<Regex> = OnceCell::new();
    let re_ws = RE_WS.get_or_init(|| Regex::new(r"\s+").expect("whitespace regex"));
    re_ws.replace_all(s, " ").trim().to_string()
}

/// Cleaned API value, or `None` when nothing is left after cleaning.
fn non_empty(s: Option<&str>) -> Option<String> {
    s.map(clean_text).filter(|t| !t.is_empty())
}

/// Tidied markup value, or `None` when blank.
fn non_blank(s: Option<&str>) -> Option<String> {
    s.map(tidy_text).filter(|t| !t.is_empty())
}

#[derive(Debug, Clone)]
pub struct Normalizer {
    reliefweb_site: String,
}

impl Normalizer {
    pub fn new(reliefweb_site: &str) -> Self {
        Self {
            reliefweb_site: reliefweb_site.trim_end_matches('/').to_string(),
        }
    }

    /// Normalize, stamping `scraped_at` with the current time.
    pub fn normalize(&self, raw: RawEntry, search_term: &str) -> Option<JobRecord> {
        self.normalize_at(raw, search_term, Utc::now())
    }

    /// Normalize with an explicit processing timestamp.
    ///
    /// `is_recent` carries only what the source pins; relevance fields are
    /// zeroed. The pipeline fills both in afterwards.
    pub fn normalize_at(
        &self,
        raw: RawEntry,
        search_term: &str,
        scraped_at: DateTime<Utc>,
    ) -> Option<JobRecord> {
        match raw {
            RawEntry::ReliefWebApi(item) => self.from_reliefweb_item(item, search_term, scraped_at),
            RawEntry::Markup(entry) => from_scraped(entry, search_term, scraped_at),
        }
    }

    fn from_reliefweb_item(
        &self,
        item: ReliefWebItem,
        search_term: &str,
        scraped_at: DateTime<Utc>,
    ) -> Option<JobRecord> {
        let id = match item.id.as_ref()? {
            serde_json::Value::Number(n) => n.to_string(),
            serde_json::Value::String(s) if !s.trim().is_empty() => s.trim().to_string(),
            _ => return None,
        };
        let fields = item.fields;

        let organization = fields
            .source
            .as_deref()
            .and_then(|srcs| srcs.first())
            .and_then(|s| non_empty(s.name.as_deref()))
            .unwrap_or_else(|| FALLBACK_ORGANIZATION.to_string());

        let countries: Vec<String> = fields
            .country
            .as_deref()
            .unwrap_or_default()
            .iter()
            .filter_map(|c| non_empty(c.name.as_deref()))
            .collect();
        let location = if countries.is_empty() {
            FALLBACK_LOCATION.to_string()
        } else {
            countries.join(", ")
        };

        Some(JobRecord {
            title: non_empty(fields.title.as_deref()).unwrap_or_else(|| FALLBACK_TITLE.to_string()),
            organization,
            location,
            url: format!("{}/job/{}", self.reliefweb_site, id),
            date_posted: fields
                .date
                .and_then(|d| non_empty(d.created.as_deref()))
                .unwrap_or_else(|| FALLBACK_DATE.to_string()),
            source: SourceId::ReliefWeb,
            scraped_at,
            search_term: search_term.to_string(),
            is_recent: false,
            relevance_score: 0.0,
            is_public_health: false,
        })
    }
}

fn from_scraped(
    entry: ScrapedEntry,
    search_term: &str,
    scraped_at: DateTime<Utc>,
) -> Option<JobRecord> {
    let title = non_blank(entry.title.as_deref())?;
    let url = entry
        .url
        .as_deref()
        .map(str::trim)
        .filter(|u| u.starts_with("http://") || u.starts_with("https://"))?
        .to_string();

    Some(JobRecord {
        title,
        organization: non_blank(entry.organization.as_deref())
            .unwrap_or_else(|| FALLBACK_ORGANIZATION.to_string()),
        location: non_blank(entry.location.as_deref())
            .unwrap_or_else(|| FALLBACK_LOCATION.to_string()),
        url,
        date_posted: non_blank(entry.date_posted.as_deref())
            .unwrap_or_else(|| FALLBACK_DATE.to_string()),
        source: entry.source,
        scraped_at,
        search_term: search_term.to_string(),
        is_recent: entry.pinned_recent,
        relevance_score: 0.0,
        is_public_health: false,
    })
}

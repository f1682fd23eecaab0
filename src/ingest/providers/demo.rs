// src/ingest/providers/demo.rs
use anyhow::Result;
use async_trait::async_trait;

use crate::ingest::types::{RawEntry, ScrapedEntry, SourceAdapter};
use crate::types::{SourceId, FALLBACK_LOCATION};

/// Canned ReliefWeb-style postings for demonstrations.
///
/// Only wired in when `demo_fallback = true`, as the last resort behind the
/// real ReliefWeb strategies. Off by default.
pub struct DemoProvider {
    site: String,
}

impl DemoProvider {
    pub fn new(reliefweb_site: &str) -> Self {
        Self {
            site: reliefweb_site.trim_end_matches('/').to_string(),
        }
    }

    fn entry(&self, title: String, org: &str, loc: &str, slug: &str, posted: &str) -> RawEntry {
        let mut e = ScrapedEntry::new(SourceId::ReliefWeb);
        e.title = Some(title);
        e.organization = Some(org.to_string());
        e.location = Some(loc.to_string());
        e.url = Some(format!("{}/job/{}", self.site, slug));
        e.date_posted = Some(posted.to_string());
        RawEntry::Markup(e)
    }
}

/// Capitalize every letter that follows a non-letter ("m&e officer" → "M&E Officer").
fn title_case(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut prev_alpha = false;
    for c in s.trim().chars() {
        if c.is_alphabetic() {
            if prev_alpha {
                out.extend(c.to_lowercase());
            } else {
                out.extend(c.to_uppercase());
            }
            prev_alpha = true;
        } else {
            out.push(c);
            prev_alpha = false;
        }
    }
    out
}

#[async_trait]
impl SourceAdapter for DemoProvider {
    async fn fetch(&self, search_term: &str, max_results: usize) -> Result<Vec<RawEntry>> {
        tracing::warn!(target: "ingest", term = search_term, "serving demo postings");
        let t = title_case(search_term);
        let out = vec![
            self.entry(
                format!("Public Health M&E Officer - {t}"),
                "World Health Organization",
                "Geneva, Switzerland",
                "example1",
                "2 hours ago",
            ),
            self.entry(
                format!("Monitoring & Evaluation Specialist - {t}"),
                "UNICEF",
                FALLBACK_LOCATION,
                "example2",
                "1 day ago",
            ),
            self.entry(
                format!("Health Data Analyst - {t}"),
                "International Rescue Committee",
                "New York, USA",
                "example3",
                "3 days ago",
            ),
        ];
        Ok(out.into_iter().take(max_results).collect())
    }

    fn name(&self) -> &'static str {
        "demo"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn title_case_words() {
        assert_eq!(title_case("m&e officer"), "M&E Officer");
        assert_eq!(title_case(" public HEALTH "), "Public Health");
    }

    #[tokio::test]
    async fn demo_postings_are_parameterized_and_capped() {
        let p = DemoProvider::new("https://reliefweb.int");
        let all = p.fetch("health data", 10).await.unwrap();
        assert_eq!(all.len(), 3);
        let RawEntry::Markup(first) = &all[0] else {
            panic!()
        };
        assert_eq!(
            first.title.as_deref(),
            Some("Public Health M&E Officer - Health Data")
        );
        assert_eq!(first.url.as_deref(), Some("https://reliefweb.int/job/example1"));

        assert_eq!(p.fetch("x", 2).await.unwrap().len(), 2);
    }
}

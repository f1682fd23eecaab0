// src/recency.rs
//! Recency heuristic over free-text "posted" fields.
//!
//! No dates are parsed: a posting counts as recent when its date text contains
//! one of a fixed set of phrases ("2 hours ago", "Yesterday", ...).

use crate::config::RecencyConfig;
use crate::types::JobRecord;

#[derive(Debug, Clone)]
pub struct RecencyClassifier {
    phrases: Vec<String>,
}

impl Default for RecencyClassifier {
    fn default() -> Self {
        Self::from_config(&RecencyConfig::default())
    }
}

impl RecencyClassifier {
    pub fn new<I, S>(phrases: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            phrases: phrases
                .into_iter()
                .map(|p| p.as_ref().trim().to_lowercase())
                .filter(|p| !p.is_empty())
                .collect(),
        }
    }

    pub fn from_config(cfg: &RecencyConfig) -> Self {
        Self::new(&cfg.phrases)
    }

    /// True when `date_text` mentions any recency phrase (case-insensitive).
    pub fn classify(&self, date_text: Option<&str>) -> bool {
        let Some(text) = date_text else {
            return false;
        };
        if text.trim().is_empty() {
            return false;
        }
        let lower = text.to_lowercase();
        self.phrases.iter().any(|p| lower.contains(p.as_str()))
    }
}

/// Keep only records flagged as recent, preserving order.
pub fn filter_recent(records: Vec<JobRecord>) -> Vec<JobRecord> {
    records.into_iter().filter(|r| r.is_recent).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn phrases_match_in_any_case() {
        let c = RecencyClassifier::default();
        for t in [
            "2 Hours Ago",
            "1 hour ago",
            "Posted TODAY",
            "just now",
            "1 day ago",
            "Yesterday",
        ] {
            assert!(c.classify(Some(t)), "{t} should be recent");
        }
    }

    #[test]
    fn other_text_is_not_recent() {
        let c = RecencyClassifier::default();
        assert!(!c.classify(Some("3 days ago")));
        assert!(!c.classify(Some("2024-05-01T00:00:00+00:00")));
        assert!(!c.classify(Some("Recent")));
        assert!(!c.classify(Some("")));
        assert!(!c.classify(Some("   ")));
        assert!(!c.classify(None));
    }

    #[test]
    fn substring_semantics_are_kept() {
        // "11 day ago" contains "1 day ago"; the heuristic accepts it.
        let c = RecencyClassifier::default();
        assert!(c.classify(Some("11 day ago")));
    }

    #[test]
    fn custom_vocabulary() {
        let c = RecencyClassifier::new(["New"]);
        assert!(c.classify(Some("NEW listing")));
        assert!(!c.classify(Some("2 hours ago")));
    }

    #[test]
    fn filter_recent_keeps_order() {
        let rec = |url: &str, recent: bool| JobRecord {
            title: "t".into(),
            organization: "o".into(),
            location: "l".into(),
            url: url.into(),
            date_posted: "d".into(),
            source: crate::types::SourceId::Devex,
            scraped_at: chrono::Utc::now(),
            search_term: "x".into(),
            is_recent: recent,
            relevance_score: 0.0,
            is_public_health: false,
        };
        let kept = filter_recent(vec![rec("a", true), rec("b", false), rec("c", true)]);
        let urls: Vec<_> = kept.iter().map(|r| r.url.as_str()).collect();
        assert_eq!(urls, vec!["a", "c"]);
    }
}

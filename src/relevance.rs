// src/relevance.rs
//! Topical relevance for public-health M&E postings.
//!
//! The score is the share of vocabulary keywords found as substrings of
//! `"{title} {organization}"` (lower-cased):
//!
//! - every entry of the keyword list that matches adds one, so a keyword
//!   listed twice weighs double;
//! - the denominator counts distinct keywords only;
//! - the result is clamped to `[0.0, 1.0]` and rounded to two decimals.
//!
//! A record passes (`is_public_health`) when its rounded score reaches the
//! threshold (0.2 by default). Scoring never filters; see
//! [`filter_public_health`] for that.

use std::collections::HashSet;

use crate::config::{RelevanceConfig, DEFAULT_RELEVANCE_THRESHOLD};
use crate::types::JobRecord;

/// Result of relevance evaluation
#[derive(Debug, Clone, PartialEq)]
pub struct Relevance {
    pub score: f64,
    pub is_public_health: bool,
    /// Keywords that matched, in vocabulary order (repeats included).
    pub matched: Vec<String>,
}

#[derive(Debug, Clone)]
pub struct RelevanceScorer {
    keywords: Vec<String>,
    distinct: usize,
    threshold: f64,
}

impl Default for RelevanceScorer {
    fn default() -> Self {
        Self::from_config(&RelevanceConfig::default())
    }
}

impl RelevanceScorer {
    pub fn new<I, S>(keywords: I, threshold: f64) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let keywords: Vec<String> = keywords
            .into_iter()
            .map(|k| k.as_ref().trim().to_lowercase())
            .filter(|k| !k.is_empty())
            .collect();
        let distinct = keywords.iter().collect::<HashSet<_>>().len();
        let threshold = if threshold.is_finite() {
            threshold.clamp(0.0, 1.0)
        } else {
            DEFAULT_RELEVANCE_THRESHOLD
        };
        Self {
            keywords,
            distinct,
            threshold,
        }
    }

    pub fn from_config(cfg: &RelevanceConfig) -> Self {
        Self::new(&cfg.keywords, cfg.threshold)
    }

    pub fn threshold(&self) -> f64 {
        self.threshold
    }

    pub fn vocabulary_size(&self) -> usize {
        self.distinct
    }

    /// Score a title/organization pair. Pure: same input, same output.
    pub fn score(&self, title: &str, organization: &str) -> Relevance {
        let text = format!("{title} {organization}").to_lowercase();

        let matched: Vec<String> = self
            .keywords
            .iter()
            .filter(|k| text.contains(k.as_str()))
            .cloned()
            .collect();

        let raw = if self.distinct == 0 {
            0.0
        } else {
            matched.len() as f64 / self.distinct as f64
        };
        let score = round2(raw.clamp(0.0, 1.0));

        Relevance {
            score,
            is_public_health: score >= self.threshold,
            matched,
        }
    }

    /// Attach score and flag to a record.
    pub fn apply(&self, mut record: JobRecord) -> JobRecord {
        let r = self.score(&record.title, &record.organization);
        record.relevance_score = r.score;
        record.is_public_health = r.is_public_health;
        record
    }
}

fn round2(x: f64) -> f64 {
    (x * 100.0).round() / 100.0
}

/// Keep only records flagged as public-health relevant, preserving order.
pub fn filter_public_health(records: Vec<JobRecord>) -> Vec<JobRecord> {
    records.into_iter().filter(|r| r.is_public_health).collect()
}

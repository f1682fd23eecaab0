// src/types.rs
//! Canonical job record and the source identifiers the pipeline knows about.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

pub const FALLBACK_TITLE: &str = "No title";
pub const FALLBACK_ORGANIZATION: &str = "Unknown Organization";
pub const FALLBACK_LOCATION: &str = "Multiple Locations";
pub const GLOBAL_LOCATION: &str = "Global";
pub const FALLBACK_DATE: &str = "Unknown";

/// External listing sources.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceId {
    ReliefWeb,
    Devex,
}

impl SourceId {
    pub const ALL: [SourceId; 2] = [SourceId::ReliefWeb, SourceId::Devex];

    pub fn as_str(&self) -> &'static str {
        match self {
            SourceId::ReliefWeb => "reliefweb",
            SourceId::Devex => "devex",
        }
    }
}

impl fmt::Display for SourceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SourceId {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "reliefweb" => Ok(SourceId::ReliefWeb),
            "devex" => Ok(SourceId::Devex),
            other => Err(anyhow::anyhow!("unknown source `{other}`")),
        }
    }
}

/// Normalized posting shared by every source.
///
/// `url` is absolute and acts as the dedup key. `relevance_score` and
/// `is_public_health` are filled in for every record, not only matches.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobRecord {
    pub title: String,
    pub organization: String,
    pub location: String,
    pub url: String,
    pub date_posted: String,
    pub source: SourceId,
    pub scraped_at: DateTime<Utc>,
    pub search_term: String,
    pub is_recent: bool,
    pub relevance_score: f64,
    pub is_public_health: bool,
}

// src/export.rs
//! Run summary plus CSV / JSON renderings of a result set.

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::BTreeSet;

use crate::types::JobRecord;

pub const CSV_COLUMNS: [&str; 7] = [
    "title",
    "organization",
    "location",
    "date_posted",
    "source",
    "relevance_score",
    "url",
];

/// Score above which a posting counts as a "high match".
pub const HIGH_MATCH_SCORE: f64 = 0.7;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RunSummary {
    pub total: usize,
    pub recent: usize,
    pub high_match: usize,
    pub sources: Vec<String>,
}

impl RunSummary {
    pub fn from_records(records: &[JobRecord]) -> Self {
        let sources: BTreeSet<&str> = records.iter().map(|r| r.source.as_str()).collect();
        Self {
            total: records.len(),
            recent: records.iter().filter(|r| r.is_recent).count(),
            high_match: records
                .iter()
                .filter(|r| r.relevance_score > HIGH_MATCH_SCORE)
                .count(),
            sources: sources.into_iter().map(str::to_string).collect(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Csv,
    Json,
}

impl ExportFormat {
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "csv" => Some(Self::Csv),
            "json" => Some(Self::Json),
            _ => None,
        }
    }

    pub fn extension(&self) -> &'static str {
        match self {
            Self::Csv => "csv",
            Self::Json => "json",
        }
    }

    pub fn mime(&self) -> &'static str {
        match self {
            Self::Csv => "text/csv",
            Self::Json => "application/json",
        }
    }

    pub fn render(&self, records: &[JobRecord]) -> anyhow::Result<String> {
        match self {
            Self::Csv => Ok(to_csv(records)),
            Self::Json => to_json(records),
        }
    }
}

/// `public_health_jobs_YYYYmmdd_HHMM.<ext>`
pub fn export_filename(format: ExportFormat, at: DateTime<Utc>) -> String {
    format!(
        "public_health_jobs_{}.{}",
        at.format("%Y%m%d_%H%M"),
        format.extension()
    )
}

fn csv_field(s: &str) -> String {
    if s.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", s.replace('"', "\"\""))
    } else {
        s.to_string()
    }
}

/// One row per record over [`CSV_COLUMNS`].
pub fn to_csv(records: &[JobRecord]) -> String {
    let mut out = CSV_COLUMNS.join(",");
    out.push('\n');
    for r in records {
        let row = [
            csv_field(&r.title),
            csv_field(&r.organization),
            csv_field(&r.location),
            csv_field(&r.date_posted),
            csv_field(r.source.as_str()),
            format!("{:.2}", r.relevance_score),
            csv_field(&r.url),
        ];
        out.push_str(&row.join(","));
        out.push('\n');
    }
    out
}

/// Full records, pretty-printed.
pub fn to_json(records: &[JobRecord]) -> anyhow::Result<String> {
    Ok(serde_json::to_string_pretty(records)?)
}

// src/config.rs
//! Scout configuration: vocabularies, pacing, timeouts and endpoints.
//!
//! Resolution order:
//! 1) `$SCOUT_CONFIG_PATH`
//! 2) `config/scout.toml`
//! 3) built-in defaults
//!
//! `SCOUT_RELEVANCE_THRESHOLD` overrides the relevance threshold (clamped to 0..=1).

use anyhow::{anyhow, Context, Result};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

pub const ENV_CONFIG_PATH: &str = "SCOUT_CONFIG_PATH";
pub const ENV_RELEVANCE_THRESHOLD: &str = "SCOUT_RELEVANCE_THRESHOLD";
pub const DEFAULT_CONFIG_PATH: &str = "config/scout.toml";

pub const DEFAULT_USER_AGENT: &str =
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36";
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;
pub const DEFAULT_PACING_MS: u64 = 1_000;
pub const DEFAULT_MAX_RESULTS: usize = 15;
pub const DEFAULT_MAX_RESULTS_CEILING: usize = 30;
pub const DEFAULT_RELEVANCE_THRESHOLD: f64 = 0.2;

pub const DEFAULT_SEARCH_TERMS: [&str; 4] = [
    "monitoring and evaluation",
    "M&E officer",
    "public health",
    "health data",
];

/// "health" appears twice on purpose: every listed entry counts as a match,
/// while the denominator only counts distinct keywords.
pub const DEFAULT_KEYWORDS: [&str; 26] = [
    "public health",
    "monitoring",
    "evaluation",
    "m&e",
    "data",
    "health",
    "strategic information",
    "commcare",
    "dhis2",
    "survey",
    "research",
    "impact assessment",
    "health program",
    "global health",
    "health systems",
    "epidemiology",
    "health",
    "maternal",
    "child health",
    "hiv",
    "tb",
    "malaria",
    "nutrition",
    "monitoring and evaluation",
    "m&e officer",
    "health data",
];

pub const DEFAULT_RECENCY_PHRASES: [&str; 6] = [
    "hours ago",
    "hour ago",
    "today",
    "just now",
    "1 day ago",
    "yesterday",
];

fn default_user_agent() -> String {
    DEFAULT_USER_AGENT.to_string()
}
fn default_timeout_secs() -> u64 {
    DEFAULT_TIMEOUT_SECS
}
fn default_pacing_ms() -> u64 {
    DEFAULT_PACING_MS
}
fn default_max_results() -> usize {
    DEFAULT_MAX_RESULTS
}
fn default_max_results_ceiling() -> usize {
    DEFAULT_MAX_RESULTS_CEILING
}
fn default_search_terms() -> Vec<String> {
    DEFAULT_SEARCH_TERMS.iter().map(|s| s.to_string()).collect()
}

#[derive(Debug, Clone, Deserialize)]
pub struct ScoutConfig {
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
    #[serde(default = "default_timeout_secs")]
    pub request_timeout_secs: u64,
    /// Delay between consecutive adapter invocations.
    #[serde(default = "default_pacing_ms")]
    pub pacing_ms: u64,
    /// Per-query cap on raw entries.
    #[serde(default = "default_max_results")]
    pub max_results: usize,
    /// Upper bound for any per-query cap, including caller-supplied ones.
    #[serde(default = "default_max_results_ceiling")]
    pub max_results_ceiling: usize,
    /// Serve canned ReliefWeb postings when both real strategies come back empty.
    #[serde(default)]
    pub demo_fallback: bool,
    #[serde(default = "default_search_terms")]
    pub default_search_terms: Vec<String>,
    #[serde(default)]
    pub relevance: RelevanceConfig,
    #[serde(default)]
    pub recency: RecencyConfig,
    #[serde(default)]
    pub endpoints: Endpoints,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RelevanceConfig {
    #[serde(default = "RelevanceConfig::default_keywords")]
    pub keywords: Vec<String>,
    #[serde(default = "RelevanceConfig::default_threshold")]
    pub threshold: f64,
}

impl RelevanceConfig {
    fn default_keywords() -> Vec<String> {
        DEFAULT_KEYWORDS.iter().map(|s| s.to_string()).collect()
    }
    fn default_threshold() -> f64 {
        DEFAULT_RELEVANCE_THRESHOLD
    }
}

impl Default for RelevanceConfig {
    fn default() -> Self {
        Self {
            keywords: Self::default_keywords(),
            threshold: Self::default_threshold(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct RecencyConfig {
    #[serde(default = "RecencyConfig::default_phrases")]
    pub phrases: Vec<String>,
}

impl RecencyConfig {
    fn default_phrases() -> Vec<String> {
        DEFAULT_RECENCY_PHRASES.iter().map(|s| s.to_string()).collect()
    }
}

impl Default for RecencyConfig {
    fn default() -> Self {
        Self {
            phrases: Self::default_phrases(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct Endpoints {
    #[serde(default = "Endpoints::default_reliefweb_api")]
    pub reliefweb_api: String,
    #[serde(default = "Endpoints::default_reliefweb_appname")]
    pub reliefweb_appname: String,
    #[serde(default = "Endpoints::default_reliefweb_site")]
    pub reliefweb_site: String,
    #[serde(default = "Endpoints::default_devex_site")]
    pub devex_site: String,
}

impl Endpoints {
    fn default_reliefweb_api() -> String {
        "https://api.reliefweb.int/v1/jobs".to_string()
    }
    fn default_reliefweb_appname() -> String {
        "publichealth".to_string()
    }
    fn default_reliefweb_site() -> String {
        "https://reliefweb.int".to_string()
    }
    fn default_devex_site() -> String {
        "https://www.devex.com".to_string()
    }
}

impl Default for Endpoints {
    fn default() -> Self {
        Self {
            reliefweb_api: Self::default_reliefweb_api(),
            reliefweb_appname: Self::default_reliefweb_appname(),
            reliefweb_site: Self::default_reliefweb_site(),
            devex_site: Self::default_devex_site(),
        }
    }
}

impl Default for ScoutConfig {
    fn default() -> Self {
        Self {
            user_agent: default_user_agent(),
            request_timeout_secs: default_timeout_secs(),
            pacing_ms: default_pacing_ms(),
            max_results: default_max_results(),
            max_results_ceiling: default_max_results_ceiling(),
            demo_fallback: false,
            default_search_terms: default_search_terms(),
            relevance: RelevanceConfig::default(),
            recency: RecencyConfig::default(),
            endpoints: Endpoints::default(),
        }
    }
}

impl ScoutConfig {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    pub fn pacing_interval(&self) -> Duration {
        Duration::from_millis(self.pacing_ms)
    }

    /// Parse TOML content and sanitize it.
    pub fn from_toml_str(s: &str) -> Result<Self> {
        let cfg: ScoutConfig = toml::from_str(s).context("parsing scout config toml")?;
        Ok(cfg.sanitized())
    }

    /// Load from an explicit path.
    pub fn load_from(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("reading scout config from {}", path.display()))?;
        Self::from_toml_str(&content)
    }

    /// Load using env var + fallbacks, then apply env overrides.
    pub fn load_default() -> Result<Self> {
        let mut cfg = if let Ok(p) = std::env::var(ENV_CONFIG_PATH) {
            let pb = PathBuf::from(p);
            if !pb.exists() {
                return Err(anyhow!("{ENV_CONFIG_PATH} points to non-existent path"));
            }
            Self::load_from(&pb)?
        } else {
            let p = PathBuf::from(DEFAULT_CONFIG_PATH);
            if p.exists() {
                Self::load_from(&p)?
            } else {
                Self::default()
            }
        };

        if let Some(t) = parse_threshold_env(std::env::var(ENV_RELEVANCE_THRESHOLD).ok()) {
            cfg.relevance.threshold = t;
        }
        Ok(cfg)
    }

    fn sanitized(mut self) -> Self {
        self.relevance.keywords = clean_list(self.relevance.keywords, false);
        if self.relevance.keywords.is_empty() {
            self.relevance.keywords = RelevanceConfig::default_keywords();
        }
        if !(0.0..=1.0).contains(&self.relevance.threshold) {
            self.relevance.threshold = DEFAULT_RELEVANCE_THRESHOLD;
        }

        self.recency.phrases = clean_list(self.recency.phrases, true);
        if self.recency.phrases.is_empty() {
            self.recency.phrases = RecencyConfig::default_phrases();
        }

        self.default_search_terms = clean_list(self.default_search_terms, true);
        self.max_results_ceiling = self.max_results_ceiling.max(1);
        self.max_results = self.max_results.clamp(1, self.max_results_ceiling);
        if self.request_timeout_secs == 0 {
            self.request_timeout_secs = DEFAULT_TIMEOUT_SECS;
        }
        self
    }
}

// parse optional float env and clamp to <0.0..=1.0>
fn parse_threshold_env(raw: Option<String>) -> Option<f64> {
    raw.and_then(|s| s.trim().parse::<f64>().ok())
        .map(|v| v.clamp(0.0, 1.0))
}

/// Trim and drop empties. Keyword lists keep their repeats, since a repeated
/// keyword weighs more in the score.
fn clean_list(items: Vec<String>, dedup: bool) -> Vec<String> {
    let mut out: Vec<String> = Vec::with_capacity(items.len());
    for it in items {
        let t = it.trim();
        if t.is_empty() || (dedup && out.iter().any(|o| o == t)) {
            continue;
        }
        out.push(t.to_string());
    }
    out
}

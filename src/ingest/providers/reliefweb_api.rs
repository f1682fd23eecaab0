// src/ingest/providers/reliefweb_api.rs
use anyhow::{Context, Result};
use async_trait::async_trait;
use metrics::{counter, histogram};
use serde::Deserialize;

use crate::ingest::http::HttpClient;
use crate::ingest::types::{RawEntry, ReliefWebItem, SourceAdapter};

#[derive(Debug, Deserialize)]
struct Payload {
    data: Vec<serde_json::Value>,
}

/// ReliefWeb jobs API (`GET /v1/jobs`), newest first.
pub struct ReliefWebApiProvider {
    client: HttpClient,
    endpoint: String,
    appname: String,
}

impl ReliefWebApiProvider {
    pub fn new(client: HttpClient, endpoint: &str, appname: &str) -> Self {
        Self {
            client,
            endpoint: endpoint.to_string(),
            appname: appname.to_string(),
        }
    }

    /// Parse an API response body, keeping at most `max_results` items.
    /// Items that do not decode are skipped individually.
    pub fn parse_payload(body: &str, max_results: usize) -> Result<Vec<RawEntry>> {
        let payload: Payload =
            serde_json::from_str(body).context("parsing reliefweb api payload")?;

        let mut out = Vec::with_capacity(payload.data.len().min(max_results));
        for raw in payload.data.into_iter().take(max_results) {
            match serde_json::from_value::<ReliefWebItem>(raw) {
                Ok(item) => out.push(RawEntry::ReliefWebApi(item)),
                Err(e) => {
                    tracing::debug!(target: "ingest", error = %e, "skipping malformed reliefweb item")
                }
            }
        }
        Ok(out)
    }
}

#[async_trait]
impl SourceAdapter for ReliefWebApiProvider {
    async fn fetch(&self, search_term: &str, max_results: usize) -> Result<Vec<RawEntry>> {
        tracing::info!(target: "ingest", term = search_term, "querying reliefweb api");
        let t0 = std::time::Instant::now();

        let query = [
            ("appname", self.appname.clone()),
            ("query[value]", search_term.to_string()),
            ("limit", max_results.to_string()),
            ("preset", "latest".to_string()),
        ];
        let body = self
            .client
            .get_text(&self.endpoint, &query)
            .await
            .context("reliefweb api get()")?;
        let out = Self::parse_payload(&body, max_results)?;

        histogram!("scout_fetch_ms", "adapter" => self.name())
            .record(t0.elapsed().as_secs_f64() * 1_000.0);
        counter!("scout_raw_entries_total", "adapter" => self.name()).increment(out.len() as u64);
        Ok(out)
    }

    fn name(&self) -> &'static str {
        "reliefweb_api"
    }
}

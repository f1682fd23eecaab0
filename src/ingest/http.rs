// src/ingest/http.rs
use std::time::Duration;

use reqwest::{Client, ClientBuilder};
use tracing::instrument;

use crate::errors::FetchError;

/// Shared client for every adapter. Its only state is the identifying
/// User-Agent and the per-request timeout.
#[derive(Debug, Clone)]
pub struct HttpClient {
    inner: Client,
}

impl HttpClient {
    pub fn new(user_agent: &str, timeout: Duration) -> anyhow::Result<Self> {
        let inner = ClientBuilder::new()
            .timeout(timeout)
            .user_agent(user_agent)
            .redirect(reqwest::redirect::Policy::limited(5))
            .build()?;
        Ok(Self { inner })
    }

    /// GET `url` with query pairs and return the body as text.
    #[instrument(skip_all, fields(url = %url))]
    pub async fn get_text(&self, url: &str, query: &[(&str, String)]) -> Result<String, FetchError> {
        let parsed = url::Url::parse(url)?;
        let resp = self
            .inner
            .get(parsed)
            .query(query)
            .send()
            .await
            .map_err(FetchError::from_reqwest_error)?;

        let status = resp.status();
        if !status.is_success() {
            return Err(FetchError::Http { status });
        }
        resp.text().await.map_err(FetchError::from_reqwest_error)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn invalid_url_is_reported() {
        let c = HttpClient::new("test-agent", Duration::from_secs(1)).unwrap();
        let err = c.get_text("not a url", &[]).await.unwrap_err();
        assert!(matches!(err, FetchError::InvalidUrl(_)));
    }
}

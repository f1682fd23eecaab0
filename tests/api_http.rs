// tests/api_http.rs
//
// HTTP-level tests for the public API Router without opening sockets.
// We exercise the router directly via tower::ServiceExt::oneshot, with
// scripted adapters behind the pipeline.

use anyhow::Result;
use async_trait::async_trait;
use axum::{
    body::{self, Body},
    http::{header, Request, StatusCode},
    Router,
};
use serde_json::{json, Value as Json};
use tower::ServiceExt as _; // for `oneshot`

use ph_job_scout::api::{self, AppState};
use ph_job_scout::config::ScoutConfig;
use ph_job_scout::ingest::types::{RawEntry, ScrapedEntry, SourceAdapter};
use ph_job_scout::{Pipeline, SourceId};

const BODY_LIMIT: usize = 1024 * 1024;

/// Same two postings for any term.
struct Canned(SourceId);

#[async_trait]
impl SourceAdapter for Canned {
    async fn fetch(&self, _search_term: &str, _max: usize) -> Result<Vec<RawEntry>> {
        let mk = |title: &str, org: &str, slug: &str, posted: &str| {
            let mut e = ScrapedEntry::new(self.0);
            e.title = Some(title.to_string());
            e.organization = Some(org.to_string());
            e.url = Some(format!("https://jobs.example.org/{}/{slug}", self.0));
            e.date_posted = Some(posted.to_string());
            RawEntry::Markup(e)
        };
        Ok(vec![
            mk("Public Health M&E Officer", "WHO", "ph-me", "2 hours ago"),
            mk("Driver, Field Office", "Logistics Cluster", "driver", "10 Jan 2025"),
        ])
    }

    fn name(&self) -> &'static str {
        self.0.as_str()
    }
}

fn canned(id: SourceId) -> Box<dyn SourceAdapter> {
    Box::new(Canned(id))
}

fn test_router() -> Router {
    let cfg = ScoutConfig {
        pacing_ms: 0,
        ..ScoutConfig::default()
    };
    let pipeline = Pipeline::new(
        &cfg,
        vec![
            (SourceId::ReliefWeb, canned(SourceId::ReliefWeb)),
            (SourceId::Devex, canned(SourceId::Devex)),
        ],
    );
    api::router(AppState::new(pipeline, &cfg))
}

async fn read_body(resp: axum::response::Response) -> String {
    let bytes = body::to_bytes(resp.into_body(), BODY_LIMIT)
        .await
        .expect("read body")
        .to_vec();
    String::from_utf8(bytes).expect("utf8")
}

fn post_json(uri: &str, payload: Json) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(payload.to_string()))
        .expect("build POST")
}

#[tokio::test]
async fn health_returns_ok() {
    let req = Request::builder()
        .method("GET")
        .uri("/health")
        .body(Body::empty())
        .unwrap();
    let resp = test_router().oneshot(req).await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(read_body(resp).await.trim(), "OK");
}

#[tokio::test]
async fn sources_lists_registered_adapters_and_defaults() {
    let req = Request::builder()
        .method("GET")
        .uri("/sources")
        .body(Body::empty())
        .unwrap();
    let resp = test_router().oneshot(req).await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);

    let v: Json = serde_json::from_str(&read_body(resp).await).unwrap();
    assert_eq!(v["sources"], json!(["reliefweb", "devex"]));
    assert_eq!(v["default_search_terms"].as_array().unwrap().len(), 4);
    assert_eq!(v["max_results"], 15);
}

#[tokio::test]
async fn search_returns_summary_and_deduplicated_jobs() {
    let resp = test_router()
        .oneshot(post_json(
            "/search",
            json!({ "search_terms": ["public health", "hiv"], "sources": ["reliefweb"] }),
        ))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);

    let v: Json = serde_json::from_str(&read_body(resp).await).unwrap();
    let jobs = v["jobs"].as_array().unwrap();
    // second term yields the same URLs
    assert_eq!(jobs.len(), 2);
    assert_eq!(jobs[0]["search_term"], "public health");
    assert_eq!(jobs[0]["is_public_health"], true);
    assert_eq!(jobs[1]["is_public_health"], false);

    assert_eq!(v["summary"]["total"], 2);
    assert_eq!(v["summary"]["recent"], 1);
    assert_eq!(v["summary"]["high_match"], 0);
    assert_eq!(v["summary"]["sources"], json!(["reliefweb"]));
}

#[tokio::test]
async fn search_can_keep_only_public_health() {
    let resp = test_router()
        .oneshot(post_json(
            "/search",
            json!({ "only_public_health": true }),
        ))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);

    let v: Json = serde_json::from_str(&read_body(resp).await).unwrap();
    let jobs = v["jobs"].as_array().unwrap();
    // defaults: both sources, distinct URLs per source
    assert_eq!(jobs.len(), 2);
    assert!(jobs.iter().all(|j| j["is_public_health"] == true));
    assert_eq!(v["summary"]["sources"], json!(["devex", "reliefweb"]));
}

#[tokio::test]
async fn empty_selection_is_a_bad_request() {
    let resp = test_router()
        .oneshot(post_json("/search", json!({ "search_terms": [" "] })))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let v: Json = serde_json::from_str(&read_body(resp).await).unwrap();
    assert!(v["error"].as_str().unwrap().contains("search term"));

    let resp = test_router()
        .oneshot(post_json("/search", json!({ "sources": [] })))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn export_csv_is_an_attachment() {
    let resp = test_router()
        .oneshot(post_json(
            "/export",
            json!({ "search_terms": ["public health"], "sources": ["devex"] }),
        ))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(resp.headers()[header::CONTENT_TYPE], "text/csv");
    let disposition = resp.headers()[header::CONTENT_DISPOSITION]
        .to_str()
        .unwrap()
        .to_string();
    assert!(disposition.starts_with("attachment; filename=\"public_health_jobs_"));
    assert!(disposition.ends_with(".csv\""));

    let body = read_body(resp).await;
    let mut lines = body.lines();
    assert_eq!(
        lines.next(),
        Some("title,organization,location,date_posted,source,relevance_score,url")
    );
    assert_eq!(
        lines.next(),
        Some("Public Health M&E Officer,WHO,Multiple Locations,2 hours ago,devex,0.20,https://jobs.example.org/devex/ph-me")
    );
    assert_eq!(
        lines.next(),
        Some("\"Driver, Field Office\",Logistics Cluster,Multiple Locations,10 Jan 2025,devex,0.00,https://jobs.example.org/devex/driver")
    );
}

#[tokio::test]
async fn export_json_and_unknown_format() {
    let resp = test_router()
        .oneshot(post_json(
            "/export?format=json",
            json!({ "search_terms": ["public health"], "sources": ["reliefweb"] }),
        ))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(resp.headers()[header::CONTENT_TYPE], "application/json");
    let v: Json = serde_json::from_str(&read_body(resp).await).unwrap();
    assert_eq!(v.as_array().unwrap().len(), 2);

    let resp = test_router()
        .oneshot(post_json("/export?format=xml", json!({})))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn search_can_keep_only_recent() {
    let resp = test_router()
        .oneshot(post_json(
            "/search",
            json!({ "search_terms": ["public health"], "only_recent": true }),
        ))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);

    let v: Json = serde_json::from_str(&read_body(resp).await).unwrap();
    let jobs = v["jobs"].as_array().unwrap();
    assert_eq!(jobs.len(), 2);
    assert!(jobs.iter().all(|j| j["is_recent"] == true));
    assert!(jobs.iter().all(|j| j["date_posted"] == "2 hours ago"));
    assert_eq!(v["summary"]["recent"], v["summary"]["total"]);
}

#[tokio::test]
async fn export_renders_supplied_jobs_without_searching_again() {
    let resp = test_router()
        .oneshot(post_json(
            "/search",
            json!({ "search_terms": ["public health"], "sources": ["reliefweb"] }),
        ))
        .await
        .unwrap();
    let mut shown: Json = serde_json::from_str(&read_body(resp).await).unwrap();
    let jobs = shown["jobs"].as_array_mut().unwrap();
    // keep one row and mark it so a fresh search could not reproduce it
    jobs.truncate(1);
    jobs[0]["title"] = json!("Edited Title");

    let resp = test_router()
        .oneshot(post_json("/export", json!({ "jobs": jobs })))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);

    let body = read_body(resp).await;
    let rows: Vec<_> = body.lines().skip(1).collect();
    assert_eq!(
        rows,
        vec!["Edited Title,WHO,Multiple Locations,2 hours ago,reliefweb,0.20,https://jobs.example.org/reliefweb/ph-me"]
    );
}

// src/api.rs
//! Thin HTTP surface over the pipeline: what a dashboard needs to run a
//! search, show the summary and download the results.

use std::sync::Arc;

use axum::{
    extract::{Query, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use tower_http::cors::CorsLayer;

use crate::config::ScoutConfig;
use crate::errors::RunError;
use crate::export::{export_filename, ExportFormat, RunSummary};
use crate::ingest::{Pipeline, SearchRequest};
use crate::recency::filter_recent;
use crate::relevance::filter_public_health;
use crate::types::{JobRecord, SourceId};

#[derive(Clone)]
pub struct AppState {
    pipeline: Arc<Pipeline>,
    default_search_terms: Arc<Vec<String>>,
    default_max_results: usize,
}

impl AppState {
    pub fn new(pipeline: Pipeline, cfg: &ScoutConfig) -> Self {
        Self {
            pipeline: Arc::new(pipeline),
            default_search_terms: Arc::new(cfg.default_search_terms.clone()),
            default_max_results: cfg.max_results,
        }
    }
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(|| async { "OK" }))
        .route("/sources", get(sources))
        .route("/search", post(search))
        .route("/export", post(export))
        .layer(CorsLayer::very_permissive())
        .with_state(state)
}

/// Search body. Omitted terms/sources mean "use the defaults"; an explicitly
/// empty list is a selection error.
#[derive(Debug, Default, Deserialize)]
pub struct SearchBody {
    #[serde(default)]
    pub search_terms: Option<Vec<String>>,
    #[serde(default)]
    pub sources: Option<Vec<SourceId>>,
    #[serde(default)]
    pub max_results: Option<usize>,
    #[serde(default)]
    pub only_public_health: bool,
    #[serde(default)]
    pub only_recent: bool,
}

/// Export body. When `jobs` is present those records are rendered as-is,
/// so an export matches what a previous `/search` returned. Otherwise the
/// search fields are run first.
#[derive(Debug, Default, Deserialize)]
pub struct ExportBody {
    #[serde(default)]
    pub jobs: Option<Vec<JobRecord>>,
    #[serde(flatten)]
    pub search: SearchBody,
}

#[derive(Debug, Serialize)]
struct SearchResp {
    summary: RunSummary,
    jobs: Vec<JobRecord>,
}

#[derive(Debug, Serialize)]
struct SourcesResp {
    sources: Vec<SourceId>,
    default_search_terms: Vec<String>,
    max_results: usize,
}

#[derive(Debug, Deserialize)]
struct ExportQuery {
    #[serde(default)]
    format: Option<String>,
}

pub enum ApiError {
    Selection(RunError),
    UnknownFormat(String),
    Render(anyhow::Error),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, msg) = match self {
            ApiError::Selection(e) => (StatusCode::BAD_REQUEST, e.to_string()),
            ApiError::UnknownFormat(f) => (
                StatusCode::BAD_REQUEST,
                format!("unsupported export format `{f}`"),
            ),
            ApiError::Render(e) => {
                tracing::error!(target: "api", error = ?e, "export rendering failed");
                (StatusCode::INTERNAL_SERVER_ERROR, "export failed".to_string())
            }
        };
        (status, Json(serde_json::json!({ "error": msg }))).into_response()
    }
}

async fn sources(State(state): State<AppState>) -> Json<SourcesResp> {
    Json(SourcesResp {
        sources: state.pipeline.available_sources(),
        default_search_terms: state.default_search_terms.as_ref().clone(),
        max_results: state.default_max_results,
    })
}

async fn run_search(state: &AppState, body: SearchBody) -> Result<Vec<JobRecord>, ApiError> {
    let req = SearchRequest {
        search_terms: body
            .search_terms
            .unwrap_or_else(|| state.default_search_terms.as_ref().clone()),
        sources: body
            .sources
            .unwrap_or_else(|| state.pipeline.available_sources()),
        max_results: body.max_results,
    };

    let jobs = state
        .pipeline
        .run_with_progress(&req, |p| {
            tracing::info!(
                target: "api",
                term = p.search_term,
                done = p.term_index + 1,
                total = p.total_terms,
                found = p.found,
                "search progress"
            )
        })
        .await
        .map_err(ApiError::Selection)?;

    let jobs = if body.only_public_health {
        filter_public_health(jobs)
    } else {
        jobs
    };
    Ok(if body.only_recent {
        filter_recent(jobs)
    } else {
        jobs
    })
}

async fn search(
    State(state): State<AppState>,
    Json(body): Json<SearchBody>,
) -> Result<Json<SearchResp>, ApiError> {
    let jobs = run_search(&state, body).await?;
    Ok(Json(SearchResp {
        summary: RunSummary::from_records(&jobs),
        jobs,
    }))
}

async fn export(
    State(state): State<AppState>,
    Query(q): Query<ExportQuery>,
    Json(body): Json<ExportBody>,
) -> Result<Response, ApiError> {
    let raw = q.format.unwrap_or_else(|| "csv".to_string());
    let format = ExportFormat::parse(&raw).ok_or(ApiError::UnknownFormat(raw))?;

    let jobs = match body.jobs {
        Some(jobs) => jobs,
        None => run_search(&state, body.search).await?,
    };
    let content = format.render(&jobs).map_err(ApiError::Render)?;
    let filename = export_filename(format, chrono::Utc::now());

    Ok((
        [
            (header::CONTENT_TYPE, format.mime().to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{filename}\""),
            ),
        ],
        content,
    )
        .into_response())
}

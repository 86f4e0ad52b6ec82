//! HTTP API server for integration with other systems.
//!
//! The index is built once at startup and shared by every request.

use super::search::start_session;
use crate::catalog::{CourseRecord, ListField};
use crate::cli::Output;
use crate::config::Settings;
use crate::error::CoursescoutError;
use crate::session::{SearchOutcome, SearchSession, SearchStatus};
use axum::{
    extract::State,
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tracing::warn;

/// Shared application state.
struct AppState {
    session: SearchSession,
}

/// Run the HTTP API server.
pub async fn run_serve(host: &str, port: u16, settings: Settings) -> anyhow::Result<()> {
    let session = start_session(settings).await?;
    let state = Arc::new(AppState { session });

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let app = Router::new()
        .route("/health", get(health))
        .route("/courses", get(list_courses))
        .route("/search", post(search))
        .route("/reload", post(reload))
        .layer(cors)
        .with_state(state);

    let addr = format!("{}:{}", host, port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    Output::header("Coursescout API Server");
    println!();
    Output::success(&format!("Listening on http://{}", addr));
    println!();
    println!("Endpoints:");
    Output::kv("Health", "GET  /health");
    Output::kv("Courses", "GET  /courses");
    Output::kv("Search", "POST /search");
    Output::kv("Reload", "POST /reload");
    println!();
    Output::info("Press Ctrl+C to stop the server.");

    axum::serve(listener, app).await?;

    Ok(())
}

// === Request/Response Types ===

#[derive(Deserialize)]
struct SearchRequest {
    query: String,
    #[serde(default)]
    k: Option<usize>,
}

#[derive(Serialize)]
struct SearchResponse {
    analysis: String,
    status: SearchStatus,
    courses: Vec<CourseInfo>,
}

impl From<SearchOutcome> for SearchResponse {
    fn from(outcome: SearchOutcome) -> Self {
        let courses = outcome
            .resolved
            .into_iter()
            .map(|r| CourseInfo::from_record(r.record, Some(r.score)))
            .collect();

        Self {
            analysis: outcome.analysis,
            status: outcome.status,
            courses,
        }
    }
}

#[derive(Serialize)]
struct CourseInfo {
    title: String,
    brief: String,
    level: String,
    duration: String,
    url: String,
    curriculum: ListField,
    audience_and_takeaways: ListField,
    #[serde(skip_serializing_if = "Option::is_none")]
    score: Option<f32>,
}

impl CourseInfo {
    fn from_record(record: CourseRecord, score: Option<f32>) -> Self {
        Self {
            title: record.title,
            brief: record.brief,
            level: record.level,
            duration: record.duration,
            url: record.url,
            curriculum: record.curriculum,
            audience_and_takeaways: record.audience_and_takeaways,
            score,
        }
    }
}

#[derive(Serialize)]
struct CourseListResponse {
    courses: Vec<CourseInfo>,
    total: usize,
}

#[derive(Serialize)]
struct ReloadResponse {
    courses_indexed: usize,
}

#[derive(Serialize)]
struct ErrorResponse {
    error: String,
}

fn error_status(error: &CoursescoutError) -> StatusCode {
    match error {
        CoursescoutError::InvalidInput(_) => StatusCode::BAD_REQUEST,
        CoursescoutError::EmbeddingService(_) | CoursescoutError::GenerationService(_) => {
            StatusCode::BAD_GATEWAY
        }
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

fn error_response(error: CoursescoutError) -> axum::response::Response {
    (
        error_status(&error),
        Json(ErrorResponse {
            error: error.to_string(),
        }),
    )
        .into_response()
}

// === Handlers ===

async fn health(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let courses = state.session.index().map(|i| i.len()).unwrap_or(0);
    Json(serde_json::json!({
        "status": "ok",
        "ready": state.session.is_ready(),
        "courses": courses,
    }))
}

async fn list_courses(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let courses: Vec<CourseInfo> = state
        .session
        .index()
        .map(|index| {
            index
                .records()
                .iter()
                .cloned()
                .map(|r| CourseInfo::from_record(r, None))
                .collect()
        })
        .unwrap_or_default();

    Json(CourseListResponse {
        total: courses.len(),
        courses,
    })
}

async fn search(
    State(state): State<Arc<AppState>>,
    Json(req): Json<SearchRequest>,
) -> impl IntoResponse {
    let k = req.k.unwrap_or(state.session.settings().search.default_k);

    match state.session.search(&req.query, k).await {
        Ok(outcome) => Json(SearchResponse::from(outcome)).into_response(),
        Err(e) => {
            warn!("Search request failed: {}", e);
            error_response(e)
        }
    }
}

async fn reload(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    match state.session.load_catalog().await {
        Ok(summary) => Json(ReloadResponse {
            courses_indexed: summary.courses_indexed,
        })
        .into_response(),
        Err(e) => error_response(e),
    }
}

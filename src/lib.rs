pub mod config;
pub mod github;
pub mod querier;
pub mod stats;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use serde::Serialize;
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use config::{AppConfig, RepoId};
use querier::StatsQuerier;

#[derive(Serialize)]
pub struct HealthResponse {
    status: &'static str,
    service: &'static str,
    version: &'static str,
}

/// Shared application state accessible to all request handlers.
pub struct AppState {
    /// Service for querying repository statistics.
    pub querier: StatsQuerier,
    /// Application configuration loaded from environment variables.
    pub config: AppConfig,
}

impl AppState {
    /// Initializes the application state, including the stats querier.
    pub fn new(config: AppConfig) -> anyhow::Result<Self> {
        let querier = StatsQuerier::new(&config)?;
        Ok(Self { querier, config })
    }
}

pub fn create_app(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/api/health", get(health_check))
        .route("/api/repos/{owner}/{repo}/pr-metrics", get(get_pr_metrics))
        .route(
            "/api/repos/{owner}/{repo}/monthly-stats",
            get(get_monthly_stats),
        )
        .route("/api/repos/{owner}/{repo}/repo-stats", get(get_repo_stats))
        .route(
            "/api/repos/{owner}/{repo}/contributor-stats",
            get(get_contributor_stats),
        )
        .route("/api/repos/{owner}/{repo}/issue-stats", get(get_issue_stats))
        .route(
            "/api/repos/{owner}/{repo}/detailed-pr-stats",
            get(get_detailed_pr_stats),
        )
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

pub async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        service: "luminex",
        version: env!("CARGO_PKG_VERSION"),
    })
}

async fn get_pr_metrics(
    Path(repo_id): Path<RepoId>,
    State(state): State<Arc<AppState>>,
) -> Result<Json<stats::PrMetrics>, (StatusCode, String)> {
    state
        .querier
        .pr_metrics(&repo_id)
        .await
        .map(Json)
        .map_err(|e| map_fetch_error(&repo_id, e))
}

async fn get_monthly_stats(
    Path(repo_id): Path<RepoId>,
    State(state): State<Arc<AppState>>,
) -> Result<Json<stats::MonthlyStats>, (StatusCode, String)> {
    state
        .querier
        .monthly_stats(&repo_id)
        .await
        .map(Json)
        .map_err(|e| map_fetch_error(&repo_id, e))
}

async fn get_repo_stats(
    Path(repo_id): Path<RepoId>,
    State(state): State<Arc<AppState>>,
) -> Result<Json<stats::RepoStats>, (StatusCode, String)> {
    state
        .querier
        .repo_stats(&repo_id)
        .await
        .map(Json)
        .map_err(|e| map_fetch_error(&repo_id, e))
}

async fn get_contributor_stats(
    Path(repo_id): Path<RepoId>,
    State(state): State<Arc<AppState>>,
) -> Result<Json<stats::ContributorStats>, (StatusCode, String)> {
    state
        .querier
        .contributor_stats(&repo_id)
        .await
        .map(Json)
        .map_err(|e| map_fetch_error(&repo_id, e))
}

async fn get_issue_stats(
    Path(repo_id): Path<RepoId>,
    State(state): State<Arc<AppState>>,
) -> Result<Json<stats::IssueStats>, (StatusCode, String)> {
    state
        .querier
        .issue_stats(&repo_id)
        .await
        .map(Json)
        .map_err(|e| map_fetch_error(&repo_id, e))
}

async fn get_detailed_pr_stats(
    Path(repo_id): Path<RepoId>,
    State(state): State<Arc<AppState>>,
) -> Result<Json<stats::DetailedPrStats>, (StatusCode, String)> {
    state
        .querier
        .detailed_pr_stats(&repo_id)
        .await
        .map(Json)
        .map_err(|e| map_fetch_error(&repo_id, e))
}

/// Maps a fetch failure onto an HTTP status. The only error kind crossing the
/// stats boundary is an upstream fetch failure; anything we cannot recognize
/// becomes a generic 500.
fn map_fetch_error(repo_id: &RepoId, e: anyhow::Error) -> (StatusCode, String) {
    tracing::error!("Failed to fetch entities for {}: {}", repo_id, e);

    if let Some(octocrab::Error::GitHub { source, .. }) = e.downcast_ref::<octocrab::Error>() {
        let message = source.message.to_lowercase();
        if message.contains("rate limit") {
            return (
                StatusCode::TOO_MANY_REQUESTS,
                "GitHub Rate Limit Exceeded".to_string(),
            );
        }
        if message.contains("not found") {
            return (StatusCode::NOT_FOUND, "Repository Not Found".to_string());
        }
    }

    (
        StatusCode::INTERNAL_SERVER_ERROR,
        "Internal Server Error".to_string(),
    )
}

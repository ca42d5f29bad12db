use crate::cache::FetchCache;
use crate::dashboard::load_dashboard;
use crate::error::{DashboardError, Result};
use crate::github::GitHubClient;
use crate::render::{render_dashboard, render_empty, Theme};
use axum::{
    extract::State,
    http::StatusCode,
    response::{Html, IntoResponse, Json, Response},
    routing::{get, post},
    Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tower_http::trace::TraceLayer;
use tracing::{error, info};

/// Application state shared by all handlers
#[derive(Clone)]
pub struct AppState {
    pub client: Arc<GitHubClient>,
    pub cache: Arc<FetchCache>,
    pub account: String,
    pub top_n: usize,
    pub theme: Theme,
    pub start_time: std::time::Instant,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LivenessResponse {
    pub status: String,
    pub uptime_seconds: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RefreshResponse {
    pub account: String,
    pub cleared: bool,
}

pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(dashboard_page))
        .route("/api/stats", get(stats_json))
        .route("/api/repos", get(repos_json))
        .route("/refresh", post(refresh))
        .route("/livez", get(liveness_check))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Start the dashboard HTTP server and run until `shutdown` resolves.
pub async fn start_server<F>(
    state: AppState,
    port: u16,
    shutdown: F,
) -> Result<()>
where
    F: std::future::Future<Output = ()> + Send + 'static,
{
    let account = state.account.clone();
    let app = create_router(state);

    let addr = format!("0.0.0.0:{}", port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    info!(account = %account, "Dashboard listening on http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown)
        .await?;

    Ok(())
}

fn status_for(err: &DashboardError) -> StatusCode {
    match err {
        DashboardError::EmptyResult(_) => StatusCode::NOT_FOUND,
        DashboardError::InvalidAccount(_) => StatusCode::BAD_REQUEST,
        DashboardError::NetworkError(_)
        | DashboardError::SchemaError { .. }
        | DashboardError::ParseError { .. } => StatusCode::BAD_GATEWAY,
        DashboardError::ConfigError(_) | DashboardError::IoError(_) => {
            StatusCode::INTERNAL_SERVER_ERROR
        }
    }
}

fn json_error(err: DashboardError) -> Response {
    let status = status_for(&err);
    if status.is_server_error() {
        error!("Dashboard request failed: {}", err);
    }
    (
        status,
        Json(ErrorResponse {
            error: err.to_string(),
        }),
    )
        .into_response()
}

async fn dashboard_page(State(state): State<AppState>) -> Response {
    match load_dashboard(&state.client, &state.cache, &state.account, state.top_n).await {
        Ok(dashboard) => Html(render_dashboard(
            &state.account,
            &dashboard.stats,
            dashboard.outcome.truncation.as_ref(),
            state.theme,
        ))
        .into_response(),
        Err(DashboardError::EmptyResult(_)) => (
            StatusCode::NOT_FOUND,
            Html(render_empty(&state.account, state.theme)),
        )
            .into_response(),
        Err(e) => json_error(e),
    }
}

async fn stats_json(State(state): State<AppState>) -> Response {
    match load_dashboard(&state.client, &state.cache, &state.account, state.top_n).await {
        Ok(dashboard) => (StatusCode::OK, Json(dashboard.stats)).into_response(),
        Err(e) => json_error(e),
    }
}

async fn repos_json(State(state): State<AppState>) -> Response {
    match load_dashboard(&state.client, &state.cache, &state.account, state.top_n).await {
        Ok(dashboard) => (StatusCode::OK, Json(dashboard.table)).into_response(),
        Err(e) => json_error(e),
    }
}

async fn refresh(State(state): State<AppState>) -> impl IntoResponse {
    let cleared = state.cache.invalidate(&state.account).await;
    info!(account = %state.account, cleared, "Repository listing cache cleared");
    (
        StatusCode::OK,
        Json(RefreshResponse {
            account: state.account.clone(),
            cleared,
        }),
    )
}

async fn liveness_check(State(state): State<AppState>) -> impl IntoResponse {
    (
        StatusCode::OK,
        Json(LivenessResponse {
            status: "alive".to_string(),
            uptime_seconds: state.start_time.elapsed().as_secs(),
        }),
    )
}

#![allow(dead_code)]

use axum::{
    extract::{Path, Query, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde::Deserialize;
use serde_json::{json, Value};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

/// What the stand-in API answers for one page number.
#[derive(Debug, Clone)]
pub enum MockPage {
    Repos(Vec<Value>),
    Status(u16),
    Garbage,
}

#[derive(Debug, Clone)]
pub struct SeenRequest {
    pub account: String,
    pub page: u32,
    pub per_page: u32,
    pub authorization: Option<String>,
    pub user_agent: Option<String>,
}

struct MockState {
    pages: Vec<MockPage>,
    hits: AtomicUsize,
    seen: Mutex<Vec<SeenRequest>>,
}

#[derive(Deserialize)]
struct PageQuery {
    page: u32,
    per_page: u32,
}

/// Local HTTP server answering `/users/{account}/repos` like the GitHub API.
/// Pages past the configured ones are empty arrays.
pub struct MockGitHub {
    pub base_url: String,
    state: Arc<MockState>,
}

impl MockGitHub {
    pub async fn start(pages: Vec<MockPage>) -> anyhow::Result<Self> {
        let state = Arc::new(MockState {
            pages,
            hits: AtomicUsize::new(0),
            seen: Mutex::new(Vec::new()),
        });

        let app = Router::new()
            .route("/users/:account/repos", get(list_repos))
            .with_state(state.clone());

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await?;
        let addr = listener.local_addr()?;
        tokio::spawn(async move {
            axum::serve(listener, app).await.ok();
        });

        Ok(MockGitHub {
            base_url: format!("http://{}", addr),
            state,
        })
    }

    pub fn hits(&self) -> usize {
        self.state.hits.load(Ordering::SeqCst)
    }

    pub fn seen(&self) -> Vec<SeenRequest> {
        self.state.seen.lock().unwrap().clone()
    }
}

async fn list_repos(
    State(state): State<Arc<MockState>>,
    Path(account): Path<String>,
    Query(query): Query<PageQuery>,
    headers: HeaderMap,
) -> Response {
    state.hits.fetch_add(1, Ordering::SeqCst);
    let header = |name: &str| {
        headers
            .get(name)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string)
    };
    state.seen.lock().unwrap().push(SeenRequest {
        account,
        page: query.page,
        per_page: query.per_page,
        authorization: header("authorization"),
        user_agent: header("user-agent"),
    });

    let index = query.page.saturating_sub(1) as usize;
    match state.pages.get(index) {
        Some(MockPage::Repos(repos)) => Json(Value::Array(repos.clone())).into_response(),
        Some(MockPage::Status(code)) => {
            let status = StatusCode::from_u16(*code).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
            (status, Json(json!({"message": "mock failure"}))).into_response()
        }
        Some(MockPage::Garbage) => (StatusCode::OK, "not json at all").into_response(),
        None => Json(json!([])).into_response(),
    }
}

pub fn repo(name: &str, stars: u64, language: Option<&str>, created_at: &str) -> Value {
    json!({
        "id": 1,
        "name": name,
        "full_name": format!("octocat/{}", name),
        "private": false,
        "stargazers_count": stars,
        "language": language,
        "created_at": created_at,
    })
}

/// `count` distinct repositories, names starting at `offset`.
pub fn repos(count: usize, offset: usize) -> Vec<Value> {
    (offset..offset + count)
        .map(|i| {
            let language = if i % 3 == 0 { None } else { Some("Rust") };
            let created_at = format!("{}-03-01T12:00:00Z", 2015 + (i % 8));
            repo(&format!("repo-{}", i), (i % 50) as u64, language, &created_at)
        })
        .collect()
}

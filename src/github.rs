use crate::error::{DashboardError, Result};
use crate::types::RawRepository;
use reqwest::{Client, RequestBuilder, Response};
use serde::Serialize;
use std::fmt;
use std::time::Duration;
use tracing::{debug, info, warn};
use url::Url;

pub const API_BASE_URL: &str = "https://api.github.com";
pub const PER_PAGE: u32 = 100;
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;
pub const USER_AGENT: &str = concat!("github-dashboard/", env!("CARGO_PKG_VERSION"));

/// Everything the fetcher needs, passed in explicitly by the caller.
#[derive(Debug, Clone)]
pub struct FetchConfig {
    pub api_base_url: String,
    pub token: Option<String>,
    pub per_page: u32,
    pub timeout: Duration,
    pub user_agent: String,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            api_base_url: API_BASE_URL.to_string(),
            token: None,
            per_page: PER_PAGE,
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            user_agent: USER_AGENT.to_string(),
        }
    }
}

/// Why pagination stopped before an empty page was seen.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Truncation {
    Status { page: u32, status: u16 },
    Transport { page: u32, message: String },
    Body { page: u32, message: String },
}

impl Truncation {
    pub fn page(&self) -> u32 {
        match self {
            Truncation::Status { page, .. }
            | Truncation::Transport { page, .. }
            | Truncation::Body { page, .. } => *page,
        }
    }
}

impl fmt::Display for Truncation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Truncation::Status { page, status } => {
                write!(f, "page {} returned HTTP {}", page, status)
            }
            Truncation::Transport { page, message } => {
                write!(f, "page {} request failed: {}", page, message)
            }
            Truncation::Body { page, message } => {
                write!(f, "page {} body could not be decoded: {}", page, message)
            }
        }
    }
}

/// Records collected by one pagination run.
#[derive(Debug, Clone, Default, Serialize)]
pub struct FetchOutcome {
    pub repositories: Vec<RawRepository>,
    pub pages_fetched: u32,
    /// Set when a failing page cut the listing short. The records already
    /// collected are still returned.
    pub truncation: Option<Truncation>,
}

impl FetchOutcome {
    pub fn is_empty(&self) -> bool {
        self.repositories.is_empty()
    }

    pub fn is_complete(&self) -> bool {
        self.truncation.is_none()
    }
}

pub struct GitHubClient {
    client: Client,
    base_url: Url,
    token: Option<String>,
    per_page: u32,
}

impl GitHubClient {
    pub fn new(config: FetchConfig) -> Result<Self> {
        if config.per_page == 0 {
            return Err(DashboardError::ConfigError(
                "page size must be at least 1".to_string(),
            ));
        }

        let base_url = Url::parse(&config.api_base_url).map_err(|e| {
            DashboardError::ConfigError(format!(
                "Invalid API base URL {}: {}",
                config.api_base_url, e
            ))
        })?;
        if base_url.cannot_be_a_base() {
            return Err(DashboardError::ConfigError(format!(
                "API base URL cannot carry a path: {}",
                config.api_base_url
            )));
        }

        let client = Client::builder()
            .user_agent(config.user_agent)
            .timeout(config.timeout)
            .build()?;

        let token = config.token.filter(|t| !t.trim().is_empty());

        Ok(GitHubClient {
            client,
            base_url,
            token,
            per_page: config.per_page,
        })
    }

    pub fn has_token(&self) -> bool {
        self.token.is_some()
    }

    /// `{base}/users/{account}/repos?per_page={n}&page={page}`
    pub fn page_url(&self, account: &str, page: u32) -> Url {
        let mut url = self.base_url.clone();
        if let Ok(mut segments) = url.path_segments_mut() {
            segments
                .pop_if_empty()
                .extend(["users", account, "repos"]);
        }
        url.query_pairs_mut()
            .append_pair("per_page", &self.per_page.to_string())
            .append_pair("page", &page.to_string());
        url
    }

    fn request(&self, url: Url) -> RequestBuilder {
        let request = self
            .client
            .get(url)
            .header("Accept", "application/vnd.github.v3+json");

        match &self.token {
            Some(token) => request.header("Authorization", format!("token {}", token)),
            None => request,
        }
    }

    /// Fetch every public repository of `account`, one page at a time.
    ///
    /// An empty page ends the listing. A failing page after the first one
    /// also ends it: the records gathered so far are returned and the cause
    /// is recorded in [`FetchOutcome::truncation`]. Only a request that cannot
    /// be completed at all on page 1 is reported as an error.
    pub async fn fetch_repositories(&self, account: &str) -> Result<FetchOutcome> {
        let account = account.trim();
        if account.is_empty() {
            return Err(DashboardError::InvalidAccount(
                "account identifier must not be empty".to_string(),
            ));
        }

        let mut outcome = FetchOutcome::default();
        let mut page = 1u32;

        loop {
            let url = self.page_url(account, page);
            debug!(account, page, "Requesting repository page");

            let response = match self.request(url).send().await {
                Ok(response) => response,
                Err(e) if page == 1 => return Err(e.into()),
                Err(e) => {
                    outcome.truncation = Some(Truncation::Transport {
                        page,
                        message: e.to_string(),
                    });
                    break;
                }
            };

            log_rate_limit(&response);

            let status = response.status();
            if !status.is_success() {
                outcome.truncation = Some(Truncation::Status {
                    page,
                    status: status.as_u16(),
                });
                break;
            }

            let items: Vec<RawRepository> = match response.json().await {
                Ok(items) => items,
                Err(e) if page == 1 => return Err(e.into()),
                Err(e) => {
                    outcome.truncation = Some(Truncation::Body {
                        page,
                        message: e.to_string(),
                    });
                    break;
                }
            };

            if items.is_empty() {
                break;
            }

            debug!(account, page, count = items.len(), "Received repository page");
            outcome.repositories.extend(items);
            outcome.pages_fetched += 1;
            page += 1;
        }

        match &outcome.truncation {
            Some(cause) => warn!(
                account,
                retrieved = outcome.repositories.len(),
                "Repository listing truncated: {}",
                cause
            ),
            None => info!(
                account,
                pages = outcome.pages_fetched,
                retrieved = outcome.repositories.len(),
                "Fetched repository listing"
            ),
        }

        Ok(outcome)
    }
}

fn log_rate_limit(response: &Response) {
    let remaining = response
        .headers()
        .get("X-RateLimit-Remaining")
        .and_then(|h| h.to_str().ok())
        .and_then(|s| s.parse::<u32>().ok());

    if let Some(remaining) = remaining {
        if remaining < 10 {
            warn!("Rate limit low ({} remaining)", remaining);
        } else {
            debug!(remaining, "Rate limit status");
        }
    }
}

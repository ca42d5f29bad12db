use crate::error::Result;
use crate::github::{FetchOutcome, GitHubClient};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::debug;

/// Memoized fetch results keyed by account identifier. Entries live until
/// they are invalidated; there is no eviction.
#[derive(Default)]
pub struct FetchCache {
    entries: Mutex<HashMap<String, Arc<FetchOutcome>>>,
}

impl FetchCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the stored outcome for `account`, fetching it on first use.
    /// Errors are not stored, so the next call retries.
    pub async fn get_or_fetch(
        &self,
        client: &GitHubClient,
        account: &str,
    ) -> Result<Arc<FetchOutcome>> {
        // Held across the fetch so concurrent callers share one listing.
        let mut entries = self.entries.lock().await;

        if let Some(outcome) = entries.get(account) {
            debug!(account, "Serving repository listing from cache");
            return Ok(outcome.clone());
        }

        let outcome = Arc::new(client.fetch_repositories(account).await?);
        entries.insert(account.to_string(), outcome.clone());
        Ok(outcome)
    }

    pub async fn invalidate(&self, account: &str) -> bool {
        self.entries.lock().await.remove(account).is_some()
    }

    pub async fn len(&self) -> usize {
        self.entries.lock().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.entries.lock().await.is_empty()
    }
}

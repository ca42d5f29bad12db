use crate::cache::FetchCache;
use crate::error::{DashboardError, Result};
use crate::github::{FetchOutcome, GitHubClient};
use crate::stats::DashboardStats;
use crate::table::{build_table, RepositoryTable};
use std::sync::Arc;
use tracing::info;

/// One render's worth of data: the fetch it came from, the table and the
/// aggregates drawn from it.
#[derive(Debug, Clone)]
pub struct Dashboard {
    pub account: String,
    pub outcome: Arc<FetchOutcome>,
    pub table: RepositoryTable,
    pub stats: DashboardStats,
}

/// Fetch (through the cache), build the table and compute the aggregates.
///
/// An account with no retrievable repositories is reported as
/// [`DashboardError::EmptyResult`], whether the account does not exist or
/// every request failed.
pub async fn load_dashboard(
    client: &GitHubClient,
    cache: &FetchCache,
    account: &str,
    top_n: usize,
) -> Result<Dashboard> {
    let outcome = cache.get_or_fetch(client, account).await?;
    if outcome.is_empty() {
        return Err(DashboardError::EmptyResult(account.to_string()));
    }

    let table = build_table(&outcome.repositories)?;
    let stats = DashboardStats::from_table(&table, top_n);

    info!(
        account,
        repositories = stats.summary.repository_count,
        stars = stats.summary.total_stars,
        languages = stats.summary.distinct_languages,
        "Dashboard data ready"
    );

    Ok(Dashboard {
        account: account.to_string(),
        outcome,
        table,
        stats,
    })
}

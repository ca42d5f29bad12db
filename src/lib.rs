pub mod cache;
pub mod cli;
pub mod dashboard;
pub mod error;
pub mod github;
pub mod render;
pub mod server;
pub mod stats;
pub mod table;
pub mod types;

pub use dashboard::{load_dashboard, Dashboard};
pub use error::{DashboardError, Result};
pub use github::{FetchConfig, FetchOutcome, GitHubClient, Truncation};
pub use table::{build_table, RepositoryRow, RepositoryTable};
pub use types::RawRepository;

use crate::github::{FetchConfig, API_BASE_URL, DEFAULT_TIMEOUT_SECS, PER_PAGE, USER_AGENT};
use crate::render::Theme;
use crate::stats::TOP_REPOSITORIES;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::time::Duration;

#[derive(Parser, Debug)]
#[command(name = "github-dashboard")]
#[command(about = "GitHub Dashboard - Summary charts for a user's public repositories")]
#[command(version)]
pub struct Cli {
    /// GitHub account whose public repositories are listed
    #[arg(long, short = 'u', env = "GITHUB_USERNAME")]
    pub username: String,

    /// Personal access token, raises the API rate limit
    #[arg(long, env = "GITHUB_TOKEN", hide_env_values = true)]
    pub token: Option<String>,

    /// GitHub REST API base URL
    #[arg(long, env = "GITHUB_API_URL", default_value = API_BASE_URL)]
    pub api_url: String,

    /// Repositories requested per page
    #[arg(long, env = "GITHUB_PER_PAGE", default_value_t = PER_PAGE,
          value_parser = clap::value_parser!(u32).range(1..=100))]
    pub per_page: u32,

    /// HTTP request timeout in seconds
    #[arg(long, env = "GITHUB_TIMEOUT_SECS", default_value_t = DEFAULT_TIMEOUT_SECS)]
    pub timeout_secs: u64,

    /// Number of repositories in the top-by-stars chart
    #[arg(long, env = "DASHBOARD_TOP_N", default_value_t = TOP_REPOSITORIES)]
    pub top_n: usize,

    /// Color theme for the rendered page
    #[arg(long, env = "DASHBOARD_THEME", value_enum, default_value_t = Theme::Dark)]
    pub theme: Theme,

    /// Port for the dashboard server
    #[arg(long, env = "DASHBOARD_PORT", default_value_t = 8080)]
    pub port: u16,

    /// Log filter used when RUST_LOG is not set
    #[arg(long, env = "LOG_LEVEL", default_value = "info")]
    pub log_level: String,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Serve the dashboard over HTTP (default)
    Serve,
    /// Render the dashboard once to an HTML file
    Render {
        /// Output file
        #[arg(long, short = 'o', default_value = "dashboard.html")]
        output: PathBuf,
    },
    /// Print the metrics and aggregates to the terminal
    Summary,
}

impl Cli {
    pub fn fetch_config(&self) -> FetchConfig {
        FetchConfig {
            api_base_url: self.api_url.clone(),
            token: self.token.clone(),
            per_page: self.per_page,
            timeout: Duration::from_secs(self.timeout_secs),
            user_agent: USER_AGENT.to_string(),
        }
    }

    pub fn command(&self) -> Command {
        self.command.clone().unwrap_or(Command::Serve)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_to_serve() {
        let cli = Cli::try_parse_from(["github-dashboard", "--username", "octocat"]).unwrap();
        assert_eq!(cli.command(), Command::Serve);
        assert_eq!(cli.top_n, TOP_REPOSITORIES);
    }

    #[test]
    fn render_subcommand_takes_output() {
        let cli = Cli::try_parse_from([
            "github-dashboard",
            "-u",
            "octocat",
            "render",
            "--output",
            "out.html",
        ])
        .unwrap();
        assert_eq!(
            cli.command(),
            Command::Render {
                output: PathBuf::from("out.html")
            }
        );
    }

    #[test]
    fn fetch_config_carries_token() {
        let cli = Cli::try_parse_from([
            "github-dashboard",
            "-u",
            "octocat",
            "--token",
            "abc",
            "--per-page",
            "50",
        ])
        .unwrap();
        let config = cli.fetch_config();
        assert_eq!(config.token.as_deref(), Some("abc"));
        assert_eq!(config.per_page, 50);
    }

    #[test]
    fn rejects_oversized_page() {
        let result = Cli::try_parse_from(["github-dashboard", "-u", "x", "--per-page", "500"]);
        assert!(result.is_err());
    }
}

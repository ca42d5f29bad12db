use clap::Parser;
use colored::*;
use github_dashboard::cache::FetchCache;
use github_dashboard::cli::{Cli, Command};
use github_dashboard::error::{DashboardError, Result};
use github_dashboard::github::GitHubClient;
use github_dashboard::render::{profile_url, render_dashboard};
use github_dashboard::server::{start_server, AppState};
use github_dashboard::{load_dashboard, Dashboard};
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if it exists
    dotenv::dotenv().ok();

    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(&cli.log_level))
        )
        .init();

    println!("{}", "GitHub Dashboard".bold().green());
    println!("{}\n", "=".repeat(50).dimmed());

    let client = Arc::new(GitHubClient::new(cli.fetch_config())?);
    if !client.has_token() {
        println!("{}", "No GITHUB_TOKEN set, using the unauthenticated rate limit".yellow());
    }
    let cache = Arc::new(FetchCache::new());

    match cli.command() {
        Command::Serve => {
            let state = AppState {
                client,
                cache,
                account: cli.username.clone(),
                top_n: cli.top_n,
                theme: cli.theme,
                start_time: std::time::Instant::now(),
            };

            println!("📡 Serving dashboard for {} on port {}", cli.username.bold(), cli.port);
            println!("\nPress Ctrl+C to stop the server\n");

            let shutdown = async {
                tokio::signal::ctrl_c().await.ok();
                println!("\n🛑 Shutting down server...");
            };
            start_server(state, cli.port, shutdown).await?;

            println!("✅ Server stopped");
        }
        Command::Render { output } => {
            let Some(dashboard) = load_or_report(&client, &cache, &cli).await? else {
                std::process::exit(1);
            };
            let html = render_dashboard(
                &cli.username,
                &dashboard.stats,
                dashboard.outcome.truncation.as_ref(),
                cli.theme,
            );
            std::fs::write(&output, html)?;
            info!(path = %output.display(), "Dashboard written");
            println!("✅ Wrote {}", output.display());
        }
        Command::Summary => {
            let Some(dashboard) = load_or_report(&client, &cache, &cli).await? else {
                std::process::exit(1);
            };
            print_summary(&dashboard);
        }
    }

    Ok(())
}

/// `None` after telling the user nothing could be fetched.
async fn load_or_report(
    client: &GitHubClient,
    cache: &FetchCache,
    cli: &Cli,
) -> Result<Option<Dashboard>> {
    match load_dashboard(client, cache, &cli.username, cli.top_n).await {
        Ok(dashboard) => Ok(Some(dashboard)),
        Err(DashboardError::EmptyResult(account)) => {
            eprintln!(
                "{}",
                format!("❌ Could not fetch any repositories for {}. Check the username.", account)
                    .red()
            );
            Ok(None)
        }
        Err(e) => Err(e),
    }
}

fn print_summary(dashboard: &Dashboard) {
    let stats = &dashboard.stats;

    if let Some(cause) = &dashboard.outcome.truncation {
        println!("{}", format!("⚠️ Partial listing: {}", cause).yellow());
    }

    println!("{} {}", "Account:".bold(), profile_url(&dashboard.account));
    println!("📁 Public repositories: {}", stats.summary.repository_count);
    println!("⭐ Total stars: {}", stats.summary.total_stars);
    println!("🗣️ Languages used: {}", stats.summary.distinct_languages);

    println!("\n{}", "Most used languages".bold());
    for entry in &stats.languages {
        println!("  {:<20} {}", entry.language, entry.repositories);
    }

    println!("\n{}", format!("Top {} repositories (by stars)", stats.top_repositories.len()).bold());
    for row in &stats.top_repositories {
        println!("  {:<40} {}", row.name, row.stargazers_count.to_string().yellow());
    }

    println!("\n{}", "Repositories created per year".bold());
    for entry in &stats.years {
        println!("  {}  {}", entry.year, "█".repeat(entry.repositories).cyan());
    }
}

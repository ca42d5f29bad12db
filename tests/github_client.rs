mod common;

use common::{repos, MockGitHub, MockPage};
use github_dashboard::error::DashboardError;
use github_dashboard::github::{FetchConfig, GitHubClient, Truncation};
use std::time::Duration;

fn client_for(mock: &MockGitHub, token: Option<&str>) -> GitHubClient {
    GitHubClient::new(FetchConfig {
        api_base_url: mock.base_url.clone(),
        token: token.map(str::to_string),
        timeout: Duration::from_secs(5),
        ..Default::default()
    })
    .expect("Failed to create client")
}

fn get_test_token() -> Option<String> {
    std::env::var("GITHUB_TOKEN").ok()
}

#[tokio::test]
async fn test_github_client_creation() {
    let client = GitHubClient::new(FetchConfig::default());
    assert!(client.is_ok());
}

#[tokio::test]
async fn test_invalid_base_url() {
    let result = GitHubClient::new(FetchConfig {
        api_base_url: "not a url".to_string(),
        ..Default::default()
    });
    assert!(matches!(result, Err(DashboardError::ConfigError(_))));
}

#[tokio::test]
async fn test_empty_first_page() {
    let mock = MockGitHub::start(vec![MockPage::Repos(vec![])]).await.unwrap();
    let outcome = client_for(&mock, None)
        .fetch_repositories("octocat")
        .await
        .expect("fetch");

    assert!(outcome.is_empty());
    assert!(outcome.is_complete());
    assert_eq!(outcome.pages_fetched, 0);
    assert_eq!(mock.hits(), 1);
}

#[tokio::test]
async fn test_pagination_concatenates_in_order() {
    let mock = MockGitHub::start(vec![
        MockPage::Repos(repos(100, 0)),
        MockPage::Repos(repos(100, 100)),
        MockPage::Repos(repos(7, 200)),
    ])
    .await
    .unwrap();

    let outcome = client_for(&mock, None)
        .fetch_repositories("octocat")
        .await
        .expect("fetch");

    assert_eq!(outcome.repositories.len(), 207);
    assert_eq!(outcome.pages_fetched, 3);
    assert!(outcome.is_complete());
    // three full pages plus the empty one that ends the listing
    assert_eq!(mock.hits(), 4);

    let names: Vec<String> = outcome
        .repositories
        .iter()
        .map(|r| r.field("name").and_then(|v| v.as_str()).unwrap().to_string())
        .collect();
    let expected: Vec<String> = (0..207).map(|i| format!("repo-{}", i)).collect();
    assert_eq!(names, expected);

    let pages: Vec<u32> = mock.seen().iter().map(|r| r.page).collect();
    assert_eq!(pages, vec![1, 2, 3, 4]);
    assert!(mock.seen().iter().all(|r| r.per_page == 100 && r.account == "octocat"));
}

#[tokio::test]
async fn test_page_two_failure_keeps_first_page() {
    let mock = MockGitHub::start(vec![MockPage::Repos(repos(100, 0)), MockPage::Status(500)])
        .await
        .unwrap();

    let outcome = client_for(&mock, None)
        .fetch_repositories("octocat")
        .await
        .expect("a later page failure must not be an error");

    assert_eq!(outcome.repositories.len(), 100);
    assert_eq!(outcome.pages_fetched, 1);
    assert_eq!(
        outcome.truncation,
        Some(Truncation::Status { page: 2, status: 500 })
    );
    assert_eq!(mock.hits(), 2);
}

#[tokio::test]
async fn test_undecodable_later_page_truncates() {
    let mock = MockGitHub::start(vec![MockPage::Repos(repos(3, 0)), MockPage::Garbage])
        .await
        .unwrap();

    let outcome = client_for(&mock, None)
        .fetch_repositories("octocat")
        .await
        .expect("fetch");

    assert_eq!(outcome.repositories.len(), 3);
    assert!(matches!(outcome.truncation, Some(Truncation::Body { page: 2, .. })));
}

#[tokio::test]
async fn test_unknown_account_yields_empty_listing() {
    let mock = MockGitHub::start(vec![MockPage::Status(404)]).await.unwrap();

    let outcome = client_for(&mock, None)
        .fetch_repositories("no-such-user")
        .await
        .expect("fetch");

    assert!(outcome.is_empty());
    assert_eq!(
        outcome.truncation,
        Some(Truncation::Status { page: 1, status: 404 })
    );
}

#[tokio::test]
async fn test_token_sent_on_every_request() {
    let mock = MockGitHub::start(vec![MockPage::Repos(repos(100, 0))]).await.unwrap();

    client_for(&mock, Some("s3cret"))
        .fetch_repositories("octocat")
        .await
        .expect("fetch");

    let seen = mock.seen();
    assert_eq!(seen.len(), 2);
    for request in &seen {
        assert_eq!(request.authorization.as_deref(), Some("token s3cret"));
        assert!(request.user_agent.as_deref().unwrap_or("").starts_with("github-dashboard/"));
    }
}

#[tokio::test]
async fn test_no_authorization_without_token() {
    let mock = MockGitHub::start(vec![]).await.unwrap();

    client_for(&mock, None)
        .fetch_repositories("octocat")
        .await
        .expect("fetch");

    assert!(mock.seen().iter().all(|r| r.authorization.is_none()));
}

#[tokio::test]
async fn test_empty_account_rejected() {
    let client = GitHubClient::new(FetchConfig::default()).unwrap();
    let result = client.fetch_repositories("   ").await;
    assert!(matches!(result, Err(DashboardError::InvalidAccount(_))));
}

#[tokio::test]
async fn test_unreachable_api_is_network_error() {
    // Bind then drop to get a port nothing listens on.
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let client = GitHubClient::new(FetchConfig {
        api_base_url: format!("http://{}", addr),
        timeout: Duration::from_secs(2),
        ..Default::default()
    })
    .unwrap();

    let result = client.fetch_repositories("octocat").await;
    assert!(matches!(result, Err(DashboardError::NetworkError(_))));
}

#[tokio::test]
#[ignore = "Requires network access to api.github.com"]
async fn test_fetch_live_account() {
    let client = GitHubClient::new(FetchConfig {
        token: get_test_token(),
        ..Default::default()
    })
    .expect("Failed to create client");

    let outcome = client
        .fetch_repositories("octocat")
        .await
        .expect("Failed to fetch repositories");

    assert!(!outcome.is_empty(), "octocat has public repositories");
    assert!(outcome.is_complete());
    for repo in &outcome.repositories {
        assert!(repo.field("name").is_some());
        assert!(repo.field("created_at").is_some());
    }
}

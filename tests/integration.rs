//! Integration tests against a local mock of the search API.
//!
//! The live test at the bottom is marked `#[ignore]` because it needs
//! network access and real credentials in `CSE_API_KEY` / `CSE_ENGINE_ID`.
//!
//! Run it with: `cargo test --test integration -- --ignored`

use std::io::Write;
use std::time::Duration;

use serde_json::{json, Value};
use tokio_test::{assert_err, assert_ok};
use url::Url;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use cse_search::{
    output, Credentials, HttpTransport, SearchClient, SearchError, SearchQuery, SearchResult,
    SuggestClient,
};

const SEARCH_PATH: &str = "/customsearch/v1";
const SUGGEST_PATH: &str = "/complete/search";

fn items(n: usize) -> Value {
    let items: Vec<_> = (1..=n)
        .map(|i| json!({"title": format!("Result {}", i), "link": format!("https://example.com/{}", i)}))
        .collect();
    json!({ "kind": "customsearch#search", "items": items })
}

fn client_for(server: &MockServer) -> SearchClient {
    let endpoint = Url::parse(&format!("{}{}", server.uri(), SEARCH_PATH)).unwrap();
    SearchClient::with_transport(
        HttpTransport::new().unwrap(),
        Credentials::new("test-key", "test-cx"),
    )
    .with_endpoint(endpoint)
}

mod client_tests {
    use super::*;

    #[tokio::test]
    async fn test_search_two_results() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path(SEARCH_PATH))
            .and(query_param("key", "test-key"))
            .and(query_param("cx", "test-cx"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "items": [
                    {"title": "A", "link": "http://a"},
                    {"title": "B", "link": "http://b"}
                ]
            })))
            .expect(1)
            .mount(&server)
            .await;

        let results = assert_ok!(client_for(&server).search(&SearchQuery::new("ab")).await);
        assert_eq!(
            results.items(),
            &[SearchResult::new("A", "http://a"), SearchResult::new("B", "http://b")]
        );
        assert_eq!(output::render_text(&results), "1. A - http://a\n2. B - http://b");
    }

    #[tokio::test]
    async fn test_search_reserved_characters_in_query() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path(SEARCH_PATH))
            .and(query_param("q", "two pointers & java=fun"))
            .and(query_param("key", "test-key"))
            .and(query_param("cx", "test-cx"))
            .respond_with(ResponseTemplate::new(200).set_body_json(items(1)))
            .expect(1)
            .mount(&server)
            .await;

        let results = client_for(&server)
            .search(&SearchQuery::new("two pointers & java=fun"))
            .await;
        assert_eq!(assert_ok!(results).len(), 1);
    }

    #[tokio::test]
    async fn test_search_truncates_to_ten() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path(SEARCH_PATH))
            .respond_with(ResponseTemplate::new(200).set_body_json(items(15)))
            .mount(&server)
            .await;

        let results = assert_ok!(client_for(&server).search(&SearchQuery::new("q")).await);
        assert_eq!(results.len(), 10);
        let titles: Vec<_> = results.items().iter().map(|r| r.title.clone()).collect();
        let expected: Vec<_> = (1..=10).map(|i| format!("Result {}", i)).collect();
        assert_eq!(titles, expected);
    }

    #[tokio::test]
    async fn test_search_sends_limit_and_start() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path(SEARCH_PATH))
            .and(query_param("num", "3"))
            .and(query_param("start", "11"))
            .respond_with(ResponseTemplate::new(200).set_body_json(items(3)))
            .expect(1)
            .mount(&server)
            .await;

        let query = SearchQuery::new("q").with_limit(3).with_start(11);
        let results = assert_ok!(client_for(&server).search(&query).await);
        assert_eq!(results.len(), 3);
    }

    #[tokio::test]
    async fn test_search_without_items_is_empty() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path(SEARCH_PATH))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "kind": "customsearch#search",
                "searchInformation": {"totalResults": "0", "searchTime": 0.21}
            })))
            .mount(&server)
            .await;

        let results = assert_ok!(client_for(&server).search(&SearchQuery::new("zzqx")).await);
        assert!(results.is_empty());
        assert_eq!(results.total_results, Some(0));
        assert_eq!(output::render_text(&results), output::NO_RESULTS_MESSAGE);
    }

    #[tokio::test]
    async fn test_search_api_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path(SEARCH_PATH))
            .respond_with(ResponseTemplate::new(400).set_body_json(json!({
                "error": {
                    "code": 400,
                    "message": "API key not valid. Please pass a valid API key.",
                    "status": "INVALID_ARGUMENT"
                }
            })))
            .mount(&server)
            .await;

        let err = assert_err!(client_for(&server).search(&SearchQuery::new("q")).await);
        assert!(matches!(err, SearchError::Api { code: 400, .. }));
        assert!(err.is_remote_rejection());
    }

    #[tokio::test]
    async fn test_search_server_error_without_body() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path(SEARCH_PATH))
            .respond_with(ResponseTemplate::new(503).set_body_string("Service Unavailable"))
            .mount(&server)
            .await;

        let err = assert_err!(client_for(&server).search(&SearchQuery::new("q")).await);
        assert!(matches!(err, SearchError::Status { status: 503, .. }));
        assert!(err.is_transport());
    }

    #[tokio::test]
    async fn test_search_malformed_entry() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path(SEARCH_PATH))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "items": [{"title": "A", "link": "http://a"}, {"link": "http://b"}]
            })))
            .mount(&server)
            .await;

        let err = assert_err!(client_for(&server).search(&SearchQuery::new("q")).await);
        assert!(matches!(err, SearchError::MalformedEntry { rank: 2, .. }));
    }

    #[tokio::test]
    async fn test_connection_refused_is_transport_error() {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let client = SearchClient::with_transport(
            HttpTransport::new().unwrap(),
            Credentials::new("test-key", "test-cx"),
        )
        .with_endpoint(Url::parse(&format!("http://{}/customsearch/v1", addr)).unwrap());

        let err = assert_err!(client.search(&SearchQuery::new("q")).await);
        assert!(matches!(err, SearchError::Http(_)));
        assert!(err.is_transport());
        assert!(!err.is_remote_rejection());
    }

    #[tokio::test]
    async fn test_slow_response_times_out() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path(SEARCH_PATH))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(items(1))
                    .set_delay(Duration::from_secs(3)),
            )
            .mount(&server)
            .await;

        let transport = HttpTransport::builder()
            .timeout(Duration::from_millis(300))
            .build()
            .unwrap();
        let endpoint = Url::parse(&format!("{}{}", server.uri(), SEARCH_PATH)).unwrap();
        let client = SearchClient::with_transport(transport, Credentials::new("k", "c"))
            .with_endpoint(endpoint);

        let err = assert_err!(client.search(&SearchQuery::new("q")).await);
        assert!(matches!(err, SearchError::Timeout(_)));
    }
}

mod cli_tests {
    use super::*;
    use tempfile::NamedTempFile;
    use tokio::process::Command;

    fn config_file(server_uri: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "api_key: test-key").unwrap();
        writeln!(file, "engine_id: test-cx").unwrap();
        writeln!(file, "endpoint: {}{}", server_uri, SEARCH_PATH).unwrap();
        writeln!(file, "timeout: 5").unwrap();
        file
    }

    fn cli(config: &NamedTempFile) -> Command {
        let mut cmd = Command::new(env!("CARGO_BIN_EXE_cse-search"));
        for var in [
            "CSE_API_KEY",
            "CSE_ENGINE_ID",
            "CSE_ENDPOINT",
            "CSE_SUGGEST_ENDPOINT",
            "CSE_TIMEOUT",
            "CSE_PROXY",
        ] {
            cmd.env_remove(var);
        }
        cmd.env("CSE_CONFIG", config.path());
        cmd
    }

    #[tokio::test]
    async fn test_cli_prints_ranked_results() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path(SEARCH_PATH))
            .and(query_param("q", "Two Pointers using Java"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "items": [
                    {"title": "A", "link": "http://a"},
                    {"title": "B", "link": "http://b"}
                ]
            })))
            .mount(&server)
            .await;

        let config = config_file(&server.uri());
        let out = cli(&config)
            .args(["search", "Two Pointers using Java"])
            .output()
            .await
            .unwrap();

        assert!(out.status.success());
        assert_eq!(String::from_utf8_lossy(&out.stdout), "1. A - http://a\n2. B - http://b\n");
    }

    #[tokio::test]
    async fn test_cli_no_results_exits_zero() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path(SEARCH_PATH))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"kind": "customsearch#search"})))
            .mount(&server)
            .await;

        let config = config_file(&server.uri());
        let out = cli(&config).args(["search", "q"]).output().await.unwrap();

        assert_eq!(out.status.code(), Some(0));
        assert_eq!(String::from_utf8_lossy(&out.stdout), "No results found or API error\n");
    }

    #[tokio::test]
    async fn test_cli_api_error_exits_non_zero() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path(SEARCH_PATH))
            .respond_with(ResponseTemplate::new(403).set_body_json(json!({
                "error": {"code": 403, "message": "Daily limit exceeded"}
            })))
            .mount(&server)
            .await;

        let config = config_file(&server.uri());
        let out = cli(&config).args(["search", "q"]).output().await.unwrap();

        assert_eq!(out.status.code(), Some(1));
        assert_eq!(String::from_utf8_lossy(&out.stdout), "No results found or API error\n");
        assert!(String::from_utf8_lossy(&out.stderr).contains("Daily limit exceeded"));
    }

    #[tokio::test]
    async fn test_cli_connection_refused() {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let uri = format!("http://{}", listener.local_addr().unwrap());
        drop(listener);

        let config = config_file(&uri);
        let out = cli(&config).args(["search", "q"]).output().await.unwrap();

        assert_eq!(out.status.code(), Some(3));
        assert!(out.stdout.is_empty());
        assert!(String::from_utf8_lossy(&out.stderr).contains("HTTP request failed"));
    }

    #[tokio::test]
    async fn test_cli_missing_credentials() {
        let config = NamedTempFile::new().unwrap();
        let out = cli(&config).args(["search", "q"]).output().await.unwrap();

        assert_eq!(out.status.code(), Some(5));
        assert!(String::from_utf8_lossy(&out.stderr).contains("CSE_API_KEY"));
    }

    #[tokio::test]
    async fn test_cli_config_masks_key() {
        let mut config = NamedTempFile::new().unwrap();
        writeln!(config, "api_key: AIzaSecretValue1234").unwrap();
        writeln!(config, "engine_id: test-cx").unwrap();

        let out = cli(&config).arg("config").output().await.unwrap();

        assert!(out.status.success());
        let stdout = String::from_utf8_lossy(&out.stdout);
        assert!(stdout.contains("****1234"));
        assert!(!stdout.contains("AIzaSecret"));
        assert!(stdout.contains("engine_id: test-cx"));
    }
}

mod suggest_tests {
    use super::*;
    use tempfile::NamedTempFile;
    use tokio::process::Command;

    fn suggest_client_for(server: &MockServer) -> SuggestClient {
        let endpoint = Url::parse(&format!("{}{}", server.uri(), SUGGEST_PATH)).unwrap();
        SuggestClient::with_transport(HttpTransport::new().unwrap()).with_endpoint(endpoint)
    }

    fn suggest_config(server_uri: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "suggest_endpoint: {}{}", server_uri, SUGGEST_PATH).unwrap();
        writeln!(file, "timeout: 5").unwrap();
        file
    }

    fn cli(config: &NamedTempFile) -> Command {
        let mut cmd = Command::new(env!("CARGO_BIN_EXE_cse-search"));
        for var in ["CSE_API_KEY", "CSE_ENGINE_ID", "CSE_SUGGEST_ENDPOINT", "CSE_TIMEOUT", "CSE_PROXY"] {
            cmd.env_remove(var);
        }
        cmd.env("CSE_CONFIG", config.path());
        cmd
    }

    #[tokio::test]
    async fn test_suggest_sends_client_and_query() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path(SUGGEST_PATH))
            .and(query_param("client", "firefox"))
            .and(query_param("q", "binary se"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!(["binary se", ["binary search", "binary search tree"]])),
            )
            .expect(1)
            .mount(&server)
            .await;

        let suggestions = assert_ok!(suggest_client_for(&server).suggest("binary se").await);
        assert_eq!(suggestions.query, "binary se");
        assert_eq!(suggestions.suggestions, vec!["binary search", "binary search tree"]);
    }

    #[tokio::test]
    async fn test_suggest_upstream_failure() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path(SUGGEST_PATH))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;

        let err = assert_err!(suggest_client_for(&server).suggest("rust").await);
        assert!(matches!(err, SearchError::Status { status: 500, .. }));
        assert!(err.is_remote_rejection());
    }

    #[tokio::test]
    async fn test_cli_suggest_prints_one_per_line() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path(SUGGEST_PATH))
            .and(query_param("q", "two poi"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!(["two poi", ["two pointers", "two pointers java"]])),
            )
            .mount(&server)
            .await;

        let config = suggest_config(&server.uri());
        let out = cli(&config).args(["suggest", "two poi"]).output().await.unwrap();

        assert!(out.status.success());
        assert_eq!(String::from_utf8_lossy(&out.stdout), "two pointers\ntwo pointers java\n");
    }

    #[tokio::test]
    async fn test_cli_suggest_json() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path(SUGGEST_PATH))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!(["ru", ["rust"]])))
            .mount(&server)
            .await;

        let config = suggest_config(&server.uri());
        let out = cli(&config)
            .args(["suggest", "ru", "--format", "json"])
            .output()
            .await
            .unwrap();

        assert!(out.status.success());
        let value: Value = serde_json::from_slice(&out.stdout).unwrap();
        assert_eq!(value, json!({"query": "ru", "suggestions": ["rust"]}));
    }

    #[tokio::test]
    async fn test_cli_suggest_blank_query() {
        let config = NamedTempFile::new().unwrap();
        let out = cli(&config).args(["suggest", "  "]).output().await.unwrap();

        assert_eq!(out.status.code(), Some(5));
        assert!(out.stdout.is_empty());
        assert!(String::from_utf8_lossy(&out.stderr).contains("query is required"));
    }
}

mod live_tests {
    use super::*;

    #[tokio::test]
    #[ignore]
    async fn test_live_search() {
        let (Ok(key), Ok(cx)) = (std::env::var("CSE_API_KEY"), std::env::var("CSE_ENGINE_ID")) else {
            println!("CSE_API_KEY / CSE_ENGINE_ID not set, skipping");
            return;
        };

        match cse_search::search("Two Pointers using Java", &key, &cx).await {
            Ok(results) => {
                println!("{}", output::render_text(&results));
                assert!(results.len() <= 10);
            }
            Err(e) => println!("Live search failed: {}", e),
        }
    }
}

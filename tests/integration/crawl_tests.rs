//! Integration tests for the crawler
//!
//! These tests use wiremock to create mock HTTP servers and test
//! the full crawl cycle end-to-end.

use ripple_crawl::config::{parse_config, Config};
use ripple_crawl::crawler::{Crawler, Fetcher, HttpFetcher, StaticFetcher};
use ripple_crawl::output::{format_markdown_summary, write_markdown_summary, CollectingSink};
use ripple_crawl::FetchError;
use std::sync::Arc;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn html_page(title: &str, links: &[&str]) -> ResponseTemplate {
    let anchors: String = links
        .iter()
        .map(|href| format!(r#"<a href="{}">link</a>"#, href))
        .collect();
    ResponseTemplate::new(200).set_body_raw(
        format!(
            "<html><head><title>{}</title></head><body>{}</body></html>",
            title, anchors
        ),
        "text/html; charset=utf-8",
    )
}

async fn mount_page(server: &MockServer, at: &str, title: &str, links: &[&str]) {
    Mock::given(method("GET"))
        .and(path(at))
        .respond_with(html_page(title, links))
        .mount(server)
        .await;
}

fn http_crawler(seed: &str) -> (Crawler, Arc<CollectingSink>) {
    let config = Config::for_seed(seed, 3);
    let fetcher = HttpFetcher::from_config(&config).expect("Failed to build fetcher");
    let sink = Arc::new(CollectingSink::new());
    (Crawler::new(Arc::new(fetcher), sink.clone()), sink)
}

#[tokio::test]
async fn test_full_http_crawl_with_cycles() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    // "/" and "/a" link to each other; both link to "/b"
    mount_page(&mock_server, "/", "Home", &["/a", "/b"]).await;
    mount_page(&mock_server, "/a", "Page A", &["/", "/b"]).await;
    mount_page(&mock_server, "/b", "Page B", &[]).await;

    let seed = format!("{}/", base_url);
    let (crawler, sink) = http_crawler(&seed);

    let report = crawler.crawl(&seed, 4).await.expect("Crawl failed");

    let mut expected = vec![
        format!("{}/", base_url),
        format!("{}/a", base_url),
        format!("{}/b", base_url),
    ];
    expected.sort();
    assert_eq!(sink.addresses(), expected);
    assert_eq!(report.pages_fetched, 3);
    assert_eq!(report.fetch_failures, 0);

    let home = sink
        .records()
        .into_iter()
        .find(|r| r.address == seed)
        .expect("seed not emitted");
    assert_eq!(home.content, "Home");
    assert_eq!(home.depth, 0);
    assert_eq!(home.link_count, 2);

    // Every address was requested exactly once
    let requests = mock_server.received_requests().await.unwrap();
    assert_eq!(requests.len(), 3);
}

#[tokio::test]
async fn test_http_errors_end_only_their_branch() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    mount_page(&mock_server, "/", "Home", &["/gone", "/image", "/ok"]).await;
    mount_page(&mock_server, "/ok", "Ok", &[]).await;

    Mock::given(method("GET"))
        .and(path("/gone"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/image"))
        .respond_with(
            ResponseTemplate::new(200).set_body_raw(vec![0u8; 16], "image/png"),
        )
        .mount(&mock_server)
        .await;

    let seed = format!("{}/", base_url);
    let (crawler, sink) = http_crawler(&seed);

    let report = crawler.crawl(&seed, 2).await.expect("Crawl failed");

    assert_eq!(report.pages_fetched, 2);
    assert_eq!(report.fetch_failures, 2);

    let mut failures = sink.failures();
    failures.sort_by(|a, b| a.address.cmp(&b.address));
    assert!(matches!(
        failures[0].error,
        FetchError::Status { status: 404, .. }
    ));
    assert!(matches!(
        failures[1].error,
        FetchError::ContentMismatch { .. }
    ));
}

#[tokio::test]
async fn test_http_depth_bound() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    mount_page(&mock_server, "/", "Home", &["/one"]).await;
    mount_page(&mock_server, "/one", "One", &["/two"]).await;
    mount_page(&mock_server, "/two", "Two", &[]).await;

    let seed = format!("{}/", base_url);
    let (crawler, sink) = http_crawler(&seed);

    crawler.crawl(&seed, 2).await.expect("Crawl failed");

    assert_eq!(sink.records().len(), 2);
    let requests = mock_server.received_requests().await.unwrap();
    assert!(requests.iter().all(|r| r.url.path() != "/two"));
}

#[tokio::test]
async fn test_unreachable_seed_completes() {
    // Reserve a free port, then release it so connections are refused
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let seed = format!("http://{}/", addr);
    let (crawler, sink) = http_crawler(&seed);

    let report = crawler.crawl(&seed, 2).await.expect("Crawl failed");

    assert!(sink.records().is_empty());
    assert_eq!(sink.failures().len(), 1);
    assert_eq!(report.fetch_failures, 1);
}

#[tokio::test]
async fn test_fetcher_keeps_body_when_asked() {
    let mock_server = MockServer::start().await;
    mount_page(&mock_server, "/", "Home", &[]).await;

    let fetcher = HttpFetcher::from_config(&Config::for_seed("https://example.com/", 1))
        .unwrap()
        .keep_body();
    let page = fetcher
        .fetch(&format!("{}/", mock_server.uri()))
        .await
        .unwrap();

    assert!(page.content.contains("<title>Home</title>"));
}

#[tokio::test]
async fn test_sample_site_crawl() {
    let fetcher = Arc::new(StaticFetcher::sample_site());
    let sink = Arc::new(CollectingSink::new());
    let crawler = Crawler::new(fetcher.clone(), sink.clone());

    let report = crawler
        .crawl("https://golang.org/", 4)
        .await
        .expect("Crawl failed");

    assert_eq!(
        sink.addresses(),
        vec![
            "https://golang.org/",
            "https://golang.org/pkg/",
            "https://golang.org/pkg/fmt/",
            "https://golang.org/pkg/os/",
        ]
    );
    // /cmd/ is linked but not served
    assert_eq!(report.fetch_failures, 1);
    assert_eq!(fetcher.fetch_count("https://golang.org/cmd/"), 1);
    assert_eq!(
        fetcher.total_fetches(),
        fetcher.fetched_addresses().len()
    );
}

#[tokio::test]
async fn test_config_driven_crawl_writes_summary() {
    let dir = tempfile::tempdir().unwrap();
    let summary_path = dir.path().join("summary.md");

    let config = parse_config(&format!(
        r#"
[crawler]
seed = "https://golang.org/"
max-depth = 2
max-concurrent-fetches = 2

[output]
summary-path = "{}"
"#,
        summary_path.display()
    ))
    .expect("Invalid config");

    let sink = Arc::new(CollectingSink::new());
    let crawler = Crawler::new(Arc::new(StaticFetcher::sample_site()), sink.clone())
        .with_max_concurrent_fetches(config.crawler.max_concurrent_fetches.unwrap() as usize);

    let report = crawler
        .crawl(&config.crawler.seed, i64::from(config.crawler.max_depth))
        .await
        .expect("Crawl failed");

    write_markdown_summary(
        &report,
        &sink.records(),
        &sink.failures(),
        &summary_path,
    )
    .expect("Failed to write summary");

    let written = std::fs::read_to_string(&summary_path).unwrap();
    assert_eq!(
        written,
        format_markdown_summary(&report, &sink.records(), &sink.failures())
    );
    assert!(written.contains("https://golang.org/pkg/"));
    assert!(written.contains("## Failures"));
}

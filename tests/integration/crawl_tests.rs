//! Integration tests for the crawl pipeline
//!
//! These tests use wiremock to serve policy pages and check the report that a
//! full run leaves behind.

use koala::config::{Config, CrawlerConfig, SourcesConfig};
use koala::crawler::{run_crawl, Coordinator};
use koala::{ConfigError, KoalaError, PolicyUrls, RankTable};
use std::path::Path;
use std::time::{Duration, Instant};
use tempfile::TempDir;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const POLICY_HTML: &str = r#"<html><head><title>Privacy Policy</title></head><body>
    <h1>Privacy Policy</h1>
    <p>We collect personal information when you create an account.</p>
    <p>Your information is shared with service providers that support our operations.</p>
    <p>You can request deletion of your personal data at any time.</p>
    </body></html>"#;

const STYLE_ONLY_HTML: &str =
    "<html><head><style>body { margin: 0; }</style></head><body></body></html>";

/// Creates a test configuration with the given rank threshold
fn create_test_config(max_domain_rank: u64, max_concurrent_domains: u32) -> Config {
    Config {
        crawler: CrawlerConfig {
            max_domain_rank,
            max_concurrent_domains,
            request_timeout_secs: 5,
            accept_invalid_certs: true,
        },
        ..Default::default()
    }
}

fn ranks(entries: &[(&str, u64)]) -> RankTable {
    entries
        .iter()
        .map(|(domain, rank)| (domain.to_string(), *rank))
        .collect()
}

/// Reads the report and returns its data rows (header excluded)
fn read_rows(path: &Path) -> Vec<String> {
    let content = std::fs::read_to_string(path).expect("Failed to read report");
    let mut lines = content.lines();
    assert_eq!(
        lines.next(),
        Some("domain,majestic_rank,redability_score,urls")
    );
    lines.map(str::to_string).collect()
}

async fn mount_page(server: &MockServer, page: &str, response: ResponseTemplate) {
    Mock::given(method("GET"))
        .and(path(page))
        .respond_with(response)
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_only_ranked_domains_are_scored() {
    let mock_server = MockServer::start().await;
    mount_page(
        &mock_server,
        "/a/privacy",
        ResponseTemplate::new(200).set_body_string(POLICY_HTML),
    )
    .await;

    // b.com is ranked too low and must never be requested
    Mock::given(method("GET"))
        .and(path("/b/privacy"))
        .respond_with(ResponseTemplate::new(200).set_body_string(POLICY_HTML))
        .expect(0)
        .mount(&mock_server)
        .await;

    let mut urls = PolicyUrls::new();
    urls.add("a.com", &format!("{}/a/privacy", mock_server.uri()));
    urls.add("b.com", &format!("{}/b/privacy", mock_server.uri()));
    urls.add("c.com", &format!("{}/c/privacy", mock_server.uri()));

    let dir = TempDir::new().unwrap();
    let output = dir.path().join("report.csv");
    let coordinator =
        Coordinator::new(&create_test_config(100, 10), &output).expect("Failed to create coordinator");

    let summary = coordinator
        .run(&ranks(&[("a.com", 5), ("b.com", 500)]), &urls)
        .await;

    let rows = read_rows(&output);
    assert_eq!(rows.len(), 1);
    assert!(rows[0].starts_with("a.com,5,"), "unexpected row {}", rows[0]);
    assert!(!rows[0].starts_with("a.com,5,-1,"));

    assert_eq!(summary.scheduled, 1);
    assert_eq!(summary.skipped, 2);
    assert_eq!(summary.scored, 1);
}

#[tokio::test]
async fn test_http_error_yields_sentinel_row() {
    let mock_server = MockServer::start().await;
    mount_page(&mock_server, "/privacy", ResponseTemplate::new(404)).await;

    let policy_url = format!("{}/privacy", mock_server.uri());
    let mut urls = PolicyUrls::new();
    urls.add("a.com", &policy_url);

    let dir = TempDir::new().unwrap();
    let output = dir.path().join("report.csv");
    let coordinator = Coordinator::new(&create_test_config(100, 10), &output).unwrap();

    let summary = coordinator.run(&ranks(&[("a.com", 5)]), &urls).await;

    assert_eq!(read_rows(&output), vec![format!("a.com,5,-1,{}", policy_url)]);
    assert_eq!(summary.unavailable, 1);
}

#[tokio::test]
async fn test_pages_without_visible_text_yield_sentinel_rows() {
    let mock_server = MockServer::start().await;
    mount_page(
        &mock_server,
        "/a/privacy",
        ResponseTemplate::new(200).set_body_string(STYLE_ONLY_HTML),
    )
    .await;
    mount_page(
        &mock_server,
        "/b/privacy",
        ResponseTemplate::new(200).set_body_string(STYLE_ONLY_HTML),
    )
    .await;

    let mut urls = PolicyUrls::new();
    urls.add("a.com", &format!("{}/a/privacy", mock_server.uri()));
    urls.add("b.com", &format!("{}/b/privacy", mock_server.uri()));

    let dir = TempDir::new().unwrap();
    let output = dir.path().join("report.csv");
    let coordinator = Coordinator::new(&create_test_config(100, 10), &output).unwrap();

    coordinator
        .run(&ranks(&[("a.com", 1), ("b.com", 2)]), &urls)
        .await;

    let mut rows = read_rows(&output);
    rows.sort();
    assert_eq!(rows.len(), 2);
    assert!(rows[0].starts_with("a.com,1,-1,"));
    assert!(rows[1].starts_with("b.com,2,-1,"));
}

#[tokio::test]
async fn test_partial_failures_still_score_domain() {
    let mock_server = MockServer::start().await;
    mount_page(&mock_server, "/broken", ResponseTemplate::new(500)).await;
    mount_page(
        &mock_server,
        "/privacy",
        ResponseTemplate::new(200).set_body_string(POLICY_HTML),
    )
    .await;

    let broken = format!("{}/broken", mock_server.uri());
    let working = format!("{}/privacy", mock_server.uri());
    let mut urls = PolicyUrls::new();
    urls.add("a.com", &broken);
    urls.add("a.com", &working);

    let dir = TempDir::new().unwrap();
    let output = dir.path().join("report.csv");
    let coordinator = Coordinator::new(&create_test_config(100, 10), &output).unwrap();

    coordinator.run(&ranks(&[("a.com", 5)]), &urls).await;

    let rows = read_rows(&output);
    assert_eq!(rows.len(), 1);
    let fields: Vec<&str> = rows[0].split(',').collect();
    assert_eq!(fields[0], "a.com");
    assert_ne!(fields[2], "-1");
    assert_eq!(fields[3], format!("{};{}", broken, working));
}

#[tokio::test]
async fn test_every_qualifying_domain_gets_exactly_one_row() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(POLICY_HTML)
                .set_delay(Duration::from_millis(20)),
        )
        .mount(&mock_server)
        .await;

    let domain_count = 25;
    let mut urls = PolicyUrls::new();
    let mut rank_entries = Vec::new();
    for i in 0..domain_count {
        let domain = format!("site{}.com", i);
        urls.add(&domain, &format!("{}/{}/privacy", mock_server.uri(), domain));
        rank_entries.push((domain, i as u64 + 1));
    }
    let ranks: RankTable = rank_entries.into_iter().collect();

    let dir = TempDir::new().unwrap();
    let output = dir.path().join("report.csv");
    let coordinator = Coordinator::new(&create_test_config(1000, 4), &output).unwrap();

    let summary = coordinator.run(&ranks, &urls).await;

    let rows = read_rows(&output);
    assert_eq!(rows.len(), domain_count);
    assert_eq!(summary.rows(), domain_count);
    assert_eq!(coordinator.writer().rows_written(), domain_count);

    let mut seen = std::collections::HashSet::new();
    for row in &rows {
        let fields: Vec<&str> = row.split(',').collect();
        assert_eq!(fields.len(), 4, "malformed row {}", row);
        assert!(fields[3].contains(fields[0]), "mixed row {}", row);
        assert!(seen.insert(fields[0].to_string()), "duplicate row {}", row);
    }
}

#[tokio::test]
async fn test_in_flight_domains_never_exceed_cap() {
    let delay = Duration::from_millis(200);
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(POLICY_HTML)
                .set_delay(delay),
        )
        .mount(&mock_server)
        .await;

    let cap = 3;
    let domain_count = 9;
    let mut urls = PolicyUrls::new();
    let mut rank_entries = Vec::new();
    for i in 0..domain_count {
        let domain = format!("site{}.com", i);
        urls.add(&domain, &format!("{}/{}/privacy", mock_server.uri(), domain));
        rank_entries.push((domain, i as u64 + 1));
    }
    let ranks: RankTable = rank_entries.into_iter().collect();

    let dir = TempDir::new().unwrap();
    let output = dir.path().join("report.csv");
    let coordinator = Coordinator::new(&create_test_config(1000, cap), &output).unwrap();

    let started = Instant::now();
    let sampler = async {
        let mut peak = 0;
        while coordinator.writer().rows_written() < domain_count
            && started.elapsed() < Duration::from_secs(10)
        {
            // Read requests before rows, so a sample can only undercount
            let received = mock_server
                .received_requests()
                .await
                .map_or(0, |requests| requests.len());
            let finished = coordinator.writer().rows_written();
            peak = peak.max(received.saturating_sub(finished));
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
        peak
    };

    let (summary, peak) = tokio::join!(coordinator.run(&ranks, &urls), sampler);

    assert_eq!(summary.rows(), domain_count);
    assert!(peak >= 1, "no request was ever observed in flight");
    assert!(peak <= cap as usize, "{} requests in flight with a cap of {}", peak, cap);

    // Nine delayed responses through three slots need at least three rounds
    let rounds = (domain_count as u32 + cap - 1) / cap;
    assert!(started.elapsed() >= delay * rounds);
}

#[tokio::test]
async fn test_cancelled_run_stops_domain_processing() {
    let mock_server = MockServer::start().await;
    mount_page(
        &mock_server,
        "/slow",
        ResponseTemplate::new(200)
            .set_body_string(POLICY_HTML)
            .set_delay(Duration::from_millis(300)),
    )
    .await;

    // Only reachable if processing outlives the cancelled run
    Mock::given(method("GET"))
        .and(path("/next"))
        .respond_with(ResponseTemplate::new(200).set_body_string(POLICY_HTML))
        .expect(0)
        .mount(&mock_server)
        .await;

    let mut urls = PolicyUrls::new();
    urls.add("a.com", &format!("{}/slow", mock_server.uri()));
    urls.add("a.com", &format!("{}/next", mock_server.uri()));

    let dir = TempDir::new().unwrap();
    let output = dir.path().join("report.csv");
    let coordinator = Coordinator::new(&create_test_config(100, 10), &output).unwrap();

    let ranks = ranks(&[("a.com", 5)]);
    let run = coordinator.run(&ranks, &urls);
    let cancelled = tokio::time::timeout(Duration::from_millis(100), run).await;
    assert!(cancelled.is_err());

    tokio::time::sleep(Duration::from_millis(600)).await;

    assert_eq!(coordinator.writer().rows_written(), 0);
    assert!(read_rows(&output).is_empty());
    mock_server.verify().await;
}

#[tokio::test]
async fn test_run_crawl_from_files() {
    let mock_server = MockServer::start().await;
    mount_page(
        &mock_server,
        "/a/privacy",
        ResponseTemplate::new(200).set_body_string(POLICY_HTML),
    )
    .await;
    mount_page(&mock_server, "/a/legal", ResponseTemplate::new(404)).await;

    let dir = TempDir::new().unwrap();
    let rank_file = dir.path().join("top.csv");
    let contacts = dir.path().join("contacts.csv");
    let policies = dir.path().join("policies.csv");
    let output = dir.path().join("report.csv");

    std::fs::write(
        &rank_file,
        "GlobalRank,TldRank,Domain,TLD\n5,5,a.com,com\n2000,2000,b.com,com\n",
    )
    .unwrap();
    std::fs::write(
        &contacts,
        format!(
            "Domain,Privacy Policy\na.com,{0}/a/privacy\nb.com,{0}/b/privacy\nd.com,\n",
            mock_server.uri()
        ),
    )
    .unwrap();
    std::fs::write(
        &policies,
        format!(
            "Domain,Privacy Policy\na.com,{0}/a/privacy\na.com,{0}/a/legal\n",
            mock_server.uri()
        ),
    )
    .unwrap();

    let config = Config {
        sources: Some(SourcesConfig {
            contacts: contacts.display().to_string(),
            policies: policies.display().to_string(),
        }),
        ..create_test_config(1000, 10)
    };

    let summary = run_crawl(&config, &rank_file, &output)
        .await
        .expect("Crawl failed");

    let rows = read_rows(&output);
    assert_eq!(rows.len(), 1);
    assert!(rows[0].starts_with("a.com,5,"));
    assert!(rows[0].ends_with(&format!(
        "{0}/a/privacy;{0}/a/legal",
        mock_server.uri()
    )));
    assert_eq!(summary.scheduled, 1);
    assert_eq!(summary.skipped, 1);
}

#[tokio::test]
async fn test_missing_sources_fails_before_writing() {
    let dir = TempDir::new().unwrap();
    let rank_file = dir.path().join("top.csv");
    let output = dir.path().join("report.csv");
    std::fs::write(&rank_file, "Domain,GlobalRank\na.com,5\n").unwrap();

    let result = run_crawl(&create_test_config(100, 10), &rank_file, &output).await;

    assert!(matches!(
        result,
        Err(KoalaError::Config(ConfigError::Validation(_)))
    ));
    assert!(!output.exists());
}

#[tokio::test]
async fn test_missing_rank_file_fails_before_writing() {
    let dir = TempDir::new().unwrap();
    let output = dir.path().join("report.csv");
    let config = Config {
        sources: Some(SourcesConfig {
            contacts: "contacts.csv".to_string(),
            policies: "policies.csv".to_string(),
        }),
        ..create_test_config(100, 10)
    };

    let result = run_crawl(&config, &dir.path().join("missing.csv"), &output).await;

    assert!(matches!(result, Err(KoalaError::Source(_))));
    assert!(!output.exists());
}

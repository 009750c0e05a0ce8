use std::time::Duration;

use violationtracker_lib::{
    harvest_into, run_once, Client, ClientOptions, Config, Db, FileRunLog, PageOutcome, Pipeline,
    PipelineConfig, RetryPolicy, SearchQuery, ViolationRecord,
};
use wiremock::matchers::{method, path, query_param, query_param_is_missing};
use wiremock::{Mock, MockServer, ResponseTemplate};

const PAGE_1: &str = include_str!("fixtures/violations_page1.html");
const PAGE_3: &str = include_str!("fixtures/violations_page3.html");
const NO_TABLE: &str = include_str!("fixtures/no_table.html");

fn fast_options() -> ClientOptions {
    ClientOptions {
        timeout: Duration::from_secs(2),
        retry: RetryPolicy::new(3, Duration::from_millis(5), Duration::from_millis(20)),
        retry_timeouts: false,
    }
}

fn no_delay() -> PipelineConfig {
    PipelineConfig {
        page_count: 3,
        page_delay: Duration::ZERO,
    }
}

fn search_url(server: &MockServer) -> String {
    format!("{}/?state=PR&order=pen_year&sort=", server.uri())
}

async fn mount_page(server: &MockServer, page: Option<&str>, response: ResponseTemplate) {
    let mock = Mock::given(method("GET")).and(path("/"));
    let mock = match page {
        None => mock.and(query_param_is_missing("page")),
        Some(page) => mock.and(query_param("page", page)),
    };
    mock.respond_with(response).mount(server).await;
}

fn html(body: &str) -> ResponseTemplate {
    ResponseTemplate::new(200)
        .insert_header("content-type", "text/html; charset=utf-8")
        .set_body_string(body)
}

fn acme() -> ViolationRecord {
    ViolationRecord {
        company: "Acme Co".to_string(),
        current_parent: None,
        current_parent_industry: None,
        primary_offense_type: "Pollution".to_string(),
        year: 2019,
        agency: "EPA".to_string(),
        penalty_amount: 1250.0,
    }
}

#[tokio::test]
async fn pipeline_normalizes_fixture_pages() {
    let server = MockServer::start().await;
    mount_page(&server, None, html(PAGE_1)).await;
    mount_page(&server, Some("2"), html(NO_TABLE)).await;
    mount_page(&server, Some("3"), html(PAGE_3)).await;

    let pipeline = Pipeline::new(
        Client::with_options(fast_options()).unwrap(),
        SearchQuery::new(&search_url(&server)).unwrap(),
        no_delay(),
    );
    let harvest = pipeline.run().await;

    assert_eq!(harvest.records.len(), 4);
    assert_eq!(harvest.records[0], acme());

    let pharma = &harvest.records[1];
    assert_eq!(pharma.current_parent.as_deref(), Some("Global Health Holdings"));
    assert_eq!(pharma.current_parent_industry.as_deref(), Some("pharmaceuticals"));
    assert_eq!(pharma.penalty_amount, 2_500_000.0);

    assert_eq!(harvest.records[2].penalty_amount, 0.0);
    assert_eq!(harvest.records[3].company, "Isla Energy Corp");

    assert_eq!(harvest.pages[1].outcome, PageOutcome::NoTable);
    assert_eq!(
        harvest.pages[2].outcome,
        PageOutcome::Scraped {
            records: 1,
            skipped_rows: 1
        }
    );
}

#[tokio::test]
async fn page_two_failing_keeps_pages_one_and_three() {
    let server = MockServer::start().await;
    mount_page(&server, None, html(PAGE_1)).await;
    Mock::given(method("GET"))
        .and(query_param("page", "2"))
        .respond_with(ResponseTemplate::new(500).set_body_string("Internal Server Error"))
        .expect(3)
        .mount(&server)
        .await;
    mount_page(&server, Some("3"), html(PAGE_3)).await;

    let pipeline = Pipeline::new(
        Client::with_options(fast_options()).unwrap(),
        SearchQuery::new(&search_url(&server)).unwrap(),
        no_delay(),
    );
    let harvest = pipeline.run().await;

    let companies: Vec<_> = harvest.records.iter().map(|r| r.company.as_str()).collect();
    assert_eq!(
        companies,
        vec![
            "Acme Co",
            "Caribe Pharma LLC",
            "San Juan Port Services",
            "Isla Energy Corp"
        ]
    );
    assert_eq!(harvest.failed_pages(), vec![2]);
}

#[tokio::test]
async fn harvesting_twice_stores_each_row_once() {
    let server = MockServer::start().await;
    mount_page(&server, None, html(PAGE_1)).await;
    mount_page(&server, Some("2"), html(PAGE_1)).await;
    mount_page(&server, Some("3"), html(PAGE_3)).await;

    let tmp = tempfile::tempdir().unwrap();
    let sink = FileRunLog::new(tmp.path());
    let mut db = Db::open_in_memory().unwrap();
    db.init().unwrap();

    let pipeline = Pipeline::new(
        Client::with_options(fast_options()).unwrap(),
        SearchQuery::new(&search_url(&server)).unwrap(),
        no_delay(),
    );

    let first = harvest_into(&pipeline, &mut db, &sink).await.unwrap();
    // Page 2 repeats page 1, so three of the seven rows are duplicates.
    assert_eq!(first.summary.attempted, 7);
    assert_eq!(first.summary.inserted, 4);
    assert_eq!(db.violation_count().unwrap(), 4);

    let second = harvest_into(&pipeline, &mut db, &sink).await.unwrap();
    assert_eq!(second.summary.attempted, 7);
    assert_eq!(second.summary.inserted, 0);
    assert_eq!(db.violation_count().unwrap(), 4);

    let (_, log) = sink.latest().unwrap().unwrap();
    assert_eq!(log.records_processed, 7);
    assert!(second.log_location.is_some());
}

#[tokio::test]
async fn run_once_end_to_end() {
    let server = MockServer::start().await;
    mount_page(&server, None, html(PAGE_1)).await;
    mount_page(&server, Some("2"), ResponseTemplate::new(503)).await;
    mount_page(&server, Some("3"), html(NO_TABLE)).await;

    let tmp = tempfile::tempdir().unwrap();
    let config = Config {
        db_path: tmp.path().join("violations.db"),
        log_dir: tmp.path().join("logs"),
        base_url: search_url(&server),
        pipeline: no_delay(),
        client: fast_options(),
    };

    let status = run_once(&config).await;
    assert!(status.success, "{}", status.message);
    assert_eq!(status.records_processed, 3);
    assert_eq!(status.inserted, 3);
    assert_eq!(status.failed_pages, vec![2]);
    assert!(status.log_location.is_some());

    let again = run_once(&config).await;
    assert!(again.success);
    assert_eq!(again.records_processed, 3);
    assert_eq!(again.inserted, 0);

    let db = Db::open(&config.db_path).unwrap();
    assert_eq!(db.violation_count().unwrap(), 3);
    let rows = db.list_violations(10).unwrap();
    assert_eq!(rows[0].record, acme());

    let (_, log) = FileRunLog::new(&config.log_dir).latest().unwrap().unwrap();
    assert_eq!(log.records_processed, 3);
}

#[tokio::test]
async fn run_once_with_no_records_still_writes_log() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(html(NO_TABLE))
        .mount(&server)
        .await;

    let tmp = tempfile::tempdir().unwrap();
    let config = Config {
        db_path: tmp.path().join("violations.db"),
        log_dir: tmp.path().join("logs"),
        base_url: search_url(&server),
        pipeline: no_delay(),
        client: fast_options(),
    };

    let status = run_once(&config).await;
    assert!(status.success);
    assert_eq!(status.records_processed, 0);
    assert!(status.failed_pages.is_empty());

    let (_, log) = FileRunLog::new(&config.log_dir).latest().unwrap().unwrap();
    assert_eq!(log.records_processed, 0);
}

#[tokio::test]
async fn run_once_reports_storage_failure() {
    let tmp = tempfile::tempdir().unwrap();
    let config = Config {
        db_path: tmp.path().join("missing-dir").join("violations.db"),
        log_dir: tmp.path().join("logs"),
        base_url: "http://127.0.0.1:9/".to_string(),
        pipeline: no_delay(),
        client: fast_options(),
    };

    let status = run_once(&config).await;
    assert!(!status.success);
    assert!(status.message.starts_with("Scraper failed: Storage error"), "{}", status.message);
    assert!(FileRunLog::new(&config.log_dir).latest().unwrap().is_none());
}

#[tokio::test]
async fn run_once_reports_bad_base_url() {
    let tmp = tempfile::tempdir().unwrap();
    let config = Config {
        db_path: tmp.path().join("violations.db"),
        log_dir: tmp.path().join("logs"),
        base_url: "not a url".to_string(),
        pipeline: no_delay(),
        client: fast_options(),
    };

    let status = run_once(&config).await;
    assert!(!status.success);
    assert!(status.message.contains("invalid url"), "{}", status.message);
}

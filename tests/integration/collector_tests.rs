//! Collector-mode batches: one report per URL, then the channel closes

use crate::{create_test_config, page, summary_lines};
use harvest::config::{CoordinationMode, DispatchMode, ExtractMode, Profile};
use harvest::pipeline::{run_batch, Coordinator, ExtractedContent};
use harvest::{BatchOutcome, TaskState};
use tempfile::TempDir;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

#[tokio::test]
async fn test_collector_yields_one_report_per_url() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/broken"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&mock_server)
        .await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_string(page("Listed")))
        .mount(&mock_server)
        .await;

    let dir = TempDir::new().unwrap();
    let config = create_test_config(&dir, Profile::Titles);

    let mut urls: Vec<String> = (0..6)
        .map(|i| format!("{}/item{}", mock_server.uri(), i))
        .collect();
    urls.push(format!("{}/broken", mock_server.uri()));

    let coordinator = Coordinator::new(config).unwrap();
    let mut stream = coordinator.start_collector(urls.clone());

    let mut reports = Vec::new();
    while let Some(report) = stream.recv().await {
        reports.push(report);
    }
    let stats = stream.finish().await.unwrap();

    assert_eq!(reports.len(), urls.len());
    assert_eq!(stats.total, 7);
    assert_eq!(stats.failed, 1);

    let mut seen: Vec<_> = reports.iter().map(|r| r.url.clone()).collect();
    seen.sort();
    urls.sort();
    assert_eq!(seen, urls);

    for report in &reports {
        match &report.result {
            Ok(ExtractedContent::Record(record)) => {
                assert_eq!(record.title, "Listed");
                assert_eq!(record.url, report.url);
            }
            Ok(other) => panic!("unexpected content: {:?}", other),
            Err(_) => {
                assert!(report.url.ends_with("/broken"));
                assert_eq!(report.state, TaskState::Failed);
            }
        }
    }
}

#[tokio::test]
async fn test_titles_profile_writes_no_files() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html><body>none</body></html>"))
        .mount(&mock_server)
        .await;

    let dir = TempDir::new().unwrap();
    let config = create_test_config(&dir, Profile::Titles);
    let url = format!("{}/untitled", mock_server.uri());

    let outcome = run_batch(config, vec![url.clone()]).await.unwrap();
    let BatchOutcome::Collected { reports, stats } = outcome else {
        panic!("titles profile should collect");
    };

    assert_eq!(stats.succeeded, 1);
    assert_eq!(reports.len(), 1);
    let record = reports[0].result.as_ref().unwrap().as_record().unwrap();
    assert_eq!(record.title, "");
    assert_eq!(record.url, url);

    let entries = std::fs::read_dir(dir.path().join("out")).unwrap().count();
    assert_eq!(entries, 0);
}

#[tokio::test]
async fn test_collector_with_pool_and_summary() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_string(page("Doc")))
        .mount(&mock_server)
        .await;

    let dir = TempDir::new().unwrap();
    let mut config = create_test_config(&dir, Profile::Full);
    config.batch.mode = CoordinationMode::Collector;
    config.batch.extract = ExtractMode::Raw;
    config.batch.dispatch = DispatchMode::Pool;
    config.batch.workers = 3;
    config.batch.queue_capacity = 2;

    let urls: Vec<String> = (0..12)
        .map(|i| format!("{}/doc{}", mock_server.uri(), i))
        .collect();

    let (reports, stats) = Coordinator::new(config)
        .unwrap()
        .start_collector(urls)
        .collect()
        .await
        .unwrap();

    assert_eq!(reports.len(), 12);
    assert_eq!(stats.succeeded, 12);
    assert!(reports
        .iter()
        .all(|r| r.result.as_ref().unwrap().as_document() == Some(page("Doc").as_bytes())));
    assert_eq!(summary_lines(&dir).len(), 12);
}

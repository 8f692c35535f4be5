//! Barrier-mode batches: files on disk and summary lines

use crate::{create_test_config, page, summary_lines};
use harvest::config::{DispatchMode, ExtractMode, Profile};
use harvest::pipeline::{run_batch, Coordinator};
use harvest::url::derive_filename;
use harvest::BatchOutcome;
use tempfile::TempDir;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

#[tokio::test]
async fn test_every_url_gets_one_summary_line() {
    let mock_server = MockServer::start().await;
    for name in ["a", "b", "c", "d", "e"] {
        Mock::given(method("GET"))
            .and(path(format!("/{}", name)))
            .respond_with(ResponseTemplate::new(200).set_body_string(page(name)))
            .mount(&mock_server)
            .await;
    }

    let dir = TempDir::new().unwrap();
    let config = create_test_config(&dir, Profile::Full);

    // Two of the seven URLs point at paths the server does not know
    let mut urls: Vec<String> = ["a", "b", "c", "d", "e", "missing1", "missing2"]
        .iter()
        .map(|name| format!("{}/{}", mock_server.uri(), name))
        .collect();
    urls.sort();

    let coordinator = Coordinator::new(config).unwrap();
    let stats = coordinator.run_barrier(urls.clone()).await;

    assert_eq!(stats.total, 7);
    assert_eq!(stats.succeeded, 5);
    assert_eq!(stats.failed, 2);

    let lines = summary_lines(&dir);
    assert_eq!(lines.len(), 7);
    for url in &urls {
        let matching: Vec<_> = lines
            .iter()
            .filter(|line| line.starts_with(&format!("URL: {} - ", url)))
            .collect();
        assert_eq!(matching.len(), 1, "expected one line for {}", url);
    }
    assert_eq!(lines.iter().filter(|l| l.ends_with(" - FAILED")).count(), 2);

    let out = dir.path().join("out");
    for name in ["a", "b", "c", "d", "e"] {
        let url = format!("{}/{}", mock_server.uri(), name);
        let file = out.join(derive_filename(&url));
        let content = std::fs::read_to_string(&file).unwrap();
        assert!(content.contains(&format!("<title>{}</title>", name)));
    }
}

#[tokio::test]
async fn test_fails_twice_then_succeeds() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/flaky"))
        .respond_with(ResponseTemplate::new(503))
        .up_to_n_times(2)
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/flaky"))
        .respond_with(ResponseTemplate::new(200).set_body_string(page("Recovered")))
        .mount(&mock_server)
        .await;

    let dir = TempDir::new().unwrap();
    let config = create_test_config(&dir, Profile::Full);
    let url = format!("{}/flaky", mock_server.uri());

    let coordinator = Coordinator::new(config).unwrap();
    let stats = coordinator.run_barrier(vec![url.clone()]).await;

    assert_eq!(stats.succeeded, 1);
    assert_eq!(stats.attempts, 3);
    assert_eq!(summary_lines(&dir), vec![format!("URL: {} - SUCCESS", url)]);
    assert!(dir.path().join("out").join(derive_filename(&url)).exists());
}

#[tokio::test]
async fn test_fails_every_attempt() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/down"))
        .respond_with(ResponseTemplate::new(500))
        .expect(3)
        .mount(&mock_server)
        .await;

    let dir = TempDir::new().unwrap();
    let config = create_test_config(&dir, Profile::Full);
    let url = format!("{}/down", mock_server.uri());

    let coordinator = Coordinator::new(config).unwrap();
    let stats = coordinator.run_barrier(vec![url.clone()]).await;

    assert_eq!(stats.failed, 1);
    assert_eq!(stats.attempts, 3);
    assert_eq!(summary_lines(&dir), vec![format!("URL: {} - FAILED", url)]);
    assert!(!dir.path().join("out").join(derive_filename(&url)).exists());
}

#[tokio::test]
async fn test_pool_dispatch_processes_every_url() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_string(page("Pooled")))
        .mount(&mock_server)
        .await;

    let dir = TempDir::new().unwrap();
    let mut config = create_test_config(&dir, Profile::Full);
    config.batch.dispatch = DispatchMode::Pool;
    config.batch.workers = 2;
    config.batch.queue_capacity = 1;

    let urls: Vec<String> = (0..10)
        .map(|i| format!("{}/page{}", mock_server.uri(), i))
        .collect();

    let coordinator = Coordinator::new(config).unwrap();
    let stats = coordinator.run_barrier(urls.clone()).await;

    assert_eq!(stats.total, 10);
    assert_eq!(stats.succeeded, 10);
    assert_eq!(summary_lines(&dir).len(), 10);
    for url in &urls {
        assert!(dir.path().join("out").join(derive_filename(url)).exists());
    }
}

#[tokio::test]
async fn test_colliding_names_keep_one_file() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/x"))
        .respond_with(ResponseTemplate::new(200).set_body_string("same name"))
        .mount(&mock_server)
        .await;

    let dir = TempDir::new().unwrap();
    let mut config = create_test_config(&dir, Profile::Full);
    config.batch.extract = ExtractMode::Raw;

    // Both derive to "<host>_x.html" once the query is stripped
    let first = format!("{}/x?page=1", mock_server.uri());
    let second = format!("{}/x?page=2", mock_server.uri());
    assert_eq!(derive_filename(&first), derive_filename(&second));

    let coordinator = Coordinator::new(config).unwrap();
    let stats = coordinator.run_barrier(vec![first.clone(), second]).await;
    assert_eq!(stats.succeeded, 2);

    let html_files: Vec<_> = std::fs::read_dir(dir.path().join("out"))
        .unwrap()
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.path().extension().is_some_and(|ext| ext == "html"))
        .collect();
    assert_eq!(html_files.len(), 1);
    assert_eq!(summary_lines(&dir).len(), 2);
}

#[tokio::test]
async fn test_hash_suffix_separates_colliding_names() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/x"))
        .respond_with(ResponseTemplate::new(200).set_body_string("distinct"))
        .mount(&mock_server)
        .await;

    let dir = TempDir::new().unwrap();
    let mut config = create_test_config(&dir, Profile::Full);
    config.output.hash_suffix = true;

    let urls = vec![
        format!("{}/x?page=1", mock_server.uri()),
        format!("{}/x?page=2", mock_server.uri()),
    ];

    let coordinator = Coordinator::new(config).unwrap();
    coordinator.run_barrier(urls).await;

    let html_count = std::fs::read_dir(dir.path().join("out"))
        .unwrap()
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.path().extension().is_some_and(|ext| ext == "html"))
        .count();
    assert_eq!(html_count, 2);
}

#[tokio::test]
async fn test_running_twice_appends_summary() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_string(page("Stable")))
        .mount(&mock_server)
        .await;

    let dir = TempDir::new().unwrap();
    let urls = vec![
        format!("{}/one", mock_server.uri()),
        format!("{}/two", mock_server.uri()),
    ];
    let file = dir
        .path()
        .join("out")
        .join(derive_filename(&urls[0]));

    let outcome = run_batch(create_test_config(&dir, Profile::Full), urls.clone())
        .await
        .unwrap();
    assert!(matches!(outcome, BatchOutcome::Completed(_)));
    let first_run = std::fs::read(&file).unwrap();

    run_batch(create_test_config(&dir, Profile::Full), urls)
        .await
        .unwrap();
    let second_run = std::fs::read(&file).unwrap();

    assert_eq!(first_run, second_run);
    assert_eq!(summary_lines(&dir).len(), 4);
}

#[tokio::test]
async fn test_minimal_profile_keeps_query_and_skips_summary() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/q"))
        .respond_with(ResponseTemplate::new(200).set_body_string("raw body"))
        .mount(&mock_server)
        .await;

    let dir = TempDir::new().unwrap();
    let config = create_test_config(&dir, Profile::Minimal);
    let url = format!("{}/q?id=7", mock_server.uri());

    let stats = Coordinator::new(config)
        .unwrap()
        .run_barrier(vec![url.clone()])
        .await;
    assert_eq!(stats.succeeded, 1);

    let out = dir.path().join("out");
    assert!(!out.join("summary.txt").exists());

    let name = format!("{}.html", url.trim_start_matches("http://").replace('/', "_"));
    assert_eq!(std::fs::read_to_string(out.join(name)).unwrap(), "raw body");
}

#[tokio::test]
async fn test_latin1_page_is_saved_in_full_profile() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/latin1"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_bytes(
                    b"<html><head><title>Caf\xe9</title></head><body>ol\xe9</body></html>".to_vec(),
                )
                .insert_header("content-type", "text/html; charset=iso-8859-1"),
        )
        .mount(&mock_server)
        .await;

    let dir = TempDir::new().unwrap();
    let config = create_test_config(&dir, Profile::Full);
    let url = format!("{}/latin1", mock_server.uri());

    let stats = Coordinator::new(config)
        .unwrap()
        .run_barrier(vec![url.clone()])
        .await;

    assert_eq!(stats.succeeded, 1);
    assert_eq!(stats.failed, 0);
    assert_eq!(summary_lines(&dir), vec![format!("URL: {} - SUCCESS", url)]);
    assert!(dir.path().join("out").join(derive_filename(&url)).exists());
}

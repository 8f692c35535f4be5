//! Integration tests for Harvest
//!
//! These tests use wiremock to create mock HTTP servers and run whole
//! batches end-to-end against a temporary output directory.

mod batch_tests;
mod collector_tests;

use harvest::config::{Config, Profile};
use tempfile::TempDir;

/// Creates a test configuration writing into `dir/out`
pub fn create_test_config(dir: &TempDir, profile: Profile) -> Config {
    let mut config = Config::for_profile(profile);
    config.output.directory = dir.path().join("out").to_string_lossy().into_owned();
    config.fetch.timeout_secs = 5;
    config
}

/// Reads the summary artifact as a list of lines
pub fn summary_lines(dir: &TempDir) -> Vec<String> {
    std::fs::read_to_string(dir.path().join("out").join("summary.txt"))
        .unwrap_or_default()
        .lines()
        .map(str::to_string)
        .collect()
}

/// Simple HTML page with a title
pub fn page(title: &str) -> String {
    format!(
        "<html><head><title>{}</title></head><body><p>{}</p></body></html>",
        title, title
    )
}

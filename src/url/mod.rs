//! URL handling module for Harvest
//!
//! This module provides target URL validation and the deterministic mapping
//! from a URL to its on-disk file name.

mod filename;

use crate::{UrlError, UrlResult};
use url::Url;

// Re-export main functions
pub use filename::{derive_filename, derive_filename_with, NamingOptions};

/// Parses a target URL and checks that it can be fetched over HTTP(S)
///
/// Targets are used exactly as supplied: no normalization is applied, so the
/// summary and the file name always refer to the original string.
///
/// # Examples
///
/// ```
/// use harvest::url::parse_target;
///
/// assert!(parse_target("https://example.com/a?b=1").is_ok());
/// assert!(parse_target("ftp://example.com/").is_err());
/// ```
pub fn parse_target(url_str: &str) -> UrlResult<Url> {
    let url = Url::parse(url_str).map_err(|e| UrlError::Parse(e.to_string()))?;

    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(UrlError::InvalidScheme(format!(
            "Only HTTP and HTTPS schemes are supported, got: {}",
            url.scheme()
        )));
    }

    if url.host_str().map_or(true, str::is_empty) {
        return Err(UrlError::MissingHost);
    }

    Ok(url)
}

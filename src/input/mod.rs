//! URL source
//!
//! Supplies the ordered list of target URLs, either from a newline-delimited
//! file or from a single whitespace-separated line of standard input. The two
//! sources are alternatives and are never combined.

use crate::InputError;
use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::{Path, PathBuf};

/// Where the batch's URLs come from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UrlSource {
    /// One URL per line; blank lines skipped
    File(PathBuf),
    /// One line of whitespace-separated URLs
    Stdin,
}

impl UrlSource {
    /// Reads every URL from this source
    ///
    /// Errors here are fatal for the run: no batch starts without a list.
    pub fn read(&self) -> Result<Vec<String>, InputError> {
        match self {
            Self::File(path) => read_urls_from_file(path),
            Self::Stdin => read_urls_from_line(io::stdin().lock()),
        }
    }
}

/// Reads a newline-delimited URL list from a file
///
/// # Arguments
///
/// * `path` - Path to the URL list
///
/// # Returns
///
/// * `Ok(Vec<String>)` - Trimmed, non-empty lines in file order
/// * `Err(InputError)` - The file could not be opened or read
pub fn read_urls_from_file(path: &Path) -> Result<Vec<String>, InputError> {
    let file = File::open(path).map_err(|source| InputError::Open {
        path: path.to_path_buf(),
        source,
    })?;
    parse_url_list(BufReader::new(file))
}

/// Parses a newline-delimited URL list
pub fn parse_url_list<R: BufRead>(reader: R) -> Result<Vec<String>, InputError> {
    let mut urls = Vec::new();

    for line in reader.lines() {
        let line = line?;
        let url = line.trim();
        if !url.is_empty() {
            urls.push(url.to_string());
        }
    }

    Ok(urls)
}

/// Reads exactly one line and splits it on whitespace
pub fn read_urls_from_line<R: BufRead>(mut reader: R) -> Result<Vec<String>, InputError> {
    let mut line = String::new();
    reader.read_line(&mut line)?;

    Ok(line.split_whitespace().map(str::to_string).collect())
}

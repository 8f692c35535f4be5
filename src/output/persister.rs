//! File persistence for fetched documents

use crate::url::{derive_filename_with, NamingOptions};
use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while persisting a document
#[derive(Debug, Error)]
pub enum PersistError {
    #[error("failed to create directory {path}: {source}")]
    CreateDir {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("title records for {0} have no file form")]
    NotADocument(String),
}

/// Writes documents into an output directory under derived names
#[derive(Debug, Clone)]
pub struct Persister {
    output_dir: PathBuf,
    naming: NamingOptions,
}

impl Persister {
    pub fn new(output_dir: impl Into<PathBuf>, naming: NamingOptions) -> Self {
        Self {
            output_dir: output_dir.into(),
            naming,
        }
    }

    /// Full path a URL is written to
    pub fn path_for(&self, url: &str) -> PathBuf {
        self.output_dir.join(derive_filename_with(url, self.naming))
    }

    /// Writes `content` as the entire file for `url`
    ///
    /// The output directory is created if missing. An existing file with the
    /// same derived name is overwritten, so colliding URLs keep only the
    /// content of the last write.
    ///
    /// # Returns
    ///
    /// * `Ok(PathBuf)` - Path of the written file
    /// * `Err(PersistError)` - Directory creation or the write failed
    pub async fn persist(&self, url: &str, content: &[u8]) -> Result<PathBuf, PersistError> {
        tokio::fs::create_dir_all(&self.output_dir)
            .await
            .map_err(|source| PersistError::CreateDir {
                path: self.output_dir.clone(),
                source,
            })?;

        let path = self.path_for(url);
        tokio::fs::write(&path, content)
            .await
            .map_err(|source| PersistError::Write {
                path: path.clone(),
                source,
            })?;

        Ok(path)
    }
}

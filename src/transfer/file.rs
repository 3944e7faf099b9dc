//! File export and import collaborators.

use crate::error::Result;
use async_trait::async_trait;
use std::path::{Path, PathBuf};

/// Destination for an exported configuration file.
///
/// A browser front end would trigger a download here; the bundled
/// [`DirectorySink`] writes into a directory.
#[async_trait]
pub trait FileSink: Send + Sync {
    /// Writes `contents` as a file named `file_name`.
    async fn save(&self, file_name: &str, contents: &str) -> Result<()>;
}

/// Source of a configuration file chosen by the user.
#[async_trait]
pub trait FileSource: Send + Sync {
    /// Reads the whole file as UTF-8 text.
    async fn read_to_string(&self) -> Result<String>;
}

/// Writes exported files into a directory.
#[derive(Debug, Clone)]
pub struct DirectorySink {
    dir: PathBuf,
}

impl DirectorySink {
    /// Create a sink writing into `dir`, which must already exist.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// The directory files are written into.
    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

#[async_trait]
impl FileSink for DirectorySink {
    async fn save(&self, file_name: &str, contents: &str) -> Result<()> {
        let path = self.dir.join(file_name);
        tracing::debug!(path = %path.display(), bytes = contents.len(), "Writing exported file");
        tokio::fs::write(&path, contents).await?;
        Ok(())
    }
}

/// Reads a configuration file from a fixed path.
#[derive(Debug, Clone)]
pub struct PathSource {
    path: PathBuf,
}

impl PathSource {
    /// Create a source for `path`.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl FileSource for PathSource {
    async fn read_to_string(&self) -> Result<String> {
        tracing::debug!(path = %self.path.display(), "Reading configuration file");
        Ok(tokio::fs::read_to_string(&self.path).await?)
    }
}

//! JSON Lines record output.
//!
//! The [`RecordSink`] owns the single output file for the whole run. Pages
//! complete in arbitrary order, so every append goes through one writer lock
//! and lands as one complete line; the file order is completion order.

use crate::error::RunError;
use crate::models::PageRecord;
use std::path::{Path, PathBuf};
use tokio::fs::File;
use tokio::io::AsyncWriteExt;
use tokio::sync::Mutex;
use tracing::{debug, info, instrument};

/// Append-only sink writing one serialized [`PageRecord`] per line.
#[derive(Debug)]
pub struct RecordSink {
    path: PathBuf,
    file: Mutex<File>,
}

impl RecordSink {
    /// Create (or truncate) the output file.
    #[instrument(level = "info", skip_all, fields(path = %path.as_ref().display()))]
    pub async fn create(path: impl AsRef<Path>) -> Result<Self, RunError> {
        let path = path.as_ref().to_path_buf();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|source| RunError::Setup {
                    path: parent.to_path_buf(),
                    source,
                })?;
        }
        let file = File::create(&path).await.map_err(|source| RunError::Setup {
            path: path.clone(),
            source,
        })?;
        info!("Created record output file");
        Ok(Self {
            path,
            file: Mutex::new(file),
        })
    }

    /// Location of the output file, as given to [`RecordSink::create`].
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Serialize `record` and append it as one newline-terminated line.
    ///
    /// The same record always produces the same bytes.
    ///
    /// # Arguments
    ///
    /// * `record` - The page to write
    ///
    /// # Errors
    ///
    /// [`RunError::Serialize`] if the record cannot be encoded, or
    /// [`RunError::Write`] if the line cannot be written or flushed. Both are
    /// fatal to the run.
    pub async fn append(&self, record: &PageRecord) -> Result<(), RunError> {
        let mut line = encode_line(record)?;
        line.push('\n');

        let write_err = |source| RunError::Write {
            path: self.path.clone(),
            source,
        };
        let mut file = self.file.lock().await;
        file.write_all(line.as_bytes()).await.map_err(write_err)?;
        file.flush().await.map_err(write_err)?;
        debug!(url = %record.url(), bytes = line.len(), "Appended record");
        Ok(())
    }

    /// Flush and sync the file to disk.
    pub async fn finish(&self) -> Result<(), RunError> {
        let write_err = |source| RunError::Write {
            path: self.path.clone(),
            source,
        };
        let mut file = self.file.lock().await;
        file.flush().await.map_err(write_err)?;
        file.sync_all().await.map_err(write_err)
    }
}

/// Compact single-line JSON for one record.
pub fn encode_line(record: &PageRecord) -> Result<String, RunError> {
    serde_json::to_string(record).map_err(|source| RunError::Serialize {
        url: record.url().to_string(),
        source,
    })
}

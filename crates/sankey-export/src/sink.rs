//! Document sinks: JSON files on disk, or an in-memory map for tests and embedding hosts.

use async_trait::async_trait;
use sankey_types::{DocumentSink, SankeyDocument, SinkError};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tokio::sync::RwLock;

/// Writes each document as compact JSON to `<root>/<destination>`.
///
/// The file is written next to the destination first and renamed into place, so a failed
/// write never leaves a truncated document behind.
pub struct FileSink {
    root: PathBuf,
    pretty: bool,
}

impl FileSink {
    pub fn new(root: impl AsRef<Path>) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
            pretty: false,
        }
    }

    /// Destinations resolve against the working directory.
    pub fn current_dir() -> Self {
        Self::new(".")
    }

    pub fn pretty(mut self, pretty: bool) -> Self {
        self.pretty = pretty;
        self
    }

    pub fn path_for(&self, destination: &str) -> PathBuf {
        self.root.join(destination)
    }
}

#[async_trait]
impl DocumentSink for FileSink {
    async fn write_document(
        &self,
        destination: &str,
        document: &SankeyDocument,
    ) -> Result<(), SinkError> {
        let body = if self.pretty {
            document.to_json_pretty()?
        } else {
            document.to_json_string()?
        };
        let path = self.path_for(destination);
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                tokio::fs::create_dir_all(parent).await?;
            }
        }
        let mut tmp = path.clone().into_os_string();
        tmp.push(".tmp");
        let tmp = PathBuf::from(tmp);
        let written = match tokio::fs::write(&tmp, body.as_bytes()).await {
            Ok(()) => tokio::fs::rename(&tmp, &path).await,
            Err(e) => Err(e),
        };
        if let Err(e) = written {
            let _ = tokio::fs::remove_file(&tmp).await;
            return Err(e.into());
        }
        tracing::info!(path = %path.display(), bytes = body.len(), "wrote sankey document");
        Ok(())
    }
}

/// Keeps serialized documents in memory (process lifetime only).
pub struct InMemorySink {
    documents: RwLock<HashMap<String, String>>,
}

impl InMemorySink {
    pub fn new() -> Self {
        Self {
            documents: RwLock::new(HashMap::new()),
        }
    }

    /// Serialized JSON stored under `destination`, if any.
    pub async fn get(&self, destination: &str) -> Option<String> {
        self.documents.read().await.get(destination).cloned()
    }

    pub async fn len(&self) -> usize {
        self.documents.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.documents.read().await.is_empty()
    }
}

impl Default for InMemorySink {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl DocumentSink for InMemorySink {
    async fn write_document(
        &self,
        destination: &str,
        document: &SankeyDocument,
    ) -> Result<(), SinkError> {
        let body = document.to_json_string()?;
        self.documents
            .write()
            .await
            .insert(destination.to_string(), body);
        Ok(())
    }
}

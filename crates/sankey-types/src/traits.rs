//! Traits for path selection and document persistence.

use crate::{FlowPath, SankeyDocument};
use async_trait::async_trait;

/// Selects which shortest paths of one base entity contribute to the extracted links.
///
/// Receives every path rooted at a single base (ordered by destination id) and returns the
/// subset to keep. Closures `Fn(Vec<FlowPath>) -> Vec<FlowPath>` implement it directly.
pub trait PathFilter {
    fn select(&self, paths: Vec<FlowPath>) -> Vec<FlowPath>;
}

impl<F> PathFilter for F
where
    F: Fn(Vec<FlowPath>) -> Vec<FlowPath>,
{
    fn select(&self, paths: Vec<FlowPath>) -> Vec<FlowPath> {
        self(paths)
    }
}

/// Persistence sink for finished documents (subset of a key/value blob store).
#[async_trait]
pub trait DocumentSink: Send + Sync {
    /// Write one serialized document under `destination`. Failures are not retried.
    async fn write_document(
        &self,
        destination: &str,
        document: &SankeyDocument,
    ) -> Result<(), SinkError>;
}

#[derive(Debug, thiserror::Error)]
pub enum SankeyError {
    #[error("unknown entity: {0}")]
    UnknownEntity(String),
    #[error("invalid pipeline: {0}")]
    InvalidPipeline(String),
    #[error("configuration error: {0}")]
    Configuration(String),
    #[error("serialization: {0}")]
    Serialization(#[from] serde_json::Error),
}

#[derive(Debug, thiserror::Error)]
pub enum SinkError {
    #[error("io: {0}")]
    Io(#[from] std::io::Error),
    #[error("serialization: {0}")]
    Serialization(#[from] serde_json::Error),
    #[error("sink error: {0}")]
    Other(String),
}

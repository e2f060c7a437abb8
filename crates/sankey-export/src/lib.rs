//! Export glue: compact extracted links, build the document, hand it to a sink once.

mod sink;

pub use sankey_types::{DocumentSink, SinkError};
pub use sink::{FileSink, InMemorySink};

use sankey_graph::SankeySession;
use sankey_types::{ExtractedLink, OutputMode, SankeyDocument, SankeyError};

#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    #[error("sankey: {0}")]
    Sankey(#[from] SankeyError),
    #[error("sink: {0}")]
    Sink(#[from] SinkError),
}

/// Export in normal mode.
pub async fn export(
    session: &SankeySession,
    links: &[ExtractedLink],
    sink: &dyn DocumentSink,
    destination: &str,
) -> Result<SankeyDocument, ExportError> {
    export_with_mode(session, links, sink, destination, OutputMode::Normal).await
}

/// Build the document for `links` and write it to `destination`. Returns the written document.
pub async fn export_with_mode(
    session: &SankeySession,
    links: &[ExtractedLink],
    sink: &dyn DocumentSink,
    destination: &str,
    mode: OutputMode,
) -> Result<SankeyDocument, ExportError> {
    let document = session.document(links, mode);
    tracing::debug!(
        destination,
        %mode,
        nodes = document.nodes.len(),
        links = document.links.len(),
        "exporting sankey document"
    );
    sink.write_document(destination, &document).await?;
    Ok(document)
}

#[cfg(test)]
mod tests {
    use super::*;
    use sankey_graph::filters::AcceptAll;
    use sankey_graph::{EntityIndex, Relation};
    use std::sync::Arc;

    fn session() -> SankeySession {
        let index = Arc::new(EntityIndex::from_universe(["Basal", "ESR1", "Her2"]));
        let mut session = SankeySession::new(index);
        session
            .add_pipeline(&[
                Relation::new("Basal", "ESR1", 1.0),
                Relation::new("Her2", "ESR1", 1.0),
            ])
            .unwrap();
        session
    }

    #[tokio::test]
    async fn export_writes_exactly_one_document() {
        let s = session();
        let links = s.paths(["Basal", "Her2"], &AcceptAll).unwrap();
        let sink = InMemorySink::new();
        let doc = export(&s, &links, &sink, "sankey.json").await.unwrap();

        assert_eq!(sink.len().await, 1);
        let stored: serde_json::Value =
            serde_json::from_str(&sink.get("sankey.json").await.unwrap()).unwrap();
        assert_eq!(stored, serde_json::to_value(&doc).unwrap());
        assert_eq!(
            stored,
            serde_json::json!({
                "nodes": [ { "name": "Basal" }, { "name": "ESR1" }, { "name": "Her2" } ],
                "links": [
                    { "source": 0, "target": 1, "value": 1 },
                    { "source": 2, "target": 1, "value": 1 }
                ]
            })
        );
    }

    #[tokio::test]
    async fn colors_mode_is_forwarded() {
        let s = session();
        let links = s.paths(["Basal"], &AcceptAll).unwrap();
        let sink = InMemorySink::new();
        let doc = export_with_mode(&s, &links, &sink, "c.json", OutputMode::Colors)
            .await
            .unwrap();
        assert_eq!(doc.nodes[0].id.as_deref(), Some("basal_score"));
    }

    #[tokio::test]
    async fn sink_failure_is_propagated() {
        struct FailingSink;

        #[async_trait::async_trait]
        impl DocumentSink for FailingSink {
            async fn write_document(
                &self,
                _destination: &str,
                _document: &SankeyDocument,
            ) -> Result<(), SinkError> {
                Err(SinkError::Other("disk full".to_string()))
            }
        }

        let s = session();
        let links = s.paths(["Basal"], &AcceptAll).unwrap();
        let err = export(&s, &links, &FailingSink, "x.json").await.unwrap_err();
        assert!(matches!(err, ExportError::Sink(SinkError::Other(_))));
    }
}

//! Session: a sealed entity index plus the pipeline of stages indexed against it.

use crate::compact;
use crate::flow::FlowGraph;
use crate::index::EntityIndex;
use crate::paths::extract_links;
use sankey_types::{
    CompactLink, ExtractedLink, GraphStats, OutputMode, PathFilter, Relation, SankeyDocument,
    SankeyError, Stage,
};
use std::collections::BTreeSet;
use std::sync::Arc;

/// Owns the pipeline; the index is shared read-only.
///
/// Not synchronized: hosts calling from several threads must serialize access per session.
#[derive(Debug, Clone)]
pub struct SankeySession {
    index: Arc<EntityIndex>,
    pipeline: Vec<Stage>,
}

impl SankeySession {
    pub fn new(index: Arc<EntityIndex>) -> Self {
        Self {
            index,
            pipeline: Vec::new(),
        }
    }

    pub fn index(&self) -> &EntityIndex {
        &self.index
    }

    pub fn stages(&self) -> &[Stage] {
        &self.pipeline
    }

    /// Index `relations` and append them as the next stage. Nothing is appended on error.
    pub fn add_pipeline(&mut self, relations: &[Relation]) -> Result<(), SankeyError> {
        let stage = relations
            .iter()
            .map(|r| self.index.index_relation(r))
            .collect::<Result<Stage, _>>()?;
        tracing::debug!(
            stage = self.pipeline.len(),
            relations = stage.len(),
            "added pipeline stage"
        );
        self.pipeline.push(stage);
        Ok(())
    }

    /// Append a stage that was indexed elsewhere. Every id must exist in this session's index.
    pub fn add_indexed_stage(&mut self, stage: Stage) -> Result<(), SankeyError> {
        let limit = self.index.len();
        if let Some(bad) = stage
            .iter()
            .flat_map(|r| [r.source, r.target])
            .find(|id| id.index() >= limit)
        {
            return Err(SankeyError::Configuration(format!(
                "stage {} references id {} outside a universe of {} entities",
                self.pipeline.len(),
                bad,
                limit
            )));
        }
        self.pipeline.push(stage);
        Ok(())
    }

    /// Flow graph over the current pipeline. The stored stages are left untouched.
    pub fn build_graph(&self) -> Result<FlowGraph, SankeyError> {
        let graph = FlowGraph::build(&self.pipeline)?;
        let stats = graph.stats(self.pipeline.len());
        tracing::info!(
            stages = stats.stages,
            nodes = stats.nodes,
            edges = stats.edges,
            "built flow graph"
        );
        Ok(graph)
    }

    pub fn stats(&self) -> Result<GraphStats, SankeyError> {
        Ok(FlowGraph::build(&self.pipeline)?.stats(self.pipeline.len()))
    }

    /// Extract links used by the filtered shortest paths from each base entity.
    pub fn paths<I, S, F>(&self, base: I, filter: &F) -> Result<Vec<ExtractedLink>, SankeyError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
        F: PathFilter + ?Sized,
    {
        let graph = self.build_graph()?;
        let bases = base
            .into_iter()
            .map(|name| self.index.id(name.as_ref()))
            .collect::<Result<BTreeSet<_>, _>>()?;
        let links = extract_links(&graph, &bases, filter);
        tracing::info!(bases = bases.len(), links = links.len(), "extracted links");
        Ok(links)
    }

    pub fn clean_nodes_links(&self, links: &[ExtractedLink]) -> (Vec<String>, Vec<CompactLink>) {
        compact::clean_nodes_links(&self.index, links)
    }

    /// Compact `links` and build the document in one step.
    pub fn document(&self, links: &[ExtractedLink], mode: OutputMode) -> SankeyDocument {
        let (names, compact_links) = self.clean_nodes_links(links);
        compact::to_document(names, compact_links, mode)
    }
}

//! Weighted directed flow graph over entity ids.

use crate::join::join;
use sankey_types::{EntityId, GraphStats, IndexedRelation, SankeyError, Stage};
use std::collections::{BTreeMap, BTreeSet};

type EdgeIndex = BTreeMap<EntityId, BTreeMap<EntityId, f64>>;

/// Directed graph with one weight per (source, target) pair.
/// Adjacency is kept ordered by id so traversals are reproducible.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FlowGraph {
    nodes: BTreeSet<EntityId>,
    /// from -> (to -> weight)
    out_index: EdgeIndex,
}

impl FlowGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from the first stage plus the join of every adjacent stage pair.
    pub fn build(pipeline: &[Stage]) -> Result<Self, SankeyError> {
        let first = pipeline
            .first()
            .ok_or_else(|| SankeyError::InvalidPipeline("pipeline has no stages".to_string()))?;

        let mut links: Vec<IndexedRelation> = first.clone();
        for (i, pair) in pipeline.windows(2).enumerate() {
            let joined = join(&pair[0], &pair[1]);
            tracing::debug!(stage = i, joined = joined.len(), "joined adjacent stages");
            links.extend(joined);
        }

        let mut graph = Self::new();
        graph.add_weighted_edges(&links);
        Ok(graph)
    }

    /// Insert an edge; an existing (source, target) edge takes the new weight.
    pub fn add_edge(&mut self, source: EntityId, target: EntityId, weight: f64) {
        self.nodes.insert(source);
        self.nodes.insert(target);
        self.out_index
            .entry(source)
            .or_default()
            .insert(target, weight);
    }

    pub fn add_weighted_edges(&mut self, relations: &[IndexedRelation]) {
        for r in relations {
            self.add_edge(r.source, r.target, r.value);
        }
    }

    pub fn weight(&self, source: EntityId, target: EntityId) -> Option<f64> {
        self.out_index
            .get(&source)
            .and_then(|targets| targets.get(&target))
            .copied()
    }

    /// Out-neighbors of `id` in ascending id order.
    pub fn neighbors(&self, id: EntityId) -> impl Iterator<Item = EntityId> + '_ {
        self.out_index
            .get(&id)
            .into_iter()
            .flat_map(|targets| targets.keys().copied())
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn edge_count(&self) -> usize {
        self.out_index.values().map(BTreeMap::len).sum()
    }

    pub fn stats(&self, stages: usize) -> GraphStats {
        GraphStats {
            stages,
            nodes: self.node_count(),
            edges: self.edge_count(),
        }
    }
}

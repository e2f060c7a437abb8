//! Ready-made path filters. Any `Fn(Vec<FlowPath>) -> Vec<FlowPath>` works as well.

use sankey_types::{EntityId, FlowPath, PathFilter};
use std::collections::HashSet;

/// Keeps every path, including the trivial `[base]` one.
#[derive(Debug, Clone, Copy, Default)]
pub struct AcceptAll;

impl PathFilter for AcceptAll {
    fn select(&self, paths: Vec<FlowPath>) -> Vec<FlowPath> {
        paths
    }
}

/// Keeps paths with at least this many edges.
#[derive(Debug, Clone, Copy)]
pub struct MinEdges(pub usize);

impl PathFilter for MinEdges {
    fn select(&self, paths: Vec<FlowPath>) -> Vec<FlowPath> {
        paths
            .into_iter()
            .filter(|p| p.len().saturating_sub(1) >= self.0)
            .collect()
    }
}

/// Keeps paths with exactly this many nodes.
#[derive(Debug, Clone, Copy)]
pub struct ExactNodes(pub usize);

impl PathFilter for ExactNodes {
    fn select(&self, paths: Vec<FlowPath>) -> Vec<FlowPath> {
        paths.into_iter().filter(|p| p.len() == self.0).collect()
    }
}

/// Keeps paths whose last node belongs to the set.
#[derive(Debug, Clone, Default)]
pub struct EndsIn(pub HashSet<EntityId>);

impl EndsIn {
    pub fn new(targets: impl IntoIterator<Item = EntityId>) -> Self {
        Self(targets.into_iter().collect())
    }
}

impl PathFilter for EndsIn {
    fn select(&self, paths: Vec<FlowPath>) -> Vec<FlowPath> {
        paths
            .into_iter()
            .filter(|p| p.last().is_some_and(|id| self.0.contains(id)))
            .collect()
    }
}

/// Applies `0` then `1`.
#[derive(Debug, Clone)]
pub struct And<A, B>(pub A, pub B);

impl<A: PathFilter, B: PathFilter> PathFilter for And<A, B> {
    fn select(&self, paths: Vec<FlowPath>) -> Vec<FlowPath> {
        self.1.select(self.0.select(paths))
    }
}

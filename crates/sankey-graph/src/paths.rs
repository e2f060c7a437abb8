//! Shortest-path trees from base entities and edge-usage aggregation.

use crate::flow::FlowGraph;
use sankey_types::{EntityId, ExtractedLink, FlowPath, LinkValue, PathFilter};
use std::collections::{BTreeMap, BTreeSet, HashMap, VecDeque};

/// Hop-minimal paths from `source` to every node reachable over directed edges.
///
/// Keyed by destination; the source maps to the single-node path `[source]`. Neighbors are
/// expanded in ascending id order, so among equal-length paths the first discovered wins.
pub fn shortest_paths(graph: &FlowGraph, source: EntityId) -> BTreeMap<EntityId, FlowPath> {
    let mut prev: HashMap<EntityId, EntityId> = HashMap::new();
    let mut visited: BTreeSet<EntityId> = BTreeSet::new();
    let mut queue: VecDeque<EntityId> = VecDeque::new();

    visited.insert(source);
    queue.push_back(source);

    while let Some(current) = queue.pop_front() {
        for next in graph.neighbors(current) {
            if !visited.insert(next) {
                continue;
            }
            prev.insert(next, current);
            queue.push_back(next);
        }
    }

    visited
        .into_iter()
        .map(|dest| {
            let mut rev = vec![dest];
            let mut cursor = dest;
            while let Some(&p) = prev.get(&cursor) {
                rev.push(p);
                cursor = p;
            }
            rev.reverse();
            (dest, rev)
        })
        .collect()
}

/// Count how often each edge is used by the filtered shortest paths of every base.
///
/// Links come back in first-seen order. A link's value is its occurrence count; the graph
/// weight is used only when no count was recorded for the pair.
pub fn extract_links<F>(
    graph: &FlowGraph,
    bases: &BTreeSet<EntityId>,
    filter: &F,
) -> Vec<ExtractedLink>
where
    F: PathFilter + ?Sized,
{
    let mut linked: Vec<(EntityId, EntityId)> = Vec::new();
    let mut uv_count: HashMap<(EntityId, EntityId), u64> = HashMap::new();

    for &base in bases {
        let tree = shortest_paths(graph, base);
        let reachable = tree.len();
        let kept = filter.select(tree.into_values().collect());
        tracing::debug!(base = %base, reachable, kept = kept.len(), "selected paths");

        for path in &kept {
            for pair in path.windows(2) {
                let key = (pair[0], pair[1]);
                let count = uv_count.entry(key).or_insert_with(|| {
                    linked.push(key);
                    0
                });
                *count += 1;
            }
        }
    }

    linked
        .into_iter()
        .map(|(u, v)| ExtractedLink {
            source: u,
            target: v,
            value: resolve_value(graph, &uv_count, u, v),
        })
        .collect()
}

/// Count for the pair, else the stored edge weight, else zero.
pub(crate) fn resolve_value(
    graph: &FlowGraph,
    uv_count: &HashMap<(EntityId, EntityId), u64>,
    u: EntityId,
    v: EntityId,
) -> LinkValue {
    match uv_count.get(&(u, v)) {
        Some(&count) => LinkValue::Count(count),
        None => LinkValue::Weight(graph.weight(u, v).unwrap_or(0.0)),
    }
}

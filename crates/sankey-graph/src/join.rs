//! Natural join of two adjacent stages on the shared intermediate entity.

use sankey_types::{EntityId, IndexedRelation};
use std::collections::HashMap;

/// Compose `left` with `right` where `left.target == right.source`.
///
/// Each match yields `(left.source, right.target, right.value)`. When a source id occurs more
/// than once in `right`, the later relation wins. Left relations without a match are dropped.
pub fn join(left: &[IndexedRelation], right: &[IndexedRelation]) -> Vec<IndexedRelation> {
    let right_by_source: HashMap<EntityId, &IndexedRelation> =
        right.iter().map(|r| (r.source, r)).collect();

    let mut joined = Vec::with_capacity(left.len());
    let mut dropped = 0usize;
    for l in left {
        match right_by_source.get(&l.target) {
            Some(r) => joined.push(IndexedRelation {
                source: l.source,
                target: r.target,
                value: r.value,
            }),
            // Stage transition does not cover this node.
            None => dropped += 1,
        }
    }
    if dropped > 0 {
        tracing::debug!(dropped, kept = joined.len(), "join dropped unmatched relations");
    }
    joined
}

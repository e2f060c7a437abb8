//! Re-indexing of extracted links into a compact node list, and document assembly.

use crate::index::EntityIndex;
use sankey_types::{CompactLink, EntityId, ExtractedLink, OutputMode, SankeyDocument, SankeyNode};
use std::collections::{BTreeSet, HashMap};

const COLOR_KEY_SUFFIX: &str = "_score";

/// Give every id referenced by `links` a new index in `0..k` (ascending old id) and rewrite
/// the links. Returns the display names of the surviving nodes in new-index order.
pub fn clean_nodes_links(
    index: &EntityIndex,
    links: &[ExtractedLink],
) -> (Vec<String>, Vec<CompactLink>) {
    let used: BTreeSet<EntityId> = links
        .iter()
        .map(|l| l.source)
        .chain(links.iter().map(|l| l.target))
        .collect();

    let mut remap: HashMap<EntityId, u32> = HashMap::with_capacity(used.len());
    let mut names = Vec::with_capacity(used.len());
    for (new_index, old) in used.into_iter().enumerate() {
        remap.insert(old, new_index as u32);
        names.push(
            index
                .name(old)
                .map(str::to_string)
                .unwrap_or_else(|| old.to_string()),
        );
    }

    let compact = links
        .iter()
        .map(|l| CompactLink {
            source: remap_id(&remap, l.source),
            target: remap_id(&remap, l.target),
            value: l.value,
        })
        .collect();
    (names, compact)
}

/// Ids missing from the remap keep their original value.
fn remap_id(remap: &HashMap<EntityId, u32>, id: EntityId) -> u32 {
    remap.get(&id).copied().unwrap_or(id.0)
}

/// Stylesheet hook for a node: lowercased, spaces to underscores, fixed suffix.
pub fn color_key(name: &str) -> String {
    format!("{}{}", name.to_lowercase().replace(' ', "_"), COLOR_KEY_SUFFIX)
}

pub fn to_document(
    names: Vec<String>,
    links: Vec<CompactLink>,
    mode: OutputMode,
) -> SankeyDocument {
    let nodes = names
        .into_iter()
        .map(|name| {
            let id = match mode {
                OutputMode::Normal => None,
                OutputMode::Colors => Some(color_key(&name)),
            };
            SankeyNode { name, id }
        })
        .collect();
    SankeyDocument { nodes, links }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sankey_types::LinkValue;
    use serde_json::json;

    fn link(s: u32, t: u32, c: u64) -> ExtractedLink {
        ExtractedLink {
            source: EntityId(s),
            target: EntityId(t),
            value: LinkValue::Count(c),
        }
    }

    #[test]
    fn indices_are_compact_and_resolve_to_names() {
        let index = EntityIndex::from_universe(["a", "b", "c", "d", "e", "f"]);
        let links = vec![link(5, 1, 2), link(1, 3, 1), link(0, 3, 4)];
        let (names, compact) = clean_nodes_links(&index, &links);

        assert_eq!(names, ["a", "b", "d", "f"]);
        for (orig, c) in links.iter().zip(&compact) {
            assert!((c.source as usize) < names.len());
            assert!((c.target as usize) < names.len());
            assert_eq!(names[c.source as usize], index.name(orig.source).unwrap());
            assert_eq!(names[c.target as usize], index.name(orig.target).unwrap());
            assert_eq!(c.value, orig.value);
        }
    }

    #[test]
    fn empty_links_give_empty_document() {
        let index = EntityIndex::from_universe(["a"]);
        let (names, compact) = clean_nodes_links(&index, &[]);
        let doc = to_document(names, compact, OutputMode::Normal);
        assert_eq!(
            serde_json::to_value(&doc).unwrap(),
            json!({ "nodes": [], "links": [] })
        );
    }

    #[test]
    fn id_outside_universe_is_named_by_number() {
        let index = EntityIndex::from_universe(["a"]);
        let (names, compact) = clean_nodes_links(&index, &[link(0, 7, 1)]);
        assert_eq!(names, ["a", "7"]);
        assert_eq!(compact[0].target, 1);
    }

    #[test]
    fn unmapped_id_passes_through() {
        let remap = HashMap::from([(EntityId(4), 0u32)]);
        assert_eq!(remap_id(&remap, EntityId(4)), 0);
        assert_eq!(remap_id(&remap, EntityId(9)), 9);
    }

    #[test]
    fn colors_mode_adds_style_hook() {
        let names = vec!["Luminal B".to_string(), "ESR1".to_string()];
        let links = vec![CompactLink {
            source: 0,
            target: 1,
            value: LinkValue::Count(3),
        }];
        let doc = to_document(names.clone(), links.clone(), OutputMode::Colors);
        assert_eq!(
            serde_json::to_value(&doc).unwrap(),
            json!({
                "nodes": [
                    { "name": "Luminal B", "id": "luminal_b_score" },
                    { "name": "ESR1", "id": "esr1_score" }
                ],
                "links": [ { "source": 0, "target": 1, "value": 3 } ]
            })
        );

        let normal = to_document(names, links, OutputMode::Normal);
        assert_eq!(
            serde_json::to_value(&normal).unwrap()["nodes"][0],
            json!({ "name": "Luminal B" })
        );
    }
}

//! Flow graph core: entity index, stage joins, shortest-path extraction, and compaction.

mod compact;
pub mod filters;
mod flow;
mod index;
mod join;
mod paths;
mod session;

pub use compact::{clean_nodes_links, color_key, to_document};
pub use flow::FlowGraph;
pub use index::{EntityIndex, UniverseBuilder};
pub use join::join;
pub use paths::{extract_links, shortest_paths};
pub use sankey_types::{
    CompactLink, EntityId, ExtractedLink, FlowPath, GraphStats, IndexedRelation, LinkValue,
    OutputMode, PathFilter, Relation, SankeyDocument, SankeyError, SankeyNode, Stage,
};
pub use session::SankeySession;

//! Relation, link, and document types shared by the graph core and the export sinks.

use crate::SankeyError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Integer id of an entity in a sealed universe (position in sorted name order).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EntityId(pub u32);

impl EntityId {
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Named relation as supplied by the caller, before indexing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Relation {
    pub source: String,
    pub target: String,
    pub value: f64,
}

impl Relation {
    pub fn new(source: impl Into<String>, target: impl Into<String>, value: f64) -> Self {
        Self {
            source: source.into(),
            target: target.into(),
            value,
        }
    }
}

/// Relation whose endpoints were resolved against an entity index.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct IndexedRelation {
    pub source: EntityId,
    pub target: EntityId,
    pub value: f64,
}

/// One hop of the pipeline.
pub type Stage = Vec<IndexedRelation>;

/// Entity ids from a base entity to a reachable destination, both ends included.
pub type FlowPath = Vec<EntityId>;

/// Aggregated link value: occurrence count over selected paths, or a raw graph weight.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum LinkValue {
    Count(u64),
    Weight(f64),
}

/// Deduplicated edge produced by path extraction, still in universe ids.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ExtractedLink {
    pub source: EntityId,
    pub target: EntityId,
    pub value: LinkValue,
}

/// Link re-indexed into the compact node list of a document.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CompactLink {
    pub source: u32,
    pub target: u32,
    pub value: LinkValue,
}

/// Node entry of the output document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SankeyNode {
    pub name: String,
    /// Stylesheet hook, only emitted in colors mode.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
}

/// Nodes/links document handed to the renderer.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct SankeyDocument {
    pub nodes: Vec<SankeyNode>,
    pub links: Vec<CompactLink>,
}

impl SankeyDocument {
    pub fn to_json_string(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    pub fn to_json_pretty(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

/// How nodes are rendered in the output document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputMode {
    #[default]
    Normal,
    Colors,
}

impl fmt::Display for OutputMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OutputMode::Normal => write!(f, "normal"),
            OutputMode::Colors => write!(f, "colors"),
        }
    }
}

impl FromStr for OutputMode {
    type Err = SankeyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "normal" => Ok(OutputMode::Normal),
            "colors" => Ok(OutputMode::Colors),
            other => Err(SankeyError::Configuration(format!(
                "unsupported output mode: {}",
                other
            ))),
        }
    }
}

/// Size summary of a flow graph build.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct GraphStats {
    pub stages: usize,
    pub nodes: usize,
    pub edges: usize,
}

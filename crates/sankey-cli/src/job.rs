//! Job file: which stage tables to read, where paths start, which paths to keep, where to write.

use crate::CliError;
use sankey_graph::filters::{EndsIn, ExactNodes, MinEdges};
use sankey_graph::{EntityIndex, FlowPath, OutputMode, PathFilter, Relation, SankeyError};
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// One tab-separated stage table.
#[derive(Debug, Clone, Deserialize)]
pub struct StageSpec {
    pub path: PathBuf,
    /// Header name of the source column.
    pub source: String,
    /// Header name of the target column.
    pub target: String,
    /// Header name of a numeric weight column; every row weighs 1 when absent.
    #[serde(default)]
    pub value: Option<String>,
    /// Target cells are numbers and are taken by absolute value.
    #[serde(default)]
    pub abs_target: bool,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct FilterSpec {
    /// Keep paths with exactly this many nodes.
    #[serde(default)]
    pub nodes: Option<usize>,
    #[serde(default)]
    pub min_edges: Option<usize>,
    /// Keep paths ending in a target of this stage (0-based).
    #[serde(default)]
    pub ends_in_stage: Option<usize>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct JobConfig {
    pub stages: Vec<StageSpec>,
    #[serde(default)]
    pub base: Vec<String>,
    /// Use every source name of this stage (0-based) as a base entity.
    #[serde(default)]
    pub base_from_stage: Option<usize>,
    #[serde(default)]
    pub filter: FilterSpec,
    #[serde(default = "default_mode")]
    pub mode: String,
    #[serde(default = "default_output")]
    pub output: String,
    #[serde(default)]
    pub pretty: bool,
}

fn default_mode() -> String {
    "normal".to_string()
}

fn default_output() -> String {
    "sankey.json".to_string()
}

impl JobConfig {
    pub fn from_json(text: &str) -> Result<Self, CliError> {
        serde_json::from_str(text).map_err(CliError::Job)
    }

    pub async fn load(path: &Path) -> Result<Self, CliError> {
        let text = tokio::fs::read_to_string(path)
            .await
            .map_err(|source| CliError::Io {
                path: path.to_path_buf(),
                source,
            })?;
        Self::from_json(&text)
    }

    /// Command-line or environment values replace the file's output and mode.
    pub fn apply_overrides(&mut self, output: Option<String>, mode: Option<String>) {
        if let Some(output) = output {
            self.output = output;
        }
        if let Some(mode) = mode {
            self.mode = mode;
        }
    }

    pub fn output_mode(&self) -> Result<OutputMode, SankeyError> {
        self.mode.parse()
    }

    /// Explicit bases plus the sources of `base_from_stage`.
    pub fn base_names(&self, stages: &[Vec<Relation>]) -> Result<Vec<String>, SankeyError> {
        let mut names = self.base.clone();
        if let Some(k) = self.base_from_stage {
            let stage = stage_at(stages, k, "base_from_stage")?;
            names.extend(stage.iter().map(|r| r.source.clone()));
        }
        if names.is_empty() {
            return Err(SankeyError::Configuration(
                "job has no base entities".to_string(),
            ));
        }
        Ok(names)
    }

    pub fn path_filter(
        &self,
        index: &EntityIndex,
        stages: &[Vec<Relation>],
    ) -> Result<JobFilter, SankeyError> {
        let ends_in = match self.filter.ends_in_stage {
            Some(k) => {
                let stage = stage_at(stages, k, "ends_in_stage")?;
                let ids = stage
                    .iter()
                    .map(|r| index.id(&r.target))
                    .collect::<Result<Vec<_>, _>>()?;
                Some(EndsIn::new(ids))
            }
            None => None,
        };
        Ok(JobFilter {
            nodes: self.filter.nodes.map(ExactNodes),
            min_edges: self.filter.min_edges.map(MinEdges),
            ends_in,
        })
    }
}

fn stage_at<'a>(
    stages: &'a [Vec<Relation>],
    k: usize,
    field: &str,
) -> Result<&'a [Relation], SankeyError> {
    stages.get(k).map(Vec::as_slice).ok_or_else(|| {
        SankeyError::Configuration(format!(
            "{} = {} but the job has {} stages",
            field,
            k,
            stages.len()
        ))
    })
}

/// Conjunction of the filters named in the job; no filters keeps every path.
#[derive(Debug, Clone, Default)]
pub struct JobFilter {
    nodes: Option<ExactNodes>,
    min_edges: Option<MinEdges>,
    ends_in: Option<EndsIn>,
}

impl PathFilter for JobFilter {
    fn select(&self, mut paths: Vec<FlowPath>) -> Vec<FlowPath> {
        if let Some(f) = &self.nodes {
            paths = f.select(paths);
        }
        if let Some(f) = &self.min_edges {
            paths = f.select(paths);
        }
        if let Some(f) = &self.ends_in {
            paths = f.select(paths);
        }
        paths
    }
}

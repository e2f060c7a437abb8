//! Runs one job: read tables, build the session, extract paths, export.

use crate::job::JobConfig;
use crate::table::read_stage;
use crate::CliError;
use sankey_export::{export_with_mode, DocumentSink};
use sankey_graph::{GraphStats, Relation, SankeySession, UniverseBuilder};
use std::path::Path;
use std::sync::Arc;

/// What a finished job produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunSummary {
    pub graph: GraphStats,
    pub universe: usize,
    pub nodes: usize,
    pub links: usize,
    pub destination: String,
}

/// Execute `job`. Stage paths resolve against `base_dir`; the document goes to `sink`.
///
/// Everything is validated before the single sink write, so a failing job writes nothing.
pub async fn run_job(
    job: &JobConfig,
    base_dir: &Path,
    sink: &dyn DocumentSink,
) -> Result<RunSummary, CliError> {
    let mode = job.output_mode()?;

    let mut stages: Vec<Vec<Relation>> = Vec::with_capacity(job.stages.len());
    for spec in &job.stages {
        stages.push(read_stage(spec, base_dir).await?);
    }

    let mut universe = UniverseBuilder::new();
    for stage in &stages {
        universe.add_universe(
            stage
                .iter()
                .flat_map(|r| [r.source.as_str(), r.target.as_str()]),
        );
    }
    let index = Arc::new(universe.seal());
    tracing::info!(entities = index.len(), stages = stages.len(), "sealed universe");

    let mut session = SankeySession::new(Arc::clone(&index));
    for stage in &stages {
        session.add_pipeline(stage)?;
    }

    let base = job.base_names(&stages)?;
    let filter = job.path_filter(&index, &stages)?;
    let links = session.paths(&base, &filter)?;
    let graph = session.stats()?;

    let document = export_with_mode(&session, &links, sink, &job.output, mode).await?;
    Ok(RunSummary {
        graph,
        universe: index.len(),
        nodes: document.nodes.len(),
        links: document.links.len(),
        destination: job.output.clone(),
    })
}

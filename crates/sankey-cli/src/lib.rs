//! Job runner behind the `sankey` binary: TSV stage tables in, one sankey JSON document out.

pub mod job;
pub mod run;
pub mod table;

use sankey_export::ExportError;
use sankey_graph::SankeyError;
use std::path::PathBuf;

pub use job::{FilterSpec, JobConfig, JobFilter, StageSpec};
pub use run::{run_job, RunSummary};

#[derive(Debug, thiserror::Error)]
pub enum CliError {
    #[error("{}: {source}", path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("job file: {0}")]
    Job(serde_json::Error),
    #[error("{}:{line}: {message}", path.display())]
    Table {
        path: PathBuf,
        line: usize,
        message: String,
    },
    #[error(transparent)]
    Sankey(#[from] SankeyError),
    #[error(transparent)]
    Export(#[from] ExportError),
}

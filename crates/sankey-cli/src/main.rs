//! `sankey`: turn staged relation tables into a sankey nodes/links JSON document.

use clap::Parser;
use sankey_cli::{run_job, JobConfig};
use sankey_export::FileSink;
use std::path::{Path, PathBuf};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "sankey", version, about = "Build a sankey JSON document from staged flow tables")]
struct Cli {
    /// Job file (JSON) listing stage tables, base entities, filter, and output.
    job: PathBuf,

    /// Output destination, replaces the job's `output`.
    #[arg(short, long, env = "SANKEY_OUTPUT")]
    output: Option<String>,

    /// Node rendering: `normal` or `colors`.
    #[arg(short, long, env = "SANKEY_MODE")]
    mode: Option<String>,

    /// Indent the written JSON.
    #[arg(long)]
    pretty: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info".into()),
        ))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();
    let mut job = JobConfig::load(&cli.job).await?;
    job.apply_overrides(cli.output, cli.mode);

    let base_dir = cli.job.parent().unwrap_or_else(|| Path::new("."));
    let sink = FileSink::current_dir().pretty(cli.pretty || job.pretty);
    let summary = run_job(&job, base_dir, &sink).await?;

    tracing::info!(
        destination = %summary.destination,
        universe = summary.universe,
        graph_nodes = summary.graph.nodes,
        graph_edges = summary.graph.edges,
        nodes = summary.nodes,
        links = summary.links,
        "sankey document written"
    );
    Ok(())
}

//! Integration tests: job file + TSV tables on disk -> written sankey document.

use sankey_cli::{run_job, CliError, JobConfig};
use sankey_export::{FileSink, InMemorySink};
use sankey_graph::SankeyError;
use serde_json::json;
use std::path::Path;

const REGULON: &str = "fm\tfm_gene\nE2F1\tESR1\nE2F1\tFOXA1\nMYB\tESR1\n";
const SIGNATURE: &str = "gene\tvalue\nESR1\t-0.5\nFOXA1\t1.5\n";

fn write_tables(dir: &Path) {
    std::fs::write(dir.join("regulon.tsv"), REGULON).unwrap();
    std::fs::write(dir.join("signature.tsv"), SIGNATURE).unwrap();
}

fn job(extra: serde_json::Value) -> JobConfig {
    let mut v = json!({
        "stages": [
            { "path": "regulon.tsv", "source": "fm", "target": "fm_gene" },
            { "path": "signature.tsv", "source": "gene", "target": "value", "abs_target": true }
        ],
        "base_from_stage": 0,
        "filter": { "nodes": 2, "ends_in_stage": 1 }
    });
    if let (Some(obj), Some(more)) = (v.as_object_mut(), extra.as_object()) {
        for (k, val) in more {
            obj.insert(k.clone(), val.clone());
        }
    }
    JobConfig::from_json(&v.to_string()).unwrap()
}

#[tokio::test]
async fn job_writes_filtered_document_to_disk() {
    let dir = tempfile::tempdir().unwrap();
    write_tables(dir.path());
    let job = job(json!({ "output": "out/sankey.json" }));

    let sink = FileSink::new(dir.path());
    let summary = run_job(&job, dir.path(), &sink).await.unwrap();

    // universe: 0.5, 1.5, E2F1, ESR1, FOXA1, MYB
    assert_eq!(summary.universe, 6);
    // joins: E2F1->0.5, E2F1->1.5, MYB->0.5 plus three regulon edges.
    assert_eq!(summary.graph.edges, 6);
    assert_eq!(summary.links, 3);

    let text = std::fs::read_to_string(dir.path().join("out/sankey.json")).unwrap();
    let doc: serde_json::Value = serde_json::from_str(&text).unwrap();
    assert_eq!(
        doc,
        json!({
            "nodes": [
                { "name": "0.5" }, { "name": "1.5" }, { "name": "E2F1" }, { "name": "MYB" }
            ],
            "links": [
                { "source": 2, "target": 0, "value": 1 },
                { "source": 2, "target": 1, "value": 1 },
                { "source": 3, "target": 0, "value": 1 }
            ]
        })
    );
}

#[tokio::test]
async fn colors_mode_and_explicit_bases() {
    let dir = tempfile::tempdir().unwrap();
    write_tables(dir.path());
    let mut job = job(json!({ "base": ["MYB"], "base_from_stage": null }));
    job.apply_overrides(Some("colors.json".to_string()), Some("colors".to_string()));

    let sink = InMemorySink::new();
    let summary = run_job(&job, dir.path(), &sink).await.unwrap();
    assert_eq!(summary.destination, "colors.json");

    let doc: serde_json::Value =
        serde_json::from_str(&sink.get("colors.json").await.unwrap()).unwrap();
    assert_eq!(
        doc["nodes"],
        json!([
            { "name": "0.5", "id": "0.5_score" },
            { "name": "MYB", "id": "myb_score" }
        ])
    );
}

#[tokio::test]
async fn failing_job_writes_nothing() {
    let dir = tempfile::tempdir().unwrap();
    write_tables(dir.path());
    let sink = InMemorySink::new();

    let bad_mode = job(json!({ "mode": "sepia" }));
    let err = run_job(&bad_mode, dir.path(), &sink).await.unwrap_err();
    assert!(matches!(err, CliError::Sankey(SankeyError::Configuration(_))));

    let unknown_base = job(json!({ "base": ["NOPE"] }));
    let err = run_job(&unknown_base, dir.path(), &sink).await.unwrap_err();
    assert!(matches!(err, CliError::Sankey(SankeyError::UnknownEntity(ref n)) if n == "NOPE"));

    let missing_table = job(json!({ "stages": [
        { "path": "absent.tsv", "source": "a", "target": "b" }
    ] }));
    let err = run_job(&missing_table, dir.path(), &sink).await.unwrap_err();
    assert!(matches!(err, CliError::Io { .. }));

    assert!(sink.is_empty().await);
}

#[tokio::test]
async fn job_file_loads_from_disk() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("job.json");
    std::fs::write(
        &path,
        r#"{ "stages": [ { "path": "t.tsv", "source": "a", "target": "b", "value": "w" } ],
             "base": ["x"], "pretty": true }"#,
    )
    .unwrap();
    let job = JobConfig::load(&path).await.unwrap();
    assert_eq!(job.stages[0].value.as_deref(), Some("w"));
    assert!(job.pretty);

    let err = JobConfig::load(&dir.path().join("missing.json"))
        .await
        .unwrap_err();
    assert!(matches!(err, CliError::Io { .. }));
}

//! Tab-separated stage tables with a header row.

use crate::job::StageSpec;
use crate::CliError;
use sankey_graph::Relation;
use std::path::Path;

/// Read the table named by `spec`, resolving relative paths against `base_dir`.
pub async fn read_stage(spec: &StageSpec, base_dir: &Path) -> Result<Vec<Relation>, CliError> {
    let path = base_dir.join(&spec.path);
    let content = tokio::fs::read_to_string(&path)
        .await
        .map_err(|source| CliError::Io {
            path: path.clone(),
            source,
        })?;
    let relations = parse_stage(&content, spec).map_err(|(line, message)| CliError::Table {
        path: path.clone(),
        line,
        message,
    })?;
    tracing::debug!(path = %path.display(), relations = relations.len(), "read stage table");
    Ok(relations)
}

/// Parse table text. Errors carry the 1-based line number.
pub fn parse_stage(content: &str, spec: &StageSpec) -> Result<Vec<Relation>, (usize, String)> {
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(b'\t')
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(content.as_bytes());

    let header_line = content
        .lines()
        .position(|l| !l.is_empty())
        .map_or(1, |i| i + 1);
    let headers = reader
        .headers()
        .map_err(|e| (error_line(&e, header_line), e.to_string()))?
        .clone();
    if headers.iter().all(str::is_empty) {
        return Err((header_line, "missing header row".to_string()));
    }
    let column = |name: &str| {
        headers
            .iter()
            .position(|c| c == name)
            .ok_or_else(|| (header_line, format!("no column named {:?}", name)))
    };
    let source_col = column(&spec.source)?;
    let target_col = column(&spec.target)?;
    let value_col = spec.value.as_deref().map(column).transpose()?;

    let mut relations = Vec::new();
    for result in reader.records() {
        let record = result.map_err(|e| (error_line(&e, header_line), e.to_string()))?;
        if record.iter().all(str::is_empty) {
            continue;
        }
        let line_no = record.position().map_or(header_line, |p| p.line() as usize);
        let cell = |col: usize| {
            record
                .get(col)
                .ok_or_else(|| (line_no, format!("row has {} cells", record.len())))
        };

        let source = cell(source_col)?;
        let raw_target = cell(target_col)?;
        let target = if spec.abs_target {
            score_name(raw_target).ok_or_else(|| {
                (line_no, format!("target {:?} is not a number", raw_target))
            })?
        } else {
            raw_target.to_string()
        };
        let value = match value_col {
            Some(col) => {
                let raw = cell(col)?;
                raw.parse::<f64>()
                    .map_err(|_| (line_no, format!("value {:?} is not a number", raw)))?
            }
            None => 1.0,
        };
        relations.push(Relation::new(source, target, value));
    }
    Ok(relations)
}

/// Node name for `|score|`: equal magnitudes share one name (`-0.50` and `0.5` give `0.5`).
fn score_name(raw: &str) -> Option<String> {
    let score: f64 = raw.parse().ok()?;
    score.is_finite().then(|| format!("{:?}", score.abs()))
}

fn error_line(err: &csv::Error, fallback: usize) -> usize {
    err.position().map_or(fallback, |p| p.line() as usize)
}

use crate::paper::PaperRecord;
use anyhow::{Context, Result};
use std::path::Path;

/// Columns the papers sheet must carry. Missing any of these is a fatal
/// error; the file is not the sheet this tool expects.
pub const REQUIRED_COLUMNS: &[&str] = &[
    "Paper ID",
    "Paper Title",
    "Coder",
    "Supervisor",
    "Collection",
];

pub fn read_papers_csv(path: &Path) -> Result<Vec<PaperRecord>> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read CSV file {}", path.display()))?;
    parse_papers_csv(&content)
}

/// Parses the papers CSV into records, in file order.
///
/// Row-level problems (unparsable row, missing or empty Paper ID) are logged
/// as warnings and skipped so one bad row cannot abort the whole batch.
pub fn parse_papers_csv(content: &str) -> Result<Vec<PaperRecord>> {
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .from_reader(content.as_bytes());

    let headers = reader
        .headers()
        .context("Failed to read CSV header row")?
        .clone();
    let columns = resolve_columns(&headers)?;

    let mut records = Vec::new();
    for (row, result) in reader.records().enumerate() {
        // Header is line 1, first data row is line 2.
        let line = row + 2;
        let record = match result {
            Ok(record) => record,
            Err(err) => {
                log::warn!("Skipping malformed row at line {line}: {err}");
                continue;
            }
        };

        let paper_id = record.get(columns.id).map(str::trim).unwrap_or_default();
        if paper_id.is_empty() {
            log::warn!("Skipping row at line {line}: empty Paper ID");
            continue;
        }

        let field = |index: usize| {
            record
                .get(index)
                .map(str::trim)
                .filter(|value| !value.is_empty())
                .map(str::to_string)
        };

        records.push(PaperRecord {
            paper_id: paper_id.to_string(),
            title: field(columns.title),
            coder: field(columns.coder),
            supervisor: field(columns.supervisor),
            collection: field(columns.collection),
        });
    }

    Ok(records)
}

struct ColumnIndexes {
    id: usize,
    title: usize,
    coder: usize,
    supervisor: usize,
    collection: usize,
}

/// Locates every required column in the header row, or reports all the
/// missing ones at once.
fn resolve_columns(headers: &csv::StringRecord) -> Result<ColumnIndexes> {
    let position = |name: &str| headers.iter().position(|h| h.trim() == name);

    match (
        position("Paper ID"),
        position("Paper Title"),
        position("Coder"),
        position("Supervisor"),
        position("Collection"),
    ) {
        (Some(id), Some(title), Some(coder), Some(supervisor), Some(collection)) => {
            Ok(ColumnIndexes {
                id,
                title,
                coder,
                supervisor,
                collection,
            })
        }
        _ => {
            let missing: Vec<&str> = REQUIRED_COLUMNS
                .iter()
                .filter(|column| position(column).is_none())
                .copied()
                .collect();
            Err(anyhow::anyhow!(
                "Missing required columns: {}",
                missing.join(", ")
            ))
        }
    }
}

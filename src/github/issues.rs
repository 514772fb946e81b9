use crate::paper::PaperRecord;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Labels attached to every automatically created issue.
pub const ISSUE_LABELS: &[&str] = &["paper", "auto-generated"];

/// An issue already present on the tracker, as far as this tool cares:
/// its number and its title (which carries the Paper ID for adopted issues).
#[derive(Debug, Clone, PartialEq)]
pub struct TrackerIssue {
    pub number: u64,
    pub title: String,
}

/// Request payload for issue creation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NewIssue {
    pub title: String,
    pub body: String,
    pub labels: Vec<String>,
}

/// The slice of the creation response this tool reads back.
#[derive(Debug, Deserialize)]
pub struct CreatedIssueResponse {
    pub number: u64,
}

/// Builds the issue body from the record's metadata columns.
///
/// The timestamp is a parameter so tests can pin it; callers pass `Utc::now()`.
pub fn build_issue_body(record: &PaperRecord, created_at: DateTime<Utc>) -> String {
    let mut parts = Vec::new();

    if let Some(title) = &record.title {
        parts.push(format!("**Paper Title:** {title}"));
    }

    if let Some(collection) = &record.collection {
        parts.push(format!("**Collection:** {collection}"));
    }

    let authors: Vec<&str> = [record.coder.as_deref(), record.supervisor.as_deref()]
        .into_iter()
        .flatten()
        .collect();
    if !authors.is_empty() {
        parts.push(format!("**Authors:** {}", authors.join(", ")));
    }

    parts.push(format!(
        "\n---\n*Issue created automatically from CSV on {}*",
        created_at.format("%Y-%m-%d %H:%M:%S")
    ));

    parts.join("\n")
}

use crate::github::issues::{ISSUE_LABELS, NewIssue, TrackerIssue, build_issue_body};
use crate::ledger::LedgerStorage;
use crate::paper::PaperRecord;
use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use std::collections::{HashMap, HashSet};

#[derive(Debug, Clone, PartialEq)]
pub enum IssueAction {
    /// No issue exists for this Paper ID yet; create one.
    Create(NewIssue),
    /// The tracker already has an issue titled with this Paper ID; record it
    /// as processed without creating a duplicate.
    AdoptExisting { number: u64 },
}

#[derive(Debug, Default, Clone, PartialEq)]
pub struct SyncSummary {
    pub created: usize,
    pub adopted: usize,
    pub skipped: usize,
    pub failed: usize,
}

/// The planned work for one batch: the actions to dispatch plus the number of
/// records dropped because their ID was already processed or repeated within
/// the batch.
#[derive(Debug, Clone, PartialEq)]
pub struct IssuePlan {
    pub actions: Vec<(PaperRecord, IssueAction)>,
    pub skipped: usize,
}

/// Plans one action per Paper ID that still needs an issue.
///
/// Records whose ID is already in `processed` count as skipped, and a Paper ID
/// repeated within the batch is planned only once.
pub fn plan_issue_actions(
    records: &[PaperRecord],
    processed: &HashSet<String>,
    existing_issues: &[TrackerIssue],
    created_at: DateTime<Utc>,
) -> IssuePlan {
    let existing_by_title: HashMap<&str, u64> = existing_issues
        .iter()
        .map(|issue| (issue.title.trim(), issue.number))
        .collect();

    let mut planned: HashSet<&str> = HashSet::new();

    let actions: Vec<(PaperRecord, IssueAction)> = records
        .iter()
        .filter_map(|record| {
            let paper_id = record.paper_id.as_str();
            if processed.contains(paper_id) || !planned.insert(paper_id) {
                return None;
            }

            let action = match existing_by_title.get(paper_id) {
                Some(&number) => IssueAction::AdoptExisting { number },
                None => IssueAction::Create(NewIssue {
                    title: paper_id.to_string(),
                    body: build_issue_body(record, created_at),
                    labels: ISSUE_LABELS.iter().map(|label| label.to_string()).collect(),
                }),
            };

            Some((record.clone(), action))
        })
        .collect();

    let skipped = records.len() - actions.len();
    IssuePlan { actions, skipped }
}

/// Runs the planned actions against the tracker.
///
/// Each successfully handled Paper ID is added to `processed` and the ledger
/// is persisted immediately, so a crash mid-run never recreates issues on the
/// next attempt. A failed creation is logged and counted but does not stop the
/// batch; a ledger write failure is fatal.
pub async fn dispatch_issue_actions<F>(
    plan: &IssuePlan,
    processed: &mut HashSet<String>,
    ledger: &dyn LedgerStorage,
    mut create_issue: F,
) -> Result<SyncSummary>
where
    F: AsyncFnMut(&NewIssue) -> Result<u64>,
{
    let mut summary = SyncSummary {
        skipped: plan.skipped,
        ..SyncSummary::default()
    };

    for (record, action) in &plan.actions {
        match action {
            IssueAction::Create(issue) => match create_issue(issue).await {
                Ok(number) => {
                    log::info!("Created issue #{number} for Paper ID {}", record.paper_id);
                    processed.insert(record.paper_id.clone());
                    ledger
                        .save(processed)
                        .context("Failed to persist processed IDs")?;
                    summary.created += 1;
                }
                Err(err) => {
                    log::error!(
                        "Failed to create issue for Paper ID {}: {err:#}",
                        record.paper_id
                    );
                    summary.failed += 1;
                }
            },
            IssueAction::AdoptExisting { number } => {
                log::info!(
                    "Issue #{number} already exists for Paper ID {}",
                    record.paper_id
                );
                processed.insert(record.paper_id.clone());
                ledger
                    .save(processed)
                    .context("Failed to persist processed IDs")?;
                summary.adopted += 1;
            }
        }
    }

    Ok(summary)
}

use crate::auth::{self, Credentials};
use crate::cli;
use crate::csv_reader;
use crate::github::issues::{CreatedIssueResponse, NewIssue, TrackerIssue};
use crate::github::pull;
use crate::github::push;
use crate::ledger::{self, FileLedger, LedgerStorage};
use crate::output;
use anyhow::{Context, Result};
use std::path::Path;
use std::process::ExitCode;

mod endpoints {
    pub const API_BASE: &str = "https://api.github.com";
}

const USER_AGENT: &str = "papertrack-cli";
const USAGE: &str = "Usage: papertrack <command>

Commands:
  sync <csv-file> [ledger-file]  Create one tracking issue per unseen Paper ID
                                 (ledger defaults to processed_ids.json)
  help                           Show this message

Environment:
  GITHUB_TOKEN       API token used to create issues
  GITHUB_REPOSITORY  Target repository as <owner>/<repo>";

pub async fn run(
    args: Vec<String>,
    mut stdout_additional: Option<&mut dyn std::io::Write>,
) -> Result<ExitCode> {
    match cli::parser::parse_args(&args) {
        cli::parser::Command::Sync {
            csv_path,
            ledger_path,
        } => {
            let credentials = auth::credentials_from_env()?;

            let records = csv_reader::read_papers_csv(Path::new(&csv_path))?;
            log::info!("Loaded {} rows from {csv_path}", records.len());

            let ledger = FileLedger::new(
                ledger_path
                    .as_deref()
                    .unwrap_or(ledger::DEFAULT_LEDGER_PATH),
            );
            let mut processed = ledger.load()?;

            let client = reqwest::Client::builder()
                .timeout(std::time::Duration::from_secs(30))
                .build()
                .context("Failed to create HTTP client")?;

            let existing = fetch_existing_issues(&client, &credentials)
                .await
                .context("Failed to list existing issues")?;

            let plan =
                push::plan_issue_actions(&records, &processed, &existing, chrono::Utc::now());

            let summary = push::dispatch_issue_actions(
                &plan,
                &mut processed,
                &ledger,
                async |issue: &NewIssue| create_issue(&client, &credentials, issue).await,
            )
            .await?;

            output::println(
                &format!(
                    "Created {} new issues, adopted {} existing, skipped {} already processed.",
                    summary.created, summary.adopted, summary.skipped
                ),
                &mut stdout_additional,
            )?;

            if summary.failed > 0 {
                output::println(
                    &format!(
                        "{} issue creations failed; they will be retried on the next run.",
                        summary.failed
                    ),
                    &mut stdout_additional,
                )?;
                return Ok(ExitCode::FAILURE);
            }
            Ok(ExitCode::SUCCESS)
        }
        cli::parser::Command::Help => {
            output::println(USAGE, &mut stdout_additional)?;
            Ok(ExitCode::SUCCESS)
        }
        cli::parser::Command::Unknown(message) => {
            output::println(
                &format!("Invalid command or arguments: {message}. Use `help` for usage."),
                &mut stdout_additional,
            )?;
            Ok(ExitCode::FAILURE)
        }
    }
}

/// Fetches every issue in the repository, 100 per page, so planning can adopt
/// issues whose title already carries a Paper ID.
async fn fetch_existing_issues(
    client: &reqwest::Client,
    credentials: &Credentials,
) -> Result<Vec<TrackerIssue>> {
    let url = format!(
        "{}/repos/{}/issues",
        endpoints::API_BASE,
        credentials.repository
    );
    let mut all_issues = Vec::new();
    let mut page: u32 = 1;

    loop {
        let response = client
            .get(&url)
            .query(&[
                ("state", "all".to_string()),
                ("page", page.to_string()),
                ("per_page", "100".to_string()),
            ])
            .bearer_auth(&credentials.token)
            .header("Accept", "application/vnd.github.v3+json")
            .header("User-Agent", USER_AGENT)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(anyhow::anyhow!(
                "API request error: {}",
                response.status()
            ));
        }

        let page_json = response.json::<Vec<serde_json::Value>>().await?;
        if page_json.is_empty() {
            break;
        }

        all_issues.extend(pull::parse_tracker_issues(&page_json));
        page += 1;
    }

    Ok(all_issues)
}

async fn create_issue(
    client: &reqwest::Client,
    credentials: &Credentials,
    issue: &NewIssue,
) -> Result<u64> {
    let url = format!(
        "{}/repos/{}/issues",
        endpoints::API_BASE,
        credentials.repository
    );
    let response = client
        .post(&url)
        .bearer_auth(&credentials.token)
        .header("Accept", "application/vnd.github.v3+json")
        .header("User-Agent", USER_AGENT)
        .json(issue)
        .send()
        .await?;

    if !response.status().is_success() {
        return Err(anyhow::anyhow!(
            "API request error: {}",
            response.status()
        ));
    }

    let created = response.json::<CreatedIssueResponse>().await?;
    Ok(created.number)
}

use crate::SyncWorld;
use chrono::Utc;
use cucumber::gherkin::Step;
use cucumber::{given, then, when};
use papertrack::csv_reader::parse_papers_csv;
use papertrack::github::issues::{NewIssue, TrackerIssue};
use papertrack::github::push::{dispatch_issue_actions, plan_issue_actions};
use papertrack::ledger::{FileLedger, LedgerStorage};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

fn workdir(world: &mut SyncWorld) -> &Path {
    if world.workdir.is_none() {
        world.workdir = Some(tempfile::tempdir().expect("Failed to create temp dir"));
    }
    world.workdir.as_ref().unwrap().path()
}

fn ledger_path(world: &mut SyncWorld) -> PathBuf {
    if world.ledger_path.is_none() {
        world.ledger_path = Some(workdir(world).join("processed_ids.json"));
    }
    world.ledger_path.clone().unwrap()
}

fn split_ids(ids: &str) -> Vec<String> {
    ids.split(',')
        .map(str::trim)
        .filter(|id| !id.is_empty())
        .map(str::to_string)
        .collect()
}

fn read_ledger(world: &mut SyncWorld) -> Vec<String> {
    let path = ledger_path(world);
    if !path.exists() {
        return Vec::new();
    }
    let content = std::fs::read_to_string(&path).expect("Failed to read ledger file");
    serde_json::from_str(&content).expect("Ledger file should be a JSON array of strings")
}

#[given("a papers CSV file containing:")]
async fn given_csv_file(world: &mut SyncWorld, step: &Step) {
    let content = step
        .docstring
        .as_ref()
        .expect("This step requires a docstring with the CSV content")
        .trim_start_matches('\n')
        .to_string();
    let path = workdir(world).join("papers.csv");
    std::fs::write(&path, content).expect("Failed to write CSV file");
    world.csv_path = Some(path);
}

#[given(expr = "the ledger already contains {string}")]
async fn given_ledger_contents(world: &mut SyncWorld, ids: String) {
    let path = ledger_path(world);
    std::fs::write(&path, serde_json::to_string(&split_ids(&ids)).unwrap())
        .expect("Failed to seed ledger file");
}

#[given(expr = "issue creation fails for Paper ID {string}")]
async fn given_failing_id(world: &mut SyncWorld, paper_id: String) {
    world.failing_ids.insert(paper_id);
}

#[given(expr = "the tracker already has an issue titled {string} with number {int}")]
async fn given_existing_issue(world: &mut SyncWorld, title: String, number: u64) {
    world.existing_issues.push(TrackerIssue { number, title });
}

#[when("the sync runs")]
async fn when_sync_runs(world: &mut SyncWorld) {
    let csv_path = world
        .csv_path
        .clone()
        .expect("A papers CSV file must be set up first");
    let content = std::fs::read_to_string(&csv_path).expect("Failed to read CSV file");
    let records = parse_papers_csv(&content).expect("CSV should parse");

    let ledger = FileLedger::new(ledger_path(world));
    let mut processed = ledger.load().expect("Ledger should load");

    let plan = plan_issue_actions(&records, &processed, &world.existing_issues, Utc::now());

    let failing_ids = world.failing_ids.clone();
    let mut created: Vec<NewIssue> = Vec::new();
    let mut next_number = 100u64;

    let summary = dispatch_issue_actions(
        &plan,
        &mut processed,
        &ledger,
        async |issue: &NewIssue| {
            if failing_ids.contains(&issue.title) {
                return Err(anyhow::anyhow!("simulated tracker outage"));
            }
            created.push(issue.clone());
            next_number += 1;
            Ok(next_number)
        },
    )
    .await
    .expect("Dispatch should not hit a fatal error");

    world.created_issues = created;
    world.summary = Some(summary);
}

async fn run_cli(world: &mut SyncWorld, argv: Vec<String>) {
    let mut output = Vec::new();
    match papertrack::run::run(argv, Some(&mut output)).await {
        Ok(code) => {
            // ExitCode has no PartialEq; compare the Debug forms.
            world.exit_success =
                Some(format!("{code:?}") == format!("{:?}", ExitCode::SUCCESS));
        }
        Err(err) => {
            world.exit_success = Some(false);
            world.run_error = Some(format!("{err:#}"));
        }
    }
    world.captured_output = output;
}

#[given("no GitHub credentials are configured")]
async fn given_no_credentials(_world: &mut SyncWorld) {
    // Mutates process-global state; the scenario carries @serial.
    unsafe {
        std::env::remove_var(papertrack::auth::TOKEN_ENV);
        std::env::remove_var(papertrack::auth::REPOSITORY_ENV);
    }
}

#[when(expr = "papertrack runs with arguments {string}")]
async fn when_cli_runs_with(world: &mut SyncWorld, args: String) {
    let mut argv = vec!["papertrack".to_string()];
    argv.extend(args.split_whitespace().map(str::to_string));
    run_cli(world, argv).await;
}

#[when("papertrack runs with no arguments")]
async fn when_cli_runs_bare(world: &mut SyncWorld) {
    run_cli(world, vec!["papertrack".to_string()]).await;
}

#[then("the command succeeds")]
async fn then_command_succeeds(world: &mut SyncWorld) {
    assert_eq!(world.exit_success, Some(true));
}

#[then("the command fails")]
async fn then_command_fails(world: &mut SyncWorld) {
    assert_eq!(world.exit_success, Some(false));
}

#[then(expr = "the output contains {string}")]
async fn then_output_contains(world: &mut SyncWorld, text: String) {
    let output = String::from_utf8_lossy(&world.captured_output);
    assert!(output.contains(&text), "output was: {output}");
}

#[then(expr = "the run fails mentioning {string}")]
async fn then_run_error_mentions(world: &mut SyncWorld, text: String) {
    let error = world
        .run_error
        .as_ref()
        .expect("The run should have failed with an error");
    assert!(error.contains(&text), "error was: {error}");
}

#[then(expr = "{int} issue(s) is/are created")]
async fn then_issue_count(world: &mut SyncWorld, count: usize) {
    assert_eq!(world.created_issues.len(), count);
}

#[then(expr = "issues are created for {string}")]
async fn then_issue_titles(world: &mut SyncWorld, titles: String) {
    let actual: Vec<&str> = world
        .created_issues
        .iter()
        .map(|issue| issue.title.as_str())
        .collect();
    let expected = split_ids(&titles);
    assert_eq!(actual, expected);
}

#[then(expr = "the ledger contains exactly {string}")]
async fn then_ledger_contents(world: &mut SyncWorld, ids: String) {
    let mut actual = read_ledger(world);
    actual.sort();
    let mut expected = split_ids(&ids);
    expected.sort();
    assert_eq!(actual, expected);
}

#[then(expr = "the ledger does not contain {string}")]
async fn then_ledger_missing(world: &mut SyncWorld, paper_id: String) {
    let actual = read_ledger(world);
    assert!(
        !actual.contains(&paper_id),
        "ledger unexpectedly contains {paper_id}: {actual:?}"
    );
}

#[then(expr = "the run reports {int} failure(s)")]
async fn then_failures(world: &mut SyncWorld, count: usize) {
    let summary = world.summary.as_ref().expect("The sync must run first");
    assert_eq!(summary.failed, count);
}

#[then(expr = "the run reports {int} adopted issue(s)")]
async fn then_adopted(world: &mut SyncWorld, count: usize) {
    let summary = world.summary.as_ref().expect("The sync must run first");
    assert_eq!(summary.adopted, count);
}

#[then(expr = "the run reports {int} skipped record(s)")]
async fn then_skipped(world: &mut SyncWorld, count: usize) {
    let summary = world.summary.as_ref().expect("The sync must run first");
    assert_eq!(summary.skipped, count);
}

use crate::github::issues::TrackerIssue;

/// Extracts issues from a page of the GitHub issues list API.
///
/// Entries missing a number or title are dropped, as are pull requests
/// (the issues endpoint returns those too, flagged by a `pull_request` key).
pub fn parse_tracker_issues(issues_json: &[serde_json::Value]) -> Vec<TrackerIssue> {
    issues_json
        .iter()
        .filter_map(|issue| {
            let number = issue["number"].as_u64()?;
            let title = issue["title"].as_str()?;
            if !issue["pull_request"].is_null() {
                return None;
            }
            Some(TrackerIssue {
                number,
                title: title.to_string(),
            })
        })
        .collect()
}

use anyhow::{Result, anyhow};

pub const TOKEN_ENV: &str = "GITHUB_TOKEN";
pub const REPOSITORY_ENV: &str = "GITHUB_REPOSITORY";

/// Credentials the CI caller supplies through the environment.
#[derive(Debug, Clone, PartialEq)]
pub struct Credentials {
    pub token: String,
    /// Target repository in `owner/repo` form.
    pub repository: String,
}

/// Builds credentials from the raw environment values.
///
/// Separated from `credentials_from_env` so validation can be tested without
/// touching process-global state.
pub fn credentials_from_vars(
    token: Option<String>,
    repository: Option<String>,
) -> Result<Credentials> {
    let token = token
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
        .ok_or_else(|| anyhow!("{TOKEN_ENV} environment variable is required"))?;

    let repository = repository
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
        .ok_or_else(|| anyhow!("{REPOSITORY_ENV} environment variable is required"))?;

    if !is_valid_repository(&repository) {
        return Err(anyhow!(
            "Invalid repository format '{repository}'. Please use <owner>/<repo>."
        ));
    }

    Ok(Credentials { token, repository })
}

pub fn credentials_from_env() -> Result<Credentials> {
    credentials_from_vars(
        std::env::var(TOKEN_ENV).ok(),
        std::env::var(REPOSITORY_ENV).ok(),
    )
}

fn is_valid_repository(repository: &str) -> bool {
    let parts: Vec<&str> = repository.split('/').collect();
    parts.len() == 2 && !parts[0].is_empty() && !parts[1].is_empty()
}

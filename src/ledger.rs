use anyhow::{Context, Result};
use std::collections::HashSet;
use std::path::PathBuf;

/// Default ledger filename, committed back to the repository by the caller.
pub const DEFAULT_LEDGER_PATH: &str = "processed_ids.json";

/// Abstract persistence interface for the set of processed Paper IDs.
pub trait LedgerStorage {
    /// Return the stored set. If no ledger exists yet, returns an empty set.
    fn load(&self) -> Result<HashSet<String>>;
    /// Persist the set. A failure here is fatal for the caller: losing the
    /// ledger risks mass duplicate issue creation on the next run.
    fn save(&self, ids: &HashSet<String>) -> Result<()>;
}

/// File-backed ledger: a JSON array of Paper ID strings.
pub struct FileLedger {
    path: PathBuf,
}

impl FileLedger {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        FileLedger { path: path.into() }
    }
}

impl LedgerStorage for FileLedger {
    fn load(&self) -> Result<HashSet<String>> {
        if !self.path.exists() {
            return Ok(HashSet::new());
        }
        let content = std::fs::read_to_string(&self.path)
            .with_context(|| format!("Failed to read ledger file {}", self.path.display()))?;
        match serde_json::from_str::<Vec<String>>(&content) {
            Ok(ids) => Ok(ids.into_iter().collect()),
            Err(err) => {
                log::warn!(
                    "Ignoring unreadable ledger file {}: {err}",
                    self.path.display()
                );
                Ok(HashSet::new())
            }
        }
    }

    fn save(&self, ids: &HashSet<String>) -> Result<()> {
        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent).context("Failed to create ledger directory")?;
        }
        // Sorted so the committed file diffs cleanly between runs.
        let mut sorted: Vec<&String> = ids.iter().collect();
        sorted.sort();
        let content = serde_json::to_string_pretty(&sorted).context("Failed to encode ledger")?;
        std::fs::write(&self.path, content)
            .with_context(|| format!("Failed to write ledger file {}", self.path.display()))?;
        Ok(())
    }
}

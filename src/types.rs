use serde::{Deserialize, Serialize};

/// One source file as it appears in the dataset.
///
/// Field names and order are the JSON Lines schema: `repo`, `commit`, `path`, `text`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CodeSample {
    /// Repository location exactly as given on the command line
    pub repo: String,
    /// Revision the working copy was checked out at (empty if unresolved)
    pub commit: String,
    /// Path relative to the repository root
    pub path: String,
    /// File contents, lossily decoded as UTF-8
    pub text: String,
}

/// Outcome of processing one repository
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RepoReport {
    /// Repository location
    pub repo: String,
    /// Resolved revision, empty when resolution failed or the clone never happened
    pub commit: String,
    /// Records written for this repository
    pub files_written: usize,
    /// Why the repository was skipped or its walk cut short
    #[serde(default)]
    pub error: Option<String>,
}

impl RepoReport {
    pub fn new(repo: impl Into<String>) -> Self {
        Self {
            repo: repo.into(),
            ..Default::default()
        }
    }

    pub fn is_success(&self) -> bool {
        self.error.is_none()
    }
}

/// Totals for a whole run
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunSummary {
    /// Records written across all repositories
    pub files_written: usize,
    /// One report per repository, in processing order
    pub repos: Vec<RepoReport>,
    /// Wall time in milliseconds
    pub duration_ms: u64,
}

impl RunSummary {
    pub fn repos_succeeded(&self) -> usize {
        self.repos.iter().filter(|r| r.is_success()).count()
    }

    pub fn repos_failed(&self) -> usize {
        self.repos.len() - self.repos_succeeded()
    }

    pub(crate) fn push(&mut self, report: RepoReport) {
        self.files_written += report.files_written;
        self.repos.push(report);
    }
}

//! Tree walking and sample extraction for a cloned repository

mod filter;

pub use filter::{FileFilter, TEST_FILE_MARKERS};

use crate::error::{ScraperError, WalkError};
use crate::types::CodeSample;
use std::fs;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Walks one working copy and turns matching files into [`CodeSample`]s
pub struct RepoWalker<'a> {
    pub(crate) root: PathBuf,
    pub(crate) repo: String,
    pub(crate) commit: String,
    filter: &'a FileFilter,
}

impl<'a> RepoWalker<'a> {
    pub fn new(root: impl AsRef<Path>, filter: &'a FileFilter) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
            repo: String::new(),
            commit: String::new(),
            filter,
        }
    }

    /// Provenance stamped on every sample from this walk
    pub fn with_provenance(mut self, repo: impl Into<String>, commit: impl Into<String>) -> Self {
        self.repo = repo.into();
        self.commit = commit.into();
        self
    }

    /// Path relative to the walk root, or the path unchanged if it is outside it
    pub(crate) fn relative_path(&self, path: &Path) -> String {
        path.strip_prefix(&self.root)
            .unwrap_or(path)
            .to_string_lossy()
            .to_string()
    }

    /// Visit every file under the root and hand accepted samples to `emit`.
    ///
    /// Unreadable files and samples `emit` rejects with a non-fatal error are
    /// logged and skipped. A directory entry that cannot be read stops the walk
    /// with [`WalkError::EntryFailed`]; fatal errors from `emit` stop it as-is.
    /// Returns the number of samples `emit` accepted.
    pub fn walk<F>(&self, mut emit: F) -> Result<usize, ScraperError>
    where
        F: FnMut(&CodeSample) -> Result<(), ScraperError>,
    {
        if !self.root.is_dir() {
            return Err(WalkError::RootNotFound(self.root.display().to_string()).into());
        }

        let mut emitted = 0;

        for entry in WalkDir::new(&self.root).sort_by_file_name() {
            let entry = entry.map_err(|e| WalkError::EntryFailed(e.to_string()))?;

            if entry.file_type().is_dir() {
                continue;
            }

            let file_name = entry.file_name().to_string_lossy();
            if !self.filter.accepts(&file_name) {
                tracing::trace!("Skipping {:?}", entry.path());
                continue;
            }

            let sample = match self.read_sample(entry.path()) {
                Ok(sample) => sample,
                Err(e) => {
                    tracing::warn!("{}", e);
                    continue;
                }
            };

            match emit(&sample) {
                Ok(()) => emitted += 1,
                Err(e) if e.is_fatal() => return Err(e),
                Err(e) => tracing::warn!("{}", e),
            }
        }

        tracing::debug!("Emitted {} files from {}", emitted, self.root.display());
        Ok(emitted)
    }

    fn read_sample(&self, path: &Path) -> Result<CodeSample, WalkError> {
        let bytes = fs::read(path).map_err(|e| WalkError::ReadFailed {
            file: path.display().to_string(),
            reason: e.to_string(),
        })?;

        Ok(CodeSample {
            repo: self.repo.clone(),
            commit: self.commit.clone(),
            path: self.relative_path(path),
            text: String::from_utf8_lossy(&bytes).into_owned(),
        })
    }
}

//! Repository acquisition
//!
//! Obtains a shallow working copy of a repository location and the revision it
//! was checked out at. The pipeline only talks to the [`RepoFetcher`] trait;
//! [`GitCli`] implements it on top of the `git` command-line tool.

/// `git` command-line backend
pub mod cli;

pub use cli::GitCli;

use crate::error::AcquireError;
use std::path::Path;

/// Source of working copies
pub trait RepoFetcher {
    /// Place a shallow copy of `location` into `dest`, an existing empty directory.
    fn shallow_clone(&self, location: &str, dest: &Path) -> Result<(), AcquireError>;

    /// Revision identifier of the working copy at `workdir`, whitespace-trimmed.
    ///
    /// `location` is only used for error messages.
    fn resolve_revision(&self, location: &str, workdir: &Path) -> Result<String, AcquireError>;
}

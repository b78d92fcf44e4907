//! Per-repository pipeline: clone, resolve revision, walk, emit

use crate::collector::{FileFilter, RepoWalker};
use crate::config::Config;
use crate::error::{AcquireError, ScraperError};
use crate::git::{GitCli, RepoFetcher};
use crate::types::{RepoReport, RunSummary};
use crate::writer::JsonlWriter;
use std::io::Write;
use std::path::Path;
use std::time::Instant;
use tracing::{debug, error, info, warn};

/// Prefix of the scratch directory each repository is cloned into
pub const WORKSPACE_PREFIX: &str = "repo-";

/// Drives repositories through the pipeline one at a time
pub struct Scraper<F: RepoFetcher = GitCli> {
    fetcher: F,
    filter: FileFilter,
}

impl Scraper<GitCli> {
    pub fn from_config(config: &Config) -> Self {
        Self::new(
            GitCli::new(config.clone.git_binary.clone(), config.clone.depth),
            FileFilter::new(&config.filter.extensions, config.filter.skip_tests),
        )
    }
}

impl<F: RepoFetcher> Scraper<F> {
    pub fn new(fetcher: F, filter: FileFilter) -> Self {
        Self { fetcher, filter }
    }

    pub fn filter(&self) -> &FileFilter {
        &self.filter
    }

    /// Append records for every repository to `output`, then flush it.
    pub fn run_to_path(&self, repos: &[String], output: &Path) -> Result<RunSummary, ScraperError> {
        let mut writer = JsonlWriter::open_append(output)?;
        let summary = self.run(repos, &mut writer)?;
        writer.finish()?;
        Ok(summary)
    }

    /// Process repositories in order, writing records to `writer`.
    ///
    /// Only fatal errors (output failures) are returned; repository and file
    /// failures end up in the per-repository reports.
    pub fn run<W: Write>(
        &self,
        repos: &[String],
        writer: &mut JsonlWriter<W>,
    ) -> Result<RunSummary, ScraperError> {
        let started = Instant::now();
        let mut summary = RunSummary::default();

        for location in repos {
            let report = self.process_repo(location, writer)?;
            summary.push(report);
        }

        summary.duration_ms = started.elapsed().as_millis() as u64;
        info!(
            files = summary.files_written,
            repos_ok = summary.repos_succeeded(),
            repos_failed = summary.repos_failed(),
            duration_ms = summary.duration_ms,
            "Run complete"
        );
        Ok(summary)
    }

    /// Clone one repository into a scratch directory and emit its matching files.
    ///
    /// The scratch directory is removed before this returns.
    pub fn process_repo<W: Write>(
        &self,
        location: &str,
        writer: &mut JsonlWriter<W>,
    ) -> Result<RepoReport, ScraperError> {
        println!("Processing repo: {}", location);
        let mut report = RepoReport::new(location);

        let workspace = match tempfile::Builder::new()
            .prefix(WORKSPACE_PREFIX)
            .tempdir()
        {
            Ok(dir) => dir,
            Err(e) => {
                let err = AcquireError::TempDir {
                    repo: location.to_string(),
                    reason: e.to_string(),
                };
                error!(repo = %location, "{}", err);
                report.error = Some(err.to_string());
                return Ok(report);
            }
        };
        debug!(repo = %location, workspace = %workspace.path().display(), "Created workspace");

        println!(" Cloning...");
        if let Err(e) = self.fetcher.shallow_clone(location, workspace.path()) {
            error!(repo = %location, "{}", e);
            report.error = Some(e.to_string());
            return Ok(report);
        }

        let commit = match self.fetcher.resolve_revision(location, workspace.path()) {
            Ok(commit) => commit,
            Err(e) => {
                warn!(repo = %location, "{}", e);
                String::new()
            }
        };
        report.commit = commit.clone();

        let before = writer.records_written();
        let walker = RepoWalker::new(workspace.path(), &self.filter).with_provenance(location, commit);

        match walker.walk(|sample| writer.write_sample(sample)) {
            Ok(emitted) => report.files_written = emitted,
            Err(e) if e.is_fatal() => return Err(e),
            Err(e) => {
                error!(repo = %location, "Error walking {}: {}", location, e);
                report.files_written = writer.records_written() - before;
                report.error = Some(e.to_string());
            }
        }

        if let Err(e) = workspace.close() {
            warn!(repo = %location, "Failed to remove temp dir: {}", e);
        }

        info!(
            repo = %location,
            commit = %report.commit,
            files = report.files_written,
            "Repository processed"
        );
        Ok(report)
    }
}

#[cfg(test)]
mod tests;

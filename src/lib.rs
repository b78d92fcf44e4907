//! # repo-scraper - source repositories to a JSON Lines dataset
//!
//! Clones each repository location (shallow, depth 1 by default), walks the
//! working copy, keeps files whose name ends in one of the configured
//! extensions, and appends one JSON object per file to a single output file:
//!
//! ```text
//! {"repo":"https://github.com/org/project","commit":"3f2a...","path":"cmd/main.go","text":"package main\n..."}
//! ```
//!
//! Repositories are processed one after another. A repository that fails to
//! clone is logged and skipped; a file that cannot be read is logged and
//! skipped. Only configuration and output-file errors stop a run.
//!
//! ## Modules
//!
//! - [`cli`]: clap command line and the top-level run
//! - [`config`]: layered configuration (defaults, TOML file, environment, flags)
//! - [`scraper`]: the per-repository pipeline
//! - [`git`]: repository acquisition through the `git` binary
//! - [`collector`]: file filtering and tree walking
//! - [`writer`]: append-mode JSON Lines output
//! - [`types`]: dataset record and run reports
//! - [`error`]: error types
//! - [`paths`]: platform config locations
//!
//! ## Usage Example
//!
//! ```no_run
//! use repo_scraper::config::Config;
//! use repo_scraper::scraper::Scraper;
//!
//! fn main() -> anyhow::Result<()> {
//!     let mut config = Config::default();
//!     config.filter.extensions = vec!["rs".to_string()];
//!
//!     let repos = vec!["https://github.com/rust-lang/log".to_string()];
//!     let summary = Scraper::from_config(&config).run_to_path(&repos, &config.output.path)?;
//!     println!("{} files", summary.files_written);
//!     Ok(())
//! }
//! ```

/// Command-line parsing and entry point
pub mod cli;

/// File filtering and tree walking
pub mod collector;

/// Configuration management with environment variable overrides
pub mod config;

/// Error types and utilities
pub mod error;

/// Repository acquisition
pub mod git;

/// Platform configuration paths
pub mod paths;

/// Pipeline driver
pub mod scraper;

/// Dataset record and run report types
pub mod types;

/// JSON Lines output
pub mod writer;

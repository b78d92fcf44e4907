//! Command-line interface

use crate::config::Config;
use crate::error::ScraperError;
use crate::scraper::Scraper;
use crate::types::RunSummary;
use clap::{ArgAction, Parser};
use std::ffi::OsString;
use std::path::PathBuf;
use tracing::Level;

const LONG_VERSION: &str = concat!(
    env!("CARGO_PKG_VERSION"),
    " (",
    env!("REPO_SCRAPER_BUILD_COMMIT"),
    ", built ",
    env!("REPO_SCRAPER_BUILD_TIMESTAMP"),
    ")"
);

/// Clone repositories and append their source files to a JSON Lines dataset
#[derive(Debug, Parser)]
#[command(name = "repo-scraper", version, long_version = LONG_VERSION, about)]
pub struct Cli {
    /// Comma-separated list of file extensions, no dot [default: go,py,js]
    #[arg(short, long, value_name = "LIST")]
    pub ext: Option<String>,

    /// Output JSONL file path, appended to [default: code_dataset.jsonl]
    #[arg(short, long, value_name = "PATH")]
    pub out: Option<PathBuf>,

    /// Skip test files matching *_test.* or *.test.* [default: true]
    #[arg(
        long,
        value_name = "BOOL",
        num_args = 0..=1,
        require_equals = true,
        default_missing_value = "true",
        action = ArgAction::Set,
        value_parser = clap::builder::BoolishValueParser::new()
    )]
    pub skip_tests: Option<bool>,

    /// Clone depth [default: 1]
    #[arg(long, value_name = "N")]
    pub depth: Option<u32>,

    /// Git executable to run [default: git]
    #[arg(long = "git", value_name = "PATH")]
    pub git_binary: Option<String>,

    /// Config file [default: <config dir>/repo-scraper/config.toml, if present]
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// More log output (-v debug, -vv trace)
    #[arg(short, long, action = ArgAction::Count)]
    pub verbose: u8,

    /// Only log errors
    #[arg(short, long, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Repository URLs or paths, anything `git clone` accepts
    #[arg(value_name = "REPO", required = true)]
    pub repos: Vec<String>,
}

/// Single-dash long flags accepted for compatibility with older invocations
const LEGACY_FLAGS: [&str; 3] = ["ext", "out", "skip-tests"];

/// Rewrite `-ext`, `-out` and `-skip-tests` (with or without `=value`) into
/// their `--` forms. Everything after a bare `--` is left alone.
pub fn normalize_legacy_flags<I, T>(args: I) -> Vec<OsString>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString>,
{
    let mut positional_only = false;
    args.into_iter()
        .map(Into::into)
        .map(|arg| {
            if positional_only {
                return arg;
            }
            let Some(text) = arg.to_str() else {
                return arg;
            };
            if text == "--" {
                positional_only = true;
                return arg;
            }
            let Some(rest) = text.strip_prefix('-').filter(|r| !r.starts_with('-')) else {
                return arg;
            };
            let name = rest.split('=').next().unwrap_or(rest);
            if LEGACY_FLAGS.contains(&name) {
                OsString::from(format!("--{}", rest))
            } else {
                arg
            }
        })
        .collect()
}

impl Cli {
    /// Parse the process arguments, accepting legacy single-dash flags
    pub fn parse_args() -> Self {
        Self::parse_from(normalize_legacy_flags(std::env::args_os()))
    }

    pub fn log_level(&self) -> Level {
        if self.quiet {
            return Level::ERROR;
        }
        match self.verbose {
            0 => Level::INFO,
            1 => Level::DEBUG,
            _ => Level::TRACE,
        }
    }

    /// Overlay the flags that were given on top of `config`
    pub fn apply_to(&self, config: &mut Config) {
        if let Some(ext) = &self.ext {
            config.filter.extensions = crate::config::parse_extensions(ext);
        }
        if let Some(out) = &self.out {
            config.output.path = out.clone();
        }
        if let Some(skip_tests) = self.skip_tests {
            config.filter.skip_tests = skip_tests;
        }
        if let Some(depth) = self.depth {
            config.clone.depth = depth;
        }
        if let Some(git) = &self.git_binary {
            config.clone.git_binary = git.clone();
        }
    }

    /// Resolve the configuration and run the whole pipeline
    pub fn run(&self) -> Result<RunSummary, ScraperError> {
        let mut config = Config::load(self.config.as_deref())?;
        self.apply_to(&mut config);
        config.validate()?;

        tracing::debug!(
            extensions = ?config.filter.extensions,
            skip_tests = config.filter.skip_tests,
            output = %config.output.path.display(),
            repos = self.repos.len(),
            "Resolved configuration"
        );

        let summary = Scraper::from_config(&config).run_to_path(&self.repos, &config.output.path)?;
        println!(
            "Done. Wrote {} files to {}",
            summary.files_written,
            config.output.path.display()
        );
        Ok(summary)
    }
}

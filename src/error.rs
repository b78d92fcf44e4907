/// Centralized error types for repo-scraper using thiserror
///
/// Errors fall in three groups: fatal configuration/output problems that stop the
/// run, per-repository failures that skip one repository, and per-file failures
/// that skip one file.
use thiserror::Error;

/// Main error type for the scraper
#[derive(Error, Debug)]
pub enum ScraperError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Acquisition error: {0}")]
    Acquire(#[from] AcquireError),

    #[error("Walk error: {0}")]
    Walk(#[from] WalkError),

    #[error("Output error: {0}")]
    Output(#[from] OutputError),

}

/// Errors related to configuration
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to load configuration file: {0}")]
    LoadFailed(String),

    #[error("Failed to parse configuration: {0}")]
    ParseFailed(String),

    #[error("Invalid configuration value for '{key}': {reason}")]
    InvalidValue { key: String, reason: String },

    #[error("Failed to save configuration: {0}")]
    SaveFailed(String),

    #[error("Configuration file not found: {0}")]
    FileNotFound(String),
}

/// Errors raised while obtaining a working copy of a repository
#[derive(Error, Debug)]
pub enum AcquireError {
    #[error("Failed to create temp dir for {repo}: {reason}")]
    TempDir { repo: String, reason: String },

    #[error("Failed to run '{program}': {reason}")]
    Spawn { program: String, reason: String },

    #[error("Git clone failed for {repo}: {status}\n{output}")]
    CloneFailed {
        repo: String,
        status: String,
        output: String,
    },

    #[error("Failed to get commit SHA for {repo}: {reason}")]
    RevisionFailed { repo: String, reason: String },
}

/// Errors raised while walking a cloned tree
#[derive(Error, Debug)]
pub enum WalkError {
    #[error("Workspace does not exist: {0}")]
    RootNotFound(String),

    #[error("Failed to read directory entry: {0}")]
    EntryFailed(String),

    #[error("Failed to read {file}: {reason}")]
    ReadFailed { file: String, reason: String },

    #[error("JSON marshal error for {file}: {reason}")]
    SerializeFailed { file: String, reason: String },
}

/// Errors related to the dataset output file
#[derive(Error, Debug)]
pub enum OutputError {
    #[error("Failed to open output file '{path}': {reason}")]
    OpenFailed { path: String, reason: String },

    #[error("Failed to write to output file '{path}': {reason}")]
    WriteFailed { path: String, reason: String },

    #[error("Failed to flush output file '{path}': {reason}")]
    FlushFailed { path: String, reason: String },
}

impl ScraperError {
    /// True for errors that must stop the whole run.
    ///
    /// Acquisition and walk errors only cost one repository or one file.
    pub fn is_fatal(&self) -> bool {
        !matches!(self, ScraperError::Acquire(_) | ScraperError::Walk(_))
    }
}

/// Configuration system for repo-scraper
///
/// Supports loading from multiple sources with priority:
/// CLI args > Environment variables > Config file > Defaults
use crate::error::{ConfigError, ScraperError};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct Config {
    /// Which files end up in the dataset
    #[serde(default)]
    pub filter: FilterConfig,

    /// Where records are written
    #[serde(default)]
    pub output: OutputConfig,

    /// How repositories are fetched
    #[serde(default)]
    pub clone: CloneConfig,
}

/// File selection configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FilterConfig {
    /// File extensions without the leading dot, matched in order
    #[serde(default = "default_extensions")]
    pub extensions: Vec<String>,

    /// Drop files whose name contains `_test.` or `.test.`
    #[serde(default = "default_skip_tests")]
    pub skip_tests: bool,
}

/// Output configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct OutputConfig {
    /// JSON Lines file, opened in append mode
    #[serde(default = "default_output_path")]
    pub path: PathBuf,
}

/// Clone configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CloneConfig {
    /// History depth passed to `git clone --depth`
    #[serde(default = "default_clone_depth")]
    pub depth: u32,

    /// Version-control binary to invoke
    #[serde(default = "default_git_binary")]
    pub git_binary: String,
}

pub(crate) const DEFAULT_EXTENSIONS: &str = "go,py,js";

fn default_extensions() -> Vec<String> {
    parse_extensions(DEFAULT_EXTENSIONS)
}

fn default_skip_tests() -> bool {
    true
}

fn default_output_path() -> PathBuf {
    PathBuf::from("code_dataset.jsonl")
}

fn default_clone_depth() -> u32 {
    1
}

fn default_git_binary() -> String {
    "git".to_string()
}

impl Default for FilterConfig {
    fn default() -> Self {
        Self {
            extensions: default_extensions(),
            skip_tests: default_skip_tests(),
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            path: default_output_path(),
        }
    }
}

impl Default for CloneConfig {
    fn default() -> Self {
        Self {
            depth: default_clone_depth(),
            git_binary: default_git_binary(),
        }
    }
}

/// Split a comma-separated extension list, trimming entries and dropping empty ones.
pub fn parse_extensions(list: &str) -> Vec<String> {
    list.split(',')
        .map(str::trim)
        .filter(|ext| !ext.is_empty())
        .map(String::from)
        .collect()
}

/// Parse a boolean the way command-line flags spell it
fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "t" | "true" | "yes" | "on" => Some(true),
        "0" | "f" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

impl Config {
    /// Load configuration from file. Values are checked by [`Config::validate`]
    /// once env and CLI overrides have been merged.
    pub fn from_file(path: &Path) -> Result<Self, ScraperError> {
        if !path.exists() {
            return Err(ConfigError::FileNotFound(path.display().to_string()).into());
        }

        let content = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::LoadFailed(format!("Failed to read config file: {}", e)))?;

        let config: Config = toml::from_str(&content)
            .map_err(|e| ConfigError::ParseFailed(format!("Invalid TOML: {}", e)))?;

        Ok(config)
    }

    /// Load configuration from the default location, or fall back to defaults
    pub fn load_or_default() -> Result<Self, ScraperError> {
        let config_path = crate::paths::PlatformPaths::default_config_path();

        if config_path.exists() {
            tracing::debug!("Loading config from: {}", config_path.display());
            Self::from_file(&config_path)
        } else {
            tracing::debug!("No config file found, using defaults");
            Ok(Self::default())
        }
    }

    /// Save configuration to file
    pub fn save(&self, path: &Path) -> Result<(), ScraperError> {
        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent).map_err(|e| {
                ConfigError::SaveFailed(format!("Failed to create config directory: {}", e))
            })?;
        }

        let content = toml::to_string_pretty(self)
            .map_err(|e| ConfigError::SaveFailed(format!("Failed to serialize config: {}", e)))?;

        std::fs::write(path, content)
            .map_err(|e| ConfigError::SaveFailed(format!("Failed to write config file: {}", e)))?;

        tracing::info!("Saved config to: {}", path.display());
        Ok(())
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<(), ScraperError> {
        if self.filter.extensions.is_empty() {
            return Err(ConfigError::InvalidValue {
                key: "filter.extensions".to_string(),
                reason: "must contain at least one extension".to_string(),
            }
            .into());
        }

        for ext in &self.filter.extensions {
            if ext.trim().is_empty() || ext.starts_with('.') || ext.contains(['/', '\\']) {
                return Err(ConfigError::InvalidValue {
                    key: "filter.extensions".to_string(),
                    reason: format!(
                        "'{}' must be a bare extension without a leading dot or separators",
                        ext
                    ),
                }
                .into());
            }
        }

        if self.output.path.as_os_str().is_empty() {
            return Err(ConfigError::InvalidValue {
                key: "output.path".to_string(),
                reason: "must not be empty".to_string(),
            }
            .into());
        }

        if self.clone.depth == 0 {
            return Err(ConfigError::InvalidValue {
                key: "clone.depth".to_string(),
                reason: "must be greater than 0".to_string(),
            }
            .into());
        }

        if self.clone.git_binary.trim().is_empty() {
            return Err(ConfigError::InvalidValue {
                key: "clone.git_binary".to_string(),
                reason: "must not be empty".to_string(),
            }
            .into());
        }

        Ok(())
    }

    /// Apply environment variable overrides
    pub fn apply_env_overrides(&mut self) {
        self.apply_overrides_from(|key| std::env::var(key).ok());
    }

    /// Apply `REPO_SCRAPER_*` overrides resolved through `lookup`
    pub fn apply_overrides_from<L>(&mut self, lookup: L)
    where
        L: Fn(&str) -> Option<String>,
    {
        if let Some(exts) = lookup("REPO_SCRAPER_EXT") {
            self.filter.extensions = parse_extensions(&exts);
        }

        if let Some(path) = lookup("REPO_SCRAPER_OUT") {
            self.output.path = PathBuf::from(path);
        }

        if let Some(skip) = lookup("REPO_SCRAPER_SKIP_TESTS") {
            match parse_bool(&skip) {
                Some(value) => self.filter.skip_tests = value,
                None => tracing::warn!("Ignoring REPO_SCRAPER_SKIP_TESTS={:?}: not a boolean", skip),
            }
        }

        if let Some(depth) = lookup("REPO_SCRAPER_CLONE_DEPTH") {
            match depth.trim().parse() {
                Ok(value) => self.clone.depth = value,
                Err(_) => tracing::warn!("Ignoring REPO_SCRAPER_CLONE_DEPTH={:?}: not a number", depth),
            }
        }

        if let Some(git) = lookup("REPO_SCRAPER_GIT") {
            self.clone.git_binary = git;
        }
    }

    /// Load a config file (explicit path or default location), then apply env overrides
    pub fn load(path: Option<&Path>) -> Result<Self, ScraperError> {
        let mut config = match path {
            Some(path) => Self::from_file(path)?,
            None => Self::load_or_default()?,
        };
        config.apply_env_overrides();
        Ok(config)
    }
}

use super::RepoFetcher;
use crate::error::AcquireError;
use std::ffi::OsStr;
use std::path::Path;
use std::process::{Command, Output};

/// Runs the `git` binary as a child process
#[derive(Debug, Clone)]
pub struct GitCli {
    program: String,
    depth: u32,
}

impl Default for GitCli {
    fn default() -> Self {
        Self::new("git", 1)
    }
}

impl GitCli {
    pub fn new(program: impl Into<String>, depth: u32) -> Self {
        Self {
            program: program.into(),
            depth,
        }
    }

    pub fn program(&self) -> &str {
        &self.program
    }

    pub fn depth(&self) -> u32 {
        self.depth
    }

    fn run<I, S>(&self, args: I) -> Result<Output, AcquireError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<OsStr>,
    {
        Command::new(&self.program)
            .args(args)
            .output()
            .map_err(|e| AcquireError::Spawn {
                program: self.program.clone(),
                reason: e.to_string(),
            })
    }
}

/// stdout followed by stderr, like a terminal would show them
fn combined_output(output: &Output) -> String {
    let mut text = String::from_utf8_lossy(&output.stdout).into_owned();
    text.push_str(&String::from_utf8_lossy(&output.stderr));
    text
}

impl RepoFetcher for GitCli {
    fn shallow_clone(&self, location: &str, dest: &Path) -> Result<(), AcquireError> {
        let depth = format!("--depth={}", self.depth);
        tracing::debug!(
            repo = %location,
            dest = %dest.display(),
            "{} clone {}",
            self.program,
            depth
        );

        let output = self.run([
            OsStr::new("clone"),
            OsStr::new(&depth),
            // A location starting with `-` must not be read as an option
            OsStr::new("--"),
            OsStr::new(location),
            dest.as_os_str(),
        ])?;

        if !output.status.success() {
            return Err(AcquireError::CloneFailed {
                repo: location.to_string(),
                status: output.status.to_string(),
                output: combined_output(&output),
            });
        }

        Ok(())
    }

    fn resolve_revision(&self, location: &str, workdir: &Path) -> Result<String, AcquireError> {
        let output = self.run([
            OsStr::new("-C"),
            workdir.as_os_str(),
            OsStr::new("rev-parse"),
            OsStr::new("HEAD"),
        ])?;

        if !output.status.success() {
            return Err(AcquireError::RevisionFailed {
                repo: location.to_string(),
                reason: format!("{}: {}", output.status, combined_output(&output).trim()),
            });
        }

        Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
    }
}

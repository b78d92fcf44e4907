//! Pipeline tests driven by an in-process fetcher

use super::*;
use crate::types::CodeSample;
use std::cell::RefCell;
use std::collections::{HashMap, HashSet};
use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;
use walkdir::WalkDir;

/// Copies fixture trees instead of cloning
#[derive(Default)]
struct FixtureFetcher {
    sources: HashMap<String, PathBuf>,
    revisions: HashMap<String, String>,
}

impl FixtureFetcher {
    fn add(&mut self, location: &str, source: &Path, revision: Option<&str>) {
        self.sources.insert(location.to_string(), source.to_path_buf());
        if let Some(rev) = revision {
            self.revisions.insert(location.to_string(), rev.to_string());
        }
    }
}

impl RepoFetcher for FixtureFetcher {
    fn shallow_clone(&self, location: &str, dest: &Path) -> Result<(), AcquireError> {
        let source = self
            .sources
            .get(location)
            .ok_or_else(|| AcquireError::CloneFailed {
                repo: location.to_string(),
                status: "exit status: 128".to_string(),
                output: format!("fatal: repository '{}' does not exist", location),
            })?;

        for entry in WalkDir::new(source) {
            let entry = entry.unwrap();
            let target = dest.join(entry.path().strip_prefix(source).unwrap());
            if entry.file_type().is_dir() {
                fs::create_dir_all(&target).unwrap();
            } else {
                fs::copy(entry.path(), &target).unwrap();
            }
        }
        Ok(())
    }

    fn resolve_revision(&self, location: &str, _workdir: &Path) -> Result<String, AcquireError> {
        self.revisions
            .get(location)
            .cloned()
            .ok_or_else(|| AcquireError::RevisionFailed {
                repo: location.to_string(),
                reason: "fatal: not a git repository".to_string(),
            })
    }
}

/// Wraps a fetcher, records every workspace it was handed and can delete
/// chosen workspaces right after cloning them
struct TrackingFetcher {
    inner: FixtureFetcher,
    vanish: HashSet<String>,
    workspaces: RefCell<Vec<PathBuf>>,
}

impl TrackingFetcher {
    fn new(inner: FixtureFetcher, vanish: &[&str]) -> Self {
        Self {
            inner,
            vanish: vanish.iter().map(|v| v.to_string()).collect(),
            workspaces: RefCell::new(Vec::new()),
        }
    }
}

impl RepoFetcher for TrackingFetcher {
    fn shallow_clone(&self, location: &str, dest: &Path) -> Result<(), AcquireError> {
        self.workspaces.borrow_mut().push(dest.to_path_buf());
        self.inner.shallow_clone(location, dest)?;
        if self.vanish.contains(location) {
            fs::remove_dir_all(dest).unwrap();
        }
        Ok(())
    }

    fn resolve_revision(&self, location: &str, workdir: &Path) -> Result<String, AcquireError> {
        self.inner.resolve_revision(location, workdir)
    }
}

fn fixture(files: &[(&str, &str)]) -> TempDir {
    let dir = TempDir::new().unwrap();
    for (path, content) in files {
        let full = dir.path().join(path);
        if let Some(parent) = full.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(full, content).unwrap();
    }
    dir
}

fn run_in_memory<F: RepoFetcher>(
    scraper: &Scraper<F>,
    repos: &[&str],
) -> (RunSummary, Vec<CodeSample>) {
    let repos: Vec<String> = repos.iter().map(|r| r.to_string()).collect();
    let mut writer = JsonlWriter::new(Vec::new(), "memory");
    let summary = scraper.run(&repos, &mut writer).unwrap();
    let bytes = writer.into_inner().unwrap();
    let samples = String::from_utf8(bytes)
        .unwrap()
        .lines()
        .map(|line| serde_json::from_str(line).unwrap())
        .collect();
    (summary, samples)
}

#[test]
fn test_single_repo_go_only() {
    let repo = fixture(&[
        ("a.go", "package a"),
        ("b_test.go", "package a"),
        ("c.py", "print()"),
    ]);
    let mut fetcher = FixtureFetcher::default();
    fetcher.add("repo-one", repo.path(), Some("1111"));

    let scraper = Scraper::new(fetcher, FileFilter::new(["go"], true));
    let (summary, samples) = run_in_memory(&scraper, &["repo-one"]);

    assert_eq!(summary.files_written, 1);
    assert_eq!(
        samples,
        vec![CodeSample {
            repo: "repo-one".to_string(),
            commit: "1111".to_string(),
            path: "a.go".to_string(),
            text: "package a".to_string(),
        }]
    );
}

#[test]
fn test_clone_failure_is_skipped() {
    let first = fixture(&[("one.go", "1"), ("lib/two.go", "2")]);
    let third = fixture(&[("three.go", "3")]);
    let mut fetcher = FixtureFetcher::default();
    fetcher.add("first", first.path(), Some("aaaa"));
    fetcher.add("third", third.path(), Some("cccc"));

    let scraper = Scraper::new(fetcher, FileFilter::new(["go"], true));
    let (summary, samples) = run_in_memory(&scraper, &["first", "missing", "third"]);

    assert_eq!(summary.files_written, 3);
    assert_eq!(samples.len(), 3);
    assert_eq!(summary.repos.len(), 3);
    assert_eq!(summary.repos_failed(), 1);

    let failed = &summary.repos[1];
    assert_eq!(failed.repo, "missing");
    assert_eq!(failed.files_written, 0);
    assert!(failed.error.as_deref().unwrap().contains("Git clone failed for missing"));

    assert!(samples.iter().all(|s| s.repo != "missing"));
    assert_eq!(samples.iter().filter(|s| s.repo == "first").count(), 2);
    assert_eq!(samples.iter().filter(|s| s.repo == "third").count(), 1);
}

#[test]
fn test_provenance_shared_within_repo() {
    let first = fixture(&[("a.py", "a"), ("pkg/b.py", "b"), ("pkg/c.py", "c")]);
    let second = fixture(&[("d.py", "d")]);
    let mut fetcher = FixtureFetcher::default();
    fetcher.add("first", first.path(), Some("rev-1"));
    fetcher.add("second", second.path(), Some("rev-2"));

    let scraper = Scraper::new(fetcher, FileFilter::new(["py"], true));
    let (_, samples) = run_in_memory(&scraper, &["first", "second"]);

    for sample in &samples {
        let expected = if sample.repo == "first" { "rev-1" } else { "rev-2" };
        assert_eq!(sample.commit, expected);
    }
    // Repositories are processed in argument order
    assert_eq!(samples.last().unwrap().repo, "second");
}

#[test]
fn test_revision_failure_leaves_commit_empty() {
    let repo = fixture(&[("main.js", "console.log(1)")]);
    let mut fetcher = FixtureFetcher::default();
    fetcher.add("no-rev", repo.path(), None);

    let scraper = Scraper::new(fetcher, FileFilter::new(["js"], true));
    let (summary, samples) = run_in_memory(&scraper, &["no-rev"]);

    assert_eq!(samples.len(), 1);
    assert_eq!(samples[0].commit, "");
    // Degraded, not failed
    assert!(summary.repos[0].is_success());
}

#[test]
fn test_paths_never_leak_workspace() {
    let repo = fixture(&[("src/deep/x.go", "x")]);
    let mut fetcher = FixtureFetcher::default();
    fetcher.add("r", repo.path(), Some("r1"));

    let scraper = Scraper::new(fetcher, FileFilter::new(["go"], true));
    let (_, samples) = run_in_memory(&scraper, &["r"]);

    assert_eq!(samples.len(), 1);
    assert!(!Path::new(&samples[0].path).is_absolute());
    assert!(!samples[0].path.contains(WORKSPACE_PREFIX));
    assert!(samples[0].path.ends_with("x.go"));
}

#[test]
fn test_empty_repo_list() {
    let scraper = Scraper::new(FixtureFetcher::default(), FileFilter::new(["go"], true));
    let (summary, samples) = run_in_memory(&scraper, &[]);
    assert_eq!(summary.files_written, 0);
    assert!(summary.repos.is_empty());
    assert!(samples.is_empty());
}

#[test]
fn test_run_to_path_appends() {
    let repo = fixture(&[("a.go", "package a"), ("b.go", "package b")]);
    let out_dir = TempDir::new().unwrap();
    let out = out_dir.path().join("dataset.jsonl");
    let repos = vec!["r".to_string()];

    let mut fetcher = FixtureFetcher::default();
    fetcher.add("r", repo.path(), Some("r1"));
    let scraper = Scraper::new(fetcher, FileFilter::new(["go"], true));

    let first = scraper.run_to_path(&repos, &out).unwrap();
    let second = scraper.run_to_path(&repos, &out).unwrap();
    assert_eq!(first.files_written, 2);
    assert_eq!(second.files_written, 2);

    let content = fs::read_to_string(&out).unwrap();
    let lines: Vec<&str> = content.lines().collect();
    assert_eq!(lines.len(), 4);
    assert_eq!(lines[0..2], lines[2..4]);
}

#[test]
fn test_run_to_path_unwritable_output_is_fatal() {
    let scraper = Scraper::new(FixtureFetcher::default(), FileFilter::new(["go"], true));
    let out_dir = TempDir::new().unwrap();
    let out = out_dir.path().join("no-such-dir").join("dataset.jsonl");

    let err = scraper.run_to_path(&["r".to_string()], &out).unwrap_err();
    assert!(err.is_fatal());
}

#[test]
fn test_from_config() {
    let mut config = Config::default();
    config.filter.extensions = vec!["rs".to_string()];
    config.filter.skip_tests = false;

    let scraper = Scraper::from_config(&config);
    assert!(scraper.filter().accepts("lib_test.rs"));
    assert!(!scraper.filter().accepts("main.go"));
}

#[test]
fn test_walk_error_skips_only_that_repo() {
    let first = fixture(&[("a.go", "a")]);
    let second = fixture(&[("b.go", "b")]);
    let third = fixture(&[("c.go", "c"), ("d.go", "d")]);
    let mut inner = FixtureFetcher::default();
    inner.add("first", first.path(), Some("r1"));
    inner.add("second", second.path(), Some("r2"));
    inner.add("third", third.path(), Some("r3"));

    let fetcher = TrackingFetcher::new(inner, &["first", "second"]);
    let scraper = Scraper::new(fetcher, FileFilter::new(["go"], true));
    let (summary, samples) = run_in_memory(&scraper, &["first", "second", "third"]);

    assert_eq!(summary.repos.len(), 3);
    assert_eq!(summary.repos_failed(), 2);
    for report in &summary.repos[..2] {
        assert_eq!(report.files_written, 0);
        assert!(report.error.as_deref().unwrap().contains("Workspace does not exist"));
    }
    assert!(summary.repos[2].is_success());
    assert_eq!(summary.files_written, 2);
    assert!(samples.iter().all(|s| s.repo == "third"));
}

#[test]
fn test_workspaces_removed_after_each_repo() {
    let first = fixture(&[("a.py", "a"), ("pkg/b.py", "b")]);
    let second = fixture(&[("c.py", "c")]);
    let mut inner = FixtureFetcher::default();
    inner.add("first", first.path(), Some("r1"));
    inner.add("second", second.path(), Some("r2"));

    let scraper = Scraper::new(TrackingFetcher::new(inner, &[]), FileFilter::new(["py"], true));
    let (summary, _) = run_in_memory(&scraper, &["first", "missing", "second"]);

    assert_eq!(summary.files_written, 3);
    assert_eq!(summary.repos[0].files_written, 2);
    assert_eq!(summary.repos[2].files_written, 1);

    let workspaces = scraper.fetcher.workspaces.borrow();
    assert_eq!(workspaces.len(), 3);
    // Every workspace is distinct, prefixed and gone, including the failed clone's
    let unique: HashSet<&PathBuf> = workspaces.iter().collect();
    assert_eq!(unique.len(), 3);
    for workspace in workspaces.iter() {
        let name = workspace.file_name().unwrap().to_string_lossy();
        assert!(name.starts_with(WORKSPACE_PREFIX), "unexpected name {}", name);
        assert!(!workspace.exists(), "workspace left behind: {}", workspace.display());
    }
}

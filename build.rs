use std::path::Path;
use std::process::Command;

/// Run git against the crate's own checkout, `None` outside a repository
fn git(manifest_dir: &Path, args: &[&str]) -> Option<String> {
    let output = Command::new("git")
        .arg("-C")
        .arg(manifest_dir)
        .args(args)
        .output()
        .ok()?;
    if !output.status.success() {
        return None;
    }
    String::from_utf8(output.stdout)
        .ok()
        .map(|s| s.trim().to_string())
}

fn main() {
    let manifest_dir = std::env::var("CARGO_MANIFEST_DIR").unwrap_or_else(|_| ".".to_string());
    let manifest_dir = Path::new(&manifest_dir);

    let built = chrono::Utc::now().format("%Y-%m-%d %H:%M:%S UTC");
    println!("cargo:rustc-env=REPO_SCRAPER_BUILD_TIMESTAMP={}", built);

    // `<short hash>[-dirty]`, or "unknown" for source tarballs
    let commit = match git(manifest_dir, &["rev-parse", "--short", "HEAD"]) {
        Some(hash) => {
            let dirty = git(manifest_dir, &["status", "--porcelain", "--untracked-files=no"])
                .is_some_and(|status| !status.is_empty());
            if dirty { format!("{}-dirty", hash) } else { hash }
        }
        None => "unknown".to_string(),
    };
    println!("cargo:rustc-env=REPO_SCRAPER_BUILD_COMMIT={}", commit);

    println!("cargo:rerun-if-changed=build.rs");
    println!("cargo:rerun-if-changed=.git/HEAD");
    println!("cargo:rerun-if-changed=.git/index");
}

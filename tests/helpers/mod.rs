#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;
use tempfile::TempDir;

/// Run git in `dir`, panicking with stderr if it fails
pub fn git(dir: &Path, args: &[&str]) -> String {
    let output = Command::new("git")
        .args(args)
        .current_dir(dir)
        .output()
        .expect("Failed to run git");

    assert!(
        output.status.success(),
        "git {} failed: {}",
        args.join(" "),
        String::from_utf8_lossy(&output.stderr)
    );

    String::from_utf8_lossy(&output.stdout).trim().to_string()
}

/// Helper to create a test git repository on branch `main`
pub fn create_test_repo() -> (TempDir, PathBuf) {
    let temp_dir = TempDir::new().unwrap();
    let repo_path = temp_dir.path().join("work");
    fs::create_dir(&repo_path).expect("Failed to create work dir");

    init_repo(&repo_path);

    (temp_dir, repo_path)
}

/// Initialize a repository with a local identity and `main` as HEAD
pub fn init_repo(repo_path: &Path) {
    git(repo_path, &["init", "--quiet"]);
    // Independent of init.defaultBranch
    git(repo_path, &["symbolic-ref", "HEAD", "refs/heads/main"]);
    git(repo_path, &["config", "user.name", "Test User"]);
    git(repo_path, &["config", "user.email", "test@example.com"]);
    git(repo_path, &["config", "commit.gpgsign", "false"]);
}

/// Helper to create a commit
pub fn create_commit(repo_path: &Path, file: &str, content: &str, message: &str) {
    fs::write(repo_path.join(file), content).expect("Failed to write file");
    git(repo_path, &["add", file]);
    git(repo_path, &["commit", "--quiet", "-m", message]);
}

/// A working repository pushed to a bare `origin` living next to it
pub struct RemoteSetup {
    pub temp: TempDir,
    pub work: PathBuf,
    pub origin: PathBuf,
}

/// Create `work` with one commit on `main`, tracking `origin/main`
pub fn create_repo_with_origin() -> RemoteSetup {
    let (temp, work) = create_test_repo();
    let origin = temp.path().join("origin.git");

    git(temp.path(), &["init", "--quiet", "--bare", "origin.git"]);
    git(&origin, &["symbolic-ref", "HEAD", "refs/heads/main"]);
    create_commit(&work, "README.md", "# project\n", "Initial commit");
    git(&work, &["remote", "add", "origin", origin.to_str().unwrap()]);
    git(&work, &["push", "--quiet", "-u", "origin", "main"]);

    RemoteSetup { temp, work, origin }
}

/// Clone `origin` into a sibling directory to act as a second developer
pub fn clone_peer(setup: &RemoteSetup, name: &str) -> PathBuf {
    let peer = setup.temp.path().join(name);
    git(
        setup.temp.path(),
        &["clone", "--quiet", setup.origin.to_str().unwrap(), name],
    );
    git(&peer, &["config", "user.name", "Peer User"]);
    git(&peer, &["config", "user.email", "peer@example.com"]);
    git(&peer, &["config", "commit.gpgsign", "false"]);
    peer
}

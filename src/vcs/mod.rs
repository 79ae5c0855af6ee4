use std::path::Path;
use std::process::Command;

use thiserror::Error;

/// Failures of the version-control collaborator. These are never swallowed:
/// once a branch or commit operation misbehaves, the pipeline's rollback
/// anchor can no longer be trusted and the whole run must stop.
#[derive(Debug, Error)]
pub enum VcsError {
    #[error("failed to launch git: {0}")]
    Launch(#[from] std::io::Error),

    #[error("git {args:?} failed: {stderr}")]
    Command { args: Vec<String>, stderr: String },
}

fn run_git(root: &Path, args: &[&str]) -> Result<String, VcsError> {
    let out = Command::new("git").args(args).current_dir(root).output()?;
    if !out.status.success() {
        return Err(VcsError::Command {
            args: args.iter().map(|s| s.to_string()).collect(),
            stderr: String::from_utf8_lossy(&out.stderr).trim().to_string(),
        });
    }
    Ok(String::from_utf8_lossy(&out.stdout).trim().to_string())
}

pub fn is_repo(root: &Path) -> bool {
    root.join(".git").exists()
}

pub fn branch_exists(root: &Path, name: &str) -> bool {
    run_git(
        root,
        &["rev-parse", "--verify", "--quiet", &format!("refs/heads/{}", name)],
    )
    .is_ok()
}

fn has_commits(root: &Path) -> bool {
    run_git(root, &["rev-parse", "--verify", "--quiet", "HEAD"]).is_ok()
}

/// Put the project on its pristine base branch, initializing the repository
/// and snapshotting the tree if needed. The base branch must point at a real
/// commit: it is the rollback anchor every later checkout returns to.
pub fn ensure_base(root: &Path, base: &str) -> Result<(), VcsError> {
    if !is_repo(root) {
        run_git(root, &["init"])?;
    }

    if branch_exists(root, base) {
        checkout(root, base)?;
        return Ok(());
    }

    run_git(root, &["checkout", "-b", base])?;
    if !has_commits(root) {
        run_git(root, &["add", "-A"])?;
        run_git(root, &["commit", "--allow-empty", "-m", "Initial project snapshot"])?;
    }
    Ok(())
}

/// Create a new branch forked from the current one and switch to it.
pub fn create_branch(root: &Path, name: &str) -> Result<(), VcsError> {
    run_git(root, &["checkout", "-b", name])?;
    Ok(())
}

/// Switch to an existing branch, discarding uncommitted changes in the
/// working tree. Used to roll back a failed fix attempt.
pub fn checkout(root: &Path, name: &str) -> Result<(), VcsError> {
    run_git(root, &["checkout", "--force", name])?;
    Ok(())
}

/// Stage everything and commit. A fix that changed nothing still advances
/// the branch (empty commit), so a validated descriptor always lands.
pub fn commit_all(root: &Path, message: &str) -> Result<(), VcsError> {
    run_git(root, &["add", "-A"])?;
    run_git(root, &["commit", "--allow-empty", "-m", message])?;
    Ok(())
}

pub fn delete_branch(root: &Path, name: &str) -> Result<(), VcsError> {
    run_git(root, &["branch", "-D", name])?;
    Ok(())
}

pub fn current_branch(root: &Path) -> Result<String, VcsError> {
    run_git(root, &["rev-parse", "--abbrev-ref", "HEAD"])
}

//! Version-control collaborator
//!
//! Local operations (status, staging, committing) go through `git2`; anything
//! touching a remote shells out to the `git` binary so the user's credential
//! helpers and SSH configuration apply.

use std::io;
use std::path::{Path, PathBuf};
use std::process::Command;

use git2::{Repository, Signature, Status, StatusOptions};
use thiserror::Error;

use crate::utils::HOME_MIRROR_DIR;

const FALLBACK_NAME: &str = "dotman";
const FALLBACK_EMAIL: &str = "dotman@local";

#[derive(Debug, Error)]
pub enum GitError {
    #[error("failed to open git repository at {}", path.display())]
    Open {
        path: PathBuf,
        #[source]
        source: git2::Error,
    },

    #[error(transparent)]
    Git(#[from] git2::Error),

    #[error("failed to run git {args}")]
    Spawn {
        args: String,
        #[source]
        source: io::Error,
    },

    #[error("git {args} failed ({status})\n{output}")]
    Failed {
        args: String,
        status: String,
        output: String,
    },
}

/// Operations the reconciliation driver needs from version control.
///
/// Paths are relative to the repository root, e.g. `home/.bashrc`.
pub trait VersionControl {
    /// Untracked or modified paths under the home mirror
    fn status(&self) -> Result<Vec<String>, GitError>;

    /// Stage additions, modifications and deletions of `paths`
    fn stage(&self, paths: &[String]) -> Result<(), GitError>;

    /// Commit the index. `None` when there was nothing to commit.
    fn commit(&self, message: &str) -> Result<Option<String>, GitError>;

    fn pull_rebase(&self) -> Result<String, GitError>;

    fn push(&self) -> Result<String, GitError>;
}

#[derive(Debug, Clone)]
pub struct GitService {
    root: PathBuf,
    verbose: bool,
}

impl GitService {
    pub fn new(root: impl Into<PathBuf>, verbose: bool) -> Self {
        Self {
            root: root.into(),
            verbose,
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Clone `url` into `target` with the `git` binary
    pub fn clone_repo(url: &str, target: &Path, verbose: bool) -> Result<String, GitError> {
        let target = target.to_string_lossy();
        run_git(None, &["clone", url, target.as_ref()], verbose)
    }

    fn open(&self) -> Result<Repository, GitError> {
        Repository::open(&self.root).map_err(|source| GitError::Open {
            path: self.root.clone(),
            source,
        })
    }

    fn echo(&self, args: &[&str]) {
        if self.verbose {
            echo_command(Some(&self.root), args);
        }
    }

    fn signature(repo: &Repository) -> Result<Signature<'static>, git2::Error> {
        if let Ok(sig) = repo.signature() {
            return Signature::now(
                sig.name().unwrap_or(FALLBACK_NAME),
                sig.email().unwrap_or(FALLBACK_EMAIL),
            );
        }

        Signature::now(FALLBACK_NAME, FALLBACK_EMAIL)
    }
}

impl VersionControl for GitService {
    fn status(&self) -> Result<Vec<String>, GitError> {
        let pathspec = format!("{HOME_MIRROR_DIR}/");
        self.echo(&["status", "--porcelain", pathspec.as_str()]);

        let repo = self.open()?;
        let mut opts = StatusOptions::new();
        opts.include_untracked(true)
            .recurse_untracked_dirs(true)
            .include_ignored(false)
            .pathspec(pathspec.as_str());

        let interesting =
            Status::WT_NEW | Status::WT_MODIFIED | Status::INDEX_NEW | Status::INDEX_MODIFIED;

        let statuses = repo.statuses(Some(&mut opts))?;
        let mut paths: Vec<String> = statuses
            .iter()
            .filter(|entry| entry.status().intersects(interesting))
            .filter_map(|entry| entry.path().map(str::to_string))
            .collect();
        paths.sort();
        paths.dedup();

        tracing::debug!(count = paths.len(), "git status");
        Ok(paths)
    }

    fn stage(&self, paths: &[String]) -> Result<(), GitError> {
        if paths.is_empty() {
            return Ok(());
        }
        let mut args = vec!["add", "--"];
        args.extend(paths.iter().map(String::as_str));
        self.echo(&args);

        let repo = self.open()?;
        let mut index = repo.index()?;
        for path in paths {
            let rel = Path::new(path);
            if self.root.join(rel).is_file() {
                index.add_path(rel)?;
            } else {
                index.remove_path(rel)?;
            }
        }
        index.write()?;
        Ok(())
    }

    fn commit(&self, message: &str) -> Result<Option<String>, GitError> {
        self.echo(&["commit", "-m", message]);

        let repo = self.open()?;
        let mut index = repo.index()?;
        let tree_id = index.write_tree()?;
        let tree = repo.find_tree(tree_id)?;

        let parent = repo.head().ok().and_then(|h| h.peel_to_commit().ok());
        if let Some(parent) = &parent {
            if parent.tree_id() == tree_id {
                return Ok(None);
            }
        } else if tree.is_empty() {
            return Ok(None);
        }

        let sig = Self::signature(&repo)?;
        let parents: Vec<&git2::Commit> = parent.iter().collect();
        let oid = repo.commit(Some("HEAD"), &sig, &sig, message, &tree, &parents)?;
        Ok(Some(oid.to_string()))
    }

    fn pull_rebase(&self) -> Result<String, GitError> {
        run_git(Some(&self.root), &["pull", "--rebase"], self.verbose)
    }

    fn push(&self) -> Result<String, GitError> {
        run_git(Some(&self.root), &["push"], self.verbose)
    }
}

fn echo_command(dir: Option<&Path>, args: &[&str]) {
    let dir = dir.map(|d| d.display().to_string()).unwrap_or_default();
    eprintln!("[git] ({}) git {}", dir, args.join(" "));
}

/// Run the `git` binary and return its combined output
fn run_git(dir: Option<&Path>, args: &[&str], verbose: bool) -> Result<String, GitError> {
    if verbose {
        echo_command(dir, args);
    }
    tracing::debug!(?dir, ?args, "running git");

    let mut cmd = Command::new("git");
    cmd.args(args);
    if let Some(dir) = dir {
        cmd.current_dir(dir);
    }
    let output = cmd.output().map_err(|source| GitError::Spawn {
        args: args.join(" "),
        source,
    })?;

    let mut combined = String::from_utf8_lossy(&output.stdout).into_owned();
    combined.push_str(&String::from_utf8_lossy(&output.stderr));

    if output.status.success() {
        Ok(combined)
    } else {
        Err(GitError::Failed {
            args: args.join(" "),
            status: output.status.to_string(),
            output: combined.trim_end().to_string(),
        })
    }
}

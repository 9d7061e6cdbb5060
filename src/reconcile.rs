//! Ties comparison, review and copying together for one direction

use std::fmt;

use crate::core::{Candidate, Classification, CompareError, TreeComparator};
use crate::render::FilePair;
use crate::review::ReviewItem;
use crate::services::fs::{copy_preserving_mode, CopyError};
use crate::services::git::{GitError, VersionControl};
use crate::services::Workspace;
use crate::utils::ABSENT;

pub const DEFAULT_COMMIT_MESSAGE: &str = "Update dotfiles";

/// Which side is authoritative
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    /// Repository mirror -> home directory (`apply`)
    ToHome,
    /// Home directory -> repository mirror (`submit`)
    ToRepo,
}

impl Direction {
    /// Prefix used on progress lines
    pub fn tag(&self) -> &'static str {
        match self {
            Direction::ToHome => "apply",
            Direction::ToRepo => "submit",
        }
    }
}

/// Result of copying a single file
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CopyOutcome {
    Created,
    Updated,
    Skipped(String),
    Failed(String),
}

impl CopyOutcome {
    pub fn is_copied(&self) -> bool {
        matches!(self, CopyOutcome::Created | CopyOutcome::Updated)
    }

    pub fn is_failure(&self) -> bool {
        matches!(self, CopyOutcome::Failed(_))
    }
}

impl fmt::Display for CopyOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CopyOutcome::Created => write!(f, "created"),
            CopyOutcome::Updated => write!(f, "updated"),
            CopyOutcome::Skipped(reason) => write!(f, "skipped: {reason}"),
            CopyOutcome::Failed(reason) => write!(f, "failed: {reason}"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CopyReport {
    pub rel_path: String,
    pub outcome: CopyOutcome,
}

impl fmt::Display for CopyReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.outcome {
            CopyOutcome::Created | CopyOutcome::Updated => {
                write!(f, "{} {}", self.outcome, self.rel_path)
            }
            other => write!(f, "{} ({})", self.rel_path, other),
        }
    }
}

/// Counts over a batch of copy reports
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CopySummary {
    pub created: usize,
    pub updated: usize,
    pub skipped: usize,
    pub failed: usize,
}

impl CopySummary {
    pub fn from_reports(reports: &[CopyReport]) -> Self {
        let mut summary = Self::default();
        for report in reports {
            match report.outcome {
                CopyOutcome::Created => summary.created += 1,
                CopyOutcome::Updated => summary.updated += 1,
                CopyOutcome::Skipped(_) => summary.skipped += 1,
                CopyOutcome::Failed(_) => summary.failed += 1,
            }
        }
        summary
    }
}

/// Human readable state of a candidate, e.g. `differing 1a2b3c4 -> 9f8e7d6`
pub fn candidate_summary(candidate: &Candidate) -> String {
    let entry = &candidate.entry;
    let mut summary = match entry.classification() {
        Classification::Differing => match entry.display_hashes() {
            Some(hashes) => format!("differing repo {} / home {}", hashes.repo, hashes.target),
            None => "differing".to_string(),
        },
        Classification::Missing => match (&entry.repo_digest, &entry.target_digest) {
            (Some(_), None) => "missing in home".to_string(),
            (None, Some(_)) => "missing in repo".to_string(),
            _ => format!("{ABSENT} on both sides"),
        },
        Classification::Identical => "identical".to_string(),
    };
    if candidate.flagged {
        summary.push_str(", uncommitted");
    }
    summary
}

pub struct Reconciler<'a> {
    workspace: &'a Workspace,
    direction: Direction,
}

impl<'a> Reconciler<'a> {
    pub fn new(workspace: &'a Workspace, direction: Direction) -> Self {
        Self {
            workspace,
            direction,
        }
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }

    pub fn comparator(&self) -> TreeComparator {
        TreeComparator::new(self.workspace.mirror(), self.workspace.home())
    }

    /// Candidates worth acting on in this direction.
    ///
    /// `flagged` holds paths reported dirty by version control; they only
    /// matter when submitting. Files present in the repository but absent
    /// from home have nothing to submit unless version control flags them.
    pub fn candidates(&self, flagged: &[String]) -> Result<Vec<Candidate>, CompareError> {
        let comparator = self.comparator();
        let candidates = match self.direction {
            Direction::ToHome => comparator.candidates(&[])?,
            Direction::ToRepo => comparator
                .candidates(flagged)?
                .into_iter()
                .filter(|c| c.flagged || c.entry.target_digest.is_some())
                .collect(),
        };
        tracing::debug!(
            direction = self.direction.tag(),
            count = candidates.len(),
            "collected candidates"
        );
        Ok(candidates)
    }

    /// Review items showing the repository copy on the left and home on the right
    pub fn review_items(&self, candidates: &[Candidate]) -> Vec<ReviewItem> {
        candidates
            .iter()
            .map(|c| ReviewItem {
                rel_path: c.rel_path().to_string(),
                summary: candidate_summary(c),
                pair: FilePair {
                    label: c.rel_path().to_string(),
                    left_path: self.workspace.mirror_path(c.rel_path()),
                    right_path: self.workspace.home_path(c.rel_path()),
                },
            })
            .collect()
    }

    fn endpoints(&self, rel: &str) -> (std::path::PathBuf, std::path::PathBuf) {
        let repo = self.workspace.mirror_path(rel);
        let home = self.workspace.home_path(rel);
        match self.direction {
            Direction::ToHome => (repo, home),
            Direction::ToRepo => (home, repo),
        }
    }

    fn copy_one(&self, rel: &str) -> CopyOutcome {
        let (from, to) = self.endpoints(rel);

        if !from.is_file() {
            let side = match self.direction {
                Direction::ToHome => "repository",
                Direction::ToRepo => "$HOME",
            };
            return CopyOutcome::Skipped(format!("missing in {side}"));
        }

        let existed = to.exists();
        match copy_preserving_mode(&from, &to) {
            Ok(()) if existed => CopyOutcome::Updated,
            Ok(()) => CopyOutcome::Created,
            Err(e) => {
                tracing::warn!(path = rel, error = %e, "copy failed");
                CopyOutcome::Failed(format_copy_error(&e))
            }
        }
    }

    /// Copy every selected file from the authoritative side.
    ///
    /// Failures are recorded per file and never stop the batch. `on_report`
    /// sees each result as soon as it is known.
    pub fn apply<F>(&self, selected: &[String], mut on_report: F) -> Vec<CopyReport>
    where
        F: FnMut(&CopyReport),
    {
        let mut reports = Vec::with_capacity(selected.len());
        for rel in selected {
            let report = CopyReport {
                rel_path: rel.clone(),
                outcome: self.copy_one(rel),
            };
            on_report(&report);
            reports.push(report);
        }
        reports
    }

    /// Selected paths in the version-control path convention
    pub fn stage_paths(selected: &[String]) -> Vec<String> {
        selected.iter().map(|rel| Workspace::vcs_path(rel)).collect()
    }

    /// Stage and commit the selected paths.
    ///
    /// Copies already made are left in place when this fails.
    pub fn commit(
        &self,
        vcs: &dyn VersionControl,
        selected: &[String],
        message: &str,
    ) -> Result<Option<String>, GitError> {
        let message = match message.trim() {
            "" => DEFAULT_COMMIT_MESSAGE,
            msg => msg,
        };
        vcs.stage(&Self::stage_paths(selected))?;
        vcs.commit(message)
    }
}

/// Pull with rebase (optional) then push
pub fn publish(vcs: &dyn VersionControl, pull: bool) -> Result<(), GitError> {
    if pull {
        vcs.pull_rebase()?;
    }
    vcs.push()?;
    Ok(())
}

fn format_copy_error(err: &CopyError) -> String {
    match std::error::Error::source(err) {
        Some(source) => format!("{err}: {source}"),
        None => err.to_string(),
    }
}

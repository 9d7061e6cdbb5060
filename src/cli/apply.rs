use anyhow::{Context, Result};
use clap::Args;

use super::interrupt::CopyGuard;
use super::{output, prompt, Globals};
use crate::reconcile::{CopySummary, Direction, Reconciler};
use crate::review::ReviewMode;
use crate::services::VersionControl;

const TAG: &str = "apply";

/// Apply command arguments
#[derive(Debug, Args)]
pub struct ApplyArgs {
    /// Show what would be copied without changing anything
    #[arg(short, long)]
    pub dry_run: bool,

    /// Skip pulling from the remote first
    #[arg(long)]
    pub no_pull: bool,

    /// How to review the files
    #[arg(long, value_enum, default_value_t = ReviewMode::Auto)]
    pub mode: ReviewMode,
}

/// Run the apply command
pub fn run(args: ApplyArgs, globals: Globals) -> Result<()> {
    let (_, workspace) = globals.workspace()?;
    workspace.require_mirror()?;

    if !args.no_pull {
        if args.dry_run {
            output::info(TAG, "Dry run: would pull with rebase from remote.");
        } else {
            globals
                .git(&workspace)
                .pull_rebase()
                .context("Pull failed")?;
            output::info(TAG, "Pulled latest changes from remote.");
        }
    }

    let reconciler = Reconciler::new(&workspace, Direction::ToHome);
    let candidates = reconciler
        .candidates(&[])
        .context("Error scanning files")?;

    if candidates.is_empty() {
        output::info(TAG, "No files to apply.");
        return Ok(());
    }
    output::print_listing(Direction::ToHome, &candidates);

    let items = reconciler.review_items(&candidates);
    let outcome = prompt::reviewer(args.mode).review(&items)?;
    if !outcome.proceed {
        output::info(TAG, "Aborted.");
        return Ok(());
    }
    if outcome.selected.is_empty() {
        output::info(TAG, "No files selected.");
        return Ok(());
    }

    if args.dry_run {
        output::info(TAG, "Dry run: would copy the following files:");
        output::print_paths(&outcome.selected);
        return Ok(());
    }

    let reports = {
        let _guard = CopyGuard::enter();
        reconciler.apply(&outcome.selected, |r| output::report(TAG, r))
    };

    let summary = CopySummary::from_reports(&reports);
    output::info(
        TAG,
        format!(
            "Applied {} new file(s), updated {} file(s) in home directory.",
            summary.created, summary.updated
        ),
    );
    if summary.failed > 0 {
        output::warn(TAG, format!("{} file(s) could not be copied.", summary.failed));
    }
    Ok(())
}

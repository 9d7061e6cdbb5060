use anyhow::{Context, Result};
use clap::Args;

use super::interrupt::CopyGuard;
use super::{output, prompt, publish, Globals};
use crate::reconcile::{CopySummary, Direction, Reconciler, DEFAULT_COMMIT_MESSAGE};
use crate::review::ReviewMode;
use crate::services::VersionControl;

const TAG: &str = "submit";

/// Submit command arguments
#[derive(Debug, Args)]
pub struct SubmitArgs {
    /// Preview the files without copying or committing
    #[arg(short, long)]
    pub dry_run: bool,

    /// Publish after committing
    #[arg(long)]
    pub publish: bool,

    /// Commit message (prompted for when omitted)
    #[arg(short, long)]
    pub message: Option<String>,

    /// How to review the files
    #[arg(long, value_enum, default_value_t = ReviewMode::Auto)]
    pub mode: ReviewMode,
}

/// Run the submit command
pub fn run(args: SubmitArgs, globals: Globals) -> Result<()> {
    let (_, workspace) = globals.workspace()?;
    workspace.require_mirror()?;
    let git = globals.git(&workspace);

    let reconciler = Reconciler::new(&workspace, Direction::ToRepo);
    let flagged = git.status().context("Failed to check git status")?;
    let candidates = reconciler
        .candidates(&flagged)
        .context("Error scanning files")?;

    if candidates.is_empty() {
        output::info(TAG, "No changed files to submit.");
        return Ok(());
    }
    output::print_listing(Direction::ToRepo, &candidates);

    let items = reconciler.review_items(&candidates);
    let outcome = prompt::reviewer(args.mode).review(&items)?;
    if !outcome.proceed {
        output::info(TAG, "Aborted.");
        return Ok(());
    }
    if outcome.selected.is_empty() {
        output::info(TAG, "No files selected. Aborting.");
        return Ok(());
    }

    output::info(TAG, "The following files will be submitted:");
    output::print_paths(&outcome.selected);

    if !prompt::confirm("Proceed to copy, stage, and commit these files?", false)? {
        output::info(TAG, "Aborted.");
        return Ok(());
    }

    if args.dry_run {
        output::info(TAG, "Dry run: would copy and commit the following files:");
        output::print_paths(&outcome.selected);
        return Ok(());
    }

    let reports = {
        let _guard = CopyGuard::enter();
        reconciler.apply(&outcome.selected, |r| output::report(TAG, r))
    };
    let summary = CopySummary::from_reports(&reports);
    if summary.failed > 0 {
        output::warn(TAG, format!("{} file(s) could not be copied.", summary.failed));
    }

    let message = match args.message {
        Some(message) => message,
        None => prompt::input(&format!(
            "Commit message (leave blank for \"{DEFAULT_COMMIT_MESSAGE}\")"
        ))?,
    };

    let copied = summary.created + summary.updated;
    let committed = reconciler
        .commit(&git, &outcome.selected, &message)
        .with_context(|| {
            format!("Failed to commit; {copied} copied file(s) remain in the repository uncommitted")
        })?;

    match committed {
        Some(oid) => output::info(
            TAG,
            format!(
                "Committed {} file(s) as {}.",
                outcome.selected.len(),
                &oid[..oid.len().min(7)]
            ),
        ),
        None => output::info(TAG, "Nothing to commit."),
    }

    if args.publish {
        publish::publish(&git, true, false)?;
    }
    Ok(())
}

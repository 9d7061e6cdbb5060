use anyhow::{Context, Result};
use clap::Args;

use super::{output, Globals};
use crate::reconcile;
use crate::services::VersionControl;

const TAG: &str = "publish";

/// Publish command arguments
#[derive(Debug, Args)]
pub struct PublishArgs {
    /// Skip the pull step and only push
    #[arg(long)]
    pub no_pull: bool,

    /// Preview without contacting the remote
    #[arg(short, long)]
    pub dry_run: bool,
}

/// Run the publish command
pub fn run(args: PublishArgs, globals: Globals) -> Result<()> {
    let (_, workspace) = globals.workspace()?;
    let git = globals.git(&workspace);
    publish(&git, !args.no_pull, args.dry_run)
}

/// Pull (optionally) then push, or describe doing so on a dry run
pub fn publish(vcs: &dyn VersionControl, pull: bool, dry_run: bool) -> Result<()> {
    if dry_run {
        if pull {
            output::info(TAG, "Dry run: would pull with rebase from remote.");
        }
        output::info(TAG, "Dry run: would push changes to remote.");
        return Ok(());
    }

    reconcile::publish(vcs, pull).context("Publish failed")?;
    if pull {
        output::info(TAG, "Pulled latest changes from remote.");
    }
    output::info(TAG, "Dotfiles updated on remote.");
    Ok(())
}

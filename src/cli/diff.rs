use anyhow::{Context, Result};
use clap::Args;

use super::{output, prompt, Globals};
use crate::core::normalize_rel_path;
use crate::reconcile::{Direction, Reconciler};
use crate::render::FilePair;

const TAG: &str = "diff";

/// Diff command arguments
#[derive(Debug, Args)]
pub struct DiffArgs {
    /// Files to show, relative to your home directory (default: every differing file)
    pub paths: Vec<String>,

    /// Do not highlight differing lines
    #[arg(long)]
    pub no_highlight: bool,
}

/// Run the diff command
pub fn run(args: DiffArgs, globals: Globals) -> Result<()> {
    let (_, workspace) = globals.workspace()?;
    workspace.require_mirror()?;

    let rels: Vec<String> = if args.paths.is_empty() {
        Reconciler::new(&workspace, Direction::ToHome)
            .candidates(&[])
            .context("Error scanning files")?
            .iter()
            .map(|c| c.rel_path().to_string())
            .collect()
    } else {
        args.paths.iter().map(|p| normalize_rel_path(p)).collect()
    };

    if rels.is_empty() {
        output::info(TAG, "No differences.");
        return Ok(());
    }

    let pairs: Vec<FilePair> = rels
        .iter()
        .map(|rel| FilePair {
            label: rel.clone(),
            left_path: workspace.mirror_path(rel),
            right_path: workspace.home_path(rel),
        })
        .collect();

    let renderer = prompt::renderer();
    let results = renderer.render_files(&pairs, !args.no_highlight);
    for (rel, result) in rels.iter().zip(results) {
        match result {
            Ok(block) if block.is_empty() => {}
            Ok(block) => {
                println!("{}", block);
                println!();
            }
            Err(e) => output::warn(TAG, format!("{rel}: {e}")),
        }
    }
    Ok(())
}

use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::Args;

use super::Globals;
use crate::services::fs::{copy_preserving_mode, expand_home};

/// Add command arguments
#[derive(Debug, Args)]
pub struct AddArgs {
    /// File to track, absolute or relative to your home directory
    pub file: String,
}

/// Run the add command
pub fn run(args: AddArgs, globals: Globals) -> Result<()> {
    let (_, workspace) = globals.workspace()?;

    let mut source = expand_home(&args.file);
    if source.is_relative() {
        source = workspace.home().join(source);
    }

    let meta = std::fs::metadata(&source)
        .with_context(|| format!("Source file does not exist: {}", source.display()))?;
    if meta.is_dir() {
        bail!("Directories are not supported: {}", source.display());
    }

    let Some(rel) = workspace.rel_to_home(&source) else {
        bail!("{} is not inside your home directory", source.display());
    };

    workspace.ensure_mirror()?;
    let dest: PathBuf = workspace.mirror_path(&rel);
    copy_preserving_mode(&source, &dest).context("Failed to copy file")?;

    println!("Added {} to repo as {}", source.display(), dest.display());
    Ok(())
}

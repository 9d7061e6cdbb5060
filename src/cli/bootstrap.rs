use std::path::{Path, PathBuf};
use std::process::Command;

use anyhow::{bail, Context, Result};

use super::Globals;

/// Script locations tried in order, relative to the repository root
const SCRIPT_CANDIDATES: &[&str] = &["hooks/bootstrap.sh", "bootstrap.sh"];

pub fn find_script(root: &Path) -> Option<PathBuf> {
    SCRIPT_CANDIDATES
        .iter()
        .map(|rel| root.join(rel))
        .find(|p| p.is_file())
}

/// Run the bootstrap command
pub fn run(globals: Globals) -> Result<()> {
    let (_, workspace) = globals.workspace()?;

    let Some(script) = find_script(workspace.root()) else {
        bail!(
            "No bootstrap.sh found in hooks/ or root of {}",
            workspace.root().display()
        );
    };

    println!("Running {}...", script.display());
    let status = Command::new("bash")
        .arg(&script)
        .current_dir(workspace.root())
        .status()
        .with_context(|| format!("Failed to start {}", script.display()))?;

    if !status.success() {
        bail!("Bootstrap failed: {}", status);
    }
    Ok(())
}

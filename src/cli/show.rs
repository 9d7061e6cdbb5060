use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use termtree::Tree;

use super::Globals;

/// Entries never shown as managed files
const HIDDEN: &[&str] = &[".git", ".history"];

/// Run the show command
pub fn run(globals: Globals) -> Result<()> {
    let (_, workspace) = globals.workspace()?;
    workspace.require_mirror()?;

    let label = format!(
        "home (repo: {} → extracts to {})",
        workspace.mirror().display(),
        workspace.home().display()
    );
    let tree = build_tree(workspace.mirror(), label).context("Failed to render tree")?;
    print!("{}", tree);
    Ok(())
}

/// Directory tree rooted at `root`, entries sorted by name
pub fn build_tree(root: &Path, label: String) -> std::io::Result<Tree<String>> {
    let mut tree = Tree::new(label);

    let mut entries = fs::read_dir(root)?.collect::<Result<Vec<_>, _>>()?;
    entries.sort_by_key(|e| e.file_name());

    for entry in entries {
        let name = entry.file_name().to_string_lossy().into_owned();
        if HIDDEN.contains(&name.as_str()) {
            continue;
        }
        if entry.file_type()?.is_dir() {
            tree.push(build_tree(&entry.path(), name)?);
        } else {
            tree.push(Tree::new(name));
        }
    }

    Ok(tree)
}

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use colored::Colorize;

use super::{output, Globals};
use crate::core::{Candidate, Classification, LineStats};
use crate::services::{VersionControl, Workspace};

const TAG: &str = "status";

/// Run the status command
pub fn run(globals: Globals) -> Result<()> {
    let (_, workspace) = globals.workspace()?;
    workspace.require_mirror()?;

    let flagged = match globals.git(&workspace).status() {
        Ok(paths) => paths,
        Err(e) => {
            output::warn(TAG, format!("git status unavailable: {e}"));
            Vec::new()
        }
    };

    let comparator = crate::core::TreeComparator::new(workspace.mirror(), workspace.home());
    let candidates = comparator
        .candidates(&flagged)
        .context("Error scanning files")?;

    if candidates.is_empty() {
        output::info(TAG, "Everything is up to date.");
        return Ok(());
    }

    for candidate in &candidates {
        println!("{}", status_line(&workspace, candidate));
    }
    Ok(())
}

fn read_lossy(path: &Path) -> Option<String> {
    fs::read(path)
        .ok()
        .map(|bytes| String::from_utf8_lossy(&bytes).replace("\r\n", "\n"))
}

/// Line stats for a differing pair, if both sides can be read
pub fn line_stats(workspace: &Workspace, rel: &str) -> Option<LineStats> {
    let repo = read_lossy(&workspace.mirror_path(rel))?;
    let home = read_lossy(&workspace.home_path(rel))?;
    Some(LineStats::between(&repo, &home))
}

fn status_line(workspace: &Workspace, candidate: &Candidate) -> String {
    let entry = &candidate.entry;
    let class = candidate.classification();
    let (repo, user) = output::hash_lines(entry);

    let mut line = format!(
        "{:<10} {}\n    {}\n    {}",
        output::classification_label(class),
        entry.rel_path.bold(),
        repo,
        user
    );
    if class == Classification::Differing {
        if let Some(stats) = line_stats(workspace, &entry.rel_path) {
            line.push_str(&format!("\n    {}", output::format_stats(&stats)));
        }
    }
    if candidate.flagged {
        line.push_str(&format!("\n    {}", "uncommitted in repository".dimmed()));
    }
    line
}

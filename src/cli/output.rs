use colored::Colorize;

use crate::core::{Candidate, Classification, FileEntry, LineStats};
use crate::reconcile::{CopyOutcome, CopyReport, Direction};
use crate::utils::ABSENT;

/// Print an informational progress line
pub fn info(tag: &str, msg: impl AsRef<str>) {
    println!("[{}] {}", tag, msg.as_ref());
}

/// Print a per-file or fatal diagnostic to stderr
pub fn warn(tag: &str, msg: impl AsRef<str>) {
    eprintln!("[{}] {}", tag, msg.as_ref().yellow());
}

/// Echo one copy result as soon as it happens
pub fn report(tag: &str, report: &CopyReport) {
    match &report.outcome {
        CopyOutcome::Created => println!("[{}] {} {}", tag, "created".green(), report.rel_path),
        CopyOutcome::Updated => println!("[{}] {} {}", tag, "updated".cyan(), report.rel_path),
        CopyOutcome::Skipped(reason) => {
            eprintln!("[{}] Skipping {} ({})", tag, report.rel_path, reason.yellow())
        }
        CopyOutcome::Failed(reason) => {
            eprintln!("[{}] Failed {}: {}", tag, report.rel_path, reason.red())
        }
    }
}

/// Bulleted list of paths
pub fn print_paths(paths: &[String]) {
    for path in paths {
        println!("  - {}", path);
    }
}

/// The two digest/mtime lines shown under a differing file
pub fn hash_lines(entry: &FileEntry) -> (String, String) {
    let (repo, user) = match entry.display_hashes() {
        Some(pair) => (pair.repo, pair.target),
        None => (
            short_or_absent(entry.repo_digest.as_ref().map(|d| d.as_str())),
            short_or_absent(entry.target_digest.as_ref().map(|d| d.as_str())),
        ),
    };
    (
        format!("repo: {} ({})", repo.yellow(), entry.repo_mod_time_label().dimmed()),
        format!("user: {} ({})", user.yellow(), entry.target_mod_time_label().dimmed()),
    )
}

fn short_or_absent(digest: Option<&str>) -> String {
    match digest {
        Some(d) => d.chars().take(crate::utils::MIN_PREFIX_LEN).collect(),
        None => ABSENT.to_string(),
    }
}

/// Pre-review listing grouped by classification
pub fn print_listing(direction: Direction, candidates: &[Candidate]) {
    let tag = direction.tag();
    let (missing, differing): (Vec<&Candidate>, Vec<&Candidate>) = candidates
        .iter()
        .partition(|c| c.classification() == Classification::Missing);

    if !missing.is_empty() {
        let heading = match direction {
            Direction::ToHome => "The following files are missing and will be created:",
            Direction::ToRepo => "The following files are new or uncommitted:",
        };
        info(tag, heading);
        for c in &missing {
            println!("  - {}", c.rel_path());
        }
    }

    if !differing.is_empty() {
        info(tag, "The following files are different and can be updated:");
        for c in &differing {
            let (repo, user) = hash_lines(&c.entry);
            println!("  - {}", c.rel_path());
            println!("    {}", repo);
            println!("    {}", user);
        }
    }
}

pub fn classification_label(class: Classification) -> String {
    match class {
        Classification::Identical => class.as_str().dimmed().to_string(),
        Classification::Missing => class.as_str().yellow().to_string(),
        Classification::Differing => class.as_str().red().to_string(),
    }
}

pub fn format_stats(stats: &LineStats) -> String {
    format!(
        "{} {}",
        format!("+{}", stats.added).green(),
        format!("-{}", stats.removed).red()
    )
}

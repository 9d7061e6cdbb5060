//! Content-hash comparison between the repository mirror and the target tree

use std::collections::BTreeMap;
use std::fs;
use std::path::{Component, Path, PathBuf};

use chrono::{DateTime, Local};
use thiserror::Error;
use walkdir::WalkDir;

use super::hasher::{try_hash_file, Digest};
use super::prefix::shortest_unique_prefixes;
use crate::utils::{ABSENT, HOME_MIRROR_DIR, MOD_TIME_FORMAT};

#[derive(Debug, Error)]
pub enum CompareError {
    #[error("error scanning {root}: {source}")]
    Traversal {
        root: PathBuf,
        #[source]
        source: walkdir::Error,
    },
}

/// How the two copies of a file relate
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Classification {
    /// Both digests present and equal
    Identical,
    /// At least one side has no digest
    Missing,
    /// Both digests present and different
    Differing,
}

impl Classification {
    pub fn as_str(&self) -> &'static str {
        match self {
            Classification::Identical => "identical",
            Classification::Missing => "missing",
            Classification::Differing => "differing",
        }
    }
}

/// One file under comparison, keyed by its path relative to both roots
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileEntry {
    pub rel_path: String,
    pub repo_digest: Option<Digest>,
    pub target_digest: Option<Digest>,
    pub repo_mod_time: Option<DateTime<Local>>,
    pub target_mod_time: Option<DateTime<Local>>,
}

/// Shortened digests for human display; never equal to each other
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DisplayHashPair {
    pub repo: String,
    pub target: String,
}

impl FileEntry {
    pub fn classification(&self) -> Classification {
        match (&self.repo_digest, &self.target_digest) {
            (Some(a), Some(b)) if a == b => Classification::Identical,
            (Some(_), Some(_)) => Classification::Differing,
            _ => Classification::Missing,
        }
    }

    pub fn is_candidate(&self) -> bool {
        self.classification() != Classification::Identical
    }

    /// Short unique prefixes, only when both digests exist and differ
    pub fn display_hashes(&self) -> Option<DisplayHashPair> {
        match (&self.repo_digest, &self.target_digest) {
            (Some(a), Some(b)) if a != b => {
                let (repo, target) = shortest_unique_prefixes(a.as_str(), b.as_str());
                Some(DisplayHashPair { repo, target })
            }
            _ => None,
        }
    }

    pub fn repo_mod_time_label(&self) -> String {
        format_mod_time(self.repo_mod_time.as_ref())
    }

    pub fn target_mod_time_label(&self) -> String {
        format_mod_time(self.target_mod_time.as_ref())
    }
}

fn format_mod_time(time: Option<&DateTime<Local>>) -> String {
    time.map(|t| t.format(MOD_TIME_FORMAT).to_string())
        .unwrap_or_else(|| ABSENT.to_string())
}

/// A file surfaced for review
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Candidate {
    pub entry: FileEntry,
    /// Reported dirty by version control
    pub flagged: bool,
}

impl Candidate {
    pub fn rel_path(&self) -> &str {
        &self.entry.rel_path
    }

    pub fn classification(&self) -> Classification {
        self.entry.classification()
    }
}

/// Normalize a path reported relative to the repository root so it is keyed
/// the same way as paths walked inside the home mirror.
///
/// Strips any leading `./` and a leading `home/` segment.
pub fn normalize_rel_path(rel: &str) -> String {
    let mut rel = rel.trim_end_matches(['\n', '\r']).replace('\\', "/");
    while let Some(rest) = rel.strip_prefix("./") {
        rel = rest.to_string();
    }
    let mirror_prefix = format!("{HOME_MIRROR_DIR}/");
    if let Some(rest) = rel.strip_prefix(&mirror_prefix) {
        rel = rest.to_string();
    }
    rel
}

/// Path of `path` under `root`, always `/`-separated. `None` when a
/// component is not valid UTF-8.
fn relative_key(root: &Path, path: &Path) -> Option<String> {
    let rel = path.strip_prefix(root).ok()?;
    let mut parts = Vec::new();
    for component in rel.components() {
        if let Component::Normal(part) = component {
            parts.push(part.to_str()?);
        }
    }
    (!parts.is_empty()).then(|| parts.join("/"))
}

fn mod_time(path: &Path) -> Option<DateTime<Local>> {
    fs::metadata(path)
        .and_then(|m| m.modified())
        .ok()
        .map(DateTime::<Local>::from)
}

/// Walks the repository mirror and pairs each file with the target tree
#[derive(Debug, Clone)]
pub struct TreeComparator {
    repo_tree: PathBuf,
    target_tree: PathBuf,
}

impl TreeComparator {
    pub fn new(repo_tree: impl Into<PathBuf>, target_tree: impl Into<PathBuf>) -> Self {
        Self {
            repo_tree: repo_tree.into(),
            target_tree: target_tree.into(),
        }
    }

    pub fn repo_tree(&self) -> &Path {
        &self.repo_tree
    }

    pub fn target_tree(&self) -> &Path {
        &self.target_tree
    }

    /// Hash and stat both sides of a single relative path
    pub fn entry_for(&self, rel_path: &str) -> FileEntry {
        let repo_path = self.repo_tree.join(rel_path);
        let target_path = self.target_tree.join(rel_path);

        let repo_digest = repo_path.is_file().then(|| try_hash_file(&repo_path)).flatten();
        let target_digest = target_path
            .is_file()
            .then(|| try_hash_file(&target_path))
            .flatten();

        tracing::debug!(
            path = rel_path,
            repo = repo_digest.as_ref().map(Digest::as_str).unwrap_or(ABSENT),
            target = target_digest.as_ref().map(Digest::as_str).unwrap_or(ABSENT),
            "hashed"
        );

        FileEntry {
            rel_path: rel_path.to_string(),
            repo_digest,
            target_digest,
            repo_mod_time: mod_time(&repo_path),
            target_mod_time: mod_time(&target_path),
        }
    }

    /// Every plain file under the repository mirror, identical ones included,
    /// in lexicographic path order.
    ///
    /// A traversal failure aborts the whole comparison.
    pub fn compare_all(&self) -> Result<Vec<FileEntry>, CompareError> {
        let mut entries = Vec::new();

        for item in WalkDir::new(&self.repo_tree).sort_by_file_name() {
            let item = item.map_err(|source| CompareError::Traversal {
                root: self.repo_tree.clone(),
                source,
            })?;
            if !item.file_type().is_file() {
                continue;
            }
            let Some(rel) = relative_key(&self.repo_tree, item.path()) else {
                if item.path().to_str().is_none() {
                    tracing::warn!(
                        path = %item.path().display(),
                        "skipping file whose name is not valid UTF-8"
                    );
                }
                continue;
            };
            entries.push(self.entry_for(&rel));
        }

        entries.sort_by(|a, b| a.rel_path.cmp(&b.rel_path));
        Ok(entries)
    }

    /// Files that are missing on one side or differ in content
    pub fn compare(&self) -> Result<Vec<FileEntry>, CompareError> {
        Ok(self
            .compare_all()?
            .into_iter()
            .filter(FileEntry::is_candidate)
            .collect())
    }

    /// Union of content changes with paths flagged by version control,
    /// deduplicated and ordered by path.
    pub fn candidates(&self, flagged_paths: &[String]) -> Result<Vec<Candidate>, CompareError> {
        let mut merged: BTreeMap<String, Candidate> = BTreeMap::new();

        for entry in self.compare()? {
            merged.insert(
                entry.rel_path.clone(),
                Candidate {
                    entry,
                    flagged: false,
                },
            );
        }

        for raw in flagged_paths {
            let rel = normalize_rel_path(raw);
            if rel.is_empty() {
                continue;
            }
            match merged.get_mut(&rel) {
                Some(candidate) => candidate.flagged = true,
                None => {
                    let entry = self.entry_for(&rel);
                    merged.insert(
                        rel,
                        Candidate {
                            entry,
                            flagged: true,
                        },
                    );
                }
            }
        }

        Ok(merged.into_values().collect())
    }
}

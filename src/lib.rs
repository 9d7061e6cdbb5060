pub mod cli;
pub mod core;
pub mod reconcile;
pub mod render;
pub mod review;
pub mod services;
pub mod utils;

pub use core::{
    hash_file, shortest_unique_prefixes, Candidate, Classification, Digest, FileEntry,
    TreeComparator,
};
pub use reconcile::{CopyOutcome, CopyReport, Direction, Reconciler};
pub use render::{DiffRenderer, FilePair, RenderError, Theme};
pub use review::{ReviewItem, ReviewMode, ReviewOutcome, Reviewer, SelectionState};
pub use services::{ConfigStore, GitService, VersionControl, Workspace};

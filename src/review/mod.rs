//! Interactive selection of which candidates to reconcile
//!
//! A reviewer never touches the filesystem; it only turns a list of
//! [`ReviewItem`]s into a [`ReviewOutcome`].

pub mod picker;
pub mod sequential;

use std::collections::BTreeMap;
use std::io;
use std::str::FromStr;

use thiserror::Error;

use crate::render::FilePair;

pub use picker::{Checklist, DialoguerChecklist, PickerReviewer};
pub use sequential::{PromptState, SequentialReviewer};

#[derive(Debug, Error)]
pub enum ReviewError {
    #[error("failed to interact with the terminal")]
    Io(#[from] io::Error),

    #[error("interactive prompt error: {0}")]
    Prompt(#[from] dialoguer::Error),
}

impl ReviewError {
    /// Ctrl-C while a raw-mode prompt owns the terminal surfaces as an
    /// `Interrupted` read rather than a signal
    pub fn is_interrupt(&self) -> bool {
        let err = match self {
            ReviewError::Io(e) => e,
            ReviewError::Prompt(dialoguer::Error::IO(e)) => e,
        };
        err.kind() == io::ErrorKind::Interrupted
    }
}

/// One candidate as presented to the user
#[derive(Debug, Clone)]
pub struct ReviewItem {
    pub rel_path: String,
    /// Short summary shown next to the path (classification, hashes)
    pub summary: String,
    /// Source side on the left, destination on the right
    pub pair: FilePair,
}

/// Result of a review pass.
///
/// `proceed` is false only when the user cancelled; confirming with nothing
/// selected is a valid, empty outcome.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReviewOutcome {
    pub selected: Vec<String>,
    pub proceed: bool,
}

impl ReviewOutcome {
    pub fn cancelled() -> Self {
        Self {
            selected: Vec::new(),
            proceed: false,
        }
    }

    /// Confirmed but nothing to act on
    pub fn is_empty(&self) -> bool {
        self.proceed && self.selected.is_empty()
    }
}

/// Include flags for every candidate, all included to start with
#[derive(Debug, Clone)]
pub struct SelectionState {
    order: Vec<String>,
    included: BTreeMap<String, bool>,
}

impl SelectionState {
    pub fn new<I, S>(paths: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut order = Vec::new();
        let mut included = BTreeMap::new();
        for path in paths {
            let path = path.into();
            if included.insert(path.clone(), true).is_none() {
                order.push(path);
            }
        }
        Self { order, included }
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    pub fn paths(&self) -> &[String] {
        &self.order
    }

    pub fn is_included(&self, path: &str) -> bool {
        self.included.get(path).copied().unwrap_or(false)
    }

    /// Set one flag; unknown paths are ignored
    pub fn set(&mut self, path: &str, include: bool) {
        if let Some(flag) = self.included.get_mut(path) {
            *flag = include;
        }
    }

    pub fn toggle(&mut self, path: &str) {
        if let Some(flag) = self.included.get_mut(path) {
            *flag = !*flag;
        }
    }

    /// Check everything unless everything is already checked
    pub fn toggle_all(&mut self) {
        let all = self.included.values().all(|&v| v);
        for flag in self.included.values_mut() {
            *flag = !all;
        }
    }

    /// Included paths in presentation order
    pub fn selected(&self) -> Vec<String> {
        self.order
            .iter()
            .filter(|p| self.is_included(p))
            .cloned()
            .collect()
    }

    pub fn confirm(self) -> ReviewOutcome {
        ReviewOutcome {
            selected: self.selected(),
            proceed: true,
        }
    }

    /// Discard every decision made so far
    pub fn cancel(self) -> ReviewOutcome {
        ReviewOutcome::cancelled()
    }
}

pub trait Reviewer {
    fn review(&mut self, items: &[ReviewItem]) -> Result<ReviewOutcome, ReviewError>;
}

/// How candidates are reviewed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum ReviewMode {
    /// Picker on a terminal, sequential prompts otherwise
    #[default]
    Auto,
    /// One include/exclude prompt per file
    Sequential,
    /// A single checklist of every file
    Picker,
}

impl ReviewMode {
    /// Collapse `Auto` given whether stdin and stderr are terminals
    pub fn resolve(self, interactive: bool) -> ReviewMode {
        match self {
            ReviewMode::Auto if interactive => ReviewMode::Picker,
            ReviewMode::Auto => ReviewMode::Sequential,
            other => other,
        }
    }

    pub fn resolve_for_terminal(self) -> ReviewMode {
        self.resolve(is_interactive())
    }
}

impl FromStr for ReviewMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "auto" => Ok(ReviewMode::Auto),
            "sequential" => Ok(ReviewMode::Sequential),
            "picker" => Ok(ReviewMode::Picker),
            other => Err(format!("unknown review mode: {other}")),
        }
    }
}

/// Whether prompts can use a full terminal UI
pub fn is_interactive() -> bool {
    atty::is(atty::Stream::Stdin) && atty::is(atty::Stream::Stderr)
}

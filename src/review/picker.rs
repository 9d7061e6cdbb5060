use std::io::{self, Write};

use dialoguer::console::Term;
use dialoguer::MultiSelect;

use super::{ReviewError, ReviewItem, ReviewOutcome, Reviewer, SelectionState};
use crate::render::DiffRenderer;

/// A checklist prompt. Returns the checked indices, or `None` if cancelled.
pub trait Checklist {
    fn pick(
        &mut self,
        prompt: &str,
        labels: &[String],
        defaults: &[bool],
    ) -> Result<Option<Vec<usize>>, ReviewError>;
}

/// Terminal checklist: space toggles, `a` toggles all, enter confirms,
/// escape or `q` cancels.
#[derive(Debug, Default)]
pub struct DialoguerChecklist;

impl Checklist for DialoguerChecklist {
    fn pick(
        &mut self,
        prompt: &str,
        labels: &[String],
        defaults: &[bool],
    ) -> Result<Option<Vec<usize>>, ReviewError> {
        let picked = MultiSelect::new()
            .with_prompt(prompt)
            .items(labels)
            .defaults(defaults)
            .interact_opt()
            .map_err(ReviewError::from);
        match picked {
            Err(e) if e.is_interrupt() => {
                let _ = Term::stderr().show_cursor();
                Ok(None)
            }
            other => other,
        }
    }
}

/// Presents every candidate at once as a pre-checked list
pub struct PickerReviewer<C> {
    checklist: C,
    preview: Option<(DiffRenderer, bool)>,
}

impl PickerReviewer<DialoguerChecklist> {
    pub fn terminal() -> Self {
        Self::new(DialoguerChecklist)
    }
}

impl<C: Checklist> PickerReviewer<C> {
    pub fn new(checklist: C) -> Self {
        Self {
            checklist,
            preview: None,
        }
    }

    /// Print every rendered diff to stderr before showing the list
    pub fn with_preview(mut self, renderer: DiffRenderer, highlight: bool) -> Self {
        self.preview = Some((renderer, highlight));
        self
    }

    fn print_previews(&self, items: &[ReviewItem]) -> io::Result<()> {
        let Some((renderer, highlight)) = &self.preview else {
            return Ok(());
        };
        let mut err = io::stderr().lock();
        let total = items.len();
        for (i, item) in items.iter().enumerate() {
            match renderer.render(&item.pair, *highlight, i + 1, total) {
                Ok(block) if block.is_empty() => {}
                Ok(block) => writeln!(err, "{block}")?,
                Err(e) => writeln!(err, "[diff] {}: {}", item.rel_path, e)?,
            }
        }
        Ok(())
    }
}

impl<C: Checklist> Reviewer for PickerReviewer<C> {
    fn review(&mut self, items: &[ReviewItem]) -> Result<ReviewOutcome, ReviewError> {
        let mut state = SelectionState::new(items.iter().map(|i| i.rel_path.clone()));
        if items.is_empty() {
            return Ok(state.confirm());
        }

        self.print_previews(items)?;

        let labels: Vec<String> = items
            .iter()
            .map(|i| format!("{} ({})", i.rel_path, i.summary))
            .collect();
        let defaults = vec![true; items.len()];

        let picked = match self.checklist.pick(
            "Select files (space to toggle, a for all, enter to confirm)",
            &labels,
            &defaults,
        ) {
            Err(e) if e.is_interrupt() => None,
            other => other?,
        };
        let Some(checked) = picked else {
            return Ok(state.cancel());
        };

        for item in items {
            state.set(&item.rel_path, false);
        }
        for idx in checked {
            if let Some(item) = items.get(idx) {
                state.set(&item.rel_path, true);
            }
        }
        Ok(state.confirm())
    }
}

use std::io::{self, BufRead, Write};

use super::{ReviewError, ReviewItem, ReviewOutcome, Reviewer, SelectionState};
use crate::render::DiffRenderer;

/// States of the per-file include prompt
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PromptState {
    Prompting,
    Confirmed,
    Declined,
    ShowingDiff,
}

/// What a line of input asks for, if anything
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Answer {
    Include,
    Exclude,
    Diff,
    Quit,
    Invalid,
}

fn parse_answer(input: &str) -> Answer {
    match input.trim().to_ascii_lowercase().as_str() {
        "" | "y" | "yes" => Answer::Include,
        "n" | "no" => Answer::Exclude,
        "d" | "diff" => Answer::Diff,
        "q" | "quit" => Answer::Quit,
        _ => Answer::Invalid,
    }
}

impl PromptState {
    /// Next state after reading `input` while prompting.
    ///
    /// Returns `None` when the user asks to quit.
    fn on_input(input: &str) -> Option<PromptState> {
        match parse_answer(input) {
            Answer::Include => Some(PromptState::Confirmed),
            Answer::Exclude => Some(PromptState::Declined),
            Answer::Diff => Some(PromptState::ShowingDiff),
            Answer::Invalid => Some(PromptState::Prompting),
            Answer::Quit => None,
        }
    }

    pub fn is_terminal(self) -> bool {
        matches!(self, PromptState::Confirmed | PromptState::Declined)
    }
}

/// Shows each diff in turn and asks whether to include the file
pub struct SequentialReviewer<R, W> {
    input: R,
    output: W,
    renderer: DiffRenderer,
    highlight: bool,
}

impl SequentialReviewer<io::StdinLock<'static>, io::Stderr> {
    /// Prompts on stderr and reads answers from stdin
    pub fn stdio(renderer: DiffRenderer) -> Self {
        Self::new(io::stdin().lock(), io::stderr(), renderer)
    }
}

impl<R: BufRead, W: Write> SequentialReviewer<R, W> {
    pub fn new(input: R, output: W, renderer: DiffRenderer) -> Self {
        Self {
            input,
            output,
            renderer,
            highlight: true,
        }
    }

    pub fn with_highlight(mut self, highlight: bool) -> Self {
        self.highlight = highlight;
        self
    }

    pub fn into_output(self) -> W {
        self.output
    }

    fn show_diff(&mut self, item: &ReviewItem, index: usize, total: usize) -> io::Result<()> {
        match self.renderer.render(&item.pair, self.highlight, index, total) {
            Ok(block) if block.is_empty() => {}
            Ok(block) => writeln!(self.output, "{block}")?,
            Err(e) => writeln!(self.output, "[diff] {}: {}", item.rel_path, e)?,
        }
        Ok(())
    }

    /// Read one answer line; `None` on end of input or interrupt
    fn read_answer(&mut self) -> io::Result<Option<String>> {
        let mut line = String::new();
        match self.input.read_line(&mut line) {
            Ok(0) => Ok(None),
            Ok(_) => Ok(Some(line)),
            Err(e) if e.kind() == io::ErrorKind::Interrupted => Ok(None),
            Err(e) => Err(e),
        }
    }

    /// Run the prompt loop for one file; `None` means cancelled
    fn decide(&mut self, item: &ReviewItem, index: usize, total: usize) -> io::Result<Option<bool>> {
        writeln!(
            self.output,
            "[{index}/{total}] {} ({})",
            item.rel_path, item.summary
        )?;
        self.show_diff(item, index, total)?;

        let mut state = PromptState::Prompting;
        while !state.is_terminal() {
            if state == PromptState::ShowingDiff {
                self.show_diff(item, index, total)?;
            }
            write!(self.output, "Include {}? [Y/n/d/q]: ", item.rel_path)?;
            self.output.flush()?;

            let Some(line) = self.read_answer()? else {
                writeln!(self.output)?;
                return Ok(None);
            };
            let Some(next) = PromptState::on_input(&line) else {
                return Ok(None);
            };
            if next == PromptState::Prompting {
                writeln!(self.output, "Please enter 'y', 'n', 'd' or 'q'.")?;
            }
            state = next;
        }

        Ok(Some(state == PromptState::Confirmed))
    }
}

impl<R: BufRead, W: Write> Reviewer for SequentialReviewer<R, W> {
    fn review(&mut self, items: &[ReviewItem]) -> Result<ReviewOutcome, ReviewError> {
        let mut state = SelectionState::new(items.iter().map(|i| i.rel_path.clone()));
        let total = items.len();

        for (i, item) in items.iter().enumerate() {
            match self.decide(item, i + 1, total)? {
                Some(include) => state.set(&item.rel_path, include),
                None => return Ok(state.cancel()),
            }
        }

        Ok(state.confirm())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::{FilePair, Theme};
    use std::io::Cursor;
    use tempfile::TempDir;

    fn items(dir: &TempDir, names: &[&str]) -> Vec<ReviewItem> {
        names
            .iter()
            .map(|name| {
                let left = dir.path().join(format!("{name}.repo"));
                let right = dir.path().join(format!("{name}.home"));
                std::fs::write(&left, format!("{name} repo\n")).unwrap();
                std::fs::write(&right, format!("{name} home\n")).unwrap();
                ReviewItem {
                    rel_path: name.to_string(),
                    summary: "differing".to_string(),
                    pair: FilePair {
                        label: name.to_string(),
                        left_path: left,
                        right_path: right,
                    },
                }
            })
            .collect()
    }

    fn run(script: &str, names: &[&str]) -> (ReviewOutcome, String) {
        let dir = TempDir::new().unwrap();
        let items = items(&dir, names);
        let renderer = DiffRenderer::with_theme(Theme::plain());
        let mut reviewer = SequentialReviewer::new(Cursor::new(script.to_string()), Vec::new(), renderer);
        let outcome = reviewer.review(&items).unwrap();
        let output = String::from_utf8(reviewer.into_output()).unwrap();
        (outcome, output)
    }

    #[test]
    fn test_empty_answer_includes() {
        let (outcome, _) = run("\n\n", &["a", "b"]);
        assert!(outcome.proceed);
        assert_eq!(outcome.selected, vec!["a", "b"]);
    }

    #[test]
    fn test_decline_excludes() {
        let (outcome, _) = run("n\ny\n", &["a", "b"]);
        assert_eq!(outcome.selected, vec!["b"]);
    }

    #[test]
    fn test_decline_everything_still_proceeds() {
        let (outcome, _) = run("n\nno\n", &["a", "b"]);
        assert!(outcome.proceed);
        assert!(outcome.selected.is_empty());
    }

    #[test]
    fn test_invalid_input_reprompts() {
        let (outcome, output) = run("maybe\ny\n", &["a"]);
        assert_eq!(outcome.selected, vec!["a"]);
        assert!(output.contains("Please enter"));
        assert_eq!(output.matches("Include a?").count(), 2);
    }

    #[test]
    fn test_diff_answer_rerenders() {
        let (outcome, output) = run("d\nn\n", &["a"]);
        assert!(outcome.selected.is_empty());
        assert_eq!(output.matches(" repo | a (1/1) ").count(), 2);
    }

    #[test]
    fn test_quit_cancels_after_toggles() {
        let (outcome, _) = run("n\nq\n", &["a", "b", "c"]);
        assert!(!outcome.proceed);
        assert!(outcome.selected.is_empty());
    }

    #[test]
    fn test_end_of_input_cancels() {
        let (outcome, _) = run("y\n", &["a", "b"]);
        assert_eq!(outcome, ReviewOutcome::cancelled());
    }

    #[test]
    fn test_state_transitions() {
        assert_eq!(PromptState::on_input(""), Some(PromptState::Confirmed));
        assert_eq!(PromptState::on_input("N"), Some(PromptState::Declined));
        assert_eq!(PromptState::on_input("diff"), Some(PromptState::ShowingDiff));
        assert_eq!(PromptState::on_input("x"), Some(PromptState::Prompting));
        assert_eq!(PromptState::on_input("q"), None);
    }
}

//! Terminal prompts that degrade to plain line reads when not on a tty

use std::io::{self, BufRead, Write};

use anyhow::Result;
use dialoguer::console::Term;
use dialoguer::{Confirm, Input};

use crate::render::{DiffRenderer, Theme};
use crate::review::{
    is_interactive, PickerReviewer, ReviewError, ReviewMode, Reviewer, SequentialReviewer,
};

/// Ask a yes/no question. End of input counts as "no".
pub fn confirm(prompt: &str, default: bool) -> Result<bool> {
    if is_interactive() {
        let answer = Confirm::new()
            .with_prompt(prompt)
            .default(default)
            .interact_opt();
        return Ok(or_on_interrupt(answer, None)?.unwrap_or(false));
    }

    let hint = if default { "[Y/n]" } else { "[y/N]" };
    let Some(line) = read_line(&format!("{prompt} {hint}: "))? else {
        return Ok(false);
    };
    Ok(match line.trim().to_ascii_lowercase().as_str() {
        "" => default,
        "y" | "yes" => true,
        _ => false,
    })
}

/// Ask for free text; blank or end of input yields an empty string
pub fn input(prompt: &str) -> Result<String> {
    if is_interactive() {
        let value = Input::<String>::new()
            .with_prompt(prompt)
            .allow_empty(true)
            .interact_text();
        return Ok(or_on_interrupt(value, String::new())?.trim().to_string());
    }
    Ok(read_line(&format!("{prompt}: "))?
        .map(|l| l.trim().to_string())
        .unwrap_or_default())
}

/// Ctrl-C inside a dialoguer prompt reads as `Interrupted`; answer with
/// `fallback` and give the cursor back
fn or_on_interrupt<T>(result: dialoguer::Result<T>, fallback: T) -> Result<T, ReviewError> {
    match result.map_err(ReviewError::from) {
        Err(e) if e.is_interrupt() => {
            let _ = Term::stderr().show_cursor();
            Ok(fallback)
        }
        other => other,
    }
}

fn read_line(prompt: &str) -> io::Result<Option<String>> {
    let mut err = io::stderr();
    write!(err, "{prompt}")?;
    err.flush()?;

    let mut line = String::new();
    match io::stdin().lock().read_line(&mut line) {
        Ok(0) => Ok(None),
        Ok(_) => Ok(Some(line)),
        Err(e) if e.kind() == io::ErrorKind::Interrupted => Ok(None),
        Err(e) => Err(e),
    }
}

/// Renderer for the attached terminal; plain text when stdout is piped
pub fn renderer() -> DiffRenderer {
    if atty::is(atty::Stream::Stdout) && atty::is(atty::Stream::Stderr) {
        DiffRenderer::new()
    } else {
        DiffRenderer::with_theme(Theme::plain())
    }
}

/// Build the reviewer for `mode`, resolving `Auto` from the terminal
pub fn reviewer(mode: ReviewMode) -> Box<dyn Reviewer> {
    match mode.resolve_for_terminal() {
        ReviewMode::Picker => Box::new(PickerReviewer::terminal().with_preview(renderer(), true)),
        _ => Box::new(SequentialReviewer::stdio(renderer())),
    }
}

//! Side-by-side diff panels rendered through a virtual screen
//!
//! Two files are laid out as bordered, titled panels on a [`Screen`], the
//! drawn region is cropped to its bounding box, and the result is serialized
//! back into terminal text with run-length encoded SGR attributes.

pub mod screen;
pub mod theme;

use std::fs;
use std::path::{Path, PathBuf};

use thiserror::Error;

pub use screen::{Attr, Bg, Fg, Rect, RenderCell, Screen, Side};
pub use theme::{Palette, Theme};

use crate::utils::sanitize_line;

/// Prefix of the text substituted for a file that cannot be read
pub const UNREADABLE_PLACEHOLDER: &str = "<<unreadable or missing>>";

#[derive(Debug, Error)]
pub enum RenderError {
    #[error("panel of {width}x{height} cells exceeds the render limit of {limit} cells")]
    TooLarge {
        width: usize,
        height: usize,
        limit: usize,
    },
}

/// Per-line styling applied before painting
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineStyle {
    Plain,
    Neutral,
    Differing,
}

impl LineStyle {
    fn attr(self, side: Side) -> Option<Attr> {
        match self {
            LineStyle::Plain => None,
            LineStyle::Neutral => Some(Attr::new(Fg::Text, Bg::Neutral(side))),
            LineStyle::Differing => Some(Attr::new(Fg::Text, Bg::Changed(side))),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StyledLine {
    pub text: String,
    pub style: LineStyle,
}

impl StyledLine {
    fn width(&self) -> usize {
        self.text.chars().count()
    }
}

/// A left/right file pair to render
#[derive(Debug, Clone)]
pub struct FilePair {
    pub label: String,
    pub left_path: PathBuf,
    pub right_path: PathBuf,
}

/// Read a file for display, substituting a visible placeholder on failure
pub fn read_or_placeholder(path: &Path) -> String {
    match fs::read(path) {
        Ok(bytes) => String::from_utf8_lossy(&bytes).replace("\r\n", "\n"),
        Err(e) => format!("{UNREADABLE_PLACEHOLDER}\n{}: {e}", path.display()),
    }
}

/// Split content into display lines and optionally mark the differing ones.
///
/// With highlighting both sides are padded to the same length and every row
/// carries a marker; otherwise lines are left plain.
pub fn style_lines(
    left: &str,
    right: &str,
    highlight_diff_lines: bool,
) -> (Vec<StyledLine>, Vec<StyledLine>) {
    let left_lines: Vec<String> = left.split('\n').map(sanitize_line).collect();
    let right_lines: Vec<String> = right.split('\n').map(sanitize_line).collect();

    if !highlight_diff_lines {
        let plain = |lines: Vec<String>| {
            lines
                .into_iter()
                .map(|text| StyledLine {
                    text,
                    style: LineStyle::Plain,
                })
                .collect()
        };
        return (plain(left_lines), plain(right_lines));
    }

    let max_lines = left_lines.len().max(right_lines.len());
    let mut styled_left = Vec::with_capacity(max_lines);
    let mut styled_right = Vec::with_capacity(max_lines);

    for idx in 0..max_lines {
        let l = left_lines.get(idx).cloned().unwrap_or_default();
        let r = right_lines.get(idx).cloned().unwrap_or_default();
        let style = if l != r {
            LineStyle::Differing
        } else {
            LineStyle::Neutral
        };
        styled_left.push(StyledLine { text: l, style });
        styled_right.push(StyledLine { text: r, style });
    }

    (styled_left, styled_right)
}

#[derive(Debug, Clone, Default)]
pub struct DiffRenderer {
    theme: Theme,
}

impl DiffRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_theme(theme: Theme) -> Self {
        Self { theme }
    }

    pub fn theme(&self) -> &Theme {
        &self.theme
    }

    /// Render two files side by side; `index` is 1-based within `total`
    pub fn render(
        &self,
        pair: &FilePair,
        highlight_diff_lines: bool,
        index: usize,
        total: usize,
    ) -> Result<String, RenderError> {
        let left = read_or_placeholder(&pair.left_path);
        let right = read_or_placeholder(&pair.right_path);
        self.render_text(&pair.label, &left, &right, highlight_diff_lines, index, total)
    }

    /// Render every pair, numbering them within the batch. Each pair
    /// succeeds or fails on its own.
    pub fn render_files(
        &self,
        pairs: &[FilePair],
        highlight_diff_lines: bool,
    ) -> Vec<Result<String, RenderError>> {
        pairs
            .iter()
            .enumerate()
            .map(|(i, pair)| self.render(pair, highlight_diff_lines, i + 1, pairs.len()))
            .collect()
    }

    /// Render already loaded contents
    pub fn render_text(
        &self,
        label: &str,
        left: &str,
        right: &str,
        highlight_diff_lines: bool,
        index: usize,
        total: usize,
    ) -> Result<String, RenderError> {
        let (left_lines, right_lines) = style_lines(left, right, highlight_diff_lines);
        let screen = self.compose(label, &left_lines, &right_lines, index, total)?;
        Ok(screen.serialize(&self.theme))
    }

    fn title(&self, side: Side, label: &str, index: usize, total: usize) -> String {
        if !self.theme.border {
            return String::new();
        }
        format!(
            " {} | {} ({}/{}) ",
            self.theme.title_for(side),
            label,
            index,
            total
        )
    }

    /// Lay out and paint both panels onto a fresh screen
    pub fn compose(
        &self,
        label: &str,
        left: &[StyledLine],
        right: &[StyledLine],
        index: usize,
        total: usize,
    ) -> Result<Screen, RenderError> {
        let theme = &self.theme;
        let left_title = self.title(Side::Left, label, index, total);
        let right_title = self.title(Side::Right, label, index, total);

        let content_width = |title: &str, lines: &[StyledLine]| {
            lines
                .iter()
                .map(StyledLine::width)
                .chain(std::iter::once(title.chars().count()))
                .max()
                .unwrap_or(0)
        };
        let mut left_width = content_width(&left_title, left) + theme.border_padding;
        let mut right_width = content_width(&right_title, right) + theme.border_padding;

        let natural = left_width + right_width + theme.panel_gap;
        if natural < theme.min_total_width {
            let extra = theme.min_total_width - natural;
            left_width += extra / 2;
            right_width += extra - extra / 2;
        }
        let width = left_width + right_width + theme.panel_gap;

        let max_lines = left.len().max(right.len());
        let height = (max_lines + theme.border_height).max(theme.min_panel_height);

        let cells = width.saturating_mul(height);
        if cells > theme.max_cells {
            return Err(RenderError::TooLarge {
                width,
                height,
                limit: theme.max_cells,
            });
        }

        let mut screen = Screen::new(width, height);
        self.paint_panel(&mut screen, 0, left_width, height, &left_title, left, Side::Left);
        self.paint_panel(
            &mut screen,
            left_width + theme.panel_gap,
            right_width,
            height,
            &right_title,
            right,
            Side::Right,
        );
        Ok(screen)
    }

    #[allow(clippy::too_many_arguments)]
    fn paint_panel(
        &self,
        screen: &mut Screen,
        x: usize,
        width: usize,
        height: usize,
        title: &str,
        lines: &[StyledLine],
        side: Side,
    ) {
        let theme = &self.theme;
        let (inner_x, inner_y, inner_w, inner_h) = if theme.border {
            screen.draw_box(x, 0, width, height, theme.border_attr());
            let title_len = title.chars().count();
            let room = width.saturating_sub(2);
            let offset = room.saturating_sub(title_len) / 2;
            screen.put_str(x + 1 + offset, 0, title, room, theme.title_attr());
            (
                x + 1,
                1,
                width.saturating_sub(2),
                height.saturating_sub(2),
            )
        } else {
            (x, 0, width, height)
        };

        for (row, line) in lines.iter().take(inner_h).enumerate() {
            let y = inner_y + row;
            let attr = match line.style.attr(side) {
                Some(attr) => {
                    screen.fill_row(inner_x, y, inner_w, attr);
                    attr
                }
                None => Attr::new(Fg::Text, Bg::Default),
            };
            screen.put_str(inner_x, y, &line.text, inner_w, attr);
        }
    }
}

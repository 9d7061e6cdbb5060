use super::screen::{Attr, Bg, Fg, Side};

/// SGR parameter fragments for each attribute role
#[derive(Debug, Clone)]
pub struct Palette {
    pub fg_reset: &'static str,
    pub bg_reset: &'static str,
    pub border_fg: &'static str,
    pub title_fg: &'static str,
    pub text_fg: &'static str,
    pub neutral_left_bg: &'static str,
    pub neutral_right_bg: &'static str,
    pub changed_left_bg: &'static str,
    pub changed_right_bg: &'static str,
}

impl Default for Palette {
    fn default() -> Self {
        Self {
            fg_reset: "39",
            bg_reset: "49",
            border_fg: "38;5;252",
            title_fg: "37",
            text_fg: "38;5;255",
            neutral_left_bg: "48;5;236",
            neutral_right_bg: "48;5;238",
            changed_left_bg: "48;5;52",
            changed_right_bg: "48;5;22",
        }
    }
}

/// Visual configuration for side-by-side rendering
#[derive(Debug, Clone)]
pub struct Theme {
    pub palette: Palette,
    /// Emit SGR escape sequences at all
    pub colorize: bool,
    /// Draw a titled box around each panel
    pub border: bool,
    /// Columns the border adds to a panel (left + right)
    pub border_padding: usize,
    /// Rows the border adds to a panel (top + bottom)
    pub border_height: usize,
    /// Blank columns between the two panels
    pub panel_gap: usize,
    pub min_total_width: usize,
    pub min_panel_height: usize,
    /// Refuse to allocate grids larger than this many cells
    pub max_cells: usize,
    pub left_title: String,
    pub right_title: String,
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            palette: Palette::default(),
            colorize: true,
            border: true,
            border_padding: 2,
            border_height: 2,
            panel_gap: 1,
            min_total_width: 20,
            min_panel_height: 3,
            max_cells: 4_000_000,
            left_title: "repo".to_string(),
            right_title: "home".to_string(),
        }
    }
}

impl Theme {
    /// Same layout with escape sequences disabled
    pub fn plain() -> Self {
        Self {
            colorize: false,
            ..Self::default()
        }
    }

    pub fn with_titles(mut self, left: impl Into<String>, right: impl Into<String>) -> Self {
        self.left_title = left.into();
        self.right_title = right.into();
        self
    }

    fn fg_code(&self, fg: Fg) -> &'static str {
        match fg {
            Fg::Default => self.palette.fg_reset,
            Fg::Border => self.palette.border_fg,
            Fg::Title => self.palette.title_fg,
            Fg::Text => self.palette.text_fg,
        }
    }

    fn bg_code(&self, bg: Bg) -> &'static str {
        match bg {
            Bg::Default => self.palette.bg_reset,
            Bg::Neutral(Side::Left) => self.palette.neutral_left_bg,
            Bg::Neutral(Side::Right) => self.palette.neutral_right_bg,
            Bg::Changed(Side::Left) => self.palette.changed_left_bg,
            Bg::Changed(Side::Right) => self.palette.changed_right_bg,
        }
    }

    /// Full SGR sequence selecting `attr`
    pub fn sgr(&self, attr: Attr) -> String {
        format!("\x1b[{};{}m", self.fg_code(attr.fg), self.bg_code(attr.bg))
    }

    pub fn border_attr(&self) -> Attr {
        Attr::new(Fg::Border, Bg::Default)
    }

    pub fn title_attr(&self) -> Attr {
        Attr::new(Fg::Title, Bg::Default)
    }

    pub fn title_for(&self, side: Side) -> &str {
        match side {
            Side::Left => &self.left_title,
            Side::Right => &self.right_title,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sgr_combines_fg_and_bg() {
        let theme = Theme::default();
        assert_eq!(
            theme.sgr(Attr::new(Fg::Text, Bg::Changed(Side::Right))),
            "\x1b[38;5;255;48;5;22m"
        );
        assert_eq!(theme.sgr(Attr::default()), "\x1b[39;49m");
    }

    #[test]
    fn test_left_and_right_neutral_differ() {
        let theme = Theme::default();
        assert_ne!(
            theme.sgr(Attr::new(Fg::Text, Bg::Neutral(Side::Left))),
            theme.sgr(Attr::new(Fg::Text, Bg::Neutral(Side::Right)))
        );
    }

    #[test]
    fn test_with_titles() {
        let theme = Theme::default().with_titles("home", "repo");
        assert_eq!(theme.title_for(Side::Left), "home");
        assert_eq!(theme.title_for(Side::Right), "repo");
    }
}

//! Virtual character/attribute grid that panels are painted onto

use super::theme::Theme;

/// Which panel a styled cell belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Side {
    Left,
    Right,
}

/// Foreground role of a cell
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
pub enum Fg {
    #[default]
    Default,
    Border,
    Title,
    Text,
}

/// Background role of a cell
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
pub enum Bg {
    #[default]
    Default,
    Neutral(Side),
    Changed(Side),
}

/// Combined foreground/background attribute
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
pub struct Attr {
    pub fg: Fg,
    pub bg: Bg,
}

impl Attr {
    pub const fn new(fg: Fg, bg: Bg) -> Self {
        Self { fg, bg }
    }

    pub fn is_default(&self) -> bool {
        *self == Attr::default()
    }
}

/// One grid cell. A cell nobody painted holds `'\0'`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RenderCell {
    pub ch: char,
    pub attr: Attr,
}

impl Default for RenderCell {
    fn default() -> Self {
        Self {
            ch: '\0',
            attr: Attr::default(),
        }
    }
}

impl RenderCell {
    pub fn is_empty(&self) -> bool {
        self.ch == '\0'
    }

    /// Invisible when printed: no glyph and no background
    fn is_blank(&self) -> bool {
        (self.ch == '\0' || self.ch == ' ') && self.attr.bg == Bg::Default
    }
}

/// Inclusive rectangle of grid coordinates
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rect {
    pub min_x: usize,
    pub min_y: usize,
    pub max_x: usize,
    pub max_y: usize,
}

impl Rect {
    pub fn width(&self) -> usize {
        self.max_x - self.min_x + 1
    }

    pub fn height(&self) -> usize {
        self.max_y - self.min_y + 1
    }
}

#[derive(Debug, Clone)]
pub struct Screen {
    width: usize,
    height: usize,
    cells: Vec<RenderCell>,
}

impl Screen {
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            cells: vec![RenderCell::default(); width * height],
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn get(&self, x: usize, y: usize) -> Option<&RenderCell> {
        if x < self.width && y < self.height {
            self.cells.get(y * self.width + x)
        } else {
            None
        }
    }

    /// Paint one cell; writes outside the grid are clipped
    pub fn set(&mut self, x: usize, y: usize, ch: char, attr: Attr) {
        if x < self.width && y < self.height {
            self.cells[y * self.width + x] = RenderCell { ch, attr };
        }
    }

    /// Write `text` starting at `(x, y)`, clipped to `max_width` columns
    pub fn put_str(&mut self, x: usize, y: usize, text: &str, max_width: usize, attr: Attr) {
        for (i, ch) in text.chars().take(max_width).enumerate() {
            self.set(x + i, y, ch, attr);
        }
    }

    /// Fill `width` cells of row `y` with spaces in `attr`
    pub fn fill_row(&mut self, x: usize, y: usize, width: usize, attr: Attr) {
        for i in 0..width {
            self.set(x + i, y, ' ', attr);
        }
    }

    /// Light box outline occupying `w` x `h` cells with its corner at `(x, y)`
    pub fn draw_box(&mut self, x: usize, y: usize, w: usize, h: usize, attr: Attr) {
        if w < 2 || h < 2 {
            return;
        }
        let right = x + w - 1;
        let bottom = y + h - 1;

        for cx in x + 1..right {
            self.set(cx, y, '─', attr);
            self.set(cx, bottom, '─', attr);
        }
        for cy in y + 1..bottom {
            self.set(x, cy, '│', attr);
            self.set(right, cy, '│', attr);
        }
        self.set(x, y, '┌', attr);
        self.set(right, y, '┐', attr);
        self.set(x, bottom, '└', attr);
        self.set(right, bottom, '┘', attr);
    }

    /// Smallest rectangle holding every painted cell, `None` if nothing was drawn
    pub fn bounding_box(&self) -> Option<Rect> {
        let mut rect: Option<Rect> = None;

        for y in 0..self.height {
            for x in 0..self.width {
                if self.cells[y * self.width + x].is_empty() {
                    continue;
                }
                rect = Some(match rect {
                    None => Rect {
                        min_x: x,
                        min_y: y,
                        max_x: x,
                        max_y: y,
                    },
                    Some(r) => Rect {
                        min_x: r.min_x.min(x),
                        min_y: r.min_y.min(y),
                        max_x: r.max_x.max(x),
                        max_y: r.max_y.max(y),
                    },
                });
            }
        }

        rect
    }

    /// Serialize the drawn region into terminal text.
    ///
    /// An SGR sequence is emitted only where the attribute changes from the
    /// previous cell. Trailing blank cells are dropped per row, and a row that
    /// ends styled is closed with a reset.
    pub fn serialize(&self, theme: &Theme) -> String {
        let Some(rect) = self.bounding_box() else {
            return String::new();
        };

        let mut rows = Vec::with_capacity(rect.height());
        for y in rect.min_y..=rect.max_y {
            let row = &self.cells[y * self.width..(y + 1) * self.width];
            let end = (rect.min_x..=rect.max_x)
                .rev()
                .find(|&x| !row[x].is_blank());

            let mut line = String::new();
            if let Some(end) = end {
                let mut current = Attr::default();
                for cell in &row[rect.min_x..=end] {
                    if theme.colorize && cell.attr != current {
                        line.push_str(&theme.sgr(cell.attr));
                        current = cell.attr;
                    }
                    line.push(if cell.is_empty() { ' ' } else { cell.ch });
                }
                if !current.is_default() {
                    line.push_str(SGR_RESET);
                }
            }
            rows.push(line);
        }

        rows.join("\n")
    }
}

pub const SGR_RESET: &str = "\x1b[0m";

#[cfg(test)]
mod tests {
    use super::*;

    const RED: Attr = Attr::new(Fg::Text, Bg::Changed(Side::Left));
    const GREY: Attr = Attr::new(Fg::Text, Bg::Neutral(Side::Left));

    #[test]
    fn test_empty_screen_has_no_bounding_box() {
        let screen = Screen::new(10, 4);
        assert!(screen.bounding_box().is_none());
        assert_eq!(screen.serialize(&Theme::default()), "");
    }

    #[test]
    fn test_bounding_box_tracks_painted_cells() {
        let mut screen = Screen::new(10, 6);
        screen.set(3, 1, 'a', Attr::default());
        screen.set(6, 4, 'b', Attr::default());

        let rect = screen.bounding_box().unwrap();
        assert_eq!(
            rect,
            Rect {
                min_x: 3,
                min_y: 1,
                max_x: 6,
                max_y: 4
            }
        );
        assert_eq!(rect.width(), 4);
        assert_eq!(rect.height(), 4);
    }

    #[test]
    fn test_serialize_plain_trims_and_fills_gaps() {
        let mut screen = Screen::new(8, 2);
        screen.put_str(0, 0, "ab", 8, Attr::default());
        screen.put_str(4, 1, "z", 8, Attr::default());

        let theme = Theme::default();
        assert_eq!(screen.serialize(&theme), "ab\n    z");
    }

    #[test]
    fn test_serialize_emits_codes_only_on_change() {
        let mut screen = Screen::new(4, 1);
        screen.put_str(0, 0, "ab", 4, RED);
        screen.put_str(2, 0, "cd", 4, GREY);

        let theme = Theme::default();
        let out = screen.serialize(&theme);
        let expected = format!(
            "{}ab{}cd{}",
            theme.sgr(RED),
            theme.sgr(GREY),
            SGR_RESET
        );
        assert_eq!(out, expected);
    }

    #[test]
    fn test_attribute_on_first_and_single_cells_is_kept() {
        let mut screen = Screen::new(3, 1);
        screen.set(0, 0, 'x', RED);
        screen.set(1, 0, 'y', Attr::default());
        screen.set(2, 0, 'z', GREY);

        let theme = Theme::default();
        let out = screen.serialize(&theme);
        assert_eq!(
            out,
            format!(
                "{}x{}y{}z{}",
                theme.sgr(RED),
                theme.sgr(Attr::default()),
                theme.sgr(GREY),
                SGR_RESET
            )
        );
    }

    #[test]
    fn test_styled_trailing_spaces_are_kept() {
        let mut screen = Screen::new(5, 1);
        screen.put_str(0, 0, "a", 5, Attr::default());
        screen.fill_row(2, 0, 3, RED);

        let theme = Theme {
            colorize: false,
            ..Theme::default()
        };
        assert_eq!(screen.serialize(&theme), "a    ");
    }

    #[test]
    fn test_draw_box_corners() {
        let mut screen = Screen::new(4, 3);
        screen.draw_box(0, 0, 4, 3, Attr::default());
        let theme = Theme::default();
        assert_eq!(screen.serialize(&theme), "┌──┐\n│  │\n└──┘");
    }

    #[test]
    fn test_writes_outside_grid_are_clipped() {
        let mut screen = Screen::new(2, 1);
        screen.put_str(1, 0, "long", 10, Attr::default());
        screen.set(5, 5, 'x', Attr::default());
        assert_eq!(screen.get(1, 0).unwrap().ch, 'l');
        assert!(screen.get(2, 0).is_none());
    }
}

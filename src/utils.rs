//! Shared utility functions and constants

/// Minimum length of a displayed digest prefix
pub const MIN_PREFIX_LEN: usize = 7;

/// Directory inside the dotfile repository that mirrors `$HOME`
pub const HOME_MIRROR_DIR: &str = "home";

/// Format used when showing file modification times
pub const MOD_TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Columns a tab expands to inside a rendered panel
pub const TAB_WIDTH: usize = 4;

/// Placeholder shown wherever a digest or timestamp is absent
pub const ABSENT: &str = "missing";

/// Replace tabs and other control characters so every char occupies one cell
pub fn sanitize_line(line: &str) -> String {
    let mut out = String::with_capacity(line.len());
    for ch in line.chars() {
        match ch {
            '\t' => {
                let pad = TAB_WIDTH - (out.chars().count() % TAB_WIDTH);
                out.extend(std::iter::repeat(' ').take(pad));
            }
            c if c.is_control() => out.push('?'),
            c => out.push(c),
        }
    }
    out
}

/// Hex encoding utilities
pub mod hex {
    /// Encode bytes as hex string
    pub fn encode(bytes: &[u8]) -> String {
        bytes.iter().map(|b| format!("{:02x}", b)).collect()
    }
}

//! Line composition for the 16x2 screen.

use crate::glyph;

pub const COLUMNS: usize = 16;

/// The degree sign, written as the custom glyph in [`glyph::DEGREE_SLOT`].
pub const DEGREE: char = glyph::DEGREE_SLOT as char;

pub fn truncate(line: &str) -> String {
    line.chars().take(COLUMNS).collect()
}

/// Truncate or right-pad with spaces to exactly the display width.
pub fn pad(line: &str) -> String {
    format!("{:<width$}", truncate(line), width = COLUMNS)
}

pub fn two_lines(first: &str, second: &str) -> String {
    format!("{}\n{}", truncate(first), truncate(second))
}

/// Both lines padded, so writing from the home position overwrites
/// whatever was there before.
pub fn padded_screen(text: &str) -> String {
    let mut lines = text.split('\n');
    let first = lines.next().unwrap_or_default();
    let second = lines.next().unwrap_or_default();
    format!("{}\n{}", pad(first), pad(second))
}

/// Normalise one line of piped input: trailing whitespace dropped, HTML and
/// unicode degree signs turned into the degree glyph, fitted to the width.
pub fn reform_line(line: &str) -> String {
    let line: String = line
        .trim_end()
        .replace("&deg;", "°")
        .chars()
        .map(|c| if c == '°' { DEGREE } else { c })
        .collect();
    pad(&line)
}

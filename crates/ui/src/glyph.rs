//! Custom characters for the HD44780 CGRAM: eight rows of five pixels each.
//! Patterns from <http://www.quinapalus.com/hd44780udg.html>.

use crate::CharDisplay;

pub type Glyph = [u8; 8];

pub const DEGREE: Glyph = [14, 10, 14, 0, 0, 0, 0, 0];
pub const FILL: Glyph = [31, 31, 31, 31, 31, 31, 31, 31];

pub const DEGREE_SLOT: u8 = 1;
pub const FILL_SLOT: u8 = 2;

/// Upload the glyphs the modules rely on.
pub fn load<D: CharDisplay>(display: &mut D) -> Result<(), D::Error> {
    display.define_glyph(DEGREE_SLOT, &DEGREE)?;
    display.define_glyph(FILL_SLOT, &FILL)
}

pub(crate) mod button;
pub(crate) mod clock;
pub mod glyph;
pub(crate) mod module;
pub(crate) mod navigator;
pub(crate) mod palette;
pub(crate) mod shutdown;
pub(crate) mod stream;
pub mod text;

#[cfg(test)]
pub(crate) mod testing;

pub use button::{Button, Buttons};
pub use clock::{Clock, SystemClock};
pub use module::{Module, ModuleKind};
pub use navigator::{Control, Navigator, NavigatorState, Timing};
pub use palette::{Color, NamedColor, PALETTE};
pub use shutdown::{blank_screen, Shutdown};
pub use stream::{FeedMode, Flow, StreamDisplay};

/// A 16x2 character display with an RGB backlight and a five button keypad.
///
/// Every call talks to the hardware, so errors are treated as fatal by the
/// callers in this crate.
pub trait CharDisplay {
    type Error: std::error::Error + 'static;

    fn clear(&mut self) -> Result<(), Self::Error>;

    /// Move the cursor to the top left without clearing
    fn home(&mut self) -> Result<(), Self::Error>;

    /// Write text at the cursor, `\n` moves to the start of the second line
    fn write(&mut self, text: &str) -> Result<(), Self::Error>;

    fn set_backlight(&mut self, color: Color) -> Result<(), Self::Error>;

    /// Upload a custom character; it is then written as the char with code `slot`
    fn define_glyph(&mut self, slot: u8, pattern: &glyph::Glyph) -> Result<(), Self::Error>;

    fn is_pressed(&mut self, button: Button) -> Result<bool, Self::Error>;
}

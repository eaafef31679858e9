#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Color {
    pub red: f32,
    pub green: f32,
    pub blue: f32,
}

impl Color {
    pub const RED: Color = Color::new(1.0, 0.0, 0.0);
    pub const GREEN: Color = Color::new(0.0, 1.0, 0.0);
    pub const BLUE: Color = Color::new(0.0, 0.0, 1.0);
    pub const YELLOW: Color = Color::new(1.0, 1.0, 0.0);
    pub const CYAN: Color = Color::new(0.0, 1.0, 1.0);
    pub const MAGENTA: Color = Color::new(1.0, 0.0, 1.0);
    pub const WHITE: Color = Color::new(1.0, 1.0, 1.0);
    /// Backlight off
    pub const BLACK: Color = Color::new(0.0, 0.0, 0.0);

    pub const fn new(red: f32, green: f32, blue: f32) -> Self {
        Self { red, green, blue }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct NamedColor {
    pub name: &'static str,
    pub color: Color,
}

/// Backlight colors in cycling order
pub const PALETTE: [NamedColor; 8] = [
    named("RED", Color::RED),
    named("GREEN", Color::GREEN),
    named("BLUE", Color::BLUE),
    named("YELLOW", Color::YELLOW),
    named("CYAN", Color::CYAN),
    named("MAGENTA", Color::MAGENTA),
    named("WHITE", Color::WHITE),
    named("BLACK", Color::BLACK),
];

const fn named(name: &'static str, color: Color) -> NamedColor {
    NamedColor { name, color }
}

impl NamedColor {
    /// Case-insensitive palette lookup
    pub fn by_name(name: &str) -> Option<NamedColor> {
        PALETTE
            .iter()
            .find(|entry| entry.name.eq_ignore_ascii_case(name.trim()))
            .copied()
    }
}

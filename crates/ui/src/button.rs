use crate::CharDisplay;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Button {
    Select,
    Left,
    Right,
    Up,
    Down,
}

impl Button {
    pub const ALL: [Button; 5] = [
        Button::Select,
        Button::Left,
        Button::Right,
        Button::Up,
        Button::Down,
    ];

    /// Previous module
    pub const PREVIOUS: Button = Button::Up;
    /// Next module
    pub const NEXT: Button = Button::Down;
    /// Previous backlight color
    pub const COLOR_BACK: Button = Button::Left;
    /// Next backlight color
    pub const COLOR_FORWARD: Button = Button::Right;

    fn mask(self) -> u8 {
        1 << self as u8
    }
}

/// Level snapshot of every button, taken once per tick so that the
/// precedence checks all see the same state.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Buttons(u8);

impl Buttons {
    pub fn read<D: CharDisplay>(display: &mut D) -> Result<Self, D::Error> {
        let mut buttons = Buttons::default();
        for button in Button::ALL {
            if display.is_pressed(button)? {
                buttons = buttons.with(button);
            }
        }
        Ok(buttons)
    }

    pub fn with(self, button: Button) -> Self {
        Buttons(self.0 | button.mask())
    }

    pub fn is_pressed(self, button: Button) -> bool {
        self.0 & button.mask() != 0
    }

    pub fn is_empty(self) -> bool {
        self.0 == 0
    }
}

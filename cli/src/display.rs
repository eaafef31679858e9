//! Adafruit RGB 16x2 LCD + keypad plate: an HD44780 in 4-bit mode behind an
//! MCP23017 I2C port expander, which also carries the backlight and buttons.

use embedded_hal::{delay::DelayNs, i2c::I2c};
use tracing::debug;
use ui::{glyph::Glyph, Button, CharDisplay, Color};

pub(crate) const PLATE_ADDRESS: u8 = 0x20;

// MCP23017 registers, IOCON.BANK = 0
const IODIRA: u8 = 0x00;
const IODIRB: u8 = 0x01;
const GPPUA: u8 = 0x0C;
const GPIOA: u8 = 0x12;
const OLATA: u8 = 0x14;
const OLATB: u8 = 0x15;

// Port A: five buttons (active low) and two backlight LEDs (active low)
const RED_BIT: u8 = 1 << 6;
const GREEN_BIT: u8 = 1 << 7;
const BUTTON_BITS: u8 = 0b0001_1111;
const PORT_A_INPUTS: u8 = 0b0011_1111;

// Port B: blue LED then the LCD bus, D7 down to D4, EN, RW, RS
const BLUE_BIT: u8 = 1 << 0;
const EN_BIT: u8 = 1 << 5;
const RS_BIT: u8 = 1 << 7;

// HD44780 instructions
const CLEAR_DISPLAY: u8 = 0x01;
const RETURN_HOME: u8 = 0x02;
const ENTRY_MODE_LEFT: u8 = 0x06;
const DISPLAY_ON: u8 = 0x0C;
const FUNCTION_4BIT_2LINE: u8 = 0x28;
const SET_CGRAM_ADDR: u8 = 0x40;
const SET_DDRAM_ADDR: u8 = 0x80;

const ROW_OFFSETS: [u8; 2] = [0x00, 0x40];

#[derive(thiserror::Error, Debug)]
pub(crate) enum PlateError<E> {
    #[error("i2c transfer failed: {0:?}")]
    I2c(E),
    #[error("glyph slot {0} out of range")]
    GlyphSlot(u8),
}

pub(crate) struct CharLcdPlate<I2C, D> {
    i2c: I2C,
    delay: D,
    address: u8,
    // Output latch shadows, so single pins can change without a read
    port_a: u8,
    port_b: u8,
}

fn button_bit(button: Button) -> u8 {
    match button {
        Button::Select => 1 << 0,
        Button::Right => 1 << 1,
        Button::Down => 1 << 2,
        Button::Up => 1 << 3,
        Button::Left => 1 << 4,
    }
}

// D4..D7 sit on port B bits 4..1, in reverse order
fn nibble_bits(nibble: u8) -> u8 {
    ((nibble & 0b0001) << 4)
        | ((nibble & 0b0010) << 2)
        | (nibble & 0b0100)
        | ((nibble & 0b1000) >> 2)
}

impl<I2C, D> CharLcdPlate<I2C, D>
where
    I2C: I2c,
    I2C::Error: 'static,
    D: DelayNs,
{
    /// No bus traffic until [`CharLcdPlate::init`].
    pub fn new(i2c: I2C, delay: D, address: u8) -> Self {
        Self {
            i2c,
            delay,
            address,
            port_a: RED_BIT | GREEN_BIT,
            port_b: BLUE_BIT,
        }
    }

    /// Configure the expander pins, then put the LCD into 4-bit two line mode.
    pub fn init(&mut self) -> Result<(), PlateError<I2C::Error>> {
        debug!(address = self.address, "Initializing LCD plate");
        self.write_register(IODIRA, PORT_A_INPUTS)?;
        self.write_register(IODIRB, 0x00)?;
        self.write_register(GPPUA, BUTTON_BITS)?;
        self.write_register(OLATA, self.port_a)?;
        self.write_register(OLATB, self.port_b)?;

        // Two nibble pairs that force 4-bit mode from any starting state
        self.write8(0x33, false)?;
        self.write8(0x32, false)?;
        self.write8(DISPLAY_ON, false)?;
        self.write8(FUNCTION_4BIT_2LINE, false)?;
        self.write8(ENTRY_MODE_LEFT, false)?;
        self.clear()
    }

    fn write_register(&mut self, register: u8, value: u8) -> Result<(), PlateError<I2C::Error>> {
        self.i2c
            .write(self.address, &[register, value])
            .map_err(PlateError::I2c)
    }

    fn write_port_b(&mut self, value: u8) -> Result<(), PlateError<I2C::Error>> {
        self.port_b = value;
        self.write_register(OLATB, value)
    }

    /// Put a nibble on the bus and latch it with a pulse on EN.
    fn write4(&mut self, nibble: u8) -> Result<(), PlateError<I2C::Error>> {
        let data = (self.port_b & (BLUE_BIT | RS_BIT)) | nibble_bits(nibble);
        self.write_port_b(data)?;
        self.write_port_b(data | EN_BIT)?;
        self.delay.delay_us(1);
        self.write_port_b(data)
    }

    fn write8(&mut self, value: u8, char_mode: bool) -> Result<(), PlateError<I2C::Error>> {
        self.port_b = if char_mode {
            self.port_b | RS_BIT
        } else {
            self.port_b & !RS_BIT
        };
        self.write4(value >> 4)?;
        self.write4(value & 0x0F)
    }

    fn command(&mut self, command: u8) -> Result<(), PlateError<I2C::Error>> {
        self.write8(command, false)
    }

    fn set_cursor(&mut self, column: u8, row: usize) -> Result<(), PlateError<I2C::Error>> {
        let offset = ROW_OFFSETS[row.min(ROW_OFFSETS.len() - 1)];
        self.command(SET_DDRAM_ADDR | (column + offset))
    }
}

impl<I2C, D> CharDisplay for CharLcdPlate<I2C, D>
where
    I2C: I2c,
    I2C::Error: 'static,
    D: DelayNs,
{
    type Error = PlateError<I2C::Error>;

    fn clear(&mut self) -> Result<(), Self::Error> {
        self.command(CLEAR_DISPLAY)?;
        self.delay.delay_ms(3);
        Ok(())
    }

    fn home(&mut self) -> Result<(), Self::Error> {
        self.command(RETURN_HOME)?;
        self.delay.delay_ms(3);
        Ok(())
    }

    fn write(&mut self, text: &str) -> Result<(), Self::Error> {
        let mut row = 0;
        for c in text.chars() {
            if c == '\n' {
                row += 1;
                self.set_cursor(0, row)?;
            } else {
                let code = u8::try_from(u32::from(c)).unwrap_or(b'?');
                self.write8(code, true)?;
            }
        }
        Ok(())
    }

    /// The plate has no PWM on the LEDs, so any non-zero component is on.
    fn set_backlight(&mut self, color: Color) -> Result<(), Self::Error> {
        let mut port_a = self.port_a | RED_BIT | GREEN_BIT;
        if color.red > 0.0 {
            port_a &= !RED_BIT;
        }
        if color.green > 0.0 {
            port_a &= !GREEN_BIT;
        }
        let mut port_b = self.port_b | BLUE_BIT;
        if color.blue > 0.0 {
            port_b &= !BLUE_BIT;
        }
        self.port_a = port_a;
        self.write_register(OLATA, port_a)?;
        self.write_port_b(port_b)
    }

    fn define_glyph(&mut self, slot: u8, pattern: &Glyph) -> Result<(), Self::Error> {
        if slot > 7 {
            return Err(PlateError::GlyphSlot(slot));
        }
        self.command(SET_CGRAM_ADDR | (slot << 3))?;
        for row in pattern {
            self.write8(*row, true)?;
        }
        Ok(())
    }

    fn is_pressed(&mut self, button: Button) -> Result<bool, Self::Error> {
        let mut port_a = [0u8];
        self.i2c
            .write_read(self.address, &[GPIOA], &mut port_a)
            .map_err(PlateError::I2c)?;
        Ok(port_a[0] & button_bit(button) == 0)
    }
}

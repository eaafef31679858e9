use crossbeam_channel::{select, Receiver};
use tracing::{debug, info, warn};

use crate::{blank_screen, glyph, text, CharDisplay, Color, NamedColor, Shutdown};

const COMMAND_PREFIX: &str = "cmd.";

/// How piped lines are laid out on the two rows.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum FeedMode {
    /// Each line scrolls in at the bottom
    #[default]
    Scroll,
    /// Lines are taken two at a time and shown together
    Pairs,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Exit,
}

#[derive(Debug, PartialEq, Eq)]
enum Command<'a> {
    Color(&'a str),
    Clear,
    Exit,
    Unknown(&'a str),
}

impl<'a> Command<'a> {
    fn parse(line: &'a str) -> Option<Command<'a>> {
        let command = line.trim().strip_prefix(COMMAND_PREFIX)?;
        Some(match command {
            "clear" => Command::Clear,
            "exit" => Command::Exit,
            _ => match command.strip_prefix("color.") {
                Some(name) => Command::Color(name),
                None => Command::Unknown(command),
            },
        })
    }
}

/// Shows text piped in line by line, with `cmd.` lines for control.
pub struct StreamDisplay<D: CharDisplay> {
    display: D,
    mode: FeedMode,
    lines: [String; 2],
    pending: Option<String>,
}

impl<D: CharDisplay> StreamDisplay<D> {
    pub fn new(display: D, mode: FeedMode) -> Self {
        Self {
            display,
            mode,
            lines: Default::default(),
            pending: None,
        }
    }

    pub fn start(&mut self) -> Result<(), D::Error> {
        self.display.set_backlight(Color::RED)?;
        self.display.clear()?;
        self.display.define_glyph(glyph::DEGREE_SLOT, &glyph::DEGREE)
    }

    pub fn handle_line(&mut self, line: &str) -> Result<Flow, D::Error> {
        if let Some(command) = Command::parse(line) {
            return self.run_command(command);
        }

        let line = text::reform_line(line);
        match self.mode {
            FeedMode::Scroll => {
                let previous = std::mem::replace(&mut self.lines[1], line);
                self.lines[0] = previous;
                self.draw()?;
            }
            FeedMode::Pairs => match self.pending.take() {
                None => self.pending = Some(line),
                Some(first) => {
                    self.lines = [first, line];
                    self.draw()?;
                }
            },
        }
        Ok(Flow::Continue)
    }

    fn run_command(&mut self, command: Command<'_>) -> Result<Flow, D::Error> {
        debug!(?command, "Stream command");
        match command {
            Command::Color(name) => match NamedColor::by_name(name) {
                Some(color) => {
                    info!(color = color.name, "Set backlight color");
                    self.display.set_backlight(color.color)?;
                }
                None => warn!(name, "Unknown color"),
            },
            Command::Clear => {
                self.lines = Default::default();
                self.pending = None;
                self.display.clear()?;
            }
            Command::Exit => return Ok(Flow::Exit),
            Command::Unknown(command) => warn!(command, "Unknown command"),
        }
        Ok(Flow::Continue)
    }

    fn draw(&mut self) -> Result<(), D::Error> {
        self.display.clear()?;
        self.display
            .write(&format!("{}\n{}", self.lines[0], self.lines[1]))
    }

    /// Show lines until the sender hangs up, `cmd.exit` arrives or shutdown
    /// is requested. The last two cases blank the display; end of input
    /// leaves the last text up.
    pub fn run(&mut self, lines: &Receiver<String>, shutdown: &Shutdown) -> Result<(), D::Error> {
        self.start()?;
        loop {
            if shutdown.is_requested() {
                break;
            }
            select! {
                recv(lines) -> line => match line {
                    Ok(line) => {
                        if self.handle_line(&line)? == Flow::Exit {
                            info!("Exit command received");
                            break;
                        }
                    }
                    Err(_) => {
                        info!("End of input");
                        return Ok(());
                    }
                },
                recv(shutdown.wakeups()) -> _ => {}
            }
        }
        blank_screen(&mut self.display);
        Ok(())
    }

    #[cfg(test)]
    pub(crate) fn display(&self) -> &D {
        &self.display
    }
}

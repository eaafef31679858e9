use std::time::Duration;

use tracing::info;

use crate::{
    blank_screen, glyph, Button, Buttons, CharDisplay, Clock, Module, ModuleKind, NamedColor,
    Shutdown, PALETTE,
};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Timing {
    /// Tick length, also the baseline debounce
    pub poll: Duration,
    /// Pause after a color change so one press moves one step
    pub color_debounce: Duration,
}

impl Default for Timing {
    fn default() -> Self {
        Self {
            poll: Duration::from_millis(100),
            color_debounce: Duration::from_millis(250),
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct NavigatorState {
    pub active_index: usize,
    pub color_index: usize,
    /// Consumed by the next refresh
    pub force_refresh: bool,
}

/// What the input step decided for this tick.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Control {
    Shutdown,
    /// Switched module; the tick ends here
    Navigated,
    /// Changed backlight; debounce, then end the tick
    Recolored,
    /// Sleep, then refresh the active module
    Refresh,
}

/// Owns the display and the modules, and runs the polling loop.
pub struct Navigator<D: CharDisplay, C: Clock> {
    display: D,
    clock: C,
    modules: Vec<Module>,
    state: NavigatorState,
    timing: Timing,
}

fn step(index: usize, len: usize, forward: bool) -> usize {
    if forward {
        (index + 1) % len
    } else {
        (index + len - 1) % len
    }
}

impl<D: CharDisplay, C: Clock> Navigator<D, C> {
    pub fn new(display: D, clock: C, modules: Vec<Module>, timing: Timing) -> Self {
        assert!(!modules.is_empty(), "at least one module is required");
        Self {
            display,
            clock,
            modules,
            state: NavigatorState::default(),
            timing,
        }
    }

    /// Start on the first module of the given kind, if there is one.
    pub fn starting_at(mut self, kind: ModuleKind) -> Self {
        if let Some(index) = self.modules.iter().position(|m| m.kind() == kind) {
            self.state.active_index = index;
        }
        self
    }

    pub fn state(&self) -> NavigatorState {
        self.state
    }

    pub fn active(&self) -> &Module {
        &self.modules[self.state.active_index]
    }

    pub fn color(&self) -> NamedColor {
        PALETTE[self.state.color_index]
    }

    /// Backlight, glyphs and the first module.
    pub fn start(&mut self) -> Result<(), D::Error> {
        self.display.set_backlight(self.color().color)?;
        glyph::load(&mut self.display)?;
        let index = self.state.active_index;
        self.modules[index].show(&mut self.display, &self.clock)
    }

    /// Sample the buttons and act on the highest priority combination:
    /// both navigation buttons, then one navigation button, then a color
    /// button, then select.
    pub fn handle_input(&mut self) -> Result<Control, D::Error> {
        let buttons = Buttons::read(&mut self.display)?;
        let previous = buttons.is_pressed(Button::PREVIOUS);
        let next = buttons.is_pressed(Button::NEXT);

        if previous && next {
            info!("Both navigation buttons held, stopping");
            return Ok(Control::Shutdown);
        }
        if previous || next {
            self.switch_module(next)?;
            return Ok(Control::Navigated);
        }

        let color_back = buttons.is_pressed(Button::COLOR_BACK);
        if color_back || buttons.is_pressed(Button::COLOR_FORWARD) {
            self.cycle_color(!color_back)?;
            return Ok(Control::Recolored);
        }

        if buttons.is_pressed(Button::Select) {
            info!(module = self.active().name(), "Forcing update");
            self.state.force_refresh = true;
        }
        Ok(Control::Refresh)
    }

    fn switch_module(&mut self, forward: bool) -> Result<(), D::Error> {
        self.modules[self.state.active_index].hide();
        self.state.active_index = step(self.state.active_index, self.modules.len(), forward);
        let index = self.state.active_index;
        self.modules[index].show(&mut self.display, &self.clock)
    }

    fn cycle_color(&mut self, forward: bool) -> Result<(), D::Error> {
        self.state.color_index = step(self.state.color_index, PALETTE.len(), forward);
        let color = self.color();
        info!(color = color.name, "Set backlight color");
        self.display.set_backlight(color.color)
    }

    /// Update the active module, consuming a pending forced refresh, and
    /// redraw it when its text changed.
    pub fn refresh(&mut self) -> Result<bool, D::Error> {
        let force = std::mem::take(&mut self.state.force_refresh);
        let index = self.state.active_index;
        let module = &mut self.modules[index];
        let changed = module.update(&mut self.display, &self.clock, force)?;
        if changed {
            module.render(&mut self.display)?;
        }
        Ok(changed)
    }

    /// Poll until both navigation buttons are held or `shutdown` is
    /// requested, then blank the display.
    pub fn run(&mut self, shutdown: &Shutdown) -> Result<(), D::Error> {
        self.start()?;
        while !shutdown.is_requested() {
            match self.handle_input()? {
                Control::Shutdown => break,
                Control::Navigated => {}
                Control::Recolored => {
                    shutdown.wait(self.timing.color_debounce);
                }
                Control::Refresh => {
                    if shutdown.wait(self.timing.poll) {
                        break;
                    }
                    self.refresh()?;
                }
            }
        }
        blank_screen(&mut self.display);
        Ok(())
    }

    #[cfg(test)]
    pub(crate) fn display_mut(&mut self) -> &mut D {
        &mut self.display
    }
}

#[cfg(test)]
mod tests {
    use sources::Location;

    use super::*;
    use crate::testing::{FakeDisplay, FakeWeather, ManualClock, Op};
    use crate::Color;

    fn navigator() -> Navigator<FakeDisplay, ManualClock> {
        Navigator::new(
            FakeDisplay::default(),
            ManualClock::new(),
            vec![Module::clock(), Module::clock_coarse(), Module::clock()],
            Timing {
                poll: Duration::from_millis(1),
                color_debounce: Duration::from_millis(1),
            },
        )
    }

    fn press(navigator: &mut Navigator<FakeDisplay, ManualClock>, buttons: &[Button]) -> Control {
        navigator.display_mut().release_all();
        for button in buttons {
            navigator.display_mut().press(*button);
        }
        navigator.handle_input().expect("handle input")
    }

    #[test]
    fn test_start() {
        let mut navigator = navigator();
        navigator.start().expect("start");
        let ops = &navigator.display_mut().ops;
        assert_eq!(ops[0], Op::Backlight(Color::RED));
        assert_eq!(ops[1], Op::Glyph(1, glyph::DEGREE));
        assert_eq!(ops[2], Op::Glyph(2, glyph::FILL));
        assert!(navigator.active().is_visible());
    }

    #[test]
    fn test_starting_at() {
        let navigator = navigator().starting_at(ModuleKind::ClockCoarse);
        assert_eq!(navigator.state().active_index, 1);

        let navigator = navigator.starting_at(ModuleKind::Weather);
        assert_eq!(navigator.state().active_index, 1);
    }

    #[test]
    fn test_navigation_wraps() {
        let mut navigator = navigator();
        navigator.start().expect("start");

        assert_eq!(press(&mut navigator, &[Button::Up]), Control::Navigated);
        assert_eq!(navigator.state().active_index, 2);
        assert_eq!(press(&mut navigator, &[Button::Down]), Control::Navigated);
        assert_eq!(navigator.state().active_index, 0);
        press(&mut navigator, &[Button::Down]);
        press(&mut navigator, &[Button::Down]);
        press(&mut navigator, &[Button::Down]);
        assert_eq!(navigator.state().active_index, 0);
    }

    #[test]
    fn test_only_active_module_visible() {
        let mut navigator = navigator();
        navigator.start().expect("start");
        press(&mut navigator, &[Button::Down]);

        let visible: Vec<bool> = navigator.modules.iter().map(Module::is_visible).collect();
        assert_eq!(visible, vec![false, true, false]);
    }

    #[test]
    fn test_color_wraps() {
        let mut navigator = navigator();
        navigator.start().expect("start");

        assert_eq!(press(&mut navigator, &[Button::Left]), Control::Recolored);
        assert_eq!(navigator.state().color_index, 7);
        assert_eq!(navigator.display_mut().last_backlight(), Some(Color::BLACK));

        assert_eq!(press(&mut navigator, &[Button::Right]), Control::Recolored);
        assert_eq!(navigator.state().color_index, 0);
        assert_eq!(navigator.display_mut().last_backlight(), Some(Color::RED));

        for _ in 0..9 {
            press(&mut navigator, &[Button::Right]);
        }
        assert_eq!(navigator.state().color_index, 1);
        assert_eq!(navigator.color().name, "GREEN");
    }

    #[test]
    fn test_priority() {
        let mut navigator = navigator();
        navigator.start().expect("start");

        assert_eq!(
            press(&mut navigator, &[Button::Up, Button::Down, Button::Left]),
            Control::Shutdown
        );
        assert_eq!(
            press(&mut navigator, &[Button::Down, Button::Right, Button::Select]),
            Control::Navigated
        );
        assert_eq!(navigator.state().color_index, 0);
        assert!(!navigator.state().force_refresh);

        assert_eq!(
            press(&mut navigator, &[Button::Left, Button::Select]),
            Control::Recolored
        );
        assert!(!navigator.state().force_refresh);

        assert_eq!(press(&mut navigator, &[Button::Select]), Control::Refresh);
        assert!(navigator.state().force_refresh);
        assert_eq!(press(&mut navigator, &[]), Control::Refresh);
    }

    #[test]
    fn test_force_refresh_is_one_shot() {
        let weather = FakeWeather::reporting(72, 22, "Fair");
        let mut navigator = Navigator::new(
            FakeDisplay::default(),
            ManualClock::new(),
            vec![Module::weather(Box::new(weather.clone()), Location::default())],
            Timing::default(),
        );
        navigator.start().expect("start");
        assert_eq!(weather.calls.get(), 1);

        press(&mut navigator, &[Button::Select]);
        assert!(navigator.refresh().expect("refresh"));
        assert_eq!(weather.calls.get(), 2);
        assert!(!navigator.state().force_refresh);

        press(&mut navigator, &[]);
        assert!(!navigator.refresh().expect("refresh"));
        assert_eq!(weather.calls.get(), 2);
    }

    #[test]
    fn test_refresh_redraws_on_change() {
        let mut navigator = navigator();
        navigator.start().expect("start");

        navigator.display_mut().ops.clear();
        assert!(!navigator.refresh().expect("refresh"));
        assert!(navigator.display_mut().ops.is_empty());

        navigator.clock.advance(1);
        assert!(navigator.refresh().expect("refresh"));
        assert_eq!(
            navigator.display_mut().last_write(),
            Some("2026 Oct 16, Fri\n3:04:06 PM      ")
        );
    }

    #[test]
    fn test_both_navigation_buttons_shut_down() {
        let mut navigator = navigator();
        navigator.display_mut().press(Button::Up);
        navigator.display_mut().press(Button::Down);

        navigator.run(&Shutdown::new()).expect("run");

        let display = navigator.display_mut();
        let fill = "\u{1}".repeat(16);
        assert_eq!(
            display.last_write(),
            Some(format!("{fill}\n{fill}").as_str())
        );
        assert_eq!(display.last_backlight(), Some(Color::BLACK));
        assert!(display.ops.contains(&Op::Glyph(1, glyph::FILL)));
    }

    #[test]
    fn test_requested_shutdown_stops_loop() {
        let mut navigator = navigator();
        let shutdown = Shutdown::new();
        shutdown.request();

        navigator.run(&shutdown).expect("run");
        assert_eq!(navigator.display_mut().last_backlight(), Some(Color::BLACK));
    }
}

//! Displayable panes, each with its own refresh cadence and cached text.

use chrono::{DateTime, FixedOffset, TimeDelta};
use sources::{AmbientSource, Location, WeatherSource};
use tracing::{debug, info};

use crate::{text, CharDisplay, Clock};

mod ambient;
mod quick;
mod time;
mod weather;

pub use ambient::AmbientModule;
pub use quick::QuickModule;
pub use time::ClockModule;
pub use weather::WeatherModule;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ModuleKind {
    Clock,
    ClockCoarse,
    Weather,
    Ambient,
    Quick,
}

pub enum Module {
    /// Date and time with seconds, refreshed every tick
    Clock(ClockModule),
    /// Date and time to the minute, refreshed every minute
    ClockCoarse(ClockModule),
    Weather(WeatherModule),
    Ambient(AmbientModule),
    /// Time, indoor and outdoor temperature on one screen
    Quick(QuickModule),
}

/// Cache and visibility shared by every module.
#[derive(Debug, Default)]
pub(crate) struct PaneState {
    cached_text: Option<String>,
    last_update: Option<DateTime<FixedOffset>>,
    visible: bool,
}

impl PaneState {
    /// Visible and either never updated or at least `cadence` old.
    fn is_due(&self, now: &DateTime<FixedOffset>, cadence: TimeDelta) -> bool {
        if !self.visible {
            return false;
        }
        match (&self.cached_text, self.last_update) {
            (Some(_), Some(last)) => elapsed_at_least(&last, now, cadence),
            _ => true,
        }
    }

    /// Store freshly rendered text, returning whether it needs drawing.
    fn store(&mut self, refreshed: Refreshed, now: DateTime<FixedOffset>) -> bool {
        self.last_update = Some(now);
        let changed =
            refreshed.force_draw || self.cached_text.as_deref() != Some(refreshed.text.as_str());
        self.cached_text = Some(refreshed.text);
        changed
    }
}

pub(crate) fn elapsed_at_least(
    last: &DateTime<FixedOffset>,
    now: &DateTime<FixedOffset>,
    cadence: TimeDelta,
) -> bool {
    let elapsed = now.signed_duration_since(*last);
    // A clock stepped backwards would otherwise hold the cache until it caught up
    elapsed >= cadence || elapsed < TimeDelta::zero()
}

/// Text produced by one refresh. `force_draw` is set when the text must be
/// drawn even if it equals the cache: placeholder text standing in for a
/// data source error, or a loading message that covered the screen.
pub(crate) struct Refreshed {
    text: String,
    force_draw: bool,
}

impl Refreshed {
    fn new(text: String) -> Self {
        Self {
            text,
            force_draw: false,
        }
    }

    fn placeholder(text: String) -> Self {
        Self {
            text,
            force_draw: true,
        }
    }
}

enum RenderStyle {
    /// Home the cursor and overwrite both padded lines
    Overwrite,
    /// Clear and write
    Redraw,
}

impl Module {
    pub fn clock() -> Self {
        Module::Clock(ClockModule::with_seconds())
    }

    pub fn clock_coarse() -> Self {
        Module::ClockCoarse(ClockModule::without_seconds())
    }

    pub fn weather(source: Box<dyn WeatherSource>, location: Location) -> Self {
        Module::Weather(WeatherModule::new(source, location))
    }

    pub fn ambient(source: Box<dyn AmbientSource>) -> Self {
        Module::Ambient(AmbientModule::new(source))
    }

    pub fn quick(
        ambient: Box<dyn AmbientSource>,
        weather: Box<dyn WeatherSource>,
        location: Location,
    ) -> Self {
        Module::Quick(QuickModule::new(ambient, weather, location))
    }

    pub fn kind(&self) -> ModuleKind {
        match self {
            Module::Clock(_) => ModuleKind::Clock,
            Module::ClockCoarse(_) => ModuleKind::ClockCoarse,
            Module::Weather(_) => ModuleKind::Weather,
            Module::Ambient(_) => ModuleKind::Ambient,
            Module::Quick(_) => ModuleKind::Quick,
        }
    }

    pub fn name(&self) -> &'static str {
        match self.kind() {
            ModuleKind::Clock => "time",
            ModuleKind::ClockCoarse => "time (no seconds)",
            ModuleKind::Weather => "weather",
            ModuleKind::Ambient => "temperature",
            ModuleKind::Quick => "quick",
        }
    }

    pub fn cached_text(&self) -> Option<&str> {
        self.state().cached_text.as_deref()
    }

    pub fn is_visible(&self) -> bool {
        self.state().visible
    }

    fn state(&self) -> &PaneState {
        match self {
            Module::Clock(module) | Module::ClockCoarse(module) => &module.state,
            Module::Weather(module) => &module.state,
            Module::Ambient(module) => &module.state,
            Module::Quick(module) => &module.state,
        }
    }

    fn state_mut(&mut self) -> &mut PaneState {
        match self {
            Module::Clock(module) | Module::ClockCoarse(module) => &mut module.state,
            Module::Weather(module) => &mut module.state,
            Module::Ambient(module) => &mut module.state,
            Module::Quick(module) => &mut module.state,
        }
    }

    fn cadence(&self) -> TimeDelta {
        match self {
            Module::Clock(module) | Module::ClockCoarse(module) => module.cadence(),
            Module::Weather(_) => weather::cadence(),
            Module::Ambient(_) => ambient::cadence(),
            Module::Quick(_) => quick::cadence(),
        }
    }

    fn render_style(&self) -> RenderStyle {
        match self {
            Module::Clock(_) | Module::ClockCoarse(_) | Module::Quick(_) => RenderStyle::Overwrite,
            Module::Weather(_) | Module::Ambient(_) => RenderStyle::Redraw,
        }
    }

    fn loading_text(&self) -> &'static str {
        match self {
            Module::Weather(_) => weather::LOADING,
            Module::Ambient(_) => ambient::LOADING,
            Module::Clock(_) | Module::ClockCoarse(_) | Module::Quick(_) => "LOADING",
        }
    }

    /// Forced, or visible with a cache that is missing or at least one
    /// cadence old. Hidden modules are never due on their own.
    pub fn needs_update(&self, force: bool, now: &DateTime<FixedOffset>) -> bool {
        force || self.state().is_due(now, self.cadence())
    }

    /// Refresh the cache when due. Returns whether the text to draw changed.
    ///
    /// Data source failures are absorbed into placeholder text; only display
    /// errors are returned.
    pub fn update<D: CharDisplay>(
        &mut self,
        display: &mut D,
        clock: &impl Clock,
        force: bool,
    ) -> Result<bool, D::Error> {
        let now = clock.now();
        if !self.needs_update(force, &now) {
            return Ok(false);
        }

        let refreshed = match self {
            Module::Clock(module) | Module::ClockCoarse(module) => module.refresh(&now),
            Module::Weather(module) => module.refresh(display)?,
            Module::Ambient(module) => module.refresh(),
            Module::Quick(module) => module.refresh(display, &now)?,
        };
        let changed = self.state_mut().store(refreshed, now);
        debug!(module = self.name(), changed, "Updated module");
        Ok(changed)
    }

    /// Draw the cached text, or the loading placeholder before the first update.
    pub fn render<D: CharDisplay>(&self, display: &mut D) -> Result<(), D::Error> {
        let screen = self.cached_text().unwrap_or(self.loading_text());
        match self.render_style() {
            RenderStyle::Overwrite => {
                display.home()?;
                display.write(&text::padded_screen(screen))
            }
            RenderStyle::Redraw => {
                display.clear()?;
                display.write(screen)
            }
        }
    }

    /// Make this the visible module: draw what is cached right away, then
    /// try an update and redraw if it brought new text.
    pub fn show<D: CharDisplay>(
        &mut self,
        display: &mut D,
        clock: &impl Clock,
    ) -> Result<(), D::Error> {
        if !self.state().visible {
            info!(module = self.name(), "Showing module");
            display.clear()?;
            self.state_mut().visible = true;
        }
        self.render(display)?;
        if self.update(display, clock, false)? {
            self.render(display)?;
        }
        Ok(())
    }

    /// The caller clears the display before showing the next module.
    pub fn hide(&mut self) {
        self.state_mut().visible = false;
    }
}

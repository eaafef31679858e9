use chrono::TimeDelta;
use sources::{Location, WeatherSource};
use tracing::{info, warn};

use super::{PaneState, Refreshed};
use crate::{text, text::DEGREE, CharDisplay};

pub(super) const LOADING: &str = "LOADING WEATHER";
const UNAVAILABLE: (&str, &str) = ("unable to load", "weather data");

pub(super) fn cadence() -> TimeDelta {
    TimeDelta::minutes(15)
}

pub struct WeatherModule {
    pub(super) state: PaneState,
    source: Box<dyn WeatherSource>,
    location: Location,
}

impl WeatherModule {
    pub(super) fn new(source: Box<dyn WeatherSource>, location: Location) -> Self {
        Self {
            state: PaneState::default(),
            source,
            location,
        }
    }

    pub(super) fn refresh<D: CharDisplay>(
        &mut self,
        display: &mut D,
    ) -> Result<Refreshed, D::Error> {
        // Before the first update the loading text is already on screen
        let loading_shown = self.state.visible && self.state.cached_text.is_some();
        if loading_shown {
            display.clear()?;
            display.write(LOADING)?;
        }

        let mut refreshed = match self.source.current(&self.location) {
            Ok(weather) => Refreshed::new(text::two_lines(
                &format!("{}{DEGREE}F {}{DEGREE}C", weather.temp_f, weather.temp_c),
                &weather.condition,
            )),
            Err(err) => {
                warn!(%err, "Weather unavailable");
                Refreshed::placeholder(text::two_lines(UNAVAILABLE.0, UNAVAILABLE.1))
            }
        };
        refreshed.force_draw |= loading_shown;
        info!(text = refreshed.text.as_str(), "Weather refreshed");
        Ok(refreshed)
    }
}

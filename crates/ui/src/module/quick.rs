use chrono::{DateTime, FixedOffset, TimeDelta};
use sources::{AmbientSource, Location, WeatherSource};
use tracing::{info, warn};

use super::{elapsed_at_least, weather, PaneState, Refreshed};
use crate::{text, text::DEGREE, CharDisplay};

/// Shown in place of a reading that could not be taken
const UNKNOWN: &str = "??";

/// Cadence of the indoor reading and of the module as a whole
pub(super) fn cadence() -> TimeDelta {
    TimeDelta::seconds(15)
}

/// Time, indoor temperature and outdoor temperature.
///
/// The outdoor temperature has its own fifteen minute cadence. Its timestamp
/// only moves on a successful fetch, so a failed fetch is retried on the
/// next indoor reading.
pub struct QuickModule {
    pub(super) state: PaneState,
    ambient: Box<dyn AmbientSource>,
    weather: Box<dyn WeatherSource>,
    location: Location,
    outdoor: Option<String>,
    last_weather: Option<DateTime<FixedOffset>>,
}

impl QuickModule {
    pub(super) fn new(
        ambient: Box<dyn AmbientSource>,
        weather: Box<dyn WeatherSource>,
        location: Location,
    ) -> Self {
        Self {
            state: PaneState::default(),
            ambient,
            weather,
            location,
            outdoor: None,
            last_weather: None,
        }
    }

    fn weather_due(&self, now: &DateTime<FixedOffset>) -> bool {
        match (&self.outdoor, &self.last_weather) {
            (Some(_), Some(last)) => elapsed_at_least(last, now, weather::cadence()),
            _ => true,
        }
    }

    pub(super) fn refresh<D: CharDisplay>(
        &mut self,
        display: &mut D,
        now: &DateTime<FixedOffset>,
    ) -> Result<Refreshed, D::Error> {
        let mut force_draw = false;

        let indoor = match self.ambient.read() {
            Ok(ambient) => ambient.temp_f.to_string(),
            Err(err) => {
                warn!(%err, "Sensor unavailable");
                force_draw = true;
                UNKNOWN.to_string()
            }
        };

        if self.weather_due(now) {
            info!("Updating weather information");
            if self.state.visible {
                display.clear()?;
                display.write(weather::LOADING)?;
                force_draw = true;
            }
            match self.weather.current(&self.location) {
                Ok(weather) => {
                    self.outdoor = Some(weather.temp_f.to_string());
                    self.last_weather = Some(*now);
                }
                Err(err) => {
                    warn!(%err, "Weather unavailable");
                    force_draw = true;
                    self.outdoor = Some(UNKNOWN.to_string());
                }
            }
        }

        let outdoor = self.outdoor.as_deref().unwrap_or(UNKNOWN);
        let screen = text::two_lines(
            &now.format("%a %m/%d %-I:%M%P").to_string(),
            &format!("{indoor}{DEGREE}F ({outdoor}{DEGREE}F out)"),
        );
        Ok(Refreshed {
            text: screen,
            force_draw,
        })
    }
}

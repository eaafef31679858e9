use chrono::TimeDelta;
use sources::AmbientSource;
use tracing::{info, warn};

use super::{PaneState, Refreshed};
use crate::{text, text::DEGREE};

pub(super) const LOADING: &str = "LOADING\nTEMPERATURE";
const UNAVAILABLE: (&str, &str) = ("unable to read", "sensor data");

pub(super) fn cadence() -> TimeDelta {
    TimeDelta::seconds(60)
}

/// Indoor temperature and humidity
pub struct AmbientModule {
    pub(super) state: PaneState,
    source: Box<dyn AmbientSource>,
}

impl AmbientModule {
    pub(super) fn new(source: Box<dyn AmbientSource>) -> Self {
        Self {
            state: PaneState::default(),
            source,
        }
    }

    pub(super) fn refresh(&mut self) -> Refreshed {
        let refreshed = match self.source.read() {
            Ok(ambient) => Refreshed::new(text::two_lines(
                &format!("{}{DEGREE}F {}{DEGREE}C", ambient.temp_f, ambient.temp_c),
                &format!("{}% humidity", ambient.humidity),
            )),
            Err(err) => {
                warn!(%err, "Sensor unavailable");
                Refreshed::placeholder(text::two_lines(UNAVAILABLE.0, UNAVAILABLE.1))
            }
        };
        info!(text = refreshed.text.as_str(), "Temperature refreshed");
        refreshed
    }
}

use chrono::{DateTime, FixedOffset, TimeDelta};

use super::{PaneState, Refreshed};
use crate::text;

#[derive(Debug)]
enum Precision {
    Seconds,
    Minutes,
}

#[derive(Debug)]
pub struct ClockModule {
    pub(super) state: PaneState,
    precision: Precision,
}

impl ClockModule {
    pub(super) fn with_seconds() -> Self {
        Self {
            state: PaneState::default(),
            precision: Precision::Seconds,
        }
    }

    pub(super) fn without_seconds() -> Self {
        Self {
            state: PaneState::default(),
            precision: Precision::Minutes,
        }
    }

    pub(super) fn cadence(&self) -> TimeDelta {
        match self.precision {
            // Every tick; the text only changes once a second
            Precision::Seconds => TimeDelta::zero(),
            Precision::Minutes => TimeDelta::seconds(60),
        }
    }

    pub(super) fn refresh(&self, now: &DateTime<FixedOffset>) -> Refreshed {
        let time_format = match self.precision {
            Precision::Seconds => "%-I:%M:%S %p",
            Precision::Minutes => "%-I:%M %p",
        };
        Refreshed::new(text::two_lines(
            &now.format("%Y %b %d, %a").to_string(),
            &now.format(time_format).to_string(),
        ))
    }
}

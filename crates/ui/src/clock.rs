use chrono::{DateTime, FixedOffset};

/// Wall clock used for both the displayed time and module cadences.
pub trait Clock {
    fn now(&self) -> DateTime<FixedOffset>;
}

#[derive(Clone, Copy, Debug, Default)]
pub struct SystemClock {
    timezone: Option<chrono_tz::Tz>,
}

impl SystemClock {
    /// The system's local timezone
    pub fn local() -> Self {
        Self { timezone: None }
    }

    pub fn in_timezone(timezone: chrono_tz::Tz) -> Self {
        Self {
            timezone: Some(timezone),
        }
    }
}

impl Clock for SystemClock {
    fn now(&self) -> DateTime<FixedOffset> {
        match self.timezone {
            Some(timezone) => chrono::Utc::now().with_timezone(&timezone).fixed_offset(),
            None => chrono::Local::now().fixed_offset(),
        }
    }
}

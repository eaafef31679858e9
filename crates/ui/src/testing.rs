//! Fakes for the display, the data sources and the clock.

use std::cell::{Cell, RefCell};
use std::collections::HashSet;
use std::rc::Rc;

use chrono::{DateTime, FixedOffset, TimeDelta, TimeZone};
use sources::{Ambient, AmbientSource, Location, SourceError, Weather, WeatherSource};

use crate::{glyph::Glyph, Button, CharDisplay, Clock, Color};

#[derive(Clone, Debug, PartialEq)]
pub(crate) enum Op {
    Clear,
    Home,
    Write(String),
    Backlight(Color),
    Glyph(u8, Glyph),
}

#[derive(thiserror::Error, Debug)]
#[error("display unplugged")]
pub(crate) struct Unplugged;

/// Records every call. With `broken` set, every output call fails after
/// being recorded.
#[derive(Default)]
pub(crate) struct FakeDisplay {
    pub ops: Vec<Op>,
    pub broken: bool,
    pressed: HashSet<Button>,
}

impl FakeDisplay {
    pub fn broken() -> Self {
        Self {
            broken: true,
            ..Default::default()
        }
    }

    pub fn press(&mut self, button: Button) {
        self.pressed.insert(button);
    }

    pub fn release_all(&mut self) {
        self.pressed.clear();
    }

    pub fn last_write(&self) -> Option<&str> {
        self.ops.iter().rev().find_map(|op| match op {
            Op::Write(text) => Some(text.as_str()),
            _ => None,
        })
    }

    pub fn last_backlight(&self) -> Option<Color> {
        self.ops.iter().rev().find_map(|op| match op {
            Op::Backlight(color) => Some(*color),
            _ => None,
        })
    }

    pub fn count(&self, op: &Op) -> usize {
        self.ops.iter().filter(|recorded| *recorded == op).count()
    }

    fn record(&mut self, op: Op) -> Result<(), Unplugged> {
        self.ops.push(op);
        if self.broken {
            Err(Unplugged)
        } else {
            Ok(())
        }
    }
}

impl CharDisplay for FakeDisplay {
    type Error = Unplugged;

    fn clear(&mut self) -> Result<(), Unplugged> {
        self.record(Op::Clear)
    }

    fn home(&mut self) -> Result<(), Unplugged> {
        self.record(Op::Home)
    }

    fn write(&mut self, text: &str) -> Result<(), Unplugged> {
        self.record(Op::Write(text.to_string()))
    }

    fn set_backlight(&mut self, color: Color) -> Result<(), Unplugged> {
        self.record(Op::Backlight(color))
    }

    fn define_glyph(&mut self, slot: u8, pattern: &Glyph) -> Result<(), Unplugged> {
        self.record(Op::Glyph(slot, *pattern))
    }

    fn is_pressed(&mut self, button: Button) -> Result<bool, Unplugged> {
        Ok(self.pressed.contains(&button))
    }
}

/// Weather source returning whatever `reading` holds; `None` is a failed fetch.
#[derive(Clone, Default)]
pub(crate) struct FakeWeather {
    pub calls: Rc<Cell<usize>>,
    pub reading: Rc<RefCell<Option<Weather>>>,
}

impl FakeWeather {
    pub fn reporting(temp_f: i32, temp_c: i32, condition: &str) -> Self {
        let fake = FakeWeather::default();
        fake.set(temp_f, temp_c, condition);
        fake
    }

    pub fn set(&self, temp_f: i32, temp_c: i32, condition: &str) {
        *self.reading.borrow_mut() = Some(Weather {
            temp_f,
            temp_c,
            condition: condition.to_string(),
        });
    }

    pub fn fail(&self) {
        *self.reading.borrow_mut() = None;
    }
}

impl WeatherSource for FakeWeather {
    fn current(&mut self, _location: &Location) -> Result<Weather, SourceError> {
        self.calls.set(self.calls.get() + 1);
        self.reading
            .borrow()
            .clone()
            .ok_or(SourceError::MissingField("condition"))
    }
}

#[derive(Clone, Default)]
pub(crate) struct FakeAmbient {
    pub calls: Rc<Cell<usize>>,
    pub reading: Rc<Cell<Option<Ambient>>>,
}

impl FakeAmbient {
    pub fn reporting(temp_f: i32, temp_c: i32, humidity: i32) -> Self {
        let fake = FakeAmbient::default();
        fake.reading.set(Some(Ambient {
            temp_f,
            temp_c,
            humidity,
        }));
        fake
    }
}

impl AmbientSource for FakeAmbient {
    fn read(&mut self) -> Result<Ambient, SourceError> {
        self.calls.set(self.calls.get() + 1);
        self.reading
            .get()
            .ok_or(SourceError::MissingField("humidity"))
    }
}

/// Clock that only moves when told to. Clones share the same time.
#[derive(Clone)]
pub(crate) struct ManualClock {
    now: Rc<Cell<DateTime<FixedOffset>>>,
}

impl ManualClock {
    /// Friday 2026-10-16 15:04:05 UTC
    pub fn new() -> Self {
        let now = FixedOffset::east_opt(0)
            .expect("utc offset")
            .with_ymd_and_hms(2026, 10, 16, 15, 4, 5)
            .unwrap();
        Self {
            now: Rc::new(Cell::new(now)),
        }
    }

    pub fn advance(&self, seconds: i64) {
        self.now.set(self.now.get() + TimeDelta::seconds(seconds));
    }
}

impl Clock for ManualClock {
    fn now(&self) -> DateTime<FixedOffset> {
        self.now.get()
    }
}

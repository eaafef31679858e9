use std::path::PathBuf;
use std::process::Command;

use tracing::debug;

use crate::SourceError;

const DEFAULT_COMMAND: &str = "read_dht11";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Ambient {
    pub temp_f: i32,
    pub temp_c: i32,
    pub humidity: i32,
}

pub trait AmbientSource {
    fn read(&mut self) -> Result<Ambient, SourceError>;
}

/// Reads a DHT11 sensor by running a helper program that prints
///
/// ```text
/// 23.0 °C (73.4 °F)
/// 45.0 % relative humidity
/// ```
pub struct Dht11Command {
    program: PathBuf,
}

impl Dht11Command {
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
        }
    }
}

impl Default for Dht11Command {
    fn default() -> Self {
        Self::new(DEFAULT_COMMAND)
    }
}

impl AmbientSource for Dht11Command {
    #[tracing::instrument(skip(self), fields(program = %self.program.display()))]
    fn read(&mut self) -> Result<Ambient, SourceError> {
        let output = Command::new(&self.program).output()?;
        if !output.status.success() {
            return Err(SourceError::CommandStatus(output.status));
        }
        let text = String::from_utf8_lossy(&output.stdout);
        debug!(output = %text.trim_end(), "Sensor helper output");
        parse_sensor_output(&text)
    }
}

/// Fahrenheit is rounded, Celsius and humidity are truncated.
pub fn parse_sensor_output(text: &str) -> Result<Ambient, SourceError> {
    let mut lines = text.lines();
    let temperatures = lines
        .next()
        .ok_or(SourceError::MissingField("temperature line"))?
        .replace(['(', ')'], "");

    let mut temp_c = None;
    let mut temp_f = None;
    let tokens: Vec<&str> = temperatures.split_whitespace().collect();
    for pair in tokens.windows(2) {
        match pair[1] {
            "°C" => temp_c = Some(pair[0]),
            "°F" => temp_f = Some(pair[0]),
            _ => {}
        }
    }

    let humidity = lines
        .next()
        .and_then(|line| line.split_whitespace().next())
        .ok_or(SourceError::MissingField("humidity"))?;

    Ok(Ambient {
        temp_f: temp_f
            .ok_or(SourceError::MissingField("temperature (F)"))?
            .parse::<f64>()?
            .round() as i32,
        temp_c: temp_c
            .ok_or(SourceError::MissingField("temperature (C)"))?
            .parse::<f64>()?
            .trunc() as i32,
        humidity: humidity.parse::<f64>()?.trunc() as i32,
    })
}

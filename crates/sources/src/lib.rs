use thiserror::Error;

pub(crate) mod ambient;
pub(crate) mod weather;
pub use ambient::{parse_sensor_output, Ambient, AmbientSource, Dht11Command};
pub use weather::{parse_forecast_page, Location, NationalWeatherService, Weather, WeatherSource};

#[derive(Error, Debug)]
pub enum SourceError {
    #[error("http error")]
    HttpError(#[from] reqwest::Error),
    #[error("sensor command error")]
    CommandError(#[from] std::io::Error),
    #[error("sensor command exited with {0}")]
    CommandStatus(std::process::ExitStatus),
    #[error("missing {0}")]
    MissingField(&'static str),
    #[error("malformed text: {0:?}")]
    Malformed(String),
    #[error("parse int error")]
    ParseIntError(#[from] std::num::ParseIntError),
    #[error("parse float error")]
    ParseFloatError(#[from] std::num::ParseFloatError),
}

/// Weather source backed by forecast.weather.gov with the default timeout.
pub fn weather_service() -> Result<NationalWeatherService, SourceError> {
    NationalWeatherService::with_timeout(weather::DEFAULT_TIMEOUT)
}

/// Sensor reader that runs the given `read_dht11`-style helper.
pub fn sensor_command(program: impl AsRef<std::path::Path>) -> Dht11Command {
    Dht11Command::new(program.as_ref())
}

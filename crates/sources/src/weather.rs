use std::time::Duration;

use tracing::debug;

use crate::SourceError;

pub(crate) const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

const FORECAST_URL: &str = "http://forecast.weather.gov/MapClick.php";

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Location {
    pub longitude: f64,
    pub latitude: f64,
}

impl Default for Location {
    fn default() -> Self {
        Self {
            longitude: -97.74928981475828,
            latitude: 30.35843540042552,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Weather {
    pub temp_f: i32,
    pub temp_c: i32,
    pub condition: String,
}

pub trait WeatherSource {
    /// Current conditions at `location`. Any failure (network, timeout,
    /// unexpected page layout) is an error.
    fn current(&mut self, location: &Location) -> Result<Weather, SourceError>;
}

pub struct NationalWeatherService {
    client: reqwest::blocking::Client,
}

impl NationalWeatherService {
    pub fn with_timeout(timeout: Duration) -> Result<Self, SourceError> {
        let client = reqwest::blocking::Client::builder()
            .timeout(timeout)
            .build()?;
        Ok(Self { client })
    }
}

impl WeatherSource for NationalWeatherService {
    #[tracing::instrument(skip(self))]
    fn current(&mut self, location: &Location) -> Result<Weather, SourceError> {
        let body = self
            .client
            .get(FORECAST_URL)
            .query(&[
                ("lon", location.longitude.to_string()),
                ("lat", location.latitude.to_string()),
            ])
            .send()?
            .error_for_status()?
            .text()?;
        debug!(bytes = body.len(), "Fetched forecast page");
        parse_forecast_page(&body)
    }
}

/// Scrape the "current conditions" block of a MapClick forecast page.
///
/// The page carries one element per value, each on its own line:
/// `myforecast-current-lrg` holds the Fahrenheit reading, `myforecast-current-sm`
/// the Celsius one and plain `myforecast-current` the condition text. When a
/// class appears more than once the last occurrence wins.
pub fn parse_forecast_page(html: &str) -> Result<Weather, SourceError> {
    let mut temp_f = None;
    let mut temp_c = None;
    let mut condition = None;

    for line in html.lines() {
        // Order matters, the plain class name is a prefix of the other two
        if line.contains("myforecast-current-lrg") {
            temp_f = Some(element_text(line)?);
        } else if line.contains("myforecast-current-sm") {
            temp_c = Some(element_text(line)?);
        } else if line.contains("myforecast-current") {
            condition = Some(element_text(line)?);
        }
    }

    Ok(Weather {
        temp_f: leading_degrees(temp_f.ok_or(SourceError::MissingField("temperature (F)"))?)?,
        temp_c: leading_degrees(temp_c.ok_or(SourceError::MissingField("temperature (C)"))?)?,
        condition: condition
            .ok_or(SourceError::MissingField("condition"))?
            .to_string(),
    })
}

fn element_text(line: &str) -> Result<&str, SourceError> {
    let malformed = || SourceError::Malformed(line.to_string());
    let start = line.find('>').ok_or_else(malformed)? + 1;
    let rest = &line[start..];
    let end = rest.find('<').ok_or_else(malformed)?;
    Ok(&rest[..end])
}

// "72&deg;F" -> 72
fn leading_degrees(text: &str) -> Result<i32, SourceError> {
    let end = text
        .find('&')
        .ok_or_else(|| SourceError::Malformed(text.to_string()))?;
    Ok(text[..end].trim().parse()?)
}

use std::fmt;

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

pub const DEFAULT_LANGUAGE: &str = "en";

/// Data sets a weather request can ask for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum DataSet {
    CurrentWeather,
    ForecastDaily,
    ForecastHourly,
    ForecastNextHour,
    WeatherAlerts,
}

impl DataSet {
    pub fn as_str(&self) -> &'static str {
        match self {
            DataSet::CurrentWeather => "currentWeather",
            DataSet::ForecastDaily => "forecastDaily",
            DataSet::ForecastHourly => "forecastHourly",
            DataSet::ForecastNextHour => "forecastNextHour",
            DataSet::WeatherAlerts => "weatherAlerts",
        }
    }

    pub const fn all() -> &'static [DataSet] {
        &[
            DataSet::CurrentWeather,
            DataSet::ForecastDaily,
            DataSet::ForecastHourly,
            DataSet::ForecastNextHour,
            DataSet::WeatherAlerts,
        ]
    }
}

impl fmt::Display for DataSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<&str> for DataSet {
    type Error = anyhow::Error;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        DataSet::all()
            .iter()
            .copied()
            .find(|d| d.as_str().eq_ignore_ascii_case(value))
            .ok_or_else(|| {
                anyhow::anyhow!(
                    "Unknown data set '{value}'. Supported data sets: currentWeather, \
                     forecastDaily, forecastHourly, forecastNextHour, weatherAlerts."
                )
            })
    }
}

/// A request descriptor that knows where it lives on the API.
pub trait Endpoint {
    /// Path relative to the API base URL, starting with `/`.
    fn path(&self) -> String;

    /// Query parameters, already formatted.
    fn query(&self) -> Vec<(&'static str, String)> {
        Vec::new()
    }
}

/// Weather data for a location.
#[derive(Debug, Clone, Default)]
pub struct WeatherRequest {
    pub latitude: f64,
    pub longitude: f64,
    /// Falls back to [`DEFAULT_LANGUAGE`] when empty.
    pub language: String,
    pub data_sets: Vec<DataSet>,
    pub timezone: Option<String>,
    pub country_code: Option<String>,
    pub current_as_of: Option<DateTime<Utc>>,
    pub daily_start: Option<DateTime<Utc>>,
    pub daily_end: Option<DateTime<Utc>>,
    pub hourly_start: Option<DateTime<Utc>>,
    pub hourly_end: Option<DateTime<Utc>>,
}

impl WeatherRequest {
    pub fn new(latitude: f64, longitude: f64, data_sets: impl Into<Vec<DataSet>>) -> Self {
        Self { latitude, longitude, data_sets: data_sets.into(), ..Self::default() }
    }
}

impl Endpoint for WeatherRequest {
    fn path(&self) -> String {
        format!(
            "/api/v1/weather/{}/{}/{}",
            language_or_default(&self.language),
            self.latitude,
            self.longitude
        )
    }

    fn query(&self) -> Vec<(&'static str, String)> {
        let mut query = Vec::new();

        if !self.data_sets.is_empty() {
            let joined = self.data_sets.iter().map(DataSet::as_str).collect::<Vec<_>>().join(",");
            query.push(("dataSets", joined));
        }
        if let Some(tz) = &self.timezone {
            query.push(("timezone", tz.clone()));
        }
        if let Some(cc) = &self.country_code {
            query.push(("countryCode", cc.clone()));
        }

        let times = [
            ("currentAsOf", self.current_as_of),
            ("dailyStart", self.daily_start),
            ("dailyEnd", self.daily_end),
            ("hourlyStart", self.hourly_start),
            ("hourlyEnd", self.hourly_end),
        ];
        query.extend(times.into_iter().filter_map(|(k, v)| v.map(|t| (k, rfc3339(t)))));

        query
    }
}

/// Data sets available for a location.
#[derive(Debug, Clone, Default)]
pub struct AvailabilityRequest {
    pub latitude: f64,
    pub longitude: f64,
    pub country: Option<String>,
}

impl Endpoint for AvailabilityRequest {
    fn path(&self) -> String {
        format!("/api/v1/availability/{}/{}", self.latitude, self.longitude)
    }

    fn query(&self) -> Vec<(&'static str, String)> {
        self.country.iter().map(|c| ("country", c.clone())).collect()
    }
}

/// Details of one active weather alert.
#[derive(Debug, Clone, Default)]
pub struct WeatherAlertRequest {
    pub id: String,
    pub language: String,
}

impl Endpoint for WeatherAlertRequest {
    fn path(&self) -> String {
        format!("/api/v1/weatherAlert/{}/{}", language_or_default(&self.language), self.id)
    }
}

fn language_or_default(language: &str) -> &str {
    if language.is_empty() { DEFAULT_LANGUAGE } else { language }
}

fn rfc3339(t: DateTime<Utc>) -> String {
    t.to_rfc3339_opts(SecondsFormat::Secs, true)
}

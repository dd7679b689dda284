//! Response shapes.
//!
//! Only the fields callers commonly read are typed. Everything else is kept
//! as raw JSON in the `extra` maps and passed through untouched.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::request::DataSet;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WeatherResponse {
    pub current_weather: Option<CurrentWeather>,
    pub forecast_daily: Option<DailyForecast>,
    pub forecast_hourly: Option<HourlyForecast>,
    pub forecast_next_hour: Option<Value>,
    pub weather_alerts: Option<Value>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CurrentWeather {
    pub as_of: Option<DateTime<Utc>>,
    /// Degrees Celsius.
    pub temperature: f64,
    #[serde(default)]
    pub condition_code: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DailyForecast {
    #[serde(default)]
    pub days: Vec<DayWeatherConditions>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DayWeatherConditions {
    pub forecast_start: Option<DateTime<Utc>>,
    pub temperature_max: f64,
    pub temperature_min: f64,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HourlyForecast {
    #[serde(default)]
    pub hours: Vec<HourWeatherConditions>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HourWeatherConditions {
    pub forecast_start: Option<DateTime<Utc>>,
    pub temperature: f64,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AvailabilityResponse(pub Vec<DataSet>);

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WeatherAlertResponse {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub area_name: String,
    #[serde(default)]
    pub event_text: Vec<EventText>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EventText {
    #[serde(default)]
    pub language: String,
    pub text: String,
}

/// Body of a non-success response.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub reason: Option<String>,
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn weather_response_keeps_untyped_fields() {
        let body = json!({
            "currentWeather": {
                "asOf": "2024-06-01T12:00:00Z",
                "temperature": 21.5,
                "conditionCode": "Clear",
                "humidity": 0.4
            },
            "forecastHourly": {
                "hours": [{ "forecastStart": "2024-06-01T12:00:00Z", "temperature": 20.0 }]
            }
        });

        let parsed: WeatherResponse = serde_json::from_value(body).unwrap();
        let current = parsed.current_weather.unwrap();

        assert_eq!(current.temperature, 21.5);
        assert_eq!(current.condition_code, "Clear");
        assert_eq!(current.extra["humidity"], json!(0.4));
        assert_eq!(parsed.forecast_hourly.unwrap().hours[0].temperature, 20.0);
        assert!(parsed.forecast_daily.is_none());
    }

    #[test]
    fn availability_is_a_bare_array() {
        let parsed: AvailabilityResponse =
            serde_json::from_str(r#"["currentWeather","forecastDaily"]"#).unwrap();
        assert_eq!(parsed.0, vec![DataSet::CurrentWeather, DataSet::ForecastDaily]);
    }

    #[test]
    fn alert_event_text() {
        let parsed: WeatherAlertResponse = serde_json::from_value(json!({
            "id": "abc",
            "areaName": "El Paso County",
            "eventText": [{ "language": "en", "text": "Red flag warning" }],
            "severity": "severe"
        }))
        .unwrap();

        assert_eq!(parsed.event_text[0].text, "Red flag warning");
        assert_eq!(parsed.extra["severity"], "severe");
    }
}

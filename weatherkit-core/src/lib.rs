//! Client library for the WeatherKit REST API.
//!
//! This crate defines:
//! - Developer token issuance and caching (ES256 JSON Web Tokens)
//! - Request descriptors and lightly typed response models
//! - The HTTP client that attaches tokens, decompresses and decodes responses
//! - On-disk configuration shared with the `weatherkit` binary

pub mod api;
pub mod client;
pub mod config;
pub mod credentials;
pub mod error;
pub mod model;
pub mod request;

#[cfg(test)]
mod testutil;

pub use api::{WeatherApi, client_from_config};
pub use client::{Client, ClientBuilder, DEFAULT_BASE_URL, DEFAULT_USER_AGENT};
pub use config::{Config, CredentialsConfig};
pub use credentials::{Clock, Credentials, SystemClock, TokenIssuer, TokenSettings};
pub use error::{CredentialsError, Error, Result};
pub use model::{
    AvailabilityResponse, CurrentWeather, DailyForecast, ErrorResponse, HourlyForecast,
    WeatherAlertResponse, WeatherResponse,
};
pub use request::{AvailabilityRequest, DataSet, Endpoint, WeatherAlertRequest, WeatherRequest};

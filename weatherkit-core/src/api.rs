use std::fmt::Debug;

use async_trait::async_trait;

use crate::{
    Config,
    client::Client,
    credentials::Credentials,
    error::Result,
    model::{AvailabilityResponse, WeatherAlertResponse, WeatherResponse},
    request::{AvailabilityRequest, WeatherAlertRequest, WeatherRequest},
};

/// The WeatherKit operations, as an object-safe seam for callers and tests.
#[async_trait]
pub trait WeatherApi: Send + Sync + Debug {
    async fn weather(&self, request: &WeatherRequest) -> Result<WeatherResponse>;

    async fn availability(&self, request: &AvailabilityRequest) -> Result<AvailabilityResponse>;

    async fn alert(&self, request: &WeatherAlertRequest) -> Result<WeatherAlertResponse>;
}

#[async_trait]
impl WeatherApi for Client {
    async fn weather(&self, request: &WeatherRequest) -> Result<WeatherResponse> {
        Client::weather(self, request).await
    }

    async fn availability(&self, request: &AvailabilityRequest) -> Result<AvailabilityResponse> {
        Client::availability(self, request).await
    }

    async fn alert(&self, request: &WeatherAlertRequest) -> Result<WeatherAlertResponse> {
        Client::alert(self, request).await
    }
}

/// Construct a client from config.
///
/// Explicit `credentials` win over the `[credentials]` table; with neither the
/// client runs anonymously.
pub fn client_from_config(
    config: &Config,
    credentials: Option<Credentials>,
) -> anyhow::Result<Box<dyn WeatherApi>> {
    let credentials = match credentials {
        Some(credentials) => Some(credentials),
        None => config.credentials.as_ref().map(|c| c.load_credentials()).transpose()?,
    };

    let builder = config.client_builder()?;
    let client = match credentials {
        Some(credentials) => builder.credentials(credentials).build(),
        None => {
            tracing::info!(
                "no WeatherKit credentials configured, sending unauthenticated requests"
            );
            builder.build()
        }
    };

    Ok(Box::new(client))
}

use std::{borrow::Cow, io::Read, sync::Arc, time::Duration};

use flate2::read::GzDecoder;
use reqwest::header::{ACCEPT, ACCEPT_ENCODING, CONTENT_ENCODING, USER_AGENT};
use serde::de::DeserializeOwned;
use tracing::{debug, warn};

use crate::{
    credentials::{Clock, Credentials, TokenIssuer, TokenSettings},
    error::{CredentialsError, Error, Result},
    model::{AvailabilityResponse, ErrorResponse, WeatherAlertResponse, WeatherResponse},
    request::{AvailabilityRequest, Endpoint, WeatherAlertRequest, WeatherRequest},
};

/// User-Agent sent when none is configured.
pub const DEFAULT_USER_AGENT: &str = concat!("weatherkit-rs/", env!("CARGO_PKG_VERSION"));

pub const DEFAULT_BASE_URL: &str = "https://weatherkit.apple.com";

/// WeatherKit REST API client.
///
/// Cloning is cheap and clones share the token cache.
#[derive(Debug, Clone)]
pub struct Client {
    http: reqwest::Client,
    issuer: Option<Arc<TokenIssuer>>,
    user_agent: String,
    base_url: String,
    timeout: Option<Duration>,
}

impl Client {
    /// Authenticated client with default token settings.
    pub fn new(
        key_id: impl Into<String>,
        team_id: impl Into<String>,
        service_id: impl Into<String>,
        private_key: &str,
    ) -> std::result::Result<Self, CredentialsError> {
        let credentials = Credentials::new(key_id, team_id, service_id, private_key)?;
        Ok(Self::builder().credentials(credentials).build())
    }

    /// Client that sends requests without an `Authorization` header.
    pub fn anonymous() -> Self {
        Self::builder().build()
    }

    pub fn builder() -> ClientBuilder {
        ClientBuilder::default()
    }

    pub fn token_issuer(&self) -> Option<&TokenIssuer> {
        self.issuer.as_deref()
    }

    /// Current developer token, or `None` for an anonymous client.
    pub fn token(&self) -> std::result::Result<Option<String>, CredentialsError> {
        self.issuer.as_deref().map(TokenIssuer::token).transpose()
    }

    /// Weather data for the requested location and data sets.
    pub async fn weather(&self, request: &WeatherRequest) -> Result<WeatherResponse> {
        self.get(request).await
    }

    /// Data sets available for a location.
    pub async fn availability(
        &self,
        request: &AvailabilityRequest,
    ) -> Result<AvailabilityResponse> {
        self.get(request).await
    }

    /// Details of an active weather alert.
    pub async fn alert(&self, request: &WeatherAlertRequest) -> Result<WeatherAlertResponse> {
        self.get(request).await
    }

    async fn get<T>(&self, request: &(impl Endpoint + Sync)) -> Result<T>
    where
        T: DeserializeOwned + Default,
    {
        let url = format!("{}{}", self.base_url.trim_end_matches('/'), request.path());

        // Resolved before the first await so that dropping the future never touches the cache.
        let token = self.token()?;

        let mut builder = self
            .http
            .get(&url)
            .query(&request.query())
            .header(USER_AGENT, &self.user_agent)
            .header(ACCEPT, "application/json; charset=utf-8")
            .header(ACCEPT_ENCODING, "gzip");

        let authenticated = token.is_some();
        if let Some(token) = token {
            builder = builder.bearer_auth(token);
        }
        if let Some(timeout) = self.timeout {
            builder = builder.timeout(timeout);
        }

        debug!(%url, authenticated, "sending WeatherKit request");
        let response = builder.send().await?;

        let status = response.status();
        // Every declared encoding is read as gzip, the only one requested.
        let gzipped = response.headers().get(CONTENT_ENCODING).is_some_and(|v| !v.is_empty());
        let bytes = response.bytes().await?;
        debug!(%status, gzipped, len = bytes.len(), "received WeatherKit response");

        let body = decompress(&bytes, gzipped)?;

        if !status.is_success() {
            let reason = decode::<ErrorResponse>(&body).ok().and_then(|e| e.reason);
            warn!(%status, ?reason, %url, "WeatherKit request failed");
            return Err(Error::Api { status, reason });
        }

        decode(&body)
    }
}

/// Configures a [`Client`].
#[derive(Debug, Default)]
pub struct ClientBuilder {
    credentials: Option<Credentials>,
    settings: TokenSettings,
    clock: Option<Arc<dyn Clock>>,
    user_agent: Option<String>,
    base_url: Option<String>,
    timeout: Option<Duration>,
    http: Option<reqwest::Client>,
}

impl ClientBuilder {
    pub fn credentials(mut self, credentials: Credentials) -> Self {
        self.credentials = Some(credentials);
        self
    }

    pub fn token_settings(mut self, settings: TokenSettings) -> Self {
        self.settings = settings;
        self
    }

    pub fn clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = Some(clock);
        self
    }

    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = Some(user_agent.into());
        self
    }

    pub fn base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into());
        self
    }

    /// Per-request timeout covering connect, send and body read.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn http_client(mut self, http: reqwest::Client) -> Self {
        self.http = Some(http);
        self
    }

    pub fn build(self) -> Client {
        let issuer = self.credentials.map(|credentials| {
            let issuer = TokenIssuer::new(credentials).with_settings(self.settings);
            let issuer = match self.clock {
                Some(clock) => issuer.with_clock(clock),
                None => issuer,
            };
            Arc::new(issuer)
        });

        Client {
            http: self.http.unwrap_or_default(),
            issuer,
            user_agent: self
                .user_agent
                .filter(|ua| !ua.is_empty())
                .unwrap_or_else(|| DEFAULT_USER_AGENT.to_string()),
            base_url: self.base_url.unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
            timeout: self.timeout,
        }
    }
}

fn decompress(body: &[u8], gzipped: bool) -> Result<Cow<'_, [u8]>> {
    if !gzipped {
        return Ok(Cow::Borrowed(body));
    }

    let mut out = Vec::new();
    GzDecoder::new(body).read_to_end(&mut out).map_err(Error::Decompress)?;
    Ok(Cow::Owned(out))
}

/// An empty body decodes to `T::default()`.
fn decode<T>(body: &[u8]) -> Result<T>
where
    T: DeserializeOwned + Default,
{
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(T::default());
    }
    Ok(serde_json::from_slice(body)?)
}

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use inquire::Text;
use tracing::debug;
use weatherkit_core::{
    AvailabilityRequest, Config, Credentials, CredentialsConfig, DataSet, WeatherAlertRequest,
    WeatherApi, WeatherRequest, client_from_config,
};

use crate::logging::{LogFormat, LogLevel};

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "weatherkit", version, about = "WeatherKit REST API client")]
pub struct Cli {
    #[command(flatten)]
    pub credentials: CredentialArgs,

    #[arg(long, env = "LOG_LEVEL", value_enum, global = true)]
    pub log_level: Option<LogLevel>,

    #[arg(long, value_enum, default_value_t = LogFormat::Compact, global = true)]
    pub log_format: LogFormat,

    #[command(subcommand)]
    pub command: Command,
}

/// Credentials taken from flags or the environment, overriding the config file.
#[derive(Debug, Default, Args)]
pub struct CredentialArgs {
    /// Key identifier of the signing key.
    #[arg(long, env = "WEATHER_KIT_KID", global = true)]
    pub key_id: Option<String>,

    /// Team identifier (token issuer).
    #[arg(long, env = "WEATHER_KIT_ISS", global = true)]
    pub team_id: Option<String>,

    /// Service identifier (token subject).
    #[arg(long, env = "WEATHER_KIT_SUB", global = true)]
    pub service_id: Option<String>,

    /// PEM encoded private key contents.
    #[arg(long, env = "WEATHER_KIT_PRIVATE_KEY", hide_env_values = true, global = true)]
    pub private_key: Option<String>,
}

impl CredentialArgs {
    /// `None` when nothing was supplied; any partial set is validated and rejected.
    pub fn resolve(&self) -> Result<Option<Credentials>> {
        let fields = [&self.key_id, &self.team_id, &self.service_id, &self.private_key];
        if fields.iter().all(|f| f.is_none()) {
            return Ok(None);
        }

        let get = |f: &Option<String>| f.clone().unwrap_or_default();
        let credentials = Credentials::new(
            get(&self.key_id),
            get(&self.team_id),
            get(&self.service_id),
            &get(&self.private_key),
        )
        .context("Invalid WeatherKit credentials from flags/environment")?;

        Ok(Some(credentials))
    }
}

#[derive(Debug, Clone, Args)]
pub struct Location {
    #[arg(long, allow_hyphen_values = true)]
    pub lat: f64,

    #[arg(long, allow_hyphen_values = true)]
    pub lon: f64,

    /// Response language.
    #[arg(long, default_value = "en")]
    pub lang: String,
}

impl Location {
    fn request(&self, data_sets: Vec<DataSet>) -> WeatherRequest {
        WeatherRequest {
            language: self.lang.clone(),
            ..WeatherRequest::new(self.lat, self.lon, data_sets)
        }
    }
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Store credentials in the config file.
    Configure,

    #[command(flatten)]
    Query(Query),
}

#[derive(Debug, Subcommand)]
pub enum Query {
    /// Print the current temperature.
    Current {
        #[command(flatten)]
        location: Location,
    },

    /// Print the hourly forecast temperatures.
    Hourly {
        #[command(flatten)]
        location: Location,

        /// Number of hours to print.
        #[arg(long, default_value_t = 12)]
        hours: usize,
    },

    /// Print the daily min/max temperatures.
    Daily {
        #[command(flatten)]
        location: Location,
    },

    /// Fetch any combination of data sets and print the raw JSON.
    Weather {
        #[command(flatten)]
        location: Location,

        /// Comma separated data sets, e.g. currentWeather,forecastDaily.
        #[arg(long, value_delimiter = ',', value_parser = parse_data_set, required = true)]
        data_sets: Vec<DataSet>,
    },

    /// List the data sets available for a location.
    Availability {
        #[arg(long, allow_hyphen_values = true)]
        lat: f64,

        #[arg(long, allow_hyphen_values = true)]
        lon: f64,

        /// ISO country code.
        #[arg(long)]
        country: Option<String>,
    },

    /// Print the text of a weather alert.
    Alert {
        id: String,

        #[arg(long, default_value = "en")]
        lang: String,
    },
}

fn parse_data_set(value: &str) -> Result<DataSet> {
    DataSet::try_from(value)
}

impl Cli {
    pub async fn run(self) -> Result<()> {
        let query = match self.command {
            Command::Configure => return configure(),
            Command::Query(query) => query,
        };

        let config = Config::load()?;
        let api = client_from_config(&config, self.credentials.resolve()?)?;
        debug!(?api, "client ready");

        run_query(api.as_ref(), query).await
    }
}

async fn run_query(api: &dyn WeatherApi, query: Query) -> Result<()> {
    match query {
        Query::Current { location } => {
            let weather = api.weather(&location.request(vec![DataSet::CurrentWeather])).await?;
            let current = weather
                .current_weather
                .context("Response contained no current weather")?;
            println!("{:.1}°C ({})", current.temperature, current.condition_code);
        }
        Query::Hourly { location, hours } => {
            let weather = api.weather(&location.request(vec![DataSet::ForecastHourly])).await?;
            let forecast =
                weather.forecast_hourly.context("Response contained no hourly forecast")?;
            for hour in forecast.hours.iter().take(hours) {
                println!("{}  {:.1}°C", fmt_time(hour.forecast_start), hour.temperature);
            }
        }
        Query::Daily { location } => {
            let weather = api.weather(&location.request(vec![DataSet::ForecastDaily])).await?;
            let forecast = weather.forecast_daily.context("Response contained no daily forecast")?;
            for day in &forecast.days {
                println!(
                    "{}  min {:.1}°C  max {:.1}°C",
                    fmt_time(day.forecast_start),
                    day.temperature_min,
                    day.temperature_max
                );
            }
        }
        Query::Weather { location, data_sets } => {
            let weather = api.weather(&location.request(data_sets)).await?;
            println!("{}", serde_json::to_string_pretty(&weather)?);
        }
        Query::Availability { lat, lon, country } => {
            let request = AvailabilityRequest { latitude: lat, longitude: lon, country };
            let availability = api.availability(&request).await?;
            for data_set in availability.0 {
                println!("{data_set}");
            }
        }
        Query::Alert { id, lang } => {
            let alert = api.alert(&WeatherAlertRequest { id, language: lang }).await?;
            for text in &alert.event_text {
                println!("{}", text.text);
            }
        }
    }

    Ok(())
}

fn configure() -> Result<()> {
    let mut config = Config::load()?;
    let existing = config.credentials.clone();
    let default =
        |f: fn(&CredentialsConfig) -> String| existing.as_ref().map(f).unwrap_or_default();

    let key_id = Text::new("Key ID:")
        .with_default(&default(|c: &CredentialsConfig| c.key_id.clone()))
        .prompt()?;
    let team_id = Text::new("Team ID:")
        .with_default(&default(|c: &CredentialsConfig| c.team_id.clone()))
        .prompt()?;
    let service_id = Text::new("Service ID:")
        .with_default(&default(|c: &CredentialsConfig| c.service_id.clone()))
        .prompt()?;
    let private_key_path = Text::new("Path to private key (.p8 or SEC1 .pem):")
        .with_default(&default(|c: &CredentialsConfig| c.private_key_path.display().to_string()))
        .prompt()?;

    let credentials = CredentialsConfig {
        key_id,
        team_id,
        service_id,
        private_key_path: PathBuf::from(private_key_path),
    };
    credentials.load_credentials()?;

    config.set_credentials(credentials);
    let path = config.save()?;
    println!("Saved configuration to {}", path.display());

    Ok(())
}

fn fmt_time(t: Option<chrono::DateTime<chrono::Utc>>) -> String {
    t.map(|t| t.format("%Y-%m-%d %H:%M").to_string()).unwrap_or_else(|| "?".to_string())
}

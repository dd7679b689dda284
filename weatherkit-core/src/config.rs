use anyhow::{Context, Result, anyhow};
use chrono::Duration;
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::{Path, PathBuf},
};

use crate::{
    client::{Client, ClientBuilder},
    credentials::{Credentials, TokenSettings},
};

/// Developer account identifiers and the location of the `.p8` signing key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CredentialsConfig {
    pub key_id: String,
    pub team_id: String,
    pub service_id: String,
    pub private_key_path: PathBuf,
}

impl CredentialsConfig {
    /// Reads the key file and builds signing credentials.
    pub fn load_credentials(&self) -> Result<Credentials> {
        let pem = fs::read_to_string(&self.private_key_path).with_context(|| {
            format!("Failed to read private key: {}", self.private_key_path.display())
        })?;

        Credentials::new(&self.key_id, &self.team_id, &self.service_id, &pem)
            .with_context(|| format!("Invalid credentials for key id '{}'", self.key_id))
    }
}

/// Top-level configuration stored on disk.
///
/// Example TOML:
/// ```toml
/// timeout_secs = 10
///
/// [credentials]
/// key_id = "ABC123DEFG"
/// team_id = "TEAM456XYZ"
/// service_id = "com.example.weather"
/// private_key_path = "/home/me/AuthKey_ABC123DEFG.p8"
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    pub user_agent: Option<String>,
    pub base_url: Option<String>,
    pub token_duration_secs: Option<u64>,
    pub max_clock_skew_secs: Option<u64>,
    pub timeout_secs: Option<u64>,
    pub credentials: Option<CredentialsConfig>,
}

impl Config {
    /// Load config from the platform config directory, or return an empty default
    /// if it doesn't exist yet.
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_file_path()?)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            // First run: no config file, return empty.
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let cfg: Config = toml::from_str(&contents)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(cfg)
    }

    /// Save config to the platform config directory, creating parent directories as needed.
    pub fn save(&self) -> Result<PathBuf> {
        let path = Self::config_file_path()?;
        self.save_to(&path)?;
        Ok(path)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create config directory: {}", parent.display())
            })?;
        }

        let toml =
            toml::to_string_pretty(self).context("Failed to serialize configuration to TOML")?;

        fs::write(path, toml)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;

        Ok(())
    }

    /// Path to the config file.
    pub fn config_file_path() -> Result<PathBuf> {
        let dirs = ProjectDirs::from("dev", "weatherkit", "weatherkit-cli")
            .ok_or_else(|| anyhow!("Could not determine platform config directory"))?;

        Ok(dirs.config_dir().join("config.toml"))
    }

    /// Token lifetimes, falling back to the defaults for unset values.
    pub fn token_settings(&self) -> Result<TokenSettings> {
        let defaults = TokenSettings::default();

        Ok(TokenSettings {
            token_duration: seconds(self.token_duration_secs, "token_duration_secs")?
                .unwrap_or(defaults.token_duration),
            max_clock_skew: seconds(self.max_clock_skew_secs, "max_clock_skew_secs")?
                .unwrap_or(defaults.max_clock_skew),
        })
    }

    /// Client builder with everything but credentials applied.
    pub fn client_builder(&self) -> Result<ClientBuilder> {
        let mut builder = Client::builder().token_settings(self.token_settings()?);

        if let Some(ua) = &self.user_agent {
            builder = builder.user_agent(ua.clone());
        }
        if let Some(url) = &self.base_url {
            builder = builder.base_url(url.clone());
        }
        if let Some(secs) = self.timeout_secs {
            builder = builder.timeout(std::time::Duration::from_secs(secs));
        }

        Ok(builder)
    }

    pub fn set_credentials(&mut self, credentials: CredentialsConfig) {
        self.credentials = Some(credentials);
    }

    pub fn has_credentials(&self) -> bool {
        self.credentials.is_some()
    }
}

fn seconds(value: Option<u64>, field: &str) -> Result<Option<Duration>> {
    value
        .map(|secs| {
            i64::try_from(secs)
                .ok()
                .and_then(Duration::try_seconds)
                .ok_or_else(|| anyhow!("'{field}' is out of range: {secs}"))
        })
        .transpose()
}

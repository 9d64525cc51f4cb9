use anyhow::{Context, Result};
use reqwest::Client;
use std::time::Duration;

use crate::constants::{
    ACCEPT_LANGUAGE, NOMINATIM_API_BASE, OPEN_METEO_API_BASE, OPEN_METEO_ARCHIVE_BASE,
    REQUEST_TIMEOUT_SECS, USER_AGENT,
};

const ENV_NOMINATIM_URL: &str = "LOCATION_WEATHER_NOMINATIM_URL";
const ENV_OPEN_METEO_URL: &str = "LOCATION_WEATHER_OPEN_METEO_URL";
const ENV_ARCHIVE_URL: &str = "LOCATION_WEATHER_ARCHIVE_URL";
const ENV_TIMEOUT_SECS: &str = "LOCATION_WEATHER_TIMEOUT_SECS";

/// Upstream endpoints and transport settings supplied by the host process
#[derive(Debug, Clone)]
pub struct Config {
    pub nominatim_base: String,
    pub open_meteo_base: String,
    pub archive_base: String,
    pub timeout: Duration,
    pub accept_language: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            nominatim_base: NOMINATIM_API_BASE.to_string(),
            open_meteo_base: OPEN_METEO_API_BASE.to_string(),
            archive_base: OPEN_METEO_ARCHIVE_BASE.to_string(),
            timeout: Duration::from_secs(REQUEST_TIMEOUT_SECS),
            accept_language: ACCEPT_LANGUAGE.to_string(),
        }
    }
}

impl Config {
    /// Builds a config from the process environment, falling back to defaults
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(url) = lookup(ENV_NOMINATIM_URL) {
            config.nominatim_base = url;
        }
        if let Some(url) = lookup(ENV_OPEN_METEO_URL) {
            config.open_meteo_base = url;
        }
        if let Some(url) = lookup(ENV_ARCHIVE_URL) {
            config.archive_base = url;
        }
        if let Some(secs) = lookup(ENV_TIMEOUT_SECS) {
            let secs: u64 = secs
                .trim()
                .parse()
                .with_context(|| format!("{} must be a whole number of seconds", ENV_TIMEOUT_SECS))?;
            config.timeout = Duration::from_secs(secs);
        }

        Ok(config.normalized())
    }

    /// Points every upstream at one base URL (used against mock servers)
    pub fn with_base_url(base: &str) -> Self {
        Self {
            nominatim_base: base.to_string(),
            open_meteo_base: base.to_string(),
            archive_base: base.to_string(),
            ..Self::default()
        }
        .normalized()
    }

    fn normalized(mut self) -> Self {
        for base in [
            &mut self.nominatim_base,
            &mut self.open_meteo_base,
            &mut self.archive_base,
        ] {
            let trimmed = base.trim_end_matches('/').len();
            base.truncate(trimmed);
        }
        self
    }

    /// Shared HTTP client carrying the client identifier and timeout
    pub fn http_client(&self) -> Result<Client> {
        let client = Client::builder()
            .user_agent(USER_AGENT)
            .timeout(self.timeout)
            .build()?;
        Ok(client)
    }
}

//! Current conditions and today's aggregates from the Open-Meteo forecast API.

use reqwest::Client;
use std::sync::Arc;

use crate::config::Config;
use crate::error::FetchError;
use crate::models::{Coordinate, OpenMeteoForecastResponse, WeatherSnapshot};

/// Precipitation reported when the provider leaves today's sum out
pub const DEFAULT_PRECIPITATION: f64 = 0.0;

#[derive(Debug, Clone)]
pub struct WeatherResolver {
    client: Arc<Client>,
    base_url: String,
}

impl WeatherResolver {
    pub fn new(client: Arc<Client>, config: &Config) -> Self {
        Self {
            client,
            base_url: config.open_meteo_base.clone(),
        }
    }

    /// Fetches a snapshot for `coord`, or `None` if the forecast is unusable
    pub async fn resolve(&self, coord: Coordinate) -> Option<WeatherSnapshot> {
        match self.fetch(coord).await.and_then(normalize_forecast) {
            Ok(snapshot) => Some(snapshot),
            Err(e) => {
                tracing::warn!(kind = e.kind(), %coord, error = %e, "Weather lookup failed");
                None
            }
        }
    }

    fn request_url(&self, coord: Coordinate) -> String {
        format!(
            "{}/forecast?latitude={}&longitude={}&current_weather=true&daily=temperature_2m_max,temperature_2m_min,precipitation_sum&timezone=auto",
            self.base_url, coord.latitude, coord.longitude
        )
    }

    async fn fetch(&self, coord: Coordinate) -> Result<OpenMeteoForecastResponse, FetchError> {
        let url = self.request_url(coord);
        tracing::debug!("Requesting forecast: {}", url);

        let response = self.client.get(&url).send().await?;

        if !response.status().is_success() {
            return Err(FetchError::Status(response.status()));
        }

        let body = response.text().await?;
        Ok(serde_json::from_str(&body)?)
    }
}

/// Builds a snapshot from a forecast payload.
///
/// Both `current_weather` and `daily` must be present. Inside them, each
/// missing value is substituted on its own: precipitation falls back to
/// [`DEFAULT_PRECIPITATION`], everything else to unknown (`None`).
pub fn normalize_forecast(response: OpenMeteoForecastResponse) -> Result<WeatherSnapshot, FetchError> {
    let current = response
        .current_weather
        .ok_or(FetchError::Schema("current_weather"))?;
    let daily = response.daily.ok_or(FetchError::Schema("daily"))?;

    Ok(WeatherSnapshot {
        temp: current.temperature,
        wind: current.windspeed,
        precipitation: today(&daily.precipitation_sum).unwrap_or(DEFAULT_PRECIPITATION),
        temp_max: today(&daily.temperature_max),
        temp_min: today(&daily.temperature_min),
    })
}

/// Index 0 of a day-indexed series
fn today(series: &Option<Vec<Option<f64>>>) -> Option<f64> {
    series.as_ref()?.first().copied().flatten()
}

use anyhow::Result;
use std::sync::Arc;

use crate::address::AddressResolver;
use crate::config::Config;
use crate::models::{AddressRecord, Coordinate, LocationWeatherResult, WeatherSnapshot};
use crate::weather::WeatherResolver;

/// Runs the address and weather lookups side by side and merges them
#[derive(Debug, Clone)]
pub struct LocationWeatherAggregator {
    address: AddressResolver,
    weather: WeatherResolver,
}

impl LocationWeatherAggregator {
    pub fn new(address: AddressResolver, weather: WeatherResolver) -> Self {
        Self { address, weather }
    }

    /// Builds both resolvers on one shared HTTP client
    pub fn from_config(config: &Config) -> Result<Self> {
        let client = Arc::new(config.http_client()?);
        Ok(Self::new(
            AddressResolver::new(client.clone(), config),
            WeatherResolver::new(client, config),
        ))
    }

    pub fn address(&self) -> &AddressResolver {
        &self.address
    }

    pub fn weather(&self) -> &WeatherResolver {
        &self.weather
    }

    /// Address and weather for `coord`.
    ///
    /// Returns `None` only when the weather lookup fails. Both requests are
    /// in flight together and the result is assembled once both settle.
    pub async fn lookup(&self, coord: Coordinate) -> Option<LocationWeatherResult> {
        let (address, weather) = tokio::join!(
            self.address.resolve(coord),
            self.weather.resolve(coord)
        );

        let result = combine(address, weather);
        if result.is_none() {
            tracing::info!(%coord, "No weather for coordinate, dropping result");
        }
        result
    }
}

/// Partial-failure policy: weather is mandatory, the address is not.
pub fn combine(
    address: Option<AddressRecord>,
    weather: Option<WeatherSnapshot>,
) -> Option<LocationWeatherResult> {
    weather.map(|weather| LocationWeatherResult {
        location: address,
        weather,
    })
}

use anyhow::Result;
use rmcp::{
    handler::server::{tool::ToolRouter, wrapper::Parameters, ServerHandler},
    model::{CallToolResult, Content, Implementation, ProtocolVersion, ServerCapabilities, ServerInfo},
    tool, tool_handler, tool_router,
    ErrorData as McpError,
};
use std::sync::Arc;

use crate::address::AddressResolver;
use crate::aggregator::LocationWeatherAggregator;
use crate::config::Config;
use crate::constants::DEFAULT_HISTORY_DAYS;
use crate::formatters::{format_address, format_history, format_location_weather, format_weather};
use crate::history::{summarize, HistoryResolver};
use crate::models::{Coordinate, GetHistoryRequest, GetLocationRequest};
use crate::weather::WeatherResolver;

/// MCP server exposing address and weather lookups for a coordinate
#[derive(Clone)]
pub struct LocationWeather {
    aggregator: LocationWeatherAggregator,
    history: HistoryResolver,
    tool_router: ToolRouter<Self>,
}

impl LocationWeather {
    /// Creates the service with one HTTP client shared by every upstream
    pub fn new(config: &Config) -> Result<Self> {
        let client = Arc::new(config.http_client()?);

        let aggregator = LocationWeatherAggregator::new(
            AddressResolver::new(client.clone(), config),
            WeatherResolver::new(client.clone(), config),
        );

        Ok(Self {
            aggregator,
            history: HistoryResolver::new(client, config),
            tool_router: Self::tool_router(),
        })
    }
}

#[tool_handler]
impl ServerHandler for LocationWeather {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            protocol_version: ProtocolVersion::V_2024_11_05,
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            server_info: Implementation {
                name: "mcp-location-weather".to_string(),
                version: env!("CARGO_PKG_VERSION").to_string(),
                icons: None,
                title: None,
                website_url: None,
            },
            instructions: Some(
                "Resolves a coordinate into a street address (OpenStreetMap Nominatim) and \
                current weather with today's forecast (Open-Meteo). Weather history for the \
                past days is also available."
                    .to_string(),
            ),
        }
    }
}

#[tool_router]
impl LocationWeather {
    /// Gets the address and current weather for a coordinate
    #[tool(description = "Get the human-readable address and current weather for a coordinate. Provide latitude and longitude (e.g., latitude: 10.7769, longitude: 106.7009 for Ho Chi Minh City). The address is omitted if it cannot be resolved; no result is returned if weather is unavailable.")]
    async fn get_location_weather(
        &self,
        Parameters(request): Parameters<GetLocationRequest>,
    ) -> Result<CallToolResult, McpError> {
        let coord = Coordinate::from(&request);
        tracing::info!("Getting location weather for coordinates: {}", coord);

        let Some(result) = self.aggregator.lookup(coord).await else {
            return Ok(CallToolResult::success(vec![Content::text(format!(
                "Weather data is unavailable for {}.",
                coord
            ))]));
        };

        let formatted = format_location_weather(&result);

        Ok(CallToolResult::success(vec![
            Content::text(formatted),
            Content::json(&result)?,
        ]))
    }

    /// Gets only the address for a coordinate
    #[tool(description = "Reverse-geocode a coordinate into an address (province, city, district, road). Provide latitude and longitude.")]
    async fn get_address(
        &self,
        Parameters(request): Parameters<GetLocationRequest>,
    ) -> Result<CallToolResult, McpError> {
        let coord = Coordinate::from(&request);
        tracing::info!("Getting address for coordinates: {}", coord);

        let address = self.aggregator.address().resolve(coord).await;
        let mut content = vec![Content::text(format_address(address.as_ref()))];
        if let Some(address) = &address {
            content.push(Content::json(address)?);
        }

        Ok(CallToolResult::success(content))
    }

    /// Gets only the weather snapshot for a coordinate
    #[tool(description = "Get current temperature, wind speed and today's precipitation and temperature range for a coordinate. Provide latitude and longitude.")]
    async fn get_weather(
        &self,
        Parameters(request): Parameters<GetLocationRequest>,
    ) -> Result<CallToolResult, McpError> {
        let coord = Coordinate::from(&request);
        tracing::info!("Getting weather for coordinates: {}", coord);

        let Some(weather) = self.aggregator.weather().resolve(coord).await else {
            return Ok(CallToolResult::success(vec![Content::text(format!(
                "Weather data is unavailable for {}.",
                coord
            ))]));
        };

        Ok(CallToolResult::success(vec![
            Content::text(format_weather(&weather)),
            Content::json(&weather)?,
        ]))
    }

    /// Gets the daily weather history for a coordinate
    #[tool(description = "Get daily weather history (temperature, rain, snow, wind) for the past days up to yesterday. Provide latitude and longitude, and optionally days (default 30, max 92).")]
    async fn get_weather_history(
        &self,
        Parameters(request): Parameters<GetHistoryRequest>,
    ) -> Result<CallToolResult, McpError> {
        let coord = Coordinate::from(&request);
        tracing::info!(
            "Getting {} days of history for coordinates: {}",
            request.days.unwrap_or(DEFAULT_HISTORY_DAYS),
            coord
        );

        let today = chrono::Local::now().date_naive();
        let history = self
            .history
            .fetch(coord, request.days, today)
            .await
            .map_err(|e| {
                McpError::internal_error(format!("Failed to fetch weather history: {}", e), None)
            })?;

        let mut content = vec![
            Content::text(format_history(&history)),
            Content::json(&history)?,
        ];
        if let Some(summary) = summarize(&history) {
            content.push(Content::json(&summary)?);
        }

        Ok(CallToolResult::success(content))
    }
}

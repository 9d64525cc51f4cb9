//! Address and current weather for a coordinate.
//!
//! Reverse geocoding (Nominatim) and the forecast (Open-Meteo) are queried
//! concurrently and merged into one [`LocationWeatherResult`]. The address
//! is optional; without weather there is no result.

pub mod address;
pub mod aggregator;
pub mod analysis;
pub mod config;
pub mod constants;
pub mod error;
pub mod formatters;
pub mod history;
pub mod models;
pub mod service;
pub mod weather;

pub use address::AddressResolver;
pub use aggregator::LocationWeatherAggregator;
pub use config::Config;
pub use error::FetchError;
pub use history::HistoryResolver;
pub use models::{AddressRecord, Coordinate, LocationWeatherResult, WeatherSnapshot};
pub use service::LocationWeather;
pub use weather::WeatherResolver;

use chrono::NaiveDate;
use schemars::JsonSchema;
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

// ============================================================================
// Domain Models
// ============================================================================

/// A point on the globe in decimal degrees. Not validated; bad values are
/// forwarded upstream and show up as failed lookups.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinate {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }
}

impl fmt::Display for Coordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}, {}", self.latitude, self.longitude)
    }
}

/// Normalized reverse-geocoding result. Never constructed with every field
/// empty; that case is reported as "no address" instead.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AddressRecord {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub full: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub province: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub district: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub road: Option<String>,
}

impl AddressRecord {
    pub fn is_empty(&self) -> bool {
        self.full.is_none()
            && self.province.is_none()
            && self.city.is_none()
            && self.district.is_none()
            && self.road.is_none()
    }
}

/// Current conditions plus today's aggregates.
///
/// `None` marks a value the forecast provider did not report. Precipitation
/// has no unknown state; a missing amount is reported as zero.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherSnapshot {
    pub temp: Option<f64>,
    pub wind: Option<f64>,
    pub precipitation: f64,
    pub temp_max: Option<f64>,
    pub temp_min: Option<f64>,
}

/// Combined answer for one coordinate. `location` is `None` when the address
/// lookup failed; the weather part is always present.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LocationWeatherResult {
    pub location: Option<AddressRecord>,
    pub weather: WeatherSnapshot,
}

/// Dry/normal/wet label derived from a daily rain amount
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RainCondition {
    Dry,
    Normal,
    Wet,
}

impl RainCondition {
    /// Below 1 mm is dry, below 10 mm normal, anything more wet
    pub fn from_rain_mm(rain: f64) -> Self {
        if rain < 1.0 {
            Self::Dry
        } else if rain < 10.0 {
            Self::Normal
        } else {
            Self::Wet
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            Self::Dry => "Dry",
            Self::Normal => "Normal",
            Self::Wet => "Wet",
        }
    }
}

/// One day of archived observations with gaps already filled
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyObservation {
    pub date: NaiveDate,
    pub temp_max: f64,
    pub temp_min: f64,
    pub temp_mean: f64,
    pub rain: f64,
    pub snow: f64,
    pub wind_max: f64,
    pub condition: RainCondition,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherHistory {
    pub start: NaiveDate,
    pub end: NaiveDate,
    pub days: Vec<DailyObservation>,
}

/// Window averages over a [`WeatherHistory`], the window's rain label and a
/// next-day mean temperature estimate when there is enough data for one
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistorySummary {
    pub avg_temp_max: f64,
    pub avg_temp_min: f64,
    pub avg_temp_mean: f64,
    pub avg_wind_max: f64,
    pub avg_rain: f64,
    pub condition: RainCondition,
    pub next_day_temp_mean: Option<f64>,
}

// ============================================================================
// Nominatim API Models
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct NominatimResponse {
    pub display_name: Option<String>,
    pub address: Option<NominatimAddress>,
}

#[derive(Debug, Default, Deserialize)]
pub struct NominatimAddress {
    pub state: Option<String>,
    pub city: Option<String>,
    pub town: Option<String>,
    pub village: Option<String>,
    pub suburb: Option<String>,
    pub county: Option<String>,
    pub road: Option<String>,
}

// ============================================================================
// Open-Meteo API Models
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct OpenMeteoForecastResponse {
    pub current_weather: Option<CurrentWeatherData>,
    pub daily: Option<ForecastDailyData>,
}

// Values inside the forecast sections decode leniently: a wrongly typed
// field reads as absent so only that field falls back to its default.

#[derive(Debug, Deserialize)]
pub struct CurrentWeatherData {
    #[serde(default, deserialize_with = "lenient_number")]
    pub temperature: Option<f64>,
    #[serde(default, deserialize_with = "lenient_number")]
    pub windspeed: Option<f64>,
}

#[derive(Debug, Deserialize)]
pub struct ForecastDailyData {
    #[serde(rename = "temperature_2m_max", default, deserialize_with = "lenient_series")]
    pub temperature_max: Option<Vec<Option<f64>>>,
    #[serde(rename = "temperature_2m_min", default, deserialize_with = "lenient_series")]
    pub temperature_min: Option<Vec<Option<f64>>>,
    #[serde(default, deserialize_with = "lenient_series")]
    pub precipitation_sum: Option<Vec<Option<f64>>>,
}

fn lenient_number<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(serde_json::Value::deserialize(deserializer)?.as_f64())
}

fn lenient_series<'de, D>(deserializer: D) -> Result<Option<Vec<Option<f64>>>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    Ok(value
        .as_array()
        .map(|items| items.iter().map(serde_json::Value::as_f64).collect()))
}

#[derive(Debug, Deserialize)]
pub struct OpenMeteoArchiveResponse {
    pub daily: Option<ArchiveDailyData>,
}

#[derive(Debug, Deserialize)]
pub struct ArchiveDailyData {
    pub time: Option<Vec<String>>,
    #[serde(rename = "temperature_2m_max")]
    pub temperature_max: Option<Vec<Option<f64>>>,
    #[serde(rename = "temperature_2m_min")]
    pub temperature_min: Option<Vec<Option<f64>>>,
    #[serde(rename = "temperature_2m_mean")]
    pub temperature_mean: Option<Vec<Option<f64>>>,
    pub rain_sum: Option<Vec<Option<f64>>>,
    pub snowfall_sum: Option<Vec<Option<f64>>>,
    #[serde(rename = "windspeed_10m_max")]
    pub wind_speed_max: Option<Vec<Option<f64>>>,
}

// ============================================================================
// MCP Tool Request Models
// ============================================================================

#[derive(Debug, Deserialize, Serialize, JsonSchema)]
pub struct GetLocationRequest {
    /// Latitude in decimal degrees
    pub latitude: f64,
    /// Longitude in decimal degrees
    pub longitude: f64,
}

impl From<&GetLocationRequest> for Coordinate {
    fn from(request: &GetLocationRequest) -> Self {
        Coordinate::new(request.latitude, request.longitude)
    }
}

#[derive(Debug, Deserialize, Serialize, JsonSchema)]
pub struct GetHistoryRequest {
    /// Latitude in decimal degrees
    pub latitude: f64,
    /// Longitude in decimal degrees
    pub longitude: f64,
    /// Number of past days to load, ending yesterday (default 30, max 92)
    pub days: Option<u32>,
}

impl From<&GetHistoryRequest> for Coordinate {
    fn from(request: &GetHistoryRequest) -> Self {
        Coordinate::new(request.latitude, request.longitude)
    }
}

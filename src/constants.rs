/// Client identifier sent with every upstream request
pub const USER_AGENT: &str = "qt-weather-map";

/// Nominatim (OpenStreetMap) reverse-geocoding base URL
pub const NOMINATIM_API_BASE: &str = "https://nominatim.openstreetmap.org";

/// Open-Meteo forecast API base URL
pub const OPEN_METEO_API_BASE: &str = "https://api.open-meteo.com/v1";

/// Open-Meteo historical archive API base URL
pub const OPEN_METEO_ARCHIVE_BASE: &str = "https://archive-api.open-meteo.com/v1";

/// Language preference for address components
pub const ACCEPT_LANGUAGE: &str = "vi";

/// Nominatim zoom level for building/street granularity
pub const REVERSE_ZOOM: u8 = 18;

/// Default per-request timeout in seconds
pub const REQUEST_TIMEOUT_SECS: u64 = 10;

/// Default length of the history window in days
pub const DEFAULT_HISTORY_DAYS: u32 = 30;

/// Longest history window a single request may ask for
pub const MAX_HISTORY_DAYS: u32 = 92;

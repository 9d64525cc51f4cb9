//! Trailing daily history from the Open-Meteo archive API.
//!
//! Unlike the snapshot resolvers, failures here are returned to the caller.

use chrono::{Duration, NaiveDate};
use reqwest::Client;
use std::sync::Arc;

use crate::analysis::predict_next_day;
use crate::config::Config;
use crate::constants::{DEFAULT_HISTORY_DAYS, MAX_HISTORY_DAYS};
use crate::error::FetchError;
use crate::models::{
    ArchiveDailyData, Coordinate, DailyObservation, HistorySummary, OpenMeteoArchiveResponse,
    RainCondition, WeatherHistory,
};

const ARCHIVE_DAILY_FIELDS: &str = "temperature_2m_max,temperature_2m_min,temperature_2m_mean,rain_sum,snowfall_sum,windspeed_10m_max";

#[derive(Debug, Clone)]
pub struct HistoryResolver {
    client: Arc<Client>,
    base_url: String,
}

impl HistoryResolver {
    pub fn new(client: Arc<Client>, config: &Config) -> Self {
        Self {
            client,
            base_url: config.archive_base.clone(),
        }
    }

    /// Loads `days` days of history (default 30) ending the day before `today`
    pub async fn fetch(
        &self,
        coord: Coordinate,
        days: Option<u32>,
        today: NaiveDate,
    ) -> Result<WeatherHistory, FetchError> {
        let (start, end) = history_window(today, days);
        let url = format!(
            "{}/archive?latitude={}&longitude={}&start_date={}&end_date={}&daily={}&timezone=auto",
            self.base_url, coord.latitude, coord.longitude, start, end, ARCHIVE_DAILY_FIELDS
        );
        tracing::debug!("Requesting history: {}", url);

        let response = self.client.get(&url).send().await?;

        if !response.status().is_success() {
            return Err(FetchError::Status(response.status()));
        }

        let body = response.text().await?;
        let parsed: OpenMeteoArchiveResponse = serde_json::from_str(&body)?;
        let daily = parsed.daily.ok_or(FetchError::Schema("daily"))?;

        let days = normalize_history(daily)?;
        tracing::debug!(%coord, days = days.len(), "Loaded weather history");

        Ok(WeatherHistory { start, end, days })
    }
}

/// Inclusive `(start, end)` window: `end` is yesterday, length clamped to `1..=92`
pub fn history_window(today: NaiveDate, days: Option<u32>) -> (NaiveDate, NaiveDate) {
    let days = days
        .unwrap_or(DEFAULT_HISTORY_DAYS)
        .clamp(1, MAX_HISTORY_DAYS);
    let end = today - Duration::days(1);
    let start = end - Duration::days(i64::from(days) - 1);
    (start, end)
}

/// Turns parallel archive series into per-day rows.
///
/// When no mean temperature is reported at all it is derived as the midpoint
/// of max and min. Remaining gaps become zero.
pub fn normalize_history(daily: ArchiveDailyData) -> Result<Vec<DailyObservation>, FetchError> {
    let time = daily.time.ok_or(FetchError::Schema("daily.time"))?;
    let max = daily
        .temperature_max
        .ok_or(FetchError::Schema("daily.temperature_2m_max"))?;
    let min = daily
        .temperature_min
        .ok_or(FetchError::Schema("daily.temperature_2m_min"))?;
    let rain = daily.rain_sum.ok_or(FetchError::Schema("daily.rain_sum"))?;
    let snow = daily
        .snowfall_sum
        .ok_or(FetchError::Schema("daily.snowfall_sum"))?;
    let wind = daily.wind_speed_max.unwrap_or_default();

    let mean = match daily.temperature_mean {
        Some(mean) if mean.iter().any(Option::is_some) => mean,
        _ => (0..time.len())
            .map(|i| match (at(&max, i), at(&min, i)) {
                (Some(hi), Some(lo)) => Some((hi + lo) / 2.0),
                _ => None,
            })
            .collect(),
    };

    time.iter()
        .enumerate()
        .map(|(i, day)| -> Result<DailyObservation, FetchError> {
            let date = NaiveDate::parse_from_str(day, "%Y-%m-%d")
                .map_err(|e| FetchError::Decode(format!("invalid date `{}`: {}", day, e)))?;
            let rain = at(&rain, i).unwrap_or(0.0);
            Ok(DailyObservation {
                date,
                temp_max: at(&max, i).unwrap_or(0.0),
                temp_min: at(&min, i).unwrap_or(0.0),
                temp_mean: at(&mean, i).unwrap_or(0.0),
                rain,
                snow: at(&snow, i).unwrap_or(0.0),
                wind_max: at(&wind, i).unwrap_or(0.0),
                condition: RainCondition::from_rain_mm(rain),
            })
        })
        .collect()
}

/// Window averages, `None` for an empty history.
///
/// The window is labelled by its average daily rain. The next-day estimate
/// is left out when the history is too short or the fit fails.
pub fn summarize(history: &WeatherHistory) -> Option<HistorySummary> {
    if history.days.is_empty() {
        return None;
    }
    let n = history.days.len() as f64;
    let avg = |f: fn(&DailyObservation) -> f64| history.days.iter().map(f).sum::<f64>() / n;
    let avg_rain = avg(|d| d.rain);

    let means: Vec<f64> = history.days.iter().map(|d| d.temp_mean).collect();
    let next_day_temp_mean = match predict_next_day(&means) {
        Ok(estimate) => Some(estimate),
        Err(e) => {
            tracing::debug!(error = %e, "No next-day temperature estimate");
            None
        }
    };

    Some(HistorySummary {
        avg_temp_max: avg(|d| d.temp_max),
        avg_temp_min: avg(|d| d.temp_min),
        avg_temp_mean: avg(|d| d.temp_mean),
        avg_wind_max: avg(|d| d.wind_max),
        avg_rain,
        condition: RainCondition::from_rain_mm(avg_rain),
        next_day_temp_mean,
    })
}

fn at(series: &[Option<f64>], i: usize) -> Option<f64> {
    series.get(i).copied().flatten()
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn daily(json: serde_json::Value) -> ArchiveDailyData {
        serde_json::from_value(json).unwrap()
    }

    #[test]
    fn test_default_window_is_thirty_days_ending_yesterday() {
        let (start, end) = history_window(date(2024, 3, 1), None);
        assert_eq!(end, date(2024, 2, 29));
        assert_eq!(start, date(2024, 1, 31));
    }

    #[test]
    fn test_window_is_clamped() {
        let (start, end) = history_window(date(2024, 3, 10), Some(0));
        assert_eq!(start, end);

        let (start, end) = history_window(date(2024, 3, 10), Some(1000));
        assert_eq!((end - start).num_days(), i64::from(MAX_HISTORY_DAYS) - 1);
    }

    #[test]
    fn test_mean_derived_when_absent() {
        let days = normalize_history(daily(serde_json::json!({
            "time": ["2024-05-01", "2024-05-02"],
            "temperature_2m_max": [30.0, 32.0],
            "temperature_2m_min": [20.0, null],
            "temperature_2m_mean": [null, null],
            "rain_sum": [1.5, null],
            "snowfall_sum": [0.0, 0.0],
            "windspeed_10m_max": [12.0, 9.0]
        })))
        .unwrap();

        assert_eq!(days.len(), 2);
        assert_eq!(days[0].date, date(2024, 5, 1));
        assert_eq!(days[0].temp_mean, 25.0);
        // min is missing on day two, so the midpoint is unknown and zero-filled
        assert_eq!(days[1].temp_mean, 0.0);
        assert_eq!(days[1].temp_min, 0.0);
        assert_eq!(days[1].rain, 0.0);
        assert_eq!(days[0].condition, RainCondition::Normal);
        assert_eq!(days[1].condition, RainCondition::Dry);
    }

    #[test]
    fn test_daily_rain_labels() {
        let days = normalize_history(daily(serde_json::json!({
            "time": ["2024-09-01", "2024-09-02", "2024-09-03", "2024-09-04"],
            "temperature_2m_max": [30.0, 30.0, 30.0, 30.0],
            "temperature_2m_min": [24.0, 24.0, 24.0, 24.0],
            "rain_sum": [0.9, 1.0, 9.9, 10.0],
            "snowfall_sum": [0.0, 0.0, 0.0, 0.0]
        })))
        .unwrap();

        let labels: Vec<RainCondition> = days.iter().map(|d| d.condition).collect();
        assert_eq!(
            labels,
            vec![
                RainCondition::Dry,
                RainCondition::Normal,
                RainCondition::Normal,
                RainCondition::Wet
            ]
        );
    }

    #[test]
    fn test_summary_estimates_next_day_with_a_month_of_data() {
        let time: Vec<String> = (1..=30).map(|d| format!("2024-06-{:02}", d)).collect();
        let max: Vec<f64> = (0..30).map(|i| 30.0 + ((i * 7) % 5) as f64).collect();
        let min: Vec<f64> = (0..30).map(|i| 22.0 + ((i * 3) % 4) as f64).collect();

        let history = WeatherHistory {
            start: date(2024, 6, 1),
            end: date(2024, 6, 30),
            days: normalize_history(daily(serde_json::json!({
                "time": time,
                "temperature_2m_max": max,
                "temperature_2m_min": min,
                "rain_sum": vec![12.0; 30],
                "snowfall_sum": vec![0.0; 30]
            })))
            .unwrap(),
        };

        let summary = summarize(&history).unwrap();
        assert_eq!(summary.condition, RainCondition::Wet);
        let estimate = summary.next_day_temp_mean.unwrap();
        assert!((15.0..40.0).contains(&estimate), "estimate {}", estimate);
    }

    #[test]
    fn test_reported_mean_is_kept() {
        let days = normalize_history(daily(serde_json::json!({
            "time": ["2024-05-01", "2024-05-02"],
            "temperature_2m_max": [30.0, 32.0],
            "temperature_2m_min": [20.0, 22.0],
            "temperature_2m_mean": [24.0, null],
            "rain_sum": [0.0, 0.0],
            "snowfall_sum": [0.0, 0.0]
        })))
        .unwrap();

        assert_eq!(days[0].temp_mean, 24.0);
        assert_eq!(days[1].temp_mean, 0.0);
        assert_eq!(days[0].wind_max, 0.0);
    }

    #[test]
    fn test_short_series_are_padded() {
        let days = normalize_history(daily(serde_json::json!({
            "time": ["2024-05-01", "2024-05-02"],
            "temperature_2m_max": [30.0],
            "temperature_2m_min": [20.0],
            "rain_sum": [],
            "snowfall_sum": [0.0]
        })))
        .unwrap();

        assert_eq!(days[1].temp_max, 0.0);
        assert_eq!(days[0].rain, 0.0);
    }

    #[test]
    fn test_missing_required_series() {
        let result = normalize_history(daily(serde_json::json!({
            "time": ["2024-05-01"],
            "temperature_2m_max": [30.0],
            "temperature_2m_min": [20.0],
            "snowfall_sum": [0.0]
        })));
        assert!(matches!(result, Err(FetchError::Schema("daily.rain_sum"))));
    }

    #[test]
    fn test_bad_date_is_decode_error() {
        let result = normalize_history(daily(serde_json::json!({
            "time": ["yesterday"],
            "temperature_2m_max": [30.0],
            "temperature_2m_min": [20.0],
            "rain_sum": [0.0],
            "snowfall_sum": [0.0]
        })));
        assert!(matches!(result, Err(FetchError::Decode(_))));
    }

    #[test]
    fn test_summary() {
        let history = WeatherHistory {
            start: date(2024, 5, 1),
            end: date(2024, 5, 2),
            days: normalize_history(daily(serde_json::json!({
                "time": ["2024-05-01", "2024-05-02"],
                "temperature_2m_max": [30.0, 34.0],
                "temperature_2m_min": [20.0, 24.0],
                "rain_sum": [2.0, 4.0],
                "snowfall_sum": [0.0, 0.0],
                "windspeed_10m_max": [10.0, 20.0]
            })))
            .unwrap(),
        };

        let summary = summarize(&history).unwrap();
        assert_eq!(summary.avg_temp_max, 32.0);
        assert_eq!(summary.avg_temp_min, 22.0);
        assert_eq!(summary.avg_temp_mean, 27.0);
        assert_eq!(summary.avg_rain, 3.0);
        assert_eq!(summary.avg_wind_max, 15.0);
        assert_eq!(summary.condition, RainCondition::Normal);
        assert_eq!(summary.next_day_temp_mean, None);

        let empty = WeatherHistory {
            days: vec![],
            ..history
        };
        assert!(summarize(&empty).is_none());
    }

    #[tokio::test]
    async fn test_fetch_history() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/archive"))
            .and(query_param("start_date", "2024-05-01"))
            .and(query_param("end_date", "2024-05-02"))
            .and(query_param("daily", ARCHIVE_DAILY_FIELDS))
            .and(query_param("timezone", "auto"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "daily": {
                    "time": ["2024-05-01", "2024-05-02"],
                    "temperature_2m_max": [30.0, 31.0],
                    "temperature_2m_min": [20.0, 21.0],
                    "rain_sum": [0.0, 3.2],
                    "snowfall_sum": [0.0, 0.0]
                }
            })))
            .expect(1)
            .mount(&mock_server)
            .await;

        let config = Config::with_base_url(&mock_server.uri());
        let resolver = HistoryResolver::new(Arc::new(config.http_client().unwrap()), &config);
        let history = resolver
            .fetch(Coordinate::new(16.05, 108.2), Some(2), date(2024, 5, 3))
            .await
            .unwrap();

        assert_eq!(history.start, date(2024, 5, 1));
        assert_eq!(history.end, date(2024, 5, 2));
        assert_eq!(history.days.len(), 2);
        assert_eq!(history.days[1].rain, 3.2);
    }

    #[tokio::test]
    async fn test_fetch_history_status_error() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/archive"))
            .respond_with(ResponseTemplate::new(400))
            .mount(&mock_server)
            .await;

        let config = Config::with_base_url(&mock_server.uri());
        let resolver = HistoryResolver::new(Arc::new(config.http_client().unwrap()), &config);
        let result = resolver
            .fetch(Coordinate::new(16.05, 108.2), None, date(2024, 5, 3))
            .await;

        assert!(matches!(result, Err(FetchError::Status(s)) if s.as_u16() == 400));
    }
}

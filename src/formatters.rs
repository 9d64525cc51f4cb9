use crate::history::summarize;
use crate::models::{AddressRecord, LocationWeatherResult, WeatherHistory, WeatherSnapshot};

const UNKNOWN: &str = "N/A";

/// Formats an address into a single display line
pub fn format_address(address: Option<&AddressRecord>) -> String {
    let Some(address) = address else {
        return "Address unavailable".to_string();
    };

    if let Some(full) = &address.full {
        return full.clone();
    }

    [
        &address.road,
        &address.district,
        &address.city,
        &address.province,
    ]
    .into_iter()
    .flatten()
    .map(String::as_str)
    .collect::<Vec<_>>()
    .join(", ")
}

/// Formats a weather snapshot into a human-readable string
pub fn format_weather(weather: &WeatherSnapshot) -> String {
    format!(
        "Current Weather:\n  Temperature: {}\n  Wind: {}\n  Precipitation: {:.1} mm\n  Today: {} - {}\n",
        with_unit(weather.temp, "\u{00b0}C"),
        with_unit(weather.wind, "km/h"),
        weather.precipitation,
        with_unit(weather.temp_min, "\u{00b0}C"),
        with_unit(weather.temp_max, "\u{00b0}C"),
    )
}

/// Formats the combined result
pub fn format_location_weather(result: &LocationWeatherResult) -> String {
    format!(
        "Location: {}\n\n{}",
        format_address(result.location.as_ref()),
        format_weather(&result.weather)
    )
}

/// Formats a daily history with a summary block at the end
pub fn format_history(history: &WeatherHistory) -> String {
    let mut output = format!("Weather History ({} to {})\n\n", history.start, history.end);

    for day in &history.days {
        output.push_str(&format!(
            "{}: {:.1}\u{00b0}C - {:.1}\u{00b0}C (mean {:.1}\u{00b0}C), Rain: {:.1} mm ({}), Snow: {:.1} cm, Wind Max: {:.1} km/h\n",
            day.date.format("%d/%m"),
            day.temp_min,
            day.temp_max,
            day.temp_mean,
            day.rain,
            day.condition.description(),
            day.snow,
            day.wind_max
        ));
    }

    match summarize(history) {
        Some(summary) => output.push_str(&format!(
            "\nAverages over {} days:\n  Max: {:.1}\u{00b0}C\n  Min: {:.1}\u{00b0}C\n  Mean: {:.1}\u{00b0}C\n  Wind Max: {:.1} km/h\n  Rain: {:.1} mm\n  Condition: {}\n  Next day mean: {}\n",
            history.days.len(),
            summary.avg_temp_max,
            summary.avg_temp_min,
            summary.avg_temp_mean,
            summary.avg_wind_max,
            summary.avg_rain,
            summary.condition.description(),
            with_unit(summary.next_day_temp_mean, "\u{00b0}C")
        )),
        None => output.push_str("No observations in this period.\n"),
    }
    output
}

fn with_unit(value: Option<f64>, unit: &str) -> String {
    match value {
        Some(v) => format!("{:.1} {}", v, unit),
        None => UNKNOWN.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{DailyObservation, RainCondition};
    use chrono::NaiveDate;

    #[test]
    fn test_address_prefers_full() {
        let address = AddressRecord {
            full: Some("1 Trang Tien, Hoan Kiem, Ha Noi".to_string()),
            road: Some("Trang Tien".to_string()),
            ..Default::default()
        };
        assert_eq!(format_address(Some(&address)), "1 Trang Tien, Hoan Kiem, Ha Noi");
    }

    #[test]
    fn test_address_joins_parts() {
        let address = AddressRecord {
            road: Some("Le Loi".to_string()),
            city: Some("Hue".to_string()),
            province: Some("Thua Thien Hue".to_string()),
            ..Default::default()
        };
        assert_eq!(format_address(Some(&address)), "Le Loi, Hue, Thua Thien Hue");
        assert_eq!(format_address(None), "Address unavailable");
    }

    #[test]
    fn test_unknown_values_render_as_na() {
        let weather = WeatherSnapshot {
            temp: None,
            wind: Some(8.0),
            precipitation: 0.4,
            temp_max: Some(25.0),
            temp_min: None,
        };
        let text = format_weather(&weather);
        assert!(text.contains("Temperature: N/A"));
        assert!(text.contains("Wind: 8.0 km/h"));
        assert!(text.contains("Precipitation: 0.4 mm"));
        assert!(text.contains("Today: N/A - 25.0 \u{00b0}C"));
    }

    #[test]
    fn test_history_lists_days_and_summary() {
        let day = |d, max, min, rain| DailyObservation {
            date: NaiveDate::from_ymd_opt(2024, 5, d).unwrap(),
            temp_max: max,
            temp_min: min,
            temp_mean: (max + min) / 2.0,
            rain,
            snow: 0.0,
            wind_max: 10.0,
            condition: RainCondition::from_rain_mm(rain),
        };
        let history = WeatherHistory {
            start: NaiveDate::from_ymd_opt(2024, 5, 1).unwrap(),
            end: NaiveDate::from_ymd_opt(2024, 5, 2).unwrap(),
            days: vec![day(1, 30.0, 20.0, 0.5), day(2, 32.0, 22.0, 12.0)],
        };

        let text = format_history(&history);
        assert!(text.starts_with("Weather History (2024-05-01 to 2024-05-02)"));
        assert!(text.contains("01/05: 20.0\u{00b0}C - 30.0\u{00b0}C"));
        assert!(text.contains("Averages over 2 days"));
        assert!(text.contains("Max: 31.0\u{00b0}C"));
        assert!(text.contains("Rain: 0.5 mm (Dry)"));
        assert!(text.contains("Rain: 12.0 mm (Wet)"));
        // 6.25 mm average; two days are too few for an estimate
        assert!(text.contains("Condition: Normal"));
        assert!(text.contains("Next day mean: N/A"));
    }
}

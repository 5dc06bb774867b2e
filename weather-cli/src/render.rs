//! Plain-text rendering of lookups and the recent searches panel.

use weather_core::{HistoryEntry, WeatherRecord, model::capitalize_first};

pub fn weather(record: &WeatherRecord) -> String {
    format!(
        "{}\nTemperature: {}°C\nWeather: {}\nHumidity: {}%\nCountry: {}\nIcon: {}",
        record.display_label,
        record.temperature_c,
        record.description,
        record.humidity_pct,
        record.country_code,
        record.icon_url(),
    )
}

pub fn history(entries: &[HistoryEntry]) -> String {
    let mut out = String::from("Recent Searches");
    if entries.is_empty() {
        out.push_str("\nNo search history yet.");
        return out;
    }

    for entry in entries {
        out.push_str(&format!(
            "\n{} - {}°C, {} ({})",
            capitalize_first(&entry.label),
            entry.temperature_c,
            entry.description,
            entry.timestamp_utc,
        ));
    }
    out
}

use chrono::{DateTime, Utc};

/// Timestamp layout of persisted history rows (UTC, second precision).
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Current conditions for one successful lookup, ready for display.
#[derive(Debug, Clone, PartialEq)]
pub struct WeatherRecord {
    pub city_name: String,
    pub temperature_c: f64,
    pub description: String,
    pub humidity_pct: u8,
    pub icon_id: String,
    pub country_code: String,
    pub display_label: String,
}

impl WeatherRecord {
    pub fn icon_url(&self) -> String {
        format!("https://openweathermap.org/img/wn/{}@2x.png", self.icon_id)
    }
}

/// One persisted row of the search history.
#[derive(Debug, Clone, PartialEq)]
pub struct HistoryEntry {
    pub label: String,
    pub timestamp_utc: String,
    pub temperature_c: f64,
    pub description: String,
}

impl HistoryEntry {
    /// Projection of `record` stored after a successful lookup at `at`.
    pub fn from_record(record: &WeatherRecord, at: DateTime<Utc>) -> Self {
        Self {
            label: record.display_label.to_lowercase(),
            timestamp_utc: at.format(TIMESTAMP_FORMAT).to_string(),
            temperature_c: record.temperature_c,
            description: record.description.clone(),
        }
    }
}

/// Uppercase the first character and leave the rest as it is.
pub fn capitalize_first(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

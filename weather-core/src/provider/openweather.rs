use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use tracing::{debug, error, warn};

use crate::{
    error::WeatherError,
    model::{WeatherRecord, capitalize_first},
    query::LocationQuery,
};

use super::WeatherProvider;

pub const DEFAULT_BASE_URL: &str = "https://api.openweathermap.org/data/2.5/weather";

#[derive(Debug, Clone)]
pub struct OpenWeatherProvider {
    api_key: String,
    base_url: String,
    http: Client,
}

impl OpenWeatherProvider {
    pub fn with_base_url(api_key: String, base_url: String) -> Self {
        Self {
            api_key,
            base_url,
            http: Client::new(),
        }
    }

    async fn fetch_current(&self, query: &LocationQuery) -> Result<WeatherRecord, WeatherError> {
        let q = query.query_string();
        debug!(query = %q, "sending request to OpenWeather");

        let res = self
            .http
            .get(self.base_url.as_str())
            .query(&[
                ("q", q.as_str()),
                ("appid", self.api_key.as_str()),
                ("units", "metric"),
            ])
            .send()
            .await
            .map_err(|e| {
                let e = e.without_url();
                error!(query = %q, error = %e, "failed to send request to OpenWeather");
                WeatherError::from(e)
            })?;

        let status = res.status();
        debug!(query = %q, %status, "OpenWeather responded");

        let body = res.text().await.map_err(|e| {
            let e = e.without_url();
            error!(query = %q, %status, error = %e, "failed to read OpenWeather response body");
            WeatherError::from(e)
        })?;

        if status != StatusCode::OK {
            warn!(
                query = %q,
                %status,
                message = %provider_message(&body),
                "OpenWeather rejected the lookup"
            );
            return Err(WeatherError::LocationNotFound);
        }

        let parsed: OwCurrentResponse = serde_json::from_str(&body).map_err(|e| {
            error!(query = %q, error = %e, "malformed OpenWeather payload");
            WeatherError::Transport(format!("Failed to parse OpenWeather response: {e}"))
        })?;

        parsed.into_record(query)
    }
}

#[derive(Debug, Deserialize)]
struct OwMain {
    temp: f64,
    humidity: u8,
}

#[derive(Debug, Deserialize)]
struct OwWeather {
    description: String,
    icon: String,
}

#[derive(Debug, Deserialize)]
struct OwSys {
    country: String,
}

#[derive(Debug, Deserialize)]
struct OwCurrentResponse {
    name: String,
    main: OwMain,
    weather: Vec<OwWeather>,
    sys: OwSys,
}

impl OwCurrentResponse {
    fn into_record(self, query: &LocationQuery) -> Result<WeatherRecord, WeatherError> {
        let weather = self.weather.into_iter().next().ok_or_else(|| {
            error!(query = %query.query_string(), "OpenWeather payload has no weather entries");
            WeatherError::Transport(
                "Failed to parse OpenWeather response: missing weather[0]".to_string(),
            )
        })?;

        Ok(WeatherRecord {
            display_label: query.display_label(&self.name),
            city_name: self.name,
            temperature_c: self.main.temp,
            description: capitalize_first(&weather.description),
            humidity_pct: self.main.humidity,
            icon_id: weather.icon,
            country_code: self.sys.country,
        })
    }
}

#[derive(Debug, Deserialize)]
struct OwErrorBody {
    message: String,
}

/// The provider's own explanation of a failed lookup, for logs only.
fn provider_message(body: &str) -> String {
    serde_json::from_str::<OwErrorBody>(body)
        .map(|b| b.message)
        .unwrap_or_else(|_| truncate_body(body))
}

fn truncate_body(body: &str) -> String {
    const MAX: usize = 200;
    match body.char_indices().nth(MAX) {
        Some((idx, _)) => format!("{}...", &body[..idx]),
        None => body.to_string(),
    }
}

#[async_trait]
impl WeatherProvider for OpenWeatherProvider {
    async fn current(&self, query: &LocationQuery) -> Result<WeatherRecord, WeatherError> {
        self.fetch_current(query).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn provider_message_prefers_json_message() {
        let body = r#"{"cod":"404","message":"city not found"}"#;
        assert_eq!(provider_message(body), "city not found");
    }

    #[test]
    fn provider_message_falls_back_to_truncated_body() {
        let body = "x".repeat(500);
        let msg = provider_message(&body);
        assert_eq!(msg.len(), 203);
        assert!(msg.ends_with("..."));
    }

    #[test]
    fn truncate_body_respects_char_boundaries() {
        let body = "é".repeat(300);
        let msg = truncate_body(&body);
        assert_eq!(msg.chars().count(), 203);
    }

    #[test]
    fn missing_weather_entry_is_a_transport_error() {
        let parsed = OwCurrentResponse {
            name: "Austin".into(),
            main: OwMain { temp: 20.0, humidity: 50 },
            weather: vec![],
            sys: OwSys { country: "US".into() },
        };
        let query = LocationQuery::parse("Austin").unwrap();

        let err = parsed.into_record(&query).unwrap_err();
        assert!(matches!(err, WeatherError::Transport(_)));
    }

    #[test]
    fn record_uses_user_region_and_provider_country_code() {
        let parsed = OwCurrentResponse {
            name: "Austin".into(),
            main: OwMain { temp: 25.5, humidity: 61 },
            weather: vec![OwWeather { description: "broken clouds".into(), icon: "04d".into() }],
            sys: OwSys { country: "US".into() },
        };
        let query = LocationQuery::parse("austin, TX, United States").unwrap();

        let record = parsed.into_record(&query).unwrap();
        assert_eq!(record.display_label, "Austin, TX, United States");
        assert_eq!(record.country_code, "US");
        assert_eq!(record.description, "Broken clouds");
        assert_eq!(record.humidity_pct, 61);
        assert_eq!(record.icon_id, "04d");
    }
}

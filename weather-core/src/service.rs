use chrono::Utc;
use tracing::{debug, error, info};

use crate::{
    config::Settings,
    error::{StoreError, WeatherError},
    history::{HistoryStore, SqliteHistoryStore},
    model::{HistoryEntry, WeatherRecord},
    provider::{OpenWeatherProvider, WeatherProvider},
    query::{LocationQuery, normalize},
};

/// One lookup: normalize, fetch, record in history.
#[derive(Debug)]
pub struct WeatherService {
    provider: Box<dyn WeatherProvider>,
    history: Box<dyn HistoryStore>,
}

impl WeatherService {
    pub fn new(provider: Box<dyn WeatherProvider>, history: Box<dyn HistoryStore>) -> Self {
        Self { provider, history }
    }

    /// Wire the OpenWeather provider and the SQLite history from resolved settings.
    pub fn from_settings(settings: &Settings) -> Result<Self, StoreError> {
        let provider =
            OpenWeatherProvider::with_base_url(settings.api_key.clone(), settings.base_url.clone());
        let history = SqliteHistoryStore::new(&settings.database_path);
        history.init()?;

        Ok(Self::new(Box::new(provider), Box::new(history)))
    }

    /// Fetch current conditions and append the result to history.
    ///
    /// A failed append is logged and does not affect the returned record.
    pub async fn fetch_weather(&self, query: &LocationQuery) -> Result<WeatherRecord, WeatherError> {
        let record = self.provider.current(query).await?;
        info!(label = %record.display_label, "weather fetched");

        let entry = HistoryEntry::from_record(&record, Utc::now());
        if let Err(e) = self.history.append(&entry) {
            error!(label = %entry.label, error = %e, "failed to save search to history");
        }

        Ok(record)
    }

    pub async fn search(&self, raw: &str) -> Result<WeatherRecord, WeatherError> {
        let query = normalize(raw)?;
        debug!(query = %query.query_string(), "query constructed");
        self.fetch_weather(&query).await
    }

    pub fn recent(&self, limit: usize) -> Vec<HistoryEntry> {
        self.history.recent(limit)
    }
}

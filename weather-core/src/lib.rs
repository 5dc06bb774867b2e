//! Core library for the `weather` CLI.
//!
//! This crate defines:
//! - Normalization of free-text locations into provider queries
//! - The OpenWeather client and the provider abstraction over it
//! - A SQLite-backed history of past searches
//! - Configuration & credentials handling
//!
//! It is used by `weather-cli`, but can also be reused by other binaries or services.

pub mod config;
pub mod error;
pub mod history;
pub mod model;
pub mod provider;
pub mod query;
pub mod service;

pub use config::{Config, Settings};
pub use error::{NormalizationError, StoreError, WeatherError};
pub use history::{DEFAULT_RECENT_LIMIT, HistoryStore, SqliteHistoryStore};
pub use model::{HistoryEntry, WeatherRecord};
pub use provider::{OpenWeatherProvider, WeatherProvider};
pub use query::{LocationQuery, normalize};
pub use service::WeatherService;

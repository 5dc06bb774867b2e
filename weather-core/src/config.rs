use anyhow::{Context, Result, anyhow};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::{fs, path::PathBuf};

use crate::{history::DEFAULT_RECENT_LIMIT, provider::openweather::DEFAULT_BASE_URL};

/// Environment variable consulted when the config file has no API key.
pub const API_KEY_ENV: &str = "OPENWEATHERMAP_API_KEY";

/// Environment variable overriding the history database location.
pub const HISTORY_DB_ENV: &str = "WEATHER_HISTORY_DB";

/// Top-level configuration stored on disk.
///
/// Example TOML:
/// api_key = "..."
/// database_path = "/home/me/.local/share/weather/weather.db"
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct Config {
    pub api_key: Option<String>,
    pub base_url: Option<String>,
    pub database_path: Option<PathBuf>,
    pub history_limit: Option<usize>,
}

/// Fully resolved settings, built once at startup and handed to the service.
#[derive(Clone, PartialEq, Eq)]
pub struct Settings {
    pub api_key: String,
    pub base_url: String,
    pub database_path: PathBuf,
    pub history_limit: usize,
}

impl std::fmt::Debug for Settings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Settings")
            .field("api_key", &redact(&self.api_key))
            .field("base_url", &self.base_url)
            .field("database_path", &self.database_path)
            .field("history_limit", &self.history_limit)
            .finish()
    }
}

impl Config {
    /// Load config from disk, or return an empty default if it doesn't exist yet.
    pub fn load() -> Result<Self> {
        let path = Self::config_file_path()?;
        if !path.exists() {
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let cfg: Config = toml::from_str(&contents)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(cfg)
    }

    /// Save config to disk, creating parent directories as needed.
    pub fn save(&self) -> Result<()> {
        let path = Self::config_file_path()?;

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create config directory: {}", parent.display())
            })?;
        }

        let toml =
            toml::to_string_pretty(self).context("Failed to serialize configuration to TOML")?;

        fs::write(&path, toml)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;

        Ok(())
    }

    /// Path to the config file.
    pub fn config_file_path() -> Result<PathBuf> {
        let dirs = project_dirs()
            .ok_or_else(|| anyhow!("Could not determine platform config directory"))?;

        Ok(dirs.config_dir().join("config.toml"))
    }

    pub fn set_api_key(&mut self, api_key: String) {
        self.api_key = Some(api_key);
    }

    /// Resolve against the process environment.
    pub fn resolve(&self) -> Result<Settings> {
        self.resolve_with(|name| std::env::var(name).ok())
    }

    /// Resolve using `env` to look up environment variables.
    ///
    /// The API key comes from the config file first, then `OPENWEATHERMAP_API_KEY`.
    /// Having neither is an error.
    pub fn resolve_with<F>(&self, env: F) -> Result<Settings>
    where
        F: Fn(&str) -> Option<String>,
    {
        let api_key = non_blank(self.api_key.clone())
            .or_else(|| non_blank(env(API_KEY_ENV)))
            .ok_or_else(|| {
                anyhow!(
                    "No OpenWeatherMap API key configured.\n\
                     Hint: run `weather configure` or set the {API_KEY_ENV} environment variable."
                )
            })?;
        tracing::debug!(api_key = %redact(&api_key), "API key loaded");

        let base_url = self.base_url.clone().unwrap_or_else(|| DEFAULT_BASE_URL.to_string());

        let database_path = self
            .database_path
            .clone()
            .or_else(|| non_blank(env(HISTORY_DB_ENV)).map(PathBuf::from))
            .unwrap_or_else(default_database_path);
        tracing::debug!(path = %database_path.display(), "database path");

        Ok(Settings {
            api_key,
            base_url,
            database_path,
            history_limit: self.history_limit.unwrap_or(DEFAULT_RECENT_LIMIT),
        })
    }
}

/// `<platform data dir>/weather.db`, or `weather.db` in the working directory.
pub fn default_database_path() -> PathBuf {
    project_dirs()
        .map(|dirs| dirs.data_dir().join("weather.db"))
        .unwrap_or_else(|| PathBuf::from("weather.db"))
}

fn project_dirs() -> Option<ProjectDirs> {
    ProjectDirs::from("dev", "weather-task", "weather-cli")
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

fn redact(key: &str) -> String {
    let prefix: String = key.chars().take(5).collect();
    format!("{prefix}...")
}

use std::process::ExitCode;

use anyhow::Context;
use clap::{Parser, Subcommand};
use weather_core::{Config, Settings, WeatherService};

use crate::render;

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "weather", version, about = "Weather CLI")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Store the OpenWeatherMap API key in the config file.
    Configure {
        /// Key to store; prompted for when omitted.
        #[arg(long)]
        api_key: Option<String>,
    },

    /// Show current weather for a location, then the recent searches.
    Show {
        /// City, optionally followed by region and country: "Austin, Texas, US".
        location: String,
    },

    /// List the most recent searches.
    History {
        /// Number of entries to show; defaults to the configured limit.
        #[arg(long)]
        limit: Option<usize>,
    },
}

impl Cli {
    pub async fn run(self) -> anyhow::Result<ExitCode> {
        match self.command {
            Command::Configure { api_key } => {
                configure(api_key)?;
                Ok(ExitCode::SUCCESS)
            }
            Command::Show { location } => {
                let settings = load_settings()?;
                let service = open_service(&settings)?;

                let outcome = service.search(&location).await;
                let code = match &outcome {
                    Ok(record) => {
                        println!("{}", render::weather(record));
                        ExitCode::SUCCESS
                    }
                    Err(e) => {
                        eprintln!("{}", e.user_message());
                        ExitCode::FAILURE
                    }
                };

                println!();
                println!("{}", render::history(&service.recent(settings.history_limit)));
                Ok(code)
            }
            Command::History { limit } => {
                let settings = load_settings()?;
                let service = open_service(&settings)?;

                let limit = limit.unwrap_or(settings.history_limit);
                println!("{}", render::history(&service.recent(limit)));
                Ok(ExitCode::SUCCESS)
            }
        }
    }
}

/// Missing credentials abort here, before anything is printed.
fn load_settings() -> anyhow::Result<Settings> {
    let config = Config::load()?;
    config.resolve()
}

fn open_service(settings: &Settings) -> anyhow::Result<WeatherService> {
    WeatherService::from_settings(settings).with_context(|| {
        format!("Failed to initialize search history at {}", settings.database_path.display())
    })
}

fn configure(api_key: Option<String>) -> anyhow::Result<()> {
    let mut config = Config::load()?;

    let api_key = match api_key {
        Some(key) => key,
        None => inquire::Password::new("OpenWeatherMap API key:")
            .without_confirmation()
            .with_display_mode(inquire::PasswordDisplayMode::Masked)
            .prompt()
            .context("Failed to read API key")?,
    };

    let api_key = api_key.trim().to_string();
    if api_key.is_empty() {
        anyhow::bail!("API key cannot be empty");
    }

    config.set_api_key(api_key);
    config.save()?;

    println!("Saved API key to {}", Config::config_file_path()?.display());
    Ok(())
}

//! Error taxonomy for lookups and the search history.

use thiserror::Error;

/// Raised before any network call when the raw input has no usable city.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NormalizationError {
    #[error("Location cannot be empty")]
    EmptyLocation,
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum WeatherError {
    #[error(transparent)]
    Normalization(#[from] NormalizationError),

    /// The provider answered with a non-200 status. Its own message is logged, never carried.
    #[error("Location not found")]
    LocationNotFound,

    #[error("{0}")]
    Transport(String),
}

impl WeatherError {
    /// Text shown to the user by the shell.
    pub fn user_message(&self) -> String {
        match self {
            Self::Normalization(NormalizationError::EmptyLocation) => {
                "Location cannot be empty".to_string()
            }
            Self::LocationNotFound => "Location not found".to_string(),
            Self::Transport(msg) => msg.clone(),
        }
    }
}

/// The request URL carries the API key, so it is stripped before the text is kept.
impl From<reqwest::Error> for WeatherError {
    fn from(err: reqwest::Error) -> Self {
        Self::Transport(err.without_url().to_string())
    }
}

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("history store I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("history store database error: {0}")]
    Sqlite(#[from] rusqlite::Error),
}

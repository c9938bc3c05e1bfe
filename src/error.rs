//! Favorites loading errors and their user-facing messages

use crate::constants::*;
use std::time::Duration;
use thiserror::Error;

/// Everything that can go wrong while loading favorites.
/// None of these are fatal; the screen always stays usable.
#[derive(Debug, Error)]
pub enum FavoritesError {
    /// Request did not finish inside the timeout window
    #[error("request timed out after {0:?}")]
    Timeout(Duration),

    /// Request was cancelled before completing
    #[error("request aborted")]
    Aborted,

    /// Request failed in transit
    #[error("network request failed: {0}")]
    Network(String),

    /// Could not reach the server at all
    #[error("failed to fetch: {0}")]
    Connect(String),

    /// Non-2xx response
    #[error("HTTP {status}: {body}")]
    Server { status: u16, body: String },

    /// Body was not valid JSON or not an array
    #[error("invalid response format: {0}")]
    Malformed(String),

    #[error("{0}")]
    Unknown(String),
}

impl FavoritesError {
    /// Message shown inline and in the error alert
    pub fn user_message(&self) -> String {
        match self {
            FavoritesError::Timeout(_) | FavoritesError::Aborted => MSG_TIMEOUT.to_string(),
            FavoritesError::Network(_) => MSG_NETWORK.to_string(),
            FavoritesError::Connect(_) => MSG_CONNECT.to_string(),
            FavoritesError::Server { .. } => format!("Server error: {}", self),
            FavoritesError::Malformed(_) => MSG_MALFORMED.to_string(),
            FavoritesError::Unknown(_) => MSG_GENERIC.to_string(),
        }
    }
}

impl From<reqwest::Error> for FavoritesError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            FavoritesError::Timeout(REQUEST_TIMEOUT)
        } else if e.is_connect() {
            FavoritesError::Connect(e.to_string())
        } else if e.is_decode() {
            FavoritesError::Malformed(e.to_string())
        } else if e.is_request() || e.is_body() {
            FavoritesError::Network(e.to_string())
        } else {
            FavoritesError::Unknown(e.to_string())
        }
    }
}

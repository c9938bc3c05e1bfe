//! Application constants and configuration

use std::time::Duration;

/// Backend serving the favorites endpoint. `settings.json` may override it.
pub const API_URL: &str = "http://localhost:5001/api";
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");
pub const APP_NAME: &str = "Recipe Favorites";

/// Abort window for the initial favorites request
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

// User-facing messages
pub const MSG_TIMEOUT: &str = "Request timed out. Please check your connection.";
pub const MSG_NETWORK: &str = "Network error. Please check your internet connection.";
pub const MSG_CONNECT: &str = "Cannot connect to server. Please check if the server is running.";
pub const MSG_MALFORMED: &str = "Invalid response format. The server returned unexpected data.";
pub const MSG_GENERIC: &str = "Failed to load favorites";
pub const MSG_RETRY_FAILED: &str = "Still unable to load favorites";
pub const MSG_LOADING: &str = "Loading your favorites...";

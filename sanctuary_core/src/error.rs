//! Error types for the sanctuary_core library.

use chrono::Duration;
use std::io;

/// Result type alias using our Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Core error type for sanctuary_core operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Referenced activity does not exist on the pet
    #[error("Activity not found: {0}")]
    ActivityNotFound(String),

    /// Activity exists but its cooldown has not elapsed yet.
    ///
    /// The display string is meant to be shown to the user as-is.
    #[error("You can {} again in {remaining_minutes} minutes", .activity_name.to_lowercase())]
    CooldownActive {
        activity_id: String,
        activity_name: String,
        remaining: Duration,
        remaining_minutes: i64,
    },

    /// IO error occurred
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// JSON serialization/deserialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// TOML parsing error
    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),

    /// Configuration validation error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Unparseable timestamp supplied by a caller
    #[error("Invalid timestamp: {0}")]
    InvalidTimestamp(String),

    /// Generic error
    #[error("{0}")]
    Other(String),
}

use std::panic::Location;

use error_location::ErrorLocation;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AuthError {
    #[error("Transport failure: {message} {location}")]
    Transport {
        message: String,
        location: ErrorLocation,
    },

    #[error("{operation} timed out after {timeout_secs}s {location}")]
    Timeout {
        operation: &'static str,
        timeout_secs: u64,
        location: ErrorLocation,
    },

    #[error("Identity provider error: {message} {location}")]
    Provider {
        message: String,
        location: ErrorLocation,
    },

    #[error("Profile insert failed: {message} {location}")]
    ProfileInsert {
        message: String,
        location: ErrorLocation,
    },

    #[error("Identity cache error: {message} {location}")]
    Cache {
        message: String,
        location: ErrorLocation,
    },

    #[error("Identity cache serialization failed: {source} {location}")]
    CacheSerde {
        #[source]
        source: serde_json::Error,
        location: ErrorLocation,
    },

    #[error("Identity cache IO failed: {source} {location}")]
    CacheIo {
        #[source]
        source: std::io::Error,
        location: ErrorLocation,
    },

    #[error("Configuration error: {source} {location}")]
    Config {
        #[source]
        source: sf_config::ConfigError,
        location: ErrorLocation,
    },
}

impl AuthError {
    /// Create a transport error
    #[track_caller]
    pub fn transport<S: Into<String>>(message: S) -> Self {
        Self::Transport {
            message: message.into(),
            location: ErrorLocation::from(Location::caller()),
        }
    }

    /// Create an identity provider error
    #[track_caller]
    pub fn provider<S: Into<String>>(message: S) -> Self {
        Self::Provider {
            message: message.into(),
            location: ErrorLocation::from(Location::caller()),
        }
    }

    /// Create a profile insert error
    #[track_caller]
    pub fn profile_insert<S: Into<String>>(message: S) -> Self {
        Self::ProfileInsert {
            message: message.into(),
            location: ErrorLocation::from(Location::caller()),
        }
    }

    /// Create an identity cache error
    #[track_caller]
    pub fn cache<S: Into<String>>(message: S) -> Self {
        Self::Cache {
            message: message.into(),
            location: ErrorLocation::from(Location::caller()),
        }
    }

    /// Only network-shaped failures are worth retrying; data-shaped
    /// failures never are.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Transport { .. } | Self::Timeout { .. })
    }

    /// Provider rejections that mean the locally held refresh token is
    /// unusable. Matched on error text because providers surface this as a
    /// message, not a structured code.
    pub fn is_token_error(&self) -> bool {
        match self {
            Self::Provider { message, .. } => {
                let text = message.to_lowercase();
                text.contains("refresh token") || text.contains("invalid_grant")
            }
            _ => false,
        }
    }
}

impl From<sf_config::ConfigError> for AuthError {
    #[track_caller]
    fn from(source: sf_config::ConfigError) -> Self {
        Self::Config {
            source,
            location: ErrorLocation::from(Location::caller()),
        }
    }
}

pub type Result<T> = std::result::Result<T, AuthError>;

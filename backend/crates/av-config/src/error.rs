use std::panic::Location;
use std::path::PathBuf;
use std::result::Result as StdResult;

use error_location::ErrorLocation;
use thiserror::Error as ThisError;

#[derive(ThisError, Debug)]
pub enum ConfigError {
    /// A value failed validation; `section` names the config table
    #[error("Invalid [{section}] config: {message} {location}")]
    Invalid {
        section: &'static str,
        message: String,
        location: ErrorLocation,
    },

    #[error("IO error reading {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("TOML parse error in {path}: {source}")]
    Toml {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

impl ConfigError {
    #[track_caller]
    fn invalid<S: Into<String>>(section: &'static str, message: S) -> Self {
        ConfigError::Invalid {
            section,
            message: message.into(),
            location: ErrorLocation::from(Location::caller()),
        }
    }

    #[track_caller]
    pub fn server<S: Into<String>>(message: S) -> Self {
        Self::invalid("server", message)
    }

    #[track_caller]
    pub fn database<S: Into<String>>(message: S) -> Self {
        Self::invalid("database", message)
    }

    #[track_caller]
    pub fn auth<S: Into<String>>(message: S) -> Self {
        Self::invalid("auth", message)
    }

    #[track_caller]
    pub fn websocket<S: Into<String>>(message: S) -> Self {
        Self::invalid("websocket", message)
    }

    #[track_caller]
    pub fn polling<S: Into<String>>(message: S) -> Self {
        Self::invalid("polling", message)
    }

    #[track_caller]
    pub fn audit<S: Into<String>>(message: S) -> Self {
        Self::invalid("audit", message)
    }

    /// Problems with the config directory itself
    #[track_caller]
    pub fn environment<S: Into<String>>(message: S) -> Self {
        Self::invalid("environment", message)
    }

    /// Config table the error belongs to, if it is a validation error
    pub fn section(&self) -> Option<&'static str> {
        match self {
            ConfigError::Invalid { section, .. } => Some(section),
            _ => None,
        }
    }
}

pub type ConfigErrorResult<T> = StdResult<T, ConfigError>;

//! Runtime configuration read from the environment.
//!
//! The owner id gates everything: without it the core refuses to start and
//! the caller shows `ConfigError::MissingUserId`'s guidance instead.

use std::str::FromStr;
use std::time::Duration;

use thiserror::Error;

use crate::notice::DEFAULT_ERROR_WINDOW;
use crate::types::UserId;

pub const DEFAULT_API_URL: &str = "http://localhost:3000";

pub const ENV_API_URL: &str = "TODO_API_URL";
pub const ENV_USER_ID: &str = "TODO_USER_ID";
pub const ENV_ERROR_WINDOW_MS: &str = "TODO_ERROR_WINDOW_MS";
pub const ENV_UPDATE_MODE: &str = "TODO_UPDATE_MODE";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error(
        "no owner id configured: set {} to your user id (a positive integer) \
         so todos can be loaded and saved for you",
        ENV_USER_ID
    )]
    MissingUserId,

    #[error("invalid {key}: {value:?}")]
    Invalid { key: &'static str, value: String },
}

/// Whether `update` shows the new value before the server confirms it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum UpdateMode {
    #[default]
    Optimistic,
    Confirmed,
}

impl FromStr for UpdateMode {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "optimistic" => Ok(UpdateMode::Optimistic),
            "confirmed" => Ok(UpdateMode::Confirmed),
            _ => Err(()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub base_url: String,
    pub user_id: UserId,
    pub error_window: Duration,
    pub update_mode: UpdateMode,
}

impl Config {
    pub fn new(base_url: impl Into<String>, user_id: UserId) -> Self {
        Self {
            base_url: base_url.into(),
            user_id,
            error_window: DEFAULT_ERROR_WINDOW,
            update_mode: UpdateMode::default(),
        }
    }

    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build a config from any key lookup. Empty values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        let user_id = match get(ENV_USER_ID) {
            Some(raw) => parse_user_id(&raw)?,
            None => return Err(ConfigError::MissingUserId),
        };

        let base_url = get(ENV_API_URL).unwrap_or_else(|| DEFAULT_API_URL.to_string());
        let mut config = Config::new(base_url, user_id);

        if let Some(raw) = get(ENV_ERROR_WINDOW_MS) {
            let millis: u64 = raw.parse().map_err(|_| ConfigError::Invalid {
                key: ENV_ERROR_WINDOW_MS,
                value: raw.clone(),
            })?;
            config.error_window = Duration::from_millis(millis);
        }

        if let Some(raw) = get(ENV_UPDATE_MODE) {
            config.update_mode = raw.parse().map_err(|_| ConfigError::Invalid {
                key: ENV_UPDATE_MODE,
                value: raw.clone(),
            })?;
        }

        Ok(config)
    }
}

/// `0` means unset, matching a falsy owner id on the backend side.
pub fn parse_user_id(raw: &str) -> Result<UserId, ConfigError> {
    match raw.trim().parse::<i64>() {
        Ok(0) => Err(ConfigError::MissingUserId),
        Ok(id) if id > 0 => Ok(UserId(id)),
        _ => Err(ConfigError::Invalid {
            key: ENV_USER_ID,
            value: raw.to_string(),
        }),
    }
}

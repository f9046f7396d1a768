use http::HeaderValue;

use crate::{
    handler::{CorsHeaders, DEFAULT_ALLOW_ORIGIN},
    range::{RangeProfile, UnknownRangeProfile},
};

pub const DB_CONNECTION_STRING: &str = "DB_CONNECTION_STRING";
pub const RANGE_PROFILE: &str = "RANGE_PROFILE";
pub const CORS_ALLOW_ORIGIN: &str = "CORS_ALLOW_ORIGIN";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("{0} is not set")]
    Missing(&'static str),
    #[error(transparent)]
    RangeProfile(#[from] UnknownRangeProfile),
    #[error("CORS_ALLOW_ORIGIN is not a valid header value: {0:?}")]
    AllowOrigin(String),
}

/// Process configuration, read once before the first request.
#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub range_profile: RangeProfile,
    pub cors: CorsHeaders,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let database_url = lookup(DB_CONNECTION_STRING)
            .filter(|value| !value.is_empty())
            .ok_or(ConfigError::Missing(DB_CONNECTION_STRING))?;

        let range_profile = match lookup(RANGE_PROFILE).filter(|value| !value.is_empty()) {
            Some(value) => value.parse()?,
            None => RangeProfile::default(),
        };

        let origin = lookup(CORS_ALLOW_ORIGIN)
            .filter(|value| !value.is_empty())
            .unwrap_or_else(|| DEFAULT_ALLOW_ORIGIN.to_string());
        let allow_origin =
            HeaderValue::from_str(&origin).map_err(|_| ConfigError::AllowOrigin(origin.clone()))?;

        Ok(Self {
            database_url,
            range_profile,
            cors: CorsHeaders::new(allow_origin),
        })
    }
}

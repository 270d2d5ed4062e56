// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Application configuration loaded from environment variables.
//!
//! Everything is read once at startup into [`Config`], which is then passed
//! by reference to the components that need it.

use std::env;
use std::fmt;
use std::time::Duration;

const DEFAULT_PORT: u16 = 8080;
const DEFAULT_REFRESH_INTERVAL_SECS: u64 = 60 * 60;
const DEFAULT_HTTP_TIMEOUT_SECS: u64 = 30;
pub const DEFAULT_OAUTH_URL: &str = "https://www.strava.com/oauth/token";
pub const DEFAULT_API_URL: &str = "https://www.strava.com/api/v3";

/// OAuth credentials for the single athlete whose activities are charted.
#[derive(Clone)]
pub struct StravaCredentials {
    pub client_id: String,
    pub client_secret: String,
    pub refresh_token: String,
}

impl fmt::Debug for StravaCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StravaCredentials")
            .field("client_id", &self.client_id)
            .field("client_secret", &"<redacted>")
            .field("refresh_token", &"<redacted>")
            .finish()
    }
}

/// Application configuration, loaded once at startup.
#[derive(Debug, Clone)]
pub struct Config {
    /// Strava OAuth credentials
    pub credentials: StravaCredentials,
    /// Server port
    pub port: u16,
    /// How often the dashboard is recomputed
    pub refresh_interval: Duration,
    /// Re-fetch activities from Strava on every refresh tick instead of
    /// reusing the startup snapshot
    pub refetch_on_tick: bool,
    /// Per-request timeout for upstream HTTP calls
    pub http_timeout: Duration,
    /// Token exchange endpoint
    pub strava_oauth_url: String,
    /// Base URL of the Strava REST API
    pub strava_api_url: String,
}

impl Config {
    /// Load configuration from environment variables (and `.env` if present).
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok(); // Load .env file if present
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build configuration from an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let required = |key: &'static str| -> Result<String, ConfigError> {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
                .ok_or(ConfigError::Missing(key))
        };

        // All three secrets are checked before anything else is parsed.
        let credentials = StravaCredentials {
            client_id: required("CLIENT_ID")?,
            client_secret: required("CLIENT_SECRET")?,
            refresh_token: required("REFRESH_TOKEN")?,
        };

        let port = parse_or_default(&lookup, "PORT", DEFAULT_PORT);
        let refresh_secs = parse_or_default(
            &lookup,
            "REFRESH_INTERVAL_SECS",
            DEFAULT_REFRESH_INTERVAL_SECS,
        )
        .max(1);
        let timeout_secs =
            parse_or_default(&lookup, "HTTP_TIMEOUT_SECS", DEFAULT_HTTP_TIMEOUT_SECS).max(1);

        let refetch_on_tick = match lookup("REFETCH_ON_TICK") {
            None => false,
            Some(raw) => parse_bool(&raw).ok_or(ConfigError::Invalid {
                key: "REFETCH_ON_TICK",
                value: raw,
            })?,
        };

        Ok(Self {
            credentials,
            port,
            refresh_interval: Duration::from_secs(refresh_secs),
            refetch_on_tick,
            http_timeout: Duration::from_secs(timeout_secs),
            strava_oauth_url: lookup("STRAVA_OAUTH_URL")
                .unwrap_or_else(|| DEFAULT_OAUTH_URL.to_string()),
            strava_api_url: lookup("STRAVA_API_URL")
                .map(|url| url.trim_end_matches('/').to_string())
                .unwrap_or_else(|| DEFAULT_API_URL.to_string()),
        })
    }

    /// Config for testing only.
    pub fn test_default() -> Self {
        Self {
            credentials: StravaCredentials {
                client_id: "test_client_id".to_string(),
                client_secret: "test_secret".to_string(),
                refresh_token: "test_refresh_token".to_string(),
            },
            port: DEFAULT_PORT,
            refresh_interval: Duration::from_secs(DEFAULT_REFRESH_INTERVAL_SECS),
            refetch_on_tick: false,
            http_timeout: Duration::from_secs(5),
            strava_oauth_url: DEFAULT_OAUTH_URL.to_string(),
            strava_api_url: DEFAULT_API_URL.to_string(),
        }
    }
}

fn parse_or_default<F, T>(lookup: &F, key: &str, default: T) -> T
where
    F: Fn(&str) -> Option<String>,
    T: std::str::FromStr + Copy + fmt::Display,
{
    match lookup(key) {
        None => default,
        Some(raw) => raw.trim().parse().unwrap_or_else(|_| {
            tracing::warn!(key, value = %raw, default = %default, "Invalid value, using default");
            default
        }),
    }
}

fn parse_bool(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "true" => Some(true),
        "false" => Some(false),
        _ => None,
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    Missing(&'static str),

    #[error("Invalid value for {key}: {value:?}")]
    Invalid { key: &'static str, value: String },
}

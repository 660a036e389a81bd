use crate::models::lyrics::LyricsLookup;
use crate::models::oauth::CredentialStore;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;

pub const DEFAULT_PORT: u16 = 8080;
pub const DEFAULT_FRONTEND_URL: &str = "https://tunestellar.vercel.app";
pub const DEFAULT_AUTHORIZE_URL: &str = "https://accounts.spotify.com/authorize";
pub const DEFAULT_TOKEN_URL: &str = "https://accounts.spotify.com/api/token";
pub const DEFAULT_GENIUS_API_URL: &str = "https://api.genius.com";
pub const DEFAULT_UPSTREAM_TIMEOUT_SECS: u64 = 10;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{0} not found")]
    Missing(&'static str),
    #[error("{name} has an invalid value {value:?}")]
    Invalid { name: &'static str, value: String },
}

#[derive(Clone, Debug)]
pub struct AppConfig {
    pub client_id: String,
    pub client_secret: String,
    pub redirect_uri: String,
    pub genius_api_key: String,
    pub port: u16,
    pub frontend_url: String,
    /// Scheme, host and port of `frontend_url`; the only origin CORS lets through.
    pub frontend_origin: String,
    pub authorize_url: String,
    pub token_url: String,
    pub genius_api_url: String,
    pub upstream_timeout: Duration,
    /// Compare the callback `state` with the one issued at login.
    pub verify_state: bool,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        use dotenvy::dotenv;
        use std::env;

        dotenv().ok();

        Self::from_lookup(|name| env::var(name).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let value = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());
        let required = |name: &'static str| value(name).ok_or(ConfigError::Missing(name));
        let optional = |name: &str, default: &str| value(name).unwrap_or_else(|| default.to_string());

        let client_id = required("CLIENT_ID")?;
        let client_secret = required("CLIENT_SECRET")?;
        let redirect_uri = required("REDIRECT_URI")?;
        let genius_api_key = required("GENIUS_API_KEY")?;

        let port = parse_number("PORT", value("PORT"), DEFAULT_PORT)?;
        let timeout_secs = parse_number(
            "UPSTREAM_TIMEOUT_SECS",
            value("UPSTREAM_TIMEOUT_SECS"),
            DEFAULT_UPSTREAM_TIMEOUT_SECS,
        )?;
        let verify_state = parse_flag("VERIFY_STATE", value("VERIFY_STATE"))?;

        let frontend_url = optional("FRONTEND_URL", DEFAULT_FRONTEND_URL);
        let frontend_origin = reqwest::Url::parse(&frontend_url)
            .map(|url| url.origin().ascii_serialization())
            .map_err(|_| ConfigError::Invalid {
                name: "FRONTEND_URL",
                value: frontend_url.clone(),
            })?;

        Ok(Self {
            client_id,
            client_secret,
            redirect_uri,
            genius_api_key,
            port,
            frontend_url,
            frontend_origin,
            authorize_url: optional("SPOTIFY_AUTHORIZE_URL", DEFAULT_AUTHORIZE_URL),
            token_url: optional("SPOTIFY_TOKEN_URL", DEFAULT_TOKEN_URL),
            genius_api_url: optional("GENIUS_API_URL", DEFAULT_GENIUS_API_URL),
            upstream_timeout: Duration::from_secs(timeout_secs),
            verify_state,
        })
    }
}

fn parse_number<T: std::str::FromStr>(
    name: &'static str,
    raw: Option<String>,
    default: T,
) -> Result<T, ConfigError> {
    match raw {
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|_| ConfigError::Invalid { name, value: raw }),
        None => Ok(default),
    }
}

fn parse_flag(name: &'static str, raw: Option<String>) -> Result<bool, ConfigError> {
    let Some(raw) = raw else {
        return Ok(false);
    };
    flag_value(&raw).ok_or(ConfigError::Invalid { name, value: raw })
}

/// Boolean spellings accepted in environment variables and query strings.
pub fn flag_value(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

#[derive(Clone)]
pub struct AppState {
    pub config: AppConfig,
    pub http: reqwest::Client,
    pub credentials: CredentialStore,
    pub lyrics: Arc<dyn LyricsLookup>,
}

impl AppState {
    pub fn new(config: AppConfig, http: reqwest::Client, lyrics: Arc<dyn LyricsLookup>) -> Self {
        Self {
            config,
            http,
            credentials: CredentialStore::default(),
            lyrics,
        }
    }
}

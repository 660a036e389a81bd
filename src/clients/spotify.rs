//! Spotify accounts service: authorize URL plus the two token grants.

use crate::error::BrokerError;
use crate::models::AppConfig;
use crate::models::oauth::Credential;
use axum::{
    body::Bytes,
    http::{HeaderValue, StatusCode, header::CONTENT_TYPE},
    response::{IntoResponse, Response},
};

pub const AUTH_SCOPES: [&str; 13] = [
    "streaming",
    "user-read-email",
    "user-read-private",
    "user-read-currently-playing",
    "user-read-playback-state",
    "user-modify-playback-state",
    "playlist-modify-public",
    "playlist-read-private",
    "user-library-modify",
    "user-library-read",
    "user-top-read",
    "user-read-playback-position",
    "user-read-recently-played",
];

/// Builds the provider authorize URL. Scopes are space separated and the
/// spaces go out as `%20`.
pub fn authorize_url(config: &AppConfig, state: &str) -> String {
    let scope = AUTH_SCOPES.join(" ");
    let params = [
        ("client_id", config.client_id.as_str()),
        ("response_type", "code"),
        ("redirect_uri", config.redirect_uri.as_str()),
        ("state", state),
        ("scope", scope.as_str()),
    ];

    let query = params
        .iter()
        .map(|(key, value)| format!("{key}={}", urlencoding::encode(value)))
        .collect::<Vec<_>>()
        .join("&");

    let separator = if config.authorize_url.contains('?') { '&' } else { '?' };
    format!("{}{separator}{query}", config.authorize_url)
}

/// Token endpoint body relayed untouched to the caller.
#[derive(Debug)]
pub struct RawTokenResponse {
    pub content_type: Option<HeaderValue>,
    pub body: Bytes,
}

impl IntoResponse for RawTokenResponse {
    fn into_response(self) -> Response {
        let content_type = self
            .content_type
            .unwrap_or_else(|| HeaderValue::from_static("application/json"));
        (StatusCode::OK, [(CONTENT_TYPE, content_type)], self.body).into_response()
    }
}

pub async fn exchange_authorization_code(
    client: &reqwest::Client,
    config: &AppConfig,
    code: &str,
) -> Result<Credential, BrokerError> {
    let form = [
        ("grant_type", "authorization_code"),
        ("code", code),
        ("redirect_uri", config.redirect_uri.as_str()),
    ];

    let response = client
        .post(&config.token_url)
        .basic_auth(&config.client_id, Some(&config.client_secret))
        .form(&form)
        .send()
        .await?;

    let status = response.status();
    let body = response.bytes().await?;
    if status != StatusCode::OK {
        return Err(upstream_error(status, &body));
    }

    Ok(serde_json::from_slice(&body)?)
}

pub async fn refresh_access_token(
    client: &reqwest::Client,
    config: &AppConfig,
    refresh_token: &str,
) -> Result<RawTokenResponse, BrokerError> {
    let form = [
        ("grant_type", "refresh_token"),
        ("refresh_token", refresh_token),
    ];

    let response = client
        .post(&config.token_url)
        .basic_auth(&config.client_id, Some(&config.client_secret))
        .form(&form)
        .send()
        .await?;

    let status = response.status();
    let content_type = response.headers().get(CONTENT_TYPE).cloned();
    let body = response.bytes().await?;
    if !status.is_success() {
        return Err(upstream_error(status, &body));
    }

    Ok(RawTokenResponse { content_type, body })
}

fn upstream_error(status: StatusCode, body: &[u8]) -> BrokerError {
    BrokerError::Upstream {
        status,
        body: String::from_utf8_lossy(body).into_owned(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::test_config;

    #[test]
    fn test_authorize_url_carries_scopes_and_client() {
        let config = test_config("http://127.0.0.1:9/api/token");
        let url = authorize_url(&config, "abc123");

        assert!(url.starts_with("https://accounts.example.test/authorize?"));
        assert!(url.contains("client_id=test-client"));
        assert!(url.contains("response_type=code"));
        assert!(url.contains("state=abc123"));
        assert!(url.contains("scope=streaming%20user-read-email%20user-read-private"));
        assert!(!url.contains("%2520"));

        let parsed = reqwest::Url::parse(&url).unwrap();
        let scope = parsed
            .query_pairs()
            .find(|(k, _)| k == "scope")
            .map(|(_, v)| v.into_owned())
            .unwrap();
        assert_eq!(scope, AUTH_SCOPES.join(" "));
        let redirect = parsed
            .query_pairs()
            .find(|(k, _)| k == "redirect_uri")
            .map(|(_, v)| v.into_owned())
            .unwrap();
        assert_eq!(redirect, "http://localhost:8080/callback");
    }

    #[test]
    fn test_raw_token_response_defaults_to_json() {
        let response = RawTokenResponse {
            content_type: None,
            body: Bytes::from_static(b"{}"),
        }
        .into_response();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.headers()[CONTENT_TYPE], "application/json");
    }
}

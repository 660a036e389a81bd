use axum::{
    http::{StatusCode, header::InvalidHeaderValue},
    response::{IntoResponse, Response},
};
use thiserror::Error;

/// Failures of the OAuth broker routes. Callers only ever see a generic 500;
/// the detail goes to the server log.
#[derive(Debug, Error)]
pub enum BrokerError {
    #[error("provider request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("provider responded with HTTP {status}: {body}")]
    Upstream { status: StatusCode, body: String },
    #[error("could not decode provider response: {0}")]
    Decode(#[from] serde_json::Error),
    #[error("invalid header value: {0}")]
    Header(#[from] InvalidHeaderValue),
    #[error("no refresh token supplied and none cached")]
    MissingRefreshToken,
}

impl IntoResponse for BrokerError {
    fn into_response(self) -> Response {
        tracing::error!(error = %self, "request failed");
        (StatusCode::INTERNAL_SERVER_ERROR, "Internal Server Error").into_response()
    }
}

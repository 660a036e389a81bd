use crate::models::AppState;
use crate::models::lyrics::ErrorResponse;
use crate::models::oauth::{Credential, TokensParams};
use axum::{
    Json,
    extract::{Query, State},
    http::{StatusCode, header::CONTENT_TYPE},
    response::{IntoResponse, Response},
};
use serde::Serialize;
use time::OffsetDateTime;

/// Cached credential as handed to the frontend. Fields are left out until a
/// callback has succeeded.
#[derive(Debug, Default, Serialize)]
pub struct TokensResponse {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub access_token: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub refresh_token: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expires_in: Option<u64>,
}

impl From<&Credential> for TokensResponse {
    fn from(credential: &Credential) -> Self {
        Self {
            access_token: Some(credential.access_token.clone()),
            refresh_token: credential.refresh_token.clone(),
            expires_in: Some(credential.expires_in),
        }
    }
}

pub async fn tokens_handler(
    Query(params): Query<TokensParams>,
    State(app_state): State<AppState>,
) -> Response {
    let current = app_state.credentials.current().await;

    if params.check_expiry.unwrap_or(false) {
        let rejection = match &current {
            None => Some("no_credential"),
            Some(stored) if stored.is_expired_at(OffsetDateTime::now_utc()) => Some("token_expired"),
            Some(_) => None,
        };
        if let Some(error) = rejection {
            let body = Json(ErrorResponse {
                error: error.to_string(),
            });
            return (StatusCode::UNAUTHORIZED, body).into_response();
        }
    }

    let body = current
        .map(|stored| TokensResponse::from(&stored.credential))
        .unwrap_or_default();

    match serde_json::to_vec(&body) {
        Ok(bytes) => (StatusCode::OK, [(CONTENT_TYPE, "application/json")], bytes).into_response(),
        Err(e) => {
            tracing::error!(error = %e, "failed to serialize cached credential");
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}

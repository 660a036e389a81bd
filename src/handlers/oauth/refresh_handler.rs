use crate::clients::spotify;
use crate::error::BrokerError;
use crate::models::AppState;
use crate::models::oauth::RefreshParams;
use axum::{
    extract::{Query, State},
    response::{IntoResponse, Response},
};

/// Trades a refresh token for a new access token and relays the provider's
/// body. The caller's token wins over the cached one; the cache is never
/// updated here.
pub async fn refresh_handler(
    Query(params): Query<RefreshParams>,
    State(app_state): State<AppState>,
) -> Result<Response, BrokerError> {
    tracing::info!("reached refresh token route");

    let refresh_token = match params.refresh_token.filter(|token| !token.is_empty()) {
        Some(token) => token,
        None => app_state
            .credentials
            .current()
            .await
            .and_then(|stored| stored.credential.refresh_token.clone())
            .ok_or(BrokerError::MissingRefreshToken)?,
    };

    let raw = spotify::refresh_access_token(&app_state.http, &app_state.config, &refresh_token)
        .await?;
    Ok(raw.into_response())
}

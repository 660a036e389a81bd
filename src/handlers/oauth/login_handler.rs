use crate::clients::spotify;
use crate::error::BrokerError;
use crate::handlers::found;
use crate::models::AppState;
use crate::models::oauth::STATE_COOKIE;
use axum::{
    extract::State,
    http::{HeaderValue, header::SET_COOKIE},
    response::Response,
};
use oauth2::CsrfToken;
use tower_sessions::cookie::{Cookie, SameSite};

/// 12 random bytes, 16 characters once base64url encoded.
const STATE_TOKEN_BYTES: u32 = 12;

/// The state only lives in the caller's cookie; nothing is kept server side
/// for a login that is never completed.
pub async fn login_handler(State(app_state): State<AppState>) -> Result<Response, BrokerError> {
    let csrf_token = CsrfToken::new_random_len(STATE_TOKEN_BYTES);
    let state = csrf_token.secret().to_string();

    let cookie = Cookie::build((STATE_COOKIE, state.clone()))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .build();

    let mut response = found(&spotify::authorize_url(&app_state.config, &state))?;
    response
        .headers_mut()
        .append(SET_COOKIE, HeaderValue::from_str(&cookie.to_string())?);

    tracing::info!("redirecting to provider authorization");
    Ok(response)
}

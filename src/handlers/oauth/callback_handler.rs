use crate::clients::spotify;
use crate::error::BrokerError;
use crate::handlers::found;
use crate::models::AppState;
use crate::models::oauth::{CallbackParams, STATE_COOKIE};
use axum::{
    extract::{Query, State},
    http::{HeaderMap, HeaderValue, header::COOKIE, header::SET_COOKIE},
    response::Response,
};
use tower_sessions::cookie::Cookie;

const CODE_MISMATCH: &str = "code_mismatch";
const STATE_MISMATCH: &str = "state_mismatch";

pub async fn callback_handler(
    Query(params): Query<CallbackParams>,
    State(app_state): State<AppState>,
    headers: HeaderMap,
) -> Result<Response, BrokerError> {
    tracing::info!("reached callback route");

    let Some(code) = params.code.filter(|code| !code.is_empty()) else {
        let marker = params.error.as_deref().unwrap_or(CODE_MISMATCH);
        tracing::warn!(marker, "callback without authorization code");
        return with_state_cookie_cleared(error_fragment_redirect(marker)?);
    };

    let expected_state = state_cookie(&headers);
    if expected_state.is_none() || expected_state != params.state {
        if app_state.config.verify_state {
            tracing::warn!("state mismatch on callback");
            return with_state_cookie_cleared(error_fragment_redirect(STATE_MISMATCH)?);
        }
        tracing::debug!("callback state not verified");
    }

    let credential =
        spotify::exchange_authorization_code(&app_state.http, &app_state.config, &code).await?;
    app_state.credentials.replace(credential).await;

    tracing::info!("credential stored, redirecting to frontend");
    with_state_cookie_cleared(found(&app_state.config.frontend_url)?)
}

/// Value of the `spotify_auth_state` cookie sent with the request, if any.
fn state_cookie(headers: &HeaderMap) -> Option<String> {
    headers
        .get_all(COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(Cookie::split_parse)
        .filter_map(Result::ok)
        .find(|cookie| cookie.name() == STATE_COOKIE)
        .map(|cookie| cookie.value().to_string())
}

/// A state is single use: every callback outcome expires the cookie.
fn with_state_cookie_cleared(mut response: Response) -> Result<Response, BrokerError> {
    let mut cookie = Cookie::build((STATE_COOKIE, "")).path("/").build();
    cookie.make_removal();
    response
        .headers_mut()
        .append(SET_COOKIE, HeaderValue::from_str(&cookie.to_string())?);
    Ok(response)
}

/// Redirects to `/#{"error":"<marker>"}` with the fragment percent-encoded.
fn error_fragment_redirect(marker: &str) -> Result<Response, BrokerError> {
    let fragment = serde_json::json!({ "error": marker }).to_string();
    found(&format!("/#{}", urlencoding::encode(&fragment)))
}

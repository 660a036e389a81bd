use crate::handlers::lyrics::lyrics_handler;
use crate::handlers::oauth::{callback_handler, login_handler, refresh_handler, tokens_handler};
use crate::handlers::health_handler;
use crate::models::AppState;
use axum::{
    Router,
    http::{HeaderValue, Method},
    routing::get,
};
use tower_http::{
    cors::{AllowOrigin, CorsLayer},
    trace::TraceLayer,
};

pub fn build_router(app_state: AppState) -> Router {
    let allowed_origin = match HeaderValue::from_str(&app_state.config.frontend_origin) {
        Ok(origin) => AllowOrigin::exact(origin),
        Err(e) => {
            tracing::warn!(error = %e, "frontend origin is not a valid header, CORS disabled");
            AllowOrigin::list(Vec::<HeaderValue>::new())
        }
    };
    let cors = CorsLayer::new()
        .allow_origin(allowed_origin)
        .allow_methods([Method::GET]);

    Router::new()
        .route("/", get(health_handler))
        .route("/login", get(login_handler))
        .route("/callback", get(callback_handler))
        .route("/auth/getTokens", get(tokens_handler))
        .route("/refresh_token", get(refresh_handler))
        .route("/getLyrics", get(lyrics_handler))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(app_state)
}

use crate::models::AppState;
use crate::models::lyrics::{ErrorResponse, LyricsParams};
use axum::{
    Json,
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};

/// Relays a lyrics lookup. Unlike the OAuth routes the failure message is
/// passed through to the caller.
pub async fn lyrics_handler(
    Query(params): Query<LyricsParams>,
    State(app_state): State<AppState>,
) -> Response {
    let title = params.song_name.unwrap_or_default();
    let artist = params.artist.unwrap_or_default();

    match app_state.lyrics.lyrics(&title, &artist).await {
        Ok(lyrics) => Json(lyrics).into_response(),
        Err(e) => {
            tracing::error!(error = %e, %title, %artist, "lyrics lookup failed");
            let body = Json(ErrorResponse {
                error: e.to_string(),
            });
            (StatusCode::INTERNAL_SERVER_ERROR, body).into_response()
        }
    }
}

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Deserialize)]
pub struct LyricsParams {
    #[serde(rename = "songName")]
    pub song_name: Option<String>,
    pub artist: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

#[derive(Debug, Error)]
pub enum LyricsError {
    #[error("\"{0}\" property is missing from options")]
    MissingOption(&'static str),
    #[error(transparent)]
    Http(#[from] reqwest::Error),
    #[error("{0}")]
    Other(String),
}

/// Looks up the lyrics of a song. `Ok(None)` means the song was not found.
#[async_trait]
pub trait LyricsLookup: Send + Sync {
    async fn lyrics(&self, title: &str, artist: &str) -> Result<Option<String>, LyricsError>;
}

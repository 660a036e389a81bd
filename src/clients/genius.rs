use crate::models::AppConfig;
use crate::models::lyrics::{LyricsError, LyricsLookup};
use async_trait::async_trait;
use regex::{Captures, Regex};
use serde::Deserialize;
use std::sync::LazyLock;

static PARENTHESISED: LazyLock<Regex> = LazyLock::new(|| Regex::new(r" *\([^)]*\) *").unwrap());
static BRACKETED: LazyLock<Regex> = LazyLock::new(|| Regex::new(r" *\[[^\]]*\]").unwrap());
static FEATURING: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"feat\.|ft\.").unwrap());
static WHITESPACE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s+").unwrap());
static CONTAINER_OPEN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"<div[^>]*data-lyrics-container="true"[^>]*>"#).unwrap());
static DIV_TAG: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"<(/?)div\b[^>]*>").unwrap());
static LINE_BREAK: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?i)<br\s*/?>").unwrap());
static ANY_TAG: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"<[^>]+>").unwrap());
static ENTITY: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"&(#[xX][0-9a-fA-F]+|#[0-9]+|[a-zA-Z]+);").unwrap());

#[derive(Debug, Deserialize)]
struct SearchEnvelope {
    response: SearchResponse,
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    hits: Vec<SearchHit>,
}

#[derive(Debug, Deserialize)]
struct SearchHit {
    #[serde(rename = "type")]
    kind: String,
    result: SongSummary,
}

#[derive(Debug, Deserialize)]
struct SongSummary {
    url: String,
}

/// Genius search API plus lyrics page scraping.
pub struct GeniusClient {
    http: reqwest::Client,
    api_url: String,
    api_key: String,
}

impl GeniusClient {
    pub fn new(http: reqwest::Client, config: &AppConfig) -> Self {
        Self {
            http,
            api_url: config.genius_api_url.trim_end_matches('/').to_string(),
            api_key: config.genius_api_key.clone(),
        }
    }

    async fn search_song_url(&self, query: &str) -> Result<Option<String>, LyricsError> {
        let envelope: SearchEnvelope = self
            .http
            .get(format!("{}/search", self.api_url))
            .query(&[("q", query)])
            .bearer_auth(&self.api_key)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        Ok(envelope
            .response
            .hits
            .into_iter()
            .find(|hit| hit.kind == "song")
            .map(|hit| hit.result.url))
    }
}

#[async_trait]
impl LyricsLookup for GeniusClient {
    async fn lyrics(&self, title: &str, artist: &str) -> Result<Option<String>, LyricsError> {
        if title.trim().is_empty() {
            return Err(LyricsError::MissingOption("title"));
        }
        if artist.trim().is_empty() {
            return Err(LyricsError::MissingOption("artist"));
        }

        let query = optimize_query(title, artist);
        let Some(song_url) = self.search_song_url(&query).await? else {
            tracing::debug!(%query, "no song hit");
            return Ok(None);
        };

        let page = self
            .http
            .get(&song_url)
            .send()
            .await?
            .error_for_status()?
            .text()
            .await?;

        Ok(extract_lyrics(&page))
    }
}

/// Normalises a title/artist pair into a search query: lowercase, no
/// parenthesised or bracketed parts, no featuring markers.
pub fn optimize_query(title: &str, artist: &str) -> String {
    let query = format!("{title} {artist}").to_lowercase();
    let query = PARENTHESISED.replace_all(&query, "");
    let query = BRACKETED.replace_all(&query, "");
    let query = FEATURING.replace_all(&query, "");
    WHITESPACE.replace_all(&query, " ").trim().to_string()
}

/// Pulls the text out of every lyrics container on a song page.
pub fn extract_lyrics(page: &str) -> Option<String> {
    let mut sections = Vec::new();
    let mut extracted_to = 0;

    for open in CONTAINER_OPEN.find_iter(page) {
        // Nested containers were already covered by their enclosing one.
        if open.start() < extracted_to {
            continue;
        }

        let mut depth = 1usize;
        let mut end = page.len();
        for tag in DIV_TAG.captures_iter(&page[open.end()..]) {
            let Some(whole) = tag.get(0) else { continue };
            if tag.get(1).is_some_and(|slash| !slash.as_str().is_empty()) {
                depth -= 1;
                if depth == 0 {
                    end = open.end() + whole.start();
                    break;
                }
            } else {
                depth += 1;
            }
        }
        extracted_to = end;

        let inner = &page[open.end()..end];
        let text = LINE_BREAK.replace_all(inner, "\n");
        let text = ANY_TAG.replace_all(&text, "");
        sections.push(decode_entities(&text));
    }

    let lyrics = sections.join("\n").trim().to_string();
    (!lyrics.is_empty()).then_some(lyrics)
}

/// Decodes numeric references and the common named entities in one pass, so
/// `&amp;#39;` stays `&#39;`. Unknown entities are left as written.
fn decode_entities(text: &str) -> String {
    ENTITY
        .replace_all(text, |caps: &Captures| {
            let name = &caps[1];
            let hex = name.strip_prefix("#x").or_else(|| name.strip_prefix("#X"));
            let decoded = if let Some(hex) = hex {
                u32::from_str_radix(hex, 16).ok().and_then(char::from_u32)
            } else if let Some(decimal) = name.strip_prefix('#') {
                decimal.parse().ok().and_then(char::from_u32)
            } else {
                match name {
                    "amp" => Some('&'),
                    "lt" => Some('<'),
                    "gt" => Some('>'),
                    "quot" => Some('"'),
                    "apos" => Some('\''),
                    "nbsp" => Some(' '),
                    _ => None,
                }
            };
            decoded.map_or_else(|| caps[0].to_string(), String::from)
        })
        .into_owned()
}

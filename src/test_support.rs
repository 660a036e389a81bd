//! Shared fixtures for unit tests: config, stub upstream servers, stub lyrics.

use crate::models::lyrics::{LyricsError, LyricsLookup};
use crate::models::{AppConfig, AppState};
use async_trait::async_trait;
use axum::{
    Router,
    extract::State,
    http::{HeaderMap, StatusCode, header::AUTHORIZATION, header::CONTENT_TYPE},
    response::IntoResponse,
    routing::post,
};
use std::sync::{
    Arc, Mutex,
    atomic::{AtomicUsize, Ordering},
};
use std::time::Duration;

/// `Basic base64("test-client:test-secret")`
pub(crate) const EXPECTED_BASIC_AUTH: &str = "Basic dGVzdC1jbGllbnQ6dGVzdC1zZWNyZXQ=";

pub(crate) fn test_config(token_url: &str) -> AppConfig {
    AppConfig {
        client_id: "test-client".to_string(),
        client_secret: "test-secret".to_string(),
        redirect_uri: "http://localhost:8080/callback".to_string(),
        genius_api_key: "test-genius".to_string(),
        port: 0,
        frontend_url: "https://frontend.example.test".to_string(),
        frontend_origin: "https://frontend.example.test".to_string(),
        authorize_url: "https://accounts.example.test/authorize".to_string(),
        token_url: token_url.to_string(),
        genius_api_url: "http://127.0.0.1:9".to_string(),
        upstream_timeout: Duration::from_secs(5),
        verify_state: false,
    }
}

pub(crate) fn test_state(config: AppConfig, lyrics: StubLyrics) -> AppState {
    AppState::new(config, reqwest::Client::new(), Arc::new(lyrics))
}

/// Binds a stub upstream on an ephemeral port and returns its base URL.
pub(crate) async fn spawn_stub<F>(build: F) -> String
where
    F: FnOnce(&str) -> Router,
{
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind stub listener");
    let base = format!("http://{}", listener.local_addr().expect("stub address"));
    let app = build(&base);
    tokio::spawn(async move {
        axum::serve(listener, app).await.ok();
    });
    base
}

/// A request the stub token endpoint received.
#[derive(Debug, Clone)]
pub(crate) struct SeenRequest {
    pub authorization: Option<String>,
    pub form: String,
}

#[derive(Clone)]
pub(crate) struct StubTokenEndpoint {
    pub hits: Arc<AtomicUsize>,
    pub seen: Arc<Mutex<Vec<SeenRequest>>>,
    status: StatusCode,
    body: &'static str,
}

impl StubTokenEndpoint {
    pub(crate) fn hit_count(&self) -> usize {
        self.hits.load(Ordering::SeqCst)
    }

    pub(crate) fn last_request(&self) -> Option<SeenRequest> {
        self.seen.lock().unwrap().last().cloned()
    }
}

/// Starts a token endpoint at `/api/token` answering every POST with
/// `status` and `body`. Returns the token URL and a handle on what it saw.
pub(crate) async fn spawn_token_stub(
    status: StatusCode,
    body: &'static str,
) -> (String, StubTokenEndpoint) {
    let stub = StubTokenEndpoint {
        hits: Arc::new(AtomicUsize::new(0)),
        seen: Arc::new(Mutex::new(Vec::new())),
        status,
        body,
    };
    let state = stub.clone();
    let base = spawn_stub(move |_| {
        Router::new()
            .route("/api/token", post(stub_token))
            .with_state(state)
    })
    .await;
    (format!("{base}/api/token"), stub)
}

async fn stub_token(
    State(stub): State<StubTokenEndpoint>,
    headers: HeaderMap,
    form: String,
) -> impl IntoResponse {
    stub.hits.fetch_add(1, Ordering::SeqCst);
    let authorization = headers
        .get(AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);
    stub.seen
        .lock()
        .unwrap()
        .push(SeenRequest { authorization, form });
    (stub.status, [(CONTENT_TYPE, "application/json")], stub.body)
}

/// Lyrics collaborator returning a canned result.
pub(crate) struct StubLyrics(pub Result<Option<String>, String>);

#[async_trait]
impl LyricsLookup for StubLyrics {
    async fn lyrics(&self, _title: &str, _artist: &str) -> Result<Option<String>, LyricsError> {
        self.0.clone().map_err(LyricsError::Other)
    }
}

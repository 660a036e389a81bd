use crate::models::app_config::flag_value;
use serde::{Deserialize, Deserializer, Serialize, de};
use std::sync::Arc;
use time::{Date, Duration, OffsetDateTime, PrimitiveDateTime, Time};
use tokio::sync::RwLock;

pub const STATE_COOKIE: &str = "spotify_auth_state";

#[derive(Debug, Deserialize)]
pub struct CallbackParams {
    pub code: Option<String>,
    pub state: Option<String>,
    pub error: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct RefreshParams {
    pub refresh_token: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct TokensParams {
    #[serde(default, deserialize_with = "deserialize_flag")]
    pub check_expiry: Option<bool>,
}

fn deserialize_flag<'de, D>(deserializer: D) -> Result<Option<bool>, D::Error>
where
    D: Deserializer<'de>,
{
    let Some(raw) = Option::<String>::deserialize(deserializer)? else {
        return Ok(None);
    };
    flag_value(&raw)
        .map(Some)
        .ok_or_else(|| de::Error::custom(format!("invalid flag value {raw:?}")))
}

/// Token triple returned by the provider's token endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Credential {
    pub access_token: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub refresh_token: Option<String>,
    pub expires_in: u64,
}

#[derive(Debug)]
pub struct StoredCredential {
    pub credential: Credential,
    pub expires_at: OffsetDateTime,
}

impl StoredCredential {
    pub fn new(credential: Credential, received_at: OffsetDateTime) -> Self {
        let lifetime = Duration::seconds(i64::try_from(credential.expires_in).unwrap_or(i64::MAX));
        let expires_at = received_at
            .checked_add(lifetime)
            .unwrap_or_else(|| PrimitiveDateTime::new(Date::MAX, Time::MIDNIGHT).assume_utc());
        Self {
            credential,
            expires_at,
        }
    }

    pub fn is_expired_at(&self, now: OffsetDateTime) -> bool {
        now >= self.expires_at
    }
}

/// The broker's single cached credential.
///
/// Writers swap in a whole new record, so a reader sees either the previous
/// triple or the next one, never a mix of both.
#[derive(Clone, Default)]
pub struct CredentialStore {
    inner: Arc<RwLock<Option<Arc<StoredCredential>>>>,
}

impl CredentialStore {
    pub async fn replace(&self, credential: Credential) {
        let record = Arc::new(StoredCredential::new(credential, OffsetDateTime::now_utc()));
        *self.inner.write().await = Some(record);
    }

    pub async fn current(&self) -> Option<Arc<StoredCredential>> {
        self.inner.read().await.clone()
    }
}

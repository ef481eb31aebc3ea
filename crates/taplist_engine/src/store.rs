use std::collections::HashMap;
use std::sync::Mutex;
use std::time::Duration;

use chrono::{DateTime, Utc};
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE};
use serde::{Deserialize, Serialize};
use taplist_core::{AvailabilityError, AvailabilityRecord, BeerKey};
use taplist_logging::{tap_debug, tap_warn};
use url::Url;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StoreError {
    #[error("no availability store configured")]
    NotConfigured,
    #[error("availability store unreachable: {0}")]
    Network(String),
    #[error("availability store returned http {status}: {body}")]
    Http { status: u16, body: String },
    #[error("unreadable availability store response: {0}")]
    Decode(String),
    #[error("availability store rejected the write: {0}")]
    WriteRejected(String),
}

impl StoreError {
    /// Errors meaning the store is missing or unreachable, as opposed to a
    /// request it answered but refused.
    pub fn is_unavailable(&self) -> bool {
        match self {
            StoreError::NotConfigured | StoreError::Network(_) => true,
            StoreError::Http { status, .. } => *status >= 500 || matches!(status, 401 | 403 | 404),
            StoreError::Decode(_) | StoreError::WriteRejected(_) => false,
        }
    }
}

impl From<StoreError> for AvailabilityError {
    fn from(err: StoreError) -> Self {
        if err.is_unavailable() {
            AvailabilityError::Unavailable(err.to_string())
        } else {
            AvailabilityError::WriteFailed(err.to_string())
        }
    }
}

/// Remote table of availability flags keyed by `(brewery, beer_name)`.
///
/// Writes go through distinct insert and update paths; callers pick one
/// after a point read. Concurrent writers from other clients are resolved
/// by the store alone (last write wins).
#[async_trait::async_trait]
pub trait AvailabilityStore: Send + Sync {
    async fn load_all(&self) -> Result<Vec<(BeerKey, AvailabilityRecord)>, StoreError>;
    async fn get(&self, key: &BeerKey) -> Result<Option<AvailabilityRecord>, StoreError>;
    async fn insert(&self, key: &BeerKey, record: &AvailabilityRecord) -> Result<(), StoreError>;
    async fn update(&self, key: &BeerKey, record: &AvailabilityRecord) -> Result<(), StoreError>;
}

/// Wire shape of one row of the hosted table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AvailabilityRow {
    pub brewery: String,
    pub beer_name: String,
    pub is_available: bool,
    #[serde(default)]
    pub updated_by: String,
    pub updated_at: DateTime<Utc>,
}

impl AvailabilityRow {
    pub fn new(key: &BeerKey, record: &AvailabilityRecord) -> Self {
        Self {
            brewery: key.brewery.clone(),
            beer_name: key.name.clone(),
            is_available: record.is_available,
            updated_by: record.updated_by.clone(),
            updated_at: record.updated_at,
        }
    }

    pub fn into_entry(self) -> (BeerKey, AvailabilityRecord) {
        (
            BeerKey::new(self.brewery, self.beer_name),
            AvailabilityRecord {
                is_available: self.is_available,
                updated_by: self.updated_by,
                updated_at: self.updated_at,
            },
        )
    }
}

#[derive(Debug, Serialize)]
struct AvailabilityPatch<'a> {
    is_available: bool,
    updated_by: &'a str,
    updated_at: DateTime<Utc>,
}

const SELECT_COLUMNS: &str = "brewery,beer_name,is_available,updated_by,updated_at";

/// Client for a PostgREST-style hosted table (`{base}/rest/v1/{table}`).
pub struct RestAvailabilityStore {
    client: reqwest::Client,
    table_url: Url,
}

impl RestAvailabilityStore {
    pub fn new(base_url: &str, api_key: &str, table: &str) -> Result<Self, StoreError> {
        let table_url = Url::parse(base_url)
            .and_then(|base| base.join(&format!("rest/v1/{table}")))
            .map_err(|err| StoreError::Network(format!("invalid store url: {err}")))?;

        let mut headers = HeaderMap::new();
        let key = HeaderValue::from_str(api_key)
            .map_err(|err| StoreError::Network(format!("invalid api key: {err}")))?;
        let bearer = HeaderValue::from_str(&format!("Bearer {api_key}"))
            .map_err(|err| StoreError::Network(format!("invalid api key: {err}")))?;
        headers.insert("apikey", key);
        headers.insert(AUTHORIZATION, bearer);

        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(15))
            .default_headers(headers)
            .build()
            .map_err(|err| StoreError::Network(err.to_string()))?;

        Ok(Self { client, table_url })
    }

    fn url_with(&self, pairs: &[(&str, &str)]) -> Url {
        let mut url = self.table_url.clone();
        url.query_pairs_mut().extend_pairs(pairs);
        url
    }

    fn key_filter(key: &BeerKey) -> [(&'static str, String); 2] {
        [
            ("brewery", format!("eq.{}", key.brewery)),
            ("beer_name", format!("eq.{}", key.name)),
        ]
    }

    async fn fetch_rows(&self, url: Url) -> Result<Vec<AvailabilityRow>, StoreError> {
        let response = self.client.get(url).send().await.map_err(map_reqwest_error)?;
        let body = read_success(response).await?;
        serde_json::from_slice(&body).map_err(|err| StoreError::Decode(err.to_string()))
    }

    async fn send_json(
        &self,
        request: reqwest::RequestBuilder,
        payload: &impl Serialize,
    ) -> Result<Vec<u8>, StoreError> {
        let body = serde_json::to_vec(payload).map_err(|err| StoreError::Decode(err.to_string()))?;
        let response = request
            .header(CONTENT_TYPE, "application/json")
            .header("Prefer", "return=representation")
            .body(body)
            .send()
            .await
            .map_err(map_reqwest_error)?;
        read_success(response).await
    }
}

#[async_trait::async_trait]
impl AvailabilityStore for RestAvailabilityStore {
    async fn load_all(&self) -> Result<Vec<(BeerKey, AvailabilityRecord)>, StoreError> {
        let rows = self.fetch_rows(self.url_with(&[("select", SELECT_COLUMNS)])).await?;
        tap_debug!("Loaded {} availability rows", rows.len());
        Ok(rows.into_iter().map(AvailabilityRow::into_entry).collect())
    }

    async fn get(&self, key: &BeerKey) -> Result<Option<AvailabilityRecord>, StoreError> {
        let [brewery, name] = Self::key_filter(key);
        let url = self.url_with(&[
            ("select", SELECT_COLUMNS),
            (brewery.0, &brewery.1),
            (name.0, &name.1),
            ("limit", "1"),
        ]);
        let rows = self.fetch_rows(url).await?;
        Ok(rows.into_iter().next().map(|row| row.into_entry().1))
    }

    async fn insert(&self, key: &BeerKey, record: &AvailabilityRecord) -> Result<(), StoreError> {
        let request = self.client.post(self.table_url.clone());
        self.send_json(request, &[AvailabilityRow::new(key, record)]).await?;
        Ok(())
    }

    async fn update(&self, key: &BeerKey, record: &AvailabilityRecord) -> Result<(), StoreError> {
        let [brewery, name] = Self::key_filter(key);
        let url = self.url_with(&[(brewery.0, &brewery.1), (name.0, &name.1)]);
        let patch = AvailabilityPatch {
            is_available: record.is_available,
            updated_by: &record.updated_by,
            updated_at: record.updated_at,
        };
        let body = self.send_json(self.client.patch(url), &patch).await?;
        let updated: Vec<AvailabilityRow> =
            serde_json::from_slice(&body).map_err(|err| StoreError::Decode(err.to_string()))?;
        if updated.is_empty() {
            return Err(StoreError::WriteRejected(format!("no row matched {key}")));
        }
        Ok(())
    }
}

async fn read_success(response: reqwest::Response) -> Result<Vec<u8>, StoreError> {
    let status = response.status();
    let body = response.bytes().await.map_err(map_reqwest_error)?;
    if !status.is_success() {
        let body = String::from_utf8_lossy(&body).into_owned();
        tap_warn!("Availability store answered {}: {}", status, body);
        return Err(StoreError::Http {
            status: status.as_u16(),
            body,
        });
    }
    Ok(body.to_vec())
}

fn map_reqwest_error(err: reqwest::Error) -> StoreError {
    StoreError::Network(err.to_string())
}

/// In-process store with the same insert/update contract as the hosted
/// table: inserting an existing key or updating a missing one is rejected.
#[derive(Default)]
pub struct MemoryAvailabilityStore {
    rows: Mutex<HashMap<BeerKey, AvailabilityRecord>>,
}

impl MemoryAvailabilityStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_records(records: impl IntoIterator<Item = (BeerKey, AvailabilityRecord)>) -> Self {
        Self {
            rows: Mutex::new(records.into_iter().collect()),
        }
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, HashMap<BeerKey, AvailabilityRecord>>, StoreError> {
        self.rows
            .lock()
            .map_err(|_| StoreError::Network("memory store poisoned".into()))
    }
}

#[async_trait::async_trait]
impl AvailabilityStore for MemoryAvailabilityStore {
    async fn load_all(&self) -> Result<Vec<(BeerKey, AvailabilityRecord)>, StoreError> {
        Ok(self
            .lock()?
            .iter()
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect())
    }

    async fn get(&self, key: &BeerKey) -> Result<Option<AvailabilityRecord>, StoreError> {
        Ok(self.lock()?.get(key).cloned())
    }

    async fn insert(&self, key: &BeerKey, record: &AvailabilityRecord) -> Result<(), StoreError> {
        let mut rows = self.lock()?;
        if rows.contains_key(key) {
            return Err(StoreError::WriteRejected(format!("{key} already exists")));
        }
        rows.insert(key.clone(), record.clone());
        Ok(())
    }

    async fn update(&self, key: &BeerKey, record: &AvailabilityRecord) -> Result<(), StoreError> {
        let mut rows = self.lock()?;
        match rows.get_mut(key) {
            Some(existing) => {
                *existing = record.clone();
                Ok(())
            }
            None => Err(StoreError::WriteRejected(format!("no row matched {key}"))),
        }
    }
}

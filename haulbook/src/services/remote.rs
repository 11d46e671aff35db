//! Remote document store
//!
//! The sync agent only needs three things from the remote side: a way to
//! tell whether it is reachable, a way to connect, and a create-or-update
//! push that hands back the document id. [`HttpRemoteStore`] implements
//! them over a JSON document API.

use crate::config::REMOTE_REQUEST_TIMEOUT;
use crate::database::SyncRecord;
use crate::error::{AppError, Result};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicBool, Ordering};

/// Document pushed for one trip
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SyncPayload {
    pub trip_id: i64,
    pub remote_id: Option<String>,
    pub deleted: bool,
    pub container_no: String,
    pub load_location: String,
    pub unload_location: String,
    pub container_size: Option<String>,
    pub status: Option<String>,
    pub day_night: Option<String>,
    pub tow_plate: String,
    pub notes: String,
    pub created_by: Option<String>,
    /// Epoch milliseconds
    pub created_at: i64,
}

impl From<&SyncRecord> for SyncPayload {
    fn from(record: &SyncRecord) -> Self {
        Self {
            trip_id: record.trip_id,
            remote_id: record.remote_id.clone().filter(|id| !id.is_empty()),
            deleted: record.deleted,
            container_no: record.container_no.clone(),
            load_location: record.load_location.clone(),
            unload_location: record.unload_location.clone(),
            container_size: record.container_size.map(|s| s.as_str().to_string()),
            status: record.load_state.map(|s| s.as_str().to_string()),
            day_night: None,
            tow_plate: record.vehicle_plate.clone(),
            notes: record.notes.clone(),
            created_by: None,
            created_at: record.created_at.timestamp_millis(),
        }
    }
}

/// Remote side of the synchronization
#[async_trait]
pub trait RemoteStore: Send + Sync {
    async fn is_connected(&self) -> bool;

    async fn connect(&self) -> Result<()>;

    /// Create or update the document and return its remote id
    async fn push(&self, payload: &SyncPayload) -> Result<String>;
}

#[derive(Debug, Deserialize)]
struct PushResponse {
    id: String,
}

/// JSON document API reached over HTTP
pub struct HttpRemoteStore {
    client: reqwest::Client,
    endpoint: String,
    collection: String,
    token: Option<String>,
    connected: AtomicBool,
}

impl HttpRemoteStore {
    pub fn new(endpoint: &str, collection: &str, token: Option<String>) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(REMOTE_REQUEST_TIMEOUT)
            .build()?;

        Ok(Self {
            client,
            endpoint: endpoint.trim_end_matches('/').to_string(),
            collection: collection.trim_matches('/').to_string(),
            token,
            connected: AtomicBool::new(false),
        })
    }

    fn authorize(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match &self.token {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }

    fn document_url(&self, remote_id: Option<&str>) -> String {
        match remote_id {
            Some(id) => format!("{}/{}/{}", self.endpoint, self.collection, id),
            None => format!("{}/{}", self.endpoint, self.collection),
        }
    }

    /// Transport failures mean the next tick has to reconnect
    fn transport_failed(&self, err: reqwest::Error) -> AppError {
        if err.is_connect() || err.is_timeout() {
            self.connected.store(false, Ordering::SeqCst);
        }
        AppError::Http(err)
    }
}

#[async_trait]
impl RemoteStore for HttpRemoteStore {
    async fn is_connected(&self) -> bool {
        self.connected.load(Ordering::SeqCst)
    }

    async fn connect(&self) -> Result<()> {
        tracing::info!("Connecting to remote store at {}", self.endpoint);

        let response = self
            .authorize(self.client.get(&self.endpoint))
            .send()
            .await
            .map_err(|e| self.transport_failed(e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(AppError::Remote(format!(
                "Remote store answered {} on connect",
                status
            )));
        }

        self.connected.store(true, Ordering::SeqCst);
        tracing::info!("Connected to remote store");
        Ok(())
    }

    async fn push(&self, payload: &SyncPayload) -> Result<String> {
        let url = self.document_url(payload.remote_id.as_deref());

        let request = match payload.remote_id {
            Some(_) => self.client.put(&url),
            None => self.client.post(&url),
        };

        let response = self
            .authorize(request)
            .json(payload)
            .send()
            .await
            .map_err(|e| self.transport_failed(e))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::Remote(format!(
                "Push of trip {} rejected with {}: {}",
                payload.trip_id,
                status,
                body.trim()
            )));
        }

        let body: PushResponse = response.json().await?;
        tracing::debug!("Pushed trip {} as {}", payload.trip_id, body.id);
        Ok(body.id)
    }
}

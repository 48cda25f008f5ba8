//! Resilient client for the remote contact store.
//!
//! Every request carries bearer auth, a stable user identifier, and a
//! fresh request id. Rate limits and network failures are retried with
//! exponential backoff; writes that still fail are redirected to the
//! local durable queue instead of being lost.

use crate::error::{RemoteError, Result};
use crate::transport::{ApiRequest, ApiResponse, HttpTransport, Method, ReqwestTransport};
use demori_core::settings::RemoteSettings;
use demori_core::{AggregatedProfile, ContactQuery};
use demori_store::{queue, Store, WriteKind};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::sync::Arc;
use std::time::Duration;

/// Maximum number of attempts for retryable errors.
const MAX_ATTEMPTS: u32 = 3;

/// Base delay in milliseconds for retry backoff (doubles per attempt).
const BASE_DELAY_MS: u64 = 1000;

/// Default transport timeout in seconds.
const TRANSPORT_TIMEOUT_SECS: u64 = 30;

/// Outcome of a best-effort write to the remote store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SaveOutcome {
    /// The store accepted the record.
    Stored {
        /// Server-assigned id, when the store returned one
        remote_id: Option<String>,
    },
    /// The store was unreachable; the record sits in the durable queue.
    Queued,
}

/// Result of one sync pass over the durable queue.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SyncReport {
    /// Unsynced rows submitted in the batch
    pub submitted: usize,
    /// Rows the store acknowledged this pass
    pub synced: usize,
    /// Rows still unsynced after the pass
    pub remaining: usize,
}

/// Summary of a completed search, pushed to the store's history endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchRecord {
    /// Queried name
    pub name: String,
    /// Queried company
    pub company: String,
    /// Email candidates found
    pub email_count: usize,
    /// Phone candidates found
    pub phone_count: usize,
    /// Social profiles found
    pub social_count: usize,
    /// Overall confidence of the result
    pub confidence: f64,
    /// When the search ran (RFC3339 timestamp)
    pub recorded_at: String,
}

/// Retrying, rate-limit-aware, offline-tolerant client for the remote
/// contact store.
///
/// The client is the sole owner of the durable queue's `synced` flag:
/// failed writes land there, and [`RemoteClient::sync_pending`] is the
/// only code path that marks rows synced.
pub struct RemoteClient {
    transport: Arc<dyn HttpTransport>,
    store: Arc<Store>,
    base_url: String,
    api_key: String,
    user_id: String,
}

impl RemoteClient {
    /// Create a client with the production `reqwest` transport.
    ///
    /// # Errors
    /// Returns error if the HTTP client cannot be created.
    pub fn new(settings: &RemoteSettings, store: Arc<Store>) -> Result<Self> {
        let transport = ReqwestTransport::new(Duration::from_secs(TRANSPORT_TIMEOUT_SECS))?;
        Ok(Self::with_transport(Arc::new(transport), settings, store))
    }

    /// Create a client with an injected transport.
    #[must_use]
    pub fn with_transport(
        transport: Arc<dyn HttpTransport>,
        settings: &RemoteSettings,
        store: Arc<Store>,
    ) -> Self {
        Self {
            transport,
            store,
            base_url: settings.base_url.trim_end_matches('/').to_string(),
            api_key: settings.api_key.clone(),
            user_id: settings.user_id.clone(),
        }
    }

    /// Backoff delay before the next attempt: `2^attempt * 1000 ms`.
    #[must_use]
    pub fn backoff_delay(attempt: u32) -> Duration {
        Duration::from_millis(BASE_DELAY_MS * 2u64.pow(attempt))
    }

    fn build_request(&self, endpoint: &str, method: Method, body: Option<Value>) -> ApiRequest {
        ApiRequest {
            method,
            url: format!("{}{endpoint}", self.base_url),
            headers: vec![
                (
                    "Authorization".to_string(),
                    format!("Bearer {}", self.api_key),
                ),
                ("X-Demori-User".to_string(), self.user_id.clone()),
                (
                    "X-Request-Id".to_string(),
                    uuid::Uuid::new_v4().to_string(),
                ),
            ],
            body,
        }
    }

    /// Issue a request with retry and backoff.
    ///
    /// HTTP 429 and network-class errors retry up to [`MAX_ATTEMPTS`]
    /// times; 5xx responses are treated the same way. Any other 4xx fails
    /// immediately without retry.
    ///
    /// # Errors
    /// Returns `RemoteError::Unavailable` after exhausting retries,
    /// `RemoteError::Api` for non-retryable statuses.
    pub async fn request(
        &self,
        endpoint: &str,
        method: Method,
        body: Option<Value>,
    ) -> Result<Value> {
        for attempt in 0..MAX_ATTEMPTS {
            // Fresh request id on every attempt
            let request = self.build_request(endpoint, method, body.clone());

            match self.transport.execute(request).await {
                Ok(response) if response.is_success() => return Ok(response.body),
                Ok(ApiResponse { status: 429, .. }) => {
                    tracing::warn!(
                        endpoint,
                        attempt = attempt + 1,
                        max = MAX_ATTEMPTS,
                        "rate limited by remote store"
                    );
                }
                Ok(response) if (400..500).contains(&response.status) => {
                    return Err(RemoteError::Api {
                        endpoint: endpoint.to_string(),
                        status: response.status,
                        message: response
                            .body
                            .get("error")
                            .and_then(Value::as_str)
                            .unwrap_or("unknown error")
                            .to_string(),
                    });
                }
                Ok(response) => {
                    tracing::warn!(
                        endpoint,
                        status = response.status,
                        attempt = attempt + 1,
                        "remote store server error"
                    );
                }
                Err(RemoteError::Network(message)) => {
                    tracing::warn!(
                        endpoint,
                        attempt = attempt + 1,
                        error = %message,
                        "network error talking to remote store"
                    );
                }
                Err(other) => return Err(other),
            }

            tokio::time::sleep(Self::backoff_delay(attempt)).await;
        }

        Err(RemoteError::Unavailable {
            endpoint: endpoint.to_string(),
            attempts: MAX_ATTEMPTS,
        })
    }

    /// Search the remote store for existing contact profiles.
    ///
    /// # Errors
    /// Returns `RemoteError::Unavailable` when the store cannot be
    /// reached; callers treat that as "no remote data".
    pub async fn search_contacts(
        &self,
        query: &ContactQuery,
        min_confidence: f64,
        limit: u32,
    ) -> Result<Vec<AggregatedProfile>> {
        let body = json!({
            "name": query.name,
            "company": query.company,
            "title": query.title,
            "location": query.location,
            "min_confidence": min_confidence,
            "limit": limit,
        });

        let response = self
            .request("/contacts/search", Method::Post, Some(body))
            .await?;

        match response.get("results") {
            None | Some(Value::Null) => Ok(Vec::new()),
            Some(results) => serde_json::from_value(results.clone())
                .map_err(|e| RemoteError::Parse(format!("bad search results: {e}"))),
        }
    }

    /// Save a contact profile, falling back to the durable queue when the
    /// store is unreachable.
    ///
    /// # Errors
    /// Returns `RemoteError::Api` for non-retryable rejections (queueing
    /// those would retry a record the store will never accept) and queue
    /// errors if even the local fallback fails.
    pub async fn save_contact(&self, profile: &AggregatedProfile) -> Result<SaveOutcome> {
        let payload = serde_json::to_value(profile)?;

        match self.request("/contacts", Method::Post, Some(payload.clone())).await {
            Ok(body) => Ok(SaveOutcome::Stored {
                remote_id: body.get("id").and_then(Value::as_str).map(String::from),
            }),
            Err(RemoteError::Unavailable { .. } | RemoteError::Network(_)) => {
                tracing::info!("remote store unreachable, queueing contact write");
                queue::enqueue(self.store.pool(), WriteKind::Contact, &payload).await?;
                Ok(SaveOutcome::Queued)
            }
            Err(other) => Err(other),
        }
    }

    /// Save a search history record, falling back to the durable queue
    /// when the store is unreachable.
    ///
    /// # Errors
    /// Same contract as [`RemoteClient::save_contact`].
    pub async fn save_search(&self, record: &SearchRecord) -> Result<SaveOutcome> {
        let payload = serde_json::to_value(record)?;

        match self.request("/searches", Method::Post, Some(payload.clone())).await {
            Ok(body) => Ok(SaveOutcome::Stored {
                remote_id: body.get("id").and_then(Value::as_str).map(String::from),
            }),
            Err(RemoteError::Unavailable { .. } | RemoteError::Network(_)) => {
                tracing::info!("remote store unreachable, queueing search write");
                queue::enqueue(self.store.pool(), WriteKind::Search, &payload).await?;
                Ok(SaveOutcome::Queued)
            }
            Err(other) => Err(other),
        }
    }

    /// Drain the durable queue in one batch.
    ///
    /// Idempotent: reads all unsynced rows, submits them as a single
    /// batch, and marks each acknowledged row synced with its
    /// server-assigned id. Rows the store did not acknowledge stay
    /// unsynced for the next pass. Not safe to run concurrently with a
    /// second sync.
    ///
    /// # Errors
    /// Returns error if the batch request itself fails; queued rows are
    /// left untouched in that case.
    pub async fn sync_pending(&self) -> Result<SyncReport> {
        let pending = queue::unsynced(self.store.pool()).await?;
        if pending.is_empty() {
            return Ok(SyncReport {
                submitted: 0,
                synced: 0,
                remaining: 0,
            });
        }

        let writes: Vec<Value> = pending
            .iter()
            .map(|w| {
                json!({
                    "id": w.id,
                    "kind": w.kind.to_string(),
                    "payload": w.payload,
                })
            })
            .collect();

        let response = self
            .request("/contacts/batch", Method::Post, Some(json!({ "writes": writes })))
            .await?;

        let mut synced = 0usize;
        if let Some(results) = response.get("results").and_then(Value::as_array) {
            for result in results {
                let Some(id) = result.get("id").and_then(Value::as_str) else {
                    continue;
                };
                // Only acknowledge ids we actually submitted
                if !pending.iter().any(|w| w.id == id) {
                    continue;
                }
                let remote_id = result.get("remote_id").and_then(Value::as_str);
                queue::mark_synced(self.store.pool(), id, remote_id).await?;
                synced += 1;
            }
        }

        let report = SyncReport {
            submitted: pending.len(),
            synced,
            remaining: pending.len() - synced,
        };

        tracing::info!(
            submitted = report.submitted,
            synced = report.synced,
            remaining = report.remaining,
            "sync pass complete"
        );

        Ok(report)
    }

    /// Probe the store's health endpoint.
    ///
    /// An unreachable store reports `Ok(false)` rather than an error.
    ///
    /// # Errors
    /// Returns error only for non-retryable API failures.
    pub async fn health(&self) -> Result<bool> {
        match self.request("/health", Method::Get, None).await {
            Ok(_) => Ok(true),
            Err(RemoteError::Unavailable { .. } | RemoteError::Network(_)) => Ok(false),
            Err(other) => Err(other),
        }
    }
}

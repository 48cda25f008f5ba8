//! End-to-end search pipeline tests: live fan-out with the real
//! adapters, cache behavior, remote short-circuit, and queue sync.

use async_trait::async_trait;
use demori_core::settings::{EngineSettings, RemoteSettings, SourceToggles};
use demori_core::{ContactQuery, SearchOrigin};
use demori_engine::SearchOrchestrator;
use demori_remote::{ApiRequest, ApiResponse, HttpTransport, RemoteClient, RemoteError};
use demori_sources::SourceRegistry;
use demori_store::{queue, Store, WriteKind};
use serde_json::{json, Value};
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

/// Transport that replays scripted outcomes, then answers 200/null.
struct ScriptedTransport {
    script: Mutex<VecDeque<Result<ApiResponse, RemoteError>>>,
}

impl ScriptedTransport {
    fn new(script: Vec<Result<ApiResponse, RemoteError>>) -> Arc<Self> {
        Arc::new(Self {
            script: Mutex::new(script.into()),
        })
    }
}

#[async_trait]
impl HttpTransport for ScriptedTransport {
    async fn execute(&self, _request: ApiRequest) -> Result<ApiResponse, RemoteError> {
        self.script
            .lock()
            .expect("script lock")
            .pop_front()
            .unwrap_or_else(|| {
                Ok(ApiResponse {
                    status: 200,
                    body: Value::Null,
                })
            })
    }
}

fn remote_settings() -> RemoteSettings {
    RemoteSettings {
        base_url: "https://api.demori.test".to_string(),
        api_key: "test-key".to_string(),
        user_id: "user-1".to_string(),
    }
}

async fn in_memory_store() -> Arc<Store> {
    Arc::new(Store::in_memory().await.expect("create store"))
}

#[tokio::test]
async fn live_search_with_standard_sources() {
    let store = in_memory_store().await;
    let settings = EngineSettings::default();
    let registry = SourceRegistry::standard(&settings);
    let orchestrator = SearchOrchestrator::with_parts(settings, registry, store, None);

    let query = ContactQuery::new("Ahmed Rashid")
        .with_company("Acme Corp")
        .with_title("Staff Engineer")
        .with_location("London, UK");

    let outcome = orchestrator.search(&query).await.expect("search");

    assert_eq!(outcome.origin, SearchOrigin::LiveSearch);
    assert!(!outcome.profile.is_empty());
    assert!((0.0..=1.0).contains(&outcome.profile.confidence));
    // The company-website adapter is deterministic, so its best pattern
    // is always present
    assert!(outcome
        .profile
        .emails
        .iter()
        .any(|e| e.address == "ahmed.rashid@acmecorp.com"));
    // Candidate lists come back ranked best-first
    for pair in outcome.profile.emails.windows(2) {
        assert!(pair[0].confidence >= pair[1].confidence);
    }

    let entries = orchestrator.history(10).await.expect("history");
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].name, "Ahmed Rashid");
}

#[tokio::test]
async fn repeated_search_is_served_from_cache() {
    let store = in_memory_store().await;
    let settings = EngineSettings::default();
    let registry = SourceRegistry::standard(&settings);
    let orchestrator = SearchOrchestrator::with_parts(settings, registry, store, None);

    let query = ContactQuery::new("Ada Lovelace").with_company("Acme Corp");

    let first = orchestrator.search(&query).await.expect("first search");
    assert_eq!(first.origin, SearchOrigin::LiveSearch);

    let second = orchestrator.search(&query).await.expect("second search");
    assert_eq!(second.origin, SearchOrigin::Cache);
    assert_eq!(second.profile.emails, first.profile.emails);

    // Whitespace and case variations share the cache entry
    let variant = ContactQuery::new("  ada   LOVELACE ").with_company("ACME corp");
    let third = orchestrator.search(&variant).await.expect("third search");
    assert_eq!(third.origin, SearchOrigin::Cache);
}

#[tokio::test]
async fn remote_hit_short_circuits_live_search() {
    let store = in_memory_store().await;

    let remote_profile = json!({
        "query": {"name": "Ada Lovelace", "company": "Acme Corp"},
        "emails": [{"address": "ada@acmecorp.com", "confidence": 0.95, "verified": true}],
        "phones": [],
        "social_profiles": [],
        "sources": ["company-website"],
        "confidence": 0.95,
        "partial": false,
        "last_updated": "2026-08-28T00:00:00Z",
    });
    let transport = ScriptedTransport::new(vec![Ok(ApiResponse {
        status: 200,
        body: json!({"results": [remote_profile]}),
    })]);
    let remote = Arc::new(RemoteClient::with_transport(
        transport,
        &remote_settings(),
        store.clone(),
    ));

    let settings = EngineSettings::default();
    let registry = SourceRegistry::standard(&settings);
    let orchestrator =
        SearchOrchestrator::with_parts(settings, registry, store, Some(remote));

    let query = ContactQuery::new("Ada Lovelace").with_company("Acme Corp");
    let outcome = orchestrator.search(&query).await.expect("search");

    assert_eq!(outcome.origin, SearchOrigin::Remote);
    assert_eq!(outcome.profile.emails[0].address, "ada@acmecorp.com");
    assert!(outcome.profile.emails[0].verified);

    // Remote hits leave no local traces
    let entries = orchestrator.history(10).await.expect("history");
    assert!(entries.is_empty());
}

// Runs on real time: under a paused clock the sqlite worker thread races
// tokio's auto-advanced timers, so pool acquires spuriously hit their
// timeout and the queued writes are lost. The cost is sitting through the
// real retry backoffs (1s + 2s per failing request).
#[tokio::test]
async fn remote_outage_degrades_to_live_search_and_queues_writes() {
    let store = in_memory_store().await;

    // Every request fails: the remote search degrades, and both
    // follow-up saves land in the durable queue
    let transport = ScriptedTransport::new(
        (0..12)
            .map(|_| Err(RemoteError::Network("connection refused".to_string())))
            .collect(),
    );
    let remote = Arc::new(RemoteClient::with_transport(
        transport,
        &remote_settings(),
        store.clone(),
    ));

    let settings = EngineSettings::default();
    let registry = SourceRegistry::standard(&settings);
    let orchestrator =
        SearchOrchestrator::with_parts(settings, registry, store.clone(), Some(remote));

    let query = ContactQuery::new("Ada Lovelace").with_company("Acme Corp");
    let outcome = orchestrator.search(&query).await.expect("search");

    assert_eq!(outcome.origin, SearchOrigin::LiveSearch);
    assert!(!outcome.profile.is_empty());

    let pending = queue::pending_count(store.pool()).await.expect("count");
    assert_eq!(pending, 2);

    let writes = queue::unsynced(store.pool()).await.expect("unsynced");
    assert!(writes.iter().any(|w| w.kind == WriteKind::Contact));
    assert!(writes.iter().any(|w| w.kind == WriteKind::Search));
}

#[tokio::test]
async fn sync_drains_queued_writes() {
    let store = in_memory_store().await;

    let first = queue::enqueue(store.pool(), WriteKind::Contact, &json!({"name": "Ada"}))
        .await
        .expect("enqueue contact");
    let second = queue::enqueue(store.pool(), WriteKind::Search, &json!({"name": "Ada"}))
        .await
        .expect("enqueue search");

    let transport = ScriptedTransport::new(vec![Ok(ApiResponse {
        status: 200,
        body: json!({
            "results": [
                {"id": first.id, "remote_id": "srv-1"},
                {"id": second.id, "remote_id": "srv-2"},
            ]
        }),
    })]);
    let remote = Arc::new(RemoteClient::with_transport(
        transport,
        &remote_settings(),
        store.clone(),
    ));

    let orchestrator = SearchOrchestrator::with_parts(
        EngineSettings::default(),
        SourceRegistry::new(),
        store.clone(),
        Some(remote),
    );

    let report = orchestrator.sync().await.expect("sync").expect("report");
    assert_eq!(report.submitted, 2);
    assert_eq!(report.synced, 2);
    assert_eq!(report.remaining, 0);

    let pending = queue::pending_count(store.pool()).await.expect("count");
    assert_eq!(pending, 0);
}

#[tokio::test]
async fn disabled_sources_without_remote_fall_back() {
    let store = in_memory_store().await;
    let mut settings = EngineSettings::default();
    settings.sources = SourceToggles::none();
    let registry = SourceRegistry::standard(&EngineSettings::default());

    let orchestrator = SearchOrchestrator::with_parts(settings, registry, store, None);

    let query = ContactQuery::new("Ahmed Rashid").with_company("Acme Corp");
    let outcome = orchestrator.search(&query).await.expect("search");

    assert_eq!(outcome.origin, SearchOrigin::Fallback);
    assert!(outcome.profile.partial);
    assert_eq!(outcome.profile.emails.len(), 1);
    assert_eq!(outcome.profile.emails[0].address, "ahmed.rashid@acmecorp.com");
}

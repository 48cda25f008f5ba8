//! The search orchestrator: cache, remote store, adapter fan-out,
//! aggregation, persistence, fallback.

use crate::aggregator;
use crate::fallback;
use demori_core::settings::{EngineSettings, SyncMode};
use demori_core::{AggregatedProfile, ContactQuery, DemoriError, SearchOrigin, SourceResult};
use demori_remote::{RemoteClient, SaveOutcome, SearchRecord, SyncReport};
use demori_sources::{ContactSource, SourceError, SourceRegistry};
use demori_store::{cache, history, HistoryEntry, Store};
use futures::stream::{self, StreamExt};
use std::sync::{Arc, PoisonError, RwLock};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

/// A completed search: the profile plus where it came from.
#[derive(Debug, Clone)]
pub struct SearchOutcome {
    /// The aggregated profile
    pub profile: AggregatedProfile,
    /// Which stage of the pipeline produced it
    pub origin: SearchOrigin,
}

/// Public entry point for contact searches.
///
/// Sequences the pipeline for each query: validate, cache lookup, remote
/// store lookup, concurrent adapter fan-out, aggregation, persistence,
/// fallback. Settings are taken as a snapshot at construction and swapped
/// only on [`SearchOrchestrator::update_settings`]; nothing polls the
/// config file.
///
/// No stage is fatal to the caller except an invalid query: source
/// failures are isolated, persistence failures are logged, and a remote
/// outage degrades to "no remote data". The worst outcome is a
/// low-confidence fallback profile.
pub struct SearchOrchestrator {
    settings: RwLock<EngineSettings>,
    registry: RwLock<SourceRegistry>,
    // True when the registry was built by `standard`; such registries are
    // rebuilt on settings updates so adapter construction parameters
    // (search depth, verification flags) track the new snapshot.
    standard_registry: bool,
    store: Arc<Store>,
    remote: Option<Arc<RemoteClient>>,
}

impl SearchOrchestrator {
    /// Create an orchestrator with the five standard sources and, when
    /// configured, a remote store client.
    ///
    /// # Errors
    /// Returns error if the remote client cannot be constructed.
    pub fn new(settings: EngineSettings, store: Arc<Store>) -> Result<Self, DemoriError> {
        let remote = match &settings.remote {
            Some(remote_settings) => Some(Arc::new(RemoteClient::new(
                remote_settings,
                store.clone(),
            )?)),
            None => None,
        };

        let registry = SourceRegistry::standard(&settings);
        Ok(Self {
            settings: RwLock::new(settings),
            registry: RwLock::new(registry),
            standard_registry: true,
            store,
            remote,
        })
    }

    /// Create an orchestrator from explicit parts.
    ///
    /// The registry is kept as-is across settings updates.
    #[must_use]
    pub fn with_parts(
        settings: EngineSettings,
        registry: SourceRegistry,
        store: Arc<Store>,
        remote: Option<Arc<RemoteClient>>,
    ) -> Self {
        Self {
            settings: RwLock::new(settings),
            registry: RwLock::new(registry),
            standard_registry: false,
            store,
            remote,
        }
    }

    /// Current settings snapshot.
    #[must_use]
    pub fn settings(&self) -> EngineSettings {
        self.settings
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Swap in a new settings snapshot.
    ///
    /// Takes effect on the next search. The remote store connection is
    /// fixed at construction; changing it requires a new orchestrator.
    pub fn update_settings(&self, settings: EngineSettings) {
        if self.standard_registry {
            *self
                .registry
                .write()
                .unwrap_or_else(PoisonError::into_inner) = SourceRegistry::standard(&settings);
        }
        *self
            .settings
            .write()
            .unwrap_or_else(PoisonError::into_inner) = settings;
        debug!("settings snapshot updated");
    }

    /// Run a contact search through the full pipeline.
    ///
    /// # Errors
    /// Returns `DemoriError::InvalidQuery` for an empty or whitespace
    /// name. Everything else degrades rather than erroring.
    pub async fn search(&self, query: &ContactQuery) -> Result<SearchOutcome, DemoriError> {
        query.validate()?;
        let settings = self.settings();
        let key = query.cache_key();

        // 1. Cache
        match cache::get_profile(self.store.pool(), &key, settings.cache_duration()).await {
            Ok(Some(profile)) => {
                info!(key, "serving search from cache");
                return Ok(SearchOutcome {
                    profile,
                    origin: SearchOrigin::Cache,
                });
            }
            Ok(None) => {}
            Err(e) => warn!(key, error = %e, "cache lookup failed, continuing"),
        }

        // 2. Remote store
        if let Some(remote) = &self.remote {
            match remote
                .search_contacts(
                    query,
                    settings.confidence_threshold(),
                    settings.search.max_results,
                )
                .await
            {
                Ok(profiles) if !profiles.is_empty() => {
                    info!(key, count = profiles.len(), "serving search from remote store");
                    let profile = best_profile(profiles);
                    return Ok(SearchOutcome {
                        profile,
                        origin: SearchOrigin::Remote,
                    });
                }
                Ok(_) => debug!(key, "remote store had no matching contacts"),
                Err(e) => warn!(key, error = %e, "remote search failed, continuing to live search"),
            }
        }

        // 3. Live fan-out
        let enabled = self
            .registry
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .enabled(&settings.sources);

        let results = if enabled.is_empty() {
            debug!("no sources enabled");
            Vec::new()
        } else {
            self.fan_out(&enabled, query, &settings).await
        };

        let profile = aggregator::aggregate(query, &results);

        // 4. Fallback when nothing produced data
        if profile.is_empty() {
            info!(key, "no source produced data, returning fallback profile");
            return Ok(SearchOutcome {
                profile: fallback::fallback_profile(query),
                origin: SearchOrigin::Fallback,
            });
        }

        // 5. Persistence, all best-effort
        self.persist(&profile, &settings).await;

        info!(
            key,
            items = profile.item_count(),
            confidence = profile.confidence,
            "live search complete"
        );
        Ok(SearchOutcome {
            profile,
            origin: SearchOrigin::LiveSearch,
        })
    }

    /// Fan the query out to the enabled sources.
    ///
    /// Results come back in registry declaration order regardless of
    /// completion order, so aggregation ties resolve deterministically.
    /// On timeout the cancellation token is tripped; late sources return
    /// cancelled instead of leaking results into the cache.
    async fn fan_out(
        &self,
        sources: &[Arc<dyn ContactSource>],
        query: &ContactQuery,
        settings: &EngineSettings,
    ) -> Vec<SourceResult> {
        let cancel = CancellationToken::new();
        let cap = settings.search.concurrent_searches.max(1);

        let mut lookups = stream::iter(sources.iter().cloned().enumerate())
            .map(|(idx, source)| {
                let query = query.clone();
                let cancel = cancel.clone();
                async move {
                    let outcome = source.lookup(&query, &cancel).await;
                    (idx, source.id().clone(), outcome)
                }
            })
            .buffer_unordered(cap);

        let mut slots: Vec<Option<SourceResult>> = vec![None; sources.len()];
        let deadline = tokio::time::sleep(settings.search_timeout());
        tokio::pin!(deadline);
        let mut timed_out = false;

        loop {
            tokio::select! {
                () = &mut deadline, if !timed_out => {
                    timed_out = true;
                    cancel.cancel();
                    warn!(
                        timeout_secs = settings.search.timeout_secs,
                        "search timed out, cancelling outstanding sources"
                    );
                }
                next = lookups.next() => {
                    let Some((idx, id, outcome)) = next else { break };
                    match outcome {
                        Ok(result) => {
                            debug!(source = %id, found = result.found, "source settled");
                            slots[idx] = Some(result);
                        }
                        Err(SourceError::Cancelled { .. }) => {
                            debug!(source = %id, "source cancelled");
                        }
                        Err(e) => {
                            warn!(source = %id, error = %e, "source failed, continuing without it");
                        }
                    }
                }
            }
        }

        slots.into_iter().flatten().collect()
    }

    /// Write-through after a live search: cache, local history, and the
    /// remote store. Failures are logged, never surfaced; a failed remote
    /// save lands in the durable queue inside the client.
    async fn persist(&self, profile: &AggregatedProfile, settings: &EngineSettings) {
        let key = profile.query.cache_key();

        if let Err(e) = cache::put_profile(self.store.pool(), &key, profile).await {
            warn!(key, error = %e, "failed to cache search result");
        }

        if let Err(e) = history::append(
            self.store.pool(),
            &profile.query.name,
            &profile.query.company,
            profile.emails.len(),
            profile.phones.len(),
            profile.social_profiles.len(),
            profile.confidence,
        )
        .await
        {
            warn!(key, error = %e, "failed to record search history");
        }

        let Some(remote) = &self.remote else { return };

        match remote.save_contact(profile).await {
            Ok(SaveOutcome::Stored { remote_id }) => {
                debug!(key, ?remote_id, "contact saved to remote store");
            }
            Ok(SaveOutcome::Queued) => info!(key, "contact queued for later sync"),
            Err(e) => warn!(key, error = %e, "remote contact save rejected"),
        }

        let record = SearchRecord {
            name: profile.query.name.clone(),
            company: profile.query.company.clone(),
            email_count: profile.emails.len(),
            phone_count: profile.phones.len(),
            social_count: profile.social_profiles.len(),
            confidence: profile.confidence,
            recorded_at: profile.last_updated.to_rfc3339(),
        };
        match remote.save_search(&record).await {
            Ok(SaveOutcome::Stored { .. }) => debug!(key, "search record saved to remote store"),
            Ok(SaveOutcome::Queued) => info!(key, "search record queued for later sync"),
            Err(e) => warn!(key, error = %e, "remote search save rejected"),
        }

        if settings.sync.mode == SyncMode::Realtime {
            match remote.sync_pending().await {
                Ok(report) if report.submitted > 0 => {
                    debug!(synced = report.synced, remaining = report.remaining, "realtime sync pass");
                }
                Ok(_) => {}
                Err(e) => warn!(error = %e, "realtime sync pass failed"),
            }
        }
    }

    /// Drain the pending-write queue to the remote store.
    ///
    /// Returns `None` when no remote store is configured.
    ///
    /// # Errors
    /// Returns error if the batch request fails; queued rows stay put.
    pub async fn sync(&self) -> Result<Option<SyncReport>, DemoriError> {
        match &self.remote {
            Some(remote) => Ok(Some(remote.sync_pending().await?)),
            None => Ok(None),
        }
    }

    /// Most recent search history entries, newest first.
    ///
    /// # Errors
    /// Returns error if the store query fails.
    pub async fn history(&self, limit: i64) -> Result<Vec<HistoryEntry>, DemoriError> {
        Ok(history::recent(self.store.pool(), limit).await?)
    }

    /// Delete expired cache rows. Returns the number removed.
    ///
    /// # Errors
    /// Returns error if the delete fails.
    pub async fn purge_expired_cache(&self) -> Result<u64, DemoriError> {
        let ttl = self.settings().cache_duration();
        Ok(cache::purge_expired(self.store.pool(), ttl).await?)
    }
}

/// Pick the highest-confidence profile from a non-empty remote result set.
fn best_profile(mut profiles: Vec<AggregatedProfile>) -> AggregatedProfile {
    profiles.sort_by(|a, b| b.confidence.total_cmp(&a.confidence));
    profiles.remove(0)
}

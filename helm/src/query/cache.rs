use std::collections::HashMap;
use std::future::Future;
use std::num::NonZeroUsize;
use std::sync::{Arc, Mutex, MutexGuard};

use chrono::{DateTime, Utc};
use futures::future::{BoxFuture, FutureExt, Shared};
use lru::LruCache;
use serde::{de::DeserializeOwned, Serialize};
use serde_json::Value;
use tracing::debug;

use super::key::{QueryKey, QueryKind};
use crate::error::{HelmError, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueryStatus {
    /// Never fetched.
    Idle,
    /// First fetch in flight, no data yet.
    Loading,
    Success,
    Error,
}

/// Point-in-time view of one cache entry.
#[derive(Debug, Clone)]
pub struct QuerySnapshot<T> {
    pub status: QueryStatus,
    pub data: Option<T>,
    pub error: Option<HelmError>,
    pub stale: bool,
    pub is_fetching: bool,
    pub updated_at: Option<DateTime<Utc>>,
}

impl<T> QuerySnapshot<T> {
    fn idle() -> Self {
        Self {
            status: QueryStatus::Idle,
            data: None,
            error: None,
            stale: false,
            is_fetching: false,
            updated_at: None,
        }
    }
}

#[derive(Debug, Clone)]
struct CacheEntry {
    data: Option<Value>,
    error: Option<HelmError>,
    status: QueryStatus,
    stale: bool,
    updated_at: Option<DateTime<Utc>>,
    /// Identifies this entry instance; a removed and re-created key gets a new one.
    generation: u64,
    /// Bumped on every invalidation.
    epoch: u64,
    last_applied_seq: u64,
}

type SharedFetch = Shared<BoxFuture<'static, Result<Value>>>;

#[derive(Clone)]
struct InFlight {
    generation: u64,
    epoch: u64,
    seq: u64,
    fetch: SharedFetch,
}

struct Inner {
    entries: LruCache<QueryKey, CacheEntry>,
    in_flight: HashMap<QueryKey, InFlight>,
    next_generation: u64,
    next_seq: u64,
}

/// Keyed store of query results.
///
/// Concurrent reads of the same key share one request. Invalidation marks an
/// entry stale so the next read refetches. A result whose entry was removed
/// (or evicted) while the request ran is handed to its callers but never
/// written back.
#[derive(Clone)]
pub struct QueryCache {
    inner: Arc<Mutex<Inner>>,
}

impl QueryCache {
    pub fn new(capacity: usize) -> Self {
        let capacity = NonZeroUsize::new(capacity).unwrap_or(NonZeroUsize::MIN);
        Self {
            inner: Arc::new(Mutex::new(Inner {
                entries: LruCache::new(capacity),
                in_flight: HashMap::new(),
                next_generation: 1,
                next_seq: 1,
            })),
        }
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Return fresh cached data for `key`, join the fetch already running
    /// for it, or start `fetcher`.
    pub async fn fetch<T, F, Fut>(&self, key: QueryKey, fetcher: F) -> Result<T>
    where
        T: Serialize + DeserializeOwned + Send + 'static,
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T>> + Send + 'static,
    {
        let flight = {
            let mut guard = self.lock();
            let inner = &mut *guard;

            if let Some(entry) = inner.entries.get(&key) {
                if entry.status == QueryStatus::Success && !entry.stale {
                    if let Some(data) = &entry.data {
                        debug!(%key, "Query cache hit");
                        return Ok(serde_json::from_value(data.clone())?);
                    }
                }
            }

            if let Some(flight) = inner.in_flight.get(&key) {
                debug!(%key, "Joining in-flight query");
                flight.clone()
            } else {
                let fut = fetcher();
                let fetch = async move {
                    let value = fut.await?;
                    Ok(serde_json::to_value(value)?)
                }
                .boxed()
                .shared();

                let seq = inner.next_seq;
                inner.next_seq += 1;

                let (generation, epoch) = match inner.entries.get_mut(&key) {
                    Some(entry) => {
                        if entry.data.is_none() {
                            entry.status = QueryStatus::Loading;
                        }
                        (entry.generation, entry.epoch)
                    }
                    None => {
                        let generation = inner.next_generation;
                        inner.next_generation += 1;
                        inner.entries.put(
                            key.clone(),
                            CacheEntry {
                                data: None,
                                error: None,
                                status: QueryStatus::Loading,
                                stale: false,
                                updated_at: None,
                                generation,
                                epoch: 0,
                                last_applied_seq: 0,
                            },
                        );
                        (generation, 0)
                    }
                };

                debug!(%key, seq, "Starting query fetch");
                let flight = InFlight {
                    generation,
                    epoch,
                    seq,
                    fetch,
                };
                inner.in_flight.insert(key.clone(), flight.clone());
                flight
            }
        };

        let result = flight.fetch.clone().await;
        self.settle(&key, &flight, &result);

        Ok(serde_json::from_value(result?)?)
    }

    fn settle(&self, key: &QueryKey, flight: &InFlight, result: &Result<Value>) {
        let mut guard = self.lock();
        let inner = &mut *guard;

        if inner
            .in_flight
            .get(key)
            .is_some_and(|current| current.seq == flight.seq)
        {
            inner.in_flight.remove(key);
        }

        let Some(entry) = inner.entries.peek_mut(key) else {
            debug!(%key, "Discarding result for a removed cache entry");
            return;
        };
        if entry.generation != flight.generation {
            debug!(%key, "Discarding result for a replaced cache entry");
            return;
        }
        if flight.seq <= entry.last_applied_seq {
            return;
        }

        entry.last_applied_seq = flight.seq;
        entry.stale = entry.epoch != flight.epoch;
        match result {
            Ok(value) => {
                entry.data = Some(value.clone());
                entry.error = None;
                entry.status = QueryStatus::Success;
                entry.updated_at = Some(Utc::now());
            }
            Err(e) => {
                entry.error = Some(e.clone());
                entry.status = QueryStatus::Error;
            }
        }
    }

    /// Mark `key` stale. A fetch already running for it is detached so the
    /// next read issues a new request.
    pub fn invalidate(&self, key: &QueryKey) {
        let mut inner = self.lock();
        if let Some(entry) = inner.entries.peek_mut(key) {
            entry.stale = true;
            entry.epoch += 1;
        }
        inner.in_flight.remove(key);
        debug!(%key, "Query invalidated");
    }

    /// Mark every entry of `kind` stale.
    pub fn invalidate_prefix(&self, kind: QueryKind) {
        let mut guard = self.lock();
        let inner = &mut *guard;
        let mut count = 0usize;
        for (key, entry) in inner.entries.iter_mut() {
            if key.kind() == kind {
                entry.stale = true;
                entry.epoch += 1;
                count += 1;
            }
        }
        inner.in_flight.retain(|key, _| key.kind() != kind);
        debug!(kind = kind.name(), count, "Query family invalidated");
    }

    pub fn remove(&self, key: &QueryKey) {
        let mut inner = self.lock();
        inner.entries.pop(key);
        inner.in_flight.remove(key);
    }

    pub fn clear(&self) {
        let mut inner = self.lock();
        inner.entries.clear();
        inner.in_flight.clear();
        debug!("Query cache cleared");
    }

    pub fn contains(&self, key: &QueryKey) -> bool {
        self.lock().entries.contains(key)
    }

    pub fn len(&self) -> usize {
        self.lock().entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Current state of `key` without triggering a fetch.
    pub fn state<T: DeserializeOwned>(&self, key: &QueryKey) -> QuerySnapshot<T> {
        let inner = self.lock();
        let is_fetching = inner.in_flight.contains_key(key);
        let Some(entry) = inner.entries.peek(key) else {
            return QuerySnapshot::idle();
        };

        QuerySnapshot {
            status: entry.status,
            data: entry
                .data
                .as_ref()
                .and_then(|v| serde_json::from_value(v.clone()).ok()),
            error: entry.error.clone(),
            stale: entry.stale,
            is_fetching,
            updated_at: entry.updated_at,
        }
    }
}

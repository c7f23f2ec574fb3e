/// Poll-driven query cache with request deduplication.
///
/// The client mediates every read from the aggregation API. Callers ask for
/// a key with `request` and get back an immediate snapshot (not requested /
/// loading / success / error); actual network work is drained by the owning
/// event loop via `take_pending`, executed (see `ingest`), and committed
/// back with `resolve`.
///
/// Single-owner model: the client lives on one event loop, so there is no
/// locking. "Concurrency" here is overlapping logical requests, which the
/// client collapses: any number of `request` calls for a key with a fetch
/// in flight share that one fetch. Superseded fetches are not aborted -
/// their results are discarded on arrival by generation comparison
/// (last committed by key wins, not last arrived).
///
/// # Clock injection
/// All methods take `now: DateTime<Utc>` rather than reading the clock,
/// so staleness, retry, and eviction behavior is deterministic in tests.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde_json::Value;

use crate::cache::policy::{policy_for, EndpointClass};
use crate::logging;
use crate::model::ApiError;

// ---------------------------------------------------------------------------
// Keys and snapshots
// ---------------------------------------------------------------------------

/// Cache key: endpoint class plus normalized query parameters.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct QueryKey {
    pub class: EndpointClass,
    /// Normalized parameter string: `name=value` pairs sorted by name and
    /// joined with `&`. Empty for parameterless endpoints.
    pub params: String,
}

impl QueryKey {
    /// Key for a parameterless endpoint.
    pub fn bare(class: EndpointClass) -> Self {
        Self {
            class,
            params: String::new(),
        }
    }

    /// Key with parameters, normalized so that call-site ordering does not
    /// split the cache.
    pub fn with_params(class: EndpointClass, params: &[(&str, &str)]) -> Self {
        let mut pairs: Vec<(&str, &str)> = params.to_vec();
        pairs.sort_by_key(|(name, _)| *name);
        let params = pairs
            .iter()
            .map(|(name, value)| format!("{}={}", name, value))
            .collect::<Vec<_>>()
            .join("&");
        Self { class, params }
    }
}

impl std::fmt::Display for QueryKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.params.is_empty() {
            write!(f, "{}", self.class)
        } else {
            write!(f, "{}?{}", self.class, self.params)
        }
    }
}

/// Observable lifecycle state of one query.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueryStatus {
    /// The query is guarded (disabled) and has never issued a request.
    NotRequested,
    /// A fetch is in flight and no previous data exists.
    Loading,
    Success,
    Error,
}

/// Immediate answer to a `request` call.
#[derive(Debug, Clone, PartialEq)]
pub struct QuerySnapshot {
    pub status: QueryStatus,
    pub data: Option<Value>,
    pub error: Option<String>,
    /// True when `data` is past its staleness window; a background refresh
    /// has been scheduled. Stale data is never presented as fresh.
    pub is_stale: bool,
}

impl QuerySnapshot {
    fn not_requested() -> Self {
        Self {
            status: QueryStatus::NotRequested,
            data: None,
            error: None,
            is_stale: false,
        }
    }
}

/// A scheduled fetch handed to the driver. The generation must be passed
/// back to `resolve` unchanged so superseded results can be discarded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingFetch {
    pub key: QueryKey,
    pub generation: u64,
}

// ---------------------------------------------------------------------------
// Entries
// ---------------------------------------------------------------------------

struct CacheEntry {
    data: Option<Value>,
    fetched_at: Option<DateTime<Utc>>,
    error: Option<String>,
    /// Bumped on every scheduled fetch; stale results lose by comparison.
    generation: u64,
    in_flight: bool,
    /// The single automatic retry has been consumed.
    retried: bool,
    last_observed_at: DateTime<Utc>,
}

impl CacheEntry {
    fn new(now: DateTime<Utc>) -> Self {
        Self {
            data: None,
            fetched_at: None,
            error: None,
            generation: 0,
            in_flight: false,
            retried: false,
            last_observed_at: now,
        }
    }
}

// ---------------------------------------------------------------------------
// Client
// ---------------------------------------------------------------------------

pub struct QueryClient {
    entries: HashMap<QueryKey, CacheEntry>,
    pending: Vec<PendingFetch>,
}

impl Default for QueryClient {
    fn default() -> Self {
        Self::new()
    }
}

impl QueryClient {
    pub fn new() -> Self {
        Self {
            entries: HashMap::new(),
            pending: Vec::new(),
        }
    }

    /// Observes a query, scheduling network work as needed, and returns the
    /// current snapshot.
    ///
    /// `enabled == false` marks a guarded query (e.g. a required identifier
    /// is not yet available): no entry is created, no fetch ever issued,
    /// and the caller sees `NotRequested` - distinct from both loading and
    /// error.
    pub fn request(&mut self, key: &QueryKey, enabled: bool, now: DateTime<Utc>) -> QuerySnapshot {
        if !enabled {
            return QuerySnapshot::not_requested();
        }

        let entry = self
            .entries
            .entry(key.clone())
            .or_insert_with(|| CacheEntry::new(now));
        entry.last_observed_at = now;

        if let (Some(data), Some(fetched_at)) = (entry.data.clone(), entry.fetched_at) {
            let policy = policy_for(key.class);
            let is_stale = now - fetched_at > policy.stale_after;
            if is_stale && !entry.in_flight {
                // Stale-while-revalidate: serve immediately, refresh in the
                // background.
                entry.generation += 1;
                entry.in_flight = true;
                entry.retried = false;
                self.pending.push(PendingFetch {
                    key: key.clone(),
                    generation: entry.generation,
                });
            }
            return QuerySnapshot {
                status: QueryStatus::Success,
                data: Some(data),
                error: None,
                is_stale,
            };
        }

        // Terminal error state: surfaced until the caller invalidates.
        if let Some(error) = entry.error.clone() {
            if !entry.in_flight {
                return QuerySnapshot {
                    status: QueryStatus::Error,
                    data: None,
                    error: Some(error),
                    is_stale: false,
                };
            }
        }

        if !entry.in_flight {
            entry.generation += 1;
            entry.in_flight = true;
            self.pending.push(PendingFetch {
                key: key.clone(),
                generation: entry.generation,
            });
        }
        QuerySnapshot {
            status: QueryStatus::Loading,
            data: None,
            error: None,
            is_stale: false,
        }
    }

    /// Drains the fetches scheduled since the last drain. The owning event
    /// loop executes these and calls `resolve` with the outcome.
    pub fn take_pending(&mut self) -> Vec<PendingFetch> {
        std::mem::take(&mut self.pending)
    }

    /// Commits a fetch outcome. Results for a superseded generation are
    /// discarded - a late response must never overwrite newer state.
    ///
    /// On failure, one automatic retry is scheduled; a failure after that
    /// is terminal for the entry (previous data, if any, stays available
    /// as stale).
    pub fn resolve(
        &mut self,
        key: &QueryKey,
        generation: u64,
        result: Result<Value, ApiError>,
        now: DateTime<Utc>,
    ) {
        let Some(entry) = self.entries.get_mut(key) else {
            return; // evicted while in flight
        };
        if generation < entry.generation {
            return; // superseded by a newer fetch for this key
        }

        entry.in_flight = false;
        match result {
            Ok(data) => {
                entry.data = Some(data);
                entry.fetched_at = Some(now);
                entry.error = None;
                entry.retried = false;
            }
            Err(err) => {
                logging::log_api_failure(&key.to_string(), "fetch", &err);
                if !entry.retried {
                    entry.retried = true;
                    entry.generation += 1;
                    entry.in_flight = true;
                    self.pending.push(PendingFetch {
                        key: key.clone(),
                        generation: entry.generation,
                    });
                } else {
                    entry.error = Some(err.to_string());
                }
            }
        }
    }

    /// Forces the next `request` for this key to refetch, clearing any
    /// terminal error. This is the manual "try again" path.
    ///
    /// A fetch already in flight is superseded: its generation is left
    /// behind so the late result is discarded on arrival, and the in-flight
    /// flag is dropped so the next `request` schedules fresh.
    pub fn invalidate(&mut self, key: &QueryKey) {
        if let Some(entry) = self.entries.get_mut(key) {
            entry.fetched_at = None;
            entry.data = None;
            entry.error = None;
            entry.retried = false;
            entry.generation += 1;
            entry.in_flight = false;
        }
    }

    /// Drops entries whose retention window elapsed since the last
    /// observation. In-flight entries are kept so a resolving fetch still
    /// finds its slot.
    pub fn evict_expired(&mut self, now: DateTime<Utc>) {
        self.entries.retain(|key, entry| {
            entry.in_flight || now - entry.last_observed_at <= policy_for(key.class).expire_after
        });
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

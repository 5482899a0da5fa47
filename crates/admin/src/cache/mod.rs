//! Query result cache with tag-based invalidation.
//!
//! Reads are cached under a [`CacheKey`] derived from the resource tag, the
//! endpoint path and the sorted query parameters. Writes invalidate whole
//! tags: every entry under the tag is dropped, the tag's generation counter
//! advances, and the tag is broadcast so subscribers can refetch.
//!
//! # Ordering
//!
//! Every fetch takes a sequence ticket. A completion is stored only if its
//! ticket is still the newest one issued for the key and the tag has not been
//! invalidated since the fetch began; anything else is a stale response and is
//! discarded.
//!
//! # Session changes
//!
//! A `401` on any read clears the whole cache, so nothing fetched under the
//! expired session is served as a hit afterwards.
//!
//! # Staleness window
//!
//! Invalidation is coarse and asynchronous: between a write resolving and a
//! subscriber's refetch completing, the subscriber may still display the
//! previous snapshot.

mod key;

pub use key::{CacheKey, Tag};

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use chrono::{DateTime, Utc};
use moka::sync::Cache;
use serde_json::Value;
use tokio::sync::broadcast;
use tracing::{debug, instrument};

use crate::api::{ApiClient, ApiError, ApiRequest};
use crate::config::CacheConfig;

/// Capacity of the invalidation broadcast channel.
const INVALIDATION_CHANNEL_CAPACITY: usize = 64;

/// A cached read.
#[derive(Debug, Clone, PartialEq)]
pub struct CacheEntry {
    /// Last successful response body.
    pub data: Option<Value>,
    /// Error from the most recent fetch, if it failed.
    pub error: Option<ApiError>,
    /// A fetch for this key is in flight.
    pub is_loading: bool,
    /// When `data` was received.
    pub fetched_at: Option<DateTime<Utc>>,
    /// Ticket of the fetch that produced this entry.
    pub seq: u64,
}

/// Handle for one in-flight fetch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ticket {
    key: CacheKey,
    seq: u64,
    generation: u64,
}

impl Ticket {
    /// Key being fetched.
    #[must_use]
    pub const fn key(&self) -> &CacheKey {
        &self.key
    }

    /// Sequence number of this fetch.
    #[must_use]
    pub const fn seq(&self) -> u64 {
        self.seq
    }
}

/// Shared query cache. Cheap to clone.
#[derive(Clone)]
pub struct QueryCache {
    inner: Arc<CacheInner>,
}

struct CacheInner {
    entries: Cache<CacheKey, CacheEntry>,
    book: Mutex<Bookkeeping>,
    keep_unused: std::time::Duration,
    invalidations: broadcast::Sender<Tag>,
}

#[derive(Default)]
struct Bookkeeping {
    next_seq: u64,
    /// Newest ticket per key, only while that fetch is in flight.
    latest: HashMap<CacheKey, u64>,
    generations: HashMap<Tag, u64>,
    subscribers: HashMap<CacheKey, usize>,
}

impl std::fmt::Debug for QueryCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("QueryCache")
            .field("entries", &self.inner.entries.entry_count())
            .field("keep_unused", &self.inner.keep_unused)
            .finish_non_exhaustive()
    }
}

impl QueryCache {
    /// Create a cache bounded by `config.capacity`.
    ///
    /// Entries without subscribers expire after `config.keep_unused` of
    /// inactivity, or immediately when it is zero.
    #[must_use]
    pub fn new(config: CacheConfig) -> Self {
        let mut builder = Cache::builder().max_capacity(config.capacity);
        if !config.keep_unused.is_zero() {
            builder = builder.time_to_idle(config.keep_unused);
        }
        let (invalidations, _) = broadcast::channel(INVALIDATION_CHANNEL_CAPACITY);

        Self {
            inner: Arc::new(CacheInner {
                entries: builder.build(),
                book: Mutex::new(Bookkeeping::default()),
                keep_unused: config.keep_unused,
                invalidations,
            }),
        }
    }

    fn book(&self) -> MutexGuard<'_, Bookkeeping> {
        self.inner.book.lock().unwrap_or_else(PoisonError::into_inner)
    }

    // =========================================================================
    // Reads
    // =========================================================================

    /// Current entry for `key`.
    #[must_use]
    pub fn get(&self, key: &CacheKey) -> Option<CacheEntry> {
        self.inner.entries.get(key)
    }

    /// Serve `request` from the cache, fetching it when there is no settled result.
    ///
    /// # Errors
    ///
    /// Returns the `ApiError` of the fetch when one was needed and failed.
    pub async fn query(
        &self,
        api: &ApiClient,
        tag: Tag,
        request: ApiRequest,
    ) -> Result<Value, ApiError> {
        let key = CacheKey::new(tag, &request);
        if let Some(CacheEntry {
            data: Some(data),
            is_loading: false,
            ..
        }) = self.get(&key)
        {
            debug!(key = %key, "Cache hit");
            return Ok(data);
        }
        self.fetch(api, key, request).await
    }

    /// Fetch `request` from the server regardless of what is cached.
    ///
    /// # Errors
    ///
    /// Returns the `ApiError` of the fetch.
    pub async fn refetch(
        &self,
        api: &ApiClient,
        tag: Tag,
        request: ApiRequest,
    ) -> Result<Value, ApiError> {
        let key = CacheKey::new(tag, &request);
        self.fetch(api, key, request).await
    }

    #[instrument(skip(self, api, request), fields(key = %key))]
    async fn fetch(
        &self,
        api: &ApiClient,
        key: CacheKey,
        request: ApiRequest,
    ) -> Result<Value, ApiError> {
        let ticket = self.begin(&key);
        let result = api.request(request).await;
        if result.as_ref().is_err_and(ApiError::is_unauthorized) {
            self.clear();
        }

        if self.complete(&ticket, &result) {
            return result;
        }

        // A newer fetch has already settled this key; prefer its data.
        match self.get(&key) {
            Some(CacheEntry {
                data: Some(data),
                is_loading: false,
                ..
            }) => Ok(data),
            _ => result,
        }
    }

    /// Issue a ticket for a new fetch of `key` and mark the entry loading.
    pub fn begin(&self, key: &CacheKey) -> Ticket {
        let mut book = self.book();
        book.next_seq += 1;
        let seq = book.next_seq;
        book.latest.insert(key.clone(), seq);
        let generation = book.generations.get(&key.tag).copied().unwrap_or(0);

        let previous = self.inner.entries.get(key);
        self.inner.entries.insert(
            key.clone(),
            CacheEntry {
                data: previous.as_ref().and_then(|e| e.data.clone()),
                error: None,
                is_loading: true,
                fetched_at: previous.and_then(|e| e.fetched_at),
                seq,
            },
        );
        drop(book);

        Ticket {
            key: key.clone(),
            seq,
            generation,
        }
    }

    /// Store the outcome of the fetch behind `ticket`.
    ///
    /// Returns `false` and leaves the cache untouched when the ticket is stale:
    /// a newer fetch was issued, the tag was invalidated, or the last
    /// subscriber for the key went away while it was in flight.
    pub fn complete(&self, ticket: &Ticket, result: &Result<Value, ApiError>) -> bool {
        let mut book = self.book();
        let is_latest = book.latest.get(&ticket.key) == Some(&ticket.seq);
        let generation = book.generations.get(&ticket.key.tag).copied().unwrap_or(0);
        if !is_latest || generation != ticket.generation {
            debug!(key = %ticket.key, seq = ticket.seq, "Discarding stale response");
            return false;
        }
        book.latest.remove(&ticket.key);

        let entry = match result {
            Ok(data) => CacheEntry {
                data: Some(data.clone()),
                error: None,
                is_loading: false,
                fetched_at: Some(Utc::now()),
                seq: ticket.seq,
            },
            Err(error) => {
                let previous = self.inner.entries.get(&ticket.key);
                CacheEntry {
                    data: previous.as_ref().and_then(|e| e.data.clone()),
                    error: Some(error.clone()),
                    is_loading: false,
                    fetched_at: previous.and_then(|e| e.fetched_at),
                    seq: ticket.seq,
                }
            }
        };
        self.inner.entries.insert(ticket.key.clone(), entry);
        drop(book);
        true
    }

    // =========================================================================
    // Invalidation
    // =========================================================================

    /// Number of invalidations `tag` has seen.
    #[must_use]
    pub fn generation(&self, tag: Tag) -> u64 {
        self.book().generations.get(&tag).copied().unwrap_or(0)
    }

    /// Mark every read under `tags` stale.
    ///
    /// Cached entries are dropped, in-flight fetches for those tags will be
    /// discarded on completion, and each tag is broadcast to
    /// [`Self::invalidations`] receivers.
    pub fn invalidate(&self, tags: &[Tag]) {
        let mut book = self.book();
        for tag in tags {
            *book.generations.entry(*tag).or_insert(0) += 1;
        }
        book.latest.retain(|key, _| !tags.contains(&key.tag));
        let stale: Vec<Arc<CacheKey>> = self
            .inner
            .entries
            .iter()
            .filter(|(key, _)| tags.contains(&key.tag))
            .map(|(key, _)| key)
            .collect();
        for key in &stale {
            self.inner.entries.invalidate(key.as_ref());
        }
        drop(book);

        for tag in tags {
            debug!(tag = %tag, "Invalidated cache tag");
            // No receivers is fine.
            let _ = self.inner.invalidations.send(*tag);
        }
    }

    /// Drop everything. Called when the session ends, by logout or by a `401`.
    pub fn clear(&self) {
        self.invalidate(&Tag::ALL);
    }

    /// Receive the tags invalidated from now on.
    #[must_use]
    pub fn invalidations(&self) -> broadcast::Receiver<Tag> {
        self.inner.invalidations.subscribe()
    }

    // =========================================================================
    // Subscriptions
    // =========================================================================

    /// Register interest in `key`; the entry is retained while any
    /// subscription is alive.
    #[must_use]
    pub fn subscribe(&self, key: CacheKey) -> Subscription {
        *self.book().subscribers.entry(key.clone()).or_insert(0) += 1;
        Subscription {
            cache: self.clone(),
            key,
        }
    }

    /// Live subscriptions for `key`.
    #[must_use]
    pub fn subscriber_count(&self, key: &CacheKey) -> usize {
        self.book().subscribers.get(key).copied().unwrap_or(0)
    }

    fn release(&self, key: &CacheKey) {
        let mut book = self.book();
        let remaining = match book.subscribers.get_mut(key) {
            Some(count) => {
                *count = count.saturating_sub(1);
                *count
            }
            None => 0,
        };
        if remaining == 0 {
            book.subscribers.remove(key);
            book.latest.remove(key);
            if self.inner.keep_unused.is_zero() {
                self.inner.entries.invalidate(key);
            }
        }
    }
}

/// RAII interest in one cache key. Dropping the last one for a key lets the
/// entry be evicted.
#[derive(Debug)]
pub struct Subscription {
    cache: QueryCache,
    key: CacheKey,
}

impl Subscription {
    /// Key this subscription holds.
    #[must_use]
    pub const fn key(&self) -> &CacheKey {
        &self.key
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.cache.release(&self.key);
    }
}

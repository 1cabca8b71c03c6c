//! Keyed query cache with staleness and idle eviction.
//!
//! Entries are grouped by [`QueryKind`] so that a mutation can invalidate
//! every cached query of a kind at once. A stale or invalidated entry is
//! refetched on next use; an entry nobody has read for `cache_time` is
//! dropped. A failed fetch never replaces a cached value.

use std::any::Any;
use std::collections::HashMap;
use std::fmt;
use std::future::Future;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;
use tokio::time::Instant;
use tracing::debug;

/// Family of cached queries sharing an invalidation key
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum QueryKind {
    /// Relationships of one content item
    ContentRelationships,
    /// Family rooted at one content item
    ContentFamily,
    /// Pending suggestions for one content item
    ContentSuggestions,
}

impl QueryKind {
    /// All kinds
    pub const ALL: [QueryKind; 3] = [
        QueryKind::ContentRelationships,
        QueryKind::ContentFamily,
        QueryKind::ContentSuggestions,
    ];

    /// Key prefix
    pub fn as_str(&self) -> &'static str {
        match self {
            QueryKind::ContentRelationships => "contentRelationships",
            QueryKind::ContentFamily => "contentFamily",
            QueryKind::ContentSuggestions => "contentSuggestions",
        }
    }
}

impl fmt::Display for QueryKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Key of one cached query: its kind plus the content id it is scoped to
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct QueryKey {
    /// Invalidation group
    pub kind: QueryKind,
    /// Content id the query is about
    pub scope: String,
}

impl QueryKey {
    /// Build a key
    pub fn new(kind: QueryKind, scope: impl Into<String>) -> Self {
        Self {
            kind,
            scope: scope.into(),
        }
    }

    /// Key for the relationships of a content item
    pub fn relationships(content_id: &str) -> Self {
        Self::new(QueryKind::ContentRelationships, content_id)
    }

    /// Key for the family rooted at a content item
    pub fn family(root_id: &str) -> Self {
        Self::new(QueryKind::ContentFamily, root_id)
    }

    /// Key for the suggestions of a content item
    pub fn suggestions(content_id: &str) -> Self {
        Self::new(QueryKind::ContentSuggestions, content_id)
    }
}

impl fmt::Display for QueryKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.kind, self.scope)
    }
}

/// Cache timing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CacheConfig {
    /// Age after which an entry must be refetched
    pub stale_time: Duration,
    /// Idle time after which an entry is dropped
    pub cache_time: Duration,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            stale_time: Duration::from_secs(5 * 60),
            cache_time: Duration::from_secs(15 * 60),
        }
    }
}

struct Entry {
    value: Arc<dyn Any + Send + Sync>,
    fetched_at: Instant,
    last_accessed: Instant,
    invalidated: bool,
}

#[derive(Default)]
struct Inner {
    entries: HashMap<QueryKey, Entry>,
    generations: HashMap<QueryKind, u64>,
}

impl Inner {
    fn generation(&self, kind: QueryKind) -> u64 {
        self.generations.get(&kind).copied().unwrap_or(0)
    }

    fn bump(&mut self, kind: QueryKind) {
        *self.generations.entry(kind).or_insert(0) += 1;
    }

    fn collect_garbage(&mut self, now: Instant, cache_time: Duration) {
        let before = self.entries.len();
        self.entries
            .retain(|_, entry| now.duration_since(entry.last_accessed) < cache_time);
        let dropped = before - self.entries.len();
        if dropped > 0 {
            debug!("Evicted {} idle cache entries", dropped);
        }
    }
}

/// Shared query cache
pub struct QueryCache {
    config: CacheConfig,
    inner: Mutex<Inner>,
}

impl Default for QueryCache {
    fn default() -> Self {
        Self::new(CacheConfig::default())
    }
}

impl QueryCache {
    /// Create an empty cache
    pub fn new(config: CacheConfig) -> Self {
        Self {
            config,
            inner: Mutex::new(Inner::default()),
        }
    }

    /// Timing this cache was built with
    pub fn config(&self) -> CacheConfig {
        self.config
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Cached value if present, fresh and of type `T`
    pub fn get_fresh<T>(&self, key: &QueryKey) -> Option<T>
    where
        T: Clone + Send + Sync + 'static,
    {
        let now = Instant::now();
        let mut inner = self.lock();
        inner.collect_garbage(now, self.config.cache_time);

        let stale_time = self.config.stale_time;
        let entry = inner.entries.get_mut(key)?;
        entry.last_accessed = now;
        if entry.invalidated || now.duration_since(entry.fetched_at) >= stale_time {
            return None;
        }
        entry.value.downcast_ref::<T>().cloned()
    }

    /// Cached value of type `T`, stale or not
    pub fn peek<T>(&self, key: &QueryKey) -> Option<T>
    where
        T: Clone + Send + Sync + 'static,
    {
        let now = Instant::now();
        let mut inner = self.lock();
        inner.collect_garbage(now, self.config.cache_time);

        let entry = inner.entries.get_mut(key)?;
        entry.last_accessed = now;
        entry.value.downcast_ref::<T>().cloned()
    }

    /// Store a freshly fetched value
    pub fn set<T>(&self, key: QueryKey, value: T)
    where
        T: Send + Sync + 'static,
    {
        let now = Instant::now();
        let mut inner = self.lock();
        inner.collect_garbage(now, self.config.cache_time);
        inner.entries.insert(
            key,
            Entry {
                value: Arc::new(value),
                fetched_at: now,
                last_accessed: now,
                invalidated: false,
            },
        );
    }

    /// Whether the next read of `key` will refetch
    pub fn is_stale(&self, key: &QueryKey) -> bool {
        let now = Instant::now();
        let inner = self.lock();
        match inner.entries.get(key) {
            Some(entry) => {
                entry.invalidated
                    || now.duration_since(entry.fetched_at) >= self.config.stale_time
                    || now.duration_since(entry.last_accessed) >= self.config.cache_time
            }
            None => true,
        }
    }

    /// Mark every entry of a kind stale. Returns how many were marked.
    ///
    /// Fetches of this kind already in flight store their result as stale.
    pub fn invalidate(&self, kind: QueryKind) -> usize {
        let mut inner = self.lock();
        inner.bump(kind);

        let mut marked = 0;
        for (key, entry) in inner.entries.iter_mut() {
            if key.kind == kind {
                entry.invalidated = true;
                marked += 1;
            }
        }
        debug!("Invalidated {} {} entries", marked, kind);
        marked
    }

    /// Mark a single entry stale
    pub fn invalidate_key(&self, key: &QueryKey) -> bool {
        let mut inner = self.lock();
        match inner.entries.get_mut(key) {
            Some(entry) => {
                entry.invalidated = true;
                debug!("Invalidated {}", key);
                true
            }
            None => false,
        }
    }

    /// Drop every entry
    pub fn clear(&self) {
        let mut inner = self.lock();
        for kind in QueryKind::ALL {
            inner.bump(kind);
        }
        inner.entries.clear();
        debug!("Cleared query cache");
    }

    /// Number of entries held, fresh or stale
    pub fn len(&self) -> usize {
        self.lock().entries.len()
    }

    /// Whether the cache holds nothing
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Return the fresh cached value for `key`, or run `fetcher` and cache
    /// its success. Errors pass through and leave the cache untouched.
    pub async fn fetch<T, E, F, Fut>(&self, key: QueryKey, fetcher: F) -> Result<T, E>
    where
        T: Clone + Send + Sync + 'static,
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T, E>>,
    {
        if let Some(value) = self.get_fresh::<T>(&key) {
            debug!("Cache hit for {}", key);
            return Ok(value);
        }

        debug!("Cache miss for {}", key);
        let generation = self.lock().generation(key.kind);
        let value = fetcher().await?;

        let now = Instant::now();
        let mut inner = self.lock();
        let invalidated = inner.generation(key.kind) != generation;
        if invalidated {
            debug!("{} was invalidated during fetch", key);
        }
        inner.entries.insert(
            key,
            Entry {
                value: Arc::new(value.clone()),
                fetched_at: now,
                last_accessed: now,
                invalidated,
            },
        );
        Ok(value)
    }
}

impl fmt::Debug for QueryCache {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("QueryCache")
            .field("config", &self.config)
            .field("entries", &self.len())
            .finish()
    }
}

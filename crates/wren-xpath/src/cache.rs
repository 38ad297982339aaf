//! Bounded cache of compiled expressions.
//!
//! Entries are keyed by a hash of the expression text; the text itself is
//! kept to resolve collisions. Each lookup stamps the entry with a tick
//! from a counter, and once the cache grows past `max_size` the
//! `evict_batch` entries with the oldest ticks are dropped.
//!
//! All bookkeeping sits behind one mutex. Compilation happens outside the
//! lock, so two threads missing on the same text may both compile it; the
//! second insert simply replaces the first.

use std::collections::HashMap;
use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};
use std::sync::{Arc, LazyLock, Mutex, MutexGuard, PoisonError};

use tracing::trace;

use crate::XPathExpression;
use crate::config::XPathConfig;
use crate::error::XPathError;

/// Capacity of the shared cache.
pub const DEFAULT_CAPACITY: usize = 512;
/// Entries evicted at once from the shared cache.
pub const DEFAULT_EVICT_BATCH: usize = 32;

static SHARED: LazyLock<ExpressionCache> =
    LazyLock::new(|| ExpressionCache::new(DEFAULT_CAPACITY, DEFAULT_EVICT_BATCH));

#[derive(Debug)]
struct Entry {
    source: String,
    expr: Arc<XPathExpression>,
    last_used: u64,
}

#[derive(Debug, Default)]
struct State {
    buckets: HashMap<u64, Vec<Entry>>,
    len: usize,
    tick: u64,
}

impl State {
    fn next_tick(&mut self) -> u64 {
        self.tick += 1;
        self.tick
    }

    fn evict(&mut self, count: usize) {
        let mut stamps: Vec<(u64, u64)> = self
            .buckets
            .iter()
            .flat_map(|(&hash, entries)| entries.iter().map(move |entry| (entry.last_used, hash)))
            .collect();
        stamps.sort_unstable();
        for &(last_used, hash) in stamps.iter().take(count) {
            if let Some(entries) = self.buckets.get_mut(&hash) {
                entries.retain(|entry| entry.last_used != last_used);
                if entries.is_empty() {
                    let _ = self.buckets.remove(&hash);
                }
            }
        }
        self.len = self.buckets.values().map(Vec::len).sum();
    }
}

/// Thread-safe cache of compiled expressions.
#[derive(Debug)]
pub struct ExpressionCache {
    state: Mutex<State>,
    max_size: usize,
    evict_batch: usize,
}

impl ExpressionCache {
    /// A cache holding up to `max_size` expressions that drops
    /// `evict_batch` of them (at least one) when it overflows.
    #[must_use]
    pub fn new(max_size: usize, evict_batch: usize) -> Self {
        Self {
            state: Mutex::new(State::default()),
            max_size,
            evict_batch: evict_batch.max(1),
        }
    }

    /// The process-wide cache used by [`crate::evaluate`] and
    /// [`crate::XPathQuery`].
    #[must_use]
    pub fn shared() -> &'static Self {
        &SHARED
    }

    fn lock(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Return the compiled form of `source`, compiling and caching it on a miss.
    ///
    /// # Errors
    ///
    /// Compile errors from [`XPathExpression::compile`]; failures are not cached.
    pub fn get_or_compile(&self, source: &str, config: &XPathConfig) -> Result<Arc<XPathExpression>, XPathError> {
        let hash = hash_source(source);
        {
            let mut guard = self.lock();
            let state = &mut *guard;
            let tick = state.next_tick();
            if let Some(entry) = state
                .buckets
                .get_mut(&hash)
                .and_then(|entries| entries.iter_mut().find(|entry| entry.source == source))
            {
                entry.last_used = tick;
                return Ok(Arc::clone(&entry.expr));
            }
        }

        let expr = Arc::new(XPathExpression::compile(source, config)?);

        let mut guard = self.lock();
        let state = &mut *guard;
        let tick = state.next_tick();
        let entries = state.buckets.entry(hash).or_default();
        if let Some(existing) = entries.iter_mut().find(|entry| entry.source == source) {
            existing.expr = Arc::clone(&expr);
            existing.last_used = tick;
        } else {
            entries.push(Entry {
                source: source.to_string(),
                expr: Arc::clone(&expr),
                last_used: tick,
            });
            state.len += 1;
        }
        if state.len > self.max_size {
            trace!(len = state.len, evict = self.evict_batch, "evicting compiled XPath expressions");
            state.evict(self.evict_batch);
        }
        Ok(expr)
    }

    /// Drop every entry.
    pub fn clear(&self) {
        let mut state = self.lock();
        state.buckets.clear();
        state.len = 0;
    }

    /// Number of cached expressions.
    #[must_use]
    pub fn len(&self) -> usize {
        self.lock().len
    }

    /// True if nothing is cached.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Maximum number of entries kept after an insert.
    #[must_use]
    pub const fn capacity(&self) -> usize {
        self.max_size
    }
}

fn hash_source(source: &str) -> u64 {
    let mut hasher = DefaultHasher::new();
    source.hash(&mut hasher);
    hasher.finish()
}

//! TTL result cache with a secondary identifier index.
//!
//! Ranked result sets are stored under a query key. Every record in a stored
//! set is also indexed by its [`derived_id`], so a reference surfaced by an
//! earlier search can be fetched again without re-querying providers.

use std::collections::{BTreeSet, HashMap};
use std::sync::Arc;
use std::time::Duration;

use sha2::{Digest, Sha256};
use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tokio::time::Instant;

use crate::config::{Config, api};
use crate::models::Record;

/// Hex characters of the title digest kept in a title-derived identifier.
const TITLE_HASH_LEN: usize = 16;

/// Stable identifier for a record.
///
/// Priority: DOI, arXiv ID, Semantic Scholar paper ID, DBLP key, then
/// `title:` followed by a short SHA-256 of the lower-cased, trimmed title.
/// Stored identifier values are used as-is.
#[must_use]
pub fn derived_id(record: &Record) -> String {
    let hard = [&record.doi, &record.arxiv_id, &record.s2_paper_id, &record.dblp_key]
        .into_iter()
        .find_map(|id| id.as_deref().filter(|v| !v.is_empty()));

    match hard {
        Some(id) => id.to_string(),
        None => {
            let digest = format!("{:x}", Sha256::digest(record.title.trim().to_lowercase()));
            format!("title:{}", &digest[..TITLE_HASH_LEN])
        }
    }
}

/// Cache key for the `search` tool.
#[must_use]
pub fn search_key(query: &str, top_k: usize) -> String {
    format!("search:{query}:{top_k}")
}

struct CacheEntry {
    records: Vec<Record>,
    expires_at: Instant,
}

impl CacheEntry {
    fn is_expired(&self, now: Instant) -> bool {
        now >= self.expires_at
    }
}

#[derive(Default)]
struct State {
    entries: HashMap<String, CacheEntry>,
    index: HashMap<String, BTreeSet<String>>,
}

impl State {
    /// Remove an entry and every index reference to it.
    fn remove(&mut self, key: &str) -> Option<CacheEntry> {
        let entry = self.entries.remove(key)?;

        for record in &entry.records {
            let id = derived_id(record);
            if let Some(keys) = self.index.get_mut(&id) {
                keys.remove(key);
                if keys.is_empty() {
                    self.index.remove(&id);
                }
            }
        }

        Some(entry)
    }

    fn sweep(&mut self, now: Instant) -> usize {
        let expired: Vec<String> = self
            .entries
            .iter()
            .filter(|(_, entry)| entry.is_expired(now))
            .map(|(key, _)| key.clone())
            .collect();

        for key in &expired {
            self.remove(key);
        }
        self.index.retain(|_, keys| !keys.is_empty());

        expired.len()
    }
}

/// Shared result cache.
///
/// One mutex guards both the primary map and the identifier index; no I/O
/// happens while it is held.
pub struct ResultCache {
    state: Arc<Mutex<State>>,
    ttl: Duration,
    sweep_interval: Duration,
    sweep_threshold: usize,
}

impl ResultCache {
    /// Create a cache with the given entry TTL and default sweep settings.
    #[must_use]
    pub fn new(ttl: Duration) -> Self {
        Self {
            state: Arc::new(Mutex::new(State::default())),
            ttl,
            sweep_interval: api::SWEEP_INTERVAL,
            sweep_threshold: api::SWEEP_THRESHOLD,
        }
    }

    /// Create a cache from configuration.
    #[must_use]
    pub fn from_config(config: &Config) -> Self {
        Self::new(config.result_cache_ttl)
            .with_sweep(config.sweep_interval, config.sweep_threshold)
    }

    /// Override the periodic sweep interval and the size that triggers a sweep on `set`.
    #[must_use]
    pub const fn with_sweep(mut self, interval: Duration, threshold: usize) -> Self {
        self.sweep_interval = interval;
        self.sweep_threshold = threshold;
        self
    }

    /// Entry time-to-live.
    #[must_use]
    pub const fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Store `records` under `key` and index each record's identifier.
    pub async fn set(&self, key: impl Into<String>, records: Vec<Record>) {
        let key = key.into();
        let now = Instant::now();
        let mut state = self.state.lock().await;

        state.remove(&key);

        for record in &records {
            state.index.entry(derived_id(record)).or_default().insert(key.clone());
        }
        let count = records.len();
        state.entries.insert(key.clone(), CacheEntry { records, expires_at: now + self.ttl });

        if state.entries.len() > self.sweep_threshold {
            let removed = state.sweep(now);
            tracing::debug!(removed, remaining = state.entries.len(), "Size-triggered sweep");
        }

        tracing::debug!(key = %key, count, "Result cache set");
    }

    /// Cached records for `key`, if present and unexpired.
    pub async fn get(&self, key: &str) -> Option<Vec<Record>> {
        let now = Instant::now();
        let mut state = self.state.lock().await;

        let entry = state.entries.get(key)?;
        if !entry.is_expired(now) {
            return Some(entry.records.clone());
        }

        state.remove(key);
        tracing::debug!(key = %key, "Result cache entry expired");
        None
    }

    /// The record whose [`derived_id`] equals `id`, from any unexpired entry.
    pub async fn get_by_id(&self, id: &str) -> Option<Record> {
        let now = Instant::now();
        let mut state = self.state.lock().await;

        let candidates: Vec<String> = state.index.get(id)?.iter().cloned().collect();

        for key in candidates {
            let Some(entry) = state.entries.get(&key) else {
                continue;
            };

            if entry.is_expired(now) {
                state.remove(&key);
                continue;
            }

            if let Some(record) = entry.records.iter().find(|r| derived_id(r) == id) {
                return Some(record.clone());
            }
        }

        None
    }

    /// Remove all expired entries; returns how many were removed.
    pub async fn sweep(&self) -> usize {
        self.state.lock().await.sweep(Instant::now())
    }

    /// Number of stored entries, expired or not.
    pub async fn len(&self) -> usize {
        self.state.lock().await.entries.len()
    }

    /// Whether the cache holds no entries.
    pub async fn is_empty(&self) -> bool {
        self.state.lock().await.entries.is_empty()
    }

    /// Drop every entry and index reference.
    pub async fn clear(&self) {
        let mut state = self.state.lock().await;
        state.entries.clear();
        state.index.clear();
    }

    /// Start the background sweep task.
    pub fn start_cleanup_task(self: Arc<Self>) -> JoinHandle<()> {
        tokio::spawn(async move {
            let mut interval = tokio::time::interval(self.sweep_interval);
            loop {
                interval.tick().await;
                let removed = self.sweep().await;
                if removed > 0 {
                    tracing::debug!(removed, "Swept expired result cache entries");
                }
            }
        })
    }

    #[cfg(test)]
    async fn index_len(&self) -> usize {
        self.state.lock().await.index.len()
    }
}

impl Default for ResultCache {
    fn default() -> Self {
        Self::new(api::RESULT_CACHE_TTL)
    }
}

impl std::fmt::Debug for ResultCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResultCache").field("ttl", &self.ttl).finish_non_exhaustive()
    }
}

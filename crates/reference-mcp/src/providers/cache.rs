//! Private per-provider response cache.

use std::sync::Arc;
use std::time::Duration;

use moka::future::Cache;
use moka::policy::EvictionPolicy;

use crate::models::Record;

/// Short-TTL cache of one provider's search responses.
///
/// Every entry shares the same TTL, so least-recently-inserted is also the
/// entry closest to expiry; LRU eviction on overflow drops the oldest.
#[derive(Clone)]
pub struct ProviderCache {
    inner: Cache<String, Arc<Vec<Record>>>,
}

impl ProviderCache {
    /// Create a cache with the given TTL and capacity.
    #[must_use]
    pub fn new(ttl: Duration, max_size: u64) -> Self {
        let inner = Cache::builder()
            .max_capacity(max_size)
            .time_to_live(ttl)
            .eviction_policy(EvictionPolicy::lru())
            .build();
        Self { inner }
    }

    /// Cache key for one provider query.
    ///
    /// Every field is length-prefixed so distinct tuples never share a digest input.
    #[must_use]
    pub fn key(
        provider: &str,
        query: &str,
        limit: usize,
        year: Option<i32>,
        author: Option<&str>,
    ) -> String {
        use md5::{Digest, Md5};

        fn field(hasher: &mut Md5, bytes: &[u8]) {
            hasher.update((bytes.len() as u64).to_le_bytes());
            hasher.update(bytes);
        }

        let mut hasher = Md5::new();
        field(&mut hasher, provider.as_bytes());
        field(&mut hasher, query.as_bytes());
        field(&mut hasher, &(limit as u64).to_le_bytes());
        match year {
            Some(y) => {
                hasher.update([1]);
                field(&mut hasher, &y.to_le_bytes());
            }
            None => hasher.update([0]),
        }
        match author {
            Some(a) => {
                hasher.update([1]);
                field(&mut hasher, a.as_bytes());
            }
            None => hasher.update([0]),
        }

        format!("{:x}", hasher.finalize())
    }

    /// Look up a cached response.
    pub async fn get(&self, key: &str) -> Option<Vec<Record>> {
        self.inner.get(key).await.map(|records| records.as_ref().clone())
    }

    /// Store a response.
    pub async fn insert(&self, key: String, records: Vec<Record>) {
        self.inner.insert(key, Arc::new(records)).await;
    }

    /// Approximate number of live entries.
    #[must_use]
    pub fn entry_count(&self) -> u64 {
        self.inner.entry_count()
    }

    /// Apply pending evictions so [`ProviderCache::entry_count`] is current.
    pub async fn run_pending_tasks(&self) {
        self.inner.run_pending_tasks().await;
    }
}

impl std::fmt::Debug for ProviderCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProviderCache").field("entries", &self.entry_count()).finish()
    }
}

//! Academic database providers.
//!
//! Each provider implements [`Provider`]: a bounded `search` against one
//! upstream database plus a `cached_search` wrapper backed by that
//! provider's own [`ProviderCache`]. Providers share no mutable state.

mod arxiv;
pub mod bibtex;
mod cache;
mod dblp;
mod http;
mod openalex;
mod registry;
mod semantic_scholar;

use std::time::Duration;

pub use arxiv::ArxivProvider;
pub use cache::ProviderCache;
pub use dblp::DblpProvider;
pub use openalex::OpenAlexProvider;
pub use registry::{PROVIDER_NAMES, get_providers};
pub use semantic_scholar::SemanticScholarProvider;

use crate::config::api;
use crate::error::ProviderResult;
use crate::models::Record;

/// A searchable academic database.
#[async_trait::async_trait]
pub trait Provider: Send + Sync {
    /// Provider name (e.g., "dblp").
    fn name(&self) -> &'static str;

    /// Upper bound on a single call, enforced by the fanout.
    fn timeout(&self) -> Duration {
        api::PROVIDER_TIMEOUT
    }

    /// Largest `limit` passed to [`Provider::search`].
    fn max_per_query(&self) -> usize {
        api::MAX_PER_QUERY
    }

    /// This provider's private response cache.
    fn cache(&self) -> &ProviderCache;

    /// Search the upstream database.
    ///
    /// `year` keeps papers published in or after that year; `author` keeps
    /// papers with a matching author name.
    async fn search(
        &self,
        query: &str,
        limit: usize,
        year: Option<i32>,
        author: Option<&str>,
    ) -> ProviderResult<Vec<Record>>;

    /// [`Provider::search`] behind the provider's TTL cache.
    ///
    /// Only successful responses are cached.
    async fn cached_search(
        &self,
        query: &str,
        limit: usize,
        year: Option<i32>,
        author: Option<&str>,
    ) -> ProviderResult<Vec<Record>> {
        let key = ProviderCache::key(self.name(), query, limit, year, author);
        if let Some(hit) = self.cache().get(&key).await {
            tracing::debug!(provider = self.name(), count = hit.len(), "Provider cache hit");
            return Ok(hit);
        }

        let records = self.search(query, limit.min(self.max_per_query()), year, author).await?;
        self.cache().insert(key, records.clone()).await;
        Ok(records)
    }
}

/// Client-side filter for providers whose API lacks year/author filters.
#[must_use]
pub fn matches_filters(record: &Record, year: Option<i32>, author: Option<&str>) -> bool {
    if let Some(min_year) = year {
        if record.year.is_some_and(|y| y < min_year) {
            return false;
        }
    }

    if let Some(author) = author {
        let needle = author.trim().to_lowercase();
        if !needle.is_empty()
            && !record.authors.iter().any(|a| a.to_lowercase().contains(&needle))
        {
            return false;
        }
    }

    true
}

/// Non-empty, trimmed string or `None`.
fn non_empty(value: Option<&str>) -> Option<String> {
    value.map(str::trim).filter(|v| !v.is_empty()).map(str::to_string)
}

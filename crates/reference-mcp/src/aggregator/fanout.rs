//! Concurrent provider fanout with per-provider failure isolation.

use std::sync::Arc;
use std::time::{Duration, Instant};

use futures::future::join_all;

use crate::error::ProviderError;
use crate::models::Record;
use crate::providers::Provider;

/// What a single provider call produced.
#[derive(Debug)]
pub enum ProviderOutcome {
    /// The call returned results (possibly none).
    Completed(Vec<Record>),
    /// The provider returned an error.
    Failed(ProviderError),
    /// The provider exceeded its own timeout.
    TimedOut(Duration),
}

impl ProviderOutcome {
    /// Records contributed to the fanout; empty unless the call completed.
    #[must_use]
    pub fn into_records(self) -> Vec<Record> {
        match self {
            Self::Completed(records) => records,
            Self::Failed(_) | Self::TimedOut(_) => Vec::new(),
        }
    }

    /// Whether the call completed.
    #[must_use]
    pub const fn is_completed(&self) -> bool {
        matches!(self, Self::Completed(_))
    }
}

/// Query every provider concurrently and report each outcome in provider order.
///
/// Each call goes through [`Provider::cached_search`] and is bounded by
/// [`Provider::timeout`]. All calls are awaited before returning. Dropping the
/// returned future abandons any calls still in flight.
pub async fn fanout_outcomes(
    query: &str,
    k: usize,
    providers: &[Arc<dyn Provider>],
    year: Option<i32>,
    author: Option<&str>,
) -> Vec<(&'static str, ProviderOutcome)> {
    let calls = providers.iter().map(|provider| async move {
        let name = provider.name();
        let limit = provider.timeout();
        let start = Instant::now();

        let outcome = match tokio::time::timeout(
            limit,
            provider.cached_search(query, k, year, author),
        )
        .await
        {
            Ok(Ok(records)) => {
                tracing::debug!(
                    provider = name,
                    count = records.len(),
                    elapsed = ?start.elapsed(),
                    "Provider search completed"
                );
                ProviderOutcome::Completed(records)
            }
            Ok(Err(e)) => {
                tracing::warn!(
                    provider = name,
                    error = %e,
                    retryable = e.is_retryable(),
                    "Provider search failed"
                );
                ProviderOutcome::Failed(e)
            }
            Err(_) => {
                tracing::warn!(provider = name, timeout = ?limit, "Provider search timed out");
                ProviderOutcome::TimedOut(limit)
            }
        };

        (name, outcome)
    });

    join_all(calls).await
}

/// Query every provider concurrently and concatenate their records.
///
/// Output keeps provider order, then each provider's own result order.
/// A provider that fails or times out contributes nothing.
pub async fn fanout(
    query: &str,
    k: usize,
    providers: &[Arc<dyn Provider>],
    year: Option<i32>,
    author: Option<&str>,
) -> Vec<Record> {
    let outcomes = fanout_outcomes(query, k, providers, year, author).await;

    let records: Vec<Record> =
        outcomes.into_iter().flat_map(|(_, outcome)| outcome.into_records()).collect();

    tracing::debug!(providers = providers.len(), count = records.len(), "Fanout finished");
    records
}

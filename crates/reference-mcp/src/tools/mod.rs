//! MCP tool implementations.
//!
//! Each tool:
//! 1. Parses and validates its input
//! 2. Runs the aggregation pipeline or reads the result cache
//! 3. Formats results as Markdown or JSON

mod fetch;
mod search;
mod search_reference;

pub use fetch::FetchTool;
pub use search::SearchTool;
pub use search_reference::SearchReferenceTool;

use std::sync::Arc;

use crate::aggregator::{dedupe_rank, fanout};
use crate::cache::ResultCache;
use crate::config::api;
use crate::error::ToolResult;
use crate::models::Record;
use crate::providers::Provider;

/// Tool execution context.
#[derive(Clone)]
pub struct ToolContext {
    /// Providers queried by default, in fanout order.
    pub providers: Arc<Vec<Arc<dyn Provider>>>,

    /// Results shared between `search` and `fetch`.
    pub cache: Arc<ResultCache>,
}

impl ToolContext {
    /// Create a new tool context.
    #[must_use]
    pub fn new(providers: Vec<Arc<dyn Provider>>, cache: Arc<ResultCache>) -> Self {
        Self { providers: Arc::new(providers), cache }
    }

    /// Configured providers restricted to `names`, in the requested order.
    ///
    /// `None` selects all of them; unknown names are ignored.
    #[must_use]
    pub fn select_providers(&self, names: Option<&[String]>) -> Vec<Arc<dyn Provider>> {
        match names {
            None => self.providers.as_ref().clone(),
            Some(names) => names
                .iter()
                .filter_map(|name| self.providers.iter().find(|p| p.name() == name.as_str()))
                .cloned()
                .collect(),
        }
    }

    /// Fan out to `providers`, over-fetching, then merge and rank to `max_results`.
    pub async fn run_pipeline(
        &self,
        query: &str,
        max_results: usize,
        year: Option<i32>,
        author: Option<&str>,
        providers: &[Arc<dyn Provider>],
    ) -> Vec<Record> {
        let raw = fanout(query, max_results * api::OVERFETCH_FACTOR, providers, year, author).await;
        tracing::info!(query, raw = raw.len(), "Collected provider results");

        let ranked = dedupe_rank(&raw, max_results);
        tracing::info!(query, count = ranked.len(), "Ranked references");
        ranked
    }
}

impl std::fmt::Debug for ToolContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let names: Vec<&str> = self.providers.iter().map(|p| p.name()).collect();
        f.debug_struct("ToolContext").field("providers", &names).finish_non_exhaustive()
    }
}

/// Trait for MCP tools.
#[async_trait::async_trait]
pub trait McpTool: Send + Sync {
    /// Tool name (e.g., "search_reference").
    fn name(&self) -> &'static str;

    /// Tool description for LLM.
    fn description(&self) -> &'static str;

    /// JSON Schema for input parameters.
    fn input_schema(&self) -> serde_json::Value;

    /// Execute the tool with given input.
    async fn execute(&self, ctx: &ToolContext, input: serde_json::Value) -> ToolResult<String>;
}

/// Register all tools.
#[must_use]
pub fn register_all_tools() -> Vec<Box<dyn McpTool>> {
    vec![Box::new(SearchReferenceTool), Box::new(SearchTool), Box::new(FetchTool)]
}

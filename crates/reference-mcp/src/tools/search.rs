//! Lightweight search returning ids, titles and snippets.

use serde_json::json;

use super::{McpTool, ToolContext};
use crate::cache::search_key;
use crate::error::ToolResult;
use crate::formatters;
use crate::models::SearchInput;

/// Recall step: compact hits whose ids can be passed to `fetch`.
pub struct SearchTool;

#[async_trait::async_trait]
impl McpTool for SearchTool {
    fn name(&self) -> &'static str {
        "search"
    }

    fn description(&self) -> &'static str {
        "Search academic literature and return lightweight results (id, title, snippet) for \
         browsing. Pass the ids to `fetch` to retrieve full BibTeX records and abstracts."
    }

    fn input_schema(&self) -> serde_json::Value {
        json!({
            "type": "object",
            "properties": {
                "query": {
                    "type": "string",
                    "description": "Search terms (paper titles, author names, keywords)"
                },
                "topK": {
                    "type": "integer",
                    "default": 10,
                    "minimum": 1,
                    "maximum": 100,
                    "description": "Number of results to return"
                }
            },
            "required": ["query"]
        })
    }

    async fn execute(&self, ctx: &ToolContext, input: serde_json::Value) -> ToolResult<String> {
        let params: SearchInput = serde_json::from_value(input)?;
        params.validate()?;

        let key = search_key(&params.query, params.top_k);
        let records = match ctx.cache.get(&key).await {
            Some(records) => {
                tracing::debug!(key = %key, "Serving search from result cache");
                records
            }
            None => {
                let records = ctx
                    .run_pipeline(&params.query, params.top_k, None, None, &ctx.providers)
                    .await;
                ctx.cache.set(key, records.clone()).await;
                records
            }
        };

        let hits: Vec<serde_json::Value> = records.iter().map(formatters::search_hit).collect();
        tracing::info!(query = %params.query, hits = hits.len(), "search");

        Ok(serde_json::to_string_pretty(&hits)?)
    }
}

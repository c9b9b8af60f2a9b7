//! Fetch full documents for ids returned by `search`.

use serde_json::json;

use super::{McpTool, ToolContext};
use crate::error::ToolResult;
use crate::formatters;
use crate::models::FetchInput;

/// Precision step: BibTeX plus abstract for each requested id.
pub struct FetchTool;

#[async_trait::async_trait]
impl McpTool for FetchTool {
    fn name(&self) -> &'static str {
        "fetch"
    }

    fn description(&self) -> &'static str {
        "Fetch full documents (BibTeX record and abstract) for ids returned by `search`. \
         Ids not found in recent results are looked up again."
    }

    fn input_schema(&self) -> serde_json::Value {
        json!({
            "type": "object",
            "properties": {
                "ids": {
                    "type": "array",
                    "items": {"type": "string"},
                    "description": "Document ids from previous search results"
                }
            },
            "required": ["ids"]
        })
    }

    async fn execute(&self, ctx: &ToolContext, input: serde_json::Value) -> ToolResult<String> {
        let params: FetchInput = serde_json::from_value(input)?;
        params.validate()?;

        let mut documents = serde_json::Map::new();

        for id in &params.ids {
            let record = match ctx.cache.get_by_id(id).await {
                Some(record) => Some(record),
                None => {
                    tracing::info!(id = %id, "Id not in result cache, searching");
                    ctx.run_pipeline(id, 1, None, None, &ctx.providers).await.into_iter().next()
                }
            };

            match record {
                Some(record) => {
                    documents.insert(id.clone(), json!(formatters::fetch_document(&record)));
                }
                None => tracing::warn!(id = %id, "No results found for id"),
            }
        }

        tracing::info!(requested = params.ids.len(), found = documents.len(), "fetch");
        Ok(serde_json::to_string_pretty(&documents)?)
    }
}

//! Full reference search: every provider, merged, ranked, with BibTeX.

use serde_json::json;

use super::{McpTool, ToolContext};
use crate::error::ToolResult;
use crate::formatters;
use crate::models::{ResponseFormat, SearchReferenceInput};

/// Search all academic databases and return deduplicated BibTeX references.
pub struct SearchReferenceTool;

#[async_trait::async_trait]
impl McpTool for SearchReferenceTool {
    fn name(&self) -> &'static str {
        "search_reference"
    }

    fn description(&self) -> &'static str {
        "Search academic literature databases (DBLP, Semantic Scholar, OpenAlex) and return \
         deduplicated, ranked references with BibTeX citations. Results found by several \
         databases are merged into one entry."
    }

    fn input_schema(&self) -> serde_json::Value {
        json!({
            "type": "object",
            "properties": {
                "query": {
                    "type": "string",
                    "description": "Paper titles, author names, keywords or years"
                },
                "maxResults": {
                    "type": "integer",
                    "default": 20,
                    "minimum": 1,
                    "maximum": 100,
                    "description": "Number of references to return"
                },
                "year": {
                    "type": "integer",
                    "description": "Only papers published in or after this year"
                },
                "author": {
                    "type": "string",
                    "description": "Only papers with an author matching this name"
                },
                "providers": {
                    "type": "array",
                    "items": {"type": "string", "enum": ["dblp", "semantic_scholar", "arxiv", "openalex"]},
                    "description": "Databases to search (default: all)"
                },
                "responseFormat": {
                    "type": "string",
                    "enum": ["markdown", "json"],
                    "default": "json"
                }
            },
            "required": ["query"]
        })
    }

    async fn execute(&self, ctx: &ToolContext, input: serde_json::Value) -> ToolResult<String> {
        let params: SearchReferenceInput = serde_json::from_value(input)?;
        params.validate()?;

        let author = params.author.as_deref().map(str::trim).filter(|a| !a.is_empty());
        let providers = ctx.select_providers(params.providers.as_deref());

        tracing::info!(
            query = %params.query,
            max_results = params.max_results,
            year = ?params.year,
            author = ?author,
            providers = providers.len(),
            "search_reference"
        );

        let records = ctx
            .run_pipeline(&params.query, params.max_results, params.year, author, &providers)
            .await;

        match params.response_format {
            ResponseFormat::Markdown => {
                Ok(formatters::format_records_markdown(&records, &params.query))
            }
            ResponseFormat::Json => {
                let body =
                    formatters::references_response(&records, &params.query, params.year, author);
                Ok(serde_json::to_string_pretty(&body)?)
            }
        }
    }
}

//! Input models for MCP tool parameters.

use serde::{Deserialize, Serialize};

use super::ResponseFormat;
use crate::config::api;
use crate::error::{ToolError, ToolResult};

/// Input for the full reference search.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchReferenceInput {
    /// Free-text search string (titles, authors, years).
    pub query: String,

    /// Maximum total references to return (1-100).
    #[serde(default = "default_max_results")]
    pub max_results: usize,

    /// Papers published in or after this year.
    #[serde(default)]
    pub year: Option<i32>,

    /// Author name filter.
    #[serde(default)]
    pub author: Option<String>,

    /// Optional subset of provider names to search.
    #[serde(default)]
    pub providers: Option<Vec<String>>,

    /// Output format.
    #[serde(default)]
    pub response_format: ResponseFormat,
}

fn default_max_results() -> usize {
    api::DEFAULT_MAX_RESULTS
}

impl SearchReferenceInput {
    /// Check field bounds.
    pub fn validate(&self) -> ToolResult<()> {
        validate_query(&self.query)?;
        validate_count("maxResults", self.max_results)
    }
}

/// Input for the lightweight search (recall step).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchInput {
    /// Search terms.
    pub query: String,

    /// Number of hits to return.
    #[serde(default = "default_top_k")]
    pub top_k: usize,
}

fn default_top_k() -> usize {
    10
}

impl SearchInput {
    /// Check field bounds.
    pub fn validate(&self) -> ToolResult<()> {
        validate_query(&self.query)?;
        validate_count("topK", self.top_k)
    }
}

/// Input for fetching full documents (precision step).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FetchInput {
    /// Identifiers returned by a previous search.
    pub ids: Vec<String>,
}

impl FetchInput {
    /// Check field bounds.
    pub fn validate(&self) -> ToolResult<()> {
        if self.ids.is_empty() {
            return Err(ToolError::validation("ids", "at least one id is required"));
        }
        if self.ids.iter().any(|id| id.trim().is_empty()) {
            return Err(ToolError::validation("ids", "ids cannot be blank"));
        }
        Ok(())
    }
}

fn validate_query(query: &str) -> ToolResult<()> {
    if query.trim().is_empty() {
        return Err(ToolError::validation("query", "cannot be empty"));
    }
    Ok(())
}

fn validate_count(field: &str, value: usize) -> ToolResult<()> {
    if !(1..=api::MAX_RESULTS_LIMIT).contains(&value) {
        return Err(ToolError::validation(
            field,
            format!("must be between 1 and {}", api::MAX_RESULTS_LIMIT),
        ));
    }
    Ok(())
}

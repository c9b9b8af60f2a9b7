//! Reference MCP Server
//!
//! A Model Context Protocol (MCP) server that searches several academic
//! databases at once, merges records describing the same work, ranks them,
//! and returns BibTeX references.
//!
//! # Features
//!
//! - **Concurrent fanout**: DBLP, Semantic Scholar, arXiv and OpenAlex queried in parallel,
//!   each bounded by its own timeout
//! - **Cross-source merging**: DOI, arXiv ID and paper ID matching with a fuzzy
//!   title/author fallback
//! - **Cached**: per-provider response caches plus a result cache indexed by
//!   stable identifiers for `fetch`
//!
//! # Example
//!
//! ```no_run
//! use reference_mcp::{aggregator, config::Config, providers};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = Config::default();
//!     let providers = providers::get_providers(None, &config)?;
//!
//!     let raw = aggregator::fanout("attention is all you need", 10, &providers, None, None).await;
//!     for record in aggregator::dedupe_rank(&raw, 5) {
//!         println!("{}", record.bibtex);
//!     }
//!     Ok(())
//! }
//! ```

pub mod aggregator;
pub mod cache;
pub mod config;
pub mod error;
pub mod formatters;
pub mod models;
pub mod providers;
pub mod server;
pub mod tools;

pub use cache::ResultCache;
pub use config::Config;
pub use error::{ProviderError, ToolError};
pub use models::Record;

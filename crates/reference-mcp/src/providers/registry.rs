//! Provider registry.

use std::sync::Arc;

use super::{ArxivProvider, DblpProvider, OpenAlexProvider, Provider, SemanticScholarProvider};
use crate::config::Config;
use crate::error::ProviderResult;

/// Names of every available provider, in default fanout order.
pub const PROVIDER_NAMES: &[&str] = &["dblp", "semantic_scholar", "arxiv", "openalex"];

fn build(name: &str, config: &Config) -> ProviderResult<Option<Arc<dyn Provider>>> {
    let provider: Arc<dyn Provider> = match name {
        "dblp" => Arc::new(DblpProvider::new(config)?),
        "semantic_scholar" => Arc::new(SemanticScholarProvider::new(config)?),
        "arxiv" => Arc::new(ArxivProvider::new(config)?),
        "openalex" => Arc::new(OpenAlexProvider::new(config)?),
        _ => return Ok(None),
    };
    Ok(Some(provider))
}

/// Instantiate providers by name.
///
/// `None` selects every provider. Unknown names are skipped with a warning;
/// the requested order is preserved.
///
/// # Errors
///
/// Returns an error if a provider's HTTP client cannot be built.
pub fn get_providers(
    names: Option<&[String]>,
    config: &Config,
) -> ProviderResult<Vec<Arc<dyn Provider>>> {
    let selected: Vec<&str> = match names {
        Some(names) => names.iter().map(String::as_str).collect(),
        None => PROVIDER_NAMES.to_vec(),
    };

    let mut providers = Vec::with_capacity(selected.len());
    for name in selected {
        if providers.iter().any(|p: &Arc<dyn Provider>| p.name() == name) {
            continue;
        }
        match build(name, config)? {
            Some(provider) => providers.push(provider),
            None => tracing::warn!(provider = name, "Unknown provider ignored"),
        }
    }

    Ok(providers)
}

//! DBLP computer science bibliography provider.

use std::time::Duration;

use reqwest::Client;
use reqwest::header::HeaderMap;
use serde_json::Value;

use super::bibtex::BibtexEntry;
use super::http::{build_client, get_json};
use super::{Provider, ProviderCache, matches_filters, non_empty};
use crate::config::Config;
use crate::error::ProviderResult;
use crate::models::{ProviderMeta, Record};

const NAME: &str = "dblp";

/// DBLP search provider.
pub struct DblpProvider {
    client: Client,
    base_url: String,
    cache: ProviderCache,
    timeout: Duration,
}

impl DblpProvider {
    /// Create a provider from configuration.
    pub fn new(config: &Config) -> ProviderResult<Self> {
        Ok(Self {
            client: build_client(config, HeaderMap::new())?,
            base_url: config.dblp_url.clone(),
            cache: ProviderCache::new(config.provider_cache_ttl, config.provider_cache_max_size),
            timeout: config.provider_timeout,
        })
    }
}

#[async_trait::async_trait]
impl Provider for DblpProvider {
    fn name(&self) -> &'static str {
        NAME
    }

    fn timeout(&self) -> Duration {
        self.timeout
    }

    fn cache(&self) -> &ProviderCache {
        &self.cache
    }

    async fn search(
        &self,
        query: &str,
        limit: usize,
        year: Option<i32>,
        author: Option<&str>,
    ) -> ProviderResult<Vec<Record>> {
        let params =
            [("q", query.to_string()), ("h", limit.to_string()), ("format", "json".to_string())];

        let value = get_json(&self.client, &self.base_url, &params, self.timeout).await?;

        let hits = match value.pointer("/result/hits/hit") {
            Some(Value::Array(hits)) => hits.clone(),
            Some(hit @ Value::Object(_)) => vec![hit.clone()],
            _ => Vec::new(),
        };

        let records: Vec<Record> = hits
            .into_iter()
            .filter_map(parse_hit)
            .filter(|r| matches_filters(r, year, author))
            .collect();

        tracing::debug!(provider = NAME, count = records.len(), "Parsed search results");
        Ok(records)
    }
}

fn parse_hit(hit: Value) -> Option<Record> {
    let info = hit.get("info")?;

    let title = non_empty(text(info.get("title")).as_deref())
        .map(|t| t.strip_suffix('.').map(str::to_string).unwrap_or(t))?;

    // A single author comes back as an object rather than a list
    let authors: Vec<String> = match info.pointer("/authors/author") {
        Some(Value::Array(list)) => list.iter().filter_map(author_name).collect(),
        Some(single) => author_name(single).into_iter().collect(),
        None => Vec::new(),
    };

    let year = text(info.get("year")).and_then(|y| y.trim().parse().ok());
    // A hit without a usable score counts as 0 in the merged mean
    let score = text(hit.get("@score"))
        .and_then(|s| s.trim().parse::<f64>().ok())
        .filter(|s| s.is_finite())
        .unwrap_or(0.0);

    let key = non_empty(text(info.get("key")).as_deref());
    let doi = non_empty(text(info.get("doi")).as_deref());
    let venue = non_empty(text(info.get("venue")).as_deref());
    let volume = non_empty(text(info.get("volume")).as_deref());
    let pages = non_empty(text(info.get("pages")).as_deref());
    let url = non_empty(text(info.get("url")).as_deref());

    let is_article = text(info.get("type")).as_deref() == Some("Journal Articles");
    let (entry_type, venue_field) =
        if is_article { ("article", "journal") } else { ("inproceedings", "booktitle") };
    let bib_key = key.as_deref().and_then(|k| k.rsplit('/').next()).unwrap_or("unknown");

    let bibtex = BibtexEntry::new(entry_type, bib_key)
        .text("title", &title)
        .text("author", &authors.join(" and "))
        .verbatim_opt("year", year)
        .text_opt(venue_field, venue.as_deref())
        .verbatim_opt("volume", volume.as_deref())
        .verbatim_opt("pages", pages.as_deref())
        .verbatim_opt("doi", doi.as_deref())
        .build();

    Some(Record {
        title,
        authors,
        year,
        doi,
        dblp_key: key,
        venue,
        volume,
        pages,
        bibtex,
        score,
        sources: vec![ProviderMeta::new(NAME).with_score(score).with_url(url).with_raw(hit)],
        ..Default::default()
    })
}

/// String content of a scalar, or the first element of a list.
fn text(value: Option<&Value>) -> Option<String> {
    match value? {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Array(items) => text(items.first()),
        _ => None,
    }
}

fn author_name(author: &Value) -> Option<String> {
    match author {
        Value::Object(_) => non_empty(text(author.get("text")).as_deref()),
        other => non_empty(text(Some(other)).as_deref()),
    }
}

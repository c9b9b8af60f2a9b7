//! Semantic Scholar Graph API provider.

use std::time::Duration;

use chrono::{Datelike, NaiveDate};
use reqwest::Client;
use reqwest::header::HeaderMap;
use serde::Deserialize;

use super::bibtex::BibtexEntry;
use super::http::{build_client, get_json};
use super::{Provider, ProviderCache, matches_filters, non_empty};
use crate::config::Config;
use crate::error::{ProviderError, ProviderResult};
use crate::models::{ProviderMeta, Record};

const NAME: &str = "semantic_scholar";

const FIELDS: &str =
    "title,authors,year,venue,externalIds,url,abstract,citationCount,publicationDate";

#[derive(Debug, Default, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    data: Vec<serde_json::Value>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct S2Paper {
    #[serde(default)]
    paper_id: Option<String>,
    #[serde(default)]
    title: Option<String>,
    #[serde(default)]
    authors: Vec<S2Author>,
    #[serde(default)]
    year: Option<i32>,
    #[serde(default)]
    venue: Option<String>,
    #[serde(default)]
    external_ids: Option<S2ExternalIds>,
    #[serde(default)]
    url: Option<String>,
    #[serde(default)]
    r#abstract: Option<String>,
    #[serde(default)]
    citation_count: Option<u64>,
    #[serde(default)]
    publication_date: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct S2Author {
    #[serde(default)]
    name: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct S2ExternalIds {
    #[serde(rename = "DOI", default)]
    doi: Option<String>,
    #[serde(rename = "ArXiv", default)]
    arxiv: Option<String>,
}

/// Semantic Scholar search provider.
pub struct SemanticScholarProvider {
    client: Client,
    base_url: String,
    cache: ProviderCache,
    timeout: Duration,
}

impl SemanticScholarProvider {
    /// Create a provider from configuration.
    pub fn new(config: &Config) -> ProviderResult<Self> {
        let mut headers = HeaderMap::new();
        if let Some(key) = &config.semantic_scholar_api_key {
            let value = key
                .parse()
                .map_err(|_| ProviderError::bad_request("invalid Semantic Scholar API key"))?;
            headers.insert("x-api-key", value);
        }

        Ok(Self {
            client: build_client(config, headers)?,
            base_url: config.semantic_scholar_url.clone(),
            cache: ProviderCache::new(config.provider_cache_ttl, config.provider_cache_max_size),
            timeout: config.provider_timeout,
        })
    }
}

#[async_trait::async_trait]
impl Provider for SemanticScholarProvider {
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
        let url = format!("{}/paper/search", self.base_url);

        let mut params = vec![
            ("query", query.to_string()),
            ("limit", limit.to_string()),
            ("fields", FIELDS.to_string()),
        ];
        if let Some(y) = year {
            params.push(("year", format!("{y}-")));
        }

        let value = get_json(&self.client, &url, &params, self.timeout).await?;
        let response: SearchResponse = serde_json::from_value(value)?;

        let records: Vec<Record> = response
            .data
            .into_iter()
            .filter_map(parse_paper)
            .filter(|r| matches_filters(r, year, author))
            .collect();

        tracing::debug!(provider = NAME, count = records.len(), "Parsed search results");
        Ok(records)
    }
}

fn parse_paper(raw: serde_json::Value) -> Option<Record> {
    let paper: S2Paper = match serde_json::from_value(raw.clone()) {
        Ok(p) => p,
        Err(e) => {
            tracing::debug!(provider = NAME, error = %e, "Skipping malformed paper");
            return None;
        }
    };

    let title = non_empty(paper.title.as_deref())?;
    let authors: Vec<String> =
        paper.authors.iter().filter_map(|a| non_empty(a.name.as_deref())).collect();

    let year = paper.year.or_else(|| paper.publication_date.as_deref().and_then(year_from_date));

    let (doi, arxiv_id) = paper
        .external_ids
        .map(|ids| (non_empty(ids.doi.as_deref()), non_empty(ids.arxiv.as_deref())))
        .unwrap_or_default();
    let venue = non_empty(paper.venue.as_deref());

    let bibtex = BibtexEntry::new("article", paper.paper_id.as_deref().unwrap_or("unknown"))
        .text("title", &title)
        .text("author", &authors.join(" and "))
        .verbatim_opt("year", year)
        .text_opt("journal", venue.as_deref())
        .verbatim_opt("doi", doi.as_deref())
        .verbatim_opt("eprint", arxiv_id.as_deref())
        .verbatim_opt("archivePrefix", arxiv_id.as_ref().map(|_| "arXiv"))
        .build();

    Some(Record {
        title,
        authors,
        year,
        doi,
        arxiv_id,
        s2_paper_id: paper.paper_id,
        venue,
        r#abstract: non_empty(paper.r#abstract.as_deref()),
        bibtex,
        citation_count: paper.citation_count,
        sources: vec![ProviderMeta::new(NAME).with_url(paper.url).with_raw(raw)],
        ..Default::default()
    })
}

/// Year from an ISO date, tolerating a bare `YYYY` prefix.
fn year_from_date(date: &str) -> Option<i32> {
    NaiveDate::parse_from_str(date, "%Y-%m-%d")
        .map(|d| d.year())
        .ok()
        .or_else(|| date.get(..4).and_then(|y| y.parse().ok()))
}

//! OpenAlex open bibliographic database provider.

use std::time::Duration;

use reqwest::Client;
use reqwest::header::HeaderMap;
use serde::Deserialize;

use super::bibtex::BibtexEntry;
use super::http::{build_client, get_json};
use super::{Provider, ProviderCache, non_empty};
use crate::config::Config;
use crate::error::ProviderResult;
use crate::models::{ProviderMeta, Record};

const NAME: &str = "openalex";

const SELECT: &str = "id,doi,title,authorships,publication_year,primary_location,biblio,type";

#[derive(Debug, Default, Deserialize)]
struct WorksResponse {
    #[serde(default)]
    results: Vec<serde_json::Value>,
}

#[derive(Debug, Default, Deserialize)]
struct Work {
    #[serde(default)]
    id: Option<String>,
    #[serde(default)]
    doi: Option<String>,
    #[serde(default)]
    title: Option<String>,
    #[serde(default)]
    authorships: Vec<Authorship>,
    #[serde(default)]
    publication_year: Option<i32>,
    #[serde(default)]
    primary_location: Option<Location>,
    #[serde(default)]
    biblio: Option<Biblio>,
    #[serde(default, rename = "type")]
    work_type: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct Authorship {
    #[serde(default)]
    author: Option<DisplayName>,
}

#[derive(Debug, Default, Deserialize)]
struct DisplayName {
    #[serde(default)]
    display_name: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct Location {
    #[serde(default)]
    source: Option<DisplayName>,
}

#[derive(Debug, Default, Deserialize)]
struct Biblio {
    #[serde(default)]
    volume: Option<String>,
    #[serde(default)]
    issue: Option<String>,
    #[serde(default)]
    first_page: Option<String>,
    #[serde(default)]
    last_page: Option<String>,
}

/// OpenAlex works search provider.
pub struct OpenAlexProvider {
    client: Client,
    base_url: String,
    mailto: Option<String>,
    cache: ProviderCache,
    timeout: Duration,
}

impl OpenAlexProvider {
    /// Create a provider from configuration.
    pub fn new(config: &Config) -> ProviderResult<Self> {
        Ok(Self {
            client: build_client(config, HeaderMap::new())?,
            base_url: config.openalex_url.clone(),
            mailto: config.openalex_mailto.clone(),
            cache: ProviderCache::new(config.provider_cache_ttl, config.provider_cache_max_size),
            timeout: config.provider_timeout,
        })
    }
}

/// Build the OpenAlex `filter` parameter.
fn build_filter(query: &str, year: Option<i32>, author: Option<&str>) -> String {
    let mut filters = vec![format!("display_name.search:\"{}\"", sanitize(query))];

    if let Some(y) = year {
        filters.push(format!("publication_year:>{}", y - 1));
    }

    if let Some(a) = author.map(str::trim).filter(|a| !a.is_empty()) {
        filters.push(format!("authorships.author.display_name.search:\"{}\"", sanitize(a)));
    }

    filters.join(",")
}

/// Quotes and commas would break out of a filter value.
fn sanitize(value: &str) -> String {
    value.replace(['"', ','], " ")
}

#[async_trait::async_trait]
impl Provider for OpenAlexProvider {
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
        let url = format!("{}/works", self.base_url);

        let mut params = vec![
            ("filter", build_filter(query, year, author)),
            ("per-page", limit.to_string()),
            ("select", SELECT.to_string()),
        ];
        if let Some(mailto) = &self.mailto {
            params.push(("mailto", mailto.clone()));
        }

        let value = get_json(&self.client, &url, &params, self.timeout).await?;
        let response: WorksResponse = serde_json::from_value(value)?;

        let records: Vec<Record> = response.results.into_iter().filter_map(parse_work).collect();

        tracing::debug!(provider = NAME, count = records.len(), "Parsed search results");
        Ok(records)
    }
}

fn parse_work(raw: serde_json::Value) -> Option<Record> {
    let work: Work = match serde_json::from_value(raw.clone()) {
        Ok(w) => w,
        Err(e) => {
            tracing::debug!(provider = NAME, error = %e, "Skipping malformed work");
            return None;
        }
    };

    let title = non_empty(work.title.as_deref())?;
    let authors: Vec<String> = work
        .authorships
        .iter()
        .filter_map(|a| non_empty(a.author.as_ref()?.display_name.as_deref()))
        .collect();

    let doi = non_empty(work.doi.as_deref())
        .map(|d| d.strip_prefix("https://doi.org/").map(str::to_string).unwrap_or(d));
    let venue = work
        .primary_location
        .as_ref()
        .and_then(|l| non_empty(l.source.as_ref()?.display_name.as_deref()));

    let biblio = work.biblio.unwrap_or_default();
    let volume = non_empty(biblio.volume.as_deref());
    let issue = non_empty(biblio.issue.as_deref());
    let first_page = non_empty(biblio.first_page.as_deref());
    let pages = match (first_page, non_empty(biblio.last_page.as_deref())) {
        (Some(first), Some(last)) => Some(format!("{first}-{last}")),
        (first, _) => first,
    };

    let is_article = work.work_type.as_deref() == Some("article");
    let (entry_type, venue_field) =
        if is_article { ("article", "journal") } else { ("inproceedings", "booktitle") };
    let bib_key = format!(
        "openalex_{}",
        work.id.as_deref().map_or_else(|| "unknown".to_string(), id_tail)
    );

    let bibtex = BibtexEntry::new(entry_type, bib_key)
        .text("title", &title)
        .text("author", &authors.join(" and "))
        .verbatim_opt("year", work.publication_year)
        .text_opt(venue_field, venue.as_deref())
        .verbatim_opt("volume", volume.as_deref())
        .verbatim_opt("number", issue.as_deref())
        .verbatim_opt("pages", pages.as_deref())
        .verbatim_opt("doi", doi.as_deref())
        .build();

    Some(Record {
        title,
        authors,
        year: work.publication_year,
        doi,
        venue,
        volume,
        issue,
        pages,
        bibtex,
        sources: vec![ProviderMeta::new(NAME).with_url(work.id).with_raw(raw)],
        ..Default::default()
    })
}

/// Last path segment of an OpenAlex entity URL (`https://openalex.org/W123` → `W123`).
fn id_tail(id: &str) -> String {
    url::Url::parse(id)
        .ok()
        .and_then(|u| u.path_segments()?.next_back().map(str::to_string))
        .unwrap_or_else(|| id.rsplit('/').next().unwrap_or(id).to_string())
}

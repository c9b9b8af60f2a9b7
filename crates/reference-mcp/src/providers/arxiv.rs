//! arXiv preprint provider (Atom feed).

use std::time::Duration;

use reqwest::Client;
use reqwest::header::HeaderMap;
use roxmltree::{Document, Node};

use super::bibtex::BibtexEntry;
use super::http::{build_client, get_text};
use super::{Provider, ProviderCache, non_empty};
use crate::config::{Config, api};
use crate::error::ProviderResult;
use crate::models::{ProviderMeta, Record};

const NAME: &str = "arxiv";

const ATOM_NS: &str = "http://www.w3.org/2005/Atom";

/// arXiv API search provider.
pub struct ArxivProvider {
    client: Client,
    base_url: String,
    cache: ProviderCache,
    timeout: Duration,
}

impl ArxivProvider {
    /// Create a provider from configuration.
    pub fn new(config: &Config) -> ProviderResult<Self> {
        Ok(Self {
            client: build_client(config, HeaderMap::new())?,
            base_url: config.arxiv_url.clone(),
            cache: ProviderCache::new(config.provider_cache_ttl, config.provider_cache_max_size),
            timeout: config.arxiv_timeout,
        })
    }
}

/// Build the `search_query` expression: `all:` terms, optional `au:` author
/// and a `submittedDate` lower bound for the year.
fn build_search_query(query: &str, year: Option<i32>, author: Option<&str>) -> String {
    let mut parts = vec![format!("all:{}", query.trim())];

    if let Some(a) = author.map(str::trim).filter(|a| !a.is_empty()) {
        parts.push(format!("au:{a}"));
    }
    if let Some(y) = year {
        parts.push(format!("submittedDate:[{y}0101 TO *]"));
    }

    parts.join(" AND ")
}

#[async_trait::async_trait]
impl Provider for ArxivProvider {
    fn name(&self) -> &'static str {
        NAME
    }

    fn timeout(&self) -> Duration {
        self.timeout
    }

    fn max_per_query(&self) -> usize {
        api::ARXIV_MAX_PER_QUERY
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
        let params = [
            ("search_query", build_search_query(query, year, author)),
            ("start", "0".to_string()),
            ("max_results", limit.to_string()),
        ];

        let body = get_text(&self.client, &self.base_url, &params, self.timeout).await?;
        let records = parse_feed(&body)?;

        tracing::debug!(provider = NAME, count = records.len(), "Parsed search results");
        Ok(records)
    }
}

fn parse_feed(body: &str) -> ProviderResult<Vec<Record>> {
    let doc = Document::parse(body)?;

    Ok(doc
        .root_element()
        .children()
        .filter(|n| n.has_tag_name((ATOM_NS, "entry")))
        .filter_map(parse_entry)
        .collect())
}

fn child<'a, 'input>(node: Node<'a, 'input>, name: &str) -> Option<Node<'a, 'input>> {
    node.children().find(|n| n.has_tag_name((ATOM_NS, name)))
}

/// Element text with internal whitespace runs collapsed.
fn child_text(node: Node<'_, '_>, name: &str) -> Option<String> {
    let text = child(node, name)?.text()?;
    let collapsed = text.split_whitespace().collect::<Vec<_>>().join(" ");
    non_empty(Some(collapsed.as_str()))
}

fn parse_entry(entry: Node<'_, '_>) -> Option<Record> {
    let title = child_text(entry, "title")?;

    let authors: Vec<String> = entry
        .children()
        .filter(|n| n.has_tag_name((ATOM_NS, "author")))
        .filter_map(|a| child_text(a, "name"))
        .collect();

    // <id>http://arxiv.org/abs/1706.03762v7</id>
    let arxiv_id = child_text(entry, "id")
        .and_then(|id| id.split_once("arxiv.org/abs/").and_then(|(_, tail)| non_empty(Some(tail))));

    let published = child_text(entry, "published");
    let year = published.as_deref().and_then(|p| p.get(..4)).and_then(|y| y.parse().ok());

    let categories: Vec<&str> = entry
        .children()
        .filter(|n| n.has_tag_name((ATOM_NS, "category")))
        .filter_map(|c| c.attribute("term"))
        .collect();

    let bib_key = arxiv_id.as_deref().map_or_else(|| "unknown".to_string(), |id| id.replace('/', "_"));
    let bibtex = BibtexEntry::new("article", bib_key)
        .text("title", &title)
        .text("author", &authors.join(" and "))
        .verbatim_opt("year", year)
        .verbatim_opt("eprint", arxiv_id.as_deref())
        .verbatim("archivePrefix", "arXiv")
        .verbatim_opt("primaryClass", categories.first())
        .build();

    let url = arxiv_id.as_ref().map(|id| format!("https://arxiv.org/abs/{id}"));
    let raw = serde_json::json!({ "categories": categories, "published": published });

    Some(Record {
        title,
        authors,
        year,
        arxiv_id,
        r#abstract: child_text(entry, "summary"),
        bibtex,
        sources: vec![ProviderMeta::new(NAME).with_url(url).with_raw(raw)],
        ..Default::default()
    })
}

//! Shared fixtures: canned provider responses for one paper.
#![allow(dead_code)]

use std::sync::Arc;

use serde_json::json;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use reference_mcp::ResultCache;
use reference_mcp::config::Config;
use reference_mcp::providers::get_providers;
use reference_mcp::tools::ToolContext;

pub const S2_SEARCH: &str = "/graph/v1/paper/search";
pub const DBLP_SEARCH: &str = "/search/publ/api";
pub const OPENALEX_WORKS: &str = "/works";
pub const ARXIV_QUERY: &str = "/api/query";

pub const ABSTRACT: &str = "The dominant sequence transduction models are based on complex \
    recurrent or convolutional neural networks.";

pub fn setup_test_context(mock_server: &MockServer) -> ToolContext {
    let config = Config::for_testing(&mock_server.uri());
    let providers = get_providers(None, &config).unwrap();
    ToolContext::new(providers, Arc::new(ResultCache::from_config(&config)))
}

pub fn s2_body() -> serde_json::Value {
    json!({
        "total": 1,
        "offset": 0,
        "data": [{
            "paperId": "204e3073870fae3d05bcbc2f6a8e263d9b72e776",
            "title": "Attention is All you Need",
            "authors": [{"authorId": "1", "name": "Ashish Vaswani"}, {"authorId": "2", "name": "Noam Shazeer"}],
            "year": 2017,
            "venue": "Neural Information Processing Systems",
            "externalIds": {"ArXiv": "1706.03762", "DBLP": "conf/nips/VaswaniSPUJGKP17"},
            "url": "https://www.semanticscholar.org/paper/204e3073870fae3d05bcbc2f6a8e263d9b72e776",
            "abstract": ABSTRACT,
            "citationCount": 100000,
            "publicationDate": "2017-06-12"
        }]
    })
}

pub fn dblp_body() -> serde_json::Value {
    json!({
        "result": {
            "hits": {
                "@total": "1",
                "hit": [{
                    "@score": "7",
                    "@id": "1",
                    "info": {
                        "authors": {"author": [
                            {"@pid": "a", "text": "Ashish Vaswani"},
                            {"@pid": "b", "text": "Noam Shazeer"}
                        ]},
                        "title": "Attention is All you Need.",
                        "venue": "NIPS",
                        "pages": "5998-6008",
                        "year": "2017",
                        "type": "Conference and Workshop Papers",
                        "key": "conf/nips/VaswaniSPUJGKP17",
                        "url": "https://dblp.org/rec/conf/nips/VaswaniSPUJGKP17"
                    }
                }]
            }
        }
    })
}

pub fn openalex_body() -> serde_json::Value {
    json!({
        "meta": {"count": 1},
        "results": [{
            "id": "https://openalex.org/W2963403868",
            "doi": "https://doi.org/10.48550/arxiv.1706.03762",
            "title": "Attention Is All You Need",
            "authorships": [{"author": {"display_name": "Ashish Vaswani"}}],
            "publication_year": 2017,
            "primary_location": {"source": {"display_name": "arXiv (Cornell University)"}},
            "biblio": {"volume": null, "issue": null, "first_page": null, "last_page": null},
            "type": "article"
        }]
    })
}

pub fn arxiv_body() -> String {
    format!(
        r#"<?xml version="1.0" encoding="UTF-8"?>
<feed xmlns="http://www.w3.org/2005/Atom" xmlns:arxiv="http://arxiv.org/schemas/atom">
  <title type="html">ArXiv Query: search_query=all:attention</title>
  <entry>
    <id>http://arxiv.org/abs/1706.03762v7</id>
    <published>2017-06-12T17:57:34Z</published>
    <title>Attention Is All You Need</title>
    <summary>{ABSTRACT}</summary>
    <author><name>Ashish Vaswani</name></author>
    <author><name>Noam Shazeer</name></author>
    <category term="cs.CL" scheme="http://arxiv.org/schemas/atom"/>
  </entry>
</feed>"#
    )
}

pub const ARXIV_EMPTY: &str =
    r#"<?xml version="1.0" encoding="UTF-8"?><feed xmlns="http://www.w3.org/2005/Atom"></feed>"#;

pub fn empty_bodies() -> [(&'static str, serde_json::Value); 3] {
    [
        (S2_SEARCH, json!({"total": 0, "data": []})),
        (DBLP_SEARCH, json!({"result": {"hits": {"@total": "0"}}})),
        (OPENALEX_WORKS, json!({"results": []})),
    ]
}

async fn mount_atom(mock_server: &MockServer, body: String) {
    Mock::given(method("GET"))
        .and(path(ARXIV_QUERY))
        .respond_with(ResponseTemplate::new(200).set_body_raw(body, "application/atom+xml"))
        .mount(mock_server)
        .await;
}

/// Every provider answers with the same paper.
pub async fn mount_attention(mock_server: &MockServer) {
    for (route, body) in [
        (S2_SEARCH, s2_body()),
        (DBLP_SEARCH, dblp_body()),
        (OPENALEX_WORKS, openalex_body()),
    ] {
        Mock::given(method("GET"))
            .and(path(route))
            .respond_with(ResponseTemplate::new(200).set_body_json(body))
            .mount(mock_server)
            .await;
    }
    mount_atom(mock_server, arxiv_body()).await;
}

/// Every provider answers with no results.
pub async fn mount_empty(mock_server: &MockServer) {
    for (route, body) in empty_bodies() {
        Mock::given(method("GET"))
            .and(path(route))
            .respond_with(ResponseTemplate::new(200).set_body_json(body))
            .mount(mock_server)
            .await;
    }
    mount_atom(mock_server, ARXIV_EMPTY.to_string()).await;
}

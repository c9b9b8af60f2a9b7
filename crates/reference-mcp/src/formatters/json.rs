//! JSON output formatting.

use serde_json::{Value, json};

use super::truncate_chars;
use crate::cache::derived_id;
use crate::models::Record;

/// Abstract length shown in a search hit snippet.
const SNIPPET_CHARS: usize = 200;

/// Response body of the `search_reference` tool.
#[must_use]
pub fn references_response(
    records: &[Record],
    query: &str,
    year: Option<i32>,
    author: Option<&str>,
) -> Value {
    let mut obj = json!({
        "references": records,
        "total_found": records.len(),
        "query": query,
    });

    if let Some(year) = year {
        obj["year_filter"] = json!(year);
    }

    if let Some(author) = author.filter(|a| !a.is_empty()) {
        obj["author_filter"] = json!(author);
    }

    obj
}

/// Short preview for a search hit: abstract, else venue and year.
#[must_use]
pub fn snippet(record: &Record) -> String {
    if let Some(abs) = record.r#abstract.as_deref().filter(|a| !a.is_empty()) {
        return truncate_chars(abs, SNIPPET_CHARS).into_owned();
    }

    match (&record.venue, record.year) {
        (Some(venue), Some(year)) => format!("Published in {venue} ({year})"),
        (Some(venue), None) => format!("Published in {venue}"),
        (None, _) => String::new(),
    }
}

/// Lightweight search hit: stable id, title and snippet.
#[must_use]
pub fn search_hit(record: &Record) -> Value {
    json!({
        "id": derived_id(record),
        "title": record.title,
        "snippet": snippet(record),
    })
}

/// Full document text for `fetch`: BibTeX, then the abstract if known.
#[must_use]
pub fn fetch_document(record: &Record) -> String {
    match record.r#abstract.as_deref().filter(|a| !a.is_empty()) {
        Some(abs) => format!("{}\n\nAbstract:\n{abs}", record.bibtex),
        None => record.bibtex.clone(),
    }
}

//! Markdown output formatting.

use super::truncate_chars;
use crate::models::Record;

/// Abstract length shown per reference.
const ABSTRACT_CHARS: usize = 300;

/// Format a list of references as Markdown.
#[must_use]
pub fn format_records_markdown(records: &[Record], query: &str) -> String {
    if records.is_empty() {
        return format!("No references found for \"{query}\".");
    }

    let mut output = format!("# References for \"{query}\" ({} results)\n\n", records.len());

    for (i, record) in records.iter().enumerate() {
        output.push_str(&format_record_markdown(record, i + 1));
        output.push_str("\n---\n\n");
    }

    output
}

/// Format a single reference as Markdown, ending with its BibTeX block.
#[must_use]
pub fn format_record_markdown(record: &Record, index: usize) -> String {
    let mut output = format!("## {index}. {}\n\n", record.title);

    if !record.authors.is_empty() {
        output.push_str(&format!("**Authors**: {}\n\n", record.author_names()));
    }

    let mut meta = Vec::new();
    if let Some(year) = record.year {
        meta.push(format!("**Year**: {year}"));
    }
    if let Some(venue) = &record.venue {
        meta.push(format!("**Venue**: {venue}"));
    }
    if let Some(citations) = record.citation_count {
        meta.push(format!("**Citations**: {citations}"));
    }
    meta.push(format!("**Score**: {:.1}", record.score));
    output.push_str(&format!("{}\n\n", meta.join(" | ")));

    // External IDs
    let mut links = Vec::new();
    if let Some(doi) = &record.doi {
        links.push(format!("[DOI](https://doi.org/{doi})"));
    }
    if let Some(arxiv) = &record.arxiv_id {
        links.push(format!("[arXiv](https://arxiv.org/abs/{arxiv})"));
    }
    if let Some(paper_id) = &record.s2_paper_id {
        links.push(format!("[S2](https://www.semanticscholar.org/paper/{paper_id})"));
    }
    if let Some(key) = &record.dblp_key {
        links.push(format!("[DBLP](https://dblp.org/rec/{key})"));
    }
    if !links.is_empty() {
        output.push_str(&format!("**Links**: {}\n\n", links.join(" | ")));
    }

    output.push_str(&format!("**Sources**: {}\n\n", record.source_names().join(", ")));

    if let Some(abs) = &record.r#abstract {
        output.push_str(&format!("**Abstract**: {}\n\n", truncate_chars(abs, ABSTRACT_CHARS)));
    }

    output.push_str(&format!("```bibtex\n{}\n```\n", record.bibtex));

    output
}

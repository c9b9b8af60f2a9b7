//! Cross-provider duplicate detection and merging.

use std::sync::LazyLock;

use regex::Regex;

use super::similarity::{ratio, token_set_ratio};
use crate::models::Record;

/// Title similarity at which the fuzzy fallback starts considering a match.
const TITLE_MATCH_THRESHOLD: f64 = 94.0;

/// Title similarity that suffices when authors cannot be compared.
const TITLE_ONLY_THRESHOLD: f64 = 98.0;

/// First-author last-name similarity required for a fuzzy match.
const AUTHOR_MATCH_THRESHOLD: f64 = 80.0;

const DOI_PREFIXES: &[&str] = &["https://doi.org/", "http://doi.org/", "doi:"];

static ARXIV_VERSION: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"v\d+$").expect("valid arXiv version regex"));

/// Normalize a DOI for comparison: lower-case and strip resolver prefixes.
#[must_use]
pub fn normalize_doi(doi: &str) -> String {
    let doi = doi.trim().to_lowercase();
    DOI_PREFIXES
        .iter()
        .find_map(|prefix| doi.strip_prefix(prefix))
        .map(str::to_string)
        .unwrap_or(doi)
}

/// Normalize an arXiv ID for comparison: strip a trailing `v<N>` version.
#[must_use]
pub fn normalize_arxiv_id(arxiv_id: &str) -> String {
    ARXIV_VERSION.replace(arxiv_id.trim(), "").into_owned()
}

/// Decide whether two records describe the same work.
///
/// Hard identifiers are checked first (DOI, then arXiv ID, then paper ID);
/// a hard identifier only ever proves a match. Otherwise titles are
/// compared with token-set similarity, guarded by year and first author.
#[must_use]
pub fn are_duplicates(a: &Record, b: &Record) -> bool {
    if let (Some(x), Some(y)) = (&a.doi, &b.doi) {
        if normalize_doi(x) == normalize_doi(y) {
            return true;
        }
    }

    if let (Some(x), Some(y)) = (&a.arxiv_id, &b.arxiv_id) {
        if normalize_arxiv_id(x) == normalize_arxiv_id(y) {
            return true;
        }
    }

    if let (Some(x), Some(y)) = (&a.s2_paper_id, &b.s2_paper_id) {
        if x == y {
            return true;
        }
    }

    let title_similarity = token_set_ratio(&a.title.to_lowercase(), &b.title.to_lowercase());
    if title_similarity < TITLE_MATCH_THRESHOLD {
        return false;
    }

    if let (Some(x), Some(y)) = (a.year, b.year) {
        if x != y {
            return false;
        }
    }

    let author_a = a.first_author_last_name();
    let author_b = b.first_author_last_name();
    if !author_a.is_empty() && !author_b.is_empty() {
        return ratio(&author_a, &author_b) >= AUTHOR_MATCH_THRESHOLD;
    }

    title_similarity >= TITLE_ONLY_THRESHOLD
}

/// Fold `other` into `acc`, keeping the most complete data.
pub fn merge_into(acc: &mut Record, other: &Record) {
    fill(&mut acc.doi, &other.doi);
    fill(&mut acc.arxiv_id, &other.arxiv_id);
    fill(&mut acc.s2_paper_id, &other.s2_paper_id);
    fill(&mut acc.dblp_key, &other.dblp_key);

    if acc.authors.is_empty() && !other.authors.is_empty() {
        acc.authors.clone_from(&other.authors);
    }

    if let Some(theirs) = &other.r#abstract {
        let longer = acc.r#abstract.as_ref().is_none_or(|ours| theirs.len() > ours.len());
        if longer {
            acc.r#abstract = Some(theirs.clone());
        }
    }

    acc.citation_count = match (acc.citation_count, other.citation_count) {
        (Some(x), Some(y)) => Some(x.max(y)),
        (x, y) => x.or(y),
    };

    acc.sources.extend(other.sources.iter().cloned());
    acc.recompute_score();
}

fn fill(slot: &mut Option<String>, candidate: &Option<String>) {
    if slot.is_none() {
        slot.clone_from(candidate);
    }
}

/// Collapse duplicates with a single left-to-right scan.
///
/// Each unprocessed record becomes an accumulator; every later unprocessed
/// record it matches is merged in and marked processed. Output keeps the
/// order of first appearance.
#[must_use]
pub fn dedupe(records: &[Record]) -> Vec<Record> {
    let mut processed = vec![false; records.len()];
    let mut merged = Vec::with_capacity(records.len());

    for i in 0..records.len() {
        if processed[i] {
            continue;
        }
        processed[i] = true;
        let mut acc = records[i].clone();

        for j in (i + 1)..records.len() {
            if processed[j] {
                continue;
            }
            if are_duplicates(&acc, &records[j]) {
                merge_into(&mut acc, &records[j]);
                processed[j] = true;
            }
        }

        merged.push(acc);
    }

    merged
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ProviderMeta;

    fn record(title: &str, author: &str, year: Option<i32>) -> Record {
        let mut r = Record::new(title, vec![author.to_string()], format!("@misc{{{title}}}"));
        r.year = year;
        r
    }

    #[test]
    fn test_normalize_doi() {
        assert_eq!(normalize_doi("https://doi.org/10.1000/ABC"), "10.1000/abc");
        assert_eq!(normalize_doi("http://doi.org/10.1000/abc"), "10.1000/abc");
        assert_eq!(normalize_doi("DOI:10.1000/abc"), "10.1000/abc");
        assert_eq!(normalize_doi(" 10.1000/abc "), "10.1000/abc");
    }

    #[test]
    fn test_normalize_arxiv_id() {
        assert_eq!(normalize_arxiv_id("1706.03762v2"), "1706.03762");
        assert_eq!(normalize_arxiv_id("1706.03762"), "1706.03762");
        assert_eq!(normalize_arxiv_id("solv-int/9901001v1"), "solv-int/9901001");
    }

    #[test]
    fn test_doi_match_overrides_everything() {
        let mut a = record("Completely different", "Smith", Some(2001));
        let mut b = record("Nothing alike here", "Jones", Some(2020));
        a.doi = Some("https://doi.org/10.1/X".into());
        b.doi = Some("doi:10.1/x".into());
        assert!(are_duplicates(&a, &b));
    }

    #[test]
    fn test_arxiv_version_ignored() {
        let mut a = record("A", "Smith", None);
        let mut b = record("B", "Jones", None);
        a.arxiv_id = Some("1706.03762v1".into());
        b.arxiv_id = Some("1706.03762v5".into());
        assert!(are_duplicates(&a, &b));
    }

    #[test]
    fn test_paper_id_exact() {
        let mut a = record("A", "Smith", None);
        let mut b = record("B", "Jones", None);
        a.s2_paper_id = Some("abc".into());
        b.s2_paper_id = Some("ABC".into());
        assert!(!are_duplicates(&a, &b));
        b.s2_paper_id = Some("abc".into());
        assert!(are_duplicates(&a, &b));
    }

    #[test]
    fn test_different_dois_fall_through_to_title() {
        let mut a = record("Attention Is All You Need", "Ashish Vaswani", Some(2017));
        let mut b = record("Attention is all you need", "A. Vaswani", Some(2017));
        a.doi = Some("10.1/a".into());
        b.doi = Some("10.1/b".into());
        assert!(are_duplicates(&a, &b));
    }

    #[test]
    fn test_year_mismatch_blocks_fuzzy() {
        let a = record("Attention Is All You Need", "Vaswani", Some(2017));
        let b = record("Attention Is All You Need", "Vaswani", Some(2018));
        assert!(!are_duplicates(&a, &b));
    }

    #[test]
    fn test_author_mismatch_blocks_fuzzy() {
        let a = record("Attention Is All You Need", "Ashish Vaswani", None);
        let b = record("Attention Is All You Need", "Jane Doe", None);
        assert!(!are_duplicates(&a, &b));
    }

    #[test]
    fn test_missing_authors_require_near_identical_title() {
        let mut a = record("Attention Is All You Need", "", None);
        a.authors.clear();
        let b = record("attention is all you need", "Vaswani", None);
        assert!(are_duplicates(&a, &b));

        let c = record("Attention Is All We Need", "Vaswani", None);
        assert!(!are_duplicates(&a, &c));
    }

    #[test]
    fn test_merge_fills_and_accumulates() {
        let mut a = record("T", "X", Some(2017));
        a.doi = Some("10.X/Y".into());
        a.r#abstract = Some("short".into());
        a.citation_count = Some(10);
        a.sources = vec![ProviderMeta::new("a").with_score(50.0)];

        let mut b = record("T", "X", Some(2017));
        b.doi = Some("10.other/z".into());
        b.arxiv_id = Some("1706.03762".into());
        b.r#abstract = Some("a much longer abstract".into());
        b.citation_count = Some(7);
        b.sources = vec![ProviderMeta::new("b").with_score(80.0)];

        merge_into(&mut a, &b);

        assert_eq!(a.doi.as_deref(), Some("10.X/Y"));
        assert_eq!(a.arxiv_id.as_deref(), Some("1706.03762"));
        assert_eq!(a.r#abstract.as_deref(), Some("a much longer abstract"));
        assert_eq!(a.citation_count, Some(10));
        assert_eq!(a.source_names(), vec!["a", "b"]);
        assert!((a.score - 65.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_merge_keeps_same_source_twice() {
        let mut a = record("T", "X", None);
        a.sources = vec![ProviderMeta::new("dblp").with_score(1.0)];
        let mut b = record("T", "X", None);
        b.sources = vec![ProviderMeta::new("dblp").with_score(3.0)];
        merge_into(&mut a, &b);
        assert_eq!(a.sources.len(), 2);
        assert!((a.score - 2.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_merge_takes_citation_count_when_missing() {
        let mut a = record("T", "X", None);
        let mut b = record("T", "X", None);
        b.citation_count = Some(3);
        merge_into(&mut a, &b);
        assert_eq!(a.citation_count, Some(3));
    }

    #[test]
    fn test_dedupe_does_not_mutate_input() {
        let mut a = record("Same Title Here", "Smith", Some(2020));
        a.sources = vec![ProviderMeta::new("a")];
        let mut b = a.clone();
        b.sources = vec![ProviderMeta::new("b")];
        let input = vec![a, b];

        let out = dedupe(&input);
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].sources.len(), 2);
        assert_eq!(input[0].sources.len(), 1);
    }
}

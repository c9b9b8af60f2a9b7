//! Result aggregation: fanout, duplicate merging and ranking.
//!
//! ```text
//! query → fanout (one call per provider) → dedupe → rank → Vec<Record>
//! ```

mod dedupe;
mod fanout;
mod rank;
pub mod similarity;

pub use dedupe::{are_duplicates, dedupe, merge_into, normalize_arxiv_id, normalize_doi};
pub use fanout::{ProviderOutcome, fanout, fanout_outcomes};
pub use rank::{compare, rank};

use crate::models::Record;

/// Merge duplicates across providers, rank, and keep the top `max_results`.
///
/// Idempotent on its own output for an equal or larger `max_results`.
#[must_use]
pub fn dedupe_rank(records: &[Record], max_results: usize) -> Vec<Record> {
    let merged = dedupe(records);
    let before = records.len();
    let ranked = rank(merged, max_results);

    tracing::debug!(input = before, output = ranked.len(), "Deduplicated and ranked");
    ranked
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ProviderMeta;

    fn rec(title: &str, doi: Option<&str>, score: f64) -> Record {
        Record {
            title: title.to_string(),
            authors: vec!["A. Author".to_string()],
            doi: doi.map(str::to_string),
            bibtex: "@misc{x}".to_string(),
            sources: vec![ProviderMeta::new("p").with_score(score)],
            score,
            ..Default::default()
        }
    }

    #[test]
    fn test_dedupe_rank_merges_and_orders() {
        let records = vec![
            rec("Low", Some("10.1/low"), 10.0),
            rec("High", Some("10.1/high"), 90.0),
            rec("Low again", Some("https://doi.org/10.1/LOW"), 30.0),
        ];

        let ranked = dedupe_rank(&records, 10);
        assert_eq!(ranked.len(), 2);
        assert_eq!(ranked[0].title, "High");
        assert_eq!(ranked[1].title, "Low");
        assert_eq!(ranked[1].sources.len(), 2);
        assert!((ranked[1].score - 20.0).abs() < 1e-9);
    }

    #[test]
    fn test_dedupe_rank_idempotent() {
        let records = vec![
            rec("B", None, 5.0),
            rec("A", None, 5.0),
            rec("C", Some("10.9/c"), 7.0),
            rec("C copy", Some("10.9/C"), 3.0),
        ];

        let once = dedupe_rank(&records, 10);
        assert_eq!(dedupe_rank(&once, 10), once);
        assert_eq!(dedupe_rank(&once, 50), once);
    }

    #[test]
    fn test_dedupe_rank_truncates() {
        let records = vec![rec("A", None, 1.0), rec("B", None, 2.0)];
        assert_eq!(dedupe_rank(&records, 1).len(), 1);
        assert!(dedupe_rank(&records, 0).is_empty());
        assert!(dedupe_rank(&[], 5).is_empty());
    }
}

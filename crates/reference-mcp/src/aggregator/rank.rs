//! Ordering of merged records.

use std::cmp::Ordering;

use crate::models::Record;

/// Ranking order: score descending, then year descending (missing year
/// sorts last), then lower-cased title ascending.
///
/// A non-finite score ranks as 0 so the order stays total.
#[must_use]
pub fn compare(a: &Record, b: &Record) -> Ordering {
    sort_score(b.score)
        .total_cmp(&sort_score(a.score))
        .then_with(|| b.year.unwrap_or(i32::MIN).cmp(&a.year.unwrap_or(i32::MIN)))
        .then_with(|| a.title.to_lowercase().cmp(&b.title.to_lowercase()))
}

fn sort_score(score: f64) -> f64 {
    if score.is_finite() { score } else { 0.0 }
}

/// Sort records by [`compare`] and keep the first `max_results`.
#[must_use]
pub fn rank(mut records: Vec<Record>, max_results: usize) -> Vec<Record> {
    records.sort_by(compare);
    records.truncate(max_results);
    records
}

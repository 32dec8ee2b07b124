// * Value Ranker
// * Orders scored listings by value_per_100k for the top-N report.

use std::cmp::Ordering;

use super::schema::ScoredRecord;

// * Descending by value; unscored rows sink to the bottom
fn by_value_desc(a: &ScoredRecord, b: &ScoredRecord) -> Ordering {
    match (a.value_per_100k, b.value_per_100k) {
        (Some(x), Some(y)) => y.total_cmp(&x),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

/// Returns the `n` best-value listings, highest first.
///
/// The sort is stable, so equal values keep their corpus order.
pub fn top_n(scored: &[ScoredRecord], n: usize) -> Vec<ScoredRecord> {
    let mut ranked = scored.to_vec();
    ranked.sort_by(by_value_desc);
    ranked.truncate(n);
    ranked
}

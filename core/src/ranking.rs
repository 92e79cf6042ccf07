use crate::document::Document;
use crate::ExecutionMode;
use rayon::prelude::*;
use std::cmp::Ordering;

fn by_relevance(a: &Document, b: &Document) -> Ordering {
    b.relevance
        .total_cmp(&a.relevance)
        .then_with(|| b.rating.cmp(&a.rating))
        .then_with(|| a.id.cmp(&b.id))
}

fn by_rating(a: &Document, b: &Document) -> Ordering {
    b.rating
        .cmp(&a.rating)
        .then_with(|| b.relevance.total_cmp(&a.relevance))
        .then_with(|| a.id.cmp(&b.id))
}

/// Orders hits by relevance descending and keeps the first `limit`.
///
/// Neighbours whose relevance differs by less than `epsilon` form a run that
/// is ordered by rating descending instead. Both passes use total orders, so
/// the result is deterministic.
pub fn select_top(
    mut docs: Vec<Document>,
    epsilon: f64,
    limit: usize,
    mode: ExecutionMode,
) -> Vec<Document> {
    match mode {
        ExecutionMode::Sequential => docs.sort_by(by_relevance),
        ExecutionMode::Parallel => docs.par_sort_by(by_relevance),
    }

    let mut start = 0;
    while start < docs.len() && start < limit {
        let mut end = start + 1;
        while end < docs.len() && (docs[end - 1].relevance - docs[end].relevance).abs() < epsilon {
            end += 1;
        }
        if end - start > 1 {
            docs[start..end].sort_by(by_rating);
        }
        start = end;
    }

    docs.truncate(limit);
    docs
}

use crate::DocId;
use serde::{Deserialize, Serialize};
use std::collections::btree_map::{self, BTreeMap};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DocumentStatus {
    #[default]
    Actual,
    Irrelevant,
    Banned,
    Removed,
}

impl DocumentStatus {
    /// Predicate accepting exactly the documents with this status.
    pub fn filter(self) -> impl Fn(DocId, DocumentStatus, i32) -> bool + Copy + Send + Sync {
        move |_, status, _| status == self
    }
}

/// A ranked search hit.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Document {
    pub id: DocId,
    pub relevance: f64,
    pub rating: i32,
}

impl Document {
    pub fn new(id: DocId, relevance: f64, rating: i32) -> Self {
        Self { id, relevance, rating }
    }
}

impl fmt::Display for Document {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{{ document_id = {}, relevance = {}, rating = {} }}",
            self.id, self.relevance, self.rating
        )
    }
}

/// Metadata kept per live document. Immutable once created.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DocumentData {
    pub rating: i32,
    pub status: DocumentStatus,
}

/// Mean of `ratings`, truncated toward zero; zero when there are none.
pub fn average_rating(ratings: &[i32]) -> i32 {
    if ratings.is_empty() {
        return 0;
    }
    let sum: i64 = ratings.iter().map(|&r| i64::from(r)).sum();
    (sum / ratings.len() as i64) as i32
}

/// Live documents keyed by id. Iteration is in ascending id order.
#[derive(Debug, Default)]
pub struct DocumentStore {
    docs: BTreeMap<DocId, DocumentData>,
}

impl DocumentStore {
    pub fn insert(&mut self, id: DocId, data: DocumentData) {
        self.docs.insert(id, data);
    }

    pub fn remove(&mut self, id: DocId) -> Option<DocumentData> {
        self.docs.remove(&id)
    }

    pub fn get(&self, id: DocId) -> Option<&DocumentData> {
        self.docs.get(&id)
    }

    pub fn contains(&self, id: DocId) -> bool {
        self.docs.contains_key(&id)
    }

    pub fn len(&self) -> usize {
        self.docs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.docs.is_empty()
    }

    pub fn ids(&self) -> DocumentIds<'_> {
        DocumentIds(self.docs.keys())
    }
}

/// Ascending iterator over live document ids.
#[derive(Clone)]
pub struct DocumentIds<'a>(btree_map::Keys<'a, DocId, DocumentData>);

impl Iterator for DocumentIds<'_> {
    type Item = DocId;

    fn next(&mut self) -> Option<DocId> {
        self.0.next().copied()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.0.size_hint()
    }
}

impl DoubleEndedIterator for DocumentIds<'_> {
    fn next_back(&mut self) -> Option<DocId> {
        self.0.next_back().copied()
    }
}

impl ExactSizeIterator for DocumentIds<'_> {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn average_truncates_toward_zero() {
        assert_eq!(average_rating(&[8, -3]), 2);
        assert_eq!(average_rating(&[7, 2, 7]), 5);
        assert_eq!(average_rating(&[-7, -2]), -4);
        assert_eq!(average_rating(&[]), 0);
        assert_eq!(average_rating(&[i32::MAX, i32::MAX]), i32::MAX);
    }

    #[test]
    fn display_matches_console_format() {
        let doc = Document::new(2, 0.5, -1);
        assert_eq!(doc.to_string(), "{ document_id = 2, relevance = 0.5, rating = -1 }");
    }

    #[test]
    fn status_serializes_upper_case() {
        let json = serde_json::to_string(&DocumentStatus::Irrelevant).unwrap();
        assert_eq!(json, "\"IRRELEVANT\"");
        let back: DocumentStatus = serde_json::from_str("\"BANNED\"").unwrap();
        assert_eq!(back, DocumentStatus::Banned);
    }

    #[test]
    fn ids_iterate_sorted() {
        let mut store = DocumentStore::default();
        let data = DocumentData { rating: 0, status: DocumentStatus::Actual };
        for id in [5, 1, 3] {
            store.insert(id, data);
        }
        assert_eq!(store.ids().collect::<Vec<_>>(), vec![1, 3, 5]);
        assert_eq!(store.remove(3), Some(data));
        assert_eq!(store.ids().rev().collect::<Vec<_>>(), vec![5, 1]);
    }
}

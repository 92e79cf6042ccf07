use crate::{DocId, TermId};
use rayon::prelude::*;
use std::collections::BTreeMap;

/// Term frequencies of one document, or documents of one term.
pub type TermFreqs = BTreeMap<TermId, f64>;
pub type Postings = BTreeMap<DocId, f64>;

/// Two co-maintained views of the same (term, document, frequency) triples:
/// term -> document -> tf, and document -> term -> tf.
///
/// `postings` is indexed by `TermId`. A term whose postings are empty is
/// absent from the index; the slot itself is kept since term ids are never
/// reused.
#[derive(Debug, Default)]
pub struct InvertedIndex {
    postings: Vec<Postings>,
    doc_terms: BTreeMap<DocId, TermFreqs>,
}

impl InvertedIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a document made of `terms` (duplicates counted). Each occurrence
    /// adds `1 / terms.len()` to the term's frequency in both views.
    pub fn insert(&mut self, doc_id: DocId, terms: &[TermId]) {
        let freqs = self.doc_terms.entry(doc_id).or_default();
        if terms.is_empty() {
            return;
        }
        let inv_word_count = 1.0 / terms.len() as f64;
        for &term in terms {
            let slot = term as usize;
            if self.postings.len() <= slot {
                self.postings.resize_with(slot + 1, Postings::new);
            }
            *self.postings[slot].entry(doc_id).or_insert(0.0) += inv_word_count;
            *freqs.entry(term).or_insert(0.0) += inv_word_count;
        }
    }

    /// Documents containing `term`, or `None` if no live document does.
    pub fn postings(&self, term: TermId) -> Option<&Postings> {
        self.postings.get(term as usize).filter(|p| !p.is_empty())
    }

    pub fn document_frequency(&self, term: TermId) -> usize {
        self.postings(term).map_or(0, Postings::len)
    }

    pub fn contains(&self, term: TermId, doc_id: DocId) -> bool {
        self.postings(term).is_some_and(|p| p.contains_key(&doc_id))
    }

    pub fn term_frequencies(&self, doc_id: DocId) -> Option<&TermFreqs> {
        self.doc_terms.get(&doc_id)
    }

    /// Number of terms currently present in at least one document.
    pub fn term_count(&self) -> usize {
        self.postings.iter().filter(|p| !p.is_empty()).count()
    }

    /// Removes a document from both views, returning its term frequencies.
    pub fn remove(&mut self, doc_id: DocId) -> Option<TermFreqs> {
        let freqs = self.doc_terms.remove(&doc_id)?;
        for &term in freqs.keys() {
            if let Some(postings) = self.postings.get_mut(term as usize) {
                postings.remove(&doc_id);
            }
        }
        Some(freqs)
    }

    /// Same end state as [`remove`](Self::remove), with the per-term erasures
    /// spread over the rayon pool. Each term's postings are touched by exactly
    /// one worker.
    pub fn par_remove(&mut self, doc_id: DocId) -> Option<TermFreqs> {
        let freqs = self.doc_terms.get(&doc_id)?;
        let slots = disjoint_slots(&mut self.postings, freqs.keys().copied());
        slots.into_par_iter().for_each(|postings| {
            postings.remove(&doc_id);
        });
        self.doc_terms.remove(&doc_id)
    }
}

/// Splits `items` into mutable references at the given strictly ascending indices.
fn disjoint_slots<T>(items: &mut [T], indices: impl Iterator<Item = TermId>) -> Vec<&mut T> {
    let mut rest = items;
    let mut offset = 0usize;
    let mut slots = Vec::new();
    for index in indices {
        let index = index as usize;
        if index < offset || index - offset >= rest.len() {
            break;
        }
        let (_, tail) = std::mem::take(&mut rest).split_at_mut(index - offset);
        let Some((slot, tail)) = tail.split_first_mut() else {
            break;
        };
        slots.push(slot);
        rest = tail;
        offset = index + 1;
    }
    slots
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> InvertedIndex {
        let mut index = InvertedIndex::new();
        index.insert(0, &[0, 1, 0, 2]);
        index.insert(1, &[1, 3]);
        index
    }

    #[test]
    fn both_views_agree() {
        let index = sample();
        let doc0 = index.term_frequencies(0).unwrap();
        assert_eq!(doc0[&0], 0.5);
        assert_eq!(doc0[&2], 0.25);
        assert_eq!(index.postings(0).unwrap()[&0], 0.5);
        assert_eq!(index.document_frequency(1), 2);
        assert!(index.contains(3, 1));
        assert!(!index.contains(3, 0));
        assert_eq!(index.term_count(), 4);
    }

    #[test]
    fn remove_prunes_emptied_terms() {
        let mut index = sample();
        let freqs = index.remove(1).unwrap();
        assert_eq!(freqs.len(), 2);
        assert!(index.postings(3).is_none());
        assert_eq!(index.document_frequency(1), 1);
        assert_eq!(index.term_count(), 3);
        assert!(index.remove(1).is_none());
    }

    #[test]
    fn par_remove_matches_sequential() {
        let mut seq = sample();
        let mut par = sample();
        seq.remove(0);
        par.par_remove(0);
        for term in 0..4 {
            assert_eq!(seq.postings(term), par.postings(term));
        }
        assert!(par.term_frequencies(0).is_none());
        assert!(par.par_remove(0).is_none());
    }

    #[test]
    fn empty_document_has_empty_frequencies() {
        let mut index = InvertedIndex::new();
        index.insert(4, &[]);
        assert!(index.term_frequencies(4).unwrap().is_empty());
        assert!(index.remove(4).unwrap().is_empty());
    }

    #[test]
    fn disjoint_slots_picks_requested_items() {
        let mut items = vec![0, 1, 2, 3, 4, 5];
        let slots = disjoint_slots(&mut items, [1u32, 2, 5].into_iter());
        for slot in slots {
            *slot *= 10;
        }
        assert_eq!(items, vec![0, 10, 20, 3, 4, 50]);
    }
}

use crate::concurrent_map::ConcurrentMap;
use crate::config::SearchConfig;
use crate::document::{average_rating, Document, DocumentData, DocumentIds, DocumentStatus, DocumentStore};
use crate::error::{Result, SearchError};
use crate::index::{InvertedIndex, Postings};
use crate::query::Query;
use crate::ranking::select_top;
use crate::tokenizer::{tokenize, StopWords};
use crate::word_store::WordStore;
use crate::{DocId, TermId};
use rayon::prelude::*;
use std::collections::BTreeMap;
use tracing::debug;

/// How an operation distributes its work.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ExecutionMode {
    /// Single thread, deterministic iteration order.
    #[default]
    Sequential,
    /// Fan out over query or document terms on the current rayon pool.
    Parallel,
}

/// In-memory TF-IDF search engine.
///
/// Mutation (`add_document`, `remove_document*`) takes `&mut self`; queries
/// take `&self` and may run concurrently with each other.
#[derive(Debug)]
pub struct SearchServer {
    config: SearchConfig,
    stop_words: StopWords,
    words: WordStore,
    index: InvertedIndex,
    documents: DocumentStore,
}

impl SearchServer {
    pub fn new(config: SearchConfig) -> Result<Self> {
        let stop_words = StopWords::new(&config.stop_words)?;
        Ok(Self {
            config,
            stop_words,
            words: WordStore::new(),
            index: InvertedIndex::new(),
            documents: DocumentStore::default(),
        })
    }

    /// Default settings with whitespace-separated stop words.
    pub fn with_stop_words(text: &str) -> Result<Self> {
        Self::new(SearchConfig::with_stop_words(text))
    }

    pub fn from_stop_words<I, S>(words: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::new(SearchConfig {
            stop_words: words.into_iter().map(Into::into).collect(),
            ..SearchConfig::default()
        })
    }

    pub fn config(&self) -> &SearchConfig {
        &self.config
    }

    /// Indexes `text` under `id`. Validation happens before anything is
    /// mutated, so a failed call leaves the engine untouched.
    pub fn add_document(
        &mut self,
        id: DocId,
        text: &str,
        status: DocumentStatus,
        ratings: &[i32],
    ) -> Result<()> {
        if id < 0 || self.documents.contains(id) {
            return Err(SearchError::InvalidDocumentId(id));
        }
        let words = tokenize(text, &self.stop_words)?;

        let terms: Vec<TermId> = words.iter().map(|w| self.words.intern(w)).collect();
        self.index.insert(id, &terms);
        self.documents.insert(
            id,
            DocumentData {
                rating: average_rating(ratings),
                status,
            },
        );
        debug!(doc_id = id, words = terms.len(), "indexed document");
        Ok(())
    }

    /// Top documents with status `ACTUAL`.
    pub fn find_top_documents(&self, raw_query: &str) -> Result<Vec<Document>> {
        self.find_top_documents_by_status(raw_query, DocumentStatus::Actual)
    }

    pub fn find_top_documents_by_status(
        &self,
        raw_query: &str,
        status: DocumentStatus,
    ) -> Result<Vec<Document>> {
        self.find_top_documents_by(raw_query, status.filter())
    }

    pub fn find_top_documents_by<P>(&self, raw_query: &str, predicate: P) -> Result<Vec<Document>>
    where
        P: Fn(DocId, DocumentStatus, i32) -> bool + Sync,
    {
        self.find_top_documents_with(ExecutionMode::Sequential, raw_query, predicate)
    }

    /// Parses `raw_query`, scores every document accepted by `predicate` and
    /// returns at most `max_results` hits, best first.
    pub fn find_top_documents_with<P>(
        &self,
        mode: ExecutionMode,
        raw_query: &str,
        predicate: P,
    ) -> Result<Vec<Document>>
    where
        P: Fn(DocId, DocumentStatus, i32) -> bool + Sync,
    {
        let query = Query::parse(raw_query, &self.stop_words, false)?;
        let matched = self.find_all_documents_with(mode, &query, predicate);
        let total_hits = matched.len();
        let top = select_top(
            matched,
            self.config.relevance_epsilon,
            self.config.max_results,
            mode,
        );
        debug!(?mode, total_hits, returned = top.len(), "ranked documents");
        Ok(top)
    }

    /// Scores all documents for an already parsed query, in no particular order.
    ///
    /// Documents containing a minus word are dropped. In parallel mode each
    /// occurrence of a repeated plus word contributes again.
    pub fn find_all_documents_with<P>(
        &self,
        mode: ExecutionMode,
        query: &Query<'_>,
        predicate: P,
    ) -> Vec<Document>
    where
        P: Fn(DocId, DocumentStatus, i32) -> bool + Sync,
    {
        match mode {
            ExecutionMode::Sequential => self.find_all_sequential(query, &predicate),
            ExecutionMode::Parallel => self.find_all_parallel(query, &predicate),
        }
    }

    fn find_all_sequential<P>(&self, query: &Query<'_>, predicate: &P) -> Vec<Document>
    where
        P: Fn(DocId, DocumentStatus, i32) -> bool,
    {
        let mut document_to_relevance: BTreeMap<DocId, f64> = BTreeMap::new();

        for word in &query.plus_words {
            let Some((term, postings)) = self.lookup(word) else {
                continue;
            };
            let idf = self.inverse_document_freq(term);
            for (&doc_id, &tf) in postings {
                if self.accepts(doc_id, predicate) {
                    *document_to_relevance.entry(doc_id).or_insert(0.0) += tf * idf;
                }
            }
        }

        for word in &query.minus_words {
            if let Some((_, postings)) = self.lookup(word) {
                for doc_id in postings.keys() {
                    document_to_relevance.remove(doc_id);
                }
            }
        }

        document_to_relevance
            .into_iter()
            .filter_map(|(id, relevance)| self.to_document(id, relevance))
            .collect()
    }

    fn find_all_parallel<P>(&self, query: &Query<'_>, predicate: &P) -> Vec<Document>
    where
        P: Fn(DocId, DocumentStatus, i32) -> bool + Sync,
    {
        let document_to_relevance: ConcurrentMap<DocId, f64> =
            ConcurrentMap::new(self.config.accumulator_buckets);

        query.plus_words.par_iter().for_each(|word| {
            let Some((term, postings)) = self.lookup(word) else {
                return;
            };
            let idf = self.inverse_document_freq(term);
            for (&doc_id, &tf) in postings {
                if self.accepts(doc_id, predicate) {
                    *document_to_relevance.access(doc_id) += tf * idf;
                }
            }
        });

        query.minus_words.par_iter().for_each(|word| {
            if let Some((_, postings)) = self.lookup(word) {
                for &doc_id in postings.keys() {
                    document_to_relevance.erase(doc_id);
                }
            }
        });

        document_to_relevance
            .snapshot()
            .into_par_iter()
            .filter_map(|(id, relevance)| self.to_document(id, relevance))
            .collect()
    }

    fn lookup(&self, word: &str) -> Option<(TermId, &Postings)> {
        let term = self.words.get(word)?;
        self.index.postings(term).map(|postings| (term, postings))
    }

    fn accepts<P>(&self, doc_id: DocId, predicate: &P) -> bool
    where
        P: Fn(DocId, DocumentStatus, i32) -> bool,
    {
        self.documents
            .get(doc_id)
            .is_some_and(|data| predicate(doc_id, data.status, data.rating))
    }

    fn to_document(&self, id: DocId, relevance: f64) -> Option<Document> {
        self.documents
            .get(id)
            .map(|data| Document::new(id, relevance, data.rating))
    }

    /// `ln(live documents / documents containing term)`; zero for a term no
    /// live document contains.
    pub fn inverse_document_freq(&self, term: TermId) -> f64 {
        let containing = self.index.document_frequency(term);
        if containing == 0 {
            return 0.0;
        }
        (self.documents.len() as f64 / containing as f64).ln()
    }

    pub fn match_document(&self, raw_query: &str, id: DocId) -> Result<(Vec<&str>, DocumentStatus)> {
        self.match_document_with(ExecutionMode::Sequential, raw_query, id)
    }

    /// Plus words of `raw_query` present in document `id`, sorted and unique,
    /// with the document's status. The list is empty when any minus word is
    /// present.
    pub fn match_document_with(
        &self,
        mode: ExecutionMode,
        raw_query: &str,
        id: DocId,
    ) -> Result<(Vec<&str>, DocumentStatus)> {
        if raw_query.trim().is_empty() {
            return Err(SearchError::InvalidQuery("empty query".into()));
        }
        let status = self
            .documents
            .get(id)
            .ok_or(SearchError::UnknownDocument(id))?
            .status;

        let query = Query::parse(raw_query, &self.stop_words, mode == ExecutionMode::Parallel)?;
        let in_document = |word: &&str| self.term_in_document(word, id);

        let matched = match mode {
            ExecutionMode::Sequential => {
                if query.minus_words.iter().any(|w| in_document(w).is_some()) {
                    return Ok((Vec::new(), status));
                }
                query.plus_words.iter().filter_map(in_document).collect()
            }
            ExecutionMode::Parallel => {
                if query.minus_words.par_iter().any(|w| in_document(w).is_some()) {
                    return Ok((Vec::new(), status));
                }
                let mut matched: Vec<&str> =
                    query.plus_words.par_iter().filter_map(in_document).collect();
                matched.par_sort_unstable();
                matched.dedup();
                matched
            }
        };
        Ok((matched, status))
    }

    /// The interned form of `word` if document `doc_id` contains it.
    fn term_in_document(&self, word: &str, doc_id: DocId) -> Option<&str> {
        let term = self.words.get(word)?;
        if self.index.contains(term, doc_id) {
            self.words.resolve(term)
        } else {
            None
        }
    }

    pub fn remove_document(&mut self, id: DocId) -> Result<()> {
        self.remove_document_with(ExecutionMode::Sequential, id)
    }

    /// Drops document `id` from the index and the document store. Terms left
    /// without documents disappear from the index; their strings stay interned.
    pub fn remove_document_with(&mut self, mode: ExecutionMode, id: DocId) -> Result<()> {
        if !self.documents.contains(id) {
            return Err(SearchError::UnknownDocument(id));
        }
        let removed = match mode {
            ExecutionMode::Sequential => self.index.remove(id),
            ExecutionMode::Parallel => self.index.par_remove(id),
        };
        self.documents.remove(id);
        debug!(
            doc_id = id,
            ?mode,
            terms = removed.map_or(0, |freqs| freqs.len()),
            "removed document"
        );
        Ok(())
    }

    /// Term frequencies of document `id`, keyed by term. Empty for unknown ids.
    pub fn word_frequencies(&self, id: DocId) -> BTreeMap<&str, f64> {
        let Some(freqs) = self.index.term_frequencies(id) else {
            return BTreeMap::new();
        };
        freqs
            .iter()
            .filter_map(|(&term, &freq)| self.words.resolve(term).map(|w| (w, freq)))
            .collect()
    }

    pub fn document_count(&self) -> usize {
        self.documents.len()
    }

    /// Distinct terms present in at least one live document.
    pub fn term_count(&self) -> usize {
        self.index.term_count()
    }

    /// Live document ids, ascending.
    pub fn iter(&self) -> DocumentIds<'_> {
        self.documents.ids()
    }
}

impl<'a> IntoIterator for &'a SearchServer {
    type Item = DocId;
    type IntoIter = DocumentIds<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn server() -> SearchServer {
        let mut server = SearchServer::with_stop_words("and in on").unwrap();
        server
            .add_document(0, "white cat and fancy collar", DocumentStatus::Actual, &[8, -3])
            .unwrap();
        server
            .add_document(1, "fluffy cat fluffy tail", DocumentStatus::Actual, &[7, 2, 7])
            .unwrap();
        server
    }

    #[test]
    fn stop_words_are_not_indexed() {
        let server = server();
        let freqs = server.word_frequencies(0);
        assert!(!freqs.contains_key("and"));
        assert_eq!(freqs.len(), 4);
        assert_eq!(freqs["cat"], 0.25);
    }

    #[test]
    fn failed_add_leaves_index_untouched() {
        let mut server = server();
        let err = server
            .add_document(2, "good b\u{3}ad", DocumentStatus::Actual, &[])
            .unwrap_err();
        assert!(matches!(err, SearchError::InvalidWord(_)));
        assert_eq!(server.document_count(), 2);
        assert!(server.word_frequencies(2).is_empty());
        assert!(server.find_top_documents("good").unwrap().is_empty());
    }

    #[test]
    fn idf_of_absent_term_is_zero() {
        let server = server();
        assert_eq!(server.inverse_document_freq(999), 0.0);
    }

    #[test]
    fn iteration_yields_sorted_ids() {
        let mut server = server();
        server.add_document(-1, "x", DocumentStatus::Banned, &[]).unwrap_err();
        server.add_document(1, "x", DocumentStatus::Banned, &[]).unwrap_err();
        server.add_document(9, "x", DocumentStatus::Banned, &[]).unwrap();
        server.add_document(4, "y", DocumentStatus::Banned, &[]).unwrap();
        assert_eq!((&server).into_iter().collect::<Vec<_>>(), vec![0, 1, 4, 9]);
    }
}

use crate::DocId;
use thiserror::Error;

/// Errors surfaced by the search engine. Every variant is recoverable by the caller.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SearchError {
    /// Negative id, or an id that already belongs to a live document.
    #[error("invalid document id {0}")]
    InvalidDocumentId(DocId),
    /// A document, query or stop word contains a control character.
    #[error("invalid word {0:?}")]
    InvalidWord(String),
    #[error("invalid query: {0}")]
    InvalidQuery(String),
    #[error("unknown document {0}")]
    UnknownDocument(DocId),
}

pub type Result<T> = std::result::Result<T, SearchError>;

//! Embedded TF-IDF document search.
//!
//! Documents are split into whitespace-separated words, stop words are
//! dropped, and each remaining word is interned and recorded in an inverted
//! index with its term frequency. Queries are made of plus words (which add
//! relevance) and minus words (which exclude documents), and return the
//! best-ranked documents accepted by a caller predicate.

pub mod concurrent_map;
pub mod config;
pub mod document;
pub mod duplicates;
pub mod error;
pub mod index;
pub mod paginator;
pub mod query;
pub mod ranking;
pub mod request_queue;
pub mod search_server;
pub mod tokenizer;
pub mod word_store;

pub type DocId = i32;
pub type TermId = u32;

pub use config::SearchConfig;
pub use document::{Document, DocumentStatus};
pub use duplicates::{remove_duplicates, remove_duplicates_with};
pub use error::{Result, SearchError};
pub use paginator::{paginate, Page, Paginator};
pub use query::Query;
pub use request_queue::RequestQueue;
pub use search_server::{ExecutionMode, SearchServer};

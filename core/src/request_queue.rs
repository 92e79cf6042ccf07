use crate::document::{Document, DocumentStatus};
use crate::error::Result;
use crate::search_server::SearchServer;
use crate::DocId;
use std::collections::VecDeque;

/// One request per minute over a day.
pub const DEFAULT_WINDOW: usize = 1440;

/// Forwards searches to a [`SearchServer`] and tracks how many of the most
/// recent `window` requests came back empty.
pub struct RequestQueue<'a> {
    server: &'a SearchServer,
    requests: VecDeque<bool>,
    window: usize,
    no_result_requests: usize,
}

impl<'a> RequestQueue<'a> {
    pub fn new(server: &'a SearchServer) -> Self {
        Self::with_window(server, DEFAULT_WINDOW)
    }

    /// A zero `window` is raised to one.
    pub fn with_window(server: &'a SearchServer, window: usize) -> Self {
        let window = window.max(1);
        Self {
            server,
            requests: VecDeque::with_capacity(window),
            window,
            no_result_requests: 0,
        }
    }

    pub fn add_find_request(&mut self, raw_query: &str) -> Result<Vec<Document>> {
        let result = self.server.find_top_documents(raw_query)?;
        Ok(self.record(result))
    }

    pub fn add_find_request_by_status(
        &mut self,
        raw_query: &str,
        status: DocumentStatus,
    ) -> Result<Vec<Document>> {
        let result = self.server.find_top_documents_by_status(raw_query, status)?;
        Ok(self.record(result))
    }

    pub fn add_find_request_by<P>(&mut self, raw_query: &str, predicate: P) -> Result<Vec<Document>>
    where
        P: Fn(DocId, DocumentStatus, i32) -> bool + Sync,
    {
        let result = self.server.find_top_documents_by(raw_query, predicate)?;
        Ok(self.record(result))
    }

    /// Requests in the current window that returned no documents.
    pub fn no_result_requests(&self) -> usize {
        self.no_result_requests
    }

    fn record(&mut self, result: Vec<Document>) -> Vec<Document> {
        if self.requests.len() >= self.window && self.requests.pop_front() == Some(true) {
            self.no_result_requests -= 1;
        }
        let empty = result.is_empty();
        if empty {
            self.no_result_requests += 1;
        }
        self.requests.push_back(empty);
        result
    }
}

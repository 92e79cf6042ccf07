use crate::error::Result;
use crate::search_server::{ExecutionMode, SearchServer};
use crate::DocId;
use std::collections::{BTreeSet, HashSet};
use tracing::info;

/// Removes documents whose set of words equals that of a document with a
/// smaller id. Frequencies and word order are ignored. Returns the removed
/// ids in ascending order.
pub fn remove_duplicates(server: &mut SearchServer) -> Result<Vec<DocId>> {
    remove_duplicates_with(server, ExecutionMode::Sequential)
}

pub fn remove_duplicates_with(server: &mut SearchServer, mode: ExecutionMode) -> Result<Vec<DocId>> {
    let mut seen: HashSet<BTreeSet<String>> = HashSet::new();
    let mut duplicates = Vec::new();

    for id in server.iter() {
        let words: BTreeSet<String> = server
            .word_frequencies(id)
            .into_keys()
            .map(str::to_owned)
            .collect();
        if !seen.insert(words) {
            duplicates.push(id);
        }
    }

    for &id in &duplicates {
        server.remove_document_with(mode, id)?;
        info!(doc_id = id, "found duplicate document");
    }
    Ok(duplicates)
}

use crate::TermId;
use std::collections::HashMap;
use std::sync::Arc;

/// Interning pool for indexed terms. Each distinct string is stored once and
/// addressed by a dense `TermId`. The pool only grows: ids stay valid for the
/// lifetime of the store even after every document using a term is removed.
#[derive(Debug, Default)]
pub struct WordStore {
    dictionary: HashMap<Arc<str>, TermId>,
    terms: Vec<Arc<str>>,
}

impl WordStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the id of `text`, adding it to the pool on first sight.
    pub fn intern(&mut self, text: &str) -> TermId {
        if let Some(&id) = self.dictionary.get(text) {
            return id;
        }
        let id = self.terms.len() as TermId;
        let term: Arc<str> = Arc::from(text);
        self.terms.push(Arc::clone(&term));
        self.dictionary.insert(term, id);
        id
    }

    /// Looks up an already interned term without growing the pool.
    pub fn get(&self, text: &str) -> Option<TermId> {
        self.dictionary.get(text).copied()
    }

    /// Resolves a handle back to its text. Ids not issued by this store yield `None`.
    pub fn resolve(&self, id: TermId) -> Option<&str> {
        self.terms.get(id as usize).map(|t| &**t)
    }

    pub fn len(&self) -> usize {
        self.terms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn interning_is_idempotent() {
        let mut store = WordStore::new();
        let cat = store.intern("cat");
        let dog = store.intern("dog");
        assert_ne!(cat, dog);
        assert_eq!(store.intern("cat"), cat);
        assert_eq!(store.len(), 2);
        assert_eq!(store.resolve(dog), Some("dog"));
    }

    #[test]
    fn lookup_does_not_grow_pool() {
        let mut store = WordStore::new();
        store.intern("Cat");
        assert_eq!(store.get("cat"), None);
        assert_eq!(store.len(), 1);
        assert_eq!(store.resolve(7), None);
    }
}

use crate::error::{Result, SearchError};
use std::collections::BTreeSet;

/// Terms ignored during indexing and querying.
#[derive(Debug, Clone, Default)]
pub struct StopWords(BTreeSet<String>);

impl StopWords {
    /// Builds the set, skipping empty entries. Fails on a word with a control character.
    pub fn new<I, S>(words: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut set = BTreeSet::new();
        for word in words {
            let word = word.as_ref();
            if word.is_empty() {
                continue;
            }
            if !is_valid_word(word) {
                return Err(SearchError::InvalidWord(word.to_owned()));
            }
            set.insert(word.to_owned());
        }
        Ok(Self(set))
    }

    pub fn contains(&self, word: &str) -> bool {
        self.0.contains(word)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// A word is valid when it holds no control characters (bytes below 0x20).
pub fn is_valid_word(word: &str) -> bool {
    !word.bytes().any(|b| b < b' ')
}

/// Splits on whitespace, dropping empty pieces. Words are case-sensitive.
pub fn split_words(text: &str) -> impl Iterator<Item = &str> {
    text.split(|c: char| c.is_whitespace() && !c.is_control())
        .filter(|w| !w.is_empty())
}

/// Tokenize document text: validate each word and drop stop words.
pub fn tokenize<'a>(text: &'a str, stop_words: &StopWords) -> Result<Vec<&'a str>> {
    let mut words = Vec::new();
    for word in split_words(text) {
        if !is_valid_word(word) {
            return Err(SearchError::InvalidWord(word.to_owned()));
        }
        if !stop_words.contains(word) {
            words.push(word);
        }
    }
    Ok(words)
}

use crate::error::{Result, SearchError};
use crate::tokenizer::{is_valid_word, split_words, StopWords};

/// Parsed query. Terms borrow from the raw query text.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Query<'q> {
    pub plus_words: Vec<&'q str>,
    pub minus_words: Vec<&'q str>,
}

struct QueryWord<'q> {
    data: &'q str,
    is_minus: bool,
}

fn parse_query_word(word: &str) -> Result<QueryWord<'_>> {
    let (data, is_minus) = match word.strip_prefix('-') {
        Some(rest) => (rest, true),
        None => (word, false),
    };
    if data.is_empty() {
        return Err(SearchError::InvalidQuery(format!("empty minus word {word:?}")));
    }
    if data.starts_with('-') {
        return Err(SearchError::InvalidQuery(format!("double minus in {word:?}")));
    }
    if !is_valid_word(data) {
        return Err(SearchError::InvalidQuery(format!("control character in {word:?}")));
    }
    Ok(QueryWord { data, is_minus })
}

impl<'q> Query<'q> {
    /// Splits `text` into plus and minus words, dropping stop words.
    ///
    /// With `allow_duplicates == false` both lists are sorted and deduplicated.
    /// Otherwise repeated words are kept in query order, and the parallel
    /// scorer counts each repetition.
    pub fn parse(text: &'q str, stop_words: &StopWords, allow_duplicates: bool) -> Result<Self> {
        let mut query = Query::default();
        for word in split_words(text) {
            let word = parse_query_word(word)?;
            if stop_words.contains(word.data) {
                continue;
            }
            if word.is_minus {
                query.minus_words.push(word.data);
            } else {
                query.plus_words.push(word.data);
            }
        }

        if !allow_duplicates {
            query.plus_words.sort_unstable();
            query.plus_words.dedup();
            query.minus_words.sort_unstable();
            query.minus_words.dedup();
        }
        Ok(query)
    }

    pub fn is_empty(&self) -> bool {
        self.plus_words.is_empty() && self.minus_words.is_empty()
    }
}

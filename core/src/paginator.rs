use std::fmt;
use std::slice::Chunks;

/// A run of consecutive items. Displays as the concatenation of its items.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Page<'a, T>(pub &'a [T]);

impl<T> Page<'_, T> {
    pub fn items(&self) -> &[T] {
        self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<T: fmt::Display> fmt::Display for Page<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for item in self.0 {
            write!(f, "{item}")?;
        }
        Ok(())
    }
}

/// Iterator over fixed-size pages of a slice; the last page may be shorter.
#[derive(Debug, Clone)]
pub struct Paginator<'a, T> {
    chunks: Chunks<'a, T>,
}

impl<'a, T> Iterator for Paginator<'a, T> {
    type Item = Page<'a, T>;

    fn next(&mut self) -> Option<Self::Item> {
        self.chunks.next().map(Page)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.chunks.size_hint()
    }
}

impl<T> ExactSizeIterator for Paginator<'_, T> {}

/// Splits `items` into pages of `page_size` items. A zero page size is treated as one.
pub fn paginate<T>(items: &[T], page_size: usize) -> Paginator<'_, T> {
    Paginator {
        chunks: items.chunks(page_size.max(1)),
    }
}

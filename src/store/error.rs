//! Typed errors for library mutations that address a book that is not there.

use thiserror::Error;

use crate::models::BookId;

/// Errors returned by [`LibraryStore`](super::LibraryStore) mutators. The
/// store is left untouched whenever one of these is returned.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// Positional access past the end of the library.
    #[error("No book at position {position}; the library holds {len}.")]
    IndexOutOfRange { position: usize, len: usize },

    /// The id was never issued by this store or the book was removed.
    #[error("Book {id} is no longer in the library.")]
    UnknownBook { id: BookId },
}

/// Result type for store operations
pub type StoreResult<T> = Result<T, StoreError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_index_out_of_range_display() {
        let err = StoreError::IndexOutOfRange {
            position: 3,
            len: 2,
        };
        let msg = err.to_string();
        assert!(msg.contains("position 3"));
        assert!(msg.contains("holds 2"));
    }

    #[test]
    fn test_unknown_book_display() {
        let err = StoreError::UnknownBook {
            id: BookId::new(9),
        };
        assert_eq!(err.to_string(), "Book #9 is no longer in the library.");
    }
}

use tracing::debug;

use crate::models::{Book, BookId, NewBook};

use super::error::{StoreError, StoreResult};

/// Ordered collection of books. Insertion order is display order, and the
/// zero-based position of a book is the key the table shows on its controls.
#[derive(Debug, Clone)]
pub struct LibraryStore {
    books: Vec<Book>,
    next_id: u64,
}

impl Default for LibraryStore {
    fn default() -> Self {
        Self {
            books: Vec::new(),
            next_id: 1,
        }
    }
}

impl LibraryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a copy of `draft` to the end of the library and return the id
    /// assigned to it.
    pub fn add(&mut self, draft: &NewBook) -> BookId {
        let id = BookId::new(self.next_id);
        self.next_id += 1;
        self.books.push(Book::from_draft(id, draft));
        debug!(%id, title = %draft.title, len = self.books.len(), "book added");
        id
    }

    /// Remove the book at `position`. Later books shift down by one.
    pub fn remove_at(&mut self, position: usize) -> StoreResult<Book> {
        self.check_position(position)?;
        let removed = self.books.remove(position);
        debug!(id = %removed.id, position, len = self.books.len(), "book removed");
        Ok(removed)
    }

    /// Set the read flag of the book at `position`.
    pub fn set_read_at(&mut self, position: usize, value: bool) -> StoreResult<()> {
        self.check_position(position)?;
        let book = &mut self.books[position];
        book.is_read = value;
        debug!(id = %book.id, position, is_read = value, "read flag updated");
        Ok(())
    }

    /// Remove a book by id.
    pub fn remove(&mut self, id: BookId) -> StoreResult<Book> {
        let position = self.require_position(id)?;
        self.remove_at(position)
    }

    /// Set the read flag of a book by id.
    pub fn set_read(&mut self, id: BookId, value: bool) -> StoreResult<()> {
        let position = self.require_position(id)?;
        self.set_read_at(position, value)
    }

    /// Flip the read flag of a book by id, returning the new value.
    pub fn toggle_read(&mut self, id: BookId) -> StoreResult<bool> {
        let position = self.require_position(id)?;
        let value = !self.books[position].is_read;
        self.set_read_at(position, value)?;
        Ok(value)
    }

    pub fn books(&self) -> &[Book] {
        &self.books
    }

    pub fn len(&self) -> usize {
        self.books.len()
    }

    pub fn is_empty(&self) -> bool {
        self.books.is_empty()
    }

    pub fn get(&self, id: BookId) -> Option<&Book> {
        self.books.iter().find(|book| book.id == id)
    }

    pub fn get_at(&self, position: usize) -> Option<&Book> {
        self.books.get(position)
    }

    pub fn position_of(&self, id: BookId) -> Option<usize> {
        self.books.iter().position(|book| book.id == id)
    }

    /// Distinct non-blank authors, sorted case-insensitively. Used as the
    /// candidate list for author autocomplete.
    pub fn authors(&self) -> Vec<String> {
        let mut authors: Vec<String> = Vec::new();
        for book in &self.books {
            let author = book.author.trim();
            if author.is_empty() {
                continue;
            }
            if !authors.iter().any(|known| known.eq_ignore_ascii_case(author)) {
                authors.push(author.to_string());
            }
        }
        authors.sort_by_key(|author| author.to_lowercase());
        authors
    }

    fn check_position(&self, position: usize) -> StoreResult<()> {
        if position < self.books.len() {
            Ok(())
        } else {
            Err(StoreError::IndexOutOfRange {
                position,
                len: self.books.len(),
            })
        }
    }

    fn require_position(&self, id: BookId) -> StoreResult<usize> {
        self.position_of(id)
            .ok_or(StoreError::UnknownBook { id })
    }
}

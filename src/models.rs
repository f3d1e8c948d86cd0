//! Domain models passed between the store and the TUI. These types stay
//! light-weight data holders so the other layers can focus on state management
//! and presentation.

use std::fmt;

/// Stable synthetic identifier handed out by the library store. Positions in
/// the table shift whenever a book is removed; ids never do.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BookId(u64);

impl BookId {
    pub(crate) fn new(raw: u64) -> Self {
        Self(raw)
    }

    /// Raw numeric value, mostly useful for logging.
    pub fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for BookId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// User-supplied fields for a book that has not been added to a library yet.
/// The `Default` impl gives the empty/zero/unread values the add form starts
/// from.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NewBook {
    pub title: String,
    pub author: String,
    pub page_count: u32,
    pub is_read: bool,
}

impl NewBook {
    pub fn new(
        title: impl Into<String>,
        author: impl Into<String>,
        page_count: u32,
        is_read: bool,
    ) -> Self {
        Self {
            title: title.into(),
            author: author.into(),
            page_count,
            is_read,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// One library entry. Only `is_read` changes after creation.
pub struct Book {
    /// Identifier assigned by the store when the book was added.
    pub id: BookId,
    /// Title shown in the first table column.
    pub title: String,
    /// Author shown next to the title and offered as an autocomplete
    /// candidate in the add form.
    pub author: String,
    /// Number of pages. Unsigned so the "non-negative" rule holds by type.
    pub page_count: u32,
    /// Whether the book has been read; backs the checkbox column.
    pub is_read: bool,
}

impl Book {
    /// Copy a draft into a new book carrying `id`.
    pub(crate) fn from_draft(id: BookId, draft: &NewBook) -> Self {
        Self {
            id,
            title: draft.title.clone(),
            author: draft.author.clone(),
            page_count: draft.page_count,
            is_read: draft.is_read,
        }
    }

    /// Multi-line summary of every field, shown in the footer on request.
    pub fn info(&self) -> String {
        format!(
            "Title: {}\nAuthor: {}\nPages: {}\nHas been read: {}",
            self.title,
            self.author,
            self.page_count,
            if self.is_read { "Yes" } else { "No" }
        )
    }
}

impl fmt::Display for Book {
    /// `Title by Author`, dropping the author part when it is blank.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.author.trim().is_empty() {
            write!(f, "{}", self.title)
        } else {
            write!(f, "{} by {}", self.title, self.author)
        }
    }
}

use ratatui::layout::Constraint;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::Line;
use ratatui::widgets::{Block, Borders, Cell, Row, Table};

use crate::models::{Book, BookId};

/// Text of the single row shown when the library is empty.
pub const PLACEHOLDER_TEXT: &str = "No books found...";
/// Title, author, pages, read checkbox, remove control.
pub const COLUMN_COUNT: usize = 5;

const HEADERS: [&str; COLUMN_COUNT] = ["Title", "Author", "Pages", "Read", ""];
const REMOVE_LABEL: &str = "[Remove]";

/// The two interactive element kinds a book row carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Control {
    ReadToggle,
    Remove,
}

impl Control {
    /// The other control on the same row.
    pub(crate) fn other(self) -> Self {
        match self {
            Control::ReadToggle => Control::Remove,
            Control::Remove => Control::ReadToggle,
        }
    }
}

/// Identifies one control instance in the table. `position` is the row index
/// at render time; `id` is what handlers actually address.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ControlTag {
    pub control: Control,
    pub position: usize,
    pub id: BookId,
}

/// Display state of one book row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BookRow {
    pub position: usize,
    pub id: BookId,
    pub title: String,
    pub author: String,
    pub pages: String,
    pub is_read: bool,
}

impl BookRow {
    pub fn tag(&self, control: Control) -> ControlTag {
        ControlTag {
            control,
            position: self.position,
            id: self.id,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DisplayRow {
    /// Shown alone when there is nothing else to display.
    Placeholder { text: &'static str, span: usize },
    Book(BookRow),
}

impl DisplayRow {
    pub fn as_book(&self) -> Option<&BookRow> {
        match self {
            DisplayRow::Book(row) => Some(row),
            DisplayRow::Placeholder { .. } => None,
        }
    }
}

/// Rebuild the full set of display rows from the library contents. Nothing
/// from a previous render survives, so a stale placeholder can never linger
/// next to real rows.
pub fn render(books: &[Book]) -> Vec<DisplayRow> {
    if books.is_empty() {
        return vec![DisplayRow::Placeholder {
            text: PLACEHOLDER_TEXT,
            span: COLUMN_COUNT,
        }];
    }

    books
        .iter()
        .enumerate()
        .map(|(position, book)| {
            DisplayRow::Book(BookRow {
                position,
                id: book.id,
                title: book.title.clone(),
                author: book.author.clone(),
                pages: book.page_count.to_string(),
                is_read: book.is_read,
            })
        })
        .collect()
}

pub(crate) fn checkbox(checked: bool) -> &'static str {
    if checked {
        "[x]"
    } else {
        "[ ]"
    }
}

pub(crate) fn column_widths() -> [Constraint; COLUMN_COUNT] {
    [
        Constraint::Fill(3),
        Constraint::Fill(2),
        Constraint::Length(7),
        Constraint::Length(5),
        Constraint::Length(REMOVE_LABEL.len() as u16),
    ]
}

/// Build the ratatui widget for the given rows. Placeholder rows are skipped
/// here; the caller draws the placeholder line across the body since table
/// cells cannot span columns.
pub(crate) fn build_table(rows: &[DisplayRow], focus: Option<ControlTag>) -> Table<'static> {
    let header_style = Style::default()
        .fg(Color::Cyan)
        .add_modifier(Modifier::BOLD);
    let focus_style = Style::default()
        .fg(Color::Yellow)
        .add_modifier(Modifier::REVERSED);

    let header = Row::new(HEADERS.iter().map(|title| Cell::from(*title))).style(header_style);

    let body: Vec<Row<'static>> = rows
        .iter()
        .filter_map(DisplayRow::as_book)
        .map(|row| {
            let control_style = |control: Control| {
                if focus == Some(row.tag(control)) {
                    focus_style
                } else {
                    Style::default()
                }
            };
            Row::new(vec![
                Cell::from(row.title.clone()),
                Cell::from(row.author.clone()),
                Cell::from(Line::from(row.pages.clone()).right_aligned()),
                Cell::from(checkbox(row.is_read)).style(control_style(Control::ReadToggle)),
                Cell::from(REMOVE_LABEL).style(control_style(Control::Remove)),
            ])
        })
        .collect();

    Table::new(body, column_widths())
        .header(header)
        .block(Block::default().title("Library").borders(Borders::ALL))
        .column_spacing(1)
        .row_highlight_style(Style::default().add_modifier(Modifier::BOLD))
        .highlight_symbol("> ")
}

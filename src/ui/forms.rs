use anyhow::{anyhow, Result};
use ratatui::style::{Color, Style};
use ratatui::text::{Line, Span};

use crate::models::NewBook;

use super::table::checkbox;

/// Minimum number of typed characters before the author field suggests a
/// completion.
const AUTOCOMPLETE_MIN_CHARS: usize = 2;

/// State of the add-book modal, including author autocomplete tracking.
#[derive(Default, Clone)]
pub(crate) struct BookForm {
    pub(crate) title: String,
    pub(crate) author: String,
    pub(crate) pages: String,
    pub(crate) is_read: bool,
    pub(crate) active: BookField,
    pub(crate) error: Option<String>,
    pub(crate) suggestion: Option<String>,
    pub(crate) autocomplete_disabled: bool,
}

/// Fields within the book form, in focus order.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub(crate) enum BookField {
    #[default]
    Title,
    Author,
    Pages,
    Read,
}

impl BookForm {
    /// Move focus to the next field, wrapping around.
    pub(crate) fn next_field(&mut self) {
        self.active = match self.active {
            BookField::Title => BookField::Author,
            BookField::Author => BookField::Pages,
            BookField::Pages => BookField::Read,
            BookField::Read => BookField::Title,
        };
        self.clear_suggestion_outside_author();
    }

    /// Move focus to the previous field, wrapping around.
    pub(crate) fn previous_field(&mut self) {
        self.active = match self.active {
            BookField::Title => BookField::Read,
            BookField::Author => BookField::Title,
            BookField::Pages => BookField::Author,
            BookField::Read => BookField::Pages,
        };
        self.clear_suggestion_outside_author();
    }

    /// Feed a typed character to the active field. Pages only takes digits
    /// and the read checkbox only reacts to space. Returns whether the input
    /// was accepted.
    pub(crate) fn push_char(&mut self, ch: char) -> bool {
        if ch.is_control() {
            return false;
        }
        match self.active {
            BookField::Title => self.title.push(ch),
            BookField::Author => {
                self.autocomplete_disabled = false;
                self.author.push(ch);
            }
            BookField::Pages => {
                if !ch.is_ascii_digit() {
                    return false;
                }
                self.pages.push(ch);
            }
            BookField::Read => {
                if ch != ' ' {
                    return false;
                }
                self.is_read = !self.is_read;
            }
        }
        true
    }

    /// Remove the last character from the active text field.
    pub(crate) fn backspace(&mut self) {
        match self.active {
            BookField::Title => {
                self.title.pop();
            }
            BookField::Author => {
                self.author.pop();
                self.autocomplete_disabled = false;
            }
            BookField::Pages => {
                self.pages.pop();
            }
            BookField::Read => {}
        }
    }

    /// Turn the raw inputs into a draft. Blank pages mean zero; nothing else
    /// is validated beyond what the inputs already restrict.
    pub(crate) fn parse_inputs(&self) -> Result<NewBook> {
        let pages_raw = self.pages.trim();
        let page_count = if pages_raw.is_empty() {
            0
        } else {
            pages_raw
                .parse::<u32>()
                .map_err(|_| anyhow!("Page count is too large."))?
        };

        Ok(NewBook {
            title: self.title.trim().to_string(),
            author: self.author.trim().to_string(),
            page_count,
            is_read: self.is_read,
        })
    }

    /// Refresh the author suggestion from the known authors.
    pub(crate) fn update_suggestion(&mut self, authors: &[String]) {
        if self.active != BookField::Author
            || self.autocomplete_disabled
            || self.author.chars().count() < AUTOCOMPLETE_MIN_CHARS
        {
            self.suggestion = None;
            return;
        }

        let current_lower = self.author.to_lowercase();
        self.suggestion = authors
            .iter()
            .find(|candidate| candidate.to_lowercase().starts_with(&current_lower))
            .filter(|candidate| candidate.to_lowercase() != current_lower)
            .cloned();
    }

    /// Replace the author with the suggestion. Returns false when there was
    /// nothing to accept.
    pub(crate) fn accept_suggestion(&mut self) -> bool {
        if self.active != BookField::Author || self.suggestion_suffix().is_none() {
            return false;
        }
        match self.suggestion.take() {
            Some(candidate) => {
                self.author = candidate;
                self.autocomplete_disabled = true;
                true
            }
            None => false,
        }
    }

    /// Dismiss the suggestion until the author is edited again.
    pub(crate) fn cancel_autocomplete(&mut self) -> bool {
        if self.active == BookField::Author && self.suggestion.is_some() {
            self.autocomplete_disabled = true;
            self.suggestion = None;
            return true;
        }
        false
    }

    fn clear_suggestion_outside_author(&mut self) {
        if self.active != BookField::Author {
            self.suggestion = None;
        }
    }

    /// Characters of the suggestion beyond what has been typed, shown as a
    /// ghosted hint.
    pub(crate) fn suggestion_suffix(&self) -> Option<String> {
        let candidate = self.suggestion.as_ref()?;
        let suffix: String = candidate.chars().skip(self.author.chars().count()).collect();
        if suffix.is_empty() {
            None
        } else {
            Some(suffix)
        }
    }

    /// Render a single labelled line for the modal.
    pub(crate) fn build_line(&self, field_name: &str, field: BookField) -> Line<'static> {
        let is_active = self.active == field;
        let value = match field {
            BookField::Title => self.title.clone(),
            BookField::Author => self.author.clone(),
            BookField::Pages => self.pages.clone(),
            BookField::Read => checkbox(self.is_read).to_string(),
        };

        let style = if is_active {
            Style::default().fg(Color::Yellow)
        } else if value.is_empty() {
            Style::default().fg(Color::DarkGray)
        } else {
            Style::default()
        };

        let display = if value.is_empty() {
            match field {
                BookField::Pages => "0".to_string(),
                _ => "<optional>".to_string(),
            }
        } else {
            value
        };

        let mut spans = vec![
            Span::raw(format!("{field_name}: ")),
            Span::styled(display, style),
        ];
        if field == BookField::Author && is_active {
            if let Some(suffix) = self.suggestion_suffix() {
                spans.push(Span::styled(suffix, Style::default().fg(Color::DarkGray)));
            }
        }
        Line::from(spans)
    }

    /// Character count of the requested field, for cursor placement.
    pub(crate) fn value_len(&self, field: BookField) -> usize {
        match field {
            BookField::Title => self.title.chars().count(),
            BookField::Author => self.author.chars().count(),
            BookField::Pages => self.pages.chars().count(),
            BookField::Read => 1,
        }
    }
}

use std::mem;

use anyhow::Result;
use crossterm::event::KeyCode;
use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::prelude::*;
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph, TableState, Wrap};
use ratatui::Frame;
use tracing::{debug, info, warn};

use crate::store::LibraryStore;

use super::forms::{BookField, BookForm};
use super::helpers::{centered_rect, surface_error};
use super::table::{build_table, render, Control, ControlTag, DisplayRow};

/// Footer space reserved for status messages and instructions.
const FOOTER_HEIGHT: u16 = 3;

/// Whether the add-book modal is showing. Keeping this explicit makes it
/// obvious which keys go to the table and which go to the form.
enum Mode {
    Idle,
    ModalOpen(BookForm),
}

/// Holds the footer message text plus its severity.
struct StatusMessage {
    text: String,
    kind: StatusKind,
}

/// Severity levels shown in the footer.
enum StatusKind {
    Info,
    Error,
}

impl StatusKind {
    fn style(&self) -> Style {
        match self {
            StatusKind::Info => Style::default().fg(Color::Green),
            StatusKind::Error => Style::default().fg(Color::Red),
        }
    }
}

/// Application state: the library, the rows currently on screen and the
/// interaction mode.
pub struct App {
    store: LibraryStore,
    rows: Vec<DisplayRow>,
    selected: usize,
    focus: Control,
    mode: Mode,
    status: Option<StatusMessage>,
}

impl App {
    pub fn new(store: LibraryStore) -> Self {
        let rows = render(store.books());
        Self {
            store,
            rows,
            selected: 0,
            focus: Control::ReadToggle,
            mode: Mode::Idle,
            status: None,
        }
    }

    /// Process one key press. Returns `true` once the user asked to quit.
    pub fn handle_key(&mut self, code: KeyCode) -> Result<bool> {
        let mut exit = false;
        let mode = mem::replace(&mut self.mode, Mode::Idle);

        self.mode = match mode {
            Mode::Idle => self.handle_idle_key(code, &mut exit)?,
            Mode::ModalOpen(form) => self.handle_modal_key(code, form)?,
        };

        Ok(exit)
    }

    fn handle_idle_key(&mut self, code: KeyCode, exit: &mut bool) -> Result<Mode> {
        match code {
            KeyCode::Char('q') | KeyCode::Esc => {
                *exit = true;
            }
            KeyCode::Char('a') => {
                self.clear_status();
                debug!("add book modal opened");
                return Ok(Mode::ModalOpen(BookForm::default()));
            }
            KeyCode::Up | KeyCode::Char('k') => self.move_selection(-1),
            KeyCode::Down | KeyCode::Char('j') => self.move_selection(1),
            KeyCode::Left | KeyCode::Right | KeyCode::Char('h') | KeyCode::Char('l') => {
                self.focus = self.focus.other();
            }
            KeyCode::Enter => self.activate(self.focus),
            KeyCode::Char(' ') => self.activate(Control::ReadToggle),
            KeyCode::Char('d') | KeyCode::Delete => self.activate(Control::Remove),
            KeyCode::Char('i') => {
                let summary = self
                    .selected_tag(Control::ReadToggle)
                    .and_then(|tag| self.store.get(tag.id))
                    .map(|book| book.info().replace('\n', "  |  "));
                match summary {
                    Some(text) => self.set_status(text, StatusKind::Info),
                    None => self.set_status("No book selected.", StatusKind::Error),
                }
            }
            _ => {}
        }
        Ok(Mode::Idle)
    }

    fn handle_modal_key(&mut self, code: KeyCode, mut form: BookForm) -> Result<Mode> {
        let mut keep_open = true;
        match code {
            KeyCode::Esc => {
                if !form.cancel_autocomplete() {
                    self.set_status("Add book cancelled.", StatusKind::Info);
                    keep_open = false;
                }
            }
            KeyCode::Tab => {
                if !form.accept_suggestion() {
                    form.next_field();
                }
                form.update_suggestion(&self.store.authors());
            }
            KeyCode::BackTab => {
                form.previous_field();
                form.update_suggestion(&self.store.authors());
            }
            KeyCode::Backspace => {
                form.backspace();
                form.update_suggestion(&self.store.authors());
            }
            KeyCode::Enter => match self.submit_book(&form) {
                Ok(()) => keep_open = false,
                Err(err) => {
                    let message = surface_error(&err);
                    form.error = Some(message.clone());
                    self.set_status(message, StatusKind::Error);
                }
            },
            KeyCode::Char(ch) => {
                if form.push_char(ch) {
                    form.error = None;
                    form.update_suggestion(&self.store.authors());
                }
            }
            _ => {}
        }

        if keep_open {
            Ok(Mode::ModalOpen(form))
        } else {
            Ok(Mode::Idle)
        }
    }

    /// Activate `control` on the selected row, if there is one.
    fn activate(&mut self, control: Control) {
        match self.selected_tag(control) {
            Some(tag) => self.handle_table_event(tag),
            None => self.set_status("No book selected.", StatusKind::Error),
        }
    }

    /// Single entry point for every control inside the table. Mutations are
    /// addressed by the tag's id; the position only has to match for the tag
    /// to be considered fresh.
    pub fn handle_table_event(&mut self, tag: ControlTag) {
        if self.store.position_of(tag.id) != Some(tag.position) {
            warn!(id = %tag.id, position = tag.position, "stale control tag");
        }

        match tag.control {
            Control::Remove => match self.store.remove(tag.id) {
                Ok(book) => {
                    self.rerender();
                    self.set_status(format!("Removed \"{book}\"."), StatusKind::Info);
                }
                Err(err) => {
                    warn!(%err, "remove rejected");
                    self.set_status(err.to_string(), StatusKind::Error);
                }
            },
            Control::ReadToggle => match self.store.toggle_read(tag.id) {
                Ok(is_read) => {
                    self.reflect_read(tag, is_read);
                    let state = if is_read { "read" } else { "unread" };
                    self.set_status(format!("Marked as {state}."), StatusKind::Info);
                }
                Err(err) => {
                    warn!(%err, "read toggle rejected");
                    self.set_status(err.to_string(), StatusKind::Error);
                }
            },
        }
    }

    pub fn store(&self) -> &LibraryStore {
        &self.store
    }

    /// Rows as currently displayed.
    pub fn rows(&self) -> &[DisplayRow] {
        &self.rows
    }

    pub fn is_modal_open(&self) -> bool {
        matches!(self.mode, Mode::ModalOpen(_))
    }

    /// Tag of `control` on the selected row.
    pub fn selected_tag(&self, control: Control) -> Option<ControlTag> {
        self.rows
            .get(self.selected)
            .and_then(DisplayRow::as_book)
            .map(|row| row.tag(control))
    }

    pub fn status_text(&self) -> Option<&str> {
        self.status.as_ref().map(|status| status.text.as_str())
    }

    pub fn draw(&self, frame: &mut Frame) {
        let area = frame.area();
        let footer_height = FOOTER_HEIGHT.min(area.height);

        let (content_area, footer_area) = if area.height > footer_height {
            let chunks = Layout::default()
                .direction(Direction::Vertical)
                .constraints([Constraint::Min(0), Constraint::Length(footer_height)])
                .split(area);
            (chunks[0], chunks[1])
        } else {
            (area, area)
        };

        self.draw_library(frame, content_area);

        if area.height >= footer_height {
            self.draw_footer(frame, footer_area);
        }

        if let Mode::ModalOpen(form) = &self.mode {
            self.draw_book_form(frame, area, form);
        }
    }

    fn draw_library(&self, frame: &mut Frame, area: Rect) {
        let focus = match self.mode {
            Mode::Idle => self.selected_tag(self.focus),
            Mode::ModalOpen(_) => None,
        };
        let table = build_table(&self.rows, focus);

        if let Some(DisplayRow::Placeholder { text, .. }) = self.rows.first() {
            frame.render_widget(table, area);
            // Border plus header row.
            if area.height > 3 {
                let line_area = Rect {
                    x: area.x + 1,
                    y: area.y + 2,
                    width: area.width.saturating_sub(2),
                    height: 1,
                };
                let placeholder = Paragraph::new(*text)
                    .alignment(Alignment::Center)
                    .style(Style::default().fg(Color::DarkGray));
                frame.render_widget(placeholder, line_area);
            }
            return;
        }

        let mut state = TableState::default().with_selected(Some(self.selected));
        frame.render_stateful_widget(table, area, &mut state);
    }

    fn draw_footer(&self, frame: &mut Frame, area: Rect) {
        let block = Block::default().borders(Borders::TOP);
        frame.render_widget(block.clone(), area);
        let inner = block.inner(area);

        let status_line = if let Some(status) = &self.status {
            Line::from(vec![Span::styled(status.text.clone(), status.kind.style())])
        } else {
            Line::from("")
        };

        let instructions = self.footer_instructions();

        let paragraph = Paragraph::new(vec![status_line, instructions]).wrap(Wrap { trim: true });
        frame.render_widget(paragraph, inner);
    }

    fn footer_instructions(&self) -> Line<'static> {
        let key_style = Style::default()
            .fg(Color::Cyan)
            .add_modifier(Modifier::BOLD);
        match &self.mode {
            Mode::ModalOpen(_) => Line::from(vec![
                Span::styled("[Tab]", key_style),
                Span::raw(" Next Field   "),
                Span::styled("[Space]", key_style),
                Span::raw(" Toggle Read   "),
                Span::styled("[Enter]", key_style),
                Span::raw(" Add   "),
                Span::styled("[Esc]", key_style),
                Span::raw(" Cancel"),
            ]),
            Mode::Idle if self.store.is_empty() => Line::from(vec![
                Span::styled("[a]", key_style),
                Span::raw(" Add Book   "),
                Span::styled("[q]", key_style),
                Span::raw(" Quit"),
            ]),
            Mode::Idle => Line::from(vec![
                Span::styled("[a]", key_style),
                Span::raw(" Add   "),
                Span::styled("[↑↓]", key_style),
                Span::raw(" Select   "),
                Span::styled("[←→]", key_style),
                Span::raw(" Focus   "),
                Span::styled("[Enter]", key_style),
                Span::raw(" Activate   "),
                Span::styled("[Space]", key_style),
                Span::raw(" Read   "),
                Span::styled("[d]", key_style),
                Span::raw(" Remove   "),
                Span::styled("[i]", key_style),
                Span::raw(" Info   "),
                Span::styled("[q]", key_style),
                Span::raw(" Quit"),
            ]),
        }
    }

    fn draw_book_form(&self, frame: &mut Frame, area: Rect, form: &BookForm) {
        let popup_area = centered_rect(60, 50, area);
        frame.render_widget(Clear, popup_area);

        let block = Block::default().title("Add Book").borders(Borders::ALL);
        frame.render_widget(block.clone(), popup_area);
        let inner = block.inner(popup_area);

        const FIELDS: [(&str, BookField); 4] = [
            ("Title", BookField::Title),
            ("Author", BookField::Author),
            ("Pages", BookField::Pages),
            ("Read", BookField::Read),
        ];

        let mut lines: Vec<Line> = FIELDS
            .iter()
            .map(|(name, field)| form.build_line(name, *field))
            .collect();
        lines.push(Line::from(""));

        if let Some(error) = &form.error {
            lines.push(Line::from(Span::styled(
                error.clone(),
                Style::default().fg(Color::Red),
            )));
        } else {
            lines.push(Line::from(Span::styled(
                "Enter to add • Tab to accept/switch • Esc to cancel",
                Style::default().fg(Color::Gray),
            )));
        }

        let paragraph = Paragraph::new(lines).wrap(Wrap { trim: true });
        frame.render_widget(paragraph, inner);

        if let Some((row, (name, field))) = FIELDS
            .iter()
            .enumerate()
            .find(|(_, (_, field))| *field == form.active)
        {
            let prefix = name.len() as u16 + 2;
            let offset = match field {
                // Sit on the checkbox mark rather than after it.
                BookField::Read => 1,
                _ => form.value_len(*field) as u16,
            };
            frame.set_cursor_position((inner.x + prefix + offset, inner.y + row as u16));
        }
    }

    fn set_status<S: Into<String>>(&mut self, text: S, kind: StatusKind) {
        self.status = Some(StatusMessage {
            text: text.into(),
            kind,
        });
    }

    fn clear_status(&mut self) {
        self.status = None;
    }

    fn submit_book(&mut self, form: &BookForm) -> Result<()> {
        let draft = form.parse_inputs()?;
        let id = self.store.add(&draft);
        self.rerender();
        if let Some(position) = self.store.position_of(id) {
            self.selected = position;
        }
        info!(%id, total = self.store.len(), "book added from form");
        let label = self
            .store
            .get(id)
            .map(|book| book.to_string())
            .unwrap_or_default();
        self.set_status(format!("Added \"{label}\"."), StatusKind::Info);
        Ok(())
    }

    /// Replace every displayed row with a fresh render of the store.
    fn rerender(&mut self) {
        self.rows = render(self.store.books());
        let books = self.store.len();
        if books == 0 {
            self.selected = 0;
        } else if self.selected >= books {
            self.selected = books - 1;
        }
    }

    /// Update just the checkbox of the toggled row.
    fn reflect_read(&mut self, tag: ControlTag, is_read: bool) {
        if let Some(row) = self
            .rows
            .iter_mut()
            .find_map(|row| match row {
                DisplayRow::Book(book) if book.id == tag.id => Some(book),
                _ => None,
            })
        {
            row.is_read = is_read;
        }
    }

    fn move_selection(&mut self, offset: isize) {
        let count = self.store.len();
        if count == 0 {
            return;
        }
        let max = (count - 1) as isize;
        self.selected = (self.selected as isize + offset).clamp(0, max) as usize;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::NewBook;
    use crate::ui::table::PLACEHOLDER_TEXT;
    use ratatui::backend::TestBackend;
    use ratatui::Terminal;

    fn type_str(app: &mut App, text: &str) {
        for ch in text.chars() {
            app.handle_key(KeyCode::Char(ch)).unwrap();
        }
    }

    fn add_via_form(app: &mut App, title: &str, author: &str, pages: &str, read: bool) {
        app.handle_key(KeyCode::Char('a')).unwrap();
        type_str(app, title);
        app.handle_key(KeyCode::Tab).unwrap();
        type_str(app, author);
        // Dismiss any suggestion so Tab moves on.
        if let Mode::ModalOpen(form) = &mut app.mode {
            form.cancel_autocomplete();
        }
        app.handle_key(KeyCode::Tab).unwrap();
        type_str(app, pages);
        app.handle_key(KeyCode::Tab).unwrap();
        if read {
            app.handle_key(KeyCode::Char(' ')).unwrap();
        }
        app.handle_key(KeyCode::Enter).unwrap();
    }

    fn screen_text(app: &App) -> String {
        let backend = TestBackend::new(80, 20);
        let mut terminal = Terminal::new(backend).unwrap();
        terminal.draw(|frame| app.draw(frame)).unwrap();
        terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|cell| cell.symbol())
            .collect()
    }

    #[test]
    fn test_new_app_shows_placeholder() {
        let app = App::new(LibraryStore::new());
        assert!(matches!(app.rows(), [DisplayRow::Placeholder { .. }]));
        assert!(screen_text(&app).contains(PLACEHOLDER_TEXT));
    }

    #[test]
    fn test_add_through_modal() {
        let mut app = App::new(LibraryStore::new());
        add_via_form(&mut app, "Dune", "Herbert", "412", false);

        assert!(!app.is_modal_open());
        assert_eq!(app.store().len(), 1);
        let row = app.rows()[0].as_book().unwrap();
        assert_eq!(row.title, "Dune");
        assert_eq!(row.author, "Herbert");
        assert_eq!(row.pages, "412");
        assert!(!row.is_read);

        let screen = screen_text(&app);
        assert!(screen.contains("Dune"));
        assert!(screen.contains("[ ]"));
        assert!(screen.contains("[Remove]"));
        assert!(!screen.contains(PLACEHOLDER_TEXT));
    }

    #[test]
    fn test_dismissing_modal_adds_nothing() {
        let mut app = App::new(LibraryStore::new());
        app.handle_key(KeyCode::Char('a')).unwrap();
        type_str(&mut app, "Dune");
        app.handle_key(KeyCode::Esc).unwrap();

        assert!(!app.is_modal_open());
        assert!(app.store().is_empty());
        assert_eq!(app.status_text(), Some("Add book cancelled."));
    }

    #[test]
    fn test_quit_keys_only_in_idle() {
        let mut app = App::new(LibraryStore::new());
        app.handle_key(KeyCode::Char('a')).unwrap();
        assert!(!app.handle_key(KeyCode::Char('q')).unwrap());
        app.handle_key(KeyCode::Esc).unwrap();
        assert!(app.handle_key(KeyCode::Char('q')).unwrap());
    }

    #[test]
    fn test_oversized_pages_keep_modal_open() {
        let mut app = App::new(LibraryStore::new());
        app.handle_key(KeyCode::Char('a')).unwrap();
        app.handle_key(KeyCode::Tab).unwrap();
        app.handle_key(KeyCode::Tab).unwrap();
        type_str(&mut app, "99999999999");
        app.handle_key(KeyCode::Enter).unwrap();

        assert!(app.is_modal_open());
        assert!(app.store().is_empty());
        assert_eq!(app.status_text(), Some("Page count is too large."));
    }

    #[test]
    fn test_remove_only_book_restores_placeholder() {
        let mut app = App::new(LibraryStore::new());
        add_via_form(&mut app, "Dune", "Herbert", "412", false);

        app.handle_key(KeyCode::Char('d')).unwrap();

        assert!(app.store().is_empty());
        assert!(matches!(app.rows(), [DisplayRow::Placeholder { .. }]));
        assert!(screen_text(&app).contains(PLACEHOLDER_TEXT));
    }

    #[test]
    fn test_enter_activates_focused_control() {
        let mut store = LibraryStore::new();
        store.add(&NewBook::new("A", "", 1, false));
        store.add(&NewBook::new("B", "", 2, false));
        let mut app = App::new(store);

        app.handle_key(KeyCode::Down).unwrap();
        app.handle_key(KeyCode::Enter).unwrap();
        assert!(app.store().books()[1].is_read);
        assert!(app.rows()[1].as_book().unwrap().is_read);
        assert!(!app.store().books()[0].is_read);

        app.handle_key(KeyCode::Right).unwrap();
        app.handle_key(KeyCode::Enter).unwrap();
        assert_eq!(app.store().len(), 1);
        assert_eq!(app.store().books()[0].title, "A");
        assert_eq!(app.selected_tag(Control::Remove).unwrap().position, 0);
    }

    #[test]
    fn test_toggle_updates_only_its_row() {
        let mut store = LibraryStore::new();
        store.add(&NewBook::new("A", "x", 1, false));
        store.add(&NewBook::new("B", "y", 2, true));
        let mut app = App::new(store);
        let before = app.rows().to_vec();

        app.handle_key(KeyCode::Char(' ')).unwrap();

        let first = app.rows()[0].as_book().unwrap();
        assert!(first.is_read);
        assert_eq!(first.title, "A");
        assert_eq!(app.rows()[1], before[1]);
    }

    #[test]
    fn test_stale_tag_is_reported() {
        let mut store = LibraryStore::new();
        store.add(&NewBook::new("A", "", 1, false));
        let mut app = App::new(store);
        let tag = app.selected_tag(Control::Remove).unwrap();

        app.handle_table_event(tag);
        app.handle_table_event(tag);

        assert_eq!(
            app.status_text(),
            Some(format!("Book {} is no longer in the library.", tag.id).as_str())
        );
    }

    #[test]
    fn test_activate_without_books() {
        let mut app = App::new(LibraryStore::new());
        app.handle_key(KeyCode::Char('d')).unwrap();
        assert_eq!(app.status_text(), Some("No book selected."));
    }

    #[test]
    fn test_info_shows_summary() {
        let mut store = LibraryStore::new();
        store.add(&NewBook::new("Dune", "Herbert", 412, false));
        let mut app = App::new(store);

        app.handle_key(KeyCode::Char('i')).unwrap();

        assert_eq!(
            app.status_text(),
            Some("Title: Dune  |  Author: Herbert  |  Pages: 412  |  Has been read: No")
        );
    }

    #[test]
    fn test_author_autocomplete_in_modal() {
        let mut store = LibraryStore::new();
        store.add(&NewBook::new("Dune", "Herbert", 412, false));
        let mut app = App::new(store);

        app.handle_key(KeyCode::Char('a')).unwrap();
        type_str(&mut app, "Dune Messiah");
        app.handle_key(KeyCode::Tab).unwrap();
        type_str(&mut app, "he");
        app.handle_key(KeyCode::Tab).unwrap();
        app.handle_key(KeyCode::Enter).unwrap();

        assert_eq!(app.store().books()[1].author, "Herbert");
        assert_eq!(app.selected_tag(Control::Remove).unwrap().position, 1);
    }
}

use book_library::{render, App, Control, DisplayRow, LibraryStore, NewBook, PLACEHOLDER_TEXT};
use crossterm::event::KeyCode;

fn press(app: &mut App, code: KeyCode) {
    assert!(!app.handle_key(code).unwrap());
}

fn type_str(app: &mut App, text: &str) {
    for ch in text.chars() {
        press(app, KeyCode::Char(ch));
    }
}

#[test]
fn dune_is_added_then_removed() {
    let mut app = App::new(LibraryStore::new());

    press(&mut app, KeyCode::Char('a'));
    assert!(app.is_modal_open());
    type_str(&mut app, "Dune");
    press(&mut app, KeyCode::Tab);
    type_str(&mut app, "Herbert");
    press(&mut app, KeyCode::Tab);
    type_str(&mut app, "412");
    press(&mut app, KeyCode::Enter);
    assert!(!app.is_modal_open());

    let rows = app.rows();
    assert_eq!(rows.len(), 1);
    let row = rows[0].as_book().expect("book row");
    assert_eq!(
        (row.title.as_str(), row.author.as_str(), row.pages.as_str(), row.is_read),
        ("Dune", "Herbert", "412", false)
    );

    let remove = app.selected_tag(Control::Remove).expect("remove control");
    assert_eq!(remove.position, 0);
    app.handle_table_event(remove);

    assert_eq!(
        app.rows(),
        &[DisplayRow::Placeholder {
            text: PLACEHOLDER_TEXT,
            span: 5,
        }]
    );
}

#[test]
fn placeholder_regardless_of_history() {
    let mut store = LibraryStore::new();
    for title in ["A", "B", "C"] {
        store.add(&NewBook::new(title, "", 10, false));
    }
    while !store.is_empty() {
        store.remove_at(store.len() - 1).unwrap();
    }

    let rows = render(store.books());

    assert_eq!(rows.len(), 1);
    assert!(matches!(
        rows[0],
        DisplayRow::Placeholder {
            text: "No books found...",
            ..
        }
    ));
}

#[test]
fn toggling_in_the_middle_leaves_neighbours_alone() {
    let mut store = LibraryStore::new();
    for title in ["A", "B", "C"] {
        store.add(&NewBook::new(title, "Someone", 100, false));
    }
    let before = store.books().to_vec();
    let mut app = App::new(store);

    press(&mut app, KeyCode::Down);
    press(&mut app, KeyCode::Char(' '));

    let after = app.store().books();
    assert_eq!(after[0], before[0]);
    assert_eq!(after[2], before[2]);
    assert!(after[1].is_read);
    assert_eq!(after[1].title, before[1].title);
    assert_eq!(after[1].page_count, before[1].page_count);
}

#[test]
fn removal_shifts_control_positions() {
    let mut store = LibraryStore::new();
    for title in ["A", "B", "C", "D"] {
        store.add(&NewBook::new(title, "", 1, false));
    }
    let mut app = App::new(store);

    press(&mut app, KeyCode::Down);
    press(&mut app, KeyCode::Char('d'));

    let titles: Vec<&str> = app
        .rows()
        .iter()
        .filter_map(DisplayRow::as_book)
        .map(|row| row.title.as_str())
        .collect();
    assert_eq!(titles, vec!["A", "C", "D"]);
    for (expected, row) in app.rows().iter().filter_map(DisplayRow::as_book).enumerate() {
        assert_eq!(row.tag(Control::ReadToggle).position, expected);
        assert_eq!(app.store().position_of(row.id), Some(expected));
    }
}

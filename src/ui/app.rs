use std::mem;

use anyhow::Result;
use crossterm::event::KeyCode;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{
    Block, Borders, Cell, Clear, Paragraph, Row, Table, TableState, Tabs, Wrap,
};
use ratatui::Frame;
use tracing::info;

use crate::db::{LibraryTable, Store};
use crate::models::Record;

use super::forms::{
    cursor_offset, BookForm, BorrowerForm, CheckoutForm, ConfirmDelete, NewBook, NewBorrower,
    NewCheckout,
};
use super::helpers::{centered_rect, column_headers, column_widths, step_selection};

/// Footer space reserved for status messages and instructions.
const FOOTER_HEIGHT: u16 = 3;
/// Height of the tab bar at the top of the screen.
const TABS_HEIGHT: u16 = 3;
/// Rows skipped by PageUp/PageDown.
const PAGE_STEP: isize = 10;

/// The three table views, in tab order.
const TABS: [LibraryTable; 3] = LibraryTable::ALL;

/// Fine-grained modes layered over the table view.
enum Mode {
    Normal,
    AddingBook(BookForm),
    AddingBorrower(BorrowerForm),
    AddingCheckout(CheckoutForm),
    ConfirmDelete(ConfirmDelete),
    Searching(String),
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

fn tab_title(table: LibraryTable) -> &'static str {
    match table {
        LibraryTable::Books => "Books",
        LibraryTable::Borrowers => "Borrowers",
        LibraryTable::Checkouts => "Checkouts",
    }
}

/// Central application state shared across the TUI. The row vectors are
/// always rebuilt from a full read of the store after a write.
pub struct App {
    store: Store,
    records: [Vec<Record>; 3],
    selected: [usize; 3],
    tab: usize,
    /// Active book search term; `None` shows every book.
    search: Option<String>,
    mode: Mode,
    status: Option<StatusMessage>,
}

impl App {
    /// Build the app and read all three tables once.
    pub fn new(store: Store) -> Result<Self> {
        let mut app = Self {
            store,
            records: [Vec::new(), Vec::new(), Vec::new()],
            selected: [0; 3],
            tab: 0,
            search: None,
            mode: Mode::Normal,
            status: None,
        };
        app.reload_all()?;
        Ok(app)
    }

    fn current_table(&self) -> LibraryTable {
        TABS[self.tab]
    }

    fn current_record(&self) -> Option<&Record> {
        self.records[self.tab].get(self.selected[self.tab])
    }

    /// Re-read every table and drop any active search.
    fn reload_all(&mut self) -> Result<()> {
        for (idx, table) in TABS.iter().enumerate() {
            self.records[idx] = self.store.list_all(*table)?;
        }
        self.search = None;
        self.clamp_selections();
        Ok(())
    }

    /// Full refresh after a write or an explicit reload. A failed refresh is
    /// reported in the footer instead of ending the session.
    fn refresh_after_write(&mut self) {
        if let Err(err) = self.reload_all() {
            self.set_status(format!("Refresh failed: {err}"), StatusKind::Error);
        }
    }

    fn clamp_selections(&mut self) {
        for (idx, rows) in self.records.iter().enumerate() {
            if rows.is_empty() {
                self.selected[idx] = 0;
            } else if self.selected[idx] >= rows.len() {
                self.selected[idx] = rows.len() - 1;
            }
        }
    }

    fn move_selection(&mut self, offset: isize) {
        let len = self.records[self.tab].len();
        self.selected[self.tab] = step_selection(self.selected[self.tab], offset, len);
    }

    fn switch_tab(&mut self, offset: isize) {
        let len = TABS.len() as isize;
        self.tab = (self.tab as isize + offset).rem_euclid(len) as usize;
    }

    pub fn handle_key(&mut self, code: KeyCode) -> Result<bool> {
        let mut exit = false;
        let mode = mem::replace(&mut self.mode, Mode::Normal);

        self.mode = match mode {
            Mode::Normal => self.handle_normal_key(code, &mut exit),
            Mode::AddingBook(form) => self.handle_book_form(code, form),
            Mode::AddingBorrower(form) => self.handle_borrower_form(code, form),
            Mode::AddingCheckout(form) => self.handle_checkout_form(code, form),
            Mode::ConfirmDelete(confirm) => self.handle_confirm_delete(code, confirm),
            Mode::Searching(query) => self.handle_search(code, query),
        };

        Ok(exit)
    }

    fn handle_normal_key(&mut self, code: KeyCode, exit: &mut bool) -> Mode {
        match code {
            KeyCode::Char('q') => *exit = true,
            KeyCode::Esc => {
                if self.search.is_some() {
                    self.set_status("Showing all books.", StatusKind::Info);
                    self.refresh_after_write();
                } else {
                    *exit = true;
                }
            }
            KeyCode::Tab | KeyCode::Right => self.switch_tab(1),
            KeyCode::BackTab | KeyCode::Left => self.switch_tab(-1),
            KeyCode::Char(ch @ '1'..='3') => self.tab = ch as usize - '1' as usize,
            KeyCode::Up => self.move_selection(-1),
            KeyCode::Down => self.move_selection(1),
            KeyCode::PageUp => self.move_selection(-PAGE_STEP),
            KeyCode::PageDown => self.move_selection(PAGE_STEP),
            KeyCode::Home => self.selected[self.tab] = 0,
            KeyCode::End => {
                self.selected[self.tab] = self.records[self.tab].len().saturating_sub(1)
            }
            KeyCode::Char('r') | KeyCode::Char('R') => {
                self.set_status("Reloaded all tables.", StatusKind::Info);
                self.refresh_after_write();
            }
            KeyCode::Char('+') | KeyCode::Char('a') | KeyCode::Char('A') => {
                self.clear_status();
                return match self.current_table() {
                    LibraryTable::Books => Mode::AddingBook(BookForm::default()),
                    LibraryTable::Borrowers => Mode::AddingBorrower(BorrowerForm::default()),
                    LibraryTable::Checkouts => Mode::AddingCheckout(CheckoutForm::default()),
                };
            }
            KeyCode::Char('c') | KeyCode::Char('C') => {
                if let Some(Record::Book(book)) = self.current_record() {
                    let form = CheckoutForm::for_book(&book.id);
                    self.clear_status();
                    return Mode::AddingCheckout(form);
                }
                self.set_status("Select a book to check out.", StatusKind::Error);
            }
            KeyCode::Char('-') | KeyCode::Char('d') | KeyCode::Delete => {
                if let Some(record) = self.current_record().cloned() {
                    self.clear_status();
                    return Mode::ConfirmDelete(ConfirmDelete { record });
                }
                self.set_status("Nothing selected to delete.", StatusKind::Error);
            }
            KeyCode::Char('/') | KeyCode::Char('f') => {
                if self.current_table() == LibraryTable::Books {
                    self.clear_status();
                    return Mode::Searching(self.search.clone().unwrap_or_default());
                }
                self.set_status("Search is available on the Books tab.", StatusKind::Error);
            }
            _ => {}
        }
        Mode::Normal
    }

    fn handle_book_form(&mut self, code: KeyCode, mut form: BookForm) -> Mode {
        match code {
            KeyCode::Esc => {
                self.set_status("Add book cancelled.", StatusKind::Info);
                return Mode::Normal;
            }
            KeyCode::Tab | KeyCode::Down => form.next_field(),
            KeyCode::BackTab | KeyCode::Up => form.previous_field(),
            KeyCode::Backspace => form.backspace(),
            KeyCode::Enter => match form.parse_inputs() {
                Ok(book) => match self.save_book(&book) {
                    Ok(()) => return Mode::Normal,
                    Err(message) => form.error = Some(message),
                },
                Err(err) => form.error = Some(err.to_string()),
            },
            KeyCode::Char(ch) => {
                if form.push_char(ch) {
                    form.error = None;
                }
            }
            _ => {}
        }
        Mode::AddingBook(form)
    }

    fn handle_borrower_form(&mut self, code: KeyCode, mut form: BorrowerForm) -> Mode {
        match code {
            KeyCode::Esc => {
                self.set_status("Add borrower cancelled.", StatusKind::Info);
                return Mode::Normal;
            }
            KeyCode::Tab | KeyCode::Down => form.next_field(),
            KeyCode::BackTab | KeyCode::Up => form.previous_field(),
            KeyCode::Backspace => form.backspace(),
            KeyCode::Enter => match form.parse_inputs() {
                Ok(borrower) => match self.save_borrower(&borrower) {
                    Ok(()) => return Mode::Normal,
                    Err(message) => form.error = Some(message),
                },
                Err(err) => form.error = Some(err.to_string()),
            },
            KeyCode::Char(ch) => {
                if form.push_char(ch) {
                    form.error = None;
                }
            }
            _ => {}
        }
        Mode::AddingBorrower(form)
    }

    fn handle_checkout_form(&mut self, code: KeyCode, mut form: CheckoutForm) -> Mode {
        match code {
            KeyCode::Esc => {
                self.set_status("Add checkout cancelled.", StatusKind::Info);
                return Mode::Normal;
            }
            KeyCode::Tab | KeyCode::Down => form.next_field(),
            KeyCode::BackTab | KeyCode::Up => form.previous_field(),
            KeyCode::Backspace => form.backspace(),
            KeyCode::Enter => match form.parse_inputs() {
                Ok(checkout) => match self.save_checkout(&checkout) {
                    Ok(()) => return Mode::Normal,
                    Err(message) => form.error = Some(message),
                },
                Err(err) => form.error = Some(err.to_string()),
            },
            KeyCode::Char(ch) => {
                if form.push_char(ch) {
                    form.error = None;
                }
            }
            _ => {}
        }
        Mode::AddingCheckout(form)
    }

    fn handle_confirm_delete(&mut self, code: KeyCode, confirm: ConfirmDelete) -> Mode {
        match code {
            KeyCode::Esc | KeyCode::Char('n') | KeyCode::Char('N') => {
                self.set_status("Deletion cancelled.", StatusKind::Info);
                Mode::Normal
            }
            KeyCode::Enter | KeyCode::Char('y') | KeyCode::Char('Y') => {
                self.perform_delete(&confirm);
                Mode::Normal
            }
            _ => Mode::ConfirmDelete(confirm),
        }
    }

    fn handle_search(&mut self, code: KeyCode, mut query: String) -> Mode {
        match code {
            KeyCode::Esc => {
                self.set_status("Search cancelled.", StatusKind::Info);
                Mode::Normal
            }
            KeyCode::Backspace => {
                query.pop();
                Mode::Searching(query)
            }
            KeyCode::Enter => {
                self.run_search(query.trim());
                Mode::Normal
            }
            KeyCode::Char(ch) if !ch.is_control() => {
                query.push(ch);
                Mode::Searching(query)
            }
            _ => Mode::Searching(query),
        }
    }

    fn save_book(&mut self, book: &NewBook) -> Result<(), String> {
        let id = self
            .store
            .add_book(
                &book.title,
                &book.author,
                &book.genre,
                &book.publication_date,
                &book.isbn,
                book.available,
            )
            .map_err(|err| self.report_error(err))?;
        info!(%id, "book added");
        self.set_status(format!("Added book \"{}\".", book.title), StatusKind::Info);
        self.refresh_after_write();
        self.select_id(LibraryTable::Books, &id);
        Ok(())
    }

    fn save_borrower(&mut self, borrower: &NewBorrower) -> Result<(), String> {
        let id = self
            .store
            .add_borrower(
                &borrower.name,
                &borrower.email,
                &borrower.phone,
                &borrower.address,
            )
            .map_err(|err| self.report_error(err))?;
        info!(%id, "borrower added");
        self.set_status(format!("Added borrower {}.", borrower.name), StatusKind::Info);
        self.refresh_after_write();
        self.select_id(LibraryTable::Borrowers, &id);
        Ok(())
    }

    fn save_checkout(&mut self, checkout: &NewCheckout) -> Result<(), String> {
        let id = self
            .store
            .add_checkout(
                &checkout.book_id,
                &checkout.borrower_id,
                &checkout.checkout_date,
                &checkout.due_date,
                checkout.return_date.as_deref(),
            )
            .map_err(|err| self.report_error(err))?;
        info!(%id, "checkout added");
        self.set_status("Checkout added.", StatusKind::Info);
        self.refresh_after_write();
        self.select_id(LibraryTable::Checkouts, &id);
        Ok(())
    }

    fn perform_delete(&mut self, confirm: &ConfirmDelete) {
        let table = confirm.record.table();
        let id = confirm.record.id();
        match self.store.delete_record(table, id) {
            Ok(0) => {
                self.set_status(format!("{id} was already gone."), StatusKind::Info);
                self.refresh_after_write();
            }
            Ok(_) => {
                info!(%table, id, "record deleted");
                self.set_status(format!("Deleted {}.", confirm.record), StatusKind::Info);
                self.refresh_after_write();
            }
            Err(err) => {
                self.report_error(err);
            }
        }
    }

    /// Book search. An empty term restores the full list rather than asking
    /// the store for everything.
    fn run_search(&mut self, term: &str) {
        if term.is_empty() {
            self.set_status("Showing all books.", StatusKind::Info);
            self.refresh_after_write();
            return;
        }

        match self.store.search_books(term) {
            Ok(books) => {
                let count = books.len();
                self.records[0] = books.into_iter().map(Record::Book).collect();
                self.selected[0] = 0;
                self.search = Some(term.to_string());
                self.set_status(
                    format!("{count} book(s) match \"{term}\". Esc shows all books."),
                    StatusKind::Info,
                );
            }
            Err(err) => {
                self.report_error(err);
            }
        }
    }

    fn select_id(&mut self, table: LibraryTable, id: &str) {
        let idx = TABS
            .iter()
            .position(|candidate| *candidate == table)
            .unwrap_or(0);
        if let Some(row) = self.records[idx].iter().position(|record| record.id() == id) {
            self.selected[idx] = row;
        }
    }

    /// Show a store failure in the footer and hand the message back for the
    /// open form.
    fn report_error(&mut self, err: impl std::fmt::Display) -> String {
        let message = err.to_string();
        self.set_status(message.clone(), StatusKind::Error);
        message
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

    pub(crate) fn draw(&self, frame: &mut Frame) {
        let area = frame.area();
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(TABS_HEIGHT),
                Constraint::Min(0),
                Constraint::Length(FOOTER_HEIGHT),
            ])
            .split(area);

        self.draw_tabs(frame, chunks[0]);
        self.draw_table(frame, chunks[1]);
        self.draw_footer(frame, chunks[2]);

        match &self.mode {
            Mode::AddingBook(form) => {
                let field = form.active_field();
                let cursor = cursor_offset(field.label(), &form.value(field));
                self.draw_form(
                    frame,
                    area,
                    "Add Book",
                    form.lines(),
                    form.active,
                    cursor,
                    &form.error,
                )
            }
            Mode::AddingBorrower(form) => {
                let field = form.active_field();
                let cursor = cursor_offset(field.label(), form.value(field));
                self.draw_form(
                    frame,
                    area,
                    "Add Borrower",
                    form.lines(),
                    form.active,
                    cursor,
                    &form.error,
                )
            }
            Mode::AddingCheckout(form) => {
                let field = form.active_field();
                let cursor = cursor_offset(field.label(), form.value(field));
                self.draw_form(
                    frame,
                    area,
                    "Add Checkout",
                    form.lines(),
                    form.active,
                    cursor,
                    &form.error,
                )
            }
            Mode::ConfirmDelete(confirm) => self.draw_confirm_delete(frame, area, confirm),
            Mode::Searching(query) => self.draw_search_bar(frame, chunks[1], query),
            Mode::Normal => {}
        }
    }

    fn draw_tabs(&self, frame: &mut Frame, area: Rect) {
        let titles: Vec<String> = TABS
            .iter()
            .enumerate()
            .map(|(idx, table)| {
                format!("{} {} ({})", idx + 1, tab_title(*table), self.records[idx].len())
            })
            .collect();

        let tabs = Tabs::new(titles)
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .title("Library Management"),
            )
            .select(self.tab)
            .highlight_style(
                Style::default()
                    .fg(Color::Yellow)
                    .add_modifier(Modifier::BOLD),
            );
        frame.render_widget(tabs, area);
    }

    fn draw_table(&self, frame: &mut Frame, area: Rect) {
        let table = self.current_table();
        let header = Row::new(
            column_headers(table)
                .iter()
                .map(|title| Cell::from(*title)),
        )
        .style(Style::default().add_modifier(Modifier::BOLD))
        .bottom_margin(1);

        let rows = self.records[self.tab].iter().map(|record| {
            let style = match record {
                Record::Checkout(checkout) if checkout.is_open() => {
                    Style::default().fg(Color::Cyan)
                }
                Record::Book(book) if !book.available => Style::default().fg(Color::DarkGray),
                _ => Style::default(),
            };
            Row::new(record.cells().into_iter().map(Cell::from)).style(style)
        });

        let title = match (&self.search, table) {
            (Some(term), LibraryTable::Books) => format!("Books matching \"{term}\""),
            _ => tab_title(table).to_string(),
        };

        let widget = Table::new(rows, column_widths(table))
            .header(header)
            .block(Block::default().borders(Borders::ALL).title(title))
            .row_highlight_style(Style::default().add_modifier(Modifier::REVERSED));

        let mut state = TableState::default();
        if !self.records[self.tab].is_empty() {
            state.select(Some(self.selected[self.tab]));
        }
        frame.render_stateful_widget(widget, area, &mut state);

        if self.records[self.tab].is_empty() && area.height > 4 {
            let hint = Paragraph::new(Line::from(Span::styled(
                "No records yet. Press + to add one.",
                Style::default().fg(Color::DarkGray),
            )));
            let inner = Rect {
                x: area.x + 2,
                y: area.y + 3,
                width: area.width.saturating_sub(4),
                height: 1,
            };
            frame.render_widget(hint, inner);
        }
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

        let paragraph =
            Paragraph::new(vec![status_line, self.footer_instructions()]).wrap(Wrap { trim: true });
        frame.render_widget(paragraph, inner);
    }

    fn footer_instructions(&self) -> Line<'static> {
        let text = match (&self.mode, self.current_table()) {
            (Mode::Searching(_), _) => "Enter search • Esc cancel",
            (Mode::ConfirmDelete(_), _) => "y/Enter delete • n/Esc cancel",
            (Mode::AddingBook(_), _) => {
                "Tab/↓ next field • Shift+Tab/↑ previous • Space toggles Available • Enter save • Esc cancel"
            }
            (Mode::AddingBorrower(_), _) | (Mode::AddingCheckout(_), _) => {
                "Tab/↓ next field • Shift+Tab/↑ previous • Enter save • Esc cancel"
            }
            (Mode::Normal, LibraryTable::Books) => {
                "Tab/1-3 switch • ↑/↓ select • + add • - delete • c check out • / search • r refresh • q quit"
            }
            (Mode::Normal, _) => {
                "Tab/1-3 switch • ↑/↓ select • + add • - delete • r refresh • q quit"
            }
        };
        Line::from(Span::styled(text, Style::default().fg(Color::Gray)))
    }

    #[allow(clippy::too_many_arguments)]
    fn draw_form(
        &self,
        frame: &mut Frame,
        area: Rect,
        title: &str,
        fields: Vec<Line<'static>>,
        active: usize,
        cursor: u16,
        error: &Option<String>,
    ) {
        let popup_area = centered_rect(70, 50, area);
        frame.render_widget(Clear, popup_area);

        let block = Block::default().title(title).borders(Borders::ALL);
        frame.render_widget(block.clone(), popup_area);
        let inner = block.inner(popup_area);

        let mut lines = fields;
        lines.push(Line::from(""));
        if let Some(error) = error {
            lines.push(Line::from(Span::styled(
                error.clone(),
                Style::default().fg(Color::Red),
            )));
        } else {
            lines.push(Line::from(Span::styled(
                "Enter to save • Esc to cancel",
                Style::default().fg(Color::Gray),
            )));
        }

        frame.render_widget(Paragraph::new(lines), inner);

        let cursor_x = (inner.x + cursor).min(inner.right().saturating_sub(1));
        frame.set_cursor_position((cursor_x, inner.y + active as u16));
    }

    fn draw_confirm_delete(&self, frame: &mut Frame, area: Rect, confirm: &ConfirmDelete) {
        let popup_area = centered_rect(60, 25, area);
        frame.render_widget(Clear, popup_area);

        let block = Block::default().title("Confirm Delete").borders(Borders::ALL);
        frame.render_widget(block.clone(), popup_area);
        let inner = block.inner(popup_area);

        let mut lines = vec![Line::from(confirm.prompt()), Line::from("")];
        if let Record::Book(_) | Record::Borrower(_) = confirm.record {
            lines.push(Line::from(Span::styled(
                "Checkouts that reference it are kept.",
                Style::default().fg(Color::Yellow),
            )));
        }
        lines.push(Line::from(Span::styled(
            "y/Enter to delete • n/Esc to cancel",
            Style::default().fg(Color::Gray),
        )));

        frame.render_widget(Paragraph::new(lines).wrap(Wrap { trim: true }), inner);
    }

    fn draw_search_bar(&self, frame: &mut Frame, area: Rect, query: &str) {
        let height = 3u16.min(area.height);
        let popup_area = Rect {
            x: area.x,
            y: area.y,
            width: area.width,
            height,
        };
        frame.render_widget(Clear, popup_area);

        let block = Block::default()
            .title("Search books (title, author, genre, ISBN)")
            .borders(Borders::ALL);
        frame.render_widget(block.clone(), popup_area);
        let inner = block.inner(popup_area);

        frame.render_widget(Paragraph::new(query.to_string()), inner);
        let cursor_x = (inner.x + query.chars().count() as u16).min(inner.right().saturating_sub(1));
        frame.set_cursor_position((cursor_x, inner.y));
    }
}

#[cfg(test)]
mod tests {
    use ratatui::backend::TestBackend;
    use ratatui::Terminal;
    use tempfile::TempDir;

    use super::*;
    use crate::config::StoreConfig;

    fn setup() -> (TempDir, App) {
        let dir = TempDir::new().unwrap();
        let store = Store::new(StoreConfig::new(dir.path().join("library.sqlite")));
        store.initialize_schema().unwrap();
        let app = App::new(store).unwrap();
        (dir, app)
    }

    fn type_keys(app: &mut App, text: &str) {
        for ch in text.chars() {
            app.handle_key(KeyCode::Char(ch)).unwrap();
        }
    }

    fn add_book(app: &mut App, title: &str, author: &str) {
        app.handle_key(KeyCode::Char('+')).unwrap();
        type_keys(app, title);
        app.handle_key(KeyCode::Tab).unwrap();
        type_keys(app, author);
        app.handle_key(KeyCode::Enter).unwrap();
    }

    #[test]
    fn adding_a_book_refreshes_the_table() {
        let (_dir, mut app) = setup();
        add_book(&mut app, "Dune", "Herbert");

        assert!(matches!(app.mode, Mode::Normal));
        assert_eq!(app.records[0].len(), 1);
        match &app.records[0][0] {
            Record::Book(book) => {
                assert_eq!(book.title, "Dune");
                assert!(book.available);
            }
            other => panic!("unexpected record {other:?}"),
        }
    }

    #[test]
    fn missing_author_keeps_form_open() {
        let (_dir, mut app) = setup();
        app.handle_key(KeyCode::Char('+')).unwrap();
        type_keys(&mut app, "Dune");
        app.handle_key(KeyCode::Enter).unwrap();

        match &app.mode {
            Mode::AddingBook(form) => assert!(form.error.is_some()),
            _ => panic!("form should stay open"),
        }
        assert!(app.records[0].is_empty());
    }

    #[test]
    fn search_filters_books_and_escape_restores() {
        let (_dir, mut app) = setup();
        add_book(&mut app, "Dune", "Herbert");
        add_book(&mut app, "Foundation", "Asimov");

        app.handle_key(KeyCode::Char('/')).unwrap();
        type_keys(&mut app, "DUNE");
        app.handle_key(KeyCode::Enter).unwrap();
        assert_eq!(app.records[0].len(), 1);
        assert_eq!(app.search.as_deref(), Some("DUNE"));

        let exit = app.handle_key(KeyCode::Esc).unwrap();
        assert!(!exit);
        assert_eq!(app.records[0].len(), 2);
        assert!(app.search.is_none());
    }

    fn drop_table(app: &App, table: &str) {
        let conn = rusqlite::Connection::open(app.store.config().db_path()).unwrap();
        conn.execute(&format!("DROP TABLE {table}"), []).unwrap();
    }

    fn status_text(app: &App) -> Option<&str> {
        app.status.as_ref().map(|status| status.text.as_str())
    }

    #[test]
    fn failed_reload_is_reported_in_footer() {
        let (_dir, mut app) = setup();
        add_book(&mut app, "Dune", "Herbert");
        drop_table(&app, "borrowers");

        let exit = app.handle_key(KeyCode::Char('r')).unwrap();

        assert!(!exit);
        assert!(matches!(app.mode, Mode::Normal));
        let status = app.status.as_ref().unwrap();
        assert!(matches!(status.kind, StatusKind::Error));
        assert!(status.text.contains("no such table: borrowers"));
        assert_eq!(app.records[0].len(), 1);
    }

    #[test]
    fn failed_reload_when_clearing_search_keeps_session() {
        let (_dir, mut app) = setup();
        add_book(&mut app, "Dune", "Herbert");
        add_book(&mut app, "Foundation", "Asimov");
        app.handle_key(KeyCode::Char('/')).unwrap();
        type_keys(&mut app, "dune");
        app.handle_key(KeyCode::Enter).unwrap();
        drop_table(&app, "checkouts");

        let exit = app.handle_key(KeyCode::Esc).unwrap();

        assert!(!exit);
        assert!(status_text(&app).unwrap().contains("no such table: checkouts"));
        assert_eq!(app.search.as_deref(), Some("dune"));
    }

    #[test]
    fn empty_search_shows_all_books() {
        let (_dir, mut app) = setup();
        add_book(&mut app, "Dune", "Herbert");

        app.handle_key(KeyCode::Char('/')).unwrap();
        type_keys(&mut app, "   ");
        app.handle_key(KeyCode::Enter).unwrap();

        assert!(app.search.is_none());
        assert_eq!(app.records[0].len(), 1);
    }

    #[test]
    fn delete_after_confirmation() {
        let (_dir, mut app) = setup();
        add_book(&mut app, "Dune", "Herbert");

        app.handle_key(KeyCode::Char('-')).unwrap();
        assert!(matches!(app.mode, Mode::ConfirmDelete(_)));
        app.handle_key(KeyCode::Char('n')).unwrap();
        assert_eq!(app.records[0].len(), 1);

        app.handle_key(KeyCode::Char('-')).unwrap();
        app.handle_key(KeyCode::Char('y')).unwrap();
        assert!(app.records[0].is_empty());
    }

    #[test]
    fn checkout_from_selected_book_prefills_book_id() {
        let (_dir, mut app) = setup();
        add_book(&mut app, "Dune", "Herbert");
        let book_id = app.records[0][0].id().to_string();

        app.handle_key(KeyCode::Char('c')).unwrap();
        type_keys(&mut app, "U-walk-in");
        app.handle_key(KeyCode::Tab).unwrap();
        type_keys(&mut app, "2024-01-01");
        app.handle_key(KeyCode::Tab).unwrap();
        type_keys(&mut app, "2024-01-15");
        app.handle_key(KeyCode::Enter).unwrap();

        assert!(matches!(app.mode, Mode::Normal));
        match &app.records[2][..] {
            [Record::Checkout(checkout)] => {
                assert_eq!(checkout.book_id, book_id);
                assert_eq!(checkout.borrower_id, "U-walk-in");
                assert!(checkout.is_open());
            }
            other => panic!("unexpected checkouts {other:?}"),
        }
    }

    #[test]
    fn tabs_wrap_in_both_directions() {
        let (_dir, mut app) = setup();
        app.handle_key(KeyCode::BackTab).unwrap();
        assert_eq!(app.current_table(), LibraryTable::Checkouts);
        app.handle_key(KeyCode::Tab).unwrap();
        assert_eq!(app.current_table(), LibraryTable::Books);
        app.handle_key(KeyCode::Char('2')).unwrap();
        assert_eq!(app.current_table(), LibraryTable::Borrowers);
    }

    #[test]
    fn quit_keys_exit() {
        let (_dir, mut app) = setup();
        assert!(app.handle_key(KeyCode::Char('q')).unwrap());
        let (_dir, mut app) = setup();
        assert!(app.handle_key(KeyCode::Esc).unwrap());
    }

    #[test]
    fn draws_every_mode_without_panicking() {
        let (_dir, mut app) = setup();
        add_book(&mut app, "Dune", "Herbert");
        let mut terminal = Terminal::new(TestBackend::new(120, 40)).unwrap();

        terminal.draw(|frame| app.draw(frame)).unwrap();
        app.handle_key(KeyCode::Char('+')).unwrap();
        terminal.draw(|frame| app.draw(frame)).unwrap();
        app.handle_key(KeyCode::Esc).unwrap();
        app.handle_key(KeyCode::Char('/')).unwrap();
        terminal.draw(|frame| app.draw(frame)).unwrap();
        app.handle_key(KeyCode::Esc).unwrap();
        app.handle_key(KeyCode::Char('-')).unwrap();
        terminal.draw(|frame| app.draw(frame)).unwrap();
    }
}

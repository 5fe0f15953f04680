use ratatui::layout::{Constraint, Direction, Layout, Rect};

use crate::db::LibraryTable;

/// Column headings shown above each table, in schema column order.
pub(crate) fn column_headers(table: LibraryTable) -> &'static [&'static str] {
    match table {
        LibraryTable::Books => &[
            "ID",
            "Title",
            "Author",
            "Genre",
            "Publication Date",
            "ISBN",
            "Available",
        ],
        LibraryTable::Borrowers => &["ID", "Name", "Email", "Phone", "Address"],
        LibraryTable::Checkouts => &[
            "ID",
            "Book ID",
            "Borrower ID",
            "Checkout Date",
            "Due Date",
            "Return Date",
        ],
    }
}

/// Relative column widths. Ids are 33 characters wide, so they get a fixed
/// share and the remaining text columns split the rest.
pub(crate) fn column_widths(table: LibraryTable) -> Vec<Constraint> {
    match table {
        LibraryTable::Books => vec![
            Constraint::Percentage(18),
            Constraint::Percentage(20),
            Constraint::Percentage(15),
            Constraint::Percentage(12),
            Constraint::Percentage(12),
            Constraint::Percentage(15),
            Constraint::Percentage(8),
        ],
        LibraryTable::Borrowers => vec![
            Constraint::Percentage(20),
            Constraint::Percentage(18),
            Constraint::Percentage(22),
            Constraint::Percentage(12),
            Constraint::Percentage(28),
        ],
        LibraryTable::Checkouts => vec![
            Constraint::Percentage(20),
            Constraint::Percentage(20),
            Constraint::Percentage(20),
            Constraint::Percentage(13),
            Constraint::Percentage(13),
            Constraint::Percentage(14),
        ],
    }
}

/// Move `selected` by `offset` within `0..len`, clamping at both ends.
pub(crate) fn step_selection(selected: usize, offset: isize, len: usize) -> usize {
    if len == 0 {
        return 0;
    }
    let target = selected as isize + offset;
    target.clamp(0, len as isize - 1) as usize
}

/// Produce a rectangle centered within `area` that spans the requested percent
/// of the width and height. Used for modal dialogs.
pub(crate) fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let horizontal = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(area);

    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(horizontal[1]);

    vertical[1]
}

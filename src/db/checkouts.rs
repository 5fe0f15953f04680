use rusqlite::{params, Connection, Row};
use tracing::debug;

use crate::error::StoreResult;
use crate::models::Checkout;

use super::records::LibraryTable;

fn row_to_checkout(row: &Row) -> rusqlite::Result<Checkout> {
    Ok(Checkout {
        id: row.get(0)?,
        book_id: row.get(1)?,
        borrower_id: row.get(2)?,
        checkout_date: row.get(3)?,
        due_date: row.get(4)?,
        return_date: row.get(5)?,
    })
}

/// Every checkout in insertion order, open and closed alike.
pub fn fetch_checkouts(conn: &Connection) -> StoreResult<Vec<Checkout>> {
    let mut stmt = conn.prepare(
        "SELECT id, book_id, borrower_id, checkout_date, due_date, return_date FROM checkouts",
    )?;

    let checkouts = stmt
        .query_map([], row_to_checkout)?
        .collect::<Result<Vec<_>, _>>()?;

    Ok(checkouts)
}

/// Record a loan. Neither `book_id` nor `borrower_id` is checked against its
/// parent table. A `return_date` of `None` is stored as NULL.
pub fn insert_checkout(
    conn: &Connection,
    book_id: &str,
    borrower_id: &str,
    checkout_date: &str,
    due_date: &str,
    return_date: Option<&str>,
) -> StoreResult<String> {
    let id = LibraryTable::Checkouts.new_id();
    conn.execute(
        "INSERT INTO checkouts (id, book_id, borrower_id, checkout_date, due_date, return_date)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
        params![id, book_id, borrower_id, checkout_date, due_date, return_date],
    )?;
    debug!(%id, book_id, borrower_id, "inserted checkout");
    Ok(id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::connection::create_tables;

    fn setup() -> Connection {
        let conn = Connection::open_in_memory().unwrap();
        create_tables(&conn).unwrap();
        conn
    }

    #[test]
    fn missing_return_date_is_stored_as_null() {
        let conn = setup();
        insert_checkout(&conn, "B1", "U1", "2024-01-01", "2024-01-15", None).unwrap();

        let is_null: bool = conn
            .query_row("SELECT return_date IS NULL FROM checkouts", [], |row| {
                row.get(0)
            })
            .unwrap();
        assert!(is_null);
        assert!(fetch_checkouts(&conn).unwrap()[0].is_open());
    }

    #[test]
    fn keeps_return_date_when_given() {
        let conn = setup();
        let id =
            insert_checkout(&conn, "B1", "U1", "2024-01-01", "2024-01-15", Some("2024-01-09"))
                .unwrap();

        let checkouts = fetch_checkouts(&conn).unwrap();
        assert_eq!(checkouts.len(), 1);
        assert_eq!(checkouts[0].id, id);
        assert_eq!(checkouts[0].return_date.as_deref(), Some("2024-01-09"));
    }

    #[test]
    fn accepts_unknown_parents() {
        let conn = setup();
        let result = insert_checkout(&conn, "B-nope", "U-nope", "2024-01-01", "2024-01-15", None);
        assert!(result.is_ok());
    }
}

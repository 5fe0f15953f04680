//! Operations that work on any of the three tables.

use std::fmt;
use std::str::FromStr;

use rusqlite::{params, Connection};
use uuid::Uuid;

use crate::error::{StoreError, StoreResult};
use crate::models::Record;

use super::{books, borrowers, checkouts};

/// The three tables in the library database. Table names only ever come from
/// this enum, never from user input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LibraryTable {
    Books,
    Borrowers,
    Checkouts,
}

impl LibraryTable {
    pub const ALL: [LibraryTable; 3] = [
        LibraryTable::Books,
        LibraryTable::Borrowers,
        LibraryTable::Checkouts,
    ];

    pub fn name(self) -> &'static str {
        match self {
            LibraryTable::Books => "books",
            LibraryTable::Borrowers => "borrowers",
            LibraryTable::Checkouts => "checkouts",
        }
    }

    /// First character of every id stored in this table.
    pub fn id_prefix(self) -> char {
        match self {
            LibraryTable::Books => 'B',
            LibraryTable::Borrowers => 'U',
            LibraryTable::Checkouts => 'C',
        }
    }

    /// Generate a fresh primary key: the table prefix followed by a random
    /// UUID in simple (undashed) form.
    pub fn new_id(self) -> String {
        format!("{}{}", self.id_prefix(), Uuid::new_v4().simple())
    }

    fn delete_sql(self) -> &'static str {
        match self {
            LibraryTable::Books => "DELETE FROM books WHERE id = ?1",
            LibraryTable::Borrowers => "DELETE FROM borrowers WHERE id = ?1",
            LibraryTable::Checkouts => "DELETE FROM checkouts WHERE id = ?1",
        }
    }
}

impl fmt::Display for LibraryTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for LibraryTable {
    type Err = StoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        LibraryTable::ALL
            .into_iter()
            .find(|table| table.name().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| StoreError::UnknownTable(s.to_string()))
    }
}

/// Delete the row with `id`. Missing ids are not an error; the returned count
/// is simply zero. Dependent checkouts are left in place.
pub fn delete_record(conn: &Connection, table: LibraryTable, id: &str) -> StoreResult<usize> {
    Ok(conn.execute(table.delete_sql(), params![id])?)
}

/// Every row of `table` in natural storage order.
pub fn fetch_all(conn: &Connection, table: LibraryTable) -> StoreResult<Vec<Record>> {
    let records = match table {
        LibraryTable::Books => books::fetch_books(conn)?
            .into_iter()
            .map(Record::Book)
            .collect(),
        LibraryTable::Borrowers => borrowers::fetch_borrowers(conn)?
            .into_iter()
            .map(Record::Borrower)
            .collect(),
        LibraryTable::Checkouts => checkouts::fetch_checkouts(conn)?
            .into_iter()
            .map(Record::Checkout)
            .collect(),
    };
    Ok(records)
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
    fn table_names_parse_and_display() {
        for table in LibraryTable::ALL {
            assert_eq!(table.to_string().parse::<LibraryTable>().unwrap(), table);
        }
        assert_eq!(
            "Books".parse::<LibraryTable>().unwrap(),
            LibraryTable::Books
        );
    }

    #[test]
    fn unknown_table_is_rejected() {
        let err = "books; DROP TABLE books".parse::<LibraryTable>().unwrap_err();
        assert!(matches!(err, StoreError::UnknownTable(_)));
    }

    #[test]
    fn ids_carry_table_prefix() {
        assert!(LibraryTable::Books.new_id().starts_with('B'));
        assert!(LibraryTable::Borrowers.new_id().starts_with('U'));
        assert!(LibraryTable::Checkouts.new_id().starts_with('C'));
        assert_ne!(LibraryTable::Books.new_id(), LibraryTable::Books.new_id());
    }

    #[test]
    fn delete_removes_only_matching_row() {
        let conn = setup();
        let keep = borrowers::insert_borrower(&conn, "Ada", "ada@example.com", "", "").unwrap();
        let gone = borrowers::insert_borrower(&conn, "Bob", "bob@example.com", "", "").unwrap();

        assert_eq!(delete_record(&conn, LibraryTable::Borrowers, &gone).unwrap(), 1);

        let ids: Vec<String> = fetch_all(&conn, LibraryTable::Borrowers)
            .unwrap()
            .iter()
            .map(|record| record.id().to_string())
            .collect();
        assert_eq!(ids, vec![keep]);
    }

    #[test]
    fn deleting_missing_id_is_a_no_op() {
        let conn = setup();
        books::insert_book(&conn, "Dune", "Herbert", "SF", "1965", "1", true).unwrap();

        assert_eq!(delete_record(&conn, LibraryTable::Books, "B-missing").unwrap(), 0);
        assert_eq!(fetch_all(&conn, LibraryTable::Books).unwrap().len(), 1);
    }

    #[test]
    fn deleting_a_book_leaves_its_checkouts() {
        let conn = setup();
        let book = books::insert_book(&conn, "Dune", "Herbert", "SF", "1965", "1", true).unwrap();
        checkouts::insert_checkout(&conn, &book, "U1", "2024-01-01", "2024-01-15", None).unwrap();

        delete_record(&conn, LibraryTable::Books, &book).unwrap();

        let remaining = fetch_all(&conn, LibraryTable::Checkouts).unwrap();
        assert_eq!(remaining.len(), 1);
        match &remaining[0] {
            Record::Checkout(checkout) => assert_eq!(checkout.book_id, book),
            other => panic!("unexpected record {other:?}"),
        }
    }
}

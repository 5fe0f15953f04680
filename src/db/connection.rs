use std::fs;
use std::path::Path;

use rusqlite::Connection;
use tracing::info;

use crate::error::{StoreError, StoreResult};

/// Open a connection to the database file, creating the file if needed.
///
/// Foreign-key enforcement is deliberately left at SQLite's default (off):
/// checkouts may reference books or borrowers that were never created or have
/// since been deleted.
pub fn open_connection(path: &Path) -> StoreResult<Connection> {
    Ok(Connection::open(path)?)
}

/// Create the data directory and file, then make sure every table exists.
pub fn ensure_schema(path: &Path) -> StoreResult<()> {
    if let Some(parent) = path.parent().filter(|parent| !parent.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|source| StoreError::DataDir {
            path: parent.to_path_buf(),
            source,
        })?;
    }

    let conn = open_connection(path)?;
    create_tables(&conn)?;
    info!(path = %path.display(), "database created and ready");
    Ok(())
}

/// `CREATE TABLE IF NOT EXISTS` for all three tables, so this can run on
/// every startup without touching existing rows.
pub fn create_tables(conn: &Connection) -> StoreResult<()> {
    conn.execute(
        "CREATE TABLE IF NOT EXISTS books (
            id TEXT PRIMARY KEY,
            title TEXT,
            author TEXT,
            genre TEXT,
            publication_date TEXT,
            isbn TEXT,
            available INTEGER
        )",
        [],
    )?;

    conn.execute(
        "CREATE TABLE IF NOT EXISTS borrowers (
            id TEXT PRIMARY KEY,
            name TEXT,
            email TEXT,
            phone TEXT,
            address TEXT
        )",
        [],
    )?;

    conn.execute(
        "CREATE TABLE IF NOT EXISTS checkouts (
            id TEXT PRIMARY KEY,
            book_id TEXT,
            borrower_id TEXT,
            checkout_date TEXT,
            due_date TEXT,
            return_date TEXT,
            FOREIGN KEY(book_id) REFERENCES books(id),
            FOREIGN KEY(borrower_id) REFERENCES borrowers(id)
        )",
        [],
    )?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table_names(conn: &Connection) -> Vec<String> {
        let mut stmt = conn
            .prepare("SELECT name FROM sqlite_master WHERE type = 'table' ORDER BY name")
            .unwrap();
        let names = stmt
            .query_map([], |row| row.get(0))
            .unwrap()
            .collect::<Result<Vec<String>, _>>()
            .unwrap();
        names
    }

    #[test]
    fn creates_all_three_tables() {
        let conn = Connection::open_in_memory().unwrap();
        create_tables(&conn).unwrap();
        assert_eq!(table_names(&conn), vec!["books", "borrowers", "checkouts"]);
    }

    #[test]
    fn create_tables_is_idempotent() {
        let conn = Connection::open_in_memory().unwrap();
        create_tables(&conn).unwrap();
        conn.execute("INSERT INTO borrowers (id, name) VALUES ('U1', 'Ada')", [])
            .unwrap();

        create_tables(&conn).unwrap();

        let count: i64 = conn
            .query_row("SELECT COUNT(*) FROM borrowers", [], |row| row.get(0))
            .unwrap();
        assert_eq!(count, 1);
    }

    #[test]
    fn foreign_keys_stay_unenforced() {
        let conn = Connection::open_in_memory().unwrap();
        let enabled: i64 = conn
            .query_row("PRAGMA foreign_keys", [], |row| row.get(0))
            .unwrap();
        assert_eq!(enabled, 0);
    }
}

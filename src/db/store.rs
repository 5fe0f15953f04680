use rusqlite::Connection;
use tracing::{debug, error};

use crate::config::StoreConfig;
use crate::error::StoreResult;
use crate::models::{Book, Borrower, Checkout, Record};

use super::records::LibraryTable;
use super::{books, borrowers, checkouts, connection, records};

/// Entry point for every persistence operation. Each call opens its own
/// connection, runs one statement and drops the connection again; nothing is
/// pooled and no transaction spans two calls.
#[derive(Debug, Clone)]
pub struct Store {
    config: StoreConfig,
}

impl Store {
    pub fn new(config: StoreConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &StoreConfig {
        &self.config
    }

    /// Open a connection, run `op`, and log any failure before handing it
    /// back to the caller.
    fn with_connection<T>(
        &self,
        operation: &'static str,
        op: impl FnOnce(&Connection) -> StoreResult<T>,
    ) -> StoreResult<T> {
        let result =
            connection::open_connection(self.config.db_path()).and_then(|conn| op(&conn));
        if let Err(err) = &result {
            error!(operation, error = %err, "storage operation failed");
        }
        result
    }

    /// Create the database file and any missing tables. Safe to call on every
    /// startup.
    pub fn initialize_schema(&self) -> StoreResult<()> {
        let result = connection::ensure_schema(self.config.db_path());
        if let Err(err) = &result {
            error!(operation = "initialize_schema", error = %err, "storage operation failed");
        }
        result
    }

    pub fn add_book(
        &self,
        title: &str,
        author: &str,
        genre: &str,
        publication_date: &str,
        isbn: &str,
        available: bool,
    ) -> StoreResult<String> {
        self.with_connection("add_book", |conn| {
            books::insert_book(conn, title, author, genre, publication_date, isbn, available)
        })
    }

    pub fn add_borrower(
        &self,
        name: &str,
        email: &str,
        phone: &str,
        address: &str,
    ) -> StoreResult<String> {
        self.with_connection("add_borrower", |conn| {
            borrowers::insert_borrower(conn, name, email, phone, address)
        })
    }

    /// Record a loan. The referenced book and borrower are not required to
    /// exist.
    pub fn add_checkout(
        &self,
        book_id: &str,
        borrower_id: &str,
        checkout_date: &str,
        due_date: &str,
        return_date: Option<&str>,
    ) -> StoreResult<String> {
        self.with_connection("add_checkout", |conn| {
            checkouts::insert_checkout(
                conn,
                book_id,
                borrower_id,
                checkout_date,
                due_date,
                return_date,
            )
        })
    }

    /// Delete one row by id and report how many rows went away (0 or 1).
    /// There is no cascade: deleting a book or borrower orphans its checkouts.
    pub fn delete_record(&self, table: LibraryTable, id: &str) -> StoreResult<usize> {
        let deleted =
            self.with_connection("delete_record", |conn| records::delete_record(conn, table, id))?;
        debug!(%table, id, deleted, "delete finished");
        Ok(deleted)
    }

    /// Substring search over title, author, genre and isbn. Callers that do
    /// not want "everything" for an empty term must guard against it.
    pub fn search_books(&self, term: &str) -> StoreResult<Vec<Book>> {
        self.with_connection("search_books", |conn| books::search_books(conn, term))
    }

    pub fn list_all(&self, table: LibraryTable) -> StoreResult<Vec<Record>> {
        self.with_connection("list_all", |conn| records::fetch_all(conn, table))
    }

    pub fn list_books(&self) -> StoreResult<Vec<Book>> {
        self.with_connection("list_books", books::fetch_books)
    }

    pub fn list_borrowers(&self) -> StoreResult<Vec<Borrower>> {
        self.with_connection("list_borrowers", borrowers::fetch_borrowers)
    }

    pub fn list_checkouts(&self) -> StoreResult<Vec<Checkout>> {
        self.with_connection("list_checkouts", checkouts::fetch_checkouts)
    }
}

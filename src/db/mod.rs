//! Persistence module split across logical submodules.

mod books;
mod borrowers;
mod checkouts;
mod connection;
mod records;
mod store;

pub use books::{fetch_books, insert_book, search_books};
pub use borrowers::{fetch_borrowers, insert_borrower};
pub use checkouts::{fetch_checkouts, insert_checkout};
pub use connection::{create_tables, ensure_schema, open_connection};
pub use records::{delete_record, fetch_all, LibraryTable};
pub use store::Store;

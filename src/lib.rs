//! Core library surface for the Library Manager TUI application.
//!
//! The store can be driven directly (scripts, tests) or through the Ratatui
//! front-end in [`ui`].
pub mod config;
pub mod db;
pub mod error;
pub mod logging;
pub mod models;
pub mod ui;

pub use config::StoreConfig;
pub use db::{LibraryTable, Store};
pub use error::{StoreError, StoreResult};

/// The three record types and the row wrapper returned by `Store::list_all`.
pub use models::{Book, Borrower, Checkout, Record};

/// The interactive application entry point and state container.
pub use ui::{run_app, App};

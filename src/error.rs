//! Error type shared by every store operation.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Everything that can go wrong while talking to the library database.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("could not locate home directory")]
    HomeDirUnavailable,

    #[error("failed to create data directory {}", .path.display())]
    DataDir {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("unknown table '{0}' (expected books, borrowers or checkouts)")]
    UnknownTable(String),

    /// Connectivity failures, constraint violations and malformed statements
    /// all land here.
    #[error(transparent)]
    Storage(#[from] rusqlite::Error),
}

pub type StoreResult<T> = Result<T, StoreError>;

#[cfg(test)]
mod tests {
    use rusqlite::Connection;

    use super::*;

    fn missing_table_error() -> StoreError {
        let conn = Connection::open_in_memory().unwrap();
        conn.execute("DELETE FROM nowhere", [])
            .map_err(StoreError::from)
            .unwrap_err()
    }

    #[test]
    fn storage_error_shows_sqlite_message() {
        let err = missing_table_error();
        assert!(matches!(err, StoreError::Storage(_)));
        assert_eq!(err.to_string(), "no such table: nowhere");
    }

    #[test]
    fn chained_output_names_sqlite_message_once() {
        let chained = format!("{:#}", anyhow::Error::from(missing_table_error()));
        assert_eq!(chained.matches("no such table: nowhere").count(), 1);
    }
}

use std::path::{Path, PathBuf};

use directories::BaseDirs;

use crate::error::{StoreError, StoreResult};

/// Folder name used beneath the user's home directory for application data.
const DATA_DIR_NAME: &str = ".library-manager";
/// SQLite file name stored inside the application data directory.
const DB_FILE_NAME: &str = "library.sqlite";
/// Log file written next to the database.
const LOG_FILE_NAME: &str = "library.log";

/// Where the store keeps its database. Tests point this at a temporary
/// directory; the binary uses [`StoreConfig::default_location`].
#[derive(Debug, Clone)]
pub struct StoreConfig {
    db_path: PathBuf,
}

impl StoreConfig {
    pub fn new(db_path: impl Into<PathBuf>) -> Self {
        Self {
            db_path: db_path.into(),
        }
    }

    /// Resolve `~/.library-manager/library.sqlite`.
    pub fn default_location() -> StoreResult<Self> {
        let base_dirs = BaseDirs::new().ok_or(StoreError::HomeDirUnavailable)?;
        Ok(Self::new(
            base_dirs.home_dir().join(DATA_DIR_NAME).join(DB_FILE_NAME),
        ))
    }

    pub fn db_path(&self) -> &Path {
        &self.db_path
    }

    /// The log file lives beside the database so one directory holds all
    /// application state.
    pub fn log_path(&self) -> PathBuf {
        match self.db_path.parent() {
            Some(parent) => parent.join(LOG_FILE_NAME),
            None => PathBuf::from(LOG_FILE_NAME),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn log_path_sits_next_to_database() {
        let config = StoreConfig::new("/tmp/library/library.sqlite");
        assert_eq!(config.log_path(), PathBuf::from("/tmp/library/library.log"));
    }

    #[test]
    fn bare_file_name_logs_to_working_directory() {
        let config = StoreConfig::new("library.sqlite");
        assert_eq!(config.log_path(), PathBuf::from("library.log"));
    }
}

//! Error types for the Nervura core library.

use thiserror::Error;

/// All errors that can occur within the Nervura core library.
#[derive(Debug, Error)]
pub enum NervuraError {
    /// A SQLite operation failed.
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    /// The opened file is not a valid Nervura record store.
    #[error("Invalid store: {0}")]
    InvalidStore(String),

    /// An export was requested over a scope that selected no records.
    #[error("Nothing to export: the current filter selects no records")]
    EmptyScope,

    /// An I/O operation on the filesystem failed.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Persisted or incoming record data could not be (de)serialized.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Writing the XLSX package failed.
    #[error("Zip error: {0}")]
    Zip(#[from] zip::result::ZipError),
}

/// Convenience alias that pins the error type to [`NervuraError`].
pub type Result<T> = std::result::Result<T, NervuraError>;

impl NervuraError {
    /// Returns a short, human-readable message suitable for display to the end user.
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Self::Database(e) => format!("Failed to save: {e}"),
            Self::InvalidStore(_) => "Could not open the record store".to_string(),
            Self::EmptyScope => "Nothing to export".to_string(),
            Self::Io(e) => format!("File error: {e}"),
            Self::Json(e) => format!("Data format error: {e}"),
            Self::Zip(e) => format!("Spreadsheet error: {e}"),
        }
    }
}

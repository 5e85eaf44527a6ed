use thiserror::Error;

/// Errors that can occur within the persistence layer.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Underlying SQLite / rusqlite error.
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    /// No row with the given ID exists.
    #[error("Not found: {id}")]
    NotFound { id: String },

    /// A stored value could not be parsed back into its domain type.
    #[error("Invalid stored value: {0}")]
    Invalid(String),
}

pub type Result<T> = std::result::Result<T, StoreError>;

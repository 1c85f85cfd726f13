//! Error types for the class store.

use thiserror::Error;

use crate::schedule::ClassId;

#[derive(Debug, Error)]
pub enum StoreError {
    /// The underlying SQLite call failed
    #[error("Database error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    /// A stored row holds a value the schedule types cannot represent
    #[error("Corrupt row in {table}: {message}")]
    CorruptRow { table: &'static str, message: String },

    #[error("Class {id} not found")]
    NotFound { id: ClassId },

    /// Another thread panicked while holding the connection
    #[error("Database connection lock poisoned")]
    Poisoned,

    /// Backend-specific failure from a non-SQLite store
    #[error("Store unavailable: {message}")]
    Unavailable { message: String },
}

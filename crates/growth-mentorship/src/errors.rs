//! Error types for the mentorship subsystem.
//!
//! Absence is never an error here: lookups return `Option` or `false`.

use thiserror::Error;

/// Errors returned by mentorship operations.
#[derive(Debug, Error)]
pub enum MentorshipError {
    /// Self-mentorship or a malformed identity.
    #[error("invalid assignment: {0}")]
    InvalidAssignment(String),

    /// The connection pool could not hand out a connection.
    #[error("storage unavailable: {0}")]
    StorageUnavailable(#[from] r2d2::Error),

    /// `SQLite` statement error.
    #[error("sqlite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    /// Filesystem error while preparing the database location.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// Schema migration failed.
    #[error("migration error: {message}")]
    Migration {
        /// Describes which migration failed and why.
        message: String,
    },

    /// A stored value could not be decoded.
    #[error("corrupt row: {0}")]
    CorruptRow(String),
}

impl MentorshipError {
    /// Whether the failure came from the persistence layer, as opposed to a
    /// rejected request. Storage failures may succeed on redelivery.
    #[must_use]
    pub fn is_storage_failure(&self) -> bool {
        matches!(
            self,
            Self::StorageUnavailable(_) | Self::Sqlite(_) | Self::Io(_)
        )
    }
}

/// Convenience type alias for mentorship results.
pub type Result<T> = std::result::Result<T, MentorshipError>;

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

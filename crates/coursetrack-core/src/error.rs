//! Error types for the course state model.
//!
//! `StorageError` is recovered inside the progress store and never reaches
//! session callers. `CourseError` is what session operations return when the
//! caller asks for something the catalog or the gate does not allow.

use thiserror::Error;

/// Errors returned by course session operations.
#[derive(Debug, Error)]
pub enum CourseError {
    /// The lesson id is not part of the catalog.
    #[error("unknown lesson: {0}")]
    UnknownLesson(String),

    /// The module id is not part of the catalog.
    #[error("unknown module: {0}")]
    UnknownModule(String),

    /// Lessons or quizzes are still outstanding.
    #[error("certificate not available: {lessons} lesson(s) and {quizzes} quiz(zes) outstanding")]
    NotEligible { lessons: usize, quizzes: usize },

    /// Certificates need a holder name.
    #[error("a holder name is required to issue a certificate")]
    MissingHolderName,
}

/// Errors raised by a storage backend.
#[derive(Debug, Error)]
pub enum StorageError {
    /// Reading or writing the backing medium failed.
    #[error("storage I/O failed for key {key}: {source}")]
    Io {
        key: String,
        #[source]
        source: std::io::Error,
    },

    /// The record could not be encoded.
    #[error("failed to serialize progress record: {0}")]
    Serialize(#[from] serde_json::Error),

    /// The backend refuses writes (quota exceeded, storage disabled).
    #[error("storage unavailable: {0}")]
    Unavailable(String),
}

impl StorageError {
    pub(crate) fn io(key: &str, source: std::io::Error) -> Self {
        StorageError::Io {
            key: key.to_string(),
            source,
        }
    }
}

//! Unified error types for linkvault.

use tokio_rusqlite::rusqlite;

/// Unified error types shared across the linkvault crates.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Invalid input parameters (e.g., empty search query).
    #[error("{0}")]
    InvalidInput(String),

    /// The requested record does not exist (or belongs to another user).
    #[error("{0} not found")]
    NotFound(String),

    /// Authentication failed or the bearer token is missing/invalid.
    #[error("{0}")]
    Unauthorized(String),

    /// A uniqueness constraint was violated (e.g., duplicate email).
    #[error("{0}")]
    Conflict(String),

    /// Database operation failed.
    #[error("database error: {0}")]
    Database(tokio_rusqlite::Error),

    /// Migration failed to apply.
    #[error("migration failed: {0}")]
    MigrationFailed(String),

    /// The supplied URL is not a well-formed absolute URL.
    #[error("invalid URL: {0}")]
    InvalidUrl(String),

    /// Fetch timed out.
    #[error("fetch timed out: {0}")]
    FetchTimeout(String),

    /// The remote server answered with a non-success status.
    #[error("request failed with status {0}")]
    HttpStatus(u16),

    /// Any other network/transport failure during a fetch.
    #[error("fetch failed: {0}")]
    FetchFailed(String),

    /// Unexpected internal failure (e.g., the system RNG).
    #[error("internal error: {0}")]
    Internal(String),
}

impl From<tokio_rusqlite::Error<Error>> for Error {
    fn from(err: tokio_rusqlite::Error<Error>) -> Self {
        match err {
            tokio_rusqlite::Error::Error(e) => e,
            tokio_rusqlite::Error::ConnectionClosed => Error::Database(tokio_rusqlite::Error::ConnectionClosed),
            tokio_rusqlite::Error::Close(c) => Error::Database(tokio_rusqlite::Error::Close(c)),
            _ => Error::Database(tokio_rusqlite::Error::ConnectionClosed),
        }
    }
}

impl From<tokio_rusqlite::Error<rusqlite::Error>> for Error {
    fn from(err: tokio_rusqlite::Error<rusqlite::Error>) -> Self {
        Error::Database(err)
    }
}

impl From<rusqlite::Error> for Error {
    fn from(err: rusqlite::Error) -> Self {
        Error::Database(tokio_rusqlite::Error::Error(err))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_display() {
        let err = Error::NotFound("bookmark 42".to_string());
        assert_eq!(err.to_string(), "bookmark 42 not found");
    }

    #[test]
    fn test_http_status_display() {
        let err = Error::HttpStatus(404);
        assert_eq!(err.to_string(), "request failed with status 404");
    }
}

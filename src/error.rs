//! Error types shared across the crate.

use thiserror::Error;

/// Startup configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required environment variable {key}")]
    MissingValue { key: String },

    #[error("invalid value for {key}: {message}")]
    InvalidValue { key: String, message: String },
}

/// Storage-layer errors. Zero affected rows is not an error; these variants
/// cover connectivity and statement failures only.
#[derive(Debug, Error)]
pub enum DatabaseError {
    #[error("connection pool error: {0}")]
    Pool(String),

    #[error("query failed: {0}")]
    Query(#[from] tokio_postgres::Error),

    #[error("migration failed: {0}")]
    Migration(String),
}

/// Web server lifecycle errors.
#[derive(Debug, Error)]
pub enum ServerError {
    #[error("failed to start web server: {reason}")]
    StartupFailed { reason: String },
}

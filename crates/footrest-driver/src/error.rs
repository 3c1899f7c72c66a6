//! Driver-layer errors (thiserror, matching `oxide-orm::error::OrmError`'s
//! shape of wrapping `sqlx::Error` plus the crate's own variants).

use thiserror::Error;

#[derive(Debug, Error)]
pub enum DriverError {
    #[error("sql generation error: {0}")]
    Core(#[from] footrest_core::CoreError),

    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("request timed out")]
    Timeout,

    #[error("unsupported bulk method on manip for table {0:?}")]
    UnsupportedManip(String),

    /// Raised by a [`crate::TextCodec`] implementation when an outbound or
    /// inbound string fails to recode.
    #[error("text encoding error: {0}")]
    Encoding(String),
}

pub type Result<T> = std::result::Result<T, DriverError>;

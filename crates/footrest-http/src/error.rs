//! `FootrestError` (spec §7, SPEC_FULL.md §3): the single error enum HTTP
//! dispatch renders through `Format.Error`. Each variant wraps a
//! lower-level `thiserror` error from the crate that produced it.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum FootrestError {
    #[error("request body parse error: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("validation error: {0}")]
    Validation(#[from] footrest_core::CoreError),

    #[error("driver error: {0}")]
    Driver(footrest_driver::DriverError),

    #[error("text encoding error: {0}")]
    Encoding(String),

    #[error("request timed out")]
    Cancelled,
}

/// Splits a [`footrest_driver::DriverError::Encoding`] out into its own
/// variant; every other driver error folds into `Driver` unchanged.
impl From<footrest_driver::DriverError> for FootrestError {
    fn from(e: footrest_driver::DriverError) -> Self {
        match e {
            footrest_driver::DriverError::Encoding(message) => Self::Encoding(message),
            other => Self::Driver(other),
        }
    }
}

pub type Result<T> = std::result::Result<T, FootrestError>;

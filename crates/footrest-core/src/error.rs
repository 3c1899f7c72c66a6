//! Core error types (thiserror-based, mirroring the teacher's per-crate
//! `thiserror::Error` enums in `oxide-orm`/`oxide-router`).

use thiserror::Error;

use crate::parser::ParseError;

/// Errors surfaced by SQL generation: parsing, validation, and compilation.
#[derive(Debug, Error)]
pub enum CoreError {
    #[error("parse error: {0}")]
    Parse(#[from] ParseError),

    #[error("invalid table name {0:?}")]
    InvalidTableName(String),

    #[error("invalid column name {0:?}")]
    InvalidColumnName(String),

    #[error("column {column:?} is not in {table:?} schema")]
    UnknownColumn { table: String, column: String },

    #[error("{0:?} is not an operator")]
    NotAnOperator(String),

    #[error("operator {0:?} is not registered")]
    UnknownOperator(String),

    #[error("value conversion error: {0}")]
    Conversion(String),

    #[error("invalid expr")]
    InvalidExpr,
}

pub type Result<T> = std::result::Result<T, CoreError>;
